//! 压缩机滞回调节
//!
//! 双阈值开关控制（类似恒温器，非 PID）：
//!
//! ```text
//!            pressure < on_below              pressure >= off_at
//!   Idle ─────────────────────────▶ Charging ─────────────────────▶ Idle
//!          (请求 On)                           (请求 Off)
//! ```
//!
//! 每个周期只检查一次读数，充气阶段不阻塞控制循环。

use serde::{Deserialize, Serialize};

use crate::config::CompressorConfig;

/// 压缩机开关请求
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressorRequest {
    On,
    Off,
}

/// 调节阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegulatorPhase {
    /// 未充气
    #[default]
    Idle,
    /// 充气中，等待气压达到关断阈值
    Charging,
}

/// 气压调节器
#[derive(Debug, Clone)]
pub struct PressureRegulator {
    config: CompressorConfig,
    phase: RegulatorPhase,
}

impl PressureRegulator {
    pub fn new(config: CompressorConfig) -> Self {
        Self {
            config,
            phase: RegulatorPhase::Idle,
        }
    }

    pub fn phase(&self) -> RegulatorPhase {
        self.phase
    }

    pub fn is_charging(&self) -> bool {
        self.phase == RegulatorPhase::Charging
    }

    /// 处理一次气压读数
    ///
    /// 只在阶段切换时返回请求；NaN 读数不会引起任何切换。
    pub fn update(&mut self, pressure: f64) -> Option<CompressorRequest> {
        match self.phase {
            RegulatorPhase::Idle if pressure < self.config.on_below => {
                self.phase = RegulatorPhase::Charging;
                tracing::info!(pressure, "pressure low, compressor on");
                Some(CompressorRequest::On)
            },
            RegulatorPhase::Charging if pressure >= self.config.off_at => {
                self.phase = RegulatorPhase::Idle;
                tracing::info!(pressure, "pressure restored, compressor off");
                Some(CompressorRequest::Off)
            },
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regulator() -> PressureRegulator {
        PressureRegulator::new(CompressorConfig::default())
    }

    #[test]
    fn test_low_pressure_turns_on() {
        let mut reg = regulator();
        assert_eq!(reg.update(55.0), Some(CompressorRequest::On));
        assert!(reg.is_charging());
    }

    #[test]
    fn test_charging_until_off_threshold() {
        let mut reg = regulator();
        reg.update(55.0);

        // 充气中：低于 60 也不再重复请求
        for p in [50.0, 58.0, 60.0, 80.0, 109.9] {
            assert_eq!(reg.update(p), None, "pressure {}", p);
        }
        assert_eq!(reg.update(110.0), Some(CompressorRequest::Off));
        assert_eq!(reg.phase(), RegulatorPhase::Idle);
    }

    #[test]
    fn test_no_request_inside_band_when_idle() {
        let mut reg = regulator();
        for p in [60.0, 75.0, 109.0, 110.0, 150.0] {
            assert_eq!(reg.update(p), None);
        }
        assert!(!reg.is_charging());
    }

    #[test]
    fn test_retriggers_after_full_cycle() {
        let mut reg = regulator();
        assert_eq!(reg.update(40.0), Some(CompressorRequest::On));
        assert_eq!(reg.update(120.0), Some(CompressorRequest::Off));
        assert_eq!(reg.update(90.0), None);
        assert_eq!(reg.update(59.0), Some(CompressorRequest::On));
    }

    #[test]
    fn test_nan_is_ignored() {
        let mut reg = regulator();
        assert_eq!(reg.update(f64::NAN), None);
        reg.update(10.0);
        assert_eq!(reg.update(f64::NAN), None);
        assert!(reg.is_charging());
    }
}
