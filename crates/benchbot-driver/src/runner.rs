//! Cycle Runner - 固定周期驱动器
//!
//! 以固定频率反复调用 [`Robot::tick`]，处理定时、超时检测和停止请求。
//!
//! # 核心功能
//!
//! - **固定周期**: 以绝对截止时间排程，避免累计漂移
//! - **超时检测**: 单周期耗时超过 `dt_clamp_multiplier` 倍标称周期时记录并告警
//! - **低抖动可选**: `SleepStrategy::Spin` 使用 `spin_sleep`
//! - **错误传播**: 输出写入失败立即返回
//!
//! # 使用场景
//!
//! ```rust
//! use benchbot_control::ControlConfig;
//! use benchbot_driver::{LoopConfig, Robot, RobotMode, SimIo, run_robot};
//! use std::sync::atomic::AtomicBool;
//!
//! let mut robot = Robot::new(ControlConfig::default(), SimIo::new()).unwrap();
//! robot.request_mode(RobotMode::Autonomous);
//!
//! let config = LoopConfig {
//!     frequency_hz: 500.0,
//!     max_iterations: Some(10),
//!     ..LoopConfig::default()
//! };
//! let stats = run_robot(&mut robot, &config, &AtomicBool::new(false)).unwrap();
//! assert_eq!(stats.iterations, 10);
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use spin_sleep::SpinSleeper;

use crate::error::DriverError;
use crate::io::RobotIo;
use crate::robot::Robot;

/// 默认控制频率（Hz），对应 20ms 周期
pub const DEFAULT_FREQUENCY_HZ: f64 = 50.0;

/// 超过此频率时告警
const HIGH_FREQUENCY_WARN_HZ: f64 = 1000.0;

/// 周期间休眠方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SleepStrategy {
    /// `std::thread::sleep`
    #[default]
    Std,
    /// `spin_sleep`，抖动更低但占用更多 CPU
    Spin,
}

/// 控制循环配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoopConfig {
    /// 控制频率（Hz）
    ///
    /// 例如：50.0 表示 50Hz（20ms 周期）
    pub frequency_hz: f64,

    /// 超时倍数
    ///
    /// 单周期实际间隔超过标称周期的此倍数时记为一次超时。
    pub dt_clamp_multiplier: f64,

    /// 最大迭代次数（None 表示运行到停止请求为止）
    pub max_iterations: Option<usize>,

    pub sleep: SleepStrategy,
}

impl Default for LoopConfig {
    fn default() -> Self {
        LoopConfig {
            frequency_hz: DEFAULT_FREQUENCY_HZ,
            dt_clamp_multiplier: 2.0,
            max_iterations: None,
            sleep: SleepStrategy::Std,
        }
    }
}

impl LoopConfig {
    /// 校验配置
    pub fn validate(&self) -> Result<(), DriverError> {
        if !(self.frequency_hz.is_finite() && self.frequency_hz > 0.0) {
            return Err(DriverError::LoopConfig(format!(
                "Invalid frequency_hz: {} (must be > 0)",
                self.frequency_hz
            )));
        }
        if !(self.dt_clamp_multiplier.is_finite() && self.dt_clamp_multiplier > 0.0) {
            return Err(DriverError::LoopConfig(format!(
                "Invalid dt_clamp_multiplier: {} (must be > 0)",
                self.dt_clamp_multiplier
            )));
        }

        // 周期和超时阈值都必须能表示为 Duration
        let period = 1.0 / self.frequency_hz;
        if Duration::try_from_secs_f64(period).is_err() {
            return Err(DriverError::LoopConfig(format!(
                "Invalid frequency_hz: {} (period too long)",
                self.frequency_hz
            )));
        }
        if Duration::try_from_secs_f64(period * self.dt_clamp_multiplier).is_err() {
            return Err(DriverError::LoopConfig(format!(
                "Invalid dt_clamp_multiplier: {} (overrun threshold too long)",
                self.dt_clamp_multiplier
            )));
        }
        Ok(())
    }

    /// 标称周期
    ///
    /// 未通过 [`validate`](Self::validate) 的配置返回 `Duration::MAX`。
    pub fn period(&self) -> Duration {
        Duration::try_from_secs_f64(1.0 / self.frequency_hz).unwrap_or(Duration::MAX)
    }
}

/// 运行统计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoopStats {
    /// 完成的周期数
    pub iterations: usize,
    /// 超时周期数
    pub overruns: usize,
}

/// 运行控制循环
///
/// 这是一个阻塞函数，会持续运行直到：
/// - 输出写入失败
/// - 达到 `max_iterations`（如果设置）
/// - `stop` 被置位（Ctrl+C 等）
///
/// # 参数
///
/// - `robot`: 机器人
/// - `config`: 循环配置
/// - `stop`: 停止标志，每个周期开始前检查一次
///
/// # 返回
///
/// - `Ok(LoopStats)`: 正常结束
/// - `Err(DriverError)`: 配置非法或输出写入失败
pub fn run_robot<Io: RobotIo>(
    robot: &mut Robot<Io>,
    config: &LoopConfig,
    stop: &AtomicBool,
) -> Result<LoopStats, DriverError> {
    config.validate()?;
    if config.frequency_hz > HIGH_FREQUENCY_WARN_HZ {
        tracing::warn!(
            "Very high control frequency: {} Hz. This may cause performance issues.",
            config.frequency_hz
        );
    }

    let period = config.period();
    let max_dt = period.mul_f64(config.dt_clamp_multiplier);
    let sleeper = SpinSleeper::default();

    let mut stats = LoopStats::default();
    let mut last_time: Option<Instant> = None;
    let mut deadline = Instant::now();

    loop {
        if let Some(max_iter) = config.max_iterations
            && stats.iterations >= max_iter
        {
            break;
        }
        if stop.load(Ordering::Acquire) {
            tracing::info!("stop requested");
            break;
        }

        let now = Instant::now();
        if let Some(last) = last_time {
            let real_dt = now - last;
            if real_dt > max_dt {
                stats.overruns += 1;
                tracing::warn!("cycle overrun: {:?} (nominal {:?})", real_dt, period);
                // 落后太多则重新对齐，不追补
                deadline = now;
            }
        }

        robot.tick(now)?;

        last_time = Some(now);
        stats.iterations += 1;

        deadline += period;
        let remaining = deadline.saturating_duration_since(Instant::now());
        if !remaining.is_zero() {
            match config.sleep {
                SleepStrategy::Std => std::thread::sleep(remaining),
                SleepStrategy::Spin => sleeper.sleep(remaining),
            }
        }
    }

    tracing::debug!(
        iterations = stats.iterations,
        overruns = stats.overruns,
        "control loop finished"
    );
    Ok(stats)
}
