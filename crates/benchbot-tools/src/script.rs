//! 仿真脚本
//!
//! JSON 描述的输入帧序列，经完整驱动层（[`Robot`] + [`SimIo`]）回放。
//!
//! ```json
//! {
//!   "name": "arm toggle",
//!   "description": "teleop, toggle the arm, drive forward",
//!   "frames": [
//!     { "mode": "teleop", "buttons": [4], "repeat": 5 },
//!     { "mode": "teleop", "left": -0.6, "right": -0.6, "pressure": 55.0, "repeat": 50 },
//!     { "mode": "disabled" }
//!   ]
//! }
//! ```
//!
//! `left` / `right` 为逻辑摇杆值，回放时写入配置中 `axes.left` / `axes.right` 对应的原始通道。
//! `pressure` 省略时沿用上一帧的气压。

use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use benchbot_control::{ButtonId, ButtonSet, ControlConfig, CycleOutput};
use benchbot_driver::{Robot, RobotMode, SimIo};
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// 仿真脚本
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Script {
    /// 脚本名称
    pub name: String,

    /// 脚本描述
    #[serde(default)]
    pub description: String,

    /// 输入帧序列
    pub frames: Vec<Frame>,
}

/// 输入帧
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// 本帧请求的模式
    pub mode: RobotMode,

    #[serde(default)]
    pub left: f64,

    #[serde(default)]
    pub right: f64,

    /// 按下的按键编号
    #[serde(default)]
    pub buttons: Vec<ButtonId>,

    /// 气压读数（省略则沿用上一帧）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,

    /// 本帧持续的周期数
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

fn default_repeat() -> u32 {
    1
}

impl Script {
    /// 从 JSON 字符串解析并校验
    pub fn from_json(content: &str) -> Result<Self, SettingsError> {
        let script: Script = serde_json::from_str(content)?;
        script.validate()?;
        Ok(script)
    }

    /// 加载脚本文件
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| SettingsError::io(path, e))?;
        Self::from_json(&content)
    }

    /// 保存脚本文件
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content).map_err(|e| SettingsError::io(path, e))
    }

    /// 校验每一帧
    pub fn validate(&self) -> Result<(), SettingsError> {
        for (index, frame) in self.frames.iter().enumerate() {
            let invalid = |reason: String| SettingsError::InvalidFrame {
                frame: index,
                reason,
            };

            if frame.repeat == 0 {
                return Err(invalid("repeat must be > 0".to_string()));
            }
            if let Some(id) = frame.buttons.iter().find(|id| !id.is_valid()) {
                return Err(invalid(format!("{} out of range", id)));
            }
            if !(frame.left.is_finite() && frame.right.is_finite()) {
                return Err(invalid("axis values must be finite".to_string()));
            }
            if let Some(p) = frame.pressure
                && !p.is_finite()
            {
                return Err(invalid("pressure must be finite".to_string()));
            }
        }
        Ok(())
    }

    /// 脚本总周期数
    pub fn total_cycles(&self) -> u64 {
        self.frames.iter().map(|f| u64::from(f.repeat)).sum()
    }
}

/// 单周期回放记录
#[derive(Debug, Clone, PartialEq)]
pub struct CycleRecord {
    /// 周期序号（从 0 开始）
    pub cycle: u64,
    /// 所属帧序号
    pub frame: usize,
    pub mode: RobotMode,
    pub output: CycleOutput,
    pub compressor_running: bool,
}

/// 脚本回放器
pub struct ScriptPlayer {
    robot: Robot<SimIo>,
    period: Duration,
}

impl ScriptPlayer {
    /// 创建回放器
    ///
    /// # 参数
    ///
    /// - `config`: 控制参数
    /// - `period`: 仿真周期（只影响传给驱动层的时间戳，不真正休眠）
    pub fn new(config: ControlConfig, period: Duration) -> Result<Self, SettingsError> {
        Ok(Self {
            robot: Robot::new(config, SimIo::new())?,
            period,
        })
    }

    pub fn robot(&self) -> &Robot<SimIo> {
        &self.robot
    }

    /// 回放整个脚本，每个周期回调一次
    pub fn play<F>(&mut self, script: &Script, mut on_cycle: F) -> Result<(), SettingsError>
    where
        F: FnMut(&CycleRecord),
    {
        let axes = self.robot.core().config().axes;
        let start = Instant::now();
        let mut cycle: u64 = 0;

        tracing::info!(name = %script.name, frames = script.frames.len(), "replaying script");

        for (index, frame) in script.frames.iter().enumerate() {
            let io = self.robot.io_mut();
            io.clear_input();
            io.set_axis(axes.left, frame.left);
            io.set_axis(axes.right, frame.right);
            io.set_buttons(frame.buttons.iter().copied().collect::<ButtonSet>());
            if let Some(pressure) = frame.pressure {
                io.set_pressure(pressure);
            }
            self.robot.request_mode(frame.mode);

            for _ in 0..frame.repeat {
                let offset = self.period.saturating_mul(u32::try_from(cycle).unwrap_or(u32::MAX));
                let now = start + offset;
                self.robot.tick(now)?;

                on_cycle(&CycleRecord {
                    cycle,
                    frame: index,
                    mode: self.robot.mode(),
                    output: self.robot.last_output().clone(),
                    compressor_running: self.robot.io().compressor_running(),
                });
                cycle += 1;
            }
        }

        Ok(())
    }

    /// 回放并收集全部记录
    pub fn record(&mut self, script: &Script) -> Result<Vec<CycleRecord>, SettingsError> {
        let mut records = Vec::new();
        self.play(script, |r| records.push(r.clone()))?;
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchbot_control::MotorCommand;

    const ARM_SCRIPT: &str = r#"{
        "name": "arm toggle",
        "frames": [
            { "mode": "teleop", "buttons": [4], "repeat": 5 },
            { "mode": "teleop", "left": 0.5, "right": -0.3, "repeat": 2 },
            { "mode": "disabled" }
        ]
    }"#;

    #[test]
    fn test_parse_defaults() {
        let script = Script::from_json(ARM_SCRIPT).unwrap();
        assert_eq!(script.description, "");
        assert_eq!(script.frames.len(), 3);
        assert_eq!(script.frames[2].repeat, 1);
        assert_eq!(script.frames[2].mode, RobotMode::Disabled);
        assert_eq!(script.frames[0].pressure, None);
        assert_eq!(script.total_cycles(), 8);
    }

    #[test]
    fn test_invalid_frames() {
        let err = Script::from_json(
            r#"{ "name": "x", "frames": [ { "mode": "teleop" }, { "mode": "teleop", "repeat": 0 } ] }"#,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "Frame 1: repeat must be > 0");

        let err = Script::from_json(r#"{ "name": "x", "frames": [ { "mode": "teleop", "buttons": [33] } ] }"#)
            .unwrap_err();
        assert!(matches!(err, SettingsError::InvalidFrame { frame: 0, .. }));

        let err = Script::from_json(r#"{ "name": "x", "frames": [ { "mode": "sideways" } ] }"#)
            .unwrap_err();
        assert!(matches!(err, SettingsError::Script(_)));
    }

    #[test]
    fn test_replay_records_every_cycle() {
        let script = Script::from_json(ARM_SCRIPT).unwrap();
        let mut player = ScriptPlayer::new(ControlConfig::default(), Duration::from_millis(20)).unwrap();
        let records = player.record(&script).unwrap();

        assert_eq!(records.len(), 8);
        // 按住机械臂键 5 个周期只切换一次
        let toggles: usize = records[..5].iter().map(|r| r.output.actuators.len()).sum();
        assert_eq!(toggles, 1);
        assert_eq!(records[5].output.drive, MotorCommand::new(-0.5, 0.3));
        // 失能：停车，机械臂收回
        let last = records.last().unwrap();
        assert_eq!(last.mode, RobotMode::Disabled);
        assert_eq!(last.output.drive, MotorCommand::STOP);
        assert!(!player.robot().core().state().arm_engaged);
    }

    #[test]
    fn test_huge_repeat_counts_validate() {
        let script = Script::from_json(
            r#"{ "name": "soak", "frames": [
                { "mode": "teleop", "repeat": 4294967295 },
                { "mode": "disabled", "repeat": 4294967295 }
            ] }"#,
        )
        .unwrap();
        assert_eq!(script.total_cycles(), 2 * u64::from(u32::MAX));

        // 记录只随实际执行的周期增长
        let mut player = ScriptPlayer::new(ControlConfig::default(), Duration::from_millis(20)).unwrap();
        let mut seen = 0u64;
        let short = Script {
            frames: vec![Frame {
                repeat: 3,
                ..script.frames[0].clone()
            }],
            ..script
        };
        let records = player.record(&short).unwrap();
        player.play(&short, |_| seen += 1).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(seen, 3);
    }
}
