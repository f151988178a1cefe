//! 底盘仲裁器
//!
//! 将意图映射为差速（坦克式）底盘的左右电机输出。无内部状态，对所有意图都有定义。

use serde::{Deserialize, Serialize};

use crate::config::DriveConfig;
use crate::input::Intent;

/// 底盘驾驶模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DriveMode {
    /// 全停（默认）
    #[default]
    Idle,
    /// 坦克驾驶
    Tank,
    /// 原地左转
    PointTurnLeft,
    /// 原地右转
    PointTurnRight,
}

/// 左右电机输出，各自在 [-1, 1] 内
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MotorCommand {
    pub left: f64,
    pub right: f64,
}

impl MotorCommand {
    /// 全停
    pub const STOP: Self = Self {
        left: 0.0,
        right: 0.0,
    };

    /// 创建命令，两侧输出被钳位到 [-1, 1]
    pub fn new(left: f64, right: f64) -> Self {
        Self {
            left: left.clamp(-1.0, 1.0),
            right: right.clamp(-1.0, 1.0),
        }
    }

    /// 直行
    pub fn forward(speed: f64) -> Self {
        Self::new(speed, speed)
    }

    /// 原地右转：左侧正转、右侧反转
    pub fn point_turn_right(speed: f64) -> Self {
        Self::new(speed, -speed)
    }

    /// 原地左转：与右转镜像
    pub fn point_turn_left(speed: f64) -> Self {
        Self::new(-speed, speed)
    }

    /// 坦克驾驶
    ///
    /// 摇杆向前推得到负的原始读数，因此两侧都取反。
    pub fn tank(axis_left: f64, axis_right: f64) -> Self {
        // 0.0 - x 避免产生 -0.0
        Self::new(0.0 - axis_left, 0.0 - axis_right)
    }

    pub fn is_stopped(&self) -> bool {
        self.left == 0.0 && self.right == 0.0
    }
}

impl std::fmt::Display for MotorCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:+.2}, {:+.2})", self.left, self.right)
    }
}

/// 仲裁：意图 → (驾驶模式, 电机输出)
///
/// 气动和升降机意图不驱动底盘，底盘在这些周期内停止。
pub fn arbitrate(intent: &Intent, config: &DriveConfig) -> (DriveMode, MotorCommand) {
    match *intent {
        Intent::TurnRight => (
            DriveMode::PointTurnRight,
            MotorCommand::point_turn_right(config.turn_speed),
        ),
        Intent::TurnLeft => (
            DriveMode::PointTurnLeft,
            MotorCommand::point_turn_left(config.turn_speed),
        ),
        Intent::Tank { left, right } => (DriveMode::Tank, MotorCommand::tank(left, right)),
        Intent::ToggleArm
        | Intent::ToggleClaw
        | Intent::RaiseElevator
        | Intent::LowerElevator
        | Intent::Idle => (DriveMode::Idle, MotorCommand::STOP),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_stops() {
        let (mode, cmd) = arbitrate(&Intent::Idle, &DriveConfig::default());
        assert_eq!(mode, DriveMode::Idle);
        assert_eq!(cmd, MotorCommand::STOP);
        assert!(cmd.is_stopped());
    }

    #[test]
    fn test_point_turns_are_mirrored() {
        let config = DriveConfig::default();
        let (mode, right) = arbitrate(&Intent::TurnRight, &config);
        assert_eq!(mode, DriveMode::PointTurnRight);
        assert_eq!(right, MotorCommand::new(0.25, -0.25));

        let (mode, left) = arbitrate(&Intent::TurnLeft, &config);
        assert_eq!(mode, DriveMode::PointTurnLeft);
        assert_eq!(left, MotorCommand::new(-0.25, 0.25));
    }

    #[test]
    fn test_tank_inverts_axes() {
        let (mode, cmd) = arbitrate(
            &Intent::Tank {
                left: 0.5,
                right: -0.3,
            },
            &DriveConfig::default(),
        );
        assert_eq!(mode, DriveMode::Tank);
        assert_eq!(cmd, MotorCommand::new(-0.5, 0.3));
    }

    #[test]
    fn test_tank_never_negative_zero() {
        let cmd = MotorCommand::tank(0.0, 0.4);
        assert!(cmd.left.is_sign_positive());
    }

    #[test]
    fn test_actuator_intents_stop_drive() {
        for intent in [
            Intent::ToggleArm,
            Intent::ToggleClaw,
            Intent::RaiseElevator,
            Intent::LowerElevator,
        ] {
            let (mode, cmd) = arbitrate(&intent, &DriveConfig::default());
            assert_eq!(mode, DriveMode::Idle);
            assert!(cmd.is_stopped());
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", MotorCommand::new(0.5, -0.25)), "(+0.50, -0.25)");
    }
}
