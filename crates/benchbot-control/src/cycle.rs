//! 控制周期
//!
//! [`ControlCore`] 把输入解释器、底盘仲裁器、执行器状态机、压缩机调节器和自动序列器
//! 组合为"（本周期输入, 上周期状态）→（新状态, 输出命令）"的纯步进接口。
//!
//! 每次调用都在有限步内返回，调度权始终留在外部周期驱动器手中。
//!
//! # 示例
//!
//! ```rust
//! use benchbot_control::{ButtonSet, ControlConfig, ControlCore, InputSnapshot, MotorCommand};
//!
//! let mut core = ControlCore::new(ControlConfig::default()).unwrap();
//!
//! let snapshot = InputSnapshot::new(0.5, -0.3, ButtonSet::empty());
//! let output = core.teleop_cycle(&snapshot);
//! assert_eq!(output.drive, MotorCommand::new(-0.5, 0.3));
//! ```

use crate::actuator::{ActuatorCommands, ActuatorStateMachine, elevator_speed};
use crate::autonomous::AutonomousSequencer;
use crate::compressor::{CompressorRequest, PressureRegulator};
use crate::config::ControlConfig;
use crate::drive::{MotorCommand, arbitrate};
use crate::error::ConfigError;
use crate::input::{InputSnapshot, Intent, interpret};
use crate::state::RobotState;

/// 单周期输出
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CycleOutput {
    /// 底盘电机输出（每周期都有）
    pub drive: MotorCommand,
    /// 升降机速度（每周期都有）
    pub elevator: f64,
    /// 执行器命令（仅在状态切换时出现）
    pub actuators: ActuatorCommands,
    /// 压缩机请求（仅在调节阶段切换时出现）
    pub compressor: Option<CompressorRequest>,
}

impl CycleOutput {
    /// 全部电机归零、无其他命令
    pub fn stopped() -> Self {
        Self::default()
    }
}

/// 控制核心
#[derive(Debug, Clone)]
pub struct ControlCore {
    config: ControlConfig,
    state: RobotState,
    actuators: ActuatorStateMachine,
    regulator: PressureRegulator,
    sequencer: AutonomousSequencer,
}

impl ControlCore {
    /// 校验配置并创建控制核心
    pub fn new(config: ControlConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            actuators: ActuatorStateMachine::new(config.toggle_trigger),
            regulator: PressureRegulator::new(config.compressor),
            sequencer: AutonomousSequencer::new(config.autonomous.clone()),
            state: RobotState::safe(),
            config,
        })
    }

    pub fn config(&self) -> &ControlConfig {
        &self.config
    }

    pub fn state(&self) -> &RobotState {
        &self.state
    }

    pub fn regulator(&self) -> &PressureRegulator {
        &self.regulator
    }

    pub fn sequencer(&self) -> &AutonomousSequencer {
        &self.sequencer
    }

    /// 按当前配置解释输入
    pub fn interpret(&self, snapshot: &InputSnapshot) -> Intent {
        interpret(snapshot, &self.config.buttons, self.config.drive.dead_zone)
    }

    /// 手动模式周期
    ///
    /// 压缩机调节独立于模式，由调用方另行调用 [`regulate`](Self::regulate)。
    pub fn teleop_cycle(&mut self, snapshot: &InputSnapshot) -> CycleOutput {
        let intent = self.interpret(snapshot);

        let (mode, drive) = arbitrate(&intent, &self.config.drive);
        self.state.drive_mode = mode;

        let actuators = self
            .actuators
            .update(&intent, snapshot, &self.config.buttons);
        for cmd in &actuators {
            tracing::info!(actuator = %cmd.actuator(), engaged = cmd.engaged(), "actuator transition");
        }
        self.state.arm_engaged = self.actuators.arm_engaged();
        self.state.claw_open = self.actuators.claw_open();

        CycleOutput {
            drive,
            elevator: elevator_speed(&intent, &self.config.elevator),
            actuators,
            compressor: None,
        }
    }

    /// 自动模式周期
    pub fn autonomous_cycle(&mut self) -> CycleOutput {
        let output = self.sequencer.tick(&self.config.drive);
        self.state.drive_mode = output.mode;
        self.state.autonomous_step_index = self.sequencer.step_index();

        CycleOutput {
            drive: output.command,
            ..CycleOutput::stopped()
        }
    }

    /// 压缩机调节（每周期一次，与模式无关）
    pub fn regulate(&mut self, pressure: f64) -> Option<CompressorRequest> {
        self.regulator.update(pressure)
    }

    /// 模式边界复位
    ///
    /// 执行器回到安全默认，电机归零，清除按键边沿记忆，自动序列回到第一步。
    /// 压缩机调节阶段保持不变。
    pub fn reset(&mut self) -> CycleOutput {
        let actuators = self.actuators.reset();
        self.sequencer.restart();
        self.state = RobotState::safe();

        CycleOutput {
            actuators,
            ..CycleOutput::stopped()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actuator::{Actuator, ActuatorCommand};
    use crate::drive::DriveMode;
    use crate::input::{ButtonId, ButtonSet};

    fn core() -> ControlCore {
        ControlCore::new(ControlConfig::default()).unwrap()
    }

    fn buttons(ids: &[u8]) -> ButtonSet {
        ids.iter().copied().map(ButtonId).collect()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = ControlConfig::default();
        config.drive.dead_zone = 2.0;
        assert!(ControlCore::new(config).is_err());
    }

    #[test]
    fn test_turn_right_ignores_axes() {
        let mut core = core();
        let out = core.teleop_cycle(&InputSnapshot::new(0.9, -0.9, buttons(&[6])));
        assert_eq!(out.drive, MotorCommand::new(0.25, -0.25));
        assert_eq!(core.state().drive_mode, DriveMode::PointTurnRight);
    }

    #[test]
    fn test_arm_toggle_updates_state() {
        let mut core = core();
        let out = core.teleop_cycle(&InputSnapshot::new(0.0, 0.0, buttons(&[4])));
        assert_eq!(
            out.actuators.as_slice(),
            &[ActuatorCommand::new(Actuator::Arm, true)]
        );
        assert!(core.state().arm_engaged);
        assert!(out.drive.is_stopped());
    }

    #[test]
    fn test_elevator_output() {
        let mut core = core();
        let out = core.teleop_cycle(&InputSnapshot::new(0.0, 0.0, buttons(&[8])));
        assert_eq!(out.elevator, 0.1);
        let out = core.teleop_cycle(&InputSnapshot::idle());
        assert_eq!(out.elevator, 0.0);
    }

    #[test]
    fn test_autonomous_updates_step_index() {
        let mut core = core();
        for _ in 0..101 {
            core.autonomous_cycle();
        }
        assert_eq!(core.state().autonomous_step_index, 1);
        assert_eq!(core.state().drive_mode, DriveMode::Idle);
    }

    #[test]
    fn test_reset_returns_safe_state() {
        let mut core = core();
        core.teleop_cycle(&InputSnapshot::new(0.0, 0.0, buttons(&[2])));
        assert!(core.state().claw_open);

        let out = core.reset();
        assert!(out.drive.is_stopped());
        assert_eq!(
            out.actuators.as_slice(),
            &[ActuatorCommand::new(Actuator::Claw, false)]
        );
        assert_eq!(*core.state(), RobotState::safe());
    }

    #[test]
    fn test_reset_keeps_compressor_phase() {
        let mut core = core();
        assert_eq!(core.regulate(30.0), Some(CompressorRequest::On));
        core.reset();
        assert!(core.regulator().is_charging());
    }
}
