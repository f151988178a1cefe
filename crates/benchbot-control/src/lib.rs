//! Benchbot 控制决策层
//!
//! 每个控制周期根据当前输入和上一周期状态，决定底盘、气动执行器和压缩机该做什么。
//! 本 crate 不做任何 I/O：输入采集、输出驱动、定时和模式调度都由外部协作方
//! （见 `benchbot-driver`）完成。
//!
//! # 组件
//!
//! - **输入解释器** (`input`): 摇杆读数 → 唯一驾驶意图
//! - **底盘仲裁器** (`drive`): 意图 → 左右电机输出
//! - **执行器状态机** (`actuator`): 机械臂/爪子切换、升降机电平输出
//! - **压缩机调节** (`compressor`): 双阈值滞回
//! - **自动序列器** (`autonomous`): 固定步骤序列
//! - **控制周期** (`cycle`): 以上组件的组合
//!
//! # 快速开始
//!
//! ```rust
//! use benchbot_control::prelude::*;
//!
//! let mut core = ControlCore::new(ControlConfig::default()).unwrap();
//! let output = core.teleop_cycle(&InputSnapshot::idle());
//! assert_eq!(output.drive, MotorCommand::STOP);
//! ```

pub mod actuator;
pub mod autonomous;
pub mod compressor;
pub mod config;
pub mod cycle;
pub mod drive;
mod error;
pub mod input;
pub mod state;

pub use actuator::{
    Actuator, ActuatorCommand, ActuatorCommands, ActuatorStateMachine, ToggleMachine, TriggerMode,
};
pub use autonomous::{AutonomousAction, AutonomousSequencer, AutonomousStep, DEFAULT_SEQUENCE};
pub use compressor::{CompressorRequest, PressureRegulator, RegulatorPhase};
pub use config::{
    AxisMap, ButtonMap, CompressorConfig, ControlConfig, DriveConfig, ElevatorConfig,
};
pub use cycle::{ControlCore, CycleOutput};
pub use drive::{DriveMode, MotorCommand};
pub use error::ConfigError;
pub use input::{ButtonId, ButtonSet, InputSnapshot, Intent, JoystickReading};
pub use state::RobotState;

/// 常用类型
pub mod prelude {
    pub use crate::{
        Actuator, ActuatorCommand, AutonomousAction, AutonomousStep, ButtonId, ButtonSet,
        CompressorRequest, ControlConfig, ControlCore, CycleOutput, DriveMode, InputSnapshot,
        Intent, MotorCommand, RobotState,
    };
}
