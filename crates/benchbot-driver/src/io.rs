//! 外部协作方接口
//!
//! 控制核心只消费/产生纯数据；真正的硬件读写由实现这些 trait 的协作方完成。
//! 协作方负责把读数清洗为合法值，核心不再校验。

use benchbot_control::{ActuatorCommand, CompressorRequest, JoystickReading, MotorCommand};

use crate::error::DriverError;

/// 手柄采集
pub trait InputSource {
    /// 读取本周期手柄状态
    fn read_joystick(&mut self) -> Result<JoystickReading, DriverError>;
}

/// 气压传感器
pub trait PressureSensor {
    /// 读取当前气压（设备原始单位）
    fn pressure(&mut self) -> Result<f64, DriverError>;
}

/// 电机输出（底盘 + 升降机）
pub trait DriveOutput {
    fn set_drive(&mut self, command: MotorCommand) -> Result<(), DriverError>;

    fn set_elevator(&mut self, speed: f64) -> Result<(), DriverError>;
}

/// 电磁阀输出
pub trait SolenoidOutput {
    /// 一次写入互补电磁阀对
    fn apply(&mut self, command: ActuatorCommand) -> Result<(), DriverError>;
}

/// 压缩机输出
pub trait CompressorOutput {
    fn set_compressor(&mut self, request: CompressorRequest) -> Result<(), DriverError>;
}

/// 全部协作方的组合
///
/// 任何同时实现了各个接口的类型都自动实现 `RobotIo`。
pub trait RobotIo:
    InputSource + PressureSensor + DriveOutput + SolenoidOutput + CompressorOutput
{
}

impl<T> RobotIo for T where
    T: InputSource + PressureSensor + DriveOutput + SolenoidOutput + CompressorOutput
{
}
