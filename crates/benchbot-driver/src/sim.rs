//! 仿真协作方
//!
//! 无硬件依赖的 [`RobotIo`](crate::io::RobotIo) 实现：输入由调用方直接设置，
//! 所有输出都被记录下来，供测试断言和命令行仿真回放使用。

use benchbot_control::{
    Actuator, ActuatorCommand, ButtonId, ButtonSet, CompressorRequest, JoystickReading,
    MotorCommand,
};

use crate::error::DriverError;
use crate::io::{CompressorOutput, DriveOutput, InputSource, PressureSensor, SolenoidOutput};

/// 一对互补电磁阀的当前电平 `(extend, retract)`
pub type SolenoidPair = (bool, bool);

/// 仿真 I/O
#[derive(Debug, Clone)]
pub struct SimIo {
    reading: JoystickReading,
    pressure: f64,
    input_fault: Option<String>,
    sensor_fault: Option<String>,

    /// 每周期写入的底盘命令
    pub drive_log: Vec<MotorCommand>,
    /// 每周期写入的升降机速度
    pub elevator_log: Vec<f64>,
    /// 执行器命令（仅切换时）
    pub actuator_log: Vec<ActuatorCommand>,
    /// 压缩机请求
    pub compressor_log: Vec<CompressorRequest>,

    arm: SolenoidPair,
    claw: SolenoidPair,
    compressor_running: bool,
}

impl Default for SimIo {
    fn default() -> Self {
        Self::new()
    }
}

impl SimIo {
    /// 创建仿真 I/O：无输入，气压为 0，电磁阀处于收回位
    pub fn new() -> Self {
        Self {
            reading: JoystickReading::default(),
            pressure: 0.0,
            input_fault: None,
            sensor_fault: None,
            drive_log: Vec::new(),
            elevator_log: Vec::new(),
            actuator_log: Vec::new(),
            compressor_log: Vec::new(),
            arm: (false, true),
            claw: (false, true),
            compressor_running: false,
        }
    }

    /// 设置原始轴读数（通道从 1 开始，越界忽略）
    pub fn set_axis(&mut self, channel: u8, value: f64) {
        if let Some(slot) = usize::from(channel)
            .checked_sub(1)
            .and_then(|i| self.reading.axes.get_mut(i))
        {
            *slot = value;
        }
    }

    pub fn set_buttons(&mut self, buttons: ButtonSet) {
        self.reading.buttons = buttons;
    }

    pub fn press(&mut self, id: u8) {
        self.reading.buttons.insert(ButtonId(id));
    }

    pub fn release(&mut self, id: u8) {
        self.reading.buttons.remove(ButtonId(id));
    }

    /// 松开所有按键、摇杆回中
    pub fn clear_input(&mut self) {
        self.reading = JoystickReading::default();
    }

    pub fn set_pressure(&mut self, pressure: f64) {
        self.pressure = pressure;
    }

    /// 注入输入故障（`None` 清除）
    pub fn set_input_fault(&mut self, fault: Option<&str>) {
        self.input_fault = fault.map(str::to_owned);
    }

    /// 注入传感器故障（`None` 清除）
    pub fn set_sensor_fault(&mut self, fault: Option<&str>) {
        self.sensor_fault = fault.map(str::to_owned);
    }

    pub fn last_drive(&self) -> Option<MotorCommand> {
        self.drive_log.last().copied()
    }

    pub fn last_elevator(&self) -> Option<f64> {
        self.elevator_log.last().copied()
    }

    /// 电磁阀对当前电平
    pub fn solenoids(&self, actuator: Actuator) -> SolenoidPair {
        match actuator {
            Actuator::Arm => self.arm,
            Actuator::Claw => self.claw,
        }
    }

    pub fn compressor_running(&self) -> bool {
        self.compressor_running
    }

    /// 清空所有输出记录（不影响电磁阀和压缩机状态）
    pub fn clear_logs(&mut self) {
        self.drive_log.clear();
        self.elevator_log.clear();
        self.actuator_log.clear();
        self.compressor_log.clear();
    }
}

impl InputSource for SimIo {
    fn read_joystick(&mut self) -> Result<JoystickReading, DriverError> {
        match &self.input_fault {
            Some(fault) => Err(DriverError::Input(fault.clone())),
            None => Ok(self.reading),
        }
    }
}

impl PressureSensor for SimIo {
    fn pressure(&mut self) -> Result<f64, DriverError> {
        match &self.sensor_fault {
            Some(fault) => Err(DriverError::Sensor(fault.clone())),
            None => Ok(self.pressure),
        }
    }
}

impl DriveOutput for SimIo {
    fn set_drive(&mut self, command: MotorCommand) -> Result<(), DriverError> {
        self.drive_log.push(command);
        Ok(())
    }

    fn set_elevator(&mut self, speed: f64) -> Result<(), DriverError> {
        self.elevator_log.push(speed);
        Ok(())
    }
}

impl SolenoidOutput for SimIo {
    fn apply(&mut self, command: ActuatorCommand) -> Result<(), DriverError> {
        let pair = match command.actuator() {
            Actuator::Arm => &mut self.arm,
            Actuator::Claw => &mut self.claw,
        };
        *pair = command.solenoids();
        self.actuator_log.push(command);
        Ok(())
    }
}

impl CompressorOutput for SimIo {
    fn set_compressor(&mut self, request: CompressorRequest) -> Result<(), DriverError> {
        self.compressor_running = request == CompressorRequest::On;
        self.compressor_log.push(request);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_roundtrip() {
        let mut io = SimIo::new();
        io.set_axis(2, -0.4);
        io.set_axis(0, 1.0); // 越界忽略
        io.press(6);

        let reading = io.read_joystick().unwrap();
        assert_eq!(reading.axis(2), -0.4);
        assert!(reading.buttons.contains(ButtonId(6)));

        io.release(6);
        assert!(io.read_joystick().unwrap().buttons.is_empty());
    }

    #[test]
    fn test_faults() {
        let mut io = SimIo::new();
        io.set_input_fault(Some("unplugged"));
        assert!(matches!(io.read_joystick(), Err(DriverError::Input(_))));
        io.set_input_fault(None);
        assert!(io.read_joystick().is_ok());

        io.set_sensor_fault(Some("open circuit"));
        assert!(matches!(io.pressure(), Err(DriverError::Sensor(_))));
    }

    #[test]
    fn test_solenoid_pairs_follow_commands() {
        let mut io = SimIo::new();
        assert_eq!(io.solenoids(Actuator::Arm), (false, true));

        io.apply(ActuatorCommand::new(Actuator::Arm, true)).unwrap();
        assert_eq!(io.solenoids(Actuator::Arm), (true, false));
        assert_eq!(io.solenoids(Actuator::Claw), (false, true));
    }
}
