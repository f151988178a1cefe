//! 驱动层错误类型定义

use benchbot_control::ConfigError;
use thiserror::Error;

/// 驱动层错误类型
#[derive(Error, Debug)]
pub enum DriverError {
    /// 控制参数非法
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// 输入采集失败（手柄断开等）
    #[error("Input source error: {0}")]
    Input(String),

    /// 气压传感器读取失败
    #[error("Pressure sensor error: {0}")]
    Sensor(String),

    /// 输出驱动失败（PWM / 电磁阀 / 压缩机）
    #[error("Output error: {0}")]
    Output(String),

    /// 控制循环配置非法
    #[error("Invalid loop configuration: {0}")]
    LoopConfig(String),
}

#[cfg(test)]
mod tests {
    use super::DriverError;
    use benchbot_control::ConfigError;

    #[test]
    fn test_driver_error_display() {
        let err = DriverError::Input("joystick 1 unplugged".to_string());
        assert_eq!(format!("{}", err), "Input source error: joystick 1 unplugged");

        let err = DriverError::LoopConfig("frequency_hz must be > 0".to_string());
        assert!(format!("{}", err).contains("frequency_hz"));
    }

    #[test]
    fn test_from_config_error() {
        let err: DriverError = ConfigError::InvalidDeadZone(3.0).into();
        match err {
            DriverError::Config(ConfigError::InvalidDeadZone(v)) => assert_eq!(v, 3.0),
            _ => panic!("Expected Config variant"),
        }
    }
}
