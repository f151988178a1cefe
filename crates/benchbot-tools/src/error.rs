//! 工具层错误类型定义

use std::path::PathBuf;

use benchbot_control::ConfigError;
use benchbot_driver::DriverError;
use thiserror::Error;

/// 配置文件 / 仿真脚本错误
#[derive(Error, Debug)]
pub enum SettingsError {
    /// 文件读写失败
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// TOML 解析失败
    #[error("Invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML 序列化失败
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// JSON 脚本解析/序列化失败
    #[error("Invalid script: {0}")]
    Script(#[from] serde_json::Error),

    /// 控制参数非法
    #[error("Invalid control settings: {0}")]
    Config(#[from] ConfigError),

    /// 驱动层错误（循环配置非法、仿真输出失败）
    #[error(transparent)]
    Driver(#[from] DriverError),

    /// 脚本内容非法
    #[error("Frame {frame}: {reason}")]
    InvalidFrame { frame: usize, reason: String },
}

impl SettingsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SettingsError::Io {
            path: path.into(),
            source,
        }
    }
}
