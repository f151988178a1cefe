//! # 配置文件
//!
//! 单个 TOML 文件同时承载控制参数和周期驱动器参数：
//!
//! ```toml
//! [control]
//! toggle_trigger = "edge"
//!
//! [control.drive]
//! dead_zone = 0.05
//!
//! [control.compressor]
//! on_below = 60.0
//! off_at = 110.0
//!
//! [runner]
//! frequency_hz = 50.0
//! ```
//!
//! 所有字段都有默认值，文件中只需写出要覆盖的部分；文件不存在时使用全部默认值。

use std::fs;
use std::io;
use std::path::Path;

use benchbot_control::ControlConfig;
use benchbot_driver::LoopConfig;
use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

/// 默认配置文件名
pub const DEFAULT_SETTINGS_FILE: &str = "benchbot.toml";

/// 完整配置
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// 控制核心参数
    pub control: ControlConfig,

    /// 周期驱动器参数
    pub runner: LoopConfig,
}

impl Settings {
    /// 从 TOML 字符串解析并校验
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// 序列化为 TOML 字符串
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// 从文件加载配置
    ///
    /// 文件不存在时返回默认配置（并记录 debug 日志），其他读取错误照常返回。
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => {
                let settings = Self::from_toml(&content)?;
                tracing::debug!("loaded settings from {}", path.display());
                Ok(settings)
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("{} not found, using defaults", path.display());
                Ok(Self::default())
            },
            Err(e) => Err(SettingsError::io(path, e)),
        }
    }

    /// 保存配置到文件
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SettingsError> {
        let path = path.as_ref();
        let content = self.to_toml()?;
        fs::write(path, content).map_err(|e| SettingsError::io(path, e))
    }

    /// 校验全部参数
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.control.validate()?;
        self.runner.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchbot_control::{ButtonId, TriggerMode};

    #[test]
    fn test_empty_file_is_default() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_override() {
        let settings = Settings::from_toml(
            r#"
            [control]
            toggle_trigger = "level"

            [control.buttons]
            arm = 3

            [runner]
            frequency_hz = 100.0
            "#,
        )
        .unwrap();

        assert_eq!(settings.control.toggle_trigger, TriggerMode::Level);
        assert_eq!(settings.control.buttons.arm, ButtonId(3));
        assert_eq!(settings.control.buttons.claw, ButtonId(2));
        assert_eq!(settings.runner.frequency_hz, 100.0);
        assert_eq!(settings.runner.dt_clamp_multiplier, 2.0);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Settings::from_toml("[control.compressor]\non_below = 120.0").unwrap_err();
        assert!(matches!(err, SettingsError::Config(_)));

        let err = Settings::from_toml("[runner]\nfrequency_hz = 0.0").unwrap_err();
        assert!(matches!(err, SettingsError::Driver(_)));

        let err = Settings::from_toml("[runner]\nfrequency_hz = 1e-30").unwrap_err();
        assert!(matches!(err, SettingsError::Driver(_)));

        let err = Settings::from_toml("[control.buttons]\narm = 2").unwrap_err();
        assert!(err.to_string().contains("Button 2"));
    }

    #[test]
    fn test_malformed_toml() {
        let err = Settings::from_toml("[control\n").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_toml_roundtrip_keeps_autonomous_sequence() {
        let settings = Settings::default();
        let text = settings.to_toml().unwrap();
        assert!(text.contains("[[control.autonomous]]"));
        assert_eq!(Settings::from_toml(&text).unwrap(), settings);
    }
}
