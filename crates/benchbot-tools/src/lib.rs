//! # Benchbot Tools - 配置文件与仿真脚本
//!
//! **依赖原则**: 只依赖 `benchbot-control` 与 `benchbot-driver`，不含任何硬件依赖
//!
//! ## 包含模块
//!
//! - `settings` - TOML 配置文件（控制参数 + 周期驱动器参数）
//! - `script` - JSON 仿真脚本及其回放器
//!
//! ## 使用示例
//!
//! ```rust
//! use benchbot_tools::Settings;
//!
//! let settings = Settings::load("does-not-exist.toml").unwrap();
//! assert_eq!(settings, Settings::default());
//! ```

mod error;
pub mod script;
pub mod settings;

pub use error::SettingsError;
pub use script::{CycleRecord, Frame, Script, ScriptPlayer};
pub use settings::{DEFAULT_SETTINGS_FILE, Settings};
