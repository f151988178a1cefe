//! 命令定义和实现

pub mod auton;
pub mod config;
pub mod run;
pub mod simulate;

pub use auton::AutonCommand;
pub use config::ConfigCommand;
pub use run::RunCommand;
pub use simulate::SimulateCommand;

use std::path::Path;

use anyhow::{Context, Result};
use benchbot_tools::Settings;

/// 加载配置文件（不存在时使用默认值）
pub(crate) fn load_settings(path: &Path) -> Result<Settings> {
    Settings::load(path).with_context(|| format!("加载配置文件失败: {}", path.display()))
}
