//! 配置管理命令
//!
//! 查看、校验和生成 TOML 配置文件

use std::path::Path;

use anyhow::{Context, Result, bail};
use benchbot_tools::Settings;
use clap::Subcommand;

use super::load_settings;

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 打印生效的配置（文件内容 + 默认值）
    Show,

    /// 校验配置文件
    Check,

    /// 写出默认配置文件
    Init {
        /// 覆盖已存在的文件
        #[arg(short, long)]
        force: bool,
    },
}

impl ConfigCommand {
    pub fn execute(self, path: &Path) -> Result<()> {
        match self {
            ConfigCommand::Show => Self::show_(path),

            ConfigCommand::Check => Self::check_(path),

            ConfigCommand::Init { force } => Self::init_(path, force),
        }
    }

    fn show_(path: &Path) -> Result<()> {
        let settings = load_settings(path)?;
        print!("{}", settings.to_toml()?);
        Ok(())
    }

    fn check_(path: &Path) -> Result<()> {
        let settings = load_settings(path)?;
        let control = &settings.control;

        if path.exists() {
            println!("配置文件: {}", path.display());
        } else {
            println!("配置文件: {} (不存在，使用默认值)", path.display());
        }
        println!("  死区: {}", control.drive.dead_zone);
        println!(
            "  按键: 右转={} 左转={} 机械臂={} 爪子={} 升={} 降={}",
            control.buttons.turn_right.0,
            control.buttons.turn_left.0,
            control.buttons.arm.0,
            control.buttons.claw.0,
            control.buttons.elevator_raise.0,
            control.buttons.elevator_lower.0,
        );
        println!("  摇杆轴: 左={} 右={}", control.axes.left, control.axes.right);
        println!(
            "  压缩机: <{} 启动, >={} 关断",
            control.compressor.on_below, control.compressor.off_at
        );
        println!("  切换触发: {:?}", control.toggle_trigger);
        println!("  自动步骤: {}", control.autonomous.len());
        println!("  控制频率: {} Hz", settings.runner.frequency_hz);
        println!("✅ 配置有效");
        Ok(())
    }

    fn init_(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            bail!("{} 已存在（使用 --force 覆盖）", path.display());
        }

        Settings::default()
            .save(path)
            .with_context(|| format!("写入配置文件失败: {}", path.display()))?;
        println!("✅ 已写入默认配置: {}", path.display());
        Ok(())
    }
}
