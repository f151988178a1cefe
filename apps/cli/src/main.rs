//! # Benchbot CLI
//!
//! Command-line front end for the benchtop robot control layer.
//!
//! ```bash
//! # 生成默认配置文件
//! benchbot-cli config init
//!
//! # 回放仿真脚本，打印每次输出变化
//! benchbot-cli simulate scripts/arm_toggle.json
//!
//! # 预演自动模式序列
//! benchbot-cli auton
//!
//! # 按配置频率实时运行仿真机器人（Ctrl+C 停止）
//! benchbot-cli run --mode autonomous
//! ```

use std::path::PathBuf;

use anyhow::Result;
use benchbot_tools::DEFAULT_SETTINGS_FILE;
use clap::{Parser, Subcommand};

mod commands;

use commands::{AutonCommand, ConfigCommand, RunCommand, SimulateCommand};

/// 需要输出 info 日志的 crate
const LOG_TARGETS: [&str; 4] = [
    "benchbot_cli=info",
    "benchbot_control=info",
    "benchbot_driver=info",
    "benchbot_tools=info",
];

/// Benchbot CLI - 桌面机器人命令行工具
#[derive(Parser, Debug)]
#[command(name = "benchbot-cli")]
#[command(about = "Command-line front end for the benchtop robot", long_about = None)]
#[command(version)]
struct Cli {
    /// 配置文件路径
    #[arg(short, long, global = true, default_value = DEFAULT_SETTINGS_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),

    /// 回放仿真脚本
    Simulate {
        #[command(flatten)]
        args: SimulateCommand,
    },

    /// 预演自动模式序列
    Auton {
        #[command(flatten)]
        args: AutonCommand,
    },

    /// 实时运行仿真机器人
    Run {
        #[command(flatten)]
        args: RunCommand,
    },
}

fn main() -> Result<()> {
    // 初始化日志（输出到 stderr，stdout 留给命令结果）
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    for target in LOG_TARGETS {
        filter = filter.add_directive(target.parse()?);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Config(cmd) => cmd.execute(&cli.config),

        Commands::Simulate { args } => args.execute(&cli.config),

        Commands::Auton { args } => args.execute(&cli.config),

        Commands::Run { args } => args.execute(&cli.config),
    }
}
