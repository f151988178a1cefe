//! 仿真回放命令
//!
//! 经完整驱动层回放 JSON 脚本，打印每次输出变化

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use benchbot_tools::{CycleRecord, Script, ScriptPlayer};
use clap::Args;

use super::load_settings;

/// 仿真回放命令参数
#[derive(Args, Debug)]
pub struct SimulateCommand {
    /// 脚本文件路径（JSON）
    pub script: PathBuf,

    /// 打印每个周期（默认只打印有变化的周期）
    #[arg(short, long)]
    pub all: bool,
}

impl SimulateCommand {
    pub fn execute(&self, config: &Path) -> Result<()> {
        let settings = load_settings(config)?;
        let script = Script::load(&self.script)
            .with_context(|| format!("加载脚本失败: {}", self.script.display()))?;

        println!("📜 {}", script.name);
        if !script.description.is_empty() {
            println!("📝 {}", script.description);
        }

        let mut player = ScriptPlayer::new(settings.control, settings.runner.period())?;
        let mut previous: Option<CycleRecord> = None;
        let mut toggles = 0usize;

        player.play(&script, |record| {
            toggles += record.output.actuators.len();
            if self.all || changed(previous.as_ref(), record) {
                println!("{}", format_record(record));
            }
            previous = Some(record.clone());
        })?;

        println!();
        println!(
            "✅ {} cycles, {} actuator transitions, compressor {}",
            script.total_cycles(),
            toggles,
            if player.robot().io().compressor_running() { "on" } else { "off" }
        );
        Ok(())
    }
}

/// 与上一周期相比是否有可见变化
fn changed(previous: Option<&CycleRecord>, record: &CycleRecord) -> bool {
    let Some(prev) = previous else {
        return true;
    };
    prev.mode != record.mode
        || prev.output.drive != record.output.drive
        || prev.output.elevator != record.output.elevator
        || !record.output.actuators.is_empty()
        || record.output.compressor.is_some()
}

fn format_record(record: &CycleRecord) -> String {
    let mut line = format!(
        "[{:04}] {:<10} drive={} elevator={:+.2}",
        record.cycle,
        record.mode.to_string(),
        record.output.drive,
        record.output.elevator
    );
    for cmd in &record.output.actuators {
        let state = if cmd.engaged() { "engaged" } else { "released" };
        line.push_str(&format!(" {}={}", cmd.actuator(), state));
    }
    if let Some(request) = record.output.compressor {
        line.push_str(&format!(" compressor={:?}", request));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchbot_control::{Actuator, ActuatorCommand, CycleOutput, MotorCommand};
    use benchbot_driver::RobotMode;

    fn record(cycle: u64, drive: MotorCommand) -> CycleRecord {
        CycleRecord {
            cycle,
            frame: 0,
            mode: RobotMode::Teleop,
            output: CycleOutput {
                drive,
                ..CycleOutput::stopped()
            },
            compressor_running: false,
        }
    }

    #[test]
    fn test_changed_detection() {
        let a = record(0, MotorCommand::STOP);
        let b = record(1, MotorCommand::STOP);
        let c = record(2, MotorCommand::forward(0.5));

        assert!(changed(None, &a));
        assert!(!changed(Some(&a), &b));
        assert!(changed(Some(&b), &c));
    }

    #[test]
    fn test_format_record() {
        let mut r = record(7, MotorCommand::new(0.25, -0.25));
        r.output.actuators.push(ActuatorCommand::new(Actuator::Arm, true));
        assert_eq!(
            format_record(&r),
            "[0007] teleop     drive=(+0.25, -0.25) elevator=+0.00 arm=engaged"
        );
    }
}
