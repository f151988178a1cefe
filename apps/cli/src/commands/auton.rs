//! 自动模式预演命令
//!
//! 不接触任何协作方，直接推进控制核心，打印自动序列的各个阶段

use std::path::Path;

use anyhow::Result;
use benchbot_control::{ControlCore, DriveMode, MotorCommand};
use clap::Args;

use super::load_settings;

/// 自动模式预演参数
#[derive(Args, Debug)]
pub struct AutonCommand {
    /// 序列结束后额外显示的停止周期数
    #[arg(long, default_value_t = 0)]
    pub tail: u32,
}

/// 连续相同输出的一段
#[derive(Debug, Clone, Copy, PartialEq)]
struct Phase {
    start: u64,
    cycles: u64,
    mode: DriveMode,
    command: MotorCommand,
}

impl AutonCommand {
    pub fn execute(&self, config: &Path) -> Result<()> {
        let settings = load_settings(config)?;
        let period = settings.runner.period();

        println!("🤖 自动序列:");
        for (i, step) in settings.control.autonomous.iter().enumerate() {
            println!("  {}. {:?} x{}", i + 1, step.action, step.ticks);
        }

        let mut core = ControlCore::new(settings.control)?;
        let phases = run_phases(&mut core, self.tail);

        println!();
        println!("阶段:");
        for phase in &phases {
            println!(
                "  [{:>5}..{:>5}) {:<16} {}  {:.2}s",
                phase.start,
                phase.start + phase.cycles,
                format!("{:?}", phase.mode),
                phase.command,
                period.as_secs_f64() * phase.cycles as f64
            );
        }

        let total: u64 = phases.iter().map(|p| p.cycles).sum();
        println!();
        println!(
            "✅ {} cycles ({:.2}s at {} Hz)",
            total,
            period.as_secs_f64() * total as f64,
            settings.runner.frequency_hz
        );
        Ok(())
    }
}

/// 推进控制核心直到序列结束，把连续相同的输出合并为阶段
fn run_phases(core: &mut ControlCore, tail: u32) -> Vec<Phase> {
    let mut phases: Vec<Phase> = Vec::new();
    let mut cycle: u64 = 0;
    let mut remaining_tail = tail;

    loop {
        if core.sequencer().is_finished() {
            if remaining_tail == 0 {
                break;
            }
            remaining_tail -= 1;
        }

        let output = core.autonomous_cycle();
        let mode = core.state().drive_mode;
        match phases.last_mut() {
            Some(last) if last.command == output.drive && last.mode == mode => last.cycles += 1,
            _ => phases.push(Phase {
                start: cycle,
                cycles: 1,
                mode,
                command: output.drive,
            }),
        }
        cycle += 1;
    }

    phases
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchbot_control::ControlConfig;

    #[test]
    fn test_default_sequence_phases() {
        let mut core = ControlCore::new(ControlConfig::default()).unwrap();
        let phases = run_phases(&mut core, 0);

        let summary: Vec<(MotorCommand, u64)> =
            phases.iter().map(|p| (p.command, p.cycles)).collect();
        assert_eq!(
            summary,
            vec![
                (MotorCommand::forward(0.5), 100),
                (MotorCommand::STOP, 1),
                (MotorCommand::forward(0.5), 100),
                (MotorCommand::STOP, 1),
            ]
        );
        assert_eq!(phases[2].start, 101);
    }

    #[test]
    fn test_tail_extends_final_stop() {
        let mut core = ControlCore::new(ControlConfig::default()).unwrap();
        let phases = run_phases(&mut core, 9);
        assert_eq!(phases.last().map(|p| p.cycles), Some(10));
    }

    #[test]
    fn test_empty_sequence() {
        let config = ControlConfig {
            autonomous: Vec::new(),
            ..ControlConfig::default()
        };
        let mut core = ControlCore::new(config).unwrap();
        assert!(run_phases(&mut core, 0).is_empty());
    }
}
