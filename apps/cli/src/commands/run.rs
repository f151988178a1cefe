//! 实时运行命令
//!
//! 以配置的频率驱动仿真机器人，Ctrl+C 时回到失能模式并停止

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use benchbot_driver::{LoopConfig, LoopStats, Robot, RobotIo, RobotMode, SimIo, run_robot};
use clap::Args;

use super::load_settings;

/// 实时运行参数
#[derive(Args, Debug)]
pub struct RunCommand {
    /// 运行模式（disabled / autonomous / teleop）
    #[arg(short, long, default_value = "autonomous")]
    pub mode: RobotMode,

    /// 运行周期数（覆盖配置中的 max_iterations）
    #[arg(short = 'n', long)]
    pub cycles: Option<usize>,

    /// 仿真气压读数
    #[arg(long, default_value_t = 100.0)]
    pub pressure: f64,
}

impl RunCommand {
    pub fn execute(&self, config: &Path) -> Result<()> {
        let settings = load_settings(config)?;
        let mut loop_config = settings.runner.clone();
        if self.cycles.is_some() {
            loop_config.max_iterations = self.cycles;
        }

        let stop = Arc::new(AtomicBool::new(false));
        let stop_handler = Arc::clone(&stop);
        ctrlc::set_handler(move || {
            stop_handler.store(true, Ordering::Release);
        })
        .context("设置 Ctrl+C 处理失败")?;

        let mut io = SimIo::new();
        io.set_pressure(self.pressure);
        let mut robot = Robot::new(settings.control, io)?;
        robot.request_mode(self.mode);

        println!(
            "▶ {} @ {} Hz{}",
            self.mode,
            loop_config.frequency_hz,
            match loop_config.max_iterations {
                Some(n) => format!(", {} cycles", n),
                None => " (Ctrl+C to stop)".to_string(),
            }
        );

        let (stats, last_drive) = run_then_disable(&mut robot, &loop_config, &stop)?;
        if stats.overruns > 0 {
            tracing::warn!("{} of {} cycles overran", stats.overruns, stats.iterations);
        }

        let compressor = robot.io().compressor_running();
        println!(
            "✅ {} cycles, {} overruns, last drive {}, compressor {}",
            stats.iterations,
            stats.overruns,
            last_drive,
            if compressor { "on" } else { "off" }
        );
        Ok(())
    }
}

/// 运行控制循环，无论成功与否都在返回前回到失能
///
/// 失能周期让全部输出归零、执行器回到安全位置。循环本身的错误优先返回。
fn run_then_disable<Io: RobotIo>(
    robot: &mut Robot<Io>,
    config: &LoopConfig,
    stop: &AtomicBool,
) -> Result<(LoopStats, benchbot_control::MotorCommand)> {
    let result = run_robot(robot, config, stop);
    let last_drive = robot.last_output().drive;

    robot.request_mode(RobotMode::Disabled);
    let disabled = robot.tick(std::time::Instant::now());

    let stats = match result {
        Ok(stats) => stats,
        Err(e) => {
            if let Err(disable_err) = &disabled {
                tracing::error!("failed to disable after loop error: {}", disable_err);
            }
            return Err(e).context("control loop failed");
        },
    };
    disabled.context("failed to disable robot")?;
    Ok((stats, last_drive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use benchbot_control::{Actuator, ControlConfig, MotorCommand};

    fn teleop_robot_with_engaged_arm() -> Robot<SimIo> {
        let mut robot = Robot::new(ControlConfig::default(), SimIo::new()).unwrap();
        robot.request_mode(RobotMode::Teleop);
        robot.io_mut().press(4);
        robot.io_mut().set_axis(4, -0.7);
        robot.tick(std::time::Instant::now()).unwrap();
        robot.io_mut().release(4);
        assert_eq!(robot.io().solenoids(Actuator::Arm), (true, false));
        robot
    }

    #[test]
    fn test_disables_after_normal_run() {
        let mut robot = teleop_robot_with_engaged_arm();
        let config = LoopConfig {
            frequency_hz: 1000.0,
            max_iterations: Some(3),
            ..LoopConfig::default()
        };

        let (stats, last_drive) =
            run_then_disable(&mut robot, &config, &AtomicBool::new(false)).unwrap();
        assert_eq!(stats.iterations, 3);
        assert_eq!(last_drive, MotorCommand::new(0.7, 0.0));
        assert_eq!(robot.mode(), RobotMode::Disabled);
        assert_eq!(robot.io().solenoids(Actuator::Arm), (false, true));
    }

    #[test]
    fn test_disables_when_loop_fails() {
        let mut robot = teleop_robot_with_engaged_arm();
        let config = LoopConfig {
            frequency_hz: 0.0,
            ..LoopConfig::default()
        };

        let err = run_then_disable(&mut robot, &config, &AtomicBool::new(false)).unwrap_err();
        assert!(err.to_string().contains("control loop failed"));
        assert_eq!(robot.mode(), RobotMode::Disabled);
        assert_eq!(robot.io().last_drive(), Some(MotorCommand::STOP));
        assert_eq!(robot.io().solenoids(Actuator::Arm), (false, true));
    }
}
