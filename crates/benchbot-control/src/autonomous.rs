//! 自动模式序列器
//!
//! 按顺序执行固定的 `(动作, 持续周期数)` 步骤列表，不响应操作员输入。
//!
//! # 时序
//!
//! - 每个步骤输出其电机命令 `ticks` 个周期
//! - 随后输出一个周期的全停 `(0, 0)`，再进入下一步
//! - `ticks == 0` 的步骤直接跳过，不占用周期，也不产生停止周期
//! - 所有步骤完成后进入终止状态，之后每个周期都输出全停
//!
//! 默认序列 `Forward(100), TurnRight(0), TurnLeft(0), Forward(100)` 因此产生
//! 两段各 100 个周期的半速直行。

use serde::{Deserialize, Serialize};

use crate::config::DriveConfig;
use crate::drive::{DriveMode, MotorCommand};

/// 自动模式动作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutonomousAction {
    Forward,
    TurnLeft,
    TurnRight,
}

impl AutonomousAction {
    /// 复用底盘仲裁器的电机原语
    pub fn command(self, config: &DriveConfig) -> MotorCommand {
        match self {
            AutonomousAction::Forward => MotorCommand::forward(config.autonomous_speed),
            AutonomousAction::TurnLeft => MotorCommand::point_turn_left(config.turn_speed),
            AutonomousAction::TurnRight => MotorCommand::point_turn_right(config.turn_speed),
        }
    }

    pub fn drive_mode(self) -> DriveMode {
        match self {
            AutonomousAction::Forward => DriveMode::Tank,
            AutonomousAction::TurnLeft => DriveMode::PointTurnLeft,
            AutonomousAction::TurnRight => DriveMode::PointTurnRight,
        }
    }
}

/// 自动模式步骤
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutonomousStep {
    pub action: AutonomousAction,
    /// 持续周期数
    pub ticks: u32,
}

impl AutonomousStep {
    pub const fn new(action: AutonomousAction, ticks: u32) -> Self {
        Self { action, ticks }
    }
}

/// 默认自动序列（机器人外部可观察行为，保持不变）
pub const DEFAULT_SEQUENCE: [AutonomousStep; 4] = [
    AutonomousStep::new(AutonomousAction::Forward, 100),
    AutonomousStep::new(AutonomousAction::TurnRight, 0),
    AutonomousStep::new(AutonomousAction::TurnLeft, 0),
    AutonomousStep::new(AutonomousAction::Forward, 100),
];

pub fn default_sequence() -> Vec<AutonomousStep> {
    DEFAULT_SEQUENCE.to_vec()
}

/// 单周期输出
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequencerOutput {
    pub mode: DriveMode,
    pub command: MotorCommand,
}

impl SequencerOutput {
    const STOP: Self = Self {
        mode: DriveMode::Idle,
        command: MotorCommand::STOP,
    };
}

/// 自动模式序列器
#[derive(Debug, Clone)]
pub struct AutonomousSequencer {
    steps: Vec<AutonomousStep>,
    index: usize,
    elapsed: u32,
}

impl AutonomousSequencer {
    pub fn new(steps: Vec<AutonomousStep>) -> Self {
        Self {
            steps,
            index: 0,
            elapsed: 0,
        }
    }

    /// 回到第一步（每次进入自动模式时调用）
    pub fn restart(&mut self) {
        self.index = 0;
        self.elapsed = 0;
    }

    /// 当前步骤下标
    pub fn step_index(&self) -> usize {
        self.index
    }

    pub fn steps(&self) -> &[AutonomousStep] {
        &self.steps
    }

    pub fn is_finished(&self) -> bool {
        self.index >= self.steps.len()
    }

    /// 推进一个周期
    ///
    /// 循环只用于跳过零时长步骤，迭代次数不超过步骤数。
    pub fn tick(&mut self, config: &DriveConfig) -> SequencerOutput {
        while let Some(&step) = self.steps.get(self.index) {
            if self.elapsed < step.ticks {
                self.elapsed += 1;
                return SequencerOutput {
                    mode: step.action.drive_mode(),
                    command: step.action.command(config),
                };
            }

            let skipped = step.ticks == 0;
            self.index += 1;
            self.elapsed = 0;
            tracing::debug!(step = self.index, skipped, "autonomous step complete");

            if !skipped {
                return SequencerOutput::STOP;
            }
        }

        SequencerOutput::STOP
    }
}
