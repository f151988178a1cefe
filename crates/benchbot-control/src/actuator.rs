//! 气动执行器状态机
//!
//! 机械臂（Engaged / Disengaged）和爪子（Open / Closed）各是一个独立的二态状态机，
//! 由各自的切换按键驱动。另外包含升降机的电平式速度输出。
//!
//! # 触发方式
//!
//! - [`TriggerMode::Edge`]（默认）：仅在按键上升沿切换，按住不放不会重复触发
//! - [`TriggerMode::Level`]：按住期间每个周期都切换（兼容旧程序行为，会以控制频率抖动）
//!
//! # 原子性
//!
//! 每个执行器由一对互补电磁阀控制。[`ActuatorCommand`] 只能通过目标状态构造，
//! 一条命令同时携带两个阀的值，因此不存在"两个都通电"或"两个都断电"的中间状态。

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::config::{ButtonMap, ElevatorConfig};
use crate::input::{ButtonId, InputSnapshot, Intent};

/// 气动执行器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Actuator {
    /// 机械臂
    Arm,
    /// 爪子
    Claw,
}

impl std::fmt::Display for Actuator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Actuator::Arm => f.write_str("arm"),
            Actuator::Claw => f.write_str("claw"),
        }
    }
}

/// 切换按键的触发方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerMode {
    /// 上升沿触发
    #[default]
    Edge,
    /// 电平触发（按住期间每周期切换）
    Level,
}

/// 执行器命令
///
/// 字段私有，只能经由 [`ActuatorCommand::new`] 构造，保证两个阀始终互补。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActuatorCommand {
    actuator: Actuator,
    extend: bool,
    retract: bool,
}

impl ActuatorCommand {
    /// 按目标状态构造命令
    ///
    /// - `engaged = true`: 伸出阀通电、收回阀断电
    /// - `engaged = false`: 反之
    pub const fn new(actuator: Actuator, engaged: bool) -> Self {
        Self {
            actuator,
            extend: engaged,
            retract: !engaged,
        }
    }

    pub const fn actuator(&self) -> Actuator {
        self.actuator
    }

    /// 目标状态（机械臂 Engaged / 爪子 Open）
    pub const fn engaged(&self) -> bool {
        self.extend
    }

    /// 互补电磁阀对 `(extend, retract)`
    pub const fn solenoids(&self) -> (bool, bool) {
        (self.extend, self.retract)
    }
}

/// 单个执行器的二态状态机
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleMachine {
    actuator: Actuator,
    engaged: bool,
    /// 上一周期按键是否按下（用于上升沿检测）
    was_pressed: bool,
}

impl ToggleMachine {
    /// 创建状态机，初始为 Disengaged / Closed
    pub const fn new(actuator: Actuator) -> Self {
        Self {
            actuator,
            engaged: false,
            was_pressed: false,
        }
    }

    pub const fn engaged(&self) -> bool {
        self.engaged
    }

    /// 推进一个周期
    ///
    /// # 参数
    ///
    /// - `pressed`: 本周期该按键的物理状态
    /// - `selected`: 本周期意图是否为切换该执行器
    /// - `trigger`: 触发方式
    ///
    /// # 返回
    ///
    /// 状态发生切换时返回新的命令，否则返回 `None`。
    pub fn update(
        &mut self,
        pressed: bool,
        selected: bool,
        trigger: TriggerMode,
    ) -> Option<ActuatorCommand> {
        let fire = selected
            && match trigger {
                TriggerMode::Edge => !self.was_pressed,
                TriggerMode::Level => true,
            };
        self.was_pressed = pressed;

        if !fire {
            return None;
        }

        self.engaged = !self.engaged;
        tracing::debug!(actuator = %self.actuator, engaged = self.engaged, "actuator toggled");
        Some(ActuatorCommand::new(self.actuator, self.engaged))
    }

    /// 回到安全默认状态
    ///
    /// 状态确实发生变化时返回对应命令，同时清除按键边沿记忆。
    pub fn reset(&mut self) -> Option<ActuatorCommand> {
        self.was_pressed = false;
        if !self.engaged {
            return None;
        }
        self.engaged = false;
        Some(ActuatorCommand::new(self.actuator, false))
    }
}

/// 每周期最多两条执行器命令（机械臂 + 爪子），内联存储
pub type ActuatorCommands = SmallVec<[ActuatorCommand; 2]>;

/// 机械臂 + 爪子状态机
#[derive(Debug, Clone)]
pub struct ActuatorStateMachine {
    arm: ToggleMachine,
    claw: ToggleMachine,
    trigger: TriggerMode,
}

impl ActuatorStateMachine {
    pub fn new(trigger: TriggerMode) -> Self {
        Self {
            arm: ToggleMachine::new(Actuator::Arm),
            claw: ToggleMachine::new(Actuator::Claw),
            trigger,
        }
    }

    pub fn arm_engaged(&self) -> bool {
        self.arm.engaged()
    }

    pub fn claw_open(&self) -> bool {
        self.claw.engaged()
    }

    pub fn trigger(&self) -> TriggerMode {
        self.trigger
    }

    /// 推进一个周期，返回本周期发生的切换命令
    ///
    /// 边沿记忆基于按键的物理状态，而不是意图：被更高优先级按键遮蔽期间一直按住的
    /// 切换键，在遮蔽解除后不会被当作新的上升沿。
    pub fn update(
        &mut self,
        intent: &Intent,
        snapshot: &InputSnapshot,
        buttons: &ButtonMap,
    ) -> ActuatorCommands {
        let mut commands = ActuatorCommands::new();
        let pressed = |id: ButtonId| snapshot.is_pressed(id);

        if let Some(cmd) = self.arm.update(
            pressed(buttons.arm),
            *intent == Intent::ToggleArm,
            self.trigger,
        ) {
            commands.push(cmd);
        }
        if let Some(cmd) = self.claw.update(
            pressed(buttons.claw),
            *intent == Intent::ToggleClaw,
            self.trigger,
        ) {
            commands.push(cmd);
        }

        commands
    }

    /// 模式切换时回到安全默认（机械臂收回、爪子闭合）
    pub fn reset(&mut self) -> ActuatorCommands {
        self.arm.reset().into_iter().chain(self.claw.reset()).collect()
    }
}

/// 升降机速度（电平式）：按住上升/下降键时输出恒定速度，否则为 0
pub fn elevator_speed(intent: &Intent, config: &ElevatorConfig) -> f64 {
    match intent {
        Intent::RaiseElevator => config.speed,
        Intent::LowerElevator => -config.speed,
        _ => 0.0,
    }
}
