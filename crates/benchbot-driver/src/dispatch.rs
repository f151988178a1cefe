//! 模式调度表
//!
//! 用显式的 `(模式, 事件) → 处理函数` 表代替"从模式调度基类继承"的做法，
//! 控制核心因此与具体的调度框架解耦。
//!
//! ```text
//!               Init                 Periodic
//! Disabled      disabled_init        disabled_periodic
//! Autonomous    autonomous_init      autonomous_periodic
//! Teleop        teleop_init          teleop_periodic
//! ```

use std::time::Instant;

use crate::error::DriverError;
use crate::io::RobotIo;
use crate::mode::RobotMode;
use crate::robot::{Robot, handlers};

/// 模式事件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeEvent {
    /// 进入模式（每次切换一次）
    Init,
    /// 周期调用（每个周期一次）
    Periodic,
}

impl ModeEvent {
    const fn index(self) -> usize {
        match self {
            ModeEvent::Init => 0,
            ModeEvent::Periodic => 1,
        }
    }
}

/// 处理函数
pub type Handler<Io> = fn(&mut Robot<Io>, Instant) -> Result<(), DriverError>;

/// 调度表
pub struct DispatchTable<Io: RobotIo> {
    handlers: [[Handler<Io>; 2]; 3],
}

impl<Io: RobotIo> DispatchTable<Io> {
    /// 查表
    pub fn get(&self, mode: RobotMode, event: ModeEvent) -> Handler<Io> {
        self.handlers[usize::from(mode.as_u8())][event.index()]
    }

    /// 替换某个处理函数
    pub fn set(&mut self, mode: RobotMode, event: ModeEvent, handler: Handler<Io>) {
        self.handlers[usize::from(mode.as_u8())][event.index()] = handler;
    }
}

impl<Io: RobotIo> Default for DispatchTable<Io> {
    fn default() -> Self {
        // 行顺序与 RobotMode 的 u8 取值一致
        Self {
            handlers: [
                [handlers::disabled_init, handlers::disabled_periodic],
                [handlers::autonomous_init, handlers::autonomous_periodic],
                [handlers::teleop_init, handlers::teleop_periodic],
            ],
        }
    }
}

impl<Io: RobotIo> Clone for DispatchTable<Io> {
    fn clone(&self) -> Self {
        Self {
            handlers: self.handlers,
        }
    }
}

impl<Io: RobotIo> std::fmt::Debug for DispatchTable<Io> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchTable").finish_non_exhaustive()
    }
}
