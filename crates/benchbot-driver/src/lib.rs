//! 驱动层模块
//!
//! 本模块把 `benchbot-control` 的纯决策核心接到真实（或仿真）的协作方上：
//! - 模式生命周期（失能/自动/手动）与模式边界复位
//! - `(模式, 事件) → 处理函数` 调度表
//! - 协作方接口（手柄、气压传感器、电机、电磁阀、压缩机）
//! - 固定周期驱动器
//! - 失能计时与控制包统计
//!
//! # 使用场景
//!
//! 实机部署时为硬件实现 [`RobotIo`] 的各个 trait；测试和命令行仿真使用 [`SimIo`]。

pub mod dispatch;
mod error;
pub mod io;
pub mod mode;
mod robot;
pub mod runner;
pub mod sim;
pub mod status;

pub use dispatch::{DispatchTable, Handler, ModeEvent};
pub use error::DriverError;
pub use io::{CompressorOutput, DriveOutput, InputSource, PressureSensor, RobotIo, SolenoidOutput};
pub use mode::{AtomicRobotMode, RobotMode};
pub use robot::Robot;
pub use runner::{LoopConfig, LoopStats, SleepStrategy, run_robot};
pub use sim::SimIo;
pub use status::{DisabledTimer, PacketCounter};
