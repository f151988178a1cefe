//! 机器人生命周期
//!
//! [`Robot`] 持有控制核心、协作方和模式状态。外部周期驱动器每个周期调用一次
//! [`Robot::tick`]，每次调用都在有限步内返回：
//!
//! 1. 采样目标模式；与当前模式不同则复位并执行新模式的 `Init` 处理函数
//! 2. 执行当前模式的 `Periodic` 处理函数
//! 3. 读取气压并进行压缩机调节（与模式无关）
//!
//! 写入失败的执行器命令和压缩机请求会保留下来，在之后的周期重试，
//! 硬件最终总会收到核心状态对应的命令。
//!
//! # 示例
//!
//! ```rust
//! use benchbot_control::ControlConfig;
//! use benchbot_driver::{Robot, RobotMode, SimIo};
//! use std::time::Instant;
//!
//! let mut robot = Robot::new(ControlConfig::default(), SimIo::new()).unwrap();
//! robot.request_mode(RobotMode::Teleop);
//! robot.tick(Instant::now()).unwrap();
//! assert_eq!(robot.mode(), RobotMode::Teleop);
//! ```

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Instant;

use benchbot_control::{
    ActuatorCommands, CompressorRequest, ControlConfig, ControlCore, CycleOutput, InputSnapshot,
};

use crate::dispatch::{DispatchTable, ModeEvent};
use crate::error::DriverError;
use crate::io::RobotIo;
use crate::mode::{AtomicRobotMode, RobotMode};
use crate::status::{DisabledTimer, PacketCounter};

/// 机器人
pub struct Robot<Io: RobotIo> {
    core: ControlCore,
    io: Io,
    mode: RobotMode,
    /// 模式是否已经执行过 Init
    entered: bool,
    requested: Arc<AtomicRobotMode>,
    dispatch: DispatchTable<Io>,
    disabled_timer: DisabledTimer,
    packets: PacketCounter,
    last_output: CycleOutput,
    /// 尚未成功写出的执行器命令（每个执行器至多一条）
    pending_actuators: ActuatorCommands,
    /// 尚未成功写出的压缩机请求
    pending_compressor: Option<CompressorRequest>,
    cycles: u64,
}

impl<Io: RobotIo> Robot<Io> {
    /// 创建机器人（初始为失能模式）
    ///
    /// # 错误
    ///
    /// - `DriverError::Config`: 控制参数非法
    pub fn new(config: ControlConfig, io: Io) -> Result<Self, DriverError> {
        let core = ControlCore::new(config)?;
        let now = Instant::now();
        tracing::info!("robot init completed");

        Ok(Self {
            core,
            io,
            mode: RobotMode::Disabled,
            entered: false,
            requested: Arc::new(AtomicRobotMode::default()),
            dispatch: DispatchTable::default(),
            disabled_timer: DisabledTimer::new(now),
            packets: PacketCounter::new(now),
            last_output: CycleOutput::stopped(),
            pending_actuators: ActuatorCommands::new(),
            pending_compressor: None,
            cycles: 0,
        })
    }

    /// 当前生效的模式
    pub fn mode(&self) -> RobotMode {
        self.mode
    }

    /// 发布目标模式（下一个周期生效）
    pub fn request_mode(&self, mode: RobotMode) {
        self.requested.set(mode, Ordering::Release);
    }

    /// 目标模式句柄，可交给其他线程
    pub fn mode_handle(&self) -> Arc<AtomicRobotMode> {
        Arc::clone(&self.requested)
    }

    pub fn core(&self) -> &ControlCore {
        &self.core
    }

    pub fn io(&self) -> &Io {
        &self.io
    }

    pub fn io_mut(&mut self) -> &mut Io {
        &mut self.io
    }

    pub fn into_io(self) -> Io {
        self.io
    }

    /// 上一周期的输出
    ///
    /// `drive` / `elevator` 是最近一次写出的值；`actuators` / `compressor` 只包含
    /// 本周期实际写出的命令（含模式边界复位命令）。
    pub fn last_output(&self) -> &CycleOutput {
        &self.last_output
    }

    pub fn packets(&self) -> &PacketCounter {
        &self.packets
    }

    /// 已执行的周期数
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn dispatch_mut(&mut self) -> &mut DispatchTable<Io> {
        &mut self.dispatch
    }

    /// 执行一个控制周期
    ///
    /// # 错误
    ///
    /// 只有输出写入失败会返回错误；输入和传感器读取失败按安全策略降级处理。
    pub fn tick(&mut self, now: Instant) -> Result<(), DriverError> {
        self.last_output.actuators.clear();
        self.last_output.compressor = None;

        let requested = self.requested.get(Ordering::Acquire);
        if requested != self.mode || !self.entered {
            self.enter(requested, now)?;
        }

        let periodic = self.dispatch.get(self.mode, ModeEvent::Periodic);
        periodic(self, now)?;

        self.regulate_pressure()?;
        self.cycles += 1;
        Ok(())
    }

    /// 模式切换：复位核心、输出归零、执行 Init
    ///
    /// 写出失败时模式保持不变，下个周期重新进入；复位命令留在待写队列中。
    fn enter(&mut self, mode: RobotMode, now: Instant) -> Result<(), DriverError> {
        if self.entered {
            tracing::info!(from = %self.mode, to = %mode, "mode transition");
        }

        let reset = self.core.reset();
        self.apply(reset)?;

        self.mode = mode;
        self.entered = true;
        let init = self.dispatch.get(mode, ModeEvent::Init);
        init(self, now)
    }

    /// 把一个周期的输出写到协作方
    ///
    /// 执行器命令先进入待写队列（同一执行器的新命令覆盖旧命令），再按顺序写出；
    /// 写出失败的命令留在队列中，下次调用时重试。压缩机请求由 [`tick`](Self::tick) 统一调节，
    /// 这里忽略 `output.compressor`。
    pub fn apply(&mut self, output: CycleOutput) -> Result<(), DriverError> {
        for cmd in output.actuators {
            self.pending_actuators
                .retain(|pending| pending.actuator() != cmd.actuator());
            self.pending_actuators.push(cmd);
        }
        while let Some(&cmd) = self.pending_actuators.first() {
            self.io.apply(cmd)?;
            self.pending_actuators.remove(0);
            self.last_output.actuators.push(cmd);
        }

        self.io.set_drive(output.drive)?;
        self.last_output.drive = output.drive;
        self.io.set_elevator(output.elevator)?;
        self.last_output.elevator = output.elevator;
        Ok(())
    }

    fn regulate_pressure(&mut self) -> Result<(), DriverError> {
        match self.io.pressure() {
            Ok(pressure) => {
                if let Some(request) = self.core.regulate(pressure) {
                    self.pending_compressor = Some(request);
                }
            },
            Err(e) => {
                tracing::warn!("pressure read failed, skipping regulation: {}", e);
            },
        }

        if let Some(request) = self.pending_compressor {
            self.io.set_compressor(request)?;
            self.pending_compressor = None;
            self.last_output.compressor = Some(request);
        }
        Ok(())
    }

    /// 读取手柄；失败时返回 `None`
    fn read_snapshot(&mut self) -> Option<InputSnapshot> {
        match self.io.read_joystick() {
            Ok(reading) => Some(InputSnapshot::from_reading(
                &reading,
                &self.core.config().axes,
            )),
            Err(e) => {
                tracing::warn!("joystick read failed, stopping motors: {}", e);
                None
            },
        }
    }
}

impl<Io: RobotIo + std::fmt::Debug> std::fmt::Debug for Robot<Io> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Robot")
            .field("mode", &self.mode)
            .field("state", self.core.state())
            .field("cycles", &self.cycles)
            .field("io", &self.io)
            .finish_non_exhaustive()
    }
}

/// 默认处理函数（由 [`DispatchTable::default`] 引用）
pub(crate) mod handlers {
    use super::*;

    pub fn disabled_init<Io: RobotIo>(
        robot: &mut Robot<Io>,
        now: Instant,
    ) -> Result<(), DriverError> {
        robot.disabled_timer.reset(now);
        tracing::info!("disabled");
        Ok(())
    }

    pub fn disabled_periodic<Io: RobotIo>(
        robot: &mut Robot<Io>,
        now: Instant,
    ) -> Result<(), DriverError> {
        if let Some(secs) = robot.disabled_timer.poll(now) {
            tracing::info!("Disabled seconds: {}", secs);
        }
        robot.apply(CycleOutput::stopped())
    }

    pub fn autonomous_init<Io: RobotIo>(
        robot: &mut Robot<Io>,
        _now: Instant,
    ) -> Result<(), DriverError> {
        tracing::info!(
            steps = robot.core.sequencer().steps().len(),
            "autonomous sequence started"
        );
        Ok(())
    }

    pub fn autonomous_periodic<Io: RobotIo>(
        robot: &mut Robot<Io>,
        _now: Instant,
    ) -> Result<(), DriverError> {
        let output = robot.core.autonomous_cycle();
        robot.apply(output)
    }

    pub fn teleop_init<Io: RobotIo>(
        robot: &mut Robot<Io>,
        now: Instant,
    ) -> Result<(), DriverError> {
        robot.packets.reset(now);
        tracing::info!("teleop enabled");
        Ok(())
    }

    pub fn teleop_periodic<Io: RobotIo>(
        robot: &mut Robot<Io>,
        now: Instant,
    ) -> Result<(), DriverError> {
        // 读取失败只让电机停转，执行器状态和按键边沿记忆都不推进
        let Some(snapshot) = robot.read_snapshot() else {
            return robot.apply(CycleOutput::stopped());
        };
        robot.packets.record(now);
        let output = robot.core.teleop_cycle(&snapshot);
        robot.apply(output)
    }
}
