//! 状态计时
//!
//! - [`DisabledTimer`]: 失能期间每满一秒报告一次失能时长
//! - [`PacketCounter`]: 统计每秒收到的控制包（带有新鲜手柄读数的周期）
//!
//! 两者都由模式生命周期持有，在模式进入时显式复位；时间由调用方传入，便于测试。

use std::time::{Duration, Instant};

const SECOND: Duration = Duration::from_secs(1);

/// 失能时长计时器
#[derive(Debug, Clone, Copy)]
pub struct DisabledTimer {
    start: Instant,
    next_report: u64,
}

impl DisabledTimer {
    pub fn new(now: Instant) -> Self {
        Self {
            start: now,
            next_report: 1,
        }
    }

    /// 进入失能模式时复位
    pub fn reset(&mut self, now: Instant) {
        *self = Self::new(now);
    }

    /// 若又满一秒，返回已失能的整秒数
    pub fn poll(&mut self, now: Instant) -> Option<u64> {
        let elapsed = now.saturating_duration_since(self.start).as_secs();
        if elapsed < self.next_report {
            return None;
        }
        self.next_report = elapsed + 1;
        Some(elapsed)
    }
}

/// 控制包计数器
#[derive(Debug, Clone, Copy)]
pub struct PacketCounter {
    window_start: Instant,
    in_window: u32,
    last_second: Option<u32>,
    total: u64,
}

impl PacketCounter {
    pub fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            in_window: 0,
            last_second: None,
            total: 0,
        }
    }

    /// 进入手动模式时复位
    pub fn reset(&mut self, now: Instant) {
        *self = Self::new(now);
    }

    /// 记录一个控制包
    pub fn record(&mut self, now: Instant) {
        if now.saturating_duration_since(self.window_start) >= SECOND {
            self.last_second = Some(self.in_window);
            self.in_window = 0;
            self.window_start = now;
        }
        self.in_window += 1;
        self.total += 1;
    }

    /// 当前统计窗口内的包数
    pub fn current_second(&self) -> u32 {
        self.in_window
    }

    /// 上一个完整窗口的包数
    pub fn last_second(&self) -> Option<u32> {
        self.last_second
    }

    pub fn total(&self) -> u64 {
        self.total
    }
}
