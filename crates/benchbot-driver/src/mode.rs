//! 机器人运行模式
//!
//! 定义比赛/测试台的三种运行模式，以及供其他线程（场地控制、Ctrl+C 处理等）
//! 发布目标模式的原子版本。

use std::sync::atomic::{AtomicU8, Ordering};

use serde::{Deserialize, Serialize};

/// 机器人运行模式
///
/// # 模式说明
///
/// - **Disabled**: 失能（默认），所有电机归零，每秒报告一次失能时长
/// - **Autonomous**: 自动模式，执行固定步骤序列，不响应操作员输入
/// - **Teleop**: 手动模式，由手柄驱动
///
/// # 模式切换
///
/// 任何切换都会复位执行器、电机归零，并清除按键边沿记忆。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum RobotMode {
    /// 失能模式（默认）
    #[default]
    Disabled = 0,

    /// 自动模式
    Autonomous = 1,

    /// 手动模式
    Teleop = 2,
}

impl RobotMode {
    /// 所有模式，按 `as_u8()` 顺序
    pub const ALL: [RobotMode; 3] = [RobotMode::Disabled, RobotMode::Autonomous, RobotMode::Teleop];

    /// 从 u8 转换
    ///
    /// 如果值无效，返回 Disabled 模式。
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Autonomous,
            2 => Self::Teleop,
            _ => Self::Disabled, // 无效值按失能处理
        }
    }

    /// 转换为 u8
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn is_enabled(self) -> bool {
        self != Self::Disabled
    }
}

impl std::fmt::Display for RobotMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RobotMode::Disabled => f.write_str("disabled"),
            RobotMode::Autonomous => f.write_str("autonomous"),
            RobotMode::Teleop => f.write_str("teleop"),
        }
    }
}

impl std::str::FromStr for RobotMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "disabled" => Ok(Self::Disabled),
            "autonomous" | "auto" => Ok(Self::Autonomous),
            "teleop" => Ok(Self::Teleop),
            other => Err(format!("unknown robot mode: {}", other)),
        }
    }
}

/// 目标模式（原子版本，用于线程间共享）
///
/// # 使用场景
///
/// - 周期驱动器每个周期读取一次目标模式，在自己的线程上完成切换
/// - 其他线程通过 `set()` 发布目标模式
///
/// # 示例
///
/// ```rust
/// use benchbot_driver::mode::{AtomicRobotMode, RobotMode};
/// use std::sync::atomic::Ordering;
///
/// let mode = AtomicRobotMode::new(RobotMode::Disabled);
/// mode.set(RobotMode::Teleop, Ordering::Release);
/// assert_eq!(mode.get(Ordering::Acquire), RobotMode::Teleop);
/// ```
#[derive(Debug)]
pub struct AtomicRobotMode {
    inner: AtomicU8,
}

impl AtomicRobotMode {
    pub fn new(mode: RobotMode) -> Self {
        Self {
            inner: AtomicU8::new(mode.as_u8()),
        }
    }

    /// 获取当前模式
    pub fn get(&self, ordering: Ordering) -> RobotMode {
        RobotMode::from_u8(self.inner.load(ordering))
    }

    /// 设置模式
    pub fn set(&self, mode: RobotMode, ordering: Ordering) {
        self.inner.store(mode.as_u8(), ordering);
    }
}

impl Default for AtomicRobotMode {
    fn default() -> Self {
        Self::new(RobotMode::Disabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_robot_mode_conversions() {
        for mode in RobotMode::ALL {
            assert_eq!(RobotMode::from_u8(mode.as_u8()), mode);
        }
        assert_eq!(RobotMode::from_u8(255), RobotMode::Disabled); // 无效值
        assert!(!RobotMode::Disabled.is_enabled());
        assert!(RobotMode::Teleop.is_enabled());
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("teleop".parse::<RobotMode>(), Ok(RobotMode::Teleop));
        assert_eq!("AUTO".parse::<RobotMode>(), Ok(RobotMode::Autonomous));
        assert!("test".parse::<RobotMode>().is_err());
        assert_eq!(RobotMode::Autonomous.to_string(), "autonomous");
    }

    #[test]
    fn test_atomic_robot_mode() {
        let mode = AtomicRobotMode::default();
        assert_eq!(mode.get(Ordering::Relaxed), RobotMode::Disabled);

        mode.set(RobotMode::Autonomous, Ordering::Relaxed);
        assert_eq!(mode.get(Ordering::Relaxed), RobotMode::Autonomous);
    }
}
