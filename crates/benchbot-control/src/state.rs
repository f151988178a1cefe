//! 机器人状态快照

use serde::{Deserialize, Serialize};

use crate::drive::DriveMode;

/// 机器人状态
///
/// 每个周期由 [`ControlCore`](crate::ControlCore) 更新一次，每个字段只由其所属组件写入：
///
/// | 字段 | 所属组件 |
/// |------|---------|
/// | `arm_engaged` / `claw_open` | 执行器状态机 |
/// | `drive_mode` | 底盘仲裁器 / 自动序列器 |
/// | `autonomous_step_index` | 自动序列器 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RobotState {
    /// 机械臂是否放下
    pub arm_engaged: bool,
    /// 爪子是否张开
    pub claw_open: bool,
    /// 当前驾驶模式
    pub drive_mode: DriveMode,
    /// 自动模式当前步骤
    pub autonomous_step_index: usize,
}

impl RobotState {
    /// 安全默认值：机械臂收回、爪子闭合、底盘空闲
    pub fn safe() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_defaults() {
        let state = RobotState::safe();
        assert!(!state.arm_engaged);
        assert!(!state.claw_open);
        assert_eq!(state.drive_mode, DriveMode::Idle);
        assert_eq!(state.autonomous_step_index, 0);
    }
}
