//! 输入解释器
//!
//! 将一帧摇杆读数（两个轴 + 按下的按键集合）归类为唯一的驾驶意图。
//!
//! # 优先级
//!
//! 同一周期内只响应一个意图，固定优先级从高到低：
//!
//! ```text
//! 右转键 > 左转键 > 机械臂键 > 爪子键 > 升降机上升键 > 升降机下降键 > 摇杆坦克驾驶 > 空闲
//! ```
//!
//! 该顺序是兼容性约定，不由硬件决定，不能调整。

use serde::{Deserialize, Serialize};

use crate::config::{AxisMap, ButtonMap};

/// 支持的最大按键编号（按键编号从 1 开始）
pub const MAX_BUTTON_ID: u8 = 32;

/// 单个手柄的原始轴通道数
pub const MAX_AXES: usize = 6;

/// 按键编号（从 1 开始）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ButtonId(pub u8);

impl ButtonId {
    /// 编号是否在 1..=32 内
    pub const fn is_valid(self) -> bool {
        self.0 >= 1 && self.0 <= MAX_BUTTON_ID
    }

    const fn mask(self) -> u32 {
        1 << (self.0 - 1)
    }
}

impl std::fmt::Display for ButtonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "button {}", self.0)
    }
}

/// 按下的按键集合（位图实现，`Copy` 且无堆分配）
///
/// 序列化为按键编号列表，例如 `[2, 6]`。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<ButtonId>", into = "Vec<ButtonId>")]
pub struct ButtonSet(u32);

impl ButtonSet {
    /// 空集合
    pub const fn empty() -> Self {
        Self(0)
    }

    /// 加入一个按键
    ///
    /// 非法编号被忽略并返回 `false`。
    pub fn insert(&mut self, id: ButtonId) -> bool {
        if !id.is_valid() {
            return false;
        }
        self.0 |= id.mask();
        true
    }

    /// 移除一个按键
    pub fn remove(&mut self, id: ButtonId) {
        if id.is_valid() {
            self.0 &= !id.mask();
        }
    }

    /// 是否按下
    pub const fn contains(&self, id: ButtonId) -> bool {
        id.is_valid() && self.0 & id.mask() != 0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// 按编号升序遍历
    pub fn iter(&self) -> impl Iterator<Item = ButtonId> + '_ {
        (1..=MAX_BUTTON_ID)
            .map(ButtonId)
            .filter(|id| self.contains(*id))
    }
}

impl FromIterator<ButtonId> for ButtonSet {
    fn from_iter<I: IntoIterator<Item = ButtonId>>(iter: I) -> Self {
        let mut set = Self::empty();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

impl From<Vec<ButtonId>> for ButtonSet {
    fn from(ids: Vec<ButtonId>) -> Self {
        ids.into_iter().collect()
    }
}

impl From<ButtonSet> for Vec<ButtonId> {
    fn from(set: ButtonSet) -> Self {
        set.iter().collect()
    }
}

/// 手柄原始读数（由输入采集方提供）
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct JoystickReading {
    /// 轴读数，下标 0 对应 1 号轴
    pub axes: [f64; MAX_AXES],
    /// 当前按下的按键
    pub buttons: ButtonSet,
}

impl JoystickReading {
    /// 读取指定编号（从 1 开始）的轴；非法编号返回 0
    pub fn axis(&self, channel: u8) -> f64 {
        match usize::from(channel).checked_sub(1) {
            Some(index) if index < MAX_AXES => self.axes[index],
            _ => 0.0,
        }
    }
}

/// 单周期输入快照（只读）
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputSnapshot {
    /// 左摇杆轴，[-1, 1]
    pub left_axis: f64,
    /// 右摇杆轴，[-1, 1]
    pub right_axis: f64,
    /// 按下的按键
    pub buttons: ButtonSet,
}

impl InputSnapshot {
    /// 创建快照，轴读数被钳位到 [-1, 1]，NaN 视为 0
    pub fn new(left_axis: f64, right_axis: f64, buttons: ButtonSet) -> Self {
        Self {
            left_axis: sanitize_axis(left_axis),
            right_axis: sanitize_axis(right_axis),
            buttons,
        }
    }

    /// 无任何输入的快照
    pub const fn idle() -> Self {
        Self {
            left_axis: 0.0,
            right_axis: 0.0,
            buttons: ButtonSet::empty(),
        }
    }

    /// 按轴映射从原始读数构造快照
    pub fn from_reading(reading: &JoystickReading, axes: &AxisMap) -> Self {
        Self::new(
            reading.axis(axes.left),
            reading.axis(axes.right),
            reading.buttons,
        )
    }

    pub fn is_pressed(&self, id: ButtonId) -> bool {
        self.buttons.contains(id)
    }
}

fn sanitize_axis(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}

/// 驾驶意图
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// 原地右转
    TurnRight,
    /// 原地左转
    TurnLeft,
    /// 切换机械臂
    ToggleArm,
    /// 切换爪子
    ToggleClaw,
    /// 升降机上升
    RaiseElevator,
    /// 升降机下降
    LowerElevator,
    /// 坦克驾驶（已应用死区的轴读数）
    Tank { left: f64, right: f64 },
    /// 全停
    Idle,
}

/// 应用死区：幅值小于 `dead_zone` 时返回 0
#[inline]
pub fn apply_dead_zone(value: f64, dead_zone: f64) -> f64 {
    if value.abs() < dead_zone { 0.0 } else { value }
}

/// 将快照归类为唯一意图
///
/// 纯函数，无副作用。
pub fn interpret(snapshot: &InputSnapshot, buttons: &ButtonMap, dead_zone: f64) -> Intent {
    let precedence = [
        (buttons.turn_right, Intent::TurnRight),
        (buttons.turn_left, Intent::TurnLeft),
        (buttons.arm, Intent::ToggleArm),
        (buttons.claw, Intent::ToggleClaw),
        (buttons.elevator_raise, Intent::RaiseElevator),
        (buttons.elevator_lower, Intent::LowerElevator),
    ];

    if let Some(&(_, intent)) = precedence
        .iter()
        .find(|(id, _)| snapshot.is_pressed(*id))
    {
        return intent;
    }

    let left = apply_dead_zone(snapshot.left_axis, dead_zone);
    let right = apply_dead_zone(snapshot.right_axis, dead_zone);
    if left != 0.0 || right != 0.0 {
        Intent::Tank { left, right }
    } else {
        Intent::Idle
    }
}
