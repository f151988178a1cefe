//! 控制参数配置
//!
//! 所有"魔数"（死区、转向速度、压缩机阈值等）都集中在这里，作为具名常量给出默认值，
//! 并可通过配置文件覆盖。结构体均实现 `serde` 序列化，配合 `#[serde(default)]`
//! 允许配置文件只写出需要修改的字段。

use serde::{Deserialize, Serialize};

use crate::actuator::TriggerMode;
use crate::autonomous::{AutonomousStep, default_sequence};
use crate::error::ConfigError;
use crate::input::{ButtonId, MAX_AXES, MAX_BUTTON_ID};

/// 摇杆死区：幅值小于此值的轴读数视为 0
pub const DEFAULT_DEAD_ZONE: f64 = 0.05;

/// 原地转向速度
pub const DEFAULT_TURN_SPEED: f64 = 0.25;

/// 自动模式直行速度（半速）
pub const DEFAULT_AUTONOMOUS_SPEED: f64 = 0.5;

/// 升降机恒定速度
pub const DEFAULT_ELEVATOR_SPEED: f64 = 0.1;

/// 压缩机启动阈值：气压低于此值时开始充气
pub const DEFAULT_COMPRESSOR_ON_BELOW: f64 = 60.0;

/// 压缩机关断阈值：充气阶段气压达到此值时停止
pub const DEFAULT_COMPRESSOR_OFF_AT: f64 = 110.0;

/// 底盘参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    /// 摇杆死区
    pub dead_zone: f64,
    /// 原地转向速度
    pub turn_speed: f64,
    /// 自动模式直行速度
    pub autonomous_speed: f64,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            dead_zone: DEFAULT_DEAD_ZONE,
            turn_speed: DEFAULT_TURN_SPEED,
            autonomous_speed: DEFAULT_AUTONOMOUS_SPEED,
        }
    }
}

/// 按键映射
///
/// 默认值对应 benchtop 机器人手柄：右肩键右转、左肩键左转、Y 键机械臂、A 键爪子。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonMap {
    pub turn_right: ButtonId,
    pub turn_left: ButtonId,
    pub arm: ButtonId,
    pub claw: ButtonId,
    pub elevator_raise: ButtonId,
    pub elevator_lower: ButtonId,
}

impl Default for ButtonMap {
    fn default() -> Self {
        Self {
            turn_right: ButtonId(6),
            turn_left: ButtonId(5),
            arm: ButtonId(4),
            claw: ButtonId(2),
            elevator_raise: ButtonId(8),
            elevator_lower: ButtonId(7),
        }
    }
}

impl ButtonMap {
    /// 按名称列出所有绑定（顺序即意图优先级，从高到低）
    pub fn bindings(&self) -> [(&'static str, ButtonId); 6] {
        [
            ("turn_right", self.turn_right),
            ("turn_left", self.turn_left),
            ("arm", self.arm),
            ("claw", self.claw),
            ("elevator_raise", self.elevator_raise),
            ("elevator_lower", self.elevator_lower),
        ]
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let bindings = self.bindings();
        for (i, &(name, id)) in bindings.iter().enumerate() {
            if !id.is_valid() {
                return Err(ConfigError::ButtonOutOfRange {
                    name,
                    id: id.0,
                    max: MAX_BUTTON_ID,
                });
            }
            if let Some(&(other, _)) = bindings[..i].iter().find(|&&(_, bound)| bound == id) {
                return Err(ConfigError::DuplicateButton {
                    id: id.0,
                    first: other,
                    second: name,
                });
            }
        }
        Ok(())
    }
}

/// 摇杆轴映射（原始轴通道编号，从 1 开始）
///
/// 默认接线：左侧电机跟随 4 号轴，右侧电机跟随 2 号轴。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisMap {
    pub left: u8,
    pub right: u8,
}

impl Default for AxisMap {
    fn default() -> Self {
        Self { left: 4, right: 2 }
    }
}

/// 升降机参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevatorConfig {
    /// 按住升/降键时的恒定速度
    pub speed: f64,
}

impl Default for ElevatorConfig {
    fn default() -> Self {
        Self {
            speed: DEFAULT_ELEVATOR_SPEED,
        }
    }
}

/// 压缩机滞回参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressorConfig {
    /// 启动阈值（传感器原始单位）
    pub on_below: f64,
    /// 关断阈值（传感器原始单位）
    pub off_at: f64,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            on_below: DEFAULT_COMPRESSOR_ON_BELOW,
            off_at: DEFAULT_COMPRESSOR_OFF_AT,
        }
    }
}

/// 控制核心完整配置
///
/// # 示例
///
/// ```rust
/// use benchbot_control::ControlConfig;
///
/// let config = ControlConfig::default();
/// assert!(config.validate().is_ok());
/// assert_eq!(config.compressor.on_below, 60.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    pub drive: DriveConfig,
    pub buttons: ButtonMap,
    pub axes: AxisMap,
    pub elevator: ElevatorConfig,
    pub compressor: CompressorConfig,
    /// 气动开关的触发方式（默认边沿触发）
    pub toggle_trigger: TriggerMode,
    /// 自动模式步骤序列
    pub autonomous: Vec<AutonomousStep>,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            drive: DriveConfig::default(),
            buttons: ButtonMap::default(),
            axes: AxisMap::default(),
            elevator: ElevatorConfig::default(),
            compressor: CompressorConfig::default(),
            toggle_trigger: TriggerMode::default(),
            autonomous: default_sequence(),
        }
    }
}

impl ControlConfig {
    /// 校验配置
    ///
    /// # 错误
    ///
    /// - `InvalidDeadZone`: 死区不在 [0, 1) 内
    /// - `InvalidSpeed`: 任一速度不在 (0, 1] 内
    /// - `InvalidThresholds`: 关断阈值不高于启动阈值
    /// - `ButtonOutOfRange` / `DuplicateButton`: 按键绑定非法
    /// - `AxisOutOfRange`: 轴编号非法
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dead_zone = self.drive.dead_zone;
        if !(0.0..1.0).contains(&dead_zone) {
            return Err(ConfigError::InvalidDeadZone(dead_zone));
        }

        for (name, value) in [
            ("turn", self.drive.turn_speed),
            ("autonomous", self.drive.autonomous_speed),
            ("elevator", self.elevator.speed),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(ConfigError::InvalidSpeed { name, value });
            }
        }

        let CompressorConfig { on_below, off_at } = self.compressor;
        if !(on_below.is_finite() && off_at.is_finite() && off_at > on_below) {
            return Err(ConfigError::InvalidThresholds { on_below, off_at });
        }

        self.buttons.validate()?;

        for (name, id) in [("left", self.axes.left), ("right", self.axes.right)] {
            if id == 0 || usize::from(id) > MAX_AXES {
                return Err(ConfigError::AxisOutOfRange {
                    name,
                    id,
                    max: MAX_AXES as u8,
                });
            }
        }

        Ok(())
    }
}
