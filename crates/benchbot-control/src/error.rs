//! 控制层错误类型定义
//!
//! 控制核心本身的每个操作都是全函数（total），不存在运行时可恢复错误。
//! 唯一的错误来源是配置：阈值、死区、按键绑定等在构造 [`ControlCore`](crate::ControlCore)
//! 时统一校验。

use thiserror::Error;

/// 配置校验错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// 死区超出范围
    #[error("Invalid dead zone: {0} (must be in [0, 1))")]
    InvalidDeadZone(f64),

    /// 速度超出范围
    #[error("Invalid {name} speed: {value} (must be in (0, 1])")]
    InvalidSpeed {
        /// 配置项名称
        name: &'static str,
        /// 实际值
        value: f64,
    },

    /// 压缩机阈值非法（关断阈值必须高于启动阈值）
    #[error("Invalid compressor thresholds: on below {on_below}, off at {off_at} (off must be above on)")]
    InvalidThresholds {
        /// 启动阈值
        on_below: f64,
        /// 关断阈值
        off_at: f64,
    },

    /// 按键编号超出范围
    #[error("Button {id} for {name} out of range (valid: 1..={max})")]
    ButtonOutOfRange {
        /// 绑定名称
        name: &'static str,
        /// 按键编号
        id: u8,
        /// 最大编号
        max: u8,
    },

    /// 同一按键被绑定到两个功能
    #[error("Button {id} bound to both {first} and {second}")]
    DuplicateButton {
        /// 按键编号
        id: u8,
        /// 第一个绑定
        first: &'static str,
        /// 第二个绑定
        second: &'static str,
    },

    /// 摇杆轴编号超出范围
    #[error("Axis {id} for {name} out of range (valid: 1..={max})")]
    AxisOutOfRange {
        /// 绑定名称
        name: &'static str,
        /// 轴编号
        id: u8,
        /// 最大编号
        max: u8,
    },
}
