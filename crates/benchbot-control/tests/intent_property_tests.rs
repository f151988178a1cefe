//! 输入解释与底盘仲裁的属性测试
//!
//! 使用 proptest 验证对任意摇杆读数都成立的性质。

use benchbot_control::config::DEFAULT_DEAD_ZONE;
use benchbot_control::prelude::*;
use proptest::prelude::*;

fn core() -> ControlCore {
    ControlCore::new(ControlConfig::default()).unwrap()
}

fn small_axis() -> impl Strategy<Value = f64> {
    -0.0499..0.0499f64
}

/// 与默认按键映射不冲突的按键（1, 3, 9..=32）
fn unmapped_buttons() -> impl Strategy<Value = ButtonSet> {
    prop::collection::vec(prop_oneof![Just(1u8), Just(3u8), 9u8..=32], 0..4)
        .prop_map(|ids| ids.into_iter().map(ButtonId).collect())
}

proptest! {
    /// 死区内的读数总是全停
    #[test]
    fn dead_zone_always_stops(left in small_axis(), right in small_axis(), extra in unmapped_buttons()) {
        let mut core = core();
        let out = core.teleop_cycle(&InputSnapshot::new(left, right, extra));
        prop_assert_eq!(out.drive, MotorCommand::STOP);
        prop_assert_eq!(core.state().drive_mode, DriveMode::Idle);
    }

    /// 右转键在任何摇杆读数下都输出固定的原地转向
    #[test]
    fn turn_right_overrides_axes(left in -1.0..1.0f64, right in -1.0..1.0f64) {
        let mut core = core();
        let mut buttons = ButtonSet::empty();
        buttons.insert(ButtonId(6));
        let out = core.teleop_cycle(&InputSnapshot::new(left, right, buttons));
        prop_assert_eq!(out.drive, MotorCommand::new(0.25, -0.25));
    }

    /// 坦克驾驶对超出死区的轴逐一取反
    #[test]
    fn tank_negates_active_axes(left in -1.0..1.0f64, right in -1.0..1.0f64) {
        prop_assume!(left.abs() >= DEFAULT_DEAD_ZONE || right.abs() >= DEFAULT_DEAD_ZONE);

        let mut core = core();
        let out = core.teleop_cycle(&InputSnapshot::new(left, right, ButtonSet::empty()));

        let expect = |v: f64| if v.abs() < DEFAULT_DEAD_ZONE { 0.0 } else { -v };
        prop_assert_eq!(out.drive.left, expect(left));
        prop_assert_eq!(out.drive.right, expect(right));
        prop_assert_eq!(core.state().drive_mode, DriveMode::Tank);
    }

    /// 输出永远在 [-1, 1] 内，即使原始读数越界
    #[test]
    fn output_is_bounded(left in -5.0..5.0f64, right in -5.0..5.0f64, id in 1u8..=32) {
        let mut core = core();
        let mut buttons = ButtonSet::empty();
        buttons.insert(ButtonId(id));
        let out = core.teleop_cycle(&InputSnapshot::new(left, right, buttons));
        prop_assert!(out.drive.left.abs() <= 1.0);
        prop_assert!(out.drive.right.abs() <= 1.0);
        prop_assert!(out.elevator.abs() <= 1.0);
    }

    /// 边沿触发：无论按住多少周期，只切换一次
    #[test]
    fn held_toggle_fires_once(hold in 1usize..50) {
        let mut core = core();
        let mut buttons = ButtonSet::empty();
        buttons.insert(ButtonId(4));
        let snapshot = InputSnapshot::new(0.0, 0.0, buttons);

        let transitions: usize = (0..hold)
            .map(|_| core.teleop_cycle(&snapshot).actuators.len())
            .sum();
        prop_assert_eq!(transitions, 1);
        prop_assert!(core.state().arm_engaged);
    }

    /// 滞回：只要没有跌破启动阈值，就不会产生任何请求
    #[test]
    fn no_request_above_on_threshold(readings in prop::collection::vec(60.0..200.0f64, 1..50)) {
        let mut core = core();
        for p in readings {
            prop_assert_eq!(core.regulate(p), None);
        }
    }
}
