use std::str::FromStr;

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::PointAmount;

#[test]
fn rounds_half_up_at_creation() {
    // Exactly at the midpoint of the 9th digit: rounds away from zero.
    assert_eq!(
        PointAmount::new(dec!(0.000000005)),
        PointAmount::new(dec!(0.00000001))
    );
    assert_eq!(
        PointAmount::new(dec!(-0.000000005)),
        PointAmount::new(dec!(-0.00000001))
    );
    // Below the midpoint: truncates toward zero.
    assert_eq!(PointAmount::new(dec!(0.000000004)), PointAmount::ZERO);
}

#[test]
fn displays_full_fractional_width() {
    assert_eq!(PointAmount::from(1000u32).to_string(), "1000.00000000");
    assert_eq!(PointAmount::ZERO.to_string(), "0.00000000");
    assert_eq!(
        PointAmount::new(dec!(12.5)).to_string(),
        "12.50000000"
    );
}

#[test]
fn equal_values_with_different_scales_compare_equal() {
    let a = PointAmount::new(dec!(1));
    let b = PointAmount::from_str("1.00000000").unwrap();
    assert_eq!(a, b);
}

#[test]
fn min_unit_is_one_e_minus_eight() {
    assert_eq!(PointAmount::MIN_UNIT, PointAmount::new(dec!(0.00000001)));
    assert!(PointAmount::MIN_UNIT.is_positive());
}

#[test]
fn arithmetic_preserves_scale() {
    let a = PointAmount::new(dec!(0.1));
    let b = PointAmount::new(dec!(0.2));
    assert_eq!((a + b).to_string(), "0.30000000");
    assert_eq!((b - a).to_string(), "0.10000000");
    assert_eq!((-a).to_string(), "-0.10000000");
}

#[test]
fn mul_rate_rounds_half_up() {
    // 1000 * 0.0001 = 0.1 (the approval incentive computation)
    let pool = PointAmount::from(1000u32);
    assert_eq!(pool.mul_rate(dec!(0.0001)), PointAmount::new(dec!(0.1)));
    // A product below half the minimum unit rounds to zero.
    let tiny = PointAmount::new(dec!(0.00000001));
    assert_eq!(tiny.mul_rate(dec!(0.1)), PointAmount::ZERO);
}

#[test]
fn floor_sqrt_derives_affordable_strength() {
    assert_eq!(PointAmount::from(100u32).floor_sqrt(), 10);
    assert_eq!(PointAmount::from(99u32).floor_sqrt(), 9);
    assert_eq!(PointAmount::new(dec!(0.5)).floor_sqrt(), 0);
    assert_eq!(PointAmount::ZERO.floor_sqrt(), 0);
    assert_eq!(PointAmount::new(dec!(-25)).floor_sqrt(), 0);
}

proptest! {
    #[test]
    fn sum_of_parts_reproduces_total(parts in prop::collection::vec(0u64..1_000_000, 1..50)) {
        // Integer-valued amounts accumulate exactly, digit for digit.
        let total: u64 = parts.iter().sum();
        let summed: PointAmount = parts.iter().map(|&p| PointAmount::from(p)).sum();
        prop_assert_eq!(summed, PointAmount::from(total));
    }

    #[test]
    fn add_then_sub_is_identity(a in 0u64..1_000_000_000, b in 0u64..1_000_000_000) {
        let x = PointAmount::from(a);
        let y = PointAmount::from(b);
        prop_assert_eq!(x + y - y, x);
    }

    #[test]
    fn construction_is_idempotent(mantissa in -1_000_000_000_000i64..1_000_000_000_000, scale in 0u32..12) {
        let raw = Decimal::new(mantissa, scale);
        let once = PointAmount::new(raw);
        let twice = PointAmount::new(once.inner());
        prop_assert_eq!(once, twice);
    }
}
