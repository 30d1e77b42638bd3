use crate::value::{
    clamp, frequency_of, period_of, raw_for_frequency, raw_for_period, round_half_up, VALUE_MAX,
    VALUE_MIN,
};
use crate::BusClock;

const BUS: BusClock = BusClock::TEENSY3;

#[test]
fn clamp_keeps_in_range_values() {
    for raw in [VALUE_MIN, VALUE_MIN + 1, 47_999_999, u32::MAX - 2, VALUE_MAX] {
        assert_eq!(clamp(raw), raw);
    }
}

#[test]
fn clamp_folds_max_onto_max_minus_one() {
    assert_eq!(clamp(u32::MAX), u32::MAX - 1);
    assert_eq!(clamp(u32::MAX), clamp(u32::MAX - 1));
}

#[test]
fn clamp_raises_small_values_to_minimum() {
    for raw in [0, 1, 100, VALUE_MIN - 1] {
        assert_eq!(clamp(raw), VALUE_MIN);
    }
}

#[test]
fn rounding_is_half_up_not_half_even() {
    assert_eq!(round_half_up(0.5), 1.0);
    assert_eq!(round_half_up(1.5), 2.0);
    assert_eq!(round_half_up(2.5), 3.0);
    assert_eq!(round_half_up(2.4999), 2.0);
    assert_eq!(round_half_up(-0.5), 0.0);
}

#[test]
fn one_second_at_48mhz() {
    assert_eq!(raw_for_period(BUS, 1.0), 47_999_999);
    assert_eq!(period_of(BUS, 47_999_999), 1.0);
}

#[test]
fn one_kilohertz_at_48mhz() {
    assert_eq!(raw_for_frequency(BUS, 1000.0), 47_999);
    assert_eq!(frequency_of(BUS, 47_999), 1000.0);
}

#[test]
fn half_cycle_period_rounds_up() {
    // 2^20 Hz bus; 2001 / 2^21 s is exactly 1000.5 cycles
    let bus = BusClock::from_hz(1 << 20);
    let period = 2001.0_f32 / 2_097_152.0;
    assert_eq!(raw_for_period(bus, period), 1000);

    // 1000.25 cycles rounds down
    let period = 4001.0_f32 / 4_194_304.0;
    assert_eq!(raw_for_period(bus, period), 999);
}

#[test]
fn negative_and_nan_periods_saturate_low() {
    assert_eq!(raw_for_period(BUS, -1.0), 0);
    assert_eq!(raw_for_period(BUS, f32::NAN), 0);
    assert_eq!(clamp(raw_for_period(BUS, -1.0)), VALUE_MIN);
}

#[test]
fn overlong_periods_saturate_high() {
    assert_eq!(raw_for_period(BUS, 1000.0), u32::MAX);
    assert_eq!(clamp(raw_for_period(BUS, 1000.0)), VALUE_MAX);
}

#[test]
fn cycles_to_seconds_uses_bus_rate() {
    assert_eq!(BUS.cycles_to_seconds(24_000_000), 0.5);
    assert_eq!(BUS.cycles_to_seconds(0), 0.0);
}
