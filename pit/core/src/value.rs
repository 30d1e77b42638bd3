//! Raw reload values and their conversion to and from time units
//!
//! A raw value is the number loaded into a channel's reload register: the
//! period in bus cycles, minus one. Period and frequency are always derived
//! from it and never stored.

use crate::clock::BusClock;

/// Smallest raw value the hardware counts reliably (75 kHz on a 48 MHz bus)
pub const VALUE_MIN: u32 = 0x27F;

/// Largest raw value accepted. `u32::MAX` itself makes the countdown unstable.
pub const VALUE_MAX: u32 = u32::MAX - 1;

/// Clamp a raw value into `VALUE_MIN..=VALUE_MAX`.
pub const fn clamp(raw: u32) -> u32 {
    if raw == u32::MAX {
        VALUE_MAX
    } else if raw < VALUE_MIN {
        VALUE_MIN
    } else {
        raw
    }
}

/// Round half up: `floor(x + 0.5)`.
///
/// Ties always go toward positive infinity, never to even.
#[inline]
pub fn round_half_up(x: f64) -> f64 {
    libm::floor(x + 0.5)
}

/// Raw value for a period in seconds, before clamping.
///
/// The float-to-integer cast saturates: negative or NaN periods become 0 and
/// overlong ones `u32::MAX`, both of which [`clamp`] then folds into range.
pub fn raw_for_period(clock: BusClock, seconds: f32) -> u32 {
    (round_half_up(clock.hz() as f64 * seconds as f64) - 1.0) as u32
}

/// Raw value for a frequency in hertz, before clamping.
///
/// `hz` must be positive; callers reject anything else.
pub fn raw_for_frequency(clock: BusClock, hz: f32) -> u32 {
    (round_half_up(clock.hz() as f64 / hz as f64) - 1.0) as u32
}

/// Period in seconds of a raw value
pub fn period_of(clock: BusClock, raw: u32) -> f32 {
    ((raw as f64 + 1.0) / clock.hz() as f64) as f32
}

/// Frequency in hertz of a raw value
pub fn frequency_of(clock: BusClock, raw: u32) -> f32 {
    (clock.hz() as f64 / (raw as f64 + 1.0)) as f32
}
