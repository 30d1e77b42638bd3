//! Bus clock the PIT counts against

use core::fmt;
use embedded_time::rate::Hertz;

/// Frequency of the bus clock feeding the PIT block.
///
/// All cycle counts a channel stores are measured against this rate. It is
/// fixed for the life of the program; channels copy it at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusClock(Hertz);

impl BusClock {
    /// 48 MHz bus of a Teensy 3.0/3.1 running at 48 or 96 MHz core clock
    pub const TEENSY3: BusClock = BusClock::from_hz(48_000_000);

    /// Create a bus clock description. Panics (at compile time in const
    /// context) on a zero frequency.
    pub const fn new(frequency: Hertz) -> Self {
        assert!(frequency.0 > 0, "bus clock frequency must be non-zero");
        Self(frequency)
    }

    /// Create a bus clock from a raw hertz value
    pub const fn from_hz(hz: u32) -> Self {
        Self::new(Hertz(hz))
    }

    /// Bus frequency as a typed rate
    pub const fn frequency(self) -> Hertz {
        self.0
    }

    /// Bus frequency in hertz
    pub const fn hz(self) -> u32 {
        self.0 .0
    }

    /// Convert a cycle count to seconds
    pub fn cycles_to_seconds(self, cycles: u64) -> f32 {
        (cycles as f64 / self.hz() as f64) as f32
    }
}

impl Default for BusClock {
    fn default() -> Self {
        Self::TEENSY3
    }
}

impl fmt::Display for BusClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Hz", self.hz())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for BusClock {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}Hz", self.hz());
    }
}
