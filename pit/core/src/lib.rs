#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![forbid(unsafe_code)]

//! # PIT Core
//!
//! Periodic interrupt timer channels for microcontrollers whose timer bank is
//! a set of independent 32-bit down-counters sharing one peripheral block.
//!
//! A [`TimerChannel`] keeps a single raw reload value (bus-clock cycles minus
//! one) and derives period and frequency from it. Hardware access goes through
//! the traits in [`regs`], so the same channel logic drives real registers on
//! a chip backend and an instrumented model on the host.
//!
//! Interrupt delivery is table driven: each vector handler calls
//! [`DispatchTable::dispatch`] with its channel id, and the bound channel
//! acknowledges the hardware flag before it runs the user callback.

use core::fmt;

#[macro_use]
mod fmt_macros;

pub mod bank;
pub mod channel;
pub mod clock;
pub mod config;
pub mod dispatch;
pub mod regs;
pub mod value;

pub use bank::*;
pub use channel::*;
pub use clock::*;
pub use config::*;
pub use dispatch::*;
pub use regs::*;
pub use value::{VALUE_MAX, VALUE_MIN};

#[cfg(test)]
mod tests;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Number of channels a PIT block can expose.
pub const MAX_CHANNELS: usize = 4;

/// Result type used throughout the driver
pub type PitResult<T> = Result<T, PitError>;

/// Errors reported by channel, bank and dispatch operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PitError {
    /// Channel index outside the peripheral's channel range
    InvalidChannel(u8),
    /// Channel excluded by the bank configuration
    Reserved(ChannelId),
    /// Frequency was zero, negative or NaN
    InvalidFrequency,
    /// Dispatch slot already holds a target
    AlreadyBound(ChannelId),
}

impl fmt::Display for PitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PitError::InvalidChannel(raw) => write!(f, "invalid timer channel {}", raw),
            PitError::Reserved(id) => write!(f, "timer channel {} is reserved", id.index()),
            PitError::InvalidFrequency => write!(f, "frequency must be positive"),
            PitError::AlreadyBound(id) => {
                write!(f, "timer channel {} already bound to a dispatcher", id.index())
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PitError {}

#[cfg(feature = "defmt")]
impl defmt::Format for PitError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            PitError::InvalidChannel(raw) => defmt::write!(fmt, "InvalidChannel({})", raw),
            PitError::Reserved(id) => defmt::write!(fmt, "Reserved({})", id.index()),
            PitError::InvalidFrequency => defmt::write!(fmt, "InvalidFrequency"),
            PitError::AlreadyBound(id) => defmt::write!(fmt, "AlreadyBound({})", id.index()),
        }
    }
}
