//! Hardware interface consumed by the channel driver
//!
//! A backend implements [`PitPeripheral`] for the whole block and
//! [`ChannelRegisters`] for one channel's register set. The interrupt
//! controller side is [`InterruptController`]. Every method is a single
//! register access or a short fixed sequence of them; none may block.

use core::fmt;
use core::ops::BitOr;

use crate::channel::ChannelId;

/// Value of a channel's timer control register (`TCTRL`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerControl(u32);

impl TimerControl {
    /// Timer enable
    pub const TEN: TimerControl = TimerControl(1 << 0);
    /// Timer interrupt enable
    pub const TIE: TimerControl = TimerControl(1 << 1);

    /// Counter halted, no interrupt requests
    pub const DISABLED: TimerControl = TimerControl(0);
    /// Counting without requesting interrupts
    pub const COUNTING: TimerControl = Self::TEN;
    /// Counting and requesting an interrupt on every reload
    pub const ARMED: TimerControl = TimerControl(Self::TEN.0 | Self::TIE.0);

    /// Build from a raw register word, keeping only defined bits
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits & (Self::TEN.0 | Self::TIE.0))
    }

    /// Raw register word
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// True when the counter is enabled
    pub const fn is_enabled(self) -> bool {
        self.0 & Self::TEN.0 != 0
    }

    /// True when interrupt requests are enabled
    pub const fn interrupts_enabled(self) -> bool {
        self.0 & Self::TIE.0 != 0
    }
}

impl BitOr for TimerControl {
    type Output = TimerControl;

    fn bitor(self, rhs: Self) -> Self {
        TimerControl(self.0 | rhs.0)
    }
}

impl fmt::Display for TimerControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TCTRL(TEN={}, TIE={})", self.is_enabled() as u8, self.interrupts_enabled() as u8)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TimerControl {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "TCTRL({=u32:#x})", self.0);
    }
}

/// Value of the peripheral-wide module control register (`MCR`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModuleControl(u32);

impl ModuleControl {
    /// Timers stop while the core is halted in debug
    pub const FRZ: ModuleControl = ModuleControl(1 << 0);
    /// Module disable (clock to the timers off)
    pub const MDIS: ModuleControl = ModuleControl(1 << 1);
    /// Module running, no special modes
    pub const RUN: ModuleControl = ModuleControl(0);

    /// Raw register word
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Build from a raw register word, keeping only defined bits
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits & (Self::FRZ.0 | Self::MDIS.0))
    }
}

/// One channel's register set: reload, countdown, flag and control.
pub trait ChannelRegisters: Sync {
    /// Write the reload register (`LDVAL`). Takes effect at the next reload.
    fn set_load_value(&self, cycles: u32);

    /// Read the live countdown register (`CVAL`)
    fn current_value(&self) -> u32;

    /// Acknowledge the pending-interrupt flag (`TFLG`, write one to clear)
    fn clear_interrupt_flag(&self);

    /// Read the pending-interrupt flag
    fn interrupt_flag(&self) -> bool;

    /// Write the control register (`TCTRL`)
    fn set_control(&self, control: TimerControl);
}

/// The PIT block as a whole.
pub trait PitPeripheral: Sync {
    /// Register-set type of one channel
    type Channel: ChannelRegisters;

    /// Number of channels the block implements (at most [`crate::MAX_CHANNELS`])
    const CHANNELS: usize;

    /// Open the peripheral clock gate. Idempotent.
    fn enable_clock_gate(&self);

    /// Write the module control register
    fn set_module_control(&self, control: ModuleControl);

    /// Register set of a channel. Callers resolve this once and keep the
    /// reference; it must stay valid for the life of the peripheral.
    fn channel(&self, id: ChannelId) -> &Self::Channel;

    /// Interrupt vector number raised by a channel
    fn interrupt(&self, id: ChannelId) -> u16;
}

/// Interrupt controller lines (NVIC on Cortex-M).
pub trait InterruptController: Sync {
    /// Unmask an interrupt line
    fn enable(&self, irq: u16);

    /// Mask an interrupt line
    fn disable(&self, irq: u16);
}
