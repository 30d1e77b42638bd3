//! Peripheral-wide configuration

use crate::channel::ChannelId;
use crate::clock::BusClock;
use crate::regs::ModuleControl;

/// Small set of channel ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelSet(u8);

impl ChannelSet {
    pub const EMPTY: ChannelSet = ChannelSet(0);

    /// Set holding one channel
    pub const fn single(id: ChannelId) -> Self {
        ChannelSet(1 << id.index())
    }

    /// Add a channel
    pub const fn with(self, id: ChannelId) -> Self {
        ChannelSet(self.0 | (1 << id.index()))
    }

    /// Remove a channel
    pub const fn without(self, id: ChannelId) -> Self {
        ChannelSet(self.0 & !(1 << id.index()))
    }

    pub const fn contains(self, id: ChannelId) -> bool {
        self.0 & (1 << id.index()) != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Settings shared by every channel of one PIT block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PitConfig {
    /// Clock all cycle counts are measured against
    pub bus_clock: BusClock,
    /// Channels a bank must leave alone
    pub reserved: ChannelSet,
    /// Stop the timers while the core is halted by a debugger
    pub freeze_in_debug: bool,
}

impl PitConfig {
    /// Teensy 3.x defaults: 48 MHz bus, channel 3 left to the tone generator
    pub const fn new() -> Self {
        Self {
            bus_clock: BusClock::TEENSY3,
            reserved: ChannelSet::single(ChannelId::CH3),
            freeze_in_debug: false,
        }
    }

    pub const fn with_bus_clock(mut self, bus_clock: BusClock) -> Self {
        self.bus_clock = bus_clock;
        self
    }

    pub const fn with_reserved(mut self, reserved: ChannelSet) -> Self {
        self.reserved = reserved;
        self
    }

    pub const fn with_freeze_in_debug(mut self, freeze: bool) -> Self {
        self.freeze_in_debug = freeze;
        self
    }

    /// Module control word written when a channel is constructed
    pub const fn module_control(&self) -> ModuleControl {
        if self.freeze_in_debug {
            ModuleControl::FRZ
        } else {
            ModuleControl::RUN
        }
    }
}

impl Default for PitConfig {
    fn default() -> Self {
        Self::new()
    }
}
