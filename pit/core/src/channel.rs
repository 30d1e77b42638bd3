//! A single periodic interrupt timer channel

use core::fmt;
use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::clock::BusClock;
use crate::config::PitConfig;
use crate::dispatch::{Callback, CallbackSlot, InterruptTarget};
use crate::regs::{ChannelRegisters, InterruptController, PitPeripheral, TimerControl};
use crate::value;
use crate::{PitError, PitResult, MAX_CHANNELS};

/// Index of a hardware timer channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChannelId(u8);

impl ChannelId {
    pub const CH0: ChannelId = ChannelId(0);
    pub const CH1: ChannelId = ChannelId(1);
    pub const CH2: ChannelId = ChannelId(2);
    pub const CH3: ChannelId = ChannelId(3);

    /// Validate a raw channel index
    pub const fn new(raw: u8) -> PitResult<Self> {
        if (raw as usize) < MAX_CHANNELS {
            Ok(ChannelId(raw))
        } else {
            Err(PitError::InvalidChannel(raw))
        }
    }

    /// Raw channel index
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Channel index for array addressing
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    /// Every channel id in ascending order
    pub fn all() -> impl Iterator<Item = ChannelId> {
        (0..MAX_CHANNELS as u8).map(ChannelId)
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PIT{}", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ChannelId {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "PIT{}", self.0);
    }
}

/// One hardware countdown timer.
///
/// The channel owns a copy of the raw reload value and treats it as the
/// source of truth; period and frequency are computed from it on demand.
/// All methods take `&self` so a single `&'static` channel can be shared
/// between foreground code and its interrupt vector.
///
/// Foreground code is the only writer of the configuration and of the
/// callback slot. The vector only reads the slot (under a critical section)
/// and acknowledges the hardware flag.
pub struct TimerChannel<'a, P: PitPeripheral, I: InterruptController> {
    id: ChannelId,
    regs: &'a P::Channel,
    nvic: &'a I,
    irq: u16,
    clock: BusClock,
    value: AtomicU32,
    running: AtomicBool,
    callback: CallbackSlot,
}

impl<'a, P: PitPeripheral, I: InterruptController> TimerChannel<'a, P, I> {
    /// Bind a channel to its register set and bring the block up.
    ///
    /// Opens the PIT clock gate and writes the module control register on
    /// every call; both are harmless to repeat. The reload value starts at
    /// the bus frequency, i.e. a period of about one second.
    pub fn new(id: ChannelId, pit: &'a P, nvic: &'a I, config: &PitConfig) -> PitResult<Self> {
        if id.as_usize() >= P::CHANNELS {
            return Err(PitError::InvalidChannel(id.index()));
        }

        pit.enable_clock_gate();
        pit.set_module_control(config.module_control());

        let channel = Self {
            id,
            regs: pit.channel(id),
            nvic,
            irq: pit.interrupt(id),
            clock: config.bus_clock,
            value: AtomicU32::new(0),
            running: AtomicBool::new(false),
            callback: CallbackSlot::new(),
        };
        channel.set_value(config.bus_clock.hz());

        debug!("pit{}: ready, irq {}, reload {}", id.index(), channel.irq, channel.value());
        Ok(channel)
    }

    /// Channel this instance controls
    pub fn id(&self) -> ChannelId {
        self.id
    }

    /// Bus clock the channel counts against
    pub fn bus_clock(&self) -> BusClock {
        self.clock
    }

    /// Interrupt vector number of this channel
    pub fn irq(&self) -> u16 {
        self.irq
    }

    /// Set the raw reload value in bus cycles.
    ///
    /// Out-of-range input is clamped, never rejected: `u32::MAX` becomes
    /// [`value::VALUE_MAX`] and anything below [`value::VALUE_MIN`] becomes
    /// `VALUE_MIN`. The clamped value is written to the reload register.
    pub fn set_value(&self, raw: u32) {
        let clamped = value::clamp(raw);
        if clamped != raw {
            trace!("pit{}: reload {} clamped to {}", self.id.index(), raw, clamped);
        }
        self.value.store(clamped, Ordering::Relaxed);
        self.regs.set_load_value(clamped);
    }

    /// Raw reload value as last written
    pub fn value(&self) -> u32 {
        self.value.load(Ordering::Relaxed)
    }

    /// Set the period in seconds, rounded half up to whole bus cycles
    pub fn set_period(&self, seconds: f32) {
        self.set_value(value::raw_for_period(self.clock, seconds));
    }

    /// Period in seconds
    pub fn period(&self) -> f32 {
        value::period_of(self.clock, self.value())
    }

    /// Set the firing frequency in hertz.
    ///
    /// Zero, negative and NaN frequencies are rejected and leave the channel
    /// untouched.
    pub fn set_frequency(&self, hz: f32) -> PitResult<()> {
        if hz.is_nan() || hz <= 0.0 {
            warn!("pit{}: rejected frequency {}", self.id.index(), hz);
            return Err(PitError::InvalidFrequency);
        }
        self.set_value(value::raw_for_frequency(self.clock, hz));
        Ok(())
    }

    /// Firing frequency in hertz
    pub fn frequency(&self) -> f32 {
        value::frequency_of(self.clock, self.value())
    }

    /// Register `callback` and start periodic firing.
    ///
    /// Calling this on a running channel swaps the callback and re-arms.
    /// The callback runs in interrupt context once per period and must
    /// finish well within one period; overrun fires are lost.
    pub fn start(&self, callback: Callback) {
        self.callback.set(Some(callback));
        self.running.store(true, Ordering::Release);
        self.regs.set_control(TimerControl::ARMED);
        self.nvic.enable(self.irq);
        debug!("pit{}: started, reload {}", self.id.index(), self.value());
    }

    /// Stop firing. Safe on a stopped channel.
    ///
    /// A callback already executing in interrupt context is not aborted.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
        self.nvic.disable(self.irq);
        self.regs.set_control(TimerControl::DISABLED);
        debug!("pit{}: stopped", self.id.index());
    }

    /// Restart the current countdown from the full reload value.
    ///
    /// Pulses the counter off and back on. Run state and configuration are
    /// unchanged; a stopped channel stays disabled.
    pub fn reset(&self) {
        let resume = if self.is_running() {
            TimerControl::ARMED
        } else {
            TimerControl::DISABLED
        };
        self.regs.set_control(TimerControl::DISABLED);
        self.regs.set_control(resume);
    }

    /// Acknowledge the pending-interrupt flag
    pub fn clear(&self) {
        self.regs.clear_interrupt_flag();
    }

    /// True between [`start`](Self::start) and [`stop`](Self::stop)
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Bus cycles left until the next fire, read live from the countdown register
    pub fn current(&self) -> u32 {
        self.regs.current_value()
    }

    /// Seconds left until the next fire
    pub fn remains(&self) -> f32 {
        self.clock.cycles_to_seconds(self.current() as u64)
    }

    /// Service one hardware fire: acknowledge, then run the callback.
    ///
    /// The flag is cleared first, always; the hardware will not raise this
    /// channel again until it is. The callback only runs while the channel
    /// is running, so a fire that races a `stop` is acknowledged and dropped.
    pub fn service(&self) {
        self.clear();

        if !self.is_running() {
            trace!("pit{}: fire while stopped", self.id.index());
            return;
        }

        match self.callback.get() {
            Some(callback) => callback(),
            None => warn!("pit{}: fire with no callback", self.id.index()),
        }
    }
}

impl<P: PitPeripheral, I: InterruptController> InterruptTarget for TimerChannel<'_, P, I> {
    fn on_interrupt(&self) {
        self.service();
    }
}

impl<P: PitPeripheral, I: InterruptController> fmt::Debug for TimerChannel<'_, P, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerChannel")
            .field("id", &self.id)
            .field("irq", &self.irq)
            .field("value", &self.value())
            .field("running", &self.is_running())
            .finish()
    }
}
