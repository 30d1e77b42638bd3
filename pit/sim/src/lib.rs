//! # PIT Simulator
//!
//! Host model of a PIT block. [`SimPit`] and [`SimNvic`] implement the
//! `pit-core` hardware traits over plain memory, and [`Simulator`] steps the
//! countdowns in bus cycles and delivers fires through a [`DispatchTable`]
//! the same way the vector handlers do on the chip.
//!
//! Every register access is appended to a journal so tests can check the
//! order in which the driver touches the hardware.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use pit_core::{
    ChannelId, ChannelRegisters, DispatchTable, InterruptController, ModuleControl, PitPeripheral,
    TimerControl, MAX_CHANNELS,
};

/// Interrupt vector of channel 0 on the simulated block
pub const SIM_IRQ_BASE: u16 = 30;

/// One observable event on the simulated hardware
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    ClockGate,
    ModuleControl(ModuleControl),
    Load(ChannelId, u32),
    Control(ChannelId, TimerControl),
    FlagCleared(ChannelId),
    /// Counter reached zero and reloaded
    Fired(ChannelId),
    /// Free-form marker pushed by test code
    Mark(&'static str),
}

type Journal = Arc<Mutex<Vec<Access>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug)]
struct CounterState {
    load: u32,
    control: TimerControl,
    flag: bool,
    /// Cycles until the next fire while enabled
    countdown: u64,
    fires: u64,
    missed: u64,
}

impl CounterState {
    const fn new() -> Self {
        Self {
            load: 0,
            control: TimerControl::DISABLED,
            flag: false,
            countdown: 0,
            fires: 0,
            missed: 0,
        }
    }

    fn period(&self) -> u64 {
        self.load as u64 + 1
    }
}

/// Outcome of one counter reaching zero
struct Fire {
    deliver: bool,
}

/// One simulated channel register set
#[derive(Debug)]
pub struct SimChannel {
    id: ChannelId,
    state: Mutex<CounterState>,
    journal: Journal,
}

impl SimChannel {
    fn new(id: ChannelId, journal: Journal) -> Self {
        Self {
            id,
            state: Mutex::new(CounterState::new()),
            journal,
        }
    }

    fn record(&self, access: Access) {
        lock(&self.journal).push(access);
    }

    /// Reload register as last written
    pub fn load_value(&self) -> u32 {
        lock(&self.state).load
    }

    /// Control register as last written
    pub fn control(&self) -> TimerControl {
        lock(&self.state).control
    }

    /// Pending-interrupt flag
    pub fn flag(&self) -> bool {
        lock(&self.state).flag
    }

    /// Number of times the counter reached zero
    pub fn fires(&self) -> u64 {
        lock(&self.state).fires
    }

    /// Fires that found the flag still set and were not delivered
    pub fn missed(&self) -> u64 {
        lock(&self.state).missed
    }

    fn countdown(&self) -> Option<u64> {
        let state = lock(&self.state);
        state.control.is_enabled().then_some(state.countdown)
    }

    /// Count `cycles` down. Returns the fire if the counter hit zero.
    fn elapse(&self, cycles: u64) -> Option<Fire> {
        let mut state = lock(&self.state);
        if !state.control.is_enabled() {
            return None;
        }

        state.countdown = state.countdown.saturating_sub(cycles);
        if state.countdown > 0 {
            return None;
        }

        let already_pending = state.flag;
        state.flag = true;
        state.countdown = state.period();
        state.fires += 1;
        if already_pending {
            state.missed += 1;
        }
        let deliver = !already_pending && state.control.interrupts_enabled();
        drop(state);

        self.record(Access::Fired(self.id));
        if already_pending {
            log::trace!("sim: {} fired with flag still set", self.id);
        }
        Some(Fire { deliver })
    }
}

impl ChannelRegisters for SimChannel {
    fn set_load_value(&self, cycles: u32) {
        lock(&self.state).load = cycles;
        self.record(Access::Load(self.id, cycles));
    }

    fn current_value(&self) -> u32 {
        let state = lock(&self.state);
        u32::try_from(state.countdown).unwrap_or(u32::MAX)
    }

    fn clear_interrupt_flag(&self) {
        lock(&self.state).flag = false;
        self.record(Access::FlagCleared(self.id));
    }

    fn interrupt_flag(&self) -> bool {
        self.flag()
    }

    fn set_control(&self, control: TimerControl) {
        {
            let mut state = lock(&self.state);
            if !state.control.is_enabled() && control.is_enabled() {
                state.countdown = state.period();
            }
            state.control = control;
        }
        self.record(Access::Control(self.id, control));
    }
}

/// Simulated PIT block with four channels
#[derive(Debug)]
pub struct SimPit {
    journal: Journal,
    gate: AtomicBool,
    module_control: AtomicU32,
    channels: [SimChannel; MAX_CHANNELS],
}

impl SimPit {
    pub fn new() -> Self {
        let journal = Journal::default();
        let channels = [ChannelId::CH0, ChannelId::CH1, ChannelId::CH2, ChannelId::CH3]
            .map(|id| SimChannel::new(id, journal.clone()));

        Self {
            journal,
            gate: AtomicBool::new(false),
            module_control: AtomicU32::new(ModuleControl::MDIS.bits()),
            channels,
        }
    }

    /// True once the driver has opened the clock gate
    pub fn clock_gate_open(&self) -> bool {
        self.gate.load(Ordering::SeqCst)
    }

    /// Module control register as last written
    pub fn module_control(&self) -> ModuleControl {
        ModuleControl::from_bits(self.module_control.load(Ordering::SeqCst))
    }

    /// Push a marker into the journal
    pub fn mark(&self, label: &'static str) {
        lock(&self.journal).push(Access::Mark(label));
    }

    /// Copy of the journal so far
    pub fn journal(&self) -> Vec<Access> {
        lock(&self.journal).clone()
    }

    /// Drain the journal
    pub fn take_journal(&self) -> Vec<Access> {
        std::mem::take(&mut *lock(&self.journal))
    }
}

impl Default for SimPit {
    fn default() -> Self {
        Self::new()
    }
}

impl PitPeripheral for SimPit {
    type Channel = SimChannel;

    const CHANNELS: usize = MAX_CHANNELS;

    fn enable_clock_gate(&self) {
        self.gate.store(true, Ordering::SeqCst);
        lock(&self.journal).push(Access::ClockGate);
    }

    fn set_module_control(&self, control: ModuleControl) {
        self.module_control.store(control.bits(), Ordering::SeqCst);
        lock(&self.journal).push(Access::ModuleControl(control));
    }

    fn channel(&self, id: ChannelId) -> &SimChannel {
        &self.channels[id.as_usize()]
    }

    fn interrupt(&self, id: ChannelId) -> u16 {
        SIM_IRQ_BASE + id.index() as u16
    }
}

/// Interrupt controller model with per-line enable and pending bits.
///
/// A request raised while its line is masked stays pending and is taken as
/// soon as the line is unmasked, as on the NVIC.
#[derive(Debug, Default)]
pub struct SimNvic {
    enabled: AtomicU32,
    pending: AtomicU32,
}

impl SimNvic {
    pub const fn new() -> Self {
        Self {
            enabled: AtomicU32::new(0),
            pending: AtomicU32::new(0),
        }
    }

    /// True while a request on the line waits to be taken
    pub fn is_pending(&self, irq: u16) -> bool {
        let bit = Self::bit(irq);
        bit != 0 && self.pending.load(Ordering::SeqCst) & bit != 0
    }

    fn pend(&self, irq: u16) {
        self.pending.fetch_or(Self::bit(irq), Ordering::SeqCst);
    }

    /// Take a pending request if its line is enabled
    fn take(&self, irq: u16) -> bool {
        if !self.is_enabled(irq) {
            return false;
        }
        let bit = Self::bit(irq);
        self.pending.fetch_and(!bit, Ordering::SeqCst) & bit != 0
    }

    fn bit(irq: u16) -> u32 {
        irq.checked_sub(SIM_IRQ_BASE)
            .and_then(|line| 1u32.checked_shl(line as u32))
            .unwrap_or(0)
    }

    pub fn is_enabled(&self, irq: u16) -> bool {
        let bit = Self::bit(irq);
        bit != 0 && self.enabled.load(Ordering::SeqCst) & bit != 0
    }
}

impl InterruptController for SimNvic {
    fn enable(&self, irq: u16) {
        self.enabled.fetch_or(Self::bit(irq), Ordering::SeqCst);
    }

    fn disable(&self, irq: u16) {
        self.enabled.fetch_and(!Self::bit(irq), Ordering::SeqCst);
    }
}

/// Steps a [`SimPit`] through time and delivers fires.
///
/// No lock is held while a fire is dispatched, so callbacks may stop, reset
/// or reconfigure any channel.
pub struct Simulator<'a> {
    pit: &'a SimPit,
    nvic: &'a SimNvic,
    table: &'a DispatchTable,
    now: u64,
}

impl<'a> Simulator<'a> {
    pub fn new(pit: &'a SimPit, nvic: &'a SimNvic, table: &'a DispatchTable) -> Self {
        Self {
            pit,
            nvic,
            table,
            now: 0,
        }
    }

    /// Bus cycles simulated so far
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Run the block for `cycles` bus cycles.
    ///
    /// Channels that reach zero on the same cycle all count down first and
    /// are then dispatched in channel order. Requests left pending on a
    /// masked line are taken once it is enabled, at the start of the next
    /// call at the latest.
    pub fn advance(&mut self, cycles: u64) {
        self.take_pending();
        let mut remaining = cycles;

        while remaining > 0 {
            let next = self
                .pit
                .channels
                .iter()
                .filter_map(SimChannel::countdown)
                .min()
                .map_or(remaining, |countdown| countdown.min(remaining));

            self.now += next;
            remaining -= next;

            let mut fired = [None; MAX_CHANNELS];
            for (slot, channel) in fired.iter_mut().zip(&self.pit.channels) {
                *slot = channel.elapse(next).map(|fire| fire.deliver);
            }

            for (deliver, channel) in fired.into_iter().zip(&self.pit.channels) {
                if deliver == Some(true) {
                    self.nvic.pend(self.pit.interrupt(channel.id));
                }
            }
            self.take_pending();
        }
    }

    /// Dispatch every pending request whose line is enabled, in channel order
    fn take_pending(&self) {
        for channel in &self.pit.channels {
            if self.nvic.take(self.pit.interrupt(channel.id)) {
                self.table.dispatch(channel.id);
            }
        }
    }

    /// Run the block for a span of seconds at the given bus frequency
    pub fn advance_seconds(&mut self, seconds: f64, bus_hz: u32) {
        self.advance((seconds * bus_hz as f64).round() as u64);
    }
}
