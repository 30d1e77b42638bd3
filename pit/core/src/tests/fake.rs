//! Instrumented stand-in for the PIT block and interrupt controller

use std::cell::{Cell, RefCell};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use crate::{
    ChannelId, ChannelRegisters, InterruptController, ModuleControl, PitPeripheral, TimerControl,
    MAX_CHANNELS,
};

/// Interrupt vector of channel 0 on the fake block
pub const IRQ_BASE: u16 = 30;

/// One observable side effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ClockGate,
    ModuleControl(u32),
    Load(u8, u32),
    Control(u8, TimerControl),
    FlagCleared(u8),
    IrqEnable(u16),
    IrqDisable(u16),
    Callback,
}

pub type Journal = Arc<Mutex<Vec<Access>>>;

fn record(journal: &Journal, access: Access) {
    journal.lock().unwrap().push(access);
}

pub struct FakeChannel {
    index: u8,
    journal: Journal,
    load: AtomicU32,
    current: AtomicU32,
    control: AtomicU32,
    flag: AtomicBool,
}

impl FakeChannel {
    pub fn load(&self) -> u32 {
        self.load.load(Ordering::SeqCst)
    }

    pub fn control(&self) -> TimerControl {
        TimerControl::from_bits(self.control.load(Ordering::SeqCst))
    }

    pub fn set_current(&self, cycles: u32) {
        self.current.store(cycles, Ordering::SeqCst);
    }

    /// Latch the flag as the hardware would on a fire
    pub fn raise_flag(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }
}

impl ChannelRegisters for FakeChannel {
    fn set_load_value(&self, cycles: u32) {
        self.load.store(cycles, Ordering::SeqCst);
        record(&self.journal, Access::Load(self.index, cycles));
    }

    fn current_value(&self) -> u32 {
        self.current.load(Ordering::SeqCst)
    }

    fn clear_interrupt_flag(&self) {
        self.flag.store(false, Ordering::SeqCst);
        record(&self.journal, Access::FlagCleared(self.index));
    }

    fn interrupt_flag(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    fn set_control(&self, control: TimerControl) {
        self.control.store(control.bits(), Ordering::SeqCst);
        record(&self.journal, Access::Control(self.index, control));
    }
}

/// Fake block exposing `N` channels
pub struct FakePit<const N: usize = MAX_CHANNELS> {
    journal: Journal,
    gate: AtomicBool,
    mcr: AtomicU32,
    channels: [FakeChannel; MAX_CHANNELS],
}

impl<const N: usize> FakePit<N> {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            gate: AtomicBool::new(false),
            mcr: AtomicU32::new(ModuleControl::MDIS.bits()),
            channels: core::array::from_fn(|index| FakeChannel {
                index: index as u8,
                journal: journal.clone(),
                load: AtomicU32::new(0),
                current: AtomicU32::new(0),
                control: AtomicU32::new(0),
                flag: AtomicBool::new(false),
            }),
        }
    }

    pub fn gate_open(&self) -> bool {
        self.gate.load(Ordering::SeqCst)
    }

    pub fn module_control(&self) -> ModuleControl {
        ModuleControl::from_bits(self.mcr.load(Ordering::SeqCst))
    }

    pub fn regs(&self, id: ChannelId) -> &FakeChannel {
        &self.channels[id.as_usize()]
    }
}

impl<const N: usize> PitPeripheral for FakePit<N> {
    type Channel = FakeChannel;

    const CHANNELS: usize = N;

    fn enable_clock_gate(&self) {
        self.gate.store(true, Ordering::SeqCst);
        record(&self.journal, Access::ClockGate);
    }

    fn set_module_control(&self, control: ModuleControl) {
        self.mcr.store(control.bits(), Ordering::SeqCst);
        record(&self.journal, Access::ModuleControl(control.bits()));
    }

    fn channel(&self, id: ChannelId) -> &FakeChannel {
        &self.channels[id.as_usize()]
    }

    fn interrupt(&self, id: ChannelId) -> u16 {
        IRQ_BASE + id.index() as u16
    }
}

pub struct FakeNvic {
    journal: Journal,
    enabled: Mutex<Vec<u16>>,
}

impl FakeNvic {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            enabled: Mutex::new(Vec::new()),
        }
    }

    pub fn is_enabled(&self, irq: u16) -> bool {
        self.enabled.lock().unwrap().contains(&irq)
    }
}

impl InterruptController for FakeNvic {
    fn enable(&self, irq: u16) {
        let mut enabled = self.enabled.lock().unwrap();
        if !enabled.contains(&irq) {
            enabled.push(irq);
        }
        record(&self.journal, Access::IrqEnable(irq));
    }

    fn disable(&self, irq: u16) {
        self.enabled.lock().unwrap().retain(|line| *line != irq);
        record(&self.journal, Access::IrqDisable(irq));
    }
}

/// Fresh journal plus a fake block and controller sharing it
pub fn rig() -> (Journal, FakePit, FakeNvic) {
    let journal = Journal::default();
    let pit = FakePit::new(&journal);
    let nvic = FakeNvic::new(&journal);
    (journal, pit, nvic)
}

pub fn take(journal: &Journal) -> Vec<Access> {
    std::mem::take(&mut *journal.lock().unwrap())
}

thread_local! {
    static CALLBACK_JOURNAL: RefCell<Option<Journal>> = const { RefCell::new(None) };
    static CALLBACK_HITS: Cell<u32> = const { Cell::new(0) };
}

/// Route [`recording_callback`] on this thread into `journal`
pub fn install_callback_journal(journal: &Journal) {
    CALLBACK_JOURNAL.with(|slot| *slot.borrow_mut() = Some(journal.clone()));
    CALLBACK_HITS.with(|hits| hits.set(0));
}

/// Callback that notes itself in the installed journal
pub fn recording_callback() {
    CALLBACK_HITS.with(|hits| hits.set(hits.get() + 1));
    CALLBACK_JOURNAL.with(|slot| {
        if let Some(journal) = slot.borrow().as_ref() {
            record(journal, Access::Callback);
        }
    });
}

/// Callback that only counts
pub fn counting_callback() {
    CALLBACK_HITS.with(|hits| hits.set(hits.get() + 1));
}

pub fn callback_hits() -> u32 {
    CALLBACK_HITS.with(|hits| hits.get())
}
