#![allow(dead_code)]

use pit_core::{ChannelId, DispatchTable, PitBank, PitConfig, TimerChannel};
use pit_sim::{SimNvic, SimPit, Simulator};

pub type SimBank = PitBank<'static, SimPit, SimNvic>;

/// Simulated block, interrupt controller and bank, all bound and leaked
pub struct Rig {
    pub pit: &'static SimPit,
    pub nvic: &'static SimNvic,
    pub table: &'static DispatchTable,
    pub bank: &'static SimBank,
}

impl Rig {
    pub fn new() -> Self {
        Self::on(Box::leak(Box::new(SimPit::new())))
    }

    /// Rig around an existing block, e.g. one held in a static
    pub fn on(pit: &'static SimPit) -> Self {
        let nvic: &'static SimNvic = Box::leak(Box::new(SimNvic::new()));
        let table: &'static DispatchTable = Box::leak(Box::new(DispatchTable::new()));
        let bank: &'static SimBank = Box::leak(Box::new(PitBank::new(pit, nvic, PitConfig::new())));
        bank.bind(table).unwrap();
        pit.take_journal();

        Self {
            pit,
            nvic,
            table,
            bank,
        }
    }

    pub fn channel(&self, id: ChannelId) -> &'static TimerChannel<'static, SimPit, SimNvic> {
        self.bank.channel(id).unwrap()
    }

    pub fn simulator(&self) -> Simulator<'static> {
        Simulator::new(self.pit, self.nvic, self.table)
    }
}

pub fn noop() {}
