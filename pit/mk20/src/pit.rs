//! PIT block and channel register access for the MK20

use pit_core::{ChannelId, ChannelRegisters, ModuleControl, PitPeripheral, TimerControl};
use tock_registers::interfaces::{ReadWriteable, Readable, Writeable};

use crate::regs::{
    PitRegisters, SimRegisters, TimerRegisters, PIT_BASE, SCGC6, SIM_SCGC6, TCTRL, TFLG,
    TIMER_OFFSET, TIMER_STRIDE,
};
use crate::static_ref::StaticRef;

/// Vector number of PIT channel 0 on the MK20DX128 (Teensy 3.0)
pub const IRQ_PIT_CH0_MK20DX128: u16 = 30;

/// Vector number of PIT channel 0 on the MK20DX256 (Teensy 3.1/3.2)
pub const IRQ_PIT_CH0_MK20DX256: u16 = 68;

/// Register set of one PIT channel
#[derive(Debug, Clone, Copy)]
pub struct Mk20Channel {
    regs: StaticRef<TimerRegisters>,
}

impl ChannelRegisters for Mk20Channel {
    fn set_load_value(&self, cycles: u32) {
        self.regs.ldval.set(cycles);
    }

    fn current_value(&self) -> u32 {
        self.regs.cval.get()
    }

    fn clear_interrupt_flag(&self) {
        self.regs.tflg.write(TFLG::TIF::SET);
    }

    fn interrupt_flag(&self) -> bool {
        self.regs.tflg.is_set(TFLG::TIF)
    }

    fn set_control(&self, control: TimerControl) {
        self.regs.tctrl.write(
            TCTRL::TEN.val(control.is_enabled() as u32)
                + TCTRL::TIE.val(control.interrupts_enabled() as u32),
        );
    }
}

/// The MK20 PIT block together with its SIM clock gate.
#[derive(Debug)]
pub struct Mk20Pit {
    pit: StaticRef<PitRegisters>,
    sim: StaticRef<SimRegisters>,
    channels: [Mk20Channel; 4],
    irq_base: u16,
}

impl Mk20Pit {
    /// PIT of an MK20DX128 at its documented addresses.
    ///
    /// # Safety
    ///
    /// Only one `Mk20Pit` may exist, and nothing else may drive the PIT
    /// registers while it does.
    pub const unsafe fn new() -> Self {
        Self::at(PIT_BASE, SIM_SCGC6, IRQ_PIT_CH0_MK20DX128)
    }

    /// PIT of an MK20DX256 at its documented addresses.
    ///
    /// # Safety
    ///
    /// See [`Mk20Pit::new`].
    pub const unsafe fn new_mk20dx256() -> Self {
        Self::at(PIT_BASE, SIM_SCGC6, IRQ_PIT_CH0_MK20DX256)
    }

    /// PIT block at `pit_base`, clock gate register at `scgc6`, channel 0
    /// raising vector `irq_base` and the others following it.
    ///
    /// # Safety
    ///
    /// Both addresses must point at register blocks laid out like the MK20
    /// ones for the rest of the program.
    pub const unsafe fn at(pit_base: usize, scgc6: usize, irq_base: u16) -> Self {
        Self {
            pit: StaticRef::new(pit_base as *const PitRegisters),
            sim: StaticRef::new(scgc6 as *const SimRegisters),
            channels: [
                Self::timer(pit_base, 0),
                Self::timer(pit_base, 1),
                Self::timer(pit_base, 2),
                Self::timer(pit_base, 3),
            ],
            irq_base,
        }
    }

    const unsafe fn timer(pit_base: usize, index: usize) -> Mk20Channel {
        Mk20Channel {
            regs: StaticRef::new(
                (pit_base + TIMER_OFFSET + index * TIMER_STRIDE) as *const TimerRegisters,
            ),
        }
    }

    /// True when the PIT clock gate is open
    pub fn clock_gate_open(&self) -> bool {
        self.sim.scgc6.is_set(SCGC6::PIT)
    }
}

impl PitPeripheral for Mk20Pit {
    type Channel = Mk20Channel;

    const CHANNELS: usize = 4;

    fn enable_clock_gate(&self) {
        self.sim.scgc6.modify(SCGC6::PIT::SET);
    }

    fn set_module_control(&self, control: ModuleControl) {
        self.pit.mcr.set(control.bits());
    }

    fn channel(&self, id: ChannelId) -> &Mk20Channel {
        &self.channels[id.as_usize()]
    }

    fn interrupt(&self, id: ChannelId) -> u16 {
        self.irq_base + id.index() as u16
    }
}
