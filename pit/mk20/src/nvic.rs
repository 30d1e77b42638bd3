//! NVIC lines for the PIT vectors

use cortex_m::interrupt::InterruptNumber;
use cortex_m::peripheral::NVIC;
use pit_core::InterruptController;

/// A device interrupt number as the NVIC sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Irq(pub u16);

unsafe impl InterruptNumber for Irq {
    fn number(self) -> u16 {
        self.0
    }
}

/// Masks and unmasks PIT vectors in the Cortex-M NVIC.
#[derive(Debug, Default, Clone, Copy)]
pub struct Mk20Nvic;

impl InterruptController for Mk20Nvic {
    fn enable(&self, irq: u16) {
        // Unmasking is only unsafe because it can break critical sections
        // built on masking; the PIT vectors take no part in those.
        unsafe { NVIC::unmask(Irq(irq)) }
    }

    fn disable(&self, irq: u16) {
        NVIC::mask(Irq(irq));
    }
}
