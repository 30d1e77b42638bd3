#![no_std]

//! # PIT for Kinetis MK20
//!
//! Register backend for [`pit_core`] on the MK20DX128/MK20DX256 family used
//! by the Teensy 3.x boards. The PIT block and the SIM clock gate are mapped
//! with `tock-registers`; vector masking goes through the Cortex-M NVIC.
//!
//! ```ignore
//! use pit_core::{DispatchTable, PitBank, PitConfig};
//! use pit_mk20::{Mk20Nvic, Mk20Pit};
//!
//! static PIT: Mk20Pit = unsafe { Mk20Pit::new() };
//! static NVIC: Mk20Nvic = Mk20Nvic;
//! static PIT_VECTORS: DispatchTable = DispatchTable::new();
//!
//! pit_mk20::bind_pit_interrupts!(PIT, PIT_VECTORS => {
//!     pit0_isr: CH0,
//!     pit1_isr: CH1,
//!     pit2_isr: CH2,
//! });
//!
//! let bank = cortex_m::singleton!(
//!     : PitBank<'static, Mk20Pit, Mk20Nvic> = PitBank::new(&PIT, &NVIC, PitConfig::new())
//! )
//! .unwrap();
//! bank.bind(&PIT_VECTORS).unwrap();
//! ```

pub use pit_core;

mod macros;
pub mod nvic;
pub mod pit;
pub mod regs;
pub mod static_ref;

pub use nvic::{Irq, Mk20Nvic};
pub use pit::{Mk20Channel, Mk20Pit, IRQ_PIT_CH0_MK20DX128, IRQ_PIT_CH0_MK20DX256};
pub use static_ref::StaticRef;

#[cfg(test)]
extern crate std;
