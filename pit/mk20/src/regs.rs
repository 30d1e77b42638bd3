//! MK20 register layouts used by the PIT driver

use tock_registers::registers::{ReadOnly, ReadWrite};
use tock_registers::{register_bitfields, register_structs};

/// Base address of the PIT block
pub const PIT_BASE: usize = 0x4003_7000;

/// Address of `SIM_SCGC6`, the clock gate register holding the PIT bit
pub const SIM_SCGC6: usize = 0x4004_803C;

/// Offset of the first timer channel inside the PIT block
pub const TIMER_OFFSET: usize = 0x100;

/// Size of one timer channel's register set
pub const TIMER_STRIDE: usize = 0x10;

register_structs! {
    /// Periodic Interrupt Timer
    pub PitRegisters {
        /// PIT Module Control Register
        (0x000 => pub mcr: ReadWrite<u32, MCR::Register>),
        (0x004 => _reserved0),
        /// Timer channels 0-3
        (0x100 => pub timers: [TimerRegisters; 4]),
        (0x140 => @END),
    },

    /// Register set of one timer channel
    pub TimerRegisters {
        /// Timer Load Value Register
        (0x00 => pub ldval: ReadWrite<u32>),
        /// Current Timer Value Register
        (0x04 => pub cval: ReadOnly<u32>),
        /// Timer Control Register
        (0x08 => pub tctrl: ReadWrite<u32, TCTRL::Register>),
        /// Timer Flag Register
        (0x0C => pub tflg: ReadWrite<u32, TFLG::Register>),
        (0x10 => @END),
    },

    /// System Integration Module, clock gate 6 only
    pub SimRegisters {
        /// System Clock Gating Control Register 6
        (0x000 => pub scgc6: ReadWrite<u32, SCGC6::Register>),
        (0x004 => @END),
    }
}

register_bitfields![u32,
    pub MCR [
        /// Timers are stopped in debug mode
        FRZ OFFSET(0) NUMBITS(1) [],
        /// Module Disable
        MDIS OFFSET(1) NUMBITS(1) []
    ],

    pub TCTRL [
        /// Timer Enable
        TEN OFFSET(0) NUMBITS(1) [],
        /// Timer Interrupt Enable
        TIE OFFSET(1) NUMBITS(1) []
    ],

    pub TFLG [
        /// Timer Interrupt Flag, write 1 to clear
        TIF OFFSET(0) NUMBITS(1) []
    ],

    pub SCGC6 [
        /// PIT clock gate control
        PIT OFFSET(23) NUMBITS(1) []
    ]
];
