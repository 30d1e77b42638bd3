#![no_std]
#![no_main]

//! Teensy 3.0 blink
//!
//! Channel 0 toggles the on-board LED (pin 13, PTC5) twice a second and
//! channel 1 keeps a millisecond tick. Channel 3 is left to the tone
//! generator. The core runs from the reset clock (FEI, about 20.97 MHz on
//! the bus) so no clock setup is needed.

use core::ptr;
use core::sync::atomic::{AtomicU32, Ordering};

use cortex_m_rt::entry;
use panic_halt as _;

use pit_core::{BusClock, ChannelId, DispatchTable, PitBank, PitConfig};
use pit_mk20::{Mk20Nvic, Mk20Pit};

/// Bus clock out of reset with the FLL in FEI mode
const FEI_BUS_HZ: u32 = 20_971_520;

const WDOG_STCTRLH: *mut u16 = 0x4005_2000 as *mut u16;
const WDOG_UNLOCK: *mut u16 = 0x4005_200E as *mut u16;
const SIM_SCGC5: *mut u32 = 0x4004_8038 as *mut u32;
const PORTC_PCR5: *mut u32 = 0x4004_B014 as *mut u32;
const GPIOC_PTOR: *mut u32 = 0x400F_F08C as *mut u32;
const GPIOC_PDDR: *mut u32 = 0x400F_F094 as *mut u32;

const SCGC5_PORTC: u32 = 1 << 11;
const PCR_MUX_GPIO: u32 = 1 << 8;
const PCR_DSE: u32 = 1 << 6;
const LED: u32 = 1 << 5;

static PIT: Mk20Pit = unsafe { Mk20Pit::new() };
static NVIC: Mk20Nvic = Mk20Nvic;
static PIT_VECTORS: DispatchTable = DispatchTable::new();

static TICKS: AtomicU32 = AtomicU32::new(0);

pit_mk20::bind_pit_interrupts!(PIT, PIT_VECTORS => {
    pit0_isr: CH0,
    pit1_isr: CH1,
    pit2_isr: CH2,
});

/// Flash configuration field: backdoor key, protection and security bytes
#[link_section = ".flashconfig"]
#[used]
static FLASH_CONFIG: [u8; 16] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, // backdoor key
    0xFF, 0xFF, 0xFF, 0xFF, // FPROT
    0xFE, // FSEC: unsecured
    0xF9, // FOPT
    0xFF, 0xFF, // FEPROT, FDPROT
];

type Vector = unsafe extern "C" fn();

extern "C" {
    fn DefaultHandler();
}

/// Peripheral vectors of the MK20DX128; the PIT occupies 30..=33
#[link_section = ".vector_table.interrupts"]
#[no_mangle]
pub static __INTERRUPTS: [Vector; 46] = {
    let mut vectors: [Vector; 46] = [DefaultHandler; 46];
    vectors[30] = pit0_isr;
    vectors[31] = pit1_isr;
    vectors[32] = pit2_isr;
    vectors
};

fn disable_watchdog() {
    unsafe {
        ptr::write_volatile(WDOG_UNLOCK, 0xC520);
        ptr::write_volatile(WDOG_UNLOCK, 0xD928);
        cortex_m::asm::nop();
        cortex_m::asm::nop();
        ptr::write_volatile(WDOG_STCTRLH, 0x0010);
    }
}

fn configure_led() {
    unsafe {
        let scgc5 = ptr::read_volatile(SIM_SCGC5);
        ptr::write_volatile(SIM_SCGC5, scgc5 | SCGC5_PORTC);
        ptr::write_volatile(PORTC_PCR5, PCR_MUX_GPIO | PCR_DSE);
        let pddr = ptr::read_volatile(GPIOC_PDDR);
        ptr::write_volatile(GPIOC_PDDR, pddr | LED);
    }
}

fn toggle_led() {
    unsafe { ptr::write_volatile(GPIOC_PTOR, LED) };
}

fn tick() {
    TICKS.fetch_add(1, Ordering::Relaxed);
}

fn halt() -> ! {
    loop {
        cortex_m::asm::wfi();
    }
}

#[entry]
fn main() -> ! {
    disable_watchdog();
    configure_led();

    let config = PitConfig::new().with_bus_clock(BusClock::from_hz(FEI_BUS_HZ));
    let Some(bank) = cortex_m::singleton!(
        : PitBank<'static, Mk20Pit, Mk20Nvic> = PitBank::new(&PIT, &NVIC, config)
    ) else {
        halt()
    };
    let bank: &'static PitBank<'static, Mk20Pit, Mk20Nvic> = bank;

    if bank.bind(&PIT_VECTORS).is_err() {
        halt();
    }

    let (Ok(blink), Ok(heartbeat)) = (bank.channel(ChannelId::CH0), bank.channel(ChannelId::CH1))
    else {
        halt()
    };

    if blink.set_frequency(4.0).is_err() {
        halt();
    }
    blink.start(toggle_led);

    heartbeat.set_period(0.001);
    heartbeat.start(tick);

    loop {
        cortex_m::asm::wfi();
    }
}
