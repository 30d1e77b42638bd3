/// Define the PIT vector handlers and route them through a dispatch table.
///
/// Each listed handler acknowledges and services its channel through the
/// table. If nothing is bound the handler still clears the hardware flag so
/// the vector cannot storm.
///
/// ```ignore
/// static PIT: Mk20Pit = unsafe { Mk20Pit::new() };
/// static PIT_VECTORS: DispatchTable = DispatchTable::new();
///
/// pit_mk20::bind_pit_interrupts!(PIT, PIT_VECTORS => {
///     pit0_isr: CH0,
///     pit1_isr: CH1,
///     pit2_isr: CH2,
/// });
/// ```
#[macro_export]
macro_rules! bind_pit_interrupts {
    ($pit:path, $table:path => { $( $handler:ident : $channel:ident ),* $(,)? }) => {
        $(
            #[no_mangle]
            pub extern "C" fn $handler() {
                use $crate::pit_core::{ChannelRegisters as _, PitPeripheral as _};

                let id = $crate::pit_core::ChannelId::$channel;
                if !$table.dispatch(id) {
                    $pit.channel(id).clear_interrupt_flag();
                }
            }
        )*
    };
}
