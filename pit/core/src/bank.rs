//! Caller-owned set of channels for one PIT block

use heapless::Vec;

use crate::channel::{ChannelId, TimerChannel};
use crate::config::PitConfig;
use crate::dispatch::{DispatchTable, InterruptTarget};
use crate::regs::{InterruptController, PitPeripheral};
use crate::{PitError, PitResult, MAX_CHANNELS};

/// Every usable channel of a PIT block, indexed by channel id.
///
/// The bank is built once by platform init and passed by reference to the
/// code that needs timers. Reserved channels and channels the backend does
/// not implement are simply absent.
pub struct PitBank<'a, P: PitPeripheral, I: InterruptController> {
    channels: [Option<TimerChannel<'a, P, I>>; MAX_CHANNELS],
    config: PitConfig,
}

impl<'a, P: PitPeripheral, I: InterruptController> PitBank<'a, P, I> {
    /// Construct one channel per non-reserved channel id, in id order.
    pub fn new(pit: &'a P, nvic: &'a I, config: PitConfig) -> Self {
        let channels = core::array::from_fn(|index| {
            let id = ChannelId::new(index as u8).ok()?;
            if config.reserved.contains(id) {
                return None;
            }
            TimerChannel::new(id, pit, nvic, &config).ok()
        });

        Self { channels, config }
    }

    /// Configuration the bank was built with
    pub fn config(&self) -> &PitConfig {
        &self.config
    }

    /// Look up a channel
    pub fn channel(&self, id: ChannelId) -> PitResult<&TimerChannel<'a, P, I>> {
        if self.config.reserved.contains(id) {
            return Err(PitError::Reserved(id));
        }
        self.channels[id.as_usize()]
            .as_ref()
            .ok_or(PitError::InvalidChannel(id.index()))
    }

    /// Iterate over the constructed channels
    pub fn iter(&self) -> impl Iterator<Item = &TimerChannel<'a, P, I>> + '_ {
        self.channels.iter().filter_map(|slot| slot.as_ref())
    }

    /// Ids of the constructed channels
    pub fn available(&self) -> Vec<ChannelId, MAX_CHANNELS> {
        self.iter().map(|channel| channel.id()).collect()
    }

    /// Stop every channel
    pub fn stop_all(&self) {
        for channel in self.iter() {
            channel.stop();
        }
    }
}

impl<P, I> PitBank<'static, P, I>
where
    P: PitPeripheral + 'static,
    I: InterruptController + 'static,
{
    /// Bind every channel to its slot in a dispatch table.
    ///
    /// All or nothing: if any slot is already taken the table is left as it
    /// was and the first taken channel is reported.
    pub fn bind(&'static self, table: &DispatchTable) -> PitResult<()> {
        let targets: Vec<(ChannelId, &'static dyn InterruptTarget), MAX_CHANNELS> = self
            .iter()
            .map(|channel| (channel.id(), channel as &'static dyn InterruptTarget))
            .collect();
        table.register_all(&targets)
    }
}
