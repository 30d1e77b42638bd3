//! Interrupt dispatch: callback slots and the vector-to-channel table

use core::cell::Cell;
use critical_section::Mutex;

use crate::channel::ChannelId;
use crate::{PitError, PitResult, MAX_CHANNELS};

/// User code run on each timer fire
pub type Callback = fn();

/// Single-writer, single-reader callback slot.
///
/// Foreground code writes it from `start`; the interrupt vector reads it.
/// Both sides go through a critical section, and the function pointer is
/// copied out before it is called, so the callback itself never runs with
/// interrupts masked.
pub struct CallbackSlot {
    inner: Mutex<Cell<Option<Callback>>>,
}

impl CallbackSlot {
    /// Create an empty slot
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Cell::new(None)),
        }
    }

    /// Replace the stored callback
    pub fn set(&self, callback: Option<Callback>) {
        critical_section::with(|cs| self.inner.borrow(cs).set(callback));
    }

    /// Copy out the stored callback
    pub fn get(&self) -> Option<Callback> {
        critical_section::with(|cs| self.inner.borrow(cs).get())
    }
}

impl Default for CallbackSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// Something a hardware vector can hand a fire to.
pub trait InterruptTarget: Sync {
    /// Handle one fire. Must acknowledge the hardware before doing anything
    /// else.
    fn on_interrupt(&self);
}

type Slot = Mutex<Cell<Option<&'static dyn InterruptTarget>>>;

/// Table mapping a channel id to the instance that services it.
///
/// Vector handlers stay generic: each one calls [`dispatch`](Self::dispatch)
/// with its channel id and the table finds the owner.
///
/// ```ignore
/// static PIT_VECTORS: DispatchTable = DispatchTable::new();
///
/// #[no_mangle]
/// extern "C" fn pit0_isr() {
///     PIT_VECTORS.dispatch(ChannelId::CH0);
/// }
/// ```
pub struct DispatchTable {
    slots: [Slot; MAX_CHANNELS],
}

impl DispatchTable {
    /// Create a table with every slot empty
    pub const fn new() -> Self {
        const EMPTY: Slot = Mutex::new(Cell::new(None));
        Self {
            slots: [EMPTY; MAX_CHANNELS],
        }
    }

    /// Bind a target to a channel.
    ///
    /// Fails if the slot is already taken; unbind first to replace it.
    pub fn register(&self, id: ChannelId, target: &'static dyn InterruptTarget) -> PitResult<()> {
        critical_section::with(|cs| {
            let slot = self.slots[id.as_usize()].borrow(cs);
            if slot.get().is_some() {
                return Err(PitError::AlreadyBound(id));
            }
            slot.set(Some(target));
            Ok(())
        })?;

        debug!("pit{}: bound to dispatch table", id.index());
        Ok(())
    }

    /// Bind several targets at once.
    ///
    /// Either every slot is free and all targets are bound, or nothing is
    /// written and the first taken slot is reported.
    pub fn register_all(
        &self,
        targets: &[(ChannelId, &'static dyn InterruptTarget)],
    ) -> PitResult<()> {
        critical_section::with(|cs| {
            if let Some((id, _)) = targets
                .iter()
                .find(|(id, _)| self.slots[id.as_usize()].borrow(cs).get().is_some())
            {
                return Err(PitError::AlreadyBound(*id));
            }
            for (id, target) in targets {
                self.slots[id.as_usize()].borrow(cs).set(Some(*target));
            }
            Ok(())
        })?;

        for (id, _) in targets {
            debug!("pit{}: bound to dispatch table", id.index());
        }
        Ok(())
    }

    /// Remove whatever is bound to a channel
    pub fn unregister(&self, id: ChannelId) {
        critical_section::with(|cs| self.slots[id.as_usize()].borrow(cs).set(None));
    }

    /// True when a target is bound to the channel
    pub fn is_bound(&self, id: ChannelId) -> bool {
        critical_section::with(|cs| self.slots[id.as_usize()].borrow(cs).get().is_some())
    }

    /// Route one fire to the bound target.
    ///
    /// Returns `false` when nothing is bound. The hardware flag then stays
    /// set; callers on real hardware should mask the line.
    pub fn dispatch(&self, id: ChannelId) -> bool {
        let target = critical_section::with(|cs| self.slots[id.as_usize()].borrow(cs).get());

        match target {
            Some(target) => {
                target.on_interrupt();
                true
            }
            None => {
                warn!("pit{}: fire with nothing bound", id.index());
                false
            }
        }
    }
}

impl Default for DispatchTable {
    fn default() -> Self {
        Self::new()
    }
}
