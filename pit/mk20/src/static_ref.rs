//! Pointer to a memory-mapped register block

use core::fmt;
use core::ops::Deref;

/// A `'static` reference to a register block at a fixed address.
///
/// Register types are built on `UnsafeCell` and therefore not `Sync`.
/// Every access through them is a single volatile load or store, so sharing
/// the block between thread mode and handler mode is sound on a single core.
pub struct StaticRef<T> {
    ptr: *const T,
}

impl<T> StaticRef<T> {
    /// # Safety
    ///
    /// `ptr` must point at a valid, suitably aligned register block that
    /// lives for the rest of the program.
    pub const unsafe fn new(ptr: *const T) -> StaticRef<T> {
        StaticRef { ptr }
    }
}

impl<T> fmt::Debug for StaticRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StaticRef({:p})", self.ptr)
    }
}

impl<T> Clone for StaticRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StaticRef<T> {}

impl<T> Deref for StaticRef<T> {
    type Target = T;

    fn deref(&self) -> &T {
        unsafe { &*self.ptr }
    }
}

unsafe impl<T> Send for StaticRef<T> {}
unsafe impl<T> Sync for StaticRef<T> {}
