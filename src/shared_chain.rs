//! A [`ShiftChain`] behind an embassy blocking mutex, for chains reached from more than one
//! task or interrupt handler.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::{Mutex, raw::RawMutex};
use embedded_hal::digital::OutputPin;

use crate::{Result, ShiftChain};

/// A [`ShiftChain`] whose every operation runs under a lock.
///
/// `M` picks the lock: `CriticalSectionRawMutex` when interrupts or the other core touch the
/// chain, `NoopRawMutex` when only tasks of one executor do.
///
/// Each method takes the lock once, so a single call is one complete transmission. Use
/// [`lock`](Self::lock) to make a batch of updates atomic:
///
/// ```
/// use embassy_sync::blocking_mutex::raw::NoopRawMutex;
/// use sipo_chain::{SharedShiftChain, ShiftChain, Wire, WireTrace};
///
/// let trace = WireTrace::<256>::new();
/// let chain: ShiftChain<_, _, _, 1> = ShiftChain::new(
///     trace.pin(Wire::Data),
///     trace.pin(Wire::Clock),
///     trace.pin(Wire::Latch),
/// )?;
/// let shared = SharedShiftChain::<NoopRawMutex, _, _, _, 1>::new(chain);
///
/// shared.lock(|chain| -> sipo_chain::Result<()> {
///     chain.set_no_update(0, true)?;
///     chain.set_no_update(7, true)?;
///     chain.flush()
/// })?;
/// assert_eq!(shared.get_all(), [0b1000_0001]);
/// # Ok::<(), sipo_chain::Error>(())
/// ```
pub struct SharedShiftChain<M: RawMutex, D, C, L, const N: usize>(
    Mutex<M, RefCell<ShiftChain<D, C, L, N>>>,
);

impl<M, D, C, L, const N: usize> SharedShiftChain<M, D, C, L, N>
where
    M: RawMutex,
    D: OutputPin,
    C: OutputPin,
    L: OutputPin,
{
    /// Wraps `chain` so it can be shared through a `static` or a shared reference.
    #[must_use]
    pub const fn new(chain: ShiftChain<D, C, L, N>) -> Self {
        Self(Mutex::new(RefCell::new(chain)))
    }

    /// Runs `f` with exclusive access to the chain.
    ///
    /// # Panics
    ///
    /// Panics if `f` calls back into this `SharedShiftChain`.
    pub fn lock<R>(&self, f: impl FnOnce(&mut ShiftChain<D, C, L, N>) -> R) -> R {
        self.0.lock(|cell| f(&mut *cell.borrow_mut()))
    }

    /// See [`ShiftChain::set`].
    ///
    /// # Errors
    ///
    /// As [`ShiftChain::set`].
    pub fn set(&self, pin: usize, value: bool) -> Result<()> {
        self.lock(|chain| chain.set(pin, value))
    }

    /// See [`ShiftChain::set_no_update`].
    ///
    /// # Errors
    ///
    /// As [`ShiftChain::set_no_update`].
    pub fn set_no_update(&self, pin: usize, value: bool) -> Result<()> {
        self.lock(|chain| chain.set_no_update(pin, value))
    }

    /// See [`ShiftChain::get`].
    ///
    /// # Errors
    ///
    /// As [`ShiftChain::get`].
    pub fn get(&self, pin: usize) -> Result<bool> {
        self.lock(|chain| chain.get(pin))
    }

    /// See [`ShiftChain::toggle`].
    ///
    /// # Errors
    ///
    /// As [`ShiftChain::toggle`].
    pub fn toggle(&self, pin: usize) -> Result<bool> {
        self.lock(|chain| chain.toggle(pin))
    }

    /// See [`ShiftChain::set_all`].
    ///
    /// # Errors
    ///
    /// As [`ShiftChain::set_all`].
    pub fn set_all(&self, chips: &[u8; N]) -> Result<()> {
        self.lock(|chain| chain.set_all(chips))
    }

    /// A copy of every chip's byte. The lock is released before this returns, so the copy may
    /// be stale by the time it is read.
    #[must_use]
    pub fn get_all(&self) -> [u8; N] {
        self.lock(|chain| *chain.get_all())
    }

    /// See [`ShiftChain::set_all_high`].
    ///
    /// # Errors
    ///
    /// As [`ShiftChain::set_all_high`].
    pub fn set_all_high(&self) -> Result<()> {
        self.lock(ShiftChain::set_all_high)
    }

    /// See [`ShiftChain::set_all_low`].
    ///
    /// # Errors
    ///
    /// As [`ShiftChain::set_all_low`].
    pub fn set_all_low(&self) -> Result<()> {
        self.lock(ShiftChain::set_all_low)
    }

    /// See [`ShiftChain::flush`].
    ///
    /// # Errors
    ///
    /// As [`ShiftChain::flush`].
    pub fn flush(&self) -> Result<()> {
        self.lock(ShiftChain::flush)
    }

    /// Takes the chain back out of the lock.
    #[must_use]
    pub fn into_inner(self) -> ShiftChain<D, C, L, N> {
        self.0.into_inner().into_inner()
    }
}
