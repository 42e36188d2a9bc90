//! A device abstraction for `N` daisy-chained 74HC595 shift registers.
//!
//! See [`ShiftChain`] for usage.

use embedded_hal::digital::OutputPin;

use crate::wire::Wires;
use crate::{Error, Result};

const BITS_PER_CHIP: usize = u8::BITS as usize;

/// Per-pin output control over `N` daisy-chained 74HC595 (SIPO) shift registers.
///
/// The chain keeps one byte per chip. Chip 0 is the chip wired to the controller; bit `b` of its
/// byte is its output `Q<b>`. Logical pin `p` is bit `p % 8` of chip `p / 8`, so a chain of two
/// chips has pins `0..16`.
///
/// Every `set*` operation updates the in-memory bytes and then flushes them to the chips. The
/// `*_no_update` variants only touch memory; call [`flush`](Self::flush) once after a batch of
/// them to pay for a single transmission.
///
/// A flush shifts the bytes out MSB first, last chip first, so that after `8 * N` clocks each
/// byte has travelled down to its own chip. One latch pulse then switches every output at once.
///
/// # Example
///
/// ```
/// use sipo_chain::{ShiftChain, Wire, WireTrace};
///
/// // On hardware these are the HAL's output pins, e.g. `embassy_rp::gpio::Output`.
/// let trace = WireTrace::<512>::new();
/// let (data, clock, latch) = (
///     trace.pin(Wire::Data),
///     trace.pin(Wire::Clock),
///     trace.pin(Wire::Latch),
/// );
///
/// // Two chips, 16 outputs, all driven low by `new`.
/// let mut chain: ShiftChain<_, _, _, 2> = ShiftChain::new(data, clock, latch)?;
///
/// // Light the first output of the second chip.
/// chain.set(8, true)?;
/// assert!(chain.get(8)?);
///
/// // Change several outputs with one transmission.
/// chain.set_no_update(0, true)?;
/// chain.set_no_update(15, true)?;
/// chain.flush()?;
/// assert_eq!(chain.get_all(), &[0b0000_0001, 0b1000_0001]);
/// # Ok::<(), sipo_chain::Error>(())
/// ```
pub struct ShiftChain<D, C, L, const N: usize> {
    wires: Wires<D, C, L>,
    chips: [u8; N],
}

impl<D: OutputPin, C: OutputPin, L: OutputPin, const N: usize> ShiftChain<D, C, L, N> {
    /// Number of chips in the chain.
    pub const CHIP_COUNT: usize = N;
    /// Number of addressable output pins.
    pub const PIN_COUNT: usize = N * BITS_PER_CHIP;

    const CHAIN_IS_NOT_EMPTY: () = assert!(N > 0, "a shift chain needs at least one chip");

    /// Takes the data, clock and latch outputs and resets every chip to all-low.
    ///
    /// The three lines are driven low, then an all-zero frame is flushed so the chips start
    /// in a known state whatever they held before.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Wire`] if a pin write fails.
    pub fn new(data: D, clock: C, latch: L) -> Result<Self> {
        let () = Self::CHAIN_IS_NOT_EMPTY;

        let mut chain = Self {
            wires: Wires::new(data, clock, latch)?,
            chips: [0; N],
        };
        chain.flush()?;

        #[cfg(feature = "defmt")]
        defmt::debug!("shift chain ready: {} chips, {} pins", N, Self::PIN_COUNT);
        Ok(chain)
    }

    /// Sets one output and flushes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PinOutOfRange`] if `pin >= PIN_COUNT`, or [`Error::Wire`] if a pin write
    /// fails.
    pub fn set(&mut self, pin: usize, value: bool) -> Result<()> {
        self.set_no_update(pin, value)?;
        self.flush()
    }

    /// Sets one output in memory only. Call [`flush`](Self::flush) to send it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PinOutOfRange`] if `pin >= PIN_COUNT`.
    pub fn set_no_update(&mut self, pin: usize, value: bool) -> Result<()> {
        let (chip, mask) = self.bit_mut(pin)?;
        if value {
            *chip |= mask;
        } else {
            *chip &= !mask;
        }
        Ok(())
    }

    /// The last value set for `pin`.
    ///
    /// This reads memory, not the chip: after a `*_no_update` call it reports the pending value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PinOutOfRange`] if `pin >= PIN_COUNT`.
    #[expect(
        clippy::integer_division_remainder_used,
        reason = "BITS_PER_CHIP is a non-zero constant; `/` and `%` split a pin into chip and bit."
    )]
    pub fn get(&self, pin: usize) -> Result<bool> {
        let chip = self
            .chips
            .get(pin / BITS_PER_CHIP)
            .ok_or(Error::PinOutOfRange {
                pin,
                pin_count: Self::PIN_COUNT,
            })?;
        Ok((chip >> (pin % BITS_PER_CHIP)) & 1 == 1)
    }

    /// Inverts one output, flushes, and returns its new value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PinOutOfRange`] if `pin >= PIN_COUNT`, or [`Error::Wire`] if a pin write
    /// fails.
    pub fn toggle(&mut self, pin: usize) -> Result<bool> {
        let (chip, mask) = self.bit_mut(pin)?;
        *chip ^= mask;
        let value = *chip & mask != 0;
        self.flush()?;
        Ok(value)
    }

    /// Replaces every chip's byte and flushes once. `chips[0]` is the chip nearest the controller.
    ///
    /// A table in flash works as is: pass a `&'static [u8; N]`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Wire`] if a pin write fails.
    pub fn set_all(&mut self, chips: &[u8; N]) -> Result<()> {
        self.set_all_no_update(chips);
        self.flush()
    }

    /// Replaces every chip's byte in memory only.
    pub fn set_all_no_update(&mut self, chips: &[u8; N]) {
        self.chips = *chips;
    }

    /// Every chip's byte, chip 0 first.
    #[must_use]
    pub const fn get_all(&self) -> &[u8; N] {
        &self.chips
    }

    /// Drives every output high.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Wire`] if a pin write fails.
    pub fn set_all_high(&mut self) -> Result<()> {
        self.set_all(&[u8::MAX; N])
    }

    /// Drives every output low.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Wire`] if a pin write fails.
    pub fn set_all_low(&mut self) -> Result<()> {
        self.set_all(&[0; N])
    }

    /// The byte held for one chip.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChipOutOfRange`] if `chip >= CHIP_COUNT`.
    pub fn chip(&self, chip: usize) -> Result<u8> {
        self.chips
            .get(chip)
            .copied()
            .ok_or(Error::ChipOutOfRange {
                chip,
                chip_count: N,
            })
    }

    /// Replaces one chip's byte and flushes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChipOutOfRange`] if `chip >= CHIP_COUNT`, or [`Error::Wire`] if a pin
    /// write fails.
    pub fn set_chip(&mut self, chip: usize, bits: u8) -> Result<()> {
        self.set_chip_no_update(chip, bits)?;
        self.flush()
    }

    /// Replaces one chip's byte in memory only.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChipOutOfRange`] if `chip >= CHIP_COUNT`.
    pub fn set_chip_no_update(&mut self, chip: usize, bits: u8) -> Result<()> {
        *self.chips.get_mut(chip).ok_or(Error::ChipOutOfRange {
            chip,
            chip_count: N,
        })? = bits;
        Ok(())
    }

    /// Sends every chip's byte down the chain and latches them onto the outputs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Wire`] if a pin write fails. The bytes stay in memory, so a later flush
    /// sends them again.
    pub fn flush(&mut self) -> Result<()> {
        let result = self.transmit();
        #[cfg(feature = "defmt")]
        if let Err(err) = &result {
            defmt::warn!("shift chain flush failed: {}", err);
        }
        result
    }

    /// Number of chips in the chain, same as [`CHIP_COUNT`](Self::CHIP_COUNT).
    #[must_use]
    pub const fn chip_count(&self) -> usize {
        N
    }

    /// Number of addressable output pins, same as [`PIN_COUNT`](Self::PIN_COUNT).
    #[must_use]
    pub const fn pin_count(&self) -> usize {
        Self::PIN_COUNT
    }

    /// Gives the data, clock and latch outputs back. Outputs keep their last latched values.
    #[must_use]
    pub fn release(self) -> (D, C, L) {
        #[cfg(feature = "defmt")]
        defmt::debug!("shift chain released");
        self.wires.release()
    }

    fn transmit(&mut self) -> Result<()> {
        #[cfg(feature = "defmt")]
        defmt::trace!("shift chain flush: {=[u8]:x}", self.chips.as_slice());

        // The first byte in ends up in the last chip.
        for &bits in self.chips.iter().rev() {
            self.wires.shift_out(bits)?;
        }
        self.wires.latch()
    }

    #[expect(
        clippy::integer_division_remainder_used,
        reason = "BITS_PER_CHIP is a non-zero constant; `/` and `%` split a pin into chip and bit."
    )]
    fn bit_mut(&mut self, pin: usize) -> Result<(&mut u8, u8)> {
        let chip = self
            .chips
            .get_mut(pin / BITS_PER_CHIP)
            .ok_or(Error::PinOutOfRange {
                pin,
                pin_count: Self::PIN_COUNT,
            })?;
        Ok((chip, 1u8 << (pin % BITS_PER_CHIP)))
    }
}
