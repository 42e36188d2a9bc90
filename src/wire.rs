//! The three-line serial interface of a 74HC595 chain and its bit-level protocol.

use derive_more::derive::Display;
use embedded_hal::digital::{OutputPin, PinState};

use crate::{Error, Result};

/// One of the three lines that drive a shift register chain.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Wire {
    /// Serial data in (`SER`, pin 14 on a 74HC595).
    #[display("data")]
    Data,
    /// Shift register clock (`SRCLK`, pin 11).
    #[display("clock")]
    Clock,
    /// Storage register clock (`RCLK`, pin 12).
    #[display("latch")]
    Latch,
}

/// Owns the data, clock and latch outputs.
pub struct Wires<D, C, L> {
    data: D,
    clock: C,
    latch: L,
}

impl<D: OutputPin, C: OutputPin, L: OutputPin> Wires<D, C, L> {
    /// Takes the three outputs and drives them all low.
    pub fn new(mut data: D, mut clock: C, mut latch: L) -> Result<Self> {
        clock.set_low().map_err(Error::wire(Wire::Clock))?;
        data.set_low().map_err(Error::wire(Wire::Data))?;
        latch.set_low().map_err(Error::wire(Wire::Latch))?;
        Ok(Self { data, clock, latch })
    }

    /// Shifts one byte into the chain, most significant bit first.
    ///
    /// Each bit is placed on the data line and then clocked in on a rising edge. The clock is
    /// left low so the next byte starts from the same state.
    pub fn shift_out(&mut self, byte: u8) -> Result<()> {
        for bit in (0..u8::BITS).rev() {
            let state = PinState::from((byte >> bit) & 1 == 1);
            self.data
                .set_state(state)
                .map_err(Error::wire(Wire::Data))?;
            self.clock.set_high().map_err(Error::wire(Wire::Clock))?;
            self.clock.set_low().map_err(Error::wire(Wire::Clock))?;
        }
        Ok(())
    }

    /// Copies every chip's shift register to its outputs at once.
    pub fn latch(&mut self) -> Result<()> {
        self.latch.set_high().map_err(Error::wire(Wire::Latch))?;
        self.latch.set_low().map_err(Error::wire(Wire::Latch))?;
        Ok(())
    }

    /// Gives the three outputs back as they are.
    pub fn release(self) -> (D, C, L) {
        (self.data, self.clock, self.latch)
    }
}
