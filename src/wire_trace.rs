//! A simulated three-line interface that records every write, for checking the wire protocol
//! on a host without hardware.
//!
//! All three [`TracePin`]s of one [`WireTrace`] append to the same ordered log, so the log shows
//! the exact interleaving of data, clock and latch edges a real chain would see.
//!
//! The module is public and needs neither `std` nor an allocator, so crates that build on
//! [`ShiftChain`](crate::ShiftChain) can check their own output patterns in host tests.
//!
//! ```
//! use sipo_chain::{ShiftChain, Wire, WireTrace};
//!
//! let trace = WireTrace::<256>::new();
//! let mut chain: ShiftChain<_, _, _, 2> = ShiftChain::new(
//!     trace.pin(Wire::Data),
//!     trace.pin(Wire::Clock),
//!     trace.pin(Wire::Latch),
//! )?;
//! trace.clear();
//!
//! chain.set_all(&[0xAA, 0x55])?;
//! assert_eq!(trace.clocked_bytes().as_slice(), [0x55, 0xAA]);
//! assert_eq!(trace.latch_pulses(), 1);
//! # Ok::<(), sipo_chain::Error>(())
//! ```

use core::cell::{Cell, RefCell};

use derive_more::derive::{Display, Error};
use embedded_hal::digital::{self, ErrorKind, ErrorType, OutputPin, PinState};
use heapless::Vec;

use crate::wire::Wire;

/// One recorded write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireEvent {
    /// The line written to.
    pub wire: Wire,
    /// The level it was driven to.
    pub state: PinState,
}

/// Why a [`TracePin`] write failed.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum TraceError {
    /// The trace already holds `CAP` events.
    #[display("Wire trace is full")]
    Full,
    /// The line was set to fail with [`WireTrace::fail`].
    #[display("Injected fault")]
    Injected,
}

impl digital::Error for TraceError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Ordered log of writes from up to three [`TracePin`]s, holding at most `CAP` events.
#[derive(Debug)]
pub struct WireTrace<const CAP: usize> {
    events: RefCell<Vec<WireEvent, CAP>>,
    fault: Cell<Option<Wire>>,
}

impl<const CAP: usize> WireTrace<CAP> {
    /// An empty trace with no injected fault.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            events: RefCell::new(Vec::new()),
            fault: Cell::new(None),
        }
    }

    /// An output pin that records its writes into this trace as `wire`.
    #[must_use]
    pub const fn pin(&self, wire: Wire) -> TracePin<'_, CAP> {
        TracePin { trace: self, wire }
    }

    /// A copy of every write recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<WireEvent, CAP> {
        self.events.borrow().clone()
    }

    /// Number of writes recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Whether nothing has been recorded since creation or the last [`clear`](Self::clear).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Forgets recorded writes. Line levels are assumed low afterwards, which holds between
    /// operations of a [`ShiftChain`](crate::ShiftChain).
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    /// Makes every later write to `wire` fail with [`TraceError::Injected`]. `None` heals it.
    pub fn fail(&self, wire: Option<Wire>) {
        self.fault.set(wire);
    }

    /// The data level sampled at every rising clock edge, in order.
    #[must_use]
    pub fn clocked_bits(&self) -> Vec<bool, CAP> {
        let mut bits = Vec::new();
        let mut data = PinState::Low;
        let mut clock = PinState::Low;
        for event in self.events.borrow().iter() {
            match event.wire {
                Wire::Data => data = event.state,
                Wire::Clock => {
                    if clock == PinState::Low
                        && event.state == PinState::High
                        && bits.push(data == PinState::High).is_err()
                    {
                        break;
                    }
                    clock = event.state;
                }
                Wire::Latch => {}
            }
        }
        bits
    }

    /// [`clocked_bits`](Self::clocked_bits) grouped into bytes, MSB first. A trailing partial
    /// byte is dropped.
    #[must_use]
    pub fn clocked_bytes(&self) -> Vec<u8, CAP> {
        let mut bytes = Vec::new();
        for chunk in self.clocked_bits().chunks_exact(u8::BITS as usize) {
            let byte = chunk
                .iter()
                .fold(0u8, |acc, &bit| (acc << 1) | u8::from(bit));
            if bytes.push(byte).is_err() {
                break;
            }
        }
        bytes
    }

    /// Number of complete high-then-low pulses on the latch line.
    #[must_use]
    pub fn latch_pulses(&self) -> usize {
        let mut latch = PinState::Low;
        let mut pulses = 0usize;
        for event in self.events.borrow().iter() {
            if event.wire == Wire::Latch {
                if latch == PinState::High && event.state == PinState::Low {
                    pulses = pulses.saturating_add(1);
                }
                latch = event.state;
            }
        }
        pulses
    }

    fn record(&self, wire: Wire, state: PinState) -> Result<(), TraceError> {
        if self.fault.get() == Some(wire) {
            return Err(TraceError::Injected);
        }
        self.events
            .borrow_mut()
            .push(WireEvent { wire, state })
            .map_err(|_| TraceError::Full)
    }
}

impl<const CAP: usize> Default for WireTrace<CAP> {
    fn default() -> Self {
        Self::new()
    }
}

/// Output pin backed by a [`WireTrace`].
#[derive(Debug)]
pub struct TracePin<'a, const CAP: usize> {
    trace: &'a WireTrace<CAP>,
    wire: Wire,
}

impl<const CAP: usize> ErrorType for TracePin<'_, CAP> {
    type Error = TraceError;
}

impl<const CAP: usize> OutputPin for TracePin<'_, CAP> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.trace.record(self.wire, PinState::Low)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.trace.record(self.wire, PinState::High)
    }

    fn set_state(&mut self, state: PinState) -> Result<(), Self::Error> {
        self.trace.record(self.wire, state)
    }
}
