//! Driver for daisy-chained 74HC595 serial-in/parallel-out shift registers.
//!
//! Three output pins (data, clock, latch) drive any number of chained chips. Each chip adds
//! eight outputs, addressed as one run of logical pins. See [`ShiftChain`] to get started.
//!
//! Any [`embedded_hal::digital::OutputPin`] works as a line.
//!
//! [`wire_trace`] is part of the public API on purpose and is not behind a feature. Its
//! [`WireTrace`] hands out pins that record their writes, so code built on a [`ShiftChain`] can
//! check the exact bit stream in host tests and doc examples. It is `no_std` and allocation
//! free, and firmware that never names it pays nothing for it.
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

mod error;
mod shared_chain;
mod shift_chain;
mod wire;
pub mod wire_trace;

pub use error::{Error, Result};
pub use shared_chain::SharedShiftChain;
pub use shift_chain::ShiftChain;
pub use wire::Wire;
pub use wire_trace::{TraceError, TracePin, WireEvent, WireTrace};
