use core::convert::Infallible;

use derive_more::derive::{Display, Error};
use embedded_hal::digital::{self, ErrorKind};

use crate::wire::Wire;

/// A specialized `Result` where the error is this crate's `Error` type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Define a unified error type for this crate.
///
/// Pin errors differ from HAL to HAL, so a failed write is reduced to the line that failed and
/// the [`ErrorKind`] its HAL reported. That keeps `Error` free of type parameters.
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Driving one of the three serial lines failed.
    #[display("Error driving the {wire} line: {kind}")]
    Wire {
        /// The line whose write failed.
        wire: Wire,
        /// What the HAL reported.
        kind: ErrorKind,
    },

    /// A logical pin index past the end of the chain.
    #[display("Pin {pin} is out of range for a chain of {pin_count} pins")]
    PinOutOfRange {
        /// The requested pin.
        pin: usize,
        /// Number of pins in the chain (`8 * N`).
        pin_count: usize,
    },

    /// A chip index past the end of the chain.
    #[display("Chip {chip} is out of range for a chain of {chip_count} chips")]
    ChipOutOfRange {
        /// The requested chip.
        chip: usize,
        /// Number of chips in the chain (`N`).
        chip_count: usize,
    },
}

impl Error {
    /// Adapter for `map_err` that tags a HAL pin error with the line it came from.
    pub(crate) fn wire<E: digital::Error>(wire: Wire) -> impl FnOnce(E) -> Self {
        move |err| Self::Wire {
            wire,
            kind: err.kind(),
        }
    }
}

impl From<Infallible> for Error {
    fn from(never: Infallible) -> Self {
        match never {}
    }
}
