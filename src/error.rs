//! Error types for address parsing and subnet calculations.
//!
//! Every variant describes malformed user input. None of them are fatal: the
//! range expander turns them into per-line diagnostics and the subnet
//! calculator returns them instead of a result.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Text is not four dot separated decimal octets in [0, 255].
    #[error("Invalid IPv4 address: '{0}'")]
    InvalidAddress(String),

    /// Prefix length is not a number in [0, 32].
    #[error("Invalid prefix length: '{0}'")]
    InvalidPrefix(String),

    /// Range end lies below its start.
    #[error("Range start {start} is above range end {end}")]
    ReversedRange { start: String, end: String },

    /// Abbreviated range end could not be completed from the start address.
    #[error("Invalid range end '{end}' for range '{range}'")]
    InvalidRangeEnd { end: String, range: String },
}
