//! IPv4 address math, range expansion and subnet calculation.
//!
//! - [`models`] - address/prefix conversions and the data types built on them
//! - [`processing`] - [`expand_ranges`] and [`calculate_subnet`]
//! - [`output`] - terminal and CSV rendering
//! - [`cmd`] - the command line front end
//!
//! All functions are pure: malformed input comes back as [`AddressError`] or
//! an invalid [`LineDiagnostic`], never as a panic.

pub mod cmd;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod processing;

pub use error::AddressError;
pub use models::{
    format_address, mask_from_prefix, parse_address, AddressRangeSpec, Ipv4Net, PrefixLength,
    SubnetDescriptor,
};
pub use processing::{
    calculate_subnet, calculate_subnet_with, expand_ranges, CalcMode, DerivedView,
    ExpandOptions, ExpandResult, LineDiagnostic, SortOrder, SubnetCalculation, SubnetOptions,
};
