//! Output formatting.
//!
//! This module handles formatting of results for the command line:
//! - [`csv`] - CSV output formatting
//! - [`terminal`] - Terminal output with colors

mod csv;
mod terminal;

pub use csv::{diagnostics_csv, escape_csv_field, subnets_csv};
pub use terminal::{
    render_addresses, render_calculation, render_descriptor, render_expand_summary,
};
