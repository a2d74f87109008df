//! Address processing logic.
//!
//! This module contains the two consumers of the address math:
//! - [`expand`] - Expansion of free-form range input into address lists
//! - [`subnet_calc`] - Subnet descriptors with divide and merge views

mod expand;
mod subnet_calc;

// Re-export public functions
pub use expand::{expand_ranges, ExpandOptions, ExpandResult, LineDiagnostic, SortOrder};
pub use subnet_calc::{
    calculate_subnet, calculate_subnet_with, divide_subnet, merge_subnet, CalcMode, DerivedView,
    SubnetCalculation, SubnetOptions,
};
