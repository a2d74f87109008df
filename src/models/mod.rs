//! Domain models for IPv4 range and subnet tools.
//!
//! This module contains the core data structures used throughout the application:
//! - [`Ipv4Net`] and [`PrefixLength`] - IPv4 address math with CIDR notation support
//! - [`AddressRangeSpec`] - One parsed line of range expander input
//! - [`SubnetDescriptor`] - Derived facts about a single network

mod ipv4;
mod range_spec;
mod subnet;

// Re-export public types
pub use ipv4::{
    address_class, address_scope, binary_dotted, block_size, broadcast_address, format_address,
    ip_after_subnet, mask_from_prefix, network_address, parse_address, usable_host_count,
    usable_host_range, wildcard_from_mask, AddressClass, AddressScope, Ipv4Net, PrefixLength,
    MAX_LENGTH,
};
pub use range_spec::{AddressRangeSpec, LineKind};
pub use subnet::SubnetDescriptor;
