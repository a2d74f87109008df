//! Subnet calculation with divide and merge views.

use crate::config::{DEFAULT_MAX_CHILDREN, DEFAULT_MERGE_FLOOR};
use crate::error::AddressError;
use crate::models::{parse_address, Ipv4Net, PrefixLength, SubnetDescriptor};
use serde::Serialize;
use std::net::Ipv4Addr;

/// What to derive on top of the basic descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalcMode {
    Basic,
    /// Split into this many equal children.
    Divide(u32),
    /// Join into the enclosing block one bit shorter.
    Merge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubnetOptions {
    /// Prefixes at or below this are not merged any further.
    pub merge_floor: u8,
    /// Divisions into more children than this are refused.
    pub max_children: u32,
}

impl Default for SubnetOptions {
    fn default() -> Self {
        SubnetOptions {
            merge_floor: DEFAULT_MERGE_FLOOR,
            max_children: DEFAULT_MAX_CHILDREN,
        }
    }
}

/// Derived view requested through [`CalcMode`].
///
/// An impossible division is an empty list and an impossible merge is
/// `Merged(None)`; neither affects the basic descriptor.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "mode", content = "result", rename_all = "lowercase")]
pub enum DerivedView {
    Basic,
    Divided(Vec<SubnetDescriptor>),
    Merged(Option<SubnetDescriptor>),
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SubnetCalculation {
    pub subnet: SubnetDescriptor,
    pub derived: DerivedView,
}

impl SubnetCalculation {
    pub fn children(&self) -> Option<&[SubnetDescriptor]> {
        match &self.derived {
            DerivedView::Divided(children) => Some(children),
            _ => None,
        }
    }

    pub fn supernet(&self) -> Option<&SubnetDescriptor> {
        match &self.derived {
            DerivedView::Merged(supernet) => supernet.as_ref(),
            _ => None,
        }
    }
}

/// Calculate a subnet with the default merge floor.
pub fn calculate_subnet(
    address: &str,
    prefix_length: u32,
    mode: CalcMode,
) -> Result<SubnetCalculation, AddressError> {
    calculate_subnet_with(address, prefix_length, mode, &SubnetOptions::default())
}

/// Calculate a subnet.
///
/// # Returns
/// * `Ok(SubnetCalculation)` - Descriptor plus the requested derived view
/// * `Err` - If the address or prefix length is malformed
pub fn calculate_subnet_with(
    address: &str,
    prefix_length: u32,
    mode: CalcMode,
    options: &SubnetOptions,
) -> Result<SubnetCalculation, AddressError> {
    let addr = parse_address(address)?;
    let prefix = PrefixLength::try_from(prefix_length)?;
    let subnet = SubnetDescriptor::new(addr, prefix);
    log::debug!("calculate_subnet({address}/{prefix}, {mode:?}) -> {subnet}");

    let derived = match mode {
        CalcMode::Basic => DerivedView::Basic,
        CalcMode::Divide(count) => DerivedView::Divided(divide_subnet(
            Ipv4Net::from_network(addr, prefix),
            count,
            options.max_children,
        )),
        CalcMode::Merge => DerivedView::Merged(merge_subnet(
            Ipv4Net::new(Ipv4Addr::from(addr), prefix),
            options.merge_floor,
        )),
    };

    Ok(SubnetCalculation { subnet, derived })
}

/// Split `net` into `count` equal children.
///
/// The block is cut into the next power of two at or above `count` and the
/// first `count` pieces are returned. Empty if `count < 2`, if `count` is
/// above `max_children` or if the children would need a prefix longer than /32.
pub fn divide_subnet(net: Ipv4Net, count: u32, max_children: u32) -> Vec<SubnetDescriptor> {
    if count < 2 {
        log::warn!("Cannot divide {net} into {count} subnets, need at least 2");
        return Vec::new();
    }
    if count > max_children {
        log::warn!("Cannot divide {net} into {count} subnets, limit is {max_children}");
        return Vec::new();
    }
    let Some(split) = count.checked_next_power_of_two() else {
        log::warn!("Cannot divide {net} into {count} subnets, too many");
        return Vec::new();
    };
    let extra_bits = split.trailing_zeros();
    let Some(child_prefix) = net.prefix.checked_add(extra_bits) else {
        log::warn!(
            "Cannot divide {net} into {count} subnets, /{} + {extra_bits} bits exceeds /32",
            net.prefix
        );
        return Vec::new();
    };

    let first_child = Ipv4Net::from_network(u32::from(net.network()), child_prefix);
    std::iter::successors(Some(first_child), Ipv4Net::next)
        .take(count as usize)
        .map(SubnetDescriptor::from_net)
        .collect()
}

/// The supernet one bit shorter than `net`.
///
/// `None` when `net` is already at or below `merge_floor`.
pub fn merge_subnet(net: Ipv4Net, merge_floor: u8) -> Option<SubnetDescriptor> {
    if net.prefix.get() <= merge_floor {
        log::info!("Not merging {net}, prefix is at or below /{merge_floor}");
        return None;
    }
    net.supernet().map(SubnetDescriptor::from_net)
}
