//! One line of range expander input.
//!
//! A line is one of:
//! * a single address (`10.0.0.1`)
//! * a dashed range (`10.0.0.1-10.0.0.9`, or abbreviated `10.0.0.1-9`)
//! * a CIDR block (`10.0.0.0/30`)

use super::ipv4::{format_address, parse_address, Ipv4Net};
use crate::error::AddressError;
use serde::Serialize;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Shape of an input line, decided before any validation.
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    Single,
    Range,
    Cidr,
}

impl LineKind {
    /// A `/` wins over a `-`, everything else is a single address.
    pub fn classify(line: &str) -> LineKind {
        if line.contains('/') {
            LineKind::Cidr
        } else if line.contains('-') {
            LineKind::Range
        } else {
            LineKind::Single
        }
    }
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let kind = match self {
            LineKind::Single => "single",
            LineKind::Range => "range",
            LineKind::Cidr => "cidr",
        };
        write!(f, "{kind}")
    }
}

/// A validated address range. `start <= end` always holds for `Range`, and
/// `Cidr` blocks are stored with their network address.
#[derive(Eq, PartialEq, Debug, Copy, Clone)]
pub enum AddressRangeSpec {
    Single(u32),
    Range { start: u32, end: u32 },
    Cidr(Ipv4Net),
}

impl AddressRangeSpec {
    pub fn parse(line: &str) -> Result<AddressRangeSpec, AddressError> {
        let line = line.trim();
        match LineKind::classify(line) {
            LineKind::Cidr => parse_cidr(line),
            LineKind::Range => parse_range(line),
            LineKind::Single => parse_address(line).map(AddressRangeSpec::Single),
        }
    }

    pub fn kind(&self) -> LineKind {
        match self {
            AddressRangeSpec::Single(_) => LineKind::Single,
            AddressRangeSpec::Range { .. } => LineKind::Range,
            AddressRangeSpec::Cidr(_) => LineKind::Cidr,
        }
    }

    pub fn first(&self) -> u32 {
        match self {
            AddressRangeSpec::Single(addr) => *addr,
            AddressRangeSpec::Range { start, .. } => *start,
            AddressRangeSpec::Cidr(net) => u32::from(net.network()),
        }
    }

    pub fn last(&self) -> u32 {
        match self {
            AddressRangeSpec::Single(addr) => *addr,
            AddressRangeSpec::Range { end, .. } => *end,
            AddressRangeSpec::Cidr(net) => u32::from(net.broadcast()),
        }
    }

    /// Number of addresses the spec expands to; up to 2^32 for `0.0.0.0/0`.
    pub fn count(&self) -> u64 {
        u64::from(self.last() - self.first()) + 1
    }

    /// Lazily walk every address, first to last.
    pub fn iter(&self) -> RangeInclusive<u32> {
        self.first()..=self.last()
    }
}

impl FromStr for AddressRangeSpec {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AddressRangeSpec::parse(s)
    }
}

impl fmt::Display for AddressRangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AddressRangeSpec::Single(addr) => write!(f, "{}", format_address(*addr)),
            AddressRangeSpec::Range { start, end } => {
                write!(f, "{}-{}", format_address(*start), format_address(*end))
            }
            AddressRangeSpec::Cidr(net) => write!(f, "{net}"),
        }
    }
}

/// Parses CIDR notation like "192.168.1.0/24".
fn parse_cidr(line: &str) -> Result<AddressRangeSpec, AddressError> {
    let net: Ipv4Net = line.parse()?;
    Ok(AddressRangeSpec::Cidr(Ipv4Net::from_network(
        u32::from(net.addr),
        net.prefix,
    )))
}

/// Parses a range string like "1.1.1.1-2.2.2.2" or "1.1.1.1-50".
fn parse_range(line: &str) -> Result<AddressRangeSpec, AddressError> {
    let (start_str, end_str) = line
        .split_once('-')
        .ok_or_else(|| AddressError::InvalidAddress(line.to_string()))?;

    let start = parse_address(start_str)?;
    let end = parse_range_end(end_str.trim(), start, line)?;

    if start > end {
        return Err(AddressError::ReversedRange {
            start: format_address(start),
            end: format_address(end),
        });
    }
    Ok(AddressRangeSpec::Range { start, end })
}

/// Parse the end of a range.
///
/// Handles abbreviated forms like "192.168.1.1-50" (implies 192.168.1.50)
/// and full forms like "192.168.1.1-192.168.1.255".
fn parse_range_end(end_str: &str, start: u32, line: &str) -> Result<u32, AddressError> {
    if let Ok(end) = parse_address(end_str) {
        return Ok(end);
    }

    let invalid = || AddressError::InvalidRangeEnd {
        end: end_str.to_string(),
        range: line.to_string(),
    };

    let partial_octets: Vec<u8> = end_str
        .split('.')
        .map(|octet| {
            if octet.is_empty() || octet.len() > 3 || !octet.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            octet.parse::<u8>().map_err(|_| invalid())
        })
        .collect::<Result<Vec<u8>, _>>()?;

    if partial_octets.is_empty() || partial_octets.len() > 3 {
        return Err(invalid());
    }

    let mut end_octets = start.to_be_bytes();
    let start_index = 4 - partial_octets.len();
    end_octets[start_index..].copy_from_slice(&partial_octets);

    Ok(u32::from_be_bytes(end_octets))
}
