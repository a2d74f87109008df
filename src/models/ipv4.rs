//! IPv4 address and CIDR notation utilities.
//!
//! Addresses are handled as plain `u32` values (most significant octet first)
//! and converted to [`Ipv4Addr`] only at the edges. Prefix lengths are wrapped
//! in [`PrefixLength`] so every mask computation below is total.

use crate::error::AddressError;
use itertools::Itertools;
use regex::Regex;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::OnceLock;

/// Maximum length for an IPv4 subnet mask (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Four dot separated groups of one to three ASCII digits.
static DOTTED_DECIMAL_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_dotted_decimal_regex() -> &'static Regex {
    DOTTED_DECIMAL_REGEX.get_or_init(|| {
        Regex::new(r"^([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})\.([0-9]{1,3})$")
            .expect("Invalid Regex")
    })
}

/// Number of leading one-bits in a subnet mask, always within `0..=32`.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PrefixLength(u8);

impl PrefixLength {
    pub const MAX: PrefixLength = PrefixLength(MAX_LENGTH);

    pub fn new(len: u8) -> Result<PrefixLength, AddressError> {
        if len > MAX_LENGTH {
            Err(AddressError::InvalidPrefix(len.to_string()))
        } else {
            Ok(PrefixLength(len))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Longer prefix by `bits`, `None` past /32.
    pub fn checked_add(self, bits: u32) -> Option<PrefixLength> {
        let len = u32::from(self.0).checked_add(bits)?;
        u8::try_from(len).ok().and_then(|len| PrefixLength::new(len).ok())
    }

    /// Shorter prefix by `bits`, `None` below /0.
    pub fn checked_sub(self, bits: u8) -> Option<PrefixLength> {
        self.0.checked_sub(bits).map(PrefixLength)
    }
}

impl TryFrom<u8> for PrefixLength {
    type Error = AddressError;

    fn try_from(len: u8) -> Result<Self, Self::Error> {
        PrefixLength::new(len)
    }
}

impl TryFrom<u32> for PrefixLength {
    type Error = AddressError;

    fn try_from(len: u32) -> Result<Self, Self::Error> {
        u8::try_from(len)
            .map_err(|_| AddressError::InvalidPrefix(len.to_string()))
            .and_then(PrefixLength::new)
    }
}

impl From<PrefixLength> for u8 {
    fn from(prefix: PrefixLength) -> u8 {
        prefix.0
    }
}

impl FromStr for PrefixLength {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // u8::from_str also takes a leading '+', which is not a prefix
        if s.is_empty() || s.len() > 2 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AddressError::InvalidPrefix(s.to_string()));
        }
        let len: u8 = s
            .parse()
            .map_err(|_| AddressError::InvalidPrefix(s.to_string()))?;
        PrefixLength::new(len)
    }
}

impl fmt::Display for PrefixLength {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse dotted decimal text into its 32-bit value.
///
/// Exactly four groups are accepted and every octet must be in `0..=255`;
/// out of range octets are rejected, never clamped.
///
/// # Examples
/// ```
/// use ipv4_range_tools::models::parse_address;
/// assert_eq!(parse_address("10.0.0.1").unwrap(), 0x0A000001);
/// assert!(parse_address("10.0.0.256").is_err());
/// ```
pub fn parse_address(text: &str) -> Result<u32, AddressError> {
    let text = text.trim();
    let invalid = || AddressError::InvalidAddress(text.to_string());

    let captures = get_dotted_decimal_regex()
        .captures(text)
        .ok_or_else(invalid)?;

    let mut value: u32 = 0;
    for group in captures.iter().skip(1) {
        let octet: u32 = group
            .ok_or_else(invalid)?
            .as_str()
            .parse()
            .map_err(|_| invalid())?;
        if octet > 255 {
            return Err(invalid());
        }
        value = (value << 8) | octet;
    }
    Ok(value)
}

/// Format a 32-bit value as dotted decimal.
pub fn format_address(value: u32) -> String {
    (0..4u32)
        .map(|i| (value >> (8 * (3 - i))) & 255)
        .join(".")
}

/// Convert a prefix length to a subnet mask.
///
/// Shifts run on 64 bits so /0 and /32 never shift a `u32` by 32.
///
/// # Examples
/// ```
/// use ipv4_range_tools::models::{mask_from_prefix, PrefixLength};
/// assert_eq!(mask_from_prefix(PrefixLength::new(24).unwrap()), 0xFFFFFF00);
/// ```
pub fn mask_from_prefix(prefix: PrefixLength) -> u32 {
    let right_len = MAX_LENGTH - prefix.get();
    let all_bits = u32::MAX as u64;

    let mask = (all_bits >> right_len) << right_len;

    mask as u32
}

pub fn wildcard_from_mask(mask: u32) -> u32 {
    !mask
}

pub fn network_address(ip: u32, mask: u32) -> u32 {
    ip & mask
}

pub fn broadcast_address(network: u32, mask: u32) -> u32 {
    network | wildcard_from_mask(mask)
}

/// Number of addresses in a block, `2^(32 - prefix)`.
pub fn block_size(prefix: PrefixLength) -> u64 {
    1u64 << (MAX_LENGTH - prefix.get())
}

/// Number of assignable hosts in a block.
///
/// Network and broadcast are excluded, except /31 (point-to-point, both
/// usable) and /32 (single host).
pub fn usable_host_count(prefix: PrefixLength) -> u64 {
    match prefix.get() {
        32 => 1,
        31 => 2,
        _ => block_size(prefix) - 2,
    }
}

/// First and last assignable host of the block starting at `network`.
pub fn usable_host_range(network: u32, prefix: PrefixLength) -> (u32, u32) {
    let broadcast = broadcast_address(network, mask_from_prefix(prefix));
    if prefix.get() >= MAX_LENGTH - 1 {
        (network, broadcast)
    } else {
        (network + 1, broadcast - 1)
    }
}

/// Returns the address following the block that contains `addr`.
///
/// `None` when the block is the last one of the address space.
pub fn ip_after_subnet(addr: u32, prefix: PrefixLength) -> Option<u32> {
    let network_bits = network_address(addr, mask_from_prefix(prefix)) as u64;
    u32::try_from(network_bits + block_size(prefix)).ok()
}

/// Render a 32-bit value as four dot separated binary octets.
pub fn binary_dotted(value: u32) -> String {
    value
        .to_be_bytes()
        .iter()
        .map(|octet| format!("{octet:08b}"))
        .join(".")
}

/// Legacy classful address class, decided by the first octet.
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash, Serialize)]
pub enum AddressClass {
    A,
    B,
    C,
    D,
    E,
}

impl fmt::Display for AddressClass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let class = match self {
            AddressClass::A => "A",
            AddressClass::B => "B",
            AddressClass::C => "C",
            AddressClass::D => "D",
            AddressClass::E => "E",
        };
        write!(f, "{class}")
    }
}

pub fn address_class(addr: u32) -> AddressClass {
    match addr >> 24 {
        0..=127 => AddressClass::A,
        128..=191 => AddressClass::B,
        192..=223 => AddressClass::C,
        224..=239 => AddressClass::D,
        _ => AddressClass::E,
    }
}

/// Reachability scope of an address.
#[derive(Eq, PartialEq, Debug, Copy, Clone, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddressScope {
    Private,
    Loopback,
    LinkLocal,
    Public,
}

impl fmt::Display for AddressScope {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let scope = match self {
            AddressScope::Private => "private",
            AddressScope::Loopback => "loopback",
            AddressScope::LinkLocal => "link-local",
            AddressScope::Public => "public",
        };
        write!(f, "{scope}")
    }
}

/// Classify an address by its leading octets, independent of any prefix.
pub fn address_scope(addr: u32) -> AddressScope {
    let [first, second, _, _] = addr.to_be_bytes();
    match (first, second) {
        (10, _) | (172, 16..=31) | (192, 168) => AddressScope::Private,
        (127, _) => AddressScope::Loopback,
        (169, 254) => AddressScope::LinkLocal,
        _ => AddressScope::Public,
    }
}

/// IPv4 address with CIDR notation support.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct Ipv4Net {
    /// The IPv4 address, not necessarily the network address.
    pub addr: Ipv4Addr,
    /// The prefix length.
    pub prefix: PrefixLength,
}

impl Ipv4Net {
    pub fn new(addr: Ipv4Addr, prefix: PrefixLength) -> Ipv4Net {
        Ipv4Net { addr, prefix }
    }

    /// Block with `addr` masked down to its network address.
    pub fn from_network(addr: u32, prefix: PrefixLength) -> Ipv4Net {
        let network = network_address(addr, mask_from_prefix(prefix));
        Ipv4Net::new(Ipv4Addr::from(network), prefix)
    }

    pub fn mask(&self) -> u32 {
        mask_from_prefix(self.prefix)
    }

    /// Get the lowest (network) address in the subnet.
    pub fn network(&self) -> Ipv4Addr {
        Ipv4Addr::from(network_address(u32::from(self.addr), self.mask()))
    }

    /// Get the highest (broadcast) address in the subnet.
    pub fn broadcast(&self) -> Ipv4Addr {
        let network = network_address(u32::from(self.addr), self.mask());
        Ipv4Addr::from(broadcast_address(network, self.mask()))
    }

    pub fn size(&self) -> u64 {
        block_size(self.prefix)
    }

    /// Check if an IP address is contained within this subnet.
    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        ip >= self.network() && ip <= self.broadcast()
    }

    /// The adjacent block of the same size, `None` past 255.255.255.255.
    pub fn next(&self) -> Option<Ipv4Net> {
        ip_after_subnet(u32::from(self.addr), self.prefix)
            .map(|addr| Ipv4Net::new(Ipv4Addr::from(addr), self.prefix))
    }

    /// The enclosing block one bit shorter, `None` for /0.
    pub fn supernet(&self) -> Option<Ipv4Net> {
        let prefix = self.prefix.checked_sub(1)?;
        Some(Ipv4Net::from_network(u32::from(self.addr), prefix))
    }
}

impl FromStr for Ipv4Net {
    type Err = AddressError;

    /// Parse `a.b.c.d/p`, keeping the host bits of the address.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (addr, prefix) = s
            .split_once('/')
            .ok_or_else(|| AddressError::InvalidPrefix(s.to_string()))?;
        let addr = parse_address(addr)?;
        let prefix: PrefixLength = prefix.parse()?;
        Ok(Ipv4Net::new(Ipv4Addr::from(addr), prefix))
    }
}

impl Serialize for Ipv4Net {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Ipv4Net {
    fn deserialize<D>(deserializer: D) -> Result<Ipv4Net, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse()
            .map_err(|e| de::Error::custom(format!("invalid CIDR format: {s}: {e}")))
    }
}

impl fmt::Display for Ipv4Net {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prefix(len: u8) -> PrefixLength {
        PrefixLength::new(len).unwrap()
    }

    #[test]
    fn test_mask_from_prefix() {
        assert_eq!(mask_from_prefix(prefix(0)), 0x00000000);
        assert_eq!(mask_from_prefix(prefix(8)), 0xFF000000);
        assert_eq!(mask_from_prefix(prefix(16)), 0xFFFF0000);
        assert_eq!(mask_from_prefix(prefix(24)), 0xFFFFFF00);
        assert_eq!(mask_from_prefix(prefix(31)), 0xFFFFFFFE);
        assert_eq!(mask_from_prefix(prefix(32)), 0xFFFFFFFF);
    }

    #[test]
    fn test_prefix_length_bounds() {
        assert!(PrefixLength::new(33).is_err());
        assert!(PrefixLength::try_from(300u32).is_err());
        assert_eq!("0".parse::<PrefixLength>().unwrap().get(), 0);
        assert_eq!(" 32 ".parse::<PrefixLength>().unwrap().get(), 32);
        assert!("33".parse::<PrefixLength>().is_err());
        assert!("+8".parse::<PrefixLength>().is_err());
        assert!("-1".parse::<PrefixLength>().is_err());
        assert!("".parse::<PrefixLength>().is_err());
        assert!("abc".parse::<PrefixLength>().is_err());
        assert_eq!(prefix(30).checked_add(2), Some(prefix(32)));
        assert_eq!(prefix(30).checked_add(3), None);
        assert_eq!(prefix(0).checked_sub(1), None);
    }

    #[test]
    fn test_parse_address() {
        assert_eq!(parse_address("0.0.0.0").unwrap(), 0);
        assert_eq!(parse_address("255.255.255.255").unwrap(), u32::MAX);
        assert_eq!(parse_address("192.168.1.42").unwrap(), 0xC0A8012A);
        assert_eq!(parse_address(" 10.0.0.1\t").unwrap(), 0x0A000001);
    }

    #[test]
    fn test_parse_address_rejects_malformed() {
        for text in [
            "",
            "10.0.0",
            "10.0.0.0.1",
            "10.0.0.256",
            "10.0.0.-1",
            "a.b.c.d",
            "10..0.1",
            "10.0.0.1/24",
            "1000.0.0.1",
            "١.٢.٣.٤",
        ] {
            assert_eq!(
                parse_address(text),
                Err(AddressError::InvalidAddress(text.trim().to_string())),
                "'{text}' should be rejected"
            );
        }
    }

    #[test]
    fn test_format_address() {
        assert_eq!(format_address(0), "0.0.0.0");
        assert_eq!(format_address(u32::MAX), "255.255.255.255");
        assert_eq!(format_address(0xC0A8012A), "192.168.1.42");
        assert_eq!(format_address(0x0A00000A), "10.0.0.10");
    }

    #[test]
    fn test_network_address() {
        let ip = parse_address("192.168.1.42").unwrap();
        assert_eq!(
            format_address(network_address(ip, mask_from_prefix(prefix(24)))),
            "192.168.1.0"
        );
        assert_eq!(
            format_address(network_address(ip, mask_from_prefix(prefix(16)))),
            "192.168.0.0"
        );
        assert_eq!(
            format_address(network_address(ip, mask_from_prefix(prefix(8)))),
            "192.0.0.0"
        );
        assert_eq!(network_address(ip, mask_from_prefix(prefix(32))), ip);
        assert_eq!(network_address(ip, mask_from_prefix(prefix(0))), 0);
    }

    #[test]
    fn test_broadcast_address() {
        let ip = parse_address("192.168.1.0").unwrap();
        let broadcast = |len| {
            let mask = mask_from_prefix(prefix(len));
            format_address(broadcast_address(network_address(ip, mask), mask))
        };
        assert_eq!(broadcast(24), "192.168.1.255");
        assert_eq!(broadcast(16), "192.168.255.255");
        assert_eq!(broadcast(8), "192.255.255.255");
        assert_eq!(broadcast(32), "192.168.1.0");
        assert_eq!(broadcast(0), "255.255.255.255");
    }

    #[test]
    fn test_wildcard_from_mask() {
        assert_eq!(wildcard_from_mask(0xFFFFFF00), 0x000000FF);
        assert_eq!(wildcard_from_mask(0), u32::MAX);
        assert_eq!(wildcard_from_mask(u32::MAX), 0);
    }

    #[test]
    fn test_block_size_and_usable_hosts() {
        assert_eq!(block_size(prefix(0)), 4_294_967_296);
        assert_eq!(block_size(prefix(24)), 256);
        assert_eq!(block_size(prefix(32)), 1);
        assert_eq!(usable_host_count(prefix(0)), 4_294_967_294);
        assert_eq!(usable_host_count(prefix(24)), 254);
        assert_eq!(usable_host_count(prefix(30)), 2);
        assert_eq!(usable_host_count(prefix(31)), 2);
        assert_eq!(usable_host_count(prefix(32)), 1);
    }

    #[test]
    fn test_usable_host_range() {
        let network = parse_address("10.0.0.0").unwrap();
        let (first, last) = usable_host_range(network, prefix(24));
        assert_eq!(format_address(first), "10.0.0.1");
        assert_eq!(format_address(last), "10.0.0.254");

        let (first, last) = usable_host_range(network, prefix(31));
        assert_eq!(format_address(first), "10.0.0.0");
        assert_eq!(format_address(last), "10.0.0.1");

        let (first, last) = usable_host_range(network, prefix(32));
        assert_eq!(first, network);
        assert_eq!(last, network);
    }

    #[test]
    fn test_ip_after_subnet() {
        let ip = parse_address("192.168.1.0").unwrap();
        let after = |len| ip_after_subnet(ip, prefix(len)).map(format_address);
        assert_eq!(after(24).as_deref(), Some("192.168.2.0"));
        assert_eq!(after(16).as_deref(), Some("192.169.0.0"));
        assert_eq!(after(8).as_deref(), Some("193.0.0.0"));
        assert_eq!(after(32).as_deref(), Some("192.168.1.1"));
        assert_eq!(ip_after_subnet(u32::MAX, prefix(24)), None);
        assert_eq!(ip_after_subnet(0, prefix(0)), None);
    }

    #[test]
    fn test_binary_dotted() {
        assert_eq!(
            binary_dotted(0xFFFFFF00),
            "11111111.11111111.11111111.00000000"
        );
        assert_eq!(
            binary_dotted(0),
            "00000000.00000000.00000000.00000000"
        );
    }

    #[test]
    fn test_address_class() {
        let class = |s| address_class(parse_address(s).unwrap());
        assert_eq!(class("0.0.0.0"), AddressClass::A);
        assert_eq!(class("127.255.255.255"), AddressClass::A);
        assert_eq!(class("128.0.0.0"), AddressClass::B);
        assert_eq!(class("191.255.0.1"), AddressClass::B);
        assert_eq!(class("192.0.0.1"), AddressClass::C);
        assert_eq!(class("223.1.1.1"), AddressClass::C);
        assert_eq!(class("224.0.0.1"), AddressClass::D);
        assert_eq!(class("239.255.255.250"), AddressClass::D);
        assert_eq!(class("240.0.0.1"), AddressClass::E);
        assert_eq!(class("255.255.255.255"), AddressClass::E);
    }

    #[test]
    fn test_address_scope() {
        let scope = |s| address_scope(parse_address(s).unwrap());
        assert_eq!(scope("10.1.2.3"), AddressScope::Private);
        assert_eq!(scope("172.16.0.1"), AddressScope::Private);
        assert_eq!(scope("172.31.255.255"), AddressScope::Private);
        assert_eq!(scope("172.32.0.1"), AddressScope::Public);
        assert_eq!(scope("192.168.1.1"), AddressScope::Private);
        assert_eq!(scope("127.0.0.1"), AddressScope::Loopback);
        assert_eq!(scope("169.254.10.20"), AddressScope::LinkLocal);
        assert_eq!(scope("8.8.8.8"), AddressScope::Public);
        assert_eq!(AddressScope::LinkLocal.to_string(), "link-local");
    }

    #[test]
    fn test_ipv4_net_parse_and_display() {
        let net: Ipv4Net = "10.2.3.4/16".parse().unwrap();
        assert_eq!(net.addr, Ipv4Addr::new(10, 2, 3, 4));
        assert_eq!(net.prefix.get(), 16);
        assert_eq!(net.to_string(), "10.2.3.4/16");
        assert_eq!(net.network(), Ipv4Addr::new(10, 2, 0, 0));
        assert_eq!(net.broadcast(), Ipv4Addr::new(10, 2, 255, 255));
        assert_eq!(net.size(), 65536);

        assert!("10.2.3.4".parse::<Ipv4Net>().is_err());
        assert!("10.2.3.4/33".parse::<Ipv4Net>().is_err());
        assert!("10.2.3/8".parse::<Ipv4Net>().is_err());
    }

    #[test]
    fn test_ipv4_net_next() {
        let net: Ipv4Net = "10.1.1.0/28".parse().unwrap();
        assert_eq!(net.next().unwrap().to_string(), "10.1.1.16/28");

        let net: Ipv4Net = "10.1.1.0/29".parse().unwrap();
        let next = net.next().unwrap();
        assert_eq!(next.to_string(), "10.1.1.8/29");
        assert_eq!(next.next().unwrap().to_string(), "10.1.1.16/29");

        let net: Ipv4Net = "10.2.3.4/16".parse().unwrap();
        assert_eq!(net.next().unwrap().to_string(), "10.3.0.0/16");

        let last: Ipv4Net = "255.255.255.0/24".parse().unwrap();
        assert_eq!(last.next(), None);
    }

    #[test]
    fn test_ipv4_net_supernet() {
        let net: Ipv4Net = "10.0.0.128/25".parse().unwrap();
        assert_eq!(net.supernet().unwrap().to_string(), "10.0.0.0/24");
        let net: Ipv4Net = "0.0.0.0/0".parse().unwrap();
        assert_eq!(net.supernet(), None);
    }

    #[test]
    fn test_ipv4_net_contains() {
        let net: Ipv4Net = "10.0.0.0/8".parse().unwrap();
        assert!(net.contains(Ipv4Addr::new(10, 255, 255, 255)));
        assert!(!net.contains(Ipv4Addr::new(11, 0, 0, 0)));
    }

    #[test]
    fn test_ipv4_net_cmp() {
        let ip1: Ipv4Net = "10.0.10.0/24".parse().unwrap();
        let ip2: Ipv4Net = "10.0.0.0/8".parse().unwrap();
        let ip3: Ipv4Net = "10.0.10.64/26".parse().unwrap();

        assert!(ip1 > ip2);
        assert!(ip1 < ip3);
        assert!(ip2 < ip3);
        assert!(ip2.network() < ip1.network());
        assert!(ip2.broadcast() > ip3.broadcast());
    }

    #[test]
    fn test_ipv4_net_serde() {
        let net: Ipv4Net = "192.168.0.0/16".parse().unwrap();
        let json = serde_json::to_string(&net).unwrap();
        assert_eq!(json, "\"192.168.0.0/16\"");
        let back: Ipv4Net = serde_json::from_str(&json).unwrap();
        assert_eq!(back, net);
        assert!(serde_json::from_str::<Ipv4Net>("\"192.168.0.0/40\"").is_err());
    }
}
