//! Read-only facts about one IPv4 network.

use super::ipv4::{
    address_class, address_scope, binary_dotted, block_size, broadcast_address,
    mask_from_prefix, network_address, usable_host_count, usable_host_range, wildcard_from_mask,
    AddressClass, AddressScope, Ipv4Net, PrefixLength,
};
use serde::Serialize;
use std::fmt;
use std::net::Ipv4Addr;

/// Everything a subnet calculator shows for an address and prefix length.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SubnetDescriptor {
    /// Address the descriptor was built from (host bits kept).
    pub address: Ipv4Addr,
    pub network: Ipv4Addr,
    pub broadcast: Ipv4Addr,
    pub mask: Ipv4Addr,
    pub wildcard: Ipv4Addr,
    /// Network in CIDR notation, e.g. `192.168.1.0/24`.
    pub cidr: Ipv4Net,
    pub prefix: PrefixLength,
    pub first_host: Ipv4Addr,
    pub last_host: Ipv4Addr,
    pub total_addresses: u64,
    pub usable_hosts: u64,
    pub class: AddressClass,
    pub scope: AddressScope,
    /// Mask as dotted binary octets.
    pub binary_mask: String,
}

impl SubnetDescriptor {
    /// Derive all facts from an address and prefix length.
    ///
    /// Class and scope describe `address` itself, not the network size.
    pub fn new(address: u32, prefix: PrefixLength) -> SubnetDescriptor {
        let mask = mask_from_prefix(prefix);
        let network = network_address(address, mask);
        let broadcast = broadcast_address(network, mask);
        let (first_host, last_host) = usable_host_range(network, prefix);

        SubnetDescriptor {
            address: Ipv4Addr::from(address),
            network: Ipv4Addr::from(network),
            broadcast: Ipv4Addr::from(broadcast),
            mask: Ipv4Addr::from(mask),
            wildcard: Ipv4Addr::from(wildcard_from_mask(mask)),
            cidr: Ipv4Net::new(Ipv4Addr::from(network), prefix),
            prefix,
            first_host: Ipv4Addr::from(first_host),
            last_host: Ipv4Addr::from(last_host),
            total_addresses: block_size(prefix),
            usable_hosts: usable_host_count(prefix),
            class: address_class(address),
            scope: address_scope(address),
            binary_mask: binary_dotted(mask),
        }
    }

    /// Descriptor of a block, classified by its network address.
    pub fn from_net(net: Ipv4Net) -> SubnetDescriptor {
        SubnetDescriptor::new(u32::from(net.network()), net.prefix)
    }
}

impl fmt::Display for SubnetDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{} - {}] ({} usable, class {}, {})",
            self.cidr,
            self.first_host,
            self.last_host,
            self.usable_hosts,
            self.class,
            self.scope
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_address;

    fn descriptor(addr: &str, len: u8) -> SubnetDescriptor {
        SubnetDescriptor::new(parse_address(addr).unwrap(), PrefixLength::new(len).unwrap())
    }

    #[test]
    fn test_descriptor_slash_24() {
        let d = descriptor("192.168.1.42", 24);
        assert_eq!(d.address, Ipv4Addr::new(192, 168, 1, 42));
        assert_eq!(d.network, Ipv4Addr::new(192, 168, 1, 0));
        assert_eq!(d.broadcast, Ipv4Addr::new(192, 168, 1, 255));
        assert_eq!(d.mask, Ipv4Addr::new(255, 255, 255, 0));
        assert_eq!(d.wildcard, Ipv4Addr::new(0, 0, 0, 255));
        assert_eq!(d.cidr.to_string(), "192.168.1.0/24");
        assert_eq!(d.first_host, Ipv4Addr::new(192, 168, 1, 1));
        assert_eq!(d.last_host, Ipv4Addr::new(192, 168, 1, 254));
        assert_eq!(d.total_addresses, 256);
        assert_eq!(d.usable_hosts, 254);
        assert_eq!(d.class, AddressClass::C);
        assert_eq!(d.scope, AddressScope::Private);
        assert_eq!(d.binary_mask, "11111111.11111111.11111111.00000000");
    }

    #[test]
    fn test_descriptor_point_to_point() {
        let d = descriptor("10.0.0.1", 31);
        assert_eq!(d.first_host, Ipv4Addr::new(10, 0, 0, 0));
        assert_eq!(d.last_host, Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(d.usable_hosts, 2);

        let d = descriptor("10.0.0.1", 32);
        assert_eq!(d.first_host, Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(d.last_host, Ipv4Addr::new(10, 0, 0, 1));
        assert_eq!(d.usable_hosts, 1);
        assert_eq!(d.total_addresses, 1);
    }

    #[test]
    fn test_descriptor_slash_zero() {
        let d = descriptor("8.8.8.8", 0);
        assert_eq!(d.network, Ipv4Addr::new(0, 0, 0, 0));
        assert_eq!(d.broadcast, Ipv4Addr::new(255, 255, 255, 255));
        assert_eq!(d.mask, Ipv4Addr::new(0, 0, 0, 0));
        assert_eq!(d.total_addresses, 4_294_967_296);
        assert_eq!(d.usable_hosts, 4_294_967_294);
        assert_eq!(d.scope, AddressScope::Public);
    }

    #[test]
    fn test_classification_ignores_prefix() {
        // 172.20.0.0/8 has network 172.0.0.0, but the address stays private
        let d = descriptor("172.20.1.1", 8);
        assert_eq!(d.network, Ipv4Addr::new(172, 0, 0, 0));
        assert_eq!(d.scope, AddressScope::Private);
        assert_eq!(d.class, AddressClass::B);
    }

    #[test]
    fn test_descriptor_serializes_as_strings() {
        let d = descriptor("169.254.3.4", 16);
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["network"], "169.254.0.0");
        assert_eq!(json["cidr"], "169.254.0.0/16");
        assert_eq!(json["prefix"], 16);
        assert_eq!(json["scope"], "link-local");
        assert_eq!(json["class"], "B");
    }
}
