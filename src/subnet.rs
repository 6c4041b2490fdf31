use anyhow::Result;
use ipnet::Ipv4Net;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

use crate::{InterfaceScope, StaticMapError};

/// Find the first scope, in config order, whose subnet contains `ip`.
///
/// Scopes without a known subnet never match, and neither does anything
/// that is not an IPv4 literal since `<dhcpd>` scopes are IPv4-only.
pub fn find_interface_for_ip<'a>(ip: &str, scopes: &'a [InterfaceScope]) -> Option<&'a str> {
    let ip_addr = Ipv4Addr::from_str(ip).ok()?;

    scopes
        .iter()
        .find(|scope| scope.subnet.is_some_and(|net| net.contains(&ip_addr)))
        .map(|scope| scope.iface.as_str())
}

/// Inclusive range check on the 32-bit form of the addresses.
///
/// IPv6 pools are not supported: any non-IPv4 argument yields `false`.
pub fn is_ip_in_range(ip: &str, range_start: &str, range_end: &str) -> bool {
    let parse = |s: &str| match IpAddr::from_str(s) {
        Ok(IpAddr::V4(v4)) => Some(u32::from(v4)),
        _ => None,
    };

    match (parse(ip), parse(range_start), parse(range_end)) {
        (Some(ip), Some(start), Some(end)) => ip >= start && ip <= end,
        _ => false,
    }
}

/// Normalize an interface address and prefix to its network (192.168.1.1/24 -> 192.168.1.0/24)
pub fn interface_network(ipaddr: &str, prefix: &str) -> Result<Ipv4Net> {
    let ip = Ipv4Addr::from_str(ipaddr)
        .map_err(|_| StaticMapError::InvalidIpAddress(ipaddr.to_string()))?;
    let prefix: u8 = prefix
        .trim()
        .parse()
        .map_err(|_| StaticMapError::InvalidCidr(format!("{}/{}", ipaddr, prefix)))?;
    let net = Ipv4Net::new(ip, prefix)
        .map_err(|_| StaticMapError::InvalidCidr(format!("{}/{}", ipaddr, prefix)))?;
    Ok(net.trunc())
}
