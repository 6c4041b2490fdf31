use crate::errors::SkipReason;
use crate::StaticMapping;

/// Exact string match on `ipaddr`.
pub fn ip_exists<'a, I>(ip: &str, mappings: I) -> bool
where
    I: IntoIterator<Item = &'a StaticMapping>,
{
    mappings.into_iter().any(|m| m.ipaddr == ip)
}

/// Case-insensitive match on `mac`.
pub fn mac_exists<'a, I>(mac: &str, mappings: I) -> bool
where
    I: IntoIterator<Item = &'a StaticMapping>,
{
    mappings
        .into_iter()
        .any(|m| m.mac.eq_ignore_ascii_case(mac))
}

/// Case-insensitive match on `hostname`. Empty hostnames never collide.
pub fn hostname_exists<'a, I>(hostname: &str, mappings: I) -> bool
where
    I: IntoIterator<Item = &'a StaticMapping>,
{
    if hostname.is_empty() {
        return false;
    }
    mappings
        .into_iter()
        .filter_map(|m| m.hostname())
        .any(|h| h.eq_ignore_ascii_case(hostname))
}

/// Check a candidate against existing reservations in IP, MAC, hostname
/// order and report the first collision.
pub fn find_collision<'a, I>(candidate: &StaticMapping, mappings: I) -> Option<SkipReason>
where
    I: IntoIterator<Item = &'a StaticMapping> + Clone,
{
    if ip_exists(&candidate.ipaddr, mappings.clone()) {
        return Some(SkipReason::DuplicateIp(candidate.ipaddr.clone()));
    }
    if mac_exists(&candidate.mac, mappings.clone()) {
        return Some(SkipReason::DuplicateMac(candidate.mac.clone()));
    }
    if let Some(hostname) = candidate.hostname() {
        if hostname_exists(hostname, mappings) {
            return Some(SkipReason::DuplicateHostname(hostname.to_string()));
        }
    }
    None
}
