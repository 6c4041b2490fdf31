use std::net::IpAddr;

/// True iff `s` is six colon-separated two-digit hex octets (any case).
pub fn validate_mac(s: &str) -> bool {
    let mut octets = 0;
    for part in s.split(':') {
        if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
            return false;
        }
        octets += 1;
    }
    octets == 6
}

/// True iff `s` is an IPv4 or IPv6 literal.
pub fn validate_ip(s: &str) -> bool {
    s.parse::<IpAddr>().is_ok()
}

/// Lowercase form used when storing MACs.
pub fn normalize_mac(s: &str) -> String {
    s.to_ascii_lowercase()
}
