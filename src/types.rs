use ipnet::Ipv4Net;
use std::net::Ipv4Addr;
use xmltree::Element;

use crate::errors::SkipReason;

/// One DHCP reservation (`<staticmap>`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StaticMapping {
    pub mac: String,
    pub ipaddr: String,
    pub hostname: Option<String>,
    pub descr: Option<String>,
    /// Child elements this tool does not model (cid, gateway, option lists, ...).
    pub extra: Vec<Element>,
}

impl StaticMapping {
    pub fn new(mac: &str, ipaddr: &str, hostname: &str, descr: &str) -> Self {
        StaticMapping {
            mac: mac.to_string(),
            ipaddr: ipaddr.to_string(),
            hostname: non_empty(hostname),
            descr: non_empty(descr),
            extra: Vec::new(),
        }
    }

    /// Hostname, with present-but-empty treated as absent.
    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref().filter(|h| !h.is_empty())
    }

    pub fn descr(&self) -> Option<&str> {
        self.descr.as_deref().filter(|d| !d.is_empty())
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Dynamic allocation pool of a DHCP scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DhcpRange {
    pub from: Ipv4Addr,
    pub to: Ipv4Addr,
}

/// One DHCP-enabled interface (`<dhcpd><IFACE>`) and its reservations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceScope {
    pub iface: String,
    pub subnet: Option<Ipv4Net>,
    pub pool: Option<DhcpRange>,
    pub static_maps: Vec<StaticMapping>,
}

impl InterfaceScope {
    pub fn new(iface: &str) -> Self {
        InterfaceScope {
            iface: iface.to_string(),
            subnet: None,
            pool: None,
            static_maps: Vec::new(),
        }
    }
}

/// How the import pipeline picks the scope a row lands in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ScopeResolution {
    /// Derive the interface from the subnet containing the IP.
    #[default]
    BySubnet,
    /// Always use this interface; the pool check is skipped.
    Fixed(String),
}

/// Which reservations a new record must not collide with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UniquenessScope {
    /// Only the destination interface.
    #[default]
    Interface,
    /// Every interface in the config.
    Global,
}

#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    pub allow_in_range: bool,
    pub resolution: ScopeResolution,
    pub uniqueness: UniquenessScope,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedMapping {
    pub iface: String,
    pub mapping: StaticMapping,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line in the CSV input.
    pub line: u64,
    pub reason: SkipReason,
}

#[derive(Debug, Default)]
pub struct ImportReport {
    pub added: Vec<AddedMapping>,
    pub skipped: Vec<SkippedRow>,
}

impl ImportReport {
    pub fn success_count(&self) -> usize {
        self.added.len()
    }

    pub fn skip_count(&self) -> usize {
        self.skipped.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedMapping {
    pub token: String,
    pub iface: String,
    pub mapping: StaticMapping,
}

#[derive(Debug, Default)]
pub struct RemovalReport {
    pub removed: Vec<RemovedMapping>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearedScope {
    pub iface: String,
    pub count: usize,
}

#[derive(Debug, Default)]
pub struct ClearReport {
    pub cleared: Vec<ClearedScope>,
}

impl ClearReport {
    pub fn total(&self) -> usize {
        self.cleared.iter().map(|c| c.count).sum()
    }
}
