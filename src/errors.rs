use thiserror::Error;

#[derive(Error, Debug)]
pub enum StaticMapError {
    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid CIDR notation: {0}")]
    InvalidCidr(String),

    #[error("No DHCP configuration found.")]
    NoDhcpConfig,

    #[error("Interface {0} has no DHCP configuration in config.xml")]
    UnknownInterface(String),

    #[error("Failed to commit configuration to {path}")]
    Persist { path: String },

    #[error("DHCP service reload failed: {0}")]
    ServiceReload(String),
}

/// Why a single CSV row was not imported. Rejections are counted and
/// reported, they never abort the batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("invalid row ({found} columns): {raw}")]
    TooFewColumns { found: usize, raw: String },

    #[error("unreadable row: {0}")]
    Malformed(String),

    #[error("invalid MAC or IP: MAC={mac} IP={ip}")]
    InvalidAddress { mac: String, ip: String },

    #[error("no matching interface found for IP {0}")]
    NoMatchingInterface(String),

    #[error("IP {ip} is outside interface {iface} subnet {cidr}")]
    OutsideSubnet {
        ip: String,
        iface: String,
        cidr: String,
    },

    #[error("IP address {0} is already assigned")]
    DuplicateIp(String),

    #[error("MAC address {0} is already assigned")]
    DuplicateMac(String),

    #[error("hostname {0} is already assigned")]
    DuplicateHostname(String),

    #[error("IP {ip} falls within the DHCP range ({from} - {to}) and --allow was not provided")]
    InPool {
        ip: String,
        from: String,
        to: String,
    },
}
