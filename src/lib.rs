pub mod cli;
pub mod config;
mod errors;
pub mod pipeline;
pub mod service;
mod subnet;
mod types;
mod unique;
mod validate;
mod xml_helpers;

pub use config::{ConfigStore, ConfigTree, XmlFileStore};
pub use errors::{SkipReason, StaticMapError};
pub use pipeline::export::export_csv;
pub use pipeline::import::import_csv;
pub use pipeline::remove::{clear_all, remove_mappings, Token};
pub use pipeline::{finish, CommitOutcome};
pub use service::{CommandReloader, NoopReloader, ServiceReloader};
pub use subnet::{find_interface_for_ip, interface_network, is_ip_in_range};
pub use types::{
    AddedMapping, ClearReport, ClearedScope, DhcpRange, ImportOptions, ImportReport,
    InterfaceScope, RemovalReport, RemovedMapping, ScopeResolution, SkippedRow, StaticMapping,
    UniquenessScope,
};
pub use unique::{find_collision, hostname_exists, ip_exists, mac_exists};
pub use validate::{normalize_mac, validate_ip, validate_mac};
