use anyhow::Result;
use tracing::info;

use crate::config::ConfigTree;
use crate::validate::{validate_ip, validate_mac};
use crate::{
    ClearReport, ClearedScope, RemovalReport, RemovedMapping, StaticMapError, StaticMapping,
};

pub const REMOVE_MESSAGE: &str = "Removed static DHCP mappings";
pub const CLEAR_MESSAGE: &str = "Removed all static DHCP reservations";

/// A removal argument, classified by shape: MAC first, then IP, else hostname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Mac(String),
    Ip(String),
    Hostname(String),
}

impl Token {
    pub fn classify(raw: &str) -> Token {
        if validate_mac(raw) {
            Token::Mac(raw.to_string())
        } else if validate_ip(raw) {
            Token::Ip(raw.to_string())
        } else {
            Token::Hostname(raw.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Token::Mac(s) | Token::Ip(s) | Token::Hostname(s) => s,
        }
    }

    pub fn matches(&self, mapping: &StaticMapping) -> bool {
        match self {
            Token::Mac(mac) => mapping.mac.eq_ignore_ascii_case(mac),
            Token::Ip(ip) => mapping.ipaddr == *ip,
            Token::Hostname(name) => mapping
                .hostname()
                .is_some_and(|h| h.eq_ignore_ascii_case(name)),
        }
    }
}

/// Remove every reservation matching any token, across all interfaces.
pub fn remove_mappings<S: AsRef<str>>(tree: &mut ConfigTree, tokens: &[S]) -> RemovalReport {
    let mut report = RemovalReport::default();

    for raw in tokens {
        let token = Token::classify(raw.as_ref());
        for scope in tree.scopes_mut() {
            let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut scope.static_maps)
                .into_iter()
                .partition(|m| token.matches(m));
            scope.static_maps = kept;

            for mapping in removed {
                info!(
                    "Removed: {} (from interface: {})",
                    token.as_str(),
                    scope.iface
                );
                report.removed.push(RemovedMapping {
                    token: token.as_str().to_string(),
                    iface: scope.iface.clone(),
                    mapping,
                });
            }
        }
    }

    report
}

/// Drop every reservation from every interface.
pub fn clear_all(tree: &mut ConfigTree) -> Result<ClearReport> {
    if !tree.has_dhcp_config() {
        return Err(StaticMapError::NoDhcpConfig.into());
    }

    let mut report = ClearReport::default();
    for scope in tree.scopes_mut() {
        if scope.static_maps.is_empty() {
            continue;
        }
        let count = scope.static_maps.len();
        scope.static_maps.clear();
        info!(
            "Removed all static DHCP reservations from interface: {}",
            scope.iface
        );
        report.cleared.push(ClearedScope {
            iface: scope.iface.clone(),
            count,
        });
    }

    Ok(report)
}
