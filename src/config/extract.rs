use ipnet::Ipv4Net;
use std::net::Ipv4Addr;
use std::str::FromStr;
use tracing::{debug, warn};
use xmltree::{Element, XMLNode};

use crate::subnet::interface_network;
use crate::xml_helpers::{child_text, get_child_ci, is_named, text_element};
use crate::{DhcpRange, InterfaceScope, StaticMapping};

const MODELLED_FIELDS: [&str; 4] = ["mac", "ipaddr", "hostname", "descr"];

/// IPv4 network of an `<interfaces><IFACE>` entry, if it has a static address
pub(crate) fn interface_subnet(root: &Element, iface: &str) -> Option<Ipv4Net> {
    let iface_elem = get_child_ci(root, "interfaces").and_then(|i| get_child_ci(i, iface))?;
    let ipaddr = child_text(iface_elem, "ipaddr")?;
    let subnet = child_text(iface_elem, "subnet")?;

    if ipaddr.eq_ignore_ascii_case("dhcp") {
        return None;
    }

    match interface_network(&ipaddr, &subnet) {
        Ok(net) => Some(net),
        Err(e) => {
            debug!(iface, "ignoring interface address: {e}");
            None
        }
    }
}

fn scope_pool(iface_elem: &Element) -> Option<DhcpRange> {
    let range = get_child_ci(iface_elem, "range")?;
    let from = child_text(range, "from")?;
    let to = child_text(range, "to")?;

    match (Ipv4Addr::from_str(&from), Ipv4Addr::from_str(&to)) {
        (Ok(from), Ok(to)) => Some(DhcpRange { from, to }),
        _ => {
            warn!(
                iface = %iface_elem.name,
                "ignoring DHCP range {from} - {to}: not an IPv4 range"
            );
            None
        }
    }
}

/// Read one `<staticmap>` element
pub(crate) fn parse_staticmap(staticmap: &Element) -> StaticMapping {
    let extra = staticmap
        .children
        .iter()
        .filter_map(|n| n.as_element())
        .filter(|c| !MODELLED_FIELDS.iter().any(|f| is_named(c, f)))
        .cloned()
        .collect();

    StaticMapping {
        mac: child_text(staticmap, "mac").unwrap_or_default(),
        ipaddr: child_text(staticmap, "ipaddr").unwrap_or_default(),
        hostname: child_text(staticmap, "hostname"),
        descr: child_text(staticmap, "descr"),
        extra,
    }
}

/// Build the `<staticmap>` element for a mapping
pub(crate) fn staticmap_element(mapping: &StaticMapping) -> Element {
    let mut children = vec![
        text_element("mac", &mapping.mac),
        text_element("ipaddr", &mapping.ipaddr),
    ];
    if let Some(hostname) = mapping.hostname() {
        children.push(text_element("hostname", hostname));
    }
    if let Some(descr) = mapping.descr() {
        children.push(text_element("descr", descr));
    }
    children.extend(mapping.extra.iter().cloned());

    let mut staticmap = Element::new("staticmap");
    staticmap.children = children.into_iter().map(XMLNode::Element).collect();
    staticmap
}

/// Extract every `<dhcpd>` interface scope in document order
pub(crate) fn extract_scopes(root: &Element) -> Vec<InterfaceScope> {
    let mut scopes = Vec::new();

    let dhcpd = match get_child_ci(root, "dhcpd") {
        Some(dhcpd) => dhcpd,
        None => return scopes,
    };

    for iface_elem in dhcpd.children.iter().filter_map(|n| n.as_element()) {
        let mut scope = InterfaceScope::new(&iface_elem.name);
        scope.subnet = interface_subnet(root, &iface_elem.name);
        scope.pool = scope_pool(iface_elem);
        scope.static_maps = iface_elem
            .children
            .iter()
            .filter_map(|n| n.as_element())
            .filter(|c| is_named(c, "staticmap"))
            .map(parse_staticmap)
            .collect();

        debug!(
            iface = %scope.iface,
            subnet = ?scope.subnet,
            mappings = scope.static_maps.len(),
            "loaded DHCP scope"
        );
        scopes.push(scope);
    }

    scopes
}

/// Replace the `<staticmap>` children of a scope element in place.
///
/// New entries go where the first existing one was, or at the end.
pub(crate) fn replace_staticmaps(iface_elem: &mut Element, mappings: &[StaticMapping]) {
    let old = std::mem::take(&mut iface_elem.children);
    let mut inserted = false;

    for node in old {
        let is_staticmap = node
            .as_element()
            .map(|e| is_named(e, "staticmap"))
            .unwrap_or(false);
        if !is_staticmap {
            iface_elem.children.push(node);
            continue;
        }
        if !inserted {
            push_staticmaps(iface_elem, mappings);
            inserted = true;
        }
    }

    if !inserted {
        push_staticmaps(iface_elem, mappings);
    }
}

fn push_staticmaps(iface_elem: &mut Element, mappings: &[StaticMapping]) {
    iface_elem.children.extend(
        mappings
            .iter()
            .map(|m| XMLNode::Element(staticmap_element(m))),
    );
}
