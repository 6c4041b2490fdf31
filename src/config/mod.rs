//! In-memory view of `config.xml` and the DHCP scopes inside it.

use anyhow::{Context, Result};
use std::io::{Read, Write};
use xmltree::{Element, EmitterConfig};

use crate::xml_helpers::{get_child_ci, get_mut_child_ci};
use crate::{InterfaceScope, StaticMapping};

mod extract;
pub mod store;

pub use store::{ConfigStore, XmlFileStore};

/// The full configuration document plus the DHCP scopes extracted from it.
///
/// Pipelines mutate `scopes`; everything else in the document is carried
/// through untouched and the reservations are written back by
/// [`ConfigTree::to_element`].
#[derive(Debug, Clone)]
pub struct ConfigTree {
    root: Element,
    scopes: Vec<InterfaceScope>,
}

impl ConfigTree {
    pub fn parse<R: Read>(reader: R) -> Result<Self> {
        let root = Element::parse(reader).context("Failed to parse XML")?;
        Ok(Self::from_element(root))
    }

    pub fn from_element(root: Element) -> Self {
        let scopes = extract::extract_scopes(&root);
        ConfigTree { root, scopes }
    }

    /// Whether the document has a `<dhcpd>` section at all
    pub fn has_dhcp_config(&self) -> bool {
        get_child_ci(&self.root, "dhcpd").is_some()
    }

    pub fn scopes(&self) -> &[InterfaceScope] {
        &self.scopes
    }

    pub fn scopes_mut(&mut self) -> &mut [InterfaceScope] {
        &mut self.scopes
    }

    pub fn scope(&self, iface: &str) -> Option<&InterfaceScope> {
        self.scopes
            .iter()
            .find(|s| s.iface.eq_ignore_ascii_case(iface))
    }

    pub fn scope_mut(&mut self, iface: &str) -> Option<&mut InterfaceScope> {
        self.scopes
            .iter_mut()
            .find(|s| s.iface.eq_ignore_ascii_case(iface))
    }

    /// Every reservation, interface-then-insertion order
    pub fn all_mappings(&self) -> impl Iterator<Item = &StaticMapping> + Clone {
        self.scopes.iter().flat_map(|s| s.static_maps.iter())
    }

    pub fn mapping_count(&self) -> usize {
        self.scopes.iter().map(|s| s.static_maps.len()).sum()
    }

    /// The document with the current reservations written back into `<dhcpd>`
    pub fn to_element(&self) -> Element {
        let mut root = self.root.clone();
        if let Some(dhcpd) = get_mut_child_ci(&mut root, "dhcpd") {
            for scope in &self.scopes {
                if let Some(iface_elem) = get_mut_child_ci(dhcpd, &scope.iface) {
                    extract::replace_staticmaps(iface_elem, &scope.static_maps);
                }
            }
        }
        root
    }

    /// Serialize the document with human-readable indentation
    pub fn write<W: Write>(&self, writer: W) -> Result<()> {
        write_element(&self.to_element(), writer)
    }
}

pub(crate) fn write_element<W: Write>(root: &Element, writer: W) -> Result<()> {
    let emitter_config = EmitterConfig::new()
        .perform_indent(true)
        .indent_string("  ")
        .write_document_declaration(true);
    root.write_with_config(writer, emitter_config)
        .context("Failed to write XML")
}
