use anyhow::{Context, Result};
use std::io::Write;

use crate::config::ConfigTree;

pub const HEADER: [&str; 4] = ["mac", "ipaddr", "hostname", "description"];

/// Write every reservation as CSV, interface-then-insertion order.
///
/// Returns the number of data rows written. Never touches the tree.
pub fn export_csv<W: Write>(tree: &ConfigTree, writer: W) -> Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADER)?;

    let mut rows = 0;
    for mapping in tree.all_mappings() {
        wtr.write_record([
            mapping.mac.as_str(),
            mapping.ipaddr.as_str(),
            mapping.hostname().unwrap_or_default(),
            mapping.descr().unwrap_or_default(),
        ])?;
        rows += 1;
    }

    wtr.flush().context("Failed to write CSV output")?;
    Ok(rows)
}
