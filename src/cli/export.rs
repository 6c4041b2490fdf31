use crate::config::ConfigStore;
use crate::export_csv;
use anyhow::Result;
use std::io;
use tracing::debug;

use super::Runtime;

pub(crate) fn run_export(runtime: &Runtime) -> Result<()> {
    let tree = runtime.store.load()?;
    let rows = export_csv(&tree, io::stdout().lock())?;
    debug!(rows, "exported static mappings");
    Ok(())
}
