use crate::config::ConfigStore;
use crate::pipeline::remove::REMOVE_MESSAGE;
use crate::remove_mappings;
use anyhow::Result;

use super::{RemoveArgs, Runtime};

pub(crate) fn run_remove(runtime: &mut Runtime, args: RemoveArgs) -> Result<()> {
    let before = runtime.store.load()?;
    let mut tree = before.clone();

    let report = remove_mappings(&mut tree, &args.tokens);
    if report.removed.is_empty() {
        println!("No matching DHCP reservations found.");
        return Ok(());
    }

    let committed = runtime.commit(&before, &tree, REMOVE_MESSAGE, true, args.dry_run)?;

    for removed in &report.removed {
        println!(
            "Removed: {} (from interface: {})",
            removed.token, removed.iface
        );
    }
    if committed {
        println!("DHCP changes applied.");
    }

    Ok(())
}
