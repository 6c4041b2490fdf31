use crate::clear_all;
use crate::config::ConfigStore;
use crate::pipeline::remove::CLEAR_MESSAGE;
use anyhow::Result;
use tracing::debug;

use super::Runtime;

pub(crate) fn run_clear_all(runtime: &mut Runtime, dry_run: bool) -> Result<()> {
    let before = runtime.store.load()?;
    let mut tree = before.clone();

    let report = clear_all(&mut tree)?;
    if report.cleared.is_empty() {
        println!("No static DHCP reservations to remove.");
        return Ok(());
    }

    let committed = runtime.commit(&before, &tree, CLEAR_MESSAGE, true, dry_run)?;

    for cleared in &report.cleared {
        debug!(iface = %cleared.iface, count = cleared.count, "cleared scope");
        println!(
            "Removed all static DHCP reservations from interface: {}",
            cleared.iface
        );
    }
    if committed {
        println!("All static DHCP reservations have been removed and changes applied.");
    }

    Ok(())
}
