//! The import, export and removal pipelines, plus the single commit that
//! follows a mutating run.

use anyhow::Result;
use tracing::warn;

use crate::config::{ConfigStore, ConfigTree};
use crate::service::ServiceReloader;

pub mod export;
pub mod import;
pub mod remove;

/// What happened after a pipeline finished mutating the tree.
#[derive(Debug)]
pub enum CommitOutcome {
    /// Nothing changed, so nothing was written.
    Unchanged,
    /// The tree was committed and the DHCP service reloaded.
    Committed,
    /// The tree was committed but the reload failed. The change is durable.
    ReloadFailed(anyhow::Error),
}

/// Commit `tree` once and reload the DHCP service, if `changed`.
///
/// A commit failure is returned as an error. A reload failure is not: the
/// configuration is already saved, so it comes back as
/// [`CommitOutcome::ReloadFailed`] for the caller to report.
pub fn finish<S, L>(
    store: &mut S,
    reloader: &L,
    tree: &ConfigTree,
    message: &str,
    changed: bool,
) -> Result<CommitOutcome>
where
    S: ConfigStore + ?Sized,
    L: ServiceReloader + ?Sized,
{
    if !changed {
        return Ok(CommitOutcome::Unchanged);
    }

    store.commit(tree, message)?;

    match reloader.reload_dhcp_service() {
        Ok(()) => Ok(CommitOutcome::Committed),
        Err(e) => {
            warn!("configuration saved but DHCP reload failed: {e:#}");
            Ok(CommitOutcome::ReloadFailed(e))
        }
    }
}
