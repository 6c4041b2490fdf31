use crate::config::ConfigStore;
use crate::pipeline::import::COMMIT_MESSAGE;
use crate::{import_csv, ImportOptions, ScopeResolution, UniquenessScope};
use anyhow::{Context, Result};
use std::fs::File;
use tracing::info;

use super::{ImportArgs, Runtime};

pub(crate) fn run_import(runtime: &mut Runtime, args: ImportArgs) -> Result<()> {
    let csv_file = File::open(&args.csv)
        .with_context(|| format!("CSV file not found or not readable: {}", args.csv.display()))?;

    let before = runtime.store.load()?;
    let mut tree = before.clone();

    let options = ImportOptions {
        allow_in_range: args.allow,
        resolution: match args.interface {
            Some(iface) => ScopeResolution::Fixed(iface),
            None => ScopeResolution::BySubnet,
        },
        uniqueness: if args.global_unique {
            UniquenessScope::Global
        } else {
            UniquenessScope::Interface
        },
    };

    info!(
        "Starting DHCP static mapping import from {}",
        args.csv.display()
    );
    let report = import_csv(&mut tree, csv_file, &options)?;
    let added = report.success_count();

    let committed = runtime.commit(&before, &tree, COMMIT_MESSAGE, added > 0, args.dry_run)?;

    if committed {
        println!("Successfully added {} new DHCP reservations.", added);
    } else if args.dry_run && added > 0 {
        println!("Would add {} new DHCP reservations.", added);
    } else if added == 0 {
        println!("No new DHCP reservations to add.");
    }

    if report.skip_count() > 0 {
        println!(
            "Skipped {} entries due to duplicates or errors.",
            report.skip_count()
        );
    }

    Ok(())
}
