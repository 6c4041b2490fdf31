use anyhow::Result;
use clap::{Parser, Subcommand};
use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::pipeline::{finish, CommitOutcome};
use crate::service::{CommandReloader, NoopReloader, ServiceReloader, DEFAULT_RELOAD_COMMAND};
use crate::{ConfigTree, XmlFileStore};

mod clear;
mod diff;
mod export;
mod import;
mod remove;

pub(crate) struct ImportArgs {
    pub(crate) csv: PathBuf,
    pub(crate) allow: bool,
    pub(crate) interface: Option<String>,
    pub(crate) global_unique: bool,
    pub(crate) dry_run: bool,
}

pub(crate) struct RemoveArgs {
    pub(crate) tokens: Vec<String>,
    pub(crate) dry_run: bool,
}

#[derive(Parser)]
#[command(
    name = "staticmap",
    about = "Import, export and remove ISC DHCP static mappings",
    long_about = "Designed for pfSense/OPNsense config.xml. Mutating commands commit the whole \
                  batch once and then reload the DHCP service.",
    after_help = "Examples:\n  staticmap import ./reservations.csv\n  staticmap import --allow --dry-run ./reservations.csv\n  staticmap export > reservations.csv\n  staticmap remove 192.168.1.50 aa:bb:cc:dd:ee:ff printer1\n  staticmap clear-all --config ./config.xml --no-reload"
)]
struct Cli {
    /// config.xml file path
    #[arg(short, long, global = true, default_value = "/conf/config.xml")]
    config: PathBuf,

    /// Copy the previous config.xml into this directory before each commit
    #[arg(long, global = true)]
    backup_dir: Option<PathBuf>,

    /// Command that restarts the DHCP service after a commit
    #[arg(long, global = true, default_value = DEFAULT_RELOAD_COMMAND)]
    reload_command: String,

    /// Do not restart the DHCP service after a commit
    #[arg(long, global = true)]
    no_reload: bool,

    /// Show per-record debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show warnings and the final summary
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add static mappings from a CSV file (mac,ipaddr,hostname[,description])
    Import {
        /// CSV file; the first row is a header and is ignored
        csv: PathBuf,

        /// Permit addresses inside an interface's dynamic DHCP range
        #[arg(long)]
        allow: bool,

        /// Put every row on this interface instead of matching by subnet
        #[arg(long)]
        interface: Option<String>,

        /// Reject duplicates found on any interface, not just the destination
        #[arg(long)]
        global_unique: bool,

        /// Show the resulting config.xml diff instead of committing
        #[arg(long)]
        dry_run: bool,
    },

    /// Write all static mappings as CSV to standard output (read-only)
    Export,

    /// Remove mappings matching each IP, MAC or hostname given
    Remove {
        /// IP address, MAC address or hostname (detected by shape)
        #[arg(required = true)]
        tokens: Vec<String>,

        /// Show the resulting config.xml diff instead of committing
        #[arg(long)]
        dry_run: bool,
    },

    /// Remove every static mapping from every interface
    ClearAll {
        /// Show the resulting config.xml diff instead of committing
        #[arg(long)]
        dry_run: bool,
    },
}

/// Store and reloader shared by every command
pub(crate) struct Runtime {
    pub(crate) store: XmlFileStore,
    pub(crate) reloader: Box<dyn ServiceReloader>,
}

impl Runtime {
    /// Commit `tree` if it changed, or print what would change on a dry run.
    ///
    /// Returns whether a commit happened.
    pub(crate) fn commit(
        &mut self,
        before: &ConfigTree,
        after: &ConfigTree,
        message: &str,
        changed: bool,
        dry_run: bool,
    ) -> Result<bool> {
        if dry_run {
            if changed {
                print!("{}", diff::config_diff(before, after)?);
            }
            println!("Dry run: no changes written.");
            return Ok(false);
        }

        match finish(
            &mut self.store,
            self.reloader.as_ref(),
            after,
            message,
            changed,
        )? {
            CommitOutcome::Unchanged => Ok(false),
            CommitOutcome::Committed => Ok(true),
            CommitOutcome::ReloadFailed(e) => {
                eprintln!(
                    "Warning: configuration saved but the DHCP service was not reloaded: {:#}",
                    e
                );
                Ok(true)
            }
        }
    }
}

fn init_tracing(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // Already installed when called more than once in-process
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init();
}

pub fn run_with_args<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    init_tracing(cli.verbose, cli.quiet);

    let mut store = XmlFileStore::new(&cli.config);
    if let Some(dir) = &cli.backup_dir {
        store = store.with_backup_dir(dir);
    }
    let reloader: Box<dyn ServiceReloader> = if cli.no_reload {
        Box::new(NoopReloader)
    } else {
        Box::new(CommandReloader::from_command_line(&cli.reload_command)?)
    };
    let mut runtime = Runtime { store, reloader };

    match cli.command {
        Commands::Import {
            csv,
            allow,
            interface,
            global_unique,
            dry_run,
        } => import::run_import(
            &mut runtime,
            ImportArgs {
                csv,
                allow,
                interface,
                global_unique,
                dry_run,
            },
        ),
        Commands::Export => export::run_export(&runtime),
        Commands::Remove { tokens, dry_run } => {
            remove::run_remove(&mut runtime, RemoveArgs { tokens, dry_run })
        }
        Commands::ClearAll { dry_run } => clear::run_clear_all(&mut runtime, dry_run),
    }
}
