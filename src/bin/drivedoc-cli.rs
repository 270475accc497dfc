//! DriveDoc command line: the same pipeline as the GUI, without a window.

use anyhow::Context;
use clap::{Parser, Subcommand};
use drivedoc_core::model::Blacklist;
use drivedoc_core::pipeline::{self, UpdateOutcome};
use drivedoc_core::store::{
    local, CatalogFormatter, GoogleSheetsClient, RemoteCatalog, DEFAULT_LOCAL_CATALOG,
    DEFAULT_SPREADSHEET_NAME,
};
use drivedoc_core::platform;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "drivedoc-cli")]
#[command(about = "Document the project folders on external drives", long_about = None)]
struct Cli {
    /// Name of the documentation spreadsheet.
    #[arg(long, global = true, default_value = DEFAULT_SPREADSHEET_NAME)]
    spreadsheet: String,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scan drives, merge into the spreadsheet and format it (default)
    Update,
    /// Scan drives and merge into a local JSON file instead
    Local {
        #[arg(long, default_value = DEFAULT_LOCAL_CATALOG)]
        path: PathBuf,
    },
    /// Remove blacklisted drives and folders from the spreadsheet
    ApplyBlacklist,
    /// Recolour the drive-name column
    Format,
    /// Write the catalog as CSV
    ExportCsv {
        #[arg(long)]
        out: PathBuf,
        /// Read from this local JSON file instead of the spreadsheet.
        #[arg(long)]
        from: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let open_remote = || -> anyhow::Result<RemoteCatalog<GoogleSheetsClient>> {
        let client = GoogleSheetsClient::open(&cli.spreadsheet)
            .with_context(|| format!("opening spreadsheet {:?}", cli.spreadsheet))?;
        Ok(RemoteCatalog::new(client))
    };

    match cli.command.unwrap_or(Commands::Update) {
        Commands::Update => {
            let remote = open_remote()?;
            let platform = platform::native();
            match pipeline::run_update(&remote, platform.as_ref(), None)? {
                UpdateOutcome::NothingToUpdate => {
                    info!("No valid drives are found (they may be blacklisted)");
                    info!("Documentation is not updated.");
                }
                UpdateOutcome::Updated { drives, projects } => {
                    info!("Documentation successfully updated: {drives} drive(s), {projects} project(s)");
                }
            }
        }
        Commands::Local { path } => {
            let platform = platform::native();
            let catalog = pipeline::run_local_update(&path, platform.as_ref(), &Blacklist::new())?;
            info!(
                "{}: {} drive(s), {} project(s)",
                path.display(),
                catalog.len(),
                catalog.project_count()
            );
        }
        Commands::ApplyBlacklist => {
            let remote = open_remote()?;
            let blacklist = remote.load_blacklist()?;
            if remote.apply_blacklist_online(&blacklist)? {
                info!("Blacklisted entries removed");
            } else {
                info!("Nothing on the blacklist is documented");
            }
        }
        Commands::Format => {
            let remote = open_remote()?;
            let colored = CatalogFormatter::new(&remote).format_drives_column()?;
            info!("Coloured {colored} drive(s)");
        }
        Commands::ExportCsv { out, from } => {
            let catalog = match from {
                Some(json) => local::load(&json)?,
                None => open_remote()?.fetch_catalog()?,
            };
            local::export_csv(&out, &catalog)
                .with_context(|| format!("exporting to {}", out.display()))?;
            info!("Wrote {} row(s) to {}", catalog.project_count(), out.display());
        }
    }
    Ok(())
}
