use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tracing::info;

use pom_release::config;
use pom_release::logging::{self, LogOptions};
use pom_release::reactor::load_reactor;
use pom_release::release::{DocumentStore, DryRunStore, FsDocumentStore, PomUpdater, UpdateResult};

#[derive(Parser)]
#[command(name = "pom-release")]
#[command(version, about = "Rewrite POM versions for a multi-module Maven release")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log filter used when POM_RELEASE_LOG is not set
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Also write logs to the data directory
    #[arg(long, global = true)]
    log_to_file: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Bump every module listed in the manifest to its release version
    Update {
        /// Reactor manifest (JSON)
        manifest: PathBuf,

        /// Report what would change without writing any POM
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let _guard = logging::init(&LogOptions {
        level: cli.log_level,
        json: cli.log_json,
        file: cli.log_to_file.then(config::log_path),
    })?;

    match cli.command {
        Command::Update { manifest, dry_run } => {
            if dry_run {
                update(&manifest, &DryRunStore)
            } else {
                update(&manifest, &FsDocumentStore)
            }
        }
    }
}

fn update<S: DocumentStore>(manifest: &Path, store: &S) -> anyhow::Result<()> {
    let (reactor, release_config) = load_reactor(manifest)
        .with_context(|| format!("Failed to load reactor from {:?}", manifest))?;
    info!("Updating {} modules", reactor.len());

    let result = PomUpdater::new(&reactor, store, &release_config).update_versions();
    report(&result);

    if let Some(fatal) = result.fatal {
        return Err(fatal).context("Version update aborted");
    }
    if !result.validation_errors.is_empty() {
        bail!(
            "Cannot release with references to snapshot dependencies ({} found)",
            result.validation_errors.len()
        );
    }
    Ok(())
}

fn report(result: &UpdateResult) {
    for path in &result.changed_files {
        println!("{}", path.display());
    }
    if !result.validation_errors.is_empty() {
        eprintln!("Cannot release with references to snapshot dependencies:");
        for error in &result.validation_errors {
            eprintln!(" * {}", error);
        }
    }
}
