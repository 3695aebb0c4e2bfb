use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use log::info;
use std::path::PathBuf;

use ghrelease::commands::{self, prepare::PrepareOptions};
use ghrelease::core::config::InstallEnv;

#[derive(Parser)]
#[clap(name = "ghrelease-installer")]
#[clap(about = "Install a platform specific GitHub release asset for a package")]
#[clap(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Log debug output
    #[clap(short, long, global = true)]
    verbose: bool,
    #[clap(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Default)]
struct TargetArgs {
    /// Platform to install for (defaults to the host, e.g. linux, darwin, win32)
    #[clap(long)]
    platform: Option<String>,
    /// Architecture to install for (defaults to the host, e.g. x64, arm64)
    #[clap(long)]
    arch: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Download and extract the release asset (default)
    Prepare {
        /// Package root containing package.json
        #[clap(long, default_value = ".")]
        manifest_dir: PathBuf,
        /// Directory for the downloaded archive (defaults to the system temp dir)
        #[clap(long)]
        temp_dir: Option<PathBuf>,
        #[clap(flatten)]
        target: TargetArgs,
    },
    /// Print the resolved download URL without downloading
    Url {
        /// Package root containing package.json
        #[clap(long, default_value = ".")]
        manifest_dir: PathBuf,
        #[clap(flatten)]
        target: TargetArgs,
    },
    /// Print the asset directory inside the installed module
    AssetPath {
        #[clap(flatten)]
        target: TargetArgs,
    },
}

fn init_logger(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let command = cli.command.unwrap_or(Commands::Prepare {
        manifest_dir: PathBuf::from("."),
        temp_dir: None,
        target: TargetArgs::default(),
    });

    let result = match command {
        Commands::Prepare {
            manifest_dir,
            temp_dir,
            target,
        } => {
            let options = PrepareOptions {
                package_dir: manifest_dir,
                platform: target.platform,
                arch: target.arch,
            };
            let temp_dir = temp_dir.unwrap_or_else(std::env::temp_dir);
            commands::prepare::prepare(options, temp_dir)
                .map(|report| {
                    info!(
                        "Installed {} into {}",
                        report.location.asset_name,
                        report.extract_dir.display()
                    );
                })
                .map_err(|e| anyhow::anyhow!("{} (while {})", e.source, e.stage))
        }
        Commands::Url {
            manifest_dir,
            target,
        } => commands::url::resolve_location(
            &manifest_dir,
            target.platform.as_deref(),
            target.arch.as_deref(),
        )
        .map(|location| println!("{}", location.url))
        .map_err(|e| anyhow::anyhow!(e)),
        Commands::AssetPath { target } => commands::asset_path::resolve_asset_path(
            &InstallEnv::from_env(),
            target.platform.as_deref(),
            target.arch.as_deref(),
        )
        .map(|path| println!("{}", path.display()))
        .map_err(|e| anyhow::anyhow!(e)),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    Ok(())
}
