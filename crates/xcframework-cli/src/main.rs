//! process-xcframework - copies one platform variant out of an XCFramework
//!
//! Commands:
//! - `process-xcframework extract` - Copy the matching variant into a target directory
//! - `process-xcframework list` - Show the variants an XCFramework carries

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod extract;
mod list;

#[derive(Parser)]
#[command(name = "process-xcframework")]
#[command(author, version, about = "Extract a platform variant from an XCFramework", long_about = None)]
struct Cli {
    /// Log every planned and performed copy step
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy the library, headers and symbols of one variant
    Extract {
        /// Path to the .xcframework directory
        #[arg(long = "xcframework")]
        source: String,

        /// Platform: ios, macos, watchos, tvos, xros, driverkit
        #[arg(short, long)]
        platform: String,

        /// Environment: simulator, maccatalyst
        #[arg(short, long)]
        environment: Option<String>,

        /// Destination directory (created if missing)
        #[arg(short, long)]
        target_path: String,

        /// Print the copy plan without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// List the variants in an XCFramework
    List {
        /// Path to the .xcframework directory
        #[arg(long = "xcframework")]
        source: String,

        /// Print the decoded Info.plist as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Extract {
            source,
            platform,
            environment,
            target_path,
            dry_run,
        } => {
            extract::run(
                &source,
                &platform,
                environment.as_deref(),
                &target_path,
                dry_run,
            )?;
        }
        Commands::List { source, json } => {
            list::run(&source, json)?;
        }
    }

    Ok(())
}
