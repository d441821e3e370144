//! CLI application for converting bank statements to TSV.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, convert, profiles};

/// Bank statement converter - turn statement PDFs into TSV transaction tables
#[derive(Parser)]
#[command(name = "stmt")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a single statement file
    Convert(convert::ConvertArgs),

    /// Convert multiple statement files
    Batch(batch::BatchArgs),

    /// Inspect the built-in institution profiles
    Profiles(profiles::ProfilesArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Convert(args) => convert::run(args).await,
        Commands::Batch(args) => batch::run(args).await,
        Commands::Profiles(args) => profiles::run(args).await,
    }
}
