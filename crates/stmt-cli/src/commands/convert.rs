//! Convert command - turn a single statement file into TSV.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use stmt_core::{StatementEngine, to_tsv_string, write_tsv_file};

use super::{load_document, load_profile};

/// Arguments for the convert command.
#[derive(Args)]
pub struct ConvertArgs {
    /// Input file (PDF, or text with form-feed page breaks)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: input path with a .tsv extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Institution profile: a built-in name or a profile JSON path
    #[arg(short, long, default_value = "everyday")]
    profile: String,

    /// Write TSV to stdout instead of a file
    #[arg(long)]
    stdout: bool,
}

pub async fn run(args: ConvertArgs) -> anyhow::Result<()> {
    let start = Instant::now();

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let profile = load_profile(&args.profile)?;
    info!("Converting {} with profile {}", args.input.display(), profile.name);

    let doc = load_document(&args.input)?;
    let engine = StatementEngine::new(profile);
    let outcome = engine.process(&doc)?;

    for warning in &outcome.warnings {
        eprintln!("{} {}", style("warning:").yellow(), warning);
    }

    if args.stdout {
        print!("{}", to_tsv_string(&outcome.records)?);
    } else {
        let output_path = args
            .output
            .unwrap_or_else(|| args.input.with_extension("tsv"));
        write_tsv_file(&output_path, &outcome.records)?;
        println!(
            "{} {} transactions written to {}",
            style("✓").green(),
            outcome.records.len(),
            output_path.display()
        );
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
