//! Batch command - convert multiple statement files.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error};

use stmt_core::{StatementEngine, write_tsv_file};

use super::{load_document, load_profile};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory (default: next to each input file)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Institution profile: a built-in name or a profile JSON path
    #[arg(short, long, default_value = "everyday")]
    profile: String,

    /// Stop at the first failed file instead of continuing
    #[arg(long)]
    fail_fast: bool,
}

/// Result of converting a single file.
struct ConvertResult {
    path: PathBuf,
    records: usize,
    warnings: usize,
    error: Option<String>,
}

pub async fn run(args: BatchArgs) -> anyhow::Result<()> {
    let start = Instant::now();
    let profile = load_profile(&args.profile)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            matches!(ext.to_lowercase().as_str(), "pdf" | "txt" | "text")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!("{} Found {} files to convert", style("ℹ").blue(), files.len());

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let engine = StatementEngine::new(profile);
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let result = convert_single_file(&path, &engine, &args);
        match result {
            Ok(result) => results.push(result),
            Err(e) => {
                if args.fail_fast {
                    pb.abandon();
                    return Err(e.context(format!("while converting {}", path.display())));
                }
                error!("{}: {}", path.display(), e);
                results.push(ConvertResult {
                    path: path.clone(),
                    records: 0,
                    warnings: 0,
                    error: Some(e.to_string()),
                });
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let converted = results.iter().filter(|r| r.error.is_none()).count();
    let failed = results.len() - converted;
    let records: usize = results.iter().map(|r| r.records).sum();
    let warnings: usize = results.iter().map(|r| r.warnings).sum();

    println!(
        "{} Converted {} files ({} transactions, {} warnings), {} failed",
        style("✓").green(),
        converted,
        records,
        warnings,
        failed
    );
    for result in results.iter().filter(|r| r.error.is_some()) {
        eprintln!(
            "  {} {}: {}",
            style("✗").red(),
            result.path.display(),
            result.error.as_deref().unwrap_or("")
        );
    }

    debug!("Total batch time: {:?}", start.elapsed());

    Ok(())
}

fn convert_single_file(
    path: &PathBuf,
    engine: &StatementEngine,
    args: &BatchArgs,
) -> anyhow::Result<ConvertResult> {
    let doc = load_document(path)?;
    let outcome = engine.process(&doc)?;

    let renamed = path.with_extension("tsv");
    let output_path = match (&args.output_dir, renamed.file_name()) {
        (Some(dir), Some(name)) => dir.join(name),
        _ => renamed,
    };
    write_tsv_file(&output_path, &outcome.records)?;

    Ok(ConvertResult {
        path: path.clone(),
        records: outcome.records.len(),
        warnings: outcome.warnings.len(),
        error: None,
    })
}
