//! CLI entry-point for file and folder extraction.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{bail, Context, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument, warn};

use crate::{
    config::Settings,
    data::documents,
    pipeline::{self, BatchSummary},
};

/// Args for the `extract` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Input document or folder of documents.
    #[arg(long, short)]
    pub input: PathBuf,
    /// Output folder; defaults to OUTPUTS_DIR.
    #[arg(long, short)]
    pub output: Option<PathBuf>,
    /// Override the number of concurrent documents.
    #[arg(long)]
    pub workers: Option<usize>,
    /// Descend into sub-folders.
    #[arg(long)]
    pub recursive: bool,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| settings.outputs_dir.clone());
    let workers = args.workers.unwrap_or(settings.workers);

    let (input_root, paths) = if args.input.is_file() {
        let root = args.input.parent().unwrap_or(Path::new("")).to_path_buf();
        (root, vec![args.input.clone()])
    } else if args.input.is_dir() {
        let paths =
            documents::discover(&args.input, &settings.document_extensions, args.recursive);
        (args.input.clone(), paths)
    } else {
        bail!("{} is not a valid file or directory", args.input.display());
    };
    if paths.is_empty() {
        warn!(input = %args.input.display(), "no documents found");
    }

    let pipeline = Arc::new(super::load_pipeline(&settings).await?);
    let (results, summary) = pipeline::process_batch(pipeline, paths.clone(), workers).await;

    let mut write_failures = 0usize;
    for (path, result) in paths.iter().zip(&results) {
        let out = documents::output_path(&output_dir, &input_root, path);
        match documents::write_json(&out, result).await {
            Ok(()) => info!(
                document = %result.document_id,
                medications = result.medications.len(),
                mapped = result.mapped_count(),
                ok = result.is_ok(),
                output = %out.display(),
                "wrote document result"
            ),
            Err(err) => {
                write_failures += 1;
                warn!(document = %result.document_id, %err, "could not write document result");
            }
        }
    }

    write_summary(&output_dir, &summary).await?;
    if write_failures > 0 {
        bail!("{write_failures} document result(s) could not be written");
    }
    Ok(())
}

async fn write_summary(output_dir: &Path, summary: &BatchSummary) -> Result<()> {
    let path = output_dir.join("batch_summary.json");
    documents::write_json(&path, summary)
        .await
        .context("write batch summary")?;
    info!(path = %path.display(), "wrote batch summary");
    Ok(())
}
