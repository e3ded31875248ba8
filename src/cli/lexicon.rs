//! CLI entry-point for lexicon inspection.

use anyhow::Result;
use clap::Args as ClapArgs;
use serde_json::json;
use tracing::instrument;

use crate::{config::Settings, data::normalize};

/// Args for the `lexicon` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Show how a single term maps instead of table statistics.
    #[arg(long)]
    pub lookup: Option<String>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let pipeline = super::load_pipeline(&settings).await?;
    let lexicon = pipeline.lexicon();
    let report = match args.lookup {
        Some(term) => serde_json::to_value(normalize::lookup(lexicon, &term))?,
        None => json!({
            "source": settings.lexicon_path.display().to_string(),
            "entries": lexicon.len(),
            "brand_names": lexicon.brand_count(),
            "missing_concept_ids": lexicon.missing_concept_ids(),
        }),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
