//! Command-line interface wiring for medication-extractor.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::{config::Settings, pipeline::Pipeline};

pub mod extract;
pub mod lexicon;
pub mod scan;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Clinical note medication extractor", long_about = None)]
pub struct Cli {
    /// Override the concept lexicon CSV.
    #[arg(long, global = true)]
    pub lexicon: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, mut settings: Settings) -> Result<()> {
        if let Some(path) = self.lexicon {
            settings.lexicon_path = path;
        }
        match self.command {
            Commands::Extract(args) => extract::run(args, settings).await,
            Commands::Scan(args) => scan::run(args, settings).await,
            Commands::Lexicon(args) => lexicon::run(args, settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Extract medications from a document or a folder of documents.
    Extract(extract::Args),
    /// Run extraction on inline text or stdin and print JSON.
    Scan(scan::Args),
    /// Inspect the concept lexicon.
    Lexicon(lexicon::Args),
}

/// Build the pipeline from settings on a blocking thread.
pub(crate) async fn load_pipeline(settings: &Settings) -> Result<Pipeline> {
    let settings = settings.clone();
    Ok(tokio::task::spawn_blocking(move || Pipeline::from_settings(&settings)).await?)
}
