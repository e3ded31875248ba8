//! CLI entry-point for ad-hoc extraction from inline text or stdin.

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tokio::io::AsyncReadExt;
use tracing::instrument;

use crate::config::Settings;

/// Args for the `scan` sub-command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Text to scan; stdin is read when omitted.
    #[arg(long)]
    pub text: Option<String>,
    /// Identifier echoed in the result.
    #[arg(long, default_value = "stdin")]
    pub document_id: String,
}

#[instrument(skip(args, settings), fields(document_id = %args.document_id))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let text = match args.text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("read stdin")?;
            buf
        }
    };

    let pipeline = super::load_pipeline(&settings).await?;
    let result = pipeline.process_text(&args.document_id, &text);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
