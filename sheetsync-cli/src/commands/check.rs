//! `sheetsync check` — verify credentials and workbook addressing.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use sheetsync_client::GraphTransport;
use sheetsync_core::SyncConfig;
use sheetsync_engine::WorkbookApi;

/// Arguments for `sheetsync check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the JSON target config.
    #[arg(long)]
    pub config: PathBuf,
}

impl CheckArgs {
    pub fn run(self) -> Result<()> {
        let config = SyncConfig::load(&self.config)
            .with_context(|| format!("loading config from {}", self.config.display()))?;
        let transport = GraphTransport::from_config(&config);
        let api = WorkbookApi::new(&transport);

        let worksheets = api
            .list_worksheets()
            .context("listing worksheets (check token, user_id and workbook_path)")?;

        println!(
            "✓ workbook '{}' reachable ({} worksheets)",
            config.workbook_path,
            worksheets.len()
        );
        for worksheet in &worksheets {
            println!("  · {}", worksheet.name);
        }
        Ok(())
    }
}
