//! `download` subcommand

use std::time::Duration;

use crate::canvas::CanvasClient;
use crate::config::Config;
use crate::dataset::Dataset;
use crate::download::{DownloadSummary, Downloader};
use crate::Result;

/// Read the configured CSV export and download every qualifying file.
pub async fn run_download(config: &Config) -> Result<DownloadSummary> {
    let client = CanvasClient::new(&config.canvas)?;
    let dataset = Dataset::from_path(&config.download.csv_file)?;
    log::info!(
        "Loaded {} rows from {}",
        dataset.len(),
        config.download.csv_file.display()
    );

    Downloader::new(
        &client,
        &config.download,
        Duration::from_millis(config.row_delay_ms),
    )
    .run(&dataset)
    .await
}
