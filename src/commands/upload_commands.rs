//! `upload` subcommand

use std::time::Duration;

use crate::canvas::CanvasClient;
use crate::config::Config;
use crate::dataset::Dataset;
use crate::upload::{UploadSummary, Uploader};
use crate::Result;

/// Read the configured CSV export and overwrite each listed file in Canvas.
pub async fn run_upload(config: &Config) -> Result<UploadSummary> {
    let client = CanvasClient::new(&config.canvas)?;
    let dataset = Dataset::from_path(&config.upload.csv_file)?;
    log::info!(
        "Loaded {} rows from {}",
        dataset.len(),
        config.upload.csv_file.display()
    );

    Uploader::new(
        &client,
        &config.upload,
        Duration::from_millis(config.row_delay_ms),
    )
    .run(&dataset)
    .await
}
