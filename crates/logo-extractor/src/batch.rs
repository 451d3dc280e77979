//! Bounded-concurrency fan-out of the site pipeline over a site list.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::stream::{self, StreamExt};

use crate::config::ExtractorConfig;
use crate::processor::{LogoPipeline, ProcessSite};
use crate::source;
use crate::types::{BatchSummary, ExtractError, ExtractResult};

/// Load sites from `input` and extract a logo for each into `output_dir`.
///
/// Fails only when the output directory cannot be created or the input
/// cannot be read; per-site problems are counted in the summary.
pub async fn run(
    input: &Path,
    output_dir: &Path,
    column: &str,
    config: &ExtractorConfig,
) -> ExtractResult<BatchSummary> {
    tokio::fs::create_dir_all(output_dir).await?;

    // Parquet decoding is synchronous; keep it off the async workers.
    let sites = {
        let input = input.to_path_buf();
        let column = column.to_string();
        tokio::task::spawn_blocking(move || source::load_sites(&input, &column))
    }
    .await
    .map_err(|e| ExtractError::SourceLoad {
        path: input.display().to_string(),
        reason: e.to_string(),
    })??;
    tracing::info!("Found {} websites in {}", sites.len(), input.display());

    let pipeline = Arc::new(LogoPipeline::new(config)?);
    Ok(dispatch(sites, output_dir, pipeline, config.max_workers).await)
}

/// Run `processor` over every site with at most `max_workers` in flight.
///
/// Each site runs in its own task, so a panic is contained to that site and
/// counted as aborted.
pub async fn dispatch<P: ProcessSite>(
    sites: Vec<String>,
    output_dir: &Path,
    processor: Arc<P>,
    max_workers: usize,
) -> BatchSummary {
    let output_dir: Arc<PathBuf> = Arc::new(output_dir.to_path_buf());
    let mut summary = BatchSummary {
        total: sites.len(),
        ..BatchSummary::default()
    };

    let results: Vec<_> = stream::iter(sites)
        .map(|site| {
            let processor = Arc::clone(&processor);
            let output_dir = Arc::clone(&output_dir);
            async move {
                let handle = tokio::spawn({
                    let site = site.clone();
                    async move { processor.process(&site, &output_dir).await }
                });
                (site, handle.await)
            }
        })
        .buffer_unordered(max_workers.max(1))
        .collect()
        .await;

    for (site, result) in results {
        match result {
            Ok(outcome) => summary.record(&outcome),
            Err(e) => {
                tracing::error!("Task for {site} aborted: {e}");
                summary.aborted += 1;
            }
        }
    }

    tracing::info!(
        "Batch finished: {} of {} sites produced a logo",
        summary.downloaded,
        summary.total
    );
    summary
}
