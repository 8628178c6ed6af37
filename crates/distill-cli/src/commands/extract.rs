//! The extract command - run the batch pipeline over a document set.

use crate::cli::ExtractArgs;
use crate::config::Config;
use crate::error::Result;
use crate::observer::ConsoleObserver;
use crate::output::Formatter;
use distill_llm::OllamaProvider;
use distill_pipeline::{BatchScheduler, PipelineConfig};
use distill_store::SqliteStore;
use std::fs;
use std::sync::Arc;
use tracing::debug;

/// Run the extraction pipeline and render the final report.
pub async fn execute_extract(
    args: ExtractArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let spec = config.model_spec(&args.class)?;

    let endpoint = args
        .endpoint
        .unwrap_or_else(|| config.provider.endpoint.clone());
    let model = args.model.unwrap_or_else(|| config.provider.model.clone());
    let store_path = args.store.unwrap_or_else(|| config.store.path.clone());

    println!(
        "{}",
        formatter.info(&format!(
            "Extracting '{}' records from {} (model: {}, batch size: {})",
            spec.name, args.source, model, args.batch_size
        ))
    );
    if args.force {
        println!(
            "{}",
            formatter.warning("Force enabled - reprocessing all files and overwriting cache entries")
        );
    }

    if let Some(parent) = store_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let store = SqliteStore::new(&store_path)?;
    debug!("Cache store at '{}'", store_path.display());

    let provider = OllamaProvider::new(endpoint, model);

    let pipeline_config = PipelineConfig {
        batch_size: args.batch_size,
        extraction_timeout_secs: args.timeout_secs,
        force: args.force,
        ..Default::default()
    };

    let scheduler = BatchScheduler::new(provider, store, spec, pipeline_config)?
        .with_observer(Arc::new(ConsoleObserver::new(formatter.color_enabled())));

    // Ctrl+C stops dispatching new work; in-flight extractions finish or
    // time out and every queued document still gets a terminal outcome.
    let token = scheduler.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });

    let report = scheduler.run(&args.source, args.recursive).await?;

    println!();
    if report.stats.discovered == report.stats.cache_hits {
        println!(
            "{}",
            formatter.success("All files already processed. Use --force to reprocess.")
        );
    }
    println!("{}", formatter.format_report(&report)?);

    Ok(())
}
