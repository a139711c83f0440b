//! search-sync: push a site's published posts and pages into its search index.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use search_sync::config::DEFAULT_SITE_CONFIG;
use search_sync::{Dependencies, Settings};
use search_sync_pipeline::loader::DEFAULT_CHUNK_SIZE;
use search_sync_pipeline::{SyncOptions, SyncRunSummary};

#[derive(Parser, Debug)]
#[command(name = "search-sync")]
#[command(about = "Synchronize the site's posts and pages into the search index", long_about = None)]
struct Cli {
    /// Transform the corpus without writing any document
    #[arg(long)]
    dry_run: bool,

    /// Delete and rebuild the index before indexing
    #[arg(long)]
    delete: bool,

    /// Documents per bulk request (default 50, or `chunk_size` from the site config)
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Bulk requests in flight at once
    #[arg(long, default_value = "1")]
    concurrency: usize,

    /// Site config file
    #[arg(long, default_value = DEFAULT_SITE_CONFIG)]
    config: PathBuf,

    /// JSON export of the site corpus
    #[arg(long, default_value = "db.json")]
    corpus: PathBuf,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// One-line rendering of an abort; each error already embeds its cause.
fn abort_message(err: &anyhow::Error) -> String {
    err.to_string()
}

async fn run(cli: &Cli) -> anyhow::Result<SyncRunSummary> {
    let settings = Settings::load(&cli.config).await?;

    let options = SyncOptions {
        dry_run: cli.dry_run,
        reset_index: cli.delete,
        chunk_size: cli
            .chunk_size
            .or(settings.chunk_size)
            .unwrap_or(DEFAULT_CHUNK_SIZE),
        max_concurrent_batches: cli.concurrency.max(1),
        page_layouts: settings.page_layouts.clone(),
    };

    let deps = Dependencies::new(&settings, &cli.corpus)?;
    let summary = deps.orchestrator.run(&settings.index, &options).await?;
    Ok(summary)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    match run(&cli).await {
        Ok(summary) => {
            info!(
                candidates = summary.total_candidates,
                indexed = summary.total_indexed,
                failed = summary.total_failed,
                batches = summary.batches,
                reset = summary.index_was_reset,
                dry_run = summary.dry_run,
                "Sync completed"
            );
            for failure in &summary.failures {
                warn!(
                    document_key = %failure.document_key,
                    status = ?failure.status_code,
                    error = ?failure.error_detail,
                    "Document not indexed"
                );
            }
            if summary.has_failures() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!(error = %abort_message(&e), "Sync aborted");
            ExitCode::FAILURE
        }
    }
}
