//! CLI entrypoint for CxO Council
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use council_application::{
    JobService, NoProgress, ObjectStore, ProcessJobUseCase, ProgressSink, StatusStore,
    SubmitReviewInput, WebhookNotifier, Worker,
};
use council_domain::{JobId, JobStatus, ReviewResult};
use council_infrastructure::{
    ConfigLoader, FileConfig, FsObjectStore, HttpWebhookNotifier, InMemoryJobQueue,
    InMemoryObjectStore, InMemoryStatusStore, OpenRouterGateway,
};
use council_presentation::{
    Cli, Command, ConsoleFormatter, OutputFormat, ProgressReporter, ReviewArgs, SimpleProgress,
};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// How often the CLI polls the status store while the worker runs
const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting CxO Council");

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("failed to load configuration: {}", e))?
    };

    match cli.command {
        Command::ShowConfig => show_config(cli.config.as_ref(), &config),
        Command::Review(args) => review(args, config).await,
    }
}

/// Initialize logging based on verbosity level, optionally teeing to a file
fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    };

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let name = path
                .file_name()
                .context("--log-file must name a file")?;
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}

fn show_config(config_path: Option<&PathBuf>, config: &FileConfig) -> Result<()> {
    ConfigLoader::print_config_sources(config_path);
    println!();

    let issues = config.validate();
    if issues.is_empty() {
        println!("Configuration is valid.");
    } else {
        println!("Configuration issues:");
        for issue in &issues {
            let label = if issue.is_error() { "error" } else { "warning" };
            println!("  [{}] {}", label, issue);
        }
    }

    let key_status = if config.provider.resolve_api_key().is_some() {
        "found"
    } else {
        "missing"
    };
    println!("API key: {}", key_status);
    println!();

    let mut redacted = config.clone();
    if redacted.provider.api_key.is_some() {
        redacted.provider.api_key = Some("********".to_string());
    }
    println!("Effective configuration:\n");
    println!("{}", toml::to_string_pretty(&redacted)?);
    Ok(())
}

async fn review(args: ReviewArgs, config: FileConfig) -> Result<()> {
    let document = tokio::fs::read_to_string(&args.document)
        .await
        .with_context(|| format!("failed to read {}", args.document.display()))?;
    let document_name = args
        .document
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.document.display().to_string());

    let issues = config.validate();
    for issue in issues.iter().filter(|i| !i.is_error()) {
        warn!("config: {}", issue);
    }
    let errors: Vec<String> = issues
        .iter()
        .filter(|i| i.is_error())
        .map(|i| format!("  - {}", i))
        .collect();
    if !errors.is_empty() {
        bail!("invalid configuration:\n{}", errors.join("\n"));
    }

    // === Dependency Injection ===
    let gateway = Arc::new(OpenRouterGateway::from_config(&config.provider)?);
    let objects: Arc<dyn ObjectStore> = match &config.storage.data_dir {
        Some(dir) => Arc::new(FsObjectStore::new(dir)),
        None => Arc::new(InMemoryObjectStore::new()),
    };
    let statuses: Arc<dyn StatusStore> =
        Arc::new(InMemoryStatusStore::new(config.worker.status_ttl()));
    let queue = Arc::new(InMemoryJobQueue::new(config.worker.retry_delay()));
    let webhook: Arc<dyn WebhookNotifier> =
        Arc::new(HttpWebhookNotifier::new(config.webhook.timeout())?);

    let service = JobService::new(objects.clone(), statuses.clone(), queue.clone());
    let dispatcher = Arc::new(ProcessJobUseCase::new(
        gateway,
        objects,
        statuses,
        queue.clone(),
        webhook,
        config.dispatch_params(),
    ));
    let worker = Worker::new(dispatcher, queue.clone());
    let shutdown = worker.shutdown_token();

    let review_config = config.review_config();
    if !args.quiet {
        println!();
        println!("+============================================================+");
        println!("|           CxO Council - Executive Review                   |");
        println!("+============================================================+");
        println!();
        println!("Document: {}", document_name);
        println!(
            "Council: {} -> {}",
            review_config
                .reviewers
                .iter()
                .map(|r| r.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            review_config.synthesizer
        );
        println!(
            "Models: {} (executives), {} (synthesis)",
            review_config.executive_model, review_config.ceo_model
        );
        println!();
    }

    let mut input = SubmitReviewInput::new(document, review_config);
    if let Some(url) = args.webhook {
        input = input.with_webhook(url);
    }
    let job_id = service.submit(input).await?;
    info!("Job {} queued", job_id);

    let observer: Box<dyn ProgressSink> = if args.quiet {
        Box::new(NoProgress)
    } else if std::io::stderr().is_terminal() {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    let wait = async {
        let outcome = wait_for_job(&service, &queue, &job_id).await;
        shutdown.cancel();
        outcome
    };
    let (_, outcome) = tokio::join!(worker.run_with_progress(observer.as_ref()), wait);
    let result = outcome?;

    let output = match args.output {
        OutputFormat::Full => ConsoleFormatter::format(&document_name, &result),
        OutputFormat::Synthesis => ConsoleFormatter::format_synthesis_only(&document_name, &result),
        OutputFormat::Json => ConsoleFormatter::format_json(&result),
    };
    println!("{}", output);

    if !args.no_save {
        let path = synthesis_path(&args.document);
        tokio::fs::write(&path, ConsoleFormatter::synthesis_markdown(&document_name, &result))
            .await
            .with_context(|| format!("failed to write {}", path.display()))?;
        if !args.quiet {
            println!("\nSynthesis saved to: {}", path.display());
        }
    }

    Ok(())
}

/// Poll until the job completes or its message is dead-lettered
async fn wait_for_job(
    service: &JobService,
    queue: &InMemoryJobQueue,
    job_id: &JobId,
) -> Result<ReviewResult> {
    loop {
        tokio::time::sleep(POLL_INTERVAL).await;

        let job = service.get_status(job_id).await?;
        if job.status == JobStatus::Completed {
            return Ok(service.get_result(job_id).await?);
        }

        if let Some(dead) = queue.dead_letter_for(job_id) {
            bail!(
                "review failed after {} attempt(s): {}",
                dead.delivery.attempt,
                job.error.unwrap_or(dead.reason)
            );
        }
    }
}

/// `<stem>-synthesis.md` in the current directory
fn synthesis_path(document: &Path) -> PathBuf {
    let stem = document
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "council".to_string());
    PathBuf::from(format!("{}-synthesis.md", stem))
}
