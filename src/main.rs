//! Pulsehook - Scheduled webhook dispatch service
//!
//! Main entry point for the pulsehook CLI and service.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use pulsehook_config::{Config, ConfigError, ConfigLoader};
use pulsehook_core::Job;
use pulsehook_dispatch::{Dispatcher, DispatcherConfig};
use pulsehook_runloop::{ShutdownSignal, TriggerLoop, TriggerLoopConfig};
use pulsehook_schedule::JobSchedule;
use pulsehook_store::{JobStore, SqliteJobStore};

/// Pulsehook CLI.
#[derive(Parser)]
#[command(name = "pulsehook")]
#[command(about = "Scheduled webhook dispatch service")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the dispatch service in foreground (default)
    Run,

    /// Job administration commands
    Job {
        #[command(subcommand)]
        action: JobAction,
    },
}

#[derive(Subcommand)]
enum JobAction {
    /// Add a job
    Add {
        /// Target URL
        #[arg(long)]
        endpoint: String,

        /// 5-field cron expression (minute hour day-of-month month day-of-week)
        #[arg(long)]
        schedule: String,

        /// Bearer secret (omit for unauthenticated calls)
        #[arg(long, default_value = "")]
        secret: String,
    },

    /// List jobs (secrets are never printed)
    List,

    /// Remove a job by id
    Remove {
        /// Job id
        id: Uuid,
    },
}

/// Load configuration, falling back to defaults when the file is absent.
fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        ConfigLoader::load(path)
    } else {
        Ok(Config::default())
    }
}

/// Initialize tracing with console output and, when a log directory is
/// configured, a daily-rolling file layer.
fn init_tracing(log_dir: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true));

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("pulsehook")
                .filename_suffix("log")
                .max_log_files(30)
                .build(dir)?;

            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // Keep the writer guard alive for the program duration.
            static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
                std::sync::OnceLock::new();
            let _ = GUARD.set(guard);

            registry
                .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                .init();
        }
        None => registry.init(),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    init_tracing(config.log.dir.as_deref())?;

    match cli.command {
        None | Some(Commands::Run) => run_service(config).await,
        Some(Commands::Job { action }) => handle_job_command(action, &config).await,
    }
}

/// Open the job store. Failure here is fatal: the store is a hard
/// dependency with no degraded mode.
async fn open_store(config: &Config) -> Result<Arc<SqliteJobStore>, Box<dyn std::error::Error>> {
    let store = SqliteJobStore::open(
        &config.store.path,
        Duration::from_secs(config.store.connect_timeout_secs),
        Duration::from_secs(config.store.fetch_timeout_secs),
    )
    .await
    .map_err(|e| {
        error!(
            path = %config.store.path.display(),
            "Failed to open job store: {}", e
        );
        e
    })?;
    Ok(Arc::new(store))
}

/// Run the dispatch service until a termination signal arrives.
async fn run_service(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting pulsehook v{}", env!("CARGO_PKG_VERSION"));

    let store = open_store(&config).await?;
    info!(path = %config.store.path.display(), "Job store opened");

    let dispatcher = Arc::new(Dispatcher::new(DispatcherConfig {
        request_timeout: Duration::from_secs(config.dispatch.request_timeout_secs),
        user_agent: config.dispatch.user_agent.clone(),
    })?);

    let trigger = Arc::new(TriggerLoop::new(
        store,
        dispatcher,
        TriggerLoopConfig {
            cadence: Duration::from_secs(config.trigger.cadence_secs),
            max_concurrent_dispatches: config.trigger.max_concurrent_dispatches,
        },
    ));

    let shutdown = ShutdownSignal::new();
    shutdown.install_os_handlers()?;

    // The loop exits only after the shutdown signal fires; an in-flight
    // tick finishes first.
    trigger.run(shutdown.subscribe()).await;

    info!("Shutting down");
    Ok(())
}

/// Handle job subcommands.
async fn handle_job_command(
    action: JobAction,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(config).await?;

    match action {
        JobAction::Add {
            endpoint,
            schedule,
            secret,
        } => {
            let job = Job::new(endpoint, schedule).with_secret(secret);
            // Reject bad records before they reach the store.
            job.validate()?;
            JobSchedule::parse(&job.schedule)?;

            store.insert(&job).await?;
            println!("Added job {}", job.id);
        }

        JobAction::List => {
            let jobs = store.fetch_all().await?;
            if jobs.is_empty() {
                println!("No jobs.");
                return Ok(());
            }

            println!("{:<38} {:<20} {}", "ID", "SCHEDULE", "ENDPOINT");
            println!("{}", "-".repeat(80));
            for job in jobs {
                println!("{:<38} {:<20} {}", job.id, job.schedule, job.endpoint);
            }
        }

        JobAction::Remove { id } => {
            if store.remove(&id).await? {
                println!("Removed job {}", id);
            } else {
                println!("No job with id {}", id);
            }
        }
    }

    Ok(())
}
