use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use crm_reconciler::config::ConfigManager;
use crm_reconciler::jobs::{builtin_jobs, JobOutcome};
use crm_reconciler::scheduler::{Cadence, Scheduler};
use crm_reconciler::{AuditLog, RemoteClient};

#[derive(Parser)]
#[command(name = "crm-reconciler", about = "Scheduled reconciliation and reporting engine")]
struct Cli {
    /// Path to the engine configuration file
    #[arg(long, default_value = "config/engine.toml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the scheduler loop with all enabled jobs
    Run,
    /// Execute a single job once and exit 0 on success, 1 on failure
    RunJob {
        /// Job name, e.g. low-stock, heartbeat, order-reminders, weekly-report
        name: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(code) => code,
        Err(e) => {
            // Logging may not be initialized yet, so report on stderr too.
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let env_filter = EnvFilter::from_default_env()
        .add_directive("crm_reconciler=info".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);

    fmt().with_env_filter(env_filter).init();

    let config_manager = ConfigManager::new(&cli.config).await?;
    let config = config_manager.get_current_config();

    let client = Arc::new(RemoteClient::new(&config).map_err(|e| anyhow!("{}", e))?);
    let audit = Arc::new(AuditLog::new(&config.log_dir));

    match cli.command {
        Command::Run => {
            let mut scheduler = Scheduler::new(
                client,
                audit,
                std::time::Duration::from_secs(config.tick_interval_seconds),
            );

            let mut registered = 0;
            for job in builtin_jobs() {
                let Some(job_config) = config.jobs.get(job.name()) else {
                    info!("No configuration for job '{}', not scheduling it", job.name());
                    continue;
                };
                if !job_config.enabled {
                    info!("Job '{}' disabled, not scheduling it", job.name());
                    continue;
                }

                let cadence = Cadence::from_job_config(job.name(), job_config)
                    .map_err(|e| anyhow!("{}", e))?;
                scheduler.register(job, cadence).map_err(|e| anyhow!("{}", e))?;
                registered += 1;
            }

            if registered == 0 {
                return Err(anyhow!("no jobs enabled in configuration"));
            }

            info!("Starting scheduler with {} jobs", registered);
            scheduler.run().await;
            Ok(ExitCode::SUCCESS)
        }
        Command::RunJob { name } => {
            let job = builtin_jobs()
                .into_iter()
                .find(|job| job.name() == name)
                .ok_or_else(|| anyhow!("unknown job '{}'", name))?;

            // A disabled job invoked by an external timer is not an error;
            // there is simply nothing due.
            if let Some(job_config) = config.jobs.get(job.name()) {
                if !job_config.enabled {
                    return Ok(ExitCode::SUCCESS);
                }
            }

            let result = job.run(chrono::Utc::now(), client.as_ref()).await;

            if let Err(e) = audit.append(&result).await {
                error!("Failed to append audit entry for '{}': {}", name, e);
            }

            match &result.outcome {
                JobOutcome::Success { summary, .. } => {
                    info!("Job '{}' succeeded: {}", name, summary);
                    Ok(ExitCode::SUCCESS)
                }
                JobOutcome::Failure { kind, message } => {
                    error!("Job '{}' failed ({}): {}", name, kind, message);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}
