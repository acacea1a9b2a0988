//! Process launcher shared by the gateway and service binaries.

use std::future::Future;
use std::process::ExitCode;

use configs::AppConfig;
use dotenvy::dotenv;
use tracing::{error, info};
use uuid::Uuid;

/// Which thread count a binary takes from the configuration.
#[derive(Debug, Clone, Copy)]
pub enum Threads {
    Gateway,
    Service,
}

fn worker_threads(cfg: &AppConfig, threads: Threads) -> Option<usize> {
    let from_config = match threads {
        Threads::Gateway => cfg.server.worker_threads,
        Threads::Service => cfg.services.worker_threads,
    };
    from_config.or_else(|| std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()))
}

/// Load `.env` and the config file, init logging, install a panic hook,
/// build the runtime and run `entry` with the loaded config until it
/// returns or Ctrl+C arrives.
pub fn launch<F, Fut>(service: &'static str, threads: Threads, entry: F) -> ExitCode
where
    F: FnOnce(AppConfig) -> Fut + Send + 'static,
    Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
{
    dotenv().ok();
    let cfg = match AppConfig::load_or_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            common::utils::logging::init_logging_default(None);
            error!(service, event = "config_invalid", error = %format!("{e:#}"), "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };
    common::utils::logging::init_logging(cfg.logging.json, cfg.logging.filter.as_deref());
    info!(service, event = "logger_init", "tracing subscriber initialized");

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(service, event = "panic", %service_id, pid, message = %info, "unhandled panic occurred");
    }));

    let worker_threads = worker_threads(&cfg, threads);
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads { builder.worker_threads(w); }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service, event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service,
        event = "start",
        %service_id,
        pid,
        version,
        threads = worker_threads.unwrap_or_default(),
        "service starting"
    );

    rt.block_on(async move {
        let task = tokio::spawn(async move {
            let res = entry(cfg).await;
            if let Err(e) = &res {
                error!(service, event = "run_failed", error = %e, "service returned error");
            }
            res
        });

        tokio::select! {
            res = task => match res {
                Ok(Ok(())) => {
                    info!(service, event = "stop", %service_id, pid, "service stopped normally");
                    ExitCode::SUCCESS
                }
                // already logged
                Ok(Err(_)) => ExitCode::FAILURE,
                Err(e) => {
                    error!(service, event = "task_join_error", error = %e, "service task join error");
                    ExitCode::FAILURE
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!(service, event = "shutdown_signal", %service_id, pid, "received Ctrl+C, shutting down");
                ExitCode::SUCCESS
            }
        }
    })
}
