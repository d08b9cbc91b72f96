/*!
 * Microservice Supervisor - Main Entry Point
 *
 * Usage: microservice-supervisor <count>
 *
 * Starts one worker per fetched person record and keeps them running until
 * SIGINT or SIGTERM.
 */

use microservice_supervisor::{
    init_tracing, HttpWorkSource, ShutdownSignal, Supervisor, SupervisorConfig, SupervisorError,
};
use tracing::{error, info};

/// Log a fatal error and hand it to miette for the exit diagnostic
fn fatal(err: impl Into<SupervisorError>) -> miette::Report {
    let err = err.into();
    error!("{}", err);
    err.into()
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    init_tracing();

    let config = SupervisorConfig::from_args(std::env::args()).map_err(fatal)?;
    info!(
        count = config.count,
        source = %config.source_url,
        worker = %config.worker.program.display(),
        grace_ms = config.grace_period.as_millis() as u64,
        "Microservice supervisor starting"
    );

    // Installed before anything is spawned so an early Ctrl-C is not lost
    let mut shutdown = ShutdownSignal::install()
        .map_err(|e| fatal(SupervisorError::SignalSetup(e)))?;

    let source = HttpWorkSource::new(config.source_url.clone()).map_err(fatal)?;
    let mut supervisor = Supervisor::from_config(&config);

    let summary = supervisor
        .run(config.count, &source, async {
            let trigger = shutdown.recv().await;
            info!(?trigger, "Received shutdown signal");
        })
        .await
        .map_err(fatal)?;

    info!(
        run_id = %summary.run_id,
        workers = summary.spawned.len(),
        interrupted = summary.interrupted,
        killed = summary.shutdown.killed_count(),
        elapsed_ms = summary.shutdown.elapsed.as_millis() as u64,
        "Supervisor exiting"
    );
    Ok(())
}
