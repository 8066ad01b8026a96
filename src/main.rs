use hive_tracker::servers::signals::global_shutdown_signal;
use hive_tracker::{app, bootstrap};
use tracing::info;

#[tokio::main]
async fn main() {
    let (config, tracker) = bootstrap::app::setup();

    let jobs = app::start(&config, tracker).await;

    global_shutdown_signal().await;

    info!("Shutting down...");

    // Every job watches the shutdown signal too; joining them waits until
    // the servers drained and the sweeper stopped.
    for job in jobs {
        drop(job.await);
    }

    info!("Goodbye.");
}
