//! The `scrawl-server` binary: reads `PORT`, installs signal handlers,
//! and runs the server until SIGINT/SIGTERM triggers a graceful shutdown.

use std::time::Duration;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use scrawl::{ScrawlServer, DEFAULT_PORT};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let server = ScrawlServer::builder()
        .bind(&format!("0.0.0.0:{port}"))
        .build()
        .await?;
    info!(port, "scrawl server listening");

    server.run_with_shutdown(shutdown_signal()).await?;
    info!("goodbye");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM. Once a signal arrives, a watchdog is
/// armed that force-exits the process if teardown wedges for 10 seconds.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut term = tokio::signal::unix::signal(
            tokio::signal::unix::SignalKind::terminate(),
        )
        .expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => info!("received SIGINT"),
            _ = term.recv() => info!("received SIGTERM"),
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        info!("received interrupt");
    }

    tokio::spawn(async {
        tokio::time::sleep(Duration::from_secs(10)).await;
        error!("shutdown stuck for 10s, forcing exit");
        std::process::exit(1);
    });
}
