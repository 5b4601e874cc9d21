use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::signal;

use report_render_service::config::Settings;
use report_render_service::loader::load_json;
use report_render_service::report::WeeklySalesReport;
use report_render_service::server::{create_app, AppState};
use report_render_service::telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let settings = Settings::new()?;

    // Initialize tracing
    init_tracing(&settings.logging)?;
    tracing::info!("Configuration loaded");

    // Create application state
    let mut state = AppState::new(settings.clone());

    // Load templates from disk
    let dir = &settings.templates.dir;
    if dir.is_dir() {
        let loaded = state
            .template_store
            .load_dir(dir)
            .await
            .with_context(|| format!("loading templates from {}", dir.display()))?;
        tracing::info!(count = loaded, dir = %dir.display(), "Templates loaded");
    } else {
        tracing::warn!(dir = %dir.display(), "Template directory not found, starting with no templates");
    }

    // Weekly report data
    if let Some(path) = &settings.data.weekly {
        let report: WeeklySalesReport = load_json(path).await?;
        report
            .validate()
            .with_context(|| format!("invalid weekly report {}", path.display()))?;
        tracing::info!(path = %path.display(), "Weekly report loaded");
        state = state.with_weekly_report(report);
    }
    tracing::info!("Application state initialized");

    // Create Axum app
    let app = create_app(state);

    // Start server
    let addr = settings.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal_handler())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal_handler() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
