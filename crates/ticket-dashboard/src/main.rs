mod bootstrap;

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use dashboard_core::labels::ChartLabels;
use dashboard_core::settings::Settings;
use dashboard_data::reader::load_tickets;
use dashboard_runtime::server;
use dashboard_runtime::service::DashboardService;
use dashboard_ui::app::App;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    let app_dir = bootstrap::ensure_directories()?;
    let log_file = settings
        .log_file
        .clone()
        .or_else(|| bootstrap::default_log_file(&settings.view, &app_dir));
    bootstrap::setup_logging(&settings.log_level, log_file.as_deref())?;

    tracing::info!("Ticket dashboard v{} starting", env!("CARGO_PKG_VERSION"));
    if let Err(e) = settings.persist_last_used() {
        tracing::warn!(error = %e, "could not save last-used settings");
    }
    tracing::info!(
        "View: {}, Locale: {}, Theme: {}",
        settings.view,
        settings.locale,
        settings.theme
    );

    let locale = settings.locale()?;
    let initial_years = settings.initial_years()?;

    let dataset = load_tickets(&settings.data_file)
        .with_context(|| format!("loading tickets from {}", settings.data_file.display()))?;

    let mut service = DashboardService::new(
        Arc::new(dataset),
        settings.cutoff(),
        ChartLabels::for_locale(locale),
    );
    if let Some(years) = initial_years {
        service = service.with_initial_selection(years);
    }

    match settings.view.as_str() {
        "serve" => {
            tracing::info!("Starting HTTP server on {}:{}", settings.host, settings.port);
            tokio::select! {
                result = server::serve(service, &settings.host, settings.port) => result?,
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Ctrl+C received; shutting down");
                }
            }
        }

        "tui" => {
            let theme = settings.theme.clone();
            // The event loop blocks on terminal input.
            tokio::task::spawn_blocking(move || App::new(service, &theme).run()).await??;
        }

        unknown => bail!("Unknown view mode: {unknown}"),
    }

    Ok(())
}
