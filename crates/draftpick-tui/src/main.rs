// Draft assistant entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Load and join the player sources
// 4. Build the draft session and its shared handle
// 5. Spawn the viewer feed (if enabled)
// 6. Run the text prompt or the dashboard until the operator quits
// 7. Cleanup on exit

use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info};

use draftpick_core::catalog;
use draftpick_core::config::{self, DisplayMode};
use draftpick_core::draft::{DraftSession, SessionHandle};
use draftpick_core::photo::PhotoResolver;
use draftpick_core::ws_server;
use draftpick_tui::text::{self, TextOptions};
use draftpick_tui::tui::{self, DashboardOptions};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not terminal)
    init_tracing()?;
    info!("Draft assistant starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    let mode = mode_from_args(std::env::args().skip(1), config.display.mode)?;
    info!(
        "Config loaded from {}: {} tracked positions, {:?} mode",
        config.base_dir.display(),
        config.tiers.len(),
        mode
    );

    // 3. Load and join the player sources
    let paths = config.resolved_data_paths();
    let catalog = catalog::load_catalog(&paths).with_context(|| {
        format!(
            "failed to load players from {} and {}",
            paths.adp, paths.performance
        )
    })?;
    info!("Catalog ready with {} players", catalog.len());

    // 4. Build the draft session
    let handle = SessionHandle::new(DraftSession::new(catalog, &config.tiers));

    // 5. Spawn the viewer feed
    let viewer_handle = if config.viewer.enabled {
        let port = config.viewer.port;
        let snapshots = handle.subscribe();
        Some(tokio::spawn(async move {
            if let Err(e) = ws_server::run(port, snapshots).await {
                error!("Viewer feed on port {} stopped: {}", port, e);
            }
        }))
    } else {
        None
    };

    // 6. Run the chosen front-end
    match mode {
        DisplayMode::Text => {
            let options = TextOptions {
                top_n: config.display.top_n,
                low_tier_warning: config.display.low_tier_warning,
            };
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            text::run(&handle, stdin, &mut stdout, options)
                .await
                .context("text prompt failed")?;
        }
        DisplayMode::Dashboard => {
            let photos = Arc::new(PhotoResolver::from_config(
                &config.photos,
                config.credentials.photo_api_key.as_deref(),
            ));
            let options = DashboardOptions {
                page_size: config.display.page_size,
                low_tier_warning: config.display.low_tier_warning,
            };
            if let Err(e) = tui::run(handle.clone(), photos, options).await {
                error!("TUI error: {}", e);
                return Err(e.context("dashboard failed"));
            }
        }
    }

    // 7. Cleanup: the viewer feed loops forever
    if let Some(viewer) = viewer_handle {
        viewer.abort();
    }

    let picks = handle.snapshot().pick_count;
    info!("Draft assistant shut down cleanly after {} picks", picks);
    Ok(())
}

/// `--text` or `--dashboard` overrides the configured mode for one run.
fn mode_from_args<I>(args: I, configured: DisplayMode) -> anyhow::Result<DisplayMode>
where
    I: IntoIterator<Item = String>,
{
    let mut mode = configured;
    for arg in args {
        mode = match arg.as_str() {
            "--text" => DisplayMode::Text,
            "--dashboard" => DisplayMode::Dashboard,
            other => anyhow::bail!("unknown argument: {other} (expected --text or --dashboard)"),
        };
    }
    Ok(mode)
}

/// Initialize tracing to log to a file (not the terminal, which is used by the UI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("draftpick.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("draftpick_core=info,draftpick_tui=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
