// ABBA draft explorer entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config
// 3. Create mpsc channels
// 4. Spawn app logic task
// 5. Run the TUI until the user quits
// 6. Cleanup on exit

use abba_tui::app;
use abba_tui::config;
use abba_tui::tui;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing (log to file, not terminal)
    init_tracing()?;
    info!("ABBA draft explorer starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: max_picks={}, prefix_len={}, slider range {}..={}",
        config.analysis.max_picks,
        config.analysis.prefix_len,
        config.bounds.min_picks,
        config.bounds.max_picks
    );

    // 3. Create mpsc channels
    let (analysis_tx, analysis_rx) = mpsc::channel(16);
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(64);

    // 4. Spawn app logic task
    let app_state = app::AppState::new(analysis_tx);
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(analysis_rx, cmd_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    // 5. The TUI sends the initial Recompute and blocks until 'q' or Ctrl+C.
    if let Err(e) = tui::run(&config, ui_rx, cmd_tx).await {
        error!("TUI error: {}", e);
    }

    // 6. Cleanup: wait for app task to finish (with timeout)
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("ABBA draft explorer shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (not the terminal, which is used by the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("abba.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("abba_tui=info,abba_core=info,warn")),
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
