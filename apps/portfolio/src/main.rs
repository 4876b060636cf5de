mod auth;
mod config;
mod errors;
mod form;
mod layout;
mod models;
mod render;
mod state;
mod ui;

use anyhow::Result;
use serde::Serialize;
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::state::AppState;
use crate::ui::notify::Notice;
use crate::ui::{next_line_lossy, App, UiEvent, View};

/// What the UI would show after an event: the current view and notice.
#[derive(Serialize)]
struct Frame {
    #[serde(flatten)]
    view: View,
    notice: Option<Notice>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Logs go to stderr; stdout carries one frame per event.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting portfolio builder v{}", env!("CARGO_PKG_VERSION"));
    info!(
        data_dir = %config.data_dir.display(),
        output_dir = %config.output_dir.display(),
        "Storage configured"
    );

    let mut app = App::start(AppState::new(config)).await;
    print_frame(&app)?;

    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut buf = Vec::new();
    loop {
        let line = match next_line_lossy(&mut stdin, &mut buf).await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Input read failed");
                break;
            }
        };
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<UiEvent>(&line) {
            Ok(event) => app.dispatch(event).await,
            Err(e) => warn!(error = %e, line = %line, "Ignoring malformed event"),
        }
        print_frame(&app)?;
    }

    info!("Input closed; shutting down");
    Ok(())
}

fn print_frame(app: &App) -> Result<()> {
    let frame = Frame {
        view: app.view(),
        notice: app.notifier().current(),
    };
    println!("{}", serde_json::to_string(&frame)?);
    Ok(())
}
