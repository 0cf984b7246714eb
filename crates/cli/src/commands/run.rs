//! `chatmirror run` — the widget poll loop with a terminal render surface.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use chatmirror_client::OpenAiCompatClient;
use chatmirror_core::{CompletionClient, RenderSurface};
use chatmirror_widget::{DisplayState, Poller};
use tracing::info;

/// Renders each refresh to the terminal.
///
/// A terminal cannot fade, so the animation delay becomes a simple pause
/// before the reprint.
struct TerminalSurface {
    display: Arc<RwLock<DisplayState>>,
    placeholder: String,
}

impl RenderSurface for TerminalSurface {
    fn refresh(&self, animation_delay: Duration) {
        let text = self.display.read().unwrap().view().text(&self.placeholder);
        tokio::spawn(async move {
            tokio::time::sleep(animation_delay).await;
            println!("\n  {text}\n");
        });
    }
}

pub async fn run(config_path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let config =
        super::load_config(config_path).map_err(|e| format!("Failed to load config: {e}"))?;

    info!(
        model = %config.model,
        endpoint = %config.endpoint,
        update_interval = config.update_interval,
        "Starting ChatMirror"
    );

    let display = Arc::new(RwLock::new(DisplayState::new()));
    let surface = Arc::new(TerminalSurface {
        display: Arc::clone(&display),
        placeholder: config.loading_placeholder.clone(),
    });
    let client: Arc<dyn CompletionClient> = Arc::new(OpenAiCompatClient::from_config(&config));
    let poller = Poller::with_display(config, client, display, surface);

    poller.start();

    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    poller.suspend();

    Ok(())
}
