//! The fetch cycle — request, classify, update display, re-arm.
//!
//! All failure handling lives in one decision point: a 401 is terminal (stop
//! polling until an explicit resume), everything else is transient and
//! retried after the fixed retry delay. No backoff, no jitter, no retry cap.

use std::sync::{Arc, RwLock, Weak};
use std::time::Duration;

use chatmirror_config::WidgetConfig;
use chatmirror_core::error::ClientError;
use chatmirror_core::{CompletionClient, CompletionRequest, RenderSurface};
use tracing::{debug, info, warn};

use crate::display::{DisplayState, DisplayView};
use crate::prompt;
use crate::scheduler::Scheduler;

/// Shown when the endpoint rejects the configured credential.
pub const UNAUTHORIZED_TEXT: &str = "[401 Unauthorized, check your API key]";

/// The widget poller: owns the display state and the scheduler, drives one
/// fetch cycle per timer firing.
pub struct Poller {
    config: WidgetConfig,
    client: Arc<dyn CompletionClient>,
    display: Arc<RwLock<DisplayState>>,
    scheduler: Scheduler,
    surface: Arc<dyn RenderSurface>,
    // Handle to ourselves, so an armed timer task can run the next cycle.
    self_ref: Weak<Poller>,
}

impl Poller {
    pub fn new(
        config: WidgetConfig,
        client: Arc<dyn CompletionClient>,
        surface: Arc<dyn RenderSurface>,
    ) -> Arc<Self> {
        Self::with_display(
            config,
            client,
            Arc::new(RwLock::new(DisplayState::new())),
            surface,
        )
    }

    /// Like [`new`](Self::new), but sharing an externally-created display
    /// handle — for hosts that need to read the state directly.
    pub fn with_display(
        config: WidgetConfig,
        client: Arc<dyn CompletionClient>,
        display: Arc<RwLock<DisplayState>>,
        surface: Arc<dyn RenderSurface>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|self_ref| Self {
            config,
            client,
            display,
            scheduler: Scheduler::new(),
            surface,
            self_ref: self_ref.clone(),
        })
    }

    /// Shared handle to the display state, for the render host.
    pub fn display(&self) -> Arc<RwLock<DisplayState>> {
        Arc::clone(&self.display)
    }

    /// The current display view.
    pub fn view(&self) -> DisplayView {
        self.display.read().unwrap().view()
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Whether the next fetch is armed.
    pub fn has_pending(&self) -> bool {
        self.scheduler.has_pending()
    }

    /// Start polling after the configured initial delay.
    ///
    /// With no usable API key the widget shows the sticky missing-key view
    /// and never issues a request.
    pub fn start(&self) {
        if !self.config.has_api_key() {
            warn!("No API key configured; polling disabled");
            self.display.write().unwrap().set_missing_api_key();
            self.surface.refresh(Duration::ZERO);
            return;
        }

        info!(
            update_interval = self.config.update_interval,
            initial_delay = self.config.initial_delay,
            "Starting poll loop"
        );
        self.scheduler.set_running(true);
        self.arm(self.config.initial_delay());
    }

    /// Stop any scheduled update. An in-flight request is not cancelled; its
    /// completion still updates the display but will not re-arm the timer.
    pub fn suspend(&self) {
        info!("Polling suspended");
        self.scheduler.suspend();
    }

    /// Immediately fetch new data, bypassing any delay. The completed cycle
    /// re-arms the timer as usual.
    pub async fn resume(&self) {
        info!("Polling resumed");
        self.scheduler.set_running(true);
        self.run_cycle().await;
    }

    fn arm(&self, delay: Duration) {
        let Some(poller) = self.self_ref.upgrade() else {
            return;
        };
        self.scheduler
            .schedule_next(delay, async move { poller.run_cycle().await });
    }

    /// Re-arm after a completed cycle — unless the loop was suspended while
    /// the request was in flight, in which case the late completion must not
    /// resurrect it.
    fn rearm(&self, delay: Duration) {
        if self.scheduler.is_running() {
            self.arm(delay);
        }
    }

    /// One complete fetch cycle.
    pub async fn run_cycle(&self) {
        let messages = match prompt::assemble(&self.config) {
            Ok(messages) => messages,
            Err(e) => {
                // Malformed config: no amount of retrying fixes this.
                warn!(error = %e, "Prompt assembly failed; polling stopped");
                self.display
                    .write()
                    .unwrap()
                    .set_error(format!("[Configuration error: {e}]"));
                self.surface.refresh(self.config.animation_speed());
                self.scheduler.suspend();
                return;
            }
        };

        let request = CompletionRequest {
            model: self.config.model.clone(),
            messages,
        };

        match self.client.complete(request).await {
            Ok(text) => {
                debug!(chars = text.len(), "Fetched new message");
                self.display.write().unwrap().set_message(text);
                self.surface.refresh(self.config.animation_speed());
                self.rearm(self.config.update_interval());
            }
            Err(ClientError::Unauthorized(reason)) => {
                warn!(%reason, "Endpoint rejected the API key; polling stopped");
                self.display
                    .write()
                    .unwrap()
                    .set_error(UNAUTHORIZED_TEXT.into());
                self.surface.refresh(self.config.animation_speed());
                self.scheduler.suspend();
            }
            Err(e) => {
                warn!(
                    error = %e,
                    retry_in = self.config.retry_delay,
                    "Fetch failed; will retry"
                );
                self.rearm(self.config.retry_delay());
            }
        }
    }
}
