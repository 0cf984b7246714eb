//! End-to-end poll-loop scenarios against a scripted transport.
//!
//! These run under a paused tokio clock, so interval assertions are exact:
//! advancing to one second before a deadline must not fire the timer,
//! crossing it must.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chatmirror_config::{PromptMessage, WidgetConfig};
use chatmirror_core::error::ClientError;
use chatmirror_core::{CompletionClient, CompletionRequest, RenderSurface, Role};
use chatmirror_widget::{DisplayView, Poller, MISSING_API_KEY_TEXT, UNAUTHORIZED_TEXT};

// ── Scripted client ─────────────────────────────────────────────────────

/// A mock client that returns a sequence of scripted outcomes.
///
/// Each call to `complete` consumes the next entry; calling past the end of
/// the script panics, which keeps cycle counts honest.
struct ScriptedClient {
    script: Mutex<Vec<Result<String, ClientError>>>,
    calls: AtomicUsize,
}

impl ScriptedClient {
    fn new(script: Vec<Result<String, ClientError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<String, ClientError> {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        let script = self.script.lock().unwrap();
        script
            .get(index)
            .unwrap_or_else(|| {
                panic!("ScriptedClient exhausted: call #{index}, have {}", script.len())
            })
            .clone()
    }
}

/// A client that parks until the test releases it — used to model a request
/// still in flight when `suspend()` lands.
struct GatedClient {
    gate: tokio::sync::Semaphore,
    calls: AtomicUsize,
}

impl GatedClient {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            gate: tokio::sync::Semaphore::new(0),
            calls: AtomicUsize::new(0),
        })
    }

    fn release_one(&self) {
        self.gate.add_permits(1);
    }
}

#[async_trait]
impl CompletionClient for GatedClient {
    fn name(&self) -> &str {
        "gated"
    }

    async fn complete(&self, _request: CompletionRequest) -> Result<String, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _permit = self.gate.acquire().await.expect("gate closed");
        Ok("late answer".into())
    }
}

// ── Counting surface ────────────────────────────────────────────────────

#[derive(Default)]
struct CountingSurface {
    refreshes: AtomicUsize,
    last_delay: Mutex<Option<Duration>>,
}

impl CountingSurface {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn refreshes(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }
}

impl RenderSurface for CountingSurface {
    fn refresh(&self, animation_delay: Duration) {
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        *self.last_delay.lock().unwrap() = Some(animation_delay);
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn test_config() -> WidgetConfig {
    let mut config = WidgetConfig::default();
    config.api_key = Some("sk-test".into());
    config.update_interval = 900;
    config.retry_delay = 1;
    config.initial_delay = 0;
    config.prompts = vec![vec![PromptMessage {
        role: Role::User,
        content: "Give me a short quote.".into(),
    }]];
    config
}

/// Let spawned timer tasks run without parking the test task (which would
/// trigger the paused clock's auto-advance).
async fn settle() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}

async fn advance(secs: u64) {
    tokio::time::advance(Duration::from_secs(secs)).await;
    settle().await;
}

// ── Scenarios ───────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn missing_api_key_shows_placeholder_and_never_requests() {
    let mut config = test_config();
    config.api_key = None;

    let client = ScriptedClient::new(vec![]);
    let surface = CountingSurface::new();
    let poller = Poller::new(config, client.clone(), surface.clone());

    poller.start();
    settle().await;

    assert_eq!(poller.view(), DisplayView::MissingApiKey);
    assert_eq!(poller.view().text("Loading..."), MISSING_API_KEY_TEXT);
    assert!(!poller.is_running());
    assert!(!poller.has_pending());
    assert_eq!(surface.refreshes(), 1);

    advance(7200).await;
    assert_eq!(client.calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn success_updates_display_and_arms_update_interval() {
    let client = ScriptedClient::new(vec![Ok("first quip".into()), Ok("second quip".into())]);
    let surface = CountingSurface::new();
    let poller = Poller::new(test_config(), client.clone(), surface.clone());

    poller.start();
    settle().await;

    assert_eq!(client.calls(), 1);
    assert_eq!(poller.view(), DisplayView::Message("first quip".into()));
    assert!(poller.has_pending());
    assert_eq!(
        *surface.last_delay.lock().unwrap(),
        Some(Duration::from_secs(1))
    );

    // One second short of the update interval: nothing fires
    advance(899).await;
    assert_eq!(client.calls(), 1);

    // Crossing it fires exactly one new cycle
    advance(2).await;
    assert_eq!(client.calls(), 2);
    assert_eq!(poller.view(), DisplayView::Message("second quip".into()));
}

#[tokio::test(start_paused = true)]
async fn unauthorized_is_terminal_until_explicit_resume() {
    let client = ScriptedClient::new(vec![
        Err(ClientError::Unauthorized("bad key".into())),
        Ok("back online".into()),
    ]);
    let surface = CountingSurface::new();
    let poller = Poller::new(test_config(), client.clone(), surface.clone());

    poller.start();
    settle().await;

    assert_eq!(client.calls(), 1);
    assert_eq!(poller.view(), DisplayView::Error(UNAUTHORIZED_TEXT.into()));
    assert!(!poller.is_running());
    assert!(!poller.has_pending());

    // No automatic retry, ever
    advance(86_400).await;
    assert_eq!(client.calls(), 1);

    // An explicit resume re-attempts immediately and re-arms
    poller.resume().await;
    settle().await;
    assert_eq!(client.calls(), 2);
    assert_eq!(poller.view(), DisplayView::Message("back online".into()));
    assert!(poller.has_pending());
}

#[tokio::test(start_paused = true)]
async fn timeouts_leave_display_untouched_and_retry_at_fixed_delay() {
    let client = ScriptedClient::new(vec![
        Err(ClientError::Timeout("5s elapsed".into())),
        Err(ClientError::Timeout("5s elapsed".into())),
        Err(ClientError::Timeout("5s elapsed".into())),
    ]);
    let surface = CountingSurface::new();
    let poller = Poller::new(test_config(), client.clone(), surface.clone());

    poller.start();
    settle().await;
    assert_eq!(client.calls(), 1);
    assert_eq!(poller.view(), DisplayView::Loading);
    assert_eq!(surface.refreshes(), 0);

    // Retries at the fixed one-second delay, not the update interval
    advance(1).await;
    assert_eq!(client.calls(), 2);
    advance(1).await;
    assert_eq!(client.calls(), 3);

    assert_eq!(poller.view(), DisplayView::Loading);
    assert!(poller.has_pending());
    poller.suspend();
}

#[tokio::test(start_paused = true)]
async fn other_statuses_and_bad_bodies_also_retry() {
    let client = ScriptedClient::new(vec![
        Err(ClientError::Api {
            status_code: 500,
            message: "server melted".into(),
        }),
        Err(ClientError::InvalidResponse("not json".into())),
        Ok("recovered".into()),
    ]);
    let surface = CountingSurface::new();
    let poller = Poller::new(test_config(), client.clone(), surface.clone());

    poller.start();
    settle().await;
    advance(1).await;
    advance(1).await;

    assert_eq!(client.calls(), 3);
    assert_eq!(poller.view(), DisplayView::Message("recovered".into()));
}

#[tokio::test(start_paused = true)]
async fn suspend_then_resume_runs_exactly_one_cycle() {
    let mut config = test_config();
    config.initial_delay = 30;

    let client = ScriptedClient::new(vec![Ok("one".into()), Ok("two".into())]);
    let surface = CountingSurface::new();
    let poller = Poller::new(config, client.clone(), surface.clone());

    poller.start();
    settle().await;
    assert!(poller.has_pending());

    poller.suspend();
    assert!(!poller.has_pending());

    poller.resume().await;
    settle().await;

    // Exactly one fetch, and exactly one re-armed timer
    assert_eq!(client.calls(), 1);
    assert!(poller.has_pending());

    advance(899).await;
    assert_eq!(client.calls(), 1);
    advance(2).await;
    assert_eq!(client.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn late_completion_after_suspend_updates_display_but_does_not_rearm() {
    let client = GatedClient::new();
    let surface = CountingSurface::new();
    let poller = Poller::new(test_config(), client.clone(), surface.clone());

    poller.start();
    settle().await;

    // The request is in flight, parked on the gate
    assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    poller.suspend();

    client.release_one();
    settle().await;

    // The late completion still landed...
    assert_eq!(poller.view(), DisplayView::Message("late answer".into()));
    // ...but the suspended loop stays down
    assert!(!poller.is_running());
    assert!(!poller.has_pending());
}

#[tokio::test(start_paused = true)]
async fn empty_prompt_set_is_a_fatal_config_condition() {
    let mut config = test_config();
    config.prompts = vec![];

    let client = ScriptedClient::new(vec![]);
    let surface = CountingSurface::new();
    let poller = Poller::new(config, client.clone(), surface.clone());

    poller.start();
    settle().await;

    assert_eq!(client.calls(), 0);
    assert!(matches!(poller.view(), DisplayView::Error(_)));
    assert!(!poller.is_running());
    assert!(!poller.has_pending());
}

#[tokio::test(start_paused = true)]
async fn unknown_template_variable_is_a_fatal_config_condition() {
    let mut config = test_config();
    config.prompts = vec![vec![PromptMessage {
        role: Role::User,
        content: "quote for {{moonphase}}".into(),
    }]];

    let client = ScriptedClient::new(vec![]);
    let surface = CountingSurface::new();
    let poller = Poller::new(config, client.clone(), surface.clone());

    poller.start();
    settle().await;

    assert_eq!(client.calls(), 0);
    let DisplayView::Error(text) = poller.view() else {
        panic!("expected error view, got {:?}", poller.view());
    };
    assert!(text.contains("moonphase"));
    assert!(!poller.is_running());
}
