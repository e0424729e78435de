//! In-process fakes for the embed pipeline's collaborators, shared by the
//! integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;

use embed_host::{
    AccessToken, AuthError, CallbackRegistry, ContainerHandle, EmbedOrchestrator, EmbedSdk,
    EventSink, ExpiryNotice, HostEvent, HostPage, HostSettings, HttpError, HttpRequest, HttpSend,
    LiveSurface, SdkError, TokenGrant, TokenProvider, ViewDescriptor, WireConfig,
};

pub const BASE_URL: &str = "https://app.analytics.test";

// ── Token provider ───────────────────────────────────────────────

pub struct FakeTokenProvider {
    grants: Mutex<VecDeque<Result<TokenGrant, AuthError>>>,
    notices: Mutex<Option<mpsc::Receiver<ExpiryNotice>>>,
    fetches: AtomicUsize,
    subscription_taken: AtomicBool,
}

impl FakeTokenProvider {
    pub fn with_tokens(tokens: &[&str]) -> Arc<Self> {
        let grants = tokens
            .iter()
            .map(|t| Ok(TokenGrant::new(AccessToken::new(*t))))
            .collect();
        Arc::new(Self {
            grants: Mutex::new(grants),
            notices: Mutex::new(None),
            fetches: AtomicUsize::new(0),
            subscription_taken: AtomicBool::new(false),
        })
    }

    pub fn with_results(results: Vec<Result<TokenGrant, AuthError>>) -> Arc<Self> {
        Arc::new(Self {
            grants: Mutex::new(results.into()),
            notices: Mutex::new(None),
            fetches: AtomicUsize::new(0),
            subscription_taken: AtomicBool::new(false),
        })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Self::with_results(vec![Err(AuthError::new(message))])
    }

    /// Provider that exposes an expiry notification slot. Returns the sender
    /// the test uses to simulate about-to-expire signals.
    pub fn notifying(
        results: Vec<Result<TokenGrant, AuthError>>,
    ) -> (Arc<Self>, mpsc::Sender<ExpiryNotice>) {
        let (tx, rx) = mpsc::channel(8);
        let provider = Arc::new(Self {
            grants: Mutex::new(results.into()),
            notices: Mutex::new(Some(rx)),
            fetches: AtomicUsize::new(0),
            subscription_taken: AtomicBool::new(false),
        });
        (provider, tx)
    }

    pub fn grants_ok(tokens: &[&str]) -> Vec<Result<TokenGrant, AuthError>> {
        tokens
            .iter()
            .map(|t| Ok(TokenGrant::new(AccessToken::new(*t))))
            .collect()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn subscription_taken(&self) -> bool {
        self.subscription_taken.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenProvider for FakeTokenProvider {
    async fn fetch_token(&self) -> Result<TokenGrant, AuthError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.grants
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AuthError::new("token well dry")))
    }

    fn expiry_notifications(&self) -> Option<mpsc::Receiver<ExpiryNotice>> {
        let receiver = self.notices.lock().unwrap().take();
        if receiver.is_some() {
            self.subscription_taken.store(true, Ordering::SeqCst);
        }
        receiver
    }
}

// ── Live surface + SDK ───────────────────────────────────────────

pub struct FakeSurface {
    token: Mutex<Option<String>>,
    push_failures: Mutex<VecDeque<SdkError>>,
    pushes: AtomicUsize,
}

impl FakeSurface {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            token: Mutex::new(None),
            push_failures: Mutex::new(VecDeque::new()),
            pushes: AtomicUsize::new(0),
        })
    }

    pub fn fail_next_push(&self, error: SdkError) {
        self.push_failures.lock().unwrap().push_back(error);
    }

    pub fn token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    pub fn push_count(&self) -> usize {
        self.pushes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LiveSurface for FakeSurface {
    async fn set_access_token(&self, token: &AccessToken) -> Result<(), SdkError> {
        self.pushes.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.push_failures.lock().unwrap().pop_front() {
            return Err(err);
        }
        *self.token.lock().unwrap() = Some(token.expose().to_string());
        Ok(())
    }
}

pub struct FakeSdk {
    fail_with: Mutex<Option<SdkError>>,
    configs: Mutex<Vec<WireConfig>>,
    surfaces: Mutex<Vec<Arc<FakeSurface>>>,
}

impl FakeSdk {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            fail_with: Mutex::new(None),
            configs: Mutex::new(Vec::new()),
            surfaces: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(error: SdkError) -> Arc<Self> {
        Arc::new(Self {
            fail_with: Mutex::new(Some(error)),
            configs: Mutex::new(Vec::new()),
            surfaces: Mutex::new(Vec::new()),
        })
    }

    pub fn embed_count(&self) -> usize {
        self.configs.lock().unwrap().len()
    }

    pub fn last_config(&self) -> Option<WireConfig> {
        self.configs.lock().unwrap().last().cloned()
    }

    pub fn last_surface(&self) -> Option<Arc<FakeSurface>> {
        self.surfaces.lock().unwrap().last().cloned()
    }
}

impl EmbedSdk for FakeSdk {
    fn embed(
        &self,
        _container: &ContainerHandle,
        config: &WireConfig,
    ) -> Result<Arc<dyn LiveSurface>, SdkError> {
        if let Some(err) = self.fail_with.lock().unwrap().clone() {
            return Err(err);
        }
        self.configs.lock().unwrap().push(config.clone());
        let surface = FakeSurface::new();
        self.surfaces.lock().unwrap().push(surface.clone());
        let handle: Arc<dyn LiveSurface> = surface;
        Ok(handle)
    }
}

// ── Page chrome ──────────────────────────────────────────────────

#[derive(Default)]
pub struct FakePage {
    errors: AtomicUsize,
    reloads: AtomicUsize,
}

impl FakePage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn errors(&self) -> usize {
        self.errors.load(Ordering::SeqCst)
    }

    pub fn reloads(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }
}

impl HostPage for FakePage {
    fn show_error(&self) {
        self.errors.fetch_add(1, Ordering::SeqCst);
    }

    fn reload(&self) {
        self.reloads.fetch_add(1, Ordering::SeqCst);
    }
}

// ── Event sink ───────────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<HostEvent>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: HostEvent) {
        self.events.lock().unwrap().push(event);
    }
}

// ── HTTP ─────────────────────────────────────────────────────────

pub struct FakeHttp {
    failing: Mutex<HashMap<String, HttpError>>,
    calls: AtomicUsize,
}

impl FakeHttp {
    pub fn ok() -> Arc<Self> {
        Arc::new(Self {
            failing: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn fail_url(&self, url: &str, error: HttpError) {
        self.failing.lock().unwrap().insert(url.to_string(), error);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HttpSend for FakeHttp {
    async fn send(&self, request: HttpRequest) -> Result<String, HttpError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.failing.lock().unwrap().get(&request.url) {
            Some(err) => Err(err.clone()),
            None => Ok(format!("// {}", request.url)),
        }
    }
}

// ── Harness ──────────────────────────────────────────────────────

pub fn settings_for(kind: &str, id: &str) -> HostSettings {
    HostSettings {
        embed_base_url: BASE_URL.into(),
        auto_refresh: false,
        preview: false,
        script_urls: Vec::new(),
        view: ViewDescriptor {
            kind: kind.into(),
            id: id.into(),
            ..ViewDescriptor::default()
        },
    }
}

pub struct Harness {
    pub provider: Arc<FakeTokenProvider>,
    pub sdk: Arc<FakeSdk>,
    pub http: Arc<FakeHttp>,
    pub page: Arc<FakePage>,
    pub sink: Arc<RecordingSink>,
}

impl Harness {
    pub fn new(provider: Arc<FakeTokenProvider>) -> Self {
        Self {
            provider,
            sdk: FakeSdk::new(),
            http: FakeHttp::ok(),
            page: FakePage::new(),
            sink: RecordingSink::new(),
        }
    }

    pub fn orchestrator(&self, settings: HostSettings, registry: CallbackRegistry) -> EmbedOrchestrator {
        EmbedOrchestrator::new(
            settings,
            ContainerHandle::new("embed-root"),
            self.provider.clone(),
            self.sdk.clone(),
            self.http.clone(),
            registry,
            self.sink.clone(),
            self.page.clone(),
        )
    }
}

/// Poll until `condition` holds, failing the test after two seconds.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("condition not met within 2s");
}
