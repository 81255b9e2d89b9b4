//! Test doubles for the external-service seams.

use crate::checkout::{CheckoutBackend, Redirector};
use crate::notify::Notifier;
use async_trait::async_trait;
use shop_core::{
    CheckoutSessionRequest, CheckoutSessionResponse, ContactMessage, MessageRelay, ShopError,
    ShopResult,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub fn session(id: &str) -> CheckoutSessionResponse {
    CheckoutSessionResponse {
        id: id.to_string(),
        url: Some(format!("https://checkout.stripe.com/c/pay/{}", id)),
        expires_at: None,
    }
}

/// Backend that replays scripted outcomes, optionally after a delay
#[derive(Default)]
pub struct ScriptedBackend {
    outcomes: Mutex<VecDeque<ShopResult<CheckoutSessionResponse>>>,
    pub requests: Mutex<Vec<CheckoutSessionRequest>>,
    pub delay: Option<Duration>,
}

impl ScriptedBackend {
    pub fn new(outcomes: Vec<ShopResult<CheckoutSessionResponse>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl CheckoutBackend for ScriptedBackend {
    async fn create_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> ShopResult<CheckoutSessionResponse> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ShopError::Internal("no scripted outcome".into())))
    }
}

#[derive(Default)]
pub struct RecordingRedirector {
    pub targets: Mutex<Vec<String>>,
    pub fail: bool,
}

impl Redirector for RecordingRedirector {
    fn redirect(&self, session: &CheckoutSessionResponse) -> ShopResult<()> {
        if self.fail {
            return Err(ShopError::Redirect("hosted page unavailable".into()));
        }
        self.targets.lock().unwrap().push(session.id.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub successes: Mutex<Vec<String>>,
    pub errors: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn successes(&self) -> Vec<String> {
        self.successes.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, text: &str) {
        self.successes.lock().unwrap().push(text.to_string());
    }

    fn error(&self, text: &str) {
        self.errors.lock().unwrap().push(text.to_string());
    }
}

/// Relay that fails the first `failures` sends
#[derive(Default)]
pub struct FlakyRelay {
    pub failures: usize,
    sent: AtomicUsize,
    pub delivered: Mutex<Vec<ContactMessage>>,
}

impl FlakyRelay {
    pub fn failing(failures: usize) -> Self {
        Self {
            failures,
            ..Self::default()
        }
    }

    pub fn attempts(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageRelay for FlakyRelay {
    async fn send_message(&self, message: &ContactMessage) -> ShopResult<()> {
        let attempt = self.sent.fetch_add(1, Ordering::SeqCst);
        if attempt < self.failures {
            return Err(ShopError::SubmissionFailure("relay returned 503".into()));
        }
        self.delivered.lock().unwrap().push(message.clone());
        Ok(())
    }

    fn relay_name(&self) -> &'static str {
        "flaky"
    }
}
