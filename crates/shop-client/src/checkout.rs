//! # Checkout Session Client
//!
//! Turns the cart into a session request, posts it to the checkout endpoint
//! and hands the returned session to the redirector.
//!
//! At most one request is in flight per client: the processing flag is set
//! before the network call and cleared by a guard on every exit path.

use crate::notify::{Notifier, GENERIC_FAILURE};
use async_trait::async_trait;
use reqwest::Client;
use shop_core::{
    Cart, CheckoutSessionRequest, CheckoutSessionResponse, ErrorBody, ShopError, ShopResult,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

/// Server side of the handoff: creates a session from line items.
#[async_trait]
pub trait CheckoutBackend: Send + Sync {
    async fn create_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> ShopResult<CheckoutSessionResponse>;
}

/// Sends the shopper to the processor's hosted page.
pub trait Redirector: Send + Sync {
    /// Fails with `ShopError::Redirect` when the hosted page cannot be reached
    fn redirect(&self, session: &CheckoutSessionResponse) -> ShopResult<()>;
}

/// Redirector that hands the hosted checkout URL to a callback
/// (a browser navigation, a CLI `open`, ...)
pub struct UrlRedirector<F> {
    open: F,
}

impl<F> UrlRedirector<F>
where
    F: Fn(&str) -> ShopResult<()> + Send + Sync,
{
    pub fn new(open: F) -> Self {
        Self { open }
    }
}

impl<F> Redirector for UrlRedirector<F>
where
    F: Fn(&str) -> ShopResult<()> + Send + Sync,
{
    fn redirect(&self, session: &CheckoutSessionResponse) -> ShopResult<()> {
        let url = session
            .url
            .as_deref()
            .ok_or_else(|| ShopError::Redirect(format!("session {} has no hosted URL", session.id)))?;
        (self.open)(url)
    }
}

/// `CheckoutBackend` over HTTP, talking to the checkout session endpoint
pub struct HttpCheckoutBackend {
    endpoint: String,
    client: Client,
}

impl HttpCheckoutBackend {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> ShopResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ShopError::Configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }
}

#[async_trait]
impl CheckoutBackend for HttpCheckoutBackend {
    #[instrument(skip(self, request), fields(endpoint = %self.endpoint))]
    async fn create_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> ShopResult<CheckoutSessionResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| ShopError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ShopError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&body)
                .map(|b| b.message)
                .unwrap_or_else(|_| format!("HTTP {}", status));
            return Err(match status.as_u16() {
                400 => ShopError::InvalidRequest(message),
                405 => ShopError::MethodNotAllowed,
                _ => ShopError::Internal(message),
            });
        }

        let session: CheckoutSessionResponse = serde_json::from_slice(&body)?;
        if session.id.is_empty() {
            return Err(ShopError::Serialization("empty session id".to_string()));
        }
        Ok(session)
    }
}

/// Clears the processing flag when dropped
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Cart-to-hosted-checkout handoff for one browsing session
pub struct CheckoutClient {
    backend: Arc<dyn CheckoutBackend>,
    redirector: Arc<dyn Redirector>,
    notifier: Arc<dyn Notifier>,
    processing: AtomicBool,
}

impl CheckoutClient {
    pub fn new(
        backend: Arc<dyn CheckoutBackend>,
        redirector: Arc<dyn Redirector>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            backend,
            redirector,
            notifier,
            processing: AtomicBool::new(false),
        }
    }

    /// True while a checkout request is in flight
    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    /// Start checkout for `cart`.
    ///
    /// An empty cart is rejected before any network call. A call made while
    /// another is in flight returns `CheckoutInProgress` and sends nothing.
    #[instrument(skip_all, fields(entries = cart.len(), total = %cart.total().display()))]
    pub async fn checkout(&self, cart: &Cart) -> ShopResult<CheckoutSessionResponse> {
        if cart.is_empty() {
            let err = ShopError::EmptyCart;
            self.notifier.error(err.public_message());
            return Err(err);
        }

        let Some(_in_flight) = InFlight::acquire(&self.processing) else {
            debug!("Checkout ignored: request already in flight");
            return Err(ShopError::CheckoutInProgress);
        };

        let request = CheckoutSessionRequest::new(cart.line_items());

        match self.hand_off(&request).await {
            Ok(session) => {
                info!("Redirected to hosted checkout: session={}", session.id);
                Ok(session)
            }
            Err(e) => {
                error!("Checkout failed: {}", e);
                self.notifier.error(GENERIC_FAILURE);
                Err(e)
            }
        }
    }

    async fn hand_off(&self, request: &CheckoutSessionRequest) -> ShopResult<CheckoutSessionResponse> {
        let session = self.backend.create_session(request).await?;
        self.redirector.redirect(&session)?;
        Ok(session)
    }
}
