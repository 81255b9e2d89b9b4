//! # Contact Relay
//!
//! Contact form state and delivery through EmailJS.

use crate::config::EmailJsConfig;
use crate::notify::{Notifier, GENERIC_FAILURE, MESSAGE_SENT};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use shop_core::{ContactMessage, MessageRelay, ShopError, ShopResult};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// The three contact form fields as the shopper is typing them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactForm {
    pub fn to_message(&self) -> ContactMessage {
        ContactMessage {
            name: self.name.clone(),
            email: self.email.clone(),
            message: self.message.clone(),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// `MessageRelay` backed by the EmailJS REST API
pub struct EmailJsRelay {
    config: EmailJsConfig,
    client: Client,
}

#[derive(Serialize)]
struct EmailJsSend<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a ContactMessage,
}

impl EmailJsRelay {
    pub fn new(config: EmailJsConfig, timeout: Duration) -> ShopResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ShopError::Configuration(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl MessageRelay for EmailJsRelay {
    #[instrument(skip(self, message), fields(template = %self.config.template_id))]
    async fn send_message(&self, message: &ContactMessage) -> ShopResult<()> {
        let payload = EmailJsSend {
            service_id: &self.config.service_id,
            template_id: &self.config.template_id,
            user_id: &self.config.public_key,
            template_params: message,
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ShopError::SubmissionFailure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ShopError::SubmissionFailure(format!(
                "HTTP {}: {}",
                status, body
            )));
        }
        Ok(())
    }

    fn relay_name(&self) -> &'static str {
        "emailjs"
    }
}

/// Submits the contact form and reports the outcome to the shopper
pub struct ContactRelayClient {
    relay: Arc<dyn MessageRelay>,
    notifier: Arc<dyn Notifier>,
}

impl ContactRelayClient {
    pub fn new(relay: Arc<dyn MessageRelay>, notifier: Arc<dyn Notifier>) -> Self {
        Self { relay, notifier }
    }

    /// Send the form. Clears it on success; leaves it untouched on failure.
    pub async fn submit(&self, form: &mut ContactForm) -> ShopResult<()> {
        let message = form.to_message();

        let sent = match message.validate() {
            Ok(()) => self.relay.send_message(&message).await.map_err(|e| match e {
                ShopError::SubmissionFailure(_) => e,
                other => ShopError::SubmissionFailure(other.to_string()),
            }),
            Err(e) => Err(e),
        };

        match sent {
            Ok(()) => {
                info!("Contact message delivered via {}", self.relay.relay_name());
                form.clear();
                self.notifier.success(MESSAGE_SENT);
                Ok(())
            }
            Err(e) => {
                warn!("Contact message not sent: {}", e);
                self.notifier.error(GENERIC_FAILURE);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FlakyRelay, RecordingNotifier};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn filled() -> ContactForm {
        ContactForm {
            name: "Arben".into(),
            email: "arben@example.com".into(),
            message: "Dua një ofertë për 10 panele.".into(),
        }
    }

    #[tokio::test]
    async fn test_success_clears_form() {
        let relay = Arc::new(FlakyRelay::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let client = ContactRelayClient::new(relay.clone(), notifier.clone());

        let mut form = filled();
        client.submit(&mut form).await.unwrap();

        assert_eq!(form, ContactForm::default());
        assert_eq!(relay.delivered.lock().unwrap()[0].name, "Arben");
        assert_eq!(notifier.successes(), vec![MESSAGE_SENT.to_string()]);
    }

    #[tokio::test]
    async fn test_failure_keeps_form() {
        let relay = Arc::new(FlakyRelay::failing(1));
        let notifier = Arc::new(RecordingNotifier::default());
        let client = ContactRelayClient::new(relay.clone(), notifier.clone());

        let mut form = filled();
        let err = client.submit(&mut form).await.unwrap_err();

        assert!(matches!(err, ShopError::SubmissionFailure(_)));
        assert_eq!(form, filled());
        assert_eq!(notifier.errors(), vec![GENERIC_FAILURE.to_string()]);

        // Shopper presses send again
        client.submit(&mut form).await.unwrap();
        assert_eq!(relay.attempts(), 2);
    }

    #[tokio::test]
    async fn test_incomplete_form_is_not_sent() {
        let relay = Arc::new(FlakyRelay::default());
        let client = ContactRelayClient::new(relay.clone(), Arc::new(RecordingNotifier::default()));

        let mut form = ContactForm {
            message: String::new(),
            ..filled()
        };
        let err = client.submit(&mut form).await.unwrap_err();

        assert!(matches!(err, ShopError::InvalidRequest(_)));
        assert_eq!(relay.attempts(), 0);
        assert_eq!(form.name, "Arben");
    }

    #[tokio::test]
    async fn test_emailjs_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1.0/email/send"))
            .and(body_json(json!({
                "service_id": "service_abc",
                "template_id": "template_contact",
                "user_id": "pk_123",
                "template_params": {
                    "name": "Arben",
                    "email": "arben@example.com",
                    "message": "Dua një ofertë për 10 panele."
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
            .expect(1)
            .mount(&server)
            .await;

        let config = EmailJsConfig::new("service_abc", "template_contact", "pk_123")
            .with_api_url(format!("{}/api/v1.0/email/send", server.uri()));
        let relay = EmailJsRelay::new(config, Duration::from_secs(5)).unwrap();

        relay.send_message(&filled().to_message()).await.unwrap();
    }

    #[tokio::test]
    async fn test_emailjs_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("The user ID is invalid"))
            .mount(&server)
            .await;

        let config = EmailJsConfig::new("service_abc", "template_contact", "bad")
            .with_api_url(server.uri());
        let relay = EmailJsRelay::new(config, Duration::from_secs(5)).unwrap();

        let err = relay.send_message(&filled().to_message()).await.unwrap_err();
        assert!(matches!(err, ShopError::SubmissionFailure(_)));
    }
}
