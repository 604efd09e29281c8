// SPDX-License-Identifier: MIT OR Apache-2.0
//! Postcard delivery by email.
//!
//! Delivery is an opaque collaborator: it is called once per send and its
//! outcome is handed back to the user as-is. There is no retry here.

use crate::error::{AppError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use vintage_postcard_codec::PostcardRecord;

/// EmailJS REST endpoint
pub const EMAILJS_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// Error text when the recipient address is blank
pub const EMPTY_RECIPIENT: &str = "Recipient email is empty";

/// What to deliver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryRequest {
    /// The frozen postcard
    pub record: PostcardRecord,
    /// Share link that opens the postcard
    pub postcard_url: String,
    /// Sender's reply address, if known
    pub sender_email: Option<String>,
}

impl DeliveryRequest {
    /// Create a request for a postcard and its link
    pub fn new(record: PostcardRecord, postcard_url: impl Into<String>) -> Self {
        Self {
            record,
            postcard_url: postcard_url.into(),
            sender_email: None,
        }
    }
}

/// Result reported by a delivery collaborator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryOutcome {
    /// Whether the postcard was handed off
    pub success: bool,
    /// Error text to show the user
    pub error: Option<String>,
    /// HTTP status, when one was received
    pub status: Option<u16>,
}

impl DeliveryOutcome {
    /// Successful delivery
    pub fn sent() -> Self {
        Self {
            success: true,
            error: None,
            status: None,
        }
    }

    /// Failed delivery
    pub fn failed(error: impl Into<String>, status: Option<u16>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
            status,
        }
    }

    /// Convert to a result for `?` propagation
    pub fn into_result(self) -> Result<()> {
        if self.success {
            return Ok(());
        }
        Err(AppError::DeliveryFailure {
            message: self
                .error
                .unwrap_or_else(|| "Failed to send postcard".to_string()),
            status: self.status,
        })
    }
}

/// Sends a postcard link to its recipient
#[async_trait]
pub trait DeliveryService: Send + Sync {
    /// Deliver once and report the outcome
    async fn send(&self, request: &DeliveryRequest) -> DeliveryOutcome;
}

/// EmailJS account settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeliveryConfig {
    /// REST endpoint
    pub endpoint: String,
    /// EmailJS service id
    pub service_id: String,
    /// EmailJS template id
    pub template_id: String,
    /// EmailJS public key
    pub public_key: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            endpoint: EMAILJS_ENDPOINT.to_string(),
            service_id: String::new(),
            template_id: String::new(),
            public_key: String::new(),
            timeout_secs: 30,
        }
    }
}

/// Template variables. Both the app's own names and the names common EmailJS
/// templates expect are filled in.
#[derive(Debug, Serialize)]
struct TemplateParams<'a> {
    recipient_name: &'a str,
    recipient_email: &'a str,
    sender_name: &'a str,
    postcard_url: &'a str,
    message_preview: String,
    to_email: &'a str,
    to_name: &'a str,
    from_name: &'a str,
    from_email: &'a str,
    name: &'a str,
    time: String,
    message: &'a str,
}

impl<'a> TemplateParams<'a> {
    fn new(request: &'a DeliveryRequest, time: String) -> Self {
        let record = &request.record;
        Self {
            recipient_name: &record.recipient_name,
            recipient_email: &record.recipient_email,
            sender_name: &record.sender_name,
            postcard_url: &request.postcard_url,
            message_preview: record.message_preview(),
            to_email: &record.recipient_email,
            to_name: &record.recipient_name,
            from_name: &record.sender_name,
            from_email: request.sender_email.as_deref().unwrap_or_default(),
            name: &record.sender_name,
            time,
            message: &record.message,
        }
    }
}

#[derive(Debug, Serialize)]
struct SendBody<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: TemplateParams<'a>,
}

/// Delivery through the EmailJS REST API
pub struct EmailJsDelivery {
    client: reqwest::Client,
    config: DeliveryConfig,
}

impl EmailJsDelivery {
    /// Create a client for an EmailJS account
    pub fn new(config: DeliveryConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::DeliveryFailure {
                message: e.to_string(),
                status: None,
            })?;

        Ok(Self { client, config })
    }

    /// Account settings in use
    pub fn config(&self) -> &DeliveryConfig {
        &self.config
    }

    async fn deliver(&self, request: &DeliveryRequest) -> DeliveryOutcome {
        if request.record.recipient_email.trim().is_empty() {
            tracing::warn!("Not sending postcard: {EMPTY_RECIPIENT}");
            return DeliveryOutcome::failed(EMPTY_RECIPIENT, None);
        }

        let time = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let body = SendBody {
            service_id: &self.config.service_id,
            template_id: &self.config.template_id,
            user_id: &self.config.public_key,
            template_params: TemplateParams::new(request, time),
        };

        tracing::debug!("Posting postcard to {}", self.config.endpoint);
        let response = match self.client.post(&self.config.endpoint).json(&body).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Postcard delivery failed: {e}");
                let status = e.status().as_ref().map(reqwest::StatusCode::as_u16);
                return DeliveryOutcome::failed(e.to_string(), status);
            }
        };

        let status = response.status();
        if status.is_success() {
            tracing::info!("Postcard sent to {}", request.record.recipient_email);
            return DeliveryOutcome::sent();
        }

        let text = response.text().await.unwrap_or_default();
        let message = if text.trim().is_empty() {
            status
                .canonical_reason()
                .unwrap_or("Failed to send email")
                .to_string()
        } else {
            text
        };
        tracing::warn!("Postcard delivery rejected ({status}): {message}");
        DeliveryOutcome::failed(message, Some(status.as_u16()))
    }
}

#[async_trait]
impl DeliveryService for EmailJsDelivery {
    async fn send(&self, request: &DeliveryRequest) -> DeliveryOutcome {
        self.deliver(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(server: &MockServer) -> DeliveryConfig {
        DeliveryConfig {
            endpoint: format!("{}/api/v1.0/email/send", server.uri()),
            service_id: "service_test".to_string(),
            template_id: "template_test".to_string(),
            public_key: "public_test".to_string(),
            timeout_secs: 5,
        }
    }

    fn request(email: &str) -> DeliveryRequest {
        let record = PostcardRecord::new()
            .with_photo("https://example.com/p.jpg")
            .with_message("See you soon")
            .with_contact("Ada", "Grace", email);
        DeliveryRequest::new(record, "https://postcards.example/?postcard=abc")
    }

    #[tokio::test]
    async fn test_sends_template_params() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1.0/email/send"))
            .and(body_partial_json(json!({
                "service_id": "service_test",
                "template_id": "template_test",
                "user_id": "public_test",
                "template_params": {
                    "to_email": "grace@example.com",
                    "to_name": "Grace",
                    "from_name": "Ada",
                    "from_email": "",
                    "postcard_url": "https://postcards.example/?postcard=abc",
                    "message_preview": "See you soon...",
                    "message": "See you soon"
                }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
            .expect(1)
            .mount(&server)
            .await;

        let delivery = EmailJsDelivery::new(config(&server)).unwrap();
        let outcome = delivery.send(&request("grace@example.com")).await;
        assert_eq!(outcome, DeliveryOutcome::sent());
    }

    #[tokio::test]
    async fn test_rejection_is_surfaced_verbatim() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("The Public Key is invalid."))
            .expect(1)
            .mount(&server)
            .await;

        let delivery = EmailJsDelivery::new(config(&server)).unwrap();
        let outcome = delivery.send(&request("grace@example.com")).await;
        assert_eq!(
            outcome,
            DeliveryOutcome::failed("The Public Key is invalid.", Some(400))
        );

        let err = outcome.into_result().unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_empty_recipient_short_circuits() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let delivery = EmailJsDelivery::new(config(&server)).unwrap();
        let outcome = delivery.send(&request("  ")).await;
        assert_eq!(outcome, DeliveryOutcome::failed(EMPTY_RECIPIENT, None));
    }

    #[test]
    fn test_outcome_into_result() {
        assert!(DeliveryOutcome::sent().into_result().is_ok());
        let err = DeliveryOutcome::default().into_result().unwrap_err();
        assert_eq!(err.to_string(), "Delivery failed: Failed to send postcard");
    }
}
