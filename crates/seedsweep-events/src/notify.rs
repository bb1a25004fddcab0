//! Notification sink used to forward run summaries.
//!
//! # Design
//! - One notification per logical outcome per run; the service decides when.
//! - Delivery is fire-and-forget: failures are logged, never surfaced.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Serialize;
use tracing::{debug, info};

/// Timeout applied to webhook deliveries.
const WEBHOOK_TIMEOUT: Duration = Duration::from_secs(2);

/// Logical grouping of a notification, one per run outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    /// Invalid-seed classification summary.
    Classification,
    /// Filesystem reconciliation summary.
    Reconciliation,
    /// Snapshot fetch failed or the client was empty.
    SourceError,
}

impl NotificationCategory {
    /// Stable label used in logs and webhook payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Classification => "classification",
            Self::Reconciliation => "reconciliation",
            Self::SourceError => "source_error",
        }
    }
}

/// A human-readable message forwarded to the configured sink.
#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    /// Outcome grouping.
    pub category: NotificationCategory,
    /// Short title line.
    pub title: String,
    /// Multi-line body.
    pub body: String,
}

/// Capability contract for notification sinks.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a notification. Implementations must not fail the caller.
    async fn notify(&self, notification: &Notification);
}

/// Notifier that writes notifications to the structured log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, notification: &Notification) {
        info!(
            category = notification.category.as_str(),
            title = %notification.title,
            body = %notification.body,
            "notification"
        );
    }
}

/// Notifier that POSTs notifications as JSON to a webhook endpoint.
#[derive(Clone)]
pub struct WebhookNotifier {
    client: Client,
    endpoint: Url,
}

impl WebhookNotifier {
    /// Construct a webhook notifier for the given endpoint.
    ///
    /// Returns `None` if the HTTP client cannot be built.
    #[must_use]
    pub fn new(endpoint: Url) -> Option<Self> {
        let client = Client::builder().timeout(WEBHOOK_TIMEOUT).build().ok()?;
        Some(Self { client, endpoint })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, notification: &Notification) {
        if let Err(err) = self
            .client
            .post(self.endpoint.clone())
            .json(notification)
            .send()
            .await
        {
            debug!(error = %err, "webhook notification delivery failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use httpmock::MockServer;
    use httpmock::prelude::*;

    fn sample_notification() -> Notification {
        Notification {
            category: NotificationCategory::Classification,
            title: "[seedsweep] invalid seeds".to_string(),
            body: "found 2 invalid seeds".to_string(),
        }
    }

    #[tokio::test]
    async fn webhook_notifier_posts_payload() -> Result<()> {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/hooks/sweep")
                .json_body_partial(r#"{"category": "classification"}"#);
            then.status(200);
        });

        let endpoint = format!("{}/hooks/sweep", server.base_url()).parse()?;
        let notifier = WebhookNotifier::new(endpoint).expect("client builds");
        notifier.notify(&sample_notification()).await;

        mock.assert();
        Ok(())
    }

    #[tokio::test]
    async fn webhook_notifier_swallows_delivery_failures() -> Result<()> {
        let endpoint = "http://127.0.0.1:9/unreachable".parse()?;
        let notifier = WebhookNotifier::new(endpoint).expect("client builds");
        // Must not panic or error.
        notifier.notify(&sample_notification()).await;
        Ok(())
    }

    #[tokio::test]
    async fn log_notifier_is_infallible() {
        LogNotifier.notify(&sample_notification()).await;
    }
}
