// src/notify.rs
//! Out-of-band delivery of trade summaries.
use crate::config::NotifyConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, subject: &str, message: &str) -> Result<()>;
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    subject: &'a str,
    message: &'a str,
}

/// POSTs `{"subject", "message"}` as JSON to a webhook.
pub struct WebhookNotifier {
    url: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(config: &NotifyConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("building webhook HTTP client")?;
        Ok(Self {
            url: config.webhook_url.clone(),
            token: config.token.clone(),
            client,
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(&self, subject: &str, message: &str) -> Result<()> {
        let mut request = self
            .client
            .post(&self.url)
            .json(&WebhookPayload { subject, message });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .with_context(|| format!("POST {}", self.url))?;
        response
            .error_for_status()
            .with_context(|| format!("webhook {} rejected notification", self.url))?;

        debug!(subject = %subject, "Notification delivered");
        Ok(())
    }
}
