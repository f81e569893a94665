use anyhow::Context;
use async_trait::async_trait;

use super::NotificationProvider;

/// Sends mail through an HTTP email API (Resend-style JSON endpoint). With no
/// API key configured, sends are skipped and logged, which keeps local
/// development mail-free.
pub struct HttpEmailProvider {
    api_url: String,
    api_key: String,
    from: String,
    client: reqwest::Client,
}

impl HttpEmailProvider {
    pub fn new(api_url: String, api_key: String, from: String) -> Self {
        Self {
            api_url,
            api_key,
            from,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl NotificationProvider for HttpEmailProvider {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        if self.api_key.is_empty() {
            tracing::info!(to, subject, "email sending disabled, skipping");
            return Ok(());
        }

        self.client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({
                "from": self.from,
                "to": [to],
                "subject": subject,
                "text": body,
            }))
            .send()
            .await
            .context("failed to reach email API")?
            .error_for_status()
            .context("email API returned error")?;

        Ok(())
    }
}
