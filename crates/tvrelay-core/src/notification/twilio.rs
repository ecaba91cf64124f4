//! Twilio Messages API client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::{Notifier, OutboundMessage};
use crate::config::NotificationConfig;
use crate::error::{Error, Result};

/// Sends messages (WhatsApp or SMS) through Twilio
pub struct TwilioNotifier {
    client: Client,
    account_sid: String,
    auth_token: String,
    endpoint: String,
}

impl TwilioNotifier {
    /// Create a new notifier from configuration
    pub fn new(config: &NotificationConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            account_sid: config.account_sid.clone(),
            auth_token: config.auth_token.clone(),
            endpoint: format!(
                "{}/Accounts/{}/Messages.json",
                config.base_url, config.account_sid
            ),
        })
    }
}

#[async_trait]
impl Notifier for TwilioNotifier {
    #[instrument(skip_all, fields(to = %message.to))]
    async fn send(&self, message: &OutboundMessage) -> Result<()> {
        let form = MessageForm {
            from: &message.from,
            to: &message.to,
            body: &message.body,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&form)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::notification(format!(
                "Twilio returned {status}: {body}"
            )));
        }

        // The SID is informational; a 2xx without it still counts as delivered.
        let created: CreatedMessage = response.json().await.unwrap_or_default();
        info!(sid = created.sid.as_deref().unwrap_or("-"), "Notification sent");

        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct MessageForm<'a> {
    #[serde(rename = "From")]
    from: &'a str,
    #[serde(rename = "To")]
    to: &'a str,
    #[serde(rename = "Body")]
    body: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct CreatedMessage {
    #[serde(default)]
    sid: Option<String>,
}
