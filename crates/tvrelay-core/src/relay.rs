//! Alert relay
//!
//! One linear pass per webhook: check the shared secret, normalize the
//! payload, size the position, ask the evaluation service for a verdict and
//! forward it to the notification service. Only the evaluation step recovers
//! from errors; everything else propagates to the caller.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, instrument, warn, Instrument};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::evaluation::Evaluator;
use crate::models::Alert;
use crate::notification::{Notifier, OutboundMessage};
use crate::prompt::{build_prompt, notification_body, verdict_or_fallback};
use crate::sizing::PositionSize;

/// Outcome of a relayed alert
#[derive(Debug, Clone, Serialize)]
pub struct Delivery {
    /// Normalized alert
    pub alert: Alert,
    /// Suggested size
    pub sizing: PositionSize,
    /// Text that was forwarded under the header
    pub verdict: String,
    /// Whether the verdict is the fixed fallback
    pub fallback: bool,
}

/// Validates, evaluates and forwards webhook alerts
pub struct AlertRelay {
    secret: String,
    sender: String,
    recipient: String,
    evaluator: Arc<dyn Evaluator>,
    notifier: Arc<dyn Notifier>,
}

impl AlertRelay {
    /// Create a relay with explicit collaborators
    pub fn new(
        secret: impl Into<String>,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        evaluator: Arc<dyn Evaluator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            secret: secret.into(),
            sender: sender.into(),
            recipient: recipient.into(),
            evaluator,
            notifier,
        }
    }

    /// Create a relay using the secret and identities from configuration
    pub fn from_config(
        config: &Config,
        evaluator: Arc<dyn Evaluator>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self::new(
            config.webhook.secret.clone(),
            config.notification.from.clone(),
            config.notification.to.clone(),
            evaluator,
            notifier,
        )
    }

    /// Check that `payload` carries the shared secret as a string and hand the
    /// authenticated payload back.
    pub fn authenticate<'a>(&self, payload: Option<&'a Value>) -> Result<&'a Value> {
        let payload = payload.ok_or(Error::Unauthorized)?;

        match payload.get("secret").and_then(Value::as_str) {
            Some(secret) if secret == self.secret => Ok(payload),
            _ => Err(Error::Unauthorized),
        }
    }

    /// Relay one webhook payload. `None` means the request had no usable body.
    pub async fn handle(&self, payload: Option<&Value>) -> Result<Delivery> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("alert", %request_id);

        async {
            let payload = match self.authenticate(payload) {
                Ok(payload) => payload,
                Err(err) => {
                    warn!("Rejected alert with missing or invalid secret");
                    return Err(err);
                }
            };

            let alert = Alert::from_payload(payload);
            let sizing = PositionSize::compute(alert.close, alert.stop);
            info!(
                symbol = %alert.symbol,
                timeframe = %alert.timeframe,
                side = %alert.side,
                size = sizing.size,
                "Alert received"
            );

            let prompt = build_prompt(&alert, &sizing);
            let (verdict, fallback) = self.evaluate(&prompt).await;

            let message = OutboundMessage {
                from: self.sender.clone(),
                to: self.recipient.clone(),
                body: notification_body(&alert, &verdict),
            };
            self.notifier.send(&message).await?;

            info!(fallback, "Alert relayed");
            Ok(Delivery {
                alert,
                sizing,
                verdict,
                fallback,
            })
        }
        .instrument(span)
        .await
    }

    /// Ask for a verdict, degrading to the fallback text on any failure.
    #[instrument(skip_all)]
    async fn evaluate(&self, prompt: &str) -> (String, bool) {
        match self.evaluator.evaluate(prompt).await {
            Ok(answer) => {
                let (verdict, fallback) = verdict_or_fallback(Some(&answer));
                if fallback {
                    warn!("Evaluation service returned an empty answer, using fallback");
                }
                (verdict, fallback)
            }
            Err(err) => {
                warn!(error = %err, "Evaluation failed, using fallback");
                verdict_or_fallback(None)
            }
        }
    }
}
