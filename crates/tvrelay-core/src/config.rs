//! Configuration management for tvrelay
//!
//! Settings come from flat, case-insensitive keys (`OPENAI_API_KEY`, `PORT`, ...)
//! read from an optional config file and the process environment. They are
//! validated once at startup into an immutable [`Config`] that is handed to the
//! server and its clients explicitly.

use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};

/// Main configuration struct
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// Webhook intake configuration
    pub webhook: WebhookConfig,

    /// Evaluation service configuration
    pub evaluation: EvaluationConfig,

    /// Notification service configuration
    pub notification: NotificationConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// HTTP port
    pub port: u16,
}

impl ServerConfig {
    /// `host:port` string suitable for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Webhook intake configuration
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Shared secret every alert must carry in its `secret` field
    pub secret: String,
}

/// Evaluation (language model) service configuration
#[derive(Debug, Clone)]
pub struct EvaluationConfig {
    /// API key
    pub api_key: String,
    /// Model identifier
    pub model: String,
    /// API base URL, without trailing slash
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

/// Notification (messaging relay) service configuration
#[derive(Debug, Clone)]
pub struct NotificationConfig {
    /// Account identifier
    pub account_sid: String,
    /// Auth token
    pub auth_token: String,
    /// Fixed sender identity, e.g. `whatsapp:+14155238886`
    pub from: String,
    /// Fixed recipient identity
    pub to: String,
    /// API base URL, without trailing slash
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

impl FromStr for LogFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(Error::config(format!(
                "LOG_FORMAT must be 'pretty' or 'json', got '{other}'"
            ))),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level, used when `RUST_LOG` is not set
    pub level: String,
    /// Log format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MODEL: &str = "gpt-4.1-mini";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_TIMEOUT: Duration = Duration::from_secs(600);
const DEFAULT_TWILIO_BASE_URL: &str = "https://api.twilio.com/2010-04-01";
const DEFAULT_TWILIO_TIMEOUT: Duration = Duration::from_secs(30);

/// Raw flat settings as they appear in the environment or a config file.
///
/// Everything is read as an optional string so that empty values fall back to
/// defaults instead of failing deserialization.
#[derive(Debug, Default, Deserialize)]
struct Settings {
    openai_api_key: Option<String>,
    openai_model: Option<String>,
    openai_base_url: Option<String>,
    openai_timeout: Option<String>,
    twilio_account_sid: Option<String>,
    twilio_auth_token: Option<String>,
    twilio_whatsapp_from: Option<String>,
    twilio_base_url: Option<String>,
    twilio_timeout: Option<String>,
    whatsapp_to: Option<String>,
    tv_webhook_secret: Option<String>,
    host: Option<String>,
    port: Option<String>,
    log_level: Option<String>,
    log_format: Option<String>,
}

impl Config {
    /// Load configuration from `.env`, an optional config file, and the
    /// process environment (highest precedence).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }
        let settings: Settings = builder
            .add_source(config::Environment::default())
            .build()?
            .try_deserialize()?;

        Self::from_settings(settings)
    }

    /// Load configuration from a single config file, ignoring the environment.
    pub fn from_file(path: &Path) -> Result<Self> {
        let settings: Settings = config::Config::builder()
            .add_source(config::File::from(path))
            .build()?
            .try_deserialize()?;

        Self::from_settings(settings)
    }

    fn from_settings(s: Settings) -> Result<Self> {
        let server = ServerConfig {
            host: non_empty(s.host).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: match non_empty(s.port) {
                Some(port) => port
                    .parse()
                    .map_err(|_| Error::config(format!("PORT is not a valid port: '{port}'")))?,
                None => DEFAULT_PORT,
            },
        };

        let webhook = WebhookConfig {
            secret: required_verbatim(s.tv_webhook_secret, "TV_WEBHOOK_SECRET")?,
        };

        let evaluation = EvaluationConfig {
            api_key: required(s.openai_api_key, "OPENAI_API_KEY")?,
            model: non_empty(s.openai_model).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: base_url(s.openai_base_url, DEFAULT_OPENAI_BASE_URL, "OPENAI_BASE_URL")?,
            timeout: timeout(s.openai_timeout, DEFAULT_OPENAI_TIMEOUT, "OPENAI_TIMEOUT")?,
        };

        let notification = NotificationConfig {
            account_sid: required(s.twilio_account_sid, "TWILIO_ACCOUNT_SID")?,
            auth_token: required(s.twilio_auth_token, "TWILIO_AUTH_TOKEN")?,
            from: required(s.twilio_whatsapp_from, "TWILIO_WHATSAPP_FROM")?,
            to: required(s.whatsapp_to, "WHATSAPP_TO")?,
            base_url: base_url(s.twilio_base_url, DEFAULT_TWILIO_BASE_URL, "TWILIO_BASE_URL")?,
            timeout: timeout(s.twilio_timeout, DEFAULT_TWILIO_TIMEOUT, "TWILIO_TIMEOUT")?,
        };

        let logging = LoggingConfig {
            level: non_empty(s.log_level).unwrap_or_else(|| "info".to_string()),
            format: match non_empty(s.log_format) {
                Some(format) => format.parse()?,
                None => LogFormat::default(),
            },
        };

        Ok(Self {
            server,
            webhook,
            evaluation,
            notification,
            logging,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(value: Option<String>, key: &str) -> Result<String> {
    non_empty(value).ok_or_else(|| Error::config(format!("{key} is not set")))
}

/// Like [`required`] but keeps surrounding whitespace: the value is compared
/// byte for byte.
fn required_verbatim(value: Option<String>, key: &str) -> Result<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| Error::config(format!("{key} is not set")))
}

fn base_url(value: Option<String>, default: &str, key: &str) -> Result<String> {
    let raw = non_empty(value).unwrap_or_else(|| default.to_string());
    url::Url::parse(&raw).map_err(|e| Error::config(format!("{key} is not a valid URL: {e}")))?;
    Ok(raw.trim_end_matches('/').to_string())
}

fn timeout(value: Option<String>, default: Duration, key: &str) -> Result<Duration> {
    match non_empty(value) {
        Some(raw) => humantime::parse_duration(&raw)
            .map_err(|e| Error::config(format!("{key} is not a valid duration: {e}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn complete() -> Settings {
        Settings {
            openai_api_key: Some("sk-test".to_string()),
            twilio_account_sid: Some("AC123".to_string()),
            twilio_auth_token: Some("token".to_string()),
            twilio_whatsapp_from: Some("whatsapp:+14155238886".to_string()),
            whatsapp_to: Some("whatsapp:+541155962485".to_string()),
            tv_webhook_secret: Some("s3cret".to_string()),
            ..Settings::default()
        }
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_settings(complete()).unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.bind_addr(), "0.0.0.0:3000");
        assert_eq!(config.evaluation.model, "gpt-4.1-mini");
        assert_eq!(config.evaluation.base_url, "https://api.openai.com/v1");
        assert_eq!(config.notification.base_url, "https://api.twilio.com/2010-04-01");
        assert_eq!(config.notification.timeout, Duration::from_secs(30));
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn test_empty_port_falls_back_to_default() {
        let settings = Settings {
            port: Some(String::new()),
            ..complete()
        };
        assert_eq!(Config::from_settings(settings).unwrap().server.port, 3000);
    }

    #[test]
    fn test_invalid_port_rejected() {
        let settings = Settings {
            port: Some("http".to_string()),
            ..complete()
        };
        assert!(matches!(Config::from_settings(settings), Err(Error::Config(_))));
    }

    #[test]
    fn test_missing_secret_rejected() {
        let settings = Settings {
            tv_webhook_secret: Some("  ".to_string()),
            ..complete()
        };
        let err = Config::from_settings(settings).unwrap_err();
        assert!(err.to_string().contains("TV_WEBHOOK_SECRET"));
    }

    #[test]
    fn test_secret_kept_verbatim() {
        let settings = Settings {
            tv_webhook_secret: Some(" sec ".to_string()),
            ..complete()
        };
        let config = Config::from_settings(settings).unwrap();
        assert_eq!(config.webhook.secret, " sec ");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let settings = Settings {
            openai_base_url: Some("http://localhost:9000/v1/".to_string()),
            openai_timeout: Some("15s".to_string()),
            ..complete()
        };
        let config = Config::from_settings(settings).unwrap();
        assert_eq!(config.evaluation.base_url, "http://localhost:9000/v1");
        assert_eq!(config.evaluation.timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
openai_api_key = "sk-file"
twilio_account_sid = "AC999"
twilio_auth_token = "tok"
twilio_whatsapp_from = "whatsapp:+1"
whatsapp_to = "whatsapp:+2"
tv_webhook_secret = "abc"
port = "8081"
log_format = "json"
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.webhook.secret, "abc");
        assert_eq!(config.evaluation.api_key, "sk-file");
        assert_eq!(config.notification.account_sid, "AC999");
        assert_eq!(config.logging.format, LogFormat::Json);
    }
}
