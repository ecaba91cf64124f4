//! `Config::load` against the real process environment.
//!
//! Kept in its own test binary with a single test so that mutating the
//! environment cannot race other tests.

use std::env;
use std::io::Write;

use tvrelay::config::LogFormat;
use tvrelay::Config;

#[test]
fn test_environment_overrides_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
openai_api_key = "sk-file"
openai_model = "gpt-from-file"
twilio_account_sid = "ACfile"
twilio_auth_token = "tok-file"
twilio_whatsapp_from = "whatsapp:+1"
whatsapp_to = "whatsapp:+2"
tv_webhook_secret = "file-secret"
port = "8081"
log_format = "json"
"#
    )
    .unwrap();

    for key in ["OPENAI_MODEL", "LOG_FORMAT", "TWILIO_ACCOUNT_SID"] {
        env::remove_var(key);
    }
    env::set_var("PORT", "8089");
    env::set_var("TV_WEBHOOK_SECRET", " sec ");
    env::set_var("OPENAI_API_KEY", "sk-env");
    env::set_var("TWILIO_AUTH_TOKEN", "tok-env");

    let config = Config::load(Some(file.path())).unwrap();

    // Upper-case environment keys win over the file.
    assert_eq!(config.server.port, 8089);
    assert_eq!(config.webhook.secret, " sec ");
    assert_eq!(config.evaluation.api_key, "sk-env");
    assert_eq!(config.notification.auth_token, "tok-env");

    // Keys only present in the file still apply.
    assert_eq!(config.evaluation.model, "gpt-from-file");
    assert_eq!(config.notification.account_sid, "ACfile");
    assert_eq!(config.logging.format, LogFormat::Json);
}
