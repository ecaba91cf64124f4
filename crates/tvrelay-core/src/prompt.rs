//! Prompt and notification text
//!
//! The template is the only contract with the evaluation service. Its answer
//! is never parsed, only forwarded.

use crate::models::{format_price, Alert};
use crate::sizing::PositionSize;

/// Verdict forwarded when the evaluation service fails or answers nothing.
/// Keeps the same six-line shape the prompt asks for.
pub const FALLBACK_VERDICT: &str = "NO OK\n- Sin respuesta\n- \n- \nSTOP: ?\nSIZE: ?";

/// Emoji prefix of the notification header
pub const HEADER_PREFIX: &str = "📣";

const INSTRUCTIONS: &str = "\
Respondé SOLO en este formato:

OK o NO OK
- razón 1
- razón 2
- razón 3
STOP: <precio>
SIZE: <tamaño>";

/// Build the evaluation prompt for one alert.
pub fn build_prompt(alert: &Alert, sizing: &PositionSize) -> String {
    let prompt = format!(
        "{INSTRUCTIONS}\n\n\
         Datos:\n\
         symbol={symbol}\n\
         tf={tf}\n\
         side={side}\n\
         close={close}\n\
         stop={stop}\n\
         ema21={ema21} ema50={ema50} ema200={ema200}\n\
         adx={adx}\n\
         risk_usdt={risk}\n\
         size_sugerido={size}",
        symbol = alert.symbol,
        tf = alert.timeframe,
        side = alert.side,
        close = format_price(alert.close),
        stop = format_price(alert.stop),
        ema21 = alert.ema21,
        ema50 = alert.ema50,
        ema200 = alert.ema200,
        adx = alert.adx,
        risk = sizing.display_risk(),
        size = sizing.display_size(),
    );

    prompt.trim().to_string()
}

/// Pick the text to forward: the trimmed answer, or [`FALLBACK_VERDICT`]
/// when there is none.
pub fn verdict_or_fallback(answer: Option<&str>) -> (String, bool) {
    match answer.map(str::trim).filter(|text| !text.is_empty()) {
        Some(text) => (text.to_string(), false),
        None => (FALLBACK_VERDICT.to_string(), true),
    }
}

/// Notification body: a `📣 symbol timeframe side` header, then the verdict.
pub fn notification_body(alert: &Alert, verdict: &str) -> String {
    format!("{HEADER_PREFIX} {}\n{verdict}", alert.headline())
}
