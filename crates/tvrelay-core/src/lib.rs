//! # tvrelay
//!
//! Relays charting-platform trade alerts to a human, with a language model's
//! second opinion attached.
//!
//! ## Flow
//!
//! - **API**: `POST /tv` receives an alert and checks its shared secret
//! - **Models**: the payload is normalized through field aliases
//! - **Sizing**: a naive position size is derived from close and stop
//! - **Evaluation**: a language model answers a fixed-format prompt
//! - **Notification**: the verdict is forwarded over a messaging channel
//!
//! ## Quick Start
//!
//! ```bash
//! # Start the webhook server
//! tvrelay serve
//!
//! # Inspect how an alert would be normalized and prompted
//! tvrelay preview alert.json
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod api;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod models;
pub mod notification;
pub mod prompt;
pub mod relay;
pub mod sizing;

pub use config::Config;
pub use error::{Error, Result};

/// Re-exports for convenience
pub mod prelude {
    pub use crate::api::{create_router, HttpServer};
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::evaluation::{Evaluator, OpenAiEvaluator};
    pub use crate::models::*;
    pub use crate::notification::{Notifier, OutboundMessage, TwilioNotifier};
    pub use crate::relay::{AlertRelay, Delivery};
    pub use crate::sizing::PositionSize;
}
