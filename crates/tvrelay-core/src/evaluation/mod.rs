//! Evaluation service
//!
//! A language model reads the prompt built for an alert and answers with free
//! text. The answer is treated as opaque.

mod openai;

pub use openai::OpenAiEvaluator;

use async_trait::async_trait;

use crate::error::Result;

/// Something that can give a second opinion on a trade prompt
#[async_trait]
pub trait Evaluator: Send + Sync {
    /// Send `prompt` and return the raw answer text.
    async fn evaluate(&self, prompt: &str) -> Result<String>;
}
