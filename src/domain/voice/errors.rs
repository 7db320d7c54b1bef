//! Voice Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VoiceError {
    #[error("Malformed voice expression '{expression}': {reason}")]
    MalformedExpression { expression: String, reason: String },

    #[error("Invalid voice name: {0}")]
    InvalidName(String),
}

impl VoiceError {
    pub fn malformed(expression: &str, reason: impl Into<String>) -> Self {
        Self::MalformedExpression {
            expression: expression.to_string(),
            reason: reason.into(),
        }
    }
}
