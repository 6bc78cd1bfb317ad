use crate::model::ResponderError;
use async_trait::async_trait;

/// Free-form text generation used when no deterministic answer exists.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ResponderError>;
}

/// Responder that never calls out; it answers with a fixed message.
pub struct OfflineResponder {
    message: String,
}

impl OfflineResponder {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl Responder for OfflineResponder {
    async fn generate(&self, _prompt: &str) -> Result<String, ResponderError> {
        if self.message.trim().is_empty() {
            return Err(ResponderError::Unavailable);
        }
        Ok(self.message.clone())
    }
}
