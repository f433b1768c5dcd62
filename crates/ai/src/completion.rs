use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::AiError;

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.95,
        }
    }
}

/// A remote text-completion service.
///
/// One prompt in, one reply out. Implementations do not retry.
#[async_trait]
pub trait TextCompletion: Send + Sync {
    async fn complete(&self, prompt: &str, config: &GenerationConfig) -> Result<String, AiError>;
}

#[async_trait]
impl<T> TextCompletion for std::sync::Arc<T>
where
    T: TextCompletion + ?Sized,
{
    async fn complete(&self, prompt: &str, config: &GenerationConfig) -> Result<String, AiError> {
        (**self).complete(prompt, config).await
    }
}
