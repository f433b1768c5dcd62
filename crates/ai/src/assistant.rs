use serde::{Deserialize, Serialize};

use crate::{AiError, GenerationConfig, TextCompletion};

/// Reply used whenever the completion service cannot answer.
pub const FALLBACK_REPLY: &str = "I'm sorry, I'm having trouble connecting to my knowledge base right now. Please contact our support team directly.";

const DEFAULT_BUSINESS_NAME: &str = "MediMart Pro (Harsh Enterprises)";

/// Full prompt for `query`: business preamble followed by the query itself.
pub fn build_prompt(business_name: &str, query: &str) -> String {
    format!(
        "You are a professional medical business assistant for {business_name}.\n\
         Answer the following customer query professionally and accurately.\n\
         Only provide general medical logistics/info, advise consulting a doctor for specific health issues.\n\
         \n\
         Query: {query}"
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantReply {
    pub text: String,
    /// `true` when `text` is [`FALLBACK_REPLY`] rather than a model answer.
    pub fallback: bool,
}

impl AssistantReply {
    fn answered(text: String) -> Self {
        Self {
            text,
            fallback: false,
        }
    }

    fn fallback() -> Self {
        Self {
            text: FALLBACK_REPLY.to_string(),
            fallback: true,
        }
    }
}

/// Customer-facing assistant over any [`TextCompletion`] backend.
pub struct PharmacyAssistant<C> {
    client: C,
    business_name: String,
    generation: GenerationConfig,
}

impl<C: TextCompletion> PharmacyAssistant<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            business_name: DEFAULT_BUSINESS_NAME.to_string(),
            generation: GenerationConfig::default(),
        }
    }

    pub fn with_business_name(mut self, business_name: impl Into<String>) -> Self {
        self.business_name = business_name.into();
        self
    }

    /// Ask one question.
    ///
    /// Only a blank query is an error. Any failure of the backend is logged
    /// and answered with [`FALLBACK_REPLY`]; nothing is retried.
    pub async fn ask(&self, query: &str) -> Result<AssistantReply, AiError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AiError::InvalidInput("query cannot be empty".to_string()));
        }

        let prompt = build_prompt(&self.business_name, query);
        match self.client.complete(&prompt, &self.generation).await {
            Ok(text) if !text.trim().is_empty() => {
                tracing::debug!(chars = text.len(), "assistant answered");
                Ok(AssistantReply::answered(text))
            }
            Ok(_) => {
                tracing::warn!(error = %AiError::EmptyReply, "assistant fell back");
                Ok(AssistantReply::fallback())
            }
            Err(err) => {
                tracing::warn!(error = %err, "assistant fell back");
                Ok(AssistantReply::fallback())
            }
        }
    }
}
