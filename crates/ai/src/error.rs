use thiserror::Error;

/// Failure of a single completion request.
///
/// Never shown to end users: [`crate::PharmacyAssistant`] turns every
/// variant into the fallback reply.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("invalid query: {0}")]
    InvalidInput(String),

    #[error("assistant is not configured: {0}")]
    NotConfigured(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response ({status}): {body}")]
    UnexpectedResponse { status: u16, body: String },

    #[error("completion returned no text")]
    EmptyReply,
}
