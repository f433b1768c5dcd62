//! `medimart-ai`
//!
//! **Responsibility:** the pharmacy assistant boundary.
//!
//! This crate is intentionally **not** part of the domain model:
//! - It does not depend on catalog, order or ticket aggregates.
//! - It never mutates store state.
//! - A failed completion degrades to a fixed apology reply, never an error.

pub mod assistant;
pub mod completion;
pub mod error;
pub mod gemini;

pub use assistant::{AssistantReply, FALLBACK_REPLY, PharmacyAssistant, build_prompt};
pub use completion::{GenerationConfig, TextCompletion};
pub use error::AiError;
pub use gemini::{DEFAULT_GEMINI_MODEL, GeminiClient, GeminiConfig};
