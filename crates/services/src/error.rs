//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{QuestionError, SessionError};

/// Errors raised while reading generator settings at startup.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("QUIZ_AI_API_KEY is not set")]
    MissingApiKey,
    #[error("QUIZ_AI_TIMEOUT_SECS must be a positive number of seconds, got `{0}`")]
    InvalidTimeout(String),
}

/// Errors emitted by a `CompletionClient`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompletionError {
    #[error("completion service returned an empty response")]
    EmptyResponse,
    #[error("completion request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// The generator's reply could not be turned into candidate items.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    #[error("no JSON found in generated text")]
    NoJson,
    #[error("generated JSON is invalid: {0}")]
    Json(#[from] serde_json::Error),
    #[error("generated JSON has an unexpected shape: {0}")]
    UnexpectedShape(&'static str),
}

/// A single generated item that was dropped.
///
/// Never propagated: sources log it and move on to the next item.
#[derive(Debug, Error)]
pub enum SchemaViolation {
    #[error("item is not a question object: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] QuestionError),
}

/// Cause attached to `QuestionSourceError::GenerationFailed`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationFailure {
    #[error(transparent)]
    Completion(#[from] CompletionError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Errors emitted by a `QuestionSource`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionSourceError {
    #[error("question generation failed: {0}")]
    GenerationFailed(#[from] GenerationFailure),
    #[error("no usable questions were produced")]
    EmptyResult,
}

/// Errors emitted by `QuizService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    #[error(transparent)]
    Source(#[from] QuestionSourceError),
    #[error(transparent)]
    Session(#[from] SessionError),
}
