#![forbid(unsafe_code)]

pub mod completion;
pub mod config;
pub mod error;
pub mod quiz_service;
pub mod sources;

pub use quiz_core::Clock;

pub use completion::{ChatCompletionsClient, CompletionClient};
pub use config::GenerationConfig;
pub use error::{
    CompletionError, ConfigError, GenerationFailure, ParseError, QuestionSourceError,
    QuizServiceError, SchemaViolation,
};
pub use quiz_service::{DEFAULT_QUESTION_COUNT, QuizService};
pub use sources::{
    CachedQuestionSource, GeneratedQuestionSource, QuestionSource, StaticQuestionSource,
    extract_json, parse_generated,
};
