mod cached;
mod extract;
mod fixed;
mod generated;

use async_trait::async_trait;
use quiz_core::model::{Profile, Question};

use crate::error::QuestionSourceError;

pub use cached::CachedQuestionSource;
pub use extract::{extract_json, parse_generated, validate_item};
pub use fixed::StaticQuestionSource;
pub use generated::{GeneratedQuestionSource, build_prompt};

/// Supplies the ordered, validated question list a session runs over.
///
/// Every returned `Question` already satisfies the question invariant; items
/// that could not be validated are dropped before they get here.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Produce up to `count` questions tailored to `profile`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionSourceError::GenerationFailed` when an external
    /// generator fails and `QuestionSourceError::EmptyResult` when nothing
    /// usable remains.
    async fn fetch(
        &self,
        profile: &Profile,
        count: usize,
    ) -> Result<Vec<Question>, QuestionSourceError>;

    /// Like `fetch`, but never answers from remembered results.
    ///
    /// Used when the learner explicitly asks for new questions.
    ///
    /// # Errors
    ///
    /// Same as `fetch`.
    async fn refresh(
        &self,
        profile: &Profile,
        count: usize,
    ) -> Result<Vec<Question>, QuestionSourceError> {
        self.fetch(profile, count).await
    }
}
