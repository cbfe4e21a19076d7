use std::sync::Arc;

use async_trait::async_trait;
use quiz_core::model::{Profile, Question};

use super::QuestionSource;
use super::extract::parse_generated;
use crate::completion::{ChatCompletionsClient, CompletionClient};
use crate::config::GenerationConfig;
use crate::error::{GenerationFailure, QuestionSourceError};

/// Asks a hosted text generator for questions tailored to the profile.
///
/// Each `fetch` makes exactly one completion call. Nothing is retried; wrap the
/// source in `CachedQuestionSource` to reuse results for a repeated profile.
#[derive(Clone)]
pub struct GeneratedQuestionSource {
    client: Arc<dyn CompletionClient>,
}

impl GeneratedQuestionSource {
    #[must_use]
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    #[must_use]
    pub fn from_config(config: GenerationConfig) -> Self {
        Self::new(Arc::new(ChatCompletionsClient::new(config)))
    }
}

/// The instruction sent to the generator for `profile`.
#[must_use]
pub fn build_prompt(profile: &Profile, count: usize) -> String {
    format!(
        "Create a fun multiple-choice quiz for a {age}-year-old who loves {interests}.\n\
         Write exactly {count} questions drawn from school subjects such as English, Maths, \
         Science, History, Art & Design and Music, and theme them around those interests. \
         Keep the wording right for that age.\n\
         Reply with JSON only: an array of {count} objects, each with the keys \
         \"question\" (string), \"options\" (array of exactly 4 different strings), \
         \"answer\" (string, copied exactly from options), \"subject\" (string) and \
         \"explanation\" (one short sentence on why the answer is right).",
        age = profile.age(),
        interests = profile.describe_interests(),
    )
}

#[async_trait]
impl QuestionSource for GeneratedQuestionSource {
    async fn fetch(
        &self,
        profile: &Profile,
        count: usize,
    ) -> Result<Vec<Question>, QuestionSourceError> {
        tracing::info!(
            age = profile.age(),
            interests = %profile.describe_interests(),
            count,
            "requesting generated questions"
        );

        let prompt = build_prompt(profile, count);
        let raw = self
            .client
            .complete(&prompt)
            .await
            .map_err(GenerationFailure::from)?;
        let mut questions = parse_generated(&raw).map_err(GenerationFailure::from)?;

        if questions.is_empty() {
            return Err(QuestionSourceError::EmptyResult);
        }
        if questions.len() < count {
            tracing::warn!(
                requested = count,
                received = questions.len(),
                "generator returned fewer usable questions than requested"
            );
        }
        questions.truncate(count);
        Ok(questions)
    }
}
