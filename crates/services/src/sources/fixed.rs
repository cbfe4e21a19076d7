use async_trait::async_trait;
use quiz_core::catalog;
use quiz_core::model::{Profile, Question};
use rand::seq::SliceRandom;

use super::QuestionSource;
use crate::error::QuestionSourceError;

/// Serves a fixed question list, ignoring the profile.
#[derive(Debug, Clone)]
pub struct StaticQuestionSource {
    questions: Vec<Question>,
    shuffle: bool,
}

impl StaticQuestionSource {
    /// The built-in catalog.
    #[must_use]
    pub fn canned() -> Self {
        Self::new(catalog::canned_questions())
    }

    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            shuffle: false,
        }
    }

    /// Serve questions in a random order on every fetch.
    #[must_use]
    pub fn with_shuffle(mut self, shuffle: bool) -> Self {
        self.shuffle = shuffle;
        self
    }

    fn select(&self, count: usize) -> Vec<Question> {
        let mut selected = self.questions.clone();
        if self.shuffle {
            selected.shuffle(&mut rand::rng());
        }
        selected.truncate(count);
        selected
    }
}

#[async_trait]
impl QuestionSource for StaticQuestionSource {
    async fn fetch(
        &self,
        _profile: &Profile,
        count: usize,
    ) -> Result<Vec<Question>, QuestionSourceError> {
        let selected = self.select(count);
        if selected.is_empty() {
            return Err(QuestionSourceError::EmptyResult);
        }
        Ok(selected)
    }
}
