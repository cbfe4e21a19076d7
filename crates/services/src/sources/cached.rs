use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use quiz_core::model::{Profile, Question};

use super::QuestionSource;
use crate::error::QuestionSourceError;

/// Remembers successful fetches per `(profile, count)` for the process lifetime.
///
/// Failures are not cached, so a retry after a failed generation reaches the
/// inner source again. `refresh` skips the lookup and replaces the entry.
pub struct CachedQuestionSource {
    inner: Arc<dyn QuestionSource>,
    cache: Mutex<HashMap<CacheKey, Vec<Question>>>,
}

type CacheKey = (Profile, usize);

impl CachedQuestionSource {
    #[must_use]
    pub fn new(inner: Arc<dyn QuestionSource>) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// A poisoned lock turns the cache into a pass-through rather than failing fetches.
    fn entries(&self) -> Option<MutexGuard<'_, HashMap<CacheKey, Vec<Question>>>> {
        match self.cache.lock() {
            Ok(guard) => Some(guard),
            Err(err) => {
                tracing::warn!(error = %err, "question cache lock poisoned, bypassing cache");
                None
            }
        }
    }

    fn lookup(&self, key: &CacheKey) -> Option<Vec<Question>> {
        self.entries()?.get(key).cloned()
    }

    fn store(&self, key: CacheKey, questions: &[Question]) {
        if let Some(mut entries) = self.entries() {
            entries.insert(key, questions.to_vec());
        }
    }
}

#[async_trait]
impl QuestionSource for CachedQuestionSource {
    async fn fetch(
        &self,
        profile: &Profile,
        count: usize,
    ) -> Result<Vec<Question>, QuestionSourceError> {
        let key = (profile.clone(), count);
        if let Some(hit) = self.lookup(&key) {
            tracing::debug!(age = profile.age(), count, "question cache hit");
            return Ok(hit);
        }

        let questions = self.inner.fetch(profile, count).await?;
        self.store(key, &questions);
        Ok(questions)
    }

    async fn refresh(
        &self,
        profile: &Profile,
        count: usize,
    ) -> Result<Vec<Question>, QuestionSourceError> {
        let questions = self.inner.refresh(profile, count).await?;
        self.store((profile.clone(), count), &questions);
        Ok(questions)
    }
}
