use std::sync::Arc;

use quiz_core::model::{AnswerOutcome, Profile, QuizSession};

use crate::Clock;
use crate::error::QuizServiceError;
use crate::sources::QuestionSource;

/// Question count used by every shipped configuration.
pub const DEFAULT_QUESTION_COUNT: usize = 10;

/// Builds quiz sessions from a question source and drives their lifecycle.
///
/// The service holds no session state itself: each caller owns its
/// `QuizSession` and passes it in, so sessions for different clients never
/// share anything mutable.
#[derive(Clone)]
pub struct QuizService {
    clock: Clock,
    source: Arc<dyn QuestionSource>,
    question_count: usize,
}

impl QuizService {
    #[must_use]
    pub fn new(clock: Clock, source: Arc<dyn QuestionSource>) -> Self {
        Self {
            clock,
            source,
            question_count: DEFAULT_QUESTION_COUNT,
        }
    }

    /// Number of questions requested per session; values below one become one.
    #[must_use]
    pub fn with_question_count(mut self, count: usize) -> Self {
        self.question_count = count.max(1);
        self
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.question_count
    }

    /// Fetch questions for `profile` and start a session over them.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Source` if the source fails; no session is
    /// created in that case.
    pub async fn start(&self, profile: Profile) -> Result<QuizSession, QuizServiceError> {
        let questions = self.source.fetch(&profile, self.question_count).await?;
        let session = QuizSession::new(profile, questions, self.clock.now())?;
        tracing::info!(
            session_id = %session.id(),
            questions = session.total(),
            "quiz session started"
        );
        Ok(session)
    }

    /// Answer the current question at the service clock's time.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Session` when the session refuses the answer.
    pub fn submit_answer(
        &self,
        session: &mut QuizSession,
        index: usize,
        chosen: &str,
    ) -> Result<AnswerOutcome, QuizServiceError> {
        let outcome = session.submit_answer(index, chosen, self.clock.now())?;
        tracing::debug!(
            session_id = %session.id(),
            index,
            correct = outcome.is_correct,
            "answer recorded"
        );
        if outcome.is_finished {
            tracing::info!(
                session_id = %session.id(),
                score = session.score(),
                total = session.total(),
                "quiz finished"
            );
        }
        Ok(outcome)
    }

    /// Start `session` over.
    ///
    /// With `regenerate` the source is asked for a fresh list for the session's
    /// profile, bypassing any cached result; otherwise the current questions
    /// are reused.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Source` if regeneration fails. The session is
    /// left exactly as it was.
    pub async fn restart(
        &self,
        session: &mut QuizSession,
        regenerate: bool,
    ) -> Result<(), QuizServiceError> {
        if regenerate {
            let questions = self
                .source
                .refresh(session.profile(), self.question_count)
                .await?;
            session.restart_with(questions, self.clock.now())?;
        } else {
            session.restart(self.clock.now());
        }
        tracing::info!(session_id = %session.id(), regenerate, "quiz restarted");
        Ok(())
    }

    /// Replace `session` with a new one for `profile`.
    ///
    /// Any in-progress answers are discarded without confirmation.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Source` if fetching for the new profile
    /// fails; the old session is kept.
    pub async fn switch_profile(
        &self,
        session: &mut QuizSession,
        profile: Profile,
    ) -> Result<(), QuizServiceError> {
        let previous = session.id();
        *session = self.start(profile).await?;
        tracing::info!(
            previous_session = %previous,
            session_id = %session.id(),
            "profile changed, quiz discarded"
        );
        Ok(())
    }
}
