use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

use crate::model::{Profile, Question, SessionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Why a navigation or answer request was refused.
///
/// These only occur when a presentation layer offers controls it should not;
/// a refused request never changes the session.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum NotAllowed {
    #[error("the quiz is already finished")]
    Finished,

    #[error("the quiz is not finished yet")]
    NotFinished,

    #[error("question {got} is not the current question ({expected})")]
    NotCurrent { expected: usize, got: usize },

    #[error("already at the first question")]
    AtFirstQuestion,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("a quiz needs at least one question")]
    Empty,

    #[error("not allowed: {0}")]
    NotAllowed(NotAllowed),

    #[error("`{option}` is not an option for question {index}")]
    InvalidOption { index: usize, option: String },
}

impl From<NotAllowed> for SessionError {
    fn from(reason: NotAllowed) -> Self {
        Self::NotAllowed(reason)
    }
}

//
// ─── VIEWS ─────────────────────────────────────────────────────────────────────
//

/// Result of a successful `submit_answer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub index: usize,
    pub is_correct: bool,
    pub is_finished: bool,
}

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
    Unanswered,
}

/// One row of the results screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerReview<'a> {
    pub index: usize,
    pub question: &'a Question,
    pub given: Option<&'a str>,
    pub verdict: Verdict,
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One quiz attempt, from the first question to a scored finish.
///
/// The session is `InProgress` while `current_index() < total()` and `Finished`
/// once the index reaches `total()`. Answers are stored as option positions so
/// only offered options can ever be recorded; the score is always derived from
/// them and never tracked separately.
///
/// A session has a single owner and is mutated only through `submit_answer`,
/// `go_to_previous` and the restart family.
pub struct QuizSession {
    id: SessionId,
    profile: Profile,
    questions: Vec<Question>,
    current: usize,
    answers: Vec<Option<usize>>,
    bonus_answer: Option<String>,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Start a session over `questions` for `profile`.
    ///
    /// `started_at` should come from the services layer clock to keep time deterministic.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if no questions are provided.
    pub fn new(
        profile: Profile,
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }

        let answers = vec![None; questions.len()];
        Ok(Self {
            id: SessionId::random(),
            profile,
            questions,
            current: 0,
            answers,
            bonus_answer: None,
            started_at,
            completed_at: None,
        })
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Index of the question awaiting an answer; equals `total()` once finished.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.current == self.questions.len()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// The option recorded for `index`, if any.
    #[must_use]
    pub fn answer(&self, index: usize) -> Option<&str> {
        let choice = (*self.answers.get(index)?)?;
        Some(self.questions[index].options()[choice].as_str())
    }

    /// Recorded answers in question order.
    #[must_use]
    pub fn answers(&self) -> Vec<Option<&str>> {
        (0..self.questions.len()).map(|i| self.answer(i)).collect()
    }

    /// Number of recorded answers that match their question's correct option.
    #[must_use]
    pub fn score(&self) -> usize {
        self.questions
            .iter()
            .zip(&self.answers)
            .filter(|(question, answer)| **answer == Some(question.correct_index()))
            .count()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.total(),
            answered: self.answers.iter().filter(|a| a.is_some()).count(),
            remaining: self.total().saturating_sub(self.current),
            is_complete: self.is_finished(),
        }
    }

    /// Per-question outcome for the results screen.
    #[must_use]
    pub fn review(&self) -> Vec<AnswerReview<'_>> {
        self.questions
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let given = self.answer(index);
                let verdict = match given {
                    None => Verdict::Unanswered,
                    Some(option) if question.is_correct(option) => Verdict::Correct,
                    Some(_) => Verdict::Incorrect,
                };
                AnswerReview {
                    index,
                    question,
                    given,
                    verdict,
                }
            })
            .collect()
    }

    /// Free-text reply to the closing bonus challenge, if one was recorded.
    #[must_use]
    pub fn bonus_answer(&self) -> Option<&str> {
        self.bonus_answer.as_deref()
    }

    /// Record `chosen` for the current question and advance.
    ///
    /// Submitting on the last question finishes the quiz. A question revisited
    /// with `go_to_previous` is overwritten and progression resumes from it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotAllowed` if the quiz is finished or `index` is
    /// not the current question, and `SessionError::InvalidOption` if `chosen`
    /// is not one of the question's options. The session is unchanged on error.
    pub fn submit_answer(
        &mut self,
        index: usize,
        chosen: &str,
        answered_at: DateTime<Utc>,
    ) -> Result<AnswerOutcome, SessionError> {
        if self.is_finished() {
            return Err(NotAllowed::Finished.into());
        }
        if index != self.current {
            return Err(NotAllowed::NotCurrent {
                expected: self.current,
                got: index,
            }
            .into());
        }

        let question = &self.questions[index];
        let choice = question
            .option_index(chosen)
            .ok_or_else(|| SessionError::InvalidOption {
                index,
                option: chosen.to_string(),
            })?;
        let is_correct = choice == question.correct_index();

        self.answers[index] = Some(choice);
        self.current += 1;
        if self.is_finished() {
            self.completed_at = Some(answered_at);
        }

        Ok(AnswerOutcome {
            index,
            is_correct,
            is_finished: self.is_finished(),
        })
    }

    /// Step back one question without touching recorded answers.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotAllowed` at the first question or once finished.
    pub fn go_to_previous(&mut self) -> Result<usize, SessionError> {
        if self.is_finished() {
            return Err(NotAllowed::Finished.into());
        }
        if self.current == 0 {
            return Err(NotAllowed::AtFirstQuestion.into());
        }
        self.current -= 1;
        Ok(self.current)
    }

    /// Record the learner's reply to the bonus challenge shown with the results.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotAllowed` while the quiz is still in progress.
    pub fn record_bonus_answer(&mut self, text: impl Into<String>) -> Result<(), SessionError> {
        if !self.is_finished() {
            return Err(NotAllowed::NotFinished.into());
        }
        let text = text.into();
        self.bonus_answer = if text.trim().is_empty() {
            None
        } else {
            Some(text)
        };
        Ok(())
    }

    /// Start over with the same questions.
    pub fn restart(&mut self, started_at: DateTime<Utc>) {
        self.current = 0;
        self.answers.iter_mut().for_each(|answer| *answer = None);
        self.bonus_answer = None;
        self.started_at = started_at;
        self.completed_at = None;
    }

    /// Start over with a freshly fetched question list.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if `questions` is empty; the session is
    /// left as it was.
    pub fn restart_with(
        &mut self,
        questions: Vec<Question>,
        started_at: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }
        self.answers = vec![None; questions.len()];
        self.questions = questions;
        self.restart(started_at);
        Ok(())
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("id", &self.id)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("score", &self.score())
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
