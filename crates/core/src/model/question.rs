use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of options every question must offer.
pub const OPTION_COUNT: usize = 4;

//
// ─── QUESTION ERRORS ───────────────────────────────────────────────────────────
//

/// Reasons a candidate question is rejected at the source boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{0}` is blank")]
    BlankField(&'static str),

    #[error("expected 4 options, got {0}")]
    WrongOptionCount(usize),

    #[error("option `{0}` appears more than once")]
    DuplicateOption(String),

    #[error("answer `{0}` is not one of the options")]
    AnswerNotInOptions(String),
}

//
// ─── QUESTION DRAFT ────────────────────────────────────────────────────────────
//

/// Unvalidated question as it arrives from a generator or a fixture.
///
/// Every field is optional so a missing key can be reported by name instead of
/// surfacing as an opaque deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl QuestionDraft {
    /// Convenience constructor for drafts built in code.
    #[must_use]
    pub fn new(
        question: impl Into<String>,
        options: impl IntoIterator<Item = impl Into<String>>,
        answer: impl Into<String>,
        subject: impl Into<String>,
    ) -> Self {
        Self {
            question: Some(question.into()),
            options: Some(options.into_iter().map(Into::into).collect()),
            answer: Some(answer.into()),
            subject: Some(subject.into()),
            explanation: None,
        }
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = Some(explanation.into());
        self
    }

    /// Check the draft against the question invariant.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when a required field is absent or blank, the
    /// option list is not exactly four distinct entries, or the answer is not
    /// one of the options.
    pub fn validate(self) -> Result<Question, QuestionError> {
        let prompt = required(self.question, "question")?;
        let subject = required(self.subject, "subject")?;
        let answer = required(self.answer, "answer")?;
        let options = self.options.ok_or(QuestionError::MissingField("options"))?;

        let options: [String; OPTION_COUNT] = options
            .try_into()
            .map_err(|rejected: Vec<String>| QuestionError::WrongOptionCount(rejected.len()))?;

        for (i, option) in options.iter().enumerate() {
            if option.trim().is_empty() {
                return Err(QuestionError::BlankField("options"));
            }
            if options[..i].contains(option) {
                return Err(QuestionError::DuplicateOption(option.clone()));
            }
        }

        let correct = options
            .iter()
            .position(|option| *option == answer)
            .ok_or(QuestionError::AnswerNotInOptions(answer))?;

        let explanation = self
            .explanation
            .filter(|text| !text.trim().is_empty());

        Ok(Question {
            prompt,
            options,
            correct,
            subject,
            explanation,
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, QuestionError> {
    let value = value.ok_or(QuestionError::MissingField(field))?;
    if value.trim().is_empty() {
        return Err(QuestionError::BlankField(field));
    }
    Ok(value)
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A validated multiple-choice item.
///
/// The correct option is stored as a position in `options`, so a `Question`
/// cannot name an answer it does not offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    prompt: String,
    options: [String; OPTION_COUNT],
    correct: usize,
    subject: String,
    explanation: Option<String>,
}

impl Question {
    /// Display text; may contain lightweight inline markers such as `**bold**`.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String; OPTION_COUNT] {
        &self.options
    }

    #[must_use]
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct]
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }

    /// Position of `option` among this question's options, if offered.
    #[must_use]
    pub fn option_index(&self, option: &str) -> Option<usize> {
        self.options.iter().position(|candidate| candidate == option)
    }

    #[must_use]
    pub fn is_correct(&self, option: &str) -> bool {
        self.correct_option() == option
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> QuestionDraft {
        QuestionDraft::new(
            "How many sides does a square have?",
            ["Two", "Three", "Four", "Five"],
            "Four",
            "Maths",
        )
    }

    #[test]
    fn valid_draft_keeps_option_order_and_answer() {
        let question = draft().with_explanation("A square has four equal sides.").validate().unwrap();

        assert_eq!(question.options()[2], "Four");
        assert_eq!(question.correct_option(), "Four");
        assert_eq!(question.correct_index(), 2);
        assert_eq!(question.subject(), "Maths");
        assert_eq!(question.explanation(), Some("A square has four equal sides."));
        assert!(question.is_correct("Four"));
        assert!(!question.is_correct("Five"));
        assert_eq!(question.option_index("Two"), Some(0));
        assert_eq!(question.option_index("Six"), None);
    }

    #[test]
    fn missing_fields_are_reported_by_name() {
        let mut no_subject = draft();
        no_subject.subject = None;
        assert_eq!(
            no_subject.validate().unwrap_err(),
            QuestionError::MissingField("subject")
        );

        let mut no_options = draft();
        no_options.options = None;
        assert_eq!(
            no_options.validate().unwrap_err(),
            QuestionError::MissingField("options")
        );
    }

    #[test]
    fn blank_prompt_is_rejected() {
        let mut blank = draft();
        blank.question = Some("   ".into());
        assert_eq!(blank.validate().unwrap_err(), QuestionError::BlankField("question"));
    }

    #[test]
    fn option_count_must_be_four() {
        let three = QuestionDraft::new("Q", ["A", "B", "C"], "A", "S");
        assert_eq!(three.validate().unwrap_err(), QuestionError::WrongOptionCount(3));

        let five = QuestionDraft::new("Q", ["A", "B", "C", "D", "E"], "A", "S");
        assert_eq!(five.validate().unwrap_err(), QuestionError::WrongOptionCount(5));
    }

    #[test]
    fn duplicate_options_are_rejected() {
        let dup = QuestionDraft::new("Q", ["A", "B", "A", "D"], "A", "S");
        assert_eq!(
            dup.validate().unwrap_err(),
            QuestionError::DuplicateOption("A".into())
        );
    }

    #[test]
    fn answer_must_match_an_option_exactly() {
        let wrong_case = QuestionDraft::new("Q", ["A", "B", "C", "D"], "a", "S");
        assert_eq!(
            wrong_case.validate().unwrap_err(),
            QuestionError::AnswerNotInOptions("a".into())
        );
    }

    #[test]
    fn blank_explanation_is_dropped() {
        let question = draft().with_explanation("  ").validate().unwrap();
        assert_eq!(question.explanation(), None);
    }
}
