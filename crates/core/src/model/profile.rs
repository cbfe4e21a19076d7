use serde::Serialize;
use thiserror::Error;

pub const MIN_AGE: u8 = 1;
pub const MAX_AGE: u8 = 120;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProfileError {
    #[error("age must be between 1 and 120, got {0}")]
    InvalidAge(u8),
}

/// Who the quiz is tailored for.
///
/// Interests are free-text tags. They are normalized on construction (trimmed,
/// blanks removed, case-insensitive duplicates collapsed) so two profiles that
/// describe the same learner compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Profile {
    age: u8,
    interests: Vec<String>,
}

impl Profile {
    /// Build a profile from an age and a list of interest tags.
    ///
    /// # Errors
    ///
    /// Returns `ProfileError::InvalidAge` if `age` is outside `MIN_AGE..=MAX_AGE`.
    pub fn new(
        age: u8,
        interests: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, ProfileError> {
        if !(MIN_AGE..=MAX_AGE).contains(&age) {
            return Err(ProfileError::InvalidAge(age));
        }

        let mut normalized: Vec<String> = Vec::new();
        for interest in interests {
            let interest: String = interest.into();
            let trimmed = interest.trim();
            if trimmed.is_empty() {
                continue;
            }
            if normalized
                .iter()
                .any(|existing| existing.eq_ignore_ascii_case(trimmed))
            {
                continue;
            }
            normalized.push(trimmed.to_string());
        }

        Ok(Self {
            age,
            interests: normalized,
        })
    }

    #[must_use]
    pub fn age(&self) -> u8 {
        self.age
    }

    #[must_use]
    pub fn interests(&self) -> &[String] {
        &self.interests
    }

    /// Interests as a comma-separated phrase for prompts.
    #[must_use]
    pub fn describe_interests(&self) -> String {
        if self.interests.is_empty() {
            "anything fun".to_string()
        } else {
            self.interests.join(", ")
        }
    }
}
