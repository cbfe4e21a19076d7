mod ids;
mod profile;
mod question;
mod session;

pub use ids::SessionId;
pub use profile::{MAX_AGE, MIN_AGE, Profile, ProfileError};
pub use question::{OPTION_COUNT, Question, QuestionDraft, QuestionError};
pub use session::{
    AnswerOutcome, AnswerReview, NotAllowed, QuizSession, SessionError, SessionProgress, Verdict,
};
