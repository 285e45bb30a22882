pub mod completion;
pub mod quiz_session;

pub use completion::{CompletionCallback, CompletionDetails, RetryAction, RetryHandler};
pub use quiz_session::{load_quiz, QuizSession, QuizSessionBuilder, SessionState};
