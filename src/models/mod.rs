pub mod answer;
pub mod loaders;
pub mod question;
pub mod score;

pub use answer::{correct_answer, AnswerEntry, AnswerRecord, AnswerSheet, CandidateAnswer};
pub use loaders::{load_all_quizzes, load_answer_sheet, load_quiz_file, LoadedQuizzes, QuizFile};
pub use question::{
    ChoiceQuestion, MatchQuestion, Question, QuestionKind, Quiz, ShortQuestion, TrueFalseQuestion,
};
pub use score::{QuestionOutcome, ScoreResult};
