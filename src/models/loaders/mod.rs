pub mod quiz_loader;

pub use quiz_loader::{
    find_answer_sheet, is_answer_sheet, load_all_quizzes, load_answer_sheet, load_quiz_file,
    FileFormat, LoadedQuizzes, QuizFile,
};
