pub mod match_board;
pub mod randomizer;
pub mod result_writer;
pub mod validator;

pub use match_board::MatchBoard;
pub use randomizer::{keep_order, randomize, DisplayPermutation, RandomizedQuestion};
pub use result_writer::ResultWriter;
pub use validator::{normalize, validate};
