//! 練習しよう！ (Renshūshiyō!) practice engine.
//!
//! Practice sets hold authored questions (multiple choice or true/false) that
//! are turned into graded, shuffled questions for two drill modes:
//! - [`quick_quiz`]: one question at a time, missed ones come back later
//! - [`practice_test`]: the whole set answered, then graded at once
//!
//! Flashcard sets hold term/definition pairs ([`kaado`]) and have their own
//! modes: [`choice_quiz`], [`flip_deck`] and [`match_board`].
//!
//! Sets are stored in SQLite through [`db`] and can be moved in and out with
//! [`import`].

pub mod choice_quiz;
pub mod db;
pub mod error;
pub mod flip_deck;
pub mod import;
pub mod kaado;
mod lenient;
pub mod match_board;
pub mod options;
pub mod quick_quiz;
pub mod shitsumon;
pub mod shuffle;

pub use db::{SetType, StudySet};
pub use error::{QuizError, SetError};
pub use kaado::{build_choice_questions, ChoiceSettings, Flashcard};
pub use shitsumon::{
    build_practice_question, build_practice_questions, reshuffle_question, BuiltQuestion,
    ItemKind, QuestionOption, RawPracticeItem,
};
pub use shuffle::shuffle;
