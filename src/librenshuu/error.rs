use crate::db::SetType;
use std::io;
use thiserror::Error;

/// Rejected user actions. A session that returns one of these is left as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("Select an answer before submitting.")]
    NoSelection,
    #[error("The answer has already been checked. Continue to the next question.")]
    FeedbackPending,
    #[error("Submit an answer before continuing.")]
    NoFeedback,
    #[error("All questions cleared! Restart to go again.")]
    QueueCleared,
    #[error("Please answer all questions before submitting ({missing} unanswered).")]
    Unanswered { missing: usize },
    #[error("The test has already been submitted.")]
    AlreadySubmitted,
    #[error("The test has not been submitted yet.")]
    NotSubmitted,
    #[error("There are no questions in this set.")]
    NoQuestions,
    #[error("No question with id {0:?}.")]
    UnknownQuestion(String),
    #[error("Add at least two items to start a quiz.")]
    NotEnoughCards,
    #[error("The quiz is finished. Start again to retry.")]
    QuizFinished,
    #[error("All done! Shuffle the deck to go again.")]
    DeckEmpty,
    #[error("No card with id {0:?}.")]
    UnknownCard(String),
}

#[derive(Debug, Error)]
pub enum SetError {
    #[error("Please enter a set title")]
    EmptyTitle,
    #[error("Add at least one complete practice question")]
    NoCompleteItems,
    #[error("Add at least one term with a definition")]
    NoCompleteCards,
    #[error("no study set matching {0:?}")]
    NotFound(String),
    #[error("no {set_type} sets in folder {folder:?}")]
    EmptyFolder { folder: String, set_type: SetType },
    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot read or write file: {0}")]
    Io(#[from] io::Error),
}
