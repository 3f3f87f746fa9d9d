//! Card quiz: a fixed run of multiple-choice questions built from a card
//! deck. Every question is asked once, revealed, then scored.

use crate::error::QuizError;
use crate::kaado::{build_choice_questions_with, ChoiceSettings, Flashcard};
use crate::shitsumon::BuiltQuestion;
use log::{debug, info};
use rand::rngs::ThreadRng;
use rand::{rng, Rng};

#[derive(Debug, Clone)]
pub struct ChoiceQuiz<R = ThreadRng> {
    cards: Vec<Flashcard>,
    settings: ChoiceSettings,
    questions: Vec<BuiltQuestion>,
    index: usize,
    score: usize,
    selected: Option<String>,
    revealed: bool,
    finished: bool,
    rng: R,
}

impl ChoiceQuiz<ThreadRng> {
    pub fn new(cards: Vec<Flashcard>, settings: ChoiceSettings) -> Result<Self, QuizError> {
        Self::with_rng(cards, settings, rng())
    }
}

impl<R: Rng> ChoiceQuiz<R> {
    pub fn with_rng(
        cards: Vec<Flashcard>,
        settings: ChoiceSettings,
        mut rng: R,
    ) -> Result<Self, QuizError> {
        let questions = build_choice_questions_with(&cards, settings, &mut rng)?;
        info!("[Quiz] Started card quiz with {} questions", questions.len());
        Ok(Self {
            cards,
            settings,
            questions,
            index: 0,
            score: 0,
            selected: None,
            revealed: false,
            finished: false,
            rng,
        })
    }

    /// Picks new questions from the same deck and zeroes the score.
    pub fn restart(&mut self) -> Result<(), QuizError> {
        self.questions = build_choice_questions_with(&self.cards, self.settings, &mut self.rng)?;
        self.index = 0;
        self.score = 0;
        self.selected = None;
        self.revealed = false;
        self.finished = false;
        info!("[Quiz] Restarted card quiz with {} questions", self.questions.len());
        Ok(())
    }

    /// `None` once the quiz is finished.
    pub fn current(&self) -> Option<&BuiltQuestion> {
        if self.finished {
            return None;
        }
        self.questions.get(self.index)
    }

    /// 1-based number of the current question.
    pub fn number(&self) -> usize {
        (self.index + 1).min(self.questions.len())
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn select<S: Into<String>>(&mut self, value: S) -> Result<(), QuizError> {
        if self.finished {
            return Err(QuizError::QuizFinished);
        }
        if self.revealed {
            return Err(QuizError::FeedbackPending);
        }
        self.selected = Some(value.into());
        Ok(())
    }

    /// Shows the answer. Revealing without a selection is allowed and scores
    /// the question as missed.
    pub fn reveal(&mut self) -> Result<(), QuizError> {
        if self.finished {
            return Err(QuizError::QuizFinished);
        }
        self.revealed = true;
        Ok(())
    }

    /// First call reveals the answer, the second scores it and moves on.
    pub fn advance(&mut self) -> Result<(), QuizError> {
        if self.finished {
            return Err(QuizError::QuizFinished);
        }
        if !self.revealed {
            self.revealed = true;
            return Ok(());
        }
        let correct = match (self.questions.get(self.index), self.selected.as_deref()) {
            (Some(question), Some(selected)) => question.is_correct(selected),
            _ => false,
        };
        if correct {
            self.score += 1;
        }
        debug!("[Quiz] Question {} scored {}", self.index + 1, correct);

        if self.index + 1 >= self.questions.len() {
            self.finished = true;
            info!("[Quiz] Card quiz finished {} / {}", self.score, self.total());
        } else {
            self.index += 1;
            self.selected = None;
            self.revealed = false;
        }
        Ok(())
    }
}
