//! Quick quiz: one question at a time, missed questions go to the back of the
//! queue with their options reshuffled until everything has been answered
//! correctly once.

use crate::error::QuizError;
use crate::shitsumon::{
    build_practice_questions_with, reshuffle_question_with, BuiltQuestion, RawPracticeItem,
};
use log::{debug, info};
use rand::rngs::ThreadRng;
use rand::{rng, Rng};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackStatus {
    Correct,
    Incorrect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub status: FeedbackStatus,
    pub correct_answer: String,
    pub selected: String,
}

impl Feedback {
    pub fn is_correct(&self) -> bool {
        self.status == FeedbackStatus::Correct
    }
}

#[derive(Debug, Clone)]
pub struct QuickQuiz<R = ThreadRng> {
    items: Vec<RawPracticeItem>,
    queue: VecDeque<BuiltQuestion>,
    total: usize,
    mastered: usize,
    selected: Option<String>,
    feedback: Option<Feedback>,
    rng: R,
}

impl QuickQuiz<ThreadRng> {
    pub fn new(items: Vec<RawPracticeItem>) -> Self {
        Self::with_rng(items, rng())
    }
}

impl<R: Rng> QuickQuiz<R> {
    pub fn with_rng(items: Vec<RawPracticeItem>, rng: R) -> Self {
        let mut quiz = Self {
            items: Vec::new(),
            queue: VecDeque::new(),
            total: 0,
            mastered: 0,
            selected: None,
            feedback: None,
            rng,
        };
        quiz.load(items);
        quiz
    }

    /// Throws away the current session and starts over with a new item list.
    pub fn load(&mut self, items: Vec<RawPracticeItem>) {
        self.items = items;
        self.restart();
    }

    /// Rebuilds the queue from the same items with fresh shuffles.
    pub fn restart(&mut self) {
        self.queue = build_practice_questions_with(&self.items, &mut self.rng).into();
        self.total = self.queue.len();
        self.mastered = 0;
        self.selected = None;
        self.feedback = None;
        info!("[Quiz] Started quick quiz with {} questions", self.total);
    }

    pub fn current(&self) -> Option<&BuiltQuestion> {
        self.queue.front()
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn mastered(&self) -> usize {
        self.mastered
    }

    /// 1-based number shown above the current question.
    pub fn next_number(&self) -> usize {
        (self.mastered + 1).min(self.total.max(1))
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    pub fn is_cleared(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn select<S: Into<String>>(&mut self, value: S) -> Result<(), QuizError> {
        if self.feedback.is_some() {
            return Err(QuizError::FeedbackPending);
        }
        if self.queue.is_empty() {
            return Err(QuizError::QueueCleared);
        }
        self.selected = Some(value.into());
        Ok(())
    }

    /// Checks the selection against the head of the queue. The queue itself
    /// only moves on [`QuickQuiz::advance`].
    pub fn submit(&mut self) -> Result<&Feedback, QuizError> {
        let question = self.queue.front().ok_or(QuizError::QueueCleared)?;
        if self.feedback.is_some() {
            return Err(QuizError::FeedbackPending);
        }
        let selected = match self.selected.as_deref() {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => return Err(QuizError::NoSelection),
        };

        let status = if question.is_correct(&selected) {
            self.mastered += 1;
            FeedbackStatus::Correct
        } else {
            FeedbackStatus::Incorrect
        };
        debug!(
            "[Quiz] {:?} answered {:?}: {:?}",
            question.id, selected, status
        );
        Ok(self.feedback.insert(Feedback {
            status,
            correct_answer: question.correct_answer.clone(),
            selected,
        }))
    }

    /// Drops the head when it was answered correctly, otherwise sends a
    /// reshuffled copy of it to the back of the queue.
    pub fn advance(&mut self) -> Result<(), QuizError> {
        let feedback = self.feedback.take().ok_or(QuizError::NoFeedback)?;
        self.selected = None;
        if let Some(head) = self.queue.pop_front() {
            if !feedback.is_correct() {
                let retry = reshuffle_question_with(&head, &mut self.rng);
                self.queue.push_back(retry);
            }
        }
        if self.queue.is_empty() {
            info!("[Quiz] All {} questions cleared", self.total);
        }
        Ok(())
    }
}
