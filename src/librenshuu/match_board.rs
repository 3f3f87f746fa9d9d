//! Matching game: every term gets one definition from a shared bank.

use crate::error::QuizError;
use crate::kaado::Flashcard;
use crate::shuffle::shuffle_with;
use log::{debug, info};
use rand::rngs::ThreadRng;
use rand::{rng, Rng};
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct MatchBoard<R = ThreadRng> {
    cards: Vec<Flashcard>,
    /// Terms in display order.
    pairs: Vec<Flashcard>,
    /// Card ids in the order their definitions appear in the bank.
    bank_order: Vec<String>,
    /// Term card id to the card id whose definition was placed on it.
    filled: HashMap<String, String>,
    rng: R,
}

impl MatchBoard<ThreadRng> {
    pub fn new(cards: Vec<Flashcard>) -> Self {
        Self::with_rng(cards, rng())
    }
}

impl<R: Rng> MatchBoard<R> {
    pub fn with_rng(cards: Vec<Flashcard>, rng: R) -> Self {
        let mut board = Self {
            cards,
            pairs: Vec::new(),
            bank_order: Vec::new(),
            filled: HashMap::new(),
            rng,
        };
        board.reset();
        board
    }

    /// Shuffles terms and bank separately and clears every placement.
    pub fn reset(&mut self) {
        self.pairs = shuffle_with(&self.cards, &mut self.rng);
        let ids: Vec<String> = self.pairs.iter().map(|card| card.id.clone()).collect();
        self.bank_order = shuffle_with(&ids, &mut self.rng);
        self.filled.clear();
        info!("[Quiz] Started matching with {} pairs", self.pairs.len());
    }

    pub fn terms(&self) -> &[Flashcard] {
        &self.pairs
    }

    fn card(&self, id: &str) -> Option<&Flashcard> {
        self.pairs.iter().find(|card| card.id == id)
    }

    /// Definitions not placed on any term yet, in bank order.
    pub fn bank(&self) -> Vec<&Flashcard> {
        self.bank_order
            .iter()
            .filter(|id| !self.filled.values().any(|placed| placed == *id))
            .filter_map(|id| self.card(id))
            .collect()
    }

    /// The definition currently placed on `term_id`.
    pub fn placed(&self, term_id: &str) -> Option<&Flashcard> {
        self.filled.get(term_id).and_then(|id| self.card(id))
    }

    /// Places a definition on a term. The definition leaves whatever term it
    /// was on before, and replaces whatever was on this term.
    pub fn assign(&mut self, term_id: &str, definition_id: &str) -> Result<(), QuizError> {
        for id in [term_id, definition_id] {
            if self.card(id).is_none() {
                return Err(QuizError::UnknownCard(id.to_string()));
            }
        }
        self.filled.retain(|_, placed| *placed != definition_id);
        self.filled.insert(term_id.to_string(), definition_id.to_string());
        debug!("[Quiz] Placed {:?} on {:?}", definition_id, term_id);
        Ok(())
    }

    /// Sends the definition on `term_id` back to the bank.
    pub fn unassign(&mut self, term_id: &str) {
        self.filled.remove(term_id);
    }

    pub fn correct_count(&self) -> usize {
        self.pairs
            .iter()
            .filter(|card| self.filled.get(&card.id) == Some(&card.id))
            .count()
    }

    pub fn total(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_solved(&self) -> bool {
        !self.pairs.is_empty() && self.correct_count() == self.pairs.len()
    }
}
