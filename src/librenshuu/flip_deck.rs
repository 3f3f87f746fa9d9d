//! Flip-through review of a card deck. Cards marked as known leave the deck,
//! the rest go to the back for another pass.

use crate::error::QuizError;
use crate::kaado::Flashcard;
use crate::shuffle::shuffle_with;
use log::{debug, info};
use rand::rngs::ThreadRng;
use rand::{rng, Rng};
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct FlipDeck<R = ThreadRng> {
    cards: Vec<Flashcard>,
    queue: VecDeque<Flashcard>,
    flipped: bool,
    term_first: bool,
    rng: R,
}

impl FlipDeck<ThreadRng> {
    pub fn new(cards: Vec<Flashcard>) -> Self {
        Self::with_rng(cards, rng())
    }
}

impl<R: Rng> FlipDeck<R> {
    pub fn with_rng(cards: Vec<Flashcard>, rng: R) -> Self {
        let mut deck = Self {
            cards,
            queue: VecDeque::new(),
            flipped: false,
            term_first: true,
            rng,
        };
        deck.rebuild();
        deck
    }

    /// Puts every card back in a fresh order.
    pub fn rebuild(&mut self) {
        self.queue = shuffle_with(&self.cards, &mut self.rng).into();
        self.flipped = false;
        info!("[Quiz] Shuffled deck of {} cards", self.queue.len());
    }

    pub fn current(&self) -> Option<&Flashcard> {
        self.queue.front()
    }

    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn is_term_first(&self) -> bool {
        self.term_first
    }

    /// The side shown before flipping.
    pub fn front(&self) -> Option<&str> {
        let card = self.current()?;
        Some(if self.term_first {
            card.term.as_str()
        } else {
            card.def.as_str()
        })
    }

    pub fn back(&self) -> Option<&str> {
        let card = self.current()?;
        Some(if self.term_first {
            card.def.as_str()
        } else {
            card.term.as_str()
        })
    }

    /// The side currently facing up.
    pub fn showing(&self) -> Option<&str> {
        if self.flipped {
            self.back()
        } else {
            self.front()
        }
    }

    pub fn flip(&mut self) -> Result<(), QuizError> {
        if self.queue.is_empty() {
            return Err(QuizError::DeckEmpty);
        }
        self.flipped = !self.flipped;
        Ok(())
    }

    /// Switches which side is shown first. The card turns face down.
    pub fn toggle_side(&mut self) {
        self.term_first = !self.term_first;
        self.flipped = false;
    }

    /// The current card is known: it leaves the deck.
    pub fn got_it(&mut self) -> Result<(), QuizError> {
        let card = self.queue.pop_front().ok_or(QuizError::DeckEmpty)?;
        self.flipped = false;
        debug!("[Quiz] Card {:?} known, {} left", card.id, self.queue.len());
        if self.queue.is_empty() {
            info!("[Quiz] Deck finished");
        }
        Ok(())
    }

    /// The current card goes to the back of the deck.
    pub fn keep(&mut self) -> Result<(), QuizError> {
        if self.queue.is_empty() {
            return Err(QuizError::DeckEmpty);
        }
        if self.queue.len() > 1 {
            self.queue.rotate_left(1);
        }
        self.flipped = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn deck() -> FlipDeck<StdRng> {
        let cards = vec![
            Flashcard::new("a", "犬", "dog"),
            Flashcard::new("b", "猫", "cat"),
            Flashcard::new("c", "鳥", "bird"),
        ];
        FlipDeck::with_rng(cards, StdRng::seed_from_u64(9))
    }

    #[test]
    fn test_flip_and_sides() {
        let mut deck = deck();
        let card = deck.current().unwrap().clone();
        assert_eq!(deck.showing(), Some(card.term.as_str()));

        deck.flip().unwrap();
        assert_eq!(deck.showing(), Some(card.def.as_str()));

        deck.toggle_side();
        assert!(!deck.is_flipped());
        assert!(!deck.is_term_first());
        assert_eq!(deck.front(), Some(card.def.as_str()));
        assert_eq!(deck.back(), Some(card.term.as_str()));
    }

    #[test]
    fn test_keep_rotates_and_got_it_removes() {
        let mut deck = deck();
        let first = deck.current().unwrap().id.clone();

        deck.flip().unwrap();
        deck.keep().unwrap();
        assert!(!deck.is_flipped());
        assert_eq!(deck.remaining(), 3);
        assert_ne!(deck.current().unwrap().id, first);

        deck.got_it().unwrap();
        deck.got_it().unwrap();
        assert_eq!(deck.current().unwrap().id, first);
        deck.keep().unwrap();
        assert_eq!(deck.current().unwrap().id, first);

        deck.got_it().unwrap();
        assert!(deck.is_empty());
        assert_eq!(deck.showing(), None);
        assert_eq!(deck.got_it(), Err(QuizError::DeckEmpty));
        assert_eq!(deck.keep(), Err(QuizError::DeckEmpty));
        assert_eq!(deck.flip(), Err(QuizError::DeckEmpty));
    }

    #[test]
    fn test_rebuild_restores_every_card() {
        let mut deck = deck();
        deck.got_it().unwrap();
        deck.flip().unwrap();

        deck.rebuild();
        assert_eq!(deck.remaining(), 3);
        assert!(!deck.is_flipped());
    }
}
