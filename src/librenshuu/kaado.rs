//! Term/definition cards and the multiple-choice questions built from them.
//!
//! A card has no distractors of its own. Wrong options are the definitions of
//! other cards in the same set.

use crate::error::QuizError;
use crate::lenient::lenient_string;
use crate::options::normalize_str;
use crate::shitsumon::{create_id, BuiltQuestion, ItemKind, QuestionOption, RawPracticeItem};
use crate::shuffle::shuffle_with;
use log::debug;
use rand::{rng, Rng};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const DEFAULT_QUESTION_COUNT: usize = 5;
pub const DEFAULT_OPTION_COUNT: usize = 4;
pub const MAX_QUESTION_COUNT: usize = 50;
/// A card quiz needs at least one other card to draw a wrong option from.
pub const MIN_QUIZ_CARDS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Flashcard {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub term: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub def: String,
}

impl Flashcard {
    pub fn new<S: Into<String>>(id: S, term: S, def: S) -> Self {
        Self {
            id: id.into(),
            term: term.into(),
            def: def.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.term.is_empty() && !self.def.is_empty()
    }
}

/// Trims terms and definitions and drops cards missing either. Blank or
/// repeated ids are replaced with fresh `row-` ids.
pub fn clean_flashcards(cards: &[Flashcard]) -> Vec<Flashcard> {
    let mut seen_ids = HashSet::new();
    let mut cleaned = Vec::with_capacity(cards.len());
    for card in cards {
        let candidate = Flashcard {
            id: normalize_str(&card.id),
            term: normalize_str(&card.term),
            def: normalize_str(&card.def),
        };
        if !candidate.is_complete() {
            debug!("[Setup] Dropping incomplete card {:?}", card.id);
            continue;
        }
        let id = if candidate.id.is_empty() || seen_ids.contains(&candidate.id) {
            create_id("row")
        } else {
            candidate.id.clone()
        };
        seen_ids.insert(id.clone());
        cleaned.push(Flashcard { id, ..candidate });
    }
    cleaned
}

/// How many questions a card quiz asks and how many options each one shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceSettings {
    pub questions: usize,
    pub options: usize,
}

impl Default for ChoiceSettings {
    fn default() -> Self {
        Self {
            questions: DEFAULT_QUESTION_COUNT,
            options: DEFAULT_OPTION_COUNT,
        }
    }
}

impl ChoiceSettings {
    /// Clamps the requested counts to what `card_count` cards can supply.
    /// A zero count falls back to "every card" and the default option count.
    pub fn fit(self, card_count: usize) -> ChoiceSettings {
        let questions = if self.questions == 0 {
            card_count
        } else {
            self.questions
        };
        let options = if self.options == 0 {
            DEFAULT_OPTION_COUNT
        } else {
            self.options
        };
        ChoiceSettings {
            questions: questions.min(card_count).min(MAX_QUESTION_COUNT).max(1),
            options: options.min(card_count).max(2),
        }
    }
}

/// Builds up to `settings.questions` questions from randomly picked cards.
/// Each shows the card's definition among definitions of other cards.
/// Needs at least [`MIN_QUIZ_CARDS`] cards.
pub fn build_choice_questions_with<R: Rng + ?Sized>(
    cards: &[Flashcard],
    settings: ChoiceSettings,
    rng: &mut R,
) -> Result<Vec<BuiltQuestion>, QuizError> {
    if cards.len() < MIN_QUIZ_CARDS {
        return Err(QuizError::NotEnoughCards);
    }
    let settings = settings.fit(cards.len());
    let indices: Vec<usize> = (0..cards.len()).collect();
    let order = shuffle_with(&indices, &mut *rng);

    let questions: Vec<BuiltQuestion> = order
        .into_iter()
        .take(settings.questions)
        .map(|card_index| {
            let card = &cards[card_index];
            let others: Vec<&Flashcard> = cards
                .iter()
                .enumerate()
                .filter(|(index, _)| *index != card_index)
                .map(|(_, other)| other)
                .collect();
            let picked: Vec<&Flashcard> = shuffle_with(&others, &mut *rng)
                .into_iter()
                .take(settings.options - 1)
                .collect();
            let mut pool = vec![card];
            pool.extend(picked.iter().copied());

            let options = shuffle_with(&pool, &mut *rng)
                .into_iter()
                .enumerate()
                .map(|(index, option)| QuestionOption {
                    id: format!("{}-{}", card.id, index),
                    label: option.def.clone(),
                    value: option.def.clone(),
                    is_correct: option.def == card.def,
                })
                .collect();

            BuiltQuestion {
                id: card.id.clone(),
                prompt: card.term.clone(),
                kind: ItemKind::MultipleChoice,
                correct_answer: card.def.clone(),
                options,
                source: RawPracticeItem {
                    id: card.id.clone(),
                    prompt: card.term.clone(),
                    kind: ItemKind::MultipleChoice,
                    correct_answer: card.def.clone(),
                    distractors: picked.iter().map(|other| other.def.clone()).collect(),
                },
            }
        })
        .collect();
    debug!(
        "[Setup] Built {} card questions with {} options each",
        questions.len(),
        settings.options
    );
    Ok(questions)
}

pub fn build_choice_questions(
    cards: &[Flashcard],
    settings: ChoiceSettings,
) -> Result<Vec<BuiltQuestion>, QuizError> {
    build_choice_questions_with(cards, settings, &mut rng())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn deck(count: usize) -> Vec<Flashcard> {
        (0..count)
            .map(|i| {
                Flashcard::new(format!("c{}", i), format!("term {}", i), format!("def {}", i))
            })
            .collect()
    }

    #[test]
    fn test_clean_flashcards_trims_and_filters() {
        let cards = vec![
            Flashcard::new(" a ", "  犬 ", " dog "),
            Flashcard::new("b", "猫", "   "),
            Flashcard::new("c", "", "bird"),
            Flashcard::new("", "魚", "fish"),
            Flashcard::new("a", "鳥", "bird"),
        ];
        let cleaned = clean_flashcards(&cards);

        assert_eq!(cleaned.len(), 3);
        assert_eq!(cleaned[0], Flashcard::new("a", "犬", "dog"));
        assert!(cleaned[1].id.starts_with("row-"));
        assert_eq!(cleaned[1].term, "魚");
        assert!(cleaned[2].id.starts_with("row-"));
        assert_ne!(cleaned[1].id, cleaned[2].id);
    }

    #[test]
    fn test_lenient_card_fields() {
        let json = r#"{"id": 3, "term": null, "def": 42}"#;
        let card: Flashcard = serde_json::from_str(json).unwrap();
        assert_eq!(card, Flashcard::new("3", "", "42"));
        assert!(!card.is_complete());
    }

    #[test]
    fn test_settings_fit_card_count() {
        let fitted = ChoiceSettings { questions: 10, options: 6 }.fit(3);
        assert_eq!(fitted, ChoiceSettings { questions: 3, options: 3 });

        let fitted = ChoiceSettings { questions: 0, options: 0 }.fit(8);
        assert_eq!(fitted, ChoiceSettings { questions: 8, options: 4 });

        let fitted = ChoiceSettings { questions: 1, options: 1 }.fit(100);
        assert_eq!(fitted, ChoiceSettings { questions: 1, options: 2 });

        let fitted = ChoiceSettings { questions: 80, options: 4 }.fit(100);
        assert_eq!(fitted.questions, MAX_QUESTION_COUNT);
    }

    #[test]
    fn test_needs_two_cards() {
        assert_eq!(
            build_choice_questions_with(&deck(1), ChoiceSettings::default(), &mut seeded()),
            Err(QuizError::NotEnoughCards)
        );
        assert_eq!(
            build_choice_questions_with(&[], ChoiceSettings::default(), &mut seeded()),
            Err(QuizError::NotEnoughCards)
        );
    }

    #[test]
    fn test_choice_questions_use_other_definitions() {
        let cards = deck(6);
        let questions =
            build_choice_questions_with(&cards, ChoiceSettings::default(), &mut seeded()).unwrap();

        assert_eq!(questions.len(), 5);
        let mut seen = HashSet::new();
        for question in &questions {
            assert!(seen.insert(question.id.clone()), "card asked twice");
            let card = cards.iter().find(|c| c.id == question.id).unwrap();
            assert_eq!(question.prompt, card.term);
            assert_eq!(question.correct_answer, card.def);
            assert_eq!(question.options.len(), 4);
            assert_eq!(question.correct_count(), 1);

            let labels: HashSet<&str> =
                question.options.iter().map(|o| o.label.as_str()).collect();
            assert_eq!(labels.len(), 4);
            assert!(labels.iter().all(|l| cards.iter().any(|c| c.def == *l)));
            for (index, option) in question.options.iter().enumerate() {
                assert_eq!(option.id, format!("{}-{}", question.id, index));
            }
        }
    }

    #[test]
    fn test_small_deck_caps_options() {
        let settings = ChoiceSettings::default();
        let questions = build_choice_questions_with(&deck(2), settings, &mut seeded()).unwrap();
        assert_eq!(questions.len(), 2);
        assert!(questions.iter().all(|q| q.options.len() == 2));
    }

    #[test]
    fn test_shared_definition_counts_as_correct() {
        let cards = vec![
            Flashcard::new("a", "start", "begin"),
            Flashcard::new("b", "commence", "begin"),
        ];
        let questions = build_choice_questions_with(
            &cards,
            ChoiceSettings { questions: 2, options: 2 },
            &mut seeded(),
        )
        .unwrap();
        assert!(questions.iter().all(|q| q.correct_count() == 2));
    }
}
