use crate::lenient::{lenient_string, lenient_strings};
use crate::options::{dedupe, normalize_str};
use crate::shuffle::shuffle_with;
use log::{debug, warn};
use rand::distr::Alphanumeric;
use rand::{rng, Rng};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

pub const TRUE_LABEL: &str = "True";
pub const FALSE_LABEL: &str = "False";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemKind {
    TrueFalse,
    /// Anything that is not exactly `trueFalse` ends up here.
    #[default]
    #[serde(other)]
    MultipleChoice,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::MultipleChoice => "multipleChoice",
            ItemKind::TrueFalse => "trueFalse",
        }
    }

    pub fn parse(value: &str) -> ItemKind {
        match value {
            "trueFalse" => ItemKind::TrueFalse,
            _ => ItemKind::MultipleChoice,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ItemKind::MultipleChoice => "Multiple choice",
            ItemKind::TrueFalse => "True/False",
        }
    }
}

/// A practice question as the author typed it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPracticeItem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub prompt: String,
    #[serde(default, deserialize_with = "lenient_kind")]
    pub kind: ItemKind,
    #[serde(default, deserialize_with = "lenient_string")]
    pub correct_answer: String,
    #[serde(default, deserialize_with = "lenient_strings")]
    pub distractors: Vec<String>,
}

impl RawPracticeItem {
    pub fn multiple_choice<S: Into<String>>(
        id: S,
        prompt: S,
        correct_answer: S,
        distractors: Vec<S>,
    ) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            kind: ItemKind::MultipleChoice,
            correct_answer: correct_answer.into(),
            distractors: distractors.into_iter().map(Into::into).collect(),
        }
    }

    pub fn true_false<S: Into<String>>(id: S, prompt: S, correct_answer: S) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            kind: ItemKind::TrueFalse,
            correct_answer: correct_answer.into(),
            distractors: Vec::new(),
        }
    }

    /// Whether the item has enough content to be turned into a question.
    pub fn is_complete(&self) -> bool {
        if self.prompt.trim().is_empty() || self.correct_answer.trim().is_empty() {
            return false;
        }
        match self.kind {
            ItemKind::TrueFalse => true,
            ItemKind::MultipleChoice => self.distractors.iter().any(|d| !d.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionOption {
    pub id: String,
    pub label: String,
    pub value: String,
    pub is_correct: bool,
}

/// A quiz-ready question. Never edited in place; a new one is built instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuiltQuestion {
    pub id: String,
    pub prompt: String,
    pub kind: ItemKind,
    pub correct_answer: String,
    pub options: Vec<QuestionOption>,
    /// Normalised copy of the item this was built from, used for reshuffling.
    pub source: RawPracticeItem,
}

impl BuiltQuestion {
    pub fn correct_count(&self) -> usize {
        self.options.iter().filter(|o| o.is_correct).count()
    }

    pub fn option_by_value(&self, value: &str) -> Option<&QuestionOption> {
        self.options.iter().find(|o| o.value == value)
    }

    pub fn is_correct(&self, selected: &str) -> bool {
        selected == self.correct_answer
    }
}

/// `"false"` in any casing is false, everything else is true.
pub fn normalize_boolean_answer(value: &str) -> String {
    if value.to_lowercase() == "false" {
        FALSE_LABEL.to_string()
    } else {
        TRUE_LABEL.to_string()
    }
}

pub fn build_practice_question_with<R: Rng + ?Sized>(
    item: &RawPracticeItem,
    rng: &mut R,
) -> BuiltQuestion {
    let kind = item.kind;
    let correct_answer = match kind {
        ItemKind::TrueFalse => normalize_boolean_answer(&item.correct_answer),
        ItemKind::MultipleChoice => normalize_str(&item.correct_answer),
    };
    let pool: Vec<String> = match kind {
        ItemKind::TrueFalse => vec![TRUE_LABEL.to_string(), FALSE_LABEL.to_string()],
        ItemKind::MultipleChoice => std::iter::once(correct_answer.clone())
            .chain(item.distractors.iter().cloned())
            .collect(),
    };
    let unique = dedupe(pool);
    let shuffled = shuffle_with(&unique, rng);

    let options = shuffled
        .into_iter()
        .enumerate()
        .map(|(index, option)| QuestionOption {
            id: format!("{}-{}", item.id, index),
            label: option.clone(),
            is_correct: option == correct_answer,
            value: option,
        })
        .collect();

    let distractors = match kind {
        ItemKind::MultipleChoice => item.distractors.iter().map(|d| normalize_str(d)).collect(),
        ItemKind::TrueFalse => Vec::new(),
    };

    BuiltQuestion {
        id: item.id.clone(),
        prompt: item.prompt.clone(),
        kind,
        correct_answer: correct_answer.clone(),
        options,
        source: RawPracticeItem {
            id: item.id.clone(),
            prompt: item.prompt.clone(),
            kind,
            correct_answer,
            distractors,
        },
    }
}

pub fn build_practice_question(item: &RawPracticeItem) -> BuiltQuestion {
    build_practice_question_with(item, &mut rng())
}

/// Builds every item in order. The result keeps input order, which is what
/// "Question N of M" numbering relies on.
pub fn build_practice_questions_with<R: Rng + ?Sized>(
    items: &[RawPracticeItem],
    rng: &mut R,
) -> Vec<BuiltQuestion> {
    let questions: Vec<BuiltQuestion> = items
        .iter()
        .map(|item| build_practice_question_with(item, &mut *rng))
        .collect();
    for question in questions.iter().filter(|q| q.correct_count() != 1) {
        warn!(
            "[Setup] Question {:?} has {} correct options out of {}",
            question.id,
            question.correct_count(),
            question.options.len()
        );
    }
    debug!("[Setup] Built {} practice questions", questions.len());
    questions
}

pub fn build_practice_questions(items: &[RawPracticeItem]) -> Vec<BuiltQuestion> {
    build_practice_questions_with(items, &mut rng())
}

/// Rebuilds a question from its source: same id and answer, new option order.
pub fn reshuffle_question_with<R: Rng + ?Sized>(
    question: &BuiltQuestion,
    rng: &mut R,
) -> BuiltQuestion {
    build_practice_question_with(&question.source, rng)
}

pub fn reshuffle_question(question: &BuiltQuestion) -> BuiltQuestion {
    reshuffle_question_with(question, &mut rng())
}

/// `<prefix>-<base36 millis>-<6 random chars>`
pub fn create_id(prefix: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let random: String = rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(|c| (c as char).to_ascii_lowercase())
        .collect();
    format!("{}-{}-{}", prefix, to_base36(millis), random)
}

fn to_base36(mut value: u128) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Trims every field, resolves the kind, drops blank distractors and filters
/// out incomplete items. Items without an id, or with an id already used
/// earlier in the list, get a fresh one.
pub fn clean_items(items: &[RawPracticeItem]) -> Vec<RawPracticeItem> {
    let mut seen_ids = HashSet::new();
    let mut cleaned = Vec::with_capacity(items.len());
    for item in items {
        let kind = item.kind;
        let distractors = match kind {
            ItemKind::MultipleChoice => item
                .distractors
                .iter()
                .map(|d| normalize_str(d))
                .filter(|d| !d.is_empty())
                .collect(),
            ItemKind::TrueFalse => Vec::new(),
        };
        let candidate = RawPracticeItem {
            id: normalize_str(&item.id),
            prompt: normalize_str(&item.prompt),
            kind,
            correct_answer: normalize_str(&item.correct_answer),
            distractors,
        };
        if !candidate.is_complete() {
            debug!("[Setup] Dropping incomplete item {:?}", item.id);
            continue;
        }
        let id = if candidate.id.is_empty() || seen_ids.contains(&candidate.id) {
            create_id("question")
        } else {
            candidate.id.clone()
        };
        seen_ids.insert(id.clone());
        cleaned.push(RawPracticeItem { id, ..candidate });
    }
    cleaned
}

fn lenient_kind<'de, D>(deserializer: D) -> Result<ItemKind, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(kind) => ItemKind::parse(&kind),
        _ => ItemKind::MultipleChoice,
    })
}
