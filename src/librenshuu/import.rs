//! Getting study sets in and out: JSON files and the one-line-per-entry
//! quick import formats.
//!
//! Practice quick import lines look like
//!
//! ```text
//! What is 2+2? :: 4 ;; 3 ;; 5
//! The sky is green :: false
//! ```
//!
//! The first answer after `::` is the correct one when `;;` is present,
//! otherwise the answer must be `true` or `false`. Flashcard lines are just
//! `term :: definition`.

use crate::db::{SetType, StudySet};
use crate::error::SetError;
use crate::kaado::Flashcard;
use crate::shitsumon::{normalize_boolean_answer, ItemKind, RawPracticeItem};
use log::{debug, info};
use rusqlite::Connection;
use serde::Serialize;
use serde_json::Value;

const PROMPT_SEPARATOR: &str = "::";
const ANSWER_SEPARATOR: &str = ";;";

#[derive(Serialize)]
struct Library<'a> {
    sets: &'a [StudySet],
}

fn parse_line(line: &str) -> Option<RawPracticeItem> {
    let (prompt, answers) = line.split_once(PROMPT_SEPARATOR)?;
    let prompt = prompt.trim();
    let answers = answers.trim();
    if prompt.is_empty() || answers.is_empty() {
        return None;
    }

    if answers.contains(ANSWER_SEPARATOR) {
        let mut entries = answers
            .split(ANSWER_SEPARATOR)
            .map(str::trim)
            .filter(|entry| !entry.is_empty());
        let correct_answer = entries.next()?;
        let distractors: Vec<String> = entries.map(String::from).collect();
        if distractors.is_empty() {
            return None;
        }
        return Some(RawPracticeItem {
            id: String::new(),
            prompt: prompt.to_string(),
            kind: ItemKind::MultipleChoice,
            correct_answer: correct_answer.to_string(),
            distractors,
        });
    }

    match answers.to_lowercase().as_str() {
        "true" | "false" => Some(RawPracticeItem {
            id: String::new(),
            prompt: prompt.to_string(),
            kind: ItemKind::TrueFalse,
            correct_answer: normalize_boolean_answer(answers),
            distractors: Vec::new(),
        }),
        _ => None,
    }
}

/// Parses quick import text. Lines that do not fit the format are skipped.
pub fn parse_practice_import(text: &str) -> Vec<RawPracticeItem> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let parsed = parse_line(line);
            if parsed.is_none() {
                debug!("[Import] Skipping line {:?}", line);
            }
            parsed
        })
        .collect()
}

fn parse_card_line(line: &str) -> Option<Flashcard> {
    let (term, def) = line.split_once(PROMPT_SEPARATOR)?;
    let term = term.trim();
    let def = def.trim();
    if term.is_empty() || def.is_empty() {
        return None;
    }
    Some(Flashcard {
        id: String::new(),
        term: term.to_string(),
        def: def.to_string(),
    })
}

/// Parses `term :: definition` lines. Only the first `::` splits, so a
/// definition may contain more of them.
pub fn parse_flashcard_import(text: &str) -> Vec<Flashcard> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let parsed = parse_card_line(line);
            if parsed.is_none() {
                debug!("[Import] Skipping line {:?}", line);
            }
            parsed
        })
        .collect()
}

/// Reads either a single set or a `{ "sets": [...] }` library. A library whose
/// `sets` is not an array holds no sets, and entries that are not objects are
/// skipped.
pub fn read_sets(json: &str) -> Result<Vec<StudySet>, SetError> {
    let value: Value = serde_json::from_str(json)?;
    let sets = match value {
        Value::Object(mut object) if object.contains_key("sets") => {
            match object.remove("sets") {
                Some(Value::Array(entries)) => entries
                    .into_iter()
                    .filter(Value::is_object)
                    .map(serde_json::from_value)
                    .collect::<Result<Vec<StudySet>, _>>()?,
                _ => Vec::new(),
            }
        }
        single => vec![serde_json::from_value(single)?],
    };
    debug!("[Import] Read {} sets", sets.len());
    Ok(sets)
}

/// A single set is written on its own, several as a library.
pub fn write_sets(sets: &[StudySet]) -> Result<String, SetError> {
    let json = match sets {
        [set] => serde_json::to_string_pretty(set)?,
        _ => serde_json::to_string_pretty(&Library { sets })?,
    };
    Ok(json)
}

/// Saves every set as a new set of its own type. Incoming ids are ignored.
pub fn import_sets(connection: &Connection, sets: Vec<StudySet>) -> Result<Vec<String>, SetError> {
    let mut ids = Vec::with_capacity(sets.len());
    for set in sets {
        let title = set.title.clone();
        let set_type = set.set_type;
        let id = StudySet::save(connection, StudySet { id: None, ..set })?;
        info!("[Import] Imported {} set '{}' as {}", set_type, title, id);
        ids.push(id);
    }
    Ok(ids)
}

/// Builds an unsaved set from quick import text of the given type.
pub fn quick_import(title: &str, set_type: SetType, text: &str) -> StudySet {
    match set_type {
        SetType::Practice => StudySet::draft(title, parse_practice_import(text)),
        SetType::Flashcard => StudySet::flashcard_draft(title, parse_flashcard_import(text)),
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_or_open;

    #[test]
    fn test_parse_multiple_choice_line() {
        let items = parse_practice_import("What is 2+2? :: 4 ;; 3 ;; 5");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].prompt, "What is 2+2?");
        assert_eq!(items[0].kind, ItemKind::MultipleChoice);
        assert_eq!(items[0].correct_answer, "4");
        assert_eq!(items[0].distractors, vec!["3", "5"]);
    }

    #[test]
    fn test_parse_true_false_line() {
        let items = parse_practice_import("Sky is green :: FALSE\nWater is wet::true");
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].kind, ItemKind::TrueFalse);
        assert_eq!(items[0].correct_answer, "False");
        assert_eq!(items[1].correct_answer, "True");
    }

    #[test]
    fn test_parse_skips_bad_lines() {
        let text = "\n\nno separator here\n :: 4 ;; 5\nPrompt :: \nPrompt :: maybe\n\
                    Only one :: a ;; \nKept :: a ;; b\n";
        let items = parse_practice_import(text);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].prompt, "Kept");
    }

    #[test]
    fn test_parse_keeps_extra_separators_in_answer() {
        let items = parse_practice_import("Scope? :: a::b ;; c");
        assert_eq!(items[0].correct_answer, "a::b");
        assert_eq!(items[0].distractors, vec!["c"]);
    }

    #[test]
    fn test_parse_flashcard_lines() {
        let text = "犬 :: dog\n\n  猫::cat  \nno separator\n\
                    :: empty term\nempty def ::\nratio :: a::b";
        let cards = parse_flashcard_import(text);
        assert_eq!(cards.len(), 3);
        assert_eq!(cards[0], Flashcard::new("", "犬", "dog"));
        assert_eq!(cards[1].term, "猫");
        assert_eq!(cards[1].def, "cat");
        assert_eq!(cards[2].def, "a::b");
    }

    #[test]
    fn test_quick_import_by_type() {
        let practice = quick_import("P", SetType::Practice, "a :: true");
        assert_eq!(practice.items.len(), 1);
        assert!(practice.cards.is_empty());

        let cards = quick_import("F", SetType::Flashcard, "a :: true\nb :: x ;; y");
        assert_eq!(cards.set_type, SetType::Flashcard);
        assert_eq!(cards.cards.len(), 2);
        assert_eq!(cards.cards[1].def, "x ;; y");
    }

    #[test]
    fn test_read_single_and_library() {
        let single = r#"{"title": "One", "items": [
            {"prompt": "p", "kind": "trueFalse", "correctAnswer": "true"}
        ]}"#;
        let sets = read_sets(single).unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].title, "One");
        assert_eq!(sets[0].set_type, SetType::Practice);
        assert_eq!(sets[0].items[0].kind, ItemKind::TrueFalse);

        let library = r#"{"sets": [{"title": "A"}, {"title": "B", "folder": "F"}]}"#;
        let sets = read_sets(library).unwrap();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[1].folder, "F");

        assert!(matches!(read_sets("not json"), Err(SetError::Json(_))));
        assert!(matches!(read_sets(r#""just text""#), Err(SetError::Json(_))));
    }

    #[test]
    fn test_read_null_or_odd_kind() {
        let json = r#"{"title": "T", "items": [
            {"prompt": "p", "kind": null, "correctAnswer": "a", "distractors": ["b"]},
            {"prompt": "q", "kind": 5, "correctAnswer": "a", "distractors": ["b"]},
            {"prompt": "r", "correctAnswer": "a", "distractors": ["b"]}
        ]}"#;
        let sets = read_sets(json).unwrap();
        assert_eq!(sets[0].items.len(), 3);
        assert!(sets[0].items.iter().all(|item| item.kind == ItemKind::MultipleChoice));
    }

    #[test]
    fn test_read_null_title_folder_and_items() {
        let sets = read_sets(r#"{"title": null, "folder": null, "items": null}"#).unwrap();
        assert_eq!(sets[0].title, "");
        assert_eq!(sets[0].folder, "");
        assert!(sets[0].items.is_empty());

        let sets = read_sets(r#"{"title": 12, "folder": true, "items": "none"}"#).unwrap();
        assert_eq!(sets[0].title, "12");
        assert_eq!(sets[0].folder, "true");
        assert!(sets[0].is_empty());
    }

    #[test]
    fn test_read_skips_entries_that_are_not_objects() {
        let json = r#"{"title": "T", "items": [
            null, 3, "text", {"prompt": "p", "kind": "trueFalse", "correctAnswer": "false"}
        ]}"#;
        let sets = read_sets(json).unwrap();
        assert_eq!(sets[0].items.len(), 1);
        assert_eq!(sets[0].items[0].prompt, "p");

        let sets = read_sets(r#"{"sets": [null, {"title": "A"}, 4]}"#).unwrap();
        assert_eq!(sets.len(), 1);
        assert!(read_sets(r#"{"sets": null}"#).unwrap().is_empty());
    }

    #[test]
    fn test_read_flashcard_sets() {
        let typed = r#"{"title": "Animals", "type": "flashcard", "items": [
            {"id": "r1", "term": "犬", "def": "dog"}, {"term": "猫", "def": null}
        ]}"#;
        let sets = read_sets(typed).unwrap();
        assert_eq!(sets[0].set_type, SetType::Flashcard);
        assert!(sets[0].items.is_empty());
        assert_eq!(sets[0].cards.len(), 2);
        assert_eq!(sets[0].cards[0], Flashcard::new("r1", "犬", "dog"));

        let untyped = r#"{"title": "Animals", "items": [{"term": "犬", "def": "dog"}]}"#;
        assert_eq!(read_sets(untyped).unwrap()[0].set_type, SetType::Flashcard);

        let unknown = r#"{"title": "X", "type": "essay", "items": [{"prompt": "p"}]}"#;
        assert_eq!(read_sets(unknown).unwrap()[0].set_type, SetType::Practice);
    }

    #[test]
    fn test_write_then_read_keeps_items() {
        let set = StudySet::draft(
            "Maths",
            vec![RawPracticeItem::multiple_choice("q", "2+2?", "4", vec!["3"])],
        );
        let json = write_sets(std::slice::from_ref(&set)).unwrap();
        assert!(json.contains("\"correctAnswer\": \"4\""));
        assert!(json.contains("\"type\": \"practice\""));
        assert_eq!(read_sets(&json).unwrap(), vec![set.clone()]);

        let cards = StudySet::flashcard_draft("Animals", vec![Flashcard::new("r", "犬", "dog")]);
        let json = write_sets(&[set, cards.clone()]).unwrap();
        assert!(json.contains("\"sets\""));
        assert!(json.contains("\"type\": \"flashcard\""));
        assert!(json.contains("\"term\": \"犬\""));
        let sets = read_sets(&json).unwrap();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[1], cards);
    }

    #[test]
    fn test_import_creates_new_sets() {
        let dir = tempfile::tempdir().unwrap();
        let conn = create_or_open(&dir.path().join("sets.db")).unwrap();
        let mut set = StudySet::draft("Imported", parse_practice_import("a :: true\nb :: x ;; y"));
        set.id = Some("set-fixed".to_string());

        let first = import_sets(&conn, vec![set.clone()]).unwrap();
        let second = import_sets(&conn, vec![set]).unwrap();

        assert_ne!(first[0], "set-fixed");
        assert_ne!(first[0], second[0]);
        assert_eq!(StudySet::get_by_id(&conn, &first[0]).unwrap().items.len(), 2);
    }

    #[test]
    fn test_import_keeps_flashcard_type() {
        let dir = tempfile::tempdir().unwrap();
        let conn = create_or_open(&dir.path().join("sets.db")).unwrap();
        let sets = read_sets(r#"{"type": "flashcard", "title": "Animals", "items": [
            {"term": "犬", "def": "dog"}, {"term": "猫", "def": "cat"}
        ]}"#)
        .unwrap();

        let ids = import_sets(&conn, sets).unwrap();
        let stored = StudySet::get_by_id(&conn, &ids[0]).unwrap();
        assert_eq!(stored.set_type, SetType::Flashcard);
        assert_eq!(stored.cards.len(), 2);
        assert!(stored.cards.iter().all(|card| card.id.starts_with("row-")));
    }
}
