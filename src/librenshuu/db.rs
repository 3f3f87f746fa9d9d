use crate::error::SetError;
use crate::kaado::{clean_flashcards, Flashcard};
use crate::lenient::{lenient_objects, lenient_optional_string, lenient_string};
use crate::shitsumon::{clean_items, create_id, ItemKind, RawPracticeItem};
use log::{debug, error, info, warn};
use rusqlite::types::Type;
use rusqlite::{params, Connection, DatabaseName, OptionalExtension, Result, Row, ToSql};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::time::Instant;

const SET_COLUMNS: &str = "id, title, folder, setType";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SetType {
    #[default]
    Practice,
    Flashcard,
}

impl SetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SetType::Practice => "practice",
            SetType::Flashcard => "flashcard",
        }
    }

    pub fn parse(value: &str) -> Option<SetType> {
        match value.trim() {
            "practice" => Some(SetType::Practice),
            "flashcard" => Some(SetType::Flashcard),
            _ => None,
        }
    }

    /// Suffix for the title of a combined folder run.
    pub fn run_label(&self) -> &'static str {
        match self {
            SetType::Practice => "Practice",
            SetType::Flashcard => "Flashcards",
        }
    }
}

impl fmt::Display for SetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A titled collection of practice items or flashcards. `id` is `None` until
/// saved. Only the list matching `set_type` is stored or written out.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "SetRecord")]
pub struct StudySet {
    pub id: Option<String>,
    pub title: String,
    pub folder: String,
    pub set_type: SetType,
    pub items: Vec<RawPracticeItem>,
    pub cards: Vec<Flashcard>,
}

/// The JSON shape of a set. Both kinds keep their entries under `items`.
#[derive(Deserialize)]
struct SetRecord {
    #[serde(default, deserialize_with = "lenient_optional_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    folder: String,
    #[serde(rename = "type", default, deserialize_with = "lenient_optional_string")]
    set_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_objects")]
    items: Vec<Value>,
}

fn looks_like_card(entry: &Value) -> bool {
    let has = |key: &str| entry.get(key).is_some();
    (has("term") || has("def")) && !has("prompt")
}

impl From<SetRecord> for StudySet {
    fn from(record: SetRecord) -> Self {
        let set_type = match record.set_type.as_deref().and_then(SetType::parse) {
            Some(set_type) => set_type,
            None if record.items.iter().any(looks_like_card) => SetType::Flashcard,
            None => SetType::Practice,
        };
        let mut set = StudySet {
            id: record.id,
            title: record.title,
            folder: record.folder,
            set_type,
            items: Vec::new(),
            cards: Vec::new(),
        };
        let entries = record.items.into_iter();
        match set_type {
            SetType::Practice => {
                set.items = entries.filter_map(|v| serde_json::from_value(v).ok()).collect()
            }
            SetType::Flashcard => {
                set.cards = entries.filter_map(|v| serde_json::from_value(v).ok()).collect()
            }
        }
        set
    }
}

impl Serialize for StudySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Written<'a, T> {
            #[serde(skip_serializing_if = "Option::is_none")]
            id: Option<&'a str>,
            title: &'a str,
            folder: &'a str,
            #[serde(rename = "type")]
            set_type: SetType,
            items: &'a [T],
        }

        let id = self.id.as_deref();
        match self.set_type {
            SetType::Practice => Written {
                id,
                title: &self.title,
                folder: &self.folder,
                set_type: self.set_type,
                items: &self.items,
            }
            .serialize(serializer),
            SetType::Flashcard => Written {
                id,
                title: &self.title,
                folder: &self.folder,
                set_type: self.set_type,
                items: &self.cards,
            }
            .serialize(serializer),
        }
    }
}

impl StudySet {
    pub fn draft<S: Into<String>>(title: S, items: Vec<RawPracticeItem>) -> Self {
        Self {
            id: None,
            title: title.into(),
            folder: String::new(),
            set_type: SetType::Practice,
            items,
            cards: Vec::new(),
        }
    }

    pub fn flashcard_draft<S: Into<String>>(title: S, cards: Vec<Flashcard>) -> Self {
        Self {
            id: None,
            title: title.into(),
            folder: String::new(),
            set_type: SetType::Flashcard,
            items: Vec::new(),
            cards,
        }
    }

    /// Number of entries of the set's own kind.
    pub fn len(&self) -> usize {
        match self.set_type {
            SetType::Practice => self.items.len(),
            SetType::Flashcard => self.cards.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cleans and stores the set, replacing any earlier version with the same
    /// id. Returns the id the set was saved under.
    pub fn save(connection: &Connection, draft: StudySet) -> Result<String, SetError> {
        let title = draft.title.trim().to_string();
        if title.is_empty() {
            return Err(SetError::EmptyTitle);
        }
        let (items, cards) = match draft.set_type {
            SetType::Practice => (clean_items(&draft.items), Vec::new()),
            SetType::Flashcard => (Vec::new(), clean_flashcards(&draft.cards)),
        };
        match draft.set_type {
            SetType::Practice if items.is_empty() => return Err(SetError::NoCompleteItems),
            SetType::Flashcard if cards.is_empty() => return Err(SetError::NoCompleteCards),
            _ => {}
        }
        let id = match draft.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => create_id("set"),
        };
        let folder = draft.folder.trim().to_string();

        let tx = connection.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO StudySet(id, title, folder, setType) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET title = excluded.title, folder = excluded.folder,
             setType = excluded.setType",
            params![id, title, folder, draft.set_type.as_str()],
        )?;
        tx.execute("DELETE FROM PracticeItem WHERE setId = ?1", params![id])?;
        tx.execute("DELETE FROM Flashcard WHERE setId = ?1", params![id])?;
        for (position, item) in items.iter().enumerate() {
            let distractors = serde_json::to_string(&item.distractors)?;
            tx.execute(
                "INSERT INTO \
                PracticeItem(id, setId, position, prompt, kind, correctAnswer, distractors) \
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    item.id,
                    id,
                    position as i64,
                    item.prompt,
                    item.kind.as_str(),
                    item.correct_answer,
                    distractors
                ],
            )?;
        }
        for (position, card) in cards.iter().enumerate() {
            tx.execute(
                "INSERT INTO Flashcard(id, setId, position, term, def) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![card.id, id, position as i64, card.term, card.def],
            )?;
        }
        tx.commit()?;
        debug!(
            "[DB] Saved {} StudySet {} '{}' with {} entries",
            draft.set_type,
            id,
            title,
            items.len() + cards.len()
        );
        Ok(id)
    }

    pub fn delete(connection: &Connection, id: &str) -> Result<(), SetError> {
        let tx = connection.unchecked_transaction()?;
        tx.execute("DELETE FROM PracticeItem WHERE setId = ?1", params![id])?;
        tx.execute("DELETE FROM Flashcard WHERE setId = ?1", params![id])?;
        match tx.execute("DELETE FROM StudySet WHERE id = ?1", params![id]) {
            Ok(0) => {
                warn!("[DB] No StudySet '{}' to delete", id);
            }
            Ok(_) => {
                debug!("[DB] Deleted StudySet '{}'", id);
            }
            Err(err) => {
                error!("[DB] Error while deleting StudySet {}: {:?}", id, err);
                return Err(err.into());
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Blank titles and unknown ids are ignored.
    pub fn rename(connection: &Connection, id: &str, title: &str) -> Result<(), SetError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Ok(());
        }
        let changed = connection.execute(
            "UPDATE StudySet SET title = ?2 WHERE id = ?1",
            params![id, trimmed],
        )?;
        debug!("[DB] Renamed {} StudySet(s) '{}' to '{}'", changed, id, trimmed);
        Ok(())
    }

    fn from_row(row: &Row) -> Result<StudySet> {
        let set_type: String = row.get(3)?;
        Ok(StudySet {
            id: Some(row.get(0)?),
            title: row.get(1)?,
            folder: row.get(2)?,
            set_type: SetType::parse(&set_type).unwrap_or_default(),
            items: Vec::new(),
            cards: Vec::new(),
        })
    }

    fn with_items(connection: &Connection, mut set: StudySet) -> Result<StudySet> {
        if let Some(id) = &set.id {
            match set.set_type {
                SetType::Practice => set.items = items_in_set(connection, id)?,
                SetType::Flashcard => set.cards = cards_in_set(connection, id)?,
            }
        }
        Ok(set)
    }

    fn query_all(
        connection: &Connection,
        sql: &str,
        params: &[(&str, &dyn ToSql)],
    ) -> Result<Vec<StudySet>, SetError> {
        let mut statement = connection.prepare(sql)?;
        let rows = statement.query_map(params, |row| Self::from_row(row))?;
        let sets = rows.collect::<Result<Vec<_>>>()?;
        sets.into_iter()
            .map(|set| Self::with_items(connection, set).map_err(SetError::from))
            .collect()
    }

    pub fn get_all(connection: &Connection) -> Result<Vec<StudySet>, SetError> {
        let sql = format!("SELECT {} FROM StudySet ORDER BY title, id", SET_COLUMNS);
        Self::query_all(connection, &sql, &[])
    }

    pub fn get_by_id(connection: &Connection, id: &str) -> Result<StudySet, SetError> {
        let sql = format!("SELECT {} FROM StudySet WHERE id = :id LIMIT 1", SET_COLUMNS);
        let mut statement = connection.prepare(&sql)?;
        let set = statement
            .query_row(&[(":id", &id)], |row| Self::from_row(row))
            .optional()?
            .ok_or_else(|| SetError::NotFound(id.to_string()))?;
        Ok(Self::with_items(connection, set)?)
    }

    /// Looks a set up by id first, then by (case-insensitive) title.
    pub fn find(connection: &Connection, key: &str) -> Result<StudySet, SetError> {
        match Self::get_by_id(connection, key) {
            Err(SetError::NotFound(_)) => {}
            other => return other,
        }
        let sql = format!(
            "SELECT {} FROM StudySet WHERE title = :title COLLATE NOCASE LIMIT 1",
            SET_COLUMNS
        );
        let mut statement = connection.prepare(&sql)?;
        let set = statement
            .query_row(&[(":title", &key.trim())], |row| Self::from_row(row))
            .optional()?
            .ok_or_else(|| SetError::NotFound(key.to_string()))?;
        Ok(Self::with_items(connection, set)?)
    }

    pub fn in_folder(connection: &Connection, folder: &str) -> Result<Vec<StudySet>, SetError> {
        let sql = format!(
            "SELECT {} FROM StudySet WHERE folder = :folder ORDER BY title, id",
            SET_COLUMNS
        );
        let folder = folder.trim();
        Self::query_all(connection, &sql, &[(":folder", &folder as &dyn ToSql)])
    }
}

fn item_from_row(row: &Row) -> Result<RawPracticeItem> {
    let distractors: String = row.get(4)?;
    let distractors = serde_json::from_str(&distractors)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(err)))?;
    Ok(RawPracticeItem {
        id: row.get(0)?,
        prompt: row.get(1)?,
        kind: ItemKind::parse(&row.get::<usize, String>(2)?),
        correct_answer: row.get(3)?,
        distractors,
    })
}

pub fn items_in_set(connection: &Connection, set_id: &str) -> Result<Vec<RawPracticeItem>> {
    let mut statement = connection.prepare(
        "SELECT id, prompt, kind, correctAnswer, distractors FROM PracticeItem \
        WHERE setId = :setId ORDER BY position",
    )?;
    let rows = statement.query_map(&[(":setId", &set_id)], |row| item_from_row(row))?;

    rows.collect()
}

fn card_from_row(row: &Row) -> Result<Flashcard> {
    Ok(Flashcard {
        id: row.get(0)?,
        term: row.get(1)?,
        def: row.get(2)?,
    })
}

pub fn cards_in_set(connection: &Connection, set_id: &str) -> Result<Vec<Flashcard>> {
    let mut statement = connection.prepare(
        "SELECT id, term, def FROM Flashcard WHERE setId = :setId ORDER BY position",
    )?;
    let rows = statement.query_map(&[(":setId", &set_id)], |row| card_from_row(row))?;

    rows.collect()
}

/// Merges the sets of one type into an unsaved draft for a folder run. Sets
/// of the other type are skipped. Every entry gets a fresh id so entries
/// from different sets cannot collide.
pub fn combine_sets(
    folder: &str,
    set_type: SetType,
    sets: &[StudySet],
) -> Result<StudySet, SetError> {
    let chosen: Vec<&StudySet> = sets.iter().filter(|set| set.set_type == set_type).collect();
    if chosen.is_empty() {
        return Err(SetError::EmptyFolder {
            folder: folder.to_string(),
            set_type,
        });
    }
    let title = format!("{} • {}", folder, set_type.run_label());
    let mut combined = match set_type {
        SetType::Practice => {
            let items: Vec<RawPracticeItem> = chosen
                .iter()
                .flat_map(|set| clean_items(&set.items))
                .map(|item| RawPracticeItem {
                    id: create_id("question"),
                    ..item
                })
                .collect();
            if items.is_empty() {
                return Err(SetError::NoCompleteItems);
            }
            StudySet::draft(title, items)
        }
        SetType::Flashcard => {
            let cards: Vec<Flashcard> = chosen
                .iter()
                .flat_map(|set| clean_flashcards(&set.cards))
                .map(|card| Flashcard {
                    id: create_id("row"),
                    ..card
                })
                .collect();
            if cards.is_empty() {
                return Err(SetError::NoCompleteCards);
            }
            StudySet::flashcard_draft(title, cards)
        }
    };
    debug!(
        "[Setup] Combined {} {} sets from folder '{}' into {} entries",
        chosen.len(),
        set_type,
        folder,
        combined.len()
    );
    combined.folder = folder.to_string();
    Ok(combined)
}

pub fn create_or_open(src: &Path) -> Result<Connection> {
    if src.exists() {
        info!("[DB] Opening existing Database");
        open_db(src)
    } else {
        info!("[DB] Creating new Database");
        create_db(src)
    }
}

pub fn create_db(dest: &Path) -> Result<Connection> {
    let now = Instant::now();
    let mut db = Connection::open_in_memory()?;
    db = init_db(db)?;
    match db.backup(DatabaseName::Main, dest, None) {
        Ok(_) => {
            debug!(
                "[DB] Creating and Saving took {} ms.",
                now.elapsed().as_millis()
            );
            close_db(db)?;
            open_db(dest)
        }
        Err(err) => {
            warn!("Failed to create database file: {}", err);
            close_db(db)?;
            Err(err)
        }
    }
}

pub fn open_db(src: &Path) -> Result<Connection> {
    let now = Instant::now();
    let db = Connection::open(src)?;
    db.execute_batch("PRAGMA foreign_keys = ON;")?;
    debug!("[DB] Opening took {} ms.", now.elapsed().as_millis());
    Ok(db)
}

pub fn close_db(connection: Connection) -> Result<()> {
    info!("[DB] Closing Database");
    let mut connection = connection;
    for attempt in 1..=3 {
        match connection.close() {
            Ok(_) => return Ok(()),
            Err((conn, err)) => {
                if attempt == 3 {
                    error!("[DB] Cannot close connection! Giving up.");
                    return Err(err);
                }
                error!("[DB] Cannot close connection. Retrying {}/2...", attempt);
                connection = conn;
            }
        }
    }
    Ok(())
}

fn init_db(conn: Connection) -> Result<Connection> {
    info!("[DB INIT] Creating tables");
    conn.execute(
        "CREATE TABLE StudySet (
              id TEXT NOT NULL PRIMARY KEY,
              title TEXT NOT NULL,
              folder TEXT NOT NULL DEFAULT '',
              setType TEXT NOT NULL DEFAULT 'practice'
            )",
        (),
    )?;
    info!("[DB INIT] Created table StudySet");
    conn.execute(
        "CREATE TABLE PracticeItem (
              id TEXT NOT NULL,
              setId TEXT NOT NULL,
              position INTEGER NOT NULL,
              prompt TEXT NOT NULL,
              kind TEXT NOT NULL,
              correctAnswer TEXT NOT NULL,
              distractors TEXT NOT NULL,
              PRIMARY KEY (setId, id),
              FOREIGN KEY (setId) REFERENCES StudySet(id) ON DELETE CASCADE ON UPDATE CASCADE
            )",
        (),
    )?;
    info!("[DB INIT] Created table PracticeItem");
    conn.execute(
        "CREATE TABLE Flashcard (
              id TEXT NOT NULL,
              setId TEXT NOT NULL,
              position INTEGER NOT NULL,
              term TEXT NOT NULL,
              def TEXT NOT NULL,
              PRIMARY KEY (setId, id),
              FOREIGN KEY (setId) REFERENCES StudySet(id) ON DELETE CASCADE ON UPDATE CASCADE
            )",
        (),
    )?;
    info!("[DB INIT] Created table Flashcard");
    conn.execute(
        "CREATE INDEX Flashcard_setId_idx ON Flashcard(setId, position)",
        (),
    )?;
    info!("[DB INIT] Created index Flashcard_setId_idx");
    conn.execute(
        "CREATE INDEX PracticeItem_setId_idx ON PracticeItem(setId, position)",
        (),
    )?;
    info!("[DB INIT] Created index PracticeItem_setId_idx");
    conn.execute("CREATE INDEX StudySet_folder_idx ON StudySet(folder)", ())?;
    info!("[DB INIT] Created index StudySet_folder_idx");
    info!("[DB INIT] Database Creation Successful!");

    Ok(conn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_temp() -> (TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = create_or_open(&dir.path().join("sets.db")).unwrap();
        (dir, conn)
    }

    fn sample_items() -> Vec<RawPracticeItem> {
        vec![
            RawPracticeItem::multiple_choice("q1", "2+2?", "4", vec!["3", " ", "5"]),
            RawPracticeItem::true_false("q2", "Sky is blue", "True"),
            RawPracticeItem::multiple_choice("q3", "incomplete", "x", vec![""]),
        ]
    }

    fn sample_cards() -> Vec<Flashcard> {
        vec![
            Flashcard::new("a", " 犬 ", "dog"),
            Flashcard::new("b", "猫", "cat"),
            Flashcard::new("c", "", "bird"),
        ]
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let (_dir, conn) = open_temp();
        let id = StudySet::save(&conn, StudySet::draft("  Maths  ", sample_items())).unwrap();

        let set = StudySet::get_by_id(&conn, &id).unwrap();
        assert_eq!(set.id.as_deref(), Some(id.as_str()));
        assert_eq!(set.title, "Maths");
        assert_eq!(set.items.len(), 2);
        assert_eq!(set.items[0].id, "q1");
        assert_eq!(set.items[0].distractors, vec!["3", "5"]);
        assert_eq!(set.items[1].kind, ItemKind::TrueFalse);
        assert_eq!(set.set_type, SetType::Practice);
        assert!(id.starts_with("set-"));
    }

    #[test]
    fn test_save_rejects_empty_title_and_items() {
        let (_dir, conn) = open_temp();
        assert!(matches!(
            StudySet::save(&conn, StudySet::draft("   ", sample_items())),
            Err(SetError::EmptyTitle)
        ));
        assert!(matches!(
            StudySet::save(&conn, StudySet::draft("Empty", vec![])),
            Err(SetError::NoCompleteItems)
        ));
        assert!(StudySet::get_all(&conn).unwrap().is_empty());
    }

    #[test]
    fn test_save_replaces_existing_set() {
        let (_dir, conn) = open_temp();
        let id = StudySet::save(&conn, StudySet::draft("First", sample_items())).unwrap();

        let mut draft =
            StudySet::draft("Second", vec![RawPracticeItem::true_false("z", "p", "false")]);
        draft.id = Some(id.clone());
        let same = StudySet::save(&conn, draft).unwrap();

        assert_eq!(same, id);
        let set = StudySet::get_by_id(&conn, &id).unwrap();
        assert_eq!(set.title, "Second");
        assert_eq!(set.items.len(), 1);
        assert_eq!(StudySet::get_all(&conn).unwrap().len(), 1);
    }

    #[test]
    fn test_rename_and_delete() {
        let (_dir, conn) = open_temp();
        let id = StudySet::save(&conn, StudySet::draft("Old", sample_items())).unwrap();

        StudySet::rename(&conn, &id, "   ").unwrap();
        assert_eq!(StudySet::get_by_id(&conn, &id).unwrap().title, "Old");
        StudySet::rename(&conn, &id, " New ").unwrap();
        assert_eq!(StudySet::get_by_id(&conn, &id).unwrap().title, "New");

        StudySet::delete(&conn, &id).unwrap();
        assert!(matches!(
            StudySet::get_by_id(&conn, &id),
            Err(SetError::NotFound(_))
        ));
        assert!(items_in_set(&conn, &id).unwrap().is_empty());
    }

    #[test]
    fn test_find_by_title_and_folder() {
        let (_dir, conn) = open_temp();
        let mut draft = StudySet::draft("Japanese", sample_items());
        draft.folder = "Languages".to_string();
        let id = StudySet::save(&conn, draft).unwrap();
        StudySet::save(&conn, StudySet::draft("Maths", sample_items())).unwrap();

        assert_eq!(StudySet::find(&conn, "japanese").unwrap().id, Some(id.clone()));
        assert_eq!(StudySet::find(&conn, &id).unwrap().title, "Japanese");
        assert!(matches!(
            StudySet::find(&conn, "nope"),
            Err(SetError::NotFound(_))
        ));

        let in_folder = StudySet::in_folder(&conn, "Languages").unwrap();
        assert_eq!(in_folder.len(), 1);
        assert_eq!(in_folder[0].items.len(), 2);
        assert_eq!(StudySet::in_folder(&conn, "").unwrap().len(), 1);
    }

    #[test]
    fn test_reopen_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sets.db");
        let conn = create_or_open(&path).unwrap();
        let id = StudySet::save(&conn, StudySet::draft("Kept", sample_items())).unwrap();
        close_db(conn).unwrap();

        let conn = create_or_open(&path).unwrap();
        assert_eq!(StudySet::get_by_id(&conn, &id).unwrap().items.len(), 2);
    }

    #[test]
    fn test_same_item_ids_in_two_sets() {
        let (_dir, conn) = open_temp();
        StudySet::save(&conn, StudySet::draft("A", sample_items())).unwrap();
        StudySet::save(&conn, StudySet::draft("B", sample_items())).unwrap();
        assert_eq!(StudySet::get_all(&conn).unwrap().len(), 2);
    }

    #[test]
    fn test_combine_sets() {
        let a = StudySet::draft("A", sample_items());
        let b = StudySet::draft("B", vec![RawPracticeItem::true_false("q1", "p", "false")]);
        let cards = StudySet::flashcard_draft("C", vec![Flashcard::new("c", "犬", "dog")]);
        let combined = combine_sets("Revision", SetType::Practice, &[a, b, cards]).unwrap();

        assert_eq!(combined.title, "Revision • Practice");
        assert_eq!(combined.folder, "Revision");
        assert!(combined.id.is_none());
        assert_eq!(combined.items.len(), 3);
        let ids: std::collections::HashSet<&str> =
            combined.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids.len(), 3);
        assert!(ids.iter().all(|id| id.starts_with("question-")));
        assert_eq!(combined.items[2].prompt, "p");
    }

    #[test]
    fn test_combine_sets_without_items() {
        assert!(matches!(
            combine_sets("Empty", SetType::Practice, &[StudySet::draft("x", Vec::new())]),
            Err(SetError::NoCompleteItems)
        ));
        assert!(matches!(
            combine_sets("Empty", SetType::Flashcard, &[StudySet::draft("x", sample_items())]),
            Err(SetError::EmptyFolder { set_type: SetType::Flashcard, .. })
        ));
    }

    #[test]
    fn test_combine_flashcard_sets() {
        let a = StudySet::flashcard_draft("A", sample_cards());
        let b = StudySet::flashcard_draft("B", vec![Flashcard::new("x", "鳥", "bird")]);
        let practice = StudySet::draft("P", sample_items());
        let combined = combine_sets("Animals", SetType::Flashcard, &[a, practice, b]).unwrap();

        assert_eq!(combined.title, "Animals • Flashcards");
        assert_eq!(combined.set_type, SetType::Flashcard);
        assert!(combined.items.is_empty());
        assert_eq!(combined.cards.len(), 3);
        assert!(combined.cards.iter().all(|card| card.id.starts_with("row-")));
        assert_eq!(combined.cards[2].def, "bird");
    }

    #[test]
    fn test_flashcard_set_round_trip() {
        let (_dir, conn) = open_temp();
        let mut draft = StudySet::flashcard_draft(" Animals ", sample_cards());
        draft.folder = "Japanese".to_string();
        let id = StudySet::save(&conn, draft).unwrap();

        let set = StudySet::get_by_id(&conn, &id).unwrap();
        assert_eq!(set.set_type, SetType::Flashcard);
        assert_eq!(set.title, "Animals");
        assert!(set.items.is_empty());
        assert_eq!(
            set.cards,
            vec![Flashcard::new("a", "犬", "dog"), Flashcard::new("b", "猫", "cat")]
        );
        assert_eq!(set.len(), 2);

        StudySet::save(&conn, StudySet::draft("Maths", sample_items())).unwrap();
        let sets = StudySet::in_folder(&conn, "Japanese").unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].cards.len(), 2);

        StudySet::delete(&conn, &id).unwrap();
        assert!(cards_in_set(&conn, &id).unwrap().is_empty());
    }

    #[test]
    fn test_flashcard_set_needs_complete_cards() {
        let (_dir, conn) = open_temp();
        let cards = vec![Flashcard::new("a", "犬", " "), Flashcard::new("b", "", "cat")];
        assert!(matches!(
            StudySet::save(&conn, StudySet::flashcard_draft("Empty", cards)),
            Err(SetError::NoCompleteCards)
        ));
    }

    #[test]
    fn test_saving_changes_type() {
        let (_dir, conn) = open_temp();
        let id = StudySet::save(&conn, StudySet::draft("Mixed", sample_items())).unwrap();
        let mut draft = StudySet::flashcard_draft("Mixed", sample_cards());
        draft.id = Some(id.clone());
        StudySet::save(&conn, draft).unwrap();

        let set = StudySet::get_by_id(&conn, &id).unwrap();
        assert_eq!(set.set_type, SetType::Flashcard);
        assert!(items_in_set(&conn, &id).unwrap().is_empty());
        assert_eq!(set.cards.len(), 2);
    }
}
