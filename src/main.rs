use clap::{Parser, ValueEnum};
use colored::Colorize;
use env_logger::Env;
use librenshuu::choice_quiz::ChoiceQuiz;
use librenshuu::db::{self, combine_sets, SetType, StudySet};
use librenshuu::flip_deck::FlipDeck;
use librenshuu::kaado::{clean_flashcards, DEFAULT_OPTION_COUNT, DEFAULT_QUESTION_COUNT};
use librenshuu::match_board::MatchBoard;
use librenshuu::practice_test::PracticeTest;
use librenshuu::quick_quiz::QuickQuiz;
use librenshuu::shitsumon::clean_items;
use librenshuu::{ChoiceSettings, QuizError, SetError};
use log::{debug, warn};
use rand::rng;
use rand::seq::IndexedRandom;
use rusqlite::Connection;
use std::path::PathBuf;
use thiserror::Error;

mod cli;

#[derive(Debug, PartialEq)]
enum Choice {
    Option(usize),
    Quit,
    Restart,
    Retake,
    Clear,
    DontKnow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// One question at a time, missed questions come back
    Quick,
    /// Answer everything, then get graded
    Test,
    /// Flashcards: pick the definition for each term
    Mc,
    /// Flashcards: flip through the deck
    Flash,
    /// Flashcards: match every term to its definition
    Match,
}

impl Mode {
    fn set_type(self) -> SetType {
        match self {
            Mode::Quick | Mode::Test => SetType::Practice,
            Mode::Mc | Mode::Flash | Mode::Match => SetType::Flashcard,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "練習しよう！ (Renshūshiyō!)")]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, value_name = "FILE", default_value = "studysets.db")]
    db: PathBuf,
    /// Id or title of the set to practise. A random set is picked otherwise.
    #[arg(short, long)]
    set: Option<String>,
    /// Practise every set in this folder together
    #[arg(short, long, conflicts_with = "set")]
    folder: Option<String>,
    #[arg(short, long, value_enum, default_value = "quick")]
    mode: Mode,
    /// Questions per multiple-choice run (mc mode)
    #[arg(long, default_value_t = DEFAULT_QUESTION_COUNT)]
    questions: usize,
    /// Options per question (mc mode)
    #[arg(long, default_value_t = DEFAULT_OPTION_COUNT)]
    options: usize,
    #[arg(short, long, default_value = "error")]
    log_level: String,
}

impl Choice {
    fn from_str(choices_count: usize, input: &str) -> Choice {
        match input.trim() {
            "q" => Choice::Quit,
            "r" => Choice::Restart,
            "t" => Choice::Retake,
            "c" => Choice::Clear,
            input => match input.parse::<usize>() {
                Ok(num) if num >= 1 && num <= choices_count => Choice::Option(num - 1),
                Ok(_) => {
                    println!(
                        "{}",
                        format!("There are only {} options available!", choices_count)
                            .bright_red()
                    );
                    Choice::DontKnow
                }
                Err(_) => Choice::DontKnow,
            },
        }
    }
}

#[derive(Debug, Error)]
enum Error {
    #[error("no study sets!")]
    NoSets,
    #[error("'{title}' is a {set_type} set, pick a mode made for it")]
    WrongMode { title: String, set_type: SetType },
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Set(#[from] SetError),
    #[error("database error: {0}")]
    Db(#[from] rusqlite::Error),
}

fn pick_set(conn: &Connection, args: &Args) -> Result<StudySet, Error> {
    let set_type = args.mode.set_type();
    if let Some(folder) = &args.folder {
        let sets = StudySet::in_folder(conn, folder)?;
        debug!("[Setup] Folder '{}' has {} sets", folder, sets.len());
        return Ok(combine_sets(folder, set_type, &sets)?);
    }
    if let Some(key) = &args.set {
        let set = StudySet::find(conn, key)?;
        if set.set_type != set_type {
            return Err(Error::WrongMode {
                title: set.title,
                set_type: set.set_type,
            });
        }
        return Ok(set);
    }
    let sets: Vec<StudySet> = StudySet::get_all(conn)?
        .into_iter()
        .filter(|set| set.set_type == set_type)
        .collect();
    sets.choose(&mut rng()).cloned().ok_or(Error::NoSets)
}

fn run(args: &Args, set: StudySet) -> Result<(), Error> {
    match set.set_type {
        SetType::Practice => {
            let items = clean_items(&set.items);
            debug!("[Setup] Picked set {:?} with {} items", set.id, items.len());
            println!(
                "{}",
                format!("==========> {} ({} questions) <==========", set.title, items.len()).cyan()
            );
            match args.mode {
                Mode::Test => cli::practice_test_loop(&mut PracticeTest::new(items)),
                _ => cli::quick_quiz_loop(&mut QuickQuiz::new(items)),
            }
        }
        SetType::Flashcard => {
            let cards = clean_flashcards(&set.cards);
            debug!("[Setup] Picked set {:?} with {} cards", set.id, cards.len());
            println!(
                "{}",
                format!("==========> {} ({} cards) <==========", set.title, cards.len()).cyan()
            );
            match args.mode {
                Mode::Mc => {
                    let settings = ChoiceSettings {
                        questions: args.questions,
                        options: args.options,
                    };
                    cli::choice_quiz_loop(&mut ChoiceQuiz::new(cards, settings)?)
                }
                Mode::Match => cli::match_loop(&mut MatchBoard::new(cards)),
                _ => cli::flip_loop(&mut FlipDeck::new(cards)),
            }
        }
    }
    Ok(())
}

fn main() -> Result<(), Error> {
    //INIT START
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.as_str()))
        .init();

    let conn = db::create_or_open(&args.db)?;
    debug!("[DB] Database Connection Successful!");

    let set = match pick_set(&conn, &args) {
        Ok(set) => set,
        Err(Error::NoSets) => {
            warn!("[Setup] No {} sets found.", args.mode.set_type());
            println!(
                "{}",
                format!(
                    "No {} sets found. Import some with nyuushutsuryokusha first!",
                    args.mode.set_type()
                )
                .yellow()
            );
            return finish(conn, Err(Error::NoSets));
        }
        Err(err) => return finish(conn, Err(err)),
    };
    // INIT DONE

    let outcome = run(&args, set);
    finish(conn, outcome)
}

fn finish(conn: Connection, to_error: Result<(), Error>) -> Result<(), Error> {
    db::close_db(conn)?;
    to_error
}
