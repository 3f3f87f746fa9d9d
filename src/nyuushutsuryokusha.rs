use clap::{Parser, Subcommand};
use colored::Colorize;
use env_logger::Env;
use librenshuu::db::{self, SetType, StudySet};
use librenshuu::import::{import_sets, quick_import, read_sets, write_sets};
use librenshuu::SetError;
use log::{error, info};
use rusqlite::Connection;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "入出力者 (Nyūshutsuryokusha)")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, default_value = "info")]
    log_level: String,
    #[arg(short, long, value_name = "FILE", default_value = "studysets.db")]
    db: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Import a JSON set or library as new sets
    Import { json: PathBuf },
    /// Export one set, or every set, to JSON
    Export {
        json: PathBuf,
        #[arg(short, long)]
        set: Option<String>,
    },
    /// Create a set from `prompt :: answer ;; distractor` lines,
    /// or from `term :: definition` lines with --cards
    QuickImport {
        title: String,
        text: PathBuf,
        #[arg(short, long, default_value = "")]
        folder: String,
        /// Read the lines as flashcards
        #[arg(short, long)]
        cards: bool,
    },
    /// List stored sets
    List,
    Rename { set: String, title: String },
    Delete { set: String },
}

fn run(db: &Connection, command: Commands) -> Result<(), SetError> {
    match command {
        Commands::Import { json } => {
            let content = std::fs::read_to_string(json)?;
            let sets = read_sets(&content)?;
            info!(
                "{}",
                format!("Importing data... ({} Sets)", sets.len()).blue()
            );
            let ids = import_sets(db, sets)?;
            info!("{}", format!("Imported {} sets.", ids.len()).green());
        }
        Commands::Export { json, set } => {
            let sets = match set {
                Some(key) => vec![StudySet::find(db, &key)?],
                None => StudySet::get_all(db)?,
            };
            std::fs::write(&json, write_sets(&sets)?)?;
            info!(
                "{}",
                format!("Exported {} sets to {:?}", sets.len(), json).green()
            );
        }
        Commands::QuickImport {
            title,
            text,
            folder,
            cards,
        } => {
            let content = std::fs::read_to_string(text)?;
            let set_type = if cards {
                SetType::Flashcard
            } else {
                SetType::Practice
            };
            let mut draft = quick_import(&title, set_type, &content);
            info!(
                "{}",
                format!("Parsed {} {} entries", draft.len(), set_type).blue()
            );
            draft.folder = folder;
            let id = StudySet::save(db, draft)?;
            info!("{}", format!("Saved set {}", id).green());
        }
        Commands::List => {
            for set in StudySet::get_all(db)? {
                let folder = if set.folder.is_empty() {
                    String::new()
                } else {
                    format!("[{}] ", set.folder)
                };
                let count = match set.set_type {
                    SetType::Practice => format!("({} questions)", set.items.len()),
                    SetType::Flashcard => format!("({} cards)", set.cards.len()),
                };
                println!(
                    "{}{} {} {}",
                    folder.blue(),
                    set.title.bold(),
                    count.dimmed(),
                    set.id.unwrap_or_default().dimmed()
                );
            }
        }
        Commands::Rename { set, title } => {
            let found = StudySet::find(db, &set)?;
            if let Some(id) = found.id {
                StudySet::rename(db, &id, &title)?;
                info!("{}", format!("Renamed {} to '{}'", id, title.trim()).green());
            }
        }
        Commands::Delete { set } => {
            let found = StudySet::find(db, &set)?;
            if let Some(id) = found.id {
                StudySet::delete(db, &id)?;
                info!("{}", format!("Deleted '{}'", found.title).green());
            }
        }
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(args.log_level.as_str()))
        .init();

    info!("{}", format!("Database at {:?}", args.db).cyan());
    let db = match db::create_or_open(&args.db) {
        Ok(d) => d,
        Err(e) => {
            error!("{}{}", "Unable to open Database: ".red(), e);
            std::process::exit(1);
        }
    };

    let outcome = run(&db, args.command);
    if let Err(e) = db::close_db(db) {
        error!("{}{}", "Unable to close Database: ".red(), e);
    }
    if let Err(e) = outcome {
        error!("{}", e.to_string().red());
        std::process::exit(1);
    }
}
