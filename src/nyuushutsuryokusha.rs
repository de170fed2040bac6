use clap::{Parser, Subcommand};
use colored::Colorize;
use env_logger::Env;
use kuizu::libkuizu::db;
use kuizu::{Deck, Error};
use log::{error, info, warn};
use rusqlite::Connection;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "入出力者 (Nyūshutsuryokusha)")]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, default_value = "info")]
    log_level: String,
    #[arg(short, long, value_name = "FILE", default_value = "decks.db")]
    db: PathBuf,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Store a JSON deck in the database, replacing a deck of the same name.
    Import {
        json: PathBuf,
        /// Refuse decks with authoring defects.
        #[arg(long, default_value = "false")]
        strict: bool,
    },
    /// Write a deck from the database to a JSON file.
    Export {
        json: PathBuf,
        /// Deck to export. Defaults to the first deck by name.
        #[arg(long)]
        deck: Option<String>,
    },
    /// List the decks in the database.
    List,
}

fn main() -> Result<(), Error> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(&args.log_level)).init();

    info!("{}", format!("Database at {:?}", args.db).cyan());
    let mut conn = match db::create_or_open(&args.db) {
        Ok(conn) => conn,
        Err(err) => {
            error!("{}{}", "Unable to open Database: ".red(), err);
            return Err(err.into());
        }
    };

    let result = run(&mut conn, args.command);
    if let Err(err) = &result {
        error!("{}", format!("{}", err).red());
    }
    db::close_db(conn)?;
    result
}

fn run(conn: &mut Connection, command: Commands) -> Result<(), Error> {
    match command {
        Commands::Import { json, strict } => import(conn, &json, strict),
        Commands::Export { json, deck } => {
            let deck = db::load_deck(conn, deck.as_deref())?;
            info!(
                "{}",
                format!(
                    "Exporting deck {:?} ({} Questions) to {:?}",
                    deck.name,
                    deck.questions.len(),
                    json
                )
                .blue()
            );
            deck.to_json_file(&json)
        }
        Commands::List => {
            let names = db::deck_names(conn)?;
            if names.is_empty() {
                warn!("{}", "No decks yet.".yellow());
            }
            for name in names {
                println!("{}", name);
            }
            Ok(())
        }
    }
}

fn import(conn: &mut Connection, json: &Path, strict: bool) -> Result<(), Error> {
    let deck = Deck::from_json_file(json)?;
    info!(
        "{}",
        format!(
            "Importing deck {:?} ({} Questions)",
            deck.name,
            deck.questions.len()
        )
        .blue()
    );

    let defects = deck.validate();
    for (idx, question) in deck.questions.iter().enumerate() {
        let question_defects = question.defects(idx + 1);
        if question_defects.is_empty() {
            info!(
                "{} {}",
                "│".blue(),
                format!("├ Question: {} ({} Answers)", question.prompt(), question.answers().len())
                    .green()
            );
        } else {
            for defect in question_defects {
                warn!("{} {}", "│".blue(), format!("├ ✘ {}", defect).red());
            }
        }
    }
    if strict && !defects.is_empty() {
        return Err(Error::InvalidDeck(defects));
    }

    deck.save(conn)?;
    info!("{}", format!("Imported deck {:?}.", deck.name).cyan());
    Ok(())
}
