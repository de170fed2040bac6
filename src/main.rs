use clap::Parser;
use colored::Colorize;
use env_logger::Env;
use kuizu::libkuizu::db;
use kuizu::Deck;
use log::{debug, error, warn};
use std::path::PathBuf;
use thiserror::Error;

#[cfg(feature = "cli")]
mod cli;
#[cfg(feature = "gui")]
mod gui;

#[derive(Parser, Debug)]
#[command(name = "クイズ (Kuizu)")]
#[command(version, about, long_about = None)]
struct Args {
    /// Play a deck from a JSON file.
    #[arg(short = 'f', long, value_name = "FILE", conflicts_with = "db")]
    deck_file: Option<PathBuf>,
    /// Play a deck from a deck database.
    #[arg(long, value_name = "FILE")]
    db: Option<PathBuf>,
    /// Deck to play from the database. Defaults to the first deck by name.
    #[arg(short, long, requires = "db")]
    deck: Option<String>,
    /// Refuse decks with authoring defects instead of warning about them.
    #[arg(long, default_value = "false")]
    strict: bool,
    /// Play in the terminal even when the window front end is available.
    #[arg(long, default_value = "false")]
    cli: bool,
    #[arg(short, long, default_value = "error")]
    log_level: String,
}

#[derive(Debug, Error)]
enum Error {
    #[error(transparent)]
    Kuizu(#[from] kuizu::Error),
    #[cfg(feature = "gui")]
    #[error("window error: {0}")]
    Gui(#[from] eframe::Error),
    #[cfg(not(any(feature = "cli", feature = "gui")))]
    #[error("this build has no front end enabled")]
    NoFrontEnd,
}

fn main() -> Result<(), Error> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or(&args.log_level)).init();

    let deck = match load_deck(&args) {
        Ok(deck) => deck,
        Err(kuizu::Error::NoDecks) => {
            warn!("[Setup] No decks found.");
            println!(
                "{}",
                "No decks found. Come back when you have imported some questions!".yellow()
            );
            return Err(kuizu::Error::NoDecks.into());
        }
        Err(err) => {
            error!("[Setup] Cannot load deck: {}", err);
            return Err(err.into());
        }
    };

    let defects = deck.validate();
    for defect in &defects {
        warn!("[Setup] Deck {:?}: {}", deck.name, defect);
    }
    if args.strict && !defects.is_empty() {
        error!("[Setup] Refusing deck {:?} in strict mode.", deck.name);
        return Err(kuizu::Error::InvalidDeck(defects).into());
    }
    debug!(
        "[Setup] Playing deck {:?} ({} questions)",
        deck.name,
        deck.questions.len()
    );

    run(deck, args.cli)
}

fn load_deck(args: &Args) -> Result<Deck, kuizu::Error> {
    if let Some(path) = &args.deck_file {
        return Deck::from_json_file(path);
    }
    match &args.db {
        Some(path) => {
            let conn = db::create_or_open(path)?;
            debug!("[DB] Database Connection Successful!");
            let deck = db::load_deck(&conn, args.deck.as_deref());
            db::close_db(conn)?;
            deck
        }
        None => Ok(Deck::builtin()),
    }
}

cfg_if::cfg_if! {
    if #[cfg(all(feature = "cli", feature = "gui"))] {
        fn run(deck: Deck, force_cli: bool) -> Result<(), Error> {
            if force_cli {
                cli::cli_loop(deck);
                Ok(())
            } else {
                gui::init_gui(deck)
            }
        }
    } else if #[cfg(feature = "cli")] {
        fn run(deck: Deck, _force_cli: bool) -> Result<(), Error> {
            cli::cli_loop(deck);
            Ok(())
        }
    } else if #[cfg(feature = "gui")] {
        fn run(deck: Deck, _force_cli: bool) -> Result<(), Error> {
            gui::init_gui(deck)
        }
    } else {
        fn run(_deck: Deck, _force_cli: bool) -> Result<(), Error> {
            Err(Error::NoFrontEnd)
        }
    }
}
