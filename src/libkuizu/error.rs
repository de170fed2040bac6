use crate::libkuizu::engine::Phase;
use crate::libkuizu::shitsumon::Defect;
use std::io;
use thiserror::Error;

/// Contract violations reported by [`QuizEngine`](crate::QuizEngine).
/// A call that returns one of these has not touched the quiz state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    #[error("cannot {operation} while {phase:?}")]
    IllegalState {
        operation: &'static str,
        phase: Phase,
    },
    #[error("answer {index} does not exist, the question has {answers} answers")]
    InvalidIndex { index: usize, answers: usize },
    #[error("no question at index {index} (quiz has {total} questions)")]
    OutOfRange { index: usize, total: usize },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("malformed deck JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cannot read or write deck file: {0}")]
    Io(#[from] io::Error),
    #[error("no decks!")]
    NoDecks,
    #[error("deck {0:?} not found")]
    DeckNotFound(String),
    #[error("deck has {} defect(s)", .0.len())]
    InvalidDeck(Vec<Defect>),
}
