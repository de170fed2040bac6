//! クイズ (Kuizu): the quiz progression engine, deck loading and the
//! render-surface contract shared by the terminal and window front ends.

pub mod libkuizu;

pub use libkuizu::deck::Deck;
pub use libkuizu::engine::{Phase, QuizEngine};
pub use libkuizu::error::{Error, QuizError};
pub use libkuizu::render::{
    AnswerFeedback, FinalScore, Intent, QuestionView, QuizSession, RenderSurface, Signal,
};
pub use libkuizu::shitsumon::{Answer, Defect, Question};
