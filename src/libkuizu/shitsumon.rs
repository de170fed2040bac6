use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    text: String,
    #[serde(default)]
    correct: bool,
}

impl Answer {
    pub fn new(text: impl Into<String>, correct: bool) -> Self {
        Self {
            text: text.into(),
            correct,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_correct(&self) -> bool {
        self.correct
    }
}

/// A prompt and its answers, in the order they were authored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "question")]
    prompt: String,
    answers: Vec<Answer>,
}

/// Authoring defects a deck can carry. None of them stop a quiz from running.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Defect {
    #[error("question {question}: prompt is empty")]
    EmptyPrompt { question: usize },
    #[error("question {question}: only {count} answer(s), at least 2 expected")]
    TooFewAnswers { question: usize, count: usize },
    #[error("question {question}: no answer is marked correct")]
    NoCorrectAnswer { question: usize },
    #[error("question {question}: {count} answers are marked correct")]
    SeveralCorrectAnswers { question: usize, count: usize },
}

impl Question {
    pub fn new(prompt: impl Into<String>, answers: Vec<Answer>) -> Self {
        Self {
            prompt: prompt.into(),
            answers,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    pub fn answer_texts(&self) -> Vec<String> {
        self.answers.iter().map(|a| a.text.clone()).collect()
    }

    /// Index of the first answer flagged correct, if any.
    pub fn correct_index(&self) -> Option<usize> {
        self.answers.iter().position(Answer::is_correct)
    }

    /// Checks the authoring conventions. `number` is the 1-based position used in the report.
    pub fn defects(&self, number: usize) -> Vec<Defect> {
        let mut found = Vec::new();
        if self.prompt.trim().is_empty() {
            found.push(Defect::EmptyPrompt { question: number });
        }
        if self.answers.len() < 2 {
            found.push(Defect::TooFewAnswers {
                question: number,
                count: self.answers.len(),
            });
        }
        match self.answers.iter().filter(|a| a.correct).count() {
            0 => found.push(Defect::NoCorrectAnswer { question: number }),
            1 => {}
            count => found.push(Defect::SeveralCorrectAnswers {
                question: number,
                count,
            }),
        }
        found
    }
}
