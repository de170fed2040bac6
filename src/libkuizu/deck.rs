use crate::libkuizu::engine::QuizEngine;
use crate::libkuizu::error::Error;
use crate::libkuizu::shitsumon::{Answer, Defect, Question};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A named, ordered list of questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub name: String,
    pub questions: Vec<Question>,
}

macro_rules! question {
    ($prompt:expr, [$($text:expr => $correct:expr),+ $(,)?]) => {
        Question::new($prompt, vec![$(Answer::new($text, $correct)),+])
    };
}

impl Deck {
    pub fn new(name: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            name: name.into(),
            questions,
        }
    }

    /// The deck played when no other source is given.
    pub fn builtin() -> Self {
        Self::new(
            "Web basics",
            vec![
                question!("What does HTML stand for?", [
                    "Hyper Text Markup Language" => true,
                    "High Tech Markup Language" => false,
                    "Hyperlink and Text Markup Language" => false,
                    "Home Tool Markup Language" => false,
                ]),
                question!("Which CSS property is used to change the text color?", [
                    "font-color" => false,
                    "text-color" => false,
                    "color" => true,
                    "font-style" => false,
                ]),
                question!("What is the correct syntax for a JavaScript comment?", [
                    "<!-- This is a comment -->" => false,
                    "// This is a comment" => true,
                    "/* This is a comment" => false,
                    "# This is a comment" => false,
                ]),
                question!("Which of these is NOT a JavaScript data type?", [
                    "String" => false,
                    "Boolean" => false,
                    "Number" => false,
                    "Float" => true,
                ]),
            ],
        )
    }

    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let deck: Deck = serde_json::from_str(json)?;
        debug!(
            "[Deck] Parsed deck {:?} ({} questions).",
            deck.name,
            deck.questions.len()
        );
        Ok(deck)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, Error> {
        info!("[Deck] Reading deck from {:?}", path);
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String, Error> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_json_file(&self, path: &Path) -> Result<(), Error> {
        info!("[Deck] Writing deck {:?} to {:?}", self.name, path);
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }

    pub fn validate(&self) -> Vec<Defect> {
        self.questions
            .iter()
            .enumerate()
            .flat_map(|(idx, question)| question.defects(idx + 1))
            .collect()
    }

    /// Like [`Deck::validate`], but any defect is an error.
    pub fn validate_strict(&self) -> Result<(), Error> {
        let defects = self.validate();
        if defects.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidDeck(defects))
        }
    }
}

impl From<Deck> for QuizEngine {
    fn from(deck: Deck) -> Self {
        QuizEngine::new(deck.questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_deck_is_well_formed() {
        let deck = Deck::builtin();
        assert_eq!(deck.questions.len(), 4);
        assert!(deck.validate().is_empty());

        let correct: Vec<_> = deck
            .questions
            .iter()
            .map(|q| q.correct_index())
            .collect();
        assert_eq!(correct, vec![Some(0), Some(2), Some(1), Some(3)]);
    }

    #[test]
    fn test_json_deck_keeps_authored_order() {
        let deck = Deck::from_json_str(
            r#"{
                "name": "Colours",
                "questions": [
                    { "question": "Sky?", "answers": [
                        { "text": "green" },
                        { "text": "blue", "correct": true },
                        { "text": "red" }
                    ] },
                    { "question": "Grass?", "answers": [
                        { "text": "green", "correct": true },
                        { "text": "blue" }
                    ] }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(deck.name, "Colours");
        assert_eq!(deck.questions[0].prompt(), "Sky?");
        assert_eq!(
            deck.questions[0].answer_texts(),
            vec!["green", "blue", "red"]
        );
        assert_eq!(deck.questions[0].correct_index(), Some(1));
        assert_eq!(deck.questions[1].correct_index(), Some(0));
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        let err = Deck::from_json_str(r#"{ "name": "broken", "questions": 3 }"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_json_written_by_deck_reads_back() {
        let deck = Deck::builtin();
        let json = deck.to_json_string().unwrap();
        assert!(json.contains("\"question\": \"What does HTML stand for?\""));
        assert_eq!(Deck::from_json_str(&json).unwrap(), deck);
    }

    #[test]
    fn test_strict_validation_rejects_defects() {
        let deck = Deck::new(
            "bad",
            vec![question!("Nothing is right", ["a" => false, "b" => false])],
        );
        assert_eq!(deck.validate(), vec![Defect::NoCorrectAnswer { question: 1 }]);
        assert!(matches!(
            deck.validate_strict(),
            Err(Error::InvalidDeck(defects)) if defects.len() == 1
        ));
        assert!(Deck::builtin().validate_strict().is_ok());
    }
}
