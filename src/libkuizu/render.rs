use crate::libkuizu::engine::QuizEngine;
use crate::libkuizu::error::QuizError;
use crate::libkuizu::shitsumon::Question;
use log::debug;
use std::fmt;

/// What a surface needs to draw one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    /// 1-based.
    pub question_number: usize,
    pub total_questions: usize,
    pub question_text: String,
    pub answer_texts: Vec<String>,
}

impl QuestionView {
    pub(crate) fn new(question: &Question, index: usize, total_questions: usize) -> Self {
        Self {
            question_number: index + 1,
            total_questions,
            question_text: question.prompt().to_string(),
            answer_texts: question.answer_texts(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub selected_index: usize,
    pub was_correct: bool,
    /// `None` when the question has no answer flagged correct.
    pub correct_index: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalScore {
    pub score: usize,
    pub total_questions: usize,
}

impl fmt::Display for FinalScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} out of {}", self.score, self.total_questions)
    }
}

/// Emitted by the engine after every successful transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    QuestionChanged(QuestionView),
    AnswerLocked(AnswerFeedback),
    Finished(FinalScore),
}

impl Signal {
    pub fn render_on<R: RenderSurface + ?Sized>(&self, surface: &mut R) {
        match self {
            Signal::QuestionChanged(view) => surface.show_question(view),
            Signal::AnswerLocked(feedback) => surface.show_feedback(feedback),
            Signal::Finished(score) => surface.show_final_score(score),
        }
    }
}

/// User intent forwarded from a surface back into the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Start,
    SubmitAnswer(usize),
    Advance,
    Restart,
}

pub trait RenderSurface {
    fn show_question(&mut self, view: &QuestionView);
    fn show_feedback(&mut self, feedback: &AnswerFeedback);
    fn show_final_score(&mut self, score: &FinalScore);
}

/// Records every signal it is asked to show. Handy for headless runs.
impl RenderSurface for Vec<Signal> {
    fn show_question(&mut self, view: &QuestionView) {
        self.push(Signal::QuestionChanged(view.clone()));
    }

    fn show_feedback(&mut self, feedback: &AnswerFeedback) {
        self.push(Signal::AnswerLocked(*feedback));
    }

    fn show_final_score(&mut self, score: &FinalScore) {
        self.push(Signal::Finished(*score));
    }
}

/// Couples one engine to one surface. Intents go to the engine, and the
/// resulting signal goes to the surface. Rejected intents render nothing.
pub struct QuizSession<R: RenderSurface> {
    engine: QuizEngine,
    surface: R,
}

impl<R: RenderSurface> QuizSession<R> {
    pub fn new(engine: QuizEngine, surface: R) -> Self {
        Self { engine, surface }
    }

    pub fn start(&mut self) {
        let signal = self.engine.start();
        self.render(&signal);
    }

    pub fn restart(&mut self) {
        let signal = self.engine.restart();
        self.render(&signal);
    }

    pub fn submit_answer(&mut self, answer_index: usize) -> Result<(), QuizError> {
        let feedback = self.engine.submit_answer(answer_index)?;
        self.render(&Signal::AnswerLocked(feedback));
        Ok(())
    }

    pub fn advance(&mut self) -> Result<(), QuizError> {
        let signal = self.engine.advance()?;
        self.render(&signal);
        Ok(())
    }

    pub fn handle(&mut self, intent: Intent) -> Result<(), QuizError> {
        debug!("[Session] Intent: {:?}", intent);
        match intent {
            Intent::Start => {
                self.start();
                Ok(())
            }
            Intent::SubmitAnswer(index) => self.submit_answer(index),
            Intent::Advance => self.advance(),
            Intent::Restart => {
                self.restart();
                Ok(())
            }
        }
    }

    pub fn engine(&self) -> &QuizEngine {
        &self.engine
    }

    pub fn surface(&self) -> &R {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut R {
        &mut self.surface
    }

    pub fn into_parts(self) -> (QuizEngine, R) {
        (self.engine, self.surface)
    }

    fn render(&mut self, signal: &Signal) {
        signal.render_on(&mut self.surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libkuizu::engine::Phase;
    use crate::libkuizu::shitsumon::Answer;

    fn session() -> QuizSession<Vec<Signal>> {
        let questions = vec![
            Question::new(
                "First?",
                vec![Answer::new("yes", true), Answer::new("no", false)],
            ),
            Question::new(
                "Second?",
                vec![Answer::new("yes", false), Answer::new("no", true)],
            ),
        ];
        QuizSession::new(QuizEngine::new(questions), Vec::new())
    }

    #[test]
    fn test_session_routes_each_signal_to_surface() {
        let mut session = session();
        session.handle(Intent::Start).unwrap();
        session.handle(Intent::SubmitAnswer(1)).unwrap();
        session.handle(Intent::Advance).unwrap();
        session.handle(Intent::SubmitAnswer(1)).unwrap();
        session.handle(Intent::Advance).unwrap();

        assert_eq!(
            session.surface(),
            &vec![
                Signal::QuestionChanged(QuestionView {
                    question_number: 1,
                    total_questions: 2,
                    question_text: "First?".to_string(),
                    answer_texts: vec!["yes".to_string(), "no".to_string()],
                }),
                Signal::AnswerLocked(AnswerFeedback {
                    selected_index: 1,
                    was_correct: false,
                    correct_index: Some(0),
                }),
                Signal::QuestionChanged(QuestionView {
                    question_number: 2,
                    total_questions: 2,
                    question_text: "Second?".to_string(),
                    answer_texts: vec!["yes".to_string(), "no".to_string()],
                }),
                Signal::AnswerLocked(AnswerFeedback {
                    selected_index: 1,
                    was_correct: true,
                    correct_index: Some(1),
                }),
                Signal::Finished(FinalScore {
                    score: 1,
                    total_questions: 2,
                }),
            ]
        );
    }

    #[test]
    fn test_rejected_intent_renders_nothing() {
        let mut session = session();
        session.start();
        session.surface_mut().clear();

        let err = session.handle(Intent::Advance).unwrap_err();
        assert!(matches!(err, QuizError::IllegalState { .. }));
        let err = session.handle(Intent::SubmitAnswer(5)).unwrap_err();
        assert_eq!(
            err,
            QuizError::InvalidIndex {
                index: 5,
                answers: 2
            }
        );

        assert!(session.surface().is_empty());
        assert_eq!(session.engine().phase(), Phase::AwaitingAnswer);
    }

    #[test]
    fn test_final_score_display() {
        let score = FinalScore {
            score: 3,
            total_questions: 4,
        };
        assert_eq!(score.to_string(), "3 out of 4");
    }
}
