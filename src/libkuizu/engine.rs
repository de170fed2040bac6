use crate::libkuizu::error::QuizError;
use crate::libkuizu::render::{AnswerFeedback, FinalScore, QuestionView, Signal};
use crate::libkuizu::shitsumon::Question;
use log::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    NotStarted,
    AwaitingAnswer,
    AnswerLocked,
    Finished,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct QuizState {
    current_index: usize,
    score: usize,
    phase: Phase,
    selected_answer_index: Option<usize>,
}

/// Sole authority over quiz progression.
///
/// Every operation either commits its whole transition or returns a
/// [`QuizError`] and leaves the state untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizEngine {
    questions: Vec<Question>,
    state: QuizState,
}

impl QuizEngine {
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions,
            state: QuizState::default(),
        }
    }

    /// Begins a fresh run at question 0. A quiz without questions finishes immediately.
    pub fn start(&mut self) -> Signal {
        self.state = QuizState::default();
        let total = self.questions.len();

        match self.questions.first() {
            Some(first) => {
                self.state.phase = Phase::AwaitingAnswer;
                debug!("[Engine] Started a run of {} questions.", total);
                Signal::QuestionChanged(QuestionView::new(first, 0, total))
            }
            None => {
                self.state.phase = Phase::Finished;
                warn!("[Engine] Started a quiz without questions, finishing immediately.");
                Signal::Finished(self.score_card())
            }
        }
    }

    /// Legal from any phase. Discards the run in progress.
    pub fn restart(&mut self) -> Signal {
        debug!(
            "[Engine] Restarting from {:?} (score {}/{}).",
            self.state.phase,
            self.state.score,
            self.questions.len()
        );
        self.start()
    }

    pub fn current_question(&self) -> Result<&Question, QuizError> {
        let out_of_range = QuizError::OutOfRange {
            index: self.state.current_index,
            total: self.questions.len(),
        };
        match self.state.phase {
            Phase::AwaitingAnswer | Phase::AnswerLocked => self
                .questions
                .get(self.state.current_index)
                .ok_or(out_of_range),
            Phase::NotStarted | Phase::Finished => Err(out_of_range),
        }
    }

    pub fn submit_answer(&mut self, answer_index: usize) -> Result<AnswerFeedback, QuizError> {
        self.expect_phase(Phase::AwaitingAnswer, "submit an answer")?;
        let question = self.current_question()?;
        let answer = match question.answers().get(answer_index) {
            Some(answer) => answer,
            None => {
                warn!(
                    "[Engine] Rejected answer {} for question {} ({} answers).",
                    answer_index,
                    self.state.current_index + 1,
                    question.answers().len()
                );
                return Err(QuizError::InvalidIndex {
                    index: answer_index,
                    answers: question.answers().len(),
                });
            }
        };
        let feedback = AnswerFeedback {
            selected_index: answer_index,
            was_correct: answer.is_correct(),
            correct_index: question.correct_index(),
        };

        if feedback.was_correct {
            self.state.score += 1;
        }
        self.state.selected_answer_index = Some(answer_index);
        self.state.phase = Phase::AnswerLocked;
        debug!(
            "[Engine] Question {}: picked {}, correct: {} (score {}).",
            self.state.current_index + 1,
            answer_index,
            feedback.was_correct,
            self.state.score
        );
        Ok(feedback)
    }

    pub fn advance(&mut self) -> Result<Signal, QuizError> {
        self.expect_phase(Phase::AnswerLocked, "advance")?;
        let next = self.state.current_index + 1;
        let total = self.questions.len();

        self.state.current_index = next;
        self.state.selected_answer_index = None;
        match self.questions.get(next) {
            Some(question) => {
                self.state.phase = Phase::AwaitingAnswer;
                debug!("[Engine] Advanced to question {}/{}.", next + 1, total);
                Ok(Signal::QuestionChanged(QuestionView::new(question, next, total)))
            }
            None => {
                self.state.phase = Phase::Finished;
                debug!("[Engine] Finished: {}.", self.score_card());
                Ok(Signal::Finished(self.score_card()))
            }
        }
    }

    /// Only readable once the run is over, so a running score is never shown as final.
    pub fn final_score(&self) -> Result<FinalScore, QuizError> {
        self.expect_phase(Phase::Finished, "read the final score")?;
        Ok(self.score_card())
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn score(&self) -> usize {
        self.state.score
    }

    pub fn current_index(&self) -> usize {
        self.state.current_index
    }

    pub fn selected_answer_index(&self) -> Option<usize> {
        self.state.selected_answer_index
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    fn score_card(&self) -> FinalScore {
        FinalScore {
            score: self.state.score,
            total_questions: self.questions.len(),
        }
    }

    fn expect_phase(&self, expected: Phase, operation: &'static str) -> Result<(), QuizError> {
        if self.state.phase == expected {
            Ok(())
        } else {
            warn!(
                "[Engine] Cannot {} while {:?}.",
                operation, self.state.phase
            );
            Err(QuizError::IllegalState {
                operation,
                phase: self.state.phase,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libkuizu::shitsumon::Answer;

    fn question(prompt: &str, correct: &[bool]) -> Question {
        Question::new(
            prompt,
            correct
                .iter()
                .enumerate()
                .map(|(i, c)| Answer::new(format!("{prompt} #{i}"), *c))
                .collect(),
        )
    }

    fn two_questions() -> QuizEngine {
        QuizEngine::new(vec![
            question("one", &[true, false, false]),
            question("two", &[false, false, true]),
        ])
    }

    #[test]
    fn test_new_engine_is_not_started() {
        let engine = two_questions();
        assert_eq!(engine.phase(), Phase::NotStarted);
        assert_eq!(
            engine.current_question(),
            Err(QuizError::OutOfRange { index: 0, total: 2 })
        );
    }

    #[test]
    fn test_start_emits_first_question() {
        let mut engine = two_questions();
        let signal = engine.start();

        assert_eq!(
            signal,
            Signal::QuestionChanged(QuestionView {
                question_number: 1,
                total_questions: 2,
                question_text: "one".to_string(),
                answer_texts: vec![
                    "one #0".to_string(),
                    "one #1".to_string(),
                    "one #2".to_string()
                ],
            })
        );
        assert_eq!(engine.phase(), Phase::AwaitingAnswer);
        assert_eq!(engine.current_question().unwrap().prompt(), "one");
    }

    #[test]
    fn test_submit_locks_round_and_scores() {
        let mut engine = two_questions();
        engine.start();

        let feedback = engine.submit_answer(0).unwrap();
        assert_eq!(
            feedback,
            AnswerFeedback {
                selected_index: 0,
                was_correct: true,
                correct_index: Some(0),
            }
        );
        assert_eq!(engine.phase(), Phase::AnswerLocked);
        assert_eq!(engine.score(), 1);
        assert_eq!(engine.selected_answer_index(), Some(0));
        // the question stays readable while feedback is shown
        assert_eq!(engine.current_question().unwrap().prompt(), "one");
    }

    #[test]
    fn test_wrong_answer_reports_correct_index() {
        let mut engine = two_questions();
        engine.start();
        engine.submit_answer(0).unwrap();
        engine.advance().unwrap();

        let feedback = engine.submit_answer(1).unwrap();
        assert!(!feedback.was_correct);
        assert_eq!(feedback.correct_index, Some(2));
        assert_eq!(engine.score(), 1);
    }

    #[test]
    fn test_advance_clears_selection() {
        let mut engine = two_questions();
        engine.start();
        engine.submit_answer(2).unwrap();
        engine.advance().unwrap();

        assert_eq!(engine.selected_answer_index(), None);
        assert_eq!(engine.current_index(), 1);
        assert_eq!(engine.phase(), Phase::AwaitingAnswer);
    }

    #[test]
    fn test_last_advance_finishes() {
        let mut engine = two_questions();
        engine.start();
        engine.submit_answer(0).unwrap();
        engine.advance().unwrap();
        engine.submit_answer(2).unwrap();

        let signal = engine.advance().unwrap();
        let expected = FinalScore {
            score: 2,
            total_questions: 2,
        };
        assert_eq!(signal, Signal::Finished(expected));
        assert_eq!(engine.phase(), Phase::Finished);
        assert_eq!(engine.current_index(), 2);
        assert_eq!(engine.final_score(), Ok(expected));
        assert_eq!(
            engine.current_question(),
            Err(QuizError::OutOfRange { index: 2, total: 2 })
        );
    }

    #[test]
    fn test_illegal_calls_leave_state_untouched() {
        let mut engine = two_questions();

        let before = engine.clone();
        assert!(matches!(
            engine.submit_answer(0),
            Err(QuizError::IllegalState {
                phase: Phase::NotStarted,
                ..
            })
        ));
        assert!(engine.advance().is_err());
        assert!(engine.final_score().is_err());
        assert_eq!(engine, before);

        engine.start();
        let before = engine.clone();
        assert!(matches!(
            engine.advance(),
            Err(QuizError::IllegalState {
                phase: Phase::AwaitingAnswer,
                ..
            })
        ));
        assert_eq!(
            engine.submit_answer(3),
            Err(QuizError::InvalidIndex {
                index: 3,
                answers: 3
            })
        );
        assert_eq!(engine, before);

        engine.submit_answer(0).unwrap();
        let before = engine.clone();
        assert!(matches!(
            engine.submit_answer(1),
            Err(QuizError::IllegalState {
                phase: Phase::AnswerLocked,
                ..
            })
        ));
        assert!(engine.final_score().is_err());
        assert_eq!(engine, before);
    }

    #[test]
    fn test_several_correct_answers_all_score() {
        let mut engine = QuizEngine::new(vec![question("multi", &[false, true, true])]);
        engine.start();

        let feedback = engine.submit_answer(2).unwrap();
        assert!(feedback.was_correct);
        assert_eq!(feedback.correct_index, Some(1));
        assert_eq!(engine.score(), 1);
    }

    #[test]
    fn test_empty_quiz_finishes_on_start() {
        let mut engine = QuizEngine::new(Vec::new());
        let signal = engine.start();

        let expected = FinalScore {
            score: 0,
            total_questions: 0,
        };
        assert_eq!(signal, Signal::Finished(expected));
        assert_eq!(engine.phase(), Phase::Finished);
        assert_eq!(engine.final_score(), Ok(expected));
        assert!(engine.current_question().is_err());
    }

    #[test]
    fn test_restart_mid_round_discards_progress() {
        let mut engine = two_questions();
        engine.start();
        engine.submit_answer(0).unwrap();

        let signal = engine.restart();
        assert!(matches!(signal, Signal::QuestionChanged(ref v) if v.question_number == 1));
        assert_eq!(engine.score(), 0);
        assert_eq!(engine.current_index(), 0);
        assert_eq!(engine.selected_answer_index(), None);
        assert_eq!(engine.phase(), Phase::AwaitingAnswer);
    }
}
