use colored::Colorize;
use kuizu::{
    AnswerFeedback, Deck, FinalScore, Intent, Phase, QuestionView, QuizEngine, QuizError,
    QuizSession, RenderSurface,
};
use log::{debug, warn};
use std::io::{self, BufRead, Write};

#[derive(Debug, PartialEq)]
enum Choice {
    Option(usize),
    Quit,
    Invalid,
}

impl Choice {
    fn from_str(input: &str) -> Choice {
        match input.trim() {
            "q" => Choice::Quit,
            input => match input.parse::<usize>() {
                Ok(num) if num >= 1 => Choice::Option(num - 1),
                _ => Choice::Invalid,
            },
        }
    }
}

/// Prints rounds to stdout. Keeps the question on screen so feedback can name the right answer.
#[derive(Debug, Default)]
struct TerminalSurface {
    current: Option<QuestionView>,
}

impl TerminalSurface {
    fn correct_text(&self, feedback: &AnswerFeedback) -> Option<(usize, &str)> {
        let idx = feedback.correct_index?;
        let view = self.current.as_ref()?;
        view.answer_texts.get(idx).map(|text| (idx, text.as_str()))
    }
}

impl RenderSurface for TerminalSurface {
    fn show_question(&mut self, view: &QuestionView) {
        let leading = format!("{}/{}. ", view.question_number, view.total_questions);
        println!(
            "{}{}",
            leading.cyan(),
            view.question_text.as_str().black().bold().on_white()
        );

        let indent = " ".repeat(leading.len());
        for (i, text) in view.answer_texts.iter().enumerate() {
            println!("{}{}. {}", indent, format!("{}", i + 1).bold(), text);
        }
        self.current = Some(view.clone());
    }

    fn show_feedback(&mut self, feedback: &AnswerFeedback) {
        if feedback.was_correct {
            println!("{}", "Correct!".bright_green());
            return;
        }

        println!("{}", "Incorrect!".bright_red());
        match self.correct_text(feedback) {
            Some((idx, text)) => println!(
                "{}",
                format!("The correct choice was {}. {}", idx + 1, text).green()
            ),
            None => println!("{}", "None of the choices was marked correct.".yellow()),
        }
    }

    fn show_final_score(&mut self, score: &FinalScore) {
        self.current = None;
        println!("{}", format!("==========> {} <==========", score).cyan());
    }
}

/// One line without its terminator, or `None` once input is exhausted.
fn read_line<R: BufRead>(input: &mut R) -> Option<String> {
    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) => {
            debug!("[CLI] Input closed.");
            None
        }
        Ok(_) => Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()),
        Err(err) => {
            warn!("[CLI] Cannot read input: {}", err);
            None
        }
    }
}

fn prompt<R: BufRead>(input: &mut R, message: &str) -> Option<String> {
    print!("{} ", message.cyan());
    if let Err(err) = io::stdout().flush() {
        warn!("[CLI] Cannot flush stdout: {}", err);
    }
    read_line(input)
}

pub fn cli_loop(deck: Deck) {
    play(deck, &mut io::stdin().lock());
}

/// Runs the quiz until the player quits or `input` runs dry.
fn play<R: BufRead>(deck: Deck, input: &mut R) -> QuizEngine {
    println!(
        "{}",
        format!(
            "==========> {} ({} questions) <==========",
            deck.name,
            deck.questions.len()
        )
        .cyan()
    );

    let mut session = QuizSession::new(QuizEngine::from(deck), TerminalSurface::default());
    session.start();

    loop {
        let intent = match session.engine().phase() {
            Phase::NotStarted => Intent::Start,
            Phase::AwaitingAnswer => {
                let answers = session
                    .engine()
                    .current_question()
                    .map(|q| q.answers().len())
                    .unwrap_or_default();
                let message = format!("Answer (1-{}, q to quit prematurely):", answers);
                let Some(line) = prompt(input, &message) else {
                    break;
                };
                let choice = Choice::from_str(&line);
                debug!("choice: {:?}", choice);
                match choice {
                    Choice::Option(idx) => Intent::SubmitAnswer(idx),
                    Choice::Quit => {
                        println!("{}", "Quitting Early!".cyan());
                        break;
                    }
                    Choice::Invalid => {
                        println!("{}", "Type the number of an answer.".bright_red());
                        continue;
                    }
                }
            }
            Phase::AnswerLocked => {
                if prompt(input, "Press Enter to continue...").is_none() {
                    break;
                }
                Intent::Advance
            }
            Phase::Finished => match prompt(input, "r to restart, anything else to quit:") {
                Some(line) if line.trim() == "r" => Intent::Restart,
                _ => break,
            },
        };

        match session.handle(intent) {
            Ok(()) => {}
            Err(QuizError::InvalidIndex { answers, .. }) => println!(
                "{}",
                format!("There are only {} options available!", answers).bright_red()
            ),
            Err(err) => warn!("[CLI] {}", err),
        }
    }

    session.into_parts().0
}
