use crate::Error;
use eframe::egui;
use eframe::egui::{Button, Color32, RichText, Ui};
use kuizu::{
    AnswerFeedback, Deck, FinalScore, Intent, QuestionView, QuizEngine, QuizSession,
    RenderSurface,
};
use log::{debug, warn};

const CORRECT: Color32 = Color32::from_rgb(0x9a, 0xee, 0xb5);
const INCORRECT: Color32 = Color32::from_rgb(0xff, 0x9f, 0x9f);

/// What the window is currently showing. Rebuilt only from engine signals.
#[derive(Debug, Default)]
enum Screen {
    #[default]
    Blank,
    Question {
        view: QuestionView,
        feedback: Option<AnswerFeedback>,
    },
    Score(FinalScore),
}

#[derive(Debug, Default)]
struct WindowSurface {
    screen: Screen,
}

impl RenderSurface for WindowSurface {
    fn show_question(&mut self, view: &QuestionView) {
        self.screen = Screen::Question {
            view: view.clone(),
            feedback: None,
        };
    }

    fn show_feedback(&mut self, feedback: &AnswerFeedback) {
        if let Screen::Question { feedback: shown, .. } = &mut self.screen {
            *shown = Some(*feedback);
        } else {
            warn!("[GUI] Feedback arrived without a question on screen.");
        }
    }

    fn show_final_score(&mut self, score: &FinalScore) {
        self.screen = Screen::Score(*score);
    }
}

struct GuiState {
    session: QuizSession<WindowSurface>,
    title: String,
}

impl GuiState {
    fn new(deck: Deck) -> Self {
        let title = deck.name.clone();
        let mut session = QuizSession::new(QuizEngine::from(deck), WindowSurface::default());
        session.start();

        Self { session, title }
    }
}

fn answer_fill(idx: usize, feedback: &AnswerFeedback) -> Option<Color32> {
    if feedback.correct_index == Some(idx) || (feedback.selected_index == idx && feedback.was_correct)
    {
        Some(CORRECT)
    } else if feedback.selected_index == idx {
        Some(INCORRECT)
    } else {
        None
    }
}

fn draw_question(
    ui: &mut Ui,
    view: &QuestionView,
    feedback: Option<&AnswerFeedback>,
) -> Option<Intent> {
    let mut intent = None;
    ui.label(
        RichText::new(format!("{}. {}", view.question_number, view.question_text)).size(24.0),
    );
    ui.add_space(12.0);

    let width = ui.available_width();
    for (idx, text) in view.answer_texts.iter().enumerate() {
        let mut button = Button::new(RichText::new(text).size(18.0)).min_size(egui::vec2(width, 36.0));
        if let Some(fill) = feedback.and_then(|f| answer_fill(idx, f)) {
            button = button.fill(fill);
        }
        if ui.add_enabled(feedback.is_none(), button).clicked() {
            intent = Some(Intent::SubmitAnswer(idx));
        }
    }

    if feedback.is_some() {
        ui.add_space(12.0);
        ui.vertical_centered(|ui| {
            if ui.button(RichText::new("Next").size(18.0)).clicked() {
                intent = Some(Intent::Advance);
            }
        });
    }
    intent
}

fn draw_score(ui: &mut Ui, score: &FinalScore) -> Option<Intent> {
    let mut intent = None;
    ui.vertical_centered(|ui| {
        ui.heading("Quiz finished!");
        ui.label(RichText::new(format!("You scored {}", score)).size(24.0));
        ui.add_space(12.0);
        if ui.button(RichText::new("Restart").size(18.0)).clicked() {
            intent = Some(Intent::Restart);
        }
    });
    intent
}

impl eframe::App for GuiState {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut intent = None;

        egui::TopBottomPanel::top("deck_title").show(ctx, |ui| {
            ui.heading(self.title.as_str());
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            intent = match &self.session.surface().screen {
                Screen::Blank => None,
                Screen::Question { view, feedback } => draw_question(ui, view, feedback.as_ref()),
                Screen::Score(score) => draw_score(ui, score),
            };
        });

        if let Some(intent) = intent {
            debug!("[GUI] {:?}", intent);
            if let Err(err) = self.session.handle(intent) {
                warn!("[GUI] {}", err);
            }
        }
    }
}

pub fn init_gui(deck: Deck) -> Result<(), Error> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([480.0, 420.0])
            .with_min_inner_size([320.0, 280.0]),
        ..Default::default()
    };
    eframe::run_native(
        "クイズ!",
        native_options,
        Box::new(|_cc| Ok(Box::new(GuiState::new(deck)))),
    )?;

    Ok(())
}
