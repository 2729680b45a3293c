use ratatui::Frame;
use typerator::session::Phase;

use crate::{
    ui::{ResultsView, TypingView},
    App,
};

/// A UI Screen boundary: responsible for rendering one phase of a session
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Typing screen - passage, countdown and hint
pub struct TypingScreen;

impl Screen for TypingScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(TypingView::new(app), f.area());
    }
}

/// Results screen - score, tier and reward
pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(ResultsView::new(app), f.area());
    }
}

/// Helper to construct the appropriate screen for the current phase
pub fn current_screen(phase: Phase) -> Box<dyn Screen> {
    match phase {
        Phase::Idle | Phase::Running => Box::new(TypingScreen),
        Phase::Finished => Box::new(ResultsScreen),
    }
}
