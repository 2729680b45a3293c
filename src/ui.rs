pub mod screen;

use itertools::{EitherOrBoth, Itertools};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use typerator::metrics::{fallback_badge, format_time};
use unicode_width::UnicodeWidthStr;

use crate::App;

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 2;

/// How a single passage position is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CharState {
    Correct,
    Incorrect,
    Cursor,
    Pending,
}

/// Pair every passage character with its display state. Characters typed
/// past the end of the passage come last, all incorrect.
pub fn char_states(passage: &[char], typed: &[char]) -> Vec<(char, CharState)> {
    passage
        .iter()
        .zip_longest(typed)
        .enumerate()
        .map(|(idx, pair)| match pair {
            EitherOrBoth::Both(&expected, &actual) if expected == actual => {
                (expected, CharState::Correct)
            }
            EitherOrBoth::Both(&expected, _) => (expected, CharState::Incorrect),
            EitherOrBoth::Left(&expected) if idx == typed.len() => (expected, CharState::Cursor),
            EitherOrBoth::Left(&expected) => (expected, CharState::Pending),
            EitherOrBoth::Right(&extra) => (extra, CharState::Incorrect),
        })
        .collect()
}

pub struct TypingView<'a> {
    app: &'a App,
}

impl<'a> TypingView<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }
}

impl Widget for TypingView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let controller = &self.app.controller;

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let green_bold_style = Style::default().patch(bold_style).fg(Color::Green);
        let red_bold_style = Style::default().patch(bold_style).fg(Color::Red);
        let dim_bold_style = Style::default()
            .patch(bold_style)
            .add_modifier(Modifier::DIM);
        let underlined_dim_bold_style = Style::default()
            .patch(dim_bold_style)
            .add_modifier(Modifier::UNDERLINED);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let max_chars_per_line = area.width.saturating_sub(HORIZONTAL_MARGIN * 2).max(1);
        let prompt_width = controller.passage_text().width();
        let prompt_occupied_lines = if prompt_width <= max_chars_per_line as usize {
            1
        } else {
            (prompt_width as f64 / max_chars_per_line as f64).ceil() as u16 + 1
        };
        let padding = area.height.saturating_sub(prompt_occupied_lines + 4) / 2;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(padding),
                Constraint::Length(2), // timer
                Constraint::Length(prompt_occupied_lines),
                Constraint::Length(2), // hint
                Constraint::Min(0),
            ])
            .split(area);

        let timer = Paragraph::new(Span::styled(
            format!("{}s", controller.time_remaining()),
            Style::default().patch(bold_style).fg(Color::LightRed),
        ))
        .alignment(Alignment::Center);
        timer.render(chunks[1], buf);

        let spans = char_states(controller.passage(), controller.typed_input())
            .into_iter()
            .map(|(c, state)| match state {
                CharState::Correct => Span::styled(c.to_string(), green_bold_style),
                CharState::Incorrect => Span::styled(
                    match c {
                        ' ' => "·".to_owned(),
                        c => c.to_string(),
                    },
                    red_bold_style,
                ),
                CharState::Cursor => Span::styled(c.to_string(), underlined_dim_bold_style),
                CharState::Pending => Span::styled(c.to_string(), dim_bold_style),
            })
            .collect::<Vec<Span>>();

        let passage = Paragraph::new(Line::from(spans))
            .alignment(if prompt_occupied_lines == 1 {
                // when the prompt is small enough to fit on one line
                // centering the text gives a nice zen feeling
                Alignment::Center
            } else {
                Alignment::Left
            })
            .wrap(Wrap { trim: true });
        passage.render(chunks[2], buf);

        let hint = if controller.typed_input().is_empty() {
            "Start typing to begin the test... (esc) new passage"
        } else {
            "(esc) new passage / (ctrl+c) quit"
        };
        Paragraph::new(Span::styled(hint, italic_style))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);
    }
}

pub struct ResultsView<'a> {
    app: &'a App,
}

impl<'a> ResultsView<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }
}

impl Widget for ResultsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let controller = &self.app.controller;
        let Some(result) = controller.result() else {
            return;
        };
        let tier = result.tier();

        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(2), // tier
                Constraint::Length(1), // stats
                Constraint::Length(1), // timing
                Constraint::Length(2), // reward
                Constraint::Min(0),
                Constraint::Length(1), // legend
            ])
            .split(area);

        Paragraph::new(Span::styled(
            format!(
                "{}  {}",
                fallback_badge(result.wpm),
                tier.to_string().to_uppercase()
            ),
            Style::default().patch(bold_style).fg(Color::Magenta),
        ))
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

        Paragraph::new(Span::styled(
            format!(
                "{} wpm   {}% acc   {} chars   {} errors",
                result.wpm, result.accuracy, result.total_chars, result.error_count
            ),
            bold_style,
        ))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

        Paragraph::new(Span::styled(
            format!(
                "{} session   {} left",
                format_time(u64::from(controller.session_secs())),
                format_time(u64::from(controller.time_remaining()))
            ),
            Style::default().add_modifier(Modifier::DIM),
        ))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

        Paragraph::new(Span::styled(
            format!("reward: {}", tier.reward_asset()),
            Style::default().patch(italic_style).fg(Color::Gray),
        ))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);

        Paragraph::new(Span::styled(
            "(r)etry / (n)ew / (esc)ape to new / (q)uit",
            italic_style,
        ))
        .render(chunks[6], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RuntimeSettings;
    use typerator::corpus::FixedPassage;
    use typerator::score_store::NullScoreStore;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn create_test_app(prompt: &str, typed: &str) -> App {
        let mut app = App::new(
            RuntimeSettings {
                session_secs: 30,
                save_scores: false,
            },
            Box::new(FixedPassage(prompt.to_string())),
            Box::new(NullScoreStore),
        );
        for c in typed.chars() {
            app.type_char(c);
        }
        app
    }

    fn render_to_string(widget: impl Widget) -> String {
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        widget.render(area, &mut buffer);
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_char_states_nothing_typed() {
        let states = char_states(&chars("ab"), &[]);
        assert_eq!(states, vec![('a', CharState::Cursor), ('b', CharState::Pending)]);
    }

    #[test]
    fn test_char_states_mixed() {
        let states = char_states(&chars("cat"), &chars("cx"));
        assert_eq!(
            states,
            vec![
                ('c', CharState::Correct),
                ('a', CharState::Incorrect),
                ('t', CharState::Cursor),
            ]
        );
    }

    #[test]
    fn test_char_states_overlong_input() {
        let states = char_states(&chars("hi"), &chars("hi!?"));
        assert_eq!(
            states,
            vec![
                ('h', CharState::Correct),
                ('i', CharState::Correct),
                ('!', CharState::Incorrect),
                ('?', CharState::Incorrect),
            ]
        );
    }

    #[test]
    fn test_typing_view_before_start() {
        let app = create_test_app("hello world", "");
        let rendered = render_to_string(TypingView::new(&app));

        assert!(rendered.contains("30s"));
        assert!(rendered.contains("hello world"));
        assert!(rendered.contains("Start typing"));
    }

    #[test]
    fn test_typing_view_marks_wrong_space() {
        let app = create_test_app("hello world", "hellox");
        let rendered = render_to_string(TypingView::new(&app));

        assert!(rendered.contains("hello·world"));
        assert!(!rendered.contains("Start typing"));
    }

    #[test]
    fn test_typing_view_wraps_long_prompt() {
        let prompt = "the quick brown fox jumps over the lazy dog ".repeat(4);
        let app = create_test_app(prompt.trim_end(), "the");
        let rendered = render_to_string(TypingView::new(&app));

        assert!(rendered.contains("the quick brown fox"));
    }

    #[test]
    fn test_results_view() {
        let app = create_test_app("hi", "hi");
        let rendered = render_to_string(ResultsView::new(&app));

        assert!(rendered.contains("0 wpm"));
        assert!(rendered.contains("100% acc"));
        assert!(rendered.contains("2 chars"));
        assert!(rendered.contains("0 errors"));
        assert!(rendered.contains("BAD"));
        assert!(rendered.contains("bad.mp4"));
        assert!(rendered.contains("0:30 session"));
    }

    #[test]
    fn test_results_view_without_result_is_blank() {
        let app = create_test_app("hi", "h");
        let rendered = render_to_string(ResultsView::new(&app));

        assert!(rendered.trim().is_empty());
    }
}
