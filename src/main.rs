pub mod ui;

use clap::{error::ErrorKind, ArgAction, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    time::Duration,
};
use typerator::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    controller::Controller,
    corpus::{Corpus, FixedPassage, PassageProvider, RandomPassages},
    logging::init_logging,
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    score_store::{FileScoreStore, NullScoreStore, SavedScore, ScoreStore},
    session::Phase,
};

const TICK_RATE_MS: u64 = 100;

/// minimalist typing speed test
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A minimalist typing speed test. Type the passage before the clock runs out and get your wpm, accuracy and a performance tier."
)]
pub struct Cli {
    /// number of seconds to run test
    #[clap(short = 's', long, value_parser = clap::value_parser!(u32).range(1..))]
    seconds: Option<u32>,

    /// custom passage to use instead of a random quote
    #[clap(short = 'p', long)]
    prompt: Option<String>,

    /// do not save the score of finished tests
    #[clap(long)]
    no_save: bool,

    /// print the last saved score and exit
    #[clap(long)]
    last: bool,

    /// write the effective settings to the config file
    #[clap(long)]
    save_config: bool,

    /// more log output (-v, -vv, -vvv)
    #[clap(short = 'v', long, action = ArgAction::Count)]
    verbose: u8,
}

/// Settings in effect for this run: config file values overridden by flags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuntimeSettings {
    pub session_secs: u32,
    pub save_scores: bool,
}

impl RuntimeSettings {
    pub fn resolve(cli: &Cli, config: &Config) -> Self {
        Self {
            session_secs: cli.seconds.unwrap_or(config.session_secs).max(1),
            save_scores: config.save_scores && !cli.no_save,
        }
    }
}

impl From<&RuntimeSettings> for Config {
    fn from(rs: &RuntimeSettings) -> Self {
        Self {
            session_secs: rs.session_secs,
            save_scores: rs.save_scores,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    pub controller: Controller<Box<dyn ScoreStore>>,
    /// The text field: what the user has typed so far.
    pub input: String,
    passages: Box<dyn PassageProvider>,
}

impl App {
    pub fn new(
        settings: RuntimeSettings,
        mut passages: Box<dyn PassageProvider>,
        store: Box<dyn ScoreStore>,
    ) -> Self {
        let passage = passages.select_passage();

        Self {
            controller: Controller::new(passage, settings.session_secs, store),
            input: String::new(),
            passages,
        }
    }

    pub fn type_char(&mut self, c: char) {
        if self.controller.has_finished() {
            return;
        }
        self.input.push(c);
        self.controller.on_input_change(&self.input);
    }

    pub fn backspace(&mut self) {
        if self.controller.has_finished() {
            return;
        }
        if self.input.pop().is_some() {
            self.controller.on_input_change(&self.input);
        }
    }

    /// Ctrl+W: drop the last word and any spaces after it.
    pub fn delete_word(&mut self) {
        if self.controller.has_finished() || self.input.is_empty() {
            return;
        }
        let trimmed = self.input.trim_end_matches(' ');
        let keep = trimmed.rfind(' ').map_or(0, |i| i + 1);
        self.input.truncate(keep);
        self.controller.on_input_change(&self.input);
    }

    /// Same passage, fresh session.
    pub fn retry(&mut self) {
        self.input.clear();
        self.controller.reset();
    }

    /// New passage, fresh session.
    pub fn new_passage(&mut self) {
        self.input.clear();
        let passage = self.passages.select_passage();
        self.controller.restart(passage);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Flow {
        if key.kind == KeyEventKind::Release {
            return Flow::Continue;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => return Flow::Quit,
                KeyCode::Char('w') => self.delete_word(),
                _ => {}
            }
            return Flow::Continue;
        }

        match (self.controller.phase(), key.code) {
            (_, KeyCode::Esc) => self.new_passage(),
            (Phase::Finished, KeyCode::Char('q')) => return Flow::Quit,
            (Phase::Finished, KeyCode::Char('r')) => self.retry(),
            (Phase::Finished, KeyCode::Char('n') | KeyCode::Enter) => self.new_passage(),
            (Phase::Finished, _) => {}
            (_, KeyCode::Char(c)) => self.type_char(c),
            (_, KeyCode::Backspace) => self.backspace(),
            _ => {}
        }

        Flow::Continue
    }
}

fn describe_last_score(saved: Option<&SavedScore>) -> String {
    match saved {
        None => String::from("no saved score yet"),
        Some(saved) => {
            let result = &saved.result;
            format!(
                "{} wpm   {}% acc   {} chars   {} errors   [{}]   {}",
                result.wpm,
                result.accuracy,
                result.total_chars,
                result.error_count,
                result.tier(),
                saved.saved_at.format("%c"),
            )
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if let Some(log_path) = AppDirs::log_path() {
        // logging is best effort; the test itself does not depend on it
        if let Err(e) = init_logging(cli.verbose, &log_path) {
            eprintln!("typerator: logging disabled ({}): {e}", log_path.display());
        }
    }

    let config_store = FileConfigStore::new();
    let settings = RuntimeSettings::resolve(&cli, &config_store.load());

    if cli.save_config {
        config_store.save(&Config::from(&settings))?;
        tracing::info!("saved settings to {}", config_store.path().display());
    }

    if cli.last {
        let saved = FileScoreStore::new().load_last()?;
        println!("{}", describe_last_score(saved.as_ref()));
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    let passages: Box<dyn PassageProvider> = match &cli.prompt {
        Some(prompt) if prompt.is_empty() => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, "prompt must not be empty")
                .exit();
        }
        Some(prompt) => Box::new(FixedPassage(prompt.clone())),
        None => Box::new(RandomPassages::new(Corpus::builtin()?)),
    };

    let store: Box<dyn ScoreStore> = if settings.save_scores {
        Box::new(FileScoreStore::new())
    } else {
        Box::new(NullScoreStore)
    };

    let mut app = App::new(settings, passages, store);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let outcome = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    outcome
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        FixedTicker::new(Duration::from_millis(TICK_RATE_MS)),
    );

    loop {
        terminal.draw(|f| ui(app, f))?;

        let event = runner.step(app.controller.time_until_next_tick());

        // countdown runs off the session's own schedule, whatever woke us up
        app.controller.poll_ticks();

        if let AppEvent::Key(key) = event {
            if app.handle_key(key) == Flow::Quit {
                break;
            }
        }
    }

    Ok(())
}

fn ui(app: &App, f: &mut Frame) {
    ui::screen::current_screen(app.controller.phase()).render(app, f);
}
