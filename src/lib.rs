//! # rust-millionaire
//!
//! A "Who Wants to Be a Millionaire?" style trivia game for the terminal.
//!
//! Questions come from an Open Trivia DB compatible API through
//! [`trivia::QuestionProvider`], which caches sets on disk, throttles
//! requests and falls back to a bundled pool whenever the network cannot
//! deliver.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use rust_millionaire::{Millionaire, MillionaireError};
//! use rust_millionaire::data::FallbackPool;
//! use rust_millionaire::trivia::{
//!     FileStore, HttpTriviaSource, QuestionCache, QuestionProvider, SystemClock,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), MillionaireError> {
//!     let pool = Arc::new(FallbackPool::builtin()?);
//!     let cache = QuestionCache::new(
//!         Box::new(FileStore::open("millionaire_store.json")),
//!         Arc::new(SystemClock),
//!     );
//!     let source = HttpTriviaSource::new(
//!         rust_millionaire::trivia::DEFAULT_API_URL,
//!         Duration::from_secs(10),
//!     )?;
//!     let provider = QuestionProvider::new(
//!         cache,
//!         Box::new(source),
//!         Arc::clone(&pool),
//!         StdRng::from_os_rng(),
//!     );
//!
//!     Millionaire::new(provider, pool, StdRng::from_os_rng()).run().await
//! }
//! ```

mod app;
pub mod config;
pub mod data;
pub mod game;
pub mod models;
pub mod terminal;
pub mod trivia;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use rand::rngs::StdRng;
use thiserror::Error;
use tracing::info;

pub use app::App;
pub use config::{AppConfig, ConfigError, LoadedConfig};
pub use models::{AppState, Question};

use data::{FallbackPool, LoadError, PoolError};
use game::{GAME_LENGTH, Lifeline};
use trivia::{AcquireError, QuestionProvider};

const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Top-level error for running the game.
#[derive(Debug, Error)]
pub enum MillionaireError {
    #[error("failed to load questions: {0}")]
    Load(#[from] LoadError),
    #[error("invalid question pool: {0}")]
    Pool(#[from] PoolError),
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to set up the trivia source: {0}")]
    Acquire(#[from] AcquireError),
}

/// A game instance bound to a question provider.
pub struct Millionaire {
    app: App,
    provider: QuestionProvider,
}

impl Millionaire {
    pub fn new(provider: QuestionProvider, pool: Arc<FallbackPool>, rng: StdRng) -> Self {
        Self {
            app: App::new(pool, rng),
            provider,
        }
    }

    /// Take over the terminal and play until the player quits.
    pub async fn run(mut self) -> Result<(), MillionaireError> {
        let mut guard = terminal::TerminalGuard::new()?;
        run_event_loop(guard.terminal_mut(), &mut self.app, &mut self.provider).await
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}

async fn run_event_loop(
    terminal: &mut terminal::AppTerminal,
    app: &mut App,
    provider: &mut QuestionProvider,
) -> Result<(), MillionaireError> {
    loop {
        terminal.draw(|frame| ui::render(frame, app))?;

        if app.state == AppState::Loading {
            let acquisition = provider.acquire(GAME_LENGTH).await;
            info!(
                origin = acquisition.origin.label(),
                count = acquisition.questions.len(),
                "question set acquired"
            );
            app.begin(acquisition);
            continue;
        }

        if !event::poll(INPUT_POLL_INTERVAL)? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if handle_input(app, key.code) {
                break;
            }
        }
    }

    Ok(())
}

/// Returns true if the app should exit.
fn handle_input(app: &mut App, key: KeyCode) -> bool {
    match app.state {
        AppState::Welcome => handle_welcome_input(app, key),
        AppState::Loading => false,
        AppState::Playing => handle_playing_input(app, key),
        AppState::Finished => handle_finished_input(app, key),
    }
}

fn handle_welcome_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Enter => {
            app.start_game();
            false
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => true,
        _ => false,
    }
}

fn handle_playing_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_option(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_option(),
        KeyCode::Enter | KeyCode::Char(' ') => app.submit(),
        KeyCode::Esc => app.cancel(),
        KeyCode::Char('1') => app.use_lifeline(Lifeline::FiftyFifty),
        KeyCode::Char('2') => app.use_lifeline(Lifeline::AskTheAudience),
        KeyCode::Char('3') => app.use_lifeline(Lifeline::PhoneAFriend),
        KeyCode::Char('w') | KeyCode::Char('W') => app.walk_away(),
        KeyCode::Char('q') | KeyCode::Char('Q') => return true,
        _ => {}
    }
    false
}

fn handle_finished_input(app: &mut App, key: KeyCode) -> bool {
    match key {
        KeyCode::Char('r') | KeyCode::Char('R') => {
            app.restart();
            false
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => true,
        _ => false,
    }
}
