use std::sync::Arc;

use rand::rngs::StdRng;
use tracing::{error, info, warn};

use crate::data::FallbackPool;
use crate::game::{GAME_LENGTH, GameSession, Lifeline, Turn, format_prize, prize_at};
use crate::models::{Acquisition, AppState, QuestionOrigin};

const NUM_OPTIONS: usize = 4;
pub const OPTION_LABELS: [char; NUM_OPTIONS] = ['A', 'B', 'C', 'D'];

pub struct App {
    pub state: AppState,
    pool: Arc<FallbackPool>,
    session: Option<GameSession>,
    origin: Option<QuestionOrigin>,
    selected_option: usize,
    notice: Option<String>,
    rng: StdRng,
}

impl App {
    pub fn new(pool: Arc<FallbackPool>, rng: StdRng) -> Self {
        Self {
            state: AppState::Welcome,
            pool,
            session: None,
            origin: None,
            selected_option: 0,
            notice: None,
            rng,
        }
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn origin(&self) -> Option<QuestionOrigin> {
        self.origin
    }

    pub fn selected_option(&self) -> usize {
        self.selected_option
    }

    /// One-line message for the player, e.g. a lifeline result.
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn start_game(&mut self) {
        self.notice = None;
        self.state = AppState::Loading;
    }

    /// Start playing an acquired set. Anything but a full set is replaced by a
    /// fresh fallback sample.
    pub fn begin(&mut self, acquisition: Acquisition) {
        let Acquisition {
            mut questions,
            mut origin,
        } = acquisition;

        if questions.len() != GAME_LENGTH {
            warn!(count = questions.len(), "acquired set has the wrong size; resampling");
            match self.pool.sample(GAME_LENGTH, &mut self.rng) {
                Ok(sample) => {
                    questions = sample;
                    origin = QuestionOrigin::Fallback;
                }
                Err(err) => error!(error = %err, "fallback pool cannot serve a full game"),
            }
        }

        match GameSession::new(questions) {
            Ok(session) => {
                info!(origin = origin.label(), "game started");
                self.session = Some(session);
                self.origin = Some(origin);
                self.selected_option = 0;
                self.notice = None;
                self.state = AppState::Playing;
            }
            Err(err) => {
                error!(error = %err, "could not start a game");
                self.notice = Some(format!("Could not start a game: {}", err));
                self.state = AppState::Welcome;
            }
        }
    }

    pub fn select_next_option(&mut self) {
        self.move_selection(1);
    }

    pub fn select_previous_option(&mut self) {
        self.move_selection(NUM_OPTIONS - 1);
    }

    /// Enter: lock in, confirm, or move on depending on the turn.
    pub fn submit(&mut self) {
        let selected = self.selected_option;
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let mut advanced = false;
        let result = match session.turn() {
            Turn::Selecting => session.lock_in(selected).map(|()| None),
            Turn::Confirming { .. } => session.confirm().map(|correct| {
                correct.then(|| {
                    format!(
                        "Correct! You have {}.",
                        format_prize(prize_at(session.index()))
                    )
                })
            }),
            Turn::Revealed { .. } => session.advance().map(|()| {
                advanced = true;
                None
            }),
        };

        match result {
            Ok(notice) => self.notice = notice,
            Err(err) => self.notice = Some(err.to_string()),
        }

        if advanced {
            self.selected_option = 0;
        }
        self.finish_if_over();
    }

    /// Esc: take back a locked-in answer.
    pub fn cancel(&mut self) {
        if let Some(session) = self.session.as_mut() {
            if session.cancel().is_ok() {
                self.notice = None;
            }
        }
    }

    pub fn use_lifeline(&mut self, lifeline: Lifeline) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        let result = match lifeline {
            Lifeline::FiftyFifty => session
                .use_fifty_fifty(&mut self.rng)
                .map(|_| "50:50 removed two wrong answers.".to_string()),
            Lifeline::AskTheAudience => session
                .ask_the_audience(&mut self.rng)
                .map(|_| "The audience has voted.".to_string()),
            Lifeline::PhoneAFriend => session.phone_a_friend(&mut self.rng).map(|advice| {
                format!(
                    "Your friend says: \"I think it's {}, I'm {}% sure.\"",
                    OPTION_LABELS[advice.choice], advice.confidence
                )
            }),
        };

        self.notice = Some(match result {
            Ok(message) => message,
            Err(err) => err.to_string(),
        });
        self.snap_selection();
    }

    pub fn walk_away(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Err(err) = session.walk_away() {
            self.notice = Some(err.to_string());
        }
        self.finish_if_over();
    }

    pub fn restart(&mut self) {
        self.state = AppState::Welcome;
        self.session = None;
        self.origin = None;
        self.selected_option = 0;
        self.notice = None;
    }

    fn move_selection(&mut self, step: usize) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if session.turn() != Turn::Selecting {
            return;
        }

        let mut next = self.selected_option;
        for _ in 0..NUM_OPTIONS {
            next = (next + step) % NUM_OPTIONS;
            if !session.is_hidden(next) {
                self.selected_option = next;
                return;
            }
        }
    }

    /// Keep the cursor off options removed by 50:50.
    fn snap_selection(&mut self) {
        let hidden = self
            .session
            .as_ref()
            .is_some_and(|session| session.is_hidden(self.selected_option));
        if hidden {
            self.move_selection(1);
        }
    }

    fn finish_if_over(&mut self) {
        if let Some(session) = self.session.as_ref() {
            if let Some(outcome) = session.outcome() {
                info!(
                    winnings = outcome.winnings(),
                    completed = session.completed(),
                    "game finished"
                );
                self.state = AppState::Finished;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::game::Outcome;

    fn app() -> App {
        let pool = Arc::new(FallbackPool::builtin().unwrap());
        App::new(pool, StdRng::seed_from_u64(21))
    }

    fn playing_app() -> App {
        let mut app = app();
        let questions = app
            .pool
            .sample(GAME_LENGTH, &mut StdRng::seed_from_u64(9))
            .unwrap();
        app.start_game();
        app.begin(Acquisition::new(questions, QuestionOrigin::Live));
        app
    }

    fn select(app: &mut App, option: usize) {
        while app.selected_option() != option {
            app.select_next_option();
        }
    }

    #[test]
    fn test_begin_starts_playing() {
        let app = playing_app();
        assert_eq!(app.state, AppState::Playing);
        assert_eq!(app.origin(), Some(QuestionOrigin::Live));
        assert_eq!(app.session().unwrap().total_questions(), GAME_LENGTH);
    }

    #[test]
    fn test_begin_resamples_short_sets() {
        let mut app = app();
        app.start_game();
        assert_eq!(app.state, AppState::Loading);

        app.begin(Acquisition::new(Vec::new(), QuestionOrigin::Fallback));
        assert_eq!(app.state, AppState::Playing);
        assert_eq!(app.origin(), Some(QuestionOrigin::Fallback));
        assert_eq!(app.session().unwrap().total_questions(), GAME_LENGTH);
    }

    #[test]
    fn test_correct_answer_needs_confirmation() {
        let mut app = playing_app();
        let correct = app.session().unwrap().current_question().correct_answer;
        select(&mut app, correct);

        app.submit();
        assert_eq!(
            app.session().unwrap().turn(),
            Turn::Confirming { choice: correct }
        );

        app.submit();
        assert!(matches!(app.session().unwrap().turn(), Turn::Revealed { .. }));
        assert_eq!(app.notice(), Some("Correct! You have $100."));

        app.submit();
        assert_eq!(app.session().unwrap().question_number(), 2);
        assert_eq!(app.state, AppState::Playing);
    }

    #[test]
    fn test_wrong_answer_finishes() {
        let mut app = playing_app();
        let correct = app.session().unwrap().current_question().correct_answer;
        select(&mut app, (correct + 1) % 4);

        app.submit();
        app.submit();
        assert_eq!(app.state, AppState::Finished);
        assert!(matches!(
            app.session().unwrap().outcome(),
            Some(Outcome::Wrong { completed: 0, .. })
        ));
    }

    #[test]
    fn test_cancel_returns_to_selection() {
        let mut app = playing_app();
        app.submit();
        app.cancel();
        assert_eq!(app.session().unwrap().turn(), Turn::Selecting);
    }

    #[test]
    fn test_navigation_skips_hidden_options() {
        let mut app = playing_app();
        app.use_lifeline(Lifeline::FiftyFifty);
        let session = app.session().unwrap();
        assert!(!session.is_hidden(app.selected_option()));

        for _ in 0..8 {
            app.select_next_option();
            assert!(!app.session().unwrap().is_hidden(app.selected_option()));
        }
        for _ in 0..8 {
            app.select_previous_option();
            assert!(!app.session().unwrap().is_hidden(app.selected_option()));
        }
    }

    #[test]
    fn test_reused_lifeline_reports_notice() {
        let mut app = playing_app();
        app.use_lifeline(Lifeline::PhoneAFriend);
        assert!(app.notice().unwrap().starts_with("Your friend says"));

        app.use_lifeline(Lifeline::PhoneAFriend);
        assert_eq!(app.notice(), Some("Phone a Friend has already been used"));
    }

    #[test]
    fn test_walk_away_and_restart() {
        let mut app = playing_app();
        app.walk_away();
        assert_eq!(app.state, AppState::Finished);
        assert_eq!(app.session().unwrap().winnings(), 0);

        app.restart();
        assert_eq!(app.state, AppState::Welcome);
        assert!(app.session().is_none());
    }
}
