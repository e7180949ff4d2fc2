//! Turn-by-turn game rules, independent of any rendering.

mod ladder;
mod lifelines;
mod session;

pub use ladder::{
    GAME_LENGTH, LADDER, MILESTONES, format_prize, guaranteed_prize, is_milestone, prize_at,
};
pub use lifelines::{
    AudiencePoll, FriendAdvice, Lifeline, ask_the_audience, fifty_fifty, phone_a_friend,
};
pub use session::{GameError, GameSession, Outcome, Turn};
