//! Game module - round state machine, AI opponent, scoring
//!
//! Re-exports only. All logic in submodules.

mod ai;
mod config;
mod round;
mod score;

pub use ai::{choose_ai_gesture, random_move, AiMode, ParseAiModeError};
pub use config::{ConfigError, GameConfig};
pub use round::{
    Effect, HandInput, RejectReason, RoundController, RoundEvent, RoundResult, RoundState,
    TimerId, TimerKind, UiEvent, TICK_INTERVAL_MS,
};
pub use score::{determine_outcome, Outcome, ScoreTally, SoundCue};
