//! AI opponent: uniform random, or an "evil" counter to the player's hand

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::Serialize;
use thiserror::Error;

use crate::classifier::Gesture;

/// Difficulty chosen when a round starts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AiMode {
    #[default]
    Normal,
    Evil,
}

impl AiMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AiMode::Normal => "normal",
            AiMode::Evil => "evil",
        }
    }
}

impl fmt::Display for AiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown AI mode {0:?} (expected \"normal\" or \"evil\")")]
pub struct ParseAiModeError(pub String);

impl FromStr for AiMode {
    type Err = ParseAiModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("normal") {
            Ok(AiMode::Normal)
        } else if s.eq_ignore_ascii_case("evil") {
            Ok(AiMode::Evil)
        } else {
            Err(ParseAiModeError(s.to_string()))
        }
    }
}

/// Uniform pick among rock, paper, scissors
pub fn random_move<R: Rng + ?Sized>(rng: &mut R) -> Gesture {
    Gesture::MOVES[rng.gen_range(0..Gesture::MOVES.len())]
}

/// Pick the AI's hand for a round.
///
/// Evil mode counters a known player gesture; an unclear hand can't be
/// countered, so it falls back to a random move like normal mode.
pub fn choose_ai_gesture<R: Rng + ?Sized>(mode: AiMode, player: Gesture, rng: &mut R) -> Gesture {
    match (mode, player.beaten_by()) {
        (AiMode::Evil, Some(counter)) => counter,
        _ => random_move(rng),
    }
}
