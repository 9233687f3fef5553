//! Round outcomes and the running score tally

use serde::Serialize;

use crate::classifier::Gesture;

/// How a round ended
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    PlayerWin,
    AiWin,
    Draw,
    /// Player's hand was unclear; nobody scores
    Inconclusive,
}

/// Sound effect the UI plays for an outcome
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SoundCue {
    Win,
    Lose,
    Draw,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::PlayerWin => "player_win",
            Outcome::AiWin => "ai_win",
            Outcome::Draw => "draw",
            Outcome::Inconclusive => "inconclusive",
        }
    }

    pub fn banner(&self) -> &'static str {
        match self {
            Outcome::PlayerWin => "Player wins!",
            Outcome::AiWin => "AI takes the round!",
            Outcome::Draw => "It's a draw!",
            Outcome::Inconclusive => "Gesture unclear. Try again.",
        }
    }

    pub fn sound_cue(&self) -> SoundCue {
        match self {
            Outcome::PlayerWin => SoundCue::Win,
            Outcome::AiWin => SoundCue::Lose,
            Outcome::Draw | Outcome::Inconclusive => SoundCue::Draw,
        }
    }
}

/// Decide a round from the frozen player gesture and the AI's move
pub fn determine_outcome(player: Gesture, ai: Gesture) -> Outcome {
    if !player.is_move() {
        return Outcome::Inconclusive;
    }
    if player == ai {
        return Outcome::Draw;
    }
    if player.beats() == Some(ai) {
        Outcome::PlayerWin
    } else {
        Outcome::AiWin
    }
}

/// Wins, losses and draws since the session started (or the last reset)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ScoreTally {
    pub player: u32,
    pub ai: u32,
    pub draw: u32,
}

impl ScoreTally {
    /// Count one outcome. Inconclusive rounds leave the tally untouched.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::PlayerWin => self.player += 1,
            Outcome::AiWin => self.ai += 1,
            Outcome::Draw => self.draw += 1,
            Outcome::Inconclusive => {}
        }
    }

    pub fn rounds_scored(&self) -> u32 {
        self.player + self.ai + self.draw
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
