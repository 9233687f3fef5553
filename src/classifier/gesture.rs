//! Gesture categories and the extension-pattern classifier

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use super::fingers::{compute_finger_states, ClassifierConfig, FingerExtensionState};
use super::landmarks::{Handedness, LandmarkFrame};

/// Gesture labels (order matches `Gesture::ALL`)
pub const GESTURE_NAMES: [&str; 4] = ["rock", "paper", "scissors", "unknown"];

/// A classified hand shape. `Unknown` means "no confident reading", never a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    Rock,
    Paper,
    Scissors,
    Unknown,
}

impl Gesture {
    pub const ALL: [Gesture; 4] = [
        Gesture::Rock,
        Gesture::Paper,
        Gesture::Scissors,
        Gesture::Unknown,
    ];

    /// The three playable moves
    pub const MOVES: [Gesture; 3] = [Gesture::Rock, Gesture::Paper, Gesture::Scissors];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gesture::Rock => GESTURE_NAMES[0],
            Gesture::Paper => GESTURE_NAMES[1],
            Gesture::Scissors => GESTURE_NAMES[2],
            Gesture::Unknown => GESTURE_NAMES[3],
        }
    }

    /// Text shown under the gesture icon
    pub fn label(&self) -> &'static str {
        match self {
            Gesture::Rock => "ROCK",
            Gesture::Paper => "PAPER",
            Gesture::Scissors => "SCISSORS",
            Gesture::Unknown => "Unclear",
        }
    }

    pub fn is_move(&self) -> bool {
        !matches!(self, Gesture::Unknown)
    }

    /// The move this one defeats; `None` for `Unknown`
    pub fn beats(&self) -> Option<Gesture> {
        match self {
            Gesture::Rock => Some(Gesture::Scissors),
            Gesture::Paper => Some(Gesture::Rock),
            Gesture::Scissors => Some(Gesture::Paper),
            Gesture::Unknown => None,
        }
    }

    /// The move that defeats this one; `None` for `Unknown`
    pub fn beaten_by(&self) -> Option<Gesture> {
        match self {
            Gesture::Rock => Some(Gesture::Paper),
            Gesture::Paper => Some(Gesture::Scissors),
            Gesture::Scissors => Some(Gesture::Rock),
            Gesture::Unknown => None,
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown gesture {0:?} (expected rock, paper, scissors or unknown)")]
pub struct ParseGestureError(pub String);

impl FromStr for Gesture {
    type Err = ParseGestureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gesture::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseGestureError(s.to_string()))
    }
}

/// Map an extension vector to a gesture. Total over all 32 patterns.
pub fn classify_gesture(fingers: &FingerExtensionState) -> Gesture {
    match fingers.flags() {
        [true, true, true, true, true] => Gesture::Paper,
        [false, false, false, false, false] => Gesture::Rock,
        [false, true, true, false, false] => Gesture::Scissors,
        _ => Gesture::Unknown,
    }
}

/// Classify one hand frame, returning the finger states alongside
pub fn classify_frame(
    frame: &LandmarkFrame,
    handedness: Handedness,
    config: &ClassifierConfig,
) -> (Gesture, FingerExtensionState) {
    let fingers = compute_finger_states(frame, handedness, config);
    (classify_gesture(&fingers), fingers)
}

/// Total mapping keyed by `Gesture`; every variant, `Unknown` included,
/// must be supplied when the table is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GestureTable<T> {
    pub rock: T,
    pub paper: T,
    pub scissors: T,
    pub unknown: T,
}

impl<T> GestureTable<T> {
    pub fn get(&self, gesture: Gesture) -> &T {
        match gesture {
            Gesture::Rock => &self.rock,
            Gesture::Paper => &self.paper,
            Gesture::Scissors => &self.scissors,
            Gesture::Unknown => &self.unknown,
        }
    }

    pub fn set(&mut self, gesture: Gesture, value: T) {
        let slot = match gesture {
            Gesture::Rock => &mut self.rock,
            Gesture::Paper => &mut self.paper,
            Gesture::Scissors => &mut self.scissors,
            Gesture::Unknown => &mut self.unknown,
        };
        *slot = value;
    }
}

impl GestureTable<String> {
    /// Bundled icon paths; unclear hands reuse the rock artwork
    pub fn default_icons() -> Self {
        Self {
            rock: "assets/rock.png".to_string(),
            paper: "assets/paper.png".to_string(),
            scissors: "assets/scissors.png".to_string(),
            unknown: "assets/rock.png".to_string(),
        }
    }
}
