//! UI event payloads and bridge errors
//!
//! Core `UiEvent`s are flattened into tagged JSON objects for JS, with the
//! display strings (labels, icons, banner text) already resolved.

use serde::Serialize;
use thiserror::Error;
use wasm_bindgen::prelude::*;

use crate::classifier::{
    FingerExtensionState, Gesture, GestureTable, Handedness, LandmarkError, ParseGestureError,
    ParseHandednessError,
};
use crate::game::{
    AiMode, ConfigError, Outcome, ParseAiModeError, RejectReason, RoundState, ScoreTally,
    SoundCue, UiEvent,
};

/// Errors surfaced to JavaScript as thrown strings
#[derive(Debug, Error)]
pub enum GameError {
    #[error("Game not initialized; call init_game first")]
    NotInitialized,
    #[error("No window found")]
    NoWindow,
    #[error("window.performance is unavailable")]
    NoPerformance,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Landmarks(#[from] LandmarkError),
    #[error(transparent)]
    Handedness(#[from] ParseHandednessError),
    #[error(transparent)]
    Mode(#[from] ParseAiModeError),
    #[error(transparent)]
    Gesture(#[from] ParseGestureError),
    #[error("Failed to encode event: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("JavaScript error: {0}")]
    Js(String),
}

impl From<GameError> for JsValue {
    fn from(err: GameError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

impl From<JsValue> for GameError {
    fn from(value: JsValue) -> Self {
        GameError::Js(format!("{:?}", value))
    }
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum JsEvent<'a> {
    GestureUpdated {
        gesture: Gesture,
        label: &'a str,
        icon: &'a str,
        fingers: Option<FingerExtensionState>,
        handedness: Option<Handedness>,
    },
    HandPresence {
        present: bool,
    },
    CountdownTick {
        seconds_remaining: u32,
    },
    Go,
    RoundOutcome {
        round: u64,
        mode: AiMode,
        player_gesture: Gesture,
        ai_gesture: Gesture,
        outcome: Outcome,
        scores: ScoreTally,
        banner: &'a str,
        sound: SoundCue,
        player_icon: &'a str,
        ai_icon: &'a str,
    },
    StartRejected {
        reason: RejectReason,
        message: &'a str,
    },
    StateChanged {
        state: RoundState,
    },
    ScoresReset {
        scores: ScoreTally,
    },
}

/// Encode one UI event as the JSON string handed to the JS listener
pub(crate) fn encode_event(
    event: &UiEvent,
    icons: &GestureTable<String>,
) -> Result<String, serde_json::Error> {
    let payload = match event {
        UiEvent::GestureUpdated {
            gesture,
            fingers,
            handedness,
        } => JsEvent::GestureUpdated {
            gesture: *gesture,
            label: gesture.label(),
            icon: icons.get(*gesture),
            fingers: *fingers,
            handedness: *handedness,
        },
        UiEvent::HandPresence { present } => JsEvent::HandPresence { present: *present },
        UiEvent::CountdownTick { seconds_remaining } => JsEvent::CountdownTick {
            seconds_remaining: *seconds_remaining,
        },
        UiEvent::Go => JsEvent::Go,
        UiEvent::RoundOutcome(result) => JsEvent::RoundOutcome {
            round: result.round,
            mode: result.mode,
            player_gesture: result.player_gesture,
            ai_gesture: result.ai_gesture,
            outcome: result.outcome,
            scores: result.scores,
            banner: result.outcome.banner(),
            sound: result.outcome.sound_cue(),
            player_icon: icons.get(result.player_gesture),
            ai_icon: icons.get(result.ai_gesture),
        },
        UiEvent::StartRejected { reason } => JsEvent::StartRejected {
            reason: *reason,
            message: reason.message(),
        },
        UiEvent::StateChanged { state } => JsEvent::StateChanged { state: *state },
        UiEvent::ScoresReset { scores } => JsEvent::ScoresReset { scores: *scores },
    };
    serde_json::to_string(&payload)
}
