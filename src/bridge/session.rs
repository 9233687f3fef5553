//! Game session and JS entry points
//!
//! Holds the round controller for the page. Every input runs inside one
//! borrow of the session; timer commands and listener calls happen after
//! the borrow is released, so a listener may call straight back in.

use std::cell::RefCell;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use wasm_bindgen::prelude::*;

use super::events::{encode_event, GameError};
use super::logging;
use super::scheduler;
use crate::classifier::{Gesture, GestureTable, Handedness, LandmarkFrame};
use crate::game::{AiMode, Effect, GameConfig, HandInput, RoundController, RoundEvent, UiEvent};

struct GameSession {
    controller: RoundController,
    icons: GestureTable<String>,
    listener: Option<js_sys::Function>,
    debug_enabled: bool,
}

// Thread-local storage (WASM is single-threaded)
thread_local! {
    static SESSION: RefCell<Option<GameSession>> = RefCell::new(None);
}

/// Work left over after a transition, run outside the session borrow
struct Pending {
    timers: Vec<Effect>,
    payloads: Vec<String>,
    debug_lines: Vec<String>,
    listener: Option<js_sys::Function>,
}

fn with_session<T>(
    f: impl FnOnce(&mut GameSession) -> Result<T, GameError>,
) -> Result<T, GameError> {
    SESSION.with(|cell| {
        let mut slot = cell.borrow_mut();
        let session = slot.as_mut().ok_or(GameError::NotInitialized)?;
        f(session)
    })
}

/// Feed one event to the controller and carry out its effects
pub(crate) fn dispatch(event: RoundEvent) -> Result<(), GameError> {
    let pending = with_session(|session| {
        let effects = session.controller.handle(event);

        let mut pending = Pending {
            timers: Vec::new(),
            payloads: Vec::new(),
            debug_lines: Vec::new(),
            listener: session.listener.clone(),
        };
        for effect in effects {
            if let Effect::Emit(ui_event) = &effect {
                let payload = encode_event(ui_event, &session.icons)?;
                if session.debug_enabled && matches!(ui_event, UiEvent::GestureUpdated { .. }) {
                    pending.debug_lines.push(payload.clone());
                }
                pending.payloads.push(payload);
                continue;
            }
            pending.timers.push(effect);
        }
        Ok(pending)
    })?;

    for effect in &pending.timers {
        scheduler::apply(effect)?;
    }

    for line in &pending.debug_lines {
        web_sys::console::log_1(&line.into());
    }

    if let Some(listener) = &pending.listener {
        for payload in pending.payloads {
            if let Err(err) = listener.call1(&JsValue::NULL, &JsValue::from_str(&payload)) {
                web_sys::console::warn_1(&err);
            }
        }
    }
    Ok(())
}

/// Monotonic page time; wall-clock steps must not age the hand
fn now_ms() -> Result<f64, GameError> {
    let performance = web_sys::window()
        .ok_or(GameError::NoWindow)?
        .performance()
        .ok_or(GameError::NoPerformance)?;
    Ok(performance.now())
}

// ============================================================================
// WASM-BINDGEN ENTRY POINTS
// ============================================================================

/// Create (or recreate) the game. `config_json` may override any subset of
/// the defaults, e.g. `{"countdown_seconds": 5}`.
#[wasm_bindgen]
pub fn init_game(config_json: Option<String>) -> Result<(), JsValue> {
    let config = match config_json {
        Some(json) => GameConfig::from_json(&json).map_err(GameError::from)?,
        None => GameConfig::default(),
    };
    let controller = RoundController::with_rng(config, ChaCha8Rng::from_entropy())
        .map_err(GameError::from)?;

    scheduler::cancel_all();
    SESSION.with(|cell| {
        let listener = cell.borrow_mut().take().and_then(|old| old.listener);
        *cell.borrow_mut() = Some(GameSession {
            controller,
            icons: GestureTable::default_icons(),
            listener,
            debug_enabled: false,
        });
    });

    console_log!("✅ Gesture game ready");
    Ok(())
}

/// Register the JS callback that receives every UI event as a JSON string
#[wasm_bindgen]
pub fn set_event_listener(callback: js_sys::Function) -> Result<(), JsValue> {
    with_session(|session| {
        session.listener = Some(callback);
        Ok(())
    })?;
    Ok(())
}

/// Called from JavaScript with a flat Float32Array of 63 values
/// (21 landmarks × 3 coordinates: x, y, z) and the MediaPipe hand label
#[wasm_bindgen]
pub fn update_hand_landmarks(data: &[f32], handedness: &str) -> Result<(), JsValue> {
    let frame = LandmarkFrame::from_flat(data).map_err(GameError::from)?;
    let handedness: Handedness = handedness.parse().map_err(GameError::from)?;
    dispatch(RoundEvent::Frame {
        at_ms: now_ms()?,
        hand: Some(HandInput { frame, handedness }),
    })?;
    Ok(())
}

/// Called from JavaScript when the tracker found no hand in a frame
#[wasm_bindgen]
pub fn clear_hand() -> Result<(), JsValue> {
    dispatch(RoundEvent::Frame {
        at_ms: now_ms()?,
        hand: None,
    })?;
    Ok(())
}

/// Start a round in "normal" or "evil" mode. Busy or hand-less starts are
/// reported through a `start_rejected` event, not an exception.
#[wasm_bindgen]
pub fn start_round(mode: &str) -> Result<(), JsValue> {
    let mode: AiMode = mode.parse().map_err(GameError::from)?;
    dispatch(RoundEvent::StartRound {
        mode,
        at_ms: now_ms()?,
    })?;
    Ok(())
}

#[wasm_bindgen]
pub fn reset_scores() -> Result<(), JsValue> {
    dispatch(RoundEvent::ResetScores)?;
    Ok(())
}

/// Current tally as `{"player":0,"ai":0,"draw":0}`
#[wasm_bindgen]
pub fn get_scores() -> Result<String, JsValue> {
    let json = with_session(|session| Ok(serde_json::to_string(&session.controller.scores())?))?;
    Ok(json)
}

#[wasm_bindgen]
pub fn get_round_state() -> Result<String, JsValue> {
    let json = with_session(|session| Ok(serde_json::to_string(&session.controller.state())?))?;
    Ok(json)
}

/// Swap the artwork for one gesture
#[wasm_bindgen]
pub fn set_gesture_icon(gesture: &str, path: String) -> Result<(), JsValue> {
    let gesture: Gesture = gesture.parse().map_err(GameError::from)?;
    with_session(|session| {
        session.icons.set(gesture, path);
        Ok(())
    })?;
    Ok(())
}

#[wasm_bindgen]
pub fn gesture_icon(gesture: &str) -> Result<String, JsValue> {
    let gesture: Gesture = gesture.parse().map_err(GameError::from)?;
    let path = with_session(|session| Ok(session.icons.get(gesture).clone()))?;
    Ok(path)
}

/// Log each classified frame and the round's debug trace to the console
#[wasm_bindgen]
pub fn set_debug_enabled(enabled: bool) -> Result<(), JsValue> {
    logging::set_debug_logs(enabled);
    with_session(|session| {
        session.debug_enabled = enabled;
        Ok(())
    })?;
    Ok(())
}
