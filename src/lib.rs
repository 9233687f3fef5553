//! Gesture RPS - webcam rock-paper-scissors against an AI
//!
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen entry points that delegate to submodules
//!
//! MediaPipe Hands runs in JavaScript and pushes landmarks in through
//! `update_hand_landmarks`; UI events come back through the listener
//! registered with `set_event_listener`.

use wasm_bindgen::prelude::*;

// ============================================================================
// CONSOLE LOGGING
// ============================================================================

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

macro_rules! console_log {
    ($($t:tt)*) => ($crate::log(&format_args!($($t)*).to_string()))
}

pub mod classifier;
pub mod game;
mod bridge;

// Re-export wasm_bindgen functions for JS access
pub use bridge::{
    clear_hand, gesture_icon, get_round_state, get_scores, init_game, reset_scores,
    set_debug_enabled, set_event_listener, set_gesture_icon, start_round, update_hand_landmarks,
    GameError,
};

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
    bridge::install_console_logging();
}
