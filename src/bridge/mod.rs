//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod events;
mod logging;
mod scheduler;
mod session;

pub use events::GameError;
pub(crate) use logging::install_console_logging;

pub use session::{
    // WASM entry points
    init_game,
    set_event_listener,
    update_hand_landmarks,
    clear_hand,
    start_round,
    reset_scores,
    get_scores,
    get_round_state,
    set_gesture_icon,
    gesture_icon,
    set_debug_enabled,
};
