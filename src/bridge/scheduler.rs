//! Browser timers for the round controller
//!
//! Each armed timer is a `setTimeout` handle keyed by `TimerId`.
//! Intervals are chained one-shots: the next shot is armed before the
//! current expiry is dispatched, so a `Cancel` emitted by that expiry
//! clears the follow-up instead of racing it.

use std::cell::RefCell;
use std::collections::HashMap;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use super::events::GameError;
use super::session;
use crate::game::{Effect, RoundEvent, TimerId};

thread_local! {
    static TIMERS: RefCell<HashMap<TimerId, i32>> = RefCell::new(HashMap::new());
}

/// Apply a timer command from the controller; UI events are not handled here
pub(crate) fn apply(effect: &Effect) -> Result<(), GameError> {
    match effect {
        Effect::ScheduleInterval { timer, period_ms } => arm(*timer, *period_ms, Some(*period_ms)),
        Effect::ScheduleOnce { timer, delay_ms } => arm(*timer, *delay_ms, None),
        Effect::Cancel { timer } => cancel(*timer),
        Effect::Emit(_) => Ok(()),
    }
}

fn arm(timer: TimerId, delay_ms: u32, repeat_ms: Option<u32>) -> Result<(), GameError> {
    let window = web_sys::window().ok_or(GameError::NoWindow)?;
    let callback = Closure::once_into_js(move || on_fire(timer, repeat_ms));
    let handle = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        i32::try_from(delay_ms).unwrap_or(i32::MAX),
    )?;

    let replaced = TIMERS.with(|timers| timers.borrow_mut().insert(timer, handle));
    if let Some(old) = replaced {
        window.clear_timeout_with_handle(old);
    }
    Ok(())
}

fn on_fire(timer: TimerId, repeat_ms: Option<u32>) {
    let armed = TIMERS.with(|timers| timers.borrow_mut().remove(&timer).is_some());
    if !armed {
        return;
    }

    if let Some(period_ms) = repeat_ms {
        if let Err(err) = arm(timer, period_ms, repeat_ms) {
            web_sys::console::warn_1(&format!("Failed to re-arm {:?}: {}", timer, err).into());
        }
    }

    if let Err(err) = session::dispatch(RoundEvent::TimerFired { timer }) {
        web_sys::console::warn_1(&format!("Timer {:?} dropped: {}", timer, err).into());
    }
}

fn cancel(timer: TimerId) -> Result<(), GameError> {
    let handle = TIMERS.with(|timers| timers.borrow_mut().remove(&timer));
    if let Some(handle) = handle {
        web_sys::window()
            .ok_or(GameError::NoWindow)?
            .clear_timeout_with_handle(handle);
    }
    Ok(())
}

/// Drop every pending timer (used when the session is rebuilt)
pub(crate) fn cancel_all() {
    let handles: Vec<i32> = TIMERS.with(|timers| timers.borrow_mut().drain().map(|(_, h)| h).collect());
    if let Some(window) = web_sys::window() {
        for handle in handles {
            window.clear_timeout_with_handle(handle);
        }
    }
}
