//! Classifier module - hand landmarks to rock/paper/scissors
//!
//! Geometric thresholding only: no model, no training data.
//! Re-exports only. All logic in submodules.

mod fingers;
mod gesture;
mod landmarks;

pub use fingers::{
    compute_finger_states, ClassifierConfig, FingerExtensionState, HandFacing,
    DEFAULT_FINGER_TOLERANCE, DEFAULT_THUMB_TOLERANCE,
};
pub use gesture::{
    classify_frame, classify_gesture, Gesture, GestureTable, ParseGestureError, GESTURE_NAMES,
};
pub use landmarks::{
    Handedness, LandmarkError, LandmarkFrame, LandmarkPoint, ParseHandednessError,
    FLAT_FRAME_LEN, LANDMARK_COUNT,
    // Constants
    WRIST, THUMB_CMC, THUMB_MCP, THUMB_IP, THUMB_TIP,
    INDEX_MCP, INDEX_PIP, INDEX_DIP, INDEX_TIP,
    MIDDLE_MCP, MIDDLE_PIP, MIDDLE_DIP, MIDDLE_TIP,
    RING_MCP, RING_PIP, RING_DIP, RING_TIP,
    PINKY_MCP, PINKY_PIP, PINKY_DIP, PINKY_TIP,
};

#[cfg(test)]
pub(crate) use fingers::test_poses;
