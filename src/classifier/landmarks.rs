//! Hand landmark frames as delivered by MediaPipe Hands
//!
//! A frame is 21 points in a fixed anatomical order. JS hands them over
//! as a flat Float32Array (21 landmarks × 3 coordinates: x, y, z).

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

// ============================================================================
// HAND LANDMARK INDICES (MediaPipe Hands - 21 total)
// ============================================================================

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Number of landmarks in one hand frame
pub const LANDMARK_COUNT: usize = 21;

/// Length of the flat xyz array JS sends per hand
pub const FLAT_FRAME_LEN: usize = LANDMARK_COUNT * 3;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// A single 3D landmark point (normalized coordinates)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct LandmarkPoint {
    pub x: f32, // 0-1 normalized
    pub y: f32, // 0-1 normalized
    pub z: f32, // Relative depth
}

impl LandmarkPoint {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Errors raised while building a frame from tracker output
#[derive(Debug, Error, PartialEq)]
pub enum LandmarkError {
    #[error("invalid landmark data length: {actual} (expected {})", FLAT_FRAME_LEN)]
    WrongLength { actual: usize },
    #[error("landmark {index} has a non-finite coordinate")]
    NonFinite { index: usize },
}

/// One tracked hand: 21 landmarks, immutable once built
#[derive(Clone, Debug, PartialEq)]
pub struct LandmarkFrame {
    points: [LandmarkPoint; LANDMARK_COUNT],
}

impl LandmarkFrame {
    /// Build a frame from points already in MediaPipe order
    pub fn from_points(points: [LandmarkPoint; LANDMARK_COUNT]) -> Result<Self, LandmarkError> {
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(LandmarkError::NonFinite { index });
        }
        Ok(Self { points })
    }

    /// Parse the flat `[x0, y0, z0, x1, ...]` layout used by the JS bridge
    pub fn from_flat(data: &[f32]) -> Result<Self, LandmarkError> {
        if data.len() != FLAT_FRAME_LEN {
            return Err(LandmarkError::WrongLength { actual: data.len() });
        }

        let mut points = [LandmarkPoint::default(); LANDMARK_COUNT];
        for (point, xyz) in points.iter_mut().zip(data.chunks_exact(3)) {
            *point = LandmarkPoint::new(xyz[0], xyz[1], xyz[2]);
        }
        Self::from_points(points)
    }

    pub fn point(&self, index: usize) -> LandmarkPoint {
        self.points[index]
    }

    pub fn points(&self) -> &[LandmarkPoint; LANDMARK_COUNT] {
        &self.points
    }
}

/// Which hand the tracker believes it is looking at
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Handedness::Left => "left",
            Handedness::Right => "right",
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown handedness label {0:?} (expected \"Left\" or \"Right\")")]
pub struct ParseHandednessError(pub String);

impl FromStr for Handedness {
    type Err = ParseHandednessError;

    /// MediaPipe reports "Left"/"Right"; accept any casing.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("left") {
            Ok(Handedness::Left)
        } else if s.eq_ignore_ascii_case("right") {
            Ok(Handedness::Right)
        } else {
            Err(ParseHandednessError(s.to_string()))
        }
    }
}
