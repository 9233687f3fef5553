//! Per-finger extension from landmark geometry
//!
//! Thumb moves laterally, so it is tested on x (mirrored by handedness).
//! The other four fingers are tested on y: a tip above its PIP joint
//! (smaller y) is extended for an upright hand.

use serde::Serialize;

use super::landmarks::{
    Handedness, LandmarkFrame, INDEX_PIP, INDEX_TIP, MIDDLE_PIP, MIDDLE_TIP, PINKY_PIP,
    PINKY_TIP, RING_PIP, RING_TIP, THUMB_IP, THUMB_TIP, WRIST,
};

/// Default lateral margin for the thumb test (normalized units)
pub const DEFAULT_THUMB_TOLERANCE: f32 = 0.12;

/// Default vertical margin for the finger tests (normalized units)
pub const DEFAULT_FINGER_TOLERANCE: f32 = 0.02;

/// Wrist depth below which the palm is taken to face the camera
const FACING_DEPTH_LIMIT: f32 = 0.2;

/// (tip, pip) landmark pairs for index, middle, ring, pinky
const FINGER_JOINTS: [(usize, usize); 4] = [
    (INDEX_TIP, INDEX_PIP),
    (MIDDLE_TIP, MIDDLE_PIP),
    (RING_TIP, RING_PIP),
    (PINKY_TIP, PINKY_PIP),
];

/// Tolerances used by the extension tests
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassifierConfig {
    pub thumb_tolerance: f32,
    pub finger_tolerance: f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            thumb_tolerance: DEFAULT_THUMB_TOLERANCE,
            finger_tolerance: DEFAULT_FINGER_TOLERANCE,
        }
    }
}

/// Rough palm orientation, diagnostics only
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HandFacing {
    Front,
    Angled,
}

/// Which fingers are straightened in one frame
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct FingerExtensionState {
    pub thumb: bool,
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
    pub facing: HandFacing,
}

impl FingerExtensionState {
    /// Build from (thumb, index, middle, ring, pinky) with a front-facing tag
    pub fn from_flags(flags: [bool; 5]) -> Self {
        let [thumb, index, middle, ring, pinky] = flags;
        Self {
            thumb,
            index,
            middle,
            ring,
            pinky,
            facing: HandFacing::Front,
        }
    }

    pub fn flags(&self) -> [bool; 5] {
        [self.thumb, self.index, self.middle, self.ring, self.pinky]
    }

    pub fn extended_count(&self) -> usize {
        self.flags().iter().filter(|&&f| f).count()
    }
}

/// Compute the extension vector for one hand
pub fn compute_finger_states(
    frame: &LandmarkFrame,
    handedness: Handedness,
    config: &ClassifierConfig,
) -> FingerExtensionState {
    let thumb_tip = frame.point(THUMB_TIP);
    let thumb_ip = frame.point(THUMB_IP);

    // Camera image is mirrored relative to the hand label
    let thumb = match handedness {
        Handedness::Right => thumb_tip.x < thumb_ip.x - config.thumb_tolerance,
        Handedness::Left => thumb_tip.x > thumb_ip.x + config.thumb_tolerance,
    };

    let [index, middle, ring, pinky] = FINGER_JOINTS.map(|(tip, pip)| {
        frame.point(tip).y < frame.point(pip).y - config.finger_tolerance
    });

    let facing = if frame.point(WRIST).z.abs() < FACING_DEPTH_LIMIT {
        HandFacing::Front
    } else {
        HandFacing::Angled
    };

    FingerExtensionState {
        thumb,
        index,
        middle,
        ring,
        pinky,
        facing,
    }
}

#[cfg(test)]
pub(crate) mod test_poses {
    //! Synthetic hands for tests: an upright hand with each finger either
    //! straightened or curled.

    use super::super::landmarks::*;

    /// Flags order: thumb, index, middle, ring, pinky
    pub fn hand(handedness: Handedness, flags: [bool; 5]) -> LandmarkFrame {
        let mut points = [LandmarkPoint::new(0.5, 0.8, 0.0); LANDMARK_COUNT];

        // Thumb tip sits 0.2 to the open side of its IP joint when extended
        let open_dx = match handedness {
            Handedness::Right => -0.2,
            Handedness::Left => 0.2,
        };
        points[THUMB_IP] = LandmarkPoint::new(0.5, 0.6, 0.0);
        points[THUMB_TIP] = if flags[0] {
            LandmarkPoint::new(0.5 + open_dx, 0.6, 0.0)
        } else {
            LandmarkPoint::new(0.5, 0.6, 0.0)
        };

        let pairs = [
            (INDEX_TIP, INDEX_PIP),
            (MIDDLE_TIP, MIDDLE_PIP),
            (RING_TIP, RING_PIP),
            (PINKY_TIP, PINKY_PIP),
        ];
        for (i, (tip, pip)) in pairs.into_iter().enumerate() {
            points[pip] = LandmarkPoint::new(0.5, 0.5, 0.0);
            points[tip] = if flags[i + 1] {
                LandmarkPoint::new(0.5, 0.3, 0.0)
            } else {
                LandmarkPoint::new(0.5, 0.6, 0.0)
            };
        }

        LandmarkFrame::from_points(points).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::test_poses::hand;
    use super::*;
    use crate::classifier::landmarks::{LandmarkPoint, LANDMARK_COUNT};

    fn frame_with_thumb(tip_x: f32, ip_x: f32) -> LandmarkFrame {
        let mut points = [LandmarkPoint::new(0.5, 0.5, 0.0); LANDMARK_COUNT];
        points[THUMB_TIP] = LandmarkPoint::new(tip_x, 0.5, 0.0);
        points[THUMB_IP] = LandmarkPoint::new(ip_x, 0.5, 0.0);
        LandmarkFrame::from_points(points).unwrap()
    }

    #[test]
    fn test_thumb_mirrors_with_handedness() {
        let config = ClassifierConfig::default();
        // Tip well to the left of the IP joint
        let frame = frame_with_thumb(0.3, 0.5);

        let right = compute_finger_states(&frame, Handedness::Right, &config);
        let left = compute_finger_states(&frame, Handedness::Left, &config);
        assert!(right.thumb);
        assert!(!left.thumb);

        // Same geometry mirrored on x
        let mirrored = frame_with_thumb(0.7, 0.5);
        assert!(!compute_finger_states(&mirrored, Handedness::Right, &config).thumb);
        assert!(compute_finger_states(&mirrored, Handedness::Left, &config).thumb);
    }

    #[test]
    fn test_thumb_tolerance_suppresses_jitter() {
        let config = ClassifierConfig::default();
        // 0.1 past the joint is inside the 0.12 margin
        let frame = frame_with_thumb(0.4, 0.5);
        assert!(!compute_finger_states(&frame, Handedness::Right, &config).thumb);

        let loose = ClassifierConfig {
            thumb_tolerance: 0.05,
            ..config
        };
        assert!(compute_finger_states(&frame, Handedness::Right, &loose).thumb);
    }

    #[test]
    fn test_finger_tolerance() {
        let config = ClassifierConfig::default();
        let mut points = [LandmarkPoint::new(0.5, 0.5, 0.0); LANDMARK_COUNT];
        points[INDEX_PIP] = LandmarkPoint::new(0.5, 0.5, 0.0);
        points[INDEX_TIP] = LandmarkPoint::new(0.5, 0.49, 0.0); // inside margin
        points[MIDDLE_PIP] = LandmarkPoint::new(0.5, 0.5, 0.0);
        points[MIDDLE_TIP] = LandmarkPoint::new(0.5, 0.45, 0.0); // clearly above
        let frame = LandmarkFrame::from_points(points).unwrap();

        let states = compute_finger_states(&frame, Handedness::Right, &config);
        assert!(!states.index);
        assert!(states.middle);
        assert!(!states.ring);
        assert!(!states.pinky);
    }

    #[test]
    fn test_pose_helper_round_trips_flags() {
        let config = ClassifierConfig::default();
        for handedness in [Handedness::Left, Handedness::Right] {
            for bits in 0u8..32 {
                let flags = [0, 1, 2, 3, 4].map(|i| bits & (1 << i) != 0);
                let states = compute_finger_states(&hand(handedness, flags), handedness, &config);
                assert_eq!(states.flags(), flags, "{handedness} {flags:?}");
            }
        }
    }

    #[test]
    fn test_facing_tag_from_wrist_depth() {
        let config = ClassifierConfig::default();
        let mut points = *hand(Handedness::Right, [false; 5]).points();
        assert_eq!(
            compute_finger_states(&LandmarkFrame::from_points(points).unwrap(), Handedness::Right, &config).facing,
            HandFacing::Front
        );

        points[WRIST].z = -0.35;
        let angled = LandmarkFrame::from_points(points).unwrap();
        assert_eq!(
            compute_finger_states(&angled, Handedness::Right, &config).facing,
            HandFacing::Angled
        );
    }
}
