//! Pose Gesture Interpretation
//!
//! Turns periodic facial-keypoint snapshots into discrete directional
//! commands using a dead-zone/exit-event model: a command fires only when the
//! face leaves the central dead zone, not while it stays outside and not when
//! it returns. A proximity timeout exits pose control entirely when the
//! detected face stays too small for too long.
//!
//! All time is caller-injected milliseconds, so the rate limit, retry backoff
//! and safety timer are fully deterministic under test.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::vec2::Vec2;
use crate::game::state::Direction;

/// Minimum overall snapshot confidence before the pose is considered at all.
pub const OVERALL_SCORE_THRESHOLD: f32 = 0.3;

/// Minimum per-keypoint confidence for gesture decisions.
pub const GESTURE_SCORE_THRESHOLD: f32 = 0.7;

/// Minimum per-keypoint confidence for the debug overlay.
pub const OVERLAY_SCORE_THRESHOLD: f32 = 0.5;

/// Floor for the dead-zone radius; also the proximity-warning threshold.
pub const MIN_DECISION_RADIUS: f32 = 50.0;

/// Continuous sub-threshold time after which pose control force-exits.
pub const PROXIMITY_TIMEOUT_MS: u64 = 3300;

/// Minimum interval between decisions, independent of frame rate.
pub const DETECTION_INTERVAL_MS: u64 = 1000;

/// Fixed delay before retrying after an estimator failure.
pub const RETRY_BACKOFF_MS: u64 = 1000;

/// Reference center of the (horizontally flipped) 640x480 capture frame.
pub const FRAME_CENTER: Vec2 = Vec2::new(320.0, 240.0);

// =============================================================================
// SNAPSHOT TYPES
// =============================================================================

/// Named keypoint kinds delivered by the pose estimator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeypointKind {
    /// Nose tip
    Nose,
    /// Left eye
    LeftEye,
    /// Right eye
    RightEye,
    /// Left ear
    LeftEar,
    /// Right ear
    RightEar,
    /// Left shoulder (ignored for face geometry)
    LeftShoulder,
    /// Right shoulder (ignored for face geometry)
    RightShoulder,
}

impl KeypointKind {
    /// Whether this keypoint participates in face-extent geometry.
    #[inline]
    pub fn is_face(self) -> bool {
        matches!(
            self,
            KeypointKind::Nose
                | KeypointKind::LeftEye
                | KeypointKind::RightEye
                | KeypointKind::LeftEar
                | KeypointKind::RightEar
        )
    }
}

/// One labeled keypoint with its confidence.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Keypoint {
    /// Which body part
    pub kind: KeypointKind,
    /// Capture-frame position
    pub position: Vec2,
    /// Estimator confidence in [0, 1]
    pub score: f32,
}

/// One pose-estimation result.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PoseSnapshot {
    /// Overall pose confidence
    pub score: f32,
    /// Detected keypoints
    pub keypoints: Vec<Keypoint>,
}

impl PoseSnapshot {
    /// Find a keypoint by kind.
    pub fn keypoint(&self, kind: KeypointKind) -> Option<&Keypoint> {
        self.keypoints.iter().find(|k| k.kind == kind)
    }

    /// Face-scale radius: the bounding extent of the face keypoints present,
    /// summed over both axes and divided by four.
    pub fn face_radius(&self) -> f32 {
        let mut min_x = f32::INFINITY;
        let mut max_x = f32::NEG_INFINITY;
        let mut min_y = f32::INFINITY;
        let mut max_y = f32::NEG_INFINITY;
        let mut any = false;

        for keypoint in self.keypoints.iter().filter(|k| k.kind.is_face()) {
            any = true;
            min_x = min_x.min(keypoint.position.x);
            max_x = max_x.max(keypoint.position.x);
            min_y = min_y.min(keypoint.position.y);
            max_y = max_y.max(keypoint.position.y);
        }

        if !any {
            return 0.0;
        }
        ((max_x - min_x) + (max_y - min_y)) / 4.0
    }
}

// =============================================================================
// TRACKING STATE
// =============================================================================

/// Gesture tracking state, also exposed for the debug overlay.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PoseTrackingState {
    /// Whether the face was inside the dead zone on the last decision
    pub was_in_center: bool,
    /// Last direction commanded from pose
    pub last_direction: Option<Direction>,
    /// When the proximity warning started, if it is running
    pub warning_since_ms: Option<u64>,
}

impl Default for PoseTrackingState {
    fn default() -> Self {
        Self {
            was_in_center: true,
            last_direction: None,
            warning_since_ms: None,
        }
    }
}

/// Result of interpreting one snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoseOutcome {
    /// No signal this cycle
    None,
    /// A directional gesture fired
    Command(Direction),
    /// Proximity timeout: pose control must exit back to keyboard
    ExitToKeyboard,
}

// =============================================================================
// INTERPRETER
// =============================================================================

/// Stateful interpreter for the pose snapshot stream.
#[derive(Clone, Debug, Default)]
pub struct PoseGestureInterpreter {
    tracking: PoseTrackingState,
    last_decision_ms: Option<u64>,
    retry_at_ms: Option<u64>,
}

impl PoseGestureInterpreter {
    /// Create a fresh interpreter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current tracking state (debug overlay).
    pub fn tracking(&self) -> &PoseTrackingState {
        &self.tracking
    }

    /// Reset all tracking and timing state. Called whenever pose tracking
    /// (re)starts or exits.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether the collaborator should run a detection now. False while the
    /// decision interval has not elapsed or a failure backoff is pending.
    pub fn detection_due(&self, now_ms: u64) -> bool {
        if let Some(retry_at) = self.retry_at_ms {
            if now_ms < retry_at {
                return false;
            }
        }
        match self.last_decision_ms {
            None => true,
            Some(last) => now_ms >= last + DETECTION_INTERVAL_MS,
        }
    }

    /// Record an estimator failure; the next detection is due after a fixed
    /// backoff. The failure never reaches game state.
    pub fn record_failure(&mut self, now_ms: u64) {
        self.retry_at_ms = Some(now_ms + RETRY_BACKOFF_MS);
    }

    /// Interpret one snapshot.
    ///
    /// `gestures_enabled` gates the directional state machine (pose must be
    /// the active modality and the game Running); the proximity safety timer
    /// runs regardless, as long as snapshots keep arriving.
    pub fn interpret(
        &mut self,
        snapshot: &PoseSnapshot,
        now_ms: u64,
        gestures_enabled: bool,
    ) -> PoseOutcome {
        // One decision per interval, independent of delivery rate
        if let Some(last) = self.last_decision_ms {
            if now_ms < last + DETECTION_INTERVAL_MS {
                return PoseOutcome::None;
            }
        }
        self.last_decision_ms = Some(now_ms);
        self.retry_at_ms = None;

        if snapshot.score <= OVERALL_SCORE_THRESHOLD {
            debug!(score = snapshot.score, "pose below overall confidence");
            return PoseOutcome::None;
        }

        let (nose, left_eye, right_eye) = match (
            snapshot.keypoint(KeypointKind::Nose),
            snapshot.keypoint(KeypointKind::LeftEye),
            snapshot.keypoint(KeypointKind::RightEye),
        ) {
            (Some(n), Some(l), Some(r)) => (n, l, r),
            _ => {
                debug!("required keypoints missing, skipping cycle");
                return PoseOutcome::None;
            }
        };

        if nose.score <= GESTURE_SCORE_THRESHOLD
            || left_eye.score <= GESTURE_SCORE_THRESHOLD
            || right_eye.score <= GESTURE_SCORE_THRESHOLD
        {
            debug!("keypoint confidence too low, skipping cycle");
            return PoseOutcome::None;
        }

        let face_radius = snapshot.face_radius();

        // Proximity safety timer on the raw radius
        if face_radius < MIN_DECISION_RADIUS {
            match self.tracking.warning_since_ms {
                None => {
                    warn!(face_radius, "face too small, move closer to the camera");
                    self.tracking.warning_since_ms = Some(now_ms);
                }
                Some(since) => {
                    if now_ms - since > PROXIMITY_TIMEOUT_MS {
                        return PoseOutcome::ExitToKeyboard;
                    }
                }
            }
        } else {
            self.tracking.warning_since_ms = None;
        }

        let decision_radius = face_radius.max(MIN_DECISION_RADIUS);
        let brow_center = left_eye.position.midpoint(right_eye.position);
        let in_center = brow_center.distance(FRAME_CENTER) <= decision_radius
            || nose.position.distance(FRAME_CENTER) <= decision_radius;

        if gestures_enabled {
            if in_center {
                if !self.tracking.was_in_center {
                    // Re-entering the dead zone arms the next exit; it never
                    // fires a command itself
                    debug!("pose returned to center");
                    self.tracking.was_in_center = true;
                    self.tracking.last_direction = None;
                }
            } else if self.tracking.was_in_center {
                self.tracking.was_in_center = false;

                let dx = brow_center.x - FRAME_CENTER.x;
                let dy = brow_center.y - FRAME_CENTER.y;

                // Capture is horizontally flipped, so the X mapping mirrors
                let direction = if dx.abs() > dy.abs() {
                    if dx > 0.0 {
                        Direction::Left
                    } else {
                        Direction::Right
                    }
                } else if dy < 0.0 {
                    Direction::Up
                } else {
                    Direction::Down
                };

                self.tracking.last_direction = Some(direction);
                debug!(?direction, "pose gesture fired");
                return PoseOutcome::Command(direction);
            }
        }

        PoseOutcome::None
    }
}

// =============================================================================
// TESTS
// =============================================================================
