//! Control Arbitration Module
//!
//! Turns heterogeneous, asynchronously arriving control events into a single
//! authoritative direction/motion decision.
//!
//! ## Module Structure
//!
//! - `arbiter`: active-modality ownership, event inbox, keyboard semantics
//! - `voice`: transcript to command mapping
//! - `pose`: keypoint stream to gesture interpretation
//!
//! Exactly one modality is active at a time; the arbiter drains its inbox
//! once per tick so every delivered event is applied atomically before the
//! simulation reads control state.

pub mod arbiter;
pub mod pose;
pub mod voice;

use serde::{Deserialize, Serialize};

// Re-export key types
pub use arbiter::{
    CaptureBackend, ControlArbiter, ControlError, ControlEvent, ControlEventKind, ControlSender,
    Key, NullCapture,
};
pub use pose::{
    Keypoint, KeypointKind, PoseGestureInterpreter, PoseOutcome, PoseSnapshot, PoseTrackingState,
};
pub use voice::VoiceCommand;

/// Input modality steering the agent.
///
/// Mutual exclusion invariant: activating one deactivates the other two's
/// underlying capture resources.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Modality {
    /// Directional keys (no capture resource)
    #[default]
    Keyboard,
    /// Spoken commands (microphone)
    Voice,
    /// Head-pose gestures (camera)
    Pose,
}

impl Modality {
    /// Whether this modality holds an external capture resource that must be
    /// started and torn down.
    #[inline]
    pub fn has_capture_resource(self) -> bool {
        !matches!(self, Modality::Keyboard)
    }
}
