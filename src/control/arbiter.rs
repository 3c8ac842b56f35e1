//! Control Arbitration
//!
//! Owns the single active input modality, enforces mutual exclusivity over
//! the collaborators' capture resources, and translates modality-specific
//! events into direction/motion commands.
//!
//! Events arrive through a single-consumer inbox that is drained once per
//! tick; each event is applied atomically and events from a non-active
//! modality are discarded. That filter also disposes of in-flight detection
//! results that complete after their modality was deactivated.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::control::pose::{PoseGestureInterpreter, PoseOutcome, PoseSnapshot};
use crate::control::voice::{self, VoiceCommand};
use crate::control::Modality;
use crate::game::events::GameEvent;
use crate::game::state::{Direction, GameState};

// =============================================================================
// ERRORS
// =============================================================================

/// Errors surfaced while switching modalities.
#[derive(Debug, Clone, Error)]
pub enum ControlError {
    /// The user denied the microphone/camera permission prompt.
    #[error("capture permission denied for {modality:?}")]
    PermissionDenied {
        /// Modality whose capture was refused
        modality: Modality,
    },

    /// The capture device could not be started.
    #[error("capture unavailable for {modality:?}: {reason}")]
    CaptureUnavailable {
        /// Modality whose capture failed
        modality: Modality,
        /// Collaborator-provided detail
        reason: String,
    },
}

// =============================================================================
// CAPTURE BACKEND
// =============================================================================

/// Startup/teardown contract for modality capture resources.
///
/// Implemented by the capture collaborator (microphone, camera). `stop` must
/// be immediate and idempotent; results already in flight when it returns are
/// discarded by the arbiter's modality filter.
pub trait CaptureBackend {
    /// Start capturing for a modality.
    fn start(&mut self, modality: Modality) -> Result<(), ControlError>;

    /// Stop capturing for a modality.
    fn stop(&mut self, modality: Modality);
}

/// Backend for sessions without live capture devices (demo, tests).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCapture;

impl CaptureBackend for NullCapture {
    fn start(&mut self, _modality: Modality) -> Result<(), ControlError> {
        Ok(())
    }

    fn stop(&mut self, _modality: Modality) {}
}

// =============================================================================
// CONTROL EVENTS
// =============================================================================

/// Raw key codes the engine understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    /// Up arrow
    ArrowUp,
    /// Down arrow
    ArrowDown,
    /// Left arrow
    ArrowLeft,
    /// Right arrow
    ArrowRight,
    /// W
    KeyW,
    /// A
    KeyA,
    /// S
    KeyS,
    /// D
    KeyD,
    /// Space bar (play/pause toggle)
    Space,
}

impl Key {
    /// Direction this key maps to, if any.
    pub fn direction(self) -> Option<Direction> {
        match self {
            Key::ArrowUp | Key::KeyW => Some(Direction::Up),
            Key::ArrowDown | Key::KeyS => Some(Direction::Down),
            Key::ArrowLeft | Key::KeyA => Some(Direction::Left),
            Key::ArrowRight | Key::KeyD => Some(Direction::Right),
            Key::Space => None,
        }
    }
}

/// Payload of a control event.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ControlEventKind {
    /// A key press
    Key(Key),
    /// A finalized, lower-cased speech transcript
    Transcript(String),
    /// A pose-estimation result
    PoseSnapshot(PoseSnapshot),
    /// A pose-estimation call failure
    PoseFailure {
        /// Collaborator-provided detail
        message: String,
    },
}

/// One event delivered by an input collaborator.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ControlEvent {
    /// Modality that produced the event
    pub source: Modality,
    /// Collaborator-injected timestamp in milliseconds
    pub at_ms: u64,
    /// Payload
    pub kind: ControlEventKind,
}

impl ControlEvent {
    /// Keyboard key press.
    pub fn key(at_ms: u64, key: Key) -> Self {
        Self {
            source: Modality::Keyboard,
            at_ms,
            kind: ControlEventKind::Key(key),
        }
    }

    /// Finalized voice transcript.
    pub fn transcript(at_ms: u64, text: impl Into<String>) -> Self {
        Self {
            source: Modality::Voice,
            at_ms,
            kind: ControlEventKind::Transcript(text.into()),
        }
    }

    /// Pose estimation result.
    pub fn pose_snapshot(at_ms: u64, snapshot: PoseSnapshot) -> Self {
        Self {
            source: Modality::Pose,
            at_ms,
            kind: ControlEventKind::PoseSnapshot(snapshot),
        }
    }

    /// Pose estimation failure.
    pub fn pose_failure(at_ms: u64, message: impl Into<String>) -> Self {
        Self {
            source: Modality::Pose,
            at_ms,
            kind: ControlEventKind::PoseFailure {
                message: message.into(),
            },
        }
    }
}

/// Clonable posting handle given to input collaborators.
///
/// Posting never blocks; events sent after the session is gone are dropped.
#[derive(Clone, Debug)]
pub struct ControlSender(mpsc::UnboundedSender<ControlEvent>);

impl ControlSender {
    /// Post an event into the arbiter's inbox.
    pub fn post(&self, event: ControlEvent) {
        let _ = self.0.send(event);
    }
}

// =============================================================================
// ARBITER
// =============================================================================

/// Arbitrates between the three input modalities.
pub struct ControlArbiter {
    active: Modality,
    tx: mpsc::UnboundedSender<ControlEvent>,
    rx: mpsc::UnboundedReceiver<ControlEvent>,
    pose: PoseGestureInterpreter,
}

impl Default for ControlArbiter {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlArbiter {
    /// Create an arbiter with Keyboard active.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            active: Modality::Keyboard,
            tx,
            rx,
            pose: PoseGestureInterpreter::new(),
        }
    }

    /// Handle for collaborators to post events.
    pub fn sender(&self) -> ControlSender {
        ControlSender(self.tx.clone())
    }

    /// Currently active modality.
    #[inline]
    pub fn active(&self) -> Modality {
        self.active
    }

    /// Pose interpreter (rate-limit queries and overlay state).
    pub fn pose(&self) -> &PoseGestureInterpreter {
        &self.pose
    }

    /// Make `modality` the active one.
    ///
    /// A different active modality is torn down first through the backend.
    /// Idempotent when already active. On a start failure the modality stays
    /// inactive and control reverts to Keyboard.
    pub fn activate(
        &mut self,
        modality: Modality,
        backend: &mut dyn CaptureBackend,
        state: &mut GameState,
    ) -> Result<(), ControlError> {
        if self.active == modality {
            return Ok(());
        }

        let previous = self.active;
        self.teardown(previous, backend);

        if modality.has_capture_resource() {
            if let Err(err) = backend.start(modality) {
                warn!(?modality, %err, "capture start failed, staying on keyboard");
                self.active = Modality::Keyboard;
                if previous != Modality::Keyboard {
                    state.push_event(GameEvent::modality_changed(
                        state.tick,
                        previous,
                        Modality::Keyboard,
                    ));
                }
                return Err(err);
            }
            if modality == Modality::Pose {
                self.pose.reset();
            }
        }

        info!(from = ?previous, to = ?modality, "control modality activated");
        self.active = modality;
        state.push_event(GameEvent::modality_changed(state.tick, previous, modality));
        Ok(())
    }

    /// Deactivate `modality`, reverting to Keyboard.
    ///
    /// Only effective if `modality` is currently active.
    pub fn deactivate(
        &mut self,
        modality: Modality,
        backend: &mut dyn CaptureBackend,
        state: &mut GameState,
    ) {
        if self.active != modality || modality == Modality::Keyboard {
            return;
        }

        self.teardown(modality, backend);
        info!(from = ?modality, "control modality deactivated, keyboard active");
        self.active = Modality::Keyboard;
        state.push_event(GameEvent::modality_changed(
            state.tick,
            modality,
            Modality::Keyboard,
        ));
    }

    fn teardown(&mut self, modality: Modality, backend: &mut dyn CaptureBackend) {
        if modality.has_capture_resource() {
            backend.stop(modality);
        }
        if modality == Modality::Pose {
            self.pose.reset();
        }
    }

    /// Drain the inbox, applying every pending event atomically.
    ///
    /// Called once per tick before the simulation step so control state is
    /// settled when movement reads it.
    pub fn drain(&mut self, state: &mut GameState, backend: &mut dyn CaptureBackend) {
        while let Ok(event) = self.rx.try_recv() {
            if event.source != self.active {
                debug!(source = ?event.source, active = ?self.active, "discarding event from inactive modality");
                continue;
            }
            self.apply(event, state, backend);
        }
    }

    fn apply(
        &mut self,
        event: ControlEvent,
        state: &mut GameState,
        backend: &mut dyn CaptureBackend,
    ) {
        match event.kind {
            ControlEventKind::Key(key) => self.apply_key(key, state),
            ControlEventKind::Transcript(text) => self.apply_transcript(&text, state),
            ControlEventKind::PoseSnapshot(snapshot) => {
                self.apply_pose(&snapshot, event.at_ms, state, backend)
            }
            ControlEventKind::PoseFailure { message } => {
                warn!(%message, "pose estimation failed, retrying after backoff");
                self.pose.record_failure(event.at_ms);
            }
        }
    }

    fn apply_key(&mut self, key: Key, state: &mut GameState) {
        match key.direction() {
            Some(direction) => {
                // Direction keys always register; they only show while Running
                self.command_direction(state, direction, Modality::Keyboard)
            }
            None => state.toggle_play(),
        }
    }

    fn apply_transcript(&mut self, text: &str, state: &mut GameState) {
        let Some(command) = voice::parse_transcript(text) else {
            debug!(transcript = text, "unrecognized voice command");
            return;
        };

        match command {
            VoiceCommand::Start => state.start(),
            VoiceCommand::Pause => state.pause(),
            VoiceCommand::Resume => state.resume(),
            VoiceCommand::Halt => {
                state.agent.is_moving = false;
                let tick = state.tick;
                state.push_event(GameEvent::motion_stopped(tick, Modality::Voice));
            }
            VoiceCommand::Move(direction) => {
                if state.phase.is_running() {
                    self.command_direction(state, direction, Modality::Voice);
                }
            }
        }
    }

    fn apply_pose(
        &mut self,
        snapshot: &PoseSnapshot,
        at_ms: u64,
        state: &mut GameState,
        backend: &mut dyn CaptureBackend,
    ) {
        let gestures_enabled = state.phase.is_running();
        match self.pose.interpret(snapshot, at_ms, gestures_enabled) {
            PoseOutcome::Command(direction) => {
                self.command_direction(state, direction, Modality::Pose)
            }
            PoseOutcome::ExitToKeyboard => {
                warn!("face stayed too small, leaving pose control");
                self.deactivate(Modality::Pose, backend, state);
            }
            PoseOutcome::None => {}
        }
    }

    /// Apply a direction command from `source`.
    ///
    /// Keyboard keeps the original toggle rule: a repeat of the current
    /// direction flips `is_moving` instead of being a no-op. Voice and pose
    /// always force motion.
    fn command_direction(&mut self, state: &mut GameState, direction: Direction, source: Modality) {
        let agent = &mut state.agent;
        match source {
            Modality::Keyboard => {
                if agent.direction != direction {
                    agent.direction = direction;
                    agent.is_moving = true;
                } else {
                    agent.is_moving = !agent.is_moving;
                }
            }
            Modality::Voice | Modality::Pose => {
                agent.direction = direction;
                agent.is_moving = true;
            }
        }

        let tick = state.tick;
        state.push_event(GameEvent::direction_commanded(tick, direction, source));
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::pose;
    use crate::core::vec2::Vec2;
    use crate::game::state::{AgentState, GamePhase};

    /// Backend that records start/stop calls and can deny starts.
    #[derive(Default)]
    struct RecordingBackend {
        calls: Vec<(&'static str, Modality)>,
        deny: Option<Modality>,
    }

    impl CaptureBackend for RecordingBackend {
        fn start(&mut self, modality: Modality) -> Result<(), ControlError> {
            self.calls.push(("start", modality));
            if self.deny == Some(modality) {
                return Err(ControlError::PermissionDenied { modality });
            }
            Ok(())
        }

        fn stop(&mut self, modality: Modality) {
            self.calls.push(("stop", modality));
        }
    }

    fn running_state() -> GameState {
        let mut state = GameState::new(400.0, 400.0, 40.0, AgentState::DEFAULT_SPEED);
        state.start();
        state.take_events();
        state
    }

    fn face_snapshot(center: Vec2) -> PoseSnapshot {
        let kp = |kind, dx: f32| pose::Keypoint {
            kind,
            position: Vec2::new(center.x + dx, center.y),
            score: 0.9,
        };
        PoseSnapshot {
            score: 0.9,
            keypoints: vec![
                kp(pose::KeypointKind::Nose, 0.0),
                kp(pose::KeypointKind::LeftEye, -10.0),
                kp(pose::KeypointKind::RightEye, 10.0),
                kp(pose::KeypointKind::LeftEar, -120.0),
                kp(pose::KeypointKind::RightEar, 120.0),
            ],
        }
    }

    /// Face snapshot whose raw radius stays below the proximity threshold.
    fn small_face_snapshot() -> PoseSnapshot {
        let center = pose::FRAME_CENTER;
        let kp = |kind, dx: f32| pose::Keypoint {
            kind,
            position: Vec2::new(center.x + dx, center.y),
            score: 0.9,
        };
        PoseSnapshot {
            score: 0.9,
            keypoints: vec![
                kp(pose::KeypointKind::Nose, 0.0),
                kp(pose::KeypointKind::LeftEye, -5.0),
                kp(pose::KeypointKind::RightEye, 5.0),
                kp(pose::KeypointKind::LeftEar, -60.0),
                kp(pose::KeypointKind::RightEar, 60.0),
            ],
        }
    }

    #[test]
    fn test_keyboard_active_by_default() {
        let arbiter = ControlArbiter::new();
        assert_eq!(arbiter.active(), Modality::Keyboard);
    }

    #[test]
    fn test_activation_is_mutually_exclusive() {
        let mut arbiter = ControlArbiter::new();
        let mut backend = RecordingBackend::default();
        let mut state = running_state();

        arbiter
            .activate(Modality::Voice, &mut backend, &mut state)
            .unwrap();
        assert_eq!(arbiter.active(), Modality::Voice);
        assert_eq!(backend.calls, vec![("start", Modality::Voice)]);

        // Switching to pose tears down voice first
        arbiter
            .activate(Modality::Pose, &mut backend, &mut state)
            .unwrap();
        assert_eq!(arbiter.active(), Modality::Pose);
        assert_eq!(
            backend.calls,
            vec![
                ("start", Modality::Voice),
                ("stop", Modality::Voice),
                ("start", Modality::Pose),
            ]
        );
    }

    #[test]
    fn test_activation_idempotent() {
        let mut arbiter = ControlArbiter::new();
        let mut backend = RecordingBackend::default();
        let mut state = running_state();

        arbiter
            .activate(Modality::Pose, &mut backend, &mut state)
            .unwrap();
        let calls = backend.calls.len();

        arbiter
            .activate(Modality::Pose, &mut backend, &mut state)
            .unwrap();
        assert_eq!(backend.calls.len(), calls);
    }

    #[test]
    fn test_permission_denial_falls_back_to_keyboard() {
        let mut arbiter = ControlArbiter::new();
        let mut backend = RecordingBackend {
            deny: Some(Modality::Pose),
            ..Default::default()
        };
        let mut state = running_state();

        arbiter
            .activate(Modality::Voice, &mut backend, &mut state)
            .unwrap();

        let err = arbiter
            .activate(Modality::Pose, &mut backend, &mut state)
            .unwrap_err();
        assert!(matches!(err, ControlError::PermissionDenied { .. }));
        assert_eq!(arbiter.active(), Modality::Keyboard);
    }

    #[test]
    fn test_deactivate_only_when_active() {
        let mut arbiter = ControlArbiter::new();
        let mut backend = RecordingBackend::default();
        let mut state = running_state();

        // Not active: no-op
        arbiter.deactivate(Modality::Voice, &mut backend, &mut state);
        assert!(backend.calls.is_empty());

        arbiter
            .activate(Modality::Voice, &mut backend, &mut state)
            .unwrap();
        arbiter.deactivate(Modality::Voice, &mut backend, &mut state);
        assert_eq!(arbiter.active(), Modality::Keyboard);
        assert_eq!(
            backend.calls,
            vec![("start", Modality::Voice), ("stop", Modality::Voice)]
        );
    }

    #[test]
    fn test_events_from_inactive_modality_discarded() {
        let mut arbiter = ControlArbiter::new();
        let mut backend = NullCapture;
        let mut state = running_state();

        // Keyboard is active; a voice command must not reach the state
        arbiter
            .sender()
            .post(ControlEvent::transcript(0, "pause"));
        arbiter.drain(&mut state, &mut backend);

        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_results_after_deactivation_discarded() {
        let mut arbiter = ControlArbiter::new();
        let mut backend = RecordingBackend::default();
        let mut state = running_state();

        arbiter
            .activate(Modality::Pose, &mut backend, &mut state)
            .unwrap();
        let sender = arbiter.sender();

        // In-flight detection completes after teardown
        arbiter.deactivate(Modality::Pose, &mut backend, &mut state);
        sender.post(ControlEvent::pose_snapshot(
            0,
            face_snapshot(Vec2::new(pose::FRAME_CENTER.x + 100.0, pose::FRAME_CENTER.y)),
        ));
        arbiter.drain(&mut state, &mut backend);

        assert!(!state.agent.is_moving);
    }

    #[test]
    fn test_key_changes_direction_and_starts_motion() {
        let mut arbiter = ControlArbiter::new();
        let mut backend = NullCapture;
        let mut state = running_state();

        arbiter.sender().post(ControlEvent::key(0, Key::ArrowUp));
        arbiter.drain(&mut state, &mut backend);

        assert_eq!(state.agent.direction, Direction::Up);
        assert!(state.agent.is_moving);
    }

    #[test]
    fn test_same_direction_key_toggles_motion() {
        let mut arbiter = ControlArbiter::new();
        let mut backend = NullCapture;
        let mut state = running_state();

        let press = |arbiter: &mut ControlArbiter, state: &mut GameState, backend: &mut NullCapture| {
            arbiter.sender().post(ControlEvent::key(0, Key::ArrowUp));
            arbiter.drain(state, backend);
        };

        press(&mut arbiter, &mut state, &mut backend);
        assert_eq!(state.agent.direction, Direction::Up);
        assert!(state.agent.is_moving);

        // Repeat of the current direction: stop in place
        press(&mut arbiter, &mut state, &mut backend);
        assert_eq!(state.agent.direction, Direction::Up);
        assert!(!state.agent.is_moving);

        // And again: resume
        press(&mut arbiter, &mut state, &mut backend);
        assert_eq!(state.agent.direction, Direction::Up);
        assert!(state.agent.is_moving);
    }

    #[test]
    fn test_wasd_aliases() {
        let mut arbiter = ControlArbiter::new();
        let mut backend = NullCapture;
        let mut state = running_state();

        arbiter.sender().post(ControlEvent::key(0, Key::KeyA));
        arbiter.drain(&mut state, &mut backend);
        assert_eq!(state.agent.direction, Direction::Left);
    }

    #[test]
    fn test_space_toggles_play() {
        let mut arbiter = ControlArbiter::new();
        let mut backend = NullCapture;
        let mut state = running_state();

        arbiter.sender().post(ControlEvent::key(0, Key::Space));
        arbiter.drain(&mut state, &mut backend);
        assert_eq!(state.phase, GamePhase::Paused);

        arbiter.sender().post(ControlEvent::key(0, Key::Space));
        arbiter.drain(&mut state, &mut backend);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_direction_keys_register_while_paused() {
        let mut arbiter = ControlArbiter::new();
        let mut backend = NullCapture;
        let mut state = running_state();
        state.pause();

        arbiter.sender().post(ControlEvent::key(0, Key::ArrowDown));
        arbiter.drain(&mut state, &mut backend);

        // Direction and motion flag register; movement stays gated by phase
        assert_eq!(state.agent.direction, Direction::Down);
        assert!(state.agent.is_moving);
        assert_eq!(state.phase, GamePhase::Paused);
    }

    #[test]
    fn test_voice_lifecycle_commands() {
        let mut arbiter = ControlArbiter::new();
        let mut backend = NullCapture;
        let mut state = running_state();

        arbiter
            .activate(Modality::Voice, &mut backend, &mut state)
            .unwrap();

        arbiter.sender().post(ControlEvent::transcript(0, "暂停"));
        arbiter.drain(&mut state, &mut backend);
        assert_eq!(state.phase, GamePhase::Paused);

        arbiter.sender().post(ControlEvent::transcript(0, "resume"));
        arbiter.drain(&mut state, &mut backend);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_voice_direction_forces_motion() {
        let mut arbiter = ControlArbiter::new();
        let mut backend = NullCapture;
        let mut state = running_state();

        arbiter
            .activate(Modality::Voice, &mut backend, &mut state)
            .unwrap();

        // Repeated same-direction voice commands keep the agent moving
        for _ in 0..2 {
            arbiter.sender().post(ControlEvent::transcript(0, "left"));
            arbiter.drain(&mut state, &mut backend);
            assert_eq!(state.agent.direction, Direction::Left);
            assert!(state.agent.is_moving);
        }
    }

    #[test]
    fn test_voice_direction_ignored_unless_running() {
        let mut arbiter = ControlArbiter::new();
        let mut backend = NullCapture;
        let mut state = running_state();
        state.pause();

        arbiter
            .activate(Modality::Voice, &mut backend, &mut state)
            .unwrap();
        arbiter.sender().post(ControlEvent::transcript(0, "up"));
        arbiter.drain(&mut state, &mut backend);

        assert_eq!(state.agent.direction, Direction::Right);
        assert!(!state.agent.is_moving);
    }

    #[test]
    fn test_voice_halt_stops_motion() {
        let mut arbiter = ControlArbiter::new();
        let mut backend = NullCapture;
        let mut state = running_state();
        state.agent.is_moving = true;

        arbiter
            .activate(Modality::Voice, &mut backend, &mut state)
            .unwrap();
        arbiter.sender().post(ControlEvent::transcript(0, "停"));
        arbiter.drain(&mut state, &mut backend);

        assert!(!state.agent.is_moving);
    }

    #[test]
    fn test_pose_snapshot_commands_direction() {
        let mut arbiter = ControlArbiter::new();
        let mut backend = NullCapture;
        let mut state = running_state();

        arbiter
            .activate(Modality::Pose, &mut backend, &mut state)
            .unwrap();

        // Face left of frame center: mirrored capture means travel Right
        arbiter.sender().post(ControlEvent::pose_snapshot(
            0,
            face_snapshot(Vec2::new(pose::FRAME_CENTER.x - 100.0, pose::FRAME_CENTER.y)),
        ));
        arbiter.drain(&mut state, &mut backend);

        assert_eq!(state.agent.direction, Direction::Right);
        assert!(state.agent.is_moving);
    }

    #[test]
    fn test_pose_safety_exit_reverts_to_keyboard() {
        let mut arbiter = ControlArbiter::new();
        let mut backend = RecordingBackend::default();
        let mut state = running_state();

        arbiter
            .activate(Modality::Pose, &mut backend, &mut state)
            .unwrap();
        state.take_events();

        let sender = arbiter.sender();
        for t in [0u64, 1100, 2200, 3300, 4400] {
            sender.post(ControlEvent::pose_snapshot(t, small_face_snapshot()));
        }
        arbiter.drain(&mut state, &mut backend);

        assert_eq!(arbiter.active(), Modality::Keyboard);
        assert!(backend.calls.contains(&("stop", Modality::Pose)));
        assert!(!state.take_events().is_empty());
    }

    #[test]
    fn test_pose_failure_schedules_backoff() {
        let mut arbiter = ControlArbiter::new();
        let mut backend = NullCapture;
        let mut state = running_state();

        arbiter
            .activate(Modality::Pose, &mut backend, &mut state)
            .unwrap();
        arbiter
            .sender()
            .post(ControlEvent::pose_failure(5000, "estimator crashed"));
        arbiter.drain(&mut state, &mut backend);

        assert!(!arbiter.pose().detection_due(5500));
        assert!(arbiter.pose().detection_due(6000));
        // The failure never disturbs the game
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_drain_applies_events_in_arrival_order() {
        let mut arbiter = ControlArbiter::new();
        let mut backend = NullCapture;
        let mut state = running_state();

        let sender = arbiter.sender();
        sender.post(ControlEvent::key(0, Key::ArrowUp));
        sender.post(ControlEvent::key(1, Key::ArrowUp));
        arbiter.drain(&mut state, &mut backend);

        // Two presses of the same direction: started then toggled off
        assert!(!state.agent.is_moving);
        assert_eq!(state.agent.direction, Direction::Up);
    }
}
