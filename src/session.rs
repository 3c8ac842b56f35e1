//! Game Session
//!
//! Facade owning the simulation state, the control arbiter and the capture
//! backend. The embedding drives it with `tick()` from whatever scheduling
//! primitive it has (timer, game loop, test harness); collaborators post
//! events through `control_sender()`; the renderer reads `snapshot()`.

use serde::Serialize;
use tracing::{debug, info};

use crate::config::{EngineConfig, GridDensity};
use crate::control::arbiter::{
    CaptureBackend, ControlArbiter, ControlError, ControlSender, NullCapture,
};
use crate::control::{Modality, PoseTrackingState};
use crate::core::rng::DeterministicRng;
use crate::core::vec2::Vec2;
use crate::game::events::GameEvent;
use crate::game::movement;
use crate::game::state::{Direction, GamePhase, GameState};
use crate::game::tick::{self, TickResult};

// =============================================================================
// RENDER SNAPSHOT
// =============================================================================

/// Read-only view of the agent for the rendering collaborator.
#[derive(Debug, Clone, Serialize)]
pub struct AgentView {
    /// Position X
    pub x: f32,
    /// Position Y
    pub y: f32,
    /// Body radius
    pub radius: f32,
    /// Facing direction
    pub direction: Direction,
    /// Mouth animation phase
    pub mouth_phase: f32,
    /// Whether the agent is moving
    pub is_moving: bool,
    /// Configured color (cosmetic passthrough)
    pub color: String,
}

/// Read-only view of one session for the rendering collaborator.
///
/// The engine never pushes draw calls; this is the entire render contract.
#[derive(Debug, Clone, Serialize)]
pub struct RenderSnapshot {
    /// Lifecycle phase
    pub phase: GamePhase,
    /// Agent view
    pub agent: AgentView,
    /// Live target positions
    pub targets: Vec<Vec2>,
    /// Consumed target count
    pub eaten: usize,
    /// Denominator snapshot
    pub total: usize,
    /// Completion percentage, one decimal place
    pub progress_percent: f32,
    /// Active input modality
    pub modality: Modality,
    /// Density preset label
    pub density: &'static str,
    /// Pose tracking state for the debug overlay
    pub pose: PoseTrackingState,
}

// =============================================================================
// SESSION
// =============================================================================

/// One interactive session of the engine.
pub struct GameSession {
    state: GameState,
    arbiter: ControlArbiter,
    config: EngineConfig,
    rng: DeterministicRng,
    backend: Box<dyn CaptureBackend>,
}

impl GameSession {
    /// Create a session with the given capture backend.
    ///
    /// `seed` drives field regeneration, keeping density changes
    /// reproducible.
    pub fn new(config: EngineConfig, seed: u64, backend: Box<dyn CaptureBackend>) -> Self {
        let state = GameState::new(
            config.surface_width,
            config.surface_height,
            config.density.spacing(),
            config.speed,
        );

        Self {
            state,
            arbiter: ControlArbiter::new(),
            config,
            rng: DeterministicRng::new(seed),
            backend,
        }
    }

    /// Create a session without live capture devices (demo, tests).
    pub fn with_null_capture(config: EngineConfig, seed: u64) -> Self {
        Self::new(config, seed, Box::new(NullCapture))
    }

    // -------------------------------------------------------------------------
    // Tick path
    // -------------------------------------------------------------------------

    /// Advance one frame: drain pending control events, then simulate.
    ///
    /// Never blocks; slow external work (speech, pose inference) happens in
    /// the collaborators and lands here as events.
    pub fn tick(&mut self) -> TickResult {
        self.arbiter.drain(&mut self.state, self.backend.as_mut());
        tick::run(&mut self.state)
    }

    // -------------------------------------------------------------------------
    // Control surface
    // -------------------------------------------------------------------------

    /// Handle for input collaborators to post events.
    pub fn control_sender(&self) -> ControlSender {
        self.arbiter.sender()
    }

    /// Make `modality` the active input source.
    pub fn activate_modality(&mut self, modality: Modality) -> Result<(), ControlError> {
        self.arbiter
            .activate(modality, self.backend.as_mut(), &mut self.state)
    }

    /// Deactivate `modality`, reverting to keyboard.
    pub fn deactivate_modality(&mut self, modality: Modality) {
        self.arbiter
            .deactivate(modality, self.backend.as_mut(), &mut self.state);
    }

    /// Currently active input modality.
    pub fn active_modality(&self) -> Modality {
        self.arbiter.active()
    }

    /// Whether the pose collaborator should run a detection now.
    pub fn pose_detection_due(&self, now_ms: u64) -> bool {
        self.arbiter.pose().detection_due(now_ms)
    }

    // -------------------------------------------------------------------------
    // UI plumbing
    // -------------------------------------------------------------------------

    /// Play/pause toggle.
    pub fn toggle_play(&mut self) {
        self.state.toggle_play();
    }

    /// Explicit restart: reset agent and field, enter Running.
    pub fn restart(&mut self) {
        info!("session restart");
        self.state.restart();
    }

    /// Reconfigure agent speed; applied instantly.
    ///
    /// A moving agent gets one grid re-snap step on both axes so the new
    /// step size continues from a grid-consistent position.
    pub fn set_speed(&mut self, speed: f32) {
        let speed = speed.max(0.0);
        debug!(speed, "speed reconfigured");
        self.config.speed = speed;
        self.state.agent.speed = speed;

        if self.state.agent.is_moving {
            movement::resnap(&mut self.state.agent, self.state.field.spacing());
        }
    }

    /// Reconfigure grid density; the field regenerates immediately,
    /// preserving the completion ratio.
    pub fn set_density(&mut self, density: GridDensity) {
        self.config.density = density;
        let spacing = density.spacing();
        self.state
            .field
            .regenerate(spacing, self.state.width, self.state.height, &mut self.rng);

        info!(
            density = density.label(),
            remaining = self.state.field.remaining(),
            "field regenerated"
        );
        let event = GameEvent::field_regenerated(
            self.state.tick,
            spacing,
            self.state.field.remaining(),
            self.state.field.initial_count(),
        );
        self.state.push_event(event);
    }

    /// Reconfigure the agent color. Cosmetic only; validation belongs to the
    /// rendering collaborator.
    pub fn set_agent_color(&mut self, color: impl Into<String>) {
        self.config.agent_color = color.into();
    }

    // -------------------------------------------------------------------------
    // Read access
    // -------------------------------------------------------------------------

    /// Current lifecycle phase.
    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Full simulation state (tests, advanced embeddings).
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Current configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Plain read snapshot for the rendering collaborator.
    pub fn snapshot(&self) -> RenderSnapshot {
        let agent = &self.state.agent;
        RenderSnapshot {
            phase: self.state.phase,
            agent: AgentView {
                x: agent.position.x,
                y: agent.position.y,
                radius: agent.radius,
                direction: agent.direction,
                mouth_phase: agent.mouth_phase,
                is_moving: agent.is_moving,
                color: self.config.agent_color.clone(),
            },
            targets: self
                .state
                .field
                .targets()
                .iter()
                .map(|t| t.position)
                .collect(),
            eaten: self.state.field.eaten(),
            total: self.state.field.initial_count(),
            progress_percent: self.state.field.progress_percent(),
            modality: self.arbiter.active(),
            density: self.config.density.label(),
            pose: self.arbiter.pose().tracking().clone(),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
