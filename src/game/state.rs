//! Game State Definitions
//!
//! Agent, phase machine and aggregate session state.

use serde::{Deserialize, Serialize};

use crate::core::vec2::Vec2;
use crate::game::events::GameEvent;
use crate::game::field::GridField;

// =============================================================================
// DIRECTION
// =============================================================================

/// Cardinal facing/travel direction of the agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum Direction {
    /// +X travel
    #[default]
    Right = 0,
    /// +Y travel
    Down = 1,
    /// -X travel
    Left = 2,
    /// -Y travel
    Up = 3,
}

impl Direction {
    /// True if travel happens along the X axis.
    #[inline]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::Right | Direction::Left)
    }

    /// Sign of the travel-axis step (+1 for Right/Down, -1 for Left/Up).
    #[inline]
    pub fn step_sign(self) -> f32 {
        match self {
            Direction::Right | Direction::Down => 1.0,
            Direction::Left | Direction::Up => -1.0,
        }
    }

    /// Get direction from index (0-3).
    pub fn from_index(index: u8) -> Option<Direction> {
        match index {
            0 => Some(Direction::Right),
            1 => Some(Direction::Down),
            2 => Some(Direction::Left),
            3 => Some(Direction::Up),
            _ => None,
        }
    }
}

// =============================================================================
// AGENT STATE
// =============================================================================

/// State of the single on-surface agent.
///
/// Mutated by the movement step each tick and by the control arbiter
/// (direction / `is_moving` only).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentState {
    /// Current position on the surface
    pub position: Vec2,

    /// Body radius (also the boundary clamp margin)
    pub radius: f32,

    /// Scalar speed per tick (externally configurable)
    pub speed: f32,

    /// Current facing/travel direction
    pub direction: Direction,

    /// Mouth animation phase, periodic in [0, pi). Cosmetic but deterministic.
    pub mouth_phase: f32,

    /// Whether the agent advances on the next tick
    pub is_moving: bool,
}

impl AgentState {
    /// Default body radius
    pub const RADIUS: f32 = 15.0;

    /// Default per-tick speed
    pub const DEFAULT_SPEED: f32 = 2.0;

    /// Create an agent at rest at the given position.
    pub fn new(position: Vec2, speed: f32) -> Self {
        Self {
            position,
            radius: Self::RADIUS,
            speed,
            direction: Direction::Right,
            mouth_phase: 0.0,
            is_moving: false,
        }
    }
}

// =============================================================================
// GAME PHASE
// =============================================================================

/// Lifecycle phase of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GamePhase {
    /// Before the first start
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Suspended, resumable
    Paused,
    /// All targets consumed. Terminal except for an explicit restart.
    Victory,
}

impl GamePhase {
    /// True while gameplay is active.
    #[inline]
    pub fn is_running(self) -> bool {
        matches!(self, GamePhase::Running)
    }
}

// =============================================================================
// GAME STATE
// =============================================================================

/// Complete mutable state of one session.
///
/// All mutation happens on the tick path or through the arbiter's
/// atomically-applied control events; there is no interior concurrency.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    /// Current lifecycle phase
    pub phase: GamePhase,

    /// The agent
    pub agent: AgentState,

    /// Consumable target field
    pub field: GridField,

    /// Tick counter, advanced only while Running
    pub tick: u32,

    /// Surface width in logical units
    pub width: f32,

    /// Surface height in logical units
    pub height: f32,

    /// Events generated since the last drain (cleared each tick)
    #[serde(skip)]
    pending_events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session state with a freshly generated field.
    ///
    /// The agent spawns at rest in the surface center; targets are laid out
    /// immediately so the field is visible before the first start.
    pub fn new(width: f32, height: f32, spacing: f32, speed: f32) -> Self {
        let mut field = GridField::new(spacing);
        field.generate(spacing, width, height);

        Self {
            phase: GamePhase::Idle,
            agent: AgentState::new(Vec2::new(width / 2.0, height / 2.0), speed),
            field,
            tick: 0,
            width,
            height,
            pending_events: Vec::new(),
        }
    }

    /// Start (or restart) gameplay: regenerate the full field and run.
    ///
    /// Legal from every phase because it is a reset; this is also how an
    /// explicit restart leaves Victory.
    pub fn start(&mut self) {
        let spacing = self.field.spacing();
        self.field.generate(spacing, self.width, self.height);
        self.transition(GamePhase::Running);
    }

    /// Suspend gameplay. Only effective while Running.
    pub fn pause(&mut self) {
        if self.phase == GamePhase::Running {
            self.agent.is_moving = false;
            self.transition(GamePhase::Paused);
        }
    }

    /// Resume gameplay. Only effective while Paused.
    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.transition(GamePhase::Running);
        }
    }

    /// Dispatch the play/pause toggle: Idle starts, Running pauses,
    /// Paused resumes. No transition is defined out of Victory.
    pub fn toggle_play(&mut self) {
        match self.phase {
            GamePhase::Idle => self.start(),
            GamePhase::Running => self.pause(),
            GamePhase::Paused => self.resume(),
            GamePhase::Victory => {}
        }
    }

    /// Enter the terminal Victory phase. Only reachable from Running.
    pub fn declare_victory(&mut self) {
        if self.phase == GamePhase::Running {
            self.agent.is_moving = false;
            self.transition(GamePhase::Victory);
            self.push_event(GameEvent::victory_achieved(self.tick));
        }
    }

    /// Reset the agent and field, then start again.
    pub fn restart(&mut self) {
        let speed = self.agent.speed;
        self.agent = AgentState::new(Vec2::new(self.width / 2.0, self.height / 2.0), speed);
        self.start();
    }

    fn transition(&mut self, to: GamePhase) {
        let from = self.phase;
        self.phase = to;
        self.push_event(GameEvent::phase_changed(self.tick, from, to));
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Push a game event.
    pub fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }
}

// =============================================================================
// TESTS
// =============================================================================
