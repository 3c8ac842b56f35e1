//! Game Events
//!
//! Events generated during a tick, ordered for deterministic consumption.

use serde::{Deserialize, Serialize};

use crate::control::Modality;
use crate::core::vec2::Vec2;
use crate::game::state::{Direction, GamePhase};

/// Priority for event processing order.
///
/// Lower value = processed first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum EventPriority {
    /// Lifecycle transitions first
    PhaseChange = 0,
    /// Then consumption
    Consumption = 1,
    /// Then progress updates
    Progress = 2,
    /// Then control-surface changes
    Control = 3,
    /// Lowest priority
    Other = 255,
}

/// Game event data.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum GameEventData {
    /// Lifecycle phase changed
    PhaseChanged {
        /// Previous phase
        from: GamePhase,
        /// New phase
        to: GamePhase,
    },

    /// All targets consumed
    VictoryAchieved,

    /// A target was consumed
    TargetConsumed {
        /// Where the target sat
        position: Vec2,
        /// Targets left after removal
        remaining: usize,
    },

    /// Completion progress advanced
    ProgressChanged {
        /// Consumed target count
        eaten: usize,
        /// Denominator snapshot
        total: usize,
        /// Percentage, one decimal place
        percent: f32,
    },

    /// Active input modality changed
    ModalityChanged {
        /// Previous modality
        from: Modality,
        /// New modality
        to: Modality,
    },

    /// A direction command was applied to the agent
    DirectionCommanded {
        /// Commanded direction
        direction: Direction,
        /// Modality that issued it
        source: Modality,
    },

    /// The agent was halted in place
    MotionStopped {
        /// Modality that issued it
        source: Modality,
    },

    /// The field was rebuilt at a new pitch
    FieldRegenerated {
        /// New grid pitch
        spacing: f32,
        /// Targets left after ratio restoration
        remaining: usize,
        /// New denominator snapshot
        initial: usize,
    },
}

/// A game event with timing and priority.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick when event occurred
    pub tick: u32,

    /// Processing priority
    pub priority: EventPriority,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u32, priority: EventPriority, data: GameEventData) -> Self {
        Self {
            tick,
            priority,
            data,
        }
    }

    /// Create phase changed event.
    pub fn phase_changed(tick: u32, from: GamePhase, to: GamePhase) -> Self {
        Self::new(
            tick,
            EventPriority::PhaseChange,
            GameEventData::PhaseChanged { from, to },
        )
    }

    /// Create victory event.
    pub fn victory_achieved(tick: u32) -> Self {
        Self::new(tick, EventPriority::PhaseChange, GameEventData::VictoryAchieved)
    }

    /// Create target consumed event.
    pub fn target_consumed(tick: u32, position: Vec2, remaining: usize) -> Self {
        Self::new(
            tick,
            EventPriority::Consumption,
            GameEventData::TargetConsumed {
                position,
                remaining,
            },
        )
    }

    /// Create progress changed event.
    pub fn progress_changed(tick: u32, eaten: usize, total: usize, percent: f32) -> Self {
        Self::new(
            tick,
            EventPriority::Progress,
            GameEventData::ProgressChanged {
                eaten,
                total,
                percent,
            },
        )
    }

    /// Create modality changed event.
    pub fn modality_changed(tick: u32, from: Modality, to: Modality) -> Self {
        Self::new(
            tick,
            EventPriority::Control,
            GameEventData::ModalityChanged { from, to },
        )
    }

    /// Create direction commanded event.
    pub fn direction_commanded(tick: u32, direction: Direction, source: Modality) -> Self {
        Self::new(
            tick,
            EventPriority::Control,
            GameEventData::DirectionCommanded { direction, source },
        )
    }

    /// Create motion stopped event.
    pub fn motion_stopped(tick: u32, source: Modality) -> Self {
        Self::new(tick, EventPriority::Control, GameEventData::MotionStopped { source })
    }

    /// Create field regenerated event.
    pub fn field_regenerated(tick: u32, spacing: f32, remaining: usize, initial: usize) -> Self {
        Self::new(
            tick,
            EventPriority::Other,
            GameEventData::FieldRegenerated {
                spacing,
                remaining,
                initial,
            },
        )
    }
}

impl PartialEq for GameEvent {
    fn eq(&self, other: &Self) -> bool {
        self.tick == other.tick && self.priority == other.priority
    }
}

impl Eq for GameEvent {}

impl PartialOrd for GameEvent {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GameEvent {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Sort by: tick, then priority
        self.tick
            .cmp(&other.tick)
            .then(self.priority.cmp(&other.priority))
    }
}
