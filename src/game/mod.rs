//! Game Logic Module
//!
//! Deterministic simulation: field layout, movement integration, capture
//! resolution and the lifecycle phase machine.
//!
//! ## Module Structure
//!
//! - `state`: agent, phase machine, aggregate session state
//! - `field`: target grid generation and regeneration
//! - `movement`: per-tick integration with grid-snap easing
//! - `collision`: capture resolution, progress, victory
//! - `tick`: per-frame orchestration
//! - `events`: ordered game events

pub mod collision;
pub mod events;
pub mod field;
pub mod movement;
pub mod state;
pub mod tick;

// Re-export key types
pub use events::{GameEvent, GameEventData};
pub use field::{GridField, Target};
pub use state::{AgentState, Direction, GamePhase, GameState};
pub use tick::TickResult;
