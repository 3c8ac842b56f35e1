//! # Muncher Engine
//!
//! Real-time movement and multi-modal control-arbitration engine for a
//! single-agent, grid-target consumption game.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      MUNCHER ENGINE                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── vec2.rs     - Real-valued 2D vector                     │
//! │  └── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │                                                              │
//! │  game/           - Simulation (tick-driven)                  │
//! │  ├── state.rs    - Agent, phase machine, session state       │
//! │  ├── field.rs    - Target grid generation/regeneration       │
//! │  ├── movement.rs - Integration with grid-snap easing         │
//! │  ├── collision.rs- Capture resolution, progress, victory     │
//! │  ├── tick.rs     - Per-frame orchestration                   │
//! │  └── events.rs   - Ordered game events                       │
//! │                                                              │
//! │  control/        - Input arbitration (event-driven)          │
//! │  ├── arbiter.rs  - Modality exclusivity, event inbox         │
//! │  ├── voice.rs    - Transcript to command mapping             │
//! │  └── pose.rs     - Keypoint stream to gesture commands       │
//! │                                                              │
//! │  config.rs       - Speed, density presets, color             │
//! │  session.rs      - Facade + render snapshots                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Execution Model
//!
//! A single logical thread drives the engine through `GameSession::tick`,
//! one call per display refresh. Input collaborators (keyboard wiring,
//! speech-to-text, pose estimation) run elsewhere and post typed events into
//! the arbiter's inbox through a [`control::ControlSender`]; the inbox is
//! drained at the start of each tick, so every event is applied atomically
//! before the simulation reads control state. Nothing on the tick path
//! blocks, and no locks are needed: only one modality is ever active and
//! only the tick mutates engine state.
//!
//! Rendering is a read-only collaborator: it consumes
//! [`session::RenderSnapshot`] values and never receives draw calls.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod control;
pub mod core;
pub mod game;
pub mod session;

// Re-export commonly used types
pub use config::{EngineConfig, GridDensity};
pub use control::{ControlEvent, ControlSender, Key, Modality, PoseSnapshot};
pub use core::rng::DeterministicRng;
pub use core::vec2::Vec2;
pub use game::state::{AgentState, Direction, GamePhase, GameState};
pub use game::tick::TickResult;
pub use session::{GameSession, RenderSnapshot};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulation tick rate (Hz)
pub const TICK_RATE: u32 = 60;

/// Default logical surface width
pub const SURFACE_WIDTH: f32 = 400.0;

/// Default logical surface height
pub const SURFACE_HEIGHT: f32 = 400.0;
