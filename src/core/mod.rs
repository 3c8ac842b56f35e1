//! Core primitives.
//!
//! Geometry and randomness shared by the movement and control modules.
//! The RNG is seeded by the caller so every regeneration is reproducible.

pub mod rng;
pub mod vec2;

// Re-export core types
pub use rng::DeterministicRng;
pub use vec2::Vec2;
