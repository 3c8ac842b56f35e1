//! Collision Resolution
//!
//! Removes targets within the capture radius, recomputes progress and raises
//! the victory transition. Nothing here can fail under valid invariants: the
//! remaining count never goes negative and the progress division is guarded.

use crate::game::events::GameEvent;
use crate::game::state::GameState;

/// Fixed margin added to the agent radius when testing capture distance.
pub const CAPTURE_MARGIN: f32 = 5.0;

/// Outcome of one resolution pass.
#[derive(Debug, Default)]
pub struct CollisionOutcome {
    /// Targets consumed this pass
    pub consumed: usize,
    /// Targets left on the field
    pub remaining: usize,
    /// Whether this pass emptied the field
    pub victory: bool,
}

/// Resolve agent-target captures for the current tick.
///
/// Idempotent within a tick: a second pass over the same agent position
/// removes nothing further.
pub fn resolve(state: &mut GameState) -> CollisionOutcome {
    let capture_distance = state.agent.radius + CAPTURE_MARGIN;
    let consumed = state
        .field
        .consume_within(state.agent.position, capture_distance);

    let remaining = state.field.remaining();
    let mut outcome = CollisionOutcome {
        consumed: consumed.len(),
        remaining,
        victory: false,
    };

    if consumed.is_empty() {
        return outcome;
    }

    let tick = state.tick;
    for (i, position) in consumed.iter().enumerate() {
        let left_after = remaining + (consumed.len() - 1 - i);
        state.push_event(GameEvent::target_consumed(tick, *position, left_after));
    }

    state.push_event(GameEvent::progress_changed(
        tick,
        state.field.eaten(),
        state.field.initial_count(),
        state.field.progress_percent(),
    ));

    if remaining == 0 {
        state.declare_victory();
        outcome.victory = state.phase == crate::game::state::GamePhase::Victory;
    }

    outcome
}

// =============================================================================
// TESTS
// =============================================================================
