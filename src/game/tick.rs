//! Simulation Tick
//!
//! Per-frame orchestration: movement, then capture resolution, then the
//! ordered event drain. Ticks are strictly ordered and non-overlapping; the
//! scheduling primitive (timer, game loop, test harness) lives outside.

use crate::game::collision;
use crate::game::events::GameEvent;
use crate::game::movement;
use crate::game::state::GameState;

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick, ordered by (tick, priority)
    pub events: Vec<GameEvent>,
    /// Whether the field was emptied this tick
    pub victory: bool,
}

/// Run one simulation tick over already-applied control state.
///
/// Only Running sessions advance; the agent must also be moving for the
/// position to change and captures to resolve. Pending events (including any
/// queued by the control drain before this call) are returned sorted.
pub fn run(state: &mut GameState) -> TickResult {
    let mut result = TickResult::default();

    if state.phase.is_running() {
        state.tick += 1;

        if state.agent.is_moving {
            movement::advance(&mut state.agent, &state.field, state.width, state.height);
            let outcome = collision::resolve(state);
            result.victory = outcome.victory;
        }
    }

    let mut events = state.take_events();
    events.sort();
    result.events = events;

    result
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vec2::Vec2;
    use crate::game::state::{AgentState, Direction, GamePhase};

    fn running_state() -> GameState {
        let mut state = GameState::new(400.0, 400.0, 40.0, AgentState::DEFAULT_SPEED);
        state.start();
        state.take_events();
        state
    }

    #[test]
    fn test_tick_only_advances_while_running() {
        let mut state = GameState::new(400.0, 400.0, 40.0, AgentState::DEFAULT_SPEED);
        state.agent.is_moving = true;
        let spawn = state.agent.position;

        // Idle: nothing moves, tick counter frozen
        run(&mut state);
        assert_eq!(state.tick, 0);
        assert_eq!(state.agent.position, spawn);

        state.start();
        state.pause();
        state.agent.is_moving = true;
        run(&mut state);
        assert_eq!(state.tick, 0);
        assert_eq!(state.agent.position, spawn);
    }

    #[test]
    fn test_tick_moves_agent_while_running() {
        let mut state = running_state();
        state.agent.is_moving = true;
        state.agent.direction = Direction::Right;
        let x0 = state.agent.position.x;

        run(&mut state);
        assert_eq!(state.tick, 1);
        assert!(state.agent.position.x > x0);
    }

    #[test]
    fn test_stationary_agent_consumes_nothing() {
        let mut state = running_state();
        // Parked directly on a target but not moving
        state.agent.position = Vec2::new(40.0, 40.0);
        state.agent.is_moving = false;

        let before = state.field.remaining();
        let result = run(&mut state);

        assert_eq!(state.tick, 1);
        assert_eq!(state.field.remaining(), before);
        assert!(result.events.is_empty());
    }

    #[test]
    fn test_moving_agent_consumes_and_reports() {
        let mut state = running_state();
        state.agent.position = Vec2::new(38.0, 40.0);
        state.agent.direction = Direction::Right;
        state.agent.is_moving = true;

        let before = state.field.remaining();
        let result = run(&mut state);
        assert_eq!(state.field.remaining(), before - 1);
        assert!(!result.events.is_empty());
    }

    #[test]
    fn test_events_sorted_by_priority() {
        let mut state = running_state();
        state.agent.position = Vec2::new(38.0, 40.0);
        state.agent.direction = Direction::Right;
        state.agent.is_moving = true;

        let result = run(&mut state);
        for pair in result.events.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn test_victory_reported_through_result() {
        // Single center target directly under the spawn position
        let mut state = GameState::new(400.0, 400.0, 200.0, AgentState::DEFAULT_SPEED);
        state.start();
        state.take_events();
        state.agent.is_moving = true;

        let result = run(&mut state);
        assert!(result.victory);
        assert_eq!(state.phase, GamePhase::Victory);

        // Terminal: further ticks are inert
        let result = run(&mut state);
        assert!(!result.victory);
        assert!(result.events.is_empty());
    }

    #[test]
    fn test_tick_determinism() {
        let run_session = || {
            let mut state = running_state();
            state.agent.is_moving = true;
            for i in 0..240 {
                state.agent.direction = match (i / 60) % 4 {
                    0 => Direction::Right,
                    1 => Direction::Down,
                    2 => Direction::Left,
                    _ => Direction::Up,
                };
                run(&mut state);
            }
            (state.agent.position, state.field.remaining(), state.tick)
        };

        assert_eq!(run_session(), run_session());
    }
}
