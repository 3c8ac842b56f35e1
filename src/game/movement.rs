//! Movement Integration
//!
//! Advances the agent one tick along its commanded direction while easing the
//! perpendicular axis onto the grid. The easing step scales with distance so
//! the agent visually tracks target rows/columns without teleporting:
//! direction-only input still produces track-following motion over the
//! irregular remainder of a partially consumed field.

use crate::game::field::GridField;
use crate::game::state::{AgentState, Direction};

/// Mouth animation increment per moving tick (phase wraps at pi).
pub const MOUTH_PHASE_STEP: f32 = 0.2;

/// Below this remaining perpendicular distance the agent snaps exactly,
/// eliminating asymptotic creep.
const SNAP_EPSILON: f32 = 1.0;

/// Advance the agent by one tick.
///
/// No-op while the agent is not moving (animation frozen too). The travel
/// axis advances by `speed`; the perpendicular axis eases toward the nearest
/// target ahead, falling back to the nearest theoretical grid line. Both
/// axes are clamped to `[radius, dimension - radius]`.
pub fn advance(agent: &mut AgentState, field: &GridField, width: f32, height: f32) {
    if !agent.is_moving {
        return;
    }

    let spacing = field.spacing();
    let speed = agent.speed;
    let pos = agent.position;
    let nearest = field.nearest_target_in_direction(pos, agent.direction);

    let (x, y) = if agent.direction.is_horizontal() {
        let x = pos.x + agent.direction.step_sign() * speed;
        let snap = nearest.map_or_else(|| grid_line(pos.y, spacing), |t| t.y);
        (x, ease_toward(pos.y, snap, speed, spacing))
    } else {
        let y = pos.y + agent.direction.step_sign() * speed;
        let snap = nearest.map_or_else(|| grid_line(pos.x, spacing), |t| t.x);
        (ease_toward(pos.x, snap, speed, spacing), y)
    };

    agent.position.x = x.clamp(agent.radius, width - agent.radius);
    agent.position.y = y.clamp(agent.radius, height - agent.radius);

    agent.mouth_phase = (agent.mouth_phase + MOUTH_PHASE_STEP) % std::f32::consts::PI;
}

/// Nearest theoretical grid line for a coordinate: cell centers sit half a
/// pitch past each grid multiple.
#[inline]
pub fn grid_line(value: f32, spacing: f32) -> f32 {
    let offset = spacing / 2.0;
    ((value - offset) / spacing).round() * spacing + offset
}

/// One speed-scaled easing step from `value` toward `snap`.
///
/// `step = min(speed * (1 + 0.5 * distance / spacing), distance)`; farther
/// coordinates close faster, and the step never overshoots. Within one unit
/// the snap is exact.
#[inline]
pub fn ease_toward(value: f32, snap: f32, speed: f32, spacing: f32) -> f32 {
    let distance = (snap - value).abs();
    if distance < SNAP_EPSILON {
        return snap;
    }

    let step = (speed * (1.0 + 0.5 * distance / spacing)).min(distance);
    value + (snap - value).signum() * step
}

/// Apply one easing step toward the nearest grid line on both axes.
///
/// Used when speed is reconfigured mid-motion so the new step size starts
/// from a grid-consistent position.
pub fn resnap(agent: &mut AgentState, spacing: f32) {
    let speed = agent.speed;
    agent.position.x = ease_toward(
        agent.position.x,
        grid_line(agent.position.x, spacing),
        speed,
        spacing,
    );
    agent.position.y = ease_toward(
        agent.position.y,
        grid_line(agent.position.y, spacing),
        speed,
        spacing,
    );
}

// =============================================================================
// TESTS
// =============================================================================
