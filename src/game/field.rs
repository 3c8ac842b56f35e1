//! Target Field
//!
//! Grid layout and ratio-preserving regeneration of consumable targets.

use serde::{Deserialize, Serialize};

use crate::core::rng::DeterministicRng;
use crate::core::vec2::Vec2;
use crate::game::state::Direction;

/// A consumable point target.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Position on the surface
    pub position: Vec2,
}

/// Field of targets laid out on a uniform grid.
///
/// `initial_count` is snapshotted at generation time and serves as the
/// denominator for progress. Invariant: `initial_count >= remaining >= 0`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GridField {
    /// Grid pitch in surface units
    spacing: f32,

    /// Live targets
    targets: Vec<Target>,

    /// Target count at generation time
    initial_count: usize,
}

impl GridField {
    /// Create an empty field with the given pitch.
    pub fn new(spacing: f32) -> Self {
        Self {
            spacing,
            targets: Vec::new(),
            initial_count: 0,
        }
    }

    /// Lay out targets on a regular grid, one spacing unit inside each edge.
    ///
    /// Deterministic given identical inputs. Yields exactly
    /// `floor((width - spacing) / spacing) * floor((height - spacing) / spacing)`
    /// targets and resets `initial_count` to that figure.
    pub fn generate(&mut self, spacing: f32, width: f32, height: f32) {
        self.spacing = spacing;
        self.targets.clear();

        let cols = (((width - spacing) / spacing).floor()).max(0.0) as usize;
        let rows = (((height - spacing) / spacing).floor()).max(0.0) as usize;

        for i in 1..=cols {
            for j in 1..=rows {
                self.targets.push(Target {
                    position: Vec2::new(i as f32 * spacing, j as f32 * spacing),
                });
            }
        }

        self.initial_count = self.targets.len();
    }

    /// Re-run generation at a (possibly new) pitch, preserving visual progress.
    ///
    /// The pre-regeneration completion ratio is restored by removing
    /// `round(initial_new * (1 - ratio))` targets chosen uniformly at random.
    /// A field that never had targets has an undefined ratio; it is treated
    /// as 1 so nothing is removed.
    pub fn regenerate(
        &mut self,
        spacing: f32,
        width: f32,
        height: f32,
        rng: &mut DeterministicRng,
    ) {
        let previous_ratio = if self.initial_count == 0 {
            1.0
        } else {
            self.targets.len() as f32 / self.initial_count as f32
        };

        self.generate(spacing, width, height);

        let to_remove = (self.initial_count as f32 * (1.0 - previous_ratio)).round() as usize;
        for _ in 0..to_remove.min(self.targets.len()) {
            let idx = rng.next_int(self.targets.len() as u32) as usize;
            self.targets.remove(idx);
        }
    }

    /// Nearest target strictly ahead of `pos` along `direction`, within a
    /// perpendicular tolerance of half the grid pitch. Ties broken by
    /// Euclidean distance - closest wins.
    pub fn nearest_target_in_direction(&self, pos: Vec2, direction: Direction) -> Option<Vec2> {
        let half = self.spacing / 2.0;
        let mut best: Option<(f32, Vec2)> = None;

        for target in &self.targets {
            let p = target.position;
            let ahead = match direction {
                Direction::Right => p.x > pos.x && (p.y - pos.y).abs() < half,
                Direction::Down => p.y > pos.y && (p.x - pos.x).abs() < half,
                Direction::Left => p.x < pos.x && (p.y - pos.y).abs() < half,
                Direction::Up => p.y < pos.y && (p.x - pos.x).abs() < half,
            };
            if !ahead {
                continue;
            }

            let dist_sq = pos.distance_squared(p);
            if best.map_or(true, |(best_dist, _)| dist_sq < best_dist) {
                best = Some((dist_sq, p));
            }
        }

        best.map(|(_, p)| p)
    }

    /// Remove and return every target closer to `center` than `max_distance`.
    pub fn consume_within(&mut self, center: Vec2, max_distance: f32) -> Vec<Vec2> {
        let mut consumed = Vec::new();
        self.targets.retain(|target| {
            if target.position.distance(center) < max_distance {
                consumed.push(target.position);
                false
            } else {
                true
            }
        });
        consumed
    }

    /// Current grid pitch.
    #[inline]
    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Live targets.
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Number of live targets.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.targets.len()
    }

    /// Target count at generation time.
    #[inline]
    pub fn initial_count(&self) -> usize {
        self.initial_count
    }

    /// Number of consumed targets.
    #[inline]
    pub fn eaten(&self) -> usize {
        self.initial_count - self.targets.len()
    }

    /// Completion percentage, rounded to one decimal place.
    ///
    /// An empty generation has nothing left to consume, so progress is 100%.
    pub fn progress_percent(&self) -> f32 {
        if self.initial_count == 0 {
            return 100.0;
        }
        let raw = self.eaten() as f32 / self.initial_count as f32 * 100.0;
        (raw * 10.0).round() / 10.0
    }
}

// =============================================================================
// TESTS
// =============================================================================
