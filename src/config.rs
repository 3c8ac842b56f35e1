//! Engine Configuration
//!
//! The externally adjustable surface: agent speed, grid density presets and
//! the cosmetic agent color. Nothing here is persisted; a reload starts from
//! defaults.

use serde::{Deserialize, Serialize};

use crate::game::state::AgentState;
use crate::{SURFACE_HEIGHT, SURFACE_WIDTH};

/// Named grid density presets.
///
/// Density is expressed as grid pitch: tighter pitch, denser field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GridDensity {
    /// 20 px pitch
    VeryDense,
    /// 30 px pitch
    Dense,
    /// 40 px pitch
    #[default]
    Normal,
    /// 50 px pitch
    Sparse,
    /// 60 px pitch
    VerySparse,
}

impl GridDensity {
    /// Grid pitch in surface units.
    pub fn spacing(self) -> f32 {
        match self {
            GridDensity::VeryDense => 20.0,
            GridDensity::Dense => 30.0,
            GridDensity::Normal => 40.0,
            GridDensity::Sparse => 50.0,
            GridDensity::VerySparse => 60.0,
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            GridDensity::VeryDense => "Very dense",
            GridDensity::Dense => "Dense",
            GridDensity::Normal => "Normal",
            GridDensity::Sparse => "Sparse",
            GridDensity::VerySparse => "Very sparse",
        }
    }

    /// Preset for a pitch value, if one matches.
    pub fn from_spacing(spacing: f32) -> Option<Self> {
        match spacing as u32 {
            20 => Some(GridDensity::VeryDense),
            30 => Some(GridDensity::Dense),
            40 => Some(GridDensity::Normal),
            50 => Some(GridDensity::Sparse),
            60 => Some(GridDensity::VerySparse),
            _ => None,
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Agent speed per tick. Continuous; re-applied instantly.
    pub speed: f32,

    /// Grid density preset.
    pub density: GridDensity,

    /// Agent color, passed through to the rendering collaborator untouched.
    pub agent_color: String,

    /// Logical surface width.
    pub surface_width: f32,

    /// Logical surface height.
    pub surface_height: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            speed: AgentState::DEFAULT_SPEED,
            density: GridDensity::default(),
            agent_color: "#ffcc00".to_string(),
            surface_width: SURFACE_WIDTH,
            surface_height: SURFACE_HEIGHT,
        }
    }
}
