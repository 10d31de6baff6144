//! Display settings consumed by the renderer.
//!
//! Every field has a default, so a settings document only needs to name
//! what it changes:
//!
//! ```
//! use tablayout::{RenderSettings, TabRhythmMode};
//!
//! let settings = RenderSettings::from_json(r#"{ "notation": { "rhythm_mode": "hidden" } }"#).unwrap();
//! assert_eq!(settings.notation.rhythm_mode, TabRhythmMode::Hidden);
//! assert_eq!(settings.scale, 1.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// How rhythm is shown below the tablature lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TabRhythmMode {
    /// No rhythm notation; dots are not drawn either.
    Hidden,
    /// Stems below the staff, grouped by beams.
    #[default]
    ShowWithBeams,
    /// Stems below the staff with individual flags.
    ShowWithBars,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotationSettings {
    pub rhythm_mode: TabRhythmMode,
    /// Height of the rhythm row below the lowest line, unscaled
    pub rhythm_height: f64,
    /// Draw grace beats with smaller numbers
    pub small_grace_tab_notes: bool,
    /// Draw rest symbols on tablature
    pub show_tab_rests: bool,
    /// Distance between two tablature lines, unscaled
    pub tab_line_spacing: f64,
    /// Font size of fret numbers, unscaled
    pub tab_font_size: f64,
}

impl Default for NotationSettings {
    fn default() -> Self {
        Self {
            rhythm_mode: TabRhythmMode::ShowWithBeams,
            rhythm_height: 15.0,
            small_grace_tab_notes: true,
            show_tab_rests: true,
            tab_line_spacing: 10.0,
            tab_font_size: 11.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Uniform zoom applied to every offset and size
    pub scale: f64,
    pub notation: NotationSettings,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            scale: 1.0,
            notation: NotationSettings::default(),
        }
    }
}

impl RenderSettings {
    /// Decode settings from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
