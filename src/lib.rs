//! tablayout — guitar tablature beat layout and SVG rendering.
//!
//! A [`Score`] is laid out bar by bar into glyph trees (fret numbers, rests,
//! slash heads, dots, tremolo and whammy overlays) and painted onto any
//! [`Canvas`]. The bundled [`SvgBuilder`] turns it into an SVG document.
//!
//! # Example
//! ```
//! use tablayout::{render_score_to_svg, Beat, Duration, Note, RenderSettings, Score};
//! use tablayout::model::{Bar, Staff, Track, Voice};
//!
//! let mut beat = Beat::new(0, Duration::Quarter);
//! beat.notes.push(Note::new(1, 3));
//! let score = Score {
//!     title: Some("Riff".into()),
//!     artist: None,
//!     tracks: vec![Track {
//!         name: "Guitar".into(),
//!         staves: vec![Staff {
//!             tuning: vec![64, 59, 55, 50, 45, 40],
//!             bars: vec![Bar { voices: vec![Voice { beats: vec![beat] }] }],
//!         }],
//!     }],
//! };
//!
//! let svg = render_score_to_svg(&score, &RenderSettings::default(), None);
//! assert!(svg.starts_with("<svg"));
//! ```

pub mod error;
pub mod model;
pub mod renderer;
pub mod settings;

use std::collections::HashSet;

pub use error::{LayoutError, Result};
pub use model::*;
pub use renderer::{
    build_bounds_lookup, compute_layout, render_score_to_svg, render_score_to_svg_with_metrics, Canvas,
    FixedWidthMetrics, SvgBuilder, TextMeasurer,
};
pub use settings::{NotationSettings, RenderSettings, TabRhythmMode};

/// Decode a score from JSON and check it with [`validate_score`].
pub fn parse_score_json(json: &str) -> Result<Score> {
    let score: Score = serde_json::from_str(json)?;
    validate_score(&score)?;
    Ok(score)
}

/// Convert a score to a JSON string.
pub fn score_to_json(score: &Score) -> Result<String> {
    Ok(serde_json::to_string_pretty(score)?)
}

/// Check the invariants layout relies on: every staff has strings, every
/// note sits on one of them and beat ids are unique.
pub fn validate_score(score: &Score) -> Result<()> {
    let mut seen = HashSet::new();
    for (ti, track) in score.tracks.iter().enumerate() {
        for (si, staff) in track.staves.iter().enumerate() {
            let strings = staff.line_count();
            if strings == 0 {
                return Err(LayoutError::EmptyTuning { track: ti, staff: si });
            }
            let beats = staff
                .bars
                .iter()
                .flat_map(|b| b.voices.iter())
                .flat_map(|v| v.beats.iter());
            for beat in beats {
                if !seen.insert(beat.id) {
                    return Err(LayoutError::DuplicateBeatId(beat.id));
                }
                if let Some(note) = beat.notes.iter().find(|n| n.string == 0 || n.string > strings) {
                    return Err(LayoutError::StringOutOfRange {
                        beat: beat.id,
                        string: note.string,
                        strings,
                    });
                }
            }
        }
    }
    Ok(())
}

/// Parse score and settings JSON and render directly to SVG.
///
/// `settings_json` may be `None` for default settings. `page_width` sets
/// the SVG width in user units; `None` uses the default (820).
pub fn render_score_json_to_svg(
    score_json: &str,
    settings_json: Option<&str>,
    page_width: Option<f64>,
) -> Result<String> {
    let score = parse_score_json(score_json)?;
    let settings = match settings_json {
        Some(json) => RenderSettings::from_json(json)?,
        None => RenderSettings::default(),
    };
    log::debug!("rendering '{}' ({} bars)", score.title.as_deref().unwrap_or(""), score.bar_count());
    Ok(render_score_to_svg(&score, &settings, page_width))
}
