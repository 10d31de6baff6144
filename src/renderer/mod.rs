//! Tablature renderer — lays a Score out as glyph trees and paints them.
//!
//! Layout and painting are separate passes. [`compute_layout`] builds a
//! fresh [`ScoreLayout`] from the score and the current settings; nothing
//! in it is patched afterwards. Painting walks that layout and draws onto
//! any [`Canvas`]; [`render_score_to_svg`] does both with the bundled SVG
//! surface.

mod constants;

pub mod bar;
pub mod beat;
pub mod bounds;
pub mod effects;
pub mod glyph;
pub mod helpers;
pub mod layout;
pub mod metrics;
pub mod note_numbers;
pub mod rest;
pub mod slash;
mod staff;
pub mod svg_builder;

use crate::model::*;
use crate::settings::RenderSettings;

pub use bar::{BarLayout, TabBarRenderer, VoiceLayout};
pub use beat::{BeatContainerGlyph, PrimaryContent, TabBeatGlyph, TrailingGlyph};
pub use bounds::{BeatBounds, Bounds, NoteBounds};
pub use glyph::{Canvas, Glyph, TextAlign};
pub use helpers::{BeamingHelper, CollisionHelper, SharedBeamingHelper};
pub use layout::{compute_layout, ScoreLayout, StaffRow, SystemLayout};
pub use metrics::{FixedWidthMetrics, TextMeasurer};
pub use note_numbers::{NoteXPosition, NoteYPosition};
pub use svg_builder::SvgBuilder;

use constants::*;
use staff::*;

// ═══════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════

/// Render a Score into a complete SVG string.
///
/// `page_width` sets the SVG width in user units. Pass `None` to use the
/// default (820).
pub fn render_score_to_svg(score: &Score, settings: &RenderSettings, page_width: Option<f64>) -> String {
    render_score_to_svg_with_metrics(score, settings, &FixedWidthMetrics::default(), page_width)
}

/// Like [`render_score_to_svg`], measuring fret numbers with `metrics`.
pub fn render_score_to_svg_with_metrics(
    score: &Score,
    settings: &RenderSettings,
    metrics: &dyn TextMeasurer,
    page_width: Option<f64>,
) -> String {
    let page_width = match page_width {
        Some(w) if w > 0.0 => w,
        _ => DEFAULT_PAGE_WIDTH,
    };

    if layout::tab_staves(score).is_empty() {
        return svg_builder::empty_svg("No tablature staves in score");
    }

    let layout = compute_layout(score, settings, metrics, page_width);
    let mut svg = SvgBuilder::new(page_width, layout.total_height);

    // Background
    svg.rect(0.0, 0.0, page_width, layout.total_height, BACKGROUND_COLOR, "none", 0.0);

    render_header(&mut svg, score, page_width);
    paint_layout(&layout, score, &mut svg);

    svg.build()
}

/// Hit-testing rectangles for every beat of the layout, in page coordinates.
pub fn build_bounds_lookup(layout: &ScoreLayout<'_>) -> Vec<BeatBounds> {
    let mut all = Vec::new();
    for system in &layout.systems {
        for row in &system.staves {
            let top_y = system.y + row.y_offset;
            for bar in &row.bars {
                all.extend(bar.build_bounds_lookup(system.x_start + bar.x, top_y));
            }
        }
    }
    all
}

fn paint_layout(layout: &ScoreLayout<'_>, score: &Score, svg: &mut SvgBuilder) {
    for (sys_idx, system) in layout.systems.iter().enumerate() {
        for row in &system.staves {
            let top_y = system.y + row.y_offset;
            let staff_height = row.staff_height();

            render_staff_lines(svg, system.x_start, system.x_end, top_y, row.line_count, row.line_offset);
            render_barline(svg, system.x_start, top_y, staff_height);
            if let Some(first) = row.bars.first() {
                render_tab_clef(svg, system.x_start + first.x / 2.0, top_y, staff_height);
            }
            if sys_idx == 0 && row.staff_idx == 0 {
                if let Some(track) = score.tracks.get(row.track_idx) {
                    render_track_name(svg, track, system.x_start, top_y, staff_height);
                }
            }

            for bar in &row.bars {
                let bar_x = system.x_start + bar.x;
                bar.paint(bar_x, top_y, svg);
                render_barline(svg, bar_x + bar.width(), top_y, staff_height);
            }
        }
    }
}
