//! Header, staff lines, "TAB" clef and barline rendering.

use crate::model::*;

use super::constants::*;
use super::svg_builder::SvgBuilder;

// ═══════════════════════════════════════════════════════════════════════
// Header rendering
// ═══════════════════════════════════════════════════════════════════════

pub(super) fn render_header(svg: &mut SvgBuilder, score: &Score, page_width: f64) {
    let center_x = page_width / 2.0;

    if let Some(ref title) = score.title {
        svg.text(center_x, PAGE_MARGIN_TOP + 22.0, title, 22.0, "bold", HEADER_COLOR, "middle");
    }

    if let Some(ref artist) = score.artist {
        svg.text(
            page_width - PAGE_MARGIN_RIGHT,
            PAGE_MARGIN_TOP + 45.0,
            artist,
            11.0,
            "normal",
            HEADER_COLOR,
            "end",
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Staff rendering
// ═══════════════════════════════════════════════════════════════════════

pub(super) fn render_staff_lines(svg: &mut SvgBuilder, x1: f64, x2: f64, top_y: f64, line_count: usize, line_offset: f64) {
    for i in 0..line_count {
        let y = top_y + i as f64 * line_offset;
        svg.line(x1, y, x2, y, STAFF_COLOR, STAFF_LINE_WIDTH);
    }
}

/// "T", "A", "B" stacked over the height of the staff.
pub(super) fn render_tab_clef(svg: &mut SvgBuilder, x: f64, top_y: f64, staff_height: f64) {
    let size = (staff_height / 3.2).clamp(6.0, 20.0);
    let step = staff_height / 3.0;
    for (i, letter) in ["T", "A", "B"].iter().enumerate() {
        let y = top_y + step * (i as f64 + 0.5) + size * 0.35;
        svg.text(x, y, letter, size, "bold", NOTE_COLOR, "middle");
    }
}

pub(super) fn render_barline(svg: &mut SvgBuilder, x: f64, top_y: f64, staff_height: f64) {
    svg.line(x, top_y, x, top_y + staff_height, BARLINE_COLOR, BARLINE_WIDTH);
}

/// Track name left of the first system.
pub(super) fn render_track_name(svg: &mut SvgBuilder, track: &Track, x: f64, top_y: f64, staff_height: f64) {
    svg.text(
        x - 6.0,
        top_y + staff_height / 2.0 + 4.0,
        &track.name,
        10.0,
        "normal",
        HEADER_COLOR,
        "end",
    );
}
