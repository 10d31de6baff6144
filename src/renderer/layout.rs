//! Layout computation — lays out every bar of every staff, groups bars
//! into systems that fit the page width and positions them vertically.

use crate::model::*;
use crate::settings::RenderSettings;

use super::bar::{BarLayout, TabBarRenderer};
use super::constants::*;
use super::metrics::TextMeasurer;

// ═══════════════════════════════════════════════════════════════════════
// Layout structures
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct ScoreLayout<'a> {
    pub page_width: f64,
    pub systems: Vec<SystemLayout<'a>>,
    pub total_height: f64,
}

/// One row of bars across the page, holding every staff.
#[derive(Debug)]
pub struct SystemLayout<'a> {
    pub y: f64,
    pub x_start: f64,
    pub x_end: f64,
    /// Index of the first bar in this system
    pub first_bar: usize,
    pub staves: Vec<StaffRow<'a>>,
    pub height: f64,
}

/// The bars of one staff within a system.
#[derive(Debug)]
pub struct StaffRow<'a> {
    pub track_idx: usize,
    pub staff_idx: usize,
    /// Y of the top line, relative to the system
    pub y_offset: f64,
    pub line_count: usize,
    pub line_offset: f64,
    pub bars: Vec<BarLayout<'a>>,
}

impl StaffRow<'_> {
    pub fn staff_height(&self) -> f64 {
        self.line_offset * self.line_count.saturating_sub(1) as f64
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Helper functions
// ═══════════════════════════════════════════════════════════════════════

/// Staves that can be drawn as tablature, with their track and staff index.
pub(super) fn tab_staves(score: &Score) -> Vec<(usize, usize, &Staff)> {
    let mut staves = Vec::new();
    for (ti, track) in score.tracks.iter().enumerate() {
        for (si, staff) in track.staves.iter().enumerate() {
            if staff.tuning.is_empty() {
                log::warn!("skipping staff {si} of track {ti}: no strings");
                continue;
            }
            staves.push((ti, si, staff));
        }
    }
    staves
}

pub(super) fn has_header(score: &Score) -> bool {
    score.title.is_some() || score.artist.is_some()
}

/// Greedily group bar widths into systems no wider than `content_width`.
/// A bar wider than the page gets a system of its own.
pub(super) fn break_into_systems(widths: &[f64], content_width: f64) -> Vec<std::ops::Range<usize>> {
    let mut systems = Vec::new();
    let mut start = 0;
    let mut used = 0.0;
    for (i, &w) in widths.iter().enumerate() {
        if i > start && used + w > content_width {
            systems.push(start..i);
            start = i;
            used = 0.0;
        }
        used += w;
    }
    if start < widths.len() {
        systems.push(start..widths.len());
    }
    systems
}

// ═══════════════════════════════════════════════════════════════════════
// Main layout computation
// ═══════════════════════════════════════════════════════════════════════

pub fn compute_layout<'a>(
    score: &'a Score,
    settings: &'a RenderSettings,
    metrics: &'a dyn TextMeasurer,
    page_width: f64,
) -> ScoreLayout<'a> {
    let scale = settings.scale;
    let staves = tab_staves(score);
    let bar_count = staves.iter().map(|(_, _, s)| s.bars.len()).max().unwrap_or(0);

    // Lay out each bar of each staff once; missing bars become empty padding.
    let staff_bars: Vec<Vec<BarLayout<'a>>> = staves
        .iter()
        .map(|&(_, _, staff)| {
            (0..bar_count)
                .map(|bi| TabBarRenderer::new(staff, bi, settings, metrics).layout_bar())
                .collect()
        })
        .collect();

    // Bars sharing an index line up across staves.
    let bar_widths: Vec<f64> = (0..bar_count)
        .map(|bi| {
            staff_bars
                .iter()
                .map(|bars| bars[bi].width())
                .fold(0.0, f64::max)
        })
        .collect();

    let x_start = PAGE_MARGIN_LEFT;
    let x_end = page_width - PAGE_MARGIN_RIGHT;
    let clef_space = TAB_CLEF_SPACE * scale;
    let content_width = (x_end - x_start - clef_space).max(0.0);
    let ranges = break_into_systems(&bar_widths, content_width);
    let last_range = ranges.len().saturating_sub(1);

    let mut bar_iters: Vec<_> = staff_bars.into_iter().map(|bars| bars.into_iter()).collect();
    let mut current_y = PAGE_MARGIN_TOP + if has_header(score) { HEADER_HEIGHT } else { 0.0 };
    let mut systems = Vec::with_capacity(ranges.len());

    for (sys_idx, range) in ranges.into_iter().enumerate() {
        let natural: f64 = bar_widths[range.clone()].iter().sum();
        // Every system but the last is stretched to the full width. A bar
        // wider than the page keeps its width and the staff runs past the margin.
        let factor = if natural > 0.0 && natural < content_width && sys_idx != last_range {
            content_width / natural
        } else {
            1.0
        };

        let mut rows = Vec::with_capacity(staves.len());
        let mut row_y = 0.0;
        for (si, &(track_idx, staff_idx, staff)) in staves.iter().enumerate() {
            let mut bars: Vec<BarLayout<'a>> = bar_iters[si].by_ref().take(range.len()).collect();
            let mut x = clef_space;
            for (bar, bi) in bars.iter_mut().zip(range.clone()) {
                bar.scale_to_width(bar_widths[bi] * factor);
                bar.x = x;
                x += bar_widths[bi] * factor;
            }

            let top_overflow = bars.iter().map(|b| b.top_overflow()).fold(0.0, f64::max);
            let bottom_overflow = bars.iter().map(|b| b.bottom_overflow()).fold(0.0, f64::max);
            let line_offset = settings.notation.tab_line_spacing * scale;
            let row = StaffRow {
                track_idx,
                staff_idx,
                y_offset: row_y + STAFF_PADDING_TOP * scale + top_overflow,
                line_count: staff.line_count(),
                line_offset,
                bars,
            };
            row_y = row.y_offset + row.staff_height() + bottom_overflow + STAFF_PADDING_BOTTOM * scale + STAFF_GAP * scale;
            rows.push(row);
        }

        let height = (row_y - STAFF_GAP * scale).max(0.0);
        systems.push(SystemLayout {
            y: current_y,
            x_start,
            x_end: if factor == 1.0 { x_start + clef_space + natural } else { x_end },
            first_bar: range.start,
            staves: rows,
            height,
        });
        current_y += height + SYSTEM_SPACING * scale;
    }

    let total_height = if systems.is_empty() {
        current_y + PAGE_MARGIN_BOTTOM
    } else {
        current_y - SYSTEM_SPACING * scale + PAGE_MARGIN_BOTTOM
    };

    log::debug!(
        "laid out {} bars of {} staves into {} systems, height {:.1}",
        bar_count,
        staves.len(),
        systems.len(),
        total_height
    );

    ScoreLayout {
        page_width,
        systems,
        total_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn systems_break_before_overflowing_bar() {
        let ranges = break_into_systems(&[100.0, 100.0, 100.0, 50.0], 250.0);
        assert_eq!(ranges, vec![0..2, 2..4]);
    }

    #[test]
    fn oversized_bar_gets_its_own_system() {
        let ranges = break_into_systems(&[300.0, 100.0], 250.0);
        assert_eq!(ranges, vec![0..1, 1..2]);
        assert!(break_into_systems(&[], 250.0).is_empty());
    }
}
