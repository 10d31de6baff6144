//! Rest symbol on the tablature staff.

use crate::model::Duration;

use super::bar::TabBarRenderer;
use super::constants::*;
use super::glyph::{Canvas, Glyph};
use super::helpers::SharedBeamingHelper;

/// Unscaled advance width of the rest symbol for a duration.
fn rest_symbol_width(duration: Duration) -> f64 {
    match duration {
        Duration::QuadrupleWhole | Duration::DoubleWhole => 12.0,
        Duration::Whole | Duration::Half => 12.0,
        Duration::Quarter => 9.0,
        Duration::Eighth => 9.0,
        Duration::Sixteenth => 11.0,
        Duration::ThirtySecond => 13.0,
        Duration::SixtyFourth => 15.0,
        Duration::OneHundredTwentyEighth => 17.0,
        Duration::TwoHundredFiftySixth => 19.0,
    }
}

/// A rest centered on the middle line. When rests are hidden it still
/// takes a small fixed width so the beat keeps its slot.
#[derive(Debug)]
pub struct TabRestGlyph {
    pub x: f64,
    pub y: f64,
    pub beat: usize,
    pub duration: Duration,
    is_visible_rest: bool,
    beaming_helper: SharedBeamingHelper,
    width: f64,
    line_offset: f64,
}

impl TabRestGlyph {
    pub fn new(
        x: f64,
        y: f64,
        is_visible_rest: bool,
        duration: Duration,
        beat: usize,
        beaming_helper: SharedBeamingHelper,
    ) -> Self {
        Self {
            x,
            y,
            beat,
            duration,
            is_visible_rest,
            beaming_helper,
            width: 0.0,
            line_offset: 0.0,
        }
    }

    pub fn is_visible_rest(&self) -> bool {
        self.is_visible_rest
    }

    pub fn update_beaming_helper(&self, cx: f64) {
        self.beaming_helper
            .borrow_mut()
            .register_beat_line_x(self.beat, cx + self.x + self.width / 2.0);
    }
}

impl Glyph for TabRestGlyph {
    fn x(&self) -> f64 {
        self.x
    }

    fn set_x(&mut self, x: f64) {
        self.x = x;
    }

    fn width(&self) -> f64 {
        self.width
    }

    fn do_layout(&mut self, renderer: &TabBarRenderer<'_>) {
        self.line_offset = renderer.line_offset();
        self.width = if self.is_visible_rest {
            rest_symbol_width(self.duration) * renderer.scale()
        } else {
            HIDDEN_REST_WIDTH * renderer.scale()
        };
    }

    fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas) {
        if !self.is_visible_rest {
            return;
        }
        let left = cx + self.x;
        let mid_x = left + self.width / 2.0;
        let y = cy + self.y;
        let lo = self.line_offset;

        match self.duration {
            Duration::QuadrupleWhole | Duration::DoubleWhole | Duration::Whole => {
                // hangs below the middle line
                canvas.fill_rect(left, y, self.width, lo * 0.5, REST_COLOR);
            }
            Duration::Half => {
                // sits on the middle line
                canvas.fill_rect(left, y - lo * 0.5, self.width, lo * 0.5, REST_COLOR);
            }
            Duration::Quarter => {
                let w = self.width;
                let points = [
                    (left + w * 0.3, y - lo * 1.2),
                    (left + w * 0.75, y - lo * 0.5),
                    (left + w * 0.3, y),
                    (left + w * 0.75, y + lo * 0.5),
                    (left + w * 0.35, y + lo * 1.0),
                ];
                canvas.stroke_polyline(&points, REST_COLOR, 1.6);
            }
            other => {
                let flags = other.flag_count();
                let stem_top = y - lo;
                let stem_bottom = y + lo * (flags as f64 * 0.5);
                canvas.stroke_line(mid_x + 2.0, stem_top, mid_x - 1.0, stem_bottom, REST_COLOR, 1.2);
                for i in 0..flags {
                    let fy = stem_top + i as f64 * lo * 0.5;
                    canvas.fill_circle(mid_x - 2.5, fy + 1.5, 1.6, REST_COLOR);
                }
            }
        }
    }
}
