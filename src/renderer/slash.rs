//! Slashed-rhythm note head drawn in place of fret numbers.

use crate::model::Duration;

use super::bar::TabBarRenderer;
use super::constants::*;
use super::effects::BeatEffects;
use super::glyph::{Canvas, Glyph};
use super::helpers::SharedBeamingHelper;

#[derive(Debug)]
pub struct SlashNoteHeadGlyph {
    pub x: f64,
    pub y: f64,
    pub beat: usize,
    pub duration: Duration,
    pub beat_effects: BeatEffects,
    is_grace: bool,
    beaming_helper: SharedBeamingHelper,
    width: f64,
    height: f64,
}

impl SlashNoteHeadGlyph {
    pub fn new(
        x: f64,
        y: f64,
        duration: Duration,
        is_grace: bool,
        beat: usize,
        beaming_helper: SharedBeamingHelper,
    ) -> Self {
        Self {
            x,
            y,
            beat,
            duration,
            beat_effects: BeatEffects::new(),
            is_grace,
            beaming_helper,
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn is_grace(&self) -> bool {
        self.is_grace
    }

    /// Whole and longer notes get a wider head.
    fn head_width(&self) -> f64 {
        if self.duration <= Duration::Whole {
            14.0
        } else {
            10.0
        }
    }

    pub fn update_beaming_helper(&self, cx: f64) {
        self.beaming_helper
            .borrow_mut()
            .register_beat_line_x(self.beat, cx + self.x + self.width / 2.0);
    }
}

impl Glyph for SlashNoteHeadGlyph {
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
        let grace = if self.is_grace { GRACE_SCALE } else { 1.0 };
        self.width = self.head_width() * renderer.scale() * grace;
        self.height = renderer.line_offset() * grace;
        for effect in self.beat_effects.values_mut() {
            effect.do_layout(renderer);
        }
    }

    fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas) {
        let left = cx + self.x;
        let y = cy + self.y;
        let half_h = self.height / 2.0;
        let slant = self.width * 0.35;
        let head = [
            (left + slant, y - half_h),
            (left + self.width, y - half_h),
            (left + self.width - slant, y + half_h),
            (left, y + half_h),
        ];
        // half notes and longer are hollow
        if self.duration <= Duration::Half {
            canvas.stroke_polygon(&head, NOTE_COLOR, 1.2);
        } else {
            canvas.fill_polygon(&head, NOTE_COLOR);
        }
        for effect in self.beat_effects.values() {
            effect.paint(left + self.width / 2.0, y + half_h, canvas);
        }
    }
}
