//! Fret numbers and the chord stack that holds them.

use std::collections::HashMap;

use crate::model::Note;

use super::bar::TabBarRenderer;
use super::bounds::{BeatBounds, Bounds, NoteBounds};
use super::constants::*;
use super::effects::BeatEffects;
use super::glyph::{Canvas, Glyph, TextAlign};
use super::helpers::SharedBeamingHelper;

/// Where on a note an X anchor is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteXPosition {
    Left,
    Center,
    Right,
}

/// Where on a note a Y anchor is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteYPosition {
    Top,
    Center,
    Bottom,
}

/// The fret number of one note, vertically centered on its string line.
#[derive(Debug, Clone)]
pub struct NoteNumberGlyph {
    pub x: f64,
    pub y: f64,
    pub string: usize,
    text: String,
    is_grace: bool,
    font_size: f64,
    width: f64,
    note_string_width: f64,
    height: f64,
}

impl NoteNumberGlyph {
    pub fn new(x: f64, y: f64, note: &Note, is_grace: bool) -> Self {
        let text = if note.is_dead {
            "X".to_string()
        } else if note.is_ghost {
            format!("({})", note.fret)
        } else {
            note.fret.to_string()
        };
        Self {
            x,
            y,
            string: note.string,
            text,
            is_grace,
            font_size: 0.0,
            width: 0.0,
            note_string_width: 0.0,
            height: 0.0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Width of the printed number alone, without clearance.
    pub fn note_string_width(&self) -> f64 {
        self.note_string_width
    }
}

impl Glyph for NoteNumberGlyph {
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
        self.font_size = renderer.tab_font_size() * grace;
        self.note_string_width = renderer.measure_text(&self.text, self.font_size);
        self.width = self.note_string_width + NOTE_NUMBER_PADDING * renderer.scale() * grace;
        self.height = self.font_size;
    }

    fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas) {
        let left = cx + self.x;
        let center_y = cy + self.y;
        // mask the string line behind the number
        canvas.fill_rect(
            left,
            center_y - self.height / 2.0,
            self.note_string_width,
            self.height,
            BACKGROUND_COLOR,
        );
        canvas.fill_text(
            left + self.note_string_width / 2.0,
            center_y + self.font_size * 0.35,
            &self.text,
            self.font_size,
            NOTE_COLOR,
            TextAlign::Center,
        );
    }
}

/// All fret numbers of one beat, stacked vertically, plus the beat effects
/// drawn with them.
#[derive(Debug)]
pub struct TabNoteChordGlyph {
    pub x: f64,
    pub y: f64,
    pub beat: usize,
    pub beat_effects: BeatEffects,
    is_grace: bool,
    beaming_helper: SharedBeamingHelper,
    notes: Vec<NoteNumberGlyph>,
    note_lookup: HashMap<usize, usize>,
    width: f64,
    note_string_width: f64,
    min_y: f64,
    max_y: f64,
}

impl TabNoteChordGlyph {
    pub fn new(x: f64, y: f64, beat: usize, is_grace: bool, beaming_helper: SharedBeamingHelper) -> Self {
        Self {
            x,
            y,
            beat,
            beat_effects: BeatEffects::new(),
            is_grace,
            beaming_helper,
            notes: Vec::new(),
            note_lookup: HashMap::new(),
            width: 0.0,
            note_string_width: 0.0,
            min_y: 0.0,
            max_y: 0.0,
        }
    }

    pub fn is_grace(&self) -> bool {
        self.is_grace
    }

    /// Add an already laid out note number. A second number on the same
    /// string replaces the lookup entry of the first.
    pub fn add_note_glyph(&mut self, glyph: NoteNumberGlyph) {
        self.note_lookup.insert(glyph.string, self.notes.len());
        self.notes.push(glyph);
    }

    pub fn note_glyphs(&self) -> &[NoteNumberGlyph] {
        &self.notes
    }

    pub fn note_glyph(&self, string: usize) -> Option<&NoteNumberGlyph> {
        self.note_lookup.get(&string).map(|&i| &self.notes[i])
    }

    /// Widest printed number, which is what the beat centers on.
    pub fn note_string_width(&self) -> f64 {
        self.note_string_width
    }

    pub fn get_note_x(&self, note: &Note, position: NoteXPosition) -> f64 {
        let Some(n) = self.note_glyph(note.string) else {
            return 0.0;
        };
        let left = self.x + n.x;
        match position {
            NoteXPosition::Left => left,
            NoteXPosition::Center => left + n.note_string_width / 2.0,
            NoteXPosition::Right => left + n.width,
        }
    }

    pub fn get_note_y(&self, note: &Note, position: NoteYPosition) -> f64 {
        let Some(n) = self.note_glyph(note.string) else {
            return 0.0;
        };
        let center = self.y + n.y;
        match position {
            NoteYPosition::Top => center - n.height / 2.0,
            NoteYPosition::Center => center,
            NoteYPosition::Bottom => center + n.height / 2.0,
        }
    }

    pub fn update_beaming_helper(&self, cx: f64) {
        self.beaming_helper
            .borrow_mut()
            .register_beat_line_x(self.beat, cx + self.x + self.note_string_width / 2.0);
    }

    pub fn build_bounds_lookup(&self, bounds: &mut BeatBounds, cx: f64, cy: f64) {
        for n in &self.notes {
            bounds.add_note(NoteBounds {
                string: n.string,
                bounds: Bounds {
                    x: cx + self.x + n.x,
                    y: cy + self.y + n.y - n.height / 2.0,
                    w: n.width,
                    h: n.height,
                },
            });
        }
    }
}

impl Glyph for TabNoteChordGlyph {
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
        let mut w = 0.0f64;
        let mut note_string_width = 0.0f64;
        let mut min_y = f64::MAX;
        let mut max_y = f64::MIN;
        for n in &self.notes {
            w = w.max(n.width);
            note_string_width = note_string_width.max(n.note_string_width);
            min_y = min_y.min(n.y - n.height / 2.0);
            max_y = max_y.max(n.y + n.height / 2.0);
        }
        if self.notes.is_empty() {
            min_y = 0.0;
            max_y = 0.0;
        }
        self.width = w;
        self.note_string_width = note_string_width;
        self.min_y = min_y;
        self.max_y = max_y;

        for effect in self.beat_effects.values_mut() {
            effect.do_layout(renderer);
        }
    }

    fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas) {
        let left = cx + self.x;
        let top = cy + self.y;
        for n in &self.notes {
            n.paint(left, top, canvas);
        }
        for effect in self.beat_effects.values() {
            effect.paint(left + self.note_string_width / 2.0, top + self.max_y, canvas);
        }
    }
}
