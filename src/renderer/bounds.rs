//! Hit-testing rectangles collected after layout.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Bounds {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.w && y >= self.y && y <= self.y + self.h
    }
}

/// Absolute rectangle of one fret number.
#[derive(Debug, Clone, Serialize)]
pub struct NoteBounds {
    /// String of the note, which identifies it within its beat
    pub string: usize,
    pub bounds: Bounds,
}

/// Absolute rectangles of one beat and its notes.
#[derive(Debug, Clone, Serialize)]
pub struct BeatBounds {
    pub beat: usize,
    /// Area the beat's glyphs cover
    pub visual_bounds: Bounds,
    /// Area the beat owns, including padding
    pub real_bounds: Bounds,
    pub notes: Vec<NoteBounds>,
}

impl BeatBounds {
    pub fn new(beat: usize) -> Self {
        Self {
            beat,
            visual_bounds: Bounds::default(),
            real_bounds: Bounds::default(),
            notes: Vec::new(),
        }
    }

    pub fn add_note(&mut self, bounds: NoteBounds) {
        self.notes.push(bounds);
    }

    /// String of the note whose rectangle contains the point.
    pub fn find_note_at_pos(&self, x: f64, y: f64) -> Option<usize> {
        self.notes
            .iter()
            .find(|n| n.bounds.contains(x, y))
            .map(|n| n.string)
    }
}
