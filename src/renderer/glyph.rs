//! The glyph protocol and the drawing-surface seam.
//!
//! A glyph is laid out once per layout pass against a [`TabBarRenderer`],
//! after which its position and size are fixed until the next pass
//! rebuilds the tree.

use super::bar::TabBarRenderer;

/// Horizontal text alignment for [`Canvas::fill_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Painting capability supplied by a platform adapter.
///
/// Coordinates are absolute; colors are CSS color strings.
pub trait Canvas {
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str);
    fn fill_circle(&mut self, cx: f64, cy: f64, r: f64, color: &str);
    fn stroke_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: &str, width: f64);
    fn stroke_polyline(&mut self, points: &[(f64, f64)], color: &str, width: f64);
    fn fill_polygon(&mut self, points: &[(f64, f64)], color: &str);
    fn stroke_polygon(&mut self, points: &[(f64, f64)], color: &str, width: f64);
    fn fill_text(&mut self, x: f64, y: f64, text: &str, size: f64, color: &str, align: TextAlign);
}

/// A positioned, sized, paintable unit.
///
/// `x` is relative to the owning glyph. `do_layout` computes width (and
/// whatever the glyph needs to paint) and may recurse into children.
pub trait Glyph {
    fn x(&self) -> f64;
    fn set_x(&mut self, x: f64);
    fn width(&self) -> f64;
    fn do_layout(&mut self, renderer: &TabBarRenderer<'_>);
    fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas);
}

/// Invisible glyph that only occupies horizontal space.
#[derive(Debug, Clone)]
pub struct SpacingGlyph {
    pub x: f64,
    pub y: f64,
    width: f64,
}

impl SpacingGlyph {
    pub fn new(x: f64, y: f64, width: f64) -> Self {
        Self { x, y, width }
    }
}

impl Glyph for SpacingGlyph {
    fn x(&self) -> f64 {
        self.x
    }

    fn set_x(&mut self, x: f64) {
        self.x = x;
    }

    fn width(&self) -> f64 {
        self.width
    }

    fn do_layout(&mut self, _renderer: &TabBarRenderer<'_>) {}

    fn paint(&self, _cx: f64, _cy: f64, _canvas: &mut dyn Canvas) {}
}

/// Filled circle, used for rhythm dots.
#[derive(Debug, Clone)]
pub struct CircleGlyph {
    pub x: f64,
    pub y: f64,
    size: f64,
    width: f64,
}

impl CircleGlyph {
    pub fn new(x: f64, y: f64, size: f64) -> Self {
        Self {
            x,
            y,
            size,
            width: 0.0,
        }
    }

    pub fn size(&self) -> f64 {
        self.size
    }
}

impl Glyph for CircleGlyph {
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
        self.width = self.size + super::constants::DOT_PADDING * renderer.scale();
    }

    fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas) {
        canvas.fill_circle(
            cx + self.x + self.size,
            cy + self.y,
            self.size,
            super::constants::NOTE_COLOR,
        );
    }
}
