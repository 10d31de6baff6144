//! SVG builder — accumulates SVG elements and produces the final string.
//!
//! It is the drawing surface the crate ships with: it implements
//! [`Canvas`], so glyph trees paint into it directly.

use super::glyph::{Canvas, TextAlign};

// ═══════════════════════════════════════════════════════════════════════
// SvgBuilder
// ═══════════════════════════════════════════════════════════════════════

pub struct SvgBuilder {
    pub(super) elements: Vec<String>,
    width: f64,
    height: f64,
}

impl SvgBuilder {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            elements: Vec::new(),
            width,
            height,
        }
    }

    pub fn build(self) -> String {
        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {} {}" width="{}" height="{}" style="font-family: 'Arial', 'Helvetica', sans-serif;">"#,
            self.width, self.height, self.width, self.height
        );
        svg.push('\n');
        for el in &self.elements {
            svg.push_str("  ");
            svg.push_str(el);
            svg.push('\n');
        }
        svg.push_str("</svg>\n");
        svg
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: &str, width: f64) {
        self.elements.push(format!(
            r#"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="{:.1}" stroke-linecap="round"/>"#,
            x1, y1, x2, y2, color, width
        ));
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: &str, stroke: &str, stroke_width: f64) {
        if stroke_width > 0.0 {
            self.elements.push(format!(
                r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}" stroke="{}" stroke-width="{:.1}"/>"#,
                x, y, w, h, fill, stroke, stroke_width
            ));
        } else {
            self.elements.push(format!(
                r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"/>"#,
                x, y, w, h, fill
            ));
        }
    }

    pub fn circle(&mut self, cx: f64, cy: f64, r: f64, fill: &str) {
        self.elements.push(format!(
            r#"<circle cx="{:.1}" cy="{:.1}" r="{:.1}" fill="{}"/>"#,
            cx, cy, r, fill
        ));
    }

    pub fn text(&mut self, x: f64, y: f64, content: &str, size: f64, weight: &str, fill: &str, anchor: &str) {
        self.elements.push(format!(
            r#"<text x="{:.1}" y="{:.1}" font-size="{:.1}" font-weight="{}" fill="{}" text-anchor="{}">{}</text>"#,
            x,
            y,
            size,
            weight,
            fill,
            anchor,
            escape(content)
        ));
    }

    pub fn path(&mut self, d: &str, fill: &str, stroke: &str, stroke_width: f64) {
        self.elements.push(format!(
            r#"<path d="{}" fill="{}" stroke="{}" stroke-width="{:.1}" stroke-linecap="round"/>"#,
            d, fill, stroke, stroke_width
        ));
    }
}

fn escape(content: &str) -> String {
    content
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn points_to_path(points: &[(f64, f64)], close: bool) -> String {
    let mut d = String::new();
    for (i, (x, y)) in points.iter().enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        d.push_str(&format!("{}{:.1},{:.1} ", cmd, x, y));
    }
    if close {
        d.push('Z');
    }
    d.trim_end().to_string()
}

impl Canvas for SvgBuilder {
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: &str) {
        self.rect(x, y, w, h, color, "none", 0.0);
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, r: f64, color: &str) {
        self.circle(cx, cy, r, color);
    }

    fn stroke_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: &str, width: f64) {
        self.line(x1, y1, x2, y2, color, width);
    }

    fn stroke_polyline(&mut self, points: &[(f64, f64)], color: &str, width: f64) {
        if points.len() < 2 {
            return;
        }
        self.path(&points_to_path(points, false), "none", color, width);
    }

    fn fill_polygon(&mut self, points: &[(f64, f64)], color: &str) {
        if points.len() < 3 {
            return;
        }
        self.path(&points_to_path(points, true), color, "none", 0.0);
    }

    fn stroke_polygon(&mut self, points: &[(f64, f64)], color: &str, width: f64) {
        if points.len() < 3 {
            return;
        }
        self.path(&points_to_path(points, true), "none", color, width);
    }

    fn fill_text(&mut self, x: f64, y: f64, text: &str, size: f64, color: &str, align: TextAlign) {
        let anchor = match align {
            TextAlign::Left => "start",
            TextAlign::Center => "middle",
            TextAlign::Right => "end",
        };
        self.text(x, y, text, size, "normal", color, anchor);
    }
}

/// Placeholder document for scores with nothing to draw.
pub(super) fn empty_svg(message: &str) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 400 100\">\
         <text x=\"200\" y=\"50\" text-anchor=\"middle\" font-size=\"14\" fill=\"gray\">{}</text>\
         </svg>",
        escape(message)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polygon_paths_are_closed() {
        let mut svg = SvgBuilder::new(10.0, 10.0);
        svg.fill_polygon(&[(0.0, 0.0), (4.0, 0.0), (2.0, 3.0)], "black");
        svg.stroke_polyline(&[(0.0, 0.0)], "black", 1.0);
        assert_eq!(svg.elements.len(), 1);
        assert!(svg.elements[0].contains(r#"d="M0.0,0.0 L4.0,0.0 L2.0,3.0 Z""#));
    }

    #[test]
    fn text_is_escaped() {
        let mut svg = SvgBuilder::new(10.0, 10.0);
        svg.fill_text(1.0, 2.0, "<3>", 10.0, "black", TextAlign::Center);
        let doc = svg.build();
        assert!(doc.contains("&lt;3&gt;"));
        assert!(doc.contains(r#"text-anchor="middle""#));
    }
}
