//! Text measurement seam.
//!
//! Platform adapters that know real font metrics implement
//! [`TextMeasurer`]; without one, [`FixedWidthMetrics`] approximates a
//! tabular-figure font, which is what fret numbers are set in.

/// Measures the advance width of a string at a font size.
pub trait TextMeasurer {
    fn measure_text(&self, text: &str, font_size: f64) -> f64;
}

/// Every character advances by the same fraction of the font size.
#[derive(Debug, Clone, Copy)]
pub struct FixedWidthMetrics {
    pub char_width_ratio: f64,
}

impl Default for FixedWidthMetrics {
    fn default() -> Self {
        Self {
            char_width_ratio: 0.6,
        }
    }
}

impl TextMeasurer for FixedWidthMetrics {
    fn measure_text(&self, text: &str, font_size: f64) -> f64 {
        text.chars().count() as f64 * font_size * self.char_width_ratio
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_width_scales_with_length_and_size() {
        let m = FixedWidthMetrics::default();
        assert_eq!(m.measure_text("", 10.0), 0.0);
        assert!((m.measure_text("12", 10.0) - 12.0).abs() < 1e-9);
        assert!((m.measure_text("5", 20.0) - 12.0).abs() < 1e-9);
    }
}
