//! Beat-level effect glyphs: tremolo picking and whammy bar.

use std::collections::HashMap;

use crate::model::{Beat, BendPoint, Duration};

use super::bar::TabBarRenderer;
use super::constants::*;
use super::glyph::{Canvas, Glyph, TextAlign};

/// Key of the tremolo picking entry in [`BeatEffects`].
pub const TREMOLO_EFFECT: &str = "tremolo";

/// Effect glyphs attached to a beat's content, keyed by effect name.
pub type BeatEffects = HashMap<&'static str, EffectGlyph>;

#[derive(Debug, Clone)]
pub enum EffectGlyph {
    Tremolo(TremoloPickingGlyph),
}

impl Glyph for EffectGlyph {
    fn x(&self) -> f64 {
        match self {
            EffectGlyph::Tremolo(g) => g.x,
        }
    }

    fn set_x(&mut self, x: f64) {
        match self {
            EffectGlyph::Tremolo(g) => g.x = x,
        }
    }

    fn width(&self) -> f64 {
        match self {
            EffectGlyph::Tremolo(g) => g.width,
        }
    }

    fn do_layout(&mut self, renderer: &TabBarRenderer<'_>) {
        match self {
            EffectGlyph::Tremolo(g) => g.do_layout(renderer),
        }
    }

    fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas) {
        match self {
            EffectGlyph::Tremolo(g) => g.paint(cx, cy, canvas),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Tremolo picking
// ═══════════════════════════════════════════════════════════════════════

/// Slanted strokes marking a tremolo-picked beat, one per flag of `speed`.
#[derive(Debug, Clone)]
pub struct TremoloPickingGlyph {
    pub x: f64,
    pub y: f64,
    pub speed: Duration,
    width: f64,
    stroke_gap: f64,
}

impl TremoloPickingGlyph {
    pub fn new(x: f64, y: f64, speed: Duration) -> Self {
        Self {
            x,
            y,
            speed,
            width: 0.0,
            stroke_gap: TREMOLO_STROKE_GAP,
        }
    }

    fn stroke_count(&self) -> usize {
        self.speed.flag_count().max(1)
    }

    fn do_layout(&mut self, renderer: &TabBarRenderer<'_>) {
        self.width = TREMOLO_STROKE_WIDTH * renderer.scale();
        self.stroke_gap = TREMOLO_STROKE_GAP * renderer.scale();
    }

    fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas) {
        let left = cx + self.x - self.width / 2.0;
        let top = cy + self.y;
        for i in 0..self.stroke_count() {
            let y = top + i as f64 * self.stroke_gap;
            canvas.stroke_line(left, y + self.stroke_gap / 2.0, left + self.width, y, EFFECT_COLOR, 1.5);
        }
    }
}

/// Indent and vertical offset of the tremolo mark, both scaled.
///
/// Faster speeds sit further from the notes. Beats longer than a half note
/// have no stem to clear, so their mark is not indented.
pub fn tremolo_offsets(speed: Duration, duration: Duration, scale: f64) -> (f64, f64) {
    let offset = match speed {
        Duration::ThirtySecond => TREMOLO_OFFSET_32ND,
        Duration::Sixteenth => TREMOLO_OFFSET_16TH,
        Duration::Eighth => TREMOLO_OFFSET_8TH,
        _ => 0.0,
    };
    let indent = if duration < Duration::Half {
        0.0
    } else {
        TREMOLO_INDENT
    };
    (indent * scale, offset * scale)
}

/// Add the tremolo mark of `beat` to `effects`.
///
/// Returns false, leaving the map untouched, when the beat is not tremolo
/// picked or a tremolo entry already exists.
pub fn insert_tremolo_effect(effects: &mut BeatEffects, beat: &Beat, scale: f64) -> bool {
    if !beat.is_tremolo() || effects.contains_key(TREMOLO_EFFECT) {
        return false;
    }
    let Some(speed) = beat.tremolo_speed else {
        return false;
    };
    let (x, y) = tremolo_offsets(speed, beat.duration, scale);
    effects.insert(
        TREMOLO_EFFECT,
        EffectGlyph::Tremolo(TremoloPickingGlyph::new(x, y, speed)),
    );
    true
}

// ═══════════════════════════════════════════════════════════════════════
// Whammy bar
// ═══════════════════════════════════════════════════════════════════════

/// Whammy bar curve drawn above the staff across the width of its beat.
///
/// It is not packed into the beat glyph; the beat container keeps it with
/// its other tie-like decorations and paints it after the beat.
#[derive(Debug, Clone)]
pub struct TabWhammyBarGlyph {
    pub beat: usize,
    points: Vec<BendPoint>,
    value_height: f64,
    label_size: f64,
    top_overflow: f64,
    bottom_overflow: f64,
}

impl TabWhammyBarGlyph {
    pub fn new(beat: &Beat) -> Self {
        Self {
            beat: beat.id,
            points: beat.whammy_bar_points.clone(),
            value_height: WHAMMY_VALUE_HEIGHT,
            label_size: WHAMMY_LABEL_HEIGHT,
            top_overflow: 0.0,
            bottom_overflow: 0.0,
        }
    }

    pub fn do_layout(&mut self, renderer: &TabBarRenderer<'_>) {
        let scale = renderer.scale();
        self.value_height = WHAMMY_VALUE_HEIGHT * scale;
        self.label_size = WHAMMY_LABEL_HEIGHT * scale;

        let max = self.points.iter().map(|p| p.value).max().unwrap_or(0).max(0);
        let min = self.points.iter().map(|p| p.value).min().unwrap_or(0).min(0);
        self.top_overflow = max as f64 * self.value_height + self.label_size;
        self.bottom_overflow = -min as f64 * self.value_height;
    }

    /// Space needed above the staff for the curve and its label.
    pub fn height(&self) -> f64 {
        self.top_overflow + self.bottom_overflow
    }

    /// Depth of the curve below its zero line.
    pub fn bottom_overflow(&self) -> f64 {
        self.bottom_overflow
    }

    /// Paint the curve. `zero_y` is the absolute Y of the unbent pitch and
    /// the curve spans `[cx, cx + width]`.
    pub fn paint(&self, cx: f64, zero_y: f64, width: f64, canvas: &mut dyn Canvas) {
        if self.points.is_empty() {
            return;
        }
        let coords: Vec<(f64, f64)> = self
            .points
            .iter()
            .map(|p| {
                let x = cx + p.offset.clamp(0.0, BEND_POINT_MAX_OFFSET) / BEND_POINT_MAX_OFFSET * width;
                (x, zero_y - p.value as f64 * self.value_height)
            })
            .collect();
        canvas.stroke_polyline(&coords, EFFECT_COLOR, 1.0);

        if let Some((i, peak)) = self
            .points
            .iter()
            .enumerate()
            .filter(|(_, p)| p.value != 0)
            .max_by_key(|(_, p)| p.value.abs())
        {
            let (x, y) = coords[i];
            let label_y = if peak.value > 0 { y - 2.0 } else { y + self.label_size };
            canvas.fill_text(x, label_y, &whammy_label(peak.value), self.label_size * 0.8, EFFECT_COLOR, TextAlign::Center);
        }
    }
}

/// Text for a whammy value given in quarter tones ("1/2", "full", "-1 1/2").
pub fn whammy_label(value: i32) -> String {
    const FRACTIONS: [&str; 4] = ["", "1/4", "1/2", "3/4"];
    let sign = if value < 0 { "-" } else { "" };
    let abs = value.unsigned_abs();
    let whole = abs / 4;
    let frac = FRACTIONS[(abs % 4) as usize];
    match (whole, frac.is_empty()) {
        (0, true) => "0".to_string(),
        (0, false) => format!("{sign}{frac}"),
        (1, true) if value > 0 => "full".to_string(),
        (_, true) => format!("{sign}{whole}"),
        (_, false) => format!("{sign}{whole} {frac}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tremolo_beat(duration: Duration, speed: Duration) -> Beat {
        let mut beat = Beat::new(1, duration);
        beat.tremolo_speed = Some(speed);
        beat
    }

    #[test]
    fn tremolo_offset_tiers() {
        assert_eq!(tremolo_offsets(Duration::ThirtySecond, Duration::Quarter, 1.0), (5.0, 10.0));
        assert_eq!(tremolo_offsets(Duration::Sixteenth, Duration::Quarter, 1.0), (5.0, 5.0));
        assert_eq!(tremolo_offsets(Duration::Eighth, Duration::Quarter, 1.0), (5.0, 0.0));
        assert_eq!(tremolo_offsets(Duration::ThirtySecond, Duration::Quarter, 2.0), (10.0, 20.0));
    }

    #[test]
    fn tremolo_indent_is_zero_for_long_beats() {
        assert_eq!(tremolo_offsets(Duration::ThirtySecond, Duration::Whole, 1.0).0, 0.0);
        assert_eq!(tremolo_offsets(Duration::ThirtySecond, Duration::DoubleWhole, 1.0).0, 0.0);
        assert_eq!(tremolo_offsets(Duration::ThirtySecond, Duration::Half, 1.0).0, 5.0);
    }

    #[test]
    fn tremolo_insertion_is_idempotent() {
        let beat = tremolo_beat(Duration::Quarter, Duration::Sixteenth);
        let mut effects = BeatEffects::new();
        assert!(insert_tremolo_effect(&mut effects, &beat, 1.0));
        assert!(!insert_tremolo_effect(&mut effects, &beat, 1.0));
        assert_eq!(effects.len(), 1);

        let EffectGlyph::Tremolo(glyph) = &effects[TREMOLO_EFFECT];
        assert_eq!(glyph.speed, Duration::Sixteenth);
        assert_eq!(glyph.y, 5.0);
    }

    #[test]
    fn tremolo_is_not_inserted_for_plain_beats() {
        let beat = Beat::new(1, Duration::Quarter);
        let mut effects = BeatEffects::new();
        assert!(!insert_tremolo_effect(&mut effects, &beat, 1.0));
        assert!(effects.is_empty());
    }

    #[test]
    fn whammy_labels() {
        assert_eq!(whammy_label(1), "1/4");
        assert_eq!(whammy_label(2), "1/2");
        assert_eq!(whammy_label(4), "full");
        assert_eq!(whammy_label(-4), "-1");
        assert_eq!(whammy_label(-6), "-1 1/2");
        assert_eq!(whammy_label(8), "2");
    }
}
