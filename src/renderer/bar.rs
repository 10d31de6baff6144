//! Coordinate system of one tablature bar, and the bar layout it drives.
//!
//! Y coordinates are relative to the top line of the staff; X coordinates
//! are relative to the left edge of the bar.

use crate::model::{Bar, Duration, Staff};
use crate::settings::{RenderSettings, TabRhythmMode};

use super::beat::BeatContainerGlyph;
use super::bounds::BeatBounds;
use super::constants::*;
use super::glyph::Canvas;
use super::helpers::{BeamingHelper, CollisionHelper, SharedBeamingHelper};
use super::metrics::TextMeasurer;

/// Read-only view of one bar of a staff, plus the settings and font
/// metrics every glyph lays itself out against.
pub struct TabBarRenderer<'a> {
    staff: &'a Staff,
    bar_index: usize,
    settings: &'a RenderSettings,
    metrics: &'a dyn TextMeasurer,
}

impl<'a> TabBarRenderer<'a> {
    pub fn new(
        staff: &'a Staff,
        bar_index: usize,
        settings: &'a RenderSettings,
        metrics: &'a dyn TextMeasurer,
    ) -> Self {
        Self {
            staff,
            bar_index,
            settings,
            metrics,
        }
    }

    /// The bar being rendered; `None` when the staff is shorter than the
    /// score and this bar is padding.
    pub fn bar(&self) -> Option<&'a Bar> {
        self.staff.bars.get(self.bar_index)
    }

    pub fn settings(&self) -> &RenderSettings {
        self.settings
    }

    pub fn scale(&self) -> f64 {
        self.settings.scale
    }

    /// Number of tablature lines, one per string.
    pub fn line_count(&self) -> usize {
        self.staff.line_count()
    }

    /// Scaled distance between two lines.
    pub fn line_offset(&self) -> f64 {
        self.settings.notation.tab_line_spacing * self.scale()
    }

    /// Y of a line; line 0 is the top line.
    pub fn get_line_y(&self, line: usize) -> f64 {
        self.line_offset() * line as f64
    }

    /// Y of the center of a fret number written on `line`.
    pub fn get_tab_y(&self, line: usize) -> f64 {
        self.get_line_y(line)
    }

    /// Distance from the top line to the bottom line.
    pub fn staff_height(&self) -> f64 {
        self.get_line_y(self.line_count().saturating_sub(1))
    }

    pub fn rhythm_mode(&self) -> TabRhythmMode {
        self.settings.notation.rhythm_mode
    }

    /// Scaled height of the rhythm row.
    pub fn rhythm_height(&self) -> f64 {
        self.settings.notation.rhythm_height * self.scale()
    }

    pub fn show_rests(&self) -> bool {
        self.settings.notation.show_tab_rests
    }

    /// Scaled font size of fret numbers.
    pub fn tab_font_size(&self) -> f64 {
        self.settings.notation.tab_font_size * self.scale()
    }

    pub fn measure_text(&self, text: &str, font_size: f64) -> f64 {
        self.metrics.measure_text(text, font_size)
    }

    /// Lay out every beat of the bar, voice by voice.
    ///
    /// Voices start at the same X and run independently; the bar is as
    /// wide as its widest voice. Each beat is placed in the collision
    /// ledger at its start tick, so beats of later voices see the numbers
    /// of earlier voices that start at the same time.
    pub fn layout_bar(&self) -> BarLayout<'a> {
        let scale = self.scale();
        let mut collisions = CollisionHelper::new();
        let mut voices = Vec::new();
        let mut width = 0.0f64;

        let voice_src = self.bar().map(|b| b.voices.as_slice()).unwrap_or(&[]);
        for (index, voice) in voice_src.iter().enumerate() {
            let beaming_helper = BeamingHelper::shared();
            let mut x = BAR_PADDING_LEFT * scale;
            let mut tick = 0u32;
            let mut beats = Vec::with_capacity(voice.beats.len());

            for beat in &voice.beats {
                beaming_helper.borrow_mut().register_beat(beat);
                collisions.place_beat(beat, tick);
                tick += beat.ticks();
                let mut container = BeatContainerGlyph::new(beat, beaming_helper.clone());
                container.do_layout(self, &mut collisions);
                container.x = x;
                container.update_beaming_helper();
                x += container.width();
                beats.push(container);
            }

            if !beats.is_empty() {
                width = width.max(x + BAR_PADDING_RIGHT * scale);
            }
            voices.push(VoiceLayout {
                index,
                beaming_helper,
                beats,
            });
        }

        if width == 0.0 {
            width = EMPTY_BAR_WIDTH * scale;
        }

        let top_overflow = voices
            .iter()
            .flat_map(|v| v.beats.iter())
            .map(|b| b.top_overflow())
            .fold(0.0, f64::max);

        log::trace!(
            "bar {}: {} voices, width {:.1}, {} slot reservations",
            self.bar_index,
            voices.len(),
            width,
            collisions.reservations().len()
        );

        BarLayout {
            index: self.bar_index,
            x: 0.0,
            width,
            min_width: width,
            line_count: self.line_count(),
            line_offset: self.line_offset(),
            rhythm_height: self.rhythm_height(),
            rhythm_mode: self.rhythm_mode(),
            scale,
            top_overflow,
            voices,
            collisions,
        }
    }
}

/// Beats of one voice after layout.
#[derive(Debug)]
pub struct VoiceLayout<'a> {
    pub index: usize,
    pub beaming_helper: SharedBeamingHelper,
    pub beats: Vec<BeatContainerGlyph<'a>>,
}

/// One laid out bar.
#[derive(Debug)]
pub struct BarLayout<'a> {
    pub index: usize,
    /// Offset within the system, set by the score layout
    pub x: f64,
    width: f64,
    min_width: f64,
    line_count: usize,
    line_offset: f64,
    rhythm_height: f64,
    rhythm_mode: TabRhythmMode,
    scale: f64,
    top_overflow: f64,
    pub voices: Vec<VoiceLayout<'a>>,
    pub collisions: CollisionHelper,
}

impl<'a> BarLayout<'a> {
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Natural width before justification.
    pub fn min_width(&self) -> f64 {
        self.min_width
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn line_offset(&self) -> f64 {
        self.line_offset
    }

    pub fn staff_height(&self) -> f64 {
        self.line_offset * self.line_count.saturating_sub(1) as f64
    }

    /// Space needed above the top line.
    pub fn top_overflow(&self) -> f64 {
        self.top_overflow
    }

    /// Space needed below the bottom line.
    pub fn bottom_overflow(&self) -> f64 {
        if self.rhythm_mode == TabRhythmMode::Hidden {
            0.0
        } else {
            self.line_offset + self.rhythm_height
        }
    }

    pub fn beat(&self, beat_id: usize) -> Option<&BeatContainerGlyph<'a>> {
        self.voices
            .iter()
            .flat_map(|v| v.beats.iter())
            .find(|b| b.beat.id == beat_id)
    }

    /// Stretch the bar to `width`, handing the extra space to the beats in
    /// proportion to their own widths, and re-anchor the beaming helpers.
    /// A narrower target is ignored.
    pub fn scale_to_width(&mut self, width: f64) {
        let extra = width - self.width;
        if extra <= 0.0 {
            return;
        }
        for voice in &mut self.voices {
            let total: f64 = voice.beats.iter().map(|b| b.width()).sum();
            if total <= 0.0 {
                continue;
            }
            let mut shift = 0.0;
            for beat in &mut voice.beats {
                let grow = extra * beat.width() / total;
                beat.x += shift;
                beat.set_width(beat.width() + grow);
                beat.update_beaming_helper();
                shift += grow;
            }
        }
        self.width = width;
    }

    /// Hit-testing rectangles of every beat, absolute to `(cx, cy)`, which
    /// is the bar's top-left corner on the top line.
    pub fn build_bounds_lookup(&self, cx: f64, cy: f64) -> Vec<BeatBounds> {
        let height = self.staff_height();
        self.voices
            .iter()
            .flat_map(|v| v.beats.iter())
            .map(|b| b.build_bounds_lookup(cx, cy, height))
            .collect()
    }

    /// Paint beats, their decorations and the rhythm row. `(cx, cy)` is the
    /// bar's left edge on the top line; staff lines are painted by the caller.
    pub fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas) {
        for voice in &self.voices {
            for beat in &voice.beats {
                beat.paint(cx, cy, canvas);
            }
        }
        if self.rhythm_mode != TabRhythmMode::Hidden {
            for voice in &self.voices {
                self.paint_rhythm(voice, cx, cy, canvas);
            }
        }
    }

    fn paint_rhythm(&self, voice: &VoiceLayout<'_>, cx: f64, cy: f64, canvas: &mut dyn Canvas) {
        let helper = voice.beaming_helper.borrow();
        let stem_top = cy + self.staff_height() + RHYTHM_STEM_GAP * self.scale;
        let stem_bottom = cy + self.line_offset * self.line_count as f64 + self.rhythm_height;
        let flag_gap = RHYTHM_FLAG_GAP * self.scale;

        // (x, duration) of each stemmed beat, None for rests to break beams
        let stems: Vec<Option<(f64, Duration)>> = voice
            .beats
            .iter()
            .map(|b| {
                if b.beat.is_rest() {
                    return None;
                }
                let duration = helper.duration_of(b.beat.id).filter(|d| d.has_stem())?;
                helper.beat_line_x(b.beat.id).map(|x| (cx + x, duration))
            })
            .collect();
        let flags_of = |stem: Option<(f64, Duration)>| stem.map(|(x, d)| (x, d.flag_count()));

        for (i, stem) in stems.iter().enumerate() {
            let Some((x, duration)) = *stem else {
                continue;
            };
            let flags = duration.flag_count();
            let top = if duration == Duration::Half {
                (stem_top + stem_bottom) / 2.0
            } else {
                stem_top
            };
            canvas.stroke_line(x, top, x, stem_bottom, NOTE_COLOR, STEM_WIDTH * self.scale);
            if flags == 0 {
                continue;
            }

            let next = flags_of(stems.get(i + 1).copied().flatten()).filter(|&(_, f)| f > 0);
            let prev = flags_of(i.checked_sub(1).and_then(|p| stems[p])).filter(|&(_, f)| f > 0);
            let beamed = self.rhythm_mode == TabRhythmMode::ShowWithBeams && (next.is_some() || prev.is_some());

            if beamed {
                if let Some((next_x, next_flags)) = next {
                    for level in 0..flags.min(next_flags) {
                        let y = stem_bottom - level as f64 * flag_gap;
                        canvas.stroke_line(x, y, next_x, y, NOTE_COLOR, 2.0 * self.scale);
                    }
                }
            } else {
                let len = RHYTHM_FLAG_LENGTH * self.scale;
                for level in 0..flags {
                    let y = stem_bottom - level as f64 * flag_gap;
                    canvas.stroke_line(x, y, x + len, y - len * 0.6, NOTE_COLOR, 1.2 * self.scale);
                }
            }
        }
    }
}
