//! Beat glyphs for tablature.
//!
//! [`TabBeatGlyph`] turns one beat into exactly one primary content glyph
//! (rest, slash head or fret-number stack), adds the optional overlays
//! (whammy bar, tremolo picking, rhythm dots) and packs everything left to
//! right. [`BeatContainerGlyph`] places it inside the bar and keeps the
//! tie-like decorations that are drawn across the beat rather than packed.

use crate::model::{Beat, Note};
use crate::settings::TabRhythmMode;

use super::bar::TabBarRenderer;
use super::bounds::{BeatBounds, Bounds};
use super::constants::*;
use super::effects::{insert_tremolo_effect, BeatEffects, TabWhammyBarGlyph};
use super::glyph::{Canvas, CircleGlyph, Glyph, SpacingGlyph};
use super::helpers::{CollisionHelper, SharedBeamingHelper};
use super::note_numbers::{NoteNumberGlyph, NoteXPosition, NoteYPosition, TabNoteChordGlyph};
use super::rest::TabRestGlyph;
use super::slash::SlashNoteHeadGlyph;

/// The one glyph that represents what a beat sounds like.
#[derive(Debug)]
pub enum PrimaryContent {
    Rest(TabRestGlyph),
    Slash(SlashNoteHeadGlyph),
    Notes(TabNoteChordGlyph),
}

impl PrimaryContent {
    /// Effects map of the content; rests carry none.
    pub fn beat_effects(&self) -> Option<&BeatEffects> {
        match self {
            PrimaryContent::Rest(_) => None,
            PrimaryContent::Slash(g) => Some(&g.beat_effects),
            PrimaryContent::Notes(g) => Some(&g.beat_effects),
        }
    }

    pub fn beat_effects_mut(&mut self) -> Option<&mut BeatEffects> {
        match self {
            PrimaryContent::Rest(_) => None,
            PrimaryContent::Slash(g) => Some(&mut g.beat_effects),
            PrimaryContent::Notes(g) => Some(&mut g.beat_effects),
        }
    }

    fn update_beaming_helper(&self, cx: f64) {
        match self {
            PrimaryContent::Rest(g) => g.update_beaming_helper(cx),
            PrimaryContent::Slash(g) => g.update_beaming_helper(cx),
            PrimaryContent::Notes(g) => g.update_beaming_helper(cx),
        }
    }

    fn as_glyph(&self) -> &dyn Glyph {
        match self {
            PrimaryContent::Rest(g) => g,
            PrimaryContent::Slash(g) => g,
            PrimaryContent::Notes(g) => g,
        }
    }

    fn as_glyph_mut(&mut self) -> &mut dyn Glyph {
        match self {
            PrimaryContent::Rest(g) => g,
            PrimaryContent::Slash(g) => g,
            PrimaryContent::Notes(g) => g,
        }
    }
}

impl Glyph for PrimaryContent {
    fn x(&self) -> f64 {
        self.as_glyph().x()
    }

    fn set_x(&mut self, x: f64) {
        self.as_glyph_mut().set_x(x);
    }

    fn width(&self) -> f64 {
        self.as_glyph().width()
    }

    fn do_layout(&mut self, renderer: &TabBarRenderer<'_>) {
        self.as_glyph_mut().do_layout(renderer);
    }

    fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas) {
        self.as_glyph().paint(cx, cy, canvas);
    }
}

/// Glyphs packed after the primary content.
#[derive(Debug, Clone)]
pub enum TrailingGlyph {
    Spacing(SpacingGlyph),
    Dot(CircleGlyph),
}

impl TrailingGlyph {
    fn as_glyph(&self) -> &dyn Glyph {
        match self {
            TrailingGlyph::Spacing(g) => g,
            TrailingGlyph::Dot(g) => g,
        }
    }

    fn as_glyph_mut(&mut self) -> &mut dyn Glyph {
        match self {
            TrailingGlyph::Spacing(g) => g,
            TrailingGlyph::Dot(g) => g,
        }
    }
}

impl Glyph for TrailingGlyph {
    fn x(&self) -> f64 {
        self.as_glyph().x()
    }

    fn set_x(&mut self, x: f64) {
        self.as_glyph_mut().set_x(x);
    }

    fn width(&self) -> f64 {
        self.as_glyph().width()
    }

    fn do_layout(&mut self, renderer: &TabBarRenderer<'_>) {
        self.as_glyph_mut().do_layout(renderer);
    }

    fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas) {
        self.as_glyph().paint(cx, cy, canvas);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// TabBeatGlyph
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct TabBeatGlyph<'a> {
    beat: &'a Beat,
    beaming_helper: SharedBeamingHelper,
    pub x: f64,
    pub y: f64,
    width: f64,
    computed_width: f64,
    center_x: f64,
    content: Option<PrimaryContent>,
    trailing: Vec<TrailingGlyph>,
}

impl<'a> TabBeatGlyph<'a> {
    pub fn new(beat: &'a Beat, beaming_helper: SharedBeamingHelper) -> Self {
        Self {
            beat,
            beaming_helper,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            computed_width: 0.0,
            center_x: 0.0,
            content: None,
            trailing: Vec::new(),
        }
    }

    pub fn beat(&self) -> &'a Beat {
        self.beat
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn computed_width(&self) -> f64 {
        self.computed_width
    }

    pub fn center_x(&self) -> f64 {
        self.center_x
    }

    pub fn content(&self) -> Option<&PrimaryContent> {
        self.content.as_ref()
    }

    pub fn rest_glyph(&self) -> Option<&TabRestGlyph> {
        match &self.content {
            Some(PrimaryContent::Rest(g)) => Some(g),
            _ => None,
        }
    }

    pub fn slash(&self) -> Option<&SlashNoteHeadGlyph> {
        match &self.content {
            Some(PrimaryContent::Slash(g)) => Some(g),
            _ => None,
        }
    }

    pub fn note_numbers(&self) -> Option<&TabNoteChordGlyph> {
        match &self.content {
            Some(PrimaryContent::Notes(g)) => Some(g),
            _ => None,
        }
    }

    pub fn trailing_glyphs(&self) -> &[TrailingGlyph] {
        &self.trailing
    }

    pub fn dot_count(&self) -> usize {
        self.trailing
            .iter()
            .filter(|g| matches!(g, TrailingGlyph::Dot(_)))
            .count()
    }

    /// Build the glyph tree of the beat, pack it and compute its center.
    ///
    /// Any previous content is discarded. Every visible fret number
    /// reserves its vertical band in `collisions`, and a rest is hidden
    /// when its band is already taken there. A whammy bar is pushed onto
    /// `ties` instead of being packed.
    pub fn do_layout(
        &mut self,
        renderer: &TabBarRenderer<'_>,
        collisions: &mut CollisionHelper,
        ties: &mut Vec<TabWhammyBarGlyph>,
    ) {
        let beat = self.beat;
        let scale = renderer.scale();
        let middle_line = renderer.line_count().saturating_sub(1) / 2;
        self.content = None;
        self.trailing.clear();

        if !beat.is_rest() {
            let is_grace = renderer.settings().notation.small_grace_tab_notes && beat.is_grace();

            let mut content = if beat.slashed && !beat.notes.iter().any(|n| n.is_tie_destination) {
                PrimaryContent::Slash(SlashNoteHeadGlyph::new(
                    0.0,
                    renderer.get_line_y(middle_line),
                    beat.duration,
                    is_grace,
                    beat.id,
                    self.beaming_helper.clone(),
                ))
            } else {
                let mut chord =
                    TabNoteChordGlyph::new(0.0, 0.0, beat.id, is_grace, self.beaming_helper.clone());
                for note in beat.notes.iter().filter(|n| n.is_visible) {
                    self.create_note_glyph(&mut chord, note, is_grace, renderer, collisions);
                }
                PrimaryContent::Notes(chord)
            };

            if beat.has_whammy_bar() {
                let mut whammy = TabWhammyBarGlyph::new(beat);
                whammy.do_layout(renderer);
                ties.push(whammy);
            }

            if let Some(effects) = content.beat_effects_mut() {
                insert_tremolo_effect(effects, beat, scale);
            }
            self.content = Some(content);

            if beat.dots > 0 && renderer.rhythm_mode() != TabRhythmMode::Hidden {
                let dot_y = renderer.line_offset() * renderer.line_count() as f64 + renderer.rhythm_height();
                self.add_dots(dot_y, scale);
            }
        } else {
            let y = renderer.get_tab_y(middle_line);
            // yield to fret numbers another voice already put in this slot
            let lo = renderer.line_offset();
            let visible = renderer.show_rests() && !collisions.is_occupied(beat.id, y - lo, y + lo);
            self.content = Some(PrimaryContent::Rest(TabRestGlyph::new(
                0.0,
                y,
                visible,
                beat.duration,
                beat.id,
                self.beaming_helper.clone(),
            )));

            if beat.dots > 0 && visible {
                self.add_dots(y, scale);
            }
        }

        self.pack(renderer);
        self.center_x = self.compute_center_x();
    }

    fn create_note_glyph(
        &self,
        chord: &mut TabNoteChordGlyph,
        note: &Note,
        is_grace: bool,
        renderer: &TabBarRenderer<'_>,
        collisions: &mut CollisionHelper,
    ) {
        let line = renderer.line_count().saturating_sub(note.string);
        let mut glyph = NoteNumberGlyph::new(0.0, renderer.get_tab_y(line), note, is_grace);
        glyph.do_layout(renderer);
        let top_y = glyph.y - glyph.height() / 2.0;
        let bottom_y = top_y + glyph.height();
        chord.add_note_glyph(glyph);
        collisions.reserve_beat_slot(self.beat, top_y, bottom_y);
    }

    fn add_dots(&mut self, y: f64, scale: f64) {
        self.trailing
            .push(TrailingGlyph::Spacing(SpacingGlyph::new(0.0, 0.0, DOT_SPACING * scale)));
        for _ in 0..self.beat.dots {
            self.trailing
                .push(TrailingGlyph::Dot(CircleGlyph::new(0.0, y, DOT_SIZE * scale)));
        }
    }

    fn children_mut(&mut self) -> impl Iterator<Item = &mut dyn Glyph> + '_ {
        self.content
            .iter_mut()
            .map(|g| g as &mut dyn Glyph)
            .chain(self.trailing.iter_mut().map(|g| g as &mut dyn Glyph))
    }

    /// Left to right: each child starts where the previous one ended.
    fn pack(&mut self, renderer: &TabBarRenderer<'_>) {
        let mut w = 0.0;
        for glyph in self.children_mut() {
            glyph.set_x(w);
            glyph.do_layout(renderer);
            w += glyph.width();
        }
        self.width = w;
        self.computed_width = w;
    }

    fn compute_center_x(&self) -> f64 {
        if self.beat.is_empty {
            return self.width / 2.0;
        }
        match &self.content {
            Some(PrimaryContent::Rest(g)) => g.x + g.width() / 2.0,
            Some(PrimaryContent::Notes(g)) => g.x + g.note_string_width() / 2.0,
            Some(PrimaryContent::Slash(g)) => g.x + g.width() / 2.0,
            None => 0.0,
        }
    }

    /// X anchor of `note`, relative to this glyph's container offset.
    /// Zero when the beat shows no fret numbers.
    pub fn get_note_x(&self, note: &Note, position: NoteXPosition) -> f64 {
        self.note_numbers()
            .map_or(0.0, |g| g.get_note_x(note, position))
    }

    /// Y anchor of `note` relative to the top staff line.
    /// Zero when the beat shows no fret numbers.
    pub fn get_note_y(&self, note: &Note, position: NoteYPosition) -> f64 {
        self.note_numbers()
            .map_or(0.0, |g| g.get_note_y(note, position))
    }

    /// Re-anchor the active content for the beaming helper after the
    /// container moved.
    pub fn update_beaming_helper(&self, container_x: f64) {
        if let Some(content) = &self.content {
            content.update_beaming_helper(container_x + self.x);
        }
    }

    pub fn build_bounds_lookup(&self, bounds: &mut BeatBounds, cx: f64, cy: f64) {
        if let Some(chord) = self.note_numbers() {
            chord.build_bounds_lookup(bounds, cx + self.x, cy + self.y);
        }
    }

    pub fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas) {
        let (cx, cy) = (cx + self.x, cy + self.y);
        if let Some(content) = &self.content {
            content.paint(cx, cy, canvas);
        }
        for glyph in &self.trailing {
            glyph.paint(cx, cy, canvas);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// BeatContainerGlyph
// ═══════════════════════════════════════════════════════════════════════

/// A beat's slot within its bar.
#[derive(Debug)]
pub struct BeatContainerGlyph<'a> {
    pub beat: &'a Beat,
    pub x: f64,
    pub y: f64,
    pub on_notes: TabBeatGlyph<'a>,
    /// Decorations anchored to the beat but not packed into it
    pub ties: Vec<TabWhammyBarGlyph>,
    width: f64,
    whammy_gap: f64,
}

impl<'a> BeatContainerGlyph<'a> {
    pub fn new(beat: &'a Beat, beaming_helper: SharedBeamingHelper) -> Self {
        Self {
            beat,
            x: 0.0,
            y: 0.0,
            on_notes: TabBeatGlyph::new(beat, beaming_helper),
            ties: Vec::new(),
            width: 0.0,
            whammy_gap: WHAMMY_STAFF_GAP,
        }
    }

    pub fn do_layout(&mut self, renderer: &TabBarRenderer<'_>, collisions: &mut CollisionHelper) {
        self.ties.clear();
        self.on_notes.do_layout(renderer, collisions, &mut self.ties);
        self.width = self.on_notes.width() + BEAT_PADDING * renderer.scale();
        self.whammy_gap = WHAMMY_STAFF_GAP * renderer.scale();
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// Widen the slot during justification. The beat glyph keeps its size.
    pub fn set_width(&mut self, width: f64) {
        self.width = width;
    }

    /// Center of the beat relative to the bar.
    pub fn center_x(&self) -> f64 {
        self.x + self.on_notes.x + self.on_notes.center_x()
    }

    /// Space the decorations need above the top line.
    pub fn top_overflow(&self) -> f64 {
        self.ties
            .iter()
            .map(|t| t.height() + self.whammy_gap)
            .fold(0.0, f64::max)
    }

    pub fn update_beaming_helper(&self) {
        self.on_notes.update_beaming_helper(self.x);
    }

    /// Absolute rectangles of the beat, given the bar origin and the
    /// height of the staff.
    pub fn build_bounds_lookup(&self, cx: f64, cy: f64, height: f64) -> BeatBounds {
        let mut bounds = BeatBounds::new(self.beat.id);
        bounds.real_bounds = Bounds {
            x: cx + self.x,
            y: cy + self.y,
            w: self.width,
            h: height,
        };
        bounds.visual_bounds = Bounds {
            x: cx + self.x + self.on_notes.x,
            y: cy + self.y,
            w: self.on_notes.width(),
            h: height,
        };
        self.on_notes
            .build_bounds_lookup(&mut bounds, cx + self.x, cy + self.y);
        bounds
    }

    pub fn paint(&self, cx: f64, cy: f64, canvas: &mut dyn Canvas) {
        let left = cx + self.x;
        let top = cy + self.y;
        self.on_notes.paint(left, top, canvas);
        for tie in &self.ties {
            let zero_y = top - self.whammy_gap - tie.bottom_overflow();
            tie.paint(left + self.on_notes.x, zero_y, self.width, canvas);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Duration, Staff};
    use crate::renderer::helpers::BeamingHelper;
    use crate::renderer::metrics::FixedWidthMetrics;
    use crate::settings::RenderSettings;

    fn six_strings() -> Staff {
        Staff {
            tuning: vec![64, 59, 55, 50, 45, 40],
            bars: Vec::new(),
        }
    }

    fn layout_beat<'a>(
        beat: &'a Beat,
        staff: &Staff,
        settings: &RenderSettings,
    ) -> (TabBeatGlyph<'a>, CollisionHelper, Vec<TabWhammyBarGlyph>) {
        let metrics = FixedWidthMetrics::default();
        let renderer = TabBarRenderer::new(staff, 0, settings, &metrics);
        let mut glyph = TabBeatGlyph::new(beat, BeamingHelper::shared());
        let mut collisions = CollisionHelper::new();
        let mut ties = Vec::new();
        glyph.do_layout(&renderer, &mut collisions, &mut ties);
        (glyph, collisions, ties)
    }

    fn note_beat(id: usize, notes: Vec<Note>) -> Beat {
        let mut beat = Beat::new(id, Duration::Quarter);
        beat.notes = notes;
        beat
    }

    #[test]
    fn invisible_notes_take_no_space_and_reserve_nothing() {
        let staff = six_strings();
        let settings = RenderSettings::default();
        let mut hidden = Note::new(2, 7);
        hidden.is_visible = false;
        let beat = note_beat(1, vec![Note::new(1, 12), hidden]);

        let (glyph, collisions, _) = layout_beat(&beat, &staff, &settings);
        let chord = glyph.note_numbers().expect("fret numbers");
        assert_eq!(chord.note_glyphs().len(), 1);
        assert!(chord.note_glyph(2).is_none());
        assert_eq!(collisions.reservations().len(), 1);
    }

    #[test]
    fn slashed_beat_uses_slash_head_on_middle_line() {
        let staff = six_strings();
        let settings = RenderSettings::default();
        let mut beat = note_beat(1, vec![Note::new(3, 2)]);
        beat.slashed = true;

        let (glyph, collisions, _) = layout_beat(&beat, &staff, &settings);
        let slash = glyph.slash().expect("slash head");
        assert_eq!(slash.y, 20.0);
        assert!(glyph.note_numbers().is_none());
        assert!(collisions.reservations().is_empty());
        assert_eq!(glyph.center_x(), slash.width() / 2.0);
    }

    #[test]
    fn tremolo_is_added_to_slash_effects() {
        let staff = six_strings();
        let settings = RenderSettings::default();
        let mut beat = note_beat(1, vec![Note::new(3, 2)]);
        beat.slashed = true;
        beat.tremolo_speed = Some(Duration::ThirtySecond);

        let (glyph, _, _) = layout_beat(&beat, &staff, &settings);
        let effects = glyph.content().and_then(|c| c.beat_effects()).unwrap();
        assert!(effects.contains_key(crate::renderer::effects::TREMOLO_EFFECT));
    }

    #[test]
    fn whammy_goes_to_ties_without_widening_the_beat() {
        let staff = six_strings();
        let settings = RenderSettings::default();
        let plain = note_beat(1, vec![Note::new(6, 0)]);
        let mut whammy = note_beat(2, vec![Note::new(6, 0)]);
        whammy.whammy_bar_points = vec![
            crate::model::BendPoint { offset: 0.0, value: 0 },
            crate::model::BendPoint { offset: 60.0, value: -4 },
        ];

        let (plain_glyph, _, plain_ties) = layout_beat(&plain, &staff, &settings);
        let (whammy_glyph, _, ties) = layout_beat(&whammy, &staff, &settings);
        assert!(plain_ties.is_empty());
        assert_eq!(ties.len(), 1);
        assert!(ties[0].height() > 0.0);
        assert_eq!(whammy_glyph.width(), plain_glyph.width());
    }

    #[test]
    fn grace_beats_get_smaller_numbers() {
        let staff = six_strings();
        let settings = RenderSettings::default();
        let normal = note_beat(1, vec![Note::new(1, 5)]);
        let mut grace = note_beat(2, vec![Note::new(1, 5)]);
        grace.grace_type = crate::model::GraceType::BeforeBeat;

        let (normal_glyph, _, _) = layout_beat(&normal, &staff, &settings);
        let (grace_glyph, _, _) = layout_beat(&grace, &staff, &settings);
        assert!(grace_glyph.note_numbers().unwrap().is_grace());
        assert!(grace_glyph.width() < normal_glyph.width());
    }

    #[test]
    fn hidden_rests_keep_a_fixed_slot_and_drop_dots() {
        let staff = six_strings();
        let mut settings = RenderSettings::default();
        settings.notation.show_tab_rests = false;
        let mut beat = Beat::new(1, Duration::Quarter);
        beat.dots = 1;

        let (glyph, _, _) = layout_beat(&beat, &staff, &settings);
        let rest = glyph.rest_glyph().expect("rest");
        assert!(!rest.is_visible_rest());
        assert_eq!(glyph.dot_count(), 0);
        assert_eq!(glyph.width(), HIDDEN_REST_WIDTH);
    }

    #[test]
    fn empty_beat_centers_on_half_width() {
        let staff = six_strings();
        let settings = RenderSettings::default();
        let mut beat = Beat::new(1, Duration::Quarter);
        beat.is_empty = true;
        beat.dots = 1;

        let (glyph, _, _) = layout_beat(&beat, &staff, &settings);
        assert!(glyph.rest_glyph().is_some());
        assert_eq!(glyph.center_x(), glyph.width() / 2.0);
    }

    #[test]
    fn relayout_rebuilds_instead_of_accumulating() {
        let staff = six_strings();
        let settings = RenderSettings::default();
        let metrics = FixedWidthMetrics::default();
        let renderer = TabBarRenderer::new(&staff, 0, &settings, &metrics);
        let mut beat = note_beat(1, vec![Note::new(1, 3)]);
        beat.dots = 1;
        beat.tremolo_speed = Some(Duration::Eighth);

        let mut glyph = TabBeatGlyph::new(&beat, BeamingHelper::shared());
        let mut collisions = CollisionHelper::new();
        let mut ties = Vec::new();
        glyph.do_layout(&renderer, &mut collisions, &mut ties);
        let first_width = glyph.width();
        glyph.do_layout(&renderer, &mut collisions, &mut ties);

        assert_eq!(glyph.width(), first_width);
        assert_eq!(glyph.dot_count(), 1);
        assert_eq!(glyph.trailing_glyphs().len(), 2);
        let effects = glyph.content().and_then(|c| c.beat_effects()).unwrap();
        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn update_beaming_helper_anchors_at_container_offset() {
        let staff = six_strings();
        let settings = RenderSettings::default();
        let metrics = FixedWidthMetrics::default();
        let renderer = TabBarRenderer::new(&staff, 0, &settings, &metrics);
        let beat = note_beat(4, vec![Note::new(1, 10)]);
        let helper = BeamingHelper::shared();

        let mut container = BeatContainerGlyph::new(&beat, helper.clone());
        container.do_layout(&renderer, &mut CollisionHelper::new());
        container.x = 100.0;
        container.update_beaming_helper();

        let chord = container.on_notes.note_numbers().unwrap();
        let expected = 100.0 + chord.note_string_width() / 2.0;
        assert_eq!(helper.borrow().beat_line_x(4), Some(expected));
        assert_eq!(container.center_x(), expected);
    }

    #[test]
    fn bounds_lookup_covers_note_numbers_only() {
        let staff = six_strings();
        let settings = RenderSettings::default();
        let metrics = FixedWidthMetrics::default();
        let renderer = TabBarRenderer::new(&staff, 0, &settings, &metrics);
        let chord_beat = note_beat(1, vec![Note::new(6, 0), Note::new(1, 3)]);
        let rest_beat = Beat::new(2, Duration::Quarter);

        let mut chord = BeatContainerGlyph::new(&chord_beat, BeamingHelper::shared());
        chord.do_layout(&renderer, &mut CollisionHelper::new());
        let mut rest = BeatContainerGlyph::new(&rest_beat, BeamingHelper::shared());
        rest.do_layout(&renderer, &mut CollisionHelper::new());

        let bounds = chord.build_bounds_lookup(10.0, 50.0, 50.0);
        assert_eq!(bounds.notes.len(), 2);
        // string 6 sits on the top line
        assert_eq!(bounds.find_note_at_pos(11.0, 50.0), Some(6));
        assert_eq!(bounds.find_note_at_pos(11.0, 100.0), Some(1));
        assert!(rest.build_bounds_lookup(0.0, 0.0, 50.0).notes.is_empty());
    }
}
