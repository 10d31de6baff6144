//! Shared constants for the tablature renderer (unscaled user units).

// ── Page & margins ──────────────────────────────────────────────────
pub(super) const DEFAULT_PAGE_WIDTH: f64 = 820.0;
pub(super) const PAGE_MARGIN_LEFT: f64 = 50.0;
pub(super) const PAGE_MARGIN_RIGHT: f64 = 30.0;
pub(super) const PAGE_MARGIN_TOP: f64 = 30.0;
pub(super) const PAGE_MARGIN_BOTTOM: f64 = 30.0;

// ── Header ──────────────────────────────────────────────────────────
pub(super) const HEADER_HEIGHT: f64 = 60.0; // space for title + artist

// ── Systems & staves ────────────────────────────────────────────────
pub(super) const SYSTEM_SPACING: f64 = 30.0; // vertical gap between systems
pub(super) const STAFF_GAP: f64 = 20.0; // vertical gap between staves of one system
pub(super) const TAB_CLEF_SPACE: f64 = 24.0; // "TAB" letters at system start
pub(super) const STAFF_PADDING_TOP: f64 = 10.0; // above the top line
pub(super) const STAFF_PADDING_BOTTOM: f64 = 10.0; // below the bottom line (or rhythm row)

// ── Bars & beats ────────────────────────────────────────────────────
pub(super) const BAR_PADDING_LEFT: f64 = 8.0;
pub(super) const BAR_PADDING_RIGHT: f64 = 6.0;
pub(super) const BEAT_PADDING: f64 = 6.0; // free space after each beat glyph
pub(super) const EMPTY_BAR_WIDTH: f64 = 40.0;

// ── Beat glyph ──────────────────────────────────────────────────────
pub(super) const GRACE_SCALE: f64 = 0.75;
pub(super) const DOT_SPACING: f64 = 5.0; // spacer before the first dot
pub(super) const DOT_SIZE: f64 = 1.5;
pub(super) const DOT_PADDING: f64 = 3.0; // extra width per dot glyph
pub(super) const HIDDEN_REST_WIDTH: f64 = 10.0;
pub(super) const NOTE_NUMBER_PADDING: f64 = 2.0; // clearance right of a fret number

// ── Tremolo picking ─────────────────────────────────────────────────
pub(super) const TREMOLO_INDENT: f64 = 5.0;
pub(super) const TREMOLO_OFFSET_32ND: f64 = 10.0;
pub(super) const TREMOLO_OFFSET_16TH: f64 = 5.0;
pub(super) const TREMOLO_OFFSET_8TH: f64 = 0.0;
pub(super) const TREMOLO_STROKE_WIDTH: f64 = 8.0;
pub(super) const TREMOLO_STROKE_GAP: f64 = 3.0;

// ── Whammy bar ──────────────────────────────────────────────────────
pub(super) const WHAMMY_VALUE_HEIGHT: f64 = 2.5; // per quarter tone
pub(super) const WHAMMY_LABEL_HEIGHT: f64 = 12.0;
pub(super) const BEND_POINT_MAX_OFFSET: f64 = 60.0;
pub(super) const WHAMMY_STAFF_GAP: f64 = 6.0; // between the curve and the top line

// ── Rhythm row ──────────────────────────────────────────────────────
pub(super) const RHYTHM_STEM_GAP: f64 = 3.0; // between the lowest line and a stem
pub(super) const RHYTHM_FLAG_LENGTH: f64 = 5.0;
pub(super) const RHYTHM_FLAG_GAP: f64 = 3.0;

// ── Stroke widths ───────────────────────────────────────────────────
pub(super) const STAFF_LINE_WIDTH: f64 = 0.8;
pub(super) const BARLINE_WIDTH: f64 = 1.0;
pub(super) const STEM_WIDTH: f64 = 1.0;

// ── Colors ──────────────────────────────────────────────────────────
pub(super) const NOTE_COLOR: &str = "#1a1a1a";
pub(super) const STAFF_COLOR: &str = "#555555";
pub(super) const BARLINE_COLOR: &str = "#333333";
pub(super) const HEADER_COLOR: &str = "#1a1a1a";
pub(super) const REST_COLOR: &str = "#1a1a1a";
pub(super) const EFFECT_COLOR: &str = "#333333";
pub(super) const BACKGROUND_COLOR: &str = "white";
