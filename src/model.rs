//! Data model for a tablature score as handed over by the import layer.
//!
//! The layout code only ever reads these structures. They are fully
//! populated before layout starts and are never mutated by it.

use serde::{Deserialize, Serialize};

/// A complete score: metadata plus one or more tracks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Score {
    /// Title of the piece
    #[serde(default)]
    pub title: Option<String>,
    /// Artist or composer
    #[serde(default)]
    pub artist: Option<String>,
    /// Instruments
    #[serde(default)]
    pub tracks: Vec<Track>,
}

/// One instrument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// Display name (e.g., "Electric Guitar")
    pub name: String,
    /// Staves of this track; each one is laid out as tablature
    #[serde(default)]
    pub staves: Vec<Staff>,
}

/// A tablature staff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Staff {
    /// String pitches as MIDI numbers, top line first.
    /// The length is the number of tablature lines.
    pub tuning: Vec<i32>,
    /// Ordered bars
    #[serde(default)]
    pub bars: Vec<Bar>,
}

/// A single bar (measure) of one staff.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bar {
    /// Independent rhythmic lines
    #[serde(default)]
    pub voices: Vec<Voice>,
}

/// A rhythmic line within a bar.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Voice {
    #[serde(default)]
    pub beats: Vec<Beat>,
}

/// Note value. Variants are declared longest first, so `a < b` reads as
/// "a lasts longer than b".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Duration {
    QuadrupleWhole,
    DoubleWhole,
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
    SixtyFourth,
    OneHundredTwentyEighth,
    TwoHundredFiftySixth,
}

impl Duration {
    /// Number of flags/beams a note of this value carries.
    pub fn flag_count(self) -> usize {
        match self {
            Duration::Eighth => 1,
            Duration::Sixteenth => 2,
            Duration::ThirtySecond => 3,
            Duration::SixtyFourth => 4,
            Duration::OneHundredTwentyEighth => 5,
            Duration::TwoHundredFiftySixth => 6,
            _ => 0,
        }
    }

    /// Whether a stem is drawn for this value in rhythm notation.
    pub fn has_stem(self) -> bool {
        self >= Duration::Half
    }

    /// Length in ticks, without dots.
    pub fn ticks(self) -> u32 {
        match self {
            Duration::QuadrupleWhole => QUARTER_TICKS * 16,
            Duration::DoubleWhole => QUARTER_TICKS * 8,
            Duration::Whole => QUARTER_TICKS * 4,
            Duration::Half => QUARTER_TICKS * 2,
            Duration::Quarter => QUARTER_TICKS,
            Duration::Eighth => QUARTER_TICKS / 2,
            Duration::Sixteenth => QUARTER_TICKS / 4,
            Duration::ThirtySecond => QUARTER_TICKS / 8,
            Duration::SixtyFourth => QUARTER_TICKS / 16,
            Duration::OneHundredTwentyEighth => QUARTER_TICKS / 32,
            Duration::TwoHundredFiftySixth => QUARTER_TICKS / 64,
        }
    }
}

/// Ticks per quarter note.
pub const QUARTER_TICKS: u32 = 960;

/// Kind of grace note a beat represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GraceType {
    #[default]
    None,
    OnBeat,
    BeforeBeat,
    BendGrace,
}

/// A time-slice of simultaneous events within one voice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Beat {
    /// Unique within the score; keys the collision ledger and bounds lookup
    pub id: usize,
    pub duration: Duration,
    /// Number of rhythm dots
    #[serde(default)]
    pub dots: u8,
    /// Placeholder beat without content
    #[serde(default)]
    pub is_empty: bool,
    #[serde(default)]
    pub grace_type: GraceType,
    /// Rhythmic slash notation instead of fret numbers
    #[serde(default)]
    pub slashed: bool,
    /// Tremolo picking speed; `None` when the beat is not tremolo picked
    #[serde(default)]
    pub tremolo_speed: Option<Duration>,
    /// Whammy bar curve; empty when the beat has no whammy
    #[serde(default)]
    pub whammy_bar_points: Vec<BendPoint>,
    /// Notes sounding on this beat
    #[serde(default)]
    pub notes: Vec<Note>,
}

/// A single fretted note.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    /// 1-based string number counted from the lowest string
    pub string: usize,
    pub fret: i32,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    /// Target of a tie started on an earlier beat
    #[serde(default)]
    pub is_tie_destination: bool,
    #[serde(default)]
    pub is_dead: bool,
    #[serde(default)]
    pub is_ghost: bool,
}

/// One point of a whammy bar curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BendPoint {
    /// Position within the beat, 0..=60
    pub offset: f64,
    /// Pitch change in quarter tones
    pub value: i32,
}

fn default_true() -> bool {
    true
}

impl Score {
    /// Create a new empty score.
    pub fn new() -> Self {
        Self {
            title: None,
            artist: None,
            tracks: Vec::new(),
        }
    }

    /// Number of bars of the longest staff.
    pub fn bar_count(&self) -> usize {
        self.tracks
            .iter()
            .flat_map(|t| t.staves.iter())
            .map(|s| s.bars.len())
            .max()
            .unwrap_or(0)
    }
}

impl Default for Score {
    fn default() -> Self {
        Self::new()
    }
}

impl Staff {
    /// Number of tablature lines.
    pub fn line_count(&self) -> usize {
        self.tuning.len()
    }
}

impl Beat {
    /// Create a beat without notes or effects.
    pub fn new(id: usize, duration: Duration) -> Self {
        Self {
            id,
            duration,
            dots: 0,
            is_empty: false,
            grace_type: GraceType::None,
            slashed: false,
            tremolo_speed: None,
            whammy_bar_points: Vec::new(),
            notes: Vec::new(),
        }
    }

    /// A beat is a rest when it is empty or carries no notes.
    pub fn is_rest(&self) -> bool {
        self.is_empty || self.notes.is_empty()
    }

    pub fn is_tremolo(&self) -> bool {
        self.tremolo_speed.is_some()
    }

    pub fn has_whammy_bar(&self) -> bool {
        !self.whammy_bar_points.is_empty()
    }

    pub fn is_grace(&self) -> bool {
        self.grace_type != GraceType::None
    }

    /// Time the beat advances its voice by, dots included. Grace beats
    /// take no time of their own.
    pub fn ticks(&self) -> u32 {
        if self.is_grace() {
            return 0;
        }
        let base = self.duration.ticks();
        (0..=u32::from(self.dots))
            .map(|i| base.checked_shr(i).unwrap_or(0))
            .sum()
    }
}

impl Note {
    /// Create a visible note on `string` at `fret`.
    pub fn new(string: usize, fret: i32) -> Self {
        Self {
            string,
            fret,
            is_visible: true,
            is_tie_destination: false,
            is_dead: false,
            is_ghost: false,
        }
    }
}
