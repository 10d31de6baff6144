//! Errors raised at the input boundary.
//!
//! Layout itself never fails; these only come from decoding JSON and from
//! checking that a score is consistent enough to lay out.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("JSON decoding failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("staff {staff} of track {track} has no strings")]
    EmptyTuning { track: usize, staff: usize },

    #[error("beat {beat} has a note on string {string}, but the staff has {strings} strings")]
    StringOutOfRange {
        beat: usize,
        string: usize,
        strings: usize,
    },

    #[error("beat id {0} is used more than once")]
    DuplicateBeatId(usize),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
