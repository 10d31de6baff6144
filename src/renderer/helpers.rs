//! Cross-beat bookkeeping shared by the glyphs of one bar.
//!
//! [`BeamingHelper`] collects the durations of a voice's beats and the X
//! where each beat's stem line sits; the rhythm row is drawn from it.
//!
//! [`CollisionHelper`] is the per-bar ledger of vertical bands occupied at
//! each horizontal slot. Beats of different voices that start at the same
//! time share a slot, so a later voice can see the fret numbers of an
//! earlier one.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::model::{Beat, Duration};

/// Beaming helper shared by every beat glyph of one voice in one bar.
pub type SharedBeamingHelper = Rc<RefCell<BeamingHelper>>;

#[derive(Debug, Default)]
pub struct BeamingHelper {
    durations: HashMap<usize, Duration>,
    line_x: HashMap<usize, f64>,
}

impl BeamingHelper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedBeamingHelper {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Add a beat to this helper. Registering the same beat twice is a no-op.
    pub fn register_beat(&mut self, beat: &Beat) {
        self.durations.entry(beat.id).or_insert(beat.duration);
    }

    /// Record where the stem line of `beat_id` sits, absolute to the bar.
    /// A later call replaces the previous anchor.
    pub fn register_beat_line_x(&mut self, beat_id: usize, x: f64) {
        self.line_x.insert(beat_id, x);
    }

    pub fn beat_line_x(&self, beat_id: usize) -> Option<f64> {
        self.line_x.get(&beat_id).copied()
    }

    /// Duration the beat was registered with.
    pub fn duration_of(&self, beat_id: usize) -> Option<Duration> {
        self.durations.get(&beat_id).copied()
    }
}

/// One `reserve_beat_slot` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotReservation {
    pub beat: usize,
    /// Start tick of the slot
    pub start: u32,
    pub top_y: f64,
    pub bottom_y: f64,
}

#[derive(Debug, Default)]
pub struct CollisionHelper {
    starts: HashMap<usize, u32>,
    reservations: Vec<SlotReservation>,
    slots: HashMap<u32, (f64, f64)>,
}

impl CollisionHelper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tell the ledger at which tick of the bar `beat` starts. Beats never
    /// placed are treated as starting at tick 0.
    pub fn place_beat(&mut self, beat: &Beat, start: u32) {
        self.starts.insert(beat.id, start);
    }

    pub fn beat_start(&self, beat_id: usize) -> u32 {
        self.starts.get(&beat_id).copied().unwrap_or(0)
    }

    /// Mark `[top_y, bottom_y]` as occupied at the horizontal slot of `beat`.
    /// Bands reserved for the same slot are merged, whichever voice they
    /// come from.
    pub fn reserve_beat_slot(&mut self, beat: &Beat, top_y: f64, bottom_y: f64) {
        let start = self.beat_start(beat.id);
        self.reservations.push(SlotReservation {
            beat: beat.id,
            start,
            top_y,
            bottom_y,
        });
        self.slots
            .entry(start)
            .and_modify(|(top, bottom)| {
                *top = top.min(top_y);
                *bottom = bottom.max(bottom_y);
            })
            .or_insert((top_y, bottom_y));
    }

    /// Merged occupied band of the slot `beat_id` sits in.
    pub fn beat_slot(&self, beat_id: usize) -> Option<(f64, f64)> {
        self.slots.get(&self.beat_start(beat_id)).copied()
    }

    pub fn reservations(&self) -> &[SlotReservation] {
        &self.reservations
    }

    /// Whether `[top_y, bottom_y]` overlaps anything reserved in the slot of
    /// `beat_id`.
    pub fn is_occupied(&self, beat_id: usize, top_y: f64, bottom_y: f64) -> bool {
        self.beat_slot(beat_id)
            .map_or(false, |(top, bottom)| top_y < bottom && bottom_y > top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collision_slots_merge_per_start() {
        let beat = Beat::new(7, Duration::Quarter);
        let other = Beat::new(8, Duration::Quarter);
        let later = Beat::new(9, Duration::Quarter);
        let mut ledger = CollisionHelper::new();
        ledger.place_beat(&beat, 0);
        ledger.place_beat(&other, 0);
        ledger.place_beat(&later, 960);
        ledger.reserve_beat_slot(&beat, 10.0, 20.0);
        ledger.reserve_beat_slot(&beat, 30.0, 40.0);
        ledger.reserve_beat_slot(&later, 0.0, 5.0);

        assert_eq!(ledger.reservations().len(), 3);
        assert_eq!(ledger.beat_slot(7), Some((10.0, 40.0)));
        // same start, different beat
        assert_eq!(ledger.beat_slot(8), Some((10.0, 40.0)));
        assert!(ledger.is_occupied(8, 35.0, 50.0));
        assert!(!ledger.is_occupied(7, 41.0, 50.0));
        assert!(!ledger.is_occupied(9, 10.0, 100.0));
    }

    #[test]
    fn beaming_helper_registers_each_beat_once() {
        let mut helper = BeamingHelper::new();
        let a = Beat::new(1, Duration::Eighth);
        let mut changed = Beat::new(1, Duration::Sixteenth);
        changed.dots = 1;
        helper.register_beat(&a);
        helper.register_beat(&changed);
        helper.register_beat_line_x(1, 12.0);
        helper.register_beat_line_x(1, 15.0);

        assert_eq!(helper.duration_of(1), Some(Duration::Eighth));
        assert_eq!(helper.duration_of(2), None);
        assert_eq!(helper.beat_line_x(1), Some(15.0));
        assert_eq!(helper.beat_line_x(2), None);
    }
}
