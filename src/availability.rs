//! Occupancy of teachers and classrooms within one generation call.

use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

use crate::data::{ClassroomId, TeacherId};
use crate::slots::{SlotKey, TimeSlot};

/// Which slots each teacher and classroom already holds.
///
/// Reservations are permanent for the life of the tracker; there is no
/// release operation.
#[derive(Debug, Default, Clone)]
pub struct AvailabilityTracker {
    teacher_slots: HashMap<TeacherId, BTreeSet<SlotKey>>,
    classroom_slots: HashMap<ClassroomId, BTreeSet<SlotKey>>,
}

impl AvailabilityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Free at this exact slot and still under `daily_cap` classes that day.
    pub fn is_teacher_free(&self, teacher_id: &str, slot: &TimeSlot, daily_cap: u32) -> bool {
        let Some(taken) = self.teacher_slots.get(teacher_id) else {
            return daily_cap > 0;
        };
        if taken.contains(&slot.key()) {
            return false;
        }
        day_count(taken, slot.date) < daily_cap as usize
    }

    pub fn is_classroom_free(&self, classroom_id: &str, slot: &TimeSlot) -> bool {
        self.classroom_slots
            .get(classroom_id)
            .is_none_or(|taken| !taken.contains(&slot.key()))
    }

    /// Marks the slot taken for both resources. Callers check availability first.
    pub fn reserve(&mut self, teacher_id: &str, classroom_id: &str, slot: &TimeSlot) {
        let key = slot.key();
        self.teacher_slots
            .entry(teacher_id.to_string())
            .or_default()
            .insert(key);
        self.classroom_slots
            .entry(classroom_id.to_string())
            .or_default()
            .insert(key);
    }

    /// Number of classes the teacher already holds on `date`.
    #[cfg(test)]
    pub fn teacher_load_on(&self, teacher_id: &str, date: NaiveDate) -> usize {
        self.teacher_slots
            .get(teacher_id)
            .map_or(0, |taken| day_count(taken, date))
    }

    #[cfg(test)]
    pub fn teacher_reservations(&self, teacher_id: &str) -> usize {
        self.teacher_slots.get(teacher_id).map_or(0, BTreeSet::len)
    }

    #[cfg(test)]
    pub fn classroom_reservations(&self, classroom_id: &str) -> usize {
        self.classroom_slots.get(classroom_id).map_or(0, BTreeSet::len)
    }
}

fn day_count(taken: &BTreeSet<SlotKey>, date: NaiveDate) -> usize {
    taken
        .range(SlotKey::start_of_day(date)..)
        .take_while(|k| k.date == date)
        .count()
}
