//! Candidate narrowing and first-fit picks for a single slot.

use crate::availability::AvailabilityTracker;
use crate::data::{Classroom, Subject, Teacher};
use crate::slots::TimeSlot;

/// Teachers allowed to teach `subject`, in roster order.
///
/// A teacher with an empty subject list qualifies for anything. When no one
/// qualifies, the first roster teacher is returned so the subject is never
/// left without a candidate; this does not balance load across the roster.
pub fn candidate_teachers<'a>(subject: &Subject, teachers: &'a [Teacher]) -> Vec<&'a Teacher> {
    let candidates: Vec<&Teacher> = teachers.iter().filter(|t| t.can_teach(&subject.id)).collect();
    if candidates.is_empty() {
        return teachers.iter().take(1).collect();
    }
    candidates
}

/// Every classroom is a candidate; rooms are not matched to subjects.
pub fn candidate_classrooms(classrooms: &[Classroom]) -> Vec<&Classroom> {
    classrooms.iter().collect()
}

pub fn pick_teacher_for_slot<'a>(
    candidates: &[&'a Teacher],
    slot: &TimeSlot,
    tracker: &AvailabilityTracker,
) -> Option<&'a Teacher> {
    candidates
        .iter()
        .copied()
        .find(|t| tracker.is_teacher_free(&t.id, slot, t.max_classes_per_day))
}

pub fn pick_classroom_for_slot<'a>(
    classrooms: &[&'a Classroom],
    slot: &TimeSlot,
    tracker: &AvailabilityTracker,
) -> Option<&'a Classroom> {
    classrooms
        .iter()
        .copied()
        .find(|c| tracker.is_classroom_free(&c.id, slot))
}
