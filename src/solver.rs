use crate::availability::AvailabilityTracker;
use crate::conflicts::ConflictLog;
use crate::data::{
    Batch, Classroom, ScheduledEntry, Subject, Teacher, TimetableRequest, TimetableResponse,
};
use crate::error::{SchedulerError, SchedulerResult};
use crate::selector::{
    candidate_classrooms, candidate_teachers, pick_classroom_for_slot, pick_teacher_for_slot,
};
use crate::slots::{ScheduleWindow, TimeSlot, enumerate_slots};
use crate::store::{RecordSource, Snapshot};
use itertools::Itertools;
use log::{debug, info, trace, warn};
use std::time::Instant;

/// Scheduled entries plus the conflicts met along the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allocation {
    pub entries: Vec<ScheduledEntry>,
    pub conflicts: ConflictLog,
}

impl Allocation {
    pub fn into_response(self) -> TimetableResponse {
        TimetableResponse::from_entries(self.entries, self.conflicts.into_messages())
    }
}

/// Fetches records for the request, validates them and allocates.
///
/// Any error aborts the whole call; nothing partially scheduled is returned.
pub fn generate<S: RecordSource + ?Sized>(
    source: &S,
    request: &TimetableRequest,
) -> SchedulerResult<Allocation> {
    if request.batch_ids.is_empty() {
        return Err(SchedulerError::InvalidRequest(
            "batch_ids must not be empty".to_string(),
        ));
    }
    let window = ScheduleWindow::from_request(request)?;
    let snapshot = Snapshot::fetch(source, &request.batch_ids)?;
    snapshot.validate()?;
    Ok(allocate(&snapshot, &window))
}

/// Greedy first-fit allocation: batches in order, each batch's subjects in
/// the order the record source returned them, slots in time order. No
/// backtracking.
pub fn allocate(snapshot: &Snapshot, window: &ScheduleWindow) -> Allocation {
    let start_time = Instant::now();
    let slots = enumerate_slots(window);
    let weeks = span_weeks(&slots);
    info!(
        "Allocating {} batches over {} slots ({} week(s)) with {} teachers and {} classrooms...",
        snapshot.batches.len(),
        slots.len(),
        weeks,
        snapshot.teachers.len(),
        snapshot.classrooms.len()
    );

    let mut ctx = AllocationContext {
        snapshot,
        slots: &slots,
        classrooms: candidate_classrooms(&snapshot.classrooms),
        weeks,
        tracker: AvailabilityTracker::new(),
        result: Allocation::default(),
    };
    for batch in &snapshot.batches {
        ctx.allocate_batch(batch);
    }
    let allocation = ctx.result;

    info!(
        "Allocation finished in {:.2?}: {} entries, {} conflicts",
        start_time.elapsed(),
        allocation.entries.len(),
        allocation.conflicts.len()
    );
    allocation
}

/// Whole weeks covered by the slot sequence, counting only dates that have
/// slots. Never less than one.
pub fn span_weeks(slots: &[TimeSlot]) -> u32 {
    let dates = slots.iter().map(|s| s.date).unique().count();
    ((dates / 7) as u32).max(1)
}

/// State threaded through one allocation call. The tracker is shared by
/// every batch, so earlier batches block later ones.
struct AllocationContext<'a> {
    snapshot: &'a Snapshot,
    slots: &'a [TimeSlot],
    classrooms: Vec<&'a Classroom>,
    weeks: u32,
    tracker: AvailabilityTracker,
    result: Allocation,
}

impl<'a> AllocationContext<'a> {
    fn allocate_batch(&mut self, batch: &'a Batch) {
        let snapshot = self.snapshot;
        for missing in batch.subjects.iter().filter(|id| snapshot.subject(id).is_none()) {
            warn!("Batch {} references unknown subject {missing}; skipping", batch.id);
        }
        // Source order, not the batch's listing order.
        let subjects: Vec<&'a Subject> = snapshot
            .subjects
            .iter()
            .filter(|s| batch.subjects.contains(&s.id))
            .collect();

        // One cursor per batch, not per subject: each subject resumes where
        // the previous one stopped, so later subjects see fewer slots.
        let mut cursor = 0;
        for subject in subjects {
            let needed = subject.classes_per_week * self.weeks;
            let teachers = candidate_teachers(subject, &snapshot.teachers);

            let mut assigned = 0;
            while assigned < needed && cursor < self.slots.len() {
                let slot = self.slots[cursor];
                cursor += 1;
                if self.try_assign(batch, subject, &teachers, &slot) {
                    assigned += 1;
                }
            }

            // A shortfall from running out of slots is not a conflict.
            if assigned < needed {
                debug!(
                    "Batch {} subject {}: {assigned}/{needed} classes placed before slots ran out",
                    batch.id, subject.id
                );
            }
        }
    }

    fn try_assign(
        &mut self,
        batch: &Batch,
        subject: &Subject,
        teachers: &[&'a Teacher],
        slot: &TimeSlot,
    ) -> bool {
        let Some(teacher) = pick_teacher_for_slot(teachers, slot, &self.tracker) else {
            trace!("No teacher free for {} at {:?}", subject.id, slot.key());
            self.result.conflicts.no_teacher(&subject.name, slot);
            return false;
        };
        let Some(classroom) = pick_classroom_for_slot(&self.classrooms, slot, &self.tracker) else {
            trace!("No classroom free for {} at {:?}", subject.id, slot.key());
            self.result.conflicts.no_classroom(&subject.name, slot);
            return false;
        };

        self.tracker.reserve(&teacher.id, &classroom.id, slot);
        debug!(
            "Reserved teacher {} and room {} at {} {} for batch {} subject {}",
            teacher.id,
            classroom.id,
            slot.date_label(),
            slot.start_label(),
            batch.id,
            subject.id
        );

        // Every section shares the one reservation.
        for section in &batch.sections {
            self.result.entries.push(ScheduledEntry {
                date: slot.date_label(),
                day: slot.day_name().to_string(),
                start_time: slot.start_label(),
                end_time: slot.end_label(),
                subject_id: subject.id.clone(),
                teacher_id: teacher.id.clone(),
                classroom_id: classroom.id.clone(),
                batch_id: batch.id.clone(),
                section: section.clone(),
            });
        }
        true
    }
}
