use serde::{Deserialize, Serialize};

use crate::error::{SchedulerError, SchedulerResult};

// Type aliases for clarity
pub type TeacherId = String;
pub type ClassroomId = String;
pub type SubjectId = String;
pub type BatchId = String;

pub const MAX_CLASSES_PER_DAY_RANGE: (u32, u32) = (1, 8);
pub const CLASSES_PER_WEEK_RANGE: (u32, u32) = (1, 10);
pub const DURATION_PER_CLASS_RANGE: (u32, u32) = (30, 180);
pub const CLASSROOM_CAPACITY_RANGE: (u32, u32) = (1, 200);

/// A teacher and the load they can carry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Teacher {
    pub id: TeacherId,
    pub name: String,
    pub max_classes_per_day: u32,
    #[serde(default)]
    pub leave_count: u32,
    /// Subjects this teacher may teach. Empty means any subject.
    #[serde(default)]
    pub subjects: Vec<SubjectId>,
}

/// Represents a physical room.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Classroom {
    pub id: ClassroomId,
    pub room_number: String,
    pub capacity: u32,
    pub section: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    pub classes_per_week: u32,
    /// Minutes. Slots are always an hour long, so this is informational.
    pub duration_per_class: u32,
    #[serde(default)]
    pub assigned_teachers: Vec<TeacherId>,
}

/// A cohort of students sharing a subject list, split into sections.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Batch {
    pub id: BatchId,
    pub name: String,
    pub subjects: Vec<SubjectId>,
    pub sections: Vec<String>,
}

fn check_range(
    kind: &'static str,
    id: &str,
    field: &str,
    value: u32,
    (lo, hi): (u32, u32),
) -> SchedulerResult<()> {
    if value < lo || value > hi {
        return Err(SchedulerError::InvalidRecord {
            kind,
            id: id.to_string(),
            reason: format!("{field} must be between {lo} and {hi}, got {value}"),
        });
    }
    Ok(())
}

impl Teacher {
    pub fn can_teach(&self, subject_id: &str) -> bool {
        self.subjects.is_empty() || self.subjects.iter().any(|s| s == subject_id)
    }

    pub fn validate(&self) -> SchedulerResult<()> {
        check_range(
            "teacher",
            &self.id,
            "max_classes_per_day",
            self.max_classes_per_day,
            MAX_CLASSES_PER_DAY_RANGE,
        )
    }
}

impl Classroom {
    pub fn validate(&self) -> SchedulerResult<()> {
        check_range("classroom", &self.id, "capacity", self.capacity, CLASSROOM_CAPACITY_RANGE)
    }
}

impl Subject {
    pub fn validate(&self) -> SchedulerResult<()> {
        check_range(
            "subject",
            &self.id,
            "classes_per_week",
            self.classes_per_week,
            CLASSES_PER_WEEK_RANGE,
        )?;
        check_range(
            "subject",
            &self.id,
            "duration_per_class",
            self.duration_per_class,
            DURATION_PER_CLASS_RANGE,
        )
    }
}

impl Batch {
    pub fn validate(&self) -> SchedulerResult<()> {
        let reason = if self.subjects.is_empty() {
            "subjects must not be empty"
        } else if self.sections.is_empty() {
            "sections must not be empty"
        } else {
            return Ok(());
        };
        Err(SchedulerError::InvalidRecord {
            kind: "batch",
            id: self.id.clone(),
            reason: reason.to_string(),
        })
    }
}

fn default_working_days() -> Vec<String> {
    ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]
        .iter()
        .map(|d| d.to_string())
        .collect()
}

fn default_start_time() -> String {
    "09:00".to_string()
}

fn default_end_time() -> String {
    "17:00".to_string()
}

fn default_break_duration() -> u32 {
    60
}

/// Parameters of one generation call. Dates and times stay as strings on
/// the wire and are parsed into a `ScheduleWindow` when the call runs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TimetableRequest {
    pub batch_ids: Vec<BatchId>,
    pub start_date: String,
    pub end_date: String,
    #[serde(default = "default_working_days")]
    pub working_days: Vec<String>,
    #[serde(default = "default_start_time")]
    pub start_time: String,
    #[serde(default = "default_end_time")]
    pub end_time: String,
    /// Accepted but not used by allocation.
    #[serde(default = "default_break_duration")]
    pub break_duration: u32,
}

impl TimetableRequest {
    /// A request with the default working week and daily window.
    pub fn new(batch_ids: Vec<BatchId>, start_date: &str, end_date: &str) -> Self {
        Self {
            batch_ids,
            start_date: start_date.to_string(),
            end_date: end_date.to_string(),
            working_days: default_working_days(),
            start_time: default_start_time(),
            end_time: default_end_time(),
            break_duration: default_break_duration(),
        }
    }
}

/// A single scheduled class for one section of a batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduledEntry {
    pub date: String,
    pub day: String,
    pub start_time: String,
    pub end_time: String,
    pub subject_id: SubjectId,
    pub teacher_id: TeacherId,
    pub classroom_id: ClassroomId,
    pub batch_id: BatchId,
    pub section: String,
}

/// The HTTP-facing result of a generation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimetableResponse {
    pub success: bool,
    pub message: String,
    pub timetable: Vec<ScheduledEntry>,
    pub conflicts: Vec<String>,
}

impl TimetableResponse {
    pub fn from_entries(timetable: Vec<ScheduledEntry>, conflicts: Vec<String>) -> Self {
        let success = conflicts.is_empty();
        let message = if success {
            "Timetable generated successfully"
        } else {
            "Timetable generated with conflicts"
        };
        Self {
            success,
            message: message.to_string(),
            timetable,
            conflicts,
        }
    }

    /// A failed call: nothing scheduled, one conflict describing why.
    pub fn failed(error: &SchedulerError) -> Self {
        Self {
            success: false,
            message: "Timetable generation failed".to_string(),
            timetable: Vec::new(),
            conflicts: vec![format!("Failed to generate timetable: {error}")],
        }
    }
}
