//! Read-only record access for the allocator.
//!
//! Persistence and record CRUD live elsewhere; the allocator only needs a
//! snapshot of teachers, classrooms, the requested batches and their
//! subjects, fetched once per call.

use itertools::Itertools;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::data::{Batch, BatchId, Classroom, Subject, SubjectId, Teacher};
use crate::error::{SchedulerResult, StoreError};

/// Source of record snapshots.
///
/// `batches` returns records in the order of `ids`; `subjects` returns them
/// in the source's own order. Both skip ids the source does not know.
pub trait RecordSource {
    fn teachers(&self) -> Result<Vec<Teacher>, StoreError>;
    fn classrooms(&self) -> Result<Vec<Classroom>, StoreError>;
    fn batches(&self, ids: &[BatchId]) -> Result<Vec<Batch>, StoreError>;
    fn subjects(&self, ids: &[SubjectId]) -> Result<Vec<Subject>, StoreError>;
}

/// All records, as held in memory or posted inline with a request.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Catalog {
    #[serde(default)]
    pub teachers: Vec<Teacher>,
    #[serde(default)]
    pub classrooms: Vec<Classroom>,
    #[serde(default)]
    pub subjects: Vec<Subject>,
    #[serde(default)]
    pub batches: Vec<Batch>,
}

impl Catalog {
    /// Loads a catalog from a JSON file.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let raw = fs::read_to_string(path)?;
        let catalog: Catalog = serde_json::from_str(&raw)?;
        debug!(
            "Loaded catalog from {}: {} teachers, {} classrooms, {} subjects, {} batches",
            path.display(),
            catalog.teachers.len(),
            catalog.classrooms.len(),
            catalog.subjects.len(),
            catalog.batches.len()
        );
        Ok(catalog)
    }
}

impl RecordSource for Catalog {
    fn teachers(&self) -> Result<Vec<Teacher>, StoreError> {
        Ok(self.teachers.clone())
    }

    fn classrooms(&self) -> Result<Vec<Classroom>, StoreError> {
        Ok(self.classrooms.clone())
    }

    fn batches(&self, ids: &[BatchId]) -> Result<Vec<Batch>, StoreError> {
        Ok(ids
            .iter()
            .unique()
            .filter_map(|id| self.batches.iter().find(|b| &b.id == id).cloned())
            .collect())
    }

    fn subjects(&self, ids: &[SubjectId]) -> Result<Vec<Subject>, StoreError> {
        Ok(self
            .subjects
            .iter()
            .filter(|s| ids.contains(&s.id))
            .cloned()
            .collect())
    }
}

/// Records fetched for one generation call.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub teachers: Vec<Teacher>,
    pub classrooms: Vec<Classroom>,
    pub batches: Vec<Batch>,
    pub subjects: Vec<Subject>,
}

impl Snapshot {
    pub fn fetch<S: RecordSource + ?Sized>(
        source: &S,
        batch_ids: &[BatchId],
    ) -> Result<Self, StoreError> {
        let batches = source.batches(batch_ids)?;
        for missing in batch_ids.iter().filter(|id| !batches.iter().any(|b| &b.id == *id)) {
            warn!("Requested batch {missing} not found; skipping");
        }

        let subject_ids: Vec<SubjectId> = batches
            .iter()
            .flat_map(|b| b.subjects.iter().cloned())
            .unique()
            .collect();
        let subjects = source.subjects(&subject_ids)?;

        Ok(Self {
            teachers: source.teachers()?,
            classrooms: source.classrooms()?,
            batches,
            subjects,
        })
    }

    /// Checks every record against its declared ranges.
    pub fn validate(&self) -> SchedulerResult<()> {
        self.teachers.iter().try_for_each(Teacher::validate)?;
        self.classrooms.iter().try_for_each(Classroom::validate)?;
        self.subjects.iter().try_for_each(Subject::validate)?;
        self.batches.iter().try_for_each(Batch::validate)
    }

    pub fn subject(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }
}
