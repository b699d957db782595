//! Greedy timetable allocation for student batches.
//!
//! Turns batch, subject, teacher and classroom records plus a date range
//! into scheduled classes and a log of conflicts. Teachers and classrooms
//! are never double-booked and teachers stay within their daily class cap.
//! The schedule is a single first-fit pass, not an optimal one.

pub mod availability;
pub mod config;
pub mod conflicts;
pub mod data;
pub mod error;
pub mod selector;
pub mod server;
pub mod slots;
pub mod solver;
pub mod store;

pub use data::{
    Batch, Classroom, ScheduledEntry, Subject, Teacher, TimetableRequest, TimetableResponse,
};
pub use error::{SchedulerError, SchedulerResult, StoreError};
pub use solver::{Allocation, allocate, generate};
pub use store::{Catalog, RecordSource, Snapshot};
