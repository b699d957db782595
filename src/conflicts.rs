use crate::slots::TimeSlot;

/// Append-only diagnostics for assignment attempts that could not be met.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConflictLog {
    messages: Vec<String>,
}

impl ConflictLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    pub fn no_teacher(&mut self, subject_name: &str, slot: &TimeSlot) {
        self.push(format!(
            "No available teacher for {} at {} on {}",
            subject_name,
            slot.start_label(),
            slot.day_name()
        ));
    }

    pub fn no_classroom(&mut self, subject_name: &str, slot: &TimeSlot) {
        self.push(format!(
            "No available classroom for {} at {} on {}",
            subject_name,
            slot.start_label(),
            slot.day_name()
        ));
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}
