use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::models::{Department, PatientStatus};

/// Weighted completion in whole percent, floored, so 100 means every
/// requirement is done. A department without patients reports 0.
pub fn weighted_progress(department: &Department) -> u8 {
    let (count, total) = department
        .all_patients()
        .fold((0u64, 0u64), |(count, total), patient| {
            (count + 1, total + u64::from(patient.weight()))
        });

    if count == 0 {
        return 0;
    }

    let max = count * u64::from(PatientStatus::MAX_WEIGHT);
    (total * 100 / max) as u8
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DepartmentProgress {
    pub department_id: Uuid,
    pub name: String,
    pub percent: u8,
    pub patient_count: usize,
    pub celebrate: bool,
}

/// Remembers the last progress seen per department and reports the moment a
/// department reaches 100%.
#[derive(Debug, Default)]
pub struct CompletionWatcher {
    last_seen: HashMap<Uuid, u8>,
}

impl CompletionWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the current progress without celebrating, e.g. on initial load.
    pub fn prime(&mut self, departments: &[Department]) {
        self.last_seen = departments
            .iter()
            .map(|department| (department.id, weighted_progress(department)))
            .collect();
    }

    /// Returns true exactly when progress moves from a known value below 100
    /// to 100 with at least one patient present.
    pub fn observe(&mut self, department: &Department) -> bool {
        let percent = weighted_progress(department);
        let previous = self.last_seen.insert(department.id, percent);

        matches!(previous, Some(before) if before != 100)
            && percent == 100
            && department.patient_count() > 0
    }

    /// Starts a department created after load from 0%, so its first
    /// completion celebrates.
    pub fn track(&mut self, department_id: Uuid) {
        self.last_seen.entry(department_id).or_insert(0);
    }

    pub fn forget(&mut self, department_id: Uuid) {
        self.last_seen.remove(&department_id);
    }

    pub fn report(&mut self, departments: &[Department]) -> Vec<DepartmentProgress> {
        departments
            .iter()
            .map(|department| DepartmentProgress {
                department_id: department.id,
                name: department.name.clone(),
                percent: weighted_progress(department),
                patient_count: department.patient_count(),
                celebrate: self.observe(department),
            })
            .collect()
    }
}
