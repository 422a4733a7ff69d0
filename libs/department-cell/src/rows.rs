// Table shapes for the Supabase schema. Conversion to and from the typed
// board model happens only here.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::models::{Department, Patient, PatientEntry, PatientStatus, Photo, SubDepartment};

const LEGACY_ENTRY_NAME: &[u8] = b"legacy-entry";

pub const DEPARTMENTS_TABLE: &str = "departments";
pub const SUB_DEPARTMENTS_TABLE: &str = "sub_departments";
pub const PATIENTS_TABLE: &str = "patients";
pub const PHOTOS_TABLE: &str = "patient_photos";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DepartmentRow {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub has_sub_departments: bool,
    #[serde(default)]
    pub sort_order: i32,
}

impl From<&Department> for DepartmentRow {
    fn from(department: &Department) -> Self {
        Self {
            id: department.id,
            name: department.name.clone(),
            has_sub_departments: department.has_sub_departments,
            sort_order: department.sort_order,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubDepartmentRow {
    pub id: Uuid,
    pub department_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub sort_order: i32,
}

impl SubDepartmentRow {
    pub fn new(sub: &SubDepartment, parent_id: Uuid) -> Self {
        Self {
            id: sub.id,
            department_id: parent_id,
            name: sub.name.clone(),
            sort_order: sub.sort_order,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientRow {
    pub id: Uuid,
    pub department_id: Uuid,
    #[serde(default)]
    pub sub_department_id: Option<Uuid>,
    pub requirement: String,
    pub status: String,
    #[serde(default)]
    pub entries: Vec<PatientEntry>,
    #[serde(default)]
    pub nama_pasien: String,
    #[serde(default)]
    pub nomor_telp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
}

impl PatientRow {
    /// Legacy columns are always written from the entry list.
    pub fn from_patient(
        patient: &Patient,
        department_id: Uuid,
        sub_department_id: Option<Uuid>,
        sort_order: Option<i32>,
    ) -> Self {
        let legacy = patient.legacy_contact();
        Self {
            id: patient.id,
            department_id,
            sub_department_id,
            requirement: patient.requirement.clone(),
            status: patient.status.to_string(),
            entries: patient.entries.clone(),
            nama_pasien: legacy.nama_pasien,
            nomor_telp: legacy.nomor_telp,
            sort_order,
        }
    }

    pub fn into_patient(self) -> Patient {
        let status = self.status.parse().unwrap_or_else(|_| {
            warn!("Patient {} has unknown status '{}', reading as belum", self.id, self.status);
            PatientStatus::default()
        });

        // Rows written before entry lists existed only carry the legacy pair.
        // Its entry id is derived from the patient so it is the same on every load.
        let entries = if self.entries.is_empty() && !self.nama_pasien.is_empty() {
            vec![PatientEntry {
                id: Uuid::new_v5(&self.id, LEGACY_ENTRY_NAME),
                name: self.nama_pasien,
                phone: self.nomor_telp,
            }]
        } else {
            self.entries
        };

        Patient {
            id: self.id,
            requirement: self.requirement,
            status,
            entries,
            photos: Vec::new(),
            sort_order: self.sort_order.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhotoRow {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub url: String,
    pub storage_path: String,
}

impl PhotoRow {
    pub fn new(photo: &Photo, patient_id: Uuid) -> Self {
        Self {
            id: photo.id,
            patient_id,
            url: photo.url.clone(),
            storage_path: photo.storage_path.clone(),
        }
    }
}

impl From<PhotoRow> for Photo {
    fn from(row: PhotoRow) -> Self {
        Photo {
            id: row.id,
            url: row.url,
            storage_path: row.storage_path,
        }
    }
}

/// Builds the department tree from flat table rows. Rows are expected in
/// `sort_order`; patients whose parent is missing are dropped with a warning.
pub fn assemble_departments(
    departments: Vec<DepartmentRow>,
    sub_departments: Vec<SubDepartmentRow>,
    patients: Vec<PatientRow>,
    photos: Vec<PhotoRow>,
) -> Vec<Department> {
    let mut photos_by_patient: HashMap<Uuid, Vec<Photo>> = HashMap::new();
    for row in photos {
        photos_by_patient.entry(row.patient_id).or_default().push(row.into());
    }

    let mut tree: Vec<Department> = departments
        .into_iter()
        .map(|row| Department {
            id: row.id,
            name: row.name,
            has_sub_departments: row.has_sub_departments,
            patients: Vec::new(),
            sub_departments: Vec::new(),
            sort_order: row.sort_order,
        })
        .collect();

    for row in sub_departments {
        match tree.iter_mut().find(|d| d.id == row.department_id) {
            Some(department) => department.sub_departments.push(SubDepartment {
                id: row.id,
                department_id: row.department_id,
                name: row.name,
                patients: Vec::new(),
                sort_order: row.sort_order,
            }),
            None => warn!("Sub-department {} has no parent department", row.id),
        }
    }

    for row in patients {
        let department_id = row.department_id;
        let sub_department_id = row.sub_department_id;
        let mut patient = row.into_patient();
        patient.photos = photos_by_patient.remove(&patient.id).unwrap_or_default();

        let Some(department) = tree.iter_mut().find(|d| d.id == department_id) else {
            warn!("Patient {} has no parent department", patient.id);
            continue;
        };

        match sub_department_id {
            Some(sub_id) => match department.sub_departments.iter_mut().find(|s| s.id == sub_id) {
                Some(sub) => sub.patients.push(patient),
                None => warn!("Patient {} has no parent sub-department", patient.id),
            },
            None => department.patients.push(patient),
        }
    }

    tree
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_writes_legacy_from_first_entry() {
        let mut patient = Patient::new("Crown", 0);
        patient.entries.push(PatientEntry::new("Ani", "0812"));
        patient.entries.push(PatientEntry::new("Dewi", "0813"));

        let row = PatientRow::from_patient(&patient, Uuid::new_v4(), None, Some(3));
        assert_eq!(row.nama_pasien, "Ani");
        assert_eq!(row.nomor_telp, "0812");
        assert_eq!(row.sort_order, Some(3));
    }

    #[test]
    fn test_sort_order_omitted_when_unset() {
        let patient = Patient::new("Crown", 0);
        let json = serde_json::to_value(PatientRow::from_patient(&patient, Uuid::new_v4(), None, None)).unwrap();
        assert!(json.get("sort_order").is_none());
    }

    #[test]
    fn test_legacy_only_row_becomes_single_entry() {
        let row = PatientRow {
            id: Uuid::new_v4(),
            department_id: Uuid::new_v4(),
            sub_department_id: None,
            requirement: "Pencabutan".to_string(),
            status: "kontrol".to_string(),
            entries: Vec::new(),
            nama_pasien: "Rina".to_string(),
            nomor_telp: "0899".to_string(),
            sort_order: Some(1),
        };

        let reloaded = row.clone().into_patient();
        let patient = row.into_patient();
        assert_eq!(patient.status, PatientStatus::Kontrol);
        assert_eq!(patient.entries.len(), 1);
        assert_eq!(patient.legacy_contact().nama_pasien, "Rina");
        // Entry ids stay stable across loads.
        assert_eq!(reloaded.entries[0].id, patient.entries[0].id);
    }

    #[test]
    fn test_assemble_places_patients_and_photos() {
        let dept = Uuid::new_v4();
        let sub = Uuid::new_v4();
        let patient_id = Uuid::new_v4();

        let tree = assemble_departments(
            vec![DepartmentRow { id: dept, name: "Ortho".into(), has_sub_departments: true, sort_order: 0 }],
            vec![SubDepartmentRow { id: sub, department_id: dept, name: "Lepasan".into(), sort_order: 0 }],
            vec![PatientRow {
                id: patient_id,
                department_id: dept,
                sub_department_id: Some(sub),
                requirement: "Plat".into(),
                status: "belum".into(),
                entries: Vec::new(),
                nama_pasien: String::new(),
                nomor_telp: String::new(),
                sort_order: Some(0),
            }],
            vec![PhotoRow {
                id: Uuid::new_v4(),
                patient_id,
                url: "http://x/a.jpg".into(),
                storage_path: "a.jpg".into(),
            }],
        );

        assert!(tree[0].patients.is_empty());
        assert_eq!(tree[0].sub_departments[0].patients.len(), 1);
        assert_eq!(tree[0].sub_departments[0].patients[0].photos.len(), 1);
    }
}
