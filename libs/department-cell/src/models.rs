use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

use sync_cell::SyncError;

/// Photos above this size are rejected before any upload is attempted.
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

// ==============================================================================
// REQUIREMENT STATUS
// ==============================================================================

/// Six ordered stages of a requirement; the ordinal doubles as its weight.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PatientStatus {
    #[default]
    Belum,
    Konsul,
    Rontgen,
    Perawatan,
    Kontrol,
    Selesai,
}

impl PatientStatus {
    pub const ALL: [PatientStatus; 6] = [
        PatientStatus::Belum,
        PatientStatus::Konsul,
        PatientStatus::Rontgen,
        PatientStatus::Perawatan,
        PatientStatus::Kontrol,
        PatientStatus::Selesai,
    ];

    pub const MAX_WEIGHT: u32 = 5;

    pub fn weight(self) -> u32 {
        match self {
            PatientStatus::Belum => 0,
            PatientStatus::Konsul => 1,
            PatientStatus::Rontgen => 2,
            PatientStatus::Perawatan => 3,
            PatientStatus::Kontrol => 4,
            PatientStatus::Selesai => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PatientStatus::Belum => "Belum Dikerjakan",
            PatientStatus::Konsul => "Konsultasi",
            PatientStatus::Rontgen => "Rontgen",
            PatientStatus::Perawatan => "Perawatan",
            PatientStatus::Kontrol => "Kontrol",
            PatientStatus::Selesai => "Selesai",
        }
    }
}

impl fmt::Display for PatientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatientStatus::Belum => write!(f, "belum"),
            PatientStatus::Konsul => write!(f, "konsul"),
            PatientStatus::Rontgen => write!(f, "rontgen"),
            PatientStatus::Perawatan => write!(f, "perawatan"),
            PatientStatus::Kontrol => write!(f, "kontrol"),
            PatientStatus::Selesai => write!(f, "selesai"),
        }
    }
}

impl FromStr for PatientStatus {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PatientStatus::ALL
            .into_iter()
            .find(|status| status.to_string() == s)
            .ok_or_else(|| SyncError::validation(format!("Status tidak dikenal: {}", s)))
    }
}

// ==============================================================================
// CORE ENTITIES
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientEntry {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
}

impl PatientEntry {
    pub fn new(name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            phone: phone.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Photo {
    pub id: Uuid,
    pub url: String,
    pub storage_path: String,
}

/// Single name/phone view kept for older screens and exports.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LegacyContact {
    pub nama_pasien: String,
    pub nomor_telp: String,
}

pub fn derive_legacy_contact(entries: &[PatientEntry]) -> LegacyContact {
    entries
        .first()
        .map(|entry| LegacyContact {
            nama_pasien: entry.name.clone(),
            nomor_telp: entry.phone.clone(),
        })
        .unwrap_or_default()
}

/// A requirement row. The entry list is the only writable contact data.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Patient {
    pub id: Uuid,
    pub requirement: String,
    pub status: PatientStatus,
    pub entries: Vec<PatientEntry>,
    pub photos: Vec<Photo>,
    pub sort_order: i32,
}

impl Patient {
    pub fn new(requirement: impl Into<String>, sort_order: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            requirement: requirement.into(),
            status: PatientStatus::default(),
            entries: Vec::new(),
            photos: Vec::new(),
            sort_order,
        }
    }

    pub fn legacy_contact(&self) -> LegacyContact {
        derive_legacy_contact(&self.entries)
    }

    pub fn weight(&self) -> u32 {
        self.status.weight()
    }

    pub fn entry_mut(&mut self, entry_id: Uuid) -> Result<&mut PatientEntry, SyncError> {
        self.entries
            .iter_mut()
            .find(|entry| entry.id == entry_id)
            .ok_or_else(|| SyncError::not_found(format!("Data pasien {}", entry_id)))
    }
}

impl Serialize for Patient {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct View<'a> {
            id: Uuid,
            requirement: &'a str,
            status: PatientStatus,
            entries: &'a [PatientEntry],
            photos: &'a [Photo],
            sort_order: i32,
            nama_pasien: String,
            nomor_telp: String,
        }

        let legacy = self.legacy_contact();
        View {
            id: self.id,
            requirement: &self.requirement,
            status: self.status,
            entries: &self.entries,
            photos: &self.photos,
            sort_order: self.sort_order,
            nama_pasien: legacy.nama_pasien,
            nomor_telp: legacy.nomor_telp,
        }
        .serialize(serializer)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubDepartment {
    pub id: Uuid,
    pub department_id: Uuid,
    pub name: String,
    pub patients: Vec<Patient>,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Department {
    pub id: Uuid,
    pub name: String,
    pub has_sub_departments: bool,
    pub patients: Vec<Patient>,
    pub sub_departments: Vec<SubDepartment>,
    pub sort_order: i32,
}

impl Department {
    pub fn new(name: impl Into<String>, has_sub_departments: bool, sort_order: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            has_sub_departments,
            patients: Vec::new(),
            sub_departments: Vec::new(),
            sort_order,
        }
    }

    /// Every patient of the department, wherever it lives.
    pub fn all_patients(&self) -> impl Iterator<Item = &Patient> {
        self.patients
            .iter()
            .chain(self.sub_departments.iter().flat_map(|sub| sub.patients.iter()))
    }

    pub fn patient_count(&self) -> usize {
        self.all_patients().count()
    }
}

// ==============================================================================
// BOARD STATE
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatientLocation {
    pub department_id: Uuid,
    pub sub_department_id: Option<Uuid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DepartmentBoardState {
    pub departments: Vec<Department>,
}

impl DepartmentBoardState {
    pub fn department(&self, id: Uuid) -> Result<&Department, SyncError> {
        self.departments
            .iter()
            .find(|d| d.id == id)
            .ok_or_else(|| SyncError::not_found(format!("Departemen {}", id)))
    }

    pub fn department_mut(&mut self, id: Uuid) -> Result<&mut Department, SyncError> {
        self.departments
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| SyncError::not_found(format!("Departemen {}", id)))
    }

    pub fn sub_department_mut(&mut self, id: Uuid) -> Result<&mut SubDepartment, SyncError> {
        self.departments
            .iter_mut()
            .flat_map(|d| d.sub_departments.iter_mut())
            .find(|sub| sub.id == id)
            .ok_or_else(|| SyncError::not_found(format!("Sub-departemen {}", id)))
    }

    /// The ordered patient list patients are added to or reordered in.
    /// Enforces that departments with sub-departments hold no direct patients.
    pub fn patient_list_mut(
        &mut self,
        department_id: Uuid,
        sub_department_id: Option<Uuid>,
    ) -> Result<&mut Vec<Patient>, SyncError> {
        let department = self.department_mut(department_id)?;

        match (department.has_sub_departments, sub_department_id) {
            (false, None) => Ok(&mut department.patients),
            (true, Some(sub_id)) => department
                .sub_departments
                .iter_mut()
                .find(|sub| sub.id == sub_id)
                .map(|sub| &mut sub.patients)
                .ok_or_else(|| SyncError::not_found(format!("Sub-departemen {}", sub_id))),
            (true, None) => Err(SyncError::validation(
                "Departemen ini memakai sub-departemen; pilih sub-departemen",
            )),
            (false, Some(_)) => Err(SyncError::validation(
                "Departemen ini tidak memakai sub-departemen",
            )),
        }
    }

    pub fn locate_patient(&self, patient_id: Uuid) -> Option<PatientLocation> {
        self.departments.iter().find_map(|department| {
            if department.patients.iter().any(|p| p.id == patient_id) {
                return Some(PatientLocation {
                    department_id: department.id,
                    sub_department_id: None,
                });
            }
            department
                .sub_departments
                .iter()
                .find(|sub| sub.patients.iter().any(|p| p.id == patient_id))
                .map(|sub| PatientLocation {
                    department_id: department.id,
                    sub_department_id: Some(sub.id),
                })
        })
    }

    pub fn patient(&self, patient_id: Uuid) -> Result<&Patient, SyncError> {
        self.departments
            .iter()
            .flat_map(|d| d.all_patients())
            .find(|p| p.id == patient_id)
            .ok_or_else(|| SyncError::not_found(format!("Pasien {}", patient_id)))
    }

    pub fn patient_mut(&mut self, patient_id: Uuid) -> Result<&mut Patient, SyncError> {
        let location = self
            .locate_patient(patient_id)
            .ok_or_else(|| SyncError::not_found(format!("Pasien {}", patient_id)))?;

        self.patient_list_mut(location.department_id, location.sub_department_id)?
            .iter_mut()
            .find(|p| p.id == patient_id)
            .ok_or_else(|| SyncError::not_found(format!("Pasien {}", patient_id)))
    }

    pub fn remove_patient(&mut self, patient_id: Uuid) -> Result<(Patient, PatientLocation), SyncError> {
        let location = self
            .locate_patient(patient_id)
            .ok_or_else(|| SyncError::not_found(format!("Pasien {}", patient_id)))?;

        let list = self.patient_list_mut(location.department_id, location.sub_department_id)?;
        let index = list
            .iter()
            .position(|p| p.id == patient_id)
            .ok_or_else(|| SyncError::not_found(format!("Pasien {}", patient_id)))?;

        Ok((list.remove(index), location))
    }

    /// Finds a photo and the patient that owns it.
    pub fn find_photo(&self, photo_id: Uuid) -> Option<(Uuid, Photo)> {
        self.departments
            .iter()
            .flat_map(|d| d.all_patients())
            .find_map(|patient| {
                patient
                    .photos
                    .iter()
                    .find(|photo| photo.id == photo_id)
                    .map(|photo| (patient.id, photo.clone()))
            })
    }
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDepartmentRequest {
    pub name: String,
    #[serde(default)]
    pub has_sub_departments: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenameRequest {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetSubDepartmentsRequest {
    pub has_sub_departments: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientEntryInput {
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePatientRequest {
    pub requirement: String,
    #[serde(default)]
    pub sub_department_id: Option<Uuid>,
    #[serde(default)]
    pub status: Option<PatientStatus>,
    #[serde(default)]
    pub entries: Vec<PatientEntryInput>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePatientRequest {
    pub requirement: Option<String>,
    pub status: Option<PatientStatus>,
    pub entries: Option<Vec<PatientEntryInput>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: PatientStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub from: usize,
    pub to: usize,
    #[serde(default)]
    pub sub_department_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoUploadRequest {
    /// Base64 payload, optionally as a `data:image/...;base64,` URL.
    pub data: String,
    pub content_type: Option<String>,
}

pub(crate) fn required_text(value: &str, field: &str) -> Result<String, SyncError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SyncError::validation(format!("{} wajib diisi", field)));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_contact_follows_first_entry() {
        let mut patient = Patient::new("Tumpatan GIC", 0);
        assert_eq!(patient.legacy_contact(), LegacyContact::default());

        patient.entries.push(PatientEntry::new("Siti", "0811"));
        patient.entries.push(PatientEntry::new("Budi", "0822"));
        assert_eq!(patient.legacy_contact().nama_pasien, "Siti");
        assert_eq!(patient.legacy_contact().nomor_telp, "0811");

        patient.entries.remove(0);
        assert_eq!(patient.legacy_contact().nama_pasien, "Budi");
    }

    #[test]
    fn test_patient_json_exposes_derived_fields() {
        let mut patient = Patient::new("Ekstraksi", 0);
        patient.entries.push(PatientEntry::new("Siti", "0811"));

        let json = serde_json::to_value(&patient).unwrap();
        assert_eq!(json["nama_pasien"], "Siti");
        assert_eq!(json["nomor_telp"], "0811");
        assert_eq!(json["status"], "belum");
    }

    #[test]
    fn test_status_weights_are_ordered() {
        let weights: Vec<u32> = PatientStatus::ALL.iter().map(|s| s.weight()).collect();
        assert_eq!(weights, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!("selesai".parse::<PatientStatus>().unwrap(), PatientStatus::Selesai);
        assert!("unknown".parse::<PatientStatus>().is_err());
    }

    #[test]
    fn test_patient_list_respects_sub_department_flag() {
        let mut department = Department::new("Konservasi", true, 0);
        let department_id = department.id;
        department.patients.clear();
        let mut state = DepartmentBoardState { departments: vec![department] };

        assert!(state.patient_list_mut(department_id, None).is_err());
    }
}
