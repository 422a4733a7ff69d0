use assert_matches::assert_matches;
use chrono::NaiveDate;
use uuid::Uuid;

use appointment_cell::Appointment;
use department_cell::{Department, Patient, PatientEntry, PatientStatus, Photo, SubDepartment};
use export_cell::{export_appointments, export_departments, write_export, ExportError};

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
}

fn appointment(name: &str, completed: bool) -> Appointment {
    Appointment {
        id: Uuid::new_v4(),
        date: today(),
        time: "09:00".to_string(),
        cubicle: "2".to_string(),
        treatment_plan: "Scaling".to_string(),
        case_text: "Kalkulus".to_string(),
        department_name: "Periodonsia".to_string(),
        patient_name: name.to_string(),
        phone: "0812".to_string(),
        completed,
    }
}

fn patient(requirement: &str) -> Patient {
    let mut patient = Patient::new(requirement, 0);
    patient.status = PatientStatus::Rontgen;
    patient.entries.push(PatientEntry::new("Ani", "0812"));
    patient.photos.push(Photo {
        id: Uuid::new_v4(),
        url: "https://example.test/a.jpg".to_string(),
        storage_path: "p/a.jpg".to_string(),
    });
    patient
}

#[test]
fn test_appointments_workbook() {
    let export = export_appointments(&[appointment("Ani", false), appointment("Budi", true)], today()).unwrap();

    assert_eq!(export.file_name, "Jadwal_Pasien_20240603.xlsx");
    assert!(export.bytes.starts_with(ZIP_MAGIC));
}

#[test]
fn test_departments_workbook_with_clashing_names() {
    let mut direct = Department::new("Bedah/Mulut", false, 0);
    direct.patients.push(patient("Odontektomi"));

    let mut grouped = Department::new("bedah-mulut", true, 1);
    grouped.sub_departments.push(SubDepartment {
        id: Uuid::new_v4(),
        department_id: grouped.id,
        name: "Minor".to_string(),
        patients: vec![patient("Ekstraksi")],
        sort_order: 0,
    });

    let export = export_departments(&[direct, grouped], today()).unwrap();

    assert_eq!(export.file_name, "Requirement_Departemen_20240603.xlsx");
    assert!(export.bytes.starts_with(ZIP_MAGIC));
}

#[test]
fn test_department_name_truncated_next_to_apostrophe() {
    let name = format!("{}'B", "A".repeat(30));
    let departments = vec![Department::new(name.clone(), false, 0), Department::new(name, false, 1)];

    let export = export_departments(&departments, today()).unwrap();

    assert!(export.bytes.starts_with(ZIP_MAGIC));
}

#[test]
fn test_empty_departments_still_produce_a_sheet() {
    let export = export_departments(&[], today()).unwrap();
    assert!(export.bytes.starts_with(ZIP_MAGIC));
}

#[test]
fn test_write_export_to_directory() {
    let dir = tempfile::tempdir().unwrap();
    let export = export_appointments(&[], today()).unwrap();

    let path = write_export(dir.path(), &export).unwrap();

    assert_eq!(path.file_name().unwrap(), "Jadwal_Pasien_20240603.xlsx");
    assert_eq!(std::fs::read(&path).unwrap(), export.bytes);
}

#[test]
fn test_write_export_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let export = export_appointments(&[], today()).unwrap();

    let result = write_export(&dir.path().join("missing"), &export);

    assert_matches!(result, Err(ExportError::Io(_)));
}
