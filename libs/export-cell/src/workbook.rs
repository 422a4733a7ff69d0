use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_xlsxwriter::{Color, Format, FormatBorder, Workbook, Worksheet};
use tracing::info;

use appointment_cell::Appointment;
use department_cell::{Department, Patient};

use crate::error::ExportError;
use crate::sheet::SheetNamer;

pub const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

pub const APPOINTMENT_HEADERS: [&str; 10] = [
    "No",
    "Tanggal",
    "Jam",
    "Kubikel",
    "Rencana Perawatan",
    "Kasus",
    "Departemen",
    "Nama Pasien",
    "No. Telp",
    "Status",
];

pub const DEPARTMENT_HEADERS: [&str; 7] = [
    "No",
    "Sub-Departemen",
    "Requirement",
    "Status",
    "Nama Pasien",
    "No. Telp",
    "Foto",
];

const APPOINTMENT_SHEET: &str = "Jadwal Pasien";
const EMPTY_DEPARTMENTS_SHEET: &str = "Departemen";
const HEADER_FILL: u32 = 0x1F4E78;

/// A finished workbook ready to be served or written to disk.
#[derive(Debug, Clone)]
pub struct Export {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub fn appointments_file_name(today: NaiveDate) -> String {
    format!("Jadwal_Pasien_{}.xlsx", today.format("%Y%m%d"))
}

pub fn departments_file_name(today: NaiveDate) -> String {
    format!("Requirement_Departemen_{}.xlsx", today.format("%Y%m%d"))
}

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_color(Color::White)
        .set_background_color(Color::RGB(HEADER_FILL))
        .set_border(FormatBorder::Thin)
}

fn write_headers(sheet: &mut Worksheet, headers: &[&str]) -> Result<(), ExportError> {
    let format = header_format();
    for (col, header) in headers.iter().enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, *header, &format)?;
        sheet.set_column_width(col, (header.len() + 6) as f64)?;
    }
    sheet.set_freeze_panes(1, 0)?;
    Ok(())
}

pub fn export_appointments(appointments: &[Appointment], today: NaiveDate) -> Result<Export, ExportError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(APPOINTMENT_SHEET)?;
    write_headers(sheet, &APPOINTMENT_HEADERS)?;

    for (index, appointment) in appointments.iter().enumerate() {
        let row = index as u32 + 1;
        let status = if appointment.completed { "Selesai" } else { "Belum" };

        sheet.write_number(row, 0, (index + 1) as f64)?;
        sheet.write_string(row, 1, appointment.date.format("%Y-%m-%d").to_string())?;
        sheet.write_string(row, 2, &appointment.time)?;
        sheet.write_string(row, 3, &appointment.cubicle)?;
        sheet.write_string(row, 4, &appointment.treatment_plan)?;
        sheet.write_string(row, 5, &appointment.case_text)?;
        sheet.write_string(row, 6, &appointment.department_name)?;
        sheet.write_string(row, 7, &appointment.patient_name)?;
        sheet.write_string(row, 8, &appointment.phone)?;
        sheet.write_string(row, 9, status)?;
    }

    let bytes = workbook.save_to_buffer()?;
    info!("Exported {} appointments ({} bytes)", appointments.len(), bytes.len());

    Ok(Export {
        file_name: appointments_file_name(today),
        bytes,
    })
}

/// One sheet per department. Sub-department patients carry the
/// sub-department name in their row; direct patients leave it blank.
pub fn export_departments(departments: &[Department], today: NaiveDate) -> Result<Export, ExportError> {
    let mut workbook = Workbook::new();
    let mut namer = SheetNamer::new()?;

    if departments.is_empty() {
        let sheet = workbook.add_worksheet();
        sheet.set_name(EMPTY_DEPARTMENTS_SHEET)?;
        write_headers(sheet, &DEPARTMENT_HEADERS)?;
    }

    for department in departments {
        let sheet = workbook.add_worksheet();
        sheet.set_name(namer.unique(&department.name))?;
        write_headers(sheet, &DEPARTMENT_HEADERS)?;

        let rows = department
            .patients
            .iter()
            .map(|patient| ("", patient))
            .chain(department.sub_departments.iter().flat_map(|sub| {
                sub.patients.iter().map(move |patient| (sub.name.as_str(), patient))
            }));

        for (index, (sub_department, patient)) in rows.enumerate() {
            write_patient_row(sheet, index as u32 + 1, sub_department, patient)?;
        }
    }

    let bytes = workbook.save_to_buffer()?;
    info!("Exported {} departments ({} bytes)", departments.len(), bytes.len());

    Ok(Export {
        file_name: departments_file_name(today),
        bytes,
    })
}

fn write_patient_row(sheet: &mut Worksheet, row: u32, sub_department: &str, patient: &Patient) -> Result<(), ExportError> {
    let names: Vec<&str> = patient.entries.iter().map(|e| e.name.as_str()).collect();
    let phones: Vec<&str> = patient.entries.iter().map(|e| e.phone.as_str()).collect();
    let photos: Vec<&str> = patient.photos.iter().map(|p| p.url.as_str()).collect();

    sheet.write_number(row, 0, row as f64)?;
    sheet.write_string(row, 1, sub_department)?;
    sheet.write_string(row, 2, &patient.requirement)?;
    sheet.write_string(row, 3, patient.status.label())?;
    sheet.write_string(row, 4, names.join(", "))?;
    sheet.write_string(row, 5, phones.join(", "))?;
    sheet.write_string(row, 6, photos.join("\n"))?;
    Ok(())
}

/// Writes the workbook into `dir` under its own file name.
pub fn write_export(dir: &Path, export: &Export) -> Result<PathBuf, ExportError> {
    let path = dir.join(&export.file_name);
    std::fs::write(&path, &export.bytes)?;
    Ok(path)
}
