pub mod error;
pub mod handlers;
pub mod router;
pub mod sheet;
pub mod workbook;

pub use error::ExportError;
pub use handlers::ExportState;
pub use router::export_routes;
pub use sheet::SheetNamer;
pub use workbook::{
    appointments_file_name, departments_file_name, export_appointments, export_departments, write_export,
    Export, XLSX_CONTENT_TYPE,
};
