use thiserror::Error;

use shared_models::error::AppError;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("Invalid sheet name pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ExportError> for AppError {
    fn from(error: ExportError) -> Self {
        AppError::Internal(error.to_string())
    }
}
