use thiserror::Error;

use sync_cell::SyncError;

use crate::models::MAX_PHOTO_BYTES;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DepartmentError {
    #[error("Data foto tidak valid: {0}")]
    InvalidPhotoPayload(String),

    #[error("Tipe file bukan gambar: {0}")]
    NotAnImage(String),

    #[error("Ukuran foto maksimal 5 MB ({0} byte)")]
    PhotoTooLarge(usize),

    #[error("Kosongkan departemen sebelum mengubah mode sub-departemen")]
    DepartmentNotEmpty,
}

impl DepartmentError {
    pub fn check_photo_size(len: usize) -> Result<(), DepartmentError> {
        if len > MAX_PHOTO_BYTES {
            return Err(DepartmentError::PhotoTooLarge(len));
        }
        Ok(())
    }
}

impl From<DepartmentError> for SyncError {
    fn from(error: DepartmentError) -> Self {
        match error {
            DepartmentError::PhotoTooLarge(_) => SyncError::PayloadTooLarge(error.to_string()),
            other => SyncError::Validation(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_guard_boundary() {
        assert!(DepartmentError::check_photo_size(MAX_PHOTO_BYTES).is_ok());
        assert_eq!(
            DepartmentError::check_photo_size(MAX_PHOTO_BYTES + 1),
            Err(DepartmentError::PhotoTooLarge(MAX_PHOTO_BYTES + 1))
        );
    }

    #[test]
    fn test_maps_to_sync_error() {
        let error: SyncError = DepartmentError::PhotoTooLarge(1).into();
        assert!(matches!(error, SyncError::PayloadTooLarge(_)));

        let error: SyncError = DepartmentError::NotAnImage("text/plain".into()).into();
        assert!(matches!(error, SyncError::Validation(_)));
    }
}
