use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{Department, Patient, PatientStatus, Photo, SubDepartment};

/// Remote persistence for the department tree. Every write carries only the
/// entity that changed.
#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    async fn list_departments(&self) -> Result<Vec<Department>>;

    async fn upsert_department(&self, department: &Department) -> Result<()>;

    /// Removes the department with its sub-departments, patients and photos.
    async fn delete_department(&self, department_id: Uuid) -> Result<()>;

    async fn set_department_sort_order(&self, department_id: Uuid, order: i32) -> Result<()>;

    async fn upsert_sub_department(&self, sub_department: &SubDepartment, parent_id: Uuid) -> Result<()>;

    async fn delete_sub_department(&self, sub_department_id: Uuid) -> Result<()>;

    async fn upsert_patient(
        &self,
        patient: &Patient,
        department_id: Uuid,
        sub_department_id: Option<Uuid>,
        sort_order: Option<i32>,
    ) -> Result<()>;

    async fn update_patient_status(&self, patient_id: Uuid, status: PatientStatus) -> Result<()>;

    /// Deletes photo blobs, then photo rows, then the patient row.
    async fn delete_patient(&self, patient_id: Uuid) -> Result<()>;

    async fn set_patient_sort_order(&self, patient_id: Uuid, order: i32) -> Result<()>;

    async fn next_sort_order(&self, department_id: Uuid, sub_department_id: Option<Uuid>) -> Result<i32>;

    /// Chooses the id, storage path and public URL of a photo before upload.
    fn plan_photo(&self, patient_id: Uuid, content_type: &str) -> Photo;

    async fn upload_photo(
        &self,
        patient_id: Uuid,
        photo: &Photo,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<Photo>;

    async fn delete_photo(&self, photo: &Photo) -> Result<()>;
}
