use anyhow::Result;
use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::error::DepartmentError;
use crate::models::{Department, Patient, PatientStatus, Photo, SubDepartment};
use crate::rows::{
    assemble_departments, DepartmentRow, PatientRow, PhotoRow, SubDepartmentRow,
    DEPARTMENTS_TABLE, PATIENTS_TABLE, PHOTOS_TABLE, SUB_DEPARTMENTS_TABLE,
};
use crate::services::photo::extension_for;
use crate::services::repository::DepartmentRepository;

#[derive(Debug, Deserialize)]
struct IdRow {
    id: Uuid,
}

#[derive(Debug, Deserialize)]
struct SortOrderRow {
    sort_order: Option<i32>,
}

pub struct SupabaseDepartmentRepository {
    supabase: SupabaseClient,
    photo_bucket: String,
}

impl SupabaseDepartmentRepository {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            photo_bucket: config.photo_bucket.clone(),
        }
    }

    async fn list_table<T>(&self, table: &str) -> Result<Vec<T>>
    where T: serde::de::DeserializeOwned {
        let path = format!("/rest/v1/{}?select=*&order=sort_order.asc", table);
        self.supabase.request(Method::GET, &path, None).await
    }

    async fn patient_ids_where(&self, filter: &str) -> Result<Vec<Uuid>> {
        let path = format!("/rest/v1/{}?select=id&{}", PATIENTS_TABLE, filter);
        let rows: Vec<IdRow> = self.supabase.request(Method::GET, &path, None).await?;
        Ok(rows.into_iter().map(|row| row.id).collect())
    }

    /// Deletes every patient matching `filter`, continuing past failures.
    async fn delete_patients_where(&self, filter: &str) -> Result<()> {
        for patient_id in self.patient_ids_where(filter).await? {
            if let Err(e) = self.delete_patient(patient_id).await {
                warn!("Failed to delete patient {} during cascade: {}", patient_id, e);
            }
        }
        Ok(())
    }

    async fn patch(&self, table: &str, id: Uuid, body: serde_json::Value) -> Result<()> {
        let path = format!("/rest/v1/{}?id=eq.{}", table, id);
        self.supabase.execute(Method::PATCH, &path, Some(body), None).await
    }

    async fn delete_where(&self, table: &str, filter: &str) -> Result<()> {
        let path = format!("/rest/v1/{}?{}", table, filter);
        self.supabase.execute(Method::DELETE, &path, None, None).await
    }
}

fn sub_department_filter(sub_department_id: Option<Uuid>) -> String {
    match sub_department_id {
        Some(id) => format!("sub_department_id=eq.{}", id),
        None => "sub_department_id=is.null".to_string(),
    }
}

#[async_trait]
impl DepartmentRepository for SupabaseDepartmentRepository {
    async fn list_departments(&self) -> Result<Vec<Department>> {
        debug!("Loading department tree");

        let departments: Vec<DepartmentRow> = self.list_table(DEPARTMENTS_TABLE).await?;
        let sub_departments: Vec<SubDepartmentRow> = self.list_table(SUB_DEPARTMENTS_TABLE).await?;
        let patients: Vec<PatientRow> = self.list_table(PATIENTS_TABLE).await?;

        let photos_path = format!("/rest/v1/{}?select=*", PHOTOS_TABLE);
        let photos: Vec<PhotoRow> = self.supabase.request(Method::GET, &photos_path, None).await?;

        Ok(assemble_departments(departments, sub_departments, patients, photos))
    }

    async fn upsert_department(&self, department: &Department) -> Result<()> {
        debug!("Upserting department: {}", department.id);
        let row = serde_json::to_value(DepartmentRow::from(department))?;
        self.supabase.upsert(DEPARTMENTS_TABLE, json!([row])).await
    }

    async fn delete_department(&self, department_id: Uuid) -> Result<()> {
        debug!("Deleting department: {}", department_id);

        self.delete_patients_where(&format!("department_id=eq.{}", department_id)).await?;
        self.delete_where(SUB_DEPARTMENTS_TABLE, &format!("department_id=eq.{}", department_id)).await?;
        self.delete_where(DEPARTMENTS_TABLE, &format!("id=eq.{}", department_id)).await
    }

    async fn set_department_sort_order(&self, department_id: Uuid, order: i32) -> Result<()> {
        self.patch(DEPARTMENTS_TABLE, department_id, json!({ "sort_order": order })).await
    }

    async fn upsert_sub_department(&self, sub_department: &SubDepartment, parent_id: Uuid) -> Result<()> {
        debug!("Upserting sub-department {} under {}", sub_department.id, parent_id);
        let row = serde_json::to_value(SubDepartmentRow::new(sub_department, parent_id))?;
        self.supabase.upsert(SUB_DEPARTMENTS_TABLE, json!([row])).await
    }

    async fn delete_sub_department(&self, sub_department_id: Uuid) -> Result<()> {
        debug!("Deleting sub-department: {}", sub_department_id);

        self.delete_patients_where(&format!("sub_department_id=eq.{}", sub_department_id)).await?;
        self.delete_where(SUB_DEPARTMENTS_TABLE, &format!("id=eq.{}", sub_department_id)).await
    }

    async fn upsert_patient(
        &self,
        patient: &Patient,
        department_id: Uuid,
        sub_department_id: Option<Uuid>,
        sort_order: Option<i32>,
    ) -> Result<()> {
        debug!("Upserting patient: {}", patient.id);
        let row = PatientRow::from_patient(patient, department_id, sub_department_id, sort_order);
        self.supabase.upsert(PATIENTS_TABLE, json!([serde_json::to_value(row)?])).await
    }

    async fn update_patient_status(&self, patient_id: Uuid, status: PatientStatus) -> Result<()> {
        debug!("Updating status of patient {} to {}", patient_id, status);
        self.patch(PATIENTS_TABLE, patient_id, json!({ "status": status.to_string() })).await
    }

    async fn delete_patient(&self, patient_id: Uuid) -> Result<()> {
        debug!("Deleting patient: {}", patient_id);

        let photos_path = format!("/rest/v1/{}?select=*&patient_id=eq.{}", PHOTOS_TABLE, patient_id);
        match self.supabase.request::<Vec<PhotoRow>>(Method::GET, &photos_path, None).await {
            Ok(photos) => {
                for photo in photos {
                    if let Err(e) = self.supabase.delete_object(&self.photo_bucket, &photo.storage_path).await {
                        warn!("Failed to delete photo blob {}: {}", photo.storage_path, e);
                    }
                }
            }
            Err(e) => warn!("Failed to list photos of patient {}: {}", patient_id, e),
        }

        if let Err(e) = self.delete_where(PHOTOS_TABLE, &format!("patient_id=eq.{}", patient_id)).await {
            warn!("Failed to delete photo rows of patient {}: {}", patient_id, e);
        }

        self.delete_where(PATIENTS_TABLE, &format!("id=eq.{}", patient_id)).await
    }

    async fn set_patient_sort_order(&self, patient_id: Uuid, order: i32) -> Result<()> {
        self.patch(PATIENTS_TABLE, patient_id, json!({ "sort_order": order })).await
    }

    async fn next_sort_order(&self, department_id: Uuid, sub_department_id: Option<Uuid>) -> Result<i32> {
        let path = format!(
            "/rest/v1/{}?select=sort_order&department_id=eq.{}&{}&order=sort_order.desc.nullslast&limit=1",
            PATIENTS_TABLE,
            department_id,
            sub_department_filter(sub_department_id),
        );

        let rows: Vec<SortOrderRow> = self.supabase.request(Method::GET, &path, None).await?;
        Ok(rows
            .first()
            .and_then(|row| row.sort_order)
            .map(|order| order + 1)
            .unwrap_or(0))
    }

    fn plan_photo(&self, patient_id: Uuid, content_type: &str) -> Photo {
        let id = Uuid::new_v4();
        let storage_path = format!("{}/{}.{}", patient_id, id, extension_for(content_type));
        Photo {
            id,
            url: self.supabase.public_object_url(&self.photo_bucket, &storage_path),
            storage_path,
        }
    }

    async fn upload_photo(
        &self,
        patient_id: Uuid,
        photo: &Photo,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<Photo> {
        DepartmentError::check_photo_size(bytes.len())?;

        debug!("Uploading photo {} for patient {}", photo.id, patient_id);
        self.supabase
            .upload_object(&self.photo_bucket, &photo.storage_path, bytes, content_type)
            .await?;

        let row = serde_json::to_value(PhotoRow::new(photo, patient_id))?;
        let path = format!("/rest/v1/{}", PHOTOS_TABLE);
        if let Err(e) = self.supabase.execute(Method::POST, &path, Some(json!([row])), None).await {
            // The row is what makes the blob reachable; drop the blob with it.
            if let Err(cleanup) = self.supabase.delete_object(&self.photo_bucket, &photo.storage_path).await {
                warn!("Failed to remove orphan blob {}: {}", photo.storage_path, cleanup);
            }
            return Err(e);
        }

        Ok(photo.clone())
    }

    async fn delete_photo(&self, photo: &Photo) -> Result<()> {
        debug!("Deleting photo: {}", photo.id);

        if let Err(e) = self.supabase.delete_object(&self.photo_bucket, &photo.storage_path).await {
            warn!("Failed to delete photo blob {}: {}", photo.storage_path, e);
        }

        self.delete_where(PHOTOS_TABLE, &format!("id=eq.{}", photo.id)).await
    }
}
