use std::sync::Arc;

use futures::future::join_all;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use sync_cell::{move_item, Notifier, SyncController, SyncError};

use crate::error::DepartmentError;
use crate::models::{
    required_text, CreateDepartmentRequest, CreatePatientRequest, Department, DepartmentBoardState,
    Patient, PatientEntry, PatientEntryInput, PatientLocation, PatientStatus, Photo,
    PhotoUploadRequest, SubDepartment, UpdatePatientRequest,
};
use crate::progress::{weighted_progress, CompletionWatcher, DepartmentProgress};
use crate::services::photo::{decode_image_payload, DEFAULT_IMAGE_TYPE};
use crate::services::repository::DepartmentRepository;

const PHOTO_ACTION: &str = "Unggah foto";

#[derive(Debug, Clone, Serialize)]
pub struct PatientStatusChange {
    pub patient: Patient,
    pub progress: DepartmentProgress,
}

/// Department/requirement view state with its mutation entry points.
pub struct DepartmentBoard {
    sync: SyncController<DepartmentBoardState>,
    repository: Arc<dyn DepartmentRepository>,
    watcher: Mutex<CompletionWatcher>,
}

fn entries_from(inputs: Vec<PatientEntryInput>) -> Result<Vec<PatientEntry>, SyncError> {
    inputs
        .into_iter()
        .map(|input| Ok(PatientEntry::new(required_text(&input.name, "Nama pasien")?, input.phone.trim())))
        .collect()
}

fn next_order<'a>(orders: impl Iterator<Item = &'a i32>) -> i32 {
    orders.max().map(|order| order + 1).unwrap_or(0)
}

/// Runs every position write; the first failure fails the whole batch.
async fn persist_positions<F, Fut>(positions: Vec<(Uuid, i32)>, write: F) -> anyhow::Result<()>
where
    F: Fn(Uuid, i32) -> Fut,
    Fut: std::future::Future<Output = anyhow::Result<()>>,
{
    let results = join_all(positions.into_iter().map(|(id, order)| write(id, order))).await;
    results.into_iter().collect()
}

impl DepartmentBoard {
    pub fn new(repository: Arc<dyn DepartmentRepository>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            sync: SyncController::new(DepartmentBoardState::default(), notifier),
            repository,
            watcher: Mutex::new(CompletionWatcher::new()),
        }
    }

    pub async fn load(&self) -> Result<DepartmentBoardState, SyncError> {
        let departments = match self.repository.list_departments().await {
            Ok(departments) => departments,
            Err(e) => {
                let error = SyncError::Persistence {
                    action: "Muat departemen".to_string(),
                    message: format!("{:#}", e),
                };
                return Err(self.sync.reject("Muat departemen", error).await);
            }
        };

        info!("Loaded {} departments", departments.len());
        self.watcher.lock().await.prime(&departments);

        let state = DepartmentBoardState { departments };
        self.sync.store().replace(state.clone()).await;
        Ok(state)
    }

    pub async fn state(&self) -> DepartmentBoardState {
        self.sync.current().await
    }

    pub async fn progress(&self) -> Vec<DepartmentProgress> {
        let state = self.sync.current().await;
        self.watcher.lock().await.report(&state.departments)
    }

    // ==========================================================================
    // DEPARTMENTS
    // ==========================================================================

    pub async fn add_department(&self, request: CreateDepartmentRequest) -> Result<Department, SyncError> {
        let repository = self.repository.as_ref();
        let department = self
            .sync
            .commit(
                "Tambah departemen",
                |state| {
                    let name = required_text(&request.name, "Nama departemen")?;
                    let order = next_order(state.departments.iter().map(|d| &d.sort_order));
                    let department = Department::new(name, request.has_sub_departments, order);
                    state.departments.push(department.clone());
                    Ok(department)
                },
                |department| async move {
                    repository.upsert_department(&department).await?;
                    Ok::<_, anyhow::Error>(department)
                },
            )
            .await?;

        self.watcher.lock().await.track(department.id);
        Ok(department)
    }

    pub async fn rename_department(&self, department_id: Uuid, name: &str) -> Result<Department, SyncError> {
        let repository = self.repository.as_ref();
        self.sync
            .commit(
                "Ubah departemen",
                |state| {
                    let name = required_text(name, "Nama departemen")?;
                    let department = state.department_mut(department_id)?;
                    department.name = name;
                    Ok(department.clone())
                },
                |department| async move {
                    repository.upsert_department(&department).await?;
                    Ok::<_, anyhow::Error>(department)
                },
            )
            .await
    }

    /// The mode can only change while the department is empty.
    pub async fn set_has_sub_departments(&self, department_id: Uuid, enabled: bool) -> Result<Department, SyncError> {
        let repository = self.repository.as_ref();
        self.sync
            .commit(
                "Ubah mode sub-departemen",
                |state| {
                    let department = state.department_mut(department_id)?;
                    if department.has_sub_departments != enabled
                        && (!department.patients.is_empty() || !department.sub_departments.is_empty())
                    {
                        return Err(DepartmentError::DepartmentNotEmpty.into());
                    }
                    department.has_sub_departments = enabled;
                    Ok(department.clone())
                },
                |department| async move {
                    repository.upsert_department(&department).await?;
                    Ok::<_, anyhow::Error>(department)
                },
            )
            .await
    }

    pub async fn delete_department(&self, department_id: Uuid) -> Result<(), SyncError> {
        let repository = self.repository.as_ref();
        self.sync
            .commit(
                "Hapus departemen",
                |state| {
                    state.department(department_id)?;
                    state.departments.retain(|d| d.id != department_id);
                    Ok(department_id)
                },
                |id| async move { repository.delete_department(id).await },
            )
            .await?;

        self.watcher.lock().await.forget(department_id);
        Ok(())
    }

    pub async fn reorder_departments(&self, from: usize, to: usize) -> Result<Vec<Department>, SyncError> {
        let repository = self.repository.as_ref();
        self.sync
            .commit(
                "Urutkan departemen",
                |state| {
                    move_item(&mut state.departments, from, to)?;
                    let positions: Vec<(Uuid, i32)> = state
                        .departments
                        .iter_mut()
                        .enumerate()
                        .map(|(index, department)| {
                            department.sort_order = index as i32;
                            (department.id, department.sort_order)
                        })
                        .collect();
                    Ok(positions)
                },
                |positions| {
                    persist_positions(positions, move |id, order| repository.set_department_sort_order(id, order))
                },
            )
            .await?;

        Ok(self.sync.current().await.departments)
    }

    // ==========================================================================
    // SUB-DEPARTMENTS
    // ==========================================================================

    pub async fn add_sub_department(&self, department_id: Uuid, name: &str) -> Result<SubDepartment, SyncError> {
        let repository = self.repository.as_ref();
        self.sync
            .commit(
                "Tambah sub-departemen",
                |state| {
                    let name = required_text(name, "Nama sub-departemen")?;
                    let department = state.department_mut(department_id)?;
                    if !department.has_sub_departments {
                        return Err(SyncError::validation("Departemen ini tidak memakai sub-departemen"));
                    }

                    let sub = SubDepartment {
                        id: Uuid::new_v4(),
                        department_id,
                        name,
                        patients: Vec::new(),
                        sort_order: next_order(department.sub_departments.iter().map(|s| &s.sort_order)),
                    };
                    department.sub_departments.push(sub.clone());
                    Ok(sub)
                },
                |sub| async move {
                    repository.upsert_sub_department(&sub, department_id).await?;
                    Ok::<_, anyhow::Error>(sub)
                },
            )
            .await
    }

    pub async fn rename_sub_department(&self, sub_department_id: Uuid, name: &str) -> Result<SubDepartment, SyncError> {
        let repository = self.repository.as_ref();
        self.sync
            .commit(
                "Ubah sub-departemen",
                |state| {
                    let name = required_text(name, "Nama sub-departemen")?;
                    let sub = state.sub_department_mut(sub_department_id)?;
                    sub.name = name;
                    Ok(sub.clone())
                },
                |sub| async move {
                    repository.upsert_sub_department(&sub, sub.department_id).await?;
                    Ok::<_, anyhow::Error>(sub)
                },
            )
            .await
    }

    pub async fn delete_sub_department(&self, sub_department_id: Uuid) -> Result<(), SyncError> {
        let repository = self.repository.as_ref();
        let parent_id = self
            .sync
            .commit(
                "Hapus sub-departemen",
                |state| {
                    let parent_id = state.sub_department_mut(sub_department_id)?.department_id;
                    state
                        .department_mut(parent_id)?
                        .sub_departments
                        .retain(|sub| sub.id != sub_department_id);
                    Ok(parent_id)
                },
                |parent_id| async move {
                    repository.delete_sub_department(sub_department_id).await?;
                    Ok::<_, anyhow::Error>(parent_id)
                },
            )
            .await?;

        self.refresh_progress(parent_id).await;
        Ok(())
    }

    // ==========================================================================
    // PATIENTS
    // ==========================================================================

    /// The sort order comes from the store, so it is read (after
    /// validation) before the patient is shown locally.
    pub async fn add_patient(&self, department_id: Uuid, request: CreatePatientRequest) -> Result<Patient, SyncError> {
        const ACTION: &str = "Tambah pasien";

        let repository = self.repository.as_ref();
        let sub_department_id = request.sub_department_id;

        let checked = required_text(&request.requirement, "Requirement")
            .and_then(|requirement| Ok((requirement, entries_from(request.entries)?)));
        let (requirement, entries) = match checked {
            Ok(checked) => checked,
            Err(e) => return Err(self.sync.reject(ACTION, e).await),
        };

        let order = match repository.next_sort_order(department_id, sub_department_id).await {
            Ok(order) => order,
            Err(e) => {
                let error = SyncError::Persistence {
                    action: ACTION.to_string(),
                    message: format!("{:#}", e),
                };
                return Err(self.sync.reject(ACTION, error).await);
            }
        };

        let patient = self
            .sync
            .commit(
                ACTION,
                |state| {
                    let list = state.patient_list_mut(department_id, sub_department_id)?;
                    let mut patient = Patient::new(requirement, order);
                    patient.status = request.status.unwrap_or_default();
                    patient.entries = entries;
                    list.push(patient.clone());
                    Ok(patient)
                },
                |patient| async move {
                    repository
                        .upsert_patient(&patient, department_id, sub_department_id, Some(patient.sort_order))
                        .await?;
                    Ok::<_, anyhow::Error>(patient)
                },
            )
            .await?;

        self.refresh_progress(department_id).await;
        Ok(patient)
    }

    pub async fn update_patient(&self, patient_id: Uuid, request: UpdatePatientRequest) -> Result<Patient, SyncError> {
        self.edit_patient("Ubah pasien", patient_id, move |patient| {
            if let Some(requirement) = request.requirement.as_deref() {
                patient.requirement = required_text(requirement, "Requirement")?;
            }
            if let Some(status) = request.status {
                patient.status = status;
            }
            if let Some(entries) = request.entries {
                patient.entries = entries_from(entries)?;
            }
            Ok(())
        })
        .await
    }

    /// Status-only edit; persists just the status column.
    pub async fn set_patient_status(&self, patient_id: Uuid, status: PatientStatus) -> Result<PatientStatusChange, SyncError> {
        let repository = self.repository.as_ref();
        let (patient, location) = self
            .sync
            .commit(
                "Ubah status",
                |state| {
                    let location = state
                        .locate_patient(patient_id)
                        .ok_or_else(|| SyncError::not_found(format!("Pasien {}", patient_id)))?;
                    let patient = state.patient_mut(patient_id)?;
                    patient.status = status;
                    Ok((patient.clone(), location))
                },
                |(patient, location)| async move {
                    repository.update_patient_status(patient.id, patient.status).await?;
                    Ok::<_, anyhow::Error>((patient, location))
                },
            )
            .await?;

        let progress = self.department_progress(location.department_id).await?;
        Ok(PatientStatusChange { patient, progress })
    }

    pub async fn add_entry(&self, patient_id: Uuid, input: PatientEntryInput) -> Result<Patient, SyncError> {
        self.edit_patient("Tambah data pasien", patient_id, move |patient| {
            let name = required_text(&input.name, "Nama pasien")?;
            patient.entries.push(PatientEntry::new(name, input.phone.trim()));
            Ok(())
        })
        .await
    }

    pub async fn update_entry(&self, patient_id: Uuid, entry_id: Uuid, input: PatientEntryInput) -> Result<Patient, SyncError> {
        self.edit_patient("Ubah data pasien", patient_id, move |patient| {
            let name = required_text(&input.name, "Nama pasien")?;
            let entry = patient.entry_mut(entry_id)?;
            entry.name = name;
            entry.phone = input.phone.trim().to_string();
            Ok(())
        })
        .await
    }

    pub async fn remove_entry(&self, patient_id: Uuid, entry_id: Uuid) -> Result<Patient, SyncError> {
        self.edit_patient("Hapus data pasien", patient_id, move |patient| {
            patient.entry_mut(entry_id)?;
            patient.entries.retain(|entry| entry.id != entry_id);
            Ok(())
        })
        .await
    }

    pub async fn delete_patient(&self, patient_id: Uuid) -> Result<(), SyncError> {
        let repository = self.repository.as_ref();
        let location = self
            .sync
            .commit(
                "Hapus pasien",
                |state| {
                    let (_, location) = state.remove_patient(patient_id)?;
                    Ok(location)
                },
                |location| async move {
                    repository.delete_patient(patient_id).await?;
                    Ok::<_, anyhow::Error>(location)
                },
            )
            .await?;

        self.refresh_progress(location.department_id).await;
        Ok(())
    }

    /// Drag-and-drop reorder inside one department or sub-department. The
    /// whole new order is written; any failed write restores the old order.
    pub async fn reorder_patients(
        &self,
        department_id: Uuid,
        sub_department_id: Option<Uuid>,
        from: usize,
        to: usize,
    ) -> Result<Vec<Patient>, SyncError> {
        let repository = self.repository.as_ref();
        self.sync
            .commit(
                "Urutkan pasien",
                |state| {
                    let list = state.patient_list_mut(department_id, sub_department_id)?;
                    move_item(list, from, to)?;
                    let positions: Vec<(Uuid, i32)> = list
                        .iter_mut()
                        .enumerate()
                        .map(|(index, patient)| {
                            patient.sort_order = index as i32;
                            (patient.id, patient.sort_order)
                        })
                        .collect();
                    Ok(positions)
                },
                |positions| {
                    persist_positions(positions, move |id, order| repository.set_patient_sort_order(id, order))
                },
            )
            .await?;

        let mut state = self.sync.current().await;
        Ok(state.patient_list_mut(department_id, sub_department_id)?.clone())
    }

    // ==========================================================================
    // PHOTOS
    // ==========================================================================

    /// Accepts a base64 or data-URL payload as posted by the dashboard.
    pub async fn attach_photo_payload(&self, patient_id: Uuid, request: PhotoUploadRequest) -> Result<Photo, SyncError> {
        let (bytes, detected) = match decode_image_payload(&request.data) {
            Ok(decoded) => decoded,
            Err(e) => return Err(self.sync.reject(PHOTO_ACTION, e.into()).await),
        };

        let content_type = request
            .content_type
            .or(detected)
            .unwrap_or_else(|| DEFAULT_IMAGE_TYPE.to_string());

        self.attach_photo(patient_id, bytes, &content_type).await
    }

    pub async fn attach_photo(&self, patient_id: Uuid, bytes: Vec<u8>, content_type: &str) -> Result<Photo, SyncError> {
        if let Err(e) = DepartmentError::check_photo_size(bytes.len()) {
            return Err(self.sync.reject(PHOTO_ACTION, e.into()).await);
        }
        if !content_type.starts_with("image/") {
            let error = DepartmentError::NotAnImage(content_type.to_string());
            return Err(self.sync.reject(PHOTO_ACTION, error.into()).await);
        }

        let repository = self.repository.as_ref();
        let photo = repository.plan_photo(patient_id, content_type);
        debug!("Attaching photo {} to patient {}", photo.id, patient_id);

        self.sync
            .commit(
                PHOTO_ACTION,
                |state| {
                    state.patient_mut(patient_id)?.photos.push(photo.clone());
                    Ok(photo)
                },
                |photo| async move { repository.upload_photo(patient_id, &photo, bytes, content_type).await },
            )
            .await
    }

    pub async fn delete_photo(&self, photo_id: Uuid) -> Result<(), SyncError> {
        let repository = self.repository.as_ref();
        self.sync
            .commit(
                "Hapus foto",
                |state| {
                    let (patient_id, photo) = state
                        .find_photo(photo_id)
                        .ok_or_else(|| SyncError::not_found(format!("Foto {}", photo_id)))?;
                    state.patient_mut(patient_id)?.photos.retain(|p| p.id != photo_id);
                    Ok(photo)
                },
                |photo| async move { repository.delete_photo(&photo).await },
            )
            .await
    }

    // ==========================================================================
    // HELPERS
    // ==========================================================================

    /// Full-field patient edits share one path: mutate locally, then upsert
    /// the single patient row.
    async fn edit_patient<F>(&self, action: &str, patient_id: Uuid, edit: F) -> Result<Patient, SyncError>
    where
        F: FnOnce(&mut Patient) -> Result<(), SyncError>,
    {
        let repository = self.repository.as_ref();
        let (patient, location) = self
            .sync
            .commit(
                action,
                |state| {
                    let location: PatientLocation = state
                        .locate_patient(patient_id)
                        .ok_or_else(|| SyncError::not_found(format!("Pasien {}", patient_id)))?;
                    let patient = state.patient_mut(patient_id)?;
                    edit(patient)?;
                    Ok((patient.clone(), location))
                },
                |(patient, location)| async move {
                    repository
                        .upsert_patient(&patient, location.department_id, location.sub_department_id, None)
                        .await?;
                    Ok::<_, anyhow::Error>((patient, location))
                },
            )
            .await?;

        self.refresh_progress(location.department_id).await;
        Ok(patient)
    }

    /// Moves the completion baseline after a change to a department's
    /// patients. The department may already be gone after a concurrent delete.
    async fn refresh_progress(&self, department_id: Uuid) {
        if let Err(e) = self.department_progress(department_id).await {
            debug!("Progress not refreshed for {}: {}", department_id, e);
        }
    }

    async fn department_progress(&self, department_id: Uuid) -> Result<DepartmentProgress, SyncError> {
        let state = self.sync.current().await;
        let department = state.department(department_id)?;
        let celebrate = self.watcher.lock().await.observe(department);
        if celebrate {
            info!("Department {} reached 100%", department.name);
        }

        Ok(DepartmentProgress {
            department_id,
            name: department.name.clone(),
            percent: weighted_progress(department),
            patient_count: department.patient_count(),
            celebrate,
        })
    }
}
