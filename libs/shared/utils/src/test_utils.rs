use std::sync::Arc;
use serde_json::{json, Value};

use shared_config::AppConfig;

use crate::session::{clinic_today, issue_session_token};

pub struct TestConfig {
    pub session_secret: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_service_key: String,
    pub admin_bootstrap_password: Option<String>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            session_secret: "test-session-secret-must-be-long-enough".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            supabase_service_key: "test-service-key".to_string(),
            admin_bootstrap_password: None,
        }
    }
}

impl TestConfig {
    pub fn with_supabase_url(url: &str) -> Self {
        Self {
            supabase_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            supabase_service_key: self.supabase_service_key.clone(),
            photo_bucket: shared_config::DEFAULT_PHOTO_BUCKET.to_string(),
            session_secret: self.session_secret.clone(),
            admin_bootstrap_password: self.admin_bootstrap_password.clone(),
            utc_offset_hours: shared_config::DEFAULT_UTC_OFFSET_HOURS,
            http_timeout_secs: 5,
            port: shared_config::DEFAULT_PORT,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }

    /// Session token valid for today's clinic day.
    pub fn session_token(&self) -> String {
        let config = self.to_app_config();
        issue_session_token(clinic_today(config.utc_offset_hours), &config.session_secret)
            .expect("test secret is set")
    }
}

pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn department_row(id: &str, name: &str, has_sub_departments: bool, sort_order: i32) -> Value {
        json!({
            "id": id,
            "name": name,
            "has_sub_departments": has_sub_departments,
            "sort_order": sort_order
        })
    }

    pub fn sub_department_row(id: &str, department_id: &str, name: &str, sort_order: i32) -> Value {
        json!({
            "id": id,
            "department_id": department_id,
            "name": name,
            "sort_order": sort_order
        })
    }

    pub fn patient_row(
        id: &str,
        department_id: &str,
        sub_department_id: Option<&str>,
        requirement: &str,
        status: &str,
        sort_order: i32,
    ) -> Value {
        json!({
            "id": id,
            "department_id": department_id,
            "sub_department_id": sub_department_id,
            "requirement": requirement,
            "status": status,
            "entries": [],
            "nama_pasien": "",
            "nomor_telp": "",
            "sort_order": sort_order
        })
    }

    pub fn photo_row(id: &str, patient_id: &str, storage_path: &str) -> Value {
        json!({
            "id": id,
            "patient_id": patient_id,
            "url": format!("http://localhost:54321/storage/v1/object/public/patient-photos/{}", storage_path),
            "storage_path": storage_path
        })
    }

    pub fn appointment_row(id: &str, date: &str, time: &str, patient_name: &str) -> Value {
        json!({
            "id": id,
            "date": date,
            "time": time,
            "cubicle": "1",
            "treatment_plan": "Scaling",
            "case_text": "Kalkulus",
            "department_name": "Periodonsia",
            "patient_name": patient_name,
            "phone": "08123456789",
            "completed": false
        })
    }

    pub fn weekly_slot_row(id: &str, time: &str, senin: &str) -> Value {
        json!({
            "id": id,
            "time": time,
            "week_key": null,
            "senin": senin,
            "selasa": "",
            "rabu": "",
            "kamis": "",
            "jumat": "",
            "sabtu": "",
            "minggu": ""
        })
    }

    pub fn admin_credential_row(password_hash: &str) -> Value {
        json!({
            "id": 1,
            "password_hash": password_hash
        })
    }

    pub fn error_response(message: &str) -> Value {
        json!({
            "message": message,
            "code": "PGRST000"
        })
    }
}
