use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::{AppointmentRepository, SupabaseAppointmentRepository};
use shared_utils::test_utils::{MockSupabaseResponses, TestConfig};

const APPOINTMENT: &str = "0b7f3c9a-1f6e-4d7b-a0a2-5e3e4d2c1b01";

fn repository_for(server: &MockServer) -> SupabaseAppointmentRepository {
    SupabaseAppointmentRepository::new(&TestConfig::with_supabase_url(&server.uri()).to_app_config())
}

#[tokio::test]
async fn test_list_normalizes_time_column() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockSupabaseResponses::appointment_row(APPOINTMENT, "2024-06-03", "09:15:00", "Ani")
        ])))
        .mount(&server)
        .await;

    let appointments = repository_for(&server).list_appointments().await.unwrap();

    assert_eq!(appointments.len(), 1);
    assert_eq!(appointments[0].time, "09:15");
    assert_eq!(appointments[0].department_name, "Periodonsia");
}

#[tokio::test]
async fn test_upsert_sends_single_row() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .and(body_partial_json(json!([{ "id": APPOINTMENT, "completed": true }])))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let mut appointment: appointment_cell::Appointment = serde_json::from_value(
        MockSupabaseResponses::appointment_row(APPOINTMENT, "2024-06-03", "09:15", "Ani"),
    )
    .unwrap();
    appointment.completed = true;

    repository_for(&server).upsert_appointment(&appointment).await.unwrap();
}

#[tokio::test]
async fn test_delete_failure_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/rest/v1/appointments"))
        .and(query_param("id", format!("eq.{}", APPOINTMENT)))
        .respond_with(ResponseTemplate::new(500).set_body_json(MockSupabaseResponses::error_response("db down")))
        .mount(&server)
        .await;

    let result = repository_for(&server)
        .delete_appointment(Uuid::parse_str(APPOINTMENT).unwrap())
        .await;

    assert!(result.unwrap_err().to_string().contains("db down"));
}
