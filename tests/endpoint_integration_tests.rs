/// Endpoint smoke suite
///
/// Runs against a live API (`API_BASE_URL`, default http://localhost:3000)
/// after logging in with `ADMIN_PASSWORD`. Every record it creates is
/// deleted again before the run ends.

use std::env;

use reqwest::{Client, Response, StatusCode};
use serde_json::{json, Value};

const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Test client holding the day session token
pub struct ApiTestClient {
    client: Client,
    base_url: String,
    session_token: Option<String>,
}

impl ApiTestClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            session_token: None,
        }
    }

    pub async fn login(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let password = env::var("ADMIN_PASSWORD")?;
        let response = self.client
            .post(format!("{}/auth/login", self.base_url))
            .json(&json!({ "password": password }))
            .send()
            .await?;

        let body: Value = response.json().await?;
        match body.get("token").and_then(|t| t.as_str()) {
            Some(token) => {
                self.session_token = Some(token.to_string());
                println!("✅ Logged in for {}", body["day"]);
                Ok(())
            }
            None => Err(format!("Login failed: {}", body).into()),
        }
    }

    fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.session_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    pub async fn get(&self, path: &str) -> Result<Response, Box<dyn std::error::Error>> {
        let request = self.client.get(format!("{}{}", self.base_url, path));
        Ok(self.authorized(request).send().await?)
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<Response, Box<dyn std::error::Error>> {
        let request = self.client.post(format!("{}{}", self.base_url, path)).json(&body);
        Ok(self.authorized(request).send().await?)
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<Response, Box<dyn std::error::Error>> {
        let request = self.client.put(format!("{}{}", self.base_url, path)).json(&body);
        Ok(self.authorized(request).send().await?)
    }

    pub async fn delete(&self, path: &str) -> Result<Response, Box<dyn std::error::Error>> {
        let request = self.client.delete(format!("{}{}", self.base_url, path));
        Ok(self.authorized(request).send().await?)
    }
}

/// Test results tracker
#[derive(Debug, Default)]
pub struct TestResults {
    pub passed: u32,
    pub failed: u32,
    pub failures: Vec<String>,
}

impl TestResults {
    pub fn pass(&mut self, test_name: &str) {
        self.passed += 1;
        println!("✅ {}", test_name);
    }

    pub fn fail(&mut self, test_name: &str, error: &str) {
        self.failed += 1;
        self.failures.push(format!("{}: {}", test_name, error));
        println!("❌ {}: {}", test_name, error);
    }

    /// Records the outcome of a request expected to answer `expected`,
    /// returning the JSON body when it did.
    pub async fn check(
        &mut self,
        test_name: &str,
        expected: StatusCode,
        response: Result<Response, Box<dyn std::error::Error>>,
    ) -> Option<Value> {
        match response {
            Ok(response) if response.status() == expected => {
                self.pass(test_name);
                response.json().await.ok()
            }
            Ok(response) => {
                self.fail(test_name, &format!("Status: {}", response.status()));
                None
            }
            Err(e) => {
                self.fail(test_name, &e.to_string());
                None
            }
        }
    }

    pub fn summary(&self) {
        println!("\n📊 Test Summary:");
        println!("✅ Passed: {}", self.passed);
        println!("❌ Failed: {}", self.failed);

        if !self.failures.is_empty() {
            println!("\n🔍 Failures:");
            for failure in &self.failures {
                println!("  - {}", failure);
            }
        }
    }
}

pub async fn run_endpoint_tests() -> Result<TestResults, Box<dyn std::error::Error>> {
    let mut client = ApiTestClient::new();
    let mut results = TestResults::default();

    println!("🚀 Starting endpoint smoke tests against {}", client.base_url);

    // SESSION
    println!("\n🔐 Session");
    let anonymous = client.get("/departments").await;
    results.check("Board requires a session", StatusCode::UNAUTHORIZED, anonymous).await;

    if let Err(e) = client.login().await {
        results.fail("Admin login", &e.to_string());
        return Ok(results);
    }
    results.pass("Admin login");

    let session = client.get("/auth/session").await;
    results.check("Session status", StatusCode::OK, session).await;

    // DEPARTMENTS
    println!("\n🦷 Departments");
    let board = client.get("/departments").await;
    results.check("Load board", StatusCode::OK, board).await;

    let created = client.post("/departments", json!({ "name": "Smoke Test" })).await;
    let department = results.check("Create department", StatusCode::OK, created).await;
    let department_id = department.as_ref().and_then(|d| d["id"].as_str()).map(str::to_string);

    if let Some(id) = department_id.as_deref() {
        let body = json!({ "requirement": "Tumpatan kelas I", "entries": [{ "name": "Smoke", "phone": "0800" }] });
        let created = client.post(&format!("/departments/{}/patients", id), body).await;
        let patient = results.check("Create patient", StatusCode::OK, created).await;

        if let Some(patient_id) = patient.as_ref().and_then(|p| p["id"].as_str()) {
            let status = client.put(&format!("/patients/{}/status", patient_id), json!({ "status": "selesai" })).await;
            results.check("Move patient to selesai", StatusCode::OK, status).await;
        }

        let blank = client.put(&format!("/departments/{}", id), json!({ "name": "   " })).await;
        results.check("Blank rename rejected", StatusCode::BAD_REQUEST, blank).await;

        let progress = client.get("/departments/progress").await;
        results.check("Progress", StatusCode::OK, progress).await;
    }

    // APPOINTMENTS
    println!("\n📅 Appointments");
    let body = json!({
        "date": "2030-01-07",
        "time": "09:00",
        "patient_name": "Smoke",
        "department_name": "Smoke Test"
    });
    let created = client.post("/appointments", body).await;
    let appointment = results.check("Create appointment", StatusCode::OK, created).await;

    if let Some(id) = appointment.as_ref().and_then(|a| a["id"].as_str()) {
        let completed = client.put(&format!("/appointments/{}/completed", id), json!({ "completed": true })).await;
        results.check("Complete appointment", StatusCode::OK, completed).await;

        let deleted = client.delete(&format!("/appointments/{}", id)).await;
        results.check("Delete appointment", StatusCode::OK, deleted).await;
    }

    // WEEKLY SLOTS
    println!("\n🗓️ Weekly slots");
    let created = client.post("/weekly-slots?week=2030-W02", json!({ "time": "23:45" })).await;
    let slot = results.check("Create slot", StatusCode::OK, created).await;

    if let Some(id) = slot.as_ref().and_then(|s| s["id"].as_str()) {
        let cell = client
            .put(&format!("/weekly-slots/{}/senin?week=2030-W02", id), json!({ "kind": "break" }))
            .await;
        results.check("Mark break", StatusCode::OK, cell).await;

        let deleted = client.delete(&format!("/weekly-slots/{}?week=2030-W02", id)).await;
        results.check("Delete slot", StatusCode::OK, deleted).await;
    }

    // EXPORTS
    println!("\n📤 Exports");
    for path in ["/export/appointments", "/export/departments"] {
        match client.get(path).await {
            Ok(response) if response.status() == StatusCode::OK => {
                let bytes = response.bytes().await?;
                if bytes.starts_with(b"PK") {
                    results.pass(path);
                } else {
                    results.fail(path, "Body is not an xlsx archive");
                }
            }
            Ok(response) => results.fail(path, &format!("Status: {}", response.status())),
            Err(e) => results.fail(path, &e.to_string()),
        }
    }

    // CLEANUP
    if let Some(id) = department_id.as_deref() {
        let deleted = client.delete(&format!("/departments/{}", id)).await;
        results.check("Delete department", StatusCode::OK, deleted).await;
    }

    let notifications = client.get("/notifications").await;
    results.check("Drain notifications", StatusCode::OK, notifications).await;

    Ok(results)
}

/// Entry point for endpoint tests
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let results = run_endpoint_tests().await?;
    results.summary();

    if results.failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "needs a running API and ADMIN_PASSWORD"]
    async fn test_endpoint_smoke_suite() {
        let results = run_endpoint_tests().await.expect("Test execution failed");
        assert_eq!(results.failed, 0, "Failures: {:?}", results.failures);
    }

    #[test]
    fn test_results_tracking() {
        let mut results = TestResults::default();
        results.pass("a");
        results.fail("b", "Status: 500");
        assert_eq!(results.passed, 1);
        assert_eq!(results.failures, vec!["b: Status: 500".to_string()]);
    }
}
