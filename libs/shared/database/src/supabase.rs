use std::time::Duration;

use anyhow::{Result, anyhow};
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION},
    Method, Response,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

#[derive(Clone)]
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                error!("Failed to build HTTP client with timeout, using defaults: {}", e);
                Client::new()
            });

        Self {
            client,
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            api_key: config.api_key().to_string(),
        }
    }

    fn get_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", HeaderValue::from_str(&self.api_key)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key))?,
        );

        Ok(headers)
    }

    async fn send(&self, method: Method, path: &str,
                  body: Option<Value>, extra_headers: Option<HeaderMap>)
                  -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making {} request to {}", method, url);

        let mut headers = self.get_headers()?;
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url)
            .headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;
        Self::check_status(response).await
    }

    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_text = response.text().await?;
        error!("API error ({}): {}", status, error_text);

        Err(match status.as_u16() {
            401 | 403 => anyhow!("Authentication error: {}", error_text),
            404 => anyhow!("Resource not found: {}", error_text),
            413 => anyhow!("Payload too large: {}", error_text),
            _ => anyhow!("API error ({}): {}", status, error_text),
        })
    }

    pub async fn request<T>(&self, method: Method, path: &str, body: Option<Value>) -> Result<T>
    where T: DeserializeOwned {
        self.request_with_headers(method, path, body, None).await
    }

    pub async fn request_with_headers<T>(&self, method: Method, path: &str,
                                         body: Option<Value>, extra_headers: Option<HeaderMap>)
                                         -> Result<T>
    where T: DeserializeOwned {
        let response = self.send(method, path, body, extra_headers).await?;
        let data = response.json::<T>().await?;
        Ok(data)
    }

    /// Issues a request whose response body is not needed (PostgREST returns
    /// an empty body for writes without `Prefer: return=representation`).
    pub async fn execute(&self, method: Method, path: &str,
                         body: Option<Value>, extra_headers: Option<HeaderMap>)
                         -> Result<()> {
        self.send(method, path, body, extra_headers).await?;
        Ok(())
    }

    /// Upserts rows into a PostgREST table, merging on the primary key.
    pub async fn upsert(&self, table: &str, rows: Value) -> Result<()> {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("resolution=merge-duplicates,return=minimal"));

        let path = format!("/rest/v1/{}", table);
        self.execute(Method::POST, &path, Some(rows), Some(headers)).await
    }

    pub async fn upload_object(&self, bucket: &str, object_path: &str,
                               bytes: Vec<u8>, content_type: &str) -> Result<()> {
        let url = format!("{}/storage/v1/object/{}/{}", self.base_url, bucket, object_path);
        debug!("Uploading {} bytes to {}", bytes.len(), url);

        let mut headers = self.get_headers()?;
        headers.insert(CONTENT_TYPE, HeaderValue::from_str(content_type)?);
        headers.insert("x-upsert", HeaderValue::from_static("true"));

        let response = self.client.request(Method::POST, &url)
            .headers(headers)
            .body(bytes)
            .send()
            .await?;

        Self::check_status(response).await?;
        Ok(())
    }

    pub async fn delete_object(&self, bucket: &str, object_path: &str) -> Result<()> {
        let path = format!("/storage/v1/object/{}/{}", bucket, object_path);
        self.execute(Method::DELETE, &path, None, None).await
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }

    pub fn public_object_url(&self, bucket: &str, object_path: &str) -> String {
        format!("{}/storage/v1/object/public/{}/{}", self.base_url, bucket, object_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_bytes, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(url: &str) -> AppConfig {
        AppConfig {
            supabase_url: url.to_string(),
            supabase_anon_key: "anon".to_string(),
            supabase_service_key: "service".to_string(),
            photo_bucket: "patient-photos".to_string(),
            session_secret: "secret".to_string(),
            admin_bootstrap_password: None,
            utc_offset_hours: 7,
            http_timeout_secs: 5,
            port: 3000,
        }
    }

    #[tokio::test]
    async fn test_request_sends_service_key() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/departments"))
            .and(header("apikey", "service"))
            .and(header("authorization", "Bearer service"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": 1 }])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = SupabaseClient::new(&config_for(&mock_server.uri()));
        let rows: Vec<Value> = client
            .request(Method::GET, "/rest/v1/departments", None)
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let mock_server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/rest/v1/patients"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&mock_server)
            .await;

        let client = SupabaseClient::new(&config_for(&mock_server.uri()));
        let err = client
            .execute(Method::DELETE, "/rest/v1/patients", None, None)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("boom"));
    }

    #[tokio::test]
    async fn test_upload_object_sends_raw_bytes() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/storage/v1/object/patient-photos/p1/photo.jpg"))
            .and(header("content-type", "image/jpeg"))
            .and(body_bytes(vec![1u8, 2, 3]))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "Key": "p1/photo.jpg" })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = SupabaseClient::new(&config_for(&mock_server.uri()));
        client
            .upload_object("patient-photos", "p1/photo.jpg", vec![1, 2, 3], "image/jpeg")
            .await
            .unwrap();
    }

    #[test]
    fn test_public_object_url() {
        let client = SupabaseClient::new(&config_for("http://localhost:54321/"));
        assert_eq!(
            client.public_object_url("patient-photos", "p1/a.png"),
            "http://localhost:54321/storage/v1/object/public/patient-photos/p1/a.png"
        );
    }
}
