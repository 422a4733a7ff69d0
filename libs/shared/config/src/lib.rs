use std::env;
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_PHOTO_BUCKET: &str = "patient-photos";
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 7;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_service_key: String,
    pub photo_bucket: String,
    pub session_secret: String,
    pub admin_bootstrap_password: Option<String>,
    pub utc_offset_hours: i32,
    pub http_timeout_secs: u64,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            supabase_service_key: env::var("SUPABASE_SERVICE_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_SERVICE_KEY not set, falling back to the anon key");
                    String::new()
                }),
            photo_bucket: env::var("SUPABASE_PHOTO_BUCKET")
                .unwrap_or_else(|_| DEFAULT_PHOTO_BUCKET.to_string()),
            session_secret: env::var("SESSION_SECRET")
                .unwrap_or_else(|_| {
                    warn!("SESSION_SECRET not set, using empty value");
                    String::new()
                }),
            admin_bootstrap_password: env::var("ADMIN_BOOTSTRAP_PASSWORD")
                .ok()
                .filter(|value| !value.is_empty()),
            utc_offset_hours: parse_or("CLINIC_UTC_OFFSET_HOURS", DEFAULT_UTC_OFFSET_HOURS),
            http_timeout_secs: parse_or("HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS),
            port: parse_or("PORT", DEFAULT_PORT),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.supabase_url.is_empty()
            && !self.api_key().is_empty()
            && !self.session_secret.is_empty()
    }

    /// Key sent to Supabase; the service key wins when both are present.
    pub fn api_key(&self) -> &str {
        if self.supabase_service_key.is_empty() {
            &self.supabase_anon_key
        } else {
            &self.supabase_service_key
        }
    }
}

fn parse_or<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} has an invalid value '{}', using default", name, raw);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(anon: &str, service: &str) -> AppConfig {
        AppConfig {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: anon.to_string(),
            supabase_service_key: service.to_string(),
            photo_bucket: DEFAULT_PHOTO_BUCKET.to_string(),
            session_secret: "secret".to_string(),
            admin_bootstrap_password: None,
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            port: DEFAULT_PORT,
        }
    }

    #[test]
    fn test_service_key_preferred() {
        assert_eq!(config("anon", "service").api_key(), "service");
        assert_eq!(config("anon", "").api_key(), "anon");
    }

    #[test]
    fn test_is_configured_requires_key() {
        assert!(config("anon", "").is_configured());
        assert!(!config("", "").is_configured());
    }
}
