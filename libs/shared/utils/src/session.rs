use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{FixedOffset, NaiveDate, Offset, TimeZone, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::debug;

use shared_models::session::{AdminSession, SessionClaims, ADMIN_SUBJECT};

type HmacSha256 = Hmac<Sha256>;

/// Current calendar day at the clinic, given its offset from UTC.
pub fn clinic_today(utc_offset_hours: i32) -> NaiveDate {
    let offset = FixedOffset::east_opt(utc_offset_hours * 3600)
        .unwrap_or_else(|| Utc.fix());
    Utc::now().with_timezone(&offset).date_naive()
}

fn sign(signing_input: &str, secret: &str) -> Result<String, String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| "Failed to create HMAC".to_string())?;
    mac.update(signing_input.as_bytes());
    Ok(URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()))
}

/// Issues a token that is valid for the given clinic day only.
pub fn issue_session_token(day: NaiveDate, secret: &str) -> Result<String, String> {
    if secret.is_empty() {
        return Err("Session secret is not set".to_string());
    }

    let claims = SessionClaims {
        sub: ADMIN_SUBJECT.to_string(),
        day,
        iat: Utc::now().timestamp(),
    };
    let claims_json = serde_json::to_string(&claims)
        .map_err(|e| format!("Failed to encode claims: {}", e))?;
    let claims_b64 = URL_SAFE_NO_PAD.encode(claims_json);
    let signature = sign(&claims_b64, secret)?;

    Ok(format!("{}.{}", claims_b64, signature))
}

pub fn validate_session_token(token: &str, secret: &str, today: NaiveDate) -> Result<AdminSession, String> {
    if secret.is_empty() {
        return Err("Session secret is not set".to_string());
    }

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 2 {
        return Err("Invalid token format".to_string());
    }

    let claims_b64 = parts[0];
    let signature = match URL_SAFE_NO_PAD.decode(parts[1]) {
        Ok(sig) => sig,
        Err(e) => {
            debug!("Failed to decode signature: {}", e);
            return Err("Invalid signature encoding".to_string());
        }
    };

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| "Failed to create HMAC".to_string())?;
    mac.update(claims_b64.as_bytes());

    if mac.verify_slice(&signature).is_err() {
        debug!("Session signature verification failed");
        return Err("Invalid token signature".to_string());
    }

    let claims_json = URL_SAFE_NO_PAD.decode(claims_b64)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .ok_or_else(|| "Invalid claims encoding".to_string())?;

    let claims: SessionClaims = serde_json::from_str(&claims_json).map_err(|e| {
        debug!("Failed to parse claims: {}", e);
        "Invalid claims format".to_string()
    })?;

    if claims.sub != ADMIN_SUBJECT {
        return Err("Invalid session subject".to_string());
    }

    // Login is required once per calendar day.
    if claims.day != today {
        debug!("Session for {} presented on {}", claims.day, today);
        return Err("Session expired".to_string());
    }

    Ok(AdminSession {
        subject: claims.sub,
        day: claims.day,
        issued_at: Utc.timestamp_opt(claims.iat, 0).single(),
    })
}
