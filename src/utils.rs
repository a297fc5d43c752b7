// Helpers for keeping secrets out of logs

use serde_json::Value;

const SENSITIVE_KEYS: [&str; 3] = ["client_secret", "access_token", "refresh_token"];

const REDACTED: &str = "***REDACTED***";

/// Copy of a JSON object with secret fields replaced.
/// Only top-level keys are considered; non-objects are returned unchanged.
pub fn sanitize_credentials(credentials: &Value) -> Value {
    let mut sanitized = credentials.clone();
    if let Some(map) = sanitized.as_object_mut() {
        for key in SENSITIVE_KEYS {
            if let Some(value) = map.get_mut(key) {
                *value = Value::String(REDACTED.to_string());
            }
        }
    }
    sanitized
}

/// Response body text safe to log: JSON bodies go through
/// [`sanitize_credentials`], anything else is returned as is
pub fn sanitize_body(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(payload) => sanitize_credentials(&payload).to_string(),
        Err(_) => body.to_string(),
    }
}

/// Short prefix of a token for logs and CLI output
pub fn mask_token(token: &str) -> String {
    let prefix: String = token.chars().take(8).collect();
    if prefix.chars().count() < token.chars().count() {
        format!("{}...", prefix)
    } else {
        "***".to_string()
    }
}
