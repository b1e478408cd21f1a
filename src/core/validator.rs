//! Validation of incoming webhook bodies.
//!
//! Pure checks only: nothing here logs at info level or touches shared state.

use serde_json::{Map, Value};

use crate::error::JobError;
use crate::models::Job;

/// Parse and validate a raw webhook body against the configured secret.
///
/// Unparsable JSON, a non-object body and missing, empty or non-string fields
/// all become [`JobError::Malformed`]. A secret that is not byte-for-byte
/// equal to `expected_secret` becomes [`JobError::Unauthorized`].
pub fn validate_payload(body: &[u8], expected_secret: &str) -> Result<Job, JobError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| JobError::Malformed(format!("body is not valid JSON: {}", e)))?;
    validate_value(&value, expected_secret)
}

/// Validate an already-parsed payload
pub fn validate_value(value: &Value, expected_secret: &str) -> Result<Job, JobError> {
    let fields = value
        .as_object()
        .ok_or_else(|| JobError::Malformed("body is not a JSON object".to_string()))?;

    let email = required_field(fields, "email")?;
    let secret = required_field(fields, "secret")?;
    let url = required_field(fields, "url")?;

    if secret != expected_secret {
        return Err(JobError::Unauthorized);
    }

    Ok(Job::new(email, secret, url))
}

fn required_field<'a>(fields: &'a Map<String, Value>, name: &str) -> Result<&'a str, JobError> {
    match fields.get(name) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s),
        Some(Value::String(_)) => Err(JobError::Malformed(format!("field `{}` is empty", name))),
        Some(_) => Err(JobError::Malformed(format!("field `{}` must be a string", name))),
        None => Err(JobError::Malformed(format!("missing field `{}`", name))),
    }
}
