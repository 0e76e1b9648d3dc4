//! JSON rendering of query outcomes.
//!
//! Successful queries print their result record as-is. Failures print a
//! fixed envelope so scripted callers can branch on `error.code`.

use serde::Serialize;
use serde_json::json;

/// Pretty JSON for a result record.
///
/// # Errors
///
/// Returns [`ariadne::Error::Io`] if the record can't be serialized.
pub fn render<T: Serialize>(value: &T) -> ariadne::Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(std::io::Error::from)
        .map_err(ariadne::Error::from)
}

/// The failure envelope: `{"success": false, "error": {"code", "message"}}`.
pub fn failure(error: &ariadne::Error) -> String {
    let envelope = json!({
        "success": false,
        "error": {
            "code": error.code(),
            "message": error.to_string(),
        },
    });
    // A `Value` built from strings and bools always serializes
    serde_json::to_string_pretty(&envelope).unwrap_or_else(|_| envelope.to_string())
}
