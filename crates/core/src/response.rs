//! Response payload shape.
//!
//! Every endpoint, success or failure, produces one of these; the API layer
//! JSON-encodes it, encrypts it, and wraps it in the wire envelope. The HTTP
//! status of the response mirrors `statusCode`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The plaintext body of every response envelope.
///
/// `status` is a short machine-readable tag ("success", "error",
/// "invalid_user", "email-exist", ...); `statusCode` doubles as the HTTP
/// status. `message`, `data`, and `error` are emitted only when set, which
/// keeps the wire shape byte-compatible with clients that probe with
/// `'message' in body` style checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponsePayload {
    pub status: String,

    #[serde(rename = "statusCode")]
    pub status_code: u16,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ResponsePayload {
    pub fn new(status: impl Into<String>, status_code: u16) -> Self {
        Self {
            status: status.into(),
            status_code,
            message: None,
            data: None,
            error: None,
        }
    }

    /// `status: "success"` with the given code (200 for reads, 201 for
    /// creations).
    pub fn success(status_code: u16) -> Self {
        Self::new("success", status_code)
    }

    /// `status: "error"` with a message.
    pub fn error(status_code: u16, message: impl Into<String>) -> Self {
        Self::new("error", status_code).with_message(message)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_fields_are_omitted_from_the_wire() {
        let payload = ResponsePayload::success(200);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json, json!({ "status": "success", "statusCode": 200 }));
    }

    #[test]
    fn status_code_uses_the_camel_case_wire_name() {
        let payload = ResponsePayload::error(401, "Invalid email or password.");
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["statusCode"], 401);
        assert_eq!(json["message"], "Invalid email or password.");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn full_payload_round_trips() {
        let payload = ResponsePayload::success(201)
            .with_message("User created successfully.")
            .with_data(json!({ "user_id": 7 }));
        let text = serde_json::to_string(&payload).unwrap();
        let back: ResponsePayload = serde_json::from_str(&text).unwrap();
        assert_eq!(back, payload);
    }

    #[test]
    fn empty_message_is_distinct_from_no_message() {
        // List endpoints respond with message: "" while some detail endpoints
        // omit the key entirely; both must survive serialization.
        let with_empty = ResponsePayload::success(200).with_message("");
        let json = serde_json::to_value(&with_empty).unwrap();
        assert_eq!(json["message"], "");
    }
}
