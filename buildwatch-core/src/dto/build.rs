//! Build DTOs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request to start building a flow
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartBuildRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inputs: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_component_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_component_id: Option<String>,
}

/// Handle of a started build, used to poll its events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildJob {
    pub job_id: Uuid,
}

/// Response to a cancellation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelBuildResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_start_request_serializes_to_empty_object() {
        let body = serde_json::to_string(&StartBuildRequest::default()).unwrap();
        assert_eq!(body, "{}");
    }

    #[test]
    fn test_cancel_response_message_is_optional() {
        let response: CancelBuildResponse = serde_json::from_str(r#"{"success":true}"#).unwrap();
        assert!(response.success);
        assert!(response.message.is_empty());
    }
}
