//! JSON-RPC types for the daemon protocol.
//!
//! Envelope types follow JSON-RPC 2.0; the rest are the request parameters
//! and results of the chime control methods.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ChimeError, ErrorCode};
use crate::scheduler::IntervalSwitches;
use crate::types::{ChimeType, WallTime};

/// JSON-RPC version constant.
pub const JSONRPC_VERSION: &str = "2.0";

/// A JSON-RPC request ID.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RequestId {
    Integer(i64),
    String(String),
}

impl From<i64> for RequestId {
    fn from(id: i64) -> Self {
        RequestId::Integer(id)
    }
}

impl From<String> for RequestId {
    fn from(id: String) -> Self {
        RequestId::String(id)
    }
}

/// A JSON-RPC request wrapper.
#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub method: String,
    pub id: RequestId,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// A JSON-RPC response wrapper.
#[derive(Debug, Serialize)]
pub struct JsonRpcResponse<T: Serialize> {
    pub jsonrpc: &'static str,
    pub id: RequestId,
    pub result: T,
}

impl<T: Serialize> JsonRpcResponse<T> {
    pub fn new(id: RequestId, result: T) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            result,
        }
    }
}

/// A JSON-RPC error response.
#[derive(Debug, Serialize)]
pub struct JsonRpcErrorResponse {
    pub jsonrpc: &'static str,
    pub id: Option<RequestId>,
    pub error: JsonRpcError,
}

impl JsonRpcErrorResponse {
    pub fn new(id: Option<RequestId>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            error,
        }
    }
}

/// A JSON-RPC error object.
#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<JsonRpcErrorData>,
}

/// Extended error data for application-specific errors.
#[derive(Debug, Serialize)]
pub struct JsonRpcErrorData {
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<ChimeType>,
}

impl JsonRpcError {
    /// Creates a parse error (-32700).
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self {
            code: -32700,
            message: message.into(),
            data: None,
        }
    }

    /// Creates an invalid request error (-32600).
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            code: -32600,
            message: message.into(),
            data: None,
        }
    }

    /// Creates a method not found error (-32601).
    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: format!("Method not found: {}", method),
            data: None,
        }
    }

    /// Creates an invalid params error (-32602).
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            code: -32602,
            message: message.into(),
            data: None,
        }
    }

    /// Creates an internal error (-32603).
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self {
            code: -32603,
            message: message.into(),
            data: None,
        }
    }
}

impl From<ChimeError> for JsonRpcError {
    /// Maps daemon errors to application codes -32010..=-32014.
    fn from(err: ChimeError) -> Self {
        let (code, message) = match err.code {
            ErrorCode::SoundpackNotFound => (-32010, "Soundpack not found"),
            ErrorCode::ValidationFailed => (-32011, "Soundpack invalid"),
            ErrorCode::PlaybackFailed => (-32012, "Playback failed"),
            ErrorCode::DiscoveryFailed => (-32013, "Discovery failed"),
            ErrorCode::SettingsFailed => (-32014, "Settings failed"),
        };
        Self {
            code,
            message: message.to_string(),
            data: Some(JsonRpcErrorData {
                error_code: err.code.as_str().to_string(),
                details: Some(err.message),
                missing: err.missing,
            }),
        }
    }
}

// ============================================================================
// Requests
// ============================================================================

/// Parameters for `switch_soundpack`.
#[derive(Debug, Deserialize)]
pub struct SwitchSoundpackParams {
    pub name: String,
}

/// Parameters for `test_chime`.
#[derive(Debug, Deserialize)]
pub struct TestChimeParams {
    /// Chime name; `half_hour`/`quarter_hour` aliases are accepted.
    pub chime: String,
}

impl TestChimeParams {
    pub fn chime_type(&self) -> Result<ChimeType, JsonRpcError> {
        ChimeType::parse(&self.chime)
            .ok_or_else(|| JsonRpcError::invalid_params(format!("Unknown chime: {}", self.chime)))
    }
}

/// Parameters for `set_intervals`. Omitted fields keep their current value.
#[derive(Debug, Default, Deserialize)]
pub struct SetIntervalsParams {
    pub hourly: Option<bool>,
    pub half: Option<bool>,
    pub quarter: Option<bool>,
}

impl SetIntervalsParams {
    /// Applies the given fields on top of `current`.
    pub fn apply(&self, current: IntervalSwitches) -> IntervalSwitches {
        IntervalSwitches {
            hourly: self.hourly.unwrap_or(current.hourly),
            half: self.half.unwrap_or(current.half),
            quarter: self.quarter.unwrap_or(current.quarter),
        }
    }
}

/// Parameters for `set_volume`.
#[derive(Debug, Deserialize)]
pub struct SetVolumeParams {
    /// Requested volume; clamped to 0-100.
    pub volume: i64,
}

/// Parameters for `set_quiet_hours`. Both null disables quiet hours.
#[derive(Debug, Default, Deserialize)]
pub struct SetQuietHoursParams {
    pub start: Option<WallTime>,
    pub end: Option<WallTime>,
}

// ============================================================================
// Results
// ============================================================================

/// Result of `discover_soundpacks`.
#[derive(Debug, Serialize)]
pub struct DiscoverResult {
    pub soundpacks: Vec<String>,
    pub current: Option<String>,
}

/// Result of `switch_soundpack`.
#[derive(Debug, Serialize)]
pub struct SwitchResult {
    pub name: String,
    pub display_name: String,
    pub chimes: Vec<ChimeType>,
    /// Set when the switch applied but the settings file could not be written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings_warning: Option<String>,
}

/// Whether a test chime was played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TestChimeStatus {
    Played,
    Unavailable,
}

/// Result of `test_chime`.
#[derive(Debug, Serialize)]
pub struct TestChimeResult {
    pub chime: ChimeType,
    pub status: TestChimeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

// ============================================================================
// Notifications
// ============================================================================

/// A JSON-RPC notification (no id field).
#[derive(Debug, Serialize)]
pub struct JsonRpcNotification<T: Serialize> {
    pub jsonrpc: &'static str,
    pub method: &'static str,
    pub params: T,
}

impl<T: Serialize> JsonRpcNotification<T> {
    pub fn new(method: &'static str, params: T) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            method,
            params,
        }
    }
}

/// Notification sent whenever a scheduled chime is dispatched.
#[derive(Debug, Serialize)]
pub struct ChimeNotificationParams {
    pub chime: ChimeType,
    pub path: PathBuf,
    pub time: WallTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chime_error_maps_to_application_code() {
        let err: JsonRpcError = ChimeError::validation_failed("digital", &[ChimeType::Hour]).into();
        assert_eq!(err.code, -32011);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["data"]["error_code"], "SOUNDPACK_INVALID");
        assert_eq!(json["data"]["missing"][0], "hour");

        let err: JsonRpcError = ChimeError::soundpack_not_found("x").into();
        assert_eq!(err.code, -32010);
        let json = serde_json::to_value(&err).unwrap();
        assert!(json["data"].get("missing").is_none());
    }

    #[test]
    fn set_intervals_keeps_omitted_fields() {
        let params: SetIntervalsParams = serde_json::from_str(r#"{"quarter": true}"#).unwrap();
        let updated = params.apply(IntervalSwitches::default());
        assert_eq!(
            updated,
            IntervalSwitches {
                hourly: true,
                half: false,
                quarter: true,
            }
        );
    }

    #[test]
    fn quiet_hours_params_parse_times() {
        let params: SetQuietHoursParams =
            serde_json::from_str(r#"{"start": "22:30", "end": "06:00"}"#).unwrap();
        assert_eq!(params.start, WallTime::new(22, 30));
        assert_eq!(params.end, WallTime::new(6, 0));

        assert!(serde_json::from_str::<SetQuietHoursParams>(r#"{"start": "99:00"}"#).is_err());
    }

    #[test]
    fn test_chime_params_reject_unknown() {
        let params = TestChimeParams {
            chime: "gong".to_string(),
        };
        assert_eq!(params.chime_type().unwrap_err().code, -32602);
    }
}
