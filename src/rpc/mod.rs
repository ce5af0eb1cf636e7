//! JSON-RPC module for daemon communication.
//!
//! Provides the JSON-RPC 2.0 server implementation for:
//! - `discover_soundpacks`, `switch_soundpack`: Soundpack selection
//! - `test_chime`: Play a chime on demand
//! - `set_intervals`, `set_volume`, `set_quiet_hours`: Chime settings
//! - `get_status`, `tick`: Inspection and manual ticking
//! - `ping`: Health check
//! - `shutdown`: Graceful shutdown
//!
//! Notifications:
//! - `chime`: A scheduled chime was dispatched

pub mod methods;
pub mod server;
pub mod types;

// Re-export commonly used types
pub use server::{run_server, tick_and_notify, Notifier, ServerState};
pub use types::{
    ChimeNotificationParams, DiscoverResult, JsonRpcError, JsonRpcErrorResponse,
    JsonRpcNotification, JsonRpcRequest, JsonRpcResponse, RequestId, SwitchResult,
    TestChimeResult, TestChimeStatus,
};
