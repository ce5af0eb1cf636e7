//! JSON-RPC server over stdin/stdout.
//!
//! Implements the JSON-RPC 2.0 protocol for daemon communication.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::error::Result;
use crate::scheduler::TickOutcome;
use crate::service::ChimeService;
use crate::settings::{save_settings, Settings};

use super::methods::handle_request;
use super::types::{
    ChimeNotificationParams, JsonRpcError, JsonRpcErrorResponse, JsonRpcNotification,
    JsonRpcRequest, JsonRpcResponse,
};

/// Writes JSON-RPC notifications, one per line. Clones share the output.
#[derive(Clone)]
pub struct Notifier {
    out: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Notifier {
    /// Creates a notifier writing to `out`.
    pub fn new(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Arc::new(Mutex::new(Box::new(out))),
        }
    }

    /// Creates a notifier writing to stdout.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Sends a JSON-RPC notification.
    pub fn send<T: Serialize>(&self, method: &'static str, params: T) {
        let notification = JsonRpcNotification::new(method, params);
        let line = match serde_json::to_string(&notification) {
            Ok(json) => json + "\n",
            Err(e) => {
                tracing::error!(method, error = %e, "failed to encode notification");
                return;
            }
        };

        let mut out = self.out.lock();
        if let Err(e) = out.write_all(line.as_bytes()).and_then(|()| out.flush()) {
            tracing::warn!(method, error = %e, "failed to write notification");
        }
    }
}

/// Runs one scheduler tick and sends a `chime` notification if it dispatched.
pub fn tick_and_notify(service: &ChimeService, notifier: &Notifier) -> TickOutcome {
    let outcome = service.tick();
    if let TickOutcome::Dispatched {
        chime,
        time,
        ref path,
    } = outcome
    {
        notifier.send(
            "chime",
            ChimeNotificationParams {
                chime,
                path: path.clone(),
                time,
            },
        );
    }
    outcome
}

/// State shared across all request handlers.
pub struct ServerState {
    /// The chime service being controlled.
    pub service: Arc<ChimeService>,
    /// Current user settings, kept in sync with the service.
    pub settings: Settings,
    /// Where settings are persisted. None disables persistence.
    pub settings_path: Option<PathBuf>,
    /// Output for notifications raised while handling requests.
    pub notifier: Notifier,
    /// Flag to signal server shutdown.
    shutdown: AtomicBool,
}

impl ServerState {
    /// Creates new server state that notifies on stdout.
    pub fn new(
        service: Arc<ChimeService>,
        settings: Settings,
        settings_path: Option<PathBuf>,
    ) -> Self {
        Self {
            service,
            settings,
            settings_path,
            notifier: Notifier::stdout(),
            shutdown: AtomicBool::new(false),
        }
    }

    /// Replaces the notification output.
    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = notifier;
        self
    }

    /// Writes the settings file if persistence is enabled.
    pub fn persist_settings(&self) -> Result<()> {
        match self.settings_path {
            Some(ref path) => save_settings(path, &self.settings),
            None => Ok(()),
        }
    }

    /// Signals the server to shut down.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Returns true if shutdown has been requested.
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }
}

/// Runs the JSON-RPC server, reading from stdin and writing to stdout.
pub fn run_server(mut state: ServerState) -> Result<()> {
    let stdin = io::stdin();
    let reader = stdin.lock();

    tracing::info!("JSON-RPC server started, waiting for requests");

    for line in reader.lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                tracing::error!(error = %e, "error reading stdin");
                break;
            }
        };

        // Skip empty lines
        if line.trim().is_empty() {
            continue;
        }

        if let Some(response) = process_request(&line, &mut state) {
            write_line(&response);
        }

        if state.is_shutdown() {
            tracing::info!("server shutdown requested");
            break;
        }
    }

    tracing::info!("JSON-RPC server stopped");
    Ok(())
}

/// Processes a single JSON-RPC request line.
fn process_request(line: &str, state: &mut ServerState) -> Option<String> {
    // Parse JSON
    let request: JsonRpcRequest = match serde_json::from_str(line) {
        Ok(r) => r,
        Err(e) => {
            let error = JsonRpcErrorResponse::new(
                None,
                JsonRpcError::parse_error(format!("Invalid JSON: {}", e)),
            );
            return Some(serde_json::to_string(&error).unwrap_or_default());
        }
    };

    // Validate JSON-RPC version
    if request.jsonrpc != "2.0" {
        let error = JsonRpcErrorResponse::new(
            Some(request.id),
            JsonRpcError::invalid_request("Invalid JSON-RPC version (expected 2.0)"),
        );
        return Some(serde_json::to_string(&error).unwrap_or_default());
    }

    tracing::debug!(method = %request.method, "handling request");

    match handle_request(&request.method, request.params, state) {
        Ok(result) => Some(
            serde_json::to_string(&JsonRpcResponse::new(request.id, result)).unwrap_or_default(),
        ),
        Err(error) => Some(
            serde_json::to_string(&JsonRpcErrorResponse::new(Some(request.id), error))
                .unwrap_or_default(),
        ),
    }
}

/// Writes one line to stdout while holding the lock, so notifications from
/// the ticker thread never interleave with responses.
fn write_line(line: &str) {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{}", line).ok();
    out.flush().ok();
}
