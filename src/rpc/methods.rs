//! JSON-RPC method handlers.
//!
//! Implements the handlers for all supported JSON-RPC methods.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::audio::clamp_volume;
use crate::types::QuietHours;

use super::server::{tick_and_notify, ServerState};
use super::types::{
    DiscoverResult, JsonRpcError, SetIntervalsParams, SetQuietHoursParams, SetVolumeParams,
    SwitchResult, SwitchSoundpackParams, TestChimeParams, TestChimeResult, TestChimeStatus,
};

/// Handles a JSON-RPC method call.
pub fn handle_request(
    method: &str,
    params: serde_json::Value,
    state: &mut ServerState,
) -> Result<serde_json::Value, JsonRpcError> {
    match method {
        "discover_soundpacks" => handle_discover(state),
        "switch_soundpack" => handle_switch(params, state),
        "test_chime" => handle_test_chime(params, state),
        "set_intervals" => handle_set_intervals(params, state),
        "set_volume" => handle_set_volume(params, state),
        "set_quiet_hours" => handle_set_quiet_hours(params, state),
        "get_status" => to_value(state.service.status()),
        "tick" => to_value(tick_and_notify(&state.service, &state.notifier)),
        "ping" => handle_ping(),
        "shutdown" => handle_shutdown(state),
        _ => Err(JsonRpcError::method_not_found(method)),
    }
}

/// Parses method parameters, treating a missing params field as `{}`.
fn parse_params<T: DeserializeOwned>(params: serde_json::Value) -> Result<T, JsonRpcError> {
    let params = if params.is_null() {
        serde_json::Value::Object(Default::default())
    } else {
        params
    };
    serde_json::from_value(params)
        .map_err(|e| JsonRpcError::invalid_params(format!("Invalid params: {}", e)))
}

fn to_value<T: Serialize>(value: T) -> Result<serde_json::Value, JsonRpcError> {
    serde_json::to_value(value).map_err(|e| JsonRpcError::internal_error(e.to_string()))
}

/// Saves settings after a successful change. A failed write leaves the change
/// applied and comes back as a warning for the result.
fn persist(state: &ServerState) -> Option<String> {
    match state.persist_settings() {
        Ok(()) => None,
        Err(e) => {
            tracing::warn!(error = %e, "failed to persist settings");
            Some(e.to_string())
        }
    }
}

/// Adds a `settings_warning` field to an object result.
fn with_warning(mut value: serde_json::Value, warning: Option<String>) -> serde_json::Value {
    if let (Some(warning), Some(object)) = (warning, value.as_object_mut()) {
        object.insert("settings_warning".to_string(), warning.into());
    }
    value
}

/// Handles the ping method for health checks.
fn handle_ping() -> Result<serde_json::Value, JsonRpcError> {
    Ok(serde_json::json!({ "status": "ok" }))
}

/// Handles the shutdown method.
fn handle_shutdown(state: &mut ServerState) -> Result<serde_json::Value, JsonRpcError> {
    state.shutdown();
    Ok(serde_json::json!({ "status": "shutting_down" }))
}

/// Handles the discover_soundpacks method.
fn handle_discover(state: &mut ServerState) -> Result<serde_json::Value, JsonRpcError> {
    let soundpacks = state.service.discover_soundpacks()?;
    let current = state.service.current_soundpack().map(|p| p.name().to_string());
    to_value(DiscoverResult {
        soundpacks,
        current,
    })
}

/// Handles the switch_soundpack method.
fn handle_switch(
    params: serde_json::Value,
    state: &mut ServerState,
) -> Result<serde_json::Value, JsonRpcError> {
    let params: SwitchSoundpackParams = parse_params(params)?;
    let pack = state.service.switch_soundpack(&params.name)?;

    state.settings.soundpack = pack.name().to_string();
    let settings_warning = persist(state);

    to_value(SwitchResult {
        name: pack.name().to_string(),
        display_name: pack.display_name().to_string(),
        chimes: pack.available_chimes(),
        settings_warning,
    })
}

/// Handles the test_chime method.
fn handle_test_chime(
    params: serde_json::Value,
    state: &mut ServerState,
) -> Result<serde_json::Value, JsonRpcError> {
    let params: TestChimeParams = parse_params(params)?;
    let chime = params.chime_type()?;

    let path = state.service.trigger_test_chime(chime)?;
    let status = if path.is_some() {
        TestChimeStatus::Played
    } else {
        TestChimeStatus::Unavailable
    };
    to_value(TestChimeResult {
        chime,
        status,
        path,
    })
}

/// Handles the set_intervals method.
fn handle_set_intervals(
    params: serde_json::Value,
    state: &mut ServerState,
) -> Result<serde_json::Value, JsonRpcError> {
    let params: SetIntervalsParams = parse_params(params)?;
    let intervals = params.apply(state.service.intervals());

    state.service.set_intervals(intervals);
    state.settings.set_intervals(intervals);
    let warning = persist(state);

    Ok(with_warning(to_value(intervals)?, warning))
}

/// Handles the set_volume method.
fn handle_set_volume(
    params: serde_json::Value,
    state: &mut ServerState,
) -> Result<serde_json::Value, JsonRpcError> {
    let params: SetVolumeParams = parse_params(params)?;
    let volume = clamp_volume(params.volume);

    state.service.set_volume(volume);
    state.settings.volume = volume;
    let warning = persist(state);

    Ok(with_warning(serde_json::json!({ "volume": volume }), warning))
}

/// Handles the set_quiet_hours method.
fn handle_set_quiet_hours(
    params: serde_json::Value,
    state: &mut ServerState,
) -> Result<serde_json::Value, JsonRpcError> {
    let params: SetQuietHoursParams = parse_params(params)?;
    let quiet_hours = match (params.start, params.end) {
        (Some(start), Some(end)) => Some(QuietHours::new(start, end)),
        (None, None) => None,
        _ => {
            return Err(JsonRpcError::invalid_params(
                "Both start and end are required (or both null to disable)",
            ))
        }
    };

    state.service.set_quiet_hours(quiet_hours);
    state.settings.set_quiet_hours(quiet_hours);
    let warning = persist(state);

    Ok(with_warning(
        serde_json::json!({ "quiet_hours": quiet_hours }),
        warning,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::testing::RecordingPlayer;
    use crate::audio::AudioPlayer;
    use crate::service::ChimeService;
    use crate::settings::{load_settings, Settings};
    use crate::soundpack::SoundpackRegistry;
    use serde_json::json;
    use std::fs;
    use std::sync::Arc;
    use tempfile::{tempdir, TempDir};

    /// classic: hour/half/quarter, digital: hour only. Settings persisted in the temp dir.
    fn test_state() -> (TempDir, ServerState, Arc<RecordingPlayer>) {
        let root = tempdir().unwrap();
        let packs = root.path().join("packs");
        let classic = packs.join("classic");
        let digital = packs.join("digital");
        fs::create_dir_all(&classic).unwrap();
        fs::create_dir_all(&digital).unwrap();
        for chime in ["hour", "half", "quarter"] {
            fs::write(classic.join(format!("{}.wav", chime)), b"").unwrap();
        }
        fs::write(digital.join("hour.wav"), b"").unwrap();

        let registry = Arc::new(SoundpackRegistry::new(&packs));
        let player = Arc::new(RecordingPlayer::new());
        let dyn_player: Arc<dyn AudioPlayer> = player.clone();
        let settings = Settings {
            soundpack: "classic".to_string(),
            ..Settings::default()
        };
        let service = Arc::new(ChimeService::from_settings(registry, dyn_player, &settings));
        let settings_path = root.path().join("settings.json");
        let state = ServerState::new(service, settings, Some(settings_path));
        (root, state, player)
    }

    #[test]
    fn ping_returns_ok() {
        let result = handle_ping().unwrap();
        assert_eq!(result["status"], "ok");
    }

    #[test]
    fn shutdown_sets_flag() {
        let (_root, mut state, _) = test_state();
        let result = handle_request("shutdown", json!(null), &mut state).unwrap();
        assert_eq!(result["status"], "shutting_down");
        assert!(state.is_shutdown());
    }

    #[test]
    fn discover_lists_packs_and_current() {
        let (_root, mut state, _) = test_state();
        let result = handle_request("discover_soundpacks", json!(null), &mut state).unwrap();
        assert_eq!(result["soundpacks"], json!(["classic", "digital"]));
        assert_eq!(result["current"], "classic");
    }

    #[test]
    fn switch_updates_and_persists_selection() {
        let (root, mut state, _) = test_state();
        let result =
            handle_request("switch_soundpack", json!({"name": "digital"}), &mut state).unwrap();
        assert_eq!(result["name"], "digital");
        assert_eq!(result["chimes"], json!(["hour"]));

        let saved = load_settings(&root.path().join("settings.json"));
        assert_eq!(saved.soundpack, "digital");
    }

    #[test]
    fn failed_switch_keeps_current_and_settings() {
        let (root, mut state, _) = test_state();
        let err = handle_request("switch_soundpack", json!({"name": "nosuchpack"}), &mut state)
            .unwrap_err();
        assert_eq!(err.code, -32010);
        assert_eq!(state.service.current_soundpack().unwrap().name(), "classic");
        assert_eq!(state.settings.soundpack, "classic");
        assert!(!root.path().join("settings.json").exists());
    }

    #[test]
    fn switch_succeeds_when_settings_cannot_be_saved() {
        let (root, mut state, _) = test_state();
        let blocker = root.path().join("blocker");
        fs::write(&blocker, b"").unwrap();
        state.settings_path = Some(blocker.join("settings.json"));

        let result =
            handle_request("switch_soundpack", json!({"name": "digital"}), &mut state).unwrap();
        assert_eq!(result["name"], "digital");
        assert!(result["settings_warning"].is_string());
        assert_eq!(state.service.current_soundpack().unwrap().name(), "digital");
        assert_eq!(state.settings.soundpack, "digital");

        let result = handle_request("set_volume", json!({"volume": 20}), &mut state).unwrap();
        assert_eq!(result["volume"], 20);
        assert!(result["settings_warning"].is_string());
    }

    #[test]
    fn saved_changes_carry_no_warning() {
        let (_root, mut state, _) = test_state();
        let result =
            handle_request("switch_soundpack", json!({"name": "digital"}), &mut state).unwrap();
        assert!(result.get("settings_warning").is_none());
    }

    #[test]
    fn switch_requires_name() {
        let (_root, mut state, _) = test_state();
        let err = handle_request("switch_soundpack", json!({}), &mut state).unwrap_err();
        assert_eq!(err.code, -32602);
    }

    #[test]
    fn test_chime_played_and_unavailable() {
        let (_root, mut state, player) = test_state();
        let result = handle_request("test_chime", json!({"chime": "quarter"}), &mut state).unwrap();
        assert_eq!(result["status"], "played");
        assert!(result["path"].as_str().unwrap().ends_with("quarter.wav"));
        assert_eq!(player.count(), 1);

        handle_request("switch_soundpack", json!({"name": "digital"}), &mut state).unwrap();
        let result =
            handle_request("test_chime", json!({"chime": "half_hour"}), &mut state).unwrap();
        assert_eq!(result["status"], "unavailable");
        assert!(result.get("path").is_none());
        assert_eq!(player.count(), 1);
    }

    #[test]
    fn set_intervals_merges_and_persists() {
        let (root, mut state, _) = test_state();
        let result =
            handle_request("set_intervals", json!({"quarter": true}), &mut state).unwrap();
        assert_eq!(result, json!({"hourly": true, "half": false, "quarter": true}));
        assert!(state.service.intervals().quarter);

        let saved = load_settings(&root.path().join("settings.json"));
        assert!(saved.chime_quarter_hour);
        assert!(!saved.chime_half_hour);
    }

    #[test]
    fn set_volume_clamps() {
        let (_root, mut state, _) = test_state();
        let result = handle_request("set_volume", json!({"volume": 180}), &mut state).unwrap();
        assert_eq!(result["volume"], 100);
        assert_eq!(state.service.volume(), 100);
        assert_eq!(state.settings.volume, 100);
    }

    #[test]
    fn set_quiet_hours_requires_both_bounds() {
        let (_root, mut state, _) = test_state();
        let err = handle_request("set_quiet_hours", json!({"start": "22:00"}), &mut state)
            .unwrap_err();
        assert_eq!(err.code, -32602);

        let result = handle_request(
            "set_quiet_hours",
            json!({"start": "22:00", "end": "07:00"}),
            &mut state,
        )
        .unwrap();
        assert_eq!(result["quiet_hours"]["start"], "22:00");
        assert!(state.settings.quiet_hours_enabled);

        handle_request("set_quiet_hours", json!({"start": null, "end": null}), &mut state).unwrap();
        assert!(state.service.quiet_hours().is_none());
        assert!(!state.settings.quiet_hours_enabled);
    }

    #[test]
    fn get_status_reports_state() {
        let (_root, mut state, _) = test_state();
        let result = handle_request("get_status", json!(null), &mut state).unwrap();
        assert_eq!(result["soundpack"], "classic");
        assert_eq!(result["volume"], 50);
        assert_eq!(result["intervals"]["hourly"], true);
    }

    #[test]
    fn tick_returns_outcome() {
        let (_root, mut state, _) = test_state();
        let result = handle_request("tick", json!(null), &mut state).unwrap();
        assert!(result["status"].is_string());
    }
}
