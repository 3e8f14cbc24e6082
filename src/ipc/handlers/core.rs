use crate::ipc::error::{bad_params, err, no_workspace, ok};
use crate::ipc::types::{AppState, Request};
use crate::storage;
use crate::store::Registry;
use serde_json::json;
use std::path::PathBuf;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "workspacePath": state.workspace.as_ref().map(|p| p.to_string_lossy().to_string())
        }),
    )
}

fn handle_workspace_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let p = req
        .params
        .get("path")
        .and_then(|v| v.as_str())
        .map(PathBuf::from);
    let Some(path) = p else {
        return bad_params(&req.id, "missing params.path");
    };

    // Re-selecting tears down the previous registry; flush anything a failed
    // write left dirty before letting it go.
    if let Some(mut old) = state.registry.take() {
        if let Err(e) = old.flush() {
            tracing::warn!(error = %e, "flush of previous workspace failed");
        }
    }

    match storage::open_storage(&path) {
        Ok(storage) => {
            let registry = Registry::open(storage);
            state.workspace = Some(path.clone());
            state.registry = Some(registry);
            ok(&req.id, json!({ "workspacePath": path.to_string_lossy() }))
        }
        Err(e) => err(&req.id, "db_open_failed", format!("{e:?}"), None),
    }
}

fn handle_workspace_flush(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(reg) = state.registry.as_mut() else {
        return no_workspace(&req.id);
    };
    match reg.flush() {
        Ok(()) => ok(&req.id, json!({ "flushed": true })),
        Err(e) => err(&req.id, "save_failed", e.to_string(), None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "workspace.select" => Some(handle_workspace_select(state, req)),
        "workspace.flush" => Some(handle_workspace_flush(state, req)),
        _ => None,
    }
}
