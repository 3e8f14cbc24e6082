use crate::ipc::error::ok;
use crate::ipc::types::{AppState, Request};
use crate::roles::capabilities_for;
use serde_json::json;

/// Capability flags for the current session user. Recomputed on every call;
/// a signed-out (or workspace-less) caller gets the anonymous row.
fn handle_roles_capabilities(state: &mut AppState, req: &Request) -> serde_json::Value {
    let user = state
        .registry
        .as_ref()
        .and_then(|reg| reg.session.current());
    ok(&req.id, json!({ "capabilities": capabilities_for(user) }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "roles.capabilities" => Some(handle_roles_capabilities(state, req)),
        _ => None,
    }
}
