use crate::ipc::error::{bad_params, err, no_workspace, ok};
use crate::ipc::types::{AppState, Request};
use crate::model::Role;
use crate::store::SessionStore;
use serde_json::json;

fn save_failed(req: &Request, e: anyhow::Error) -> serde_json::Value {
    err(
        &req.id,
        "save_failed",
        e.to_string(),
        Some(json!({ "collection": SessionStore::STORAGE_KEY })),
    )
}

fn handle_auth_login(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(email) = req.params.get("email").and_then(|v| v.as_str()) else {
        return bad_params(&req.id, "missing email");
    };
    let Some(password) = req.params.get("password").and_then(|v| v.as_str()) else {
        return bad_params(&req.id, "missing password");
    };

    // Verification happens before any state is touched; the session store
    // only ever persists identities the authenticator produced.
    let user = match state.authenticator.verify(email, password) {
        Ok(user) => user,
        Err(e) => return err(&req.id, "auth_failed", e.to_string(), None),
    };

    let Some(reg) = state.registry.as_mut() else {
        return no_workspace(&req.id);
    };
    match reg.session.set(&reg.storage, user.clone()) {
        Ok(()) => ok(&req.id, json!({ "user": user })),
        Err(e) => save_failed(req, e),
    }
}

fn handle_auth_register(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(name) = req.params.get("name").and_then(|v| v.as_str()) else {
        return bad_params(&req.id, "missing name");
    };
    let Some(email) = req.params.get("email").and_then(|v| v.as_str()) else {
        return bad_params(&req.id, "missing email");
    };
    let Some(password) = req.params.get("password").and_then(|v| v.as_str()) else {
        return bad_params(&req.id, "missing password");
    };
    let role: Role = match serde_json::from_value(
        req.params
            .get("role")
            .cloned()
            .unwrap_or(serde_json::Value::Null),
    ) {
        Ok(role) => role,
        Err(_) => return bad_params(&req.id, "missing or invalid role"),
    };

    let user = match state.authenticator.register(name, email, password, role) {
        Ok(user) => user,
        Err(e) => return err(&req.id, "auth_failed", e.to_string(), None),
    };

    let Some(reg) = state.registry.as_mut() else {
        return no_workspace(&req.id);
    };
    match reg.session.set(&reg.storage, user.clone()) {
        Ok(()) => ok(&req.id, json!({ "user": user })),
        Err(e) => save_failed(req, e),
    }
}

fn handle_auth_logout(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(reg) = state.registry.as_mut() else {
        return no_workspace(&req.id);
    };
    match reg.session.clear(&reg.storage) {
        Ok(()) => ok(&req.id, json!({ "user": null })),
        Err(e) => save_failed(req, e),
    }
}

fn handle_auth_session(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(reg) = state.registry.as_ref() else {
        return ok(&req.id, json!({ "user": null }));
    };
    ok(&req.id, json!({ "user": reg.session.current() }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "auth.login" => Some(handle_auth_login(state, req)),
        "auth.register" => Some(handle_auth_register(state, req)),
        "auth.logout" => Some(handle_auth_logout(state, req)),
        "auth.session" => Some(handle_auth_session(state, req)),
        _ => None,
    }
}
