use crate::ipc::error::{bad_params, err, no_workspace, ok};
use crate::ipc::types::{AppState, Request};
use crate::model::AssignmentFields;
use crate::relations;
use crate::store::AssignmentStore;
use serde_json::json;

fn save_failed(req: &Request, e: anyhow::Error) -> serde_json::Value {
    err(
        &req.id,
        "save_failed",
        e.to_string(),
        Some(json!({ "collection": AssignmentStore::STORAGE_KEY })),
    )
}

fn handle_assignments_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(reg) = state.registry.as_ref() else {
        return ok(&req.id, json!({ "assignments": [] }));
    };
    // Optional groupId narrows the listing to one group's assignments.
    match req.params.get("groupId").and_then(|v| v.as_str()) {
        Some(group_id) => ok(
            &req.id,
            json!({ "assignments": reg.assignments.by_group(group_id) }),
        ),
        None => ok(&req.id, json!({ "assignments": reg.assignments.list() })),
    }
}

fn handle_assignments_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(id) = req.params.get("id").and_then(|v| v.as_str()) else {
        return bad_params(&req.id, "missing id");
    };
    let Some(reg) = state.registry.as_ref() else {
        return ok(&req.id, json!({ "assignment": null, "group": null }));
    };
    // The detail view wants the owning group alongside; a dangling groupId
    // resolves to null.
    let assignment = reg.assignments.get(id);
    let group = assignment.and_then(|a| relations::group_for_assignment(a, reg.groups.list()));
    ok(&req.id, json!({ "assignment": assignment, "group": group }))
}

fn handle_assignments_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(reg) = state.registry.as_mut() else {
        return no_workspace(&req.id);
    };
    let params = req
        .params
        .get("assignment")
        .cloned()
        .unwrap_or(serde_json::Value::Null);
    let fields: AssignmentFields = match serde_json::from_value(params) {
        Ok(f) => f,
        Err(e) => return bad_params(&req.id, e.to_string()),
    };
    match reg.assignments.add(&reg.storage, fields) {
        Ok(assignment) => ok(&req.id, json!({ "assignment": assignment })),
        Err(e) => save_failed(req, e),
    }
}

fn handle_assignments_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(reg) = state.registry.as_mut() else {
        return no_workspace(&req.id);
    };
    let Some(id) = req.params.get("id").and_then(|v| v.as_str()) else {
        return bad_params(&req.id, "missing id");
    };
    let params = req
        .params
        .get("assignment")
        .cloned()
        .unwrap_or(serde_json::Value::Null);
    let fields: AssignmentFields = match serde_json::from_value(params) {
        Ok(f) => f,
        Err(e) => return bad_params(&req.id, e.to_string()),
    };
    match reg.assignments.update(&reg.storage, id, fields) {
        Ok(updated) => ok(&req.id, json!({ "assignment": updated })),
        Err(e) => save_failed(req, e),
    }
}

fn handle_assignments_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(reg) = state.registry.as_mut() else {
        return no_workspace(&req.id);
    };
    let Some(id) = req.params.get("id").and_then(|v| v.as_str()) else {
        return bad_params(&req.id, "missing id");
    };
    match reg.assignments.delete(&reg.storage, id) {
        Ok(deleted) => ok(&req.id, json!({ "deleted": deleted })),
        Err(e) => save_failed(req, e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "assignments.list" => Some(handle_assignments_list(state, req)),
        "assignments.get" => Some(handle_assignments_get(state, req)),
        "assignments.create" => Some(handle_assignments_create(state, req)),
        "assignments.update" => Some(handle_assignments_update(state, req)),
        "assignments.delete" => Some(handle_assignments_delete(state, req)),
        _ => None,
    }
}
