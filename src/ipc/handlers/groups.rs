use crate::ipc::error::{bad_params, err, no_workspace, ok};
use crate::ipc::types::{AppState, Request};
use crate::model::GroupFields;
use crate::relations;
use crate::store::GroupStore;
use serde_json::json;

fn save_failed(req: &Request, e: anyhow::Error) -> serde_json::Value {
    err(
        &req.id,
        "save_failed",
        e.to_string(),
        Some(json!({ "collection": GroupStore::STORAGE_KEY })),
    )
}

fn handle_groups_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(reg) = state.registry.as_ref() else {
        return ok(&req.id, json!({ "groups": [] }));
    };
    ok(&req.id, json!({ "groups": reg.groups.list() }))
}

fn handle_groups_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(id) = req.params.get("id").and_then(|v| v.as_str()) else {
        return bad_params(&req.id, "missing id");
    };
    let Some(reg) = state.registry.as_ref() else {
        return ok(&req.id, json!({ "group": null }));
    };
    ok(&req.id, json!({ "group": reg.groups.get(id) }))
}

/// One group with its references resolved: the display teacher and the
/// member students. Dangling references resolve to null / are skipped.
fn handle_groups_roster(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(id) = req.params.get("id").and_then(|v| v.as_str()) else {
        return bad_params(&req.id, "missing id");
    };
    let Some(reg) = state.registry.as_ref() else {
        return ok(
            &req.id,
            json!({ "group": null, "teacher": null, "students": [] }),
        );
    };
    let Some(group) = reg.groups.get(id) else {
        return ok(
            &req.id,
            json!({ "group": null, "teacher": null, "students": [] }),
        );
    };
    let teacher = relations::teacher_for_group(group, reg.teachers.list());
    let members = relations::students_in_group(group, reg.students.list());
    ok(
        &req.id,
        json!({ "group": group, "teacher": teacher, "students": members }),
    )
}

fn handle_groups_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(reg) = state.registry.as_mut() else {
        return no_workspace(&req.id);
    };
    let params = req
        .params
        .get("group")
        .cloned()
        .unwrap_or(serde_json::Value::Null);
    let fields: GroupFields = match serde_json::from_value(params) {
        Ok(f) => f,
        Err(e) => return bad_params(&req.id, e.to_string()),
    };
    match reg.groups.add(&reg.storage, fields) {
        Ok(group) => ok(&req.id, json!({ "group": group })),
        Err(e) => save_failed(req, e),
    }
}

fn handle_groups_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(reg) = state.registry.as_mut() else {
        return no_workspace(&req.id);
    };
    let Some(id) = req.params.get("id").and_then(|v| v.as_str()) else {
        return bad_params(&req.id, "missing id");
    };
    let params = req
        .params
        .get("group")
        .cloned()
        .unwrap_or(serde_json::Value::Null);
    let fields: GroupFields = match serde_json::from_value(params) {
        Ok(f) => f,
        Err(e) => return bad_params(&req.id, e.to_string()),
    };
    match reg.groups.update(&reg.storage, id, fields) {
        Ok(updated) => ok(&req.id, json!({ "group": updated })),
        Err(e) => save_failed(req, e),
    }
}

fn handle_groups_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(reg) = state.registry.as_mut() else {
        return no_workspace(&req.id);
    };
    let Some(id) = req.params.get("id").and_then(|v| v.as_str()) else {
        return bad_params(&req.id, "missing id");
    };
    match reg.groups.delete(&reg.storage, id) {
        Ok(deleted) => ok(&req.id, json!({ "deleted": deleted })),
        Err(e) => save_failed(req, e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "groups.list" => Some(handle_groups_list(state, req)),
        "groups.get" => Some(handle_groups_get(state, req)),
        "groups.roster" => Some(handle_groups_roster(state, req)),
        "groups.create" => Some(handle_groups_create(state, req)),
        "groups.update" => Some(handle_groups_update(state, req)),
        "groups.delete" => Some(handle_groups_delete(state, req)),
        _ => None,
    }
}
