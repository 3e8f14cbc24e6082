use crate::ipc::error::{bad_params, err, no_workspace, ok};
use crate::ipc::types::{AppState, Request};
use crate::model::StudentFields;
use crate::store::StudentStore;
use serde_json::json;

fn handle_students_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(reg) = state.registry.as_ref() else {
        return ok(&req.id, json!({ "students": [] }));
    };
    ok(&req.id, json!({ "students": reg.students.list() }))
}

fn handle_students_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(id) = req.params.get("id").and_then(|v| v.as_str()) else {
        return bad_params(&req.id, "missing id");
    };
    let Some(reg) = state.registry.as_ref() else {
        return ok(&req.id, json!({ "student": null }));
    };
    ok(&req.id, json!({ "student": reg.students.get(id) }))
}

fn handle_students_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(reg) = state.registry.as_mut() else {
        return no_workspace(&req.id);
    };
    let params = req
        .params
        .get("student")
        .cloned()
        .unwrap_or(serde_json::Value::Null);
    let fields: StudentFields = match serde_json::from_value(params) {
        Ok(f) => f,
        Err(e) => return bad_params(&req.id, e.to_string()),
    };
    match reg.students.add(&reg.storage, fields) {
        Ok(student) => ok(&req.id, json!({ "student": student })),
        Err(e) => err(
            &req.id,
            "save_failed",
            e.to_string(),
            Some(json!({ "collection": StudentStore::STORAGE_KEY })),
        ),
    }
}

fn handle_students_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(reg) = state.registry.as_mut() else {
        return no_workspace(&req.id);
    };
    let Some(id) = req.params.get("id").and_then(|v| v.as_str()) else {
        return bad_params(&req.id, "missing id");
    };
    let params = req
        .params
        .get("student")
        .cloned()
        .unwrap_or(serde_json::Value::Null);
    let fields: StudentFields = match serde_json::from_value(params) {
        Ok(f) => f,
        Err(e) => return bad_params(&req.id, e.to_string()),
    };
    match reg.students.update(&reg.storage, id, fields) {
        // An unknown id is a no-op; the caller gets null, not an error.
        Ok(updated) => ok(&req.id, json!({ "student": updated })),
        Err(e) => err(
            &req.id,
            "save_failed",
            e.to_string(),
            Some(json!({ "collection": StudentStore::STORAGE_KEY })),
        ),
    }
}

fn handle_students_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(reg) = state.registry.as_mut() else {
        return no_workspace(&req.id);
    };
    let Some(id) = req.params.get("id").and_then(|v| v.as_str()) else {
        return bad_params(&req.id, "missing id");
    };
    match reg.students.delete(&reg.storage, id) {
        Ok(deleted) => ok(&req.id, json!({ "deleted": deleted })),
        Err(e) => err(
            &req.id,
            "save_failed",
            e.to_string(),
            Some(json!({ "collection": StudentStore::STORAGE_KEY })),
        ),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "students.list" => Some(handle_students_list(state, req)),
        "students.get" => Some(handle_students_get(state, req)),
        "students.create" => Some(handle_students_create(state, req)),
        "students.update" => Some(handle_students_update(state, req)),
        "students.delete" => Some(handle_students_delete(state, req)),
        _ => None,
    }
}
