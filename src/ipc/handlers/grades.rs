use crate::ipc::error::{bad_params, err, no_workspace, ok};
use crate::ipc::types::{AppState, Request};
use crate::model::{GradeFields, GradePatch};
use crate::store::GradeStore;
use serde_json::json;

fn save_failed(req: &Request, e: anyhow::Error) -> serde_json::Value {
    err(
        &req.id,
        "save_failed",
        e.to_string(),
        Some(json!({ "collection": GradeStore::STORAGE_KEY })),
    )
}

fn handle_grades_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(reg) = state.registry.as_ref() else {
        return ok(&req.id, json!({ "grades": [] }));
    };
    let assignment_id = req.params.get("assignmentId").and_then(|v| v.as_str());
    let student_id = req.params.get("studentId").and_then(|v| v.as_str());
    let grades = match (assignment_id, student_id) {
        (Some(a), _) => json!(reg.grades.by_assignment(a)),
        (None, Some(s)) => json!(reg.grades.by_student(s)),
        (None, None) => json!(reg.grades.list()),
    };
    ok(&req.id, json!({ "grades": grades }))
}

fn handle_grades_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(id) = req.params.get("id").and_then(|v| v.as_str()) else {
        return bad_params(&req.id, "missing id");
    };
    let Some(reg) = state.registry.as_ref() else {
        return ok(&req.id, json!({ "grade": null }));
    };
    ok(&req.id, json!({ "grade": reg.grades.get(id) }))
}

fn handle_grades_find(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(assignment_id) = req.params.get("assignmentId").and_then(|v| v.as_str()) else {
        return bad_params(&req.id, "missing assignmentId");
    };
    let Some(student_id) = req.params.get("studentId").and_then(|v| v.as_str()) else {
        return bad_params(&req.id, "missing studentId");
    };
    let Some(reg) = state.registry.as_ref() else {
        return ok(&req.id, json!({ "grade": null }));
    };
    ok(
        &req.id,
        json!({
            "grade": reg
                .grades
                .find_for_assignment_and_student(assignment_id, student_id)
        }),
    )
}

fn handle_grades_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(reg) = state.registry.as_mut() else {
        return no_workspace(&req.id);
    };
    let params = req
        .params
        .get("grade")
        .cloned()
        .unwrap_or(serde_json::Value::Null);
    let fields: GradeFields = match serde_json::from_value(params) {
        Ok(f) => f,
        Err(e) => return bad_params(&req.id, e.to_string()),
    };
    match reg.grades.add(&reg.storage, fields) {
        Ok(grade) => ok(&req.id, json!({ "grade": grade })),
        Err(e) => save_failed(req, e),
    }
}

fn handle_grades_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(reg) = state.registry.as_mut() else {
        return no_workspace(&req.id);
    };
    let Some(id) = req.params.get("id").and_then(|v| v.as_str()) else {
        return bad_params(&req.id, "missing id");
    };
    let params = req
        .params
        .get("patch")
        .cloned()
        .unwrap_or(serde_json::Value::Null);
    let patch: GradePatch = match serde_json::from_value(params) {
        Ok(p) => p,
        Err(e) => return bad_params(&req.id, e.to_string()),
    };
    match reg.grades.update(&reg.storage, id, patch) {
        Ok(updated) => ok(&req.id, json!({ "grade": updated })),
        Err(e) => save_failed(req, e),
    }
}

fn handle_grades_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(reg) = state.registry.as_mut() else {
        return no_workspace(&req.id);
    };
    let Some(id) = req.params.get("id").and_then(|v| v.as_str()) else {
        return bad_params(&req.id, "missing id");
    };
    match reg.grades.delete(&reg.storage, id) {
        Ok(deleted) => ok(&req.id, json!({ "deleted": deleted })),
        Err(e) => save_failed(req, e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "grades.list" => Some(handle_grades_list(state, req)),
        "grades.get" => Some(handle_grades_get(state, req)),
        "grades.find" => Some(handle_grades_find(state, req)),
        "grades.create" => Some(handle_grades_create(state, req)),
        "grades.update" => Some(handle_grades_update(state, req)),
        "grades.delete" => Some(handle_grades_delete(state, req)),
        _ => None,
    }
}
