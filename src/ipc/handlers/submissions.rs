use crate::ipc::error::{bad_params, err, no_workspace, ok};
use crate::ipc::types::{AppState, Request};
use crate::model::{SubmissionFields, SubmissionPatch};
use crate::store::SubmissionStore;
use serde_json::json;

fn save_failed(req: &Request, e: anyhow::Error) -> serde_json::Value {
    err(
        &req.id,
        "save_failed",
        e.to_string(),
        Some(json!({ "collection": SubmissionStore::STORAGE_KEY })),
    )
}

fn handle_submissions_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(reg) = state.registry.as_ref() else {
        return ok(&req.id, json!({ "submissions": [] }));
    };
    let assignment_id = req.params.get("assignmentId").and_then(|v| v.as_str());
    let student_id = req.params.get("studentId").and_then(|v| v.as_str());
    let submissions = match (assignment_id, student_id) {
        (Some(a), _) => json!(reg.submissions.by_assignment(a)),
        (None, Some(s)) => json!(reg.submissions.by_student(s)),
        (None, None) => json!(reg.submissions.list()),
    };
    ok(&req.id, json!({ "submissions": submissions }))
}

fn handle_submissions_get(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(id) = req.params.get("id").and_then(|v| v.as_str()) else {
        return bad_params(&req.id, "missing id");
    };
    let Some(reg) = state.registry.as_ref() else {
        return ok(&req.id, json!({ "submission": null }));
    };
    ok(&req.id, json!({ "submission": reg.submissions.get(id) }))
}

/// Lookup by the (assignmentId, studentId) pair. Duplicates are possible;
/// the first-inserted record wins.
fn handle_submissions_find(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(assignment_id) = req.params.get("assignmentId").and_then(|v| v.as_str()) else {
        return bad_params(&req.id, "missing assignmentId");
    };
    let Some(student_id) = req.params.get("studentId").and_then(|v| v.as_str()) else {
        return bad_params(&req.id, "missing studentId");
    };
    let Some(reg) = state.registry.as_ref() else {
        return ok(&req.id, json!({ "submission": null }));
    };
    ok(
        &req.id,
        json!({
            "submission": reg
                .submissions
                .find_for_assignment_and_student(assignment_id, student_id)
        }),
    )
}

fn handle_submissions_create(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(reg) = state.registry.as_mut() else {
        return no_workspace(&req.id);
    };
    let params = req
        .params
        .get("submission")
        .cloned()
        .unwrap_or(serde_json::Value::Null);
    let fields: SubmissionFields = match serde_json::from_value(params) {
        Ok(f) => f,
        Err(e) => return bad_params(&req.id, e.to_string()),
    };
    match reg.submissions.add(&reg.storage, fields) {
        Ok(submission) => ok(&req.id, json!({ "submission": submission })),
        Err(e) => save_failed(req, e),
    }
}

fn handle_submissions_update(state: &mut AppState, req: &Request) -> serde_json::Value {
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
    let patch: SubmissionPatch = match serde_json::from_value(params) {
        Ok(p) => p,
        Err(e) => return bad_params(&req.id, e.to_string()),
    };
    match reg.submissions.update(&reg.storage, id, patch) {
        Ok(updated) => ok(&req.id, json!({ "submission": updated })),
        Err(e) => save_failed(req, e),
    }
}

fn handle_submissions_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(reg) = state.registry.as_mut() else {
        return no_workspace(&req.id);
    };
    let Some(id) = req.params.get("id").and_then(|v| v.as_str()) else {
        return bad_params(&req.id, "missing id");
    };
    match reg.submissions.delete(&reg.storage, id) {
        Ok(deleted) => ok(&req.id, json!({ "deleted": deleted })),
        Err(e) => save_failed(req, e),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "submissions.list" => Some(handle_submissions_list(state, req)),
        "submissions.get" => Some(handle_submissions_get(state, req)),
        "submissions.find" => Some(handle_submissions_find(state, req)),
        "submissions.create" => Some(handle_submissions_create(state, req)),
        "submissions.update" => Some(handle_submissions_update(state, req)),
        "submissions.delete" => Some(handle_submissions_delete(state, req)),
        _ => None,
    }
}
