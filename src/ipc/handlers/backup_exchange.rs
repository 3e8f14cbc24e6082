use crate::backup;
use crate::ipc::error::{bad_params, err, no_workspace, ok};
use crate::ipc::types::{AppState, Request};
use crate::storage;
use crate::store::Registry;
use serde_json::json;
use std::path::PathBuf;

fn handle_backup_export(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(out_path) = req
        .params
        .get("outPath")
        .and_then(|v| v.as_str())
        .map(PathBuf::from)
    else {
        return bad_params(&req.id, "missing outPath");
    };
    let Some(workspace) = state.workspace.clone() else {
        return no_workspace(&req.id);
    };

    // Flush dirty collections first so the bundle carries current state.
    if let Some(reg) = state.registry.as_mut() {
        if let Err(e) = reg.flush() {
            return err(&req.id, "save_failed", e.to_string(), None);
        }
    }

    match backup::export_workspace_bundle(&workspace, &out_path) {
        Ok(summary) => ok(
            &req.id,
            json!({
                "bundleFormat": summary.bundle_format,
                "entryCount": summary.entry_count,
                "outPath": out_path.to_string_lossy(),
            }),
        ),
        Err(e) => err(&req.id, "export_failed", format!("{e:?}"), None),
    }
}

fn handle_backup_import(state: &mut AppState, req: &Request) -> serde_json::Value {
    let Some(in_path) = req
        .params
        .get("inPath")
        .and_then(|v| v.as_str())
        .map(PathBuf::from)
    else {
        return bad_params(&req.id, "missing inPath");
    };
    let Some(workspace_path) = req
        .params
        .get("workspacePath")
        .and_then(|v| v.as_str())
        .map(PathBuf::from)
    else {
        return bad_params(&req.id, "missing workspacePath");
    };

    // Importing over the open workspace replaces the database under the
    // registry; drop the registry before the swap and reopen it after.
    let replacing_open_workspace = state.workspace.as_deref() == Some(workspace_path.as_path());
    if replacing_open_workspace {
        if let Some(mut old) = state.registry.take() {
            if let Err(e) = old.flush() {
                tracing::warn!(error = %e, "flush before import failed");
            }
        }
    }

    let summary = match backup::import_workspace_bundle(&in_path, &workspace_path) {
        Ok(summary) => summary,
        Err(e) => return err(&req.id, "import_failed", format!("{e:?}"), None),
    };

    if replacing_open_workspace {
        match storage::open_storage(&workspace_path) {
            Ok(storage) => state.registry = Some(Registry::open(storage)),
            Err(e) => return err(&req.id, "db_open_failed", format!("{e:?}"), None),
        }
    }

    ok(
        &req.id,
        json!({ "bundleFormatDetected": summary.bundle_format_detected }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "backup.export" => Some(handle_backup_export(state, req)),
        "backup.import" => Some(handle_backup_import(state, req)),
        _ => None,
    }
}
