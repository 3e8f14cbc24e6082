use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let p = std::env::temp_dir().join(format!(
        "{}-{}",
        prefix,
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos()
    ));
    std::fs::create_dir_all(&p).expect("create temp dir");
    p
}

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_gradebookd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn gradebookd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({
        "id": id,
        "method": method,
        "params": params,
    });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");

    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    assert!(!line.trim().is_empty(), "empty response for {}", method);
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn request_ok(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let value = request(stdin, reader, id, method, params);
    assert!(
        value.get("ok").and_then(|v| v.as_bool()).unwrap_or(false),
        "{} failed: {}",
        method,
        value
    );
    value.get("result").cloned().unwrap_or_else(|| json!({}))
}

#[test]
fn exported_bundle_restores_into_a_fresh_workspace() {
    let source_workspace = temp_dir("gradebook-backup-src");
    let target_workspace = temp_dir("gradebook-backup-dst");
    let bundle_path = temp_dir("gradebook-backup-out").join("bundle.zip");

    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": source_workspace.to_string_lossy() }),
    );
    let created = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "groups.create",
        json!({ "group": { "name": "Bundled", "teacherId": "1", "studentIds": ["1"] } }),
    );
    let group_id = created
        .get("group")
        .and_then(|g| g.get("id"))
        .and_then(|v| v.as_str())
        .expect("group id")
        .to_string();

    let exported = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "backup.export",
        json!({ "outPath": bundle_path.to_string_lossy() }),
    );
    assert_eq!(
        exported.get("bundleFormat").and_then(|v| v.as_str()),
        Some("gradebook-workspace-v1")
    );
    assert!(bundle_path.is_file());

    let imported = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "backup.import",
        json!({
            "inPath": bundle_path.to_string_lossy(),
            "workspacePath": target_workspace.to_string_lossy()
        }),
    );
    assert_eq!(
        imported
            .get("bundleFormatDetected")
            .and_then(|v| v.as_str()),
        Some("gradebook-workspace-v1")
    );

    // Selecting the restored workspace shows the bundled data.
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "workspace.select",
        json!({ "path": target_workspace.to_string_lossy() }),
    );
    let groups = request_ok(&mut stdin, &mut reader, "6", "groups.list", json!({}));
    let groups = groups
        .get("groups")
        .and_then(|v| v.as_array())
        .cloned()
        .expect("groups array");
    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups[0].get("id").and_then(|v| v.as_str()),
        Some(group_id.as_str())
    );
    assert_eq!(
        groups[0].get("name").and_then(|v| v.as_str()),
        Some("Bundled")
    );
}

#[test]
fn import_rejects_a_non_bundle_file() {
    let workspace = temp_dir("gradebook-backup-reject");
    let bogus = temp_dir("gradebook-backup-bogus").join("not-a-bundle.zip");
    std::fs::write(&bogus, b"plain text, no zip signature").expect("write bogus file");

    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let resp = request(
        &mut stdin,
        &mut reader,
        "1",
        "backup.import",
        json!({
            "inPath": bogus.to_string_lossy(),
            "workspacePath": workspace.to_string_lossy()
        }),
    );
    assert_eq!(resp.get("ok").and_then(|v| v.as_bool()), Some(false));
    assert_eq!(
        resp.get("error")
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str()),
        Some("import_failed")
    );
}

#[test]
fn export_without_a_workspace_is_rejected() {
    let out = temp_dir("gradebook-backup-nows").join("bundle.zip");
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let resp = request(
        &mut stdin,
        &mut reader,
        "1",
        "backup.export",
        json!({ "outPath": out.to_string_lossy() }),
    );
    assert_eq!(resp.get("ok").and_then(|v| v.as_bool()), Some(false));
    assert_eq!(
        resp.get("error")
            .and_then(|e| e.get("code"))
            .and_then(|v| v.as_str()),
        Some("no_workspace")
    );
}
