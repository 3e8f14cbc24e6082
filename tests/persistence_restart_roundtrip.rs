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

fn shutdown(child: Child, stdin: ChildStdin, reader: BufReader<ChildStdout>) {
    // Dropping stdin closes the pipe; the sidecar flushes and exits.
    drop(stdin);
    drop(reader);
    let mut child = child;
    let _ = child.wait();
}

#[test]
fn collections_survive_a_process_restart_deep_equal() {
    let workspace = temp_dir("gradebook-restart");

    let before;
    {
        let (child, mut stdin, mut reader) = spawn_sidecar();
        let _ = request_ok(
            &mut stdin,
            &mut reader,
            "1",
            "workspace.select",
            json!({ "path": workspace.to_string_lossy() }),
        );

        let _ = request_ok(
            &mut stdin,
            &mut reader,
            "2",
            "groups.create",
            json!({ "group": { "name": "Group A", "teacherId": "1", "studentIds": ["1", "2"] } }),
        );
        let _ = request_ok(
            &mut stdin,
            &mut reader,
            "3",
            "submissions.create",
            json!({
                "submission": {
                    "assignmentId": "1",
                    "studentId": "1",
                    "fileUrl": "file:///uploads/hw.pdf",
                    "fileName": "hw.pdf"
                }
            }),
        );
        let _ = request_ok(
            &mut stdin,
            &mut reader,
            "4",
            "grades.create",
            json!({
                "grade": {
                    "assignmentId": "1",
                    "studentId": "1",
                    "grade": 88,
                    "feedback": "good",
                    "submittedAt": "2025-01-01T00:00:00.000Z"
                }
            }),
        );

        before = (
            request_ok(&mut stdin, &mut reader, "5", "students.list", json!({})),
            request_ok(&mut stdin, &mut reader, "6", "teachers.list", json!({})),
            request_ok(&mut stdin, &mut reader, "7", "groups.list", json!({})),
            request_ok(&mut stdin, &mut reader, "8", "assignments.list", json!({})),
            request_ok(&mut stdin, &mut reader, "9", "submissions.list", json!({})),
            request_ok(&mut stdin, &mut reader, "10", "grades.list", json!({})),
        );

        shutdown(child, stdin, reader);
    }

    // Fresh process, same workspace: every collection reloads deep-equal.
    let (child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let after = (
        request_ok(&mut stdin, &mut reader, "5", "students.list", json!({})),
        request_ok(&mut stdin, &mut reader, "6", "teachers.list", json!({})),
        request_ok(&mut stdin, &mut reader, "7", "groups.list", json!({})),
        request_ok(&mut stdin, &mut reader, "8", "assignments.list", json!({})),
        request_ok(&mut stdin, &mut reader, "9", "submissions.list", json!({})),
        request_ok(&mut stdin, &mut reader, "10", "grades.list", json!({})),
    );
    assert_eq!(before, after);

    shutdown(child, stdin, reader);
}

#[test]
fn session_user_survives_restart_until_logout() {
    let workspace = temp_dir("gradebook-session-restart");

    {
        let (child, mut stdin, mut reader) = spawn_sidecar();
        let _ = request_ok(
            &mut stdin,
            &mut reader,
            "1",
            "workspace.select",
            json!({ "path": workspace.to_string_lossy() }),
        );
        let login = request_ok(
            &mut stdin,
            &mut reader,
            "2",
            "auth.login",
            json!({ "email": "jane@example.com", "password": "pw" }),
        );
        assert_eq!(
            login
                .get("user")
                .and_then(|u| u.get("email"))
                .and_then(|v| v.as_str()),
            Some("jane@example.com")
        );
        shutdown(child, stdin, reader);
    }

    let (child, mut stdin, mut reader) = spawn_sidecar();
    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );
    let session = request_ok(&mut stdin, &mut reader, "2", "auth.session", json!({}));
    assert_eq!(
        session
            .get("user")
            .and_then(|u| u.get("email"))
            .and_then(|v| v.as_str()),
        Some("jane@example.com")
    );

    let _ = request_ok(&mut stdin, &mut reader, "3", "auth.logout", json!({}));
    let cleared = request_ok(&mut stdin, &mut reader, "4", "auth.session", json!({}));
    assert!(cleared.get("user").map(|v| v.is_null()).unwrap_or(false));
    shutdown(child, stdin, reader);
}
