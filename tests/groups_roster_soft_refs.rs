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
fn roster_resolves_teacher_and_members_by_id() {
    let workspace = temp_dir("gradebook-roster");
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    // Seed data: teacher '1' is Sarah Wilson, students '1' and '3' exist.
    let created = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "groups.create",
        json!({
            "group": {
                "name": "Group A",
                "teacherId": "1",
                "studentIds": ["3", "1"]
            }
        }),
    );
    let group_id = created
        .get("group")
        .and_then(|g| g.get("id"))
        .and_then(|v| v.as_str())
        .expect("group id")
        .to_string();

    let roster = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "groups.roster",
        json!({ "id": group_id }),
    );
    assert_eq!(
        roster
            .get("teacher")
            .and_then(|t| t.get("name"))
            .and_then(|v| v.as_str()),
        Some("Sarah")
    );
    // Members come back in student-collection order, not studentIds order.
    let member_ids: Vec<&str> = roster
        .get("students")
        .and_then(|v| v.as_array())
        .expect("students array")
        .iter()
        .filter_map(|s| s.get("id").and_then(|v| v.as_str()))
        .collect();
    assert_eq!(member_ids, vec!["1", "3"]);
}

#[test]
fn roster_tolerates_dangling_teacher_reference() {
    let workspace = temp_dir("gradebook-roster-dangling");
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let created = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "groups.create",
        json!({
            "group": { "name": "Orphans", "teacherId": "no-such-teacher", "studentIds": [] }
        }),
    );
    let group_id = created
        .get("group")
        .and_then(|g| g.get("id"))
        .and_then(|v| v.as_str())
        .expect("group id")
        .to_string();

    let roster = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "groups.roster",
        json!({ "id": group_id }),
    );
    assert!(roster.get("teacher").map(|v| v.is_null()).unwrap_or(false));
    assert!(roster.get("group").map(|v| !v.is_null()).unwrap_or(false));
}

#[test]
fn deleting_a_group_never_cascades() {
    let workspace = temp_dir("gradebook-soft-delete");
    let (_child, mut stdin, mut reader) = spawn_sidecar();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "1",
        "workspace.select",
        json!({ "path": workspace.to_string_lossy() }),
    );

    let created = request_ok(
        &mut stdin,
        &mut reader,
        "2",
        "groups.create",
        json!({
            "group": { "name": "Doomed", "teacherId": "1", "studentIds": ["1"] }
        }),
    );
    let group_id = created
        .get("group")
        .and_then(|g| g.get("id"))
        .and_then(|v| v.as_str())
        .expect("group id")
        .to_string();

    // An assignment pointing at the group.
    let assignment = request_ok(
        &mut stdin,
        &mut reader,
        "3",
        "assignments.create",
        json!({
            "assignment": {
                "title": "Orphaned homework",
                "description": "",
                "groupId": group_id,
                "dueDate": "2025-01-01T00:00:00.000Z",
                "createdBy": "1"
            }
        }),
    );
    let assignment_id = assignment
        .get("assignment")
        .and_then(|a| a.get("id"))
        .and_then(|v| v.as_str())
        .expect("assignment id")
        .to_string();

    let _ = request_ok(
        &mut stdin,
        &mut reader,
        "4",
        "groups.delete",
        json!({ "id": group_id }),
    );

    // Students and assignments keep their (now dangling) references.
    let student = request_ok(
        &mut stdin,
        &mut reader,
        "5",
        "students.get",
        json!({ "id": "1" }),
    );
    assert!(student.get("student").map(|v| !v.is_null()).unwrap_or(false));

    let orphaned = request_ok(
        &mut stdin,
        &mut reader,
        "6",
        "assignments.get",
        json!({ "id": assignment_id }),
    );
    let orphaned = orphaned.get("assignment").cloned().expect("assignment");
    assert_eq!(
        orphaned.get("groupId").and_then(|v| v.as_str()),
        Some(group_id.as_str()),
        "assignment keeps pointing at the deleted group"
    );

    let roster = request_ok(
        &mut stdin,
        &mut reader,
        "7",
        "groups.roster",
        json!({ "id": group_id }),
    );
    assert!(roster.get("group").map(|v| v.is_null()).unwrap_or(false));
}
