mod common;

use common::{Sandbox, task_json};
use predicates::prelude::*;

#[test]
fn toggle_command_completes_then_reopens() {
    let sandbox = Sandbox::new();
    sandbox.write_tasks(serde_json::json!([task_json(
        "task-1",
        "Buy milk",
        "2099-01-01T00:00:00Z",
        false
    )]));

    sandbox
        .cmd()
        .args(["toggle", "task-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed task: Buy milk"));

    let tasks = sandbox.stored_tasks();
    assert_eq!(tasks[0]["completed"], true);
    assert!(tasks[0]["completedAt"].is_string());

    sandbox
        .cmd()
        .args(["toggle", "task-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reopened task: Buy milk"));

    let tasks = sandbox.stored_tasks();
    assert_eq!(tasks[0]["completed"], false);
    assert!(tasks[0].get("completedAt").is_none());
}

#[test]
fn edit_command_keeps_completion_state() {
    let sandbox = Sandbox::new();
    sandbox.write_tasks(serde_json::json!([task_json(
        "task-1",
        "old",
        "2000-01-01T00:00:00Z",
        true
    )]));

    sandbox
        .cmd()
        .args(["edit", "task-1", "new", "2099-06-01T12:00:00Z"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated task: new (task-1)"));

    let tasks = sandbox.stored_tasks();
    assert_eq!(tasks[0]["title"], "new");
    assert_eq!(tasks[0]["deadline"], "2099-06-01T12:00:00Z");
    assert_eq!(tasks[0]["completed"], true);
    assert_eq!(tasks[0]["completedAt"], "2025-12-02T00:00:00Z");
    assert_eq!(tasks[0]["createdAt"], "2025-12-01T00:00:00Z");
}

#[test]
fn edit_command_rejects_blank_title() {
    let sandbox = Sandbox::new();
    sandbox.write_tasks(serde_json::json!([task_json(
        "task-1",
        "old",
        "2099-01-01T00:00:00Z",
        false
    )]));

    sandbox
        .cmd()
        .args(["edit", "task-1", "  ", "2099-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ERROR: invalid_input"));

    assert_eq!(sandbox.stored_tasks()[0]["title"], "old");
}

#[test]
fn delete_command_removes_task() {
    let sandbox = Sandbox::new();
    sandbox.write_tasks(serde_json::json!([
        task_json("task-1", "first", "2099-01-01T00:00:00Z", false),
        task_json("task-2", "second", "2099-01-01T00:00:00Z", false),
    ]));

    sandbox
        .cmd()
        .args(["delete", "task-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted task: first (task-1)"));

    let tasks = sandbox.stored_tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"], "task-2");
}

#[test]
fn missing_ids_are_silent_noops() {
    let sandbox = Sandbox::new();
    sandbox.write_tasks(serde_json::json!([task_json(
        "task-1",
        "keep",
        "2099-01-01T00:00:00Z",
        false
    )]));
    let before = std::fs::read_to_string(sandbox.store_path()).unwrap();

    for args in [
        vec!["delete", "task-missing"],
        vec!["toggle", "task-missing"],
        vec!["edit", "task-missing", "new", "2099-01-01"],
        vec!["edit", "task-missing", "   ", ""],
    ] {
        sandbox
            .cmd()
            .args(&args)
            .assert()
            .success()
            .stdout(predicate::str::contains("No task with id task-missing"))
            .stderr(predicate::str::is_empty());
    }

    assert_eq!(std::fs::read_to_string(sandbox.store_path()).unwrap(), before);
}

#[test]
fn show_command_prints_details() {
    let sandbox = Sandbox::new();
    sandbox.write_tasks(serde_json::json!([task_json(
        "task-1",
        "Buy milk",
        "2000-01-01T00:00:00Z",
        false
    )]));

    sandbox
        .cmd()
        .args(["show", "task-1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Title:        Buy milk"))
        .stdout(predicate::str::contains("Status:       overdue"));
}

#[test]
fn show_command_reports_unknown_id() {
    let sandbox = Sandbox::new();
    sandbox.write_tasks(serde_json::json!([]));

    sandbox
        .cmd()
        .args(["show", "task-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ERROR: invalid_input - task not found"));
}
