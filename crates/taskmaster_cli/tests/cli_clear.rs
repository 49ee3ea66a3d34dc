use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("taskmaster-{nanos}-{file_name}"))
}

fn taskmaster(store_path: &PathBuf) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_taskmaster"));
    command
        .env("TASKMASTER_STORE_PATH", store_path)
        .env("TASKMASTER_CONFIG_PATH", store_path.with_extension("config"));
    command
}

fn seed_five_tasks(store: &PathBuf) {
    // Tasks 1, 3 and 5 completed; 2 and 4 still pending.
    let content = serde_json::json!([
        {"id": "task-1", "text": "one", "completed": true, "createdAt": "2026-08-01T09:00:00Z"},
        {"id": "task-2", "text": "two", "completed": false, "createdAt": "2026-08-01T09:01:00Z"},
        {"id": "task-3", "text": "three", "completed": true, "createdAt": "2026-08-01T09:02:00Z"},
        {"id": "task-4", "text": "four", "completed": false, "createdAt": "2026-08-01T09:03:00Z"},
        {"id": "task-5", "text": "five", "completed": true, "createdAt": "2026-08-01T09:04:00Z"}
    ]);
    std::fs::write(store, serde_json::to_string_pretty(&content).unwrap()).unwrap();
}

fn stored_ids(store: &PathBuf) -> Vec<String> {
    let raw = std::fs::read_to_string(store).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    parsed
        .as_array()
        .unwrap()
        .iter()
        .map(|task| task["id"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn clear_removes_only_completed_tasks() {
    let store = temp_path("cli-clear.json");
    seed_five_tasks(&store);

    let output = taskmaster(&store)
        .args(["clear", "--yes"])
        .output()
        .expect("failed to run clear command");

    let remaining = stored_ids(&store);
    std::fs::remove_file(&store).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Cleared 3 task(s)"));
    assert_eq!(remaining, vec!["task-2".to_string(), "task-4".to_string()]);
}

#[test]
fn clear_with_no_completed_tasks_is_informational() {
    let store = temp_path("cli-clear-noop.json");
    let content = serde_json::json!([
        {"id": "task-1", "text": "still open", "completed": false, "createdAt": "2026-08-01T09:00:00Z"}
    ]);
    std::fs::write(&store, serde_json::to_string_pretty(&content).unwrap()).unwrap();

    let output = taskmaster(&store)
        .args(["clear", "--yes"])
        .output()
        .expect("failed to run clear command");

    let remaining = stored_ids(&store);
    std::fs::remove_file(&store).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No completed tasks to clear"));
    assert_eq!(remaining.len(), 1);
}

#[test]
fn clear_prompt_declined_changes_nothing() {
    let store = temp_path("cli-clear-decline.json");
    seed_five_tasks(&store);

    let mut child = taskmaster(&store)
        .args(["clear"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn clear command");
    child
        .stdin
        .as_mut()
        .expect("stdin piped")
        .write_all(b"n\n")
        .expect("write answer");
    let output = child.wait_with_output().expect("clear command exits");

    let remaining = stored_ids(&store);
    std::fs::remove_file(&store).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Delete 3 completed task(s)?"));
    assert!(stdout.contains("Aborted"));
    assert_eq!(remaining.len(), 5);
}

#[test]
fn clear_prompt_accepted_removes_completed() {
    let store = temp_path("cli-clear-accept.json");
    seed_five_tasks(&store);

    let mut child = taskmaster(&store)
        .args(["clear"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn clear command");
    child
        .stdin
        .as_mut()
        .expect("stdin piped")
        .write_all(b"y\n")
        .expect("write answer");
    let output = child.wait_with_output().expect("clear command exits");

    let remaining = stored_ids(&store);
    std::fs::remove_file(&store).ok();

    assert!(output.status.success());
    assert_eq!(remaining.len(), 2);
}

#[test]
fn clear_all_empties_the_slot() {
    let store = temp_path("cli-clear-all.json");
    seed_five_tasks(&store);

    let output = taskmaster(&store)
        .args(["clear", "--all", "--yes"])
        .output()
        .expect("failed to run clear command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Cleared 5 task(s)"));
    assert!(!store.exists());
}
