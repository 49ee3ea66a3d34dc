use std::path::PathBuf;
use std::process::Command;
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

#[test]
fn add_writes_task_to_store() {
    let store = temp_path("cli-add.json");

    let output = taskmaster(&store)
        .args(["add", "Buy milk"])
        .output()
        .expect("failed to run add command");

    let raw = std::fs::read_to_string(&store).expect("store file written");
    std::fs::remove_file(&store).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Task added: Buy milk"));
    assert!(stdout.contains("total 1 | completed 0 | pending 1"));

    let parsed: serde_json::Value = serde_json::from_str(&raw).expect("store holds JSON");
    let tasks = parsed.as_array().expect("store holds an array");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["text"], "Buy milk");
    assert_eq!(tasks[0]["completed"], false);
    assert!(tasks[0]["id"].as_str().unwrap().starts_with("task-"));
    assert!(tasks[0]["createdAt"].as_str().unwrap().contains('T'));
}

#[test]
fn add_trims_surrounding_whitespace() {
    let store = temp_path("cli-add-trim.json");

    let output = taskmaster(&store)
        .args(["add", "  spaced out  "])
        .output()
        .expect("failed to run add command");

    let raw = std::fs::read_to_string(&store).expect("store file written");
    std::fs::remove_file(&store).ok();

    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed[0]["text"], "spaced out");
}

#[test]
fn add_rejects_blank_text() {
    let store = temp_path("cli-add-blank.json");

    let output = taskmaster(&store)
        .args(["add", "   "])
        .output()
        .expect("failed to run add command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("empty_text"));
    assert!(!store.exists());
}

#[test]
fn add_json_outputs_task_without_banners() {
    let store = temp_path("cli-add-json.json");

    let output = taskmaster(&store)
        .args(["--json", "add", "Walk dog"])
        .output()
        .expect("failed to run add command");

    std::fs::remove_file(&store).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("Task added"));

    let task: serde_json::Value = serde_json::from_str(stdout.trim()).expect("json output");
    assert_eq!(task["text"], "Walk dog");
    assert_eq!(task["completed"], false);
    assert_eq!(task["status"], "pending");
}
