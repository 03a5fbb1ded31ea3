#![allow(dead_code)]

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    pub fn store_path(&self) -> PathBuf {
        self.dir.path().join("store.json")
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("config.json")
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("taskboard").expect("taskboard binary");
        cmd.env("TASKBOARD_STORE_PATH", self.store_path())
            .env("TASKBOARD_CONFIG_PATH", self.config_path())
            .env_remove("TASKBOARD_LOG");
        cmd
    }

    pub fn write_tasks(&self, tasks: serde_json::Value) {
        let content = serde_json::json!({
            "schema_version": 1,
            "entries": { "tasks": tasks }
        });
        std::fs::write(self.store_path(), serde_json::to_string_pretty(&content).unwrap())
            .unwrap();
    }

    pub fn write_config(&self, config: serde_json::Value) {
        std::fs::write(self.config_path(), serde_json::to_string(&config).unwrap()).unwrap();
    }

    pub fn stored(&self) -> serde_json::Value {
        serde_json::from_str(&std::fs::read_to_string(self.store_path()).unwrap()).unwrap()
    }

    pub fn stored_tasks(&self) -> Vec<serde_json::Value> {
        self.stored()["entries"]["tasks"]
            .as_array()
            .cloned()
            .unwrap_or_default()
    }
}

pub fn task_json(id: &str, title: &str, deadline: &str, completed: bool) -> serde_json::Value {
    let mut task = serde_json::json!({
        "id": id,
        "title": title,
        "deadline": deadline,
        "completed": completed,
        "createdAt": "2025-12-01T00:00:00Z"
    });
    if completed {
        task["completedAt"] = serde_json::json!("2025-12-02T00:00:00Z");
    }
    task
}
