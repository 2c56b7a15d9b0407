//! CLI end-to-end tests.
//!
//! Each test runs the built binary against its own temporary data
//! directory.

use std::path::Path;
use std::process::Command;

use serde_json::Value;

struct Cli {
    dir: tempfile::TempDir,
}

impl Cli {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn data_dir(&self) -> &Path {
        self.dir.path()
    }

    /// Run a command and return (stdout, stderr, exit code).
    fn run(&self, args: &[&str]) -> (String, String, i32) {
        let output = Command::new(env!("CARGO_BIN_EXE_pomofocus"))
            .args(args)
            .env("POMOFOCUS_DATA_DIR", self.data_dir())
            .env_remove("RUST_LOG")
            .current_dir(self.data_dir())
            .output()
            .expect("failed to execute pomofocus");
        (
            String::from_utf8_lossy(&output.stdout).to_string(),
            String::from_utf8_lossy(&output.stderr).to_string(),
            output.status.code().unwrap_or(-1),
        )
    }

    fn json(&self, args: &[&str]) -> Value {
        let (stdout, stderr, code) = self.run(args);
        assert_eq!(code, 0, "{args:?} failed: {stderr}");
        serde_json::from_str(&stdout).expect("stdout is not JSON")
    }
}

fn create_thesis(cli: &Cli) -> (String, String) {
    let project = cli.json(&[
        "project",
        "create",
        "Thesis",
        "--subtask",
        "Outline:2",
        "--subtask",
        "Draft:4",
    ]);
    (
        project["id"].as_str().unwrap().to_string(),
        project["subtasks"][0]["id"].as_str().unwrap().to_string(),
    )
}

#[test]
fn project_create_and_list() {
    let cli = Cli::new();
    let (project_id, _) = create_thesis(&cli);

    let list = cli.json(&["project", "list"]);
    let projects = list.as_array().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["id"], project_id.as_str());
    assert_eq!(projects[0]["progress"]["totalSessions"], 6);
    assert_eq!(projects[0]["progress"]["progress"], 0.0);
}

#[test]
fn project_create_rejects_bad_subtask_argument() {
    let cli = Cli::new();
    let (_, _, code) = cli.run(&["project", "create", "Bad", "--subtask", "NoCount"]);
    assert_ne!(code, 0);
}

#[test]
fn adjust_accepts_negative_delta_and_rejects_below_one() {
    let cli = Cli::new();
    let (project_id, subtask_id) = create_thesis(&cli);

    let subtask = cli.json(&["project", "adjust", &project_id, &subtask_id, "+3"]);
    assert_eq!(subtask["totalSessions"], 5);
    let subtask = cli.json(&["project", "adjust", &project_id, &subtask_id, "-4"]);
    assert_eq!(subtask["totalSessions"], 1);

    let (_, stderr, code) = cli.run(&["project", "adjust", &project_id, &subtask_id, "-1"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"), "stderr: {stderr}");
}

#[test]
fn completing_work_credits_the_selected_subtask() {
    let cli = Cli::new();
    let (project_id, subtask_id) = create_thesis(&cli);

    cli.json(&["project", "select", &project_id, &subtask_id]);
    let (stdout, stderr, code) = cli.run(&["timer", "complete"]);
    assert_eq!(code, 0, "{stderr}");
    assert!(stdout.contains("PhaseCompleted"));
    assert!(stdout.contains("SubtaskProgressed"));

    let shown = cli.json(&["project", "show", &project_id]);
    assert_eq!(shown["subtasks"][0]["completedSessions"], 1);
    assert_eq!(shown["progress"]["spentTime"], 25 * 60);

    let status = cli.json(&["timer", "status"]);
    assert_eq!(status["mode"], "short_break");
    assert_eq!(status["running"], false);

    let today = cli.json(&["stats", "today"]);
    assert_eq!(today["workPhases"], 1);
    assert_eq!(today["workTime"], "00:25:00");

    let all = cli.json(&["stats", "all"]);
    assert_eq!(all["totalWorkTime"], "00:25:00");
}

#[test]
fn deselect_stops_crediting() {
    let cli = Cli::new();
    let (project_id, subtask_id) = create_thesis(&cli);
    cli.json(&["project", "select", &project_id, &subtask_id]);
    let (_, _, code) = cli.run(&["project", "deselect"]);
    assert_eq!(code, 0);

    let (stdout, _, code) = cli.run(&["timer", "complete"]);
    assert_eq!(code, 0);
    assert!(!stdout.contains("SubtaskProgressed"));
}

#[test]
fn timer_mode_and_reset() {
    let cli = Cli::new();
    let changed = cli.json(&["timer", "mode", "long-break"]);
    assert_eq!(changed["type"], "ModeChanged");
    assert_eq!(changed["to"], "long_break");
    assert_eq!(changed["remaining_secs"], 15 * 60);

    let reset = cli.json(&["timer", "reset"]);
    assert_eq!(reset["mode"], "long_break");

    let (_, _, code) = cli.run(&["timer", "mode", "nap"]);
    assert_ne!(code, 0);
}

#[test]
fn settings_set_and_show() {
    let cli = Cli::new();
    let updated = cli.json(&["settings", "set", "--work", "50", "--sessions-before-long-break", "3"]);
    assert_eq!(updated["workDuration"], 50);
    assert_eq!(updated["shortBreakDuration"], 5);

    let shown = cli.json(&["settings", "show"]);
    assert_eq!(shown["sessionsBeforeLongBreak"], 3);

    let (_, _, code) = cli.run(&["settings", "set"]);
    assert_ne!(code, 0);
    let (_, _, code) = cli.run(&["settings", "set", "--work", "0"]);
    assert_ne!(code, 0);
}

#[test]
fn export_then_merge_into_another_store() {
    let source = Cli::new();
    let (project_id, _) = create_thesis(&source);
    let exported = source.json(&["data", "export", "--output", "-"]);
    assert_eq!(exported["summary"]["totalProjects"], 1);

    let target = Cli::new();
    let file = target.data_dir().join("incoming.json");
    std::fs::write(&file, exported.to_string()).unwrap();

    let file = file.to_str().unwrap();
    let event = target.json(&["data", "import", file, "--mode", "merge"]);
    assert_eq!(event["type"], "DataImported");
    assert_eq!(event["projects_added"], 1);

    let again = target.json(&["data", "import", file, "--mode", "merge"]);
    assert_eq!(again["projects_added"], 0);
    assert_eq!(again["projects_skipped"], 1);

    let list = target.json(&["project", "list"]);
    assert_eq!(list[0]["id"], project_id.as_str());
}

#[test]
fn export_writes_default_file_name() {
    let cli = Cli::new();
    let (_, stderr, code) = cli.run(&["data", "export"]);
    assert_eq!(code, 0, "{stderr}");
    let written: Vec<_> = std::fs::read_dir(cli.data_dir())
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .filter(|name| name.starts_with("pomodoro-data-") && name.ends_with(".json"))
        .collect();
    assert_eq!(written.len(), 1);
}

#[test]
fn import_rejects_payload_without_projects() {
    let cli = Cli::new();
    create_thesis(&cli);
    let file = cli.data_dir().join("bad.json");
    std::fs::write(&file, r#"{"settings": {"workDuration": 10}}"#).unwrap();

    let (_, stderr, code) = cli.run(&["data", "import", file.to_str().unwrap(), "--mode", "replace"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
    assert_eq!(cli.json(&["project", "list"]).as_array().unwrap().len(), 1);
    assert_eq!(cli.json(&["settings", "show"])["workDuration"], 25);
}

#[test]
fn config_get_set_reset() {
    let cli = Cli::new();
    let (stdout, _, code) = cli.run(&["config", "get", "timer.auto_start_breaks"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "true");

    let (_, _, code) = cli.run(&["config", "set", "reporting.utc_offset_minutes", "-300"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = cli.run(&["config", "get", "reporting.utc_offset_minutes"]);
    assert_eq!(stdout.trim(), "-300");

    let (_, _, code) = cli.run(&["config", "get", "timer.nope"]);
    assert_ne!(code, 0);

    cli.run(&["config", "reset"]);
    let listed = cli.json(&["config", "list"]);
    assert_eq!(listed["reporting"]["utc_offset_minutes"], 180);
}

#[test]
fn completions_are_generated() {
    let cli = Cli::new();
    let (stdout, _, code) = cli.run(&["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("pomofocus"));
}
