//! Integration tests for the `dl` CLI.
//!
//! Each test creates a temp data directory, runs `dl -C <dir>` as a
//! subprocess, and verifies stdout and/or file contents.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Get the path to the built `dl` binary.
fn dl_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("dl");
    path
}

/// Run `dl` against the data directory, returning (stdout, stderr, success).
fn run_dl(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(dl_bin())
        .arg("-C")
        .arg(dir)
        .args(args)
        .output()
        .expect("failed to run dl");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `dl` expecting success, return stdout.
fn run_dl_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_dl(dir, args);
    if !success {
        panic!(
            "dl {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

/// Run `dl` expecting failure, return stderr.
fn run_dl_err(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_dl(dir, args);
    if success {
        panic!("dl {:?} unexpectedly succeeded:\nstdout: {}", args, stdout);
    }
    stderr
}

const DAY: &str = "2024-01-02";

/// Add a task on [`DAY`] and return its id
fn add_task(dir: &Path, title: &str) -> String {
    run_dl_ok(dir, &["-d", DAY, "add", title]).trim().to_string()
}

fn list_json(dir: &Path, date: &str) -> serde_json::Value {
    let out = run_dl_ok(dir, &["--json", "-d", date, "list"]);
    serde_json::from_str(&out).unwrap()
}

// ---------------------------------------------------------------------------
// Daily tasks
// ---------------------------------------------------------------------------

#[test]
fn test_add_then_list() {
    let dir = TempDir::new().unwrap();
    let id = add_task(dir.path(), "Buy milk");
    assert_eq!(id.len(), 36);

    let out = run_dl_ok(dir.path(), &["-d", DAY, "list"]);
    assert!(out.starts_with("== Tue Jan 02 2024 =="));
    assert!(out.contains(&format!("[ ] {} Buy milk", &id[..8])));
    assert!(dir.path().join("app-todos-02.01.2024.json").exists());
}

#[test]
fn test_list_empty_day() {
    let dir = TempDir::new().unwrap();
    let out = run_dl_ok(dir.path(), &["-d", "2020-01-01", "list"]);
    assert!(out.contains("You had nothing to do on Wed Jan 01 2020"));
}

#[test]
fn test_list_json() {
    let dir = TempDir::new().unwrap();
    run_dl_ok(dir.path(), &["-d", DAY, "add", "Buy milk", "--desc", "two liters"]);

    let day = list_json(dir.path(), DAY);
    assert_eq!(day["date"], "2024-01-02");
    let tasks = day["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Buy milk");
    assert_eq!(tasks[0]["description"], "two liters");
    assert_eq!(tasks[0]["done"], false);
    assert_eq!(tasks[0]["scope"], "daily");
}

#[test]
fn test_tasks_stay_on_their_day() {
    let dir = TempDir::new().unwrap();
    add_task(dir.path(), "Buy milk");
    let next = list_json(dir.path(), "2024-01-03");
    assert!(next["tasks"].as_array().unwrap().is_empty());
}

#[test]
fn test_days_lists_stored_dates() {
    let dir = TempDir::new().unwrap();
    run_dl_ok(dir.path(), &["-d", "2024-01-05", "add", "later"]);
    add_task(dir.path(), "earlier");
    run_dl_ok(dir.path(), &["add", "not a day", "--global"]);
    let out = run_dl_ok(dir.path(), &["--json", "days"]);
    let days: Vec<String> = serde_json::from_str(&out).unwrap();
    assert_eq!(days, vec!["2024-01-02", "2024-01-05"]);
}

#[test]
fn test_toggle_twice_restores() {
    let dir = TempDir::new().unwrap();
    let id = add_task(dir.path(), "Buy milk");
    let short = &id[..8];

    let out = run_dl_ok(dir.path(), &["-d", DAY, "toggle", short]);
    assert_eq!(out.trim(), format!("{} done", short));
    let out = run_dl_ok(dir.path(), &["-d", DAY, "toggle", &id]);
    assert_eq!(out.trim(), format!("{} open", short));
    assert_eq!(list_json(dir.path(), DAY)["tasks"][0]["done"], false);
}

#[test]
fn test_edit_fields() {
    let dir = TempDir::new().unwrap();
    let id = add_task(dir.path(), "Buy milk");
    run_dl_ok(
        dir.path(),
        &["-d", DAY, "edit", &id, "--title", "Buy oat milk", "--done", "true"],
    );
    let task = &list_json(dir.path(), DAY)["tasks"][0];
    assert_eq!(task["title"], "Buy oat milk");
    assert_eq!(task["done"], true);
}

#[test]
fn test_edit_without_changes_fails() {
    let dir = TempDir::new().unwrap();
    let id = add_task(dir.path(), "Buy milk");
    let err = run_dl_err(dir.path(), &["-d", DAY, "edit", &id]);
    assert!(err.starts_with("error: nothing to change"));
}

#[test]
fn test_blank_title_rejected() {
    let dir = TempDir::new().unwrap();
    let err = run_dl_err(dir.path(), &["-d", DAY, "add", "   "]);
    assert_eq!(err.trim(), "error: title is required");
}

#[test]
fn test_unknown_id_is_an_error() {
    let dir = TempDir::new().unwrap();
    add_task(dir.path(), "Buy milk");
    let err = run_dl_err(dir.path(), &["-d", DAY, "rm", "nope"]);
    assert_eq!(err.trim(), "error: task not found: nope");
    let err = run_dl_err(dir.path(), &["-d", DAY, "toggle", "nope"]);
    assert_eq!(err.trim(), "error: task not found: nope");
}

#[test]
fn test_rm_removes_and_logs() {
    let dir = TempDir::new().unwrap();
    let id = add_task(dir.path(), "Buy milk");
    let out = run_dl_ok(dir.path(), &["-d", DAY, "rm", &id]);
    assert_eq!(out.trim(), format!("removed {} Buy milk", &id[..8]));
    assert!(list_json(dir.path(), DAY)["tasks"].as_array().unwrap().is_empty());

    let log: serde_json::Value =
        serde_json::from_str(&run_dl_ok(dir.path(), &["--json", "recovery"])).unwrap();
    let entries = log.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["category"], "delete");
    assert!(entries[0]["body"].as_str().unwrap().contains("Buy milk"));
}

#[test]
fn test_invalid_date_flag() {
    let dir = TempDir::new().unwrap();
    let err = run_dl_err(dir.path(), &["-d", "someday", "list"]);
    assert!(err.contains("invalid date 'someday'"));
}

#[test]
fn test_relative_date_flag() {
    let dir = TempDir::new().unwrap();
    run_dl_ok(dir.path(), &["-d", "+1", "add", "Tomorrow's thing"]);
    let tomorrow = list_json(dir.path(), "tomorrow");
    assert_eq!(tomorrow["tasks"][0]["title"], "Tomorrow's thing");
    assert!(list_json(dir.path(), "today")["tasks"].as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Corrupt data
// ---------------------------------------------------------------------------

#[test]
fn test_corrupt_day_resets_and_is_logged() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("app-todos-02.01.2024.json");
    fs::write(&file, "not json {{{").unwrap();

    let out = run_dl_ok(dir.path(), &["-d", DAY, "list"]);
    assert!(out.contains("You had nothing to do on Tue Jan 02 2024"));
    assert!(!file.exists());

    let log = fs::read_to_string(dir.path().join(".recovery.log")).unwrap();
    assert!(log.contains("parser"));
    assert!(log.contains("not json {{{"));
}

#[test]
fn test_invalid_entry_dropped_keeps_the_rest() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("app-todos-02.01.2024.json"),
        r#"[{"id":"a1","title":"Good","isCompleted":false},{"oops":true}]"#,
    )
    .unwrap();

    let day = list_json(dir.path(), DAY);
    let tasks = day["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"], "a1");
}

// ---------------------------------------------------------------------------
// Global tasks
// ---------------------------------------------------------------------------

#[test]
fn test_global_task_visible_from_today() {
    let dir = TempDir::new().unwrap();
    run_dl_ok(dir.path(), &["add", "--global", "Renew passport"]);

    let out = run_dl_ok(dir.path(), &["list"]);
    assert!(out.contains("-- Global --"));
    assert!(out.contains("Renew passport"));

    // Created today, so not visible on a day long past
    let past = list_json(dir.path(), "2000-01-01");
    assert!(past["global"].as_array().unwrap().is_empty());
}

#[test]
fn test_global_toggle_stamps_finished() {
    let dir = TempDir::new().unwrap();
    let id = run_dl_ok(dir.path(), &["add", "--global", "Renew passport"])
        .trim()
        .to_string();
    run_dl_ok(dir.path(), &["toggle", "--global", &id]);

    let global = &list_json(dir.path(), "today")["global"][0];
    assert_eq!(global["done"], true);
    assert!(global["created_at"].is_string());
    assert!(global["finished_at"].is_string());

    // Daily scope does not see global ids
    let err = run_dl_err(dir.path(), &["rm", &id]);
    assert!(err.contains("task not found"));
    run_dl_ok(dir.path(), &["rm", "--global", &id]);
}

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

#[test]
fn test_tag_add_and_duplicate() {
    let dir = TempDir::new().unwrap();
    let id = run_dl_ok(dir.path(), &["tag", "add", "work", "--color", "blue"]);
    assert_eq!(id.trim().len(), 36);

    let out = run_dl_ok(dir.path(), &["tag", "add", "Work"]);
    assert_eq!(out.trim(), "tag Work already exists");

    let tags: serde_json::Value =
        serde_json::from_str(&run_dl_ok(dir.path(), &["--json", "tag", "list"])).unwrap();
    let tags = tags.as_array().unwrap();
    assert_eq!(tags.len(), 1);
    assert_eq!(tags[0]["name"], "WORK");
    assert_eq!(tags[0]["color"], "blue");
}

#[test]
fn test_tag_validation() {
    let dir = TempDir::new().unwrap();
    let err = run_dl_err(dir.path(), &["tag", "add", "x"]);
    assert!(err.contains("tag name must be 2 to 24 characters"));
    let err = run_dl_err(dir.path(), &["tag", "add", "none"]);
    assert!(err.contains("reserved"));
    let err = run_dl_err(dir.path(), &["tag", "add", "home", "--color", "magenta"]);
    assert!(err.contains("unknown color"));
}

#[test]
fn test_tagged_task_and_tag_removal() {
    let dir = TempDir::new().unwrap();
    run_dl_ok(dir.path(), &["tag", "add", "home", "--color", "green"]);
    run_dl_ok(dir.path(), &["-d", DAY, "add", "Water plants", "--tag", "home"]);

    let out = run_dl_ok(dir.path(), &["-d", DAY, "list"]);
    assert!(out.contains("Water plants #HOME"));

    let out = run_dl_ok(dir.path(), &["tag", "rm", "home"]);
    assert_eq!(out.trim(), "removed tag HOME");
    let task = &list_json(dir.path(), DAY)["tasks"][0];
    assert!(task.get("tag").is_none());
}

#[test]
fn test_unknown_tag_on_add() {
    let dir = TempDir::new().unwrap();
    let err = run_dl_err(dir.path(), &["-d", DAY, "add", "Water plants", "--tag", "garden"]);
    assert!(err.contains("tag not found: garden"));
}

#[test]
fn test_tag_edit() {
    let dir = TempDir::new().unwrap();
    run_dl_ok(dir.path(), &["tag", "add", "home", "--color", "green"]);
    let out = run_dl_ok(dir.path(), &["tag", "edit", "home", "--name", "house", "--color", "red"]);
    assert!(out.contains("HOUSE"));
    assert!(out.contains("red"));
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[test]
fn test_search_titles_case_insensitive() {
    let dir = TempDir::new().unwrap();
    let id = add_task(dir.path(), "Buy milk");
    add_task(dir.path(), "Call mom");

    let out = run_dl_ok(dir.path(), &["-d", DAY, "search", "MILK"]);
    assert_eq!(out.trim(), format!("[day] [ ] {} Buy milk", &id[..8]));
}

#[test]
fn test_search_json_reports_field_and_spans() {
    let dir = TempDir::new().unwrap();
    run_dl_ok(dir.path(), &["tag", "add", "errands"]);
    run_dl_ok(dir.path(), &["-d", DAY, "add", "Buy milk", "--tag", "errands"]);

    let out = run_dl_ok(dir.path(), &["--json", "-d", DAY, "search", "milk|errand"]);
    let hits: serde_json::Value = serde_json::from_str(&out).unwrap();
    let hits = hits.as_array().unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0]["field"], "title");
    assert_eq!(hits[0]["spans"], serde_json::json!([[4, 8]]));
    assert_eq!(hits[1]["field"], "tag");
    assert_eq!(hits[1]["title"], "Buy milk");
}

#[test]
fn test_search_invalid_regex() {
    let dir = TempDir::new().unwrap();
    run_dl_err(dir.path(), &["search", "("]);
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

#[test]
fn test_theme_show_set_toggle() {
    let dir = TempDir::new().unwrap();
    assert_eq!(run_dl_ok(dir.path(), &["theme"]).trim(), "dark");
    assert_eq!(run_dl_ok(dir.path(), &["theme", "light"]).trim(), "light");

    let config = fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(config.contains("theme = \"light\""));

    assert_eq!(run_dl_ok(dir.path(), &["theme", "toggle"]).trim(), "dark");
    assert_eq!(run_dl_ok(dir.path(), &["theme"]).trim(), "dark");
    run_dl_err(dir.path(), &["theme", "blue"]);
}

#[test]
fn test_theme_keeps_other_settings() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("config.toml"),
        "# personal\n[tags]\nuppercase_names = false\n",
    )
    .unwrap();
    run_dl_ok(dir.path(), &["theme", "light"]);
    let config = fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(config.starts_with("# personal\n[tags]\nuppercase_names = false\n"));

    // Lowercase names are kept as typed when uppercasing is off
    run_dl_ok(dir.path(), &["tag", "add", "work"]);
    let out = run_dl_ok(dir.path(), &["tag", "list"]);
    assert!(out.contains("work"));
}
