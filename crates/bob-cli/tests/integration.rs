#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn bob(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("bob").unwrap();
    cmd.current_dir(dir.path())
        .env("BOB_ROOT", dir.path())
        .env_remove("RUST_LOG")
        .env_remove("OPENAI_API_KEY")
        .env_remove("ANTHROPIC_API_KEY")
        .env_remove("GROQ_API_KEY");
    cmd
}

fn init_project(dir: &TempDir) {
    bob(dir).arg("init").assert().success();
}

fn read(dir: &TempDir, name: &str) -> String {
    std::fs::read_to_string(dir.path().join(name)).unwrap()
}

fn yaml(dir: &TempDir, name: &str) -> serde_yaml::Value {
    serde_yaml::from_str(&read(dir, name)).unwrap()
}

fn add_objective(dir: &TempDir, title: &str, description: &str, priority: &str) {
    bob(dir)
        .args(["objectives", "add", "--title", title])
        .args(["--description", description, "--priority", priority])
        .assert()
        .success();
}

/// Point the ollama provider at a mock server that answers every chat
/// request with `reply`.
fn mock_ollama(dir: &TempDir, server: &mut mockito::Server, reply: &str) -> mockito::Mock {
    bob(dir)
        .args(["llm", "set", "ollama", "base_url", server.url().as_str()])
        .assert()
        .success();
    let body = serde_json::json!({
        "model": "llama2",
        "message": {"role": "assistant", "content": reply},
        "done": true,
    });
    server
        .mock("POST", "/api/chat")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create()
}

// ---------------------------------------------------------------------------
// bob init
// ---------------------------------------------------------------------------

#[test]
fn init_creates_project_layout() {
    let dir = TempDir::new().unwrap();
    bob(&dir)
        .args(["init", "--name", "notes", "--language", "rust"])
        .assert()
        .success()
        .stdout(predicate::str::contains("created: bob_config.json"));

    assert!(dir.path().join("src").is_dir());
    assert!(dir.path().join("tests").is_dir());
    assert!(dir.path().join("docs").is_dir());
    assert!(dir.path().join("llm_config.json").exists());
    assert!(read(&dir, "README.md").starts_with("# notes"));

    let config: serde_json::Value = serde_json::from_str(&read(&dir, "bob_config.json")).unwrap();
    assert_eq!(config["project_name"], "notes");
    assert_eq!(config["language"], "rust");
    assert_eq!(config["ai_provider"], "ollama");
    assert_eq!(config["max_test_retries"], 3);
}

#[test]
fn init_is_idempotent() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    bob(&dir)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("exists:  bob_config.json"));

    let gitignore = read(&dir, ".gitignore");
    assert_eq!(gitignore.matches("llm_config.json").count(), 1);
}

#[test]
fn init_rejects_unknown_provider() {
    let dir = TempDir::new().unwrap();
    bob(&dir)
        .args(["init", "--ai-provider", "bard"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported provider 'bard'"));
    assert!(!dir.path().join("bob_config.json").exists());
}

// ---------------------------------------------------------------------------
// bob config
// ---------------------------------------------------------------------------

#[test]
fn config_requires_init() {
    let dir = TempDir::new().unwrap();
    bob(&dir)
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("run 'bob init'"));
}

#[test]
fn config_set_and_reset() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    bob(&dir)
        .args(["config", "set", "--ai-provider", "groq", "--max-retries", "5"])
        .assert()
        .success();
    bob(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("groq"));

    bob(&dir)
        .args(["config", "set", "--max-retries", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be at least 1"));

    bob(&dir)
        .args(["config", "reset", "--yes"])
        .assert()
        .success();
    let config: serde_json::Value = serde_json::from_str(&read(&dir, "bob_config.json")).unwrap();
    assert_eq!(config["ai_provider"], "ollama");
    assert_eq!(config["max_test_retries"], 3);
}

#[test]
fn config_reset_without_confirmation_keeps_settings() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    bob(&dir)
        .args(["config", "set", "--ai-provider", "anthropic"])
        .assert()
        .success();

    bob(&dir)
        .args(["config", "reset"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Aborted."));
    let config: serde_json::Value = serde_json::from_str(&read(&dir, "bob_config.json")).unwrap();
    assert_eq!(config["ai_provider"], "anthropic");
}

// ---------------------------------------------------------------------------
// bob llm
// ---------------------------------------------------------------------------

#[test]
fn llm_get_masks_api_key() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    bob(&dir)
        .args(["llm", "set", "openai", "api_key", "sk-abcdefghijklmnop"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sk-abcde..."))
        .stdout(predicate::str::contains("ijklmnop").not());

    bob(&dir)
        .args(["llm", "get", "openai"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sk-abcde..."))
        .stdout(predicate::str::contains("ijklmnop").not());

    let stored: serde_json::Value = serde_json::from_str(&read(&dir, "llm_config.json")).unwrap();
    assert_eq!(stored["providers"]["openai"]["api_key"], "sk-abcdefghijklmnop");
}

#[test]
fn llm_set_rejects_unknown_key() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    bob(&dir)
        .args(["llm", "set", "openai", "temperature", "0.1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("valid keys are"));
}

#[test]
fn llm_use_updates_both_configs() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    bob(&dir).args(["llm", "use", "anthropic"]).assert().success();

    let llm: serde_json::Value = serde_json::from_str(&read(&dir, "llm_config.json")).unwrap();
    let project: serde_json::Value =
        serde_json::from_str(&read(&dir, "bob_config.json")).unwrap();
    assert_eq!(llm["ai_provider"], "anthropic");
    assert_eq!(project["ai_provider"], "anthropic");
}

#[test]
fn llm_test_checks_configuration_without_network() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);

    bob(&dir)
        .args(["llm", "test"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Provider 'ollama' is configured."));

    bob(&dir)
        .args(["--provider", "openai", "llm", "test"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("OPENAI_API_KEY"));

    bob(&dir)
        .args(["--provider", "openai", "llm", "test"])
        .env("OPENAI_API_KEY", "sk-from-env")
        .assert()
        .success();
}

// ---------------------------------------------------------------------------
// bob objectives
// ---------------------------------------------------------------------------

#[test]
fn objectives_add_list_remove() {
    let dir = TempDir::new().unwrap();
    add_objective(&dir, "Login", "Users can sign in", "high");
    add_objective(&dir, "Export", "CSV export of reports", "LOW");

    bob(&dir)
        .args(["objectives", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Login"))
        .stdout(predicate::str::contains("Export"));

    let before = yaml(&dir, "bob_objectives.yaml");
    let second = before["objectives"][1].clone();

    bob(&dir)
        .args(["objectives", "remove", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed objective 1: Login"));

    let after = yaml(&dir, "bob_objectives.yaml");
    let list = after["objectives"].as_sequence().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0], second);
    assert_eq!(list[0]["priority"], "low");
}

#[test]
fn objectives_remove_out_of_range_changes_nothing() {
    let dir = TempDir::new().unwrap();
    add_objective(&dir, "Login", "Users can sign in", "high");
    let before = read(&dir, "bob_objectives.yaml");

    bob(&dir)
        .args(["objectives", "remove", "3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no objective at index 3"));
    assert_eq!(read(&dir, "bob_objectives.yaml"), before);
}

#[test]
fn objectives_list_json() {
    let dir = TempDir::new().unwrap();
    add_objective(&dir, "Login", "Users can sign in", "medium");

    let output = bob(&dir)
        .args(["objectives", "list", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(json[0]["title"], "Login");
    assert_eq!(json[0]["priority"], "medium");
    assert!(json[0].get("added_at").is_some());
}

#[test]
fn objectives_import_file() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("objs.yaml");
    std::fs::write(
        &file,
        "- title: Search\n  description: Full-text search\n  priority: high\n\
         - title: Tags\n  description: Tag notes\n  priority: medium\n",
    )
    .unwrap();

    bob(&dir)
        .args(["objectives", "add", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 2 objectives"));

    let doc = yaml(&dir, "bob_objectives.yaml");
    assert_eq!(doc["objectives"].as_sequence().unwrap().len(), 2);
}

#[test]
fn objectives_import_invalid_file_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("objs.yaml");
    std::fs::write(
        &file,
        "- title: Search\n  description: ok\n  priority: high\n- title: Tags\n  priority: low\n",
    )
    .unwrap();

    bob(&dir)
        .args(["objectives", "add", "--file"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("objective 2 must have title"));
    assert!(!dir.path().join("bob_objectives.yaml").exists());
}

#[test]
fn objectives_interactive_add() {
    let dir = TempDir::new().unwrap();
    bob(&dir)
        .args(["objectives", "add"])
        .write_stdin("Login\nUsers can sign in\nhigh\n:done\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 1 objective"));

    let doc = yaml(&dir, "bob_objectives.yaml");
    assert_eq!(doc["objectives"][0]["title"], "Login");
}

#[test]
fn objectives_add_keeps_entries_from_older_file() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    std::fs::write(
        dir.path().join("bob_objectives.yaml"),
        "objectives:\n- title: Login\n  description: Users can sign in\n  priority: High\n  added_at: '2024-05-01T10:00:00.123456'\ncreated_at: ''\nupdated_at: ''\n",
    )
    .unwrap();

    add_objective(&dir, "Export", "CSV export", "low");

    let doc = yaml(&dir, "bob_objectives.yaml");
    let objectives = doc["objectives"].as_sequence().unwrap();
    assert_eq!(objectives.len(), 2);
    assert_eq!(objectives[0]["title"], "Login");
    assert_eq!(objectives[0]["priority"], "high");
    assert_eq!(objectives[1]["title"], "Export");
}

#[test]
fn objectives_clear() {
    let dir = TempDir::new().unwrap();
    add_objective(&dir, "Login", "Users can sign in", "high");
    bob(&dir)
        .args(["objectives", "clear", "--yes"])
        .assert()
        .success();
    assert!(!dir.path().join("bob_objectives.yaml").exists());
}

// ---------------------------------------------------------------------------
// bob chat
// ---------------------------------------------------------------------------

#[test]
fn chat_single_message() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    let mut server = mockito::Server::new();
    let mock = mock_ollama(&dir, &mut server, "Hello from the model");

    bob(&dir)
        .args(["chat", "hello", "there"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hello from the model"));
    mock.assert();
}

#[test]
fn chat_unsupported_provider_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    bob(&dir)
        .args(["--provider", "chatgpt", "chat", "hi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported provider 'chatgpt'"));
}

#[test]
fn chat_missing_api_key_fails_before_sending() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    bob(&dir)
        .args(["--provider", "groq", "chat", "hi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GROQ_API_KEY"));
}

#[test]
fn chat_json_without_message_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    bob(&dir)
        .args(["--json", "chat"])
        .write_stdin("hello\n")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("--json needs a message"));
}

// ---------------------------------------------------------------------------
// bob stories / design / build
// ---------------------------------------------------------------------------

#[test]
fn stories_require_objectives() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    bob(&dir)
        .args(["stories", "generate", "--no-interactive"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no objectives found"));
    assert!(!dir.path().join("bob_userstories.yaml").exists());
}

#[test]
fn stories_generate_saves_batch_with_snapshot() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    add_objective(&dir, "Login", "Users can sign in", "high");
    let mut server = mockito::Server::new();
    let _mock = mock_ollama(&dir, &mut server, "1. As a user, I want to sign in");

    bob(&dir)
        .args(["stories", "generate", "--no-interactive"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved as batch 1"));

    let doc = yaml(&dir, "bob_userstories.yaml");
    let batch = &doc["user_stories"][0];
    assert_eq!(batch["stories"], "1. As a user, I want to sign in");
    assert_eq!(batch["objectives_snapshot"][0]["title"], "Login");
    assert!(batch["refined_stories"].as_sequence().unwrap().is_empty());
    assert!(doc.get("created_at").is_some());
}

#[test]
fn stories_generate_interactive_refinement() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    add_objective(&dir, "Login", "Users can sign in", "high");
    let mut server = mockito::Server::new();
    let _mock = mock_ollama(&dir, &mut server, "As a user, I want to sign in");

    bob(&dir)
        .args(["stories", "generate"])
        .write_stdin("y\nadd an admin story\nn\n")
        .assert()
        .success();

    let doc = yaml(&dir, "bob_userstories.yaml");
    let refined = doc["user_stories"][0]["refined_stories"].as_sequence().unwrap();
    assert_eq!(refined.len(), 1);
    assert_eq!(refined[0]["refinement_prompt"], "add an admin story");
}

#[test]
fn provider_error_leaves_files_untouched() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    add_objective(&dir, "Login", "Users can sign in", "high");
    let mut server = mockito::Server::new();
    bob(&dir)
        .args(["llm", "set", "ollama", "base_url", server.url().as_str()])
        .assert()
        .success();
    let _mock = server
        .mock("POST", "/api/chat")
        .with_status(500)
        .with_body("model not loaded")
        .create();

    bob(&dir)
        .args(["stories", "generate", "--no-interactive"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("HTTP 500"));
    assert!(!dir.path().join("bob_userstories.yaml").exists());
}

#[test]
fn full_pipeline_to_tests_and_docs() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    add_objective(&dir, "Login", "Users can sign in", "high");
    let mut server = mockito::Server::new();
    let _mock = mock_ollama(&dir, &mut server, "class AuthService:\n    def login(self): ...");

    bob(&dir)
        .args(["stories", "generate", "--no-interactive"])
        .assert()
        .success();
    bob(&dir)
        .args(["design", "generate", "--no-interactive"])
        .assert()
        .success();

    let design = yaml(&dir, "bob_design.yaml");
    let entry = &design["designs"][0];
    assert_eq!(entry["user_stories_snapshot"].as_sequence().unwrap().len(), 1);
    assert!(entry["design"].as_str().unwrap().contains("class AuthService"));

    bob(&dir)
        .args(["design", "refine", "rename", "to", "LoginService"])
        .assert()
        .success();
    let design = yaml(&dir, "bob_design.yaml");
    assert_eq!(
        design["designs"][0]["refined_designs"][0]["refinement_prompt"],
        "rename to LoginService"
    );

    bob(&dir)
        .args(["build", "test"])
        .assert()
        .success()
        .stdout(predicate::str::contains("tests/test_function_builder.py"));
    assert!(read(&dir, "tests/test_function_builder.py").contains("class AuthService"));

    bob(&dir)
        .args(["build", "docs", "auth"])
        .assert()
        .success();
    assert!(dir.path().join("docs/auth.md").exists());
}

#[test]
fn stories_refine_out_of_range_batch_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    add_objective(&dir, "Login", "Users can sign in", "high");
    let mut server = mockito::Server::new();
    let _mock = mock_ollama(&dir, &mut server, "As a user, I want to sign in");

    bob(&dir)
        .args(["stories", "generate", "--no-interactive"])
        .assert()
        .success();
    bob(&dir)
        .args(["stories", "refine", "shorter", "--batch", "4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no user stories entry at index 4"));
}

#[test]
fn build_without_design_fails() {
    let dir = TempDir::new().unwrap();
    init_project(&dir);
    bob(&dir)
        .args(["build", "docs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no designs found"));
}
