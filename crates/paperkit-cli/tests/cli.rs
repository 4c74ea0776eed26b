use std::path::Path;

use assert_cmd::Command;
use predicates::str::contains;

const TOOL_SCHEMA: &str = r#"{
    "$schema": "http://json-schema.org/draft-07/schema#",
    "type": "object",
    "required": ["name", "description"],
    "properties": {
        "name": { "type": "string" },
        "description": { "type": "string" }
    }
}"#;

const ENV_OVERRIDES: [&str; 9] = [
    "PAPERKIT_SCHEMA_PATH",
    "PAPERKIT_AGENT_SCHEMA_PATH",
    "PAPERKIT_AGENTS_DIR",
    "PAPERKIT_WORKFLOW_SCHEMA_PATH",
    "PAPERKIT_WORKFLOWS_DIR",
    "PAPERKIT_TOOL_SCHEMA_PATH",
    "PAPERKIT_TOOLS_DIR",
    "PAPERKIT_COMMAND_SCHEMA_PATH",
    "PAPERKIT_COMMANDS_DIR",
];

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn project(tools: &[(&str, &str)]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), ".paper/_cfg/schemas/tool-schema.json", TOOL_SCHEMA);
    std::fs::create_dir_all(dir.path().join(".paper/_cfg/tools")).unwrap();
    for (file, content) in tools {
        write(dir.path(), &format!(".paper/_cfg/tools/{file}"), content);
    }
    dir
}

fn cmd(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("paperkit-validate").unwrap();
    for var in ENV_OVERRIDES {
        cmd.env_remove(var);
    }
    cmd.arg("--project-root").arg(root);
    cmd
}

#[test]
fn valid_tools_exit_zero() {
    let dir = project(&[("lint.yaml", "name: lint\ndescription: Lints.\n")]);
    cmd(dir.path())
        .arg("tools")
        .assert()
        .code(0)
        .stdout(contains("Tool Schema Validation"))
        .stdout(contains("✓ All tools validated successfully"));
}

#[test]
fn invalid_tool_exits_one_and_lenient_exits_zero() {
    let dir = project(&[
        ("lint.yaml", "name: lint\ndescription: Lints.\n"),
        ("fmt.yaml", "name: fmt\n"),
    ]);
    cmd(dir.path())
        .arg("tools")
        .assert()
        .code(1)
        .stdout(contains("fmt"))
        .stdout(contains("INVALID"))
        .stdout(contains("⚠ Validation failed with 1 invalid tool(s)"));

    cmd(dir.path()).args(["--lenient", "tools"]).assert().code(0);
}

#[test]
fn missing_schema_is_fatal() {
    let dir = project(&[("lint.yaml", "name: lint\ndescription: Lints.\n")]);
    cmd(dir.path())
        .args(["tools", "--schema", "nowhere.json"])
        .assert()
        .code(2)
        .stderr(contains("Error:"));
}

#[test]
fn ci_and_lenient_conflict() {
    let dir = project(&[]);
    cmd(dir.path())
        .args(["--ci", "--lenient", "tools"])
        .assert()
        .failure();
}

#[test]
fn named_tool_not_found() {
    let dir = project(&[("lint.yaml", "name: lint\ndescription: Lints.\n")]);
    cmd(dir.path())
        .args(["tools", "--tool", "ghost"])
        .assert()
        .code(1)
        .stdout(contains("Tool 'ghost' not found"));
}
