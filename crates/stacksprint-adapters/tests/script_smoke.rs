//! Run the generated provisioning scripts and compare against the tree.
//!
//! Skipped when `sh` / `pwsh` is not on `PATH`.

use std::path::Path;
use std::process::Command;

use stacksprint_adapters::EmbeddedTemplates;
use stacksprint_core::{
    application::Generator,
    domain::{GenerationResult, ProjectSpec},
};
use tempfile::TempDir;
use walkdir::WalkDir;

fn generate() -> GenerationResult {
    let spec: ProjectSpec = serde_json::from_str(
        r#"{
            "language": "node",
            "framework": "express",
            "architecture": "microservices",
            "db": "postgresql",
            "services": [{ "name": "users", "port": 9001 }, { "name": "orders", "port": 9002 }],
            "features": { "makefile": true, "github_actions_ci": true },
            "custom": { "add_files": [{ "path": "notes/it's quoted.txt", "content": "it's 100% \"fine\"\n$HOME `x`\n" }] },
            "root": { "mode": "new", "name": "demo" }
        }"#,
    )
    .unwrap();
    Generator::new(Box::new(EmbeddedTemplates::new()))
        .generate(spec)
        .unwrap()
}

fn has(program: &str, probe: &[&str]) -> bool {
    Command::new(program).args(probe).output().is_ok()
}

fn assert_matches_tree(result: &GenerationResult, root: &Path) {
    let mut on_disk: Vec<String> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    on_disk.sort();
    assert_eq!(on_disk, result.file_paths);

    for (path, content) in result.tree.files() {
        let written = std::fs::read_to_string(root.join(path)).unwrap();
        assert_eq!(&written, content, "content mismatch in {path}");
    }
    for dir in result.tree.directories() {
        assert!(root.join(dir).is_dir(), "missing directory {dir}");
    }
}

#[test]
fn posix_script_reproduces_the_tree() {
    if !has("sh", &["-c", "true"]) {
        eprintln!("sh not available; skipping");
        return;
    }
    let result = generate();
    let temp = TempDir::new().unwrap();
    let script = temp.path().join("scaffold.sh");
    std::fs::write(&script, &result.bash_script).unwrap();

    let status = Command::new("sh")
        .arg(&script)
        .current_dir(temp.path())
        .status()
        .unwrap();
    assert!(status.success());
    assert_matches_tree(&result, &temp.path().join("demo"));

    // Re-running over an existing project is harmless.
    let again = Command::new("sh")
        .arg(&script)
        .current_dir(temp.path())
        .status()
        .unwrap();
    assert!(again.success());
}

#[test]
fn powershell_script_reproduces_the_tree() {
    if !has("pwsh", &["-NoProfile", "-Command", "exit 0"]) {
        eprintln!("pwsh not available; skipping");
        return;
    }
    let result = generate();
    let temp = TempDir::new().unwrap();
    let script = temp.path().join("scaffold.ps1");
    std::fs::write(&script, &result.powershell_script).unwrap();

    let status = Command::new("pwsh")
        .args(["-NoProfile", "-NonInteractive", "-File"])
        .arg(&script)
        .current_dir(temp.path())
        .status()
        .unwrap();
    assert!(status.success());
    assert_matches_tree(&result, &temp.path().join("demo"));
}
