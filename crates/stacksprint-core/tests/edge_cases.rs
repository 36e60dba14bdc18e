//! Edge cases across the whole pipeline: path kind conflicts and re-running
//! the POSIX script over an existing root.

use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::Path,
    process::Command,
};

use pretty_assertions::assert_eq;
use stacksprint_core::{
    application::ports::TemplateProvider,
    domain::{
        Architecture, CustomFile, DomainError, Language, ProjectSpec, stack::TemplateContext,
    },
    error::{StackSprintError, StackSprintResult},
    prelude::Generator,
};
use tempfile::TempDir;

struct Fixed;

impl TemplateProvider for Fixed {
    fn render(&self, logical_path: &str, _context: &TemplateContext) -> StackSprintResult<String> {
        Ok(format!("# {logical_path}\n"))
    }

    fn list(&self) -> StackSprintResult<Vec<String>> {
        Ok(Vec::new())
    }
}

fn generate(spec: ProjectSpec) -> StackSprintResult<stacksprint_core::domain::GenerationResult> {
    Generator::new(Box::new(Fixed)).generate(spec)
}

fn demo(language: Language) -> ProjectSpec {
    let mut spec = ProjectSpec::new(language);
    spec.root.name = "demo".into();
    spec
}

// ── File / directory conflicts ───────────────────────────────────────────────

#[test]
fn folder_named_like_a_generated_file_is_rejected() {
    let mut spec = demo(Language::Go);
    spec.custom.add_folders = vec!["README.md".into()];

    let err = generate(spec).unwrap_err();
    assert!(matches!(
        err,
        StackSprintError::Domain(DomainError::InvalidPath { ref path, .. }) if path == "README.md"
    ));
}

#[test]
fn file_named_like_a_generated_folder_is_rejected() {
    let mut spec = demo(Language::Go);
    spec.custom.add_files = vec![CustomFile {
        path: "internal".into(),
        content: "x".into(),
    }];

    let err = generate(spec).unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn custom_file_and_folder_on_one_path_are_rejected_either_way() {
    let mut spec = demo(Language::Node);
    spec.custom.add_folders = vec!["notes".into()];
    spec.custom.add_files = vec![CustomFile {
        path: "notes".into(),
        content: "x".into(),
    }];
    assert!(generate(spec).unwrap_err().is_validation());

    let mut spec = demo(Language::Node);
    spec.custom.add_files = vec![CustomFile {
        path: "notes".into(),
        content: "x".into(),
    }];
    spec.custom.add_folders = vec!["notes/extra".into()];
    // Folders are added before files, so `notes` is a directory first.
    assert!(generate(spec).unwrap_err().is_validation());
}

#[test]
fn generated_trees_keep_files_and_directories_disjoint() {
    for language in Language::ALL {
        let result = generate(demo(language).with_architecture(Architecture::Microservices)).unwrap();
        let dirs = result.tree.directories();
        for path in result.tree.files().keys() {
            assert!(!dirs.contains(path), "{path} is both a file and a directory");
        }
    }
}

// ── POSIX script re-runs ─────────────────────────────────────────────────────

#[derive(Debug, PartialEq, Eq)]
struct Snapshot {
    files: BTreeMap<String, String>,
    directories: BTreeSet<String>,
}

fn snapshot(root: &Path) -> Snapshot {
    let mut snap = Snapshot {
        files: BTreeMap::new(),
        directories: BTreeSet::new(),
    };
    for entry in walkdir::WalkDir::new(root).min_depth(1) {
        let entry = entry.unwrap();
        let relative = entry
            .path()
            .strip_prefix(root)
            .unwrap()
            .to_string_lossy()
            .replace('\\', "/");
        if entry.file_type().is_dir() {
            snap.directories.insert(relative);
        } else {
            snap.files
                .insert(relative, fs::read_to_string(entry.path()).unwrap());
        }
    }
    snap
}

fn run_sh(workdir: &Path, script: &Path) -> bool {
    match Command::new("sh").arg(script).current_dir(workdir).status() {
        Ok(status) => {
            assert!(status.success(), "sh exited with {status}");
            true
        }
        Err(_) => false,
    }
}

#[test]
fn rerunning_the_posix_script_leaves_the_tree_unchanged() {
    let mut spec = demo(Language::Node).with_architecture(Architecture::Microservices);
    spec.custom.add_files = vec![CustomFile {
        path: "docs/it's here.md".into(),
        content: "quote ' and $HOME stay literal\n".into(),
    }];
    let result = generate(spec).unwrap();

    let temp = TempDir::new().unwrap();
    let script = temp.path().join("scaffold.sh");
    fs::write(&script, &result.bash_script).unwrap();
    let workdir = temp.path().join("work");
    fs::create_dir(&workdir).unwrap();

    if !run_sh(&workdir, &script) {
        eprintln!("sh not available; skipping");
        return;
    }
    let root = workdir.join("demo");
    let first = snapshot(&root);
    assert_eq!(&first.files, result.tree.files());
    assert_eq!(&first.directories, result.tree.directories());

    // A stale edit is overwritten on the second run.
    fs::write(root.join("docs/it's here.md"), "edited").unwrap();
    assert!(run_sh(&workdir, &script));
    assert_eq!(snapshot(&root), first);
}
