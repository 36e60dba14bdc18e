//! Byte-exact fixtures for both provisioning scripts.
//!
//! Fixtures live in `tests/golden/`. Regenerate them after an intended output
//! change with `UPDATE_GOLDEN=1 cargo test -p stacksprint-core --test script_golden`.

use std::{fs, path::PathBuf};

use pretty_assertions::assert_eq;
use stacksprint_core::domain::{FileTree, Placement, RelativePath, synthesize};

fn golden(name: &str, actual: &str) {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/golden")
        .join(name);
    if std::env::var_os("UPDATE_GOLDEN").is_some_and(|v| v == "1") {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, actual).unwrap();
        return;
    }
    let expected = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("missing fixture {}: {e}", path.display()));
    assert_eq!(expected, actual, "fixture {name} is stale");
}

fn p(s: &str) -> RelativePath {
    RelativePath::parse(s).unwrap()
}

fn tree() -> FileTree {
    let mut tree = FileTree::new();
    tree.add_file(&p("src/app.js"), "console.log('hi');\n").unwrap();
    tree.add_file(&p("README.md"), "# demo\n").unwrap();
    tree.add_dir(&p("docs/adr")).unwrap();
    tree
}

#[test]
fn scripts_match_fixtures() {
    let placement = Placement::New {
        name: "demo".into(),
        git_init: true,
    };
    let scripts = synthesize(&tree(), &placement);

    golden("scripts/scaffold.sh", &scripts.posix);
    golden("scripts/scaffold.ps1", &scripts.powershell);
}
