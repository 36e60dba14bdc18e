//! Provisioning scripts that recreate a [`FileTree`] on disk.
//!
//! Both scripts create every directory before any file, overwrite files
//! unconditionally and tolerate existing paths, so running them twice leaves
//! the same result as running them once.

use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::domain::{
    entities::FileTree,
    rules::NormalizedSpec,
    stack::DEFAULT_PROJECT_NAME,
    value_objects::RootMode,
};

/// Where the scripts put the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Create `<name>` under the working directory and enter it.
    New { name: String, git_init: bool },
    /// Enter an existing directory.
    Existing { path: String },
}

impl Placement {
    pub fn from_spec(spec: &NormalizedSpec) -> Self {
        let root = &spec.root;
        match root.mode {
            RootMode::New => {
                let name = match root.name.trim() {
                    "" => DEFAULT_PROJECT_NAME,
                    name => name,
                };
                Self::New {
                    name: name.to_string(),
                    git_init: root.git_init,
                }
            }
            RootMode::Existing => {
                let path = match root.path.trim() {
                    "" => ".",
                    path => path,
                };
                Self::Existing {
                    path: path.to_string(),
                }
            }
        }
    }

    fn git_init(&self) -> bool {
        matches!(self, Self::New { git_init: true, .. })
    }
}

/// The POSIX and PowerShell renditions of one tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scripts {
    pub posix: String,
    pub powershell: String,
}

pub fn synthesize(tree: &FileTree, placement: &Placement) -> Scripts {
    Scripts {
        posix: posix(tree, placement),
        powershell: powershell(tree, placement),
    }
}

// ── POSIX sh ─────────────────────────────────────────────────────────────────

/// Single-quote for sh: `'` becomes `'\''`, everything else is literal.
fn sh_quote(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', r"'\''"))
}

pub fn posix(tree: &FileTree, placement: &Placement) -> String {
    let mut out = String::from("#!/usr/bin/env sh\n# Generated by stacksprint. Safe to re-run.\nset -eu\n\n");

    match placement {
        Placement::New { name, .. } => {
            let name = sh_quote(name);
            out.push_str(&format!("mkdir -p -- {name}\ncd -- {name}\n"));
        }
        Placement::Existing { path } => {
            out.push_str(&format!("cd -- {}\n", sh_quote(path)));
        }
    }

    if !tree.directories().is_empty() {
        out.push('\n');
    }
    for dir in tree.directories() {
        out.push_str(&format!("mkdir -p -- {}\n", sh_quote(dir)));
    }

    if !tree.files().is_empty() {
        out.push('\n');
    }
    for (path, content) in tree.files() {
        out.push_str(&format!(
            "printf '%s' {} > {}\n",
            sh_quote(content),
            sh_quote(path)
        ));
    }

    if placement.git_init() {
        out.push_str(
            "\nif [ ! -d .git ] && command -v git >/dev/null 2>&1; then\n  git init -q\nfi\n",
        );
    }
    out
}

// ── PowerShell ───────────────────────────────────────────────────────────────

/// Single-quote for PowerShell: `'` is doubled.
fn ps_quote(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', "''"))
}

/// File bodies travel as base64 so no encoding or newline conversion of the
/// script itself can alter them.
pub fn powershell(tree: &FileTree, placement: &Placement) -> String {
    let mut out = String::from(
        "# Generated by stacksprint. Safe to re-run.\n$ErrorActionPreference = 'Stop'\n\n",
    );

    match placement {
        Placement::New { name, .. } => {
            let name = ps_quote(name);
            out.push_str(&format!(
                "New-Item -ItemType Directory -Force -Path {name} | Out-Null\nSet-Location -LiteralPath {name}\n"
            ));
        }
        Placement::Existing { path } => {
            out.push_str(&format!("Set-Location -LiteralPath {}\n", ps_quote(path)));
        }
    }

    out.push_str(
        "$root = (Get-Location).ProviderPath\n\
         \n\
         function Write-ScaffoldFile([string]$Path, [string]$Content) {\n    \
             [System.IO.File]::WriteAllBytes((Join-Path $root $Path), [Convert]::FromBase64String($Content))\n\
         }\n",
    );

    if !tree.directories().is_empty() {
        out.push('\n');
    }
    for dir in tree.directories() {
        out.push_str(&format!(
            "New-Item -ItemType Directory -Force -Path (Join-Path $root {}) | Out-Null\n",
            ps_quote(dir)
        ));
    }

    if !tree.files().is_empty() {
        out.push('\n');
    }
    for (path, content) in tree.files() {
        out.push_str(&format!(
            "Write-ScaffoldFile {} '{}'\n",
            ps_quote(path),
            STANDARD.encode(content.as_bytes())
        ));
    }

    if placement.git_init() {
        out.push_str(
            "\nif (-not (Test-Path -LiteralPath '.git') -and (Get-Command git -ErrorAction SilentlyContinue)) {\n    git init -q\n}\n",
        );
    }
    out
}
