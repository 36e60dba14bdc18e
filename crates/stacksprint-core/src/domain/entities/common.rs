use super::super::DomainError;
use serde::Serialize;
use std::fmt;

/// A slash-separated path that stays inside the project root.
///
/// Invariant: non-empty, relative, no `..` segments, no empty or `.` segments,
/// forward slashes only. Enforced at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RelativePath(String);

impl RelativePath {
    /// Parse and normalize a user-supplied path.
    ///
    /// Backslashes become forward slashes, `./` prefixes and duplicate or
    /// trailing separators are dropped.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let invalid = |reason: &str| DomainError::InvalidPath {
            path: raw.to_string(),
            reason: reason.to_string(),
        };

        let unified = raw.trim().replace('\\', "/");
        if unified.is_empty() {
            return Err(invalid("path is empty"));
        }
        if unified.starts_with('/') {
            return Err(invalid("absolute paths are not allowed"));
        }
        if has_drive_prefix(&unified) {
            return Err(invalid("drive-qualified paths are not allowed"));
        }

        let mut segments = Vec::new();
        for segment in unified.split('/') {
            match segment {
                "" | "." => continue,
                ".." => return Err(invalid("'..' would escape the project root")),
                s => segments.push(s),
            }
        }

        if segments.is_empty() {
            return Err(invalid("path resolves to the project root"));
        }
        Ok(Self(segments.join("/")))
    }

    /// Join a child path, keeping the invariant.
    pub fn join(&self, child: &str) -> Result<Self, DomainError> {
        Self::parse(&format!("{}/{}", self.0, child))
    }

    /// All proper ancestors, nearest last (`a/b/c` → `a`, `a/b`).
    pub fn ancestors(&self) -> impl Iterator<Item = &str> {
        self.0
            .match_indices('/')
            .map(move |(idx, _)| &self.0[..idx])
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

fn has_drive_prefix(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

impl AsRef<str> for RelativePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// True when `path` equals `prefix` or lies underneath it.
pub fn is_under(path: &str, prefix: &str) -> bool {
    path == prefix
        || (path.len() > prefix.len()
            && path.starts_with(prefix)
            && path.as_bytes()[prefix.len()] == b'/')
}
