use serde::Serialize;
use std::fmt;

use crate::domain::entities::file_tree::FileTree;

/// Grouping for decision entries; serialized lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionCategory {
    Rule,
    Stack,
    Architecture,
    Database,
    Infra,
    Features,
    Output,
}

impl DecisionCategory {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rule => "rule",
            Self::Stack => "stack",
            Self::Architecture => "architecture",
            Self::Database => "database",
            Self::Infra => "infra",
            Self::Features => "features",
            Self::Output => "output",
        }
    }
}

impl fmt::Display for DecisionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the decision trace, e.g. `arch.microservices`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecisionEntry {
    pub code: String,
    pub category: DecisionCategory,
    pub message: String,
}

impl DecisionEntry {
    pub fn new(
        code: impl Into<String>,
        category: DecisionCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            category,
            message: message.into(),
        }
    }
}

impl fmt::Display for DecisionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Everything one generation call produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    pub file_paths: Vec<String>,
    pub tree: FileTree,
    pub bash_script: String,
    pub powershell_script: String,
    pub warnings: Vec<String>,
    pub decisions: Vec<DecisionEntry>,
}

impl GenerationResult {
    /// Pretty JSON, newline-terminated.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }
}
