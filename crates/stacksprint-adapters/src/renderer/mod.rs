//! Placeholder renderer shared by every template provider.
//!
//! Syntax: `{{ key }}` with `key` matching `[A-Za-z0-9_.]+`; whitespace
//! inside the braces is ignored. `\{{` produces a literal `{{`. Nothing else
//! is special, so generated YAML, Makefiles and shell survive untouched.

use thiserror::Error;

use stacksprint_core::{
    application::{ApplicationError, TemplateFailure},
    domain::stack::TemplateContext,
    error::StackSprintResult,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("unterminated placeholder on line {line}")]
    Unterminated { line: usize },

    #[error("invalid placeholder key '{key}' on line {line}")]
    InvalidKey { key: String, line: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no value for '{key}'")]
pub struct MissingKey {
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Key(String),
}

/// A parsed template, ready to render against any context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTemplate {
    segments: Vec<Segment>,
}

impl CompiledTemplate {
    pub fn parse(source: &str) -> Result<Self, SyntaxError> {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut rest = source;

        while let Some(open) = rest.find("{{") {
            if rest[..open].ends_with('\\') {
                text.push_str(&rest[..open - 1]);
                text.push_str("{{");
                rest = &rest[open + 2..];
                continue;
            }

            text.push_str(&rest[..open]);
            let line = line_of(source, rest, open);
            let after = &rest[open + 2..];
            let close = after
                .find("}}")
                .ok_or(SyntaxError::Unterminated { line })?;

            let key = after[..close].trim();
            if !is_key(key) {
                return Err(SyntaxError::InvalidKey {
                    key: key.to_string(),
                    line,
                });
            }

            if !text.is_empty() {
                segments.push(Segment::Text(std::mem::take(&mut text)));
            }
            segments.push(Segment::Key(key.to_string()));
            rest = &after[close + 2..];
        }

        text.push_str(rest);
        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }
        Ok(Self { segments })
    }

    pub fn render(&self, context: &TemplateContext) -> Result<String, MissingKey> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Key(key) => out.push_str(context.get(key).ok_or_else(|| MissingKey {
                    key: key.clone(),
                })?),
            }
        }
        Ok(out)
    }

    /// Placeholder keys in order of appearance.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Key(key) => Some(key.as_str()),
            Segment::Text(_) => None,
        })
    }
}

/// Parse and render `source`, mapping failures to the template error kinds.
pub fn render_source(
    logical_path: &str,
    source: &str,
    context: &TemplateContext,
) -> StackSprintResult<String> {
    let template = CompiledTemplate::parse(source).map_err(|e| {
        ApplicationError::template(logical_path, TemplateFailure::Parse, e.to_string())
    })?;
    let rendered = template.render(context).map_err(|e| {
        ApplicationError::template(logical_path, TemplateFailure::Render, e.to_string())
    })?;
    Ok(rendered)
}

fn is_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

/// 1-based line of `rest[offset]` within `source`.
fn line_of(source: &str, rest: &str, offset: usize) -> usize {
    let absolute = source.len() - rest.len() + offset;
    source[..absolute].matches('\n').count() + 1
}
