//! The shipped template tree, compiled into the binary.

use stacksprint_core::{
    application::{ApplicationError, TemplateFailure, ports::TemplateProvider},
    domain::stack::TemplateContext,
    error::StackSprintResult,
};

use crate::renderer::render_source;

macro_rules! embed {
    ($path:literal) => {
        ($path, include_str!(concat!("../../../../templates/", $path)))
    };
}

/// Sorted by logical path.
static EMBEDDED: &[(&str, &str)] = &[
    embed!("common/README.md.tmpl"),
    embed!("go/Dockerfile.tmpl"),
    embed!("go/Makefile.tmpl"),
    embed!("go/ci.yml.tmpl"),
    embed!("go/fiber/main.go.tmpl"),
    embed!("go/gin/main.go.tmpl"),
    embed!("go/gitignore.tmpl"),
    embed!("go/go.mod.tmpl"),
    embed!("node/Dockerfile.tmpl"),
    embed!("node/Makefile.tmpl"),
    embed!("node/ci.yml.tmpl"),
    embed!("node/express/index.js.tmpl"),
    embed!("node/fastify/index.js.tmpl"),
    embed!("node/gitignore.tmpl"),
    embed!("node/package.json.tmpl"),
    embed!("python/Dockerfile.tmpl"),
    embed!("python/Makefile.tmpl"),
    embed!("python/ci.yml.tmpl"),
    embed!("python/django/manage.py.tmpl"),
    embed!("python/django/settings.py.tmpl"),
    embed!("python/django/urls.py.tmpl"),
    embed!("python/fastapi/main.py.tmpl"),
    embed!("python/gitignore.tmpl"),
    embed!("python/requirements.txt.tmpl"),
];

/// Provider over the templates that ship with StackSprint.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedTemplates;

impl EmbeddedTemplates {
    pub fn new() -> Self {
        Self
    }

    /// Raw template text, for `list --templates` and tests.
    pub fn source(&self, logical_path: &str) -> Option<&'static str> {
        EMBEDDED
            .binary_search_by(|(path, _)| (*path).cmp(logical_path))
            .ok()
            .map(|idx| EMBEDDED[idx].1)
    }
}

impl TemplateProvider for EmbeddedTemplates {
    fn render(&self, logical_path: &str, context: &TemplateContext) -> StackSprintResult<String> {
        let source = self.source(logical_path).ok_or_else(|| {
            ApplicationError::template(
                logical_path,
                TemplateFailure::NotFound,
                "not among the built-in templates",
            )
        })?;
        render_source(logical_path, source, context)
    }

    fn list(&self) -> StackSprintResult<Vec<String>> {
        Ok(EMBEDDED.iter().map(|(path, _)| (*path).to_string()).collect())
    }
}
