//! Generator - the engine entry point.
//!
//! One call runs the whole pipeline: normalize, build the tree, synthesize
//! both scripts and derive the decision trace. Nothing is written to disk.

use tracing::{info, instrument};

use crate::{
    application::{ports::TemplateProvider, services::TreeBuilder},
    domain::{
        entities::{GenerationResult, ProjectSpec},
        explain::explain,
        rules,
        scripts::{Placement, synthesize},
    },
    error::StackSprintResult,
};

pub struct Generator {
    templates: Box<dyn TemplateProvider>,
}

impl Generator {
    pub fn new(templates: Box<dyn TemplateProvider>) -> Self {
        Self { templates }
    }

    pub fn templates(&self) -> &dyn TemplateProvider {
        self.templates.as_ref()
    }

    #[instrument(skip_all, fields(language = %spec.language))]
    pub fn generate(&self, spec: ProjectSpec) -> StackSprintResult<GenerationResult> {
        let normalized = rules::normalize(spec)?;
        let tree = TreeBuilder::new(self.templates.as_ref()).build(&normalized.spec)?;

        let scripts = synthesize(&tree, &Placement::from_spec(&normalized.spec));
        let decisions = explain(&normalized.spec, &tree, &normalized.warnings);

        info!(
            files = tree.file_count(),
            directories = tree.directory_count(),
            warnings = normalized.warnings.len(),
            "Scaffold generated"
        );

        Ok(GenerationResult {
            file_paths: tree.file_paths(),
            tree,
            bash_script: scripts.posix,
            powershell_script: scripts.powershell,
            warnings: normalized.warnings,
            decisions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::MockTemplateProvider;
    use crate::domain::value_objects::{Database, Framework, Language};
    use crate::error::StackSprintError;

    fn generator() -> Generator {
        let mut mock = MockTemplateProvider::new();
        mock.expect_render()
            .returning(|path, _| Ok(format!("# {path}\n")));
        Generator::new(Box::new(mock))
    }

    #[test]
    fn result_is_consistent() {
        let result = generator()
            .generate(ProjectSpec::new(Language::Go).with_database(Database::Postgresql))
            .unwrap();

        assert_eq!(result.file_paths, result.tree.file_paths());
        assert!(result.bash_script.starts_with("#!/usr/bin/env sh"));
        assert!(result.powershell_script.contains("$ErrorActionPreference = 'Stop'"));
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.decisions[0].code, "rule.01");
        assert_eq!(result.decisions.last().unwrap().code, "output.tree");
    }

    #[test]
    fn same_spec_same_output() {
        let spec = ProjectSpec::new(Language::Node).with_framework(Framework::Fastify);
        let first = generator().generate(spec.clone()).unwrap();
        let second = generator().generate(spec).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn incompatible_spec_is_rejected_without_rendering() {
        let mut mock = MockTemplateProvider::new();
        mock.expect_render().never();
        let err = Generator::new(Box::new(mock))
            .generate(
                ProjectSpec::new(Language::Python)
                    .with_framework(Framework::Django)
                    .with_database(Database::Mongodb),
            )
            .unwrap_err();
        assert!(matches!(err, StackSprintError::Domain(_)));
    }

    #[test]
    fn result_serializes_to_json() {
        let result = generator().generate(ProjectSpec::new(Language::Python)).unwrap();
        let json: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();
        assert!(json["tree"]["files"]["app/main.py"].is_string());
        assert!(json["decisions"][0]["category"].is_string());
    }
}
