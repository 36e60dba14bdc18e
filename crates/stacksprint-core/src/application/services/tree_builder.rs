//! Tree Builder - assembles the in-memory file tree for a normalized spec.
//!
//! Assembly order: stack plan (skeleton, entry, CRUD, database, infra,
//! features, outputs), then autopilot boilerplate, then user customizations.
//! Later writes win on path collisions.

use tracing::{debug, instrument};

use crate::{
    application::{ApplicationError, ports::TemplateProvider},
    domain::{
        autopilot,
        entities::{CustomOptions, FileTree, RelativePath},
        rules::NormalizedSpec,
        stack::{self, Artifact},
    },
    error::StackSprintResult,
};

pub struct TreeBuilder<'a> {
    templates: &'a dyn TemplateProvider,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(templates: &'a dyn TemplateProvider) -> Self {
        Self { templates }
    }

    /// Build the complete tree. Any template or autopilot failure aborts the
    /// whole build; no partial tree is returned.
    #[instrument(skip_all, fields(framework = %spec.framework(), architecture = %spec.architecture))]
    pub fn build(&self, spec: &NormalizedSpec) -> StackSprintResult<FileTree> {
        let mut tree = FileTree::new();

        for planned in stack::plan(spec)? {
            match planned.artifact {
                Artifact::Dir(_) => tree.add_dir(&planned.path)?,
                Artifact::File { content, .. } => tree.add_file(&planned.path, content)?,
                Artifact::Template {
                    template, context, ..
                } => {
                    let content = self.templates.render(&template, &context)?;
                    tree.add_file(&planned.path, content)?;
                }
            }
        }
        debug!(files = tree.file_count(), "Stack artifacts staged");

        let boilerplate = autopilot::select(spec).map_err(|e| ApplicationError::Autopilot {
            reason: e.to_string(),
        })?;
        for unit in boilerplate {
            tree.add_file(&unit.path, unit.content.into_owned())?;
        }

        apply_customizations(&mut tree, &spec.custom)?;
        debug!(
            files = tree.file_count(),
            directories = tree.directory_count(),
            "Tree assembled"
        );
        Ok(tree)
    }
}

/// Removals first, then additions, so an explicitly added path survives a
/// removal of its parent folder.
fn apply_customizations(tree: &mut FileTree, custom: &CustomOptions) -> StackSprintResult<()> {
    for folder in &custom.remove_folders {
        let removed = tree.remove_prefix(&RelativePath::parse(folder)?);
        debug!(folder = %folder, removed, "Folder removed");
    }
    for file in &custom.remove_files {
        if !tree.remove_file(&RelativePath::parse(file)?) {
            debug!(file = %file, "Requested file removal matched nothing");
        }
    }
    for folder in &custom.add_folders {
        tree.add_dir(&RelativePath::parse(folder)?)?;
    }
    for file in &custom.add_files {
        tree.add_file(&RelativePath::parse(&file.path)?, file.content.clone())?;
    }
    Ok(())
}
