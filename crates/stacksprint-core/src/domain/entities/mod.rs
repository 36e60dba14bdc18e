pub mod common;
pub mod decision;
pub mod file_tree;
pub mod spec;

pub use common::RelativePath;
pub use decision::{DecisionCategory, DecisionEntry, GenerationResult};
pub use file_tree::FileTree;
pub use spec::{
    CustomFile, CustomOptions, DataField, DataModel, FeatureOptions, FileToggles, InfraOptions,
    ProjectSpec, RootOptions, ServiceConfig,
};
