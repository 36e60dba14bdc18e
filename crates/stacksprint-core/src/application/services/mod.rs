//! Application services (use case orchestrators).

pub mod generator;
pub mod materializer;
pub mod tree_builder;

pub use generator::Generator;
pub use materializer::Materializer;
pub use tree_builder::TreeBuilder;
