//! Integration tests for stacksprint-core.
//!
//! The engine is driven through its public API with a stub template provider
//! that echoes the logical path and the context keys it was given.

use proptest::prelude::*;
use stacksprint_core::{
    application::ports::TemplateProvider,
    domain::{
        Architecture, Database, Framework, Language, ProjectSpec, autopilot, normalize,
        stack::TemplateContext,
    },
    error::StackSprintResult,
    prelude::Generator,
};

struct Echo;

impl TemplateProvider for Echo {
    fn render(&self, logical_path: &str, context: &TemplateContext) -> StackSprintResult<String> {
        let keys: Vec<&str> = context.keys().collect();
        Ok(format!("{logical_path} [{}]\n", keys.join(",")))
    }

    fn list(&self) -> StackSprintResult<Vec<String>> {
        Ok(Vec::new())
    }
}

fn generator() -> Generator {
    Generator::new(Box::new(Echo))
}

#[test]
fn monoliths_never_carry_services() {
    for framework in Framework::ALL {
        for architecture in [Architecture::Mvp, Architecture::Clean, Architecture::Hexagonal] {
            let result = generator()
                .generate(
                    ProjectSpec::new(framework.language())
                        .with_framework(framework)
                        .with_architecture(architecture)
                        .with_service("ignored", 9000),
                )
                .unwrap();

            assert!(
                result.file_paths.iter().all(|p| !p.starts_with("services/")),
                "{framework}/{architecture}"
            );
            for path in autopilot::paths_for(framework) {
                assert!(result.tree.contains_file(path), "{framework}: {path}");
            }
        }
    }
}

#[test]
fn microservices_get_four_units_per_service() {
    let result = generator()
        .generate(
            ProjectSpec::new(Language::Python)
                .with_architecture(Architecture::Microservices)
                .with_service("billing", 9001)
                .with_service("users", 9002)
                .with_service("search", 9003),
        )
        .unwrap();

    let units = autopilot::paths_for(Framework::FastApi);
    assert_eq!(units.len(), 4);
    for service in ["billing", "users", "search"] {
        for path in &units {
            assert!(result.tree.contains_file(&format!("services/{service}/{path}")));
        }
    }
}

#[test]
fn trace_ends_with_tree_summary() {
    let result = generator()
        .generate(ProjectSpec::new(Language::Go).with_database(Database::Mysql))
        .unwrap();
    let last = result.decisions.last().unwrap();

    assert_eq!(last.code, "output.tree");
    assert_eq!(
        last.message,
        format!(
            "Generated {} files and {} directories.",
            result.tree.file_count(),
            result.tree.directory_count()
        )
    );
}

#[test]
fn django_mongodb_fails_before_any_rendering() {
    assert!(
        generator()
            .generate(
                ProjectSpec::new(Language::Python)
                    .with_framework(Framework::Django)
                    .with_database(Database::Mongodb),
            )
            .is_err()
    );
}

fn arb_spec() -> impl Strategy<Value = ProjectSpec> {
    (
        prop::sample::select(Framework::ALL.to_vec()),
        prop::sample::select(Architecture::ALL.to_vec()),
        prop::sample::select(Database::ALL.to_vec()),
        any::<bool>(),
        any::<(bool, bool, bool)>(),
    )
        .prop_map(|(framework, architecture, db, use_orm, (redis, kafka, nats))| {
            let mut spec = ProjectSpec::new(framework.language())
                .with_framework(framework)
                .with_architecture(architecture)
                .with_database(db);
            spec.use_orm = use_orm;
            spec.infra.redis = redis;
            spec.infra.kafka = kafka;
            spec.infra.nats = nats;
            spec
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn generation_is_deterministic(spec in arb_spec()) {
        let first = generator().generate(spec.clone());
        let second = generator().generate(spec);
        match (first, second) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
            (Err(a), Err(b)) => prop_assert_eq!(a.to_string(), b.to_string()),
            _ => prop_assert!(false, "outcomes diverged"),
        }
    }

    #[test]
    fn normalized_spec_is_a_fixed_point(spec in arb_spec()) {
        if let Ok(once) = normalize(spec) {
            let twice = normalize(once.spec.as_spec().clone()).unwrap();
            prop_assert!(twice.warnings.is_empty());
            prop_assert_eq!(twice.spec.as_spec(), once.spec.as_spec());
        }
    }
}
