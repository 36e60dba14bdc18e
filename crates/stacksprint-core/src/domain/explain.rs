//! Decision trace: an ordered, namespaced account of what a generation did.

use crate::domain::{
    entities::{DecisionCategory, DecisionEntry, FileTree},
    rules::NormalizedSpec,
    value_objects::Toggle,
};

/// Build the trace for a normalized spec and the tree generated from it.
///
/// Order: rule warnings, stack, architecture, database, infra, features,
/// one entry per output toggle, tree size.
pub fn explain(spec: &NormalizedSpec, tree: &FileTree, warnings: &[String]) -> Vec<DecisionEntry> {
    let mut out: Vec<DecisionEntry> = warnings
        .iter()
        .enumerate()
        .map(|(i, warning)| {
            DecisionEntry::new(format!("rule.{:02}", i + 1), DecisionCategory::Rule, warning.clone())
        })
        .collect();

    out.push(DecisionEntry::new(
        "stack.core",
        DecisionCategory::Stack,
        format!(
            "Language={}, Framework={}, Architecture={}.",
            spec.language,
            spec.framework(),
            spec.architecture
        ),
    ));

    out.push(if spec.architecture.is_microservices() {
        let communication = spec
            .service_communication
            .map(|c| c.as_str())
            .unwrap_or("http");
        DecisionEntry::new(
            "arch.microservices",
            DecisionCategory::Architecture,
            format!(
                "Generated {} services with {communication} communication.",
                spec.services.len()
            ),
        )
    } else {
        DecisionEntry::new(
            "arch.monolith",
            DecisionCategory::Architecture,
            "Generated a single-service project structure.",
        )
    });

    out.push(if spec.db.is_none() {
        DecisionEntry::new(
            "db.none",
            DecisionCategory::Database,
            "No database boilerplate generated.",
        )
    } else {
        let orm = if spec.use_orm { "enabled" } else { "disabled" };
        DecisionEntry::new(
            "db.selected",
            DecisionCategory::Database,
            format!("Database={} with ORM {orm}.", spec.db),
        )
    });

    let infra = spec.infra.enabled();
    if !infra.is_empty() {
        out.push(DecisionEntry::new(
            "infra.enabled",
            DecisionCategory::Infra,
            format!("Enabled infra: {}.", infra.join(", ")),
        ));
    }

    let features = spec.features.enabled();
    if !features.is_empty() {
        out.push(DecisionEntry::new(
            "features.enabled",
            DecisionCategory::Features,
            format!("Enabled features: {}.", features.join(", ")),
        ));
    }

    let toggles = &spec.file_toggles;
    for (code, toggle, subject) in [
        ("output.compose", toggles.docker_compose, "docker-compose.yaml"),
        ("output.dockerfile", toggles.dockerfile, "Dockerfile boilerplate"),
        ("output.readme", toggles.readme, "README.md"),
        ("output.env", toggles.env, ".env files"),
        ("output.gitignore", toggles.gitignore, ".gitignore"),
        ("output.example_crud", toggles.example_crud, "Example CRUD scaffolding"),
    ] {
        out.push(output_entry(code, toggle, subject));
    }

    out.push(DecisionEntry::new(
        "output.tree",
        DecisionCategory::Output,
        format!(
            "Generated {} files and {} directories.",
            tree.file_count(),
            tree.directory_count()
        ),
    ));

    out
}

fn output_entry(code: &str, toggle: Toggle, subject: &str) -> DecisionEntry {
    let state = if toggle.resolve(true) { "included" } else { "excluded" };
    DecisionEntry::new(code, DecisionCategory::Output, format!("{subject} {state}."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::{ProjectSpec, RelativePath},
        rules::normalize,
        value_objects::{Architecture, Database, Language},
    };
    use pretty_assertions::assert_eq;

    fn codes(entries: &[DecisionEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.code.as_str()).collect()
    }

    #[test]
    fn microservices_trace_is_ordered() {
        let mut spec = ProjectSpec::new(Language::Go)
            .with_architecture(Architecture::Microservices)
            .with_database(Database::Postgresql)
            .with_service("users", 9001)
            .with_service("orders", 9002);
        spec.infra.redis = true;
        spec.infra.kafka = true;
        spec.features.swagger = true;
        spec.features.jwt_auth = true;
        let normalized = normalize(spec).unwrap();

        let mut tree = FileTree::new();
        tree.add_file(&RelativePath::parse("services/users/go.mod").unwrap(), "").unwrap();

        let trace = explain(&normalized.spec, &tree, &normalized.warnings);
        let mut expected: Vec<String> = (1..=normalized.warnings.len())
            .map(|i| format!("rule.{i:02}"))
            .collect();
        expected.extend(
            [
                "stack.core",
                "arch.microservices",
                "db.selected",
                "infra.enabled",
                "features.enabled",
                "output.compose",
                "output.dockerfile",
                "output.readme",
                "output.env",
                "output.gitignore",
                "output.example_crud",
                "output.tree",
            ]
            .map(String::from),
        );
        assert_eq!(codes(&trace), expected);

        let find = |code: &str| trace.iter().find(|e| e.code == code).unwrap().message.clone();
        assert_eq!(find("arch.microservices"), "Generated 2 services with http communication.");
        assert_eq!(find("db.selected"), "Database=postgresql with ORM disabled.");
        assert_eq!(find("infra.enabled"), "Enabled infra: kafka, redis.");
        assert_eq!(find("features.enabled"), "Enabled features: jwt_auth, swagger.");
        assert_eq!(find("output.tree"), "Generated 1 files and 2 directories.");
    }

    #[test]
    fn warnings_become_numbered_rule_entries() {
        let spec = normalize(ProjectSpec::new(Language::Python)).unwrap().spec;
        let warnings = vec!["first".to_string(), "second".to_string()];
        let trace = explain(&spec, &FileTree::new(), &warnings);

        assert_eq!(trace[0].code, "rule.01");
        assert_eq!(trace[0].category, DecisionCategory::Rule);
        assert_eq!(trace[1].code, "rule.02");
        assert_eq!(trace[1].message, "second");
    }

    #[test]
    fn monolith_without_extras_omits_optional_entries() {
        let spec = normalize(ProjectSpec::new(Language::Node)).unwrap().spec;
        let trace = explain(&spec, &FileTree::new(), &[]);
        let codes = codes(&trace);

        assert!(codes.contains(&"arch.monolith"));
        assert!(codes.contains(&"db.none"));
        assert!(!codes.contains(&"infra.enabled"));
        assert!(!codes.contains(&"features.enabled"));
        assert_eq!(
            trace[0].message,
            "Language=node, Framework=express, Architecture=mvp."
        );
    }

    #[test]
    fn output_toggles_report_exclusion() {
        let mut spec = ProjectSpec::new(Language::Go);
        spec.file_toggles.readme = Toggle::Off;
        let spec = normalize(spec).unwrap().spec;
        let trace = explain(&spec, &FileTree::new(), &[]);

        let readme = trace.iter().find(|e| e.code == "output.readme").unwrap();
        assert_eq!(readme.message, "README.md excluded.");
        let compose = trace.iter().find(|e| e.code == "output.compose").unwrap();
        assert_eq!(compose.message, "docker-compose.yaml included.");
    }
}
