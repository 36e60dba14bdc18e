//! End-to-end generation against the shipped templates.

use pretty_assertions::assert_eq;
use stacksprint_adapters::{DirectoryTemplates, EmbeddedTemplates};
use stacksprint_core::{
    application::Generator,
    domain::{
        Architecture, Database, Framework, GenerationResult, Language, ProjectSpec,
        ServiceCommunication, Toggle, autopilot,
    },
};

fn generate(spec: ProjectSpec) -> GenerationResult {
    Generator::new(Box::new(EmbeddedTemplates::new()))
        .generate(spec)
        .unwrap()
}

fn from_json(json: &str) -> ProjectSpec {
    serde_json::from_str(json).unwrap()
}

// ── Matrix ───────────────────────────────────────────────────────────────────

#[test]
fn every_framework_and_architecture_renders() {
    for framework in Framework::ALL {
        for architecture in Architecture::ALL {
            let spec = ProjectSpec::new(framework.language())
                .with_framework(framework)
                .with_architecture(architecture);
            let result = generate(spec);

            assert!(!result.tree.is_empty(), "{framework}/{architecture}");
            assert!(
                result.tree.contains_file("docker-compose.yaml"),
                "{framework}/{architecture} has no compose file"
            );
        }
    }
}

#[test]
fn directory_and_embedded_providers_agree() {
    let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../templates");
    let spec = from_json(r#"{ "language": "node", "framework": "fastify", "db": "postgresql" }"#);

    let from_disk = Generator::new(Box::new(DirectoryTemplates::new(&root).unwrap()))
        .generate(spec.clone())
        .unwrap();
    assert_eq!(from_disk, generate(spec));
}

// ── Scenarios ────────────────────────────────────────────────────────────────

#[test]
fn go_gin_postgres_gets_autopilot_and_serial_bootstrap() {
    let result = generate(
        ProjectSpec::new(Language::Go)
            .with_framework(Framework::Gin)
            .with_database(Database::Postgresql),
    );

    for path in autopilot::paths_for(Framework::Gin) {
        assert!(result.tree.contains_file(path), "missing {path}");
    }
    let init = result.tree.get("db/init.sql").unwrap();
    assert!(init.contains("SERIAL PRIMARY KEY"));
    assert!(!init.contains("AUTO_INCREMENT"));
}

#[test]
fn mysql_bootstrap_uses_auto_increment() {
    let result = generate(ProjectSpec::new(Language::Node).with_database(Database::Mysql));

    for path in ["db/init.sql", "db/migrations/001_init.sql"] {
        let sql = result.tree.get(path).unwrap();
        assert!(sql.contains("AUTO_INCREMENT"), "{path}");
        assert!(!sql.contains("SERIAL PRIMARY KEY"), "{path}");
    }
}

#[test]
fn django_with_mysql_installs_pymysql_shim() {
    let result = generate(
        ProjectSpec::new(Language::Python)
            .with_framework(Framework::Django)
            .with_database(Database::Mysql),
    );
    let shim = result
        .tree
        .files()
        .iter()
        .find(|(path, _)| path.ends_with("config/__init__.py"))
        .map(|(_, content)| content.as_str())
        .unwrap();
    assert!(shim.contains("install_as_MySQLdb"));
}

#[test]
fn django_with_mongodb_is_rejected() {
    let err = Generator::new(Box::new(EmbeddedTemplates::new()))
        .generate(
            ProjectSpec::new(Language::Python)
                .with_framework(Framework::Django)
                .with_database(Database::Mongodb),
        )
        .unwrap_err();
    assert!(err.is_validation());
}

#[test]
fn node_nats_client_lands_under_messaging() {
    let result = generate(from_json(
        r#"{ "language": "node", "infra": { "nats": true } }"#,
    ));
    assert!(result.tree.contains_file("src/messaging/natsClient.js"));
    assert!(
        result
            .decisions
            .iter()
            .any(|d| d.code == "infra.enabled" && d.message.contains("nats"))
    );
}

// ── Microservices ────────────────────────────────────────────────────────────

#[test]
fn node_microservices_replicate_per_service() {
    let mut spec = ProjectSpec::new(Language::Node)
        .with_architecture(Architecture::Microservices)
        .with_service("users", 9001)
        .with_service("orders", 9002);
    spec.service_communication = Some(ServiceCommunication::Http);
    let result = generate(spec);

    for service in ["users", "orders"] {
        for path in autopilot::paths_for(Framework::Express) {
            let full = format!("services/{service}/{path}");
            assert!(result.tree.contains_file(&full), "missing {full}");
        }
        assert!(result.tree.contains_file(&format!("services/{service}/Dockerfile")));
    }
    for path in autopilot::paths_for(Framework::Express) {
        assert!(!result.tree.contains_file(path), "root copy of {path}");
    }
    assert!(
        result
            .decisions
            .iter()
            .any(|d| d.code == "arch.microservices" && d.message.contains("2 services"))
    );
}

#[test]
fn disabling_env_drops_service_env_references_from_both_scripts() {
    let mut spec = ProjectSpec::new(Language::Go)
        .with_architecture(Architecture::Microservices)
        .with_service("users", 9001)
        .with_service("orders", 9002);
    spec.file_toggles.env = Toggle::Off;
    let result = generate(spec);

    for service in ["users", "orders"] {
        let reference = format!("./services/{service}/.env");
        assert!(!result.tree.contains_file(&format!("services/{service}/.env")));
        assert!(!result.bash_script.contains(&reference));
        // PowerShell carries contents base64-encoded; check the decoded compose file.
        assert!(!result.tree.get("docker-compose.yaml").unwrap().contains(&reference));
        assert!(!result.powershell_script.contains(&format!("services/{service}/.env'")));
    }
}

// ── Determinism ──────────────────────────────────────────────────────────────

#[test]
fn identical_specs_produce_identical_results() {
    let json = r#"{
        "language": "python",
        "framework": "fastapi",
        "architecture": "hexagonal",
        "db": "postgres",
        "use_orm": true,
        "infra": { "redis": true, "kafka": true },
        "features": { "jwt_auth": true, "swagger": true, "github_actions_ci": true, "makefile": true },
        "custom": { "models": [{ "name": "Order", "fields": [{ "name": "total", "type": "float" }] }] }
    }"#;
    let first = generate(from_json(json));
    let second = generate(from_json(json));

    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}

#[test]
fn file_paths_mirror_the_tree() {
    let result = generate(from_json(r#"{ "language": "go", "framework": "fiber" }"#));
    let keys: Vec<String> = result.tree.files().keys().cloned().collect();
    assert_eq!(result.file_paths, keys);
}
