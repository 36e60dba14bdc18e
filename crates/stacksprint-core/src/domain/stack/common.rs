//! Content shared by every stack: database bootstrap, environment files,
//! the compose file, API docs and root-level project files.

use crate::domain::{
    entities::DataModel,
    naming,
    rules::NormalizedSpec,
    value_objects::{Database, FieldType, Framework, Language, ServiceCommunication},
};

use super::{Artifact, StackProfile, TemplateContext, Unit, project_name, sql};

/// Credentials baked into the compose file and every `.env`.
const DB_USER: &str = "app";
const DB_PASSWORD: &str = "app";
const DB_NAME: &str = "app";

/// Container a database engine runs in.
struct DbServer {
    host: &'static str,
    port: u16,
    image: &'static str,
}

fn db_server(db: Database) -> Option<DbServer> {
    match db {
        Database::None => None,
        Database::Postgresql => Some(DbServer {
            host: "postgres",
            port: 5432,
            image: "postgres:16",
        }),
        Database::Mysql => Some(DbServer {
            host: "mysql",
            port: 3306,
            image: "mysql:8",
        }),
        Database::Mongodb => Some(DbServer {
            host: "mongo",
            port: 27017,
            image: "mongo:7",
        }),
    }
}

// ── Database ─────────────────────────────────────────────────────────────────

/// Schema files for the selected engine, from the declared models.
pub fn database_bootstrap(unit: &Unit<'_>) -> Vec<Artifact> {
    let db = unit.spec.db;
    let models = &unit.spec.custom.models;
    match db {
        Database::Postgresql | Database::Mysql => vec![
            Artifact::file("db/migrations/001_init.sql", sql::sample_migration(db, models)),
            Artifact::file("db/init.sql", sql::sample_db_init(db, models)),
        ],
        Database::Mongodb => vec![Artifact::file("db/mongo-init.js", sql::mongo_init(models))],
        Database::None => Vec::new(),
    }
}

/// Connection string in the form the unit's driver expects.
pub(super) fn database_url(unit: &Unit<'_>) -> Option<String> {
    let db = unit.spec.db;
    let server = db_server(db)?;
    let (host, port) = (server.host, server.port);
    let auth = format!("{DB_USER}:{DB_PASSWORD}");

    let url = match (db, unit.spec.language) {
        (Database::Mongodb, _) => format!("mongodb://{host}:{port}/{DB_NAME}"),
        (Database::Postgresql, Language::Go) => {
            format!("postgres://{auth}@{host}:{port}/{DB_NAME}?sslmode=disable")
        }
        (Database::Mysql, Language::Go) => {
            format!("{auth}@tcp({host}:{port})/{DB_NAME}?parseTime=true")
        }
        (Database::Postgresql, Language::Python) => {
            format!("postgresql+psycopg://{auth}@{host}:{port}/{DB_NAME}")
        }
        (Database::Mysql, Language::Python) => {
            format!("mysql+pymysql://{auth}@{host}:{port}/{DB_NAME}")
        }
        (Database::Postgresql, Language::Node) => {
            format!("postgres://{auth}@{host}:{port}/{DB_NAME}")
        }
        (Database::Mysql, Language::Node) => format!("mysql://{auth}@{host}:{port}/{DB_NAME}"),
        (Database::None, _) => return None,
    };
    Some(url)
}

// ── Environment ──────────────────────────────────────────────────────────────

/// Variables a unit reads at startup, in file order.
fn env_pairs(unit: &Unit<'_>) -> Vec<(&'static str, String)> {
    let spec = unit.spec;
    let mut pairs = vec![
        ("PORT", unit.port.to_string()),
        ("SERVICE_NAME", unit.name.clone()),
        ("LOG_LEVEL", "info".to_string()),
    ];

    if let (Some(url), Some(server)) = (database_url(unit), db_server(spec.db)) {
        pairs.push(("DATABASE_URL", url));
        pairs.push(("DB_HOST", server.host.to_string()));
        pairs.push(("DB_PORT", server.port.to_string()));
        pairs.push(("DB_NAME", DB_NAME.to_string()));
        if spec.db.is_sql() {
            pairs.push(("DB_USER", DB_USER.to_string()));
            pairs.push(("DB_PASSWORD", DB_PASSWORD.to_string()));
        }
    }
    if spec.infra.redis {
        pairs.push(("REDIS_URL", "redis://redis:6379/0".to_string()));
    }
    if spec.infra.kafka {
        pairs.push(("KAFKA_BROKERS", "kafka:9092".to_string()));
    }
    if spec.infra.nats {
        pairs.push(("NATS_URL", "nats://nats:4222".to_string()));
    }
    if spec.features.jwt_auth {
        pairs.push(("JWT_SECRET", "change-me".to_string()));
    }
    if unit.framework() == Framework::Django {
        pairs.push(("DJANGO_SECRET_KEY", "change-me".to_string()));
        pairs.push(("DJANGO_DEBUG", "true".to_string()));
    }
    pairs
}

/// `.env` for one unit.
pub fn env_file(unit: &Unit<'_>) -> String {
    let mut out = format!("# {} environment\n", unit.name);
    for (key, value) in env_pairs(unit) {
        out.push_str(&format!("{key}={value}\n"));
    }
    out
}

// ── Compose ──────────────────────────────────────────────────────────────────

/// Compose service name for a unit.
fn compose_name(unit: &Unit<'_>) -> String {
    if unit.is_service() {
        unit.name.clone()
    } else {
        "app".to_string()
    }
}

/// `docker-compose.yaml` with one container per unit plus backing services.
///
/// Units reference their `.env` only while the env toggle is on; otherwise
/// the same variables are inlined.
pub fn compose_file(spec: &NormalizedSpec, units: &[Unit<'_>]) -> String {
    let env_on = spec.file_toggles.env.resolve(true);
    let db = db_server(spec.db);

    let mut backing: Vec<&str> = Vec::new();
    if let Some(server) = &db {
        backing.push(server.host);
    }
    backing.extend(spec.infra.enabled());

    let mut lines = vec!["services:".to_string()];

    for unit in units {
        let dir = match &unit.mount {
            Some(mount) => format!("./{}", mount.as_str()),
            None => ".".to_string(),
        };
        lines.push(format!("  {}:", compose_name(unit)));
        lines.push(format!("    build: {dir}"));
        lines.push("    ports:".to_string());
        lines.push(format!("      - \"{0}:{0}\"", unit.port));
        if env_on {
            lines.push("    env_file:".to_string());
            lines.push(format!("      - {dir}/.env"));
        } else {
            lines.push("    environment:".to_string());
            for (key, value) in env_pairs(unit) {
                lines.push(format!("      {key}: \"{value}\""));
            }
        }
        if !backing.is_empty() {
            lines.push("    depends_on:".to_string());
            for name in &backing {
                lines.push(format!("      - {name}"));
            }
        }
    }

    if let Some(server) = &db {
        lines.push(format!("  {}:", server.host));
        lines.push(format!("    image: {}", server.image));
        lines.push("    environment:".to_string());
        match spec.db {
            Database::Postgresql => {
                lines.push(format!("      POSTGRES_USER: {DB_USER}"));
                lines.push(format!("      POSTGRES_PASSWORD: {DB_PASSWORD}"));
                lines.push(format!("      POSTGRES_DB: {DB_NAME}"));
            }
            Database::Mysql => {
                lines.push(format!("      MYSQL_USER: {DB_USER}"));
                lines.push(format!("      MYSQL_PASSWORD: {DB_PASSWORD}"));
                lines.push(format!("      MYSQL_ROOT_PASSWORD: {DB_PASSWORD}"));
                lines.push(format!("      MYSQL_DATABASE: {DB_NAME}"));
            }
            _ => lines.push(format!("      MONGO_INITDB_DATABASE: {DB_NAME}")),
        }
        lines.push("    ports:".to_string());
        lines.push(format!("      - \"{0}:{0}\"", server.port));
        lines.push("    volumes:".to_string());
        for unit in units {
            lines.extend(init_volumes(spec.db, unit));
        }
    }

    if spec.infra.redis {
        lines.push("  redis:".to_string());
        lines.push("    image: redis:7".to_string());
        lines.push("    ports:".to_string());
        lines.push("      - \"6379:6379\"".to_string());
    }
    if spec.infra.kafka {
        lines.extend(
            [
                "  kafka:",
                "    image: bitnami/kafka:3.7",
                "    environment:",
                "      KAFKA_CFG_NODE_ID: \"0\"",
                "      KAFKA_CFG_PROCESS_ROLES: controller,broker",
                "      KAFKA_CFG_LISTENERS: PLAINTEXT://:9092,CONTROLLER://:9093",
                "      KAFKA_CFG_ADVERTISED_LISTENERS: PLAINTEXT://kafka:9092",
                "      KAFKA_CFG_CONTROLLER_QUORUM_VOTERS: 0@kafka:9093",
                "      KAFKA_CFG_CONTROLLER_LISTENER_NAMES: CONTROLLER",
                "      KAFKA_CFG_LISTENER_SECURITY_PROTOCOL_MAP: CONTROLLER:PLAINTEXT,PLAINTEXT:PLAINTEXT",
                "    ports:",
                "      - \"9092:9092\"",
            ]
            .map(String::from),
        );
    }
    if spec.infra.nats {
        lines.push("  nats:".to_string());
        lines.push("    image: nats:2".to_string());
        lines.push("    ports:".to_string());
        lines.push("      - \"4222:4222\"".to_string());
    }

    lines.join("\n") + "\n"
}

/// Init scripts mounted into the database container. Files run in name
/// order, so every unit's bookkeeping table precedes the schemas.
fn init_volumes(db: Database, unit: &Unit<'_>) -> Vec<String> {
    let (src, tag) = match &unit.mount {
        Some(mount) => (format!("./{}", mount.as_str()), unit.name.as_str()),
        None => (".".to_string(), "app"),
    };
    let target = "/docker-entrypoint-initdb.d";
    if db == Database::Mongodb {
        return vec![format!(
            "      - {src}/db/mongo-init.js:{target}/00-{tag}-mongo-init.js:ro"
        )];
    }
    vec![
        format!("      - {src}/db/init.sql:{target}/00-{tag}-init.sql:ro"),
        format!("      - {src}/db/migrations/001_init.sql:{target}/01-{tag}-001_init.sql:ro"),
    ]
}

// ── API docs ─────────────────────────────────────────────────────────────────

fn openapi_type(ty: FieldType) -> (&'static str, Option<&'static str>) {
    match ty {
        FieldType::String => ("string", None),
        FieldType::Int => ("integer", Some("int64")),
        FieldType::Float => ("number", Some("double")),
        FieldType::Bool => ("boolean", None),
        FieldType::Datetime => ("string", Some("date-time")),
        FieldType::Uuid => ("string", Some("uuid")),
    }
}

/// OpenAPI 3 document describing the unit's health and CRUD routes.
pub fn openapi_document(unit: &Unit<'_>) -> String {
    let models = unit.crud_models();
    let mut lines = vec![
        "openapi: 3.0.3".to_string(),
        "info:".to_string(),
        format!("  title: {}", unit.name),
        "  version: 0.1.0".to_string(),
        "servers:".to_string(),
        format!("  - url: http://localhost:{}", unit.port),
        "paths:".to_string(),
    ];

    if unit.spec.features.health_endpoint {
        lines.extend(
            [
                "  /health:",
                "    get:",
                "      summary: Liveness probe",
                "      responses:",
                "        \"200\":",
                "          description: Service is up",
            ]
            .map(String::from),
        );
    }

    for model in &models {
        let table = naming::table(&model.name);
        let schema = naming::pascal(&model.name);
        let reference = format!("$ref: \"#/components/schemas/{schema}\"");
        lines.push(format!("  /{table}:"));
        lines.push("    get:".to_string());
        lines.push(format!("      summary: List {table}"));
        lines.push("      parameters:".to_string());
        lines.push("        - {name: limit, in: query, schema: {type: integer}}".to_string());
        lines.push("        - {name: offset, in: query, schema: {type: integer}}".to_string());
        lines.push("      responses:".to_string());
        lines.push("        \"200\":".to_string());
        lines.push(format!("          description: A page of {table}"));
        lines.push("    post:".to_string());
        lines.push(format!("      summary: Create a {}", naming::snake(&model.name)));
        lines.push("      requestBody:".to_string());
        lines.push("        content:".to_string());
        lines.push("          application/json:".to_string());
        lines.push(format!("            schema: {{{reference}}}"));
        lines.push("      responses:".to_string());
        lines.push("        \"201\":".to_string());
        lines.push("          description: Created".to_string());
        lines.push(format!("  /{table}/{{id}}:"));
        lines.push("    parameters:".to_string());
        lines.push("      - {name: id, in: path, required: true, schema: {type: integer}}".to_string());
        for (verb, ok) in [("get", "200"), ("put", "200"), ("delete", "204")] {
            lines.push(format!("    {verb}:"));
            lines.push("      responses:".to_string());
            lines.push(format!("        \"{ok}\":"));
            lines.push("          description: OK".to_string());
            lines.push("        \"404\":".to_string());
            lines.push("          description: Not found".to_string());
        }
    }

    if models.is_empty() && !unit.spec.features.health_endpoint {
        lines.pop();
        lines.push("paths: {}".to_string());
    }

    if !models.is_empty() {
        lines.push("components:".to_string());
        lines.push("  schemas:".to_string());
        for model in &models {
            lines.extend(schema_lines(model));
        }
    }

    lines.join("\n") + "\n"
}

fn schema_lines(model: &DataModel) -> Vec<String> {
    let mut lines = vec![
        format!("    {}:", naming::pascal(&model.name)),
        "      type: object".to_string(),
        "      properties:".to_string(),
        "        id: {type: integer, format: int64}".to_string(),
    ];
    for field in model.data_fields() {
        let (ty, format) = openapi_type(field.ty);
        let name = naming::snake(&field.name);
        lines.push(match format {
            Some(format) => format!("        {name}: {{type: {ty}, format: {format}}}"),
            None => format!("        {name}: {{type: {ty}}}"),
        });
    }
    lines
}

// ── Root files ───────────────────────────────────────────────────────────────

/// Directories holding buildable code: `.` or each `services/<name>`.
fn service_dirs(units: &[Unit<'_>]) -> String {
    units
        .iter()
        .map(|u| u.mount.as_ref().map_or(".", |m| m.as_str()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn bullet_list(items: &[&str]) -> String {
    if items.is_empty() {
        return "- none".to_string();
    }
    items
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Context for the root templates (README, CI, Makefile, `.gitignore`).
fn root_context(spec: &NormalizedSpec, units: &[Unit<'_>]) -> TemplateContext {
    let services: Vec<String> = units
        .iter()
        .map(|u| match &u.mount {
            Some(mount) => format!("`{}` on port {} (`{}`)", u.name, u.port, mount.as_str()),
            None => format!("`{}` on port {}", u.name, u.port),
        })
        .collect();
    let services: Vec<&str> = services.iter().map(String::as_str).collect();

    TemplateContext::new()
        .with("project_name", project_name(spec))
        .with("language", spec.language.as_str())
        .with("framework", spec.framework().as_str())
        .with("architecture", spec.architecture.as_str())
        .with("database", spec.db.as_str())
        .with("service_dirs", service_dirs(units))
        .with("services", bullet_list(&services))
        .with("infra", bullet_list(&spec.infra.enabled()))
        .with("features", bullet_list(&spec.features.enabled()))
}

/// CI workflow and Makefile.
pub fn root_features(
    spec: &NormalizedSpec,
    units: &[Unit<'_>],
    profile: &dyn StackProfile,
) -> Vec<Artifact> {
    let dir = profile.template_dir();
    let mut out = Vec::new();
    if spec.features.github_actions_ci {
        out.push(Artifact::template(
            ".github/workflows/ci.yml",
            format!("{dir}/ci.yml.tmpl"),
            root_context(spec, units),
        ));
    }
    if spec.features.makefile {
        out.push(Artifact::template(
            "Makefile",
            format!("{dir}/Makefile.tmpl"),
            root_context(spec, units),
        ));
    }
    out
}

/// Compose file, README, `.gitignore` and gRPC contracts.
pub fn root_outputs(
    spec: &NormalizedSpec,
    units: &[Unit<'_>],
    profile: &dyn StackProfile,
) -> Vec<Artifact> {
    let toggles = &spec.file_toggles;
    let mut out = Vec::new();

    if toggles.docker_compose.resolve(true) {
        out.push(Artifact::file("docker-compose.yaml", compose_file(spec, units)));
    }
    if toggles.readme.resolve(true) {
        out.push(Artifact::template(
            "README.md",
            "common/README.md.tmpl",
            root_context(spec, units),
        ));
    }
    if toggles.gitignore.resolve(true) {
        out.push(Artifact::template(
            ".gitignore",
            format!("{}/gitignore.tmpl", profile.template_dir()),
            root_context(spec, units),
        ));
    }
    if spec.architecture.is_microservices()
        && spec.service_communication == Some(ServiceCommunication::Grpc)
    {
        for unit in units {
            if let Some(mount) = &unit.mount {
                out.push(Artifact::file(
                    format!("{}/proto/{}.proto", mount.as_str(), unit.name),
                    proto_file(unit),
                ));
            }
        }
    }
    out
}

/// Minimal gRPC contract for one service.
fn proto_file(unit: &Unit<'_>) -> String {
    let service = naming::pascal(&unit.name);
    let package = naming::snake(&unit.name);
    format!(
        "syntax = \"proto3\";\n\
         \n\
         package {package}.v1;\n\
         \n\
         service {service}Service {{\n  \
           rpc Health(HealthRequest) returns (HealthResponse);\n\
         }}\n\
         \n\
         message HealthRequest {{}}\n\
         \n\
         message HealthResponse {{\n  \
           string status = 1;\n\
         }}\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::ProjectSpec,
        rules::normalize,
        value_objects::{Architecture, Toggle},
    };

    fn normalized(spec: ProjectSpec) -> NormalizedSpec {
        normalize(spec).unwrap().spec
    }

    fn microservices(env: Toggle) -> NormalizedSpec {
        let mut spec = ProjectSpec::new(Language::Node)
            .with_architecture(Architecture::Microservices)
            .with_database(Database::Postgresql)
            .with_service("users", 9001)
            .with_service("orders", 9002);
        spec.file_toggles.env = env;
        normalized(spec)
    }

    #[test]
    fn compose_references_env_files_only_when_enabled() {
        let spec = microservices(Toggle::Unset);
        let units = Unit::all(&spec).unwrap();
        let compose = compose_file(&spec, &units);
        assert!(compose.contains("./services/users/.env"));
        assert!(compose.contains("./services/orders/.env"));

        let spec = microservices(Toggle::Off);
        let units = Unit::all(&spec).unwrap();
        let compose = compose_file(&spec, &units);
        assert!(!compose.contains(".env"));
        assert!(compose.contains("SERVICE_NAME: \"users\""));
    }

    #[test]
    fn compose_adds_backing_services() {
        let mut spec = ProjectSpec::new(Language::Go).with_database(Database::Mysql);
        spec.infra.redis = true;
        spec.infra.nats = true;
        let spec = normalized(spec);
        let units = Unit::all(&spec).unwrap();
        let compose = compose_file(&spec, &units);

        assert!(compose.contains("image: mysql:8"));
        assert!(compose.contains("image: redis:7"));
        assert!(compose.contains("image: nats:2"));
        assert!(!compose.contains("kafka"));
        assert!(compose.contains("00-app-init.sql"));
    }

    #[test]
    fn database_url_matches_driver() {
        let spec = normalized(ProjectSpec::new(Language::Go).with_database(Database::Mysql));
        let units = Unit::all(&spec).unwrap();
        assert_eq!(
            database_url(&units[0]).as_deref(),
            Some("app:app@tcp(mysql:3306)/app?parseTime=true")
        );

        let spec = normalized(ProjectSpec::new(Language::Python));
        let units = Unit::all(&spec).unwrap();
        assert_eq!(database_url(&units[0]), None);
    }

    #[test]
    fn env_file_lists_enabled_integrations() {
        let mut spec = ProjectSpec::new(Language::Node).with_database(Database::Mongodb);
        spec.infra.kafka = true;
        spec.features.jwt_auth = true;
        let spec = normalized(spec);
        let units = Unit::all(&spec).unwrap();
        let env = env_file(&units[0]);

        assert!(env.contains("PORT=8080\n"));
        assert!(env.contains("DATABASE_URL=mongodb://mongo:27017/app\n"));
        assert!(env.contains("KAFKA_BROKERS=kafka:9092\n"));
        assert!(env.contains("JWT_SECRET="));
        assert!(!env.contains("DB_PASSWORD"));
        assert!(!env.contains("REDIS_URL"));
    }

    #[test]
    fn openapi_lists_crud_routes() {
        let mut spec = ProjectSpec::new(Language::Python);
        spec.features.health_endpoint = true;
        spec.custom.models = vec![DataModel::new("Order").field("placed_at", FieldType::Datetime)];
        let spec = normalized(spec);
        let units = Unit::all(&spec).unwrap();
        let doc = openapi_document(&units[0]);

        assert!(doc.contains("  /health:"));
        assert!(doc.contains("  /orders:"));
        assert!(doc.contains("  /orders/{id}:"));
        assert!(doc.contains("placed_at: {type: string, format: date-time}"));
    }

    #[test]
    fn grpc_services_get_a_contract() {
        let mut spec = ProjectSpec::new(Language::Go)
            .with_architecture(Architecture::Microservices)
            .with_service("billing", 9100);
        spec.service_communication = Some(ServiceCommunication::Grpc);
        let spec = normalized(spec);
        let units = Unit::all(&spec).unwrap();
        let profile = super::super::profile_for(spec.framework()).unwrap();

        let outputs = root_outputs(&spec, &units, profile);
        assert!(
            outputs
                .iter()
                .any(|a| a.path() == "services/billing/proto/billing.proto")
        );
    }

    #[test]
    fn root_toggles_gate_root_files() {
        let mut spec = ProjectSpec::new(Language::Go);
        spec.file_toggles.readme = Toggle::Off;
        spec.file_toggles.docker_compose = Toggle::Off;
        spec.features.makefile = true;
        let spec = normalized(spec);
        let units = Unit::all(&spec).unwrap();
        let profile = super::super::profile_for(spec.framework()).unwrap();

        let outputs: Vec<_> = root_outputs(&spec, &units, profile)
            .iter()
            .map(|a| a.path().to_string())
            .collect();
        assert_eq!(outputs, vec![".gitignore"]);

        let features = root_features(&spec, &units, profile);
        assert_eq!(features.len(), 1);
        assert_eq!(features[0].path(), "Makefile");
    }
}
