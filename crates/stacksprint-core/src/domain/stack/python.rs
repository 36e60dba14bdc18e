//! Python stacks: FastAPI and Django.

use std::collections::BTreeSet;

use crate::domain::{
    entities::DataModel,
    naming,
    value_objects::{Architecture, Database, FieldType, Framework},
};

use super::{Addon, Artifact, Feature, StackProfile, TemplateContext, Unit, fill};

const FASTAPI: &str = "fastapi==0.115.0";
const UVICORN: &str = "uvicorn[standard]==0.30.6";
const DJANGO: &str = "Django==5.1.1";
const GUNICORN: &str = "gunicorn==23.0.0";
const SQLALCHEMY: &str = "SQLAlchemy==2.0.35";
const PSYCOPG: &str = "psycopg[binary]==3.2.3";
const PYMYSQL: &str = "PyMySQL==1.1.1";
const PYMONGO: &str = "pymongo==4.9.1";
const REDIS: &str = "redis==5.1.0";
const KAFKA: &str = "kafka-python==2.0.2";
const NATS: &str = "nats-py==2.9.0";
const PYJWT: &str = "PyJWT==2.9.0";
const PYTEST: &str = "pytest==8.3.3";

/// Subpackages every Python unit gets besides its layers.
const SUPPORT_PACKAGES: [&str; 3] = ["middleware", "utils", "db"];

fn requirements(unit: &Unit<'_>, web: &[&'static str]) -> TemplateContext {
    let spec = unit.spec;
    let mut reqs: Vec<&str> = web.to_vec();
    match spec.db {
        Database::Postgresql => reqs.push(PSYCOPG),
        Database::Mysql => reqs.push(PYMYSQL),
        Database::Mongodb => reqs.push(PYMONGO),
        Database::None => {}
    }
    if spec.use_orm && spec.db.is_sql() {
        reqs.push(SQLALCHEMY);
    }
    if spec.infra.redis {
        reqs.push(REDIS);
    }
    if spec.infra.kafka {
        reqs.push(KAFKA);
    }
    if spec.infra.nats {
        reqs.push(NATS);
    }
    if spec.features.jwt_auth {
        reqs.push(PYJWT);
    }
    if spec.features.sample_test {
        reqs.push(PYTEST);
    }
    reqs.sort_unstable_by_key(|r| r.to_ascii_lowercase());
    TemplateContext::new().with("requirements", reqs.join("\n"))
}

/// `app/core/domain` -> `app.core.domain`.
fn dotted(dir: &str) -> String {
    dir.replace('/', ".")
}

/// `__init__.py` for every directory in `dirs` and each of its ancestors.
fn package_markers<'a>(dirs: impl IntoIterator<Item = &'a str>) -> Vec<Artifact> {
    let mut packages = BTreeSet::new();
    for dir in dirs {
        let mut prefix = String::new();
        for segment in dir.split('/') {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(segment);
            packages.insert(prefix.clone());
        }
    }
    packages
        .into_iter()
        .map(|pkg| Artifact::file(format!("{pkg}/__init__.py"), ""))
        .collect()
}

/// Source root, its layers and the support packages, as package paths.
fn package_dirs(unit: &Unit<'_>) -> Vec<String> {
    let root = unit.source_root();
    let mut dirs = vec![root.to_string()];
    dirs.extend(unit.layers().all.iter().map(|l| format!("{root}/{l}")));
    dirs.extend(SUPPORT_PACKAGES.iter().map(|p| format!("{root}/{p}")));
    dirs
}

fn python_skeleton(unit: &Unit<'_>, extra_dirs: &[&str]) -> Vec<Artifact> {
    let dirs = package_dirs(unit);
    let mut out: Vec<Artifact> = extra_dirs.iter().map(|d| Artifact::dir(*d)).collect();
    out.extend(dirs.iter().map(|d| Artifact::dir(d.as_str())));
    out.extend(package_markers(dirs.iter().map(String::as_str)));
    out
}

fn addon_file(unit: &Unit<'_>, addon: Addon) -> Vec<Artifact> {
    let root = unit.source_root();
    let (package, file, content) = match addon {
        Addon::Redis => (
            "cache",
            "redis_client.py",
            include_str!("assets/python/redis_client.py"),
        ),
        Addon::Kafka => (
            "queue",
            "kafka_producer.py",
            include_str!("assets/python/kafka_producer.py"),
        ),
        Addon::Nats => (
            "messaging",
            "nats_client.py",
            include_str!("assets/python/nats_client.py"),
        ),
    };
    vec![
        Artifact::file(format!("{root}/{package}/__init__.py"), ""),
        Artifact::file(format!("{root}/{package}/{file}"), content),
    ]
}

fn sample_test(unit: &Unit<'_>) -> Artifact {
    Artifact::file(
        "tests/test_pagination.py",
        fill(
            include_str!("assets/python/test_pagination.py"),
            &[("__PKG__", unit.source_root())],
        ),
    )
}

fn logger_file(unit: &Unit<'_>) -> Artifact {
    Artifact::file(
        format!("{}/utils/logger.py", unit.source_root()),
        include_str!("assets/python/logger.py"),
    )
}

// ── FastAPI ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct FastApiStack;

fn pydantic_type(ty: FieldType) -> &'static str {
    match ty {
        FieldType::String => "str",
        FieldType::Int => "int",
        FieldType::Float => "float",
        FieldType::Bool => "bool",
        FieldType::Datetime => "datetime",
        FieldType::Uuid => "UUID",
    }
}

fn pydantic_model(model: &DataModel) -> String {
    let name = naming::pascal(&model.name);
    let mut out = String::new();
    if model.data_fields().any(|f| f.ty == FieldType::Datetime) {
        out.push_str("from datetime import datetime\n");
    }
    if model.data_fields().any(|f| f.ty == FieldType::Uuid) {
        out.push_str("from uuid import UUID\n");
    }
    if !out.is_empty() {
        out.push('\n');
    }
    out.push_str("from pydantic import BaseModel\n\n\n");
    out.push_str(&format!("class {name}In(BaseModel):\n"));

    let mut fields = model.data_fields().peekable();
    if fields.peek().is_none() {
        out.push_str("    pass\n");
    }
    for field in fields {
        out.push_str(&format!(
            "    {}: {} | None = None\n",
            naming::snake(&field.name),
            pydantic_type(field.ty)
        ));
    }
    out.push_str(&format!("\n\nclass {name}({name}In):\n    id: int\n"));
    out
}

impl FastApiStack {
    /// Import lines, lifespan startup, app setup and router registrations.
    fn wiring(&self, unit: &Unit<'_>) -> (Vec<String>, Vec<String>, Vec<String>, Vec<String>) {
        let features = &unit.spec.features;
        let handlers = dotted(&unit.handler_dir());
        let models = unit.crud_models();

        let mut imports = Vec::new();
        let mut startup = Vec::new();
        let mut setup = Vec::new();
        let mut routes = Vec::new();

        if features.logger {
            imports.push("from app.utils.logger import configure_logging".to_string());
            startup.push("    configure_logging()".to_string());
        }
        if unit.has_database() {
            imports.push("from app.db.database import connect_database".to_string());
            startup.push("    connect_database()".to_string());
        }
        if features.global_error_handler {
            imports
                .push("from app.middleware.error_handler import register_error_handlers".to_string());
            setup.push("register_error_handlers(app)".to_string());
        }

        let guarded = features.jwt_auth && !models.is_empty();
        if guarded {
            imports.push("from fastapi import Depends".to_string());
            imports.push("from app.middleware.auth import require_auth".to_string());
        }
        if features.health_endpoint {
            imports.push(format!("from {handlers}.health import router as health_router"));
            routes.push("app.include_router(health_router)".to_string());
        }
        for model in &models {
            let snake = naming::snake(&model.name);
            let table = naming::table(&model.name);
            imports.push(format!(
                "from {handlers}.{snake}_router import router as {snake}_router"
            ));
            let guard = if guarded {
                ", dependencies=[Depends(require_auth)]"
            } else {
                ""
            };
            routes.push(format!(
                "app.include_router({snake}_router, prefix=\"/{table}\", tags=[\"{table}\"]{guard})"
            ));
        }

        (imports, startup, setup, routes)
    }
}

impl StackProfile for FastApiStack {
    fn framework(&self) -> Framework {
        Framework::FastApi
    }

    fn skeleton(&self, unit: &Unit<'_>) -> Vec<Artifact> {
        python_skeleton(unit, &[])
    }

    fn entry(&self, unit: &Unit<'_>) -> Vec<Artifact> {
        let (imports, startup, setup, routes) = self.wiring(unit);
        let main = unit
            .context()
            .with("imports", imports.join("\n"))
            .with("startup", startup.join("\n"))
            .with("setup", setup.join("\n"))
            .with("routes", routes.join("\n"));

        vec![
            Artifact::template("app/main.py", "python/fastapi/main.py.tmpl", main),
            Artifact::template(
                "requirements.txt",
                "python/requirements.txt.tmpl",
                requirements(unit, &[FASTAPI, UVICORN]),
            ),
        ]
    }

    fn crud(&self, unit: &Unit<'_>, models: &[DataModel]) -> Vec<Artifact> {
        let model_dir = unit.model_dir();
        let handler_dir = unit.handler_dir();
        let mut out = Vec::new();
        for model in models {
            let snake = naming::snake(&model.name);
            out.push(Artifact::file(
                format!("{model_dir}/{snake}.py"),
                pydantic_model(model),
            ));
            out.push(Artifact::file(
                format!("{handler_dir}/{snake}_router.py"),
                fill(
                    include_str!("assets/python/fastapi_router.py"),
                    &[
                        (
                            "__MODEL_MODULE__",
                            format!("{}.{snake}", dotted(&model_dir)).as_str(),
                        ),
                        ("__MODEL__", naming::pascal(&model.name).as_str()),
                        ("__PLURAL__", naming::table(&model.name).as_str()),
                        ("__SNAKE__", snake.as_str()),
                    ],
                ),
            ));
        }
        out
    }

    fn database(&self, unit: &Unit<'_>) -> Vec<Artifact> {
        let spec = unit.spec;
        let content = match (spec.db, spec.use_orm) {
            (Database::Postgresql | Database::Mysql, true) => fill(
                include_str!("assets/python/db_sqlalchemy.py"),
                &[(
                    "__DEFAULT_URL__",
                    super::common::database_url(unit)
                        .unwrap_or_default()
                        .replace("@postgres:", "@localhost:")
                        .replace("@mysql:", "@localhost:")
                        .as_str(),
                )],
            ),
            (Database::Postgresql, false) => fill(
                include_str!("assets/python/db_driver.py"),
                &[
                    ("__DRIVER__", "psycopg"),
                    ("__PORT__", "5432"),
                    ("__DBNAME_KW__", "dbname"),
                ],
            ),
            (Database::Mysql, false) => fill(
                include_str!("assets/python/db_driver.py"),
                &[
                    ("__DRIVER__", "pymysql"),
                    ("__PORT__", "3306"),
                    ("__DBNAME_KW__", "database"),
                ],
            ),
            (Database::Mongodb, _) => include_str!("assets/python/db_mongo.py").to_string(),
            (Database::None, _) => return Vec::new(),
        };
        vec![Artifact::file("app/db/database.py", content)]
    }

    fn addon(&self, unit: &Unit<'_>, addon: Addon) -> Vec<Artifact> {
        addon_file(unit, addon)
    }

    fn feature(&self, unit: &Unit<'_>, feature: Feature) -> Vec<Artifact> {
        let artifact = match feature {
            Feature::JwtAuth => Artifact::file(
                "app/middleware/auth.py",
                include_str!("assets/python/fastapi_auth.py"),
            ),
            Feature::Logger => logger_file(unit),
            Feature::GlobalErrorHandler => Artifact::file(
                "app/middleware/error_handler.py",
                include_str!("assets/python/fastapi_error_handler.py"),
            ),
            Feature::HealthEndpoint => Artifact::file(
                format!("{}/health.py", unit.handler_dir()),
                include_str!("assets/python/fastapi_health.py"),
            ),
            Feature::SampleTest => sample_test(unit),
        };
        vec![artifact]
    }

    fn container_context(&self, unit: &Unit<'_>) -> TemplateContext {
        unit.context().with(
            "command",
            format!(
                "[\"uvicorn\", \"app.main:app\", \"--host\", \"0.0.0.0\", \"--port\", \"{}\"]",
                unit.port
            ),
        )
    }
}

// ── Django ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct DjangoStack;

fn django_field(ty: FieldType) -> &'static str {
    match ty {
        FieldType::String => "models.CharField(max_length=255, blank=True, default=\"\")",
        FieldType::Int => "models.BigIntegerField(null=True, blank=True)",
        FieldType::Float => "models.FloatField(null=True, blank=True)",
        FieldType::Bool => "models.BooleanField(default=False)",
        FieldType::Datetime => "models.DateTimeField(null=True, blank=True)",
        FieldType::Uuid => "models.UUIDField(null=True, blank=True)",
    }
}

fn django_model(model: &DataModel) -> String {
    let mut out = format!(
        "from django.db import models\n\n\nclass {}(models.Model):\n",
        naming::pascal(&model.name)
    );
    for field in model.data_fields() {
        out.push_str(&format!(
            "    {} = {}\n",
            naming::snake(&field.name),
            django_field(field.ty)
        ));
    }
    out.push_str(&format!(
        "\n    class Meta:\n        app_label = \"api\"\n        db_table = \"{}\"\n",
        naming::table(&model.name)
    ));
    out
}

fn django_databases(db: Database) -> String {
    let engine = match db {
        Database::Postgresql => "postgresql",
        Database::Mysql => "mysql",
        Database::None | Database::Mongodb => {
            return "{\n    \"default\": {\n        \"ENGINE\": \"django.db.backends.sqlite3\",\n        \"NAME\": BASE_DIR / \"db.sqlite3\",\n    }\n}".to_string();
        }
    };
    format!(
        "{{\n    \"default\": {{\n        \"ENGINE\": \"django.db.backends.{engine}\",\n        \
         \"NAME\": os.getenv(\"DB_NAME\", \"app\"),\n        \
         \"USER\": os.getenv(\"DB_USER\", \"app\"),\n        \
         \"PASSWORD\": os.getenv(\"DB_PASSWORD\", \"app\"),\n        \
         \"HOST\": os.getenv(\"DB_HOST\", \"localhost\"),\n        \
         \"PORT\": os.getenv(\"DB_PORT\", \"\"),\n    }}\n}}"
    )
}

impl DjangoStack {
    fn settings(&self, unit: &Unit<'_>) -> TemplateContext {
        let features = &unit.spec.features;
        let mut middleware = vec![
            "django.middleware.common.CommonMiddleware",
            "api.middleware.request_id.RequestIDMiddleware",
            "api.middleware.request_logging.RequestLoggingMiddleware",
        ];
        if features.jwt_auth {
            middleware.push("api.middleware.auth.JWTAuthMiddleware");
        }
        if features.global_error_handler {
            middleware.push("api.middleware.error_handler.ErrorHandlerMiddleware");
        }
        let middleware: Vec<String> = middleware
            .into_iter()
            .map(|m| format!("    \"{m}\","))
            .collect();

        let logging = if features.logger {
            "LOGGING_CONFIG = None\n\nfrom api.utils.logger import configure_logging  # noqa: E402\n\nconfigure_logging()\n"
        } else {
            ""
        };

        unit.context()
            .with("middleware", middleware.join("\n"))
            .with("databases", django_databases(unit.spec.db))
            .with("logging", logging)
    }

    fn urls(&self, unit: &Unit<'_>) -> TemplateContext {
        let handlers = dotted(&unit.handler_dir());
        let mut imports = Vec::new();
        let mut patterns = Vec::new();

        if unit.spec.features.health_endpoint {
            imports.push(format!("from {handlers}.health import health"));
            patterns.push("    path(\"health\", health),".to_string());
        }
        for model in unit.crud_models() {
            let snake = naming::snake(&model.name);
            let table = naming::table(&model.name);
            imports.push(format!(
                "from {handlers}.{snake}_views import {snake}_collection, {snake}_detail"
            ));
            patterns.push(format!("    path(\"{table}\", {snake}_collection),"));
            patterns.push(format!("    path(\"{table}/<int:pk>\", {snake}_detail),"));
        }

        TemplateContext::new()
            .with("imports", imports.join("\n"))
            .with("patterns", patterns.join("\n"))
    }
}

impl StackProfile for DjangoStack {
    fn framework(&self) -> Framework {
        Framework::Django
    }

    fn skeleton(&self, unit: &Unit<'_>) -> Vec<Artifact> {
        python_skeleton(unit, &["config"])
    }

    fn entry(&self, unit: &Unit<'_>) -> Vec<Artifact> {
        let config_init = if unit.spec.db == Database::Mysql {
            "import pymysql\n\npymysql.install_as_MySQLdb()\n"
        } else {
            ""
        };
        vec![
            Artifact::template("manage.py", "python/django/manage.py.tmpl", unit.context()),
            Artifact::template(
                "config/settings.py",
                "python/django/settings.py.tmpl",
                self.settings(unit),
            ),
            Artifact::template("config/urls.py", "python/django/urls.py.tmpl", self.urls(unit)),
            Artifact::file("config/__init__.py", config_init),
            Artifact::file("config/wsgi.py", include_str!("assets/python/django_wsgi.py")),
            Artifact::file("api/apps.py", include_str!("assets/python/django_apps.py")),
            Artifact::template(
                "requirements.txt",
                "python/requirements.txt.tmpl",
                requirements(unit, &[DJANGO, GUNICORN]),
            ),
        ]
    }

    /// Models live in the model layer. The mvp layout makes `api/models`
    /// the package itself; the others re-export through `api/models.py` so
    /// Django's app registry finds them.
    fn crud(&self, unit: &Unit<'_>, models: &[DataModel]) -> Vec<Artifact> {
        if models.is_empty() {
            return Vec::new();
        }

        let model_dir = unit.model_dir();
        let handler_dir = unit.handler_dir();
        let mut out = Vec::new();
        let mut exports = Vec::new();

        for model in models {
            let snake = naming::snake(&model.name);
            let pascal = naming::pascal(&model.name);
            let fields: Vec<String> = model
                .data_fields()
                .map(|f| format!("\"{}\"", naming::snake(&f.name)))
                .collect();

            out.push(Artifact::file(
                format!("{model_dir}/{snake}.py"),
                django_model(model),
            ));
            out.push(Artifact::file(
                format!("{handler_dir}/{snake}_views.py"),
                fill(
                    include_str!("assets/python/django_views.py"),
                    &[
                        ("__MODEL__", pascal.as_str()),
                        ("__SNAKE__", snake.as_str()),
                        ("__FIELDS__", fields.join(", ").as_str()),
                    ],
                ),
            ));
            exports.push((snake, pascal));
        }

        if unit.layout == Architecture::Mvp || unit.layout == Architecture::Microservices {
            let body: String = exports
                .iter()
                .map(|(module, class)| format!("from .{module} import {class}  # noqa: F401\n"))
                .collect();
            out.push(Artifact::file(format!("{model_dir}/__init__.py"), body));
        } else {
            let package = dotted(&model_dir);
            let body: String = exports
                .iter()
                .map(|(module, class)| {
                    format!("from {package}.{module} import {class}  # noqa: F401\n")
                })
                .collect();
            out.push(Artifact::file("api/models.py", body));
        }
        out
    }

    fn database(&self, _unit: &Unit<'_>) -> Vec<Artifact> {
        vec![Artifact::file(
            "api/db/connection.py",
            include_str!("assets/python/django_connection.py"),
        )]
    }

    fn addon(&self, unit: &Unit<'_>, addon: Addon) -> Vec<Artifact> {
        addon_file(unit, addon)
    }

    fn feature(&self, unit: &Unit<'_>, feature: Feature) -> Vec<Artifact> {
        let artifact = match feature {
            Feature::JwtAuth => Artifact::file(
                "api/middleware/auth.py",
                include_str!("assets/python/django_auth.py"),
            ),
            Feature::Logger => logger_file(unit),
            Feature::GlobalErrorHandler => Artifact::file(
                "api/middleware/error_handler.py",
                include_str!("assets/python/django_error_handler.py"),
            ),
            Feature::HealthEndpoint => Artifact::file(
                format!("{}/health.py", unit.handler_dir()),
                include_str!("assets/python/django_health.py"),
            ),
            Feature::SampleTest => sample_test(unit),
        };
        vec![artifact]
    }

    fn container_context(&self, unit: &Unit<'_>) -> TemplateContext {
        unit.context().with(
            "command",
            format!(
                "[\"gunicorn\", \"config.wsgi:application\", \"--bind\", \"0.0.0.0:{}\"]",
                unit.port
            ),
        )
    }
}
