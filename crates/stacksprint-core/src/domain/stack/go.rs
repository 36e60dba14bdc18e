//! Go stacks: gin and fiber.

use crate::domain::{
    entities::DataModel,
    naming,
    value_objects::{Database, FieldType, Framework},
};

use super::{Addon, Artifact, Feature, StackProfile, TemplateContext, Unit, fill};

const GIN: &str = "github.com/gin-gonic/gin v1.10.0";
const FIBER: &str = "github.com/gofiber/fiber/v2 v2.52.5";
const PGX: &str = "github.com/jackc/pgx/v5 v5.6.0";
const MYSQL: &str = "github.com/go-sql-driver/mysql v1.8.1";
const GORM: &str = "gorm.io/gorm v1.25.12";
const GORM_POSTGRES: &str = "gorm.io/driver/postgres v1.5.9";
const GORM_MYSQL: &str = "gorm.io/driver/mysql v1.5.7";
const MONGO: &str = "go.mongodb.org/mongo-driver v1.17.1";
const REDIS: &str = "github.com/redis/go-redis/v9 v9.6.1";
const KAFKA: &str = "github.com/segmentio/kafka-go v0.4.47";
const NATS: &str = "github.com/nats-io/nats.go v1.37.0";
const JWT: &str = "github.com/golang-jwt/jwt/v5 v5.2.1";

#[derive(Debug, Clone, Copy)]
pub struct GoStack {
    framework: Framework,
}

impl GoStack {
    pub const GIN: Self = Self {
        framework: Framework::Gin,
    };
    pub const FIBER: Self = Self {
        framework: Framework::Fiber,
    };

    fn is_gin(&self) -> bool {
        self.framework == Framework::Gin
    }

    /// Picks the gin or fiber flavor of a snippet.
    fn flavor(&self, gin: &'static str, fiber: &'static str) -> &'static str {
        if self.is_gin() { gin } else { fiber }
    }

    fn requires(&self, unit: &Unit<'_>) -> Vec<&'static str> {
        let spec = unit.spec;
        let mut out = vec![self.flavor(GIN, FIBER)];
        match (spec.db, spec.use_orm) {
            (Database::Postgresql, false) => out.push(PGX),
            (Database::Mysql, false) => out.push(MYSQL),
            (Database::Postgresql, true) => out.extend([GORM, GORM_POSTGRES]),
            (Database::Mysql, true) => out.extend([GORM, GORM_MYSQL]),
            (Database::Mongodb, _) => out.push(MONGO),
            (Database::None, _) => {}
        }
        if spec.infra.redis {
            out.push(REDIS);
        }
        if spec.infra.kafka {
            out.push(KAFKA);
        }
        if spec.infra.nats {
            out.push(NATS);
        }
        if spec.features.jwt_auth {
            out.push(JWT);
        }
        out.sort_unstable();
        out
    }

    /// Import lines, setup statements and route registrations for `main.go`.
    fn wiring(&self, unit: &Unit<'_>) -> (Vec<String>, Vec<String>, Vec<String>) {
        let spec = unit.spec;
        let module = unit.go_module();
        let router = self.flavor("r", "app");
        let models = unit.crud_models();

        let mut imports = vec![format!("\t\"{module}/internal/middleware\"")];
        let mut setup = Vec::new();
        let mut routes = Vec::new();

        if !models.is_empty() || spec.features.health_endpoint {
            imports.push(format!("\thandlers \"{module}/{}\"", unit.handler_dir()));
        }
        if spec.features.logger {
            imports.push(format!("\t\"{module}/internal/logger\""));
            setup.push("\tlogger.Init()".to_string());
        }
        if unit.has_database() {
            imports.push(format!("\t\"{module}/internal/db\""));
            setup.extend(
                [
                    "\tif err := db.Connect(); err != nil {",
                    "\t\tlog.Fatal(err)",
                    "\t}",
                    "\tdefer db.Close()",
                ]
                .map(String::from),
            );
        }

        if self.is_gin() && spec.features.global_error_handler {
            setup.push(format!("\t{router}.Use(middleware.ErrorHandler())"));
        }
        setup.push(format!("\t{router}.Use(middleware.RequestID())"));
        setup.push(format!("\t{router}.Use(middleware.RequestLogging())"));

        if spec.features.health_endpoint {
            let verb = self.flavor("GET", "Get");
            routes.push(format!("\t{router}.{verb}(\"/health\", handlers.Health)"));
        }
        let guard = if spec.features.jwt_auth {
            ", middleware.JWTAuth()"
        } else {
            ""
        };
        for model in &models {
            routes.push(format!(
                "\thandlers.Register{}Routes({router}.Group(\"/{}\"{guard}))",
                naming::pascal(&model.name),
                naming::table(&model.name),
            ));
        }

        (imports, setup, routes)
    }
}

fn go_type(ty: FieldType) -> &'static str {
    match ty {
        FieldType::String | FieldType::Uuid => "string",
        FieldType::Int => "int64",
        FieldType::Float => "float64",
        FieldType::Bool => "bool",
        FieldType::Datetime => "time.Time",
    }
}

fn model_file(model: &DataModel) -> String {
    let name = naming::pascal(&model.name);
    let needs_time = model.data_fields().any(|f| f.ty == FieldType::Datetime);

    let mut out = String::from("package models\n\n");
    if needs_time {
        out.push_str("import \"time\"\n\n");
    }
    out.push_str(&format!("// {name} is one row of the {} table.\n", naming::table(&model.name)));
    out.push_str(&format!("type {name} struct {{\n"));
    out.push_str("\tID int64 `json:\"id\"`\n");
    for field in model.data_fields() {
        out.push_str(&format!(
            "\t{} {} `json:\"{}\"`\n",
            naming::pascal(&field.name),
            go_type(field.ty),
            naming::snake(&field.name)
        ));
    }
    out.push_str("}\n");
    out
}

impl StackProfile for GoStack {
    fn framework(&self) -> Framework {
        self.framework
    }

    fn skeleton(&self, unit: &Unit<'_>) -> Vec<Artifact> {
        let root = unit.source_root();
        let mut out = vec![Artifact::dir("cmd/server"), Artifact::dir(root)];
        out.extend(
            unit.layers()
                .all
                .iter()
                .map(|layer| Artifact::dir(format!("{root}/{layer}"))),
        );
        out
    }

    fn entry(&self, unit: &Unit<'_>) -> Vec<Artifact> {
        let (imports, setup, routes) = self.wiring(unit);
        let config = if !self.is_gin() && unit.spec.features.global_error_handler {
            "fiber.Config{ErrorHandler: middleware.ErrorHandler}"
        } else {
            ""
        };
        let main = unit
            .context()
            .with("module", unit.go_module())
            .with("imports", imports.join("\n"))
            .with("setup", setup.join("\n"))
            .with("routes", routes.join("\n"))
            .with("config", config);

        let requires: Vec<String> = self
            .requires(unit)
            .into_iter()
            .map(|r| format!("\t{r}"))
            .collect();
        let go_mod = TemplateContext::new()
            .with("module", unit.go_module())
            .with("requires", requires.join("\n"));

        vec![
            Artifact::template(
                "cmd/server/main.go",
                format!("go/{}/main.go.tmpl", self.framework),
                main,
            ),
            Artifact::template("go.mod", "go/go.mod.tmpl", go_mod),
        ]
    }

    fn crud(&self, unit: &Unit<'_>, models: &[DataModel]) -> Vec<Artifact> {
        if models.is_empty() {
            return Vec::new();
        }

        let module = unit.go_module();
        let models_import = format!("{module}/{}", unit.model_dir());
        let handler = self.flavor(
            include_str!("assets/go/gin_handler.go"),
            include_str!("assets/go/fiber_handler.go"),
        );

        let mut out = vec![
            Artifact::file(
                format!("{}/store.go", unit.handler_dir()),
                include_str!("assets/go/store.go"),
            ),
            Artifact::file(
                format!("{}/params.go", unit.handler_dir()),
                self.flavor(
                    include_str!("assets/go/gin_params.go"),
                    include_str!("assets/go/fiber_params.go"),
                ),
            ),
        ];
        for model in models {
            let snake = naming::snake(&model.name);
            out.push(Artifact::file(
                format!("{}/{snake}.go", unit.model_dir()),
                model_file(model),
            ));
            out.push(Artifact::file(
                format!("{}/{snake}_handler.go", unit.handler_dir()),
                fill(
                    handler,
                    &[
                        ("__MODELS_IMPORT__", models_import.as_str()),
                        ("__MODULE__", module.as_str()),
                        ("__MODEL__", naming::pascal(&model.name).as_str()),
                        ("__VAR__", naming::camel(&model.name).as_str()),
                        ("__ROUTE__", snake.as_str()),
                    ],
                ),
            ));
        }
        out
    }

    fn database(&self, unit: &Unit<'_>) -> Vec<Artifact> {
        let content = match (unit.spec.db, unit.spec.use_orm) {
            (Database::Postgresql, false) => fill(
                include_str!("assets/go/db_sql.go"),
                &[
                    ("__DRIVER_IMPORT__", "github.com/jackc/pgx/v5/stdlib"),
                    ("__DRIVER__", "pgx"),
                ],
            ),
            (Database::Mysql, false) => fill(
                include_str!("assets/go/db_sql.go"),
                &[
                    ("__DRIVER_IMPORT__", "github.com/go-sql-driver/mysql"),
                    ("__DRIVER__", "mysql"),
                ],
            ),
            (Database::Postgresql, true) => fill(
                include_str!("assets/go/db_gorm.go"),
                &[
                    ("__DIALECTOR_IMPORT__", "gorm.io/driver/postgres"),
                    ("__DIALECTOR__", "postgres"),
                ],
            ),
            (Database::Mysql, true) => fill(
                include_str!("assets/go/db_gorm.go"),
                &[
                    ("__DIALECTOR_IMPORT__", "gorm.io/driver/mysql"),
                    ("__DIALECTOR__", "mysql"),
                ],
            ),
            (Database::Mongodb, _) => include_str!("assets/go/db_mongo.go").to_string(),
            (Database::None, _) => return Vec::new(),
        };
        vec![Artifact::file("internal/db/db.go", content)]
    }

    fn addon(&self, _unit: &Unit<'_>, addon: Addon) -> Vec<Artifact> {
        let (path, content) = match addon {
            Addon::Redis => ("internal/cache/redis.go", include_str!("assets/go/redis.go")),
            Addon::Kafka => ("internal/queue/kafka.go", include_str!("assets/go/kafka.go")),
            Addon::Nats => ("internal/messaging/nats.go", include_str!("assets/go/nats.go")),
        };
        vec![Artifact::file(path, content)]
    }

    fn feature(&self, unit: &Unit<'_>, feature: Feature) -> Vec<Artifact> {
        let artifact = match feature {
            Feature::JwtAuth => Artifact::file(
                "internal/middleware/auth.go",
                self.flavor(
                    include_str!("assets/go/gin_auth.go"),
                    include_str!("assets/go/fiber_auth.go"),
                ),
            ),
            Feature::Logger => {
                Artifact::file("internal/logger/logger.go", include_str!("assets/go/logger.go"))
            }
            Feature::GlobalErrorHandler => Artifact::file(
                "internal/middleware/error_handler.go",
                self.flavor(
                    include_str!("assets/go/gin_error_handler.go"),
                    include_str!("assets/go/fiber_error_handler.go"),
                ),
            ),
            Feature::HealthEndpoint => Artifact::file(
                format!("{}/health.go", unit.handler_dir()),
                self.flavor(
                    include_str!("assets/go/gin_health.go"),
                    include_str!("assets/go/fiber_health.go"),
                ),
            ),
            Feature::SampleTest => Artifact::file(
                "internal/pagination/pagination_test.go",
                include_str!("assets/go/pagination_test.go"),
            ),
        };
        vec![artifact]
    }

    fn container_context(&self, unit: &Unit<'_>) -> TemplateContext {
        unit.context().with("module", unit.go_module())
    }
}
