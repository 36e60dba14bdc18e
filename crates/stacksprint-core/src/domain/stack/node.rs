//! Node stacks (ES modules): express and fastify.

use crate::domain::{
    entities::DataModel,
    naming,
    value_objects::{Database, FieldType, Framework},
};

use super::{Addon, Artifact, Feature, StackProfile, TemplateContext, Unit, fill};

const EXPRESS: (&str, &str) = ("express", "^4.19.2");
const FASTIFY: (&str, &str) = ("fastify", "^4.28.1");
const PG: (&str, &str) = ("pg", "^8.12.0");
const PG_HSTORE: (&str, &str) = ("pg-hstore", "^2.3.4");
const MYSQL2: (&str, &str) = ("mysql2", "^3.11.0");
const SEQUELIZE: (&str, &str) = ("sequelize", "^6.37.3");
const MONGODB: (&str, &str) = ("mongodb", "^6.8.0");
const REDIS: (&str, &str) = ("redis", "^4.7.0");
const KAFKAJS: (&str, &str) = ("kafkajs", "^2.2.4");
const NATS: (&str, &str) = ("nats", "^2.28.2");
const JSONWEBTOKEN: (&str, &str) = ("jsonwebtoken", "^9.0.2");
const PINO: (&str, &str) = ("pino", "^9.3.2");

#[derive(Debug, Clone, Copy)]
pub struct NodeStack {
    framework: Framework,
}

impl NodeStack {
    pub const EXPRESS: Self = Self {
        framework: Framework::Express,
    };
    pub const FASTIFY: Self = Self {
        framework: Framework::Fastify,
    };

    fn is_express(&self) -> bool {
        self.framework == Framework::Express
    }

    fn flavor(&self, express: &'static str, fastify: &'static str) -> &'static str {
        if self.is_express() { express } else { fastify }
    }

    fn dependencies(&self, unit: &Unit<'_>) -> Vec<(&'static str, &'static str)> {
        let spec = unit.spec;
        let mut deps = vec![if self.is_express() { EXPRESS } else { FASTIFY }];
        match (spec.db, spec.use_orm) {
            (Database::Postgresql, false) => deps.push(PG),
            (Database::Mysql, false) => deps.push(MYSQL2),
            (Database::Postgresql, true) => deps.extend([SEQUELIZE, PG, PG_HSTORE]),
            (Database::Mysql, true) => deps.extend([SEQUELIZE, MYSQL2]),
            (Database::Mongodb, _) => deps.push(MONGODB),
            (Database::None, _) => {}
        }
        if spec.infra.redis {
            deps.push(REDIS);
        }
        if spec.infra.kafka {
            deps.push(KAFKAJS);
        }
        if spec.infra.nats {
            deps.push(NATS);
        }
        if spec.features.jwt_auth {
            deps.push(JSONWEBTOKEN);
        }
        if spec.features.logger {
            deps.push(PINO);
        }
        deps.sort_unstable();
        deps
    }

    /// Import lines, setup statements, route registrations and trailing
    /// middleware for `src/index.js`.
    fn wiring(&self, unit: &Unit<'_>) -> Wiring {
        let spec = unit.spec;
        let features = &spec.features;
        let models = unit.crud_models();
        let handler_dir = unit.handler_dir();
        let handlers = from_src(&handler_dir);
        let mut w = Wiring::default();

        w.imports.push("import { requestId } from './middleware/requestId.js';".into());
        w.imports
            .push("import { requestLogging } from './middleware/requestLogging.js';".into());
        if self.is_express() {
            w.setup.push("app.use(requestId);".into());
            w.setup.push("app.use(requestLogging);".into());
        } else {
            w.setup.push("requestId(app);".into());
            w.setup.push("requestLogging(app);".into());
        }

        if features.global_error_handler {
            w.imports
                .push("import { errorHandler } from './middleware/errorHandler.js';".into());
            if self.is_express() {
                w.finish.push("app.use(errorHandler);".into());
            } else {
                w.setup.push("app.setErrorHandler(errorHandler);".into());
            }
        }
        if unit.has_database() {
            w.imports
                .push("import { connectDatabase } from './db/index.js';".into());
            w.setup.push("await connectDatabase();".into());
        }
        if features.logger {
            w.imports.push("import { logger } from './utils/logger.js';".into());
        }
        if features.jwt_auth && !models.is_empty() {
            w.imports
                .push("import { requireAuth } from './middleware/auth.js';".into());
        }

        if features.health_endpoint {
            w.imports.push(format!(
                "import {{ registerHealthRoutes }} from './{handlers}/health.js';"
            ));
            w.routes.push(self.register("registerHealthRoutes", None));
        }
        for model in &models {
            let register = format!("register{}Routes", naming::pascal(&model.name));
            w.imports.push(format!(
                "import {{ {register} }} from './{handlers}/{}Routes.js';",
                naming::camel(&model.name)
            ));
            let prefix = naming::table(&model.name);
            w.routes.push(self.register(&register, Some((&prefix, features.jwt_auth))));
        }

        w.on_listen = if features.logger {
            "logger.info({ port }, 'listening');".into()
        } else {
            format!("console.log(`{} listening on :${{port}}`);", unit.name)
        };
        w
    }

    /// One route registration line. `crud` carries the prefix and whether
    /// the routes sit behind the auth guard.
    fn register(&self, function: &str, crud: Option<(&str, bool)>) -> String {
        let guard = matches!(crud, Some((_, true)));
        match (self.is_express(), crud) {
            (true, _) if guard => format!("{function}(app, {{ guard: requireAuth }});"),
            (true, _) => format!("{function}(app);"),
            (false, None) => format!("await app.register({function});"),
            (false, Some((prefix, _))) if guard => {
                format!("await app.register({function}, {{ prefix: '/{prefix}', guard: requireAuth }});")
            }
            (false, Some((prefix, _))) => {
                format!("await app.register({function}, {{ prefix: '/{prefix}' }});")
            }
        }
    }
}

#[derive(Debug, Default)]
struct Wiring {
    imports: Vec<String>,
    setup: Vec<String>,
    routes: Vec<String>,
    finish: Vec<String>,
    on_listen: String,
}

/// Path relative to `src/`, for imports from `src/index.js`.
fn from_src(dir: &str) -> &str {
    dir.strip_prefix("src/").unwrap_or(dir)
}

/// ES module specifier for `target` as imported from a file in `from_dir`.
fn relative_import(from_dir: &str, target: &str) -> String {
    let from: Vec<&str> = from_dir.split('/').collect();
    let to: Vec<&str> = target.split('/').collect();
    let shared = from
        .iter()
        .zip(&to)
        .take_while(|(a, b)| a == b)
        .count();

    let ups = from.len() - shared;
    let rest = to[shared..].join("/");
    if ups == 0 {
        format!("./{rest}")
    } else {
        format!("{}{rest}", "../".repeat(ups))
    }
}

fn coerce(field: &str, ty: FieldType) -> String {
    let raw = format!("input.{field}");
    match ty {
        FieldType::String | FieldType::Uuid => format!("{raw} == null ? null : String({raw})"),
        FieldType::Int => format!("{raw} == null ? null : Number.parseInt({raw}, 10)"),
        FieldType::Float => format!("{raw} == null ? null : Number({raw})"),
        FieldType::Bool => format!("{raw} == null ? null : Boolean({raw})"),
        FieldType::Datetime => {
            format!("{raw} == null ? null : new Date({raw}).toISOString()")
        }
    }
}

fn model_file(model: &DataModel) -> String {
    let name = naming::pascal(&model.name);
    let fields: Vec<String> = model
        .data_fields()
        .map(|f| format!("'{}'", naming::camel(&f.name)))
        .collect();

    let mut out = format!(
        "export const {}_FIELDS = [{}];\n\n",
        naming::snake(&model.name).to_uppercase(),
        fields.join(", ")
    );
    out.push_str(&format!("// Builds a {name} from untrusted input, keeping known fields only.\n"));
    out.push_str(&format!("export function build{name}(id, input = {{}}) {{\n"));
    out.push_str("  return {\n    id,\n");
    for field in model.data_fields() {
        let key = naming::camel(&field.name);
        out.push_str(&format!("    {key}: {},\n", coerce(&key, field.ty)));
    }
    out.push_str("  };\n}\n");
    out
}

impl StackProfile for NodeStack {
    fn framework(&self) -> Framework {
        self.framework
    }

    fn entry(&self, unit: &Unit<'_>) -> Vec<Artifact> {
        let w = self.wiring(unit);
        let index = unit
            .context()
            .with("imports", w.imports.join("\n"))
            .with("setup", w.setup.join("\n"))
            .with("routes", w.routes.join("\n"))
            .with("finish", w.finish.join("\n"))
            .with("on_listen", w.on_listen);

        let deps: Vec<String> = self
            .dependencies(unit)
            .into_iter()
            .map(|(name, version)| format!("    \"{name}\": \"{version}\""))
            .collect();
        let package = TemplateContext::new()
            .with("package_name", naming::slug(&unit.name))
            .with("dependencies", deps.join(",\n"));

        vec![
            Artifact::template(
                "src/index.js",
                format!("node/{}/index.js.tmpl", self.framework),
                index,
            ),
            Artifact::template("package.json", "node/package.json.tmpl", package),
        ]
    }

    fn crud(&self, unit: &Unit<'_>, models: &[DataModel]) -> Vec<Artifact> {
        let handler_dir = unit.handler_dir();
        let pagination = relative_import(&handler_dir, "src/utils/pagination.js");
        let routes = self.flavor(
            include_str!("assets/node/express_routes.js"),
            include_str!("assets/node/fastify_routes.js"),
        );

        let mut out = Vec::new();
        for model in models {
            let camel = naming::camel(&model.name);
            let model_path = format!("{}/{camel}.js", unit.model_dir());
            out.push(Artifact::file(model_path.clone(), model_file(model)));
            out.push(Artifact::file(
                format!("{handler_dir}/{camel}Routes.js"),
                fill(
                    routes,
                    &[
                        (
                            "__MODEL_IMPORT__",
                            relative_import(&handler_dir, &model_path).as_str(),
                        ),
                        ("__PAGINATION_IMPORT__", pagination.as_str()),
                        ("__MODEL__", naming::pascal(&model.name).as_str()),
                        ("__TABLE__", naming::table(&model.name).as_str()),
                        ("__ROUTE__", naming::snake(&model.name).as_str()),
                    ],
                ),
            ));
        }
        out
    }

    fn database(&self, unit: &Unit<'_>) -> Vec<Artifact> {
        let content = match (unit.spec.db, unit.spec.use_orm) {
            (Database::Postgresql, false) => include_str!("assets/node/db_pg.js"),
            (Database::Mysql, false) => include_str!("assets/node/db_mysql.js"),
            (Database::Postgresql | Database::Mysql, true) => {
                include_str!("assets/node/db_sequelize.js")
            }
            (Database::Mongodb, _) => include_str!("assets/node/db_mongo.js"),
            (Database::None, _) => return Vec::new(),
        };
        vec![Artifact::file("src/db/index.js", content)]
    }

    fn addon(&self, _unit: &Unit<'_>, addon: Addon) -> Vec<Artifact> {
        let (path, content) = match addon {
            Addon::Redis => (
                "src/cache/redisClient.js",
                include_str!("assets/node/redisClient.js"),
            ),
            Addon::Kafka => (
                "src/queue/kafkaProducer.js",
                include_str!("assets/node/kafkaProducer.js"),
            ),
            Addon::Nats => (
                "src/messaging/natsClient.js",
                include_str!("assets/node/natsClient.js"),
            ),
        };
        vec![Artifact::file(path, content)]
    }

    fn feature(&self, unit: &Unit<'_>, feature: Feature) -> Vec<Artifact> {
        let artifact = match feature {
            Feature::JwtAuth => Artifact::file(
                "src/middleware/auth.js",
                self.flavor(
                    include_str!("assets/node/express_auth.js"),
                    include_str!("assets/node/fastify_auth.js"),
                ),
            ),
            Feature::Logger => {
                Artifact::file("src/utils/logger.js", include_str!("assets/node/logger.js"))
            }
            Feature::GlobalErrorHandler => Artifact::file(
                "src/middleware/errorHandler.js",
                self.flavor(
                    include_str!("assets/node/express_error_handler.js"),
                    include_str!("assets/node/fastify_error_handler.js"),
                ),
            ),
            Feature::HealthEndpoint => Artifact::file(
                format!("{}/health.js", unit.handler_dir()),
                self.flavor(
                    include_str!("assets/node/express_health.js"),
                    include_str!("assets/node/fastify_health.js"),
                ),
            ),
            Feature::SampleTest => Artifact::file(
                "tests/pagination.test.js",
                include_str!("assets/node/pagination.test.js"),
            ),
        };
        vec![artifact]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::ProjectSpec,
        rules::{NormalizedSpec, normalize},
        value_objects::{Architecture, Language},
    };

    fn normalized(spec: ProjectSpec) -> NormalizedSpec {
        normalize(spec).unwrap().spec
    }

    #[test]
    fn relative_imports_climb_out_of_layers() {
        assert_eq!(
            relative_import("src/handlers", "src/utils/pagination.js"),
            "../utils/pagination.js"
        );
        assert_eq!(
            relative_import("src/adapters/primary/http", "src/core/domain/item.js"),
            "../../../core/domain/item.js"
        );
        assert_eq!(relative_import("src", "src/db/index.js"), "./db/index.js");
    }

    #[test]
    fn express_wiring_registers_error_handler_last() {
        let mut spec = ProjectSpec::new(Language::Node).with_database(Database::Postgresql);
        spec.features.global_error_handler = true;
        spec.features.jwt_auth = true;
        let spec = normalized(spec);
        let units = Unit::all(&spec).unwrap();
        let w = NodeStack::EXPRESS.wiring(&units[0]);

        assert_eq!(w.finish, vec!["app.use(errorHandler);"]);
        assert!(w.setup.contains(&"await connectDatabase();".to_string()));
        assert!(
            w.routes
                .contains(&"registerItemRoutes(app, { guard: requireAuth });".to_string())
        );
        assert!(
            w.imports
                .contains(&"import { registerItemRoutes } from './handlers/itemRoutes.js';".to_string())
        );
    }

    #[test]
    fn fastify_registers_plugins_with_prefix() {
        let mut spec = ProjectSpec::new(Language::Node).with_framework(Framework::Fastify);
        spec.features.health_endpoint = true;
        let spec = normalized(spec);
        let units = Unit::all(&spec).unwrap();
        let w = NodeStack::FASTIFY.wiring(&units[0]);

        assert_eq!(
            w.routes,
            vec![
                "await app.register(registerHealthRoutes);",
                "await app.register(registerItemRoutes, { prefix: '/items' });",
            ]
        );
        assert!(w.finish.is_empty());
    }

    #[test]
    fn hexagonal_crud_resolves_imports() {
        let spec = normalized(
            ProjectSpec::new(Language::Node).with_architecture(Architecture::Hexagonal),
        );
        let units = Unit::all(&spec).unwrap();
        let artifacts = NodeStack::EXPRESS.crud(&units[0], &units[0].crud_models());
        let paths: Vec<_> = artifacts.iter().map(Artifact::path).collect();
        assert_eq!(
            paths,
            vec![
                "src/core/domain/item.js",
                "src/adapters/primary/http/itemRoutes.js"
            ]
        );

        let Artifact::File { content, .. } = &artifacts[1] else {
            panic!("routes should be a literal file");
        };
        assert!(content.contains("from '../../../core/domain/item.js'"));
        assert!(content.contains("from '../../../utils/pagination.js'"));
        assert!(content.contains("app.use('/items', router);"));
    }

    #[test]
    fn model_builder_coerces_declared_fields() {
        let model = DataModel::new("Order")
            .field("id", FieldType::Int)
            .field("total_cents", FieldType::Int);
        let js = model_file(&model);
        assert!(js.contains("export const ORDER_FIELDS = ['totalCents'];"));
        assert!(js.contains("export function buildOrder(id, input = {})"));
        assert!(js.contains("totalCents: input.totalCents == null ? null : Number.parseInt(input.totalCents, 10),"));
    }

    #[test]
    fn dependencies_track_integrations() {
        let mut spec = ProjectSpec::new(Language::Node).with_database(Database::Mysql);
        spec.use_orm = true;
        spec.infra.nats = true;
        spec.features.logger = true;
        let spec = normalized(spec);
        let units = Unit::all(&spec).unwrap();
        let names: Vec<_> = NodeStack::EXPRESS
            .dependencies(&units[0])
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["express", "mysql2", "nats", "pino", "sequelize"]);
    }
}
