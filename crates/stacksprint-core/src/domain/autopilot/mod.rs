//! Autopilot boilerplate: fixed helper files injected into every scaffold.
//!
//! Each matrix cell (one per framework) carries four units: request-id
//! propagation, request-completion logging, pagination parsing and a
//! retry-with-backoff connection helper. Monoliths get one copy at the
//! project root; microservices get one copy per service under
//! `services/<name>/`.

use std::borrow::Cow;
use std::fmt;

use crate::domain::{
    DomainError,
    entities::RelativePath,
    rules::NormalizedSpec,
    value_objects::Framework,
};

/// What a boilerplate unit does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    RequestId,
    RequestLogging,
    Pagination,
    Retry,
}

impl UnitKind {
    pub const ALL: [UnitKind; 4] = [
        Self::RequestId,
        Self::RequestLogging,
        Self::Pagination,
        Self::Retry,
    ];
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::RequestId => "request-id",
            Self::RequestLogging => "request-logging",
            Self::Pagination => "pagination",
            Self::Retry => "retry",
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Content {
    Static(&'static str),
    /// Python retry helper; the argument is the logger namespace.
    PythonRetry(&'static str),
}

#[derive(Debug, Clone, Copy)]
struct Unit {
    kind: UnitKind,
    path: &'static str,
    content: Content,
}

#[derive(Debug, Clone, Copy)]
struct Cell {
    framework: Framework,
    units: [Unit; 4],
}

const fn unit(kind: UnitKind, path: &'static str, content: Content) -> Unit {
    Unit {
        kind,
        path,
        content,
    }
}

const GO_PAGINATION: Unit = unit(
    UnitKind::Pagination,
    "internal/pagination/pagination.go",
    Content::Static(include_str!("assets/pagination.go")),
);
const GO_RETRY: Unit = unit(
    UnitKind::Retry,
    "internal/db/retry.go",
    Content::Static(include_str!("assets/retry.go")),
);
const NODE_PAGINATION: Unit = unit(
    UnitKind::Pagination,
    "src/utils/pagination.js",
    Content::Static(include_str!("assets/pagination.js")),
);
const NODE_RETRY: Unit = unit(
    UnitKind::Retry,
    "src/db/retry.js",
    Content::Static(include_str!("assets/retry.js")),
);

static MATRIX: &[Cell] = &[
    Cell {
        framework: Framework::Gin,
        units: [
            unit(
                UnitKind::RequestId,
                "internal/middleware/request_id.go",
                Content::Static(include_str!("assets/gin_request_id.go")),
            ),
            unit(
                UnitKind::RequestLogging,
                "internal/middleware/request_logging.go",
                Content::Static(include_str!("assets/gin_request_logging.go")),
            ),
            GO_PAGINATION,
            GO_RETRY,
        ],
    },
    Cell {
        framework: Framework::Fiber,
        units: [
            unit(
                UnitKind::RequestId,
                "internal/middleware/request_id.go",
                Content::Static(include_str!("assets/fiber_request_id.go")),
            ),
            unit(
                UnitKind::RequestLogging,
                "internal/middleware/request_logging.go",
                Content::Static(include_str!("assets/fiber_request_logging.go")),
            ),
            GO_PAGINATION,
            GO_RETRY,
        ],
    },
    Cell {
        framework: Framework::Express,
        units: [
            unit(
                UnitKind::RequestId,
                "src/middleware/requestId.js",
                Content::Static(include_str!("assets/express_request_id.js")),
            ),
            unit(
                UnitKind::RequestLogging,
                "src/middleware/requestLogging.js",
                Content::Static(include_str!("assets/express_request_logging.js")),
            ),
            NODE_PAGINATION,
            NODE_RETRY,
        ],
    },
    Cell {
        framework: Framework::Fastify,
        units: [
            unit(
                UnitKind::RequestId,
                "src/middleware/requestId.js",
                Content::Static(include_str!("assets/fastify_request_id.js")),
            ),
            unit(
                UnitKind::RequestLogging,
                "src/middleware/requestLogging.js",
                Content::Static(include_str!("assets/fastify_request_logging.js")),
            ),
            NODE_PAGINATION,
            NODE_RETRY,
        ],
    },
    Cell {
        framework: Framework::FastApi,
        units: [
            unit(
                UnitKind::RequestId,
                "app/middleware/request_id.py",
                Content::Static(include_str!("assets/fastapi_request_id.py")),
            ),
            unit(
                UnitKind::RequestLogging,
                "app/middleware/request_logging.py",
                Content::Static(include_str!("assets/fastapi_request_logging.py")),
            ),
            unit(
                UnitKind::Pagination,
                "app/utils/pagination.py",
                Content::Static(include_str!("assets/pagination.py")),
            ),
            unit(
                UnitKind::Retry,
                "app/db/retry.py",
                Content::PythonRetry("app.db.retry"),
            ),
        ],
    },
    Cell {
        framework: Framework::Django,
        units: [
            unit(
                UnitKind::RequestId,
                "api/middleware/request_id.py",
                Content::Static(include_str!("assets/django_request_id.py")),
            ),
            unit(
                UnitKind::RequestLogging,
                "api/middleware/request_logging.py",
                Content::Static(include_str!("assets/django_request_logging.py")),
            ),
            unit(
                UnitKind::Pagination,
                "api/utils/pagination.py",
                Content::Static(include_str!("assets/pagination.py")),
            ),
            unit(
                UnitKind::Retry,
                "api/db/retry.py",
                Content::PythonRetry("api.db.retry"),
            ),
        ],
    },
];

/// One selected boilerplate file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boilerplate {
    pub kind: UnitKind,
    pub path: RelativePath,
    pub content: Cow<'static, str>,
}

/// Boilerplate for every mount of the spec: the project root for monoliths,
/// `services/<name>` for each microservice.
pub fn select(spec: &NormalizedSpec) -> Result<Vec<Boilerplate>, DomainError> {
    if !spec.architecture.is_microservices() {
        return select_at(spec, None);
    }

    let mut selected = Vec::new();
    for service in &spec.services {
        let mount = RelativePath::parse(&format!("services/{}", service.name))?;
        selected.extend(select_at(spec, Some(&mount))?);
    }
    Ok(selected)
}

/// Boilerplate for a single mount. `None` means the project root.
pub fn select_at(
    spec: &NormalizedSpec,
    mount: Option<&RelativePath>,
) -> Result<Vec<Boilerplate>, DomainError> {
    let Some(cell) = MATRIX.iter().find(|c| c.framework == spec.framework()) else {
        return Ok(Vec::new());
    };

    cell.units
        .iter()
        .map(|unit| {
            let path = match mount {
                Some(base) => base.join(unit.path)?,
                None => RelativePath::parse(unit.path)?,
            };
            Ok(Boilerplate {
                kind: unit.kind,
                path,
                content: render(unit.content),
            })
        })
        .collect()
}

/// Logical paths (relative to a mount) a framework's cell would emit.
pub fn paths_for(framework: Framework) -> Vec<&'static str> {
    MATRIX
        .iter()
        .find(|c| c.framework == framework)
        .map(|c| c.units.iter().map(|u| u.path).collect())
        .unwrap_or_default()
}

fn render(content: Content) -> Cow<'static, str> {
    match content {
        Content::Static(text) => Cow::Borrowed(text),
        Content::PythonRetry(namespace) => Cow::Owned(python_retry(namespace)),
    }
}

fn python_retry(namespace: &str) -> String {
    format!(
        r#"import json
import logging
import time

logger = logging.getLogger("{namespace}")

MAX_ATTEMPTS = 10


def _log(level, event, **fields):
    logger.log(level, json.dumps({{"event": event, **fields}}))


def connect_with_retry(connect, max_attempts=MAX_ATTEMPTS):
    """Call ``connect`` until it succeeds, sleeping 1s, 2s, 4s, ... between tries."""
    last_error = None
    for attempt in range(1, max_attempts + 1):
        try:
            result = connect()
            _log(logging.INFO, "db_connected", attempt=attempt)
            return result
        except Exception as exc:  # noqa: BLE001
            last_error = exc
            if attempt == max_attempts:
                break
            wait_seconds = 2 ** (attempt - 1)
            _log(
                logging.WARNING,
                "db_connect_retry",
                attempt=attempt,
                next_wait_ms=wait_seconds * 1000,
                error=str(exc),
            )
            time.sleep(wait_seconds)
    _log(logging.ERROR, "db_connect_failed", attempts=max_attempts, error=str(last_error))
    raise RuntimeError(f"database unreachable after {{max_attempts}} attempts") from last_error
"#
    )
}
