//! Database bootstrap content, dialect-aware.

use crate::domain::{
    entities::DataModel,
    naming,
    value_objects::{Database, FieldType},
};

/// SQL flavor. Only the SQL engines have one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Mysql,
}

impl Dialect {
    pub fn of(db: Database) -> Option<Self> {
        match db {
            Database::Postgresql => Some(Self::Postgres),
            Database::Mysql => Some(Self::Mysql),
            Database::None | Database::Mongodb => None,
        }
    }

    pub const fn primary_key(&self) -> &'static str {
        match self {
            Self::Postgres => "id SERIAL PRIMARY KEY",
            Self::Mysql => "id INT AUTO_INCREMENT PRIMARY KEY",
        }
    }

    pub const fn column_type(&self, ty: FieldType) -> &'static str {
        match (self, ty) {
            (Self::Postgres, FieldType::String) => "TEXT",
            (Self::Mysql, FieldType::String) => "VARCHAR(255)",
            (_, FieldType::Int) => "BIGINT",
            (Self::Postgres, FieldType::Float) => "DOUBLE PRECISION",
            (Self::Mysql, FieldType::Float) => "DOUBLE",
            (_, FieldType::Bool) => "BOOLEAN",
            (Self::Postgres, FieldType::Datetime) => "TIMESTAMP",
            (Self::Mysql, FieldType::Datetime) => "DATETIME",
            (Self::Postgres, FieldType::Uuid) => "UUID",
            (Self::Mysql, FieldType::Uuid) => "CHAR(36)",
        }
    }

    /// Insert that tolerates a second run against the same schema.
    const fn seed_migration(&self) -> &'static str {
        match self {
            Self::Postgres => {
                "INSERT INTO schema_migrations (version) VALUES ('001_init') ON CONFLICT (version) DO NOTHING;\n"
            }
            Self::Mysql => "INSERT IGNORE INTO schema_migrations (version) VALUES ('001_init');\n",
        }
    }

    const fn table_suffix(&self) -> &'static str {
        match self {
            Self::Postgres => "",
            Self::Mysql => " ENGINE=InnoDB DEFAULT CHARSET=utf8mb4",
        }
    }
}

fn tables(models: &[DataModel]) -> Vec<DataModel> {
    if models.is_empty() {
        vec![DataModel::sample()]
    } else {
        models.to_vec()
    }
}

/// `CREATE TABLE` per model (the sample `items` table when none are given).
///
/// Returns an empty string for databases without a SQL dialect.
pub fn sample_migration(db: Database, models: &[DataModel]) -> String {
    let Some(dialect) = Dialect::of(db) else {
        return String::new();
    };

    let mut sql = String::from("-- 001_init: application tables\n");
    for model in tables(models) {
        sql.push_str(&format!(
            "\nCREATE TABLE IF NOT EXISTS {} (\n    {}",
            naming::table(&model.name),
            dialect.primary_key()
        ));
        for field in model.data_fields() {
            sql.push_str(&format!(
                ",\n    {} {}",
                naming::snake(&field.name),
                dialect.column_type(field.ty)
            ));
        }
        sql.push_str(&format!(
            ",\n    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP\n){};\n",
            dialect.table_suffix()
        ));
    }
    sql
}

/// Migration bookkeeping table, seeded with the first migration.
pub fn sample_db_init(db: Database, models: &[DataModel]) -> String {
    let Some(dialect) = Dialect::of(db) else {
        return String::new();
    };

    let mut sql = String::from("-- init: migration bookkeeping\n\n");
    sql.push_str(&format!(
        "CREATE TABLE IF NOT EXISTS schema_migrations (\n    {},\n    version VARCHAR(64) NOT NULL UNIQUE,\n    applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP\n){};\n",
        dialect.primary_key(),
        dialect.table_suffix()
    ));
    sql.push('\n');
    sql.push_str(dialect.seed_migration());

    let names: Vec<_> = tables(models)
        .iter()
        .map(|m| naming::table(&m.name))
        .collect();
    sql.push_str(&format!("\n-- tables: {}\n", names.join(", ")));
    sql
}

/// Collection setup script for the `mongo` container's init directory.
///
/// Services share one container, so existing collections are skipped.
pub fn mongo_init(models: &[DataModel]) -> String {
    let mut js = String::from("// Runs once when the mongo container initialises.\n");
    js.push_str("const database = db.getSiblingDB(process.env.MONGO_INITDB_DATABASE || 'app');\n");
    js.push_str("const existing = database.getCollectionNames();\n\n");
    for model in tables(models) {
        let name = naming::table(&model.name);
        js.push_str(&format!(
            "if (!existing.includes('{name}')) {{\n    database.createCollection('{name}');\n}}\n"
        ));
    }
    js
}
