use std::collections::HashSet;

use crate::domain::{
    entities::{CustomOptions, DataModel, RelativePath, ServiceConfig},
    error::DomainError,
    naming,
};

/// Centralized structural validation for specification contents.
///
/// The rule engine calls this after its corrections; anything reported here
/// cannot be auto-corrected.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_services(services: &[ServiceConfig]) -> Result<(), DomainError> {
        let mut names = HashSet::new();
        let mut ports = HashSet::new();

        for service in services {
            let invalid = |reason: String| DomainError::InvalidService {
                name: service.name.clone(),
                reason,
            };

            if !is_service_name(&service.name) {
                return Err(invalid(
                    "must start with a lowercase letter or digit and contain only [a-z0-9_-]"
                        .into(),
                ));
            }
            if service.port == 0 {
                return Err(invalid("port must be between 1 and 65535".into()));
            }
            if !names.insert(service.name.as_str()) {
                return Err(invalid("declared more than once".into()));
            }
            if !ports.insert(service.port) {
                return Err(invalid(format!(
                    "port {} is already used by another service",
                    service.port
                )));
            }
        }
        Ok(())
    }

    pub fn validate_models(models: &[DataModel]) -> Result<(), DomainError> {
        let mut seen = HashSet::new();

        for model in models {
            let invalid = |reason: String| DomainError::InvalidModel {
                name: model.name.clone(),
                reason,
            };

            if !is_identifier(&model.name) {
                return Err(invalid("name must be an identifier starting with a letter".into()));
            }
            // Generated files and tables are named from the snake_case form.
            if !seen.insert(naming::snake(&model.name)) {
                return Err(invalid(format!(
                    "collides with another model as '{}'",
                    naming::snake(&model.name)
                )));
            }

            let mut fields = HashSet::new();
            for field in &model.fields {
                if !is_identifier(&field.name) {
                    return Err(invalid(format!("field '{}' is not an identifier", field.name)));
                }
                if !fields.insert(naming::snake(&field.name)) {
                    return Err(invalid(format!("field '{}' is declared twice", field.name)));
                }
            }
        }
        Ok(())
    }

    /// Every customization path must stay inside the project root.
    pub fn validate_custom_paths(custom: &CustomOptions) -> Result<(), DomainError> {
        let paths = custom
            .add_folders
            .iter()
            .chain(&custom.remove_folders)
            .chain(&custom.remove_files)
            .chain(custom.add_files.iter().map(|f| &f.path));

        for path in paths {
            RelativePath::parse(path)?;
        }
        Ok(())
    }
}

/// `[a-z0-9][a-z0-9_-]*`
pub fn is_service_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase() || c.is_ascii_digit())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
}

/// `[A-Za-z][A-Za-z0-9_]*`
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::CustomFile;
    use crate::domain::value_objects::FieldType;

    fn svc(name: &str, port: u16) -> ServiceConfig {
        ServiceConfig {
            name: name.into(),
            port,
        }
    }

    #[test]
    fn accepts_well_formed_services() {
        let services = [svc("users", 9001), svc("order-api", 9002)];
        assert!(DomainValidator::validate_services(&services).is_ok());
    }

    #[test]
    fn rejects_bad_service_names_and_ports() {
        assert!(DomainValidator::validate_services(&[svc("Users", 9001)]).is_err());
        assert!(DomainValidator::validate_services(&[svc("../x", 9001)]).is_err());
        assert!(DomainValidator::validate_services(&[svc("users", 0)]).is_err());
        assert!(
            DomainValidator::validate_services(&[svc("a", 9001), svc("b", 9001)]).is_err()
        );
        assert!(
            DomainValidator::validate_services(&[svc("a", 9001), svc("a", 9002)]).is_err()
        );
    }

    #[test]
    fn rejects_duplicate_models_case_insensitively() {
        let models = [DataModel::new("Order"), DataModel::new("order")];
        assert!(DomainValidator::validate_models(&models).is_err());
    }

    #[test]
    fn rejects_models_sharing_a_snake_case_name() {
        let models = [DataModel::new("OrderLine"), DataModel::new("Order_Line")];
        let err = DomainValidator::validate_models(&models).unwrap_err();
        assert!(err.to_string().contains("order_line"));

        let model = DataModel::new("Order")
            .field("createdBy", FieldType::String)
            .field("created_by", FieldType::String);
        assert!(DomainValidator::validate_models(&[model]).is_err());
    }

    #[test]
    fn rejects_non_identifier_fields() {
        let model = DataModel::new("Order").field("total amount", FieldType::Float);
        assert!(DomainValidator::validate_models(&[model]).is_err());
    }

    #[test]
    fn rejects_escaping_custom_files() {
        let custom = CustomOptions {
            add_files: vec![CustomFile {
                path: "../outside.txt".into(),
                content: String::new(),
            }],
            ..CustomOptions::default()
        };
        assert!(matches!(
            DomainValidator::validate_custom_paths(&custom),
            Err(DomainError::InvalidPath { .. })
        ));
    }
}
