use serde_json::Value;
use sg_core::{ErrorKind, GameError};
use sg_parser::{value_kind, ValueKind};

pub const GAME_SPEC_SCHEMA: &[(&str, ValueKind)] = &[
    ("configuration", ValueKind::Object),
    ("constants", ValueKind::Object),
    ("variables", ValueKind::Object),
    ("per-player", ValueKind::Object),
    ("per-audience", ValueKind::Object),
    ("rules", ValueKind::Array),
];

pub const SERVER_CONFIG_SCHEMA: &[(&str, ValueKind)] = &[
    ("port", ValueKind::UnsignedInteger),
    ("serverhtml", ValueKind::String),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    GameSpec,
    ServerConfig,
}

impl DocumentKind {
    pub fn schema(&self) -> &'static [(&'static str, ValueKind)] {
        match self {
            Self::GameSpec => GAME_SPEC_SCHEMA,
            Self::ServerConfig => SERVER_CONFIG_SCHEMA,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::GameSpec => "game specification",
            Self::ServerConfig => "server configuration",
        }
    }
}

pub fn validate_document(value: &Value, kind: DocumentKind) -> Result<(), GameError> {
    let Some(object) = value.as_object() else {
        return Err(schema_error(
            "SCHEMA_NOT_OBJECT",
            format!(
                "A {} document must be an object, got {}.",
                kind.name(),
                value_kind(value)
            ),
        ));
    };

    let schema = kind.schema();
    if object.len() != schema.len() {
        return Err(schema_error(
            "SCHEMA_FIELD_COUNT",
            format!(
                "A {} document must have exactly {} fields, got {}.",
                kind.name(),
                schema.len(),
                object.len()
            ),
        ));
    }

    for (field, expected) in schema {
        let Some(actual) = object.get(*field) else {
            return Err(schema_error(
                "SCHEMA_FIELD_MISSING",
                format!("Field \"{}\" is missing from {} document.", field, kind.name()),
            ));
        };
        let actual_kind = value_kind(actual);
        if !actual_kind.satisfies(*expected) {
            return Err(schema_error(
                "SCHEMA_FIELD_TYPE",
                format!(
                    "Field \"{}\" of {} document must be {}, got {}.",
                    field,
                    kind.name(),
                    expected,
                    actual_kind
                ),
            ));
        }
    }

    Ok(())
}

fn schema_error(code: &str, message: String) -> GameError {
    GameError::new(ErrorKind::SchemaValidation, code, message)
}

#[cfg(test)]
mod validate_tests {
    use super::*;
    use crate::compiler_test_support::game_document;
    use serde_json::json;

    #[test]
    fn accepts_well_formed_game_document() {
        let document = game_document(json!({"debug_target": 0}), json!({}), json!([]));
        validate_document(&document, DocumentKind::GameSpec).expect("document should validate");
    }

    #[test]
    fn rejects_extra_and_missing_fields() {
        let mut document = game_document(json!({}), json!({}), json!([]));
        document
            .as_object_mut()
            .expect("object")
            .insert("extra".to_string(), json!(1));
        let error = validate_document(&document, DocumentKind::GameSpec).expect_err("extra field");
        assert_eq!(error.code, "SCHEMA_FIELD_COUNT");
        assert_eq!(error.kind, ErrorKind::SchemaValidation);

        let object = document.as_object_mut().expect("object");
        object.remove("rules");
        let error =
            validate_document(&document, DocumentKind::GameSpec).expect_err("renamed field");
        assert_eq!(error.code, "SCHEMA_FIELD_MISSING");
    }

    #[test]
    fn rejects_wrong_field_kind() {
        let document = game_document(json!({}), json!({}), json!({}));
        let error = validate_document(&document, DocumentKind::GameSpec).expect_err("rules object");
        assert_eq!(error.code, "SCHEMA_FIELD_TYPE");
        assert!(error.message.contains("\"rules\""));
    }

    #[test]
    fn rejects_non_object_root() {
        let error =
            validate_document(&json!([1, 2]), DocumentKind::ServerConfig).expect_err("array root");
        assert_eq!(error.code, "SCHEMA_NOT_OBJECT");
    }

    #[test]
    fn server_config_port_must_be_unsigned() {
        validate_document(
            &json!({"port": 4000, "serverhtml": "web/index.html"}),
            DocumentKind::ServerConfig,
        )
        .expect("config should validate");

        let error = validate_document(
            &json!({"port": -1, "serverhtml": "web/index.html"}),
            DocumentKind::ServerConfig,
        )
        .expect_err("negative port");
        assert_eq!(error.code, "SCHEMA_FIELD_TYPE");

        let error = validate_document(
            &json!({"port": "4000", "serverhtml": "web/index.html"}),
            DocumentKind::ServerConfig,
        )
        .expect_err("string port");
        assert_eq!(error.code, "SCHEMA_FIELD_TYPE");
    }
}
