//! Serialization formats and value-schema inference
//!
//! Every source resolves to a key format and a value format. Formats that
//! are self-describing enough ([`Format::supports_schema_inference`]) can
//! convert a [`PersistenceSchema`] into their native schema representation
//! ([`ParsedSchema`]); the rest carry opaque payloads.
//!
//! The module also owns the serde feature flags
//! ([`SerdeFeatures`]/[`SerdeOptions`]) controlling the physical layout of
//! the value, and the [`DefaultFormatInjector`] that fills format
//! properties a statement left unset from the engine configuration.

pub mod avro;
pub mod json;

use crate::rillsql::schema::{LogicalSchema, PersistenceSchema};
use crate::rillsql::sql::ast::{
    Statement, FORMAT_PROPERTY, KEY_FORMAT_PROPERTY, VALUE_FORMAT_PROPERTY,
};
use crate::rillsql::sql::config::EngineConfig;
use crate::rillsql::sql::error::{SqlError, SqlResult};
use std::collections::HashMap;

pub use avro::AvroFormat;
pub use json::{JsonFormat, JsonSchemaFormat};

/// Resolved format metadata: the format name plus any format-scoped
/// properties (e.g. a schema name for registry formats).
#[derive(Debug, Clone, PartialEq)]
pub struct FormatInfo {
    /// Upper-cased format name
    pub name: String,
    /// Format-scoped properties
    pub properties: HashMap<String, String>,
}

impl FormatInfo {
    /// Create format metadata for the named format.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().to_uppercase(),
            properties: HashMap::new(),
        }
    }

    /// Attach a format-scoped property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Read a format-scoped property.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }
}

/// A value schema in a format's native representation.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedSchema {
    /// An Avro schema
    Avro(apache_avro::Schema),
    /// A JSON-schema document
    Json(serde_json::Value),
}

impl ParsedSchema {
    /// Canonical text form, for display and comparison.
    pub fn canonical(&self) -> String {
        match self {
            ParsedSchema::Avro(schema) => schema.canonical_form(),
            ParsedSchema::Json(value) => value.to_string(),
        }
    }
}

/// Serde feature flags controlling the physical layout of a value schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SerdeFeatures {
    /// Persist a single-column value as the bare column value instead of
    /// wrapping it in a record/object envelope
    pub unwrap_single_values: bool,
}

/// The resolved serde options of a source creation statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SerdeOptions {
    value_features: SerdeFeatures,
}

impl SerdeOptions {
    /// Wrap a set of value-side features.
    pub fn of(value_features: SerdeFeatures) -> Self {
        Self { value_features }
    }

    /// The value-side feature flags.
    pub fn value_features(&self) -> SerdeFeatures {
        self.value_features
    }
}

/// A serialization format known to the engine.
pub trait Format {
    /// Canonical upper-case format name.
    fn name(&self) -> &'static str;

    /// Whether a value schema can be inferred from a logical column list.
    fn supports_schema_inference(&self) -> bool {
        false
    }

    /// Whether the format can persist a single-column value unwrapped.
    fn supports_unwrapping(&self) -> bool {
        false
    }

    /// Convert a persistence schema into this format's native schema.
    fn to_parsed_schema(
        &self,
        schema: &PersistenceSchema,
        info: &FormatInfo,
    ) -> SqlResult<ParsedSchema>;
}

/// Broker-native key serde. Primitive keys only, no schema.
pub struct KafkaFormat;

impl Format for KafkaFormat {
    fn name(&self) -> &'static str {
        "KAFKA"
    }

    fn to_parsed_schema(
        &self,
        _schema: &PersistenceSchema,
        _info: &FormatInfo,
    ) -> SqlResult<ParsedSchema> {
        Err(SqlError::configuration_error(
            "Format 'KAFKA' does not support schema inference",
        ))
    }
}

/// Character-delimited rows. No schema, no unwrapping.
pub struct DelimitedFormat;

impl Format for DelimitedFormat {
    fn name(&self) -> &'static str {
        "DELIMITED"
    }

    fn to_parsed_schema(
        &self,
        _schema: &PersistenceSchema,
        _info: &FormatInfo,
    ) -> SqlResult<ParsedSchema> {
        Err(SqlError::configuration_error(
            "Format 'DELIMITED' does not support schema inference",
        ))
    }
}

/// Registry of serialization formats known to the engine.
pub struct FormatFactory;

impl FormatFactory {
    /// Resolve format metadata to a format implementation.
    pub fn of(info: &FormatInfo) -> SqlResult<&'static dyn Format> {
        match info.name.as_str() {
            "KAFKA" => Ok(&KafkaFormat),
            "JSON" => Ok(&JsonFormat),
            "JSON_SR" => Ok(&JsonSchemaFormat),
            "AVRO" => Ok(&AvroFormat),
            "DELIMITED" => Ok(&DelimitedFormat),
            other => Err(SqlError::configuration_error(format!(
                "Unknown format: {}",
                other
            ))),
        }
    }
}

/// Build the serde options of a source creation statement.
///
/// Validates the declared `wrap_single_value` preference against the value
/// format's capability and the value column arity, and applies the
/// engine-wide default when the statement is silent.
pub fn build_for_create_statement(
    schema: &LogicalSchema,
    key_format: &dyn Format,
    value_format: &dyn Format,
    declared_wrap: Option<bool>,
    config: &EngineConfig,
) -> SqlResult<SerdeOptions> {
    if key_format.name() == "KAFKA" && schema.key().len() > 1 {
        return Err(SqlError::configuration_error(
            "Key format 'KAFKA' supports at most one key column",
        ));
    }

    let value_count = schema.value().len();

    let unwrap = match declared_wrap {
        Some(wrap) => {
            if !value_format.supports_unwrapping() {
                return Err(SqlError::configuration_error(format!(
                    "Format '{}' does not support the 'wrap_single_value' option",
                    value_format.name()
                )));
            }
            if value_count != 1 {
                return Err(SqlError::configuration_error(
                    "'wrap_single_value' is only valid for single-column value schemas",
                ));
            }
            !wrap
        }
        None => match config.wrap_single_values {
            Some(wrap) if value_count == 1 && value_format.supports_unwrapping() => !wrap,
            _ => false,
        },
    };

    Ok(SerdeOptions::of(SerdeFeatures {
        unwrap_single_values: unwrap,
    }))
}

/// Fills format properties a statement left unset from the engine
/// configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFormatInjector;

impl DefaultFormatInjector {
    /// Create a new injector.
    pub fn new() -> Self {
        Self
    }

    /// Return the statement with any unset key/value format filled in.
    ///
    /// A statement with no value format and no configured default cannot
    /// be resolved and fails with a `ConfigurationError`.
    pub fn inject(&self, statement: Statement, config: &EngineConfig) -> SqlResult<Statement> {
        match statement {
            Statement::CreateStream {
                name,
                columns,
                mut properties,
            } => {
                Self::inject_formats(&name, &mut properties, config)?;
                Ok(Statement::CreateStream {
                    name,
                    columns,
                    properties,
                })
            }
            Statement::CreateTable {
                name,
                columns,
                mut properties,
            } => {
                Self::inject_formats(&name, &mut properties, config)?;
                Ok(Statement::CreateTable {
                    name,
                    columns,
                    properties,
                })
            }
            other => Ok(other),
        }
    }

    fn inject_formats(
        name: &str,
        properties: &mut HashMap<String, String>,
        config: &EngineConfig,
    ) -> SqlResult<()> {
        let has_shared_format = properties.contains_key(FORMAT_PROPERTY);

        if !has_shared_format && !properties.contains_key(KEY_FORMAT_PROPERTY) {
            properties.insert(
                KEY_FORMAT_PROPERTY.to_string(),
                config.default_key_format.clone(),
            );
        }

        if !has_shared_format && !properties.contains_key(VALUE_FORMAT_PROPERTY) {
            match &config.default_value_format {
                Some(format) => {
                    log::debug!("injecting default value format '{}' for '{}'", format, name);
                    properties.insert(VALUE_FORMAT_PROPERTY.to_string(), format.clone());
                }
                None => {
                    return Err(SqlError::configuration_error(format!(
                        "Statement for '{}' has no value format and no default is configured",
                        name
                    )));
                }
            }
        }

        Ok(())
    }
}
