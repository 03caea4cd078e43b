//! Avro value-schema inference
//!
//! Builds the Avro schema document for a persistence schema as JSON and
//! parses it with `apache_avro::Schema::parse_str`, so the resulting
//! schema is exactly what the registry would hold.

use crate::rillsql::schema::{Column, PersistenceSchema};
use crate::rillsql::serialization::{Format, FormatInfo, ParsedSchema};
use crate::rillsql::sql::ast::{DataType, SCHEMA_NAME_PROPERTY};
use crate::rillsql::sql::error::{SqlError, SqlResult};
use apache_avro::Schema as AvroSchema;
use serde_json::{json, Value};

/// Record name used when the statement declares no schema name.
pub const DEFAULT_SCHEMA_NAME: &str = "StreamValueSchema";

/// Schema-registry Avro. Supports schema inference and single-value
/// unwrapping.
pub struct AvroFormat;

impl Format for AvroFormat {
    fn name(&self) -> &'static str {
        "AVRO"
    }

    fn supports_schema_inference(&self) -> bool {
        true
    }

    fn supports_unwrapping(&self) -> bool {
        true
    }

    fn to_parsed_schema(
        &self,
        schema: &PersistenceSchema,
        info: &FormatInfo,
    ) -> SqlResult<ParsedSchema> {
        let record_name = info
            .property(SCHEMA_NAME_PROPERTY)
            .unwrap_or(DEFAULT_SCHEMA_NAME);

        let columns = schema.columns();
        let doc = if schema.features().unwrap_single_values && columns.len() == 1 {
            column_type(&columns[0], record_name)?
        } else {
            let fields = columns
                .iter()
                .map(|c| field_schema(c, record_name))
                .collect::<SqlResult<Vec<_>>>()?;
            json!({
                "type": "record",
                "name": record_name,
                "fields": fields,
            })
        };

        let parsed = AvroSchema::parse_str(&doc.to_string()).map_err(|e| {
            SqlError::schema_error(format!("Failed to build Avro schema: {}", e), None)
        })?;

        Ok(ParsedSchema::Avro(parsed))
    }
}

fn field_schema(column: &Column, parent: &str) -> SqlResult<Value> {
    let base = avro_type(&column.data_type, &format!("{}_{}", parent, column.name))?;
    Ok(if column.nullable {
        json!({
            "name": column.name,
            "type": ["null", base],
            "default": null,
        })
    } else {
        json!({
            "name": column.name,
            "type": base,
        })
    })
}

fn column_type(column: &Column, parent: &str) -> SqlResult<Value> {
    let base = avro_type(&column.data_type, &format!("{}_{}", parent, column.name))?;
    Ok(if column.nullable {
        json!(["null", base])
    } else {
        base
    })
}

fn avro_type(data_type: &DataType, name_hint: &str) -> SqlResult<Value> {
    match data_type {
        DataType::Integer => Ok(json!("int")),
        DataType::BigInt => Ok(json!("long")),
        DataType::Float => Ok(json!("double")),
        DataType::String => Ok(json!("string")),
        DataType::Boolean => Ok(json!("boolean")),
        DataType::Timestamp => Ok(json!({
            "type": "long",
            "logicalType": "timestamp-millis",
        })),
        DataType::Decimal { precision, scale } => Ok(json!({
            "type": "bytes",
            "logicalType": "decimal",
            "precision": precision,
            "scale": scale,
        })),
        DataType::Array(inner) => Ok(json!({
            "type": "array",
            "items": avro_type(inner, name_hint)?,
        })),
        DataType::Map(key, value) => {
            if **key != DataType::String {
                return Err(SqlError::schema_error(
                    "Avro map keys must be STRING",
                    None,
                ));
            }
            Ok(json!({
                "type": "map",
                "values": avro_type(value, name_hint)?,
            }))
        }
        DataType::Struct(fields) => {
            // Struct fields are always optional on the wire
            let field_docs = fields
                .iter()
                .map(|f| {
                    let nested = format!("{}_{}", name_hint, f.name);
                    Ok(json!({
                        "name": f.name,
                        "type": ["null", avro_type(&f.data_type, &nested)?],
                        "default": null,
                    }))
                })
                .collect::<SqlResult<Vec<_>>>()?;
            Ok(json!({
                "type": "record",
                "name": name_hint,
                "fields": field_docs,
            }))
        }
        DataType::Custom(name) => Err(SqlError::resolution_error(
            "Unresolved type alias in persistence schema",
            Some(name.clone()),
        )),
    }
}
