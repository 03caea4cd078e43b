//! JSON value formats
//!
//! Two flavours: plain `JSON` (schemaless payloads, no inference) and
//! schema-registry `JSON_SR`, which infers a JSON-schema document for the
//! value columns.

use crate::rillsql::schema::{Column, PersistenceSchema};
use crate::rillsql::serialization::{Format, FormatInfo, ParsedSchema};
use crate::rillsql::sql::ast::DataType;
use crate::rillsql::sql::error::{SqlError, SqlResult};
use serde_json::{json, Value};

/// Plain JSON. Schemaless; supports single-value unwrapping.
pub struct JsonFormat;

impl Format for JsonFormat {
    fn name(&self) -> &'static str {
        "JSON"
    }

    fn supports_unwrapping(&self) -> bool {
        true
    }

    fn to_parsed_schema(
        &self,
        _schema: &PersistenceSchema,
        _info: &FormatInfo,
    ) -> SqlResult<ParsedSchema> {
        Err(SqlError::configuration_error(
            "Format 'JSON' does not support schema inference",
        ))
    }
}

/// Schema-registry JSON. Infers a JSON-schema document for the value.
pub struct JsonSchemaFormat;

impl Format for JsonSchemaFormat {
    fn name(&self) -> &'static str {
        "JSON_SR"
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
        _info: &FormatInfo,
    ) -> SqlResult<ParsedSchema> {
        let columns = schema.columns();
        let doc = if schema.features().unwrap_single_values && columns.len() == 1 {
            json_type(&columns[0].data_type, columns[0].nullable)?
        } else {
            object_schema(columns)?
        };

        Ok(ParsedSchema::Json(doc))
    }
}

fn object_schema(columns: &[Column]) -> SqlResult<Value> {
    let mut properties = serde_json::Map::new();
    for column in columns {
        properties.insert(
            column.name.clone(),
            json_type(&column.data_type, column.nullable)?,
        );
    }
    Ok(json!({
        "type": "object",
        "properties": properties,
    }))
}

fn json_type(data_type: &DataType, nullable: bool) -> SqlResult<Value> {
    let scalar = |name: &str| {
        if nullable {
            json!({ "type": [name, "null"] })
        } else {
            json!({ "type": name })
        }
    };

    let schema = match data_type {
        DataType::Integer | DataType::BigInt | DataType::Timestamp => return Ok(scalar("integer")),
        DataType::Float | DataType::Decimal { .. } => return Ok(scalar("number")),
        DataType::String => return Ok(scalar("string")),
        DataType::Boolean => return Ok(scalar("boolean")),
        DataType::Array(inner) => json!({
            "type": "array",
            "items": json_type(inner, false)?,
        }),
        DataType::Map(key, value) => {
            if **key != DataType::String {
                return Err(SqlError::schema_error(
                    "JSON map keys must be STRING",
                    None,
                ));
            }
            json!({
                "type": "object",
                "additionalProperties": json_type(value, false)?,
            })
        }
        DataType::Struct(fields) => {
            let mut properties = serde_json::Map::new();
            for field in fields {
                properties.insert(field.name.clone(), json_type(&field.data_type, true)?);
            }
            json!({
                "type": "object",
                "properties": properties,
            })
        }
        DataType::Custom(name) => {
            return Err(SqlError::resolution_error(
                "Unresolved type alias in persistence schema",
                Some(name.clone()),
            ));
        }
    };

    Ok(if nullable {
        json!({ "oneOf": [{ "type": "null" }, schema] })
    } else {
        schema
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rillsql::serialization::SerdeFeatures;

    fn column(name: &str, data_type: DataType, nullable: bool) -> Column {
        Column {
            name: name.to_string(),
            data_type,
            key: false,
            nullable,
        }
    }

    #[test]
    fn test_plain_json_has_no_schema_inference() {
        assert!(!JsonFormat.supports_schema_inference());
        let schema = PersistenceSchema::from(vec![], SerdeFeatures::default());
        assert!(JsonFormat
            .to_parsed_schema(&schema, &FormatInfo::new("JSON"))
            .is_err());
    }

    #[test]
    fn test_object_schema_for_columns() {
        let schema = PersistenceSchema::from(
            vec![
                column("ITEM", DataType::String, true),
                column("QTY", DataType::Integer, false),
            ],
            SerdeFeatures::default(),
        );

        let parsed = JsonSchemaFormat
            .to_parsed_schema(&schema, &FormatInfo::new("JSON_SR"))
            .unwrap();
        match parsed {
            ParsedSchema::Json(doc) => {
                assert_eq!(doc["type"], "object");
                assert_eq!(doc["properties"]["ITEM"]["type"], json!(["string", "null"]));
                assert_eq!(doc["properties"]["QTY"]["type"], "integer");
            }
            other => panic!("expected JSON schema, got {:?}", other),
        }
    }

    #[test]
    fn test_unwrapped_single_column() {
        let schema = PersistenceSchema::from(
            vec![column("V", DataType::Boolean, false)],
            SerdeFeatures {
                unwrap_single_values: true,
            },
        );

        let parsed = JsonSchemaFormat
            .to_parsed_schema(&schema, &FormatInfo::new("JSON_SR"))
            .unwrap();
        assert_eq!(parsed, ParsedSchema::Json(json!({ "type": "boolean" })));
    }

    #[test]
    fn test_nullable_array_uses_one_of() {
        let schema = PersistenceSchema::from(
            vec![column(
                "TAGS",
                DataType::Array(Box::new(DataType::String)),
                true,
            )],
            SerdeFeatures::default(),
        );

        let parsed = JsonSchemaFormat
            .to_parsed_schema(&schema, &FormatInfo::new("JSON_SR"))
            .unwrap();
        match parsed {
            ParsedSchema::Json(doc) => {
                assert!(doc["properties"]["TAGS"]["oneOf"].is_array());
            }
            other => panic!("expected JSON schema, got {:?}", other),
        }
    }
}
