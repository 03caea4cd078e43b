/*!
# DDL Abstract Syntax Tree

AST for the DDL subset of the streaming SQL grammar that test tooling needs
to understand: source creation (`CREATE STREAM` / `CREATE TABLE` with a
column list and a WITH-clause property map) and type registration
(`CREATE TYPE <name> AS <type>`).

Statements the test tooling recognizes but does not act on (SELECT, INSERT,
CSAS/CTAS, SHOW, ...) are kept as a single `Other` variant so downstream
code can match the statement space exhaustively instead of probing syntax
node types.

## Example Statements

```sql
-- Source creation with key and value columns
CREATE STREAM orders (ID BIGINT KEY, ITEM STRING, PRICE DECIMAL(10, 2))
    WITH ('topic' = 'orders', 'value_format' = 'AVRO');

-- Type registration, visible to later statements in the same batch
CREATE TYPE ADDRESS AS STRUCT(NUMBER INT, STREET STRING);
```
*/

use crate::rillsql::sql::error::{SqlError, SqlResult};
use std::collections::HashMap;

/// WITH-clause property naming the physical topic of a source.
pub const TOPIC_PROPERTY: &str = "topic";
/// WITH-clause property for the key serialization format.
pub const KEY_FORMAT_PROPERTY: &str = "key_format";
/// WITH-clause property for the value serialization format.
pub const VALUE_FORMAT_PROPERTY: &str = "value_format";
/// WITH-clause property setting both key and value format at once.
pub const FORMAT_PROPERTY: &str = "format";
/// WITH-clause property for the topic partition count.
pub const PARTITIONS_PROPERTY: &str = "partitions";
/// WITH-clause property for the topic replication factor.
pub const REPLICAS_PROPERTY: &str = "replicas";
/// WITH-clause property controlling single-value wrapping.
pub const WRAP_SINGLE_VALUE_PROPERTY: &str = "wrap_single_value";
/// WITH-clause property naming the value schema (schema-registry formats).
pub const SCHEMA_NAME_PROPERTY: &str = "schema_name";

/// Root AST node for one parsed SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// CREATE STREAM with an explicit column list.
    ///
    /// Declares a source backed by a topic. The WITH-clause property map
    /// carries topic name, formats, partitions, and replicas.
    CreateStream {
        /// Name of the stream
        name: String,
        /// Declared columns (may be empty)
        columns: Vec<ColumnDef>,
        /// WITH-clause properties, keys lowercased
        properties: HashMap<String, String>,
    },
    /// CREATE TABLE with an explicit column list.
    CreateTable {
        /// Name of the table
        name: String,
        /// Declared columns (may be empty)
        columns: Vec<ColumnDef>,
        /// WITH-clause properties, keys lowercased
        properties: HashMap<String, String>,
    },
    /// CREATE TYPE statement binding an alias to a SQL type.
    ///
    /// Registered aliases are visible to later statements in the same
    /// batch through the shared catalog.
    RegisterType {
        /// The alias being registered
        name: String,
        /// The aliased type (may itself reference earlier aliases)
        data_type: DataType,
    },
    /// Any recognized statement the test tooling does not act on.
    Other {
        /// Leading keyword(s) identifying the statement shape
        keyword: String,
    },
}

impl Statement {
    /// Typed view over the WITH-clause properties of a source creation
    /// statement; `None` for other statement kinds.
    pub fn source_properties(&self) -> Option<SourceProperties<'_>> {
        match self {
            Statement::CreateStream {
                name, properties, ..
            }
            | Statement::CreateTable {
                name, properties, ..
            } => Some(SourceProperties {
                source_name: name,
                properties,
            }),
            _ => None,
        }
    }
}

/// Classification of a parsed statement.
///
/// Produced once from the statement's syntactic shape; purely syntax-driven
/// and never fails for statements that will fail later at prepare time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// `CREATE TYPE ... AS ...`
    TypeRegistration,
    /// `CREATE STREAM name (columns) WITH (...)`
    CreateStream,
    /// `CREATE TABLE name (columns) WITH (...)`
    CreateTable,
    /// Anything else the parser recognizes
    Other,
}

impl StatementKind {
    /// Classify a statement by its syntactic shape.
    pub fn of(statement: &Statement) -> StatementKind {
        match statement {
            Statement::RegisterType { .. } => StatementKind::TypeRegistration,
            Statement::CreateStream { .. } => StatementKind::CreateStream,
            Statement::CreateTable { .. } => StatementKind::CreateTable,
            Statement::Other { .. } => StatementKind::Other,
        }
    }

    /// Is this a type registration?
    pub fn is_type_registration(self) -> bool {
        self == StatementKind::TypeRegistration
    }

    /// Is this a source-creating statement (stream or table)?
    pub fn is_create_source(self) -> bool {
        matches!(self, StatementKind::CreateStream | StatementKind::CreateTable)
    }
}

/// A column declaration within a CREATE STREAM/TABLE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    /// Column name
    pub name: String,
    /// Declared SQL type (may be a `Custom` alias before preparation)
    pub data_type: DataType,
    /// Whether the column is part of the message key (`KEY` / `PRIMARY KEY`)
    pub key: bool,
    /// Whether the column admits NULL values
    pub nullable: bool,
}

/// A named field inside a STRUCT type.
#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
    /// Field name
    pub name: String,
    /// Field type
    pub data_type: DataType,
}

/// SQL data types supported by the DDL grammar.
#[derive(Debug, Clone, PartialEq)]
pub enum DataType {
    /// 32-bit signed integer (INT, INTEGER)
    Integer,
    /// 64-bit signed integer (BIGINT)
    BigInt,
    /// 64-bit float (FLOAT, DOUBLE, REAL)
    Float,
    /// UTF-8 string (STRING, VARCHAR, TEXT)
    String,
    /// Boolean (BOOLEAN, BOOL)
    Boolean,
    /// Millisecond-precision timestamp
    Timestamp,
    /// Fixed-point decimal with precision and scale
    Decimal { precision: u32, scale: u32 },
    /// Variable-length array of a single element type
    Array(Box<DataType>),
    /// Map with typed keys and values
    Map(Box<DataType>, Box<DataType>),
    /// Nested record with named fields
    Struct(Vec<StructField>),
    /// A registered type alias, resolved against the catalog at prepare time
    Custom(String),
}

impl DataType {
    /// Whether the type still contains unresolved `Custom` aliases.
    pub fn is_resolved(&self) -> bool {
        match self {
            DataType::Custom(_) => false,
            DataType::Array(inner) => inner.is_resolved(),
            DataType::Map(key, value) => key.is_resolved() && value.is_resolved(),
            DataType::Struct(fields) => fields.iter().all(|f| f.data_type.is_resolved()),
            _ => true,
        }
    }
}

/// Typed accessors over a source creation statement's WITH-clause map.
///
/// The `format` property sets both sides at once; `key_format` and
/// `value_format` take precedence over it. The topic name defaults to the
/// source name when the `topic` property is absent.
#[derive(Debug, Clone, Copy)]
pub struct SourceProperties<'a> {
    source_name: &'a str,
    properties: &'a HashMap<String, String>,
}

impl<'a> SourceProperties<'a> {
    /// Wrap a raw property map for the named source.
    pub fn new(source_name: &'a str, properties: &'a HashMap<String, String>) -> Self {
        SourceProperties {
            source_name,
            properties,
        }
    }

    /// Physical topic name: the `topic` property, else the source name.
    pub fn topic(&self) -> String {
        self.properties
            .get(TOPIC_PROPERTY)
            .cloned()
            .unwrap_or_else(|| self.source_name.to_string())
    }

    /// Declared key format, if any (`key_format`, else `format`).
    pub fn key_format(&self) -> Option<String> {
        self.properties
            .get(KEY_FORMAT_PROPERTY)
            .or_else(|| self.properties.get(FORMAT_PROPERTY))
            .map(|f| f.to_uppercase())
    }

    /// Declared value format, if any (`value_format`, else `format`).
    pub fn value_format(&self) -> Option<String> {
        self.properties
            .get(VALUE_FORMAT_PROPERTY)
            .or_else(|| self.properties.get(FORMAT_PROPERTY))
            .map(|f| f.to_uppercase())
    }

    /// Declared partition count, if any.
    pub fn partitions(&self) -> SqlResult<Option<i32>> {
        self.parse_number(PARTITIONS_PROPERTY)
    }

    /// Declared replication factor, if any.
    pub fn replicas(&self) -> SqlResult<Option<i16>> {
        self.parse_number(REPLICAS_PROPERTY)
    }

    /// Declared single-value wrapping preference, if any.
    pub fn wrap_single_value(&self) -> SqlResult<Option<bool>> {
        match self.properties.get(WRAP_SINGLE_VALUE_PROPERTY) {
            None => Ok(None),
            Some(raw) => match raw.to_lowercase().as_str() {
                "true" => Ok(Some(true)),
                "false" => Ok(Some(false)),
                other => Err(SqlError::configuration_error(format!(
                    "Invalid value '{}' for property '{}': expected true or false",
                    other, WRAP_SINGLE_VALUE_PROPERTY
                ))),
            },
        }
    }

    /// Declared value schema name, if any (schema-registry formats).
    pub fn schema_name(&self) -> Option<String> {
        self.properties.get(SCHEMA_NAME_PROPERTY).cloned()
    }

    fn parse_number<T: std::str::FromStr>(&self, property: &str) -> SqlResult<Option<T>> {
        match self.properties.get(property) {
            None => Ok(None),
            Some(raw) => raw.parse::<T>().map(Some).map_err(|_| {
                SqlError::configuration_error(format!(
                    "Invalid value '{}' for property '{}': expected a number",
                    raw, property
                ))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_topic_defaults_to_source_name() {
        let map = props(&[]);
        let sp = SourceProperties::new("orders", &map);
        assert_eq!(sp.topic(), "orders");

        let map = props(&[("topic", "orders_topic")]);
        let sp = SourceProperties::new("orders", &map);
        assert_eq!(sp.topic(), "orders_topic");
    }

    #[test]
    fn test_format_property_sets_both_sides() {
        let map = props(&[("format", "avro")]);
        let sp = SourceProperties::new("orders", &map);
        assert_eq!(sp.key_format(), Some("AVRO".to_string()));
        assert_eq!(sp.value_format(), Some("AVRO".to_string()));

        let map = props(&[("format", "avro"), ("value_format", "json")]);
        let sp = SourceProperties::new("orders", &map);
        assert_eq!(sp.key_format(), Some("AVRO".to_string()));
        assert_eq!(sp.value_format(), Some("JSON".to_string()));
    }

    #[test]
    fn test_invalid_partitions_is_a_configuration_error() {
        let map = props(&[("partitions", "lots")]);
        let sp = SourceProperties::new("orders", &map);
        assert!(matches!(
            sp.partitions(),
            Err(SqlError::ConfigurationError { .. })
        ));
    }

    #[test]
    fn test_wrap_single_value_parsing() {
        let map = props(&[("wrap_single_value", "false")]);
        let sp = SourceProperties::new("orders", &map);
        assert_eq!(sp.wrap_single_value().unwrap(), Some(false));

        let map = props(&[("wrap_single_value", "maybe")]);
        let sp = SourceProperties::new("orders", &map);
        assert!(sp.wrap_single_value().is_err());
    }

    #[test]
    fn test_statement_kind_membership() {
        let stmt = Statement::RegisterType {
            name: "ADDRESS".to_string(),
            data_type: DataType::String,
        };
        assert!(StatementKind::of(&stmt).is_type_registration());
        assert!(!StatementKind::of(&stmt).is_create_source());

        let stmt = Statement::CreateTable {
            name: "t".to_string(),
            columns: vec![],
            properties: HashMap::new(),
        };
        assert!(StatementKind::of(&stmt).is_create_source());
    }

    #[test]
    fn test_data_type_resolution_state() {
        assert!(DataType::BigInt.is_resolved());
        assert!(!DataType::Custom("ADDRESS".to_string()).is_resolved());
        assert!(!DataType::Array(Box::new(DataType::Custom("T".to_string()))).is_resolved());
        assert!(DataType::Struct(vec![StructField {
            name: "a".to_string(),
            data_type: DataType::Integer,
        }])
        .is_resolved());
    }
}
