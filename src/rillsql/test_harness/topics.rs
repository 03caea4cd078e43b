//! Statement-to-topic inference
//!
//! Derives the set of implied topic configurations a declarative test case
//! needs: every source-creating statement targets a topic with a partition
//! count, a replication factor, and - when the value format supports
//! schema inference - a value schema.
//!
//! Statement-level failures are absorbed by design: the broader test
//! framework supplies intentionally malformed SQL as negative fixtures,
//! and their failure belongs to the test's own assertion phase, not here.
//! Such statements simply contribute no topic, with a diagnostic log line.

use super::error::{TestHarnessError, TestHarnessResult};
use super::spec::Record;
use crate::rillsql::catalog::{register_statement_type, FunctionRegistry, MetaStore};
use crate::rillsql::schema::{LogicalSchema, PersistenceSchema};
use crate::rillsql::serialization::{
    self, DefaultFormatInjector, FormatFactory, FormatInfo, ParsedSchema, SerdeOptions,
};
use crate::rillsql::sql::ast::{
    SourceProperties, Statement, StatementKind, SCHEMA_NAME_PROPERTY,
};
use crate::rillsql::sql::config::EngineConfig;
use crate::rillsql::sql::error::{SqlError, SqlResult};
use crate::rillsql::sql::parser::{ParsedStatement, StreamingSqlParser};

/// A messaging topic implied by a test case.
///
/// Two topics are the same entity iff their names are equal; in the
/// aggregated set, all other fields of the first-seen instance win.
#[derive(Debug, Clone, PartialEq)]
pub struct Topic {
    name: String,
    partitions: i32,
    replication_factor: i16,
    value_schema: Option<ParsedSchema>,
}

impl Topic {
    /// Partition count applied when a statement or declaration omits one.
    pub const DEFAULT_PARTITIONS: i32 = 1;
    /// Replication factor applied when a statement or declaration omits one.
    pub const DEFAULT_REPLICAS: i16 = 1;

    /// Construct a fully specified topic.
    pub fn new(
        name: impl Into<String>,
        partitions: i32,
        replication_factor: i16,
        value_schema: Option<ParsedSchema>,
    ) -> Self {
        Self {
            name: name.into(),
            partitions,
            replication_factor,
            value_schema,
        }
    }

    /// Construct a name-only topic with default partitions and replicas
    /// and no schema, as contributed by record samples.
    pub fn with_defaults(name: impl Into<String>) -> Self {
        Self::new(name, Self::DEFAULT_PARTITIONS, Self::DEFAULT_REPLICAS, None)
    }

    /// The topic name. Unique key across an aggregated set.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The partition count.
    pub fn partitions(&self) -> i32 {
        self.partitions
    }

    /// The replication factor.
    pub fn replication_factor(&self) -> i16 {
        self.replication_factor
    }

    /// The inferred or declared value schema, if any.
    pub fn value_schema(&self) -> Option<&ParsedSchema> {
        self.value_schema.as_ref()
    }
}

/// Aggregate the implied topics of a test case.
///
/// Precedence, first writer per topic name wins:
/// 1. explicitly declared topics
/// 2. topics inferred from statements, processed in input order over one
///    shared catalog (type registrations made early are visible to later
///    statements in the same batch)
/// 3. name-only topics from input and output record samples
///
/// Topics come back in first-insertion order; name uniqueness is the only
/// structural guarantee callers should rely on.
pub fn all_topics(
    statements: &[String],
    topics: &[Topic],
    outputs: &[Record],
    inputs: &[Record],
    functions: &FunctionRegistry,
    config: &EngineConfig,
) -> TestHarnessResult<Vec<Topic>> {
    let mut all: Vec<Topic> = Vec::new();

    for topic in topics {
        upsert(&mut all, topic.clone());
    }

    let mut metastore = MetaStore::new(functions);
    for sql in statements {
        if let Some(topic) = topic_from_statement(sql, &mut metastore, config)? {
            insert_if_absent(&mut all, topic);
        }
    }

    for record in inputs.iter().chain(outputs.iter()) {
        insert_if_absent(&mut all, Topic::with_defaults(record.topic.clone()));
    }

    Ok(all)
}

/// Infer the topic implied by a single statement, if any.
///
/// Returns `Ok(None)` both for statements that imply no topic (type
/// registrations, non-DDL) and for statements that fail to parse or
/// resolve - the latter are logged and presumed to be intentional
/// negative fixtures. Type registrations are bound into the catalog as a
/// side effect.
///
/// # Errors
///
/// `MultiStatementInput` when `sql` holds more than one statement. That is
/// a harness programming error and is the only failure that surfaces.
pub fn topic_from_statement(
    sql: &str,
    metastore: &mut MetaStore,
    config: &EngineConfig,
) -> TestHarnessResult<Option<Topic>> {
    let parser = StreamingSqlParser::new();

    let parsed = match parser.parse(sql) {
        Ok(parsed) => parsed,
        Err(e) => {
            log::debug!(
                "error parsing statement (which may be expected): {}: {}",
                sql,
                e
            );
            return Ok(None);
        }
    };

    if parsed.len() > 1 {
        return Err(TestHarnessError::MultiStatementInput {
            sql: sql.to_string(),
        });
    }

    let mut topics = Vec::new();
    for statement in &parsed {
        match extract_topic(&parser, statement, metastore, config) {
            Ok(Some(topic)) => topics.push(topic),
            Ok(None) => {}
            Err(e) => {
                log::debug!(
                    "statement yielded no topic (which may be expected): {}: {}",
                    statement.text,
                    e
                );
            }
        }
    }

    Ok(topics.into_iter().next())
}

fn extract_topic(
    parser: &StreamingSqlParser,
    statement: &ParsedStatement,
    metastore: &mut MetaStore,
    config: &EngineConfig,
) -> SqlResult<Option<Topic>> {
    let kind = StatementKind::of(&statement.statement);

    if kind.is_type_registration() {
        // Registrations never imply a topic, but later statements in the
        // batch may reference the registered alias
        let prepared = parser.prepare(statement, metastore)?;
        register_statement_type(&prepared, metastore);
        return Ok(None);
    }

    if !kind.is_create_source() {
        return Ok(None);
    }

    let prepared = parser.prepare(statement, metastore)?;
    let injected = DefaultFormatInjector::new().inject(prepared.statement, config)?;

    let (name, columns, properties) = match &injected {
        Statement::CreateStream {
            name,
            columns,
            properties,
        }
        | Statement::CreateTable {
            name,
            columns,
            properties,
        } => (name.as_str(), columns, properties),
        _ => return Ok(None),
    };

    let props = SourceProperties::new(name, properties);

    let value_format_name = props.value_format().ok_or_else(|| {
        SqlError::configuration_error("Statement has no value format after injection")
    })?;
    let key_format_name = props
        .key_format()
        .unwrap_or_else(|| config.default_key_format.clone());

    let mut value_info = FormatInfo::new(value_format_name);
    if let Some(schema_name) = props.schema_name() {
        value_info = value_info.with_property(SCHEMA_NAME_PROPERTY, schema_name);
    }

    let key_format = FormatFactory::of(&FormatInfo::new(key_format_name))?;
    let value_format = FormatFactory::of(&value_info)?;

    let value_schema = if value_format.supports_schema_inference() {
        let logical = LogicalSchema::from_columns(columns);
        let declared_wrap = props.wrap_single_value()?;

        let serde_options = match serialization::build_for_create_statement(
            &logical,
            key_format,
            value_format,
            declared_wrap,
            config,
        ) {
            Ok(options) => options,
            Err(e) => {
                // Lets negative tests fail in the correct place, later
                log::warn!(
                    "falling back to default serde options for '{}': {}",
                    name,
                    e
                );
                SerdeOptions::default()
            }
        };

        if logical.value_is_empty() {
            None
        } else {
            let persistence =
                PersistenceSchema::from(logical.value(), serde_options.value_features());
            Some(value_format.to_parsed_schema(&persistence, &value_info)?)
        }
    } else {
        None
    };

    let partitions = props.partitions()?.unwrap_or(Topic::DEFAULT_PARTITIONS);
    let replicas = props.replicas()?.unwrap_or(Topic::DEFAULT_REPLICAS);

    Ok(Some(Topic::new(
        props.topic(),
        partitions,
        replicas,
        value_schema,
    )))
}

fn upsert(all: &mut Vec<Topic>, topic: Topic) {
    match all.iter_mut().find(|t| t.name == topic.name) {
        Some(existing) => *existing = topic,
        None => all.push(topic),
    }
}

fn insert_if_absent(all: &mut Vec<Topic>, topic: Topic) {
    if !all.iter().any(|t| t.name == topic.name) {
        all.push(topic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_metastore() -> MetaStore {
        MetaStore::new(&FunctionRegistry::with_builtins())
    }

    #[test]
    fn test_create_stream_with_json_has_no_schema() {
        let config = EngineConfig::default();
        let topic = topic_from_statement(
            "CREATE STREAM orders (ID BIGINT KEY, ITEM STRING) \
             WITH ('topic' = 'orders_topic', 'value_format' = 'JSON', 'partitions' = '4', 'replicas' = '2');",
            &mut fresh_metastore(),
            &config,
        )
        .unwrap()
        .unwrap();

        assert_eq!(topic.name(), "orders_topic");
        assert_eq!(topic.partitions(), 4);
        assert_eq!(topic.replication_factor(), 2);
        assert!(topic.value_schema().is_none());
    }

    #[test]
    fn test_create_stream_with_avro_infers_schema() {
        let config = EngineConfig::default();
        let topic = topic_from_statement(
            "CREATE STREAM orders (ID BIGINT KEY, ITEM STRING) WITH ('value_format' = 'AVRO');",
            &mut fresh_metastore(),
            &config,
        )
        .unwrap()
        .unwrap();

        assert_eq!(topic.name(), "orders");
        let schema = topic.value_schema().expect("AVRO should infer a schema");
        assert!(schema.canonical().contains("\"ITEM\""));
        // Key columns never appear in the value schema
        assert!(!schema.canonical().contains("\"ID\""));
    }

    #[test]
    fn test_partitions_and_replicas_default_to_one() {
        let config = EngineConfig::default();
        let topic = topic_from_statement(
            "CREATE STREAM s (V STRING) WITH ('value_format' = 'JSON');",
            &mut fresh_metastore(),
            &config,
        )
        .unwrap()
        .unwrap();

        assert_eq!(topic.partitions(), Topic::DEFAULT_PARTITIONS);
        assert_eq!(topic.replication_factor(), Topic::DEFAULT_REPLICAS);
    }

    #[test]
    fn test_key_only_column_list_yields_topic_without_schema() {
        let config = EngineConfig::default();
        let topic = topic_from_statement(
            "CREATE TABLE t (ID BIGINT PRIMARY KEY) WITH ('value_format' = 'AVRO');",
            &mut fresh_metastore(),
            &config,
        )
        .unwrap()
        .unwrap();

        assert!(topic.value_schema().is_none());
    }

    #[test]
    fn test_empty_column_list_yields_topic_without_schema() {
        let config = EngineConfig::default();
        let topic = topic_from_statement(
            "CREATE TABLE t WITH ('value_format' = 'AVRO');",
            &mut fresh_metastore(),
            &config,
        )
        .unwrap()
        .unwrap();

        assert!(topic.value_schema().is_none());
    }

    #[test]
    fn test_type_registration_yields_no_topic_but_mutates_catalog() {
        let config = EngineConfig::default();
        let mut metastore = fresh_metastore();

        let result = topic_from_statement(
            "CREATE TYPE MONEY AS DECIMAL(10, 2);",
            &mut metastore,
            &config,
        )
        .unwrap();
        assert!(result.is_none());
        assert!(metastore.resolve_type("MONEY").is_some());
    }

    #[test]
    fn test_non_ddl_statements_yield_no_topic() {
        let config = EngineConfig::default();
        for sql in [
            "SELECT * FROM orders;",
            "INSERT INTO orders (a) SELECT a FROM other;",
            "SHOW STREAMS;",
            "CREATE STREAM derived AS SELECT * FROM orders;",
        ] {
            let result = topic_from_statement(sql, &mut fresh_metastore(), &config).unwrap();
            assert!(result.is_none(), "{} should imply no topic", sql);
        }
    }

    #[test]
    fn test_unparseable_statement_is_absorbed() {
        let config = EngineConfig::default();
        let result =
            topic_from_statement("definitely not sql", &mut fresh_metastore(), &config).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_unresolvable_statement_is_absorbed() {
        let config = EngineConfig::default();
        // WIDGET is not a registered type; preparation fails, topic is absorbed
        let result = topic_from_statement(
            "CREATE STREAM s (V WIDGET) WITH ('value_format' = 'JSON');",
            &mut fresh_metastore(),
            &config,
        )
        .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_missing_value_format_without_default_is_absorbed() {
        let config = EngineConfig::default();
        let result = topic_from_statement(
            "CREATE STREAM s (V STRING);",
            &mut fresh_metastore(),
            &config,
        )
        .unwrap();
        assert!(result.is_none());

        let config = EngineConfig::default().with_default_value_format("JSON");
        let result = topic_from_statement(
            "CREATE STREAM s (V STRING);",
            &mut fresh_metastore(),
            &config,
        )
        .unwrap();
        assert!(result.is_some());
    }

    #[test]
    fn test_multi_statement_input_is_a_hard_error() {
        let config = EngineConfig::default();
        let result = topic_from_statement(
            "CREATE STREAM a (V STRING) WITH ('value_format' = 'JSON'); \
             CREATE STREAM b (V STRING) WITH ('value_format' = 'JSON');",
            &mut fresh_metastore(),
            &config,
        );
        assert!(matches!(
            result,
            Err(TestHarnessError::MultiStatementInput { .. })
        ));
    }

    #[test]
    fn test_invalid_serde_options_fall_back_to_defaults() {
        let config = EngineConfig::default();
        // wrap_single_value on a two-column value is invalid; the topic is
        // still built, with a wrapped (default) schema
        let topic = topic_from_statement(
            "CREATE STREAM s (A STRING, B STRING) \
             WITH ('value_format' = 'AVRO', 'wrap_single_value' = 'false');",
            &mut fresh_metastore(),
            &config,
        )
        .unwrap()
        .unwrap();

        let schema = topic.value_schema().expect("schema still inferred");
        assert!(schema.canonical().contains("\"A\""));
        assert!(schema.canonical().contains("\"B\""));
    }

    #[test]
    fn test_invalid_partitions_property_is_absorbed() {
        let config = EngineConfig::default();
        let result = topic_from_statement(
            "CREATE STREAM s (V STRING) WITH ('value_format' = 'JSON', 'partitions' = 'lots');",
            &mut fresh_metastore(),
            &config,
        )
        .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_registered_type_visible_to_later_statement_in_batch() {
        let config = EngineConfig::default();
        let functions = FunctionRegistry::with_builtins();
        let statements = vec![
            "CREATE TYPE ADDRESS AS STRUCT(NUMBER INT, STREET STRING);".to_string(),
            "CREATE STREAM deliveries (ID BIGINT KEY, ADDR ADDRESS) WITH ('value_format' = 'AVRO');"
                .to_string(),
        ];

        let topics = all_topics(&statements, &[], &[], &[], &functions, &config).unwrap();
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].name(), "deliveries");
        let schema = topics[0].value_schema().expect("schema inferred via alias");
        assert!(schema.canonical().contains("\"STREET\""));
    }

    #[test]
    fn test_aggregation_is_first_writer_wins() {
        let config = EngineConfig::default();
        let functions = FunctionRegistry::with_builtins();

        let explicit = vec![Topic::new("orders", 12, 3, None)];
        let statements = vec![
            "CREATE STREAM orders (V STRING) WITH ('topic' = 'orders', 'value_format' = 'JSON', 'partitions' = '1');"
                .to_string(),
        ];
        let inputs = vec![Record::for_topic("orders"), Record::for_topic("audit")];

        let topics =
            all_topics(&statements, &explicit, &[], &inputs, &functions, &config).unwrap();

        assert_eq!(topics.len(), 2);
        let orders = topics.iter().find(|t| t.name() == "orders").unwrap();
        // The explicit declaration wins over the inferred one
        assert_eq!(orders.partitions(), 12);
        assert_eq!(orders.replication_factor(), 3);

        let audit = topics.iter().find(|t| t.name() == "audit").unwrap();
        assert_eq!(audit.partitions(), Topic::DEFAULT_PARTITIONS);
        assert!(audit.value_schema().is_none());
    }

    #[test]
    fn test_invalid_statement_does_not_abort_aggregation() {
        let config = EngineConfig::default();
        let functions = FunctionRegistry::with_builtins();
        let statements = vec![
            "CREATE STREAM a (V STRING) WITH ('value_format' = 'JSON');".to_string(),
            "this is not sql at all".to_string(),
            "CREATE STREAM b (V STRING) WITH ('value_format' = 'JSON');".to_string(),
        ];

        let topics = all_topics(&statements, &[], &[], &[], &functions, &config).unwrap();
        let names: Vec<&str> = topics.iter().map(|t| t.name()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
