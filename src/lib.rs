//! # rillsql
//!
//! Test tooling for the RillSQL streaming SQL engine. Given the SQL
//! statements, explicit topic declarations, and sample records of a
//! declarative test case, this crate derives the full set of messaging
//! topics the test fixture must provision - name, partition count,
//! replication factor, and, for schema-inferring formats, the value
//! schema - without running anything against a live engine.
//!
//! ## Features
//!
//! - **Statement-to-topic inference**: parse DDL, resolve type aliases,
//!   apply format defaults, infer Avro/JSON value schemas
//! - **Lenient by design**: intentionally broken statements contribute no
//!   topic instead of failing the build, so negative test cases fail where
//!   they are supposed to
//! - **Topic aggregation**: explicit declarations, statement inference,
//!   and record samples merged with first-writer-wins deduplication
//! - **Test naming**: canonical `<file> - <case>[ - <format>]` names and
//!   their inverse
//!
//! ## Quick Start
//!
//! ```rust
//! use rillsql::{all_topics, EngineConfig, FunctionRegistry, Record};
//!
//! let statements = vec![
//!     "CREATE TYPE ADDRESS AS STRUCT(NUMBER INT, STREET STRING);".to_string(),
//!     "CREATE STREAM deliveries (ID BIGINT KEY, ADDR ADDRESS) \
//!      WITH ('value_format' = 'AVRO');".to_string(),
//! ];
//! let inputs = vec![Record::for_topic("deliveries_dlq")];
//!
//! let topics = all_topics(
//!     &statements,
//!     &[],
//!     &[],
//!     &inputs,
//!     &FunctionRegistry::with_builtins(),
//!     &EngineConfig::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(topics.len(), 2);
//! assert!(topics[0].value_schema().is_some());
//! ```

pub mod rillsql;

// Re-export main API at crate root for easy access
pub use rillsql::catalog::{FunctionRegistry, MetaStore};
pub use rillsql::schema::{LogicalSchema, PersistenceSchema};
pub use rillsql::serialization::{
    Format, FormatFactory, FormatInfo, ParsedSchema, SerdeFeatures, SerdeOptions,
};
pub use rillsql::sql::{
    EngineConfig, ParsedStatement, PreparedStatement, SqlError, Statement, StatementKind,
    StreamingSqlParser,
};
pub use rillsql::test_harness::{
    all_topics, topic_from_statement, Record, TestCaseSpec, TestHarnessError, TestSuite, Topic,
    TopicDecl,
};
