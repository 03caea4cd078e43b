//! Declarative test-case file model
//!
//! Test cases are written as JSON suites: a list of cases, each carrying
//! SQL statements, optional explicit topic declarations, input/output
//! record samples, and optional per-case engine properties. A case may
//! declare format variants; its statements then use the `{FORMAT}`
//! placeholder and the case runs once per variant.

use super::error::{TestHarnessError, TestHarnessResult};
use super::naming;
use super::topics::{self, Topic};
use crate::rillsql::catalog::FunctionRegistry;
use crate::rillsql::serialization::ParsedSchema;
use crate::rillsql::sql::config::EngineConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// A test-case suite file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuite {
    /// Free-form comments, ignored by the harness
    #[serde(default)]
    pub comments: Vec<String>,

    /// The test cases
    pub tests: Vec<TestCaseSpec>,
}

/// One declarative test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCaseSpec {
    /// Case name, unique within the suite
    pub name: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// Format variants; statements use `{FORMAT}` and the case runs once
    /// per variant. Empty means the case runs once, unparameterized.
    #[serde(default)]
    pub format: Vec<String>,

    /// SQL statements, one statement per entry
    #[serde(default)]
    pub statements: Vec<String>,

    /// Explicitly declared topics
    #[serde(default)]
    pub topics: Vec<TopicDecl>,

    /// Input record samples
    #[serde(default)]
    pub inputs: Vec<Record>,

    /// Expected output record samples
    #[serde(default)]
    pub outputs: Vec<Record>,

    /// Per-case engine property overrides
    #[serde(default)]
    pub properties: HashMap<String, serde_json::Value>,

    /// Expected failure, for negative cases
    #[serde(default, rename = "expectedError")]
    pub expected_error: Option<ExpectedError>,
}

/// Expected failure of a negative test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpectedError {
    /// Error kind identifier
    #[serde(default, rename = "type")]
    pub error_type: Option<String>,

    /// Substring expected in the error message
    #[serde(default)]
    pub message: Option<String>,
}

/// An explicitly declared topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicDecl {
    /// Topic name
    pub name: String,

    /// Partition count; defaults when absent
    #[serde(default)]
    pub partitions: Option<i32>,

    /// Replication factor; defaults when absent
    #[serde(default)]
    pub replicas: Option<i16>,

    /// Value format of the declared schema
    #[serde(default, rename = "valueFormat")]
    pub value_format: Option<String>,

    /// Declared value schema document
    #[serde(default, rename = "valueSchema")]
    pub value_schema: Option<serde_json::Value>,
}

/// A sample input or output row. Topic inference only reads the topic
/// name; key/value/timestamp belong to the execution phase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    /// The topic this record belongs to
    pub topic: String,

    /// Message key
    #[serde(default)]
    pub key: Option<serde_json::Value>,

    /// Message value
    #[serde(default)]
    pub value: serde_json::Value,

    /// Record timestamp, milliseconds since epoch
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl Record {
    /// A record carrying only a topic name, for tests.
    pub fn for_topic(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            key: None,
            value: serde_json::Value::Null,
            timestamp: None,
        }
    }
}

impl TopicDecl {
    /// Convert the declaration into a [`Topic`], parsing the declared
    /// value schema in the declared format's representation.
    pub fn to_topic(&self) -> TestHarnessResult<Topic> {
        let value_schema = match (&self.value_schema, &self.value_format) {
            (None, _) => None,
            (Some(schema), Some(format)) => match format.to_uppercase().as_str() {
                "AVRO" => {
                    let parsed =
                        apache_avro::Schema::parse_str(&schema.to_string()).map_err(|e| {
                            TestHarnessError::SpecParseError {
                                message: format!(
                                    "Invalid Avro schema for topic '{}': {}",
                                    self.name, e
                                ),
                                file: String::new(),
                            }
                        })?;
                    Some(ParsedSchema::Avro(parsed))
                }
                "JSON" | "JSON_SR" => Some(ParsedSchema::Json(schema.clone())),
                other => {
                    return Err(TestHarnessError::SpecParseError {
                        message: format!(
                            "Topic '{}' declares a schema for format '{}', which takes none",
                            self.name, other
                        ),
                        file: String::new(),
                    });
                }
            },
            (Some(_), None) => {
                return Err(TestHarnessError::SpecParseError {
                    message: format!("Topic '{}' declares a schema but no value format", self.name),
                    file: String::new(),
                });
            }
        };

        Ok(Topic::new(
            &self.name,
            self.partitions.unwrap_or(Topic::DEFAULT_PARTITIONS),
            self.replicas.unwrap_or(Topic::DEFAULT_REPLICAS),
            value_schema,
        ))
    }
}

impl TestCaseSpec {
    /// The case's format variants; a case with no declared formats runs
    /// once, unparameterized.
    pub fn format_variants(&self) -> Vec<Option<&str>> {
        if self.format.is_empty() {
            vec![None]
        } else {
            self.format.iter().map(|f| Some(f.as_str())).collect()
        }
    }

    /// Qualified display name for one variant of this case.
    pub fn qualified_name(&self, original_file: &Path, format: Option<&str>) -> String {
        naming::build_test_name(original_file, &self.name, format)
    }

    /// Statements for one variant, with the `{FORMAT}` placeholder
    /// substituted.
    pub fn statements_for(&self, format: Option<&str>) -> Vec<String> {
        naming::build_statements(&self.statements, format)
    }

    /// The full set of topics this case needs provisioned, for one
    /// format variant.
    pub fn implied_topics(
        &self,
        format: Option<&str>,
        functions: &FunctionRegistry,
        config: &EngineConfig,
    ) -> TestHarnessResult<Vec<Topic>> {
        let explicit = self
            .topics
            .iter()
            .map(TopicDecl::to_topic)
            .collect::<TestHarnessResult<Vec<_>>>()?;

        let statements = self.statements_for(format);

        topics::all_topics(
            &statements,
            &explicit,
            &self.outputs,
            &self.inputs,
            functions,
            config,
        )
    }
}

impl TestSuite {
    /// Load a suite from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> TestHarnessResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| TestHarnessError::IoError {
            message: e.to_string(),
            path: path.display().to_string(),
        })?;

        Self::from_json(&content, path.display().to_string())
    }

    /// Parse a suite from a JSON string.
    pub fn from_json(json: &str, file_name: String) -> TestHarnessResult<Self> {
        let suite: TestSuite =
            serde_json::from_str(json).map_err(|e| TestHarnessError::SpecParseError {
                message: e.to_string(),
                file: file_name.clone(),
            })?;

        suite.validate(&file_name)?;
        Ok(suite)
    }

    fn validate(&self, file_name: &str) -> TestHarnessResult<()> {
        let mut seen = std::collections::HashSet::new();
        for test in &self.tests {
            if !seen.insert(&test.name) {
                return Err(TestHarnessError::SpecParseError {
                    message: format!("Duplicate test name: {}", test.name),
                    file: file_name.to_string(),
                });
            }
        }
        Ok(())
    }
}
