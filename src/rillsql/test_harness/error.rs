//! Error types for the test harness
//!
//! Statement-level failures during topic inference are absorbed (logged,
//! never surfaced); the variants here are the conditions that DO surface:
//! harness programming errors and spec-file problems.

use std::fmt;
use std::io;

/// Error type for test harness operations.
#[derive(Debug, Clone)]
pub enum TestHarnessError {
    /// A statement string submitted for topic inference contained more
    /// than one statement. Single statements are a hard precondition.
    MultiStatementInput {
        /// The offending SQL text
        sql: String,
    },

    /// A qualified test name did not start with the expected file prefix.
    InvalidTestName {
        /// The test name that failed to match
        name: String,
        /// The prefix derived from the source file name
        expected_prefix: String,
    },

    /// Failed to parse a test-case specification file.
    SpecParseError {
        message: String,
        file: String,
    },

    /// IO error (file operations).
    IoError {
        message: String,
        path: String,
    },
}

impl fmt::Display for TestHarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestHarnessError::MultiStatementInput { sql } => {
                write!(f, "SQL contains more than one statement: {}", sql)
            }
            TestHarnessError::InvalidTestName {
                name,
                expected_prefix,
            } => {
                write!(
                    f,
                    "Test name '{}' does not start with expected prefix '{}'",
                    name, expected_prefix
                )
            }
            TestHarnessError::SpecParseError { message, file } => {
                write!(f, "Test spec parse error in {}: {}", file, message)
            }
            TestHarnessError::IoError { message, path } => {
                write!(f, "IO error for '{}': {}", path, message)
            }
        }
    }
}

impl std::error::Error for TestHarnessError {}

impl From<io::Error> for TestHarnessError {
    fn from(err: io::Error) -> Self {
        TestHarnessError::IoError {
            message: err.to_string(),
            path: String::new(),
        }
    }
}

/// Result type alias for test harness operations
pub type TestHarnessResult<T> = Result<T, TestHarnessError>;
