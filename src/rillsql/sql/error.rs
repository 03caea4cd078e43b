/*!
# SQL Error Handling

Error types for DDL parsing, catalog resolution, and serialization-format
configuration. All SQL operations return structured errors with enough
context to point at the offending statement fragment.

## Error Categories

- **Parse Errors**: syntax errors in SQL text with position information
- **Resolution Errors**: unknown types or sources during statement preparation
- **Configuration Errors**: missing or contradictory format/serde properties
- **Schema Errors**: column-level problems while building a value schema
*/

use std::fmt;

/// Error type for SQL parsing, preparation, and format resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlError {
    /// Syntax error during tokenization or parsing.
    ///
    /// Carries the character position in the SQL text where the error
    /// occurred, when known.
    ParseError {
        /// Human-readable error message
        message: String,
        /// Byte position in the SQL text where the error occurred
        position: Option<usize>,
    },

    /// A statement referenced a type or source the catalog does not know.
    ResolutionError {
        /// Description of the resolution failure
        message: String,
        /// The unresolved name, if applicable
        name: Option<String>,
    },

    /// Missing or invalid format/serde configuration on a statement.
    ConfigurationError {
        /// Description of the configuration problem
        message: String,
    },

    /// Column-level schema problem (duplicates, unsupported shapes).
    SchemaError {
        /// Description of the schema problem
        message: String,
        /// Name of the column that caused the error, if applicable
        column: Option<String>,
    },
}

impl fmt::Display for SqlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlError::ParseError { message, position } => {
                if let Some(pos) = position {
                    write!(f, "SQL parse error at position {}: {}", pos, message)
                } else {
                    write!(f, "SQL parse error: {}", message)
                }
            }
            SqlError::ResolutionError { message, name } => {
                if let Some(n) = name {
                    write!(f, "Resolution error for '{}': {}", n, message)
                } else {
                    write!(f, "Resolution error: {}", message)
                }
            }
            SqlError::ConfigurationError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            SqlError::SchemaError { message, column } => {
                if let Some(col) = column {
                    write!(f, "Schema error for column '{}': {}", col, message)
                } else {
                    write!(f, "Schema error: {}", message)
                }
            }
        }
    }
}

impl std::error::Error for SqlError {}

impl SqlError {
    /// Create a parse error with optional position
    pub fn parse_error(message: impl Into<String>, position: Option<usize>) -> Self {
        SqlError::ParseError {
            message: message.into(),
            position,
        }
    }

    /// Create a resolution error
    pub fn resolution_error(message: impl Into<String>, name: Option<String>) -> Self {
        SqlError::ResolutionError {
            message: message.into(),
            name,
        }
    }

    /// Create a configuration error
    pub fn configuration_error(message: impl Into<String>) -> Self {
        SqlError::ConfigurationError {
            message: message.into(),
        }
    }

    /// Create a schema error
    pub fn schema_error(message: impl Into<String>, column: Option<String>) -> Self {
        SqlError::SchemaError {
            message: message.into(),
            column,
        }
    }
}

/// Result type for SQL operations
pub type SqlResult<T> = Result<T, SqlError>;
