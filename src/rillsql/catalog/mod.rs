//! Metadata catalog for statement preparation
//!
//! Holds the mutable per-build state needed to resolve statements:
//! registered type aliases and the function-name registry. One fresh
//! [`MetaStore`] is created per test-case build, mutated sequentially as
//! statements are processed in input order, and discarded afterwards. It
//! is always passed explicitly, never held as ambient state.

use crate::rillsql::sql::ast::{DataType, Statement, StructField};
use crate::rillsql::sql::error::{SqlError, SqlResult};
use crate::rillsql::sql::parser::PreparedStatement;
use std::collections::{HashMap, HashSet};

/// Scalar and aggregate function names known to the engine.
const BUILT_IN_FUNCTIONS: &[&str] = &[
    "COUNT", "SUM", "AVG", "MIN", "MAX", "ABS", "CEIL", "FLOOR", "ROUND", "CONCAT", "UPPER",
    "LOWER", "TRIM", "SUBSTRING", "REPLACE", "COALESCE", "NULLIF", "EXTRACT",
];

/// Registry of function names available to statements.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: HashSet<String>,
}

impl FunctionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry seeded with the engine's built-in functions.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for name in BUILT_IN_FUNCTIONS {
            registry.register(name);
        }
        registry
    }

    /// Register a function name.
    pub fn register(&mut self, name: &str) {
        self.functions.insert(name.to_uppercase());
    }

    /// Whether the named function is registered. Case-insensitive.
    pub fn is_registered(&self, name: &str) -> bool {
        self.functions.contains(&name.to_uppercase())
    }

    /// Number of registered functions.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

/// Mutable metadata catalog scoped to one test-case build.
///
/// Accumulates registered type aliases so later statements in the same
/// batch can reference types registered by earlier ones.
#[derive(Debug, Clone)]
pub struct MetaStore {
    types: HashMap<String, DataType>,
    functions: FunctionRegistry,
}

impl MetaStore {
    /// Create an empty catalog over the given function registry.
    pub fn new(functions: &FunctionRegistry) -> Self {
        Self {
            types: HashMap::new(),
            functions: functions.clone(),
        }
    }

    /// Bind a type alias to a SQL type. Later registrations of the same
    /// alias replace earlier ones. Names are case-insensitive.
    pub fn register_type(&mut self, name: &str, data_type: DataType) {
        self.types.insert(name.to_uppercase(), data_type);
    }

    /// Look up a registered type alias. Case-insensitive.
    pub fn resolve_type(&self, name: &str) -> Option<&DataType> {
        self.types.get(&name.to_uppercase())
    }

    /// Whether the named function is known to the engine.
    pub fn is_function(&self, name: &str) -> bool {
        self.functions.is_registered(name)
    }

    /// Recursively substitute registered aliases inside a data type.
    ///
    /// Fails with a `ResolutionError` if the type references an alias
    /// this catalog does not know.
    pub fn resolve_data_type(&self, data_type: &DataType) -> SqlResult<DataType> {
        match data_type {
            DataType::Custom(name) => self.resolve_type(name).cloned().ok_or_else(|| {
                SqlError::resolution_error("Unknown type", Some(name.clone()))
            }),
            DataType::Array(inner) => Ok(DataType::Array(Box::new(
                self.resolve_data_type(inner)?,
            ))),
            DataType::Map(key, value) => Ok(DataType::Map(
                Box::new(self.resolve_data_type(key)?),
                Box::new(self.resolve_data_type(value)?),
            )),
            DataType::Struct(fields) => {
                let resolved = fields
                    .iter()
                    .map(|f| {
                        Ok(StructField {
                            name: f.name.clone(),
                            data_type: self.resolve_data_type(&f.data_type)?,
                        })
                    })
                    .collect::<SqlResult<Vec<_>>>()?;
                Ok(DataType::Struct(resolved))
            }
            other => Ok(other.clone()),
        }
    }
}

/// Bind a prepared type registration into the catalog.
///
/// No-op for any other statement kind: callers pre-filter by statement
/// kind, so a non-registration here is not an error condition.
pub fn register_statement_type(prepared: &PreparedStatement, metastore: &mut MetaStore) {
    if let Statement::RegisterType { name, data_type } = &prepared.statement {
        metastore.register_type(name, data_type.clone());
    }
}
