//! Test name formatting
//!
//! Canonical, collision-resistant test names are derived from the source
//! file name, the case name, and an optional explicit format variant:
//! `<file-stem> - <testName>[ - <format>]`.

use super::error::{TestHarnessError, TestHarnessResult};
use std::path::Path;

/// Placeholder substituted into statements when a test case declares
/// explicit format variants.
pub const FORMAT_PLACEHOLDER: &str = "{FORMAT}";

const FORMAT_REPLACE_ERROR: &str =
    "To use {FORMAT} in statements, set the test case's 'format' field";

/// Build the qualified display name of a test case.
///
/// # Examples
///
/// ```
/// use rillsql::rillsql::test_harness::naming::build_test_name;
/// use std::path::Path;
///
/// let name = build_test_name(Path::new("dir/MyTest.json"), "case1", Some("JSON"));
/// assert_eq!(name, "MyTest - case1 - JSON");
/// ```
pub fn build_test_name(
    original_file: &Path,
    test_name: &str,
    explicit_format: Option<&str>,
) -> String {
    let prefix = file_prefix(original_file);

    match explicit_format {
        Some(format) => format!("{}{} - {}", prefix, test_name, format),
        None => format!("{}{}", prefix, test_name),
    }
}

/// Strip the file prefix off a qualified test name.
///
/// Fails with [`TestHarnessError::InvalidTestName`] when the name does not
/// start with the prefix derived from `original_file` - that indicates a
/// mismatched file/test-name pairing in the caller, not an expected
/// negative-test scenario.
pub fn extract_simple_test_name(
    original_file: &str,
    test_name: &str,
) -> TestHarnessResult<String> {
    let prefix = file_prefix(Path::new(original_file));

    match test_name.strip_prefix(&prefix) {
        Some(simple) => Ok(simple.to_string()),
        None => Err(TestHarnessError::InvalidTestName {
            name: test_name.to_string(),
            expected_prefix: prefix,
        }),
    }
}

/// Substitute the `{FORMAT}` placeholder in a batch of statements.
///
/// Without an explicit format the placeholder expands to a sentinel that
/// fails to parse, so the affected statement surfaces as "set the format"
/// rather than silently running with a wrong one.
pub fn build_statements(statements: &[String], explicit_format: Option<&str>) -> Vec<String> {
    let format = explicit_format.unwrap_or(FORMAT_REPLACE_ERROR);

    statements
        .iter()
        .map(|stmt| stmt.replace(FORMAT_PLACEHOLDER, format))
        .collect()
}

fn file_prefix(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    format!("{} - ", stem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_test_name_with_format() {
        assert_eq!(
            build_test_name(Path::new("dir/MyTest.json"), "case1", Some("JSON")),
            "MyTest - case1 - JSON"
        );
    }

    #[test]
    fn test_build_test_name_without_format() {
        assert_eq!(
            build_test_name(Path::new("dir/MyTest.json"), "case1", None),
            "MyTest - case1"
        );
    }

    #[test]
    fn test_extract_simple_test_name() {
        assert_eq!(
            extract_simple_test_name("dir/MyTest.json", "MyTest - case1 - JSON").unwrap(),
            "case1 - JSON"
        );
    }

    #[test]
    fn test_extract_simple_test_name_rejects_foreign_prefix() {
        let result = extract_simple_test_name("dir/MyTest.json", "OtherTest - case1");
        assert!(matches!(
            result,
            Err(TestHarnessError::InvalidTestName { .. })
        ));
    }

    #[test]
    fn test_build_statements_substitutes_placeholder() {
        let statements = vec![
            "CREATE STREAM s WITH ('value_format' = '{FORMAT}');".to_string(),
            "SELECT * FROM s;".to_string(),
        ];

        let built = build_statements(&statements, Some("AVRO"));
        assert_eq!(
            built[0],
            "CREATE STREAM s WITH ('value_format' = 'AVRO');"
        );
        assert_eq!(built[1], "SELECT * FROM s;");
    }

    #[test]
    fn test_build_statements_without_format_inserts_sentinel() {
        let statements = vec!["CREATE STREAM s WITH ('value_format' = '{FORMAT}');".to_string()];
        let built = build_statements(&statements, None);
        assert!(built[0].contains("set the test case's 'format' field"));
    }
}
