/*!
# Streaming DDL Parser

Hand-written lexer and recursive-descent parser for the DDL subset used by
the test tooling. The parser turns raw SQL text into a sequence of
[`ParsedStatement`]s and, via [`StreamingSqlParser::prepare`], binds type
aliases against a catalog to produce [`PreparedStatement`]s.

## Supported Grammar

```text
CREATE STREAM name [(column_definitions)] [WITH (properties)]
CREATE TABLE name [(column_definitions)] [WITH (properties)]
CREATE TYPE name AS data_type
```

Statements with other recognized leading keywords (SELECT, INSERT, SHOW,
DESCRIBE, DROP, LIST) and `CREATE ... AS SELECT` variants parse to
[`Statement::Other`]: they are syntactically acknowledged but carry no
information the test tooling acts on. Unrecognized leading tokens are parse
errors.

## Example

```rust,no_run
use rillsql::rillsql::sql::parser::StreamingSqlParser;

let parser = StreamingSqlParser::new();
let statements = parser
    .parse("CREATE STREAM orders (ID BIGINT KEY, ITEM STRING) WITH ('value_format' = 'AVRO');")
    .unwrap();
assert_eq!(statements.len(), 1);
```
*/

use crate::rillsql::catalog::MetaStore;
use crate::rillsql::sql::ast::{ColumnDef, DataType, Statement, StructField};
use crate::rillsql::sql::error::{SqlError, SqlResult};
use std::collections::HashMap;

/// One statement as produced by lexical/syntactic parsing, before any
/// catalog resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedStatement {
    /// The statement's original text, trimmed
    pub text: String,
    /// The parsed syntax tree
    pub statement: Statement,
}

/// A parsed statement resolved against the catalog: all `Custom` type
/// aliases bound, column lists validated.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedStatement {
    /// The resolved syntax tree
    pub statement: Statement,
}

/// Token types recognized by the DDL lexer.
#[derive(Debug, Clone, PartialEq)]
enum TokenType {
    // Keywords
    Create,   // CREATE
    Stream,   // STREAM
    Table,    // TABLE
    Type,     // TYPE
    As,       // AS
    With,     // WITH
    Key,      // KEY
    Primary,  // PRIMARY
    Not,      // NOT
    Null,     // NULL
    Select,   // SELECT
    Insert,   // INSERT
    Show,     // SHOW
    List,     // LIST
    Describe, // DESCRIBE
    Drop,     // DROP

    // Literals and identifiers
    Identifier,
    String,
    Number,

    // Punctuation
    LeftParen,  // (
    RightParen, // )
    Comma,      // ,
    Semicolon,  // ;
    Equal,      // =
    Symbol,     // any other punctuation, preserved for skipped statements

    // End of statement group
    Eof,
}

/// A token with its type, text, and byte position in the source.
#[derive(Debug, Clone)]
struct Token {
    token_type: TokenType,
    value: String,
    position: usize,
}

/// DDL parser for the streaming SQL test tooling.
///
/// Construction builds the keyword table once; the parser itself is
/// stateless across calls and can be reused for any number of statements.
#[derive(Debug, Clone)]
pub struct StreamingSqlParser {
    /// Lookup table mapping SQL keywords to token types
    keywords: HashMap<String, TokenType>,
}

impl Default for StreamingSqlParser {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamingSqlParser {
    /// Creates a new parser with all supported keywords initialized.
    pub fn new() -> Self {
        let mut keywords = HashMap::new();
        keywords.insert("CREATE".to_string(), TokenType::Create);
        keywords.insert("STREAM".to_string(), TokenType::Stream);
        keywords.insert("TABLE".to_string(), TokenType::Table);
        keywords.insert("TYPE".to_string(), TokenType::Type);
        keywords.insert("AS".to_string(), TokenType::As);
        keywords.insert("WITH".to_string(), TokenType::With);
        keywords.insert("KEY".to_string(), TokenType::Key);
        keywords.insert("PRIMARY".to_string(), TokenType::Primary);
        keywords.insert("NOT".to_string(), TokenType::Not);
        keywords.insert("NULL".to_string(), TokenType::Null);
        keywords.insert("SELECT".to_string(), TokenType::Select);
        keywords.insert("INSERT".to_string(), TokenType::Insert);
        keywords.insert("SHOW".to_string(), TokenType::Show);
        keywords.insert("LIST".to_string(), TokenType::List);
        keywords.insert("DESCRIBE".to_string(), TokenType::Describe);
        keywords.insert("DROP".to_string(), TokenType::Drop);

        Self { keywords }
    }

    /// Parses SQL text into a sequence of statements, split on `;`.
    ///
    /// # Arguments
    /// * `sql` - The SQL text to parse; may contain multiple statements
    ///
    /// # Returns
    /// * `Ok(Vec<ParsedStatement>)` - Successfully parsed statements
    /// * `Err(SqlError)` - Parse error with position and message
    pub fn parse(&self, sql: &str) -> SqlResult<Vec<ParsedStatement>> {
        let tokens = self.tokenize(sql)?;

        let mut statements = Vec::new();
        let mut group: Vec<Token> = Vec::new();
        let mut group_start: Option<usize> = None;

        for token in tokens {
            match token.token_type {
                TokenType::Semicolon => {
                    if !group.is_empty() {
                        let start = group_start.take().unwrap_or(0);
                        let text = sql[start..token.position].trim().to_string();
                        statements.push(Self::parse_group(std::mem::take(&mut group), text)?);
                    }
                }
                _ => {
                    if group_start.is_none() {
                        group_start = Some(token.position);
                    }
                    group.push(token);
                }
            }
        }

        if !group.is_empty() {
            let start = group_start.unwrap_or(0);
            let text = sql[start..].trim().to_string();
            statements.push(Self::parse_group(group, text)?);
        }

        Ok(statements)
    }

    /// Resolves a parsed statement against the catalog.
    ///
    /// Binds `Custom` type aliases through the metastore and validates the
    /// column list. Statements that reference unknown aliases fail with a
    /// `ResolutionError`; duplicate column names fail with a `SchemaError`.
    pub fn prepare(
        &self,
        statement: &ParsedStatement,
        metastore: &MetaStore,
    ) -> SqlResult<PreparedStatement> {
        let resolved = match &statement.statement {
            Statement::CreateStream {
                name,
                columns,
                properties,
            } => Statement::CreateStream {
                name: name.clone(),
                columns: Self::resolve_columns(columns, metastore)?,
                properties: properties.clone(),
            },
            Statement::CreateTable {
                name,
                columns,
                properties,
            } => Statement::CreateTable {
                name: name.clone(),
                columns: Self::resolve_columns(columns, metastore)?,
                properties: properties.clone(),
            },
            Statement::RegisterType { name, data_type } => Statement::RegisterType {
                name: name.clone(),
                data_type: metastore.resolve_data_type(data_type)?,
            },
            other @ Statement::Other { .. } => other.clone(),
        };

        Ok(PreparedStatement {
            statement: resolved,
        })
    }

    fn resolve_columns(columns: &[ColumnDef], metastore: &MetaStore) -> SqlResult<Vec<ColumnDef>> {
        let mut seen: Vec<String> = Vec::new();
        let mut resolved = Vec::with_capacity(columns.len());

        for column in columns {
            let upper = column.name.to_uppercase();
            if seen.contains(&upper) {
                return Err(SqlError::schema_error(
                    "Duplicate column name",
                    Some(column.name.clone()),
                ));
            }
            seen.push(upper);

            resolved.push(ColumnDef {
                name: column.name.clone(),
                data_type: metastore.resolve_data_type(&column.data_type)?,
                key: column.key,
                nullable: column.nullable,
            });
        }

        Ok(resolved)
    }

    fn parse_group(mut tokens: Vec<Token>, text: String) -> SqlResult<ParsedStatement> {
        let end = tokens
            .last()
            .map(|t| t.position + t.value.len())
            .unwrap_or(0);
        tokens.push(Token {
            token_type: TokenType::Eof,
            value: String::new(),
            position: end,
        });

        let mut parser = StatementParser { tokens, current: 0 };
        let statement = parser.parse_statement()?;
        Ok(ParsedStatement { text, statement })
    }

    fn tokenize(&self, sql: &str) -> SqlResult<Vec<Token>> {
        let mut tokens = Vec::new();
        let mut chars = sql.char_indices().peekable();

        while let Some(&(pos, c)) = chars.peek() {
            if c.is_whitespace() {
                chars.next();
                continue;
            }

            // Single-line comments: -- to end of line
            if c == '-' {
                let mut lookahead = chars.clone();
                lookahead.next();
                if matches!(lookahead.peek(), Some(&(_, '-'))) {
                    while let Some(&(_, nc)) = chars.peek() {
                        chars.next();
                        if nc == '\n' {
                            break;
                        }
                    }
                    continue;
                }
            }

            // Multi-line comments: /* ... */
            if c == '/' {
                let mut lookahead = chars.clone();
                lookahead.next();
                if matches!(lookahead.peek(), Some(&(_, '*'))) {
                    chars.next();
                    chars.next();
                    let mut closed = false;
                    while let Some((_, nc)) = chars.next() {
                        if nc == '*' {
                            if matches!(chars.peek(), Some(&(_, '/'))) {
                                chars.next();
                                closed = true;
                                break;
                            }
                        }
                    }
                    if !closed {
                        return Err(SqlError::parse_error("Unterminated comment", Some(pos)));
                    }
                    continue;
                }
            }

            if c.is_alphabetic() || c == '_' {
                let mut value = String::new();
                while let Some(&(_, nc)) = chars.peek() {
                    if nc.is_alphanumeric() || nc == '_' {
                        value.push(nc);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let token_type = self
                    .keywords
                    .get(&value.to_uppercase())
                    .cloned()
                    .unwrap_or(TokenType::Identifier);
                tokens.push(Token {
                    token_type,
                    value,
                    position: pos,
                });
                continue;
            }

            if c.is_ascii_digit() {
                let mut value = String::new();
                let mut seen_dot = false;
                while let Some(&(_, nc)) = chars.peek() {
                    if nc.is_ascii_digit() || (nc == '.' && !seen_dot) {
                        seen_dot |= nc == '.';
                        value.push(nc);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token {
                    token_type: TokenType::Number,
                    value,
                    position: pos,
                });
                continue;
            }

            if c == '\'' || c == '"' {
                let quote = c;
                chars.next();
                let mut value = String::new();
                let mut closed = false;
                while let Some((_, nc)) = chars.next() {
                    if nc == quote {
                        // Doubled quote is an escaped quote character
                        if matches!(chars.peek(), Some(&(_, p)) if p == quote) {
                            value.push(quote);
                            chars.next();
                        } else {
                            closed = true;
                            break;
                        }
                    } else {
                        value.push(nc);
                    }
                }
                if !closed {
                    return Err(SqlError::parse_error(
                        "Unterminated string literal",
                        Some(pos),
                    ));
                }
                tokens.push(Token {
                    token_type: TokenType::String,
                    value,
                    position: pos,
                });
                continue;
            }

            let token_type = match c {
                '(' => TokenType::LeftParen,
                ')' => TokenType::RightParen,
                ',' => TokenType::Comma,
                ';' => TokenType::Semicolon,
                '=' => TokenType::Equal,
                _ => TokenType::Symbol,
            };
            tokens.push(Token {
                token_type,
                value: c.to_string(),
                position: pos,
            });
            chars.next();
        }

        Ok(tokens)
    }
}

/// Parser state over one statement's token group.
struct StatementParser {
    tokens: Vec<Token>,
    current: usize,
}

impl StatementParser {
    fn current_token(&self) -> &Token {
        &self.tokens[self.current.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.current_token().clone();
        if self.current < self.tokens.len() - 1 {
            self.current += 1;
        }
        token
    }

    fn expect(&mut self, token_type: TokenType) -> SqlResult<Token> {
        if self.current_token().token_type == token_type {
            Ok(self.advance())
        } else {
            Err(SqlError::parse_error(
                format!(
                    "Expected {:?}, found '{}'",
                    token_type,
                    self.current_token().value
                ),
                Some(self.current_token().position),
            ))
        }
    }

    fn skip_to_end(&mut self) {
        while self.current_token().token_type != TokenType::Eof {
            self.advance();
        }
    }

    fn expect_end(&mut self) -> SqlResult<()> {
        if self.current_token().token_type == TokenType::Eof {
            Ok(())
        } else {
            Err(SqlError::parse_error(
                format!(
                    "Unexpected token '{}' after statement",
                    self.current_token().value
                ),
                Some(self.current_token().position),
            ))
        }
    }

    fn parse_statement(&mut self) -> SqlResult<Statement> {
        match self.current_token().token_type {
            TokenType::Create => self.parse_create(),
            TokenType::Select
            | TokenType::Insert
            | TokenType::Show
            | TokenType::List
            | TokenType::Describe
            | TokenType::Drop => {
                let keyword = self.current_token().value.to_uppercase();
                self.skip_to_end();
                Ok(Statement::Other { keyword })
            }
            _ => Err(SqlError::parse_error(
                format!(
                    "Expected CREATE, SELECT, INSERT, SHOW, LIST, DESCRIBE, or DROP, found '{}'",
                    self.current_token().value
                ),
                Some(self.current_token().position),
            )),
        }
    }

    fn parse_create(&mut self) -> SqlResult<Statement> {
        self.expect(TokenType::Create)?;

        match self.current_token().token_type {
            TokenType::Stream => self.parse_create_source(false),
            TokenType::Table => self.parse_create_source(true),
            TokenType::Type => self.parse_register_type(),
            _ => Err(SqlError::parse_error(
                "Expected STREAM, TABLE, or TYPE after CREATE",
                Some(self.current_token().position),
            )),
        }
    }

    fn parse_create_source(&mut self, table: bool) -> SqlResult<Statement> {
        self.advance(); // STREAM or TABLE
        let name = self.expect(TokenType::Identifier)?.value;

        let columns = if self.current_token().token_type == TokenType::LeftParen {
            self.parse_column_definitions()?
        } else {
            Vec::new()
        };

        // CREATE ... AS SELECT is a different statement kind: it derives its
        // sink from query execution, not from the declared column list.
        if self.current_token().token_type == TokenType::As {
            self.skip_to_end();
            return Ok(Statement::Other {
                keyword: if table {
                    "CREATE TABLE AS SELECT".to_string()
                } else {
                    "CREATE STREAM AS SELECT".to_string()
                },
            });
        }

        let properties = if self.current_token().token_type == TokenType::With {
            self.parse_with_properties()?
        } else {
            HashMap::new()
        };

        if self.current_token().token_type == TokenType::As {
            self.skip_to_end();
            return Ok(Statement::Other {
                keyword: if table {
                    "CREATE TABLE AS SELECT".to_string()
                } else {
                    "CREATE STREAM AS SELECT".to_string()
                },
            });
        }

        self.expect_end()?;

        Ok(if table {
            Statement::CreateTable {
                name,
                columns,
                properties,
            }
        } else {
            Statement::CreateStream {
                name,
                columns,
                properties,
            }
        })
    }

    fn parse_register_type(&mut self) -> SqlResult<Statement> {
        self.expect(TokenType::Type)?;
        let name = self.expect(TokenType::Identifier)?.value;
        self.expect(TokenType::As)?;
        let data_type = self.parse_data_type()?;
        self.expect_end()?;

        Ok(Statement::RegisterType { name, data_type })
    }

    fn parse_column_definitions(&mut self) -> SqlResult<Vec<ColumnDef>> {
        self.expect(TokenType::LeftParen)?;
        let mut columns = Vec::new();

        // Empty column list: CREATE STREAM s () WITH (...)
        if self.current_token().token_type == TokenType::RightParen {
            self.advance();
            return Ok(columns);
        }

        loop {
            let name = self.expect(TokenType::Identifier)?.value;
            let data_type = self.parse_data_type()?;

            let mut key = false;
            let mut nullable = true;
            loop {
                match self.current_token().token_type {
                    TokenType::Primary => {
                        self.advance();
                        self.expect(TokenType::Key)?;
                        key = true;
                    }
                    TokenType::Key => {
                        self.advance();
                        key = true;
                    }
                    TokenType::Not => {
                        self.advance();
                        self.expect(TokenType::Null)?;
                        nullable = false;
                    }
                    _ => break,
                }
            }

            columns.push(ColumnDef {
                name,
                data_type,
                key,
                nullable,
            });

            if self.current_token().token_type == TokenType::Comma {
                self.advance();
            } else {
                break;
            }
        }

        self.expect(TokenType::RightParen)?;
        Ok(columns)
    }

    fn parse_data_type(&mut self) -> SqlResult<DataType> {
        let token = self.expect(TokenType::Identifier)?;
        let type_name = token.value.to_uppercase();

        match type_name.as_str() {
            "INT" | "INTEGER" => Ok(DataType::Integer),
            "BIGINT" => Ok(DataType::BigInt),
            "FLOAT" | "DOUBLE" | "REAL" => Ok(DataType::Float),
            "STRING" | "VARCHAR" | "TEXT" => Ok(DataType::String),
            "BOOLEAN" | "BOOL" => Ok(DataType::Boolean),
            "TIMESTAMP" => Ok(DataType::Timestamp),
            "DECIMAL" | "NUMERIC" => {
                if self.current_token().token_type == TokenType::LeftParen {
                    self.advance();
                    let precision = self.parse_integer("precision")?;
                    self.expect(TokenType::Comma)?;
                    let scale = self.parse_integer("scale")?;
                    self.expect(TokenType::RightParen)?;
                    Ok(DataType::Decimal { precision, scale })
                } else {
                    Ok(DataType::Decimal {
                        precision: 10,
                        scale: 0,
                    })
                }
            }
            "ARRAY" => {
                self.expect(TokenType::LeftParen)?;
                let inner = self.parse_data_type()?;
                self.expect(TokenType::RightParen)?;
                Ok(DataType::Array(Box::new(inner)))
            }
            "MAP" => {
                self.expect(TokenType::LeftParen)?;
                let key_type = self.parse_data_type()?;
                self.expect(TokenType::Comma)?;
                let value_type = self.parse_data_type()?;
                self.expect(TokenType::RightParen)?;
                Ok(DataType::Map(Box::new(key_type), Box::new(value_type)))
            }
            "STRUCT" => {
                self.expect(TokenType::LeftParen)?;
                let mut fields = Vec::new();
                loop {
                    let field_name = self.expect(TokenType::Identifier)?.value;
                    let field_type = self.parse_data_type()?;
                    fields.push(StructField {
                        name: field_name,
                        data_type: field_type,
                    });
                    if self.current_token().token_type == TokenType::Comma {
                        self.advance();
                    } else {
                        break;
                    }
                }
                self.expect(TokenType::RightParen)?;
                Ok(DataType::Struct(fields))
            }
            // Anything else is a type alias to be resolved at prepare time
            _ => Ok(DataType::Custom(token.value)),
        }
    }

    fn parse_integer(&mut self, what: &str) -> SqlResult<u32> {
        let token = self.expect(TokenType::Number)?;
        token.value.parse::<u32>().map_err(|_| {
            SqlError::parse_error(
                format!("Invalid {} '{}'", what, token.value),
                Some(token.position),
            )
        })
    }

    fn parse_with_properties(&mut self) -> SqlResult<HashMap<String, String>> {
        self.expect(TokenType::With)?;
        self.expect(TokenType::LeftParen)?;

        let mut properties = HashMap::new();

        loop {
            let key = match self.current_token().token_type {
                TokenType::String | TokenType::Identifier => self.advance().value,
                _ => {
                    return Err(SqlError::parse_error(
                        "Expected property name",
                        Some(self.current_token().position),
                    ));
                }
            };
            self.expect(TokenType::Equal)?;
            let value = match self.current_token().token_type {
                TokenType::String | TokenType::Identifier | TokenType::Number => {
                    self.advance().value
                }
                _ => {
                    return Err(SqlError::parse_error(
                        "Expected property value",
                        Some(self.current_token().position),
                    ));
                }
            };

            properties.insert(key.to_lowercase(), value);

            if self.current_token().token_type == TokenType::Comma {
                self.advance();
            } else {
                break;
            }
        }

        self.expect(TokenType::RightParen)?;
        Ok(properties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rillsql::catalog::{FunctionRegistry, MetaStore};

    #[test]
    fn test_parse_create_stream_with_columns_and_properties() {
        let parser = StreamingSqlParser::new();
        let statements = parser
            .parse(
                "CREATE STREAM orders (ID BIGINT KEY, ITEM STRING, PRICE DECIMAL(10, 2)) \
                 WITH ('topic' = 'orders_topic', 'value_format' = 'AVRO', 'partitions' = '4');",
            )
            .unwrap();

        assert_eq!(statements.len(), 1);
        match &statements[0].statement {
            Statement::CreateStream {
                name,
                columns,
                properties,
            } => {
                assert_eq!(name, "orders");
                assert_eq!(columns.len(), 3);
                assert!(columns[0].key);
                assert!(!columns[1].key);
                assert_eq!(
                    columns[2].data_type,
                    DataType::Decimal {
                        precision: 10,
                        scale: 2
                    }
                );
                assert_eq!(properties.get("topic").unwrap(), "orders_topic");
                assert_eq!(properties.get("partitions").unwrap(), "4");
            }
            other => panic!("expected CreateStream, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_create_table_primary_key() {
        let parser = StreamingSqlParser::new();
        let statements = parser
            .parse("CREATE TABLE users (ID INT PRIMARY KEY, NAME STRING NOT NULL)")
            .unwrap();

        match &statements[0].statement {
            Statement::CreateTable { columns, .. } => {
                assert!(columns[0].key);
                assert!(columns[0].nullable);
                assert!(!columns[1].nullable);
            }
            other => panic!("expected CreateTable, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_register_type() {
        let parser = StreamingSqlParser::new();
        let statements = parser
            .parse("CREATE TYPE ADDRESS AS STRUCT(NUMBER INT, STREET STRING);")
            .unwrap();

        match &statements[0].statement {
            Statement::RegisterType { name, data_type } => {
                assert_eq!(name, "ADDRESS");
                match data_type {
                    DataType::Struct(fields) => {
                        assert_eq!(fields.len(), 2);
                        assert_eq!(fields[0].name, "NUMBER");
                    }
                    other => panic!("expected STRUCT, got {:?}", other),
                }
            }
            other => panic!("expected RegisterType, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_statement_sequence_preserves_text() {
        let parser = StreamingSqlParser::new();
        let statements = parser
            .parse("CREATE TYPE T AS INT; CREATE STREAM s (ID T) WITH ('value_format' = 'JSON');")
            .unwrap();

        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].text, "CREATE TYPE T AS INT");
        assert!(statements[1].text.starts_with("CREATE STREAM s"));
    }

    #[test]
    fn test_create_as_select_is_not_a_source_creation() {
        let parser = StreamingSqlParser::new();
        let statements = parser
            .parse("CREATE STREAM derived AS SELECT * FROM orders WHERE price > 10;")
            .unwrap();

        match &statements[0].statement {
            Statement::Other { keyword } => assert_eq!(keyword, "CREATE STREAM AS SELECT"),
            other => panic!("expected Other, got {:?}", other),
        }
    }

    #[test]
    fn test_select_statements_are_recognized_but_inert() {
        let parser = StreamingSqlParser::new();
        let statements = parser.parse("SELECT a, b FROM t WHERE a > 1").unwrap();
        assert!(matches!(
            statements[0].statement,
            Statement::Other { .. }
        ));
    }

    #[test]
    fn test_garbage_fails_to_parse() {
        let parser = StreamingSqlParser::new();
        assert!(parser.parse("not valid sql").is_err());
        assert!(parser.parse("CREATE NONSENSE foo").is_err());
        assert!(parser.parse("CREATE STREAM s (ID INT) garbage").is_err());
    }

    #[test]
    fn test_comments_are_skipped() {
        let parser = StreamingSqlParser::new();
        let statements = parser
            .parse("-- a stream\nCREATE STREAM s (ID INT) /* inline */ WITH ('topic' = 't');")
            .unwrap();
        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn test_unterminated_string_is_an_error() {
        let parser = StreamingSqlParser::new();
        assert!(parser.parse("CREATE STREAM s WITH ('topic' = 'oops)").is_err());
    }

    #[test]
    fn test_prepare_resolves_registered_alias() {
        let parser = StreamingSqlParser::new();
        let functions = FunctionRegistry::with_builtins();
        let mut metastore = MetaStore::new(&functions);
        metastore.register_type("MONEY", DataType::Decimal {
            precision: 10,
            scale: 2,
        });

        let statements = parser
            .parse("CREATE STREAM s (ID INT KEY, AMOUNT MONEY)")
            .unwrap();
        let prepared = parser.prepare(&statements[0], &metastore).unwrap();

        match prepared.statement {
            Statement::CreateStream { columns, .. } => {
                assert_eq!(
                    columns[1].data_type,
                    DataType::Decimal {
                        precision: 10,
                        scale: 2
                    }
                );
            }
            other => panic!("expected CreateStream, got {:?}", other),
        }
    }

    #[test]
    fn test_prepare_fails_for_unknown_alias() {
        let parser = StreamingSqlParser::new();
        let functions = FunctionRegistry::with_builtins();
        let metastore = MetaStore::new(&functions);

        let statements = parser.parse("CREATE STREAM s (ID WIDGET)").unwrap();
        assert!(matches!(
            parser.prepare(&statements[0], &metastore),
            Err(SqlError::ResolutionError { .. })
        ));
    }

    #[test]
    fn test_prepare_rejects_duplicate_columns() {
        let parser = StreamingSqlParser::new();
        let functions = FunctionRegistry::with_builtins();
        let metastore = MetaStore::new(&functions);

        let statements = parser.parse("CREATE STREAM s (ID INT, id STRING)").unwrap();
        assert!(matches!(
            parser.prepare(&statements[0], &metastore),
            Err(SqlError::SchemaError { .. })
        ));
    }
}
