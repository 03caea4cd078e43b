//! Declarative test-case support
//!
//! Utilities shared by the declarative test framework:
//! - Statement-to-topic inference and aggregation ([`topics`])
//! - Test name formatting and parsing ([`naming`])
//! - The JSON test-case file model ([`spec`])
//!
//! # Flow
//!
//! ```text
//! test case file ──> TestSuite / TestCaseSpec
//!                        │
//!     statements ────────┤ per statement: parse -> classify -> prepare
//!     explicit topics ───┤   -> inject formats -> infer value schema
//!     record samples ────┘
//!                        ▼
//!                 deduplicated Topic set, first writer per name wins
//! ```
//!
//! Intentionally malformed statements are part of the model: negative test
//! cases must build successfully with such statements contributing no
//! topic, so their failure can be asserted by later harness stages.

pub mod error;
pub mod naming;
pub mod spec;
pub mod topics;

// Re-export main types for convenience
pub use error::{TestHarnessError, TestHarnessResult};
pub use spec::{Record, TestCaseSpec, TestSuite, TopicDecl};
pub use topics::{all_topics, topic_from_statement, Topic};
