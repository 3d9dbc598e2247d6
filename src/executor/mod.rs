//! Query execution against configured targets
//!
//! The executor takes a query and one target identifier and returns rows
//! or an execution error. It holds no state between calls: a connection is
//! acquired, used and released inside a single `run_query`.

mod errors;
mod result;
mod source;
mod sqlite;

pub use errors::{ExecutorError, ExecutorErrorCode, ExecutorResult};
pub use result::{Row, Value};
pub use source::DataSource;
pub use sqlite::SqliteSource;
