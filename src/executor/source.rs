//! Data-source abstraction

use super::errors::ExecutorResult;
use super::result::Row;

/// Runs a query against one named target.
///
/// Implementations own any connection only for the duration of a call.
pub trait DataSource {
    /// Execute `query` against `target` and collect every row
    fn run_query(&self, query: &str, target: &str) -> ExecutorResult<Vec<Row>>;
}

impl<T: DataSource + ?Sized> DataSource for &T {
    fn run_query(&self, query: &str, target: &str) -> ExecutorResult<Vec<Row>> {
        (**self).run_query(query, target)
    }
}
