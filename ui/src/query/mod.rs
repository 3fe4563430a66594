//! Data source boundary.
//!
//! Every chart talks to benchmark data through [`QueryAdapter`], which offers
//! exactly two read-only operations. Sentinel encodings of both data sources
//! are translated into [`Measurement`](crate::core::Measurement) here.

pub mod descriptor;
pub mod error;
pub mod generation;
pub mod remote;
pub mod row;
pub mod snapshot;
pub mod sql;
pub mod wire;

use std::rc::Rc;

use futures::future::LocalBoxFuture;

pub use descriptor::{
    BuildSelection, Column, DatasetAttribute, DistinctQuery, Filter, RowOrder, Table, ValueQuery,
};
pub use error::QueryError;
pub use generation::{RequestGeneration, Ticket};
pub use remote::RemoteAdapter;
pub use row::{Payload, ResultRow};
pub use snapshot::SnapshotAdapter;

use crate::core::config::DataSource;

pub trait QueryAdapter {
    /// Distinct values of one column, ascending.
    fn distinct<'a>(
        &'a self,
        query: &'a DistinctQuery,
    ) -> LocalBoxFuture<'a, Result<Vec<String>, QueryError>>;

    /// Value rows, latest build per group or every build.
    fn values<'a>(
        &'a self,
        query: &'a ValueQuery,
    ) -> LocalBoxFuture<'a, Result<Vec<ResultRow>, QueryError>>;
}

/// Open the configured data source.
pub async fn connect(source: &DataSource) -> Result<Rc<dyn QueryAdapter>, QueryError> {
    match source {
        DataSource::Snapshot { location } => {
            let adapter = SnapshotAdapter::load(location).await?;
            Ok(Rc::new(adapter))
        }
        DataSource::Remote { endpoint } => {
            let adapter = RemoteAdapter::new(endpoint);
            tracing::info!(endpoint = %adapter.endpoint(), "using remote query endpoint");
            Ok(Rc::new(adapter))
        }
    }
}

/// Every library known to either fact table, in first-seen order.
pub async fn all_libraries(adapter: &dyn QueryAdapter) -> Result<Vec<String>, QueryError> {
    let mut libraries = adapter
        .distinct(&DistinctQuery::new(Table::Timings, Column::Library))
        .await?;
    for library in adapter
        .distinct(&DistinctQuery::new(Table::Metrics, Column::Library))
        .await?
    {
        if !libraries.contains(&library) {
            libraries.push(library);
        }
    }
    Ok(libraries)
}
