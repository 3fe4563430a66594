//! Queries forwarded to a remote SQL endpoint.

use futures::future::{FutureExt, LocalBoxFuture};

use super::{
    descriptor::{DistinctQuery, ValueQuery},
    error::QueryError,
    row::ResultRow,
    sql::{distinct_sql, values_sql, SqlQuery},
    wire, QueryAdapter,
};
use crate::core::platform;

/// Posts rendered SQL as the `request` form field and decodes the JSON answer.
pub struct RemoteAdapter {
    endpoint: String,
    client: reqwest::Client,
}

impl RemoteAdapter {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: platform::resolve_location(endpoint),
            client: reqwest::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, query: SqlQuery) -> Result<String, QueryError> {
        let request = query.render()?;
        tracing::debug!(endpoint = %self.endpoint, sql = %request, "posting query");
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("request", request.as_str())])
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}

impl QueryAdapter for RemoteAdapter {
    fn distinct<'a>(
        &'a self,
        query: &'a DistinctQuery,
    ) -> LocalBoxFuture<'a, Result<Vec<String>, QueryError>> {
        async move {
            let body = self.post(distinct_sql(query)?).await?;
            wire::decode_distinct(&body)
        }
        .boxed_local()
    }

    fn values<'a>(
        &'a self,
        query: &'a ValueQuery,
    ) -> LocalBoxFuture<'a, Result<Vec<ResultRow>, QueryError>> {
        async move {
            let body = self.post(values_sql(query)?).await?;
            wire::decode_rows(&body, query.table)
        }
        .boxed_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::descriptor::{Column, Filter, Table};
    use futures::executor::block_on;

    #[test]
    fn invalid_queries_fail_before_any_request() {
        let adapter = RemoteAdapter::new("http://127.0.0.1:9/query");
        let query = DistinctQuery::new(Table::Timings, Column::MetricPayload)
            .filtered(Filter::default().method("kmeans"));
        assert!(matches!(
            block_on(adapter.distinct(&query)),
            Err(QueryError::InvalidParameter(_))
        ));
        assert_eq!(adapter.endpoint(), "http://127.0.0.1:9/query");
    }
}
