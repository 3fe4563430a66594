//! SQL text for the remote endpoint.
//!
//! Query text only ever contains `?` placeholders. User-supplied values are
//! bound as [`SqlParam`]s and rendered as escaped literals at the very end, so
//! a method name containing a quote can never change the shape of a query.
//!
//! The endpoint is MySQL with backslash escapes enabled, so literals are
//! escaped the way `mysql_real_escape_string` does it: a lone doubled quote
//! is not enough once the text can end in a backslash.

use super::{
    descriptor::{
        BuildSelection, Column, DatasetAttribute, DistinctQuery, Filter, RowOrder, Table,
        ValueQuery,
    },
    error::QueryError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Text(String),
    Int(i64),
}

impl SqlParam {
    fn literal(&self) -> String {
        match self {
            Self::Int(value) => value.to_string(),
            Self::Text(text) => {
                let mut out = String::with_capacity(text.len() + 2);
                out.push('\'');
                for ch in text.chars() {
                    match ch {
                        '\0' => out.push_str("\\0"),
                        '\n' => out.push_str("\\n"),
                        '\r' => out.push_str("\\r"),
                        '\x1a' => out.push_str("\\Z"),
                        '\\' | '\'' | '"' => {
                            out.push('\\');
                            out.push(ch);
                        }
                        other => out.push(other),
                    }
                }
                out.push('\'');
                out
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlQuery {
    pub text: String,
    pub params: Vec<SqlParam>,
}

impl SqlQuery {
    /// Substitute every placeholder with its escaped literal.
    pub fn render(&self) -> Result<String, QueryError> {
        let mut out = String::with_capacity(self.text.len() + 16 * self.params.len());
        let mut params = self.params.iter();
        let mut in_literal = false;
        for ch in self.text.chars() {
            match ch {
                '\'' => {
                    in_literal = !in_literal;
                    out.push(ch);
                }
                '?' if !in_literal => {
                    let param = params.next().ok_or_else(|| {
                        QueryError::InvalidParameter("more placeholders than parameters".into())
                    })?;
                    out.push_str(&param.literal());
                }
                _ => out.push(ch),
            }
        }
        if params.next().is_some() {
            return Err(QueryError::InvalidParameter(
                "more parameters than placeholders".into(),
            ));
        }
        Ok(out)
    }
}

fn column_expr(table: Table, column: Column) -> Result<&'static str, QueryError> {
    Ok(match column {
        Column::Method => "methods.name",
        Column::Parameters => "methods.parameters",
        Column::Dataset => "datasets.name",
        Column::Library => "libraries.name",
        Column::MetricPayload => match table {
            Table::Metrics => "metrics.metric",
            Table::Timings => {
                return Err(QueryError::InvalidParameter(
                    "timing rows carry no metric payload".into(),
                ))
            }
        },
    })
}

fn from_clause(table: Table) -> String {
    let t = table.sql_name();
    format!(
        "FROM {t} \
         JOIN methods ON methods.id = {t}.method_id \
         JOIN datasets ON datasets.id = {t}.dataset_id \
         JOIN libraries ON libraries.id = {t}.libary_id \
         JOIN builds ON builds.id = {t}.build_id"
    )
}

fn where_clause(filter: &Filter, params: &mut Vec<SqlParam>) -> Vec<String> {
    let mut conditions = Vec::new();
    let fields = [
        ("methods.name", &filter.method),
        ("methods.parameters", &filter.parameters),
        ("datasets.name", &filter.dataset),
        ("libraries.name", &filter.library),
    ];
    for (expr, value) in fields {
        if let Some(value) = value {
            conditions.push(format!("{expr} = ?"));
            params.push(SqlParam::Text(value.clone()));
        }
    }
    conditions
}

fn attribute_expr(attribute: DatasetAttribute) -> &'static str {
    match attribute {
        DatasetAttribute::Size => "datasets.size",
        DatasetAttribute::Attributes => "datasets.attributes",
        DatasetAttribute::Instances => "datasets.instances",
    }
}

pub fn distinct_sql(query: &DistinctQuery) -> Result<SqlQuery, QueryError> {
    let expr = column_expr(query.table, query.column)?;
    let mut params = Vec::new();
    let conditions = where_clause(&query.filter, &mut params);

    let mut text = format!("SELECT DISTINCT {expr} AS value {}", from_clause(query.table));
    if !conditions.is_empty() {
        text.push_str(" WHERE ");
        text.push_str(&conditions.join(" AND "));
    }
    text.push_str(" ORDER BY value;");
    Ok(SqlQuery { text, params })
}

pub fn values_sql(query: &ValueQuery) -> Result<SqlQuery, QueryError> {
    let t = query.table.sql_name();
    let payload = match query.table {
        Table::Timings => format!("{t}.time AS time, {t}.var AS var"),
        Table::Metrics => format!("{t}.metric AS metric"),
    };

    let mut params = Vec::new();
    let mut conditions = where_clause(&query.filter, &mut params);
    if query.builds == BuildSelection::Latest {
        conditions.push(format!(
            "{t}.build_id = (SELECT MAX(latest.build_id) FROM {t} AS latest \
             WHERE latest.method_id = {t}.method_id \
             AND latest.dataset_id = {t}.dataset_id \
             AND latest.libary_id = {t}.libary_id)"
        ));
    }

    let mut text = format!(
        "SELECT libraries.name AS library, datasets.name AS dataset, methods.name AS method, \
         methods.parameters AS parameters, builds.id AS build_id, builds.build AS build, \
         {payload} {}",
        from_clause(query.table)
    );
    if !conditions.is_empty() {
        text.push_str(" WHERE ");
        text.push_str(&conditions.join(" AND "));
    }
    let order = match query.order {
        RowOrder::Natural => format!("{t}.id"),
        RowOrder::DatasetAttribute(attribute) => format!("{}, {t}.id", attribute_expr(attribute)),
        RowOrder::BuildTime => "builds.build, builds.id".to_string(),
    };
    text.push_str(" ORDER BY ");
    text.push_str(&order);
    text.push(';');
    Ok(SqlQuery { text, params })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render_one(value: &str) -> String {
        SqlQuery {
            text: "SELECT * FROM methods WHERE name = ?".into(),
            params: vec![SqlParam::Text(value.into())],
        }
        .render()
        .unwrap()
    }

    #[test]
    fn quotes_are_backslash_escaped() {
        assert_eq!(
            render_one("o'brien"),
            r"SELECT * FROM methods WHERE name = 'o\'brien'"
        );
    }

    #[test]
    fn injection_attempt_stays_a_literal() {
        assert_eq!(
            render_one("x'; DROP TABLE results; --"),
            r"SELECT * FROM methods WHERE name = 'x\'; DROP TABLE results; --'"
        );
    }

    #[test]
    fn trailing_backslash_cannot_close_the_literal() {
        assert_eq!(
            render_one("x\\' OR 1=1 -- "),
            r"SELECT * FROM methods WHERE name = 'x\\\' OR 1=1 -- '"
        );
        assert_eq!(render_one("dir\\"), r"SELECT * FROM methods WHERE name = 'dir\\'");
    }

    #[test]
    fn control_characters_are_escaped() {
        assert_eq!(
            render_one("a\0b\nc\rd\x1ae\"f"),
            r#"SELECT * FROM methods WHERE name = 'a\0b\nc\rd\Ze\"f'"#
        );
    }

    #[test]
    fn placeholder_count_must_match() {
        let missing = SqlQuery {
            text: "? ?".into(),
            params: vec![SqlParam::Int(1)],
        };
        assert!(missing.render().is_err());
        let extra = SqlQuery {
            text: "?".into(),
            params: vec![SqlParam::Int(1), SqlParam::Int(2)],
        };
        assert!(extra.render().is_err());
    }

    #[test]
    fn question_marks_inside_literals_are_not_placeholders() {
        let query = SqlQuery {
            text: "SELECT '?' , ?".into(),
            params: vec![SqlParam::Int(7)],
        };
        assert_eq!(query.render().unwrap(), "SELECT '?' , 7");
    }

    #[test]
    fn distinct_query_binds_filters() {
        let query = DistinctQuery::new(Table::Timings, Column::Parameters)
            .filtered(Filter::default().method("kmeans"));
        let sql = distinct_sql(&query).unwrap();
        assert!(sql.text.starts_with("SELECT DISTINCT methods.parameters AS value FROM results"));
        assert!(sql.text.contains("WHERE methods.name = ?"));
        assert_eq!(sql.params, vec![SqlParam::Text("kmeans".into())]);
        assert!(!sql.text.contains("kmeans"));
    }

    #[test]
    fn metric_payload_needs_metrics_table() {
        let query = DistinctQuery::new(Table::Timings, Column::MetricPayload);
        assert!(distinct_sql(&query).is_err());
    }

    #[test]
    fn latest_values_use_max_build_subquery() {
        let query = ValueQuery::latest(
            Table::Timings,
            Filter::default().method("pca").parameters(""),
        )
        .ordered(RowOrder::DatasetAttribute(DatasetAttribute::Instances));
        let sql = values_sql(&query).unwrap();
        assert!(sql.text.contains("MAX(latest.build_id)"));
        assert!(sql.text.contains("results.time AS time"));
        assert!(sql.text.ends_with("ORDER BY datasets.instances, results.id;"));
        let rendered = sql.render().unwrap();
        assert!(rendered.contains("methods.parameters = ''"));
        assert!(rendered.contains("methods.name = 'pca'"));
    }

    #[test]
    fn history_values_keep_all_builds() {
        let query = ValueQuery::history(Table::Metrics, Filter::default().dataset("iris"));
        let sql = values_sql(&query).unwrap();
        assert!(!sql.text.contains("MAX("));
        assert!(sql.text.contains("metrics.metric AS metric"));
        assert!(sql.text.ends_with("ORDER BY builds.build, builds.id;"));
    }
}
