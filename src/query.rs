//! Fluent parameterized queries over a session.
//!
//! [`QueryBuilder`] is created by
//! [`PhoenixSession::query`](crate::PhoenixSession::query); chain
//! `.bind()` calls to attach parameters in placeholder order, then finish
//! with [`fetch_all`](QueryBuilder::fetch_all) for result rows or
//! [`execute`](QueryBuilder::execute) for an update count. The statement
//! prepared under the hood is closed on every exit path, including
//! failures, so no server-side handle leaks.

use crate::avatica::{Row, TypedValue};
use crate::client::ALL_ROWS;
use crate::error::PhoenixError;
use crate::literal::ToTypedValue;
use crate::session::PhoenixSession;

pub struct QueryBuilder<'a> {
    session: &'a PhoenixSession,
    sql: String,
    params: Vec<TypedValue>,
}

impl<'a> QueryBuilder<'a> {
    pub(crate) fn new(session: &'a PhoenixSession, sql: String) -> Self {
        Self {
            session,
            sql,
            params: Vec::new(),
        }
    }

    /// Attach the next positional parameter.
    pub fn bind<T: ToTypedValue>(mut self, value: T) -> Self {
        self.params.push(value.to_typed_value());
        self
    }

    /// Run the query and drain every result row into memory. Use an
    /// explicit [`PreparedStatement`](crate::PreparedStatement) and
    /// [`Cursor`](crate::Cursor) when the result set may be too large to
    /// buffer.
    pub async fn fetch_all(self) -> Result<Vec<Row>, PhoenixError> {
        let statement = self.session.prepare(&self.sql, ALL_ROWS).await?;

        let outcome = async {
            let results = statement.execute(self.params, ALL_ROWS).await?;
            let mut rows = Vec::new();
            for result in results {
                if let Some(mut cursor) = result.into_cursor() {
                    rows.append(&mut cursor.collect_rows().await?);
                }
            }
            Ok(rows)
        }
        .await;

        let closed = statement.close().await;
        match outcome {
            Ok(rows) => {
                closed?;
                Ok(rows)
            }
            Err(error) => Err(error),
        }
    }

    /// Run the statement and return the summed update count of its DML
    /// results.
    pub async fn execute(self) -> Result<u64, PhoenixError> {
        let statement = self.session.prepare(&self.sql, ALL_ROWS).await?;

        let outcome = async {
            let results = statement.execute(self.params, ALL_ROWS).await?;
            Ok(results
                .iter()
                .filter_map(|result| result.update_count())
                .sum())
        }
        .await;

        let closed = statement.close().await;
        match outcome {
            Ok(count) => {
                closed?;
                Ok(count)
            }
            Err(error) => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::avatica;
    use crate::test_utils::{row, scripted_session, select_response, update_response};
    use crate::ToTypedValue;

    #[tokio::test]
    async fn fetch_all_drains_rows_and_closes_the_statement() {
        let (session, transport) = scripted_session().await;

        transport.enqueue_prepare(session.connection_id(), 12);
        transport.enqueue_response(&select_response(
            session.connection_id(),
            12,
            vec![row(vec![1i64.to_typed_value()])],
            true,
        ));
        transport.enqueue_response(&avatica::CloseStatementResponse::default());

        let rows = session
            .query("SELECT count(*) FROM persons WHERE last = ?")
            .bind("d1")
            .fetch_all()
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].column(0).and_then(|v| v.as_i64()), Some(1));
        assert_eq!(
            transport.request_names(),
            vec![
                "OpenConnectionRequest",
                "ConnectionSyncRequest",
                "PrepareRequest",
                "ExecuteRequest",
                "CloseStatementRequest"
            ]
        );
    }

    #[tokio::test]
    async fn execute_reports_the_update_count() {
        let (session, transport) = scripted_session().await;

        transport.enqueue_prepare(session.connection_id(), 12);
        transport.enqueue_response(&update_response(1));
        transport.enqueue_response(&avatica::CloseStatementResponse::default());

        let count = session
            .query("UPSERT INTO persons VALUES (?,?)")
            .bind("d1")
            .bind("x1")
            .execute()
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn failed_execution_still_closes_the_statement() {
        let (session, transport) = scripted_session().await;

        transport.enqueue_prepare(session.connection_id(), 12);
        transport.enqueue_server_error("Syntax error. Encountered \"FRMO\"", 601, "42P00");
        transport.enqueue_response(&avatica::CloseStatementResponse::default());

        let error = session
            .query("SELECT * FRMO persons")
            .fetch_all()
            .await
            .unwrap_err();
        assert!(error.is_server_error());
        assert!(transport
            .request_names()
            .iter()
            .any(|name| name == "CloseStatementRequest"));
    }
}
