//! Statement lifecycle and execution.
//!
//! Two flavors of statement exist: [`Statement`] is unbound and executes
//! ad hoc SQL through prepare-and-execute in one exchange;
//! [`PreparedStatement`] wraps a server-compiled statement handle and is
//! reusable across many executions with different parameter sets. Both
//! are scoped to the session that created them; once closed (explicitly
//! or because the owning connection closed) any further use is a
//! sequencing error, distinct from a server-side SQL error.

use crate::avatica::{AvaticaParameter, ExecuteResponse, StatementHandle, TypedValue, UpdateBatch};
use crate::batch::{demux_update_counts, BatchOutcome};
use crate::cursor::Cursor;
use crate::error::PhoenixError;
use crate::session::SessionInner;

use std::sync::Arc;

/// `update_count` value marking a result-set (non-DML) result.
pub(crate) const RESULT_SET_SENTINEL: u64 = u64::MAX;

/// One outcome of an execute or prepare-and-execute exchange: an update
/// count for DML, or a cursor over a result set. A single exchange may
/// produce several, in statement order.
pub enum StatementResult {
    Update(u64),
    ResultSet(Cursor),
}

impl StatementResult {
    pub fn update_count(&self) -> Option<u64> {
        match self {
            StatementResult::Update(count) => Some(*count),
            StatementResult::ResultSet(_) => None,
        }
    }

    pub fn into_cursor(self) -> Option<Cursor> {
        match self {
            StatementResult::Update(_) => None,
            StatementResult::ResultSet(cursor) => Some(cursor),
        }
    }
}

impl std::fmt::Debug for StatementResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatementResult::Update(count) => f.debug_tuple("Update").field(count).finish(),
            StatementResult::ResultSet(_) => f.write_str("ResultSet(..)"),
        }
    }
}

pub(crate) fn results_from(
    session: Arc<SessionInner>,
    response: ExecuteResponse,
) -> Result<Vec<StatementResult>, PhoenixError> {
    if response.missing_statement {
        return Err(PhoenixError::Sequence(
            "server no longer recognizes the statement handle".to_string(),
        ));
    }

    Ok(response
        .results
        .into_iter()
        .map(|result| {
            if result.update_count == RESULT_SET_SENTINEL {
                StatementResult::ResultSet(Cursor::new(
                    session.clone(),
                    result.statement_id,
                    result.signature,
                    result.first_frame,
                ))
            } else {
                StatementResult::Update(result.update_count)
            }
        })
        .collect())
}

/// An unbound statement for ad hoc SQL.
pub struct Statement {
    session: Arc<SessionInner>,
    id: u32,
}

impl std::fmt::Debug for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Statement").field("id", &self.id).finish()
    }
}

impl Statement {
    pub(crate) fn new(session: Arc<SessionInner>, id: u32) -> Self {
        Self { session, id }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Compile and run one SQL string in a single exchange. `max_rows`
    /// bounds the first frame of a result set; completion is signaled
    /// only by the frame's `done` flag, never by row counts.
    pub async fn execute_sql(
        &self,
        sql: &str,
        max_rows: u64,
    ) -> Result<Vec<StatementResult>, PhoenixError> {
        self.session.ensure_statement(self.id)?;

        let response = self
            .session
            .client
            .prepare_and_execute(
                &self.session.connection_id,
                sql,
                max_rows,
                self.id,
                &self.session.options,
            )
            .await?;
        results_from(self.session.clone(), response)
    }

    /// Run several independent SQL strings as one exchange. Outcomes come
    /// back in input order; the batch is not transactionally atomic, and
    /// whether earlier successful items are already durable depends on
    /// the session's auto-commit mode, not on this call.
    pub async fn execute_sql_batch(
        &self,
        commands: Vec<String>,
    ) -> Result<Vec<BatchOutcome>, PhoenixError> {
        self.session.ensure_statement(self.id)?;

        let response = self
            .session
            .client
            .prepare_and_execute_batch(
                &self.session.connection_id,
                self.id,
                commands,
                &self.session.options,
            )
            .await?;
        if response.missing_statement {
            return Err(PhoenixError::Sequence(
                "server no longer recognizes the statement handle".to_string(),
            ));
        }
        Ok(demux_update_counts(&response.update_counts))
    }

    /// Release the server-side handle. Closing twice, or after the owning
    /// connection closed, reports success so teardown paths stay simple.
    pub async fn close(&self) -> Result<(), PhoenixError> {
        if !self.session.forget_statement(self.id) {
            return Ok(());
        }
        self.session
            .client
            .close_statement(&self.session.connection_id, self.id, &self.session.options)
            .await?;
        Ok(())
    }
}

/// A server-compiled parameterized statement.
pub struct PreparedStatement {
    session: Arc<SessionInner>,
    handle: StatementHandle,
}

impl PreparedStatement {
    pub(crate) fn new(session: Arc<SessionInner>, handle: StatementHandle) -> Self {
        Self { session, handle }
    }

    pub fn id(&self) -> u32 {
        self.handle.id
    }

    pub fn handle(&self) -> &StatementHandle {
        &self.handle
    }

    /// Parameter slots the server compiled for this statement, in
    /// placeholder order.
    pub fn parameters(&self) -> &[AvaticaParameter] {
        self.handle
            .signature
            .as_ref()
            .map(|signature| signature.parameters.as_slice())
            .unwrap_or_default()
    }

    /// Run with one ordered set of parameter values, positionally aligned
    /// with the SQL placeholders.
    pub async fn execute(
        &self,
        parameters: Vec<TypedValue>,
        max_rows: u64,
    ) -> Result<Vec<StatementResult>, PhoenixError> {
        self.session.ensure_statement(self.handle.id)?;

        let has_parameter_values = !parameters.is_empty();
        let response = self
            .session
            .client
            .execute(
                self.handle.clone(),
                parameters,
                max_rows,
                has_parameter_values,
                &self.session.options,
            )
            .await?;
        results_from(self.session.clone(), response)
    }

    /// Run once per parameter set, in input order, as one exchange.
    pub async fn execute_batch(
        &self,
        parameter_sets: Vec<Vec<TypedValue>>,
    ) -> Result<Vec<BatchOutcome>, PhoenixError> {
        self.session.ensure_statement(self.handle.id)?;

        let updates = parameter_sets
            .into_iter()
            .map(|parameter_values| UpdateBatch { parameter_values })
            .collect();
        let response = self
            .session
            .client
            .execute_batch(
                &self.session.connection_id,
                self.handle.id,
                updates,
                &self.session.options,
            )
            .await?;
        if response.missing_statement {
            return Err(PhoenixError::Sequence(
                "server no longer recognizes the statement handle".to_string(),
            ));
        }
        Ok(demux_update_counts(&response.update_counts))
    }

    /// Release the server-side handle; idempotent like [`Statement::close`].
    pub async fn close(&self) -> Result<(), PhoenixError> {
        if !self.session.forget_statement(self.handle.id) {
            return Ok(());
        }
        self.session
            .client
            .close_statement(&self.session.connection_id, self.handle.id, &self.session.options)
            .await?;
        Ok(())
    }
}
