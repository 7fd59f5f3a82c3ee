//! Lazy, pull-based result-set pagination.
//!
//! A [`Cursor`] reconstructs one logical result set from a sequence of
//! bounded frames: the first frame arrives with the execute response, and
//! the cursor issues fetch exchanges for the rest as the caller consumes
//! rows. It holds one outstanding frame at a time, so memory stays
//! bounded for large results, and the produced sequence is finite and
//! non-restartable. Only a frame's `done` flag terminates it; row counts
//! never do.

use crate::avatica::{ColumnMetaData, Frame, Row, Signature};
use crate::client::FETCH_ALL;
use crate::error::PhoenixError;
use crate::session::SessionInner;

use std::collections::VecDeque;
use std::sync::Arc;

pub struct Cursor {
    session: Arc<SessionInner>,
    statement_id: u32,
    signature: Option<Signature>,
    buffered: VecDeque<Row>,
    /// Rows handed out so far; doubles as the next fetch offset. The
    /// server tracks its own cursor position by statement id, but the
    /// offset sent must stay monotonically consistent to avoid skipped or
    /// duplicated rows.
    consumed: u64,
    done: bool,
    fetch_size: u32,
    owns_statement: bool,
}

impl Cursor {
    pub(crate) fn new(
        session: Arc<SessionInner>,
        statement_id: u32,
        signature: Option<Signature>,
        first_frame: Option<Frame>,
    ) -> Self {
        Self::build(session, statement_id, signature, first_frame, false)
    }

    /// A cursor over a server-created statement (metadata queries); this
    /// cursor is responsible for closing the statement.
    pub(crate) fn owning(
        session: Arc<SessionInner>,
        statement_id: u32,
        signature: Option<Signature>,
        first_frame: Option<Frame>,
    ) -> Self {
        Self::build(session, statement_id, signature, first_frame, true)
    }

    fn build(
        session: Arc<SessionInner>,
        statement_id: u32,
        signature: Option<Signature>,
        first_frame: Option<Frame>,
        owns_statement: bool,
    ) -> Self {
        let mut cursor = Self {
            session,
            statement_id,
            signature,
            buffered: VecDeque::new(),
            consumed: 0,
            done: false,
            fetch_size: FETCH_ALL,
            owns_statement,
        };
        if let Some(frame) = first_frame {
            cursor.done = frame.done;
            cursor.buffered.extend(frame.rows);
        }
        cursor
    }

    pub fn statement_id(&self) -> u32 {
        self.statement_id
    }

    /// Column metadata from the statement signature, when the server sent
    /// one.
    pub fn columns(&self) -> &[ColumnMetaData] {
        self.signature
            .as_ref()
            .map(|signature| signature.columns.as_slice())
            .unwrap_or_default()
    }

    /// Rows handed out so far.
    pub fn position(&self) -> u64 {
        self.consumed
    }

    /// Bound the row count requested per fetch exchange. Defaults to the
    /// whole remainder; the server applies its own frame size regardless.
    pub fn set_fetch_size(&mut self, fetch_size: u32) {
        self.fetch_size = fetch_size;
    }

    /// The next row of the logical result set, fetching further frames as
    /// needed. `Ok(None)` means the set is exhausted; the cursor cannot
    /// be restarted.
    pub async fn next_row(&mut self) -> Result<Option<Row>, PhoenixError> {
        loop {
            if let Some(row) = self.buffered.pop_front() {
                self.consumed += 1;
                return Ok(Some(row));
            }
            if self.done {
                return Ok(None);
            }

            self.session.ensure_statement(self.statement_id)?;
            let response = self
                .session
                .client
                .fetch(
                    &self.session.connection_id,
                    self.statement_id,
                    self.consumed,
                    self.fetch_size,
                    &self.session.options,
                )
                .await?;
            if response.missing_statement || response.missing_results {
                return Err(PhoenixError::Sequence(format!(
                    "server lost the cursor for statement {}; the result set must be re-executed",
                    self.statement_id
                )));
            }
            let frame = response.frame.ok_or_else(|| {
                PhoenixError::Protocol("fetch response carried no frame".to_string())
            })?;

            self.done = frame.done;
            self.buffered.extend(frame.rows);
            // A zero-row frame that is not done only means the next page
            // was not materialized yet; fetch again.
        }
    }

    /// Drain the remaining rows into memory.
    pub async fn collect_rows(&mut self) -> Result<Vec<Row>, PhoenixError> {
        let mut rows = Vec::new();
        while let Some(row) = self.next_row().await? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Release the backing statement when this cursor owns it (metadata
    /// queries); otherwise the statement object is responsible and this
    /// is a no-op.
    pub async fn close(self) -> Result<(), PhoenixError> {
        if !self.owns_statement || !self.session.forget_statement(self.statement_id) {
            return Ok(());
        }
        self.session
            .client
            .close_statement(
                &self.session.connection_id,
                self.statement_id,
                &self.session.options,
            )
            .await?;
        Ok(())
    }
}

impl std::fmt::Debug for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("statement_id", &self.statement_id)
            .field("consumed", &self.consumed)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use crate::avatica;
    use crate::test_utils::{
        fetch_response, result_set_response, scripted_session, select_response, string_row,
    };
    use prost::Message;

    #[tokio::test]
    async fn pagination_returns_all_rows_in_order_until_done() {
        let (session, transport) = scripted_session().await;
        transport.enqueue_create_statement(session.connection_id(), 3);
        let statement = session.create_statement().await.unwrap();

        let first = vec![string_row(&["d0"]), string_row(&["d1"])];
        transport.enqueue_response(&select_response(
            session.connection_id(),
            3,
            first,
            false,
        ));
        transport.enqueue_response(&fetch_response(2, vec![string_row(&["d2"])], false));
        // Slow-materializing page: zero rows but not done yet.
        transport.enqueue_response(&fetch_response(3, vec![], false));
        transport.enqueue_response(&fetch_response(3, vec![string_row(&["d3"])], true));

        let results = statement
            .execute_sql("SELECT name FROM persons", 2)
            .await
            .unwrap();
        let mut cursor = results.into_iter().next().unwrap().into_cursor().unwrap();
        let rows = cursor.collect_rows().await.unwrap();

        let names: Vec<_> = rows
            .iter()
            .map(|row| row.column(0).and_then(|v| v.as_str()).unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["d0", "d1", "d2", "d3"]);
        assert_eq!(cursor.position(), 4);

        // Exhausted cursors stay exhausted without further exchanges.
        let calls = transport.request_names().len();
        assert!(cursor.next_row().await.unwrap().is_none());
        assert_eq!(transport.request_names().len(), calls);
    }

    #[tokio::test]
    async fn fetch_offsets_advance_by_rows_consumed() {
        let (session, transport) = scripted_session().await;
        transport.enqueue_create_statement(session.connection_id(), 3);
        let statement = session.create_statement().await.unwrap();

        transport.enqueue_response(&select_response(
            session.connection_id(),
            3,
            vec![string_row(&["d0"]), string_row(&["d1"])],
            false,
        ));
        transport.enqueue_response(&fetch_response(2, vec![string_row(&["d2"])], false));
        transport.enqueue_response(&fetch_response(3, vec![], false));
        transport.enqueue_response(&fetch_response(3, vec![string_row(&["d3"])], true));

        let results = statement.execute_sql("SELECT name FROM persons", 2).await.unwrap();
        let mut cursor = results.into_iter().next().unwrap().into_cursor().unwrap();
        cursor.collect_rows().await.unwrap();

        let offsets: Vec<u64> = transport
            .requests()
            .into_iter()
            .filter(|envelope| envelope.name.ends_with("FetchRequest"))
            .map(|envelope| {
                avatica::FetchRequest::decode(envelope.wrapped_message.as_slice())
                    .unwrap()
                    .offset
            })
            .collect();
        assert_eq!(offsets, vec![2, 3, 3]);
    }

    #[tokio::test]
    async fn empty_result_set_without_first_frame_fetches_once() {
        let (session, transport) = scripted_session().await;
        transport.enqueue_create_statement(session.connection_id(), 3);
        let statement = session.create_statement().await.unwrap();

        // No first frame at all: the cursor must go to the wire before
        // concluding anything.
        transport.enqueue_response(&avatica::ExecuteResponse {
            results: vec![avatica::ResultSetResponse {
                connection_id: session.connection_id().to_string(),
                statement_id: 3,
                update_count: u64::MAX,
                ..Default::default()
            }],
            missing_statement: false,
            metadata: None,
        });
        transport.enqueue_response(&fetch_response(0, vec![], true));

        let results = statement.execute_sql("SELECT name FROM persons", 2).await.unwrap();
        let mut cursor = results.into_iter().next().unwrap().into_cursor().unwrap();
        assert!(cursor.next_row().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn lost_server_cursor_is_a_sequencing_fault() {
        let (session, transport) = scripted_session().await;
        transport.enqueue_create_statement(session.connection_id(), 3);
        let statement = session.create_statement().await.unwrap();

        transport.enqueue_response(&select_response(
            session.connection_id(),
            3,
            vec![string_row(&["d0"])],
            false,
        ));
        transport.enqueue_response(&avatica::FetchResponse {
            frame: None,
            missing_statement: true,
            missing_results: true,
            metadata: None,
        });

        let results = statement.execute_sql("SELECT name FROM persons", 1).await.unwrap();
        let mut cursor = results.into_iter().next().unwrap().into_cursor().unwrap();

        assert!(cursor.next_row().await.unwrap().is_some());
        let error = cursor.next_row().await.unwrap_err();
        assert!(error.is_sequence_error());
    }

    #[tokio::test]
    async fn metadata_cursor_closes_its_own_statement() {
        let (session, transport) = scripted_session().await;

        transport.enqueue_response(&result_set_response(
            session.connection_id(),
            41,
            vec![string_row(&["TABLE"]), string_row(&["SYSTEM TABLE"])],
            true,
        ));
        let mut cursor = session.table_types().await.unwrap();
        let rows = cursor.collect_rows().await.unwrap();
        assert_eq!(rows.len(), 2);

        transport.enqueue_response(&avatica::CloseStatementResponse::default());
        cursor.close().await.unwrap();
        assert!(transport
            .request_names()
            .iter()
            .any(|name| name == "CloseStatementRequest"));
    }
}
