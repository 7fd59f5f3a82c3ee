//! High-level session interface.
//!
//! This module provides [`PhoenixSession`] — the main entry point for
//! driving a Phoenix Query Server connection. A session owns the mapping
//! from its client-chosen connection identifier to the server-acknowledged
//! connection state, enforces the legal operation sequence, and hands out
//! statement handles scoped to itself. Low-level protocol work is
//! delegated to [`PhoenixClient`](crate::PhoenixClient).
//!
//! # Typical usage
//!
//! ```no_run
//! use phoenix_connect::PhoenixSessionBuilder;
//!
//! # tokio_test::block_on(async {
//! let session = PhoenixSessionBuilder::new("http://localhost:8765")
//!     .build()
//!     .await
//!     .expect("failed to connect");
//!
//! println!("Connected, connection id {}", session.connection_id());
//! # });
//! ```

use crate::avatica::{ConnectionProperties, ResultSetResponse};
use crate::client::PhoenixClient;
use crate::cursor::Cursor;
use crate::error::PhoenixError;
use crate::options::{parse_base_url, RequestOptions};
use crate::query::QueryBuilder;
use crate::statement::{PreparedStatement, Statement};
use crate::transport::{Credentials, HttpTransport, Transport};

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;
use uuid::Uuid;

/// Builder for creating remote Phoenix sessions.
///
/// `build()` performs the open and property-sync exchanges eagerly, so a
/// successfully built session is always ready for statement work.
pub struct PhoenixSessionBuilder {
    url: String,
    credentials: Option<Credentials>,
    properties: ConnectionProperties,
    options: RequestOptions,
    transport: Option<Arc<dyn Transport>>,
}

impl PhoenixSessionBuilder {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            credentials: None,
            properties: default_properties(),
            options: RequestOptions::default(),
            transport: None,
        }
    }

    /// HTTP Basic material for gateway-fronted clusters.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn auto_commit(mut self, auto_commit: bool) -> Self {
        self.properties.auto_commit = auto_commit;
        self.properties.has_auto_commit = true;
        self
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.properties.read_only = read_only;
        self.properties.has_read_only = true;
        self
    }

    pub fn transaction_isolation(mut self, level: u32) -> Self {
        self.properties.transaction_isolation = level;
        self
    }

    pub fn catalog(mut self, catalog: impl Into<String>) -> Self {
        self.properties.catalog = catalog.into();
        self
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.properties.schema = schema.into();
        self
    }

    /// Default per-call options for every exchange this session issues,
    /// including gateway routing via an alternative endpoint segment.
    pub fn options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    /// Substitute the transport the session exchanges through. Mostly
    /// useful for tests and for callers that manage their own
    /// authentication layer.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Connects to the query server and returns a synced [`PhoenixSession`].
    pub async fn build(self) -> Result<PhoenixSession, PhoenixError> {
        let base_url = parse_base_url(&self.url)?;
        let transport: Arc<dyn Transport> = match (self.transport, self.credentials) {
            (Some(transport), _) => transport,
            (None, Some(credentials)) => Arc::new(HttpTransport::with_credentials(credentials)),
            (None, None) => Arc::new(HttpTransport::new()),
        };
        let client = PhoenixClient::new(transport, base_url);

        let connection_id = Uuid::new_v4().simple().to_string();
        client.open_connection(&connection_id, &self.options).await?;

        let mut properties = self.properties;
        properties.is_dirty = true;
        let effective = match client
            .connection_sync(&connection_id, properties.clone(), &self.options)
            .await
        {
            Ok(response) => response.conn_props.unwrap_or(properties),
            Err(error) => {
                // The connection is open server-side; do not leak it just
                // because the property push failed.
                let _ = client.close_connection(&connection_id, &self.options).await;
                return Err(error);
            }
        };

        debug!(connection_id = %connection_id, "session opened and synced");
        Ok(PhoenixSession {
            inner: Arc::new(SessionInner {
                client,
                connection_id,
                options: self.options,
                state: Mutex::new(SessionState {
                    closed: false,
                    properties: effective,
                    statements: HashSet::new(),
                }),
            }),
        })
    }
}

fn default_properties() -> ConnectionProperties {
    ConnectionProperties {
        is_dirty: true,
        auto_commit: true,
        has_auto_commit: true,
        read_only: false,
        has_read_only: true,
        transaction_isolation: 0,
        catalog: String::new(),
        schema: String::new(),
    }
}

struct SessionState {
    closed: bool,
    properties: ConnectionProperties,
    statements: HashSet<u32>,
}

pub(crate) struct SessionInner {
    pub(crate) client: PhoenixClient,
    pub(crate) connection_id: String,
    pub(crate) options: RequestOptions,
    state: Mutex<SessionState>,
}

impl SessionInner {
    fn guard(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn ensure_open(&self) -> Result<(), PhoenixError> {
        if self.guard().closed {
            return Err(PhoenixError::Sequence(format!(
                "connection {} is closed",
                self.connection_id
            )));
        }
        Ok(())
    }

    /// A statement operation needs both an open connection and a live
    /// statement handle; anything else is a sequencing violation, never a
    /// transport fault.
    pub(crate) fn ensure_statement(&self, statement_id: u32) -> Result<(), PhoenixError> {
        let guard = self.guard();
        if guard.closed {
            return Err(PhoenixError::Sequence(format!(
                "connection {} is closed",
                self.connection_id
            )));
        }
        if !guard.statements.contains(&statement_id) {
            return Err(PhoenixError::Sequence(format!(
                "statement {} is closed or was never opened on connection {}",
                statement_id, self.connection_id
            )));
        }
        Ok(())
    }

    pub(crate) fn register_statement(&self, statement_id: u32) {
        self.guard().statements.insert(statement_id);
    }

    /// Returns whether the handle was still live; a second close is not
    /// an error.
    pub(crate) fn forget_statement(&self, statement_id: u32) -> bool {
        self.guard().statements.remove(&statement_id)
    }
}

/// Represents an active connection to a Phoenix Query Server.
///
/// Cloning is cheap and clones share the same connection state; distinct
/// handles are safe to use concurrently, but operations against a single
/// statement handle must be serialized by the caller if ordering matters.
#[derive(Clone)]
pub struct PhoenixSession {
    inner: Arc<SessionInner>,
}

impl PhoenixSession {
    /// The client-chosen connection identifier the server knows this
    /// session by.
    pub fn connection_id(&self) -> &str {
        &self.inner.connection_id
    }

    /// The properties the server acknowledged at the last sync. Servers
    /// may clamp or ignore requested values, so this is the authority.
    pub fn properties(&self) -> ConnectionProperties {
        self.inner.guard().properties.clone()
    }

    /// Return a clone of the underlying protocol client.
    pub fn client(&self) -> PhoenixClient {
        self.inner.client.clone()
    }

    /// Push updated session properties; returns what the server applied.
    pub async fn sync(
        &self,
        mut properties: ConnectionProperties,
    ) -> Result<ConnectionProperties, PhoenixError> {
        self.inner.ensure_open()?;
        properties.is_dirty = true;

        let response = self
            .inner
            .client
            .connection_sync(&self.inner.connection_id, properties.clone(), &self.inner.options)
            .await?;

        let effective = response.conn_props.unwrap_or(properties);
        self.inner.guard().properties = effective.clone();
        Ok(effective)
    }

    /// Create an unbound statement for ad hoc execution.
    pub async fn create_statement(&self) -> Result<Statement, PhoenixError> {
        self.inner.ensure_open()?;

        let response = self
            .inner
            .client
            .create_statement(&self.inner.connection_id, &self.inner.options)
            .await?;
        if response.connection_id != self.inner.connection_id {
            return Err(PhoenixError::Protocol(format!(
                "statement created for connection {} but {} was requested",
                response.connection_id, self.inner.connection_id
            )));
        }

        self.inner.register_statement(response.statement_id);
        Ok(Statement::new(self.inner.clone(), response.statement_id))
    }

    /// Compile a parameterized statement, reusable across executions with
    /// different parameter sets.
    pub async fn prepare(
        &self,
        sql: &str,
        max_rows: u64,
    ) -> Result<PreparedStatement, PhoenixError> {
        self.inner.ensure_open()?;

        let response = self
            .inner
            .client
            .prepare(&self.inner.connection_id, sql, max_rows, &self.inner.options)
            .await?;
        let handle = response.statement.ok_or_else(|| {
            PhoenixError::Protocol("prepare response carried no statement handle".to_string())
        })?;

        self.inner.register_statement(handle.id);
        Ok(PreparedStatement::new(self.inner.clone(), handle))
    }

    /// Start a fluent parameterized query against this session.
    pub fn query(&self, sql: impl Into<String>) -> QueryBuilder<'_> {
        QueryBuilder::new(self, sql.into())
    }

    /// Make writes since the last commit/rollback durable. Valid on any
    /// open session; under auto-commit it simply acknowledges.
    pub async fn commit(&self) -> Result<(), PhoenixError> {
        self.inner.ensure_open()?;
        self.inner
            .client
            .commit(&self.inner.connection_id, &self.inner.options)
            .await?;
        Ok(())
    }

    /// Discard all uncommitted writes issued on this connection.
    pub async fn rollback(&self) -> Result<(), PhoenixError> {
        self.inner.ensure_open()?;
        self.inner
            .client
            .rollback(&self.inner.connection_id, &self.inner.options)
            .await?;
        Ok(())
    }

    /// List catalogs visible to this connection.
    pub async fn catalogs(&self) -> Result<Cursor, PhoenixError> {
        self.inner.ensure_open()?;
        let response = self
            .inner
            .client
            .catalogs(&self.inner.connection_id, &self.inner.options)
            .await?;
        self.wrap_metadata(response)
    }

    /// List schemas matching the given patterns.
    pub async fn schemas(&self, catalog: &str, schema_pattern: &str) -> Result<Cursor, PhoenixError> {
        self.inner.ensure_open()?;
        let response = self
            .inner
            .client
            .schemas(&self.inner.connection_id, catalog, schema_pattern, &self.inner.options)
            .await?;
        self.wrap_metadata(response)
    }

    /// List tables matching the given patterns, optionally restricted to
    /// a set of table types.
    pub async fn tables(
        &self,
        catalog: &str,
        schema_pattern: &str,
        table_name_pattern: &str,
        type_list: Option<Vec<String>>,
    ) -> Result<Cursor, PhoenixError> {
        self.inner.ensure_open()?;
        let response = self
            .inner
            .client
            .tables(
                &self.inner.connection_id,
                catalog,
                schema_pattern,
                table_name_pattern,
                type_list,
                &self.inner.options,
            )
            .await?;
        self.wrap_metadata(response)
    }

    /// List the table types the server distinguishes.
    pub async fn table_types(&self) -> Result<Cursor, PhoenixError> {
        self.inner.ensure_open()?;
        let response = self
            .inner
            .client
            .table_types(&self.inner.connection_id, &self.inner.options)
            .await?;
        self.wrap_metadata(response)
    }

    /// Metadata results ride on a server-created statement; register it so
    /// fetches sequence correctly, and let the cursor close it.
    fn wrap_metadata(&self, response: ResultSetResponse) -> Result<Cursor, PhoenixError> {
        self.inner.register_statement(response.statement_id);
        Ok(Cursor::owning(
            self.inner.clone(),
            response.statement_id,
            response.signature,
            response.first_frame,
        ))
    }

    /// Close the connection, invalidating every statement created under
    /// it. Closing an already-closed session reports success so teardown
    /// paths can close unconditionally.
    pub async fn close(&self) -> Result<(), PhoenixError> {
        {
            let mut guard = self.inner.guard();
            if guard.closed {
                return Ok(());
            }
            guard.closed = true;
            guard.statements.clear();
        }

        self.inner
            .client
            .close_connection(&self.inner.connection_id, &self.inner.options)
            .await?;
        debug!(connection_id = %self.inner.connection_id, "session closed");
        Ok(())
    }
}

impl std::fmt::Debug for PhoenixSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhoenixSession")
            .field("connection_id", &self.inner.connection_id)
            .finish_non_exhaustive()
    }
}
