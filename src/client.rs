//! Low-level protocol client.
//!
//! [`PhoenixClient`] is the stateless request/response surface: one async
//! method per protocol operation, each encoding a typed request, running
//! exactly one exchange through the [`Transport`], and decoding the typed
//! response. Session and statement state live a layer up in
//! [`PhoenixSession`](crate::PhoenixSession); everything here takes the
//! relevant handles explicitly.

use crate::avatica;
use crate::codec::{decode_response, encode_request, AvaticaRequest};
use crate::error::PhoenixError;
use crate::options::{resolve_endpoint, RequestOptions};
use crate::transport::Transport;

use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// `max_row_count` sentinel: all rows the server will return in one frame.
pub const ALL_ROWS: u64 = u64::MAX;

/// `fetch_max_row_count` sentinel: the remainder of the result set.
pub const FETCH_ALL: u32 = u32::MAX;

/// The minimal protocol client, used internally by
/// [`PhoenixSession`](crate::PhoenixSession).
#[derive(Clone)]
pub struct PhoenixClient {
    transport: Arc<dyn Transport>,
    base_url: Url,
}

impl PhoenixClient {
    pub fn new(transport: Arc<dyn Transport>, base_url: Url) -> Self {
        Self {
            transport,
            base_url,
        }
    }

    /// The resolved base endpoint requests are issued against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn invoke<R: AvaticaRequest>(
        &self,
        request: &R,
        options: &RequestOptions,
    ) -> Result<R::Response, PhoenixError> {
        let url = resolve_endpoint(&self.base_url, options)?;
        debug!(operation = R::NAME, url = %url, "issuing exchange");

        let body = self
            .transport
            .exchange(url, encode_request(request), options)
            .await?;

        match decode_response::<R::Response>(&body) {
            Err(error @ PhoenixError::Server { .. }) => {
                warn!(operation = R::NAME, %error, "server rejected request");
                Err(error)
            }
            other => other,
        }
    }

    /// Open a logical connection under a caller-chosen identifier.
    pub async fn open_connection(
        &self,
        connection_id: &str,
        options: &RequestOptions,
    ) -> Result<avatica::OpenConnectionResponse, PhoenixError> {
        let request = avatica::OpenConnectionRequest {
            connection_id: connection_id.to_string(),
            info: Default::default(),
        };
        self.invoke(&request, options).await
    }

    /// Push dirty connection properties; the response carries the values
    /// the server actually applied.
    pub async fn connection_sync(
        &self,
        connection_id: &str,
        properties: avatica::ConnectionProperties,
        options: &RequestOptions,
    ) -> Result<avatica::ConnectionSyncResponse, PhoenixError> {
        let request = avatica::ConnectionSyncRequest {
            connection_id: connection_id.to_string(),
            conn_props: Some(properties),
        };
        self.invoke(&request, options).await
    }

    pub async fn close_connection(
        &self,
        connection_id: &str,
        options: &RequestOptions,
    ) -> Result<avatica::CloseConnectionResponse, PhoenixError> {
        let request = avatica::CloseConnectionRequest {
            connection_id: connection_id.to_string(),
        };
        self.invoke(&request, options).await
    }

    /// Create an unbound statement for prepare-and-execute use.
    pub async fn create_statement(
        &self,
        connection_id: &str,
        options: &RequestOptions,
    ) -> Result<avatica::CreateStatementResponse, PhoenixError> {
        let request = avatica::CreateStatementRequest {
            connection_id: connection_id.to_string(),
        };
        self.invoke(&request, options).await
    }

    pub async fn close_statement(
        &self,
        connection_id: &str,
        statement_id: u32,
        options: &RequestOptions,
    ) -> Result<avatica::CloseStatementResponse, PhoenixError> {
        let request = avatica::CloseStatementRequest {
            connection_id: connection_id.to_string(),
            statement_id,
        };
        self.invoke(&request, options).await
    }

    /// Compile a parameterized statement for repeated execution.
    pub async fn prepare(
        &self,
        connection_id: &str,
        sql: &str,
        max_row_count: u64,
        options: &RequestOptions,
    ) -> Result<avatica::PrepareResponse, PhoenixError> {
        let request = avatica::PrepareRequest {
            connection_id: connection_id.to_string(),
            sql: sql.to_string(),
            max_row_count,
            max_rows_total: 0,
        };
        self.invoke(&request, options).await
    }

    /// Execute ad hoc SQL on an existing unbound statement in one
    /// exchange. `max_row_count` bounds the first frame only; the server
    /// applies its own page size independently, so callers must not
    /// assume the full result arrives in one frame.
    pub async fn prepare_and_execute(
        &self,
        connection_id: &str,
        sql: &str,
        max_row_count: u64,
        statement_id: u32,
        options: &RequestOptions,
    ) -> Result<avatica::ExecuteResponse, PhoenixError> {
        let request = avatica::PrepareAndExecuteRequest {
            connection_id: connection_id.to_string(),
            sql: sql.to_string(),
            max_row_count,
            statement_id,
            max_rows_total: 0,
            first_frame_max_size: 0,
        };
        self.invoke(&request, options).await
    }

    /// Execute a prepared statement with one ordered set of parameter
    /// values, positionally aligned with its placeholders.
    pub async fn execute(
        &self,
        statement_handle: avatica::StatementHandle,
        parameter_values: Vec<avatica::TypedValue>,
        max_row_count: u64,
        has_parameter_values: bool,
        options: &RequestOptions,
    ) -> Result<avatica::ExecuteResponse, PhoenixError> {
        let request = avatica::ExecuteRequest {
            statement_handle: Some(statement_handle),
            parameter_values,
            deprecated_first_frame_max_size: max_row_count,
            has_parameter_values,
            first_frame_max_size: 0,
        };
        self.invoke(&request, options).await
    }

    /// Pull the next frame of a statement's result set.
    pub async fn fetch(
        &self,
        connection_id: &str,
        statement_id: u32,
        offset: u64,
        fetch_max_row_count: u32,
        options: &RequestOptions,
    ) -> Result<avatica::FetchResponse, PhoenixError> {
        let request = avatica::FetchRequest {
            connection_id: connection_id.to_string(),
            statement_id,
            offset,
            fetch_max_row_count,
            frame_max_size: 0,
        };
        self.invoke(&request, options).await
    }

    pub async fn commit(
        &self,
        connection_id: &str,
        options: &RequestOptions,
    ) -> Result<avatica::CommitResponse, PhoenixError> {
        let request = avatica::CommitRequest {
            connection_id: connection_id.to_string(),
        };
        self.invoke(&request, options).await
    }

    pub async fn rollback(
        &self,
        connection_id: &str,
        options: &RequestOptions,
    ) -> Result<avatica::RollbackResponse, PhoenixError> {
        let request = avatica::RollbackRequest {
            connection_id: connection_id.to_string(),
        };
        self.invoke(&request, options).await
    }

    /// Run several independent SQL strings as one exchange; outcomes come
    /// back one per statement in input order.
    pub async fn prepare_and_execute_batch(
        &self,
        connection_id: &str,
        statement_id: u32,
        sql_commands: Vec<String>,
        options: &RequestOptions,
    ) -> Result<avatica::ExecuteBatchResponse, PhoenixError> {
        let request = avatica::PrepareAndExecuteBatchRequest {
            connection_id: connection_id.to_string(),
            statement_id,
            sql_commands,
        };
        self.invoke(&request, options).await
    }

    /// Run a prepared statement once per parameter set, in input order,
    /// as one exchange.
    pub async fn execute_batch(
        &self,
        connection_id: &str,
        statement_id: u32,
        updates: Vec<avatica::UpdateBatch>,
        options: &RequestOptions,
    ) -> Result<avatica::ExecuteBatchResponse, PhoenixError> {
        let request = avatica::ExecuteBatchRequest {
            connection_id: connection_id.to_string(),
            statement_id,
            updates,
        };
        self.invoke(&request, options).await
    }

    pub async fn catalogs(
        &self,
        connection_id: &str,
        options: &RequestOptions,
    ) -> Result<avatica::ResultSetResponse, PhoenixError> {
        let request = avatica::CatalogsRequest {
            connection_id: connection_id.to_string(),
        };
        self.invoke(&request, options).await
    }

    pub async fn schemas(
        &self,
        connection_id: &str,
        catalog: &str,
        schema_pattern: &str,
        options: &RequestOptions,
    ) -> Result<avatica::ResultSetResponse, PhoenixError> {
        let request = avatica::SchemasRequest {
            catalog: catalog.to_string(),
            schema_pattern: schema_pattern.to_string(),
            connection_id: connection_id.to_string(),
        };
        self.invoke(&request, options).await
    }

    /// List tables matching the given patterns, optionally restricted to
    /// a set of table types (e.g. `SYSTEM TABLE`).
    pub async fn tables(
        &self,
        connection_id: &str,
        catalog: &str,
        schema_pattern: &str,
        table_name_pattern: &str,
        type_list: Option<Vec<String>>,
        options: &RequestOptions,
    ) -> Result<avatica::ResultSetResponse, PhoenixError> {
        let request = avatica::TablesRequest {
            catalog: catalog.to_string(),
            schema_pattern: schema_pattern.to_string(),
            table_name_pattern: table_name_pattern.to_string(),
            has_type_list: type_list.is_some(),
            type_list: type_list.unwrap_or_default(),
            connection_id: connection_id.to_string(),
        };
        self.invoke(&request, options).await
    }

    pub async fn table_types(
        &self,
        connection_id: &str,
        options: &RequestOptions,
    ) -> Result<avatica::ResultSetResponse, PhoenixError> {
        let request = avatica::TableTypesRequest {
            connection_id: connection_id.to_string(),
        };
        self.invoke(&request, options).await
    }
}

impl std::fmt::Debug for PhoenixClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhoenixClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}
