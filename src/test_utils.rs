//! Test fixtures: a scripted transport and canned wire responses.
//!
//! The mock sits behind the same [`Transport`] seam production uses, so
//! every state-machine and pagination test runs the real codec and the
//! real protocol client against pre-recorded exchanges.

use crate::avatica::{self, WireMessage};
use crate::codec::{encode_response, AvaticaResponse};
use crate::error::PhoenixError;
use crate::options::RequestOptions;
use crate::session::{PhoenixSession, PhoenixSessionBuilder};
use crate::transport::Transport;

use async_trait::async_trait;
use bytes::Bytes;
use prost::Message;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use url::Url;

/// [`Transport`] that replays a scripted response per exchange and
/// records every request envelope it saw.
pub(crate) struct MockTransport {
    script: Mutex<VecDeque<Bytes>>,
    seen: Mutex<Vec<WireMessage>>,
}

impl MockTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(VecDeque::new()),
            seen: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn enqueue_response<R: AvaticaResponse>(&self, response: &R) {
        self.script
            .lock()
            .unwrap()
            .push_back(Bytes::from(encode_response(response)));
    }

    pub(crate) fn enqueue_server_error(&self, message: &str, error_code: u32, sql_state: &str) {
        self.enqueue_response(&avatica::ErrorResponse {
            error_message: message.to_string(),
            error_code,
            sql_state: sql_state.to_string(),
            severity: avatica::Severity::ErrorSeverity as i32,
            ..Default::default()
        });
    }

    pub(crate) fn enqueue_create_statement(&self, connection_id: &str, statement_id: u32) {
        self.enqueue_response(&avatica::CreateStatementResponse {
            connection_id: connection_id.to_string(),
            statement_id,
            metadata: None,
        });
    }

    pub(crate) fn enqueue_prepare(&self, connection_id: &str, statement_id: u32) {
        self.enqueue_response(&avatica::PrepareResponse {
            statement: Some(avatica::StatementHandle {
                connection_id: connection_id.to_string(),
                id: statement_id,
                signature: Some(avatica::Signature::default()),
            }),
            metadata: None,
        });
    }

    /// Every request envelope sent so far, in order.
    pub(crate) fn requests(&self) -> Vec<WireMessage> {
        self.seen.lock().unwrap().clone()
    }

    pub(crate) fn last_request(&self) -> WireMessage {
        self.seen
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }

    /// Simple class names of every request sent, in order.
    pub(crate) fn request_names(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|envelope| {
                envelope
                    .name
                    .rsplit('$')
                    .next()
                    .unwrap_or_default()
                    .to_string()
            })
            .collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn exchange(
        &self,
        _url: Url,
        body: Vec<u8>,
        _options: &RequestOptions,
    ) -> Result<Bytes, PhoenixError> {
        let envelope = WireMessage::decode(body.as_slice())?;
        self.seen.lock().unwrap().push(envelope);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| {
                PhoenixError::Protocol("scripted transport ran out of responses".to_string())
            })
    }
}

/// A session built against a scripted transport, with the open and sync
/// exchanges already replayed.
pub(crate) async fn scripted_session() -> (PhoenixSession, Arc<MockTransport>) {
    let transport = MockTransport::new();
    transport.enqueue_response(&avatica::OpenConnectionResponse::default());
    transport.enqueue_response(&avatica::ConnectionSyncResponse::default());

    let session = PhoenixSessionBuilder::new("http://pqs.local:8765")
        .transport(transport.clone())
        .build()
        .await
        .expect("scripted open/sync failed");
    (session, transport)
}

pub(crate) fn row(values: Vec<avatica::TypedValue>) -> avatica::Row {
    avatica::Row {
        value: values
            .into_iter()
            .map(|scalar| avatica::ColumnValue {
                scalar_value: Some(scalar),
                ..Default::default()
            })
            .collect(),
    }
}

pub(crate) fn string_row(values: &[&str]) -> avatica::Row {
    use crate::literal::ToTypedValue;
    row(values.iter().map(|v| v.to_typed_value()).collect())
}

pub(crate) fn frame(offset: u64, rows: Vec<avatica::Row>, done: bool) -> avatica::Frame {
    avatica::Frame { offset, done, rows }
}

pub(crate) fn fetch_response(
    offset: u64,
    rows: Vec<avatica::Row>,
    done: bool,
) -> avatica::FetchResponse {
    avatica::FetchResponse {
        frame: Some(frame(offset, rows, done)),
        missing_statement: false,
        missing_results: false,
        metadata: None,
    }
}

/// A standalone result set, as metadata operations answer with.
pub(crate) fn result_set_response(
    connection_id: &str,
    statement_id: u32,
    rows: Vec<avatica::Row>,
    done: bool,
) -> avatica::ResultSetResponse {
    avatica::ResultSetResponse {
        connection_id: connection_id.to_string(),
        statement_id,
        own_statement: true,
        signature: Some(avatica::Signature::default()),
        first_frame: Some(frame(0, rows, done)),
        update_count: u64::MAX,
        metadata: None,
    }
}

/// An execute response carrying one result set.
pub(crate) fn select_response(
    connection_id: &str,
    statement_id: u32,
    rows: Vec<avatica::Row>,
    done: bool,
) -> avatica::ExecuteResponse {
    avatica::ExecuteResponse {
        results: vec![result_set_response(connection_id, statement_id, rows, done)],
        missing_statement: false,
        metadata: None,
    }
}

/// An execute response carrying one DML update count.
pub(crate) fn update_response(update_count: u64) -> avatica::ExecuteResponse {
    avatica::ExecuteResponse {
        results: vec![avatica::ResultSetResponse {
            update_count,
            ..Default::default()
        }],
        missing_statement: false,
        metadata: None,
    }
}
