//! Envelope codec for the Avatica wire contract.
//!
//! Every exchange carries a [`WireMessage`] whose `name` field tags the
//! wrapped payload with its fully qualified class. Encoding wraps a typed
//! request; decoding unwraps the envelope, short-circuits
//! `ErrorResponse` payloads into [`PhoenixError::Server`], and treats any
//! other name mismatch as a protocol fault, distinct from transport
//! failures.

use crate::avatica::*;
use crate::error::PhoenixError;
use prost::Message;

const REQUEST_PREFIX: &str = "org.apache.calcite.avatica.proto.Requests$";
const RESPONSE_PREFIX: &str = "org.apache.calcite.avatica.proto.Responses$";

/// A request message together with its class tag and expected response.
pub(crate) trait AvaticaRequest: Message + Sized {
    const NAME: &'static str;
    type Response: AvaticaResponse;
}

/// A response message together with its class tag.
pub(crate) trait AvaticaResponse: Message + Default {
    const NAME: &'static str;
}

macro_rules! wire_request {
    ($req:ty, $name:literal => $resp:ty) => {
        impl AvaticaRequest for $req {
            const NAME: &'static str = $name;
            type Response = $resp;
        }
    };
}

macro_rules! wire_response {
    ($resp:ty, $name:literal) => {
        impl AvaticaResponse for $resp {
            const NAME: &'static str = $name;
        }
    };
}

wire_request!(OpenConnectionRequest, "OpenConnectionRequest" => OpenConnectionResponse);
wire_request!(ConnectionSyncRequest, "ConnectionSyncRequest" => ConnectionSyncResponse);
wire_request!(CloseConnectionRequest, "CloseConnectionRequest" => CloseConnectionResponse);
wire_request!(CreateStatementRequest, "CreateStatementRequest" => CreateStatementResponse);
wire_request!(CloseStatementRequest, "CloseStatementRequest" => CloseStatementResponse);
wire_request!(PrepareRequest, "PrepareRequest" => PrepareResponse);
wire_request!(PrepareAndExecuteRequest, "PrepareAndExecuteRequest" => ExecuteResponse);
wire_request!(ExecuteRequest, "ExecuteRequest" => ExecuteResponse);
wire_request!(FetchRequest, "FetchRequest" => FetchResponse);
wire_request!(CommitRequest, "CommitRequest" => CommitResponse);
wire_request!(RollbackRequest, "RollbackRequest" => RollbackResponse);
wire_request!(PrepareAndExecuteBatchRequest, "PrepareAndExecuteBatchRequest" => ExecuteBatchResponse);
wire_request!(ExecuteBatchRequest, "ExecuteBatchRequest" => ExecuteBatchResponse);
wire_request!(CatalogsRequest, "CatalogsRequest" => ResultSetResponse);
wire_request!(SchemasRequest, "SchemasRequest" => ResultSetResponse);
wire_request!(TablesRequest, "TablesRequest" => ResultSetResponse);
wire_request!(TableTypesRequest, "TableTypesRequest" => ResultSetResponse);

wire_response!(OpenConnectionResponse, "OpenConnectionResponse");
wire_response!(ConnectionSyncResponse, "ConnectionSyncResponse");
wire_response!(CloseConnectionResponse, "CloseConnectionResponse");
wire_response!(CreateStatementResponse, "CreateStatementResponse");
wire_response!(CloseStatementResponse, "CloseStatementResponse");
wire_response!(PrepareResponse, "PrepareResponse");
wire_response!(ExecuteResponse, "ExecuteResponse");
wire_response!(FetchResponse, "FetchResponse");
wire_response!(CommitResponse, "CommitResponse");
wire_response!(RollbackResponse, "RollbackResponse");
wire_response!(ExecuteBatchResponse, "ExecuteBatchResponse");
wire_response!(ResultSetResponse, "ResultSetResponse");
wire_response!(ErrorResponse, "ErrorResponse");

/// Serialize a typed request into its tagged envelope.
pub(crate) fn encode_request<R: AvaticaRequest>(request: &R) -> Vec<u8> {
    let envelope = WireMessage {
        name: format!("{}{}", REQUEST_PREFIX, R::NAME),
        wrapped_message: request.encode_to_vec(),
    };
    envelope.encode_to_vec()
}

/// Deserialize a tagged envelope into the expected response type.
pub(crate) fn decode_response<R: AvaticaResponse>(body: &[u8]) -> Result<R, PhoenixError> {
    let envelope = WireMessage::decode(body)?;
    let simple = envelope
        .name
        .strip_prefix(RESPONSE_PREFIX)
        .unwrap_or(envelope.name.as_str());

    if simple == ErrorResponse::NAME {
        let error = ErrorResponse::decode(envelope.wrapped_message.as_slice())?;
        return Err(server_error(error));
    }
    if simple != R::NAME {
        return Err(PhoenixError::Protocol(format!(
            "expected {} but server answered {}",
            R::NAME,
            envelope.name
        )));
    }

    Ok(R::decode(envelope.wrapped_message.as_slice())?)
}

fn server_error(error: ErrorResponse) -> PhoenixError {
    PhoenixError::Server {
        message: error.error_message,
        error_code: error.error_code,
        sql_state: error.sql_state,
        severity: Severity::try_from(error.severity).unwrap_or(Severity::UnknownSeverity),
    }
}

/// Build the envelope for a typed response; the server side of
/// [`encode_request`], used by the scripted transport in tests.
#[cfg(test)]
pub(crate) fn encode_response<R: AvaticaResponse>(response: &R) -> Vec<u8> {
    let envelope = WireMessage {
        name: format!("{}{}", RESPONSE_PREFIX, R::NAME),
        wrapped_message: response.encode_to_vec(),
    };
    envelope.encode_to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_envelope_carries_class_tag_and_payload() {
        let request = OpenConnectionRequest {
            connection_id: "ab12cd34".to_string(),
            info: Default::default(),
        };

        let wire = encode_request(&request);
        let envelope = WireMessage::decode(wire.as_slice()).unwrap();
        assert_eq!(
            envelope.name,
            "org.apache.calcite.avatica.proto.Requests$OpenConnectionRequest"
        );

        let inner = OpenConnectionRequest::decode(envelope.wrapped_message.as_slice()).unwrap();
        assert_eq!(inner, request);
    }

    #[test]
    fn expected_response_round_trips() {
        let response = CreateStatementResponse {
            connection_id: "ab12cd34".to_string(),
            statement_id: 17,
            metadata: None,
        };

        let wire = encode_response(&response);
        let decoded: CreateStatementResponse = decode_response(&wire).unwrap();
        assert_eq!(decoded.statement_id, 17);
    }

    #[test]
    fn error_response_short_circuits_regardless_of_expectation() {
        let error = ErrorResponse {
            error_message: "Syntax error. Encountered \"FRMO\"".to_string(),
            error_code: 601,
            sql_state: "42P00".to_string(),
            severity: Severity::ErrorSeverity as i32,
            ..Default::default()
        };

        let wire = encode_response(&error);
        let result: Result<ExecuteResponse, _> = decode_response(&wire);
        match result {
            Err(PhoenixError::Server {
                error_code,
                sql_state,
                ..
            }) => {
                assert_eq!(error_code, 601);
                assert_eq!(sql_state, "42P00");
            }
            other => panic!("expected server error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn mismatched_response_name_is_a_protocol_fault() {
        let response = CommitResponse {};
        let wire = encode_response(&response);

        let result: Result<FetchResponse, _> = decode_response(&wire);
        assert!(matches!(result, Err(PhoenixError::Protocol(_))));
    }

    #[test]
    fn truncated_envelope_is_a_decode_fault() {
        let response = CreateStatementResponse::default();
        let mut wire = encode_response(&response);
        wire.truncate(wire.len() - 1);

        let result: Result<CreateStatementResponse, _> = decode_response(&wire);
        assert!(matches!(result, Err(PhoenixError::Decode(_))));
    }
}
