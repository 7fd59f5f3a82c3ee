use crate::avatica::Severity;
use core::fmt;

/// Different `Phoenix` error types.
///
/// Transport faults, protocol faults and server diagnostics are kept
/// distinct so callers can decide on retry or compensation per kind;
/// none of them is ever retried by the client itself.
#[derive(Debug)]
pub enum PhoenixError {
    /// The HTTP exchange could not complete.
    Transport(reqwest::Error),
    /// The exchange did not complete within the per-call timeout. The
    /// server may still have applied the operation.
    Timeout(String),
    /// The target URL could not be built or resolved.
    InvalidEndpoint(String),
    /// The response envelope did not match the protocol contract.
    Protocol(String),
    /// The response payload could not be decoded.
    Decode(prost::DecodeError),
    /// An operation was invoked on a handle in an invalid state.
    Sequence(String),
    /// The query server rejected the request with a diagnostic.
    Server {
        message: String,
        error_code: u32,
        sql_state: String,
        severity: Severity,
    },
    /// Non-success HTTP status with a body that is not a protocol message.
    Http { status: u16, body: String },
}

impl fmt::Display for PhoenixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhoenixError::Transport(e) => write!(f, "Transport: {}", e),
            PhoenixError::Timeout(op) => write!(f, "Timeout: {} did not complete in time", op),
            PhoenixError::InvalidEndpoint(msg) => write!(f, "Invalid Endpoint: {}", msg),
            PhoenixError::Protocol(msg) => write!(f, "Protocol: {}", msg),
            PhoenixError::Decode(e) => write!(f, "Decode: {}", e),
            PhoenixError::Sequence(msg) => write!(f, "Sequence: {}", msg),
            PhoenixError::Server {
                message,
                error_code,
                sql_state,
                ..
            } => write!(f, "Server [{} {}]: {}", error_code, sql_state, message),
            PhoenixError::Http { status, body } => write!(f, "Http {}: {}", status, body),
        }
    }
}

impl std::error::Error for PhoenixError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PhoenixError::Transport(e) => Some(e),
            PhoenixError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for PhoenixError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            PhoenixError::Timeout(error.to_string())
        } else {
            PhoenixError::Transport(error)
        }
    }
}

impl From<prost::DecodeError> for PhoenixError {
    fn from(error: prost::DecodeError) -> Self {
        PhoenixError::Decode(error)
    }
}

impl From<url::ParseError> for PhoenixError {
    fn from(error: url::ParseError) -> Self {
        PhoenixError::InvalidEndpoint(error.to_string())
    }
}

impl PhoenixError {
    /// True when the failure came back from the server as a diagnostic
    /// rather than from the exchange itself.
    pub fn is_server_error(&self) -> bool {
        matches!(self, PhoenixError::Server { .. })
    }

    /// True for sequencing violations detectable without a round trip.
    pub fn is_sequence_error(&self) -> bool {
        matches!(self, PhoenixError::Sequence(_))
    }
}
