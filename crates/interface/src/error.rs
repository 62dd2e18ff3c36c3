use serde::Deserialize;
use thiserror::Error;

/// 커넥터가 반환하는 모든 실패의 최상위 타입.
///
/// `Validation`은 요청이 전송되지 않았음을, `Connector`는 해석 가능한 HTTP 응답을
/// 받지 못했음을, `Client`는 거래소가 요청을 거절했음을 의미한다.
#[derive(Error, Debug)]
pub enum ExchangeError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("connector error: {0}")]
    Connector(#[from] ConnectorError),
    #[error("client error: {0}")]
    Client(#[from] ClientError),
    #[error("config error: {0}")]
    Config(String),
}

impl ExchangeError {
    /// True when the request never reached the wire.
    pub fn is_pre_flight(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Config(_))
    }

    /// Exchange-defined error code, if the exchange returned one.
    pub fn error_code(&self) -> Option<i64> {
        match self {
            Self::Client(e) => e.error_code,
            _ => None,
        }
    }
}

/// Pre-flight failures detected before any network activity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("\"{name}\" is a mandatory parameter")]
    MissingParameter { name: String },
    #[error("\"{name}\" must be of {expected} type")]
    WrongParameterType { name: String, expected: String },
    #[error("\"{name}\" must not be empty")]
    EmptyParameter { name: String },
    #[error("\"{name}\" has invalid value {value}: expected {expected}")]
    InvalidParameterValue {
        name: String,
        value: String,
        expected: String,
    },
    #[error("one of {names:?} is mandatory")]
    MissingOneOf { names: Vec<String> },
    #[error("{0} is required for this request")]
    MissingCredentials(&'static str),
    #[error("{0} contains characters not allowed in an HTTP header")]
    InvalidCredentials(&'static str),
    #[error("\"{name}\" is set by the connector and must not be supplied")]
    ReservedParameter { name: String },
}

/// No interpretable HTTP response was obtained.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ConnectorError {
    pub message: String,
}

impl ConnectorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for ConnectorError {
    fn from(e: reqwest::Error) -> Self {
        let kind = if e.is_timeout() {
            "timeout"
        } else if e.is_connect() {
            "connect"
        } else if e.is_body() || e.is_decode() {
            "body"
        } else if e.is_builder() {
            "builder"
        } else {
            "http"
        };
        Self::new(format!("{kind} error: {e}"))
    }
}

/// 거래소가 HTTP 응답으로 돌려준 요청 실패 (4xx/5xx).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("status {status}, code {}, msg: {message}", code_display(.error_code))]
pub struct ClientError {
    pub status: u16,
    /// `None` when the body did not carry a parseable `code`.
    pub error_code: Option<i64>,
    pub message: String,
    /// Full response body as received.
    pub body: String,
}

fn code_display(code: &Option<i64>) -> String {
    code.map_or_else(|| "none".to_string(), |c| c.to_string())
}

/// Binance error body: `{"code": -1121, "msg": "Invalid symbol."}`
#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: i64,
    msg: String,
}

impl ClientError {
    /// Classifies an error body, falling back to the raw text when it is not
    /// the exchange's `{code, msg}` shape.
    pub fn from_body(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        match serde_json::from_str::<ErrorBody>(&body) {
            Ok(parsed) => Self {
                status,
                error_code: Some(parsed.code),
                message: parsed.msg,
                body,
            },
            Err(_) => Self {
                status,
                error_code: None,
                message: body.clone(),
                body,
            },
        }
    }

    pub fn is_server_error(&self) -> bool {
        self.status >= 500
    }
}
