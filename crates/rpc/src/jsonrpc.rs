use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Request ID
#[derive(Debug, PartialEq, Eq, Clone, Hash, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Id {
    Null,
    Num(u64),
    Str(String),
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Id::Null => f.write_str("null"),
            Id::Num(num) => write!(f, "{num}"),
            Id::Str(string) => f.write_str(string),
        }
    }
}

/// Protocol Version, only `"2.0"` is accepted.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Deserialize, Serialize)]
pub enum Version {
    #[serde(rename = "2.0")]
    V2,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RpcRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsonrpc: Option<Version>,
    pub id: Id,
    pub method: String,
    #[serde(default = "default_params", skip_serializing_if = "Params::is_none")]
    pub params: Params,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RpcNotification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsonrpc: Option<Version>,
    pub method: String,
    #[serde(default = "default_params", skip_serializing_if = "Params::is_none")]
    pub params: Params,
}

fn default_params() -> Params {
    Params::None
}

/// Message type through the stdio channel.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RpcMessage {
    /// RPC request initiated from the editor.
    Request(RpcRequest),
    /// RPC notification initiated from the editor.
    Notification(RpcNotification),
    /// Response of a request initiated from our side.
    Response(RpcResponse),
}

/// Successful response
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Success {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsonrpc: Option<Version>,
    pub result: Value,
    pub id: Id,
}

/// Unsuccessful response
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Failure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jsonrpc: Option<Version>,
    pub error: Error,
    pub id: Id,
}

/// JSONRPC error code
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
    /// Reserved for implementation-defined server-errors.
    ServerError(i64),
}

impl ErrorCode {
    pub fn code(&self) -> i64 {
        match *self {
            Self::ParseError => -32700,
            Self::InvalidRequest => -32600,
            Self::MethodNotFound => -32601,
            Self::InvalidParams => -32602,
            Self::InternalError => -32603,
            Self::ServerError(code) => code,
        }
    }

    pub fn description(&self) -> &'static str {
        match *self {
            Self::ParseError => "Parse error",
            Self::InvalidRequest => "Invalid request",
            Self::MethodNotFound => "Method not found",
            Self::InvalidParams => "Invalid params",
            Self::InternalError => "Internal error",
            Self::ServerError(_) => "Server error",
        }
    }
}

impl From<i64> for ErrorCode {
    fn from(code: i64) -> Self {
        match code {
            -32700 => Self::ParseError,
            -32600 => Self::InvalidRequest,
            -32601 => Self::MethodNotFound,
            -32602 => Self::InvalidParams,
            -32603 => Self::InternalError,
            code => Self::ServerError(code),
        }
    }
}

impl<'a> Deserialize<'a> for ErrorCode {
    fn deserialize<D>(deserializer: D) -> Result<ErrorCode, D::Error>
    where
        D: Deserializer<'a>,
    {
        let code: i64 = Deserialize::deserialize(deserializer)?;
        Ok(ErrorCode::from(code))
    }
}

impl Serialize for ErrorCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(self.code())
    }
}

/// Error object of a [`Failure`] response.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Error {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Error {
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.description().to_string(),
            code,
            data: None,
        }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: ErrorCode::MethodNotFound,
            message: format!("Method not found: {method}"),
            data: None,
        }
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::InvalidParams,
            message: message.into(),
            data: None,
        }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::InternalError,
            message: message.into(),
            data: None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RpcResponse {
    Success(Success),
    Failure(Failure),
}

impl RpcResponse {
    /// Returns the correlation id.
    pub fn id(&self) -> &Id {
        match self {
            Self::Success(s) => &s.id,
            Self::Failure(f) => &f.id,
        }
    }
}

/// Request parameters
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Params {
    None,
    Array(Vec<Value>),
    Map(serde_json::Map<String, Value>),
}

impl Params {
    /// Parse incoming `Params` into expected types.
    pub fn parse<D>(self) -> Result<D, Error>
    where
        D: DeserializeOwned,
    {
        let value: Value = self.into();
        serde_json::from_value(value).map_err(|e| Error::invalid_params(format!("Invalid params: {e}.")))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl From<Params> for Value {
    fn from(params: Params) -> Value {
        match params {
            Params::Array(vec) => Value::Array(vec),
            Params::Map(map) => Value::Object(map),
            Params::None => Value::Null,
        }
    }
}

impl From<Value> for Params {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::None,
            Value::Array(vec) => Self::Array(vec),
            Value::Object(map) => Self::Map(map),
            other => Self::Array(vec![other]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_and_notification_are_told_apart() {
        let request: RpcMessage = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":1,"method":"markdown/provideContent","params":{"uri":"markdown:///a.md"}}"#,
        )
        .unwrap();
        assert!(matches!(request, RpcMessage::Request(ref r) if r.id == Id::Num(1)));

        let notification: RpcMessage =
            serde_json::from_str(r#"{"method":"workspace/didChangeConfiguration"}"#).unwrap();
        match notification {
            RpcMessage::Notification(n) => {
                assert_eq!(n.method, "workspace/didChangeConfiguration");
                assert!(n.params.is_none());
            }
            other => panic!("expected notification, got {other:?}"),
        }
    }

    #[test]
    fn response_failure_round_trips_error_code() {
        let failure: RpcMessage = serde_json::from_str(
            r#"{"jsonrpc":"2.0","id":3,"error":{"code":-32601,"message":"nope"}}"#,
        )
        .unwrap();
        match failure {
            RpcMessage::Response(RpcResponse::Failure(f)) => {
                assert_eq!(f.error.code, ErrorCode::MethodNotFound);
                assert_eq!(f.id, Id::Num(3));
            }
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn params_parse_reports_invalid_params() {
        #[derive(Debug, Deserialize)]
        struct UriParams {
            #[allow(unused)]
            uri: String,
        }

        let params = Params::from(serde_json::json!({"path": "/a.md"}));
        let err = params.parse::<UriParams>().unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidParams);
        assert!(err.message.starts_with("Invalid params: missing field `uri`"));
    }

    #[test]
    fn scalar_value_becomes_single_element_array() {
        assert_eq!(
            Params::from(serde_json::json!("markdown")),
            Params::Array(vec![Value::String("markdown".into())])
        );
        assert_eq!(Params::from(Value::Null), Params::None);
    }
}
