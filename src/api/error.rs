use std::error::Error as StdError;
use std::fmt;

/// Classifies how a request failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientErrorKind {
    /// The backend answered with a non-success status.
    Http { status: u16 },
    /// The request never produced a response (connection, TLS, timeout...).
    Transport,
    /// The request payload could not be serialized.
    Encode,
    /// A success response carried a body that did not match the expected shape.
    Decode,
    /// The caller cancelled the request.
    Cancelled,
}

/// Uniform failure surfaced by every API call.
///
/// `message` is the HTTP reason phrase for status failures (for example
/// `"Unauthorized"`) and a short description otherwise. `detail` carries the
/// backend-supplied `detail` field when the error body had one.
#[derive(Debug)]
pub struct ClientError {
    kind: ClientErrorKind,
    message: String,
    detail: Option<String>,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl ClientError {
    pub fn new(kind: ClientErrorKind, message: impl Into<String>, detail: Option<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail,
            source: None,
        }
    }

    pub fn http(status: u16, message: impl Into<String>, detail: Option<String>) -> Self {
        Self::new(ClientErrorKind::Http { status }, message, detail)
    }

    pub fn transport(err: reqwest::Error) -> Self {
        Self::new(ClientErrorKind::Transport, "Request failed", Some(err.to_string()))
            .with_source(err)
    }

    pub fn encode(err: serde_json::Error) -> Self {
        Self::new(
            ClientErrorKind::Encode,
            "Could not encode request body",
            Some(err.to_string()),
        )
        .with_source(err)
    }

    pub fn decode(err: impl StdError + Send + Sync + 'static) -> Self {
        let detail = err.to_string();
        Self::new(
            ClientErrorKind::Decode,
            "Unexpected response body",
            Some(detail),
        )
        .with_source(err)
    }

    pub fn cancelled() -> Self {
        Self::new(ClientErrorKind::Cancelled, "Request cancelled", None)
    }

    fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ClientErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// HTTP status for failures the backend answered, `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self.kind {
            ClientErrorKind::Http { status } => Some(status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}: {}", self.message, detail),
            None => write!(f, "{}", self.message),
        }
    }
}

impl StdError for ClientError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_deref()
            .map(|err| err as &(dyn StdError + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_appends_detail_when_present() {
        let err = ClientError::http(403, "Forbidden", Some("project is archived".to_string()));
        assert_eq!(err.to_string(), "Forbidden: project is archived");

        let bare = ClientError::http(500, "Internal Server Error", None);
        assert_eq!(bare.to_string(), "Internal Server Error");
    }

    #[test]
    fn status_is_only_reported_for_http_failures() {
        assert_eq!(ClientError::http(404, "Not Found", None).status(), Some(404));
        assert!(ClientError::http(401, "Unauthorized", None).is_unauthorized());
        assert_eq!(ClientError::cancelled().status(), None);
        assert_eq!(ClientError::cancelled().kind(), ClientErrorKind::Cancelled);
    }

    #[test]
    fn encode_errors_keep_their_source() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = ClientError::encode(json_err);
        assert_eq!(err.kind(), ClientErrorKind::Encode);
        assert!(err.source().is_some());
        assert!(err.detail().is_some());
    }
}
