//! Request plumbing shared by every backend call.
//!
//! [`ApiBase`] owns the endpoint, the HTTP client and the failure hooks. All
//! verbs funnel into [`ApiBase::fetch`], which decides headers and encoding,
//! normalizes non-success responses into [`ClientError`] and fires the
//! configured callbacks.

use std::fmt;
use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::api::error::{ClientError, ClientErrorKind};
use crate::core::token::{MemoryTokenStore, TokenStore};
use crate::utils::url::join_endpoint;

const BEARER_PREFIX: &str = "Bearer ";
const JSON_CONTENT_TYPE: &str = "application/json";

pub type UnauthorizedHandler = Arc<dyn Fn() + Send + Sync>;
pub type ErrorHandler = Arc<dyn Fn(&ClientError) + Send + Sync>;

/// Form fields submitted as-is; the HTTP layer picks the encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    fields: Vec<(String, String)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Empty,
    Json(Value),
    Form(FormData),
}

impl Payload {
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, ClientError> {
        serde_json::to_value(value)
            .map(Payload::Json)
            .map_err(ClientError::encode)
    }
}

impl From<FormData> for Payload {
    fn from(form: FormData) -> Self {
        Payload::Form(form)
    }
}

#[derive(Clone)]
pub struct ApiBase {
    http_endpoint: String,
    http: reqwest::Client,
    token_store: Arc<dyn TokenStore>,
    on_unauthorized: Option<UnauthorizedHandler>,
    on_error: Option<ErrorHandler>,
}

impl fmt::Debug for ApiBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiBase")
            .field("http_endpoint", &self.http_endpoint)
            .field("on_unauthorized", &self.on_unauthorized.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

impl ApiBase {
    pub fn new(http_endpoint: impl Into<String>) -> Self {
        Self {
            http_endpoint: http_endpoint.into(),
            http: reqwest::Client::new(),
            token_store: Arc::new(MemoryTokenStore::new()),
            on_unauthorized: None,
            on_error: None,
        }
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Store cleared whenever the backend answers 401.
    pub fn with_token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.token_store = store;
        self
    }

    pub fn on_unauthorized(mut self, handler: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_unauthorized = Some(Arc::new(handler));
        self
    }

    pub fn on_error(mut self, handler: impl Fn(&ClientError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(handler));
        self
    }

    pub fn http_endpoint(&self) -> &str {
        &self.http_endpoint
    }

    pub fn token_store(&self) -> &Arc<dyn TokenStore> {
        &self.token_store
    }

    pub fn build_endpoint(&self, path: &str) -> String {
        join_endpoint(&self.http_endpoint, path)
    }

    /// Prefix `token` with `Bearer ` unless it already carries it.
    pub fn check_token(token: &str) -> String {
        if token.starts_with(BEARER_PREFIX) {
            token.to_string()
        } else {
            format!("{BEARER_PREFIX}{token}")
        }
    }

    pub(crate) fn build_request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        payload: Payload,
    ) -> RequestBuilder {
        let mut request = self.http.request(method, self.build_endpoint(path));

        if let Some(token) = token.filter(|t| !t.is_empty()) {
            request = request.header(AUTHORIZATION, Self::check_token(token));
        }

        match payload {
            Payload::Form(form) => request.form(form.fields()),
            Payload::Json(body) => request
                .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
                .body(body.to_string()),
            Payload::Empty => request.header(CONTENT_TYPE, JSON_CONTENT_TYPE),
        }
    }

    pub async fn fetch(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        payload: Payload,
        cancel: Option<&CancellationToken>,
    ) -> Result<Response, ClientError> {
        debug!(%method, path, "sending request");
        match self.send(method.clone(), path, token, payload, cancel).await {
            Ok(response) => Ok(response),
            Err(err) if err.kind() == ClientErrorKind::Cancelled => {
                debug!(%method, path, "request cancelled");
                Err(err)
            }
            Err(err) => {
                error!(%method, path, error = %err, "request failed");
                if let Some(handler) = &self.on_error {
                    handler(&err);
                }
                Err(err)
            }
        }
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        payload: Payload,
        cancel: Option<&CancellationToken>,
    ) -> Result<Response, ClientError> {
        let request = self.build_request(method, path, token, payload);

        let response = match cancel {
            Some(cancel) => tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(ClientError::cancelled()),
                response = request.send() => response,
            },
            None => request.send().await,
        }
        .map_err(ClientError::transport)?;

        if response.status().is_success() {
            return Ok(response);
        }

        Err(self.reject(response).await)
    }

    async fn reject(&self, response: Response) -> ClientError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let detail = extract_detail(&body);

        if status == StatusCode::UNAUTHORIZED {
            self.invalidate_token();
        }

        ClientError::http(status.as_u16(), status_text(status), detail)
    }

    fn invalidate_token(&self) {
        if let Err(err) = self.token_store.clear() {
            warn!(error = %err, "could not clear stored token after 401");
        }
        if let Some(handler) = &self.on_unauthorized {
            handler();
        }
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<Response, ClientError> {
        self.fetch(Method::GET, path, token, Payload::Empty, None)
            .await
    }

    pub async fn post(
        &self,
        path: &str,
        payload: Payload,
        token: Option<&str>,
        cancel: Option<&CancellationToken>,
    ) -> Result<Response, ClientError> {
        self.fetch(Method::POST, path, token, payload, cancel).await
    }

    pub async fn put(
        &self,
        path: &str,
        payload: Payload,
        token: Option<&str>,
    ) -> Result<Response, ClientError> {
        self.fetch(Method::PUT, path, token, payload, None).await
    }

    pub async fn patch(
        &self,
        path: &str,
        payload: Payload,
        token: Option<&str>,
    ) -> Result<Response, ClientError> {
        self.fetch(Method::PATCH, path, token, payload, None).await
    }

    pub async fn delete(
        &self,
        path: &str,
        payload: Payload,
        token: Option<&str>,
    ) -> Result<Response, ClientError> {
        self.fetch(Method::DELETE, path, token, payload, None)
            .await
    }
}

/// Read a success body as JSON.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let bytes = response.bytes().await.map_err(ClientError::transport)?;
    serde_json::from_slice(&bytes).map_err(ClientError::decode)
}

fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string())
}

/// Pull the `detail` field out of an error body, if it has one.
fn extract_detail(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(default)]
        detail: Option<Value>,
    }

    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail? {
        Value::String(detail) => Some(detail),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
