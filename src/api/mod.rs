//! HTTP gateway to the inventory API.
//!
//! Every call goes through [`ApiClient::request`], which prefixes the
//! configured base URL, encodes query parameters, attaches the session's
//! bearer token and folds the response into [`ResponseBody`] or [`ApiError`].

use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::form_urlencoded;

use crate::api::errors::{ApiError, ApiResult, GENERIC_ERROR_MESSAGE};
use crate::api::session::Session;
use crate::query::QueryParams;

pub mod errors;
pub mod session;

const DOCUMENT_ERROR_MESSAGE: &str = "error generating document";

/// Request body variants used by the API.
#[derive(Clone, Debug, PartialEq)]
pub enum RequestBody {
    Json(Value),
    Form(Vec<(String, String)>),
}

/// Method, headers, body and query parameters of a single call.
#[derive(Clone, Debug)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<RequestBody>,
    pub params: Option<QueryParams>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::get()
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: HeaderMap::new(),
            body: None,
            params: None,
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    pub fn put() -> Self {
        Self::new(Method::PUT)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Serializes `body` as the JSON request body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> ApiResult<Self> {
        let value = serde_json::to_value(body)?;
        self.body = Some(RequestBody::Json(value));
        Ok(self)
    }

    /// Sends `pairs` as an `application/x-www-form-urlencoded` body.
    pub fn form<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let pairs = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.body = Some(RequestBody::Form(pairs));
        self
    }

    pub fn params(mut self, params: QueryParams) -> Self {
        self.params = Some(params);
        self
    }
}

/// Successful response payload: JSON when it parses, raw text otherwise.
#[derive(Clone, Debug, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
}

impl ResponseBody {
    /// Interprets a success body, degrading to text when it is not JSON.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match serde_json::from_slice(bytes) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(String::from_utf8_lossy(bytes).into_owned()),
        }
    }

    /// Deserializes a JSON body into `T`.
    pub fn into_json<T: DeserializeOwned>(self) -> ApiResult<T> {
        match self {
            ResponseBody::Json(value) => Ok(serde_json::from_value(value)?),
            ResponseBody::Text(text) => Err(ApiError::Decode(format!(
                "expected JSON, got text: {}",
                truncate(&text, 120)
            ))),
        }
    }
}

/// Extracts the message of an error response. Uses the JSON `detail` string
/// when present and falls back to [`GENERIC_ERROR_MESSAGE`].
pub fn error_message(bytes: &[u8]) -> String {
    serde_json::from_slice::<Value>(bytes)
        .ok()
        .and_then(|body| {
            body.get("detail")
                .and_then(Value::as_str)
                .filter(|detail| !detail.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string())
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Thin wrapper around a `reqwest::Client` bound to the API base URL.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client. `timeout` of `None` keeps reqwest's default behavior.
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> ApiResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for `path`, with the encoded query string when parameters are
    /// present.
    pub fn url(&self, path: &str, params: Option<&QueryParams>) -> String {
        let mut url = format!("{}{}", self.base_url, path);
        if let Some(params) = params.filter(|p| !p.is_empty()) {
            url.push('?');
            url.push_str(&params.to_query_string());
        }
        url
    }

    /// Issues a request and decodes the response.
    pub async fn request(
        &self,
        session: &Session,
        path: &str,
        options: RequestOptions,
    ) -> ApiResult<ResponseBody> {
        let (status, bytes, sent_token) = self.send(session, path, options).await?;

        if !status.is_success() {
            return Err(self.failure(session, status, sent_token, error_message(&bytes)));
        }

        Ok(ResponseBody::from_bytes(&bytes))
    }

    /// Issues a request and deserializes the JSON response into `T`.
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        session: &Session,
        path: &str,
        options: RequestOptions,
    ) -> ApiResult<T> {
        self.request(session, path, options).await?.into_json()
    }

    /// Raw path for binary documents: the body is returned untouched and errors
    /// carry the response text instead of a decoded `detail`.
    pub async fn request_bytes(
        &self,
        session: &Session,
        path: &str,
        options: RequestOptions,
    ) -> ApiResult<Bytes> {
        let (status, bytes, sent_token) = self.send(session, path, options).await?;

        if !status.is_success() {
            let text = String::from_utf8_lossy(&bytes).trim().to_string();
            let message = if text.is_empty() {
                DOCUMENT_ERROR_MESSAGE.to_string()
            } else {
                text
            };
            return Err(self.failure(session, status, sent_token, message));
        }

        Ok(bytes)
    }

    async fn send(
        &self,
        session: &Session,
        path: &str,
        options: RequestOptions,
    ) -> ApiResult<(StatusCode, Bytes, Option<String>)> {
        let RequestOptions {
            method,
            mut headers,
            body,
            params,
        } = options;

        let url = self.url(path, params.as_ref());
        let sent_token = session.authorize(&mut headers);
        log::debug!("{method} {url}");

        let mut request = self.http.request(method, &url);
        match body {
            Some(RequestBody::Json(value)) => {
                request = request.json(&value);
            }
            Some(RequestBody::Form(pairs)) => {
                let encoded = form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(pairs.iter())
                    .finish();
                headers.insert(
                    CONTENT_TYPE,
                    HeaderValue::from_static("application/x-www-form-urlencoded"),
                );
                request = request.body(encoded);
            }
            None => {}
        }

        let response = request.headers(headers).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        Ok((status, bytes, sent_token))
    }

    fn failure(
        &self,
        session: &Session,
        status: StatusCode,
        sent_token: Option<String>,
        message: String,
    ) -> ApiError {
        if status == StatusCode::UNAUTHORIZED {
            if let Some(token) = sent_token {
                session.expire_token(&token);
            }
            return ApiError::Unauthorized { message };
        }
        log::debug!("request failed with {status}: {message}");
        ApiError::Status {
            status: status.as_u16(),
            message,
        }
    }
}
