//! Shared request construction for every resource facade.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Serialize;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::TransifexError;
use crate::http::{HttpMethod, HttpRequest};
use crate::multipart::MultipartForm;

/// Bare query-string flags understood by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryFlag {
    Details,
    SkipInvalidUsername,
}

impl QueryFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryFlag::Details => "details",
            QueryFlag::SkipInvalidUsername => "skip_invalid_username",
        }
    }

    /// `Some(self)` when `enabled`; pass `.as_slice()` to the builder.
    pub(crate) fn when(self, enabled: bool) -> Option<QueryFlag> {
        enabled.then_some(self)
    }
}

/// Composes absolute URLs and attaches headers and bodies.
///
/// Holds no mutable state; one builder is shared by all facades of a
/// `TransifexClient`.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: String,
    authorization: Option<String>,
}

impl RequestBuilder {
    pub fn new(config: &ClientConfig) -> Result<Self, TransifexError> {
        config.validate()?;
        let api_path = config.api_path.trim_matches('/');
        let base = config.base_url.trim_end_matches('/');
        let base_url = if api_path.is_empty() {
            base.to_string()
        } else {
            format!("{base}/{api_path}")
        };
        let authorization = match (&config.username, &config.password) {
            (Some(user), Some(password)) => Some(format!(
                "Basic {}",
                STANDARD.encode(format!("{user}:{password}"))
            )),
            _ => None,
        };
        Ok(Self {
            base_url,
            authorization,
        })
    }

    /// Absolute URL for `path` with the given flags appended as bare keys.
    pub fn url(&self, path: &str, flags: &[QueryFlag]) -> String {
        let mut url = format!("{}{path}", self.base_url);
        if !flags.is_empty() {
            let query: Vec<&str> = flags.iter().map(QueryFlag::as_str).collect();
            url.push('?');
            url.push_str(&query.join("&"));
        }
        url
    }

    pub fn get(&self, path: &str, flags: &[QueryFlag]) -> HttpRequest {
        self.request(HttpMethod::Get, path, flags, Vec::new(), None)
    }

    pub fn delete(&self, path: &str) -> HttpRequest {
        self.request(HttpMethod::Delete, path, &[], Vec::new(), None)
    }

    pub fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        flags: &[QueryFlag],
        payload: &T,
    ) -> Result<HttpRequest, TransifexError> {
        self.json(HttpMethod::Post, path, flags, payload)
    }

    pub fn put_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        flags: &[QueryFlag],
        payload: &T,
    ) -> Result<HttpRequest, TransifexError> {
        self.json(HttpMethod::Put, path, flags, payload)
    }

    pub(crate) fn post_multipart(&self, path: &str, form: MultipartForm) -> HttpRequest {
        self.multipart(HttpMethod::Post, path, form)
    }

    pub(crate) fn put_multipart(&self, path: &str, form: MultipartForm) -> HttpRequest {
        self.multipart(HttpMethod::Put, path, form)
    }

    fn json<T: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        flags: &[QueryFlag],
        payload: &T,
    ) -> Result<HttpRequest, TransifexError> {
        let body = serde_json::to_vec(payload)
            .map_err(|e| TransifexError::Serialization(e.to_string()))?;
        let headers = vec![("content-type".to_string(), "application/json".to_string())];
        Ok(self.request(method, path, flags, headers, Some(body)))
    }

    fn multipart(&self, method: HttpMethod, path: &str, form: MultipartForm) -> HttpRequest {
        let headers = vec![("content-type".to_string(), form.content_type())];
        self.request(method, path, &[], headers, Some(form.into_body()))
    }

    fn request(
        &self,
        method: HttpMethod,
        path: &str,
        flags: &[QueryFlag],
        mut headers: Vec<(String, String)>,
        body: Option<Vec<u8>>,
    ) -> HttpRequest {
        if let Some(auth) = &self.authorization {
            headers.push(("authorization".to_string(), auth.clone()));
        }
        let url = self.url(path, flags);
        debug!(%method, %url, "built request");
        HttpRequest {
            method,
            url,
            headers,
            body,
        }
    }
}
