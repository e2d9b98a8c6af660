//! Response validation and the `ApiCall` envelope.
//!
//! # Design
//! Every facade method returns an `ApiCall<T>`: the built `HttpRequest`, the
//! status the endpoint answers with on success, and the result type. The
//! host can execute `request()` itself and hand the response to `parse`, or
//! let `send` drive an `HttpTransport`.

use std::marker::PhantomData;

use serde_json::Value;
use tracing::{debug, warn};

use crate::error::TransifexError;
use crate::http::{HttpRequest, HttpResponse, HttpTransport};

/// Succeeds only when `response.status == expected`.
pub fn check_status(response: &HttpResponse, expected: u16) -> Result<(), TransifexError> {
    if response.status == expected {
        return Ok(());
    }
    warn!(status = response.status, expected, "unexpected response status");
    Err(TransifexError::Api {
        status: response.status,
        body: response.body.clone(),
    })
}

/// Decode a response body into a generic JSON value.
///
/// An empty body yields `Value::Null`. A body that is not JSON is returned
/// as `Value::String` (the API answers creations with a bare `Created`)
/// unless the response declares a JSON content type.
pub fn decode_body(response: &HttpResponse) -> Result<Value, TransifexError> {
    if response.body.trim().is_empty() {
        return Ok(Value::Null);
    }
    match serde_json::from_str(&response.body) {
        Ok(value) => Ok(value),
        Err(e) if declares_json(response) => Err(TransifexError::Deserialization(e.to_string())),
        Err(_) => Ok(Value::String(response.body.clone())),
    }
}

fn declares_json(response: &HttpResponse) -> bool {
    response
        .header("content-type")
        .is_some_and(|ct| ct.to_ascii_lowercase().contains("json"))
}

/// Conversion from a validated response into a call's result type.
pub trait FromResponse: Sized {
    fn from_response(response: HttpResponse) -> Result<Self, TransifexError>;
}

impl FromResponse for Value {
    fn from_response(response: HttpResponse) -> Result<Self, TransifexError> {
        decode_body(&response)
    }
}

impl FromResponse for () {
    fn from_response(_response: HttpResponse) -> Result<Self, TransifexError> {
        Ok(())
    }
}

/// A built request together with its success status and result type.
#[derive(Debug, Clone)]
#[must_use = "an ApiCall does nothing until it is sent or its request executed"]
pub struct ApiCall<T> {
    request: HttpRequest,
    expected_status: u16,
    _result: PhantomData<fn() -> T>,
}

impl<T: FromResponse> ApiCall<T> {
    pub(crate) fn new(request: HttpRequest, expected_status: u16) -> Self {
        Self {
            request,
            expected_status,
            _result: PhantomData,
        }
    }

    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    pub fn expected_status(&self) -> u16 {
        self.expected_status
    }

    pub fn into_request(self) -> HttpRequest {
        self.request
    }

    /// Validate a response obtained by executing `request()`.
    pub fn parse(&self, response: HttpResponse) -> Result<T, TransifexError> {
        check_status(&response, self.expected_status)?;
        T::from_response(response)
    }

    /// Execute the request through `transport` and parse the answer.
    pub fn send<H: HttpTransport + ?Sized>(self, transport: &H) -> Result<T, TransifexError> {
        let method = self.request.method;
        let url = self.request.url.clone();
        let response = transport.execute(self.request)?;
        debug!(%method, %url, status = response.status, "received response");
        check_status(&response, self.expected_status)?;
        T::from_response(response)
    }
}
