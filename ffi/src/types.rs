//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type but uses C-compatible representations:
//! `*mut c_char` instead of `String`, pointer + length instead of `Vec`, and
//! enums with explicit discriminants. Conversion functions live here to keep
//! `lib.rs` focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use transifex_core::{HttpMethod, TeamRole, TransifexError};

/// Opaque handle to a `TransifexClient`. C callers receive a pointer to this
/// and pass it back into every FFI function.
pub struct FfiTransifexClient {
    pub(crate) inner: transifex_core::TransifexClient,
}

/// Build a C string, dropping interior NULs rather than failing.
pub(crate) fn c_string(s: impl Into<Vec<u8>>) -> *mut c_char {
    let mut bytes = s.into();
    bytes.retain(|b| *b != 0);
    CString::new(bytes).unwrap_or_default().into_raw()
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// HTTP method as a C enum.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiHttpMethod {
    Get = 0,
    Post = 1,
    Put = 2,
    Delete = 3,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
            HttpMethod::Post => FfiHttpMethod::Post,
            HttpMethod::Put => FfiHttpMethod::Put,
            HttpMethod::Delete => FfiHttpMethod::Delete,
        }
    }
}

/// Team role selector for `tx_build_get_team` / `tx_build_update_team`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiTeamRole {
    Translators = 0,
    Reviewers = 1,
    Coordinators = 2,
}

impl From<FfiTeamRole> for TeamRole {
    fn from(role: FfiTeamRole) -> Self {
        match role {
            FfiTeamRole::Translators => TeamRole::Translators,
            FfiTeamRole::Reviewers => TeamRole::Reviewers,
            FfiTeamRole::Coordinators => TeamRole::Coordinators,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `tx_build_*` functions. `body` is raw bytes (multipart uploads
/// may not be text) and is null when `body_len` is 0. The C caller executes
/// the request and passes the response, together with this request, to
/// `tx_parse_response`, which checks it against `expected_status`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
    pub body: *mut u8,
    pub body_len: u32,
    pub expected_status: u16,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    ///
    /// Fails before allocating anything when the body or header count does
    /// not fit the `u32` length fields.
    pub(crate) fn from_core(
        req: transifex_core::HttpRequest,
        expected_status: u16,
    ) -> Result<*mut Self, TransifexError> {
        let body_len = c_len(req.body.as_ref().map_or(0, Vec::len), "request body")?;
        let headers_len = c_len(req.headers.len(), "header list")?;

        let url = c_string(req.url);

        let body = match req.body {
            Some(b) if !b.is_empty() => Box::into_raw(b.into_boxed_slice()) as *mut u8,
            _ => std::ptr::null_mut(),
        };

        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: c_string(k),
                    value: c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Ok(Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url,
            headers,
            headers_len,
            body,
            body_len,
            expected_status,
        })))
    }
}

/// Length as a C `u32` field.
pub(crate) fn c_len(len: usize, what: &str) -> Result<u32, TransifexError> {
    u32::try_from(len).map_err(|_| {
        TransifexError::InvalidArgument(format!("{what} of {len} exceeds the u32 length field"))
    })
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this on the stack after executing an HTTP request,
/// then passes a pointer to `tx_parse_response`. The FFI layer reads but does
/// not free these fields. `content_type` may be null.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub content_type: *const c_char,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiTxResult`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Api = 1,
    MissingFile = 2,
    InvalidFileType = 3,
    InvalidArgument = 4,
    Io = 5,
    Serialization = 6,
    Deserialization = 7,
    Transport = 8,
    Config = 9,
    Panic = 10,
    NullArg = 11,
}

/// Result envelope for `tx_parse_response`, and the error written through
/// the `out_error` parameter of `tx_client_new` and `tx_build_*`.
///
/// On success `error_code` is `Ok`, `error_message` is null, and `json`
/// holds the decoded body re-serialized as JSON text (`null` for empty
/// bodies). On failure `error_code` describes the category, `error_message`
/// is a human-readable C string, `json` is null, and `http_status` carries
/// the status of `Api` errors.
#[repr(C)]
pub struct FfiTxResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub json: *mut c_char,
}

impl FfiTxResult {
    pub(crate) fn ok_json(value: &serde_json::Value) -> *mut Self {
        Box::into_raw(Box::new(FfiTxResult {
            error_code: FfiErrorCode::Ok,
            error_message: std::ptr::null_mut(),
            http_status: 0,
            json: c_string(value.to_string()),
        }))
    }

    /// Build an error result from a `TransifexError`.
    pub(crate) fn from_error(err: TransifexError) -> *mut Self {
        let error_code = match &err {
            TransifexError::Api { .. } => FfiErrorCode::Api,
            TransifexError::MissingFile(_) => FfiErrorCode::MissingFile,
            TransifexError::InvalidFileType(_) => FfiErrorCode::InvalidFileType,
            TransifexError::InvalidArgument(_) => FfiErrorCode::InvalidArgument,
            TransifexError::Io { .. } => FfiErrorCode::Io,
            TransifexError::Serialization(_) => FfiErrorCode::Serialization,
            TransifexError::Deserialization(_) => FfiErrorCode::Deserialization,
            TransifexError::Transport(_) => FfiErrorCode::Transport,
            TransifexError::Config(_) => FfiErrorCode::Config,
        };
        Self::error(error_code, err.status().unwrap_or(0), &err.to_string())
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::error(FfiErrorCode::NullArg, 0, &format!("null argument: {name}"))
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::error(FfiErrorCode::Panic, 0, msg)
    }

    fn error(error_code: FfiErrorCode, http_status: u16, msg: &str) -> *mut Self {
        Box::into_raw(Box::new(FfiTxResult {
            error_code,
            error_message: c_string(msg),
            http_status,
            json: std::ptr::null_mut(),
        }))
    }
}
