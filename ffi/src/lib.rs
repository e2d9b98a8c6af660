//! C-ABI wrapper around `transifex-core`.
//!
//! # Overview
//! Exposes every project, resource, language and team operation through
//! `extern "C"` functions so any language with a C FFI can build Transifex
//! requests and validate the responses while doing the HTTP itself.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - `tx_build_*` mirrors the core facades 1:1. On failure it returns null
//!   and, when `out_error` is not null, stores an `FfiTxResult` whose
//!   `error_code` tells a null argument, a missing file, a bad content
//!   selector and an invalid argument apart.
//! - Structured options (`ResourceOptions`, `LanguageOptions`,
//!   `ProjectUpdate`) cross the boundary as JSON text; null means defaults.
//! - A single `tx_parse_response` checks any response against the status
//!   recorded in its request and hands back the body as JSON text.
//! - The C caller owns all returned pointers and must call the matching
//!   `tx_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::{catch_unwind, UnwindSafe};

use serde::de::DeserializeOwned;
use transifex_core::response::{check_status, decode_body};
use transifex_core::{
    ApiCall, ClientConfig, ContentMode, FromResponse, HttpResponse, LanguageOptions,
    ProjectUpdate, ResourceOptions, TransifexClient, TransifexError,
};

use types::*;

// ---------------------------------------------------------------------------
// Argument helpers
// ---------------------------------------------------------------------------

/// Why a constructor or `tx_build_*` call produced nothing.
enum BuildFailure {
    NullArg(&'static str),
    Error(TransifexError),
}

impl From<TransifexError> for BuildFailure {
    fn from(err: TransifexError) -> Self {
        BuildFailure::Error(err)
    }
}

type BuildResult<T> = Result<T, BuildFailure>;

/// Borrow an optional C string. Null is `None`; invalid UTF-8 is an error.
fn opt_text_arg<'a>(ptr: *const c_char, name: &'static str) -> BuildResult<Option<&'a str>> {
    if ptr.is_null() {
        return Ok(None);
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map(Some)
        .map_err(|_| {
            TransifexError::InvalidArgument(format!("{name} is not valid UTF-8")).into()
        })
}

fn text_arg<'a>(ptr: *const c_char, name: &'static str) -> BuildResult<&'a str> {
    opt_text_arg(ptr, name)?.ok_or(BuildFailure::NullArg(name))
}

/// Collect `len` C strings starting at `ptr`.
fn list_arg(ptr: *const *const c_char, len: u32, name: &'static str) -> BuildResult<Vec<String>> {
    if len == 0 {
        return Ok(Vec::new());
    }
    if ptr.is_null() {
        return Err(BuildFailure::NullArg(name));
    }
    let items = unsafe { std::slice::from_raw_parts(ptr, len as usize) };
    items
        .iter()
        .map(|p| text_arg(*p, name).map(str::to_string))
        .collect()
}

/// Deserialize an optional JSON argument; null yields `T::default()`.
fn json_arg<T: DeserializeOwned + Default>(ptr: *const c_char, name: &'static str) -> BuildResult<T> {
    match opt_text_arg(ptr, name)? {
        None => Ok(T::default()),
        Some(text) => serde_json::from_str(text).map_err(|e| {
            TransifexError::InvalidArgument(format!("{name}: {e}")).into()
        }),
    }
}

fn client_arg<'a>(ptr: *const FfiTransifexClient) -> BuildResult<&'a TransifexClient> {
    if ptr.is_null() {
        return Err(BuildFailure::NullArg("client"));
    }
    Ok(&unsafe { &*ptr }.inner)
}

fn emit<T: FromResponse>(call: ApiCall<T>) -> BuildResult<*mut FfiHttpRequest> {
    let expected = call.expected_status();
    Ok(FfiHttpRequest::from_core(call.into_request(), expected)?)
}

/// Run `build` behind `catch_unwind` and route any failure to `out_error`.
///
/// `*out_error` is cleared on entry. When `out_error` is null the failure is
/// dropped and only the null return remains.
fn report<T>(
    out_error: *mut *mut FfiTxResult,
    context: &str,
    build: impl FnOnce() -> BuildResult<*mut T> + UnwindSafe,
) -> *mut T {
    if !out_error.is_null() {
        unsafe { *out_error = std::ptr::null_mut() };
    }
    let failure = match catch_unwind(build) {
        Ok(Ok(value)) => return value,
        Ok(Err(BuildFailure::NullArg(name))) => FfiTxResult::null_arg(name),
        Ok(Err(BuildFailure::Error(err))) => FfiTxResult::from_error(err),
        Err(_) => FfiTxResult::panic(&format!("panic in {context}")),
    };
    if out_error.is_null() {
        tx_free_result(failure);
    } else {
        unsafe { *out_error = failure };
    }
    std::ptr::null_mut()
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a new `TransifexClient` bound to `base_url`.
///
/// `api_path` may be null to use `/api/2`. `username` and `password` may both
/// be null for anonymous access; passing only one of them is a `Config`
/// error. Returns null on failure and reports it through `out_error`.
/// The caller must free the returned pointer with `tx_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn tx_client_new(
    base_url: *const c_char,
    api_path: *const c_char,
    username: *const c_char,
    password: *const c_char,
    out_error: *mut *mut FfiTxResult,
) -> *mut FfiTransifexClient {
    report(out_error, "tx_client_new", || {
        let mut config = ClientConfig::new(text_arg(base_url, "base_url")?);
        if let Some(path) = opt_text_arg(api_path, "api_path")? {
            config.api_path = path.to_string();
        }
        config.username = opt_text_arg(username, "username")?.map(str::to_string);
        config.password = opt_text_arg(password, "password")?.map(str::to_string);
        let client = TransifexClient::new(config)?;
        Ok(Box::into_raw(Box::new(FfiTransifexClient { inner: client })))
    })
}

/// Free a client created by `tx_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn tx_client_free(client: *mut FfiTransifexClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

/// Build a request creating a project (201 on success).
///
/// The caller must free the returned pointer with `tx_free_request`, and a
/// stored `*out_error` with `tx_free_result`.
#[unsafe(no_mangle)]
pub extern "C" fn tx_build_create_project(
    client: *const FfiTransifexClient,
    name: *const c_char,
    slug: *const c_char,
    description: *const c_char,
    source_language: *const c_char,
    out_error: *mut *mut FfiTxResult,
) -> *mut FfiHttpRequest {
    report(out_error, "tx_build_create_project", || {
        let client = client_arg(client)?;
        emit(client.projects().create_project(
            text_arg(name, "name")?,
            text_arg(slug, "slug")?,
            text_arg(description, "description")?,
            text_arg(source_language, "source_language")?,
        )?)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn tx_build_get_project(
    client: *const FfiTransifexClient,
    slug: *const c_char,
    details: bool,
    out_error: *mut *mut FfiTxResult,
) -> *mut FfiHttpRequest {
    report(out_error, "tx_build_get_project", || {
        let client = client_arg(client)?;
        emit(client.projects().get_project(text_arg(slug, "slug")?, details))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn tx_build_get_projects(
    client: *const FfiTransifexClient,
    out_error: *mut *mut FfiTxResult,
) -> *mut FfiHttpRequest {
    report(out_error, "tx_build_get_projects", || {
        emit(client_arg(client)?.projects().get_projects())
    })
}

/// Build a request changing project fields.
///
/// `update_json` is a JSON object with any of `name`, `description`,
/// `long_description`, `private`, `homepage` and `source_language_code`.
/// Unknown fields and an empty update are `InvalidArgument` errors.
#[unsafe(no_mangle)]
pub extern "C" fn tx_build_update_project(
    client: *const FfiTransifexClient,
    slug: *const c_char,
    update_json: *const c_char,
    out_error: *mut *mut FfiTxResult,
) -> *mut FfiHttpRequest {
    report(out_error, "tx_build_update_project", || {
        let client = client_arg(client)?;
        let update: ProjectUpdate = json_arg(update_json, "update_json")?;
        emit(client.projects().update_project(text_arg(slug, "slug")?, &update)?)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn tx_build_delete_project(
    client: *const FfiTransifexClient,
    slug: *const c_char,
    out_error: *mut *mut FfiTxResult,
) -> *mut FfiHttpRequest {
    report(out_error, "tx_build_delete_project", || {
        let client = client_arg(client)?;
        emit(client.projects().delete_project(text_arg(slug, "slug")?))
    })
}

// ---------------------------------------------------------------------------
// Resources
// ---------------------------------------------------------------------------

/// Build a request creating a resource.
///
/// `options_json` must set exactly one of `content` and `file` (otherwise
/// `InvalidFileType`); it may also carry `accept_translations`, `category`
/// and `priority`. A `file` that does not exist is `MissingFile`.
#[unsafe(no_mangle)]
pub extern "C" fn tx_build_create_resource(
    client: *const FfiTransifexClient,
    project: *const c_char,
    name: *const c_char,
    slug: *const c_char,
    i18n_type: *const c_char,
    options_json: *const c_char,
    out_error: *mut *mut FfiTxResult,
) -> *mut FfiHttpRequest {
    report(out_error, "tx_build_create_resource", || {
        let client = client_arg(client)?;
        let options: ResourceOptions = json_arg(options_json, "options_json")?;
        emit(client.resources().create_resource(
            text_arg(project, "project")?,
            text_arg(name, "name")?,
            text_arg(slug, "slug")?,
            text_arg(i18n_type, "i18n_type")?,
            &options,
        )?)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn tx_build_get_resource(
    client: *const FfiTransifexClient,
    project: *const c_char,
    resource: *const c_char,
    details: bool,
    out_error: *mut *mut FfiTxResult,
) -> *mut FfiHttpRequest {
    report(out_error, "tx_build_get_resource", || {
        let client = client_arg(client)?;
        emit(client.resources().get_resource(
            text_arg(project, "project")?,
            text_arg(resource, "resource")?,
            details,
        ))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn tx_build_get_resource_content(
    client: *const FfiTransifexClient,
    project: *const c_char,
    resource: *const c_char,
    out_error: *mut *mut FfiTxResult,
) -> *mut FfiHttpRequest {
    report(out_error, "tx_build_get_resource_content", || {
        let client = client_arg(client)?;
        emit(
            client
                .resources()
                .get_resource_content(text_arg(project, "project")?, text_arg(resource, "resource")?),
        )
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn tx_build_get_resources(
    client: *const FfiTransifexClient,
    project: *const c_char,
    out_error: *mut *mut FfiTxResult,
) -> *mut FfiHttpRequest {
    report(out_error, "tx_build_get_resources", || {
        let client = client_arg(client)?;
        emit(client.resources().get_resources(text_arg(project, "project")?))
    })
}

/// Build a request replacing a resource's source content.
///
/// `mode` is `"string"` (the default when null) or `"file"`, in which case
/// `content` is a path that must exist. Any other mode is `InvalidFileType`.
#[unsafe(no_mangle)]
pub extern "C" fn tx_build_update_resource_content(
    client: *const FfiTransifexClient,
    project: *const c_char,
    resource: *const c_char,
    content: *const c_char,
    mode: *const c_char,
    out_error: *mut *mut FfiTxResult,
) -> *mut FfiHttpRequest {
    report(out_error, "tx_build_update_resource_content", || {
        let client = client_arg(client)?;
        let mode = match opt_text_arg(mode, "mode")? {
            Some(mode) => mode.parse::<ContentMode>()?,
            None => ContentMode::default(),
        };
        emit(client.resources().update_resource_content(
            text_arg(project, "project")?,
            text_arg(resource, "resource")?,
            text_arg(content, "content")?,
            mode,
        )?)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn tx_build_delete_resource(
    client: *const FfiTransifexClient,
    project: *const c_char,
    resource: *const c_char,
    out_error: *mut *mut FfiTxResult,
) -> *mut FfiHttpRequest {
    report(out_error, "tx_build_delete_resource", || {
        let client = client_arg(client)?;
        emit(
            client
                .resources()
                .delete_resource(text_arg(project, "project")?, text_arg(resource, "resource")?),
        )
    })
}

// ---------------------------------------------------------------------------
// Languages and teams
// ---------------------------------------------------------------------------

/// Build a request adding a language to a project.
///
/// `coordinators` points at `coordinators_len` C strings; an empty list is
/// `InvalidArgument`. `options_json` may carry `translators`, `reviewers`
/// and `list`.
#[unsafe(no_mangle)]
pub extern "C" fn tx_build_create_language(
    client: *const FfiTransifexClient,
    project: *const c_char,
    code: *const c_char,
    coordinators: *const *const c_char,
    coordinators_len: u32,
    options_json: *const c_char,
    skip_invalid_username: bool,
    out_error: *mut *mut FfiTxResult,
) -> *mut FfiHttpRequest {
    report(out_error, "tx_build_create_language", || {
        let client = client_arg(client)?;
        let coordinators = list_arg(coordinators, coordinators_len, "coordinators")?;
        let options: LanguageOptions = json_arg(options_json, "options_json")?;
        emit(client.languages().create_language(
            text_arg(project, "project")?,
            text_arg(code, "code")?,
            &coordinators,
            &options,
            skip_invalid_username,
        )?)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn tx_build_get_language(
    client: *const FfiTransifexClient,
    project: *const c_char,
    code: *const c_char,
    details: bool,
    out_error: *mut *mut FfiTxResult,
) -> *mut FfiHttpRequest {
    report(out_error, "tx_build_get_language", || {
        let client = client_arg(client)?;
        emit(client.languages().get_language(
            text_arg(project, "project")?,
            text_arg(code, "code")?,
            details,
        ))
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn tx_build_get_languages(
    client: *const FfiTransifexClient,
    project: *const c_char,
    out_error: *mut *mut FfiTxResult,
) -> *mut FfiHttpRequest {
    report(out_error, "tx_build_get_languages", || {
        let client = client_arg(client)?;
        emit(client.languages().get_languages(text_arg(project, "project")?))
    })
}

/// Build a request replacing the teams of a language.
#[unsafe(no_mangle)]
pub extern "C" fn tx_build_update_language(
    client: *const FfiTransifexClient,
    project: *const c_char,
    code: *const c_char,
    coordinators: *const *const c_char,
    coordinators_len: u32,
    options_json: *const c_char,
    out_error: *mut *mut FfiTxResult,
) -> *mut FfiHttpRequest {
    report(out_error, "tx_build_update_language", || {
        let client = client_arg(client)?;
        let coordinators = list_arg(coordinators, coordinators_len, "coordinators")?;
        let options: LanguageOptions = json_arg(options_json, "options_json")?;
        emit(client.languages().update_language(
            text_arg(project, "project")?,
            text_arg(code, "code")?,
            &coordinators,
            &options,
        )?)
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn tx_build_delete_language(
    client: *const FfiTransifexClient,
    project: *const c_char,
    code: *const c_char,
    out_error: *mut *mut FfiTxResult,
) -> *mut FfiHttpRequest {
    report(out_error, "tx_build_delete_language", || {
        let client = client_arg(client)?;
        emit(
            client
                .languages()
                .delete_language(text_arg(project, "project")?, text_arg(code, "code")?),
        )
    })
}

#[unsafe(no_mangle)]
pub extern "C" fn tx_build_get_team(
    client: *const FfiTransifexClient,
    project: *const c_char,
    code: *const c_char,
    role: FfiTeamRole,
    out_error: *mut *mut FfiTxResult,
) -> *mut FfiHttpRequest {
    report(out_error, "tx_build_get_team", || {
        let client = client_arg(client)?;
        emit(client.languages().get_team(
            text_arg(project, "project")?,
            text_arg(code, "code")?,
            role.into(),
        ))
    })
}

/// Build a request replacing one team of a language. An empty `users` list
/// is `InvalidArgument`.
#[unsafe(no_mangle)]
pub extern "C" fn tx_build_update_team(
    client: *const FfiTransifexClient,
    project: *const c_char,
    code: *const c_char,
    role: FfiTeamRole,
    users: *const *const c_char,
    users_len: u32,
    skip_invalid_username: bool,
    out_error: *mut *mut FfiTxResult,
) -> *mut FfiHttpRequest {
    report(out_error, "tx_build_update_team", || {
        let client = client_arg(client)?;
        let users = list_arg(users, users_len, "users")?;
        emit(client.languages().update_team(
            text_arg(project, "project")?,
            text_arg(code, "code")?,
            role.into(),
            &users,
            skip_invalid_username,
        )?)
    })
}

// ---------------------------------------------------------------------------
// Parse response
// ---------------------------------------------------------------------------

/// Convert an `FfiHttpResponse` to a core `HttpResponse`.
///
/// A null body is empty. A body that is not UTF-8 is a `Deserialization`
/// error. A content type that is not UTF-8 is ignored.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> Result<HttpResponse, TransifexError> {
    let body = if resp.body.is_null() {
        ""
    } else {
        unsafe { CStr::from_ptr(resp.body) }
            .to_str()
            .map_err(|e| {
                TransifexError::Deserialization(format!("response body is not valid UTF-8: {e}"))
            })?
    };
    let mut response = HttpResponse::new(resp.status, body);
    if let Ok(Some(content_type)) = opt_text_arg(resp.content_type, "content_type") {
        response
            .headers
            .push(("content-type".to_string(), content_type.to_string()));
    }
    Ok(response)
}

/// Validate the response to `request` and decode its body.
///
/// A status other than `request->expected_status` yields an `Api` error
/// carrying the status and raw body. On success `json` is the decoded body
/// as JSON text: an object or array, a string for plain-text answers such
/// as `Created`, or `null` for an empty body.
#[unsafe(no_mangle)]
pub extern "C" fn tx_parse_response(
    request: *const FfiHttpRequest,
    response: *const FfiHttpResponse,
) -> *mut FfiTxResult {
    catch_unwind(|| {
        if request.is_null() {
            return FfiTxResult::null_arg("request");
        }
        if response.is_null() {
            return FfiTxResult::null_arg("response");
        }
        let expected = unsafe { &*request }.expected_status;
        let decoded = ffi_response_to_core(unsafe { &*response }).and_then(|core_resp| {
            check_status(&core_resp, expected)?;
            decode_body(&core_resp)
        });
        match decoded {
            Ok(value) => FfiTxResult::ok_json(&value),
            Err(e) => FfiTxResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiTxResult::panic("panic in tx_parse_response"))
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `tx_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn tx_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        if !req.url.is_null() {
            drop(unsafe { CString::from_raw(req.url) });
        }
        if !req.body.is_null() && req.body_len > 0 {
            drop(unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.body,
                    req.body_len as usize,
                ))
            });
        }
        if !req.headers.is_null() && req.headers_len > 0 {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for h in headers.iter() {
                if !h.key.is_null() {
                    drop(unsafe { CString::from_raw(h.key) });
                }
                if !h.value.is_null() {
                    drop(unsafe { CString::from_raw(h.value) });
                }
            }
        }
    });
}

/// Free an `FfiTxResult` returned by `tx_parse_response` or stored through
/// an `out_error` parameter. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn tx_free_result(result: *mut FfiTxResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        if !result.error_message.is_null() {
            drop(unsafe { CString::from_raw(result.error_message) });
        }
        if !result.json.is_null() {
            drop(unsafe { CString::from_raw(result.json) });
        }
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn tx_free_string(s: *mut c_char) {
    if !s.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { CString::from_raw(s) });
        });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;
    use std::ptr::{null, null_mut};

    const BASE: &str = "http://localhost:3000";

    fn cstr(s: &str) -> CString {
        CString::new(s).unwrap()
    }

    fn new_client() -> *mut FfiTransifexClient {
        let url = cstr(BASE);
        tx_client_new(url.as_ptr(), null(), null(), null(), null_mut())
    }

    fn url_of(req: &FfiHttpRequest) -> String {
        unsafe { CStr::from_ptr(req.url) }.to_str().unwrap().to_string()
    }

    fn body_of(req: &FfiHttpRequest) -> Vec<u8> {
        if req.body.is_null() {
            return Vec::new();
        }
        unsafe { std::slice::from_raw_parts(req.body, req.body_len as usize) }.to_vec()
    }

    fn headers_of(req: &FfiHttpRequest) -> Vec<(String, String)> {
        if req.headers.is_null() {
            return Vec::new();
        }
        unsafe { std::slice::from_raw_parts(req.headers, req.headers_len as usize) }
            .iter()
            .map(|h| unsafe {
                (
                    CStr::from_ptr(h.key).to_str().unwrap().to_string(),
                    CStr::from_ptr(h.value).to_str().unwrap().to_string(),
                )
            })
            .collect()
    }

    /// Read the error code stored in `err` and free it.
    fn take_error_code(err: *mut FfiTxResult) -> FfiErrorCode {
        assert!(!err.is_null(), "expected an error to be reported");
        let err_ref = unsafe { &*err };
        assert!(!err_ref.error_message.is_null());
        assert!(err_ref.json.is_null());
        let code = err_ref.error_code;
        tx_free_result(err);
        code
    }

    fn parse(req: *const FfiHttpRequest, status: u16, body: &str) -> *mut FfiTxResult {
        let body = cstr(body);
        let resp = FfiHttpResponse {
            status,
            content_type: null(),
            body: body.as_ptr(),
        };
        tx_parse_response(req, &resp)
    }

    fn create_resource(client: *const FfiTransifexClient, options: &str) -> FfiErrorCode {
        let (project, name, slug, kind) = (cstr("p"), cstr("Name"), cstr("r"), cstr("INI"));
        let options = cstr(options);
        let mut err = null_mut();
        let req = tx_build_create_resource(
            client,
            project.as_ptr(),
            name.as_ptr(),
            slug.as_ptr(),
            kind.as_ptr(),
            options.as_ptr(),
            &mut err,
        );
        assert!(req.is_null());
        take_error_code(err)
    }

    #[test]
    fn client_new_and_free() {
        let client = new_client();
        assert!(!client.is_null());
        tx_client_free(client);
    }

    #[test]
    fn client_new_null_url_reports_null_arg() {
        let mut err = null_mut();
        let client = tx_client_new(null(), null(), null(), null(), &mut err);
        assert!(client.is_null());
        assert_eq!(take_error_code(err), FfiErrorCode::NullArg);
    }

    #[test]
    fn client_new_with_username_only_reports_config_error() {
        let url = cstr(BASE);
        let user = cstr("user");
        let mut err = null_mut();
        let client = tx_client_new(url.as_ptr(), null(), user.as_ptr(), null(), &mut err);
        assert!(client.is_null());
        assert_eq!(take_error_code(err), FfiErrorCode::Config);
    }

    #[test]
    fn client_free_null_is_safe() {
        tx_client_free(null_mut());
    }

    #[test]
    fn build_get_projects_returns_correct_request() {
        let client = new_client();
        let mut err = null_mut();
        let req = tx_build_get_projects(client, &mut err);
        assert!(!req.is_null());
        assert!(err.is_null());

        let req_ref = unsafe { &*req };
        assert_eq!(req_ref.method, FfiHttpMethod::Get);
        assert_eq!(url_of(req_ref), "http://localhost:3000/api/2/projects/");
        assert!(req_ref.body.is_null());
        assert_eq!(req_ref.body_len, 0);
        assert_eq!(req_ref.headers_len, 0);
        assert_eq!(req_ref.expected_status, 200);

        tx_free_request(req);
        tx_client_free(client);
    }

    #[test]
    fn success_clears_a_stale_out_error() {
        let client = new_client();
        let mut err = FfiTxResult::panic("stale");
        let stale = err;
        let req = tx_build_get_projects(client, &mut err);
        assert!(!req.is_null());
        assert!(err.is_null());

        tx_free_result(stale);
        tx_free_request(req);
        tx_client_free(client);
    }

    #[test]
    fn build_with_null_client_reports_null_arg() {
        let mut err = null_mut();
        assert!(tx_build_get_projects(null(), &mut err).is_null());
        assert_eq!(take_error_code(err), FfiErrorCode::NullArg);
    }

    #[test]
    fn failures_without_out_error_only_return_null() {
        assert!(tx_build_get_projects(null(), null_mut()).is_null());
    }

    #[test]
    fn credentials_add_authorization_header() {
        let url = cstr(BASE);
        let path = cstr("/api/2");
        let user = cstr("user");
        let pass = cstr("pass");
        let client = tx_client_new(
            url.as_ptr(),
            path.as_ptr(),
            user.as_ptr(),
            pass.as_ptr(),
            null_mut(),
        );
        let req = tx_build_get_projects(client, null_mut());

        let headers = headers_of(unsafe { &*req });
        assert!(headers.contains(&("authorization".to_string(), "Basic dXNlcjpwYXNz".to_string())));

        tx_free_request(req);
        tx_client_free(client);
    }

    #[test]
    fn build_create_project_produces_post_with_json_body() {
        let client = new_client();
        let (name, slug, desc, lang) = (cstr("Name"), cstr("babdev"), cstr("desc"), cstr("en"));
        let req = tx_build_create_project(
            client,
            name.as_ptr(),
            slug.as_ptr(),
            desc.as_ptr(),
            lang.as_ptr(),
            null_mut(),
        );
        assert!(!req.is_null());

        let req_ref = unsafe { &*req };
        assert_eq!(req_ref.method, FfiHttpMethod::Post);
        assert_eq!(req_ref.expected_status, 201);
        assert!(headers_of(req_ref)
            .contains(&("content-type".to_string(), "application/json".to_string())));

        let body: serde_json::Value = serde_json::from_slice(&body_of(req_ref)).unwrap();
        assert_eq!(body["slug"], "babdev");
        assert_eq!(body["source_language_code"], "en");

        tx_free_request(req);
        tx_client_free(client);
    }

    #[test]
    fn build_create_project_null_field_names_the_argument() {
        let client = new_client();
        let name = cstr("Name");
        let mut err = null_mut();
        let req = tx_build_create_project(client, name.as_ptr(), null(), null(), null(), &mut err);
        assert!(req.is_null());

        let message = unsafe { CStr::from_ptr((*err).error_message) }.to_str().unwrap();
        assert_eq!(message, "null argument: slug");
        assert_eq!(take_error_code(err), FfiErrorCode::NullArg);
        tx_client_free(client);
    }

    #[test]
    fn build_get_project_with_invalid_utf8_is_invalid_argument() {
        let client = new_client();
        let slug = CString::new(vec![0xff, 0xfe]).unwrap();
        let mut err = null_mut();
        assert!(tx_build_get_project(client, slug.as_ptr(), false, &mut err).is_null());
        assert_eq!(take_error_code(err), FfiErrorCode::InvalidArgument);
        tx_client_free(client);
    }

    #[test]
    fn build_update_project_reports_empty_and_unknown_fields() {
        let client = new_client();
        let slug = cstr("babdev");

        let empty = cstr("{}");
        let mut err = null_mut();
        assert!(tx_build_update_project(client, slug.as_ptr(), empty.as_ptr(), &mut err).is_null());
        assert_eq!(take_error_code(err), FfiErrorCode::InvalidArgument);

        let unknown = cstr(r#"{"colour":"red"}"#);
        let mut err = null_mut();
        assert!(
            tx_build_update_project(client, slug.as_ptr(), unknown.as_ptr(), &mut err).is_null()
        );
        assert_eq!(take_error_code(err), FfiErrorCode::InvalidArgument);

        let update = cstr(r#"{"private":true}"#);
        let req = tx_build_update_project(client, slug.as_ptr(), update.as_ptr(), null_mut());
        assert!(!req.is_null());
        assert_eq!(unsafe { &*req }.method, FfiHttpMethod::Put);

        tx_free_request(req);
        tx_client_free(client);
    }

    #[test]
    fn build_delete_project_has_no_trailing_slash() {
        let client = new_client();
        let slug = cstr("babdev");
        let req = tx_build_delete_project(client, slug.as_ptr(), null_mut());

        let req_ref = unsafe { &*req };
        assert_eq!(req_ref.method, FfiHttpMethod::Delete);
        assert_eq!(url_of(req_ref), "http://localhost:3000/api/2/project/babdev");
        assert_eq!(req_ref.expected_status, 204);

        tx_free_request(req);
        tx_client_free(client);
    }

    #[test]
    fn build_create_resource_error_kinds_are_distinct() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let both = serde_json::json!({ "content": "a", "file": file.path() }).to_string();
        let client = new_client();

        assert_eq!(
            create_resource(client, r#"{"file":"/definitely/not/here.ini"}"#),
            FfiErrorCode::MissingFile
        );
        assert_eq!(create_resource(client, &both), FfiErrorCode::InvalidFileType);
        assert_eq!(create_resource(client, "{}"), FfiErrorCode::InvalidFileType);
        assert_eq!(
            create_resource(client, r#"{"content":"a","colour":"red"}"#),
            FfiErrorCode::InvalidArgument
        );

        tx_client_free(client);
    }

    #[test]
    fn build_create_resource_from_file_is_multipart() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "A=\"1\"").unwrap();
        let options = serde_json::json!({ "file": file.path() }).to_string();

        let client = new_client();
        let (project, name, slug, kind) = (cstr("p"), cstr("Name"), cstr("r"), cstr("INI"));
        let options = cstr(&options);
        let req = tx_build_create_resource(
            client,
            project.as_ptr(),
            name.as_ptr(),
            slug.as_ptr(),
            kind.as_ptr(),
            options.as_ptr(),
            null_mut(),
        );
        assert!(!req.is_null());

        let req_ref = unsafe { &*req };
        let content_type = headers_of(req_ref)
            .into_iter()
            .find(|(k, _)| k == "content-type")
            .map(|(_, v)| v)
            .unwrap();
        assert!(content_type.starts_with("multipart/form-data; boundary="));
        let body = String::from_utf8(body_of(req_ref)).unwrap();
        assert!(body.contains("A=\"1\""));
        assert_eq!(req_ref.body_len as usize, body.len());

        tx_free_request(req);
        tx_client_free(client);
    }

    #[test]
    fn build_update_resource_content_modes() {
        let client = new_client();
        let (project, resource, content) = (cstr("p"), cstr("r"), cstr("A=1"));

        let req = tx_build_update_resource_content(
            client,
            project.as_ptr(),
            resource.as_ptr(),
            content.as_ptr(),
            null(),
            null_mut(),
        );
        assert!(!req.is_null());
        let body: serde_json::Value = serde_json::from_slice(&body_of(unsafe { &*req })).unwrap();
        assert_eq!(body, serde_json::json!({"content": "A=1"}));
        tx_free_request(req);

        let bad_mode = cstr("xml");
        let mut err = null_mut();
        assert!(tx_build_update_resource_content(
            client,
            project.as_ptr(),
            resource.as_ptr(),
            content.as_ptr(),
            bad_mode.as_ptr(),
            &mut err,
        )
        .is_null());
        assert_eq!(take_error_code(err), FfiErrorCode::InvalidFileType);

        let file_mode = cstr("file");
        let missing = cstr("/definitely/not/here.ini");
        let mut err = null_mut();
        assert!(tx_build_update_resource_content(
            client,
            project.as_ptr(),
            resource.as_ptr(),
            missing.as_ptr(),
            file_mode.as_ptr(),
            &mut err,
        )
        .is_null());
        assert_eq!(take_error_code(err), FfiErrorCode::MissingFile);

        tx_client_free(client);
    }

    #[test]
    fn build_create_language_with_skip_flag() {
        let client = new_client();
        let (project, code) = (cstr("p"), cstr("en_US"));
        let users = [cstr("mbabker"), cstr("other")];
        let ptrs: Vec<*const c_char> = users.iter().map(|u| u.as_ptr()).collect();
        let options = cstr(r#"{"list":"test@example.com"}"#);

        let req = tx_build_create_language(
            client,
            project.as_ptr(),
            code.as_ptr(),
            ptrs.as_ptr(),
            ptrs.len() as u32,
            options.as_ptr(),
            true,
            null_mut(),
        );
        assert!(!req.is_null());

        let req_ref = unsafe { &*req };
        assert_eq!(
            url_of(req_ref),
            "http://localhost:3000/api/2/project/p/languages/?skip_invalid_username"
        );
        let body: serde_json::Value = serde_json::from_slice(&body_of(req_ref)).unwrap();
        assert_eq!(body["language_code"], "en_US");
        assert_eq!(body["coordinators"], serde_json::json!(["mbabker", "other"]));
        assert_eq!(body["list"], "test@example.com");

        tx_free_request(req);
        tx_client_free(client);
    }

    #[test]
    fn build_create_language_without_coordinators_is_invalid_argument() {
        let client = new_client();
        let (project, code) = (cstr("p"), cstr("en_US"));
        let mut err = null_mut();
        let req = tx_build_create_language(
            client,
            project.as_ptr(),
            code.as_ptr(),
            null(),
            0,
            null(),
            false,
            &mut err,
        );
        assert!(req.is_null());
        assert_eq!(take_error_code(err), FfiErrorCode::InvalidArgument);
        tx_client_free(client);
    }

    #[test]
    fn build_update_team_error_kinds() {
        let client = new_client();
        let (project, code) = (cstr("p"), cstr("en_US"));

        let mut err = null_mut();
        let req = tx_build_update_team(
            client,
            project.as_ptr(),
            code.as_ptr(),
            FfiTeamRole::Reviewers,
            null(),
            0,
            false,
            &mut err,
        );
        assert!(req.is_null());
        assert_eq!(take_error_code(err), FfiErrorCode::InvalidArgument);

        let mut err = null_mut();
        let req = tx_build_update_team(
            client,
            project.as_ptr(),
            code.as_ptr(),
            FfiTeamRole::Reviewers,
            null(),
            2,
            false,
            &mut err,
        );
        assert!(req.is_null());
        assert_eq!(take_error_code(err), FfiErrorCode::NullArg);

        tx_client_free(client);
    }

    #[test]
    fn build_team_requests_use_role_path() {
        let client = new_client();
        let (project, code) = (cstr("p"), cstr("en_US"));

        let get = tx_build_get_team(
            client,
            project.as_ptr(),
            code.as_ptr(),
            FfiTeamRole::Reviewers,
            null_mut(),
        );
        assert_eq!(
            url_of(unsafe { &*get }),
            "http://localhost:3000/api/2/project/p/language/en_US/reviewers/"
        );
        tx_free_request(get);

        let users = [cstr("alice")];
        let ptrs: Vec<*const c_char> = users.iter().map(|u| u.as_ptr()).collect();
        let put = tx_build_update_team(
            client,
            project.as_ptr(),
            code.as_ptr(),
            FfiTeamRole::Translators,
            ptrs.as_ptr(),
            1,
            false,
            null_mut(),
        );
        let put_ref = unsafe { &*put };
        assert_eq!(put_ref.method, FfiHttpMethod::Put);
        assert_eq!(put_ref.expected_status, 200);
        let body: serde_json::Value = serde_json::from_slice(&body_of(put_ref)).unwrap();
        assert_eq!(body, serde_json::json!(["alice"]));
        tx_free_request(put);

        tx_client_free(client);
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn lengths_beyond_u32_are_rejected() {
        assert_eq!(c_len(u32::MAX as usize, "body").unwrap(), u32::MAX);
        let err = c_len(u32::MAX as usize + 1, "request body").unwrap_err();
        assert!(matches!(err, TransifexError::InvalidArgument(_)));
    }

    #[test]
    fn parse_created_answer_as_json_string() {
        let client = new_client();
        let (name, slug, desc, lang) = (cstr("Name"), cstr("babdev"), cstr("desc"), cstr("en"));
        let req = tx_build_create_project(
            client,
            name.as_ptr(),
            slug.as_ptr(),
            desc.as_ptr(),
            lang.as_ptr(),
            null_mut(),
        );

        let result = parse(req, 201, "Created");
        let result_ref = unsafe { &*result };
        assert_eq!(result_ref.error_code, FfiErrorCode::Ok);
        assert!(result_ref.error_message.is_null());
        let json = unsafe { CStr::from_ptr(result_ref.json) }.to_str().unwrap();
        assert_eq!(json, "\"Created\"");

        tx_free_result(result);
        tx_free_request(req);
        tx_client_free(client);
    }

    #[test]
    fn parse_unexpected_status_is_api_error() {
        let client = new_client();
        let slug = cstr("missing");
        let req = tx_build_get_project(client, slug.as_ptr(), false, null_mut());

        let result = parse(req, 404, "Not Found");
        let result_ref = unsafe { &*result };
        assert_eq!(result_ref.error_code, FfiErrorCode::Api);
        assert_eq!(result_ref.http_status, 404);
        assert!(result_ref.json.is_null());
        assert!(!result_ref.error_message.is_null());

        tx_free_result(result);
        tx_free_request(req);
        tx_client_free(client);
    }

    #[test]
    fn parse_empty_delete_answer_is_null_json() {
        let client = new_client();
        let slug = cstr("babdev");
        let req = tx_build_delete_project(client, slug.as_ptr(), null_mut());

        let result = parse(req, 204, "");
        let result_ref = unsafe { &*result };
        assert_eq!(result_ref.error_code, FfiErrorCode::Ok);
        let json = unsafe { CStr::from_ptr(result_ref.json) }.to_str().unwrap();
        assert_eq!(json, "null");

        tx_free_result(result);
        tx_free_request(req);
        tx_client_free(client);
    }

    #[test]
    fn parse_non_utf8_body_is_deserialization_error() {
        let client = new_client();
        let req = tx_build_get_projects(client, null_mut());
        let body = CString::new(vec![b'[', 0xff, b']']).unwrap();
        let resp = FfiHttpResponse {
            status: 200,
            content_type: null(),
            body: body.as_ptr(),
        };

        let result = tx_parse_response(req, &resp);
        assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::Deserialization);

        tx_free_result(result);
        tx_free_request(req);
        tx_client_free(client);
    }

    #[test]
    fn parse_malformed_json_with_json_content_type_fails() {
        let client = new_client();
        let req = tx_build_get_projects(client, null_mut());
        let body = cstr("[{");
        let content_type = cstr("application/json");
        let resp = FfiHttpResponse {
            status: 200,
            content_type: content_type.as_ptr(),
            body: body.as_ptr(),
        };

        let result = tx_parse_response(req, &resp);
        assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::Deserialization);

        tx_free_result(result);
        tx_free_request(req);
        tx_client_free(client);
    }

    #[test]
    fn parse_null_args_report_null_arg() {
        let result = tx_parse_response(null(), null());
        assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::NullArg);
        tx_free_result(result);
    }

    #[test]
    fn free_functions_accept_null() {
        tx_free_request(null_mut());
        tx_free_result(null_mut());
        tx_free_string(null_mut());
    }
}
