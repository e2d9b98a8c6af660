//! Resource endpoints.
//!
//! Inline content travels as JSON. File content is read from disk and
//! uploaded as `multipart/form-data` with a `content` file part.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::error::TransifexError;
use crate::multipart::MultipartForm;
use crate::request::{QueryFlag, RequestBuilder};
use crate::response::ApiCall;
use crate::types::{ContentMode, ContentPayload, ContentSource, CreateResourcePayload, ResourceOptions};

/// Operations on the translatable resources of a project.
#[derive(Debug, Clone, Copy)]
pub struct ResourcesResource<'c> {
    builder: &'c RequestBuilder,
}

impl<'c> ResourcesResource<'c> {
    pub(crate) fn new(builder: &'c RequestBuilder) -> Self {
        Self { builder }
    }

    /// Create a resource in `project`. Succeeds with 201.
    ///
    /// `options` must carry exactly one of `content` or `file`.
    pub fn create_resource(
        &self,
        project: &str,
        name: &str,
        slug: &str,
        i18n_type: &str,
        options: &ResourceOptions,
    ) -> Result<ApiCall<Value>, TransifexError> {
        let path = format!("/project/{project}/resources/");
        let request = match options.content_source()? {
            ContentSource::Inline(content) => {
                let payload = CreateResourcePayload {
                    slug,
                    name,
                    i18n_type,
                    content: &content,
                    accept_translations: options.accept_translations,
                    category: options.category.as_deref(),
                    priority: options.priority,
                };
                self.builder.post_json(&path, &[], &payload)?
            }
            ContentSource::File(file) => {
                let mut form = MultipartForm::new()
                    .text("slug", slug)
                    .text("name", name)
                    .text("i18n_type", i18n_type);
                if let Some(accept) = options.accept_translations {
                    form = form.text("accept_translations", accept.to_string());
                }
                if let Some(category) = &options.category {
                    form = form.text("category", category.as_str());
                }
                if let Some(priority) = options.priority {
                    form = form.text("priority", priority.to_string());
                }
                let form = attach_file(form, &file)?;
                self.builder.post_multipart(&path, form)
            }
        };
        Ok(ApiCall::new(request, 201))
    }

    pub fn get_resource(&self, project: &str, resource: &str, details: bool) -> ApiCall<Value> {
        let path = format!("/project/{project}/resource/{resource}/");
        let flags = QueryFlag::Details.when(details);
        ApiCall::new(self.builder.get(&path, flags.as_slice()), 200)
    }

    pub fn get_resource_content(&self, project: &str, resource: &str) -> ApiCall<Value> {
        let path = format!("/project/{project}/resource/{resource}/content/");
        ApiCall::new(self.builder.get(&path, &[]), 200)
    }

    pub fn get_resources(&self, project: &str) -> ApiCall<Value> {
        let path = format!("/project/{project}/resources");
        ApiCall::new(self.builder.get(&path, &[]), 200)
    }

    /// Replace the source content of a resource.
    ///
    /// With `ContentMode::File`, `content` is a path that must exist.
    pub fn update_resource_content(
        &self,
        project: &str,
        resource: &str,
        content: &str,
        mode: ContentMode,
    ) -> Result<ApiCall<Value>, TransifexError> {
        let path = format!("/project/{project}/resource/{resource}/content/");
        let request = match ContentSource::from_mode(content, mode)? {
            ContentSource::Inline(content) => {
                self.builder
                    .put_json(&path, &[], &ContentPayload { content: &content })?
            }
            ContentSource::File(file) => {
                let form = attach_file(MultipartForm::new(), &file)?;
                self.builder.put_multipart(&path, form)
            }
        };
        Ok(ApiCall::new(request, 200))
    }

    pub fn delete_resource(&self, project: &str, resource: &str) -> ApiCall<()> {
        let path = format!("/project/{project}/resource/{resource}");
        ApiCall::new(self.builder.delete(&path), 204)
    }
}

fn attach_file(form: MultipartForm, path: &Path) -> Result<MultipartForm, TransifexError> {
    let data = std::fs::read(path).map_err(|source| TransifexError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "content".to_string());
    debug!(file = %path.display(), bytes = data.len(), "attaching upload");
    Ok(form.file("content", &filename, data))
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;
    use crate::config::ClientConfig;
    use crate::http::{HttpMethod, HttpResponse};

    const BASE: &str = "http://localhost:3000/api/2";

    fn builder() -> RequestBuilder {
        RequestBuilder::new(&ClientConfig::new("http://localhost:3000")).unwrap()
    }

    fn source_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        write!(file, "TEST=\"Test\"").unwrap();
        file
    }

    fn full_options() -> ResourceOptions {
        ResourceOptions {
            accept_translations: Some(true),
            category: Some("whatever".to_string()),
            priority: Some(3),
            ..ResourceOptions::default()
        }
    }

    #[test]
    fn create_resource_with_inline_content_posts_json() {
        let builder = builder();
        let options = ResourceOptions {
            content: Some("Test=\"Test\"".to_string()),
            ..full_options()
        };
        let call = ResourcesResource::new(&builder)
            .create_resource("babdev-transifex", "BabDev Transifex Data", "babdev-transifex", "INI", &options)
            .unwrap();
        let req = call.request();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, format!("{BASE}/project/babdev-transifex/resources/"));
        assert_eq!(req.header("content-type"), Some("application/json"));
        let body: Value = serde_json::from_str(req.body_text().unwrap()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "slug": "babdev-transifex",
                "name": "BabDev Transifex Data",
                "i18n_type": "INI",
                "content": "Test=\"Test\"",
                "accept_translations": true,
                "category": "whatever",
                "priority": 3
            })
        );
        assert_eq!(call.expected_status(), 201);
    }

    #[test]
    fn create_resource_with_file_uploads_multipart() {
        let builder = builder();
        let file = source_file();
        let options = ResourceOptions {
            file: Some(file.path().to_path_buf()),
            ..full_options()
        };
        let call = ResourcesResource::new(&builder)
            .create_resource("babdev-transifex", "BabDev Transifex Data", "babdev-transifex", "INI", &options)
            .unwrap();
        let req = call.request();
        assert_eq!(req.method, HttpMethod::Post);
        assert!(req
            .header("content-type")
            .unwrap()
            .starts_with("multipart/form-data; boundary="));
        let body = req.body_text().unwrap();
        assert!(body.contains("name=\"i18n_type\"\r\n\r\nINI\r\n"));
        assert!(body.contains("name=\"accept_translations\"\r\n\r\ntrue\r\n"));
        assert!(body.contains("name=\"priority\"\r\n\r\n3\r\n"));
        assert!(body.contains("name=\"content\"; filename="));
        assert!(body.contains("TEST=\"Test\""));
    }

    #[test]
    fn create_resource_with_missing_file_fails() {
        let builder = builder();
        let options = ResourceOptions::with_file("/stubs/does-not-exist.ini");
        let err = ResourcesResource::new(&builder)
            .create_resource("babdev-transifex", "Data", "babdev-transifex", "INI", &options)
            .unwrap_err();
        assert!(matches!(err, TransifexError::MissingFile(_)));
    }

    #[test]
    fn create_resource_without_content_fails() {
        let builder = builder();
        let err = ResourcesResource::new(&builder)
            .create_resource("babdev-transifex", "Data", "babdev-transifex", "INI", &full_options())
            .unwrap_err();
        assert!(matches!(err, TransifexError::InvalidFileType(_)));
    }

    #[test]
    fn create_resource_failure_status_is_api_error() {
        let builder = builder();
        let call = ResourcesResource::new(&builder)
            .create_resource(
                "babdev-transifex",
                "Data",
                "babdev-transifex",
                "INI",
                &ResourceOptions::with_content("Test=\"Test\""),
            )
            .unwrap();
        let err = call.parse(HttpResponse::new(500, "")).unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn get_resource_with_details() {
        let builder = builder();
        let call = ResourcesResource::new(&builder).get_resource("babdev", "babdev-transifex", true);
        assert_eq!(
            call.request().path(),
            format!("{BASE}/project/babdev/resource/babdev-transifex/")
        );
        assert_eq!(call.request().query(), "details");
    }

    #[test]
    fn get_resource_content_path() {
        let builder = builder();
        let call = ResourcesResource::new(&builder).get_resource_content("babdev", "babdev-transifex");
        assert_eq!(
            call.request().url,
            format!("{BASE}/project/babdev/resource/babdev-transifex/content/")
        );
        let content = call
            .parse(HttpResponse::new(200, r#"{"content":"TEST=\"Test\"","mimetype":"text/plain"}"#))
            .unwrap();
        assert_eq!(content["mimetype"], "text/plain");
    }

    #[test]
    fn get_resources_path_has_no_trailing_slash() {
        let builder = builder();
        let call = ResourcesResource::new(&builder).get_resources("babdev");
        assert_eq!(call.request().url, format!("{BASE}/project/babdev/resources"));
    }

    #[test]
    fn update_resource_content_from_string() {
        let builder = builder();
        let call = ResourcesResource::new(&builder)
            .update_resource_content("babdev", "babdev-transifex", "TEST=\"Test\"", ContentMode::String)
            .unwrap();
        let req = call.request();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(
            req.url,
            format!("{BASE}/project/babdev/resource/babdev-transifex/content/")
        );
        assert_eq!(req.body_text(), Some(r#"{"content":"TEST=\"Test\""}"#));
        assert_eq!(call.expected_status(), 200);
    }

    #[test]
    fn update_resource_content_from_file() {
        let builder = builder();
        let file = source_file();
        let call = ResourcesResource::new(&builder)
            .update_resource_content(
                "babdev",
                "babdev-transifex",
                file.path().to_str().unwrap(),
                ContentMode::File,
            )
            .unwrap();
        let req = call.request();
        assert_eq!(req.method, HttpMethod::Put);
        assert!(req
            .header("content-type")
            .unwrap()
            .starts_with("multipart/form-data"));
        assert!(req.body_text().unwrap().contains("TEST=\"Test\""));
    }

    #[test]
    fn update_resource_content_with_missing_file_fails() {
        let builder = builder();
        let err = ResourcesResource::new(&builder)
            .update_resource_content("babdev", "babdev-transifex", "/stubs/does-not-exist.ini", ContentMode::File)
            .unwrap_err();
        assert!(matches!(err, TransifexError::MissingFile(_)));
    }

    #[test]
    fn delete_resource_accepts_only_204() {
        let builder = builder();
        let call = ResourcesResource::new(&builder).delete_resource("p", "r");
        assert_eq!(call.request().method, HttpMethod::Delete);
        assert_eq!(call.request().url, format!("{BASE}/project/p/resource/r"));
        assert!(call.parse(HttpResponse::new(204, "")).is_ok());
        assert!(call.parse(HttpResponse::new(200, "")).is_err());
        assert!(call.parse(HttpResponse::new(500, "")).is_err());
    }
}
