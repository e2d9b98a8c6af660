//! Project endpoints.

use serde_json::Value;

use crate::error::TransifexError;
use crate::request::{QueryFlag, RequestBuilder};
use crate::response::ApiCall;
use crate::types::{CreateProject, ProjectUpdate};

/// Operations on projects.
#[derive(Debug, Clone, Copy)]
pub struct ProjectsResource<'c> {
    builder: &'c RequestBuilder,
}

impl<'c> ProjectsResource<'c> {
    pub(crate) fn new(builder: &'c RequestBuilder) -> Self {
        Self { builder }
    }

    /// Create a project. Succeeds with 201.
    pub fn create_project(
        &self,
        name: &str,
        slug: &str,
        description: &str,
        source_language: &str,
    ) -> Result<ApiCall<Value>, TransifexError> {
        let payload = CreateProject {
            name: name.to_string(),
            slug: slug.to_string(),
            description: description.to_string(),
            source_language_code: source_language.to_string(),
        };
        let request = self.builder.post_json("/projects/", &[], &payload)?;
        Ok(ApiCall::new(request, 201))
    }

    pub fn get_project(&self, slug: &str, details: bool) -> ApiCall<Value> {
        let path = format!("/project/{slug}/");
        let flags = QueryFlag::Details.when(details);
        ApiCall::new(self.builder.get(&path, flags.as_slice()), 200)
    }

    /// Projects the authenticated user is part of.
    pub fn get_projects(&self) -> ApiCall<Value> {
        ApiCall::new(self.builder.get("/projects/", &[]), 200)
    }

    /// Change the given fields of a project. An empty update is rejected.
    pub fn update_project(
        &self,
        slug: &str,
        update: &ProjectUpdate,
    ) -> Result<ApiCall<Value>, TransifexError> {
        if update.is_empty() {
            return Err(TransifexError::InvalidArgument(
                "a project update needs at least one field".to_string(),
            ));
        }
        let path = format!("/project/{slug}/");
        let request = self.builder.put_json(&path, &[], update)?;
        Ok(ApiCall::new(request, 200))
    }

    pub fn delete_project(&self, slug: &str) -> ApiCall<()> {
        let path = format!("/project/{slug}");
        ApiCall::new(self.builder.delete(&path), 204)
    }
}
