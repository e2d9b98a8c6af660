//! Language and language-team endpoints.

use serde_json::Value;

use crate::error::TransifexError;
use crate::request::{QueryFlag, RequestBuilder};
use crate::response::ApiCall;
use crate::types::{LanguageOptions, LanguagePayload, TeamRole};

/// Operations on the languages of a project and their teams.
#[derive(Debug, Clone, Copy)]
pub struct LanguagesResource<'c> {
    builder: &'c RequestBuilder,
}

impl<'c> LanguagesResource<'c> {
    pub(crate) fn new(builder: &'c RequestBuilder) -> Self {
        Self { builder }
    }

    /// Add `code` to `project`. `coordinators` must not be empty.
    ///
    /// With `skip_invalid` the server drops unknown usernames instead of
    /// rejecting the request.
    pub fn create_language<S: AsRef<str>>(
        &self,
        project: &str,
        code: &str,
        coordinators: &[S],
        options: &LanguageOptions,
        skip_invalid: bool,
    ) -> Result<ApiCall<Value>, TransifexError> {
        let payload = LanguagePayload {
            language_code: Some(code),
            coordinators: require_users(coordinators, "coordinators")?,
            options,
        };
        let path = format!("/project/{project}/languages/");
        let flags = QueryFlag::SkipInvalidUsername.when(skip_invalid);
        let request = self.builder.post_json(&path, flags.as_slice(), &payload)?;
        Ok(ApiCall::new(request, 201))
    }

    pub fn get_language(&self, project: &str, code: &str, details: bool) -> ApiCall<Value> {
        let path = format!("/project/{project}/language/{code}/");
        let flags = QueryFlag::Details.when(details);
        ApiCall::new(self.builder.get(&path, flags.as_slice()), 200)
    }

    pub fn get_languages(&self, project: &str) -> ApiCall<Value> {
        let path = format!("/project/{project}/languages/");
        ApiCall::new(self.builder.get(&path, &[]), 200)
    }

    /// Replace the teams of a language. `coordinators` must not be empty.
    pub fn update_language<S: AsRef<str>>(
        &self,
        project: &str,
        code: &str,
        coordinators: &[S],
        options: &LanguageOptions,
    ) -> Result<ApiCall<Value>, TransifexError> {
        let payload = LanguagePayload {
            language_code: None,
            coordinators: require_users(coordinators, "coordinators")?,
            options,
        };
        let path = format!("/project/{project}/language/{code}/");
        let request = self.builder.put_json(&path, &[], &payload)?;
        Ok(ApiCall::new(request, 200))
    }

    pub fn delete_language(&self, project: &str, code: &str) -> ApiCall<()> {
        let path = format!("/project/{project}/language/{code}/");
        ApiCall::new(self.builder.delete(&path), 204)
    }

    pub fn get_coordinators(&self, project: &str, code: &str) -> ApiCall<Value> {
        self.get_team(project, code, TeamRole::Coordinators)
    }

    pub fn get_reviewers(&self, project: &str, code: &str) -> ApiCall<Value> {
        self.get_team(project, code, TeamRole::Reviewers)
    }

    pub fn get_translators(&self, project: &str, code: &str) -> ApiCall<Value> {
        self.get_team(project, code, TeamRole::Translators)
    }

    pub fn update_coordinators<S: AsRef<str>>(
        &self,
        project: &str,
        code: &str,
        users: &[S],
        skip_invalid: bool,
    ) -> Result<ApiCall<Value>, TransifexError> {
        self.update_team(project, code, TeamRole::Coordinators, users, skip_invalid)
    }

    pub fn update_reviewers<S: AsRef<str>>(
        &self,
        project: &str,
        code: &str,
        users: &[S],
        skip_invalid: bool,
    ) -> Result<ApiCall<Value>, TransifexError> {
        self.update_team(project, code, TeamRole::Reviewers, users, skip_invalid)
    }

    pub fn update_translators<S: AsRef<str>>(
        &self,
        project: &str,
        code: &str,
        users: &[S],
        skip_invalid: bool,
    ) -> Result<ApiCall<Value>, TransifexError> {
        self.update_team(project, code, TeamRole::Translators, users, skip_invalid)
    }

    /// Members of one team of a language.
    pub fn get_team(&self, project: &str, code: &str, role: TeamRole) -> ApiCall<Value> {
        ApiCall::new(self.builder.get(&team_path(project, code, role), &[]), 200)
    }

    /// Replace the members of one team of a language. `users` must not be
    /// empty.
    pub fn update_team<S: AsRef<str>>(
        &self,
        project: &str,
        code: &str,
        role: TeamRole,
        users: &[S],
        skip_invalid: bool,
    ) -> Result<ApiCall<Value>, TransifexError> {
        let users = require_users(users, role.as_str())?;
        let flags = QueryFlag::SkipInvalidUsername.when(skip_invalid);
        let request =
            self.builder
                .put_json(&team_path(project, code, role), flags.as_slice(), &users)?;
        Ok(ApiCall::new(request, 200))
    }
}

fn team_path(project: &str, code: &str, role: TeamRole) -> String {
    format!("/project/{project}/language/{code}/{role}/")
}

fn require_users<S: AsRef<str>>(users: &[S], role: &str) -> Result<Vec<String>, TransifexError> {
    if users.is_empty() {
        return Err(TransifexError::InvalidArgument(format!(
            "{role} must contain at least one user"
        )));
    }
    Ok(users.iter().map(|user| user.as_ref().to_string()).collect())
}
