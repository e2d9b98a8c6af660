//! Request payloads and per-endpoint option structs.
//!
//! # Design
//! Options that the API accepts as loose key/value bags are modelled as
//! structs with named optional fields. They deserialize with
//! `deny_unknown_fields`, so a misspelt key coming from JSON (e.g. through
//! the C ABI) is an error instead of being silently dropped.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TransifexError;

/// Request payload for creating a project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateProject {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub source_language_code: String,
}

/// Fields to change on an existing project. Omitted fields are left as they
/// are on the server.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub long_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_language_code: Option<String>,
}

impl ProjectUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Where the content of a resource comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSource {
    Inline(String),
    File(PathBuf),
}

impl ContentSource {
    pub fn inline(content: impl Into<String>) -> Self {
        ContentSource::Inline(content.into())
    }

    /// A file source. Fails with `MissingFile` when `path` does not exist.
    pub fn file(path: impl Into<PathBuf>) -> Result<Self, TransifexError> {
        let path = path.into();
        if !path.is_file() {
            return Err(TransifexError::MissingFile(path));
        }
        Ok(ContentSource::File(path))
    }

    /// Interpret `content` according to `mode`.
    pub fn from_mode(content: &str, mode: ContentMode) -> Result<Self, TransifexError> {
        match mode {
            ContentMode::String => Ok(ContentSource::inline(content)),
            ContentMode::File => ContentSource::file(content),
        }
    }
}

/// How `update_resource_content` interprets its `content` argument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContentMode {
    /// `content` is the resource text itself.
    #[default]
    String,
    /// `content` is a path to a file holding the resource text.
    File,
}

impl FromStr for ContentMode {
    type Err = TransifexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(ContentMode::String),
            "file" => Ok(ContentMode::File),
            other => Err(TransifexError::InvalidFileType(format!(
                "the {other} type is invalid"
            ))),
        }
    }
}

impl fmt::Display for ContentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ContentMode::String => "string",
            ContentMode::File => "file",
        })
    }
}

/// Optional settings for `create_resource`.
///
/// Exactly one of `content` and `file` must be set.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ResourceOptions {
    pub content: Option<String>,
    pub file: Option<PathBuf>,
    pub accept_translations: Option<bool>,
    pub category: Option<String>,
    pub priority: Option<u8>,
}

impl ResourceOptions {
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn with_file(path: impl AsRef<Path>) -> Self {
        Self {
            file: Some(path.as_ref().to_path_buf()),
            ..Self::default()
        }
    }

    /// Resolve the content selector.
    ///
    /// Both or neither of `content` and `file` is an `InvalidFileType`
    /// error; a `file` that does not exist is `MissingFile`.
    pub fn content_source(&self) -> Result<ContentSource, TransifexError> {
        match (&self.content, &self.file) {
            (Some(content), None) => Ok(ContentSource::inline(content.clone())),
            (None, Some(path)) => ContentSource::file(path.clone()),
            (Some(_), Some(_)) => Err(TransifexError::InvalidFileType(
                "content and file are mutually exclusive".to_string(),
            )),
            (None, None) => Err(TransifexError::InvalidFileType(
                "either content or file must be provided".to_string(),
            )),
        }
    }
}

/// Optional team settings for `create_language` and `update_language`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LanguageOptions {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub translators: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reviewers: Vec<String>,
    /// Mailing list address for the language team.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<String>,
}

/// A language team role, each backed by its own sub-resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeamRole {
    Translators,
    Reviewers,
    Coordinators,
}

impl TeamRole {
    pub const ALL: [TeamRole; 3] = [
        TeamRole::Translators,
        TeamRole::Reviewers,
        TeamRole::Coordinators,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TeamRole::Translators => "translators",
            TeamRole::Reviewers => "reviewers",
            TeamRole::Coordinators => "coordinators",
        }
    }
}

impl fmt::Display for TeamRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateResourcePayload<'a> {
    pub slug: &'a str,
    pub name: &'a str,
    pub i18n_type: &'a str,
    pub content: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept_translations: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ContentPayload<'a> {
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct LanguagePayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_code: Option<&'a str>,
    pub coordinators: Vec<String>,
    #[serde(flatten)]
    pub options: &'a LanguageOptions,
}
