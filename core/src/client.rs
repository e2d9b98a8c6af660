//! Entry point tying configuration to the resource facades.
//!
//! # Design
//! `TransifexClient` holds only a `RequestBuilder` and carries no mutable
//! state between calls, so it is `Send + Sync` and cheap to clone. Facades
//! borrow the builder and return `ApiCall`s; executing them is left to the
//! caller or to an `HttpTransport`.

use crate::config::ClientConfig;
use crate::error::TransifexError;
use crate::languages::LanguagesResource;
use crate::projects::ProjectsResource;
use crate::request::RequestBuilder;
use crate::resources::ResourcesResource;

/// Synchronous, stateless client for the Transifex API.
#[derive(Debug, Clone)]
pub struct TransifexClient {
    builder: RequestBuilder,
}

impl TransifexClient {
    pub fn new(config: ClientConfig) -> Result<Self, TransifexError> {
        Ok(Self {
            builder: RequestBuilder::new(&config)?,
        })
    }

    /// Anonymous client against `base_url` with the default API path.
    pub fn with_base_url(base_url: &str) -> Result<Self, TransifexError> {
        Self::new(ClientConfig::new(base_url))
    }

    pub fn from_env() -> Result<Self, TransifexError> {
        Self::new(ClientConfig::from_env())
    }

    pub fn projects(&self) -> ProjectsResource<'_> {
        ProjectsResource::new(&self.builder)
    }

    pub fn resources(&self) -> ResourcesResource<'_> {
        ResourcesResource::new(&self.builder)
    }

    pub fn languages(&self) -> LanguagesResource<'_> {
        LanguagesResource::new(&self.builder)
    }

    pub fn request_builder(&self) -> &RequestBuilder {
        &self.builder
    }
}
