//! Synchronous client core for the Transifex translation-management API.
//!
//! # Overview
//! Facades for projects, resources and languages turn method calls into
//! `HttpRequest` values and validate the matching `HttpResponse` values.
//! The round-trip itself happens either in the host (host-does-IO) or
//! through an injected [`HttpTransport`].
//!
//! # Design
//! - `TransifexClient` is stateless; it holds only a `RequestBuilder`.
//! - Every operation returns an [`ApiCall`] that knows its expected status,
//!   so `build` and `parse` cannot drift apart.
//! - Input validation (missing upload files, empty teams, bad content modes)
//!   happens while building, before any I/O.
//! - `UreqTransport` is behind the `ureq-transport` feature so the C ABI can
//!   link the core without an HTTP stack.
//!
//! ```no_run
//! use transifex_core::{TransifexClient, UreqTransport};
//!
//! let client = TransifexClient::from_env()?;
//! let transport = UreqTransport::default();
//! let projects = client.projects().get_projects().send(&transport)?;
//! println!("{projects}");
//! # Ok::<(), transifex_core::TransifexError>(())
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod languages;
mod multipart;
pub mod projects;
pub mod request;
pub mod resources;
pub mod response;
#[cfg(feature = "ureq-transport")]
pub mod transport;
pub mod types;

pub use client::TransifexClient;
pub use config::ClientConfig;
pub use error::TransifexError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
pub use languages::LanguagesResource;
pub use projects::ProjectsResource;
pub use request::{QueryFlag, RequestBuilder};
pub use resources::ResourcesResource;
pub use response::{ApiCall, FromResponse};
#[cfg(feature = "ureq-transport")]
pub use transport::UreqTransport;
pub use types::{
    ContentMode, ContentSource, CreateProject, LanguageOptions, ProjectUpdate, ResourceOptions,
    TeamRole,
};
