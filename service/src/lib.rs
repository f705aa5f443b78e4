//! Service contains the client-side business logic of the application.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod query;
pub mod read;

use std::time::Duration;

use smart_default::SmartDefault;

#[cfg(doc)]
use infra::Backend;

pub use self::{command::Command, query::Query};

/// [`Service`] configuration.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// Margin before the session expiry at which a session refresh becomes
    /// due.
    #[default(Duration::from_secs(60))]
    pub session_refresh_margin: Duration,
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<Api> {
    /// Configuration of this [`Service`].
    config: Config,

    /// [`Backend`] API this [`Service`] operates on.
    api: Api,
}

impl<Api> Service<Api> {
    /// Creates a new [`Service`] with the provided parameters.
    #[must_use]
    pub fn new(config: Config, api: Api) -> Self {
        Self { config, api }
    }

    /// Returns [`Config`] of this [`Service`].
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns the [`Backend`] API of this [`Service`].
    #[must_use]
    pub fn api(&self) -> &Api {
        &self.api
    }
}
