//! REST [`Backend`] implementation.

mod impls;

use std::{collections::BTreeMap, time::Duration};

use derive_more::{Display, Error as StdError, From};
use http::StatusCode;
use serde::{de::DeserializeOwned, Serialize};
use tracerr::Traced;
use tracing as log;
use url::Url;

#[cfg(doc)]
use crate::infra::Backend;
use crate::infra::backend::{self, Auth, Violation};

/// REST [`Backend`] client.
#[derive(Clone, Debug)]
pub struct Rest {
    /// Base [`Url`] request paths are resolved against.
    base_url: Url,

    /// Underlying HTTP client.
    client: reqwest::Client,
}

/// [`Rest`] client configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Base [`Url`] of the API.
    pub base_url: Url,

    /// Timeout of a single request.
    pub timeout: Duration,
}

impl Rest {
    /// Creates a new [`Rest`] client with the provided [`Config`].
    ///
    /// # Errors
    ///
    /// If the underlying HTTP client cannot be initialized.
    pub fn new(conf: &Config) -> Result<Self, Traced<backend::Error>> {
        let client = reqwest::Client::builder()
            .timeout(conf.timeout)
            .build()
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;

        let mut base_url = conf.base_url.clone();
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        Ok(Self { base_url, client })
    }

    /// Resolves the provided `path` against the base [`Url`].
    fn endpoint(&self, path: &str) -> Result<Url, Traced<backend::Error>> {
        self.base_url
            .join(path)
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)
    }

    /// Fetches a `T` from the provided `url`.
    async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        auth: Auth,
    ) -> Result<T, Traced<backend::Error>> {
        self.send(self.client.get(url), auth).await
    }

    /// Creates a `T` on the provided `url` out of the provided `body`.
    async fn post<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
        auth: Auth,
    ) -> Result<T, Traced<backend::Error>> {
        self.send(self.client.post(url).json(body), auth).await
    }

    /// Replaces the entity behind the provided `url` with the provided
    /// `body`, returning its new representation.
    async fn put<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
        auth: Auth,
    ) -> Result<T, Traced<backend::Error>> {
        self.send(self.client.put(url).json(body), auth).await
    }

    /// Partially updates the entity behind the provided `url` with the
    /// provided `body`, returning its new representation.
    async fn patch<T: DeserializeOwned>(
        &self,
        url: Url,
        body: &impl Serialize,
        auth: Auth,
    ) -> Result<T, Traced<backend::Error>> {
        self.send(self.client.patch(url).json(body), auth).await
    }

    /// Deletes the entity behind the provided `url`.
    async fn delete(
        &self,
        url: Url,
        auth: Auth,
    ) -> Result<(), Traced<backend::Error>> {
        self.request(self.client.delete(url), auth).await.map(drop)
    }

    /// Sends the provided `request` and decodes a `T` from the response
    /// body.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        auth: Auth,
    ) -> Result<T, Traced<backend::Error>> {
        self.request(request, auth)
            .await?
            .json()
            .await
            .map_err(|e| tracerr::new!(Error::Decode(e)))
            .map_err(tracerr::map_from)
    }

    /// Sends the provided `request` with the provided [`Auth`] credentials
    /// attached, verifying the response status.
    async fn request(
        &self,
        request: reqwest::RequestBuilder,
        auth: Auth,
    ) -> Result<reqwest::Response, Traced<backend::Error>> {
        let request = Self::authorize(request, auth)
            .build()
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;

        log::debug!("{} {}", request.method(), request.url());

        let response = self
            .client
            .execute(request)
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;

        Self::check(response).await.map_err(tracerr::map_from)
    }

    /// Attaches the provided [`Auth`] credentials to the `request`.
    fn authorize(
        request: reqwest::RequestBuilder,
        auth: Auth,
    ) -> reqwest::RequestBuilder {
        match auth {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Verifies the HTTP status of the provided `response`, reading the
    /// reported [`Violation`]s out of a [`StatusCode::BAD_REQUEST`] one.
    async fn check(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, Traced<Error>> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        log::warn!("{status} HTTP status of `{}` response", response.url());

        Err(match status {
            StatusCode::BAD_REQUEST => {
                let fields = response
                    .json()
                    .await
                    .map_err(|e| tracerr::new!(Error::Decode(e)))?;
                tracerr::new!(Error::Validation(violations_of(fields)))
            }
            StatusCode::UNAUTHORIZED => tracerr::new!(Error::Unauthorized),
            StatusCode::FORBIDDEN => tracerr::new!(Error::Forbidden),
            StatusCode::NOT_FOUND => tracerr::new!(Error::NotFound),
            _ => tracerr::new!(Error::Status(status)),
        })
    }
}

/// Flattens the per-field messages of an API error body into [`Violation`]s.
///
/// [`BTreeMap`] keeps the output ordered by field name, no matter how the
/// body orders them.
fn violations_of(fields: BTreeMap<String, Vec<String>>) -> Vec<Violation> {
    fields
        .into_iter()
        .flat_map(|(field, messages)| {
            messages.into_iter().map(move |message| Violation {
                field: field.clone(),
                message,
            })
        })
        .collect()
}

/// REST [`Backend`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Failed to perform an HTTP request.
    #[display("Failed to perform an HTTP request: {_0}")]
    Http(reqwest::Error),

    /// Failed to decode a response body.
    #[display("Failed to decode a response body: {_0}")]
    #[from(ignore)]
    Decode(reqwest::Error),

    /// Failed to form a request [`Url`].
    #[display("Failed to form a request URL: {_0}")]
    Url(url::ParseError),

    /// Operation lacks valid [`Auth`] credentials.
    #[display("Operation lacks valid `Auth` credentials")]
    Unauthorized,

    /// Operation is not permitted for its [`Auth`] credentials.
    #[display("Operation is not permitted")]
    Forbidden,

    /// Requested entity doesn't exist.
    #[display("Requested entity doesn't exist")]
    NotFound,

    /// Operation input is rejected by the API.
    #[display("Operation input is rejected by the API")]
    Validation(#[error(not(source))] Vec<Violation>),

    /// Response has an unexpected HTTP status.
    #[display("Unexpected `{_0}` HTTP status of a response")]
    #[from(ignore)]
    Status(#[error(not(source))] StatusCode),
}

impl Error {
    /// Indicates whether this [`Error`] is a rejection of the operation's
    /// [`Auth`] credentials.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Indicates whether this [`Error`] reports a missing entity.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Returns the input [`Violation`]s this [`Error`] reports, if any.
    #[must_use]
    pub fn violations(&self) -> Option<&[Violation]> {
        match self {
            Self::Validation(violations) => Some(violations),
            Self::Http(..)
            | Self::Decode(..)
            | Self::Url(..)
            | Self::Unauthorized
            | Self::Forbidden
            | Self::NotFound
            | Self::Status(..) => None,
        }
    }
}

#[cfg(test)]
mod spec {
    use std::collections::BTreeMap;

    use super::violations_of;

    #[test]
    fn violations_are_flattened_in_field_order() {
        let fields = BTreeMap::from([
            (
                "name".to_string(),
                vec!["This field is required.".to_string()],
            ),
            (
                "birth_date".to_string(),
                vec![
                    "Date has wrong format.".to_string(),
                    "Date cannot be in the future.".to_string(),
                ],
            ),
        ]);

        let violations = violations_of(fields);

        assert_eq!(violations.len(), 3);
        assert_eq!(violations[0].field, "birth_date");
        assert_eq!(violations[0].message, "Date has wrong format.");
        assert_eq!(violations[1].field, "birth_date");
        assert_eq!(violations[1].message, "Date cannot be in the future.");
        assert_eq!(violations[2].field, "name");
        assert_eq!(violations[2].message, "This field is required.");
    }
}
