use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use url::Url;
use uuid::Uuid;

use crate::database::{Project, ProjectFields};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors seen by API consumers. NotFound is kept apart from transport and
/// server failures so callers can tell "does not exist" from "could not check".
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("not authorized: {0}")]
    Unauthorized(String),

    #[error("invalid request: {message}")]
    Validation {
        message: String,
        field_errors: HashMap<String, String>,
    },

    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid server URL: {0}")]
    InvalidUrl(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

/// The authenticated user as reported by /api/auth/whoami
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: Uuid,
    pub name: String,
}

/// Remote project operations as seen from the client side
#[async_trait]
pub trait ProjectApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Project>, ClientError>;

    async fn get(&self, id: &str) -> Result<Project, ClientError>;

    async fn create(&self, fields: &ProjectFields) -> Result<Project, ClientError>;

    async fn update(&self, id: &str, fields: &ProjectFields) -> Result<Project, ClientError>;

    async fn delete(&self, id: &str) -> Result<(), ClientError>;

    async fn whoami(&self) -> Result<CurrentUser, ClientError>;
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    error: Option<String>,
    #[serde(default)]
    field_errors: HashMap<String, String>,
}

/// reqwest-backed client for the projects API
#[derive(Debug, Clone)]
pub struct HttpProjectClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpProjectClient {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, token, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(base_url.to_string()));
        }

        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { http, base_url, token })
    }

    /// Build `<base>/<segments...>` with each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = self.authorized(request).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(error_from_response(status, &text));
        }

        serde_json::from_str::<Envelope<T>>(&text)
            .map(|envelope| envelope.data)
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}

fn error_from_response(status: StatusCode, text: &str) -> ClientError {
    let body: ErrorBody = serde_json::from_str(text).unwrap_or_default();
    let message = body
        .error
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

    match status {
        StatusCode::NOT_FOUND => ClientError::NotFound(message),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::Unauthorized(message),
        StatusCode::BAD_REQUEST | StatusCode::PAYLOAD_TOO_LARGE => ClientError::Validation {
            message,
            field_errors: body.field_errors,
        },
        _ => ClientError::Server {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl ProjectApi for HttpProjectClient {
    async fn list(&self) -> Result<Vec<Project>, ClientError> {
        let url = self.endpoint(&["api", "projects"])?;
        self.send(self.http.get(url)).await
    }

    async fn get(&self, id: &str) -> Result<Project, ClientError> {
        let url = self.endpoint(&["api", "projects", id])?;
        self.send(self.http.get(url)).await
    }

    async fn create(&self, fields: &ProjectFields) -> Result<Project, ClientError> {
        let url = self.endpoint(&["api", "projects"])?;
        self.send(self.http.post(url).json(fields)).await
    }

    async fn update(&self, id: &str, fields: &ProjectFields) -> Result<Project, ClientError> {
        let url = self.endpoint(&["api", "projects", id])?;
        self.send(self.http.put(url).json(fields)).await
    }

    async fn delete(&self, id: &str) -> Result<(), ClientError> {
        let url = self.endpoint(&["api", "projects", id])?;
        let _: serde_json::Value = self.send(self.http.delete(url)).await?;
        Ok(())
    }

    async fn whoami(&self) -> Result<CurrentUser, ClientError> {
        let url = self.endpoint(&["api", "auth", "whoami"])?;
        self.send(self.http.get(url)).await
    }
}
