use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{DeleteOutcome, Project, ProjectFields};

/// Errors from the project store backends
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl StoreError {
    /// True when the store could not be reached at all, as opposed to a failed statement
    pub fn is_connectivity(&self) -> bool {
        match self {
            StoreError::ConnectionError(_) => true,
            StoreError::Sqlx(e) => matches!(
                e,
                sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Tls(_)
            ),
            _ => false,
        }
    }
}

/// Persistence for project records. Every method is a single read or a single
/// mutation against the backend.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// All records in the backend's native order
    async fn list(&self) -> Result<Vec<Project>, StoreError>;

    async fn find(&self, id: Uuid) -> Result<Option<Project>, StoreError>;

    /// Assigns a fresh id and records `owner`
    async fn insert(&self, fields: ProjectFields, owner: Uuid) -> Result<Project, StoreError>;

    /// Replaces title and description. `None` when no record has this id.
    async fn update(&self, id: Uuid, fields: ProjectFields) -> Result<Option<Project>, StoreError>;

    /// Removes the record only if `requester` owns it. The ownership check and
    /// the removal are one atomic step.
    async fn delete(&self, id: Uuid, requester: Uuid) -> Result<DeleteOutcome, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    fn backend(&self) -> &'static str;
}
