use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::config::ProjectConfig;
use crate::database::{DeleteOutcome, Project, ProjectFields, ProjectStore, StoreError};
use crate::types::Operation;

/// Failures a project operation can report to its caller
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Project '{0}' not found")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{message}")]
    Validation {
        message: String,
        field_errors: HashMap<String, String>,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Request body for create and update. Both fields are required; they are
/// optional here so a missing field can be reported by name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectInput {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl From<ProjectFields> for ProjectInput {
    fn from(fields: ProjectFields) -> Self {
        Self {
            title: Some(fields.title),
            description: Some(fields.description),
        }
    }
}

/// CRUD over the project store. Each call maps to exactly one store call.
#[derive(Clone)]
pub struct ProjectService {
    store: Arc<dyn ProjectStore>,
    limits: ProjectConfig,
}

impl ProjectService {
    pub fn new(store: Arc<dyn ProjectStore>, limits: ProjectConfig) -> Self {
        Self { store, limits }
    }

    pub fn store(&self) -> &Arc<dyn ProjectStore> {
        &self.store
    }

    pub async fn list(&self) -> Result<Vec<Project>, ServiceError> {
        let projects = self.store.list().await.map_err(|e| store_failure(Operation::List, e))?;
        debug!(op = %Operation::List, count = projects.len(), "listed projects");
        Ok(projects)
    }

    pub async fn get(&self, id: &str) -> Result<Project, ServiceError> {
        let Some(uuid) = parse_id(id) else {
            return Err(ServiceError::NotFound(id.to_string()));
        };

        self.store
            .find(uuid)
            .await
            .map_err(|e| store_failure(Operation::Get, e))?
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))
    }

    /// Create a project owned by `requester`. The owner never comes from the request body.
    pub async fn create(&self, input: ProjectInput, requester: Uuid) -> Result<Project, ServiceError> {
        let fields = self.validate(input)?;
        let project = self
            .store
            .insert(fields, requester)
            .await
            .map_err(|e| store_failure(Operation::Create, e))?;

        debug!(op = %Operation::Create, id = %project.id, owner = %requester, "created project");
        Ok(project)
    }

    /// Replace title and description. The owner is left as it was.
    pub async fn update(&self, id: &str, input: ProjectInput) -> Result<Project, ServiceError> {
        let Some(uuid) = parse_id(id) else {
            return Err(ServiceError::NotFound(id.to_string()));
        };
        let fields = self.validate(input)?;

        let project = self
            .store
            .update(uuid, fields)
            .await
            .map_err(|e| store_failure(Operation::Update, e))?
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;

        debug!(op = %Operation::Update, id = %project.id, "updated project");
        Ok(project)
    }

    /// Delete a project. Absent ids succeed; records owned by someone else are refused.
    pub async fn delete(&self, id: &str, requester: Uuid) -> Result<(), ServiceError> {
        let Some(uuid) = parse_id(id) else {
            debug!(op = %Operation::Delete, id, "unparseable id, nothing to delete");
            return Ok(());
        };

        match self
            .store
            .delete(uuid, requester)
            .await
            .map_err(|e| store_failure(Operation::Delete, e))?
        {
            DeleteOutcome::Deleted => {
                debug!(op = %Operation::Delete, id = %uuid, "deleted project");
                Ok(())
            }
            DeleteOutcome::Absent => {
                debug!(op = %Operation::Delete, id = %uuid, "project already absent");
                Ok(())
            }
            DeleteOutcome::NotOwner { owner } => {
                warn!(op = %Operation::Delete, id = %uuid, %owner, %requester, "delete refused for non-owner");
                Err(ServiceError::Unauthorized(
                    "Only the project owner can delete this project".to_string(),
                ))
            }
        }
    }

    /// Check presence and length bounds of the editable fields
    pub fn validate(&self, input: ProjectInput) -> Result<ProjectFields, ServiceError> {
        let mut field_errors = HashMap::new();

        check_field("title", input.title.as_deref(), self.limits.max_title_len, &mut field_errors);
        check_field(
            "description",
            input.description.as_deref(),
            self.limits.max_description_len,
            &mut field_errors,
        );

        if !field_errors.is_empty() {
            return Err(ServiceError::Validation {
                message: "Invalid project fields".to_string(),
                field_errors,
            });
        }

        Ok(ProjectFields {
            title: input.title.unwrap_or_default(),
            description: input.description.unwrap_or_default(),
        })
    }
}

fn check_field(name: &str, value: Option<&str>, max_len: usize, errors: &mut HashMap<String, String>) {
    match value {
        None => {
            errors.insert(name.to_string(), "This field is required".to_string());
        }
        Some(v) if v.chars().count() > max_len => {
            errors.insert(name.to_string(), format!("Must be at most {} characters", max_len));
        }
        Some(_) => {}
    }
}

/// An id that is not a UUID cannot name any stored project
fn parse_id(id: &str) -> Option<Uuid> {
    Uuid::parse_str(id).ok()
}

fn store_failure(op: Operation, err: StoreError) -> ServiceError {
    error!(op = %op, "project store failure: {}", err);
    ServiceError::Store(err)
}
