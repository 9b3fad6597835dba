use tracing::warn;

use crate::client::http::{ClientError, ProjectApi};
use crate::database::{Project, ProjectFields};
use crate::types::Operation;

/// Detail-view state. `NotFound` is terminal for the view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DetailState {
    #[default]
    Loading,
    Loaded(Project),
    NotFound,
}

impl DetailState {
    pub fn project(&self) -> Option<&Project> {
        match self {
            DetailState::Loaded(project) => Some(project),
            _ => None,
        }
    }
}

/// Where the caller should go after an operation invalidates its view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    ProjectList,
}

/// Result of a create. The record exists on the server even when the
/// follow-up re-list failed; `refresh_error` carries that failure.
#[derive(Debug)]
pub struct CreateOutcome {
    pub project: Project,
    pub refresh_error: Option<ClientError>,
}

/// Holds the transient, non-authoritative copy of projects for one view and
/// keeps it in step with the server. Failed calls are reported and leave the
/// local state exactly as it was; nothing is retried.
pub struct ProjectFetcher<A> {
    api: A,
    projects: Vec<Project>,
    detail: DetailState,
}

impl<A: ProjectApi> ProjectFetcher<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            projects: Vec::new(),
            detail: DetailState::default(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn detail(&self) -> &DetailState {
        &self.detail
    }

    /// Replace the local collection with the server's list
    pub async fn refresh(&mut self) -> Result<&[Project], ClientError> {
        let projects = self.api.list().await.map_err(|e| report(Operation::List, e))?;
        self.projects = projects;
        Ok(&self.projects)
    }

    pub async fn load_one(&mut self, id: &str) -> Result<&DetailState, ClientError> {
        match self.api.get(id).await {
            Ok(project) => self.detail = DetailState::Loaded(project),
            Err(ClientError::NotFound(_)) => self.detail = DetailState::NotFound,
            Err(e) => return Err(report(Operation::Get, e)),
        }
        Ok(&self.detail)
    }

    /// Create, then re-list. The new record is never inserted locally, and a
    /// failed re-list does not turn the accepted create into an error.
    pub async fn submit_create(&mut self, fields: ProjectFields) -> Result<CreateOutcome, ClientError> {
        let project = self.api.create(&fields).await.map_err(|e| report(Operation::Create, e))?;
        let refresh_error = self.refresh().await.err();
        if refresh_error.is_some() {
            warn!(op = %Operation::Create, id = %project.id, "project created but list is stale");
        }
        Ok(CreateOutcome { project, refresh_error })
    }

    /// Update, then replace the local copy with the server's echo
    pub async fn submit_update(&mut self, id: &str, fields: ProjectFields) -> Result<Project, ClientError> {
        let project = self
            .api
            .update(id, &fields)
            .await
            .map_err(|e| report(Operation::Update, e))?;

        if matches!(&self.detail, DetailState::Loaded(current) if current.id == project.id) {
            self.detail = DetailState::Loaded(project.clone());
        }
        if let Some(entry) = self.projects.iter_mut().find(|p| p.id == project.id) {
            *entry = project.clone();
        }

        Ok(project)
    }

    /// Delete; the detail view for this id is no longer valid afterwards
    pub async fn submit_delete(&mut self, id: &str) -> Result<Navigation, ClientError> {
        self.api.delete(id).await.map_err(|e| report(Operation::Delete, e))?;
        Ok(Navigation::ProjectList)
    }
}

fn report(op: Operation, err: ClientError) -> ClientError {
    warn!(op = %op, "project request failed: {}", err);
    err
}
