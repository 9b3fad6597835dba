use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::models::{DeleteOutcome, Project, ProjectFields};
use crate::database::store::{ProjectStore, StoreError};

/// In-process project store. Records are kept in insertion order, which is
/// the order `list` reports. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryProjectStore {
    projects: RwLock<Vec<Project>>,
}

impl MemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectStore for MemoryProjectStore {
    async fn list(&self) -> Result<Vec<Project>, StoreError> {
        Ok(self.projects.read().await.clone())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        let projects = self.projects.read().await;
        Ok(projects.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, fields: ProjectFields, owner: Uuid) -> Result<Project, StoreError> {
        let project = Project::new(fields, owner);
        self.projects.write().await.push(project.clone());
        Ok(project)
    }

    async fn update(&self, id: Uuid, fields: ProjectFields) -> Result<Option<Project>, StoreError> {
        let mut projects = self.projects.write().await;
        Ok(projects.iter_mut().find(|p| p.id == id).map(|project| {
            project.apply(fields);
            project.clone()
        }))
    }

    async fn delete(&self, id: Uuid, requester: Uuid) -> Result<DeleteOutcome, StoreError> {
        let mut projects = self.projects.write().await;
        let Some(index) = projects.iter().position(|p| p.id == id) else {
            return Ok(DeleteOutcome::Absent);
        };

        let owner = projects[index].owner;
        if owner != requester {
            return Ok(DeleteOutcome::NotOwner { owner });
        }

        projects.remove(index);
        Ok(DeleteOutcome::Deleted)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
