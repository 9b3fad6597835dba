use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted project record. `id` and `owner` never change after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub owner: Uuid,
}

/// The user-editable part of a project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFields {
    pub title: String,
    pub description: String,
}

impl Project {
    pub fn new(fields: ProjectFields, owner: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: fields.title,
            description: fields.description,
            owner,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner == user_id
    }

    /// Replace the editable fields, leaving `id` and `owner` untouched
    pub fn apply(&mut self, fields: ProjectFields) {
        self.title = fields.title;
        self.description = fields.description;
    }

    pub fn fields(&self) -> ProjectFields {
        ProjectFields {
            title: self.title.clone(),
            description: self.description.clone(),
        }
    }
}

impl ProjectFields {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Result of an owner-guarded delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// Nothing stored under the id; deletes are idempotent so this is still a success
    Absent,
    NotOwner { owner: Uuid },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_keeps_identity_and_owner() {
        let owner = Uuid::new_v4();
        let mut project = Project::new(ProjectFields::new("A", "B"), owner);
        let id = project.id;

        project.apply(ProjectFields::new("A2", "B2"));

        assert_eq!(project.id, id);
        assert_eq!(project.owner, owner);
        assert_eq!(project.fields(), ProjectFields::new("A2", "B2"));
    }

    #[test]
    fn serializes_to_persisted_shape() {
        let project = Project::new(ProjectFields::new("A", "B"), Uuid::new_v4());
        let value = serde_json::to_value(&project).unwrap();
        let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["description", "id", "owner", "title"]);
    }
}
