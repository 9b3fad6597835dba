use std::fmt::Write as _;

use crate::client::fetcher::{CreateOutcome, DetailState, Navigation, ProjectFetcher};
use crate::client::http::{ClientError, CurrentUser, ProjectApi};
use crate::database::{Project, ProjectFields};

/// Input drafts for a project's editable fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectForm {
    pub title: String,
    pub description: String,
}

impl ProjectForm {
    pub fn from_project(project: &Project) -> Self {
        Self {
            title: project.title.clone(),
            description: project.description.clone(),
        }
    }

    /// Update one draft by field name. Returns false for unknown fields.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> bool {
        match name {
            "title" => self.title = value.into(),
            "description" => self.description = value.into(),
            _ => return false,
        }
        true
    }

    pub fn clear(&mut self) {
        self.title.clear();
        self.description.clear();
    }

    pub fn to_fields(&self) -> ProjectFields {
        ProjectFields::new(self.title.clone(), self.description.clone())
    }
}

#[derive(Debug, Default)]
pub struct AddProjectView {
    pub form: ProjectForm,
}

impl AddProjectView {
    /// Create from the drafts. The drafts are cleared once the server accepts
    /// them, whether or not the list could be refreshed afterwards.
    pub async fn submit<A: ProjectApi>(&mut self, fetcher: &mut ProjectFetcher<A>) -> Result<CreateOutcome, ClientError> {
        let outcome = fetcher.submit_create(self.form.to_fields()).await?;
        self.form.clear();
        Ok(outcome)
    }
}

pub struct ProjectListView;

impl ProjectListView {
    pub fn render(projects: &[Project]) -> String {
        if projects.is_empty() {
            return "No projects\n".to_string();
        }

        let mut out = String::new();
        for project in projects {
            let _ = writeln!(out, "{}  {}", project.id, project.title);
        }
        out
    }
}

/// Detail screen for one project id, with its own edit toggle and drafts
#[derive(Debug)]
pub struct ProjectDetailsView {
    id: String,
    edit_mode: bool,
    form: ProjectForm,
}

impl ProjectDetailsView {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            edit_mode: false,
            form: ProjectForm::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub async fn load<A: ProjectApi>(&mut self, fetcher: &mut ProjectFetcher<A>) -> Result<DetailState, ClientError> {
        let state = fetcher.load_one(&self.id).await?.clone();
        if let DetailState::Loaded(project) = &state {
            self.form = ProjectForm::from_project(project);
        }
        Ok(state)
    }

    pub fn toggle_edit(&mut self) {
        self.edit_mode = !self.edit_mode;
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn form(&self) -> &ProjectForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ProjectForm {
        &mut self.form
    }

    /// Send the drafts. On success the drafts take the server's echo and edit mode ends;
    /// on failure both stay as they were.
    pub async fn submit_edit<A: ProjectApi>(&mut self, fetcher: &mut ProjectFetcher<A>) -> Result<Project, ClientError> {
        let project = fetcher.submit_update(&self.id, self.form.to_fields()).await?;
        self.form = ProjectForm::from_project(&project);
        self.edit_mode = false;
        Ok(project)
    }

    pub fn can_delete(state: &DetailState, user: Option<&CurrentUser>) -> bool {
        match (state.project(), user) {
            (Some(project), Some(user)) => project.is_owned_by(user.id),
            _ => false,
        }
    }

    /// Delete the shown project. Only offered to its owner; the server still has the final say.
    pub async fn delete<A: ProjectApi>(
        &self,
        fetcher: &mut ProjectFetcher<A>,
        user: Option<&CurrentUser>,
    ) -> Result<Navigation, ClientError> {
        if !Self::can_delete(fetcher.detail(), user) {
            return Err(ClientError::Unauthorized(format!(
                "only the owner can delete project '{}'",
                self.id
            )));
        }
        fetcher.submit_delete(&self.id).await
    }

    pub fn render(&self, state: &DetailState, user: Option<&CurrentUser>) -> String {
        let project = match state {
            DetailState::Loading => return "Loading ...\n".to_string(),
            DetailState::NotFound => return "Not found\n".to_string(),
            DetailState::Loaded(project) => project,
        };

        let mut out = String::new();
        if self.edit_mode {
            let _ = writeln!(out, "Title: {}", self.form.title);
            let _ = writeln!(out, "Description: {}", self.form.description);
            let _ = writeln!(out, "[save] [cancel]");
            return out;
        }

        let _ = writeln!(out, "Title: {}", project.title);
        let _ = writeln!(out, "Description: {}", project.description);
        if Self::can_delete(state, user) {
            let _ = writeln!(out, "[edit] [delete]");
        } else {
            let _ = writeln!(out, "[edit]");
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fetcher::tests::{user, ServiceApi};

    #[test]
    fn form_updates_by_field_name() {
        let mut form = ProjectForm::default();
        assert!(form.set_field("title", "A"));
        assert!(form.set_field("description", "B"));
        assert!(!form.set_field("owner", "someone"));
        assert_eq!(form.to_fields(), ProjectFields::new("A", "B"));

        form.clear();
        assert_eq!(form, ProjectForm::default());
    }

    #[tokio::test]
    async fn add_view_clears_drafts_only_on_success() {
        let mut fetcher = ProjectFetcher::new(ServiceApi::new(user("u1")));
        let mut view = AddProjectView::default();
        view.form.set_field("title", "A");
        view.form.set_field("description", "B");

        fetcher.api().set_offline(true);
        assert!(view.submit(&mut fetcher).await.is_err());
        assert_eq!(view.form.title, "A");

        fetcher.api().set_offline(false);
        let created = view.submit(&mut fetcher).await.unwrap().project;
        assert_eq!(view.form, ProjectForm::default());
        assert!(ProjectListView::render(fetcher.projects()).contains(&created.id.to_string()));
    }

    #[tokio::test]
    async fn add_view_clears_drafts_when_only_relist_fails() {
        let mut fetcher = ProjectFetcher::new(ServiceApi::new(user("u1")));
        fetcher.api().set_list_down(true);
        let mut view = AddProjectView::default();
        view.form.set_field("title", "A");
        view.form.set_field("description", "B");

        let outcome = view.submit(&mut fetcher).await.unwrap();
        assert!(outcome.refresh_error.is_some());
        assert_eq!(view.form, ProjectForm::default());

        assert_eq!(fetcher.api().service.list().await.unwrap().len(), 1);
    }

    #[test]
    fn list_view_renders_empty_and_populated() {
        assert_eq!(ProjectListView::render(&[]), "No projects\n");

        let project = Project::new(ProjectFields::new("Roadmap", ""), uuid::Uuid::new_v4());
        let rendered = ProjectListView::render(std::slice::from_ref(&project));
        assert!(rendered.contains("Roadmap"));
    }

    #[tokio::test]
    async fn details_view_walks_through_states() {
        let owner = user("u1");
        let mut fetcher = ProjectFetcher::new(ServiceApi::new(owner.clone()));
        let created = fetcher.submit_create(ProjectFields::new("A", "B")).await.unwrap().project;

        let mut view = ProjectDetailsView::new(created.id.to_string());
        assert_eq!(view.render(fetcher.detail(), Some(&owner)), "Loading ...\n");

        let state = view.load(&mut fetcher).await.unwrap();
        assert_eq!(view.form(), &ProjectForm::from_project(&created));
        let rendered = view.render(&state, Some(&owner));
        assert!(rendered.contains("Title: A"));
        assert!(rendered.contains("[delete]"));

        let mut missing = ProjectDetailsView::new("not-a-uuid");
        let state = missing.load(&mut fetcher).await.unwrap();
        assert_eq!(missing.render(&state, Some(&owner)), "Not found\n");
    }

    #[tokio::test]
    async fn edit_takes_server_echo_and_leaves_edit_mode() {
        let mut fetcher = ProjectFetcher::new(ServiceApi::new(user("u1")));
        let created = fetcher.submit_create(ProjectFields::new("A", "B")).await.unwrap().project;
        let mut view = ProjectDetailsView::new(created.id.to_string());
        view.load(&mut fetcher).await.unwrap();

        view.toggle_edit();
        assert!(view.edit_mode());
        view.form_mut().set_field("title", "A2");

        let echoed = view.submit_edit(&mut fetcher).await.unwrap();
        assert!(!view.edit_mode());
        assert_eq!(view.form().title, "A2");
        assert_eq!(echoed.owner, created.owner);
    }

    #[tokio::test]
    async fn failed_edit_keeps_drafts_and_mode() {
        let mut fetcher = ProjectFetcher::new(ServiceApi::new(user("u1")));
        let created = fetcher.submit_create(ProjectFields::new("A", "B")).await.unwrap().project;
        let mut view = ProjectDetailsView::new(created.id.to_string());
        view.load(&mut fetcher).await.unwrap();
        view.toggle_edit();
        view.form_mut().set_field("title", "draft");

        fetcher.api().set_offline(true);
        assert!(view.submit_edit(&mut fetcher).await.is_err());
        assert!(view.edit_mode());
        assert_eq!(view.form().title, "draft");
    }

    #[tokio::test]
    async fn delete_is_offered_to_owner_only() {
        let owner = ServiceApi::new(user("u1"));
        let created = owner
            .service
            .create(ProjectFields::new("A", "B").into(), owner.user.id)
            .await
            .unwrap();
        let stranger = user("u2");
        let mut fetcher = ProjectFetcher::new(ServiceApi::sharing(owner.service.clone(), stranger.clone()));

        let view = ProjectDetailsView::new(created.id.to_string());
        let state = fetcher.load_one(view.id()).await.unwrap().clone();

        assert!(!ProjectDetailsView::can_delete(&state, Some(&stranger)));
        assert!(!ProjectDetailsView::can_delete(&state, None));
        assert!(ProjectDetailsView::can_delete(&state, Some(&owner.user)));
        assert!(!view.render(&state, Some(&stranger)).contains("[delete]"));

        let refused = view.delete(&mut fetcher, Some(&stranger)).await;
        assert!(matches!(refused, Err(ClientError::Unauthorized(_))));
        assert!(owner.service.get(view.id()).await.is_ok());
    }
}
