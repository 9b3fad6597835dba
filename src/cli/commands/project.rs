use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_data, output_success};
use crate::cli::{Connection, OutputFormat};
use crate::client::{
    AddProjectView, DetailState, ProjectApi, ProjectDetailsView, ProjectFetcher, ProjectListView,
};

#[derive(Subcommand)]
pub enum ProjectCommands {
    #[command(about = "List all projects")]
    List,

    #[command(about = "Show one project")]
    Show {
        #[arg(help = "Project id")]
        id: String,
    },

    #[command(about = "Create a project owned by the current user")]
    Add {
        #[arg(long, help = "Project title")]
        title: String,
        #[arg(long, default_value = "", help = "Project description")]
        description: String,
    },

    #[command(about = "Change a project's title and/or description")]
    Edit {
        #[arg(help = "Project id")]
        id: String,
        #[arg(long, help = "New title")]
        title: Option<String>,
        #[arg(long, help = "New description")]
        description: Option<String>,
    },

    #[command(about = "Delete a project you own")]
    Delete {
        #[arg(help = "Project id")]
        id: String,
    },
}

pub async fn handle(cmd: ProjectCommands, connection: &Connection, output_format: OutputFormat) -> anyhow::Result<()> {
    let mut fetcher = ProjectFetcher::new(connection.client()?);

    match cmd {
        ProjectCommands::List => {
            fetcher.refresh().await?;
            output_data(&output_format, &fetcher.projects(), &ProjectListView::render(fetcher.projects()))
        }
        ProjectCommands::Show { id } => {
            let user = fetcher.api().whoami().await.ok();
            let mut view = ProjectDetailsView::new(id);
            let state = view.load(&mut fetcher).await?;
            let text = view.render(&state, user.as_ref());
            match &state {
                DetailState::Loaded(project) => output_data(&output_format, project, &text),
                _ => anyhow::bail!("project '{}' not found", view.id()),
            }
        }
        ProjectCommands::Add { title, description } => {
            let mut view = AddProjectView::default();
            view.form.set_field("title", title);
            view.form.set_field("description", description);
            let outcome = view.submit(&mut fetcher).await?;
            if let Some(e) = &outcome.refresh_error {
                tracing::warn!("created, but the project list could not be refreshed: {}", e);
            }
            let project = outcome.project;
            output_success(
                &output_format,
                &format!("Created project {}", project.id),
                Some(json!(project)),
            )
        }
        ProjectCommands::Edit { id, title, description } => {
            if title.is_none() && description.is_none() {
                anyhow::bail!("nothing to change: pass --title and/or --description");
            }

            let mut view = ProjectDetailsView::new(id);
            if view.load(&mut fetcher).await? == DetailState::NotFound {
                anyhow::bail!("project '{}' not found", view.id());
            }

            view.toggle_edit();
            if let Some(title) = title {
                view.form_mut().set_field("title", title);
            }
            if let Some(description) = description {
                view.form_mut().set_field("description", description);
            }
            let project = view.submit_edit(&mut fetcher).await?;
            output_success(
                &output_format,
                &format!("Updated project {}", project.id),
                Some(json!(project)),
            )
        }
        ProjectCommands::Delete { id } => {
            let user = fetcher.api().whoami().await?;
            let mut view = ProjectDetailsView::new(id);
            match view.load(&mut fetcher).await? {
                // Deletes are idempotent; nothing to check ownership against
                DetailState::NotFound => {
                    fetcher.submit_delete(view.id()).await?;
                }
                _ => {
                    view.delete(&mut fetcher, Some(&user)).await?;
                }
            }
            output_success(
                &output_format,
                &format!("Deleted project {}", view.id()),
                Some(json!({ "id": view.id() })),
            )
        }
    }
}
