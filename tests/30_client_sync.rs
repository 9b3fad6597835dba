mod common;

use anyhow::Result;
use uuid::Uuid;

use projector_api::client::{
    AddProjectView, ClientError, DetailState, Navigation, ProjectApi, ProjectDetailsView, ProjectFetcher,
};
use projector_api::database::ProjectFields;

#[tokio::test]
async fn add_view_creates_and_refreshes() -> Result<()> {
    let server = common::start_server().await?;
    let mut fetcher = ProjectFetcher::new(server.client_for(Uuid::new_v4())?);

    let mut view = AddProjectView::default();
    view.form.set_field("title", "A");
    view.form.set_field("description", "B");
    let created = view.submit(&mut fetcher).await?.project;

    assert!(view.form.title.is_empty());
    assert_eq!(fetcher.projects(), &[created]);

    Ok(())
}

#[tokio::test]
async fn details_view_edits_and_deletes_own_project() -> Result<()> {
    let server = common::start_server().await?;
    let client = server.client_for(Uuid::new_v4())?;
    let me = client.whoami().await?;
    let mut fetcher = ProjectFetcher::new(client);

    let created = fetcher.submit_create(ProjectFields::new("A", "B")).await?.project;
    let mut view = ProjectDetailsView::new(created.id.to_string());
    let state = view.load(&mut fetcher).await?;
    assert!(ProjectDetailsView::can_delete(&state, Some(&me)));

    view.toggle_edit();
    view.form_mut().set_field("description", "B2");
    let echoed = view.submit_edit(&mut fetcher).await?;
    assert_eq!(echoed.description, "B2");
    assert_eq!(echoed.owner, me.id);
    assert!(!view.edit_mode());

    let nav = view.delete(&mut fetcher, Some(&me)).await?;
    assert_eq!(nav, Navigation::ProjectList);

    let state = fetcher.load_one(&created.id.to_string()).await?;
    assert_eq!(state, &DetailState::NotFound);

    Ok(())
}

#[tokio::test]
async fn server_refusal_surfaces_as_unauthorized() -> Result<()> {
    let server = common::start_server().await?;
    let owner = server.client_for(Uuid::new_v4())?;
    let created = owner.create(&ProjectFields::new("A", "B")).await?;

    let mut fetcher = ProjectFetcher::new(server.client_for(Uuid::new_v4())?);
    let result = fetcher.submit_delete(&created.id.to_string()).await;
    assert!(matches!(result, Err(ClientError::Unauthorized(_))), "unexpected: {:?}", result);

    assert_eq!(owner.get(&created.id.to_string()).await?, created);

    Ok(())
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() -> Result<()> {
    let port = portpicker::pick_unused_port().expect("free port");
    let client = projector_api::client::HttpProjectClient::new(&format!("http://127.0.0.1:{}", port), None)?;
    let mut fetcher = ProjectFetcher::new(client);

    let result = fetcher.refresh().await;
    assert!(matches!(result, Err(ClientError::Transport(_))), "unexpected: {:?}", result);
    assert!(fetcher.projects().is_empty());

    Ok(())
}
