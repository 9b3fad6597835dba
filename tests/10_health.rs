mod common;

use anyhow::Result;
use reqwest::StatusCode;

#[tokio::test]
async fn health_reports_store_backend() -> Result<()> {
    let server = common::start_server().await?;

    let res = reqwest::get(format!("{}/health", server.base_url)).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], true, "unexpected body: {}", body);
    assert_eq!(body["data"]["store"], "memory", "unexpected body: {}", body);

    Ok(())
}

#[tokio::test]
async fn root_lists_endpoints_without_auth() -> Result<()> {
    let server = common::start_server().await?;

    let res = reqwest::get(format!("{}/", server.base_url)).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<serde_json::Value>().await?;
    assert!(body["data"]["endpoints"].is_object(), "missing endpoint map: {}", body);

    Ok(())
}

#[tokio::test]
async fn api_rejects_missing_and_forged_tokens() -> Result<()> {
    let server = common::start_server().await?;
    let client = reqwest::Client::new();
    let url = format!("{}/api/projects", server.base_url);

    let res = client.get(&url).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = client.get(&url).bearer_auth("not.a.jwt").send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}
