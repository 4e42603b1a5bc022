use anyhow::Result;
use libcat_app::rest_api::MemberOutcome;
use libcat_dal::member::Member;
use reqwest::{Response, StatusCode};
use serde_json::{Value, json};
use tracing::info;

use crate::TestServer;

pub async fn issue_book(
    client: &reqwest::Client,
    server: &TestServer,
    book_id: impl ToString,
    payload: &Value,
) -> Result<Response> {
    let url = server.url(&format!("books/issue/{}", book_id.to_string()));
    let response = client.post(url).json(payload).send().await?;
    info!("Issue response: {:#?}", response);
    Ok(response)
}

pub async fn return_book(
    client: &reqwest::Client,
    server: &TestServer,
    book_id: impl ToString,
    mobile: &str,
) -> Result<Response> {
    let url = server.url(&format!("books/return/{}", book_id.to_string()));
    let response = client
        .post(url)
        .json(&json!({"mobile": mobile}))
        .send()
        .await?;
    info!("Return response: {:#?}", response);
    Ok(response)
}

pub async fn add_member(
    client: &reqwest::Client,
    server: &TestServer,
    name: &str,
    mobile: &str,
    email: &str,
) -> Result<Member> {
    let payload = json!({"name": name, "mobile": mobile, "email": email});
    let response = client
        .post(server.url("members/add"))
        .json(&payload)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let outcome: MemberOutcome = response.json().await?;
    assert_eq!(outcome.message, "Member added successfully");
    Ok(outcome.member)
}

/// Returns status and `message` of JSON response body
pub async fn status_and_message(response: Response) -> Result<(StatusCode, String)> {
    let status = response.status();
    let body: Value = response.json().await?;
    let message = body
        .get("message")
        .and_then(|m| m.as_str())
        .unwrap_or_default()
        .to_string();
    Ok((status, message))
}
