use libcat_app::rest_api::{MemberOutcome, Outcome};
use libcat_e2e_tests::{
    extend_url, launch_env,
    rest::{add_member, status_and_message},
};
use reqwest::StatusCode;
use serde_json::json;
use tracing::info;
use tracing_test::traced_test;

#[tokio::test]
#[traced_test]
async fn test_add_member_requires_all_fields() {
    let (client, server, _config_guard) = launch_env("test_add_member_requires_all_fields")
        .await
        .unwrap();

    let payloads = [
        json!({"name": "Alice", "mobile": "555"}),
        json!({"name": "Alice", "email": "alice@example.com"}),
        json!({"mobile": "555", "email": "alice@example.com"}),
        json!({"name": "", "mobile": "555", "email": "alice@example.com"}),
    ];
    for payload in payloads {
        let response = client
            .post(server.url("members/add"))
            .json(&payload)
            .send()
            .await
            .unwrap();
        let (status, message) = status_and_message(response).await.unwrap();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "All fields are required");
    }

    let response = client.post(server.url("members/add")).send().await.unwrap();
    let (status, message) = status_and_message(response).await.unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message, "Invalid request body");

    assert_eq!(server.members().count().await.unwrap(), 0);
}

#[tokio::test]
#[traced_test]
async fn test_add_member_with_numeric_fields() {
    let (client, server, _config_guard) = launch_env("test_add_member_numeric").await.unwrap();

    let response = client
        .post(server.url("members/add"))
        .json(&json!({"name": 123, "mobile": 555, "email": "a@x"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let outcome: MemberOutcome = response.json().await.unwrap();
    assert_eq!(outcome.message, "Member added successfully");
    assert_eq!(outcome.member.borrower, "123");

    let response = client
        .put(extend_url(&server.url("members/update/"), outcome.member.id))
        .json(&json!({"name": 456, "mobile": 556}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let outcome: MemberOutcome = response.json().await.unwrap();
    assert_eq!(outcome.member.borrower, "456");

    // structured values are still not accepted as text
    let response = client
        .post(server.url("members/add"))
        .json(&json!({"name": ["a"], "mobile": 555, "email": "a@x"}))
        .send()
        .await
        .unwrap();
    let (status, message) = status_and_message(response).await.unwrap();
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(message, "Invalid request body");
    assert_eq!(server.members().count().await.unwrap(), 1);
}

#[tokio::test]
#[traced_test]
async fn test_member_lifecycle() {
    let (client, server, _config_guard) = launch_env("test_member_lifecycle").await.unwrap();

    let member = add_member(&client, &server, "Alice", "555", "alice@example.com")
        .await
        .unwrap();
    assert_eq!(member.borrower, "Alice");
    assert!(member.book_id.is_none());
    assert!(member.return_date.is_none());
    assert_eq!(server.members().count().await.unwrap(), 1);

    let update_url = server.url("members/update/");
    let response = client
        .put(extend_url(&update_url, member.id))
        .json(&json!({"name": "Alicia", "mobile": "556"}))
        .send()
        .await
        .unwrap();
    info!("Update response: {:#?}", response);
    assert_eq!(response.status(), StatusCode::OK);
    let outcome: MemberOutcome = response.json().await.unwrap();
    assert_eq!(outcome.message, "Member updated successfully");
    assert_eq!(outcome.member.borrower, "Alicia");
    assert_eq!(outcome.member.issue_date, member.issue_date);

    // missing name keeps current borrower
    let response = client
        .put(extend_url(&update_url, member.id))
        .json(&json!({"mobile": "557"}))
        .send()
        .await
        .unwrap();
    let outcome: MemberOutcome = response.json().await.unwrap();
    assert_eq!(outcome.member.borrower, "Alicia");

    let delete_url = server.url("members/delete/");
    let response = client
        .delete(extend_url(&delete_url, member.id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let outcome: Outcome = response.json().await.unwrap();
    assert_eq!(outcome.message, "Member deleted successfully");
    assert_eq!(server.members().count().await.unwrap(), 0);

    let response = client
        .delete(extend_url(&delete_url, member.id))
        .send()
        .await
        .unwrap();
    let (status, message) = status_and_message(response).await.unwrap();
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(message, "Member not found");

    let response = client
        .put(extend_url(&update_url, member.id))
        .json(&json!({"name": "Alice"}))
        .send()
        .await
        .unwrap();
    let (status, message) = status_and_message(response).await.unwrap();
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(message, "Member not found");
}

#[tokio::test]
#[traced_test]
async fn test_update_unknown_member() {
    let (client, server, _config_guard) = launch_env("test_update_unknown_member").await.unwrap();
    let update_url = server.url("members/update/");

    for id in ["424242", "alice"] {
        let response = client
            .put(extend_url(&update_url, id))
            .json(&json!({"name": "Nobody"}))
            .send()
            .await
            .unwrap();
        let (status, message) = status_and_message(response).await.unwrap();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(message, "Member not found");
    }
    assert_eq!(server.members().count().await.unwrap(), 0);
}
