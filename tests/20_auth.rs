mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::json;

/// Issue a token for the given email via the public endpoint.
async fn issue_token(base_url: &str, email: &str) -> Result<String> {
    let client = reqwest::Client::new();
    let res = client
        .post(format!("{}/jwt", base_url))
        .json(&json!({ "email": email }))
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::OK, "token issuance failed");
    let body = res.json::<serde_json::Value>().await?;
    let token = body["data"]["token"]
        .as_str()
        .expect("token missing from response")
        .to_string();
    Ok(token)
}

#[tokio::test]
async fn jwt_endpoint_issues_signed_token() -> Result<()> {
    let server = common::ensure_server().await?;

    let token = issue_token(&server.base_url, "a@x.com").await?;

    // Compact JWS form: header.payload.signature
    assert_eq!(token.split('.').count(), 3, "not a JWT: {}", token);

    Ok(())
}

#[tokio::test]
async fn jwt_endpoint_rejects_blank_email() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/jwt", server.base_url))
        .json(&json!({ "email": "  " }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["code"], "BAD_REQUEST");

    Ok(())
}

#[tokio::test]
async fn protected_route_requires_token() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    // No Authorization header at all
    let res = client
        .get(format!("{}/api/surveys", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["code"], "UNAUTHORIZED");

    // Garbage token
    let res = client
        .get(format!("{}/api/surveys", server.base_url))
        .bearer_auth("not.a.token")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn valid_token_passes_the_token_stage() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let token = issue_token(&server.base_url, "a@x.com").await?;

    // With a valid token the request clears the guard's token stage; any
    // failure past that point is a store problem, never a 401
    let res = client
        .get(format!("{}/api/surveys", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_ne!(res.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn role_predicate_is_identity_bound() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let token = issue_token(&server.base_url, "a@x.com").await?;

    // A valid token for a@x.com may not query b@x.com's role
    let res = client
        .get(format!("{}/api/users/admin/b@x.com", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["code"], "FORBIDDEN");
    // The refusal must not leak the target's role
    assert!(!body.to_string().contains("b@x.com"));

    // Querying one's own identity clears the binding stage; without a
    // database it may fail upstream, but never with 401/403
    let res = client
        .get(format!("{}/api/users/admin/a@x.com", server.base_url))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_ne!(res.status(), StatusCode::UNAUTHORIZED);
    assert_ne!(res.status(), StatusCode::FORBIDDEN);

    Ok(())
}
