mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn register_then_login_issues_token() -> Result<()> {
    let server = common::start_server().await?;

    let res = server.register("a@x.com", "pw", None).await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(res.json::<Value>().await?, json!({ "msg": "User registered successfully" }));

    let res = server.login("a@x.com", "pw").await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    let token = body["access_token"].as_str().unwrap_or_default();
    assert!(!token.is_empty());

    let res = server.get("/get_role", token).await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({ "role": "user" }));
    Ok(())
}

#[tokio::test]
async fn duplicate_registration_is_rejected() -> Result<()> {
    let server = common::start_server().await?;

    assert_eq!(server.register("a@x.com", "pw", None).await?.status(), StatusCode::CREATED);

    let res = server.register("a@x.com", "other", None).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], true);
    assert_eq!(body["msg"], "User already exists");

    // The first password still works
    assert_eq!(server.login("a@x.com", "pw").await?.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn register_validates_input() -> Result<()> {
    let server = common::start_server().await?;

    let missing_password = server
        .client
        .post(server.url("/register"))
        .json(&json!({ "email": "a@x.com" }))
        .send()
        .await?;
    assert_eq!(missing_password.status(), StatusCode::BAD_REQUEST);

    let unknown_role = server.register("b@x.com", "pw", Some("superuser")).await?;
    assert_eq!(unknown_role.status(), StatusCode::BAD_REQUEST);

    let not_json = server
        .client
        .post(server.url("/register"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(not_json.status(), StatusCode::BAD_REQUEST);

    let long_email = format!("{}@x.com", "a".repeat(120));
    let res = server.register(&long_email, "pw", None).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn bad_credentials_are_indistinguishable() -> Result<()> {
    let server = common::start_server().await?;
    server.register("a@x.com", "pw", None).await?;

    let wrong_password = server.login("a@x.com", "nope").await?;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    let wrong_password: Value = wrong_password.json().await?;

    let unknown_user = server.login("ghost@x.com", "pw").await?;
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
    let unknown_user: Value = unknown_user.json().await?;

    assert_eq!(wrong_password, unknown_user);
    Ok(())
}

#[tokio::test]
async fn protected_routes_reject_missing_and_invalid_tokens() -> Result<()> {
    let server = common::start_server().await?;

    let res = server.client.get(server.url("/get_comments")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = server.get("/get_comments", "garbage").await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = server
        .client
        .get(server.url("/get_role"))
        .header("authorization", "Basic dXNlcjpwdw==")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn token_of_deleted_user_has_no_role() -> Result<()> {
    let server = common::start_server().await?;
    let admin = server.token_for("admin@x.com", "admin").await?;
    let user = server.token_for("u@x.com", "user").await?;

    let res = server.delete("/delete_user/u@x.com", &admin).await?;
    assert_eq!(res.status(), StatusCode::OK);

    // Token still verifies, but the user row is gone
    let res = server.get("/get_role", &user).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}
