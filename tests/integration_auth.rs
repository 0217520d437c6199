mod common;

use axum::http::StatusCode;
use common::*;
use dvdrental::dvdrental_auth::verify_token;
use dvdrental::dvdrental_models::AccountLink;
use dvdrental::testing::{InMemoryDb, Op, test_jwt_config};
use serde_json::json;

fn register_body(email: &str, username: &str) -> serde_json::Value {
    json!({ "email": email, "username": username, "password": PASSWORD })
}

fn sign_in_body(email: &str, password: &str) -> serde_json::Value {
    json!({ "email": email, "password": password })
}

#[tokio::test]
async fn test_register_staff_then_sign_in() {
    let db = seeded_db();
    let app = app(&db);

    let res = send(&app, post_json("/v1/auth/register", register_body(STAFF_EMAIL, "mike"))).await;
    assert_eq!(res.status, StatusCode::CREATED);
    assert!(res.raw.is_empty());

    let user = db.user_by_email(STAFF_EMAIL).unwrap();
    assert_eq!(db.staff_user_id(STAFF_ID), Some(user.id));
    assert_ne!(user.password_hash, PASSWORD);

    let res = send(&app, post_json("/v1/auth/sign-in", sign_in_body(STAFF_EMAIL, PASSWORD))).await;
    assert_eq!(res.status, StatusCode::OK);
    let token = res.body["data"].as_str().unwrap();
    assert!(!token.is_empty());

    let claims = verify_token(token, &test_jwt_config()).unwrap();
    assert_eq!(claims.user_id().unwrap(), user.id);
}

#[tokio::test]
async fn test_register_customer_links_customer_row() {
    let db = seeded_db();
    let app = app(&db);

    let res = send(
        &app,
        post_json("/v1/auth/register", register_body(CUSTOMER_EMAIL, "mary")),
    )
    .await;
    assert_eq!(res.status, StatusCode::CREATED);

    let user = db.user_by_email(CUSTOMER_EMAIL).unwrap();
    assert_eq!(user.role_id, dvdrental::testing::CUSTOMER_ROLE_ID);
    assert_eq!(db.customer_user_id(CUSTOMER_ID), Some(user.id));
}

#[tokio::test]
async fn test_register_already_linked_staff() {
    let db = seeded_db();
    seed_users(&db);
    let app = app(&db);

    let res = send(&app, post_json("/v1/auth/register", register_body(STAFF_EMAIL, "other"))).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.error().contains("already registered"));
}

#[tokio::test]
async fn test_register_already_linked_customer() {
    let db = seeded_db();
    seed_users(&db);
    let app = app(&db);

    let res = send(
        &app,
        post_json("/v1/auth/register", register_body(CUSTOMER_EMAIL, "other")),
    )
    .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.error(), "customer already registered");
}

#[tokio::test]
async fn test_register_unknown_email() {
    let db = seeded_db();
    let app = app(&db);

    let res = send(
        &app,
        post_json("/v1/auth/register", register_body("nobody@example.com", "nobody")),
    )
    .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.error().contains("failed to get customer"));
    assert_eq!(db.user_count(), 0);
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let db = seeded_db();
    let app = app(&db);

    let res = send(&app, post_json("/v1/auth/register", register_body(STAFF_EMAIL, "taken"))).await;
    assert_eq!(res.status, StatusCode::CREATED);

    let res = send(
        &app,
        post_json("/v1/auth/register", register_body(CUSTOMER_EMAIL, "taken")),
    )
    .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.error(), "username already exists");
    assert_eq!(db.customer_user_id(CUSTOMER_ID), None);
}

#[tokio::test]
async fn test_register_validation_errors() {
    let db = seeded_db();
    let app = app(&db);

    let res = send(
        &app,
        post_json(
            "/v1/auth/register",
            json!({ "email": STAFF_EMAIL, "username": "mi", "password": PASSWORD }),
        ),
    )
    .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        res.error(),
        "Key: 'RegisterUserPayload.Username' Error:Field validation for 'Username' failed on the 'min' tag"
    );

    let res = send(
        &app,
        post_json("/v1/auth/register", json!({ "email": STAFF_EMAIL, "username": "mike" })),
    )
    .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.error().contains("failed on the 'required' tag"));

    let res = send(
        &app,
        post_json(
            "/v1/auth/register",
            json!({ "email": STAFF_EMAIL, "username": "mike", "password": PASSWORD, "role": "admin" }),
        ),
    )
    .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.error(), "body contains unknown key \"role\"");

    assert_eq!(db.user_count(), 0);
}

#[tokio::test]
async fn test_register_persistence_failure_is_500() {
    let db = seeded_db();
    db.fail(Op::Register);
    let app = app(&db);

    let res = send(&app, post_json("/v1/auth/register", register_body(STAFF_EMAIL, "mike"))).await;
    assert_eq!(res.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        res.error(),
        "the server encountered a problem and could not process your request"
    );
}

#[tokio::test]
async fn test_register_staff_lookup_failure_is_400() {
    let db = seeded_db();
    db.fail(Op::StaffLookup);
    let app = app(&db);

    let res = send(&app, post_json("/v1/auth/register", register_body(STAFF_EMAIL, "mike"))).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert!(res.error().starts_with("failed to get staff"));
}

#[tokio::test]
async fn test_sign_in_wrong_password() {
    let db = seeded_db();
    seed_users(&db);
    let app = app(&db);

    let res = send(
        &app,
        post_json("/v1/auth/sign-in", sign_in_body(CUSTOMER_EMAIL, "wrong-password")),
    )
    .await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.error(), "unauthorized");
}

#[tokio::test]
async fn test_sign_in_customer() {
    let db = seeded_db();
    let (_, customer_id) = seed_users(&db);
    let app = app(&db);

    let res = send(&app, post_json("/v1/auth/sign-in", sign_in_body(CUSTOMER_EMAIL, PASSWORD))).await;
    assert_eq!(res.status, StatusCode::OK);

    let claims = verify_token(res.body["data"].as_str().unwrap(), &test_jwt_config()).unwrap();
    assert_eq!(claims.user_id().unwrap(), customer_id);
}

#[tokio::test]
async fn test_sign_in_unregistered_customer_is_400() {
    let db = seeded_db();
    let app = app(&db);

    let res = send(&app, post_json("/v1/auth/sign-in", sign_in_body(CUSTOMER_EMAIL, PASSWORD))).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.error(), "no rows in result set");
}

#[tokio::test]
async fn test_sign_in_unknown_email_is_400() {
    let db = InMemoryDb::new();
    let app = app(&db);

    let res = send(
        &app,
        post_json("/v1/auth/sign-in", sign_in_body("ghost@example.com", PASSWORD)),
    )
    .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sign_in_same_email_registered_as_staff_only() {
    let db = InMemoryDb::new();
    db.add_staff(3, "jon.stephens@sakilastaff.com");
    db.add_user("jon.stephens@sakilastaff.com", "jon", PASSWORD, AccountLink::Staff(3));
    let app = app(&db);

    let res = send(
        &app,
        post_json("/v1/auth/sign-in", sign_in_body("jon.stephens@sakilastaff.com", PASSWORD)),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_then_sign_in_when_email_is_staff_and_unlinked_customer() {
    let email = "both@sakilastaff.com";
    let db = InMemoryDb::new();
    db.add_staff(2, email);
    db.add_customer(9, email);
    let app = app(&db);

    let res = send(&app, post_json("/v1/auth/register", register_body(email, "both"))).await;
    assert_eq!(res.status, StatusCode::CREATED);
    let user = db.user_by_email(email).unwrap();
    assert_eq!(db.staff_user_id(2), Some(user.id));
    assert_eq!(db.customer_user_id(9), None);

    let res = send(&app, post_json("/v1/auth/sign-in", sign_in_body(email, PASSWORD))).await;
    assert_eq!(res.status, StatusCode::OK);
    let claims = verify_token(res.body["data"].as_str().unwrap(), &test_jwt_config()).unwrap();
    assert_eq!(claims.user_id().unwrap(), user.id);
}

#[tokio::test]
async fn test_sign_in_unlinked_customer_and_unlinked_staff_is_400() {
    let email = "both@sakilastaff.com";
    let db = InMemoryDb::new();
    db.add_staff(2, email);
    db.add_customer(9, email);
    let app = app(&db);

    let res = send(&app, post_json("/v1/auth/sign-in", sign_in_body(email, PASSWORD))).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.error(), "no rows in result set");
}

#[tokio::test]
async fn test_sign_in_short_password_fails_validation() {
    let db = seeded_db();
    let app = app(&db);

    let res = send(&app, post_json("/v1/auth/sign-in", sign_in_body(CUSTOMER_EMAIL, "short"))).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        res.error(),
        "Key: 'SignInPayload.Password' Error:Field validation for 'Password' failed on the 'min' tag"
    );
}
