#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use chrono::{TimeZone, Utc};
use dvdrental::dvdrental_auth::create_access_token;
use dvdrental::dvdrental_models::{AccountLink, Movie, Rental};
use dvdrental::router::init_router;
use dvdrental::state::AppState;
use dvdrental::testing::{InMemoryDb, test_state};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

pub const PASSWORD: &str = "password123";

pub const STAFF_ID: i64 = 1;
pub const STAFF_EMAIL: &str = "mike.hillyer@sakilastaff.com";
pub const CUSTOMER_ID: i64 = 7;
pub const CUSTOMER_EMAIL: &str = "mary.smith@sakilacustomer.org";

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
    pub raw: Vec<u8>,
}

impl TestResponse {
    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}

/// Seeded with one unregistered staff member and one unregistered customer.
pub fn seeded_db() -> InMemoryDb {
    let db = InMemoryDb::new();
    db.add_staff(STAFF_ID, STAFF_EMAIL);
    db.add_customer(CUSTOMER_ID, CUSTOMER_EMAIL);
    db
}

/// Registers the seeded staff member and customer directly in the store.
/// Returns `(admin_id, customer_user_id)`.
pub fn seed_users(db: &InMemoryDb) -> (i64, i64) {
    let admin = db.add_user(STAFF_EMAIL, "mike", PASSWORD, AccountLink::Staff(STAFF_ID));
    let customer = db.add_user(
        CUSTOMER_EMAIL,
        "mary",
        PASSWORD,
        AccountLink::Customer(CUSTOMER_ID),
    );
    (admin, customer)
}

pub fn seed_catalog(db: &InMemoryDb) {
    db.add_movie(Movie {
        id: 1,
        title: "Academy Dinosaur".to_string(),
        description: Some("An epic drama of a feminist and a mad scientist".to_string()),
        release_year: Some(2006),
        available_to_rent: 8,
    });
    db.add_movie(Movie {
        id: 2,
        title: "Ace Goldfinger".to_string(),
        description: Some("An astounding epistle of a database administrator".to_string()),
        release_year: Some(2010),
        available_to_rent: 3,
    });
    db.add_movie(Movie {
        id: 3,
        title: "Adaptation Holes".to_string(),
        description: None,
        release_year: Some(2001),
        available_to_rent: 0,
    });
    db.add_rental(Rental {
        id: 1,
        rental_date: Utc.with_ymd_and_hms(2005, 5, 24, 22, 53, 30).unwrap(),
        return_date: Some(Utc.with_ymd_and_hms(2005, 5, 26, 22, 4, 30).unwrap()),
        inventory_id: 367,
    });
}

pub fn app(db: &InMemoryDb) -> Router {
    init_router(test_state(db))
}

pub fn token_for(state: &AppState, user_id: i64) -> String {
    create_access_token(user_id, &state.jwt_config).unwrap()
}

pub fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_json_with_token(uri: &str, body: Value, token: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_with_auth(uri: &str, authorization: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, authorization)
        .body(Body::empty())
        .unwrap()
}

pub fn get_with_token(uri: &str, token: &str) -> Request<Body> {
    get_with_auth(uri, &format!("Bearer {token}"))
}

pub async fn send(app: &Router, req: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let raw = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    let body = serde_json::from_slice(&raw).unwrap_or(Value::Null);

    TestResponse {
        status,
        headers,
        body,
        raw,
    }
}
