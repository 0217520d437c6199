mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::*;
use dvdrental::dvdrental_auth::create_access_token_at;
use dvdrental::dvdrental_config::{CorsConfig, JwtConfig};
use dvdrental::dvdrental_models::{Role, RoleName, User};
use dvdrental::router::init_router;
use dvdrental::testing::{
    ADMIN_ROLE_ID, CUSTOMER_ROLE_ID, InMemoryUserCache, Op, test_jwt_config, test_state,
};
use serde_json::json;

const RENTAL_URI: &str = "/v1/rentals/1";

#[tokio::test]
async fn test_missing_header_is_401() {
    let db = seeded_db();
    let app = app(&db);

    let res = send(&app, get(RENTAL_URI)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.error(), "unauthorized");
}

#[tokio::test]
async fn test_malformed_authorization_headers_are_401() {
    let db = seeded_db();
    let (admin_id, _) = seed_users(&db);
    seed_catalog(&db);
    let state = test_state(&db);
    let token = token_for(&state, admin_id);
    let app = init_router(state);

    for value in [
        format!("Bearer{token}"),
        format!("Token {token}"),
        format!("Bearer {token} extra"),
        "Bearer ".to_string(),
        token.clone(),
    ] {
        let res = send(&app, get_with_auth(RENTAL_URI, &value)).await;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED, "accepted {value:?}");
        assert_eq!(res.error(), "unauthorized");
    }

    let res = send(&app, get_with_auth(RENTAL_URI, &format!("bearer {token}"))).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn test_expired_token_is_401() {
    let db = seeded_db();
    let (admin_id, _) = seed_users(&db);
    seed_catalog(&db);
    let state = test_state(&db);
    let issued = (Utc::now() - Duration::days(10)).timestamp();
    let token = create_access_token_at(admin_id, issued, &state.jwt_config).unwrap();
    let app = init_router(state);

    let res = send(&app, get_with_token(RENTAL_URI, &token)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_from_other_issuer_is_401() {
    let db = seeded_db();
    let (admin_id, _) = seed_users(&db);
    let state = test_state(&db);
    let foreign = JwtConfig {
        issuer: "someone-else".to_string(),
        ..test_jwt_config()
    };
    let token = dvdrental::dvdrental_auth::create_access_token(admin_id, &foreign).unwrap();
    let app = init_router(state);

    let res = send(&app, get_with_token("/v1/movies", &token)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_deleted_user_is_401() {
    let db = seeded_db();
    let state = test_state(&db);
    let token = token_for(&state, 999);
    let app = init_router(state);

    let res = send(&app, get_with_token("/v1/movies", &token)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_unknown_role_name_fails_closed() {
    let db = seeded_db();
    let (admin_id, _) = seed_users(&db);
    db.rename_role(ADMIN_ROLE_ID, "superuser");
    let state = test_state(&db);
    let token = token_for(&state, admin_id);
    let app = init_router(state);

    let res = send(&app, get_with_token("/v1/movies", &token)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_role_store_failure_is_401() {
    let db = seeded_db();
    let (admin_id, _) = seed_users(&db);
    let state = test_state(&db);
    let token = token_for(&state, admin_id);
    db.fail(Op::RoleLookup);
    let app = init_router(state);

    let res = send(&app, get_with_token("/v1/movies", &token)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_customer_is_rejected_by_admin_gate() {
    let db = seeded_db();
    let (_, customer_id) = seed_users(&db);
    seed_catalog(&db);
    let state = test_state(&db);
    let token = token_for(&state, customer_id);
    let app = init_router(state);

    let res = send(&app, get_with_token(RENTAL_URI, &token)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);

    let res = send(&app, get_with_token("/v1/movies", &token)).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn test_same_token_validates_twice() {
    let db = seeded_db();
    let (admin_id, _) = seed_users(&db);
    seed_catalog(&db);
    let state = test_state(&db);
    let token = token_for(&state, admin_id);
    let app = init_router(state);

    for _ in 0..2 {
        let res = send(&app, get_with_token(RENTAL_URI, &token)).await;
        assert_eq!(res.status, StatusCode::OK);
    }
}

fn cached_user(id: i64, role: Role) -> User {
    User {
        id,
        email: CUSTOMER_EMAIL.to_string(),
        username: "mary".to_string(),
        password_hash: String::new(),
        role,
    }
}

#[tokio::test]
async fn test_cached_user_role_is_refreshed() {
    let db = seeded_db();
    let (_, customer_id) = seed_users(&db);
    seed_catalog(&db);

    // The cache claims admin, but role row 2 is the customer role.
    let cache = InMemoryUserCache::new();
    cache.insert(cached_user(
        customer_id,
        Role {
            id: CUSTOMER_ROLE_ID,
            name: RoleName::Admin,
            level: 10,
        },
    ));

    let state = test_state(&db).with_user_cache(Arc::new(cache));
    let token = token_for(&state, customer_id);
    let app = init_router(state);

    let res = send(&app, get_with_token(RENTAL_URI, &token)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cached_user_skips_user_lookup() {
    let db = seeded_db();
    let (admin_id, _) = seed_users(&db);
    seed_catalog(&db);

    let cache = InMemoryUserCache::new();
    cache.insert(cached_user(
        admin_id,
        Role {
            id: ADMIN_ROLE_ID,
            name: RoleName::Admin,
            level: 10,
        },
    ));
    db.fail(Op::UserLookup);

    let state = test_state(&db).with_user_cache(Arc::new(cache));
    let token = token_for(&state, admin_id);
    let app = init_router(state);

    let res = send(&app, get_with_token(RENTAL_URI, &token)).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn test_cached_user_with_removed_role_is_evicted() {
    let db = seeded_db();
    let (admin_id, _) = seed_users(&db);

    let cache = InMemoryUserCache::new();
    cache.insert(cached_user(
        admin_id,
        Role {
            id: ADMIN_ROLE_ID,
            name: RoleName::Admin,
            level: 10,
        },
    ));
    db.remove_role(ADMIN_ROLE_ID);

    let state = test_state(&db).with_user_cache(Arc::new(cache.clone()));
    let token = token_for(&state, admin_id);
    let app = init_router(state);

    let res = send(&app, get_with_token("/v1/movies", &token)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert!(!cache.contains(admin_id));
}

#[tokio::test]
async fn test_cached_user_reassigned_role_is_seen() {
    let db = seeded_db();
    let (admin_id, _) = seed_users(&db);
    seed_catalog(&db);

    let cache = InMemoryUserCache::new();
    cache.insert(cached_user(
        admin_id,
        Role {
            id: ADMIN_ROLE_ID,
            name: RoleName::Admin,
            level: 10,
        },
    ));
    db.set_user_role(admin_id, CUSTOMER_ROLE_ID);

    let state = test_state(&db).with_user_cache(Arc::new(cache.clone()));
    let token = token_for(&state, admin_id);
    let app = init_router(state);

    let res = send(&app, get_with_token(RENTAL_URI, &token)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert!(!cache.contains(admin_id));

    // Still authenticated, now as a customer.
    let res = send(&app, get_with_token("/v1/movies", &token)).await;
    assert_eq!(res.status, StatusCode::OK);
}

#[tokio::test]
async fn test_cached_user_role_id_lookup_failure_is_401() {
    let db = seeded_db();
    let (admin_id, _) = seed_users(&db);

    let cache = InMemoryUserCache::new();
    cache.insert(cached_user(
        admin_id,
        Role {
            id: ADMIN_ROLE_ID,
            name: RoleName::Admin,
            level: 10,
        },
    ));
    db.fail(Op::UserRoleLookup);

    let state = test_state(&db).with_user_cache(Arc::new(cache.clone()));
    let token = token_for(&state, admin_id);
    let app = init_router(state);

    let res = send(&app, get_with_token("/v1/movies", &token)).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert!(cache.contains(admin_id));
}

#[tokio::test]
async fn test_sign_in_warms_cache() {
    let db = seeded_db();
    seed_users(&db);
    let cache = InMemoryUserCache::new();
    let state = test_state(&db).with_user_cache(Arc::new(cache.clone()));
    let app = init_router(state);

    let res = send(
        &app,
        post_json(
            "/v1/auth/sign-in",
            json!({ "email": STAFF_EMAIL, "password": PASSWORD }),
        ),
    )
    .await;
    assert_eq!(res.status, StatusCode::OK);

    let admin = db.user_by_email(STAFF_EMAIL).unwrap();
    assert!(cache.contains(admin.id));
}

fn get_with_origin(uri: &str, origin: &str) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .uri(uri)
        .header(axum::http::header::ORIGIN, origin)
        .body(axum::body::Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_wildcard_origin_allows_any_origin_without_credentials() {
    let db = seeded_db();
    let mut state = test_state(&db);
    state.cors_config = CorsConfig {
        allowed_origins: vec!["*".to_string()],
    };
    let app = init_router(state);

    let res = send(&app, get_with_origin("/v1/health", "https://anywhere.test")).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.headers["access-control-allow-origin"], "*");
    assert!(!res.headers.contains_key("access-control-allow-credentials"));
}

#[tokio::test]
async fn test_listed_origin_allows_credentials() {
    let db = seeded_db();
    let mut state = test_state(&db);
    state.cors_config = CorsConfig {
        allowed_origins: vec!["https://app.test".to_string()],
    };
    let app = init_router(state);

    let res = send(&app, get_with_origin("/v1/health", "https://app.test")).await;
    assert_eq!(res.headers["access-control-allow-origin"], "https://app.test");
    assert_eq!(res.headers["access-control-allow-credentials"], "true");

    let res = send(&app, get_with_origin("/v1/health", "https://other.test")).await;
    assert!(!res.headers.contains_key("access-control-allow-origin"));
}
