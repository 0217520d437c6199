use anyhow::anyhow;
use dvdrental_auth::create_access_token;
use dvdrental_core::{AppError, hash_password, verify_password};
use dvdrental_models::{Credentials, NewUser, Registration};
use tracing::{info, instrument, warn};

use super::identity::IdentityResolver;
use crate::metrics::{track_sign_in_failure, track_sign_in_success, track_user_registered};
use crate::state::AppState;
use crate::store::StoreError;

pub struct AuthService;

impl AuthService {
    /// Creates a user for a pre-provisioned staff or customer email.
    #[instrument(skip(state, registration), fields(email = %registration.email))]
    pub async fn register_user(state: &AppState, registration: Registration) -> Result<(), AppError> {
        let classification = IdentityResolver::new(&state.store)
            .classify_for_registration(&registration.email)
            .await
            .map_err(AppError::bad_request)?;

        let cost = state.app_config.bcrypt_cost;
        let password = registration.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password, cost))
            .await
            .map_err(AppError::internal)??;

        let user = NewUser {
            email: registration.email,
            username: registration.username,
            password_hash,
            role_id: classification.role.id,
        };

        match state.store.users.register_user(user, classification.link).await {
            Ok(user_id) => {
                info!(user_id, role = %classification.role.name, "user registered");
                track_user_registered(classification.role.name);
                Ok(())
            }
            Err(
                err @ (StoreError::EmailTaken | StoreError::UsernameTaken | StoreError::AlreadyLinked),
            ) => Err(AppError::bad_request(err)),
            Err(err) => Err(AppError::internal(anyhow!("failed to register user: {err}"))),
        }
    }

    /// Exchanges an email and password for a signed token.
    #[instrument(skip(state, credentials), fields(email = %credentials.email))]
    pub async fn sign_in(state: &AppState, credentials: Credentials) -> Result<String, AppError> {
        let result = Self::authenticate(state, credentials).await;
        match &result {
            Ok(_) => track_sign_in_success(),
            Err(err) => track_sign_in_failure(err.status.as_u16()),
        }
        result
    }

    async fn authenticate(state: &AppState, credentials: Credentials) -> Result<String, AppError> {
        let customer_link = match state.store.customers.get_customer_by_email(&credentials.email).await {
            Ok(customer) => customer.user_id,
            Err(StoreError::NotFound) => None,
            Err(err) => return Err(AppError::bad_request(err)),
        };

        // An unlinked customer row may share its email with a registered staff member.
        let user_id = match customer_link {
            Some(user_id) => user_id,
            None => state
                .store
                .staff
                .get_staff_by_email(&credentials.email)
                .await
                .map_err(AppError::bad_request)?
                .user_id
                .ok_or_else(|| AppError::bad_request(StoreError::NotFound))?,
        };

        let record = state
            .store
            .users
            .get_user_by_id(user_id)
            .await
            .map_err(AppError::bad_request)?;

        let password = credentials.password;
        let hash = record.password_hash.clone();
        let matches = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(AppError::internal)?;

        if !matches!(matches, Ok(true)) {
            return Err(AppError::unauthorized(anyhow!(
                "password mismatch for user {}",
                record.id
            )));
        }

        let token = create_access_token(record.id, &state.jwt_config)?;
        info!(user_id = record.id, "user signed in");

        Self::warm_cache(state, record).await;

        Ok(token)
    }

    async fn warm_cache(state: &AppState, record: dvdrental_models::UserRecord) {
        let Some(cache) = &state.user_cache else {
            return;
        };

        let role = match state.store.roles.get_role_by_id(record.role_id).await {
            Ok(role) => role,
            Err(err) => {
                warn!(user_id = record.id, error = %err, "skipping user cache, role lookup failed");
                return;
            }
        };

        let user = record.with_role(role);
        if let Err(err) = cache.set(&user).await {
            warn!(user_id = user.id, error = %err, "failed to cache user");
        }
    }
}
