//! Identity resolution.
//!
//! Staff rows map to the admin role and customer rows to the customer role.
//! A user id always resolves to a [`User`] carrying its role.

use dvdrental_models::{AccountLink, Role, RoleName, User};
use tracing::{debug, instrument};

use crate::store::{Store, StoreError};

/// Outcome of looking up an email that wants to register.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub role: Role,
    pub link: AccountLink,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("staff member already registered")]
    StaffAlreadyRegistered,

    #[error("customer already registered")]
    CustomerAlreadyRegistered,

    #[error("failed to get staff: {0}")]
    StaffLookup(StoreError),

    #[error("failed to get customer: {0}")]
    CustomerLookup(StoreError),

    #[error("failed to get role: {0}")]
    Role(StoreError),

    #[error("failed to get user: {0}")]
    User(StoreError),
}

pub struct IdentityResolver<'a> {
    store: &'a Store,
}

impl<'a> IdentityResolver<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Staff take precedence over customers. An email unknown to the staff
    /// table falls through to the customer table; an email unknown to both
    /// surfaces the customer lookup error.
    #[instrument(skip(self))]
    pub async fn classify_for_registration(
        &self,
        email: &str,
    ) -> Result<Classification, IdentityError> {
        match self.store.staff.get_staff_by_email(email).await {
            Ok(staff) if staff.is_registered() => Err(IdentityError::StaffAlreadyRegistered),
            Ok(staff) => {
                let role = self.role(RoleName::Admin).await?;
                debug!(staff_id = staff.id, "email belongs to staff");
                Ok(Classification {
                    role,
                    link: AccountLink::Staff(staff.id),
                })
            }
            Err(StoreError::NotFound) => {
                let customer = self
                    .store
                    .customers
                    .get_customer_by_email(email)
                    .await
                    .map_err(IdentityError::CustomerLookup)?;

                if customer.user_id.is_some() {
                    return Err(IdentityError::CustomerAlreadyRegistered);
                }

                let role = self.role(RoleName::Customer).await?;
                debug!(customer_id = customer.id, "email belongs to customer");
                Ok(Classification {
                    role,
                    link: AccountLink::Customer(customer.id),
                })
            }
            Err(err) => Err(IdentityError::StaffLookup(err)),
        }
    }

    /// Loads a user and its current role.
    #[instrument(skip(self))]
    pub async fn resolve_by_id(&self, user_id: i64) -> Result<User, IdentityError> {
        let record = self
            .store
            .users
            .get_user_by_id(user_id)
            .await
            .map_err(IdentityError::User)?;

        let role = self
            .store
            .roles
            .get_role_by_id(record.role_id)
            .await
            .map_err(IdentityError::Role)?;

        Ok(record.with_role(role))
    }

    async fn role(&self, name: RoleName) -> Result<Role, IdentityError> {
        self.store
            .roles
            .get_role_by_name(name)
            .await
            .map_err(IdentityError::Role)
    }
}
