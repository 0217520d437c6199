use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// A rental customer, eligible to register with the customer role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Customer {
    pub id: i64,
    pub store_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub user_id: Option<i64>,
}

impl Customer {
    pub fn is_registered(&self) -> bool {
        self.user_id.is_some()
    }
}

/// Body of `POST /v1/customers`.
///
/// Every field is optional at the serde level so that a missing field is
/// reported by validation as `required` rather than as a decode error.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateCustomerPayload {
    #[validate(required, range(min = 1))]
    #[schema(example = 1)]
    pub store_id: Option<i64>,
    #[validate(required, length(min = 3, max = 20))]
    #[schema(example = "Mary")]
    pub first_name: Option<String>,
    #[validate(required, length(min = 3, max = 20))]
    #[schema(example = "Smith")]
    pub last_name: Option<String>,
    #[validate(required, email)]
    #[schema(example = "mary.smith@example.com")]
    pub email: Option<String>,
}

impl CreateCustomerPayload {
    /// Returns `None` if a required field is absent.
    pub fn into_new_customer(self) -> Option<NewCustomer> {
        Some(NewCustomer {
            store_id: self.store_id?,
            first_name: self.first_name?,
            last_name: self.last_name?,
            email: self.email?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub store_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}
