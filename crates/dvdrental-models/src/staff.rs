use serde::Serialize;
use sqlx::FromRow;

/// A pre-provisioned staff member, eligible to register as an admin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Staff {
    pub id: i64,
    pub email: String,
    pub user_id: Option<i64>,
}

impl Staff {
    pub fn is_registered(&self) -> bool {
        self.user_id.is_some()
    }
}
