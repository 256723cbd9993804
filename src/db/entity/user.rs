use sqlx::types::chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// User row joined with the name of its role.
#[derive(Debug, Clone, FromRow)]
pub struct Users {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    pub password_hash: String,
    pub role_id: i64,
    pub role_name: String,
    pub tokens_valid_after: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct RoleCount {
    pub role_id: i64,
    pub role_name: String,
    pub count: i64,
}
