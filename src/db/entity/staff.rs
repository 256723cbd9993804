use sqlx::types::chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Staff {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub middle_name: Option<String>,
    pub surname: String,
    pub position: Option<String>,
    pub department: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
