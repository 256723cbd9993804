use sqlx::types::chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Student {
    pub id: i64,
    pub user_id: i64,
    pub student_id: String,
    pub name: String,
    pub middle_name: Option<String>,
    pub surname: String,
    pub gpax: Option<f64>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub major: Option<String>,
    pub program: Option<String>,
    pub faculty: Option<String>,
    pub campus: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
