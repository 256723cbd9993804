use sqlx::types::chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Instructor {
    pub id: i64,
    pub user_id: i64,
    pub staff_id: String,
    pub name: String,
    pub middle_name: Option<String>,
    pub surname: String,
    pub faculty: Option<String>,
    pub program: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CourseInstructor {
    pub id: i64,
    pub instructor_id: i64,
    pub course_section_id: i64,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
