use sqlx::types::chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct Curriculum {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Course {
    pub id: i64,
    pub curriculum_id: i64,
    pub code: String,
    pub name: String,
    pub credits: i32,
    pub description: Option<String>,
    pub prerequisites: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct CourseSection {
    pub id: i64,
    pub course_id: i64,
    pub section: String,
    pub semester: i32,
    pub year: i32,
    pub max_students: i32,
    pub schedule: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
