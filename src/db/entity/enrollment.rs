use sqlx::types::chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct StudentEnroll {
    pub id: i64,
    pub student_id: i64,
    pub course_section_id: i64,
    pub status: String,
    pub grade: Option<String>,
    pub grade_points: Option<f64>,
    pub enrolled_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct StudentEnrollStatus {
    pub id: i64,
    pub student_id: i64,
    pub semester: i32,
    pub year: i32,
    pub status: String,
    pub gpa: Option<f64>,
    pub credits: i32,
    pub instructor_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
