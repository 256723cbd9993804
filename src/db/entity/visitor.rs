use sqlx::types::chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct VisitorTraining {
    pub id: i64,
    pub student_enroll_id: i64,
    pub visitor_instructor_id: i64,
    pub company_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct VisitorSchedule {
    pub id: i64,
    pub visitor_training_id: i64,
    pub visit_no: i32,
    pub visit_at: Option<DateTime<Utc>>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Shared shape of student and company evaluations. `company_id` is always NULL for students.
#[derive(Debug, Clone, FromRow)]
pub struct VisitorEvaluation {
    pub id: i64,
    pub visitor_training_id: i64,
    pub company_id: Option<i64>,
    pub score: i32,
    pub questions: Option<serde_json::Value>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
