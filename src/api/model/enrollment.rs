use crate::db::entity::enrollment::StudentEnrollStatus;
use crate::util::validation::validate_term_status;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEnrollmentStatusRequest {
    #[validate(range(min = 1))]
    pub student_id: i64,
    #[validate(range(min = 1, max = 3))]
    pub semester: i32,
    #[validate(range(min = 2020, max = 2030))]
    pub year: i32,
    /// active, inactive, graduated or dropped. Defaults to active.
    #[validate(custom(function = "validate_term_status"))]
    pub status: Option<String>,
    #[validate(range(min = 0.0, max = 4.0))]
    pub gpa: Option<f64>,
    #[validate(range(min = 0, max = 30))]
    pub credits: Option<i32>,
    #[validate(range(min = 1))]
    pub instructor_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateEnrollmentStatusRequest {
    #[validate(custom(function = "validate_term_status"))]
    pub status: Option<String>,
    #[validate(range(min = 0.0, max = 4.0))]
    pub gpa: Option<f64>,
    #[validate(range(min = 0, max = 30))]
    pub credits: Option<i32>,
    #[validate(range(min = 1))]
    pub instructor_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EnrollmentStatusListQuery {
    #[param(default = 1)]
    pub page: Option<i64>,
    #[param(default = 10)]
    pub limit: Option<i64>,
    pub student_id: Option<i64>,
    pub semester: Option<i32>,
    pub year: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StoredEnrollmentStatus {
    pub id: i64,
    pub student_id: i64,
    pub semester: i32,
    pub year: i32,
    #[schema(example = "active")]
    pub status: String,
    pub gpa: Option<f64>,
    pub credits: i32,
    pub instructor_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StudentEnrollStatus> for StoredEnrollmentStatus {
    fn from(s: StudentEnrollStatus) -> Self {
        StoredEnrollmentStatus {
            id: s.id,
            student_id: s.student_id,
            semester: s.semester,
            year: s.year,
            status: s.status,
            gpa: s.gpa,
            credits: s.credits,
            instructor_id: s.instructor_id,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}
