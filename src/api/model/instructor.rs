use crate::api::model::common::GroupCount;
use crate::db::entity::instructor::{CourseInstructor, Instructor};
use crate::util::validation::validate_assignment_role;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateInstructorRequest {
    #[validate(range(min = 1))]
    #[schema(example = 5)]
    pub user_id: i64,
    #[validate(length(min = 1, max = 20))]
    #[schema(example = "T0042")]
    pub staff_id: String,
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Suda")]
    pub name: String,
    #[validate(length(max = 100))]
    pub middle_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Rakdee")]
    pub surname: String,
    pub faculty: Option<String>,
    pub program: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateInstructorRequest {
    #[validate(length(min = 1, max = 20))]
    pub staff_id: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    pub middle_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub surname: Option<String>,
    pub faculty: Option<String>,
    pub program: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InstructorListQuery {
    #[param(default = 1)]
    pub page: Option<i64>,
    #[param(default = 10)]
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub faculty: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AssignCourseRequest {
    #[validate(range(min = 1))]
    pub instructor_id: i64,
    #[validate(range(min = 1))]
    pub course_section_id: i64,
    /// instructor, assistant or coordinator
    #[validate(custom(function = "validate_assignment_role"))]
    #[schema(example = "instructor")]
    pub role: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAssignmentRequest {
    #[validate(custom(function = "validate_assignment_role"))]
    #[schema(example = "coordinator")]
    pub role: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StoredInstructor {
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

impl From<Instructor> for StoredInstructor {
    fn from(i: Instructor) -> Self {
        StoredInstructor {
            id: i.id,
            user_id: i.user_id,
            staff_id: i.staff_id,
            name: i.name,
            middle_name: i.middle_name,
            surname: i.surname,
            faculty: i.faculty,
            program: i.program,
            created_at: i.created_at,
            updated_at: i.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StoredCourseAssignment {
    pub id: i64,
    pub instructor_id: i64,
    pub course_section_id: i64,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CourseInstructor> for StoredCourseAssignment {
    fn from(a: CourseInstructor) -> Self {
        StoredCourseAssignment {
            id: a.id,
            instructor_id: a.instructor_id,
            course_section_id: a.course_section_id,
            role: a.role,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InstructorStats {
    pub total: i64,
    pub by_faculty: Vec<GroupCount>,
}
