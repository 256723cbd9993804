use crate::db::entity::course::{Course, CourseSection, Curriculum};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use crate::util::validation::validate_not_blank;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCurriculumRequest {
    #[validate(length(min = 1, max = 20), custom(function = "validate_not_blank"))]
    #[schema(example = "CPE-2565")]
    pub code: String,
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    #[schema(example = "Bachelor of Engineering in Computer Engineering")]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StoredCurriculum {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Curriculum> for StoredCurriculum {
    fn from(c: Curriculum) -> Self {
        StoredCurriculum {
            id: c.id,
            code: c.code,
            name: c.name,
            description: c.description,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCourseRequest {
    #[validate(range(min = 1))]
    #[schema(example = 1)]
    pub curriculum_id: i64,
    #[validate(length(min = 1, max = 20), custom(function = "validate_not_blank"))]
    #[schema(example = "CPE401")]
    pub code: String,
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    #[schema(example = "Cooperative Education")]
    pub name: String,
    #[validate(range(min = 1, max = 10))]
    #[schema(example = 6)]
    pub credits: i32,
    pub description: Option<String>,
    pub prerequisites: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCourseRequest {
    #[validate(range(min = 1))]
    pub curriculum_id: Option<i64>,
    #[validate(length(min = 1, max = 20), custom(function = "validate_not_blank"))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    #[validate(range(min = 1, max = 10))]
    pub credits: Option<i32>,
    pub description: Option<String>,
    pub prerequisites: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CourseListQuery {
    #[param(default = 1)]
    pub page: Option<i64>,
    #[param(default = 10)]
    pub limit: Option<i64>,
    /// matches code or name
    pub search: Option<String>,
    pub curriculum_id: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StoredCourse {
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

impl From<Course> for StoredCourse {
    fn from(c: Course) -> Self {
        StoredCourse {
            id: c.id,
            curriculum_id: c.curriculum_id,
            code: c.code,
            name: c.name,
            credits: c.credits,
            description: c.description,
            prerequisites: c.prerequisites,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCourseSectionRequest {
    #[validate(range(min = 1))]
    pub course_id: i64,
    #[validate(length(min = 1, max = 10))]
    #[schema(example = "01")]
    pub section: String,
    #[validate(range(min = 1, max = 3))]
    #[schema(example = 1)]
    pub semester: i32,
    #[validate(range(min = 2020, max = 2030))]
    #[schema(example = 2025)]
    pub year: i32,
    /// defaults to 30
    #[validate(range(min = 1, max = 200))]
    pub max_students: Option<i32>,
    #[schema(example = "Mon 09:00-12:00")]
    pub schedule: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCourseSectionRequest {
    #[validate(range(min = 1))]
    pub course_id: Option<i64>,
    #[validate(length(min = 1, max = 10))]
    pub section: Option<String>,
    #[validate(range(min = 1, max = 3))]
    pub semester: Option<i32>,
    #[validate(range(min = 2020, max = 2030))]
    pub year: Option<i32>,
    #[validate(range(min = 1, max = 200))]
    pub max_students: Option<i32>,
    pub schedule: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CourseSectionListQuery {
    #[param(default = 1)]
    pub page: Option<i64>,
    #[param(default = 10)]
    pub limit: Option<i64>,
    pub course_id: Option<i64>,
    pub semester: Option<i32>,
    pub year: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StoredCourseSection {
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

impl From<CourseSection> for StoredCourseSection {
    fn from(s: CourseSection) -> Self {
        StoredCourseSection {
            id: s.id,
            course_id: s.course_id,
            section: s.section,
            semester: s.semester,
            year: s.year,
            max_students: s.max_students,
            schedule: s.schedule,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_bounds_are_enforced() {
        let request = CreateCourseSectionRequest {
            course_id: 1,
            section: "01".to_string(),
            semester: 4,
            year: 2019,
            max_students: Some(0),
            schedule: None,
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("semester"));
        assert!(fields.contains_key("year"));
        assert!(fields.contains_key("max_students"));
    }

    #[test]
    fn blank_course_code_or_name_is_rejected_on_update() {
        let request = UpdateCourseRequest {
            curriculum_id: None,
            code: Some("   ".to_string()),
            name: Some(" ".to_string()),
            credits: None,
            description: None,
            prerequisites: None,
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("code"));
        assert!(fields.contains_key("name"));

        let request = UpdateCourseRequest {
            curriculum_id: None,
            code: None,
            name: Some("Cooperative Education".to_string()),
            credits: None,
            description: None,
            prerequisites: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn credits_must_be_between_one_and_ten() {
        let request = CreateCourseRequest {
            curriculum_id: 1,
            code: "CPE401".to_string(),
            name: "Cooperative Education".to_string(),
            credits: 12,
            description: None,
            prerequisites: None,
        };
        assert!(request.validate().unwrap_err().field_errors().contains_key("credits"));
    }
}
