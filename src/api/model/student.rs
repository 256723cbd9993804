use crate::api::model::common::GroupCount;
use crate::db::entity::enrollment::StudentEnroll;
use crate::db::entity::student::Student;
use crate::util::validation::{validate_enrollment_status, validate_student_id, validate_thai_phone};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStudentRequest {
    #[validate(range(min = 1))]
    #[schema(example = 7)]
    pub user_id: i64,
    /// 11 digits, dashes and spaces are ignored
    #[validate(custom(function = "validate_student_id"))]
    #[schema(example = "64-01-05-12345")]
    pub student_id: String,
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Somchai")]
    pub name: String,
    #[validate(length(max = 100))]
    pub middle_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Jaidee")]
    pub surname: String,
    #[validate(range(min = 0.0, max = 4.0))]
    #[schema(example = 3.25)]
    pub gpax: Option<f64>,
    #[validate(custom(function = "validate_thai_phone"))]
    #[schema(example = "081-234-5678")]
    pub phone_number: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[schema(example = "Computer Engineering")]
    pub major: Option<String>,
    pub program: Option<String>,
    #[schema(example = "Engineering")]
    pub faculty: Option<String>,
    pub campus: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentRequest {
    #[validate(custom(function = "validate_student_id"))]
    pub student_id: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    pub middle_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub surname: Option<String>,
    #[validate(range(min = 0.0, max = 4.0))]
    pub gpax: Option<f64>,
    #[validate(custom(function = "validate_thai_phone"))]
    pub phone_number: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub major: Option<String>,
    pub program: Option<String>,
    pub faculty: Option<String>,
    pub campus: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentListQuery {
    #[param(default = 1)]
    pub page: Option<i64>,
    #[param(default = 10)]
    pub limit: Option<i64>,
    /// matches name, surname, student id or email
    pub search: Option<String>,
    pub major: Option<String>,
    pub faculty: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EnrollStudentRequest {
    #[validate(range(min = 1))]
    #[schema(example = 1)]
    pub student_id: i64,
    #[validate(range(min = 1))]
    #[schema(example = 4)]
    pub course_section_id: i64,
    /// defaults to `enrolled`
    #[validate(custom(function = "validate_enrollment_status"))]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateEnrollmentRequest {
    #[validate(custom(function = "validate_enrollment_status"))]
    #[schema(example = "completed")]
    pub status: Option<String>,
    #[validate(length(min = 1, max = 2))]
    #[schema(example = "A")]
    pub grade: Option<String>,
    #[validate(range(min = 0.0, max = 4.0))]
    #[schema(example = 4.0)]
    pub grade_points: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StoredStudent {
    pub id: i64,
    pub user_id: i64,
    #[schema(example = "64010512345")]
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

impl From<Student> for StoredStudent {
    fn from(s: Student) -> Self {
        StoredStudent {
            id: s.id,
            user_id: s.user_id,
            student_id: s.student_id,
            name: s.name,
            middle_name: s.middle_name,
            surname: s.surname,
            gpax: s.gpax,
            phone_number: s.phone_number,
            email: s.email,
            major: s.major,
            program: s.program,
            faculty: s.faculty,
            campus: s.campus,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StoredEnrollment {
    pub id: i64,
    pub student_id: i64,
    pub course_section_id: i64,
    #[schema(example = "enrolled")]
    pub status: String,
    pub grade: Option<String>,
    pub grade_points: Option<f64>,
    pub enrolled_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StudentEnroll> for StoredEnrollment {
    fn from(e: StudentEnroll) -> Self {
        StoredEnrollment {
            id: e.id,
            student_id: e.student_id,
            course_section_id: e.course_section_id,
            status: e.status,
            grade: e.grade,
            grade_points: e.grade_points,
            enrolled_at: e.enrolled_at,
            updated_at: e.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StudentStats {
    pub total: i64,
    pub average_gpax: Option<f64>,
    pub by_major: Vec<GroupCount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateStudentRequest {
        CreateStudentRequest {
            user_id: 7,
            student_id: "64010512345".to_string(),
            name: "Somchai".to_string(),
            middle_name: None,
            surname: "Jaidee".to_string(),
            gpax: Some(3.5),
            phone_number: Some("081-234-5678".to_string()),
            email: Some("somchai@university.ac.th".to_string()),
            major: None,
            program: None,
            faculty: None,
            campus: None,
        }
    }

    #[test]
    fn accepts_valid_student() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn reports_every_failing_field() {
        let mut request = valid_request();
        request.student_id = "1234".to_string();
        request.gpax = Some(4.5);
        request.phone_number = Some("1234567890".to_string());
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert_eq!(fields.len(), 3);
        assert!(fields.contains_key("student_id"));
        assert!(fields.contains_key("gpax"));
        assert!(fields.contains_key("phone_number"));
    }

    #[test]
    fn enrollment_status_must_be_known() {
        let request = EnrollStudentRequest {
            student_id: 1,
            course_section_id: 2,
            status: Some("pending".to_string()),
        };
        assert!(request.validate().unwrap_err().field_errors().contains_key("status"));
    }
}
