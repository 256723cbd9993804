use crate::db::entity::visitor::{VisitorEvaluation, VisitorSchedule, VisitorTraining};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateVisitorTrainingRequest {
    #[validate(range(min = 1))]
    pub student_enroll_id: i64,
    #[validate(range(min = 1))]
    pub visitor_instructor_id: i64,
    #[validate(range(min = 1))]
    pub company_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateVisitorTrainingRequest {
    #[validate(range(min = 1))]
    pub visitor_instructor_id: Option<i64>,
    #[validate(range(min = 1))]
    pub company_id: Option<i64>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct VisitorTrainingListQuery {
    #[param(default = 1)]
    pub page: Option<i64>,
    #[param(default = 10)]
    pub limit: Option<i64>,
    pub student_enroll_id: Option<i64>,
    pub visitor_instructor_id: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StoredVisitorTraining {
    pub id: i64,
    pub student_enroll_id: i64,
    pub visitor_instructor_id: i64,
    pub company_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<VisitorTraining> for StoredVisitorTraining {
    fn from(t: VisitorTraining) -> Self {
        StoredVisitorTraining {
            id: t.id,
            student_enroll_id: t.student_enroll_id,
            visitor_instructor_id: t.visitor_instructor_id,
            company_id: t.company_id,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateVisitorScheduleRequest {
    #[validate(range(min = 1))]
    pub visitor_training_id: i64,
    #[validate(range(min = 1, max = 4))]
    #[schema(example = 1)]
    pub visit_no: i32,
    pub visit_at: Option<DateTime<Utc>>,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateVisitorScheduleRequest {
    #[validate(range(min = 1, max = 4))]
    pub visit_no: Option<i32>,
    pub visit_at: Option<DateTime<Utc>>,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

/// Filter shared by schedule and evaluation lists.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TrainingScopedQuery {
    #[param(default = 1)]
    pub page: Option<i64>,
    #[param(default = 10)]
    pub limit: Option<i64>,
    pub visitor_training_id: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StoredVisitorSchedule {
    pub id: i64,
    pub visitor_training_id: i64,
    pub visit_no: i32,
    pub visit_at: Option<DateTime<Utc>>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<VisitorSchedule> for StoredVisitorSchedule {
    fn from(s: VisitorSchedule) -> Self {
        StoredVisitorSchedule {
            id: s.id,
            visitor_training_id: s.visitor_training_id,
            visit_no: s.visit_no,
            visit_at: s.visit_at,
            comment: s.comment,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

/// Evaluation body. `company_id` is ignored for student evaluations.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEvaluationRequest {
    #[validate(range(min = 1))]
    pub visitor_training_id: i64,
    #[validate(range(min = 1))]
    pub company_id: Option<i64>,
    #[validate(range(min = 0, max = 100))]
    #[schema(example = 85)]
    pub score: i32,
    /// free form answers keyed by question
    #[schema(value_type = Object, example = json!({"punctuality": 5, "teamwork": 4}))]
    pub questions: Option<Value>,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateEvaluationRequest {
    #[validate(range(min = 0, max = 100))]
    pub score: Option<i32>,
    #[schema(value_type = Object)]
    pub questions: Option<Value>,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StoredEvaluation {
    pub id: i64,
    pub visitor_training_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<i64>,
    pub score: i32,
    #[schema(value_type = Object)]
    pub questions: Option<Value>,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<VisitorEvaluation> for StoredEvaluation {
    fn from(e: VisitorEvaluation) -> Self {
        StoredEvaluation {
            id: e.id,
            visitor_training_id: e.visitor_training_id,
            company_id: e.company_id,
            score: e.score,
            questions: e.questions,
            comment: e.comment,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visit_number_and_score_bounds() {
        let schedule = CreateVisitorScheduleRequest {
            visitor_training_id: 1,
            visit_no: 5,
            visit_at: None,
            comment: None,
        };
        assert!(schedule.validate().unwrap_err().field_errors().contains_key("visit_no"));

        let evaluation = CreateEvaluationRequest {
            visitor_training_id: 1,
            company_id: None,
            score: 101,
            questions: None,
            comment: None,
        };
        assert!(evaluation.validate().unwrap_err().field_errors().contains_key("score"));
    }
}
