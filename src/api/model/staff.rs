use crate::db::entity::staff::Staff;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateStaffRequest {
    #[validate(range(min = 1))]
    pub user_id: i64,
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Malee")]
    pub name: String,
    #[validate(length(max = 100))]
    pub middle_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "Sukjai")]
    pub surname: String,
    #[schema(example = "Co-op coordinator")]
    pub position: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStaffRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 100))]
    pub middle_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub surname: Option<String>,
    pub position: Option<String>,
    pub department: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StoredStaff {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub middle_name: Option<String>,
    pub surname: String,
    pub position: Option<String>,
    pub department: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Staff> for StoredStaff {
    fn from(s: Staff) -> Self {
        StoredStaff {
            id: s.id,
            user_id: s.user_id,
            name: s.name,
            middle_name: s.middle_name,
            surname: s.surname,
            position: s.position,
            department: s.department,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}
