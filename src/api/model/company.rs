use crate::db::entity::company::Company;
use crate::util::validation::validate_thai_phone;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCompanyRequest {
    #[validate(length(min = 1, max = 200))]
    #[schema(example = "Siam Robotics Co., Ltd.")]
    pub name: String,
    pub address: Option<String>,
    #[schema(example = "Chiang Mai")]
    pub province: Option<String>,
    #[validate(custom(function = "validate_thai_phone"))]
    #[schema(example = "053-123-456")]
    pub phone_number: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(url)]
    #[schema(example = "https://siamrobotics.co.th")]
    pub website: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCompanyRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub address: Option<String>,
    pub province: Option<String>,
    #[validate(custom(function = "validate_thai_phone"))]
    pub phone_number: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(url)]
    pub website: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StoredCompany {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub province: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Company> for StoredCompany {
    fn from(c: Company) -> Self {
        StoredCompany {
            id: c.id,
            name: c.name,
            address: c.address,
            province: c.province,
            phone_number: c.phone_number,
            email: c.email,
            website: c.website,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}
