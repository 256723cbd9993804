use crate::db::entity::user::{Role, RoleCount, Users};
use crate::util::validation::validate_password;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 2, max = 100))]
    #[schema(example = "Suda Rakdee")]
    pub full_name: String,
    #[validate(email)]
    #[schema(example = "suda@university.ac.th")]
    pub email: String,
    #[validate(custom(function = "validate_password"))]
    #[schema(example = "Password123!")]
    pub password: String,
    #[validate(range(min = 1))]
    #[schema(example = 2)]
    pub role_id: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(length(min = 2, max = 100))]
    pub full_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(range(min = 1))]
    pub role_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BulkDeleteUsersRequest {
    #[validate(length(min = 1, max = 100))]
    #[schema(example = json!([12, 13, 14]))]
    pub user_ids: Vec<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BulkDeleteResult {
    #[schema(example = 3)]
    pub deleted: u64,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserListQuery {
    #[param(default = 1)]
    pub page: Option<i64>,
    #[param(default = 10)]
    pub limit: Option<i64>,
    /// matches full name or email
    pub search: Option<String>,
    pub role_id: Option<i64>,
}

/// User as returned by the API. The password hash never leaves the service.
#[derive(Debug, Serialize, ToSchema)]
pub struct StoredUser {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Suda Rakdee")]
    pub full_name: String,
    #[schema(example = "suda@university.ac.th")]
    pub email: String,
    #[schema(example = 2)]
    pub role_id: i64,
    #[schema(example = "instructor")]
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Users> for StoredUser {
    fn from(user: Users) -> Self {
        StoredUser {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            role_id: user.role_id,
            role: user.role_name,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StoredRole {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "admin")]
    pub name: String,
}

impl From<Role> for StoredRole {
    fn from(role: Role) -> Self {
        StoredRole {
            id: role.id,
            name: role.name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoleUserCount {
    pub role_id: i64,
    pub role: String,
    pub count: i64,
}

impl From<RoleCount> for RoleUserCount {
    fn from(row: RoleCount) -> Self {
        RoleUserCount {
            role_id: row.role_id,
            role: row.role_name,
            count: row.count,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserStats {
    #[schema(example = 120)]
    pub total: i64,
    pub by_role: Vec<RoleUserCount>,
}
