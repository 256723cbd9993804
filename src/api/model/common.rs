use crate::util::pagination::PageWindow;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Success envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub message: String,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }
}

/// Success envelope for list endpoints.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub message: String,
    pub data: Vec<T>,
    pub pagination: Pagination,
}

impl<T: Serialize> PaginatedResponse<T> {
    pub fn new(message: impl Into<String>, data: Vec<T>, window: PageWindow, total: i64) -> Self {
        Self {
            message: message.into(),
            data,
            pagination: Pagination {
                page: window.page,
                limit: window.limit,
                total,
                total_pages: window.total_pages(total),
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Pagination {
    #[schema(example = 1)]
    pub page: i64,
    #[schema(example = 10)]
    pub limit: i64,
    #[schema(example = 42)]
    pub total: i64,
    #[schema(example = 5)]
    pub total_pages: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Course deleted successfully")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Name and count pair used by the stats endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct GroupCount {
    #[schema(example = "Computer Engineering")]
    pub name: String,
    #[schema(example = 25)]
    pub count: i64,
}

impl From<(String, i64)> for GroupCount {
    fn from((name, count): (String, i64)) -> Self {
        GroupCount { name, count }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// current page of the pagination
    #[param(default = 1, example = 1)]
    pub page: Option<i64>,
    /// number of items per page, at most 100
    #[param(default = 10, example = 10)]
    pub limit: Option<i64>,
    /// free text search
    pub search: Option<String>,
}

impl ListQuery {
    pub fn window(&self) -> PageWindow {
        PageWindow::new(self.page, self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paginated_response_serializes_envelope() {
        let window = PageWindow::new(Some(2), Some(10));
        let response = PaginatedResponse::new("Courses retrieved successfully", vec![1, 2], window, 12);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["message"], "Courses retrieved successfully");
        assert_eq!(json["data"], serde_json::json!([1, 2]));
        assert_eq!(json["pagination"]["page"], 2);
        assert_eq!(json["pagination"]["total"], 12);
        assert_eq!(json["pagination"]["total_pages"], 2);
    }
}
