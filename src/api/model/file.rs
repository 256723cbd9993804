use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Generated document in the uploads directory.
#[derive(Debug, Serialize, ToSchema)]
pub struct StoredFile {
    #[schema(example = "coop_letter_64010512345.pdf")]
    pub filename: String,
    #[schema(example = 48213)]
    pub size: u64,
    pub modified_at: Option<DateTime<Utc>>,
}
