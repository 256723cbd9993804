//! Extractors whose rejections render as the JSON error envelope.

use crate::error::error_model::AppError;
use axum::extract::{Path, Query};
use axum::Json;
use axum_extra::extract::WithRejection;

pub type AppJson<T> = WithRejection<Json<T>, AppError>;
pub type AppPath<T> = WithRejection<Path<T>, AppError>;
pub type AppQuery<T> = WithRejection<Query<T>, AppError>;
