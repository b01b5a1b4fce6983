use axum::Json;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// 调用方能区分的只有两类：参数错误和无数据
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            AppError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail),
            AppError::NotFound(detail) => (StatusCode::NOT_FOUND, detail),
        };

        let body = Json(ErrorResponse {
            success: false,
            detail,
        });

        (status, body).into_response()
    }
}
