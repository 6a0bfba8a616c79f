// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;
use validator::ValidationErrors;

use crate::domain::services::crawl_service::CrawlError;

/// 应用错误类型
///
/// 封装所有可能的应用层错误，校验失败映射为400，其余映射为500
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl AppError {
    /// 构造请求校验错误
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(CrawlError::InvalidRequest(message.into()).into())
    }

    fn status(&self) -> StatusCode {
        if let Some(CrawlError::InvalidRequest(_)) = self.0.downcast_ref::<CrawlError>() {
            return StatusCode::BAD_REQUEST;
        }
        if self.0.downcast_ref::<ValidationErrors>().is_some() {
            return StatusCode::BAD_REQUEST;
        }
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.0.to_string();
        if status.is_server_error() {
            error!("Request failed: {:#}", self.0);
        }

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
