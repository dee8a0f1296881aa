use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::response::{IntoResponse, Response};
use axum::Json;
use netls_core::{ErrCode, ServiceError};
use serde::Serialize;

/// Body of every response: `{code, message, data}`, always with HTTP 200.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

pub type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;

pub fn ok<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(Json(Envelope {
        code: ErrCode::SUCCEED.code,
        message: ErrCode::SUCCEED.msg.to_owned(),
        data: Some(data),
    }))
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("{0}")]
    Param(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Param(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Param(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (code, message) = match &self {
            ApiError::Service(err @ ServiceError::Db(_)) => {
                tracing::error!(error = %err, "request failed");
                let code = err.code();
                (code.code, code.msg.to_owned())
            }
            ApiError::Service(err) => (err.code().code, err.to_string()),
            ApiError::Param(msg) => (ErrCode::PARAM_ERROR.code, msg.clone()),
        };
        tracing::debug!(code, %message, "request rejected");

        Json(Envelope::<()> {
            code,
            message,
            data: None,
        })
        .into_response()
    }
}
