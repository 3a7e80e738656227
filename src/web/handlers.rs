use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::ClientError;
use crate::models::ActivityMap;

#[derive(Debug, Deserialize)]
pub(crate) struct EmailQuery {
    email: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct MessageResponse {
    message: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct ErrorResponse {
    detail: String,
}

impl IntoResponse for ClientError {
    fn into_response(self) -> Response {
        let status = match self {
            ClientError::ActivityNotFound => StatusCode::NOT_FOUND,
            ClientError::AlreadySignedUp | ClientError::NotSignedUp => StatusCode::BAD_REQUEST,
        };
        let body = ErrorResponse {
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub(crate) async fn root_handler() -> Redirect {
    Redirect::temporary("/static/index.html")
}

pub(crate) async fn list_activities_handler(State(state): State<AppState>) -> Json<ActivityMap> {
    Json(state.service.list().await)
}

pub(crate) async fn signup_handler(
    State(state): State<AppState>,
    Path(activity_name): Path<String>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<MessageResponse>, ClientError> {
    let message = state.service.signup(&activity_name, &query.email).await?;
    Ok(Json(MessageResponse { message }))
}

pub(crate) async fn unregister_handler(
    State(state): State<AppState>,
    Path(activity_name): Path<String>,
    Query(query): Query<EmailQuery>,
) -> Result<Json<MessageResponse>, ClientError> {
    let message = state
        .service
        .unregister(&activity_name, &query.email)
        .await?;
    Ok(Json(MessageResponse { message }))
}
