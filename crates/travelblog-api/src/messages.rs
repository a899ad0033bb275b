use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::debug;
use uuid::Uuid;

use travelblog_types::api::{CreateMessageRequest, StatusMessage};
use travelblog_types::models::Message;

use crate::error::{ApiError, require};
use crate::{AppState, with_db};

pub async fn create_message(
    State(state): State<AppState>,
    payload: Result<Json<CreateMessageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    require("username", &req.username)?;
    require("content", &req.content)?;

    let message = with_db(&state, move |db| {
        let row = db.insert_message(&req.username, &req.content)?;
        Ok(row.into_message()?)
    })
    .await?;

    Ok((StatusCode::CREATED, Json(message)))
}

pub async fn get_messages(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let messages = with_db(&state, |db| {
        db.list_messages()?
            .into_iter()
            .map(|row| row.into_message().map_err(ApiError::from))
            .collect::<Result<Vec<Message>, _>>()
    })
    .await?;

    Ok(Json(messages))
}

/// Deleting an id that matches nothing still succeeds; an id that is not a
/// UUID at all cannot name a message and is reported as not found.
pub async fn delete_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id: Uuid = id.parse().map_err(|_| ApiError::MessageNotFound)?;

    let removed = with_db(&state, move |db| Ok(db.delete_message(&id.to_string())?)).await?;
    if !removed {
        debug!("Delete for message {} matched nothing", id);
    }

    Ok(Json(StatusMessage::new("Message deleted successfully")))
}
