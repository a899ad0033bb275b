use axum::{Json, extract::State, response::IntoResponse};

use travelblog_types::models::Destination;

use crate::error::ApiError;
use crate::{AppState, with_db};

pub async fn list_destinations(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let destinations = with_db(&state, |db| {
        db.list_destinations()?
            .into_iter()
            .map(|row| row.into_destination().map_err(ApiError::from))
            .collect::<Result<Vec<Destination>, _>>()
    })
    .await?;

    Ok(Json(destinations))
}
