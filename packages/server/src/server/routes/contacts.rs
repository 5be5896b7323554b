use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::domains::contacts::actions::sync_contacts;
use crate::domains::users::models::User;
use crate::server::app::AppState;
use crate::server::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct SyncRequest {
    pub numbers: Vec<String>,
}

/// POST /contacts/sync
pub async fn contacts_sync_handler(
    State(state): State<AppState>,
    Json(body): Json<SyncRequest>,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = sync_contacts(&body.numbers, &state.deps).await?;
    Ok(Json(users))
}
