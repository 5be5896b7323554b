use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::domains::chats::actions::recent_chats;
use crate::domains::chats::models::{Chat, LastMessage};
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::middleware::CurrentUser;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatItem {
    pub room: String,
    pub last_message: LastMessage,
    pub members: Vec<String>,
}

impl From<Chat> for ChatItem {
    fn from(chat: Chat) -> Self {
        Self {
            room: chat.room,
            last_message: chat.last_message,
            members: chat.members,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecentChatsResponse {
    pub items: Vec<ChatItem>,
}

/// GET /chats/recent
pub async fn recent_chats_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<RecentChatsResponse>, ApiError> {
    let chats = recent_chats(&user.id, &state.deps).await?;
    Ok(Json(RecentChatsResponse {
        items: chats.into_iter().map(ChatItem::from).collect(),
    }))
}
