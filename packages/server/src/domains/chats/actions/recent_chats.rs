//! Recent chats action

use anyhow::Result;
use tracing::info;

use crate::domains::chats::models::Chat;
use crate::kernel::ServerDeps;

/// Most chats returned by one listing
pub const RECENT_CHATS_LIMIT: usize = 20;

/// Newest chats for `member_id`.
///
/// A member with no chats gets the welcome chat first, so the list is never
/// empty.
pub async fn recent_chats(member_id: &str, deps: &ServerDeps) -> Result<Vec<Chat>> {
    let chats = deps
        .chats
        .recent_for_member(member_id, RECENT_CHATS_LIMIT)
        .await?;
    if !chats.is_empty() {
        return Ok(chats);
    }

    if deps.chats.insert_welcome(member_id).await? {
        info!(member_id = %member_id, "Seeded welcome chat");
    }

    deps.chats
        .recent_for_member(member_id, RECENT_CHATS_LIMIT)
        .await
}
