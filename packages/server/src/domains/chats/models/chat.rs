use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;

/// Preview of the latest message in a chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastMessage {
    pub text: String,
    pub at: DateTime<Utc>,
}

/// Chat document. Membership is a list of user ids (phone numbers).
#[derive(sqlx::FromRow, Debug, Clone, PartialEq)]
pub struct Chat {
    pub id: i64,
    pub room: String,
    pub members: Vec<String>,
    #[sqlx(json)]
    pub last_message: LastMessage,
    pub created_at: DateTime<Utc>,
}

/// Fields for a chat that has not been stored yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewChat {
    pub room: String,
    pub members: Vec<String>,
    pub last_message: LastMessage,
}

impl NewChat {
    /// The chat every member sees before they have any of their own.
    pub fn welcome(member_id: &str) -> Self {
        Self {
            room: "general".to_string(),
            members: vec![member_id.to_string(), "user_999".to_string()],
            last_message: LastMessage {
                text: "Hey there 👋".to_string(),
                at: Utc::now(),
            },
        }
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl Chat {
    /// Newest chats containing `member_id`
    pub async fn find_recent_for_member(
        member_id: &str,
        limit: i64,
        pool: &PgPool,
    ) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>(
            "SELECT * FROM chats WHERE $1 = ANY(members) ORDER BY id DESC LIMIT $2",
        )
        .bind(member_id)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(Into::into)
    }

    /// Insert new chat
    pub async fn insert(chat: &NewChat, pool: &PgPool) -> Result<Self> {
        sqlx::query_as::<_, Self>(
            "INSERT INTO chats (room, members, last_message)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(&chat.room)
        .bind(&chat.members)
        .bind(Json(&chat.last_message))
        .fetch_one(pool)
        .await
        .map_err(Into::into)
    }

    /// Insert the member's welcome chat; a no-op if it already exists.
    ///
    /// `welcome_for` is unique, so concurrent first listings seed one chat.
    pub async fn insert_welcome(member_id: &str, pool: &PgPool) -> Result<bool> {
        let chat = NewChat::welcome(member_id);
        let result = sqlx::query(
            "INSERT INTO chats (room, members, last_message, welcome_for)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (welcome_for) DO NOTHING",
        )
        .bind(&chat.room)
        .bind(&chat.members)
        .bind(Json(&chat.last_message))
        .bind(member_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_chat() {
        let chat = NewChat::welcome("+19995550123");
        assert_eq!(chat.room, "general");
        assert_eq!(chat.members, vec!["+19995550123", "user_999"]);
        assert_eq!(chat.last_message.text, "Hey there 👋");
    }
}
