use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;

use super::Preferences;

/// User document, keyed by phone number.
///
/// `id` is immutable once written. Records are created on first successful
/// OTP verification and never deleted.
#[derive(sqlx::FromRow, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub display_name: Option<String>,
    #[sqlx(json)]
    pub preferences: Preferences,
    /// Storage bookkeeping, not part of the client-facing record.
    #[serde(skip_serializing, default)]
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Record a first-time user with default preferences.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            preferences: Preferences::default(),
            created_at: Utc::now(),
        }
    }
}

// =============================================================================
// SQL Queries - ALL queries must be in models/
// =============================================================================

impl User {
    /// Find user by phone number
    pub async fn find_by_id(id: &str, pool: &PgPool) -> Result<Option<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(Into::into)
    }

    /// Find users whose phone number is in `ids`
    pub async fn find_by_ids(ids: &[String], limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        sqlx::query_as::<_, Self>("SELECT * FROM users WHERE id = ANY($1) ORDER BY id LIMIT $2")
            .bind(ids)
            .bind(limit)
            .fetch_all(pool)
            .await
            .map_err(Into::into)
    }

    /// Insert the user unless one already exists, then return the stored row.
    ///
    /// The conditional insert is a single statement, so concurrent callers for
    /// the same phone never overwrite each other's preferences.
    pub async fn insert_if_absent(id: &str, pool: &PgPool) -> Result<Self> {
        let fresh = Self::new(id);
        sqlx::query(
            "INSERT INTO users (id, display_name, preferences, created_at)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(&fresh.id)
        .bind(&fresh.display_name)
        .bind(Json(&fresh.preferences))
        .bind(fresh.created_at)
        .execute(pool)
        .await?;

        Self::find_by_id(id, pool)
            .await?
            .ok_or_else(|| anyhow!("user {} missing after insert", id))
    }

    /// Overwrite preferences. Returns false if no such user.
    pub async fn replace_preferences(
        id: &str,
        preferences: &Preferences,
        pool: &PgPool,
    ) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET preferences = $2 WHERE id = $1")
            .bind(id)
            .bind(Json(preferences))
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
