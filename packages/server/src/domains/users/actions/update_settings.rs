//! Update settings action

use anyhow::{anyhow, Result};
use tracing::info;

use crate::domains::users::models::Preferences;
use crate::kernel::ServerDeps;

/// Replace the user's preferences wholesale.
pub async fn update_settings(
    user_id: &str,
    preferences: Preferences,
    deps: &ServerDeps,
) -> Result<()> {
    let updated = deps
        .users
        .replace_preferences(user_id, &preferences)
        .await?;

    if !updated {
        return Err(anyhow!("User not found: {}", user_id));
    }

    info!(
        user_id = %user_id,
        languages = ?preferences.languages,
        show_original = preferences.show_original,
        "Preferences updated"
    );
    Ok(())
}
