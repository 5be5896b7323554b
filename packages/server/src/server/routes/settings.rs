use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domains::users::actions::update_settings;
use crate::domains::users::models::Preferences;
use crate::server::app::AppState;
use crate::server::error::ApiError;
use crate::server::middleware::CurrentUser;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsRequest {
    pub preferred_languages: Vec<String>,
    pub show_original: bool,
}

impl SettingsRequest {
    pub fn into_preferences(self) -> Result<Preferences, ApiError> {
        if self.preferred_languages.is_empty() {
            return Err(ApiError::Validation(
                "preferredLanguages must not be empty".to_string(),
            ));
        }
        Ok(Preferences {
            languages: self.preferred_languages,
            show_original: self.show_original,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

/// POST /settings
pub async fn settings_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<SettingsRequest>,
) -> Result<Json<OkResponse>, ApiError> {
    let preferences = body.into_preferences()?;
    update_settings(&user.id, preferences, &state.deps).await?;
    Ok(Json(OkResponse { ok: true }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_language_order() {
        let body: SettingsRequest =
            serde_json::from_str(r#"{"preferredLanguages":["fr","en"],"showOriginal":false}"#)
                .unwrap();
        let prefs = body.into_preferences().unwrap();
        assert_eq!(prefs.languages, vec!["fr", "en"]);
        assert!(!prefs.show_original);
    }

    #[test]
    fn test_empty_languages_rejected() {
        let body = SettingsRequest {
            preferred_languages: vec![],
            show_original: true,
        };
        assert!(matches!(body.into_preferences(), Err(ApiError::Validation(_))));
    }
}
