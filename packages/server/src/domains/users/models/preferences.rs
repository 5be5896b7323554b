use serde::{Deserialize, Serialize};

/// Display preferences stored on the user document.
///
/// Always replaced as a whole; there is no field-level merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Ordered, non-empty list of language codes.
    pub languages: Vec<String>,
    pub show_original: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            languages: vec!["en".to_string()],
            show_original: true,
        }
    }
}
