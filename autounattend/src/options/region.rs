use serde::{Deserialize, Serialize};
use validator::Validate;

/// Language, locale and time zone applied during WinPE and OOBE.
#[derive(Clone, Serialize, Deserialize, Validate, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct RegionLanguage {
    #[validate(length(min = 2))]
    pub ui_language: String,

    pub ui_language_fallback: Option<String>,

    /// Keyboard layout in `LANGID:KLID` form, e.g. `0411:00000411`.
    #[validate(length(min = 1))]
    pub input_locale: String,

    #[validate(length(min = 2))]
    pub system_locale: String,

    #[validate(length(min = 2))]
    pub user_locale: String,

    /// Windows time zone name, e.g. `Tokyo Standard Time`.
    pub timezone: Option<String>,

    /// Nation GeoID.
    pub geo_location: Option<u32>,
}

impl Default for RegionLanguage {
    fn default() -> Self {
        Self {
            ui_language: String::from("ja-JP"),
            ui_language_fallback: Some(String::from("en-US")),
            input_locale: String::from("0411:00000411"),
            system_locale: String::from("ja-JP"),
            user_locale: String::from("ja-JP"),
            timezone: Some(String::from("Tokyo Standard Time")),
            geo_location: Some(122),
        }
    }
}
