use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use validator::{Validate, ValidationErrors};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, EnumIter, Display, Default)]
pub enum PerformanceMode {
    /// Let Windows choose.
    #[default]
    Balanced,
    BestAppearance,
    BestPerformance,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct VisualEffects {
    pub performance_mode: PerformanceMode,
    pub transparency: bool,
    pub animations: bool,
}

impl Default for VisualEffects {
    fn default() -> Self {
        Self {
            performance_mode: PerformanceMode::default(),
            transparency: true,
            animations: true,
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, EnumIter, Display, Default)]
pub enum IconSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl IconSize {
    pub fn pixels(&self) -> u32 {
        match self {
            IconSize::Small => 32,
            IconSize::Medium => 48,
            IconSize::Large => 96,
        }
    }
}

/// Desktop icons and wallpaper.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct DesktopSettings {
    pub show_this_pc: bool,
    pub show_user_files: bool,
    pub show_network: bool,
    pub show_recycle_bin: bool,
    pub show_control_panel: bool,
    pub icon_size: IconSize,
    pub auto_arrange: bool,
    pub wallpaper: Option<String>,
}

impl Default for DesktopSettings {
    fn default() -> Self {
        Self {
            show_this_pc: false,
            show_user_files: false,
            show_network: false,
            show_recycle_bin: true,
            show_control_panel: false,
            icon_size: IconSize::default(),
            auto_arrange: false,
            wallpaper: None,
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, EnumIter, Display, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

/// A `#RRGGBB` accent color. The leading `#` is optional.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct AccentColor(pub String);

impl Default for AccentColor {
    fn default() -> Self {
        Self(String::from("#0078D4"))
    }
}

impl AccentColor {
    /// The ABGR DWORD Windows stores for this color, or `None` when the value
    /// is not six hex digits. The alpha byte is always opaque, so the result
    /// is `0xFF000000 | B << 16 | G << 8 | R`.
    pub fn to_dword(&self) -> Option<u32> {
        let hex = self.0.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let rgb = u32::from_str_radix(hex, 16).ok()?;
        let (r, g, b) = ((rgb >> 16) & 0xFF, (rgb >> 8) & 0xFF, rgb & 0xFF);
        Some(0xFF00_0000 | (b << 16) | (g << 8) | r)
    }
}

impl Validate for AccentColor {
    fn validate(&self) -> std::result::Result<(), ValidationErrors> {
        if self.to_dword().is_none() {
            let mut errors = ValidationErrors::new();
            errors.add(
                "accent_color",
                validator::ValidationError::new("Invalid accent color. Expected format: #RRGGBB"),
            );
            return Err(errors);
        }
        Ok(())
    }
}

/// Theme and accent color.
#[derive(Clone, Serialize, Deserialize, Validate, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Personalization {
    pub theme: Theme,

    #[validate(nested)]
    pub accent_color: Option<AccentColor>,

    /// Show the accent color on Start and the taskbar.
    pub color_start_and_taskbar: bool,

    /// Show the accent color on title bars and window borders.
    pub color_title_bars: bool,
}
