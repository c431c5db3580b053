use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, EnumIter, Display, Default)]
pub enum ExplorerStart {
    #[default]
    Home,
    ThisPc,
}

/// File Explorer preferences.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct ExplorerSettings {
    pub show_file_extensions: bool,
    pub show_hidden_files: bool,
    pub show_protected_os_files: bool,
    pub launch_to: ExplorerStart,
    pub expand_navigation_pane: bool,
}

impl Default for ExplorerSettings {
    fn default() -> Self {
        Self {
            show_file_extensions: true,
            show_hidden_files: false,
            show_protected_os_files: false,
            launch_to: ExplorerStart::default(),
            expand_navigation_pane: false,
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, EnumIter, Display, Default)]
pub enum TaskbarAlignment {
    Left,
    #[default]
    Center,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, EnumIter, Display, Default)]
pub enum SearchMode {
    Hidden,
    Icon,
    #[default]
    Box,
}

impl SearchMode {
    pub fn dword(&self) -> u32 {
        match self {
            SearchMode::Hidden => 0,
            SearchMode::Icon => 1,
            SearchMode::Box => 2,
        }
    }
}

/// Start menu and taskbar layout.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct StartTaskbar {
    pub alignment: TaskbarAlignment,
    pub show_widgets: bool,
    pub show_chat: bool,
    pub show_task_view: bool,
    pub search: SearchMode,
    pub show_start_suggestions: bool,
}

impl Default for StartTaskbar {
    fn default() -> Self {
        Self {
            alignment: TaskbarAlignment::default(),
            show_widgets: true,
            show_chat: true,
            show_task_view: true,
            search: SearchMode::default(),
            show_start_suggestions: true,
        }
    }
}

/// System-wide tweaks. Every flag is opt-in.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct SystemTweaks {
    pub disable_telemetry: bool,
    pub disable_cortana: bool,
    pub disable_web_search: bool,
    pub disable_game_bar: bool,
    pub disable_uac: bool,
    pub disable_smart_screen: bool,
    pub disable_fast_startup: bool,
    pub disable_hibernation: bool,
    pub disable_firewall: bool,
    pub disable_automatic_updates: bool,
    pub disable_defender: bool,
}
