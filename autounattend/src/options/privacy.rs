use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, EnumIter, Display, Default)]
pub enum ExpressMode {
    /// Windows defaults: location and Find My Device off.
    #[default]
    Default,
    AllEnabled,
    AllDisabled,
    /// Use the individual toggles.
    Custom,
}

/// The privacy choices normally offered on the OOBE express settings page.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ExpressSettings {
    pub mode: ExpressMode,
    pub diagnostics: bool,
    pub inking: bool,
    pub tailored_experiences: bool,
    pub advertising_id: bool,
    pub location: bool,
    pub find_my_device: bool,
}

/// The resolved state of each express setting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExpressToggles {
    pub diagnostics: bool,
    pub inking: bool,
    pub tailored_experiences: bool,
    pub advertising_id: bool,
    pub location: bool,
    pub find_my_device: bool,
}

impl ExpressToggles {
    fn all(enabled: bool) -> Self {
        Self {
            diagnostics: enabled,
            inking: enabled,
            tailored_experiences: enabled,
            advertising_id: enabled,
            location: enabled,
            find_my_device: enabled,
        }
    }
}

impl ExpressSettings {
    pub fn toggles(&self) -> ExpressToggles {
        match self.mode {
            ExpressMode::Default => ExpressToggles {
                location: false,
                find_my_device: false,
                ..ExpressToggles::all(true)
            },
            ExpressMode::AllEnabled => ExpressToggles::all(true),
            ExpressMode::AllDisabled => ExpressToggles::all(false),
            ExpressMode::Custom => ExpressToggles {
                diagnostics: self.diagnostics,
                inking: self.inking,
                tailored_experiences: self.tailored_experiences,
                advertising_id: self.advertising_id,
                location: self.location,
                find_my_device: self.find_my_device,
            },
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, EnumIter, Display, Default)]
pub enum WdacMode {
    #[default]
    Audit,
    Enforce,
}

/// Windows Defender Application Control.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Wdac {
    pub enabled: bool,
    pub mode: WdacMode,
    /// Also enable hypervisor-protected code integrity.
    pub hvci: bool,
}
