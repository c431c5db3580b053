use super::accounts::Secret;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use validator::Validate;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, EnumIter, Display, Default)]
pub enum WifiAuthentication {
    Open,
    #[strum(serialize = "WPA2PSK")]
    #[serde(rename = "WPA2PSK")]
    Wpa2Psk,
    #[default]
    #[strum(serialize = "WPA3SAE")]
    #[serde(rename = "WPA3SAE")]
    Wpa3Sae,
}

impl WifiAuthentication {
    pub fn encryption(&self) -> &'static str {
        match self {
            WifiAuthentication::Open => "none",
            _ => "AES",
        }
    }

    pub fn authentication(&self) -> &'static str {
        match self {
            WifiAuthentication::Open => "open",
            WifiAuthentication::Wpa2Psk => "WPA2PSK",
            WifiAuthentication::Wpa3Sae => "WPA3SAE",
        }
    }
}

/// A wireless network profile installed during specialize.
#[derive(Clone, Serialize, Deserialize, Validate, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct WifiSettings {
    /// Leave empty to skip Wi-Fi setup.
    #[validate(length(max = 32))]
    pub ssid: String,

    pub password: Secret,
    pub authentication: WifiAuthentication,
    pub connect_automatically: bool,
}

impl WifiSettings {
    pub fn is_configured(&self) -> bool {
        !self.ssid.trim().is_empty()
    }
}
