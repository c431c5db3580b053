use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use validator::Validate;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, EnumIter, Display, Default)]
pub enum NetworkLocation {
    #[default]
    Home,
    Work,
    Other,
}

/// How much of OOBE is skipped.
#[derive(Clone, Serialize, Deserialize, Validate, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct SetupBehavior {
    pub hide_eula_page: bool,
    pub hide_oem_registration: bool,
    pub hide_online_account_screens: bool,
    pub hide_wireless_setup: bool,
    pub skip_machine_oobe: bool,
    pub skip_user_oobe: bool,

    /// Value of `ProtectYourPC` (1 recommended, 3 minimal).
    #[validate(range(min = 1, max = 3))]
    pub protect_your_pc: u8,

    pub network_location: NetworkLocation,

    /// Allow OOBE to finish without a network connection.
    pub bypass_network_check: bool,
}

impl Default for SetupBehavior {
    fn default() -> Self {
        Self {
            hide_eula_page: true,
            hide_oem_registration: true,
            hide_online_account_screens: true,
            hide_wireless_setup: false,
            skip_machine_oobe: false,
            skip_user_oobe: false,
            protect_your_pc: 3,
            network_location: NetworkLocation::default(),
            bypass_network_check: false,
        }
    }
}

/// Edition selection and licensing.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct WindowsEdition {
    /// Installation media index name, e.g. `Windows 11 Pro`.
    pub edition: Option<String>,
    pub product_key: Option<String>,
    pub accept_eula: bool,
}

/// Behavior of the WinPE pass.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct WindowsPe {
    /// Skip the TPM, Secure Boot, CPU and RAM checks of Windows 11 Setup.
    pub bypass_requirements: bool,
    pub disable_firewall: bool,
    pub enable_network: bool,
}
