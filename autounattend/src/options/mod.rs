//! The configuration model. Every category is optional in a config file and
//! falls back to its default.

use autounattend_xml::Architecture;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub mod accounts;
pub mod appearance;
pub mod computer;
pub mod disk;
pub mod features;
pub mod input;
pub mod network;
pub mod privacy;
pub mod region;
pub mod scripts;
pub mod setup;
pub mod shell;

pub use accounts::{Secret, UserAccount, UserAccounts};
pub use appearance::{AccentColor, DesktopSettings, Personalization, VisualEffects};
pub use computer::ComputerSettings;
pub use disk::{DiskConfig, Partition, PartitionSize, PartitionType};
pub use features::{AdditionalComponents, VmSupport};
pub use input::{LockKeys, StickyKeys};
pub use network::WifiSettings;
pub use privacy::{ExpressSettings, Wdac};
pub use region::RegionLanguage;
pub use scripts::{CustomScript, CustomScripts};
pub use setup::{SetupBehavior, WindowsEdition, WindowsPe};
pub use shell::{ExplorerSettings, StartTaskbar, SystemTweaks};

/// Everything that goes into an answer file.
#[derive(Clone, Serialize, Deserialize, Validate, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ConfigModel {
    pub architecture: Architecture,

    #[validate(nested)]
    pub region_language: RegionLanguage,

    #[validate(nested)]
    pub setup: SetupBehavior,

    pub edition: WindowsEdition,
    pub windows_pe: WindowsPe,

    #[validate(nested)]
    pub disk: DiskConfig,

    #[validate(nested)]
    pub computer: ComputerSettings,

    #[validate(nested)]
    pub accounts: UserAccounts,

    pub explorer: ExplorerSettings,
    pub taskbar: StartTaskbar,
    pub tweaks: SystemTweaks,
    pub visual_effects: VisualEffects,
    pub desktop: DesktopSettings,
    pub vm_support: VmSupport,

    #[validate(nested)]
    pub wifi: WifiSettings,

    pub express: ExpressSettings,
    pub lock_keys: LockKeys,
    pub sticky_keys: StickyKeys,

    #[validate(nested)]
    pub personalization: Personalization,

    /// Appx package names removed for all users.
    pub remove_apps: Vec<String>,

    #[validate(nested)]
    pub custom_scripts: CustomScripts,

    pub wdac: Wdac,
    pub components: AdditionalComponents,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_uses_defaults() {
        let config: ConfigModel = serde_json::from_str(
            r#"{"architecture": "arm64", "computer": {"computer_name": "LAB-7"}}"#,
        )
        .unwrap();

        assert_eq!(config.architecture, Architecture::Arm64);
        assert_eq!(config.computer.computer_name, "LAB-7");
        assert_eq!(config.region_language.ui_language, "ja-JP");
        assert_eq!(config.disk.partitions.len(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn nested_errors_are_reported() {
        let mut config = ConfigModel::default();
        config.computer.computer_name = String::from("not a valid name");
        config.personalization.accent_color = Some(AccentColor(String::from("blue")));

        let errors = config.validate().unwrap_err();
        let fields = errors.errors();
        assert!(fields.contains_key("computer"));
        assert!(fields.contains_key("personalization"));
    }
}
