use super::{Contribute, reg_dword, run_synchronous};
use crate::{commands::PendingCommand, modules::ModuleResults, options::ConfigModel};
use anyhow::Result;
use autounattend_xml::{Document, Element, Pass};
use tracing::debug;

const LAB_CONFIG: &str = r"HKLM\SYSTEM\Setup\LabConfig";

/// Edition, product key, WinPE behavior and OOBE screens.
#[derive(Clone, Debug, Default)]
pub struct Setup;

impl Contribute for Setup {
    fn apply(
        &self,
        document: &mut Document,
        config: &ConfigModel,
        _modules: &ModuleResults,
    ) -> Result<Vec<PendingCommand>> {
        let setup = document.get_or_create_component(Pass::WindowsPe, "Microsoft-Windows-Setup")?;

        // Edition and licensing
        let user_data = document.get_or_create_child(setup, "UserData");
        if let Some(key) = &config.edition.product_key {
            let product_key = document.get_or_create_child(user_data, "ProductKey");
            document.add_element(product_key, "Key", Some(key));
            document.add_value(product_key, "WillShowUI", "OnError");
        }
        document.add_value(user_data, "AcceptEula", config.edition.accept_eula);

        if let Some(edition) = &config.edition.edition {
            let image_install = document.get_or_create_child(setup, "ImageInstall");
            let os_image = document.get_or_create_child(image_install, "OSImage");
            let install_from = document.get_or_create_child(os_image, "InstallFrom");
            let metadata = document.append(
                install_from,
                Element::new("MetaData").with_attribute("wcm:action", "add"),
            );
            document.add_value(metadata, "Key", "/IMAGE/NAME");
            document.add_element(metadata, "Value", Some(edition));
        }

        // WinPE
        let pe = &config.windows_pe;
        if pe.bypass_requirements {
            debug!("Bypassing Windows 11 hardware requirements");
            for check in ["BypassTPMCheck", "BypassSecureBootCheck", "BypassCPUCheck", "BypassRAMCheck"] {
                run_synchronous(
                    document,
                    setup,
                    &reg_dword(LAB_CONFIG, check, 1),
                    &format!("Set {check}"),
                );
            }
        }
        if pe.disable_firewall {
            document.add_value(setup, "EnableFirewall", false);
        }
        if pe.enable_network {
            document.add_value(setup, "EnableNetwork", true);
        }

        // OOBE
        let behavior = &config.setup;
        let shell = document.get_or_create_component(Pass::OobeSystem, "Microsoft-Windows-Shell-Setup")?;
        let oobe = document.get_or_create_child(shell, "OOBE");
        document.add_value(oobe, "HideEULAPage", behavior.hide_eula_page);
        document.add_value(oobe, "HideOEMRegistrationScreen", behavior.hide_oem_registration);
        document.add_value(oobe, "HideOnlineAccountScreens", behavior.hide_online_account_screens);
        document.add_value(oobe, "HideWirelessSetupInOOBE", behavior.hide_wireless_setup);
        document.add_value(oobe, "NetworkLocation", behavior.network_location);
        document.add_value(oobe, "ProtectYourPC", behavior.protect_your_pc);
        document.add_value(oobe, "SkipMachineOOBE", behavior.skip_machine_oobe);
        document.add_value(oobe, "SkipUserOOBE", behavior.skip_user_oobe);

        if behavior.bypass_network_check {
            let deployment =
                document.get_or_create_component(Pass::Specialize, "Microsoft-Windows-Deployment")?;
            run_synchronous(
                document,
                deployment,
                &reg_dword(r"HKLM\SOFTWARE\Microsoft\Windows\CurrentVersion\OOBE", "BypassNRO", 1),
                "Allow OOBE without a network connection",
            );
        }

        Ok(Vec::new())
    }
}
