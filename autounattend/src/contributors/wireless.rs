use super::Contribute;
use crate::{commands::PendingCommand, modules::ModuleResults, options::ConfigModel};
use anyhow::Result;
use autounattend_xml::{Document, Element, Pass};
use tracing::debug;

/// Wireless network profile.
#[derive(Clone, Debug, Default)]
pub struct Wireless;

impl Contribute for Wireless {
    fn apply(
        &self,
        document: &mut Document,
        config: &ConfigModel,
        _modules: &ModuleResults,
    ) -> Result<Vec<PendingCommand>> {
        let wifi = &config.wifi;
        if !wifi.is_configured() {
            return Ok(Vec::new());
        }
        debug!(ssid = %wifi.ssid, "Adding wireless profile");

        let component = document.get_or_create_component(Pass::Specialize, "Microsoft-Windows-WiFi-ConfigSP")?;
        let profiles = document.get_or_create_child(component, "WiFiProfiles");
        let profile = document.append(
            profiles,
            Element::new("WiFiProfile").with_attribute("wcm:action", "add"),
        );
        document.add_element(profile, "ProfileName", Some(&wifi.ssid));

        let ssid_config = document.append(profile, Element::new("SSIDConfig"));
        let ssid = document.append(ssid_config, Element::new("SSID"));
        document.add_element(ssid, "name", Some(&wifi.ssid));

        document.add_value(profile, "ConnectionType", "ESS");
        document.add_value(
            profile,
            "ConnectionMode",
            if wifi.connect_automatically { "auto" } else { "manual" },
        );

        let msm = document.append(profile, Element::new("MSM"));
        let security = document.append(msm, Element::new("security"));
        let auth = document.append(security, Element::new("authEncryption"));
        document.add_value(auth, "authentication", wifi.authentication.authentication());
        document.add_value(auth, "encryption", wifi.authentication.encryption());
        document.add_value(auth, "useOneX", false);

        if wifi.password.is_set() {
            let shared_key = document.append(security, Element::new("sharedKey"));
            document.add_value(shared_key, "keyType", "passPhrase");
            document.add_value(shared_key, "protected", false);
            document.add_element(shared_key, "keyMaterial", Some(wifi.password.expose()));
        }

        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Secret;
    use autounattend_xml::Architecture;

    #[test]
    fn skipped_without_ssid() {
        let mut document = Document::with_root(Architecture::Amd64).unwrap();

        Wireless
            .apply(&mut document, &ConfigModel::default(), &ModuleResults::new())
            .unwrap();

        assert!(document.find_all("WiFiProfile").is_empty());
    }

    #[test]
    fn writes_profile() {
        let mut config = ConfigModel::default();
        config.wifi.ssid = String::from("office");
        config.wifi.password = Secret::from("correct horse");
        config.wifi.connect_automatically = true;
        let mut document = Document::with_root(Architecture::Amd64).unwrap();

        Wireless.apply(&mut document, &config, &ModuleResults::new()).unwrap();

        let profile = document.find_all("WiFiProfile")[0];
        assert_eq!(document.child_text(profile, "ConnectionMode"), Some("auto"));
        let auth = document.find_all("authEncryption")[0];
        assert_eq!(document.child_text(auth, "authentication"), Some("WPA3SAE"));
        assert_eq!(document.find_all("keyMaterial").len(), 1);
    }
}
