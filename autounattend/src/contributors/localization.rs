use super::{Contribute, reg_sz};
use crate::{commands::PendingCommand, modules::ModuleResults, options::ConfigModel};
use anyhow::Result;
use autounattend_xml::{Document, NodeId, Pass};

/// Languages and locales for WinPE and the installed system.
#[derive(Clone, Debug, Default)]
pub struct Localization;

fn add_locales(document: &mut Document, component: NodeId, config: &ConfigModel) {
    let region = &config.region_language;
    document.add_element(component, "InputLocale", Some(&region.input_locale));
    document.add_element(component, "SystemLocale", Some(&region.system_locale));
    document.add_element(component, "UILanguage", Some(&region.ui_language));
    document.add_element(
        component,
        "UILanguageFallback",
        region.ui_language_fallback.as_deref(),
    );
    document.add_element(component, "UserLocale", Some(&region.user_locale));
}

impl Contribute for Localization {
    fn apply(
        &self,
        document: &mut Document,
        config: &ConfigModel,
        _modules: &ModuleResults,
    ) -> Result<Vec<PendingCommand>> {
        let region = &config.region_language;

        let winpe =
            document.get_or_create_component(Pass::WindowsPe, "Microsoft-Windows-International-Core-WinPE")?;
        let setup_ui = document.get_or_create_child(winpe, "SetupUILanguage");
        document.add_element(setup_ui, "UILanguage", Some(&region.ui_language));
        add_locales(document, winpe, config);

        let oobe =
            document.get_or_create_component(Pass::OobeSystem, "Microsoft-Windows-International-Core")?;
        add_locales(document, oobe, config);

        Ok(region
            .geo_location
            .map(|geo| {
                PendingCommand::new(
                    reg_sz(r"HKCU\Control Panel\International\Geo", "Nation", &geo.to_string()),
                    "Set home location",
                )
            })
            .into_iter()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autounattend_xml::Architecture;

    #[test]
    fn writes_both_passes() {
        let config = ConfigModel::default();
        let mut document = Document::with_root(Architecture::Amd64).unwrap();

        let commands = Localization
            .apply(&mut document, &config, &ModuleResults::new())
            .unwrap();

        let winpe = document
            .component(Pass::WindowsPe, "Microsoft-Windows-International-Core-WinPE")
            .unwrap();
        assert_eq!(document.child_text(winpe, "InputLocale"), Some("0411:00000411"));
        let setup_ui = document.find_child(winpe, "SetupUILanguage").unwrap();
        assert_eq!(document.child_text(setup_ui, "UILanguage"), Some("ja-JP"));

        let oobe = document
            .component(Pass::OobeSystem, "Microsoft-Windows-International-Core")
            .unwrap();
        assert_eq!(document.child_text(oobe, "UILanguageFallback"), Some("en-US"));

        assert_eq!(commands.len(), 1);
        assert!(commands[0].command_line.contains("/v Nation /t REG_SZ /d 122"));
    }
}
