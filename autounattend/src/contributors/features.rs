use super::{Contribute, dism_enable};
use crate::{commands::PendingCommand, modules::ModuleResults, options::ConfigModel};
use anyhow::Result;
use autounattend_xml::Document;

/// Virtualization support and optional Windows components, enabled with DISM
/// at first logon.
#[derive(Clone, Debug, Default)]
pub struct Features;

impl Contribute for Features {
    fn apply(
        &self,
        _document: &mut Document,
        config: &ConfigModel,
        _modules: &ModuleResults,
    ) -> Result<Vec<PendingCommand>> {
        Ok(config
            .vm_support
            .features()
            .into_iter()
            .chain(config.components.features())
            .map(|feature| PendingCommand::new(dism_enable(feature), format!("Enable {feature}")))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autounattend_xml::Architecture;

    #[test]
    fn virtualization_before_components() {
        let mut config = ConfigModel::default();
        config.components.dotnet35 = true;
        config.vm_support.hyper_v = true;
        let mut document = Document::with_root(Architecture::Amd64).unwrap();

        let commands = Features.apply(&mut document, &config, &ModuleResults::new()).unwrap();

        assert_eq!(
            commands[0].command_line,
            "dism /online /enable-feature /featurename:Microsoft-Hyper-V-All /all /norestart"
        );
        assert!(commands[1].command_line.contains("/featurename:NetFx3 "));
    }
}
