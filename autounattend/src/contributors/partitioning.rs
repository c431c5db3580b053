use super::Contribute;
use crate::{
    commands::PendingCommand, disk::DiskConfigurationBuilder, modules::ModuleResults,
    options::ConfigModel,
};
use anyhow::Result;
use autounattend_xml::{Document, Pass};

/// Disk layout and install target.
#[derive(Clone, Debug, Default)]
pub struct Partitioning;

impl Contribute for Partitioning {
    fn apply(
        &self,
        document: &mut Document,
        config: &ConfigModel,
        _modules: &ModuleResults,
    ) -> Result<Vec<PendingCommand>> {
        let setup = document.get_or_create_component(Pass::WindowsPe, "Microsoft-Windows-Setup")?;
        DiskConfigurationBuilder::new(&config.disk).write(document, setup)?;
        Ok(Vec::new())
    }
}
