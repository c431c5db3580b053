use super::Contribute;
use crate::{commands::PendingCommand, modules::ModuleResults, options::ConfigModel};
use anyhow::Result;
use autounattend_xml::{Document, Pass};

/// Computer name, owner, time zone and workgroup or domain membership.
#[derive(Clone, Debug, Default)]
pub struct Identity;

impl Contribute for Identity {
    fn apply(
        &self,
        document: &mut Document,
        config: &ConfigModel,
        _modules: &ModuleResults,
    ) -> Result<Vec<PendingCommand>> {
        let computer = &config.computer;

        let shell = document.get_or_create_component(Pass::Specialize, "Microsoft-Windows-Shell-Setup")?;
        document.add_element(shell, "ComputerName", Some(&computer.computer_name));
        document.add_element(shell, "RegisteredOrganization", computer.organization.as_deref());
        document.add_element(shell, "RegisteredOwner", computer.owner.as_deref());
        document.add_element(shell, "TimeZone", config.region_language.timezone.as_deref());

        // Setup also shows these on its own user data page
        if computer.owner.is_some() || computer.organization.is_some() {
            let setup = document.get_or_create_component(Pass::WindowsPe, "Microsoft-Windows-Setup")?;
            let user_data = document.get_or_create_child(setup, "UserData");
            document.add_element(user_data, "FullName", computer.owner.as_deref());
            document.add_element(user_data, "Organization", computer.organization.as_deref());
        }

        if computer.domain.is_some() || computer.workgroup.is_some() {
            let join = document.get_or_create_component(Pass::Specialize, "Microsoft-Windows-UnattendedJoin")?;
            let identification = document.get_or_create_child(join, "Identification");
            match &computer.domain {
                Some(domain) => {
                    document.add_element(identification, "JoinDomain", Some(domain));
                    document.add_element(
                        identification,
                        "MachineObjectOU",
                        computer.machine_object_ou.as_deref(),
                    );
                }
                None => {
                    document.add_element(identification, "JoinWorkgroup", computer.workgroup.as_deref());
                }
            }
        }

        Ok(Vec::new())
    }
}
