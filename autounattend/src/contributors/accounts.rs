use super::Contribute;
use crate::{
    accounts::UserAccountManager, commands::PendingCommand, modules::ModuleResults,
    options::ConfigModel,
};
use anyhow::Result;
use autounattend_xml::{Document, Pass};

/// Local accounts, automatic logon and built-in account state.
#[derive(Clone, Debug, Default)]
pub struct Accounts;

impl Contribute for Accounts {
    fn apply(
        &self,
        document: &mut Document,
        config: &ConfigModel,
        _modules: &ModuleResults,
    ) -> Result<Vec<PendingCommand>> {
        let accounts = &config.accounts;
        let mut commands = Vec::new();

        if !accounts.accounts.is_empty() {
            let shell =
                document.get_or_create_component(Pass::OobeSystem, "Microsoft-Windows-Shell-Setup")?;
            let manager = UserAccountManager::new(&accounts.accounts);
            manager.add_all(document, shell);
            manager.configure_auto_logon(document, shell, accounts.auto_logon_count);
        }

        if accounts.disable_admin_account {
            commands.push(PendingCommand::new(
                "net user Administrator /active:no",
                "Disable the built-in Administrator account",
            ));
        }
        if accounts.enable_guest_account {
            commands.push(PendingCommand::new(
                "net user Guest /active:yes",
                "Enable the Guest account",
            ));
        }
        for account in accounts.accounts.iter().filter(|a| a.password_never_expires) {
            commands.push(PendingCommand::new(
                format!("wmic useraccount where name=\"{}\" set PasswordExpires=false", account.name),
                format!("Never expire the password of {}", account.name),
            ));
        }

        Ok(commands)
    }
}
