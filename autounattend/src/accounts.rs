use crate::options::UserAccount;
use autounattend_xml::{Document, Element, NodeId};
use base64::{Engine as _, prelude::BASE64_STANDARD};
use tracing::{debug, warn};

/// Encode a password the way Windows Setup expects when `PlainText` is
/// false: base64 of the UTF-16LE encoding of the password followed by the
/// literal `Password`.
pub fn obfuscate_password(password: &str) -> String {
    let bytes: Vec<u8> = format!("{password}Password")
        .encode_utf16()
        .flat_map(u16::to_le_bytes)
        .collect();
    BASE64_STANDARD.encode(bytes)
}

fn add_password(document: &mut Document, parent: NodeId, password: &str) {
    let element = document.append(parent, Element::new("Password"));
    document.add_value(element, "Value", obfuscate_password(password));
    document.add_value(element, "PlainText", false);
}

/// Writes local accounts and automatic logon into an `oobeSystem`
/// `Microsoft-Windows-Shell-Setup` component.
pub struct UserAccountManager<'a> {
    accounts: &'a [UserAccount],
}

impl<'a> UserAccountManager<'a> {
    pub fn new(accounts: &'a [UserAccount]) -> Self {
        Self { accounts }
    }

    /// Append one `<LocalAccount>` under `UserAccounts/LocalAccounts`.
    pub fn add_local_account(
        &self,
        document: &mut Document,
        component: NodeId,
        account: &UserAccount,
    ) -> NodeId {
        let user_accounts = document.get_or_create_child(component, "UserAccounts");
        let local_accounts = document.get_or_create_child(user_accounts, "LocalAccounts");

        let element = document.append(
            local_accounts,
            Element::new("LocalAccount").with_attribute("wcm:action", "add"),
        );
        add_password(document, element, account.password.expose());
        document.add_element(element, "Description", account.description.as_deref());
        document.add_element(element, "DisplayName", Some(account.display_name()));
        document.add_element(element, "Group", Some(account.group.as_str()));
        document.add_element(element, "Name", Some(account.name.as_str()));

        debug!(account = %account.name, group = %account.group, "Added local account");
        element
    }

    /// Append every configured account in order.
    pub fn add_all(&self, document: &mut Document, component: NodeId) -> Vec<NodeId> {
        self.accounts
            .iter()
            .map(|account| self.add_local_account(document, component, account))
            .collect()
    }

    /// Configure automatic logon for the first account. Nothing is written
    /// when `logon_count` is zero or there are no accounts.
    pub fn configure_auto_logon(
        &self,
        document: &mut Document,
        component: NodeId,
        logon_count: u32,
    ) -> Option<NodeId> {
        if logon_count == 0 {
            return None;
        }
        let Some(account) = self.accounts.first() else {
            warn!("Automatic logon requested but no accounts are configured");
            return None;
        };

        let auto_logon = document.append(component, Element::new("AutoLogon"));
        add_password(document, auto_logon, account.password.expose());
        document.add_value(auto_logon, "Enabled", true);
        document.add_value(auto_logon, "LogonCount", logon_count);
        document.add_element(auto_logon, "Username", Some(account.name.as_str()));
        Some(auto_logon)
    }
}
