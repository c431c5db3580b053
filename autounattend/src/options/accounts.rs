use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use validator::Validate;

/// A plaintext password that never appears in debug output.
#[derive(Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Secret(pub String);

impl Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(if self.0.is_empty() { "\"\"" } else { "\"********\"" })
    }
}

impl Secret {
    pub fn is_set(&self) -> bool {
        !self.0.is_empty()
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A local account created during OOBE.
#[derive(Clone, Serialize, Deserialize, Validate, Debug, PartialEq, Eq)]
pub struct UserAccount {
    #[validate(length(min = 1, max = 20))]
    pub name: String,

    #[serde(default)]
    pub password: Secret,

    #[serde(default)]
    pub display_name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default = "default_group")]
    pub group: String,

    #[serde(default)]
    pub password_never_expires: bool,
}

fn default_group() -> String {
    String::from("Users")
}

impl UserAccount {
    pub fn new(name: &str, password: &str, group: &str) -> Self {
        Self {
            name: name.to_string(),
            password: Secret::from(password),
            display_name: None,
            description: None,
            group: group.to_string(),
            password_never_expires: false,
        }
    }

    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

#[derive(Clone, Serialize, Deserialize, Validate, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct UserAccounts {
    #[validate(nested)]
    pub accounts: Vec<UserAccount>,

    /// Number of automatic logons for the first account. Zero disables
    /// automatic logon.
    pub auto_logon_count: u32,

    pub disable_admin_account: bool,
    pub enable_guest_account: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_is_redacted() {
        let account = UserAccount::new("alice", "hunter2", "Administrators");

        let debug = format!("{account:?}");
        assert!(!debug.contains("hunter2"));
        assert_eq!(account.display_name(), "alice");
    }

    #[test]
    fn defaults_when_deserializing() {
        let account: UserAccount = serde_json::from_str(r#"{"name": "bob"}"#).unwrap();

        assert_eq!(account.group, "Users");
        assert!(!account.password.is_set());
    }
}
