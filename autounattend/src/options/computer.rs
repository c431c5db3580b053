use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::{Validate, ValidationError};

static COMPUTER_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\*|[A-Za-z0-9][A-Za-z0-9-]{0,14})$").unwrap());

/// Machine identity applied in the specialize pass.
#[derive(Clone, Serialize, Deserialize, Validate, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct ComputerSettings {
    /// NetBIOS name, or `*` to let Setup generate one.
    #[validate(custom(function = "validate_computer_name"))]
    pub computer_name: String,

    pub owner: Option<String>,
    pub organization: Option<String>,

    /// Workgroup to join. Ignored when `domain` is set.
    pub workgroup: Option<String>,

    /// Active Directory domain to join. Credentials are expected to be
    /// supplied at join time.
    pub domain: Option<String>,
    pub machine_object_ou: Option<String>,
}

impl Default for ComputerSettings {
    fn default() -> Self {
        Self {
            computer_name: String::from("*"),
            owner: None,
            organization: None,
            workgroup: None,
            domain: None,
            machine_object_ou: None,
        }
    }
}

fn validate_computer_name(name: &str) -> Result<(), ValidationError> {
    if !COMPUTER_NAME.is_match(name) || name.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new("computer_name").with_message(
            "Computer names are 1-15 letters, digits or hyphens and cannot be all digits".into(),
        ));
    }
    Ok(())
}
