use serde::{Deserialize, Serialize};
use validator::Validate;

/// A user-supplied command.
#[derive(Clone, Serialize, Deserialize, Validate, Debug, PartialEq, Eq)]
pub struct CustomScript {
    #[validate(length(min = 1))]
    pub command: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub requires_user_input: bool,
}

#[derive(Clone, Serialize, Deserialize, Validate, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct CustomScripts {
    /// Commands run at first logon, after every generated command.
    #[validate(nested)]
    pub first_logon: Vec<CustomScript>,

    /// Commands run synchronously during the specialize pass.
    #[validate(nested)]
    pub specialize: Vec<CustomScript>,
}
