use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Processor architecture stamped onto every component.
#[derive(
    Clone,
    Copy,
    Serialize,
    Deserialize,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    EnumString,
    Display,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Architecture {
    X86,
    #[default]
    Amd64,
    Arm64,
}

impl Architecture {
    /// The value written into `processorArchitecture`.
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Architecture::from_str("AMD64").unwrap(), Architecture::Amd64);
        assert_eq!(Architecture::from_str("arm64").unwrap(), Architecture::Arm64);
        assert!(Architecture::from_str("riscv64").is_err());
        assert_eq!(Architecture::X86.as_str(), "x86");
    }
}
