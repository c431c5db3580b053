use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// A Windows Setup configuration pass. Variants are declared in the order
/// Setup executes them, which is also the canonical order of `<settings>`
/// blocks in a document.
#[derive(
    Clone,
    Copy,
    Serialize,
    Deserialize,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    EnumIter,
    EnumString,
    Display,
    IntoStaticStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Pass {
    #[strum(serialize = "windowsPE")]
    #[serde(rename = "windowsPE")]
    WindowsPe,
    OfflineServicing,
    Generalize,
    Specialize,
    AuditSystem,
    AuditUser,
    OobeSystem,
}

impl Pass {
    /// The value of the `pass` attribute.
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// Position of this pass in execution order.
    pub fn rank(&self) -> usize {
        *self as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn attribute_names() {
        let names: Vec<&str> = Pass::iter().map(|pass| pass.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "windowsPE",
                "offlineServicing",
                "generalize",
                "specialize",
                "auditSystem",
                "auditUser",
                "oobeSystem",
            ]
        );
        assert_eq!(Pass::from_str("oobeSystem").unwrap(), Pass::OobeSystem);
        assert!(Pass::from_str("oobesystem").is_err());
    }

    #[test]
    fn execution_order() {
        assert!(Pass::WindowsPe < Pass::Specialize);
        assert!(Pass::Specialize < Pass::OobeSystem);
        assert_eq!(Pass::OobeSystem.rank(), 6);
    }
}
