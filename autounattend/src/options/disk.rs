use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use validator::{Validate, ValidationError};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, EnumIter, Display)]
pub enum PartitionType {
    #[serde(rename = "EFI")]
    #[strum(serialize = "EFI")]
    Efi,
    #[serde(rename = "MSR")]
    #[strum(serialize = "MSR")]
    Msr,
    Primary,
    Recovery,
}

impl PartitionType {
    /// Size in MB used when a partition does not specify one.
    pub fn default_size(&self) -> PartitionSize {
        match self {
            PartitionType::Efi => PartitionSize::Megabytes(100),
            PartitionType::Msr => PartitionSize::Megabytes(16),
            PartitionType::Primary => PartitionSize::Remaining,
            PartitionType::Recovery => PartitionSize::Megabytes(500),
        }
    }
}

/// Either a fixed size in MB or the rest of the disk.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(try_from = "SizeRepr", into = "SizeRepr")]
pub enum PartitionSize {
    Megabytes(u64),
    Remaining,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum SizeRepr {
    Number(u64),
    Text(String),
}

impl TryFrom<SizeRepr> for PartitionSize {
    type Error = String;

    fn try_from(value: SizeRepr) -> Result<Self, Self::Error> {
        match value {
            SizeRepr::Number(size) => Ok(PartitionSize::Megabytes(size)),
            SizeRepr::Text(text) if text.eq_ignore_ascii_case("remaining") => {
                Ok(PartitionSize::Remaining)
            }
            SizeRepr::Text(text) => text
                .trim()
                .parse()
                .map(PartitionSize::Megabytes)
                .map_err(|_| format!("invalid partition size: {text}")),
        }
    }
}

impl From<PartitionSize> for SizeRepr {
    fn from(value: PartitionSize) -> Self {
        match value {
            PartitionSize::Megabytes(size) => SizeRepr::Number(size),
            PartitionSize::Remaining => SizeRepr::Text(String::from("remaining")),
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Partition {
    #[serde(rename = "type")]
    pub kind: PartitionType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<PartitionSize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub letter: Option<char>,
}

impl Partition {
    pub fn new(kind: PartitionType) -> Self {
        Self {
            kind,
            size: None,
            letter: None,
        }
    }

    pub fn size(&self) -> PartitionSize {
        self.size.unwrap_or(self.kind.default_size())
    }

    pub fn is_install_target(&self) -> bool {
        self.letter.is_some_and(|letter| letter.eq_ignore_ascii_case(&'C'))
    }
}

/// Target disk layout.
#[derive(Clone, Serialize, Deserialize, Validate, Debug, PartialEq, Eq)]
#[serde(default)]
#[validate(schema(function = "validate_layout"))]
pub struct DiskConfig {
    pub disk_id: u32,
    pub wipe_disk: bool,
    pub partitions: Vec<Partition>,
}

impl Default for DiskConfig {
    fn default() -> Self {
        Self {
            disk_id: 0,
            wipe_disk: true,
            partitions: vec![
                Partition::new(PartitionType::Efi),
                Partition::new(PartitionType::Msr),
                Partition {
                    kind: PartitionType::Primary,
                    size: Some(PartitionSize::Remaining),
                    letter: Some('C'),
                },
                Partition::new(PartitionType::Recovery),
            ],
        }
    }
}

fn validate_layout(disk: &DiskConfig) -> Result<(), ValidationError> {
    if disk.partitions.iter().filter(|p| p.is_install_target()).count() > 1 {
        return Err(ValidationError::new("multiple_install_targets")
            .with_message("More than one partition uses drive letter C".into()));
    }

    let remaining = disk
        .partitions
        .iter()
        .filter(|p| p.size() == PartitionSize::Remaining)
        .count();
    if remaining > 1 {
        return Err(ValidationError::new("multiple_remaining")
            .with_message("Only one partition may use the remaining space".into()));
    }

    if disk.partitions.iter().any(|p| {
        matches!(p.kind, PartitionType::Efi | PartitionType::Msr)
            && p.size() == PartitionSize::Remaining
    }) {
        return Err(ValidationError::new("fixed_size_required")
            .with_message("EFI and MSR partitions need a fixed size".into()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_is_valid() {
        assert!(DiskConfig::default().validate().is_ok());
    }

    #[test]
    fn size_accepts_numbers_and_remaining() {
        let partitions: Vec<Partition> = serde_json::from_str(
            r#"[{"type": "EFI", "size": 260}, {"type": "Primary", "size": "Remaining", "letter": "C"}, {"type": "Recovery", "size": "750"}]"#,
        )
        .unwrap();

        assert_eq!(partitions[0].size(), PartitionSize::Megabytes(260));
        assert_eq!(partitions[1].size(), PartitionSize::Remaining);
        assert!(partitions[1].is_install_target());
        assert_eq!(partitions[2].size(), PartitionSize::Megabytes(750));
        assert!(serde_json::from_str::<Partition>(r#"{"type": "MSR", "size": "big"}"#).is_err());
    }

    #[test]
    fn rejects_two_install_targets() {
        let mut disk = DiskConfig::default();
        disk.partitions[3].letter = Some('c');

        assert!(disk.validate().is_err());
    }

    #[test]
    fn rejects_extending_efi() {
        let mut disk = DiskConfig::default();
        disk.partitions[0].size = Some(PartitionSize::Remaining);

        assert!(disk.validate().is_err());
    }
}
