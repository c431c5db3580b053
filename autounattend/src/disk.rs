use crate::{
    error::ConfigError,
    options::{DiskConfig, PartitionSize, PartitionType},
};
use autounattend_xml::{Document, Element, NodeId};
use tracing::debug;

/// GPT type of a Windows recovery partition.
pub const RECOVERY_TYPE_ID: &str = "de94bba4-06d1-4d40-a16a-bfd50179d6ac";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatePartition {
    pub order: usize,
    pub kind: &'static str,
    /// Size in MB, or `None` to extend over the rest of the disk.
    pub size: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModifyPartition {
    pub order: usize,
    pub partition_id: usize,
    pub format: Option<&'static str>,
    pub label: Option<&'static str>,
    pub letter: Option<char>,
    pub type_id: Option<&'static str>,
}

/// The partitions to create and how to format them. Both lists are numbered
/// by position in the configured layout, starting at 1.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PartitionPlan {
    pub create: Vec<CreatePartition>,
    pub modify: Vec<ModifyPartition>,
}

/// Translates a [`DiskConfig`] into `DiskConfiguration` and `ImageInstall`
/// elements of the `windowsPE` `Microsoft-Windows-Setup` component.
pub struct DiskConfigurationBuilder<'a> {
    disk: &'a DiskConfig,
}

impl<'a> DiskConfigurationBuilder<'a> {
    pub fn new(disk: &'a DiskConfig) -> Self {
        Self { disk }
    }

    pub fn build_partition_plan(&self) -> PartitionPlan {
        let mut plan = PartitionPlan::default();

        for (index, partition) in self.disk.partitions.iter().enumerate() {
            let position = index + 1;
            let size = match partition.size() {
                PartitionSize::Megabytes(size) => Some(size),
                PartitionSize::Remaining => None,
            };

            let (kind, format, label, type_id) = match partition.kind {
                PartitionType::Efi => ("EFI", Some("FAT32"), Some("System"), None),
                PartitionType::Msr => ("MSR", None, None, None),
                PartitionType::Primary => ("Primary", Some("NTFS"), Some("Windows"), None),
                PartitionType::Recovery => {
                    ("Primary", Some("NTFS"), Some("Recovery"), Some(RECOVERY_TYPE_ID))
                }
            };

            plan.create.push(CreatePartition {
                order: position,
                kind,
                size,
            });
            plan.modify.push(ModifyPartition {
                order: position,
                partition_id: position,
                format,
                label,
                letter: partition.letter.map(|letter| letter.to_ascii_uppercase()),
                type_id,
            });
        }
        plan
    }

    /// The 1-based position of the first partition with drive letter C.
    pub fn resolve_install_target(&self) -> Result<usize, ConfigError> {
        self.disk
            .partitions
            .iter()
            .position(|partition| partition.is_install_target())
            .map(|index| index + 1)
            .ok_or(ConfigError::NoInstallTarget)
    }

    /// Write the disk layout and install target into `component`.
    pub fn write(&self, document: &mut Document, component: NodeId) -> Result<(), ConfigError> {
        let image_install = document.get_or_create_child(component, "ImageInstall");
        let os_image = document.get_or_create_child(image_install, "OSImage");

        if !self.disk.wipe_disk {
            document.add_value(os_image, "InstallToAvailablePartition", true);
            document.add_value(os_image, "WillShowUI", "OnError");
            return Ok(());
        }

        if self.disk.partitions.is_empty() {
            return Err(ConfigError::NoPartitions(self.disk.disk_id));
        }
        let target = self.resolve_install_target()?;
        let plan = self.build_partition_plan();
        debug!(
            disk = self.disk.disk_id,
            partitions = plan.create.len(),
            target,
            "Writing disk configuration"
        );

        let configuration = document.get_or_create_child(component, "DiskConfiguration");
        let disk = document.append(
            configuration,
            Element::new("Disk").with_attribute("wcm:action", "add"),
        );
        document.add_value(disk, "DiskID", self.disk.disk_id);
        document.add_value(disk, "WillWipeDisk", true);

        let create = document.append(disk, Element::new("CreatePartitions"));
        for partition in &plan.create {
            let element = document.append(
                create,
                Element::new("CreatePartition").with_attribute("wcm:action", "add"),
            );
            document.add_value(element, "Order", partition.order);
            document.add_element(element, "Type", Some(partition.kind));
            match partition.size {
                Some(size) => document.add_value(element, "Size", size),
                None => document.add_value(element, "Extend", true),
            };
        }

        let modify = document.append(disk, Element::new("ModifyPartitions"));
        for partition in &plan.modify {
            let element = document.append(
                modify,
                Element::new("ModifyPartition").with_attribute("wcm:action", "add"),
            );
            document.add_value(element, "Order", partition.order);
            document.add_value(element, "PartitionID", partition.partition_id);
            document.add_element(element, "Format", partition.format);
            document.add_element(element, "Label", partition.label);
            if let Some(letter) = partition.letter {
                document.add_value(element, "Letter", letter);
            }
            document.add_element(element, "TypeID", partition.type_id);
        }

        let install_to = document.get_or_create_child(os_image, "InstallTo");
        document.add_value(install_to, "DiskID", self.disk.disk_id);
        document.add_value(install_to, "PartitionID", target);
        document.add_value(os_image, "WillShowUI", "OnError");

        Ok(())
    }
}
