use crate::engine::GenerationState;
use autounattend_xml::{DocumentError, ValidationReport};
use thiserror::Error;

/// Problems with the configuration that prevent a contributor from writing
/// its part of the document.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No partition is assigned drive letter C, so the install target is unknown")]
    NoInstallTarget,

    #[error("Disk {0} is set to be wiped but has no partitions")]
    NoPartitions(u32),
}

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Failed to build the document structure")]
    Structure(#[from] DocumentError),

    #[error("Validation found {} error(s)", .0.errors().count())]
    Invalid(ValidationReport),

    #[error("Generation was already attempted (state: {0})")]
    AlreadyUsed(GenerationState),
}
