use crate::{
    config::{CONFIG_NAME, ConfigPath},
    options::ConfigModel,
};
use std::{path::PathBuf, process::ExitCode};
use tracing::{error, info};

pub fn run(cmd: super::Commands) -> ExitCode {
    match cmd {
        super::Commands::Init { format, path } => {
            let dir = path.unwrap_or_else(|| PathBuf::from("."));

            if let Some(existing) = ConfigPath::from_dir(&dir) {
                error!(path = %existing, "A configuration already exists");
                return ExitCode::FAILURE;
            }

            let format = format.unwrap_or_default();
            let extension = format
                .path()
                .extension()
                .and_then(|extension| extension.to_str())
                .unwrap_or("json");
            let config_path = format.with_path(dir.join(format!("{CONFIG_NAME}.{extension}")));

            match config_path.write(&ConfigModel::default()) {
                Err(err) => {
                    error!(error = ?err, "Failed to write config file");
                    ExitCode::FAILURE
                }
                _ => {
                    info!(path = %config_path, "Wrote autounattend config successfully");
                    ExitCode::SUCCESS
                }
            }
        }
        _ => unreachable!(),
    }
}
