use crate::{
    audit::AuditLog,
    config::ConfigPath,
    engine::{Engine, EngineOptions},
    error::GenerationError,
    modules::ModuleResults,
};
use autounattend_xml::WriterOptions;
use std::process::ExitCode;
use tracing::{debug, error, info};
use validator::Validate;

pub fn run(cmd: super::Commands) -> ExitCode {
    match cmd {
        super::Commands::Generate {
            path,
            modules,
            output,
            log,
            indent,
            allow_invalid,
            ..
        } => {
            let config_path = match ConfigPath::resolve(&path) {
                Some(p) => {
                    debug!("Loading config from {}", p);
                    p
                }
                _ => {
                    error!(path = ?path, "Failed to find config file");
                    return ExitCode::FAILURE;
                }
            };

            let config = match config_path.load() {
                Ok(config) => config,
                Err(err) => {
                    error!(error = ?err, "Failed to load config");
                    return ExitCode::FAILURE;
                }
            };

            // Fully verify config before proceeding
            match config.validate() {
                Err(err) => {
                    error!(error = ?err, "Failed to validate config file");
                    return ExitCode::FAILURE;
                }
                _ => debug!("Validated config file"),
            };

            let modules = match modules {
                Some(modules) => match ModuleResults::load(&modules) {
                    Ok(modules) => modules,
                    Err(err) => {
                        error!(error = ?err, "Failed to load module results");
                        return ExitCode::FAILURE;
                    }
                },
                None => ModuleResults::new(),
            };

            let mut engine = Engine::new(EngineOptions {
                writer: WriterOptions { indent },
                block_on_error: !allow_invalid,
                schema: None,
            });

            let generated = match engine.generate(&config, &modules) {
                Ok(generated) => generated,
                Err(GenerationError::Invalid(report)) => {
                    super::print_report(&report);
                    error!("Refusing to write an answer file with errors (use --allow-invalid to override)");
                    return ExitCode::FAILURE;
                }
                Err(err) => {
                    error!(error = ?err, "Failed to generate answer file");
                    return ExitCode::FAILURE;
                }
            };
            super::print_report(&generated.report);

            match &output {
                Some(output) => {
                    if let Err(err) = generated.save(output) {
                        error!(error = ?err, "Failed to write answer file");
                        return ExitCode::FAILURE;
                    }
                    info!(path = ?output, commands = generated.commands.len(), "Wrote answer file");
                }
                None => print!("{}", generated.xml),
            }

            if let Some(log) = &log {
                let text = AuditLog::default().render_generation(&config, &generated);
                if let Err(err) = std::fs::write(log, text) {
                    error!(error = ?err, "Failed to write settings log");
                    return ExitCode::FAILURE;
                }
                info!(path = ?log, "Wrote settings log");
            }

            ExitCode::SUCCESS
        }
        _ => unreachable!(),
    }
}
