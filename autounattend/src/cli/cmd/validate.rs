use autounattend_xml::{Document, validate};
use std::process::ExitCode;
use tracing::{debug, error};

pub fn run(cmd: super::Commands) -> ExitCode {
    match cmd {
        super::Commands::Validate { file } => {
            let document = match Document::load(&file) {
                Ok(document) => document,
                Err(err) => {
                    error!(error = ?err, path = ?file, "Failed to read answer file");
                    return ExitCode::FAILURE;
                }
            };
            debug!(architecture = %document.architecture(), "Loaded answer file");

            let report = validate(&document);
            super::print_report(&report);

            if report.has_errors() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        _ => unreachable!(),
    }
}
