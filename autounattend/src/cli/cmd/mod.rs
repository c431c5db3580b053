use std::path::PathBuf;

use autounattend_xml::{Severity, ValidationReport};
use console::Style;

use crate::config::ConfigPath;

pub mod generate;
pub mod init;
pub mod validate;

#[derive(clap::Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate an answer file from a configuration
    Generate {
        /// A configuration file or a directory containing one
        #[clap(index = 1)]
        path: PathBuf,

        /// JSON file with the results of external modules
        #[clap(long)]
        modules: Option<PathBuf>,

        /// Where to write the answer file (defaults to standard output)
        #[clap(long)]
        output: Option<PathBuf>,

        /// Also write a plain-text settings log
        #[clap(long)]
        log: Option<PathBuf>,

        /// Spaces per indentation level (0 writes a single line)
        #[clap(long, default_value_t = 2)]
        indent: usize,

        /// Write the answer file even when validation finds errors
        #[clap(long, num_args = 0)]
        allow_invalid: bool,

        /// Enable debug logging
        #[clap(long, num_args = 0)]
        debug: bool,
    },

    /// Check an existing answer file
    Validate {
        /// The answer file to check
        #[clap(index = 1)]
        file: PathBuf,
    },

    /// Write a default configuration file
    Init {
        /// Config format
        #[clap(long, value_enum)]
        format: Option<ConfigPath>,

        /// Directory to write the configuration into
        #[clap(long)]
        path: Option<PathBuf>,
    },
}

/// Print a validation report to standard error.
pub fn print_report(report: &ValidationReport) {
    let error = Style::new().red().bold();
    let warning = Style::new().yellow();

    for issue in &report.issues {
        let style = match issue.severity {
            Severity::Error => &error,
            Severity::Warning => &warning,
        };
        eprintln!(
            "{} {}: {}",
            style.apply_to(issue.severity),
            issue.location,
            issue.message
        );
    }

    let summary = format!(
        "{} error(s), {} warning(s)",
        report.errors().count(),
        report.warnings().count()
    );
    if report.has_errors() {
        eprintln!("{}", error.apply_to(summary));
    } else {
        eprintln!("{}", Style::new().green().apply_to(summary));
    }
}
