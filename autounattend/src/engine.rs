use crate::{
    commands::{CommandEntry, FirstLogonCommandAggregator},
    contributors::{Contribute, Contributor},
    error::GenerationError,
    modules::ModuleResults,
    options::ConfigModel,
};
use autounattend_xml::{
    Document, OptimizeSummary, Pass, SchemaCheck, ValidationReport, WriterOptions, optimize,
    validate, writer,
};
use std::{path::Path, time::SystemTime};
use strum::{Display, IntoEnumIterator};
use tracing::{debug, info, warn};

/// Passes scaffolded before any contributor runs.
const SCAFFOLD: [Pass; 3] = [Pass::WindowsPe, Pass::Specialize, Pass::OobeSystem];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum GenerationState {
    NotStarted,
    Initializing,
    BuildingStructure,
    ProcessingModules,
    Validating,
    Finalizing,
    Completed,
    Error,
}

pub struct EngineOptions {
    pub writer: WriterOptions,

    /// Refuse to produce a document when validation reports errors.
    pub block_on_error: bool,

    /// External schema validation, if available.
    pub schema: Option<Box<dyn SchemaCheck>>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            writer: WriterOptions::default(),
            block_on_error: true,
            schema: None,
        }
    }
}

/// The result of a successful generation.
#[derive(Debug)]
pub struct GeneratedDocument {
    pub document: Document,
    pub report: ValidationReport,
    pub commands: Vec<CommandEntry>,
    pub optimizations: OptimizeSummary,
    pub xml: String,
}

impl GeneratedDocument {
    /// Write the serialized answer file.
    pub fn save(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let path = path.as_ref();
        debug!(path = ?path, "Saving answer file");
        std::fs::write(path, self.xml.as_bytes())
    }
}

/// Drives one generation from configuration to serialized answer file. An
/// engine runs at most once.
pub struct Engine {
    pub options: EngineOptions,

    contributors: Vec<Contributor>,

    state: GenerationState,

    /// Start time of the run
    pub start_time: Option<SystemTime>,

    /// End time of the run
    pub end_time: Option<SystemTime>,
}

impl Engine {
    pub fn new(options: EngineOptions) -> Self {
        Self::with_contributors(options, Contributor::iter().collect())
    }

    /// Use a specific set of contributors instead of the full registry.
    pub fn with_contributors(options: EngineOptions, contributors: Vec<Contributor>) -> Self {
        Self {
            options,
            contributors,
            state: GenerationState::NotStarted,
            start_time: None,
            end_time: None,
        }
    }

    pub fn state(&self) -> GenerationState {
        self.state
    }

    fn transition(&mut self, state: GenerationState) {
        debug!(from = %self.state, to = %state, "Generation state");
        self.state = state;
    }

    pub fn generate(
        &mut self,
        config: &ConfigModel,
        modules: &ModuleResults,
    ) -> Result<GeneratedDocument, GenerationError> {
        if self.state != GenerationState::NotStarted {
            return Err(GenerationError::AlreadyUsed(self.state));
        }
        self.start_time = Some(SystemTime::now());

        let result = self.run(config, modules);
        self.transition(match result {
            Ok(_) => GenerationState::Completed,
            Err(_) => GenerationState::Error,
        });

        self.end_time = Some(SystemTime::now());
        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            info!(
                duration = ?end.duration_since(start).unwrap_or_default(),
                state = %self.state,
                "Generation finished",
            );
        }
        result
    }

    fn run(
        &mut self,
        config: &ConfigModel,
        modules: &ModuleResults,
    ) -> Result<GeneratedDocument, GenerationError> {
        self.transition(GenerationState::Initializing);
        let mut document = Document::new(config.architecture);
        document.create_root()?;

        self.transition(GenerationState::BuildingStructure);
        for pass in SCAFFOLD {
            document.get_or_create_settings(pass)?;
        }

        self.transition(GenerationState::ProcessingModules);
        let mut report = ValidationReport::default();
        let mut aggregator = FirstLogonCommandAggregator::default();
        for contributor in &self.contributors {
            let name = contributor.to_string();
            match contributor.apply(&mut document, config, modules) {
                Ok(commands) => {
                    debug!(contributor = %name, commands = commands.len(), "Contributor finished");
                    aggregator.extend(&name, commands);
                }
                Err(error) => {
                    warn!(contributor = %name, error = %error, "Contributor failed");
                    report.error(format!("contributor:{name}"), format!("{error:#}"));
                }
            }
        }
        aggregator.extend_from_modules(modules, &mut report);
        let commands = aggregator.finalize(&mut document)?;

        self.transition(GenerationState::Validating);
        report.extend(validate(&document));
        match &self.options.schema {
            Some(schema) => {
                let xml = writer::to_string(&document, &self.options.writer)?;
                match schema.check(&xml) {
                    Ok(issues) => report.issues.extend(issues),
                    Err(error) => warn!(error = %error, "Schema validation unavailable, skipping"),
                }
            }
            None => warn!("Schema validation unavailable, skipping"),
        }

        for issue in &report.issues {
            debug!(issue = %issue, "Validation issue");
        }
        if report.has_errors() && self.options.block_on_error {
            return Err(GenerationError::Invalid(report));
        }

        self.transition(GenerationState::Finalizing);
        let optimizations = optimize(&mut document);
        let xml = writer::to_string(&document, &self.options.writer)?;

        Ok(GeneratedDocument {
            document,
            report,
            commands,
            optimizations,
            xml,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{Partition, PartitionSize, PartitionType, UserAccount};
    use autounattend_xml::{DocumentError, Severity, ValidationIssue};

    fn config() -> ConfigModel {
        let mut config = ConfigModel::default();
        config.accounts.accounts = vec![UserAccount::new("admin", "P@ss", "Administrators")];
        config.accounts.auto_logon_count = 1;
        config.vm_support.hyper_v = true;
        config
    }

    #[test_log::test]
    fn end_to_end() {
        let mut engine = Engine::new(EngineOptions::default());

        let generated = engine.generate(&config(), &ModuleResults::new()).unwrap();
        let xml = &generated.xml;

        assert_eq!(engine.state(), GenerationState::Completed);
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="utf-8"?>"#));
        for pass in ["windowsPE", "specialize", "oobeSystem"] {
            assert!(xml.contains(&format!(r#"<settings pass="{pass}">"#)), "{pass}");
        }
        assert!(!xml.contains("P@ss"));
        assert!(xml.contains("<Username>admin</Username>"));
        assert!(xml.contains("<CreatePartition wcm:action=\"add\">"));
        assert_eq!(xml.matches("<CreatePartition ").count(), 4);
        assert!(xml.contains("/featurename:Microsoft-Hyper-V-All"));

        // Commands are numbered 1..N in the document
        let orders: Vec<String> = generated
            .document
            .find_all("SynchronousCommand")
            .into_iter()
            .filter_map(|id| generated.document.child_text(id, "Order").map(str::to_string))
            .collect();
        let expected: Vec<String> = (1..=orders.len()).map(|i| i.to_string()).collect();
        assert_eq!(orders, expected);
        assert_eq!(generated.commands.len(), orders.len());

        // Only the automatic logon warning remains
        assert!(!generated.report.has_errors());
        assert!(generated
            .report
            .warnings()
            .all(|issue| issue.message.contains("Automatic logon")));
    }

    #[test_log::test]
    fn module_commands_follow_contributors() {
        let modules = ModuleResults::new()
            .with("drivers", true, &["pnputil /add-driver C:\\drivers\\*.inf /install"])
            .with("office", false, &["setup.exe /configure office.xml"]);
        let mut engine = Engine::new(EngineOptions::default());

        let generated = engine.generate(&config(), &modules).unwrap();

        let last = generated.commands.last().unwrap();
        assert_eq!(last.source, "drivers");
        assert_eq!(last.description, format!("Command {}", last.order));
        assert!(!generated.xml.contains("setup.exe /configure"));
        assert!(generated
            .report
            .warnings()
            .any(|issue| issue.location == "module:office"));
    }

    #[test_log::test]
    fn contributors_and_modules_share_one_oobe_pass() {
        let mut config = config();
        config
            .accounts
            .accounts
            .push(UserAccount::new("user", "secret", "Users"));
        config.disk.wipe_disk = true;
        assert_eq!(config.disk.partitions.len(), 4);
        let modules = ModuleResults::new().with(
            "m",
            true,
            &["dism /online /enable-feature /featurename:X"],
        );
        let mut engine = Engine::new(EngineOptions::default());

        let generated = engine.generate(&config, &modules).unwrap();
        let xml = &generated.xml;

        assert_eq!(xml.matches(r#"<settings pass="oobeSystem">"#).count(), 1);
        assert!(xml.contains("/featurename:Microsoft-Hyper-V-All"));
        assert!(xml.contains("/featurename:X"));
        assert!(xml.contains("<Name>user</Name>"));
        assert!(!xml.contains("secret"));

        let orders: Vec<u32> = generated
            .document
            .find_all("SynchronousCommand")
            .into_iter()
            .filter_map(|id| generated.document.child_text(id, "Order"))
            .map(|order| order.parse().unwrap())
            .collect();
        assert!(orders.len() >= 2);
        assert!(orders.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test_log::test]
    fn missing_install_target_blocks_generation() {
        let mut config = config();
        config.disk.partitions = vec![
            Partition::new(PartitionType::Efi),
            Partition {
                kind: PartitionType::Primary,
                size: Some(PartitionSize::Remaining),
                letter: Some('D'),
            },
        ];
        let mut engine = Engine::new(EngineOptions::default());

        let error = engine.generate(&config, &ModuleResults::new()).unwrap_err();

        assert_eq!(engine.state(), GenerationState::Error);
        match error {
            GenerationError::Invalid(report) => {
                let issue = report.errors().next().unwrap();
                assert_eq!(issue.location, "contributor:partitioning");
                assert!(issue.message.contains("drive letter C"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test_log::test]
    fn errors_can_be_allowed() {
        let mut config = config();
        config.disk.partitions[2].letter = None;
        let mut engine = Engine::new(EngineOptions {
            block_on_error: false,
            ..Default::default()
        });

        let generated = engine.generate(&config, &ModuleResults::new()).unwrap();

        assert!(generated.report.has_errors());
        assert!(!generated.xml.contains("<DiskConfiguration>"));
        assert!(generated.xml.contains("Microsoft-Windows-Shell-Setup"));
    }

    #[test]
    fn engine_is_single_use() {
        let mut engine = Engine::new(EngineOptions::default());
        engine.generate(&config(), &ModuleResults::new()).unwrap();

        assert!(matches!(
            engine.generate(&config(), &ModuleResults::new()),
            Err(GenerationError::AlreadyUsed(GenerationState::Completed))
        ));
    }

    struct RejectEverything;

    impl SchemaCheck for RejectEverything {
        fn check(&self, _xml: &str) -> Result<Vec<ValidationIssue>, DocumentError> {
            Ok(vec![ValidationIssue {
                severity: Severity::Error,
                message: String::from("Not allowed"),
                location: String::from("schema"),
            }])
        }
    }

    #[test]
    fn schema_check_issues_are_reported() {
        let mut engine = Engine::new(EngineOptions {
            schema: Some(Box::new(RejectEverything)),
            ..Default::default()
        });

        assert!(matches!(
            engine.generate(&config(), &ModuleResults::new()),
            Err(GenerationError::Invalid(_))
        ));
    }

    struct MissingSchema;

    impl SchemaCheck for MissingSchema {
        fn check(&self, _xml: &str) -> Result<Vec<ValidationIssue>, DocumentError> {
            Err(DocumentError::Io(std::io::Error::from(
                std::io::ErrorKind::NotFound,
            )))
        }
    }

    #[test_log::test]
    fn failing_schema_check_is_skipped() {
        let mut engine = Engine::new(EngineOptions {
            schema: Some(Box::new(MissingSchema)),
            ..Default::default()
        });

        let generated = engine.generate(&config(), &ModuleResults::new());

        assert!(generated.is_ok());
        assert_eq!(engine.state(), GenerationState::Completed);
    }

    #[test]
    fn subset_of_contributors() {
        let mut engine = Engine::with_contributors(
            EngineOptions::default(),
            vec![crate::contributors::identity::Identity.into()],
        );

        let generated = engine.generate(&config(), &ModuleResults::new()).unwrap();

        assert!(generated.commands.is_empty());
        assert!(!generated.xml.contains("FirstLogonCommands"));
        assert!(generated.xml.contains("<ComputerName>*</ComputerName>"));
    }
}
