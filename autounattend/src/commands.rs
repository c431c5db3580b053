use crate::modules::ModuleResults;
use autounattend_xml::{Document, DocumentError, Element, Pass, ValidationReport};
use tracing::{debug, info};

/// A first-logon command requested by a contributor or module, before it is
/// given its position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingCommand {
    pub command_line: String,
    pub description: Option<String>,
    pub requires_user_input: bool,
}

impl PendingCommand {
    pub fn new(command_line: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            command_line: command_line.into(),
            description: Some(description.into()),
            requires_user_input: false,
        }
    }
}

impl From<&str> for PendingCommand {
    fn from(command_line: &str) -> Self {
        Self::from(command_line.to_string())
    }
}

impl From<String> for PendingCommand {
    fn from(command_line: String) -> Self {
        Self {
            command_line,
            description: None,
            requires_user_input: false,
        }
    }
}

/// A command with its final position in `FirstLogonCommands`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandEntry {
    pub order: u32,
    pub source: String,
    pub command_line: String,
    pub description: String,
    pub requires_user_input: bool,
}

/// Collects first-logon commands from every source and writes them as one
/// ordered list.
#[derive(Clone, Debug, Default)]
pub struct FirstLogonCommandAggregator {
    pending: Vec<(String, PendingCommand)>,
}

impl FirstLogonCommandAggregator {
    /// Queue a command. Blank command lines are dropped so they never take
    /// a position.
    pub fn push(&mut self, source: &str, command: PendingCommand) {
        if command.command_line.trim().is_empty() {
            debug!(source, "Dropping blank first logon command");
            return;
        }
        self.pending.push((source.to_string(), command));
    }

    pub fn extend(&mut self, source: &str, commands: Vec<PendingCommand>) {
        for command in commands {
            self.push(source, command);
        }
    }

    /// Queue the commands of every successful module. Failed modules are
    /// reported as warnings and contribute nothing.
    pub fn extend_from_modules(&mut self, modules: &ModuleResults, report: &mut ValidationReport) {
        for result in modules.iter() {
            if !result.success {
                report.warning(
                    format!("module:{}", result.module),
                    "Module failed; its commands were skipped",
                );
                continue;
            }
            for command in &result.commands {
                self.push(&result.module, PendingCommand::from(command.as_str()));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number the queued commands from `first` in the order they arrived.
    fn entries_from(&self, first: u32) -> Vec<CommandEntry> {
        self.pending
            .iter()
            .zip(first..)
            .map(|((source, command), order)| CommandEntry {
                order,
                source: source.clone(),
                command_line: command.command_line.clone(),
                description: command
                    .description
                    .clone()
                    .filter(|d| !d.trim().is_empty())
                    .unwrap_or_else(|| format!("Command {order}")),
                requires_user_input: command.requires_user_input,
            })
            .collect()
    }

    pub fn entries(&self) -> Vec<CommandEntry> {
        self.entries_from(1)
    }

    /// Write every queued command into `oobeSystem`/`Microsoft-Windows-Shell-Setup`.
    /// Nothing is written when no commands were queued.
    pub fn finalize(&self, document: &mut Document) -> Result<Vec<CommandEntry>, DocumentError> {
        if self.pending.is_empty() {
            debug!("No first logon commands");
            return Ok(Vec::new());
        }

        let component =
            document.get_or_create_component(Pass::OobeSystem, "Microsoft-Windows-Shell-Setup")?;
        let list = document.get_or_create_child(component, "FirstLogonCommands");
        let existing = document.find_children(list, "SynchronousCommand").len() as u32;

        let entries = self.entries_from(existing + 1);
        for entry in &entries {
            let command = document.append(
                list,
                Element::new("SynchronousCommand").with_attribute("wcm:action", "add"),
            );
            document.add_value(command, "Order", entry.order);
            document.add_element(command, "CommandLine", Some(entry.command_line.as_str()));
            document.add_element(command, "Description", Some(entry.description.as_str()));
            document.add_value(command, "RequiresUserInput", entry.requires_user_input);
        }

        info!(count = entries.len(), "Wrote first logon commands");
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autounattend_xml::Architecture;

    #[test]
    fn orders_are_dense_and_follow_arrival() {
        let mut aggregator = FirstLogonCommandAggregator::default();
        aggregator.extend("shell", vec!["a".into(), PendingCommand::new("b", "Second")]);
        aggregator.push("rules", "c".into());

        let entries = aggregator.entries();

        let orders: Vec<u32> = entries.iter().map(|e| e.order).collect();
        assert_eq!(orders, vec![1, 2, 3]);
        assert_eq!(entries[0].description, "Command 1");
        assert_eq!(entries[1].description, "Second");
        assert_eq!(entries[2].source, "rules");
    }

    #[test]
    fn failed_modules_are_skipped() {
        let modules = ModuleResults::new()
            .with("drivers", true, &["pnputil /add-driver a.inf", "pnputil /add-driver b.inf"])
            .with("office", false, &["setup.exe /configure"]);
        let mut aggregator = FirstLogonCommandAggregator::default();
        let mut report = ValidationReport::default();

        aggregator.extend_from_modules(&modules, &mut report);

        assert_eq!(aggregator.len(), 2);
        assert_eq!(report.warnings().count(), 1);
        assert_eq!(report.issues[0].location, "module:office");

        let entries = aggregator.entries();
        assert_eq!(entries[0].source, "drivers");
        assert_eq!(entries[0].description, "Command 1");
        assert_eq!(entries[1].description, "Command 2");
    }

    #[test]
    fn finalize_writes_synchronous_commands() {
        let mut document = Document::with_root(Architecture::Amd64).unwrap();
        let mut aggregator = FirstLogonCommandAggregator::default();
        aggregator.push("rules", "echo one".into());
        aggregator.push("rules", "echo two".into());

        aggregator.finalize(&mut document).unwrap();

        let commands = document.find_all("SynchronousCommand");
        assert_eq!(commands.len(), 2);
        assert_eq!(document[commands[1]].attribute("wcm:action"), Some("add"));
        assert_eq!(document.child_text(commands[1], "Order"), Some("2"));
        assert_eq!(document.child_text(commands[1], "CommandLine"), Some("echo two"));
        assert_eq!(document.child_text(commands[1], "RequiresUserInput"), Some("false"));
    }

    #[test]
    fn finalize_without_commands() {
        let mut document = Document::with_root(Architecture::Amd64).unwrap();

        FirstLogonCommandAggregator::default()
            .finalize(&mut document)
            .unwrap();

        assert!(document.find_all("FirstLogonCommands").is_empty());
    }

    #[test]
    fn blank_commands_take_no_position() {
        let modules = ModuleResults::new().with(
            "features",
            true,
            &["dism /online /enable-feature /featurename:X", "   "],
        );
        let mut document = Document::with_root(Architecture::Amd64).unwrap();
        let mut aggregator = FirstLogonCommandAggregator::default();
        let mut report = ValidationReport::default();
        aggregator.push("rules", "".into());
        aggregator.push("rules", "echo one".into());

        aggregator.extend_from_modules(&modules, &mut report);
        let entries = aggregator.finalize(&mut document).unwrap();

        assert_eq!(entries.len(), 2);
        let commands = document.find_all("SynchronousCommand");
        assert_eq!(commands.len(), 2);
        for (index, command) in commands.into_iter().enumerate() {
            assert!(document.child_text(command, "CommandLine").is_some());
            assert_eq!(
                document.child_text(command, "Order"),
                Some((index + 1).to_string().as_str())
            );
        }
    }
}
