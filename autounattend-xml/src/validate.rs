use crate::{Architecture, Document, DocumentError, NodeId, Pass};
use serde::Serialize;
use std::{
    collections::{BTreeSet, HashMap},
    fmt::Display,
    str::FromStr,
};
use strum::Display;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Display)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub message: String,
    /// Path-like description of where the issue was found.
    pub location: String,
}

impl Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.location, self.message)
    }
}

/// Ordered collection of validation findings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: Severity,
        location: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.issues.push(ValidationIssue {
            severity,
            message: message.into(),
            location: location.into(),
        });
    }

    pub fn error(&mut self, location: impl Into<String>, message: impl Into<String>) {
        self.push(Severity::Error, location, message);
    }

    pub fn warning(&mut self, location: impl Into<String>, message: impl Into<String>) {
        self.push(Severity::Warning, location, message);
    }

    pub fn extend(&mut self, other: ValidationReport) {
        self.issues.extend(other.issues);
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// An optional external check of the serialized document against the
/// official answer file schema.
pub trait SchemaCheck {
    fn check(&self, xml: &str) -> Result<Vec<ValidationIssue>, DocumentError>;
}

const COMPONENT_ATTRIBUTES: [&str; 4] = ["processorArchitecture", "publicKeyToken", "language", "versionScope"];

fn settings_location(document: &Document, settings: NodeId) -> String {
    match document[settings].attribute("pass") {
        Some(pass) => format!("/unattend/settings[@pass='{pass}']"),
        None => "/unattend/settings".to_string(),
    }
}

fn component_location(document: &Document, settings: NodeId, component: NodeId) -> String {
    format!(
        "{}/component[@name='{}']",
        settings_location(document, settings),
        document[component].attribute("name").unwrap_or("?")
    )
}

/// Check the structural rules of an answer file. This never fails; every
/// finding is reported as an issue.
pub fn validate(document: &Document) -> ValidationReport {
    let mut report = ValidationReport::default();

    let Some(root) = document.root() else {
        report.error("/", "Document has no root element");
        return report;
    };
    if document[root].name != "unattend" {
        report.error(
            "/",
            format!("Root element must be 'unattend', found '{}'", document[root].name),
        );
    }
    if document[root]
        .attribute("xmlns")
        .is_none_or(|ns| ns.trim().is_empty())
    {
        report.error("/unattend", "Root element has no namespace");
    }

    let settings = document.find_children(root, "settings");
    if settings.is_empty() {
        report.warning("/unattend", "Document has no settings blocks");
    }

    check_settings(document, &settings, &mut report);
    check_components(document, &settings, &mut report);
    check_computer_name(document, &mut report);
    check_accounts(document, &mut report);
    check_command_order(document, &mut report);

    report
}

fn check_settings(document: &Document, settings: &[NodeId], report: &mut ValidationReport) {
    let mut seen: HashMap<Pass, usize> = HashMap::new();
    let mut last_rank: Option<usize> = None;

    for &block in settings {
        let location = settings_location(document, block);
        let Some(name) = document[block].attribute("pass") else {
            report.warning(&location, "Settings block has no pass attribute");
            continue;
        };
        let Ok(pass) = Pass::from_str(name) else {
            report.warning(&location, format!("Unrecognized configuration pass '{name}'"));
            continue;
        };

        let count = seen.entry(pass).or_default();
        *count += 1;
        if *count == 2 {
            report.warning(&location, format!("Pass '{pass}' appears more than once"));
        }

        if last_rank.is_some_and(|rank| pass.rank() < rank) {
            report.warning(
                &location,
                format!("Pass '{pass}' is out of execution order"),
            );
        }
        last_rank = Some(last_rank.map_or(pass.rank(), |rank| rank.max(pass.rank())));
    }
}

fn check_components(document: &Document, settings: &[NodeId], report: &mut ValidationReport) {
    for &block in settings {
        let mut names: HashMap<&str, usize> = HashMap::new();

        for component in document.find_children(block, "component") {
            let location = component_location(document, block, component);
            let element = &document[component];

            match element.attribute("name") {
                Some(name) if !name.trim().is_empty() => {
                    let count = names.entry(name).or_default();
                    *count += 1;
                    if *count == 2 {
                        report.warning(&location, "Component appears more than once in this pass");
                    }
                }
                _ => report.warning(&location, "Component has no name attribute"),
            }

            for attribute in COMPONENT_ATTRIBUTES {
                if element.attribute(attribute).is_none() {
                    report.warning(&location, format!("Component is missing '{attribute}'"));
                }
            }

            if let Some(architecture) = element.attribute("processorArchitecture") {
                if Architecture::from_str(architecture).is_err() {
                    report.warning(
                        &location,
                        format!("Unrecognized processor architecture '{architecture}'"),
                    );
                }
            }

            if let Some(auto_logon) = document.find_child(component, "AutoLogon") {
                if document.child_text(auto_logon, "Enabled") == Some("true") {
                    report.warning(
                        format!("{location}/AutoLogon"),
                        "Automatic logon is enabled",
                    );
                }
            }
        }
    }
}

fn check_computer_name(document: &Document, report: &mut ValidationReport) {
    let names: BTreeSet<&str> = document
        .find_all("ComputerName")
        .into_iter()
        .filter_map(|node| document[node].trimmed_text())
        .collect();

    if names.len() > 1 {
        let names: Vec<&str> = names.into_iter().collect();
        report.warning(
            "ComputerName",
            format!("Conflicting computer names: {}", names.join(", ")),
        );
    }
}

fn check_accounts(document: &Document, report: &mut ValidationReport) {
    let mut names: HashMap<String, usize> = HashMap::new();

    for account in document.find_all("LocalAccount") {
        if let Some(name) = document.child_text(account, "Name") {
            let count = names.entry(name.to_lowercase()).or_default();
            *count += 1;
            if *count == 2 {
                report.error(
                    "/unattend/settings[@pass='oobeSystem']/UserAccounts",
                    format!("Duplicate local account '{name}'"),
                );
            }
        }
    }

    for password in document.find_all("Password") {
        if document.child_text(password, "PlainText") == Some("true") {
            report.warning("Password", "Password is stored as plain text");
        }
    }
}

fn check_command_order(document: &Document, report: &mut ValidationReport) {
    for list in document.find_all("FirstLogonCommands") {
        let orders: Vec<Option<u32>> = document
            .find_children(list, "SynchronousCommand")
            .into_iter()
            .map(|command| {
                document
                    .child_text(command, "Order")
                    .and_then(|order| order.parse().ok())
            })
            .collect();

        if orders.iter().any(Option::is_none) {
            report.warning("FirstLogonCommands", "Command has a missing or invalid Order");
            continue;
        }

        let mut sorted: Vec<u32> = orders.into_iter().flatten().collect();
        sorted.sort_unstable();
        if sorted.iter().enumerate().any(|(i, &order)| order as usize != i + 1) {
            report.warning(
                "FirstLogonCommands",
                "Command order is not a dense sequence starting at 1",
            );
        }
    }
}
