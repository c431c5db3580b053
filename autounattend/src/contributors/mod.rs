use crate::{commands::PendingCommand, modules::ModuleResults, options::ConfigModel};
use anyhow::Result;
use autounattend_xml::{Document, Element, NodeId};
use enum_dispatch::enum_dispatch;
use std::fmt::Display;
use strum::EnumIter;

use accounts::Accounts;
use desktop::DesktopIcons;
use features::Features;
use identity::Identity;
use localization::Localization;
use partitioning::Partitioning;
use rules::CommandRules;
use setup::Setup;
use shell::ShellTweaks;
use wireless::Wireless;

pub mod accounts;
pub mod desktop;
pub mod features;
pub mod identity;
pub mod localization;
pub mod partitioning;
pub mod rules;
pub mod setup;
pub mod shell;
pub mod wireless;

/// A contributor writes one area of configuration into the document and may
/// request first-logon commands, which are numbered after every contributor
/// has run.
#[enum_dispatch(Contributor)]
pub trait Contribute {
    fn apply(
        &self,
        document: &mut Document,
        config: &ConfigModel,
        modules: &ModuleResults,
    ) -> Result<Vec<PendingCommand>>;
}

/// The contributor registry. Declaration order is execution order and
/// therefore the order of the first-logon commands they produce.
#[enum_dispatch]
#[derive(Clone, Debug, EnumIter)]
pub enum Contributor {
    Localization,
    Setup,
    Partitioning,
    Identity,
    Accounts,
    Wireless,
    ShellTweaks,
    Features,
    DesktopIcons,
    CommandRules,
}

impl Display for Contributor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Contributor::Localization(_) => "localization",
                Contributor::Setup(_) => "setup",
                Contributor::Partitioning(_) => "partitioning",
                Contributor::Identity(_) => "identity",
                Contributor::Accounts(_) => "accounts",
                Contributor::Wireless(_) => "wireless",
                Contributor::ShellTweaks(_) => "shell",
                Contributor::Features(_) => "features",
                Contributor::DesktopIcons(_) => "desktop",
                Contributor::CommandRules(_) => "rules",
            }
        )
    }
}

/// Quote a command-line argument if it contains whitespace.
fn quote(value: &str) -> String {
    if value.is_empty() || value.contains(char::is_whitespace) {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}

/// A `reg add` command that sets a value, overwriting without prompting.
pub fn reg_add(key: &str, name: &str, kind: &str, data: impl Display) -> String {
    format!(
        "reg add \"{key}\" /v {} /t {kind} /d {} /f",
        quote(name),
        quote(&data.to_string())
    )
}

pub fn reg_dword(key: &str, name: &str, value: u32) -> String {
    reg_add(key, name, "REG_DWORD", value)
}

pub fn reg_sz(key: &str, name: &str, value: &str) -> String {
    reg_add(key, name, "REG_SZ", value)
}

/// A DISM command enabling an optional feature and its parents.
pub fn dism_enable(feature: &str) -> String {
    format!("dism /online /enable-feature /featurename:{feature} /all /norestart")
}

/// Append a `RunSynchronousCommand` to `component`, numbered after any
/// commands already there.
pub fn run_synchronous(
    document: &mut Document,
    component: NodeId,
    path: &str,
    description: &str,
) -> NodeId {
    let list = document.get_or_create_child(component, "RunSynchronous");
    let order = document.find_children(list, "RunSynchronousCommand").len() + 1;

    let command = document.append(
        list,
        Element::new("RunSynchronousCommand").with_attribute("wcm:action", "add"),
    );
    document.add_value(command, "Order", order);
    document.add_element(command, "Path", Some(path));
    document.add_element(command, "Description", Some(description));
    command
}

#[cfg(test)]
mod tests {
    use super::*;
    use autounattend_xml::{Architecture, Pass};
    use strum::IntoEnumIterator;

    #[test]
    fn registry_order() {
        let names: Vec<String> = Contributor::iter().map(|c| c.to_string()).collect();
        assert_eq!(
            names,
            vec![
                "localization",
                "setup",
                "partitioning",
                "identity",
                "accounts",
                "wireless",
                "shell",
                "features",
                "desktop",
                "rules",
            ]
        );
    }

    #[test]
    fn registry_commands() {
        assert_eq!(
            reg_dword(r"HKLM\SOFTWARE\Policies\Microsoft\Windows\DataCollection", "AllowTelemetry", 0),
            r#"reg add "HKLM\SOFTWARE\Policies\Microsoft\Windows\DataCollection" /v AllowTelemetry /t REG_DWORD /d 0 /f"#
        );
        assert_eq!(
            reg_sz(r"HKCU\Control Panel\Desktop", "Wallpaper", r"C:\My Pictures\a.jpg"),
            r#"reg add "HKCU\Control Panel\Desktop" /v Wallpaper /t REG_SZ /d "C:\My Pictures\a.jpg" /f"#
        );
    }

    #[test]
    fn run_synchronous_numbers_commands() {
        let mut document = Document::with_root(Architecture::Amd64).unwrap();
        let component = document
            .get_or_create_component(Pass::Specialize, "Microsoft-Windows-Deployment")
            .unwrap();

        run_synchronous(&mut document, component, "cmd /c echo 1", "First");
        let second = run_synchronous(&mut document, component, "cmd /c echo 2", "Second");

        assert_eq!(document.child_text(second, "Order"), Some("2"));
        assert_eq!(document.find_all("RunSynchronous").len(), 1);
    }
}
