use super::{Contribute, reg_dword};
use crate::{
    commands::PendingCommand,
    modules::ModuleResults,
    options::{
        ConfigModel, ExplorerSettings, StartTaskbar, SystemTweaks,
        shell::{ExplorerStart, TaskbarAlignment},
    },
};
use anyhow::Result;
use autounattend_xml::Document;

const EXPLORER_ADVANCED: &str = r"HKCU\Software\Microsoft\Windows\CurrentVersion\Explorer\Advanced";

/// Explorer, Start/taskbar and system tweaks. Everything here is applied
/// with first-logon registry commands.
#[derive(Clone, Debug, Default)]
pub struct ShellTweaks;

fn explorer(settings: &ExplorerSettings) -> Vec<PendingCommand> {
    let mut commands = Vec::new();
    if settings.show_file_extensions {
        commands.push(PendingCommand::new(
            reg_dword(EXPLORER_ADVANCED, "HideFileExt", 0),
            "Show file extensions",
        ));
    }
    if settings.show_hidden_files {
        commands.push(PendingCommand::new(
            reg_dword(EXPLORER_ADVANCED, "Hidden", 1),
            "Show hidden files",
        ));
    }
    if settings.show_protected_os_files {
        commands.push(PendingCommand::new(
            reg_dword(EXPLORER_ADVANCED, "ShowSuperHidden", 1),
            "Show protected operating system files",
        ));
    }
    if settings.launch_to == ExplorerStart::ThisPc {
        commands.push(PendingCommand::new(
            reg_dword(EXPLORER_ADVANCED, "LaunchTo", 1),
            "Open Explorer to This PC",
        ));
    }
    if settings.expand_navigation_pane {
        commands.push(PendingCommand::new(
            reg_dword(EXPLORER_ADVANCED, "NavPaneExpandToCurrentFolder", 1),
            "Expand the navigation pane to the current folder",
        ));
    }
    commands
}

fn taskbar(settings: &StartTaskbar) -> Vec<PendingCommand> {
    let mut commands = Vec::new();
    if settings.alignment == TaskbarAlignment::Left {
        commands.push(PendingCommand::new(
            reg_dword(EXPLORER_ADVANCED, "TaskbarAl", 0),
            "Align the taskbar to the left",
        ));
    }
    if !settings.show_widgets {
        commands.push(PendingCommand::new(
            reg_dword(EXPLORER_ADVANCED, "TaskbarDa", 0),
            "Hide widgets",
        ));
    }
    if !settings.show_chat {
        commands.push(PendingCommand::new(
            reg_dword(EXPLORER_ADVANCED, "TaskbarMn", 0),
            "Hide chat",
        ));
    }
    if !settings.show_task_view {
        commands.push(PendingCommand::new(
            reg_dword(EXPLORER_ADVANCED, "ShowTaskViewButton", 0),
            "Hide the task view button",
        ));
    }
    if settings.search != Default::default() {
        commands.push(PendingCommand::new(
            reg_dword(
                r"HKCU\Software\Microsoft\Windows\CurrentVersion\Search",
                "SearchboxTaskbarMode",
                settings.search.dword(),
            ),
            format!("Set taskbar search to {}", settings.search),
        ));
    }
    if !settings.show_start_suggestions {
        commands.push(PendingCommand::new(
            reg_dword(
                r"HKCU\Software\Microsoft\Windows\CurrentVersion\ContentDeliveryManager",
                "SubscribedContent-338388Enabled",
                0,
            ),
            "Disable Start suggestions",
        ));
    }
    commands
}

fn tweaks(settings: &SystemTweaks) -> Vec<PendingCommand> {
    let mut commands = Vec::new();
    if settings.disable_telemetry {
        commands.push(PendingCommand::new(
            reg_dword(r"HKLM\SOFTWARE\Policies\Microsoft\Windows\DataCollection", "AllowTelemetry", 0),
            "Disable telemetry",
        ));
    }
    if settings.disable_cortana {
        commands.push(PendingCommand::new(
            reg_dword(r"HKLM\SOFTWARE\Policies\Microsoft\Windows\Windows Search", "AllowCortana", 0),
            "Disable Cortana",
        ));
    }
    if settings.disable_web_search {
        commands.push(PendingCommand::new(
            reg_dword(r"HKCU\Software\Microsoft\Windows\CurrentVersion\Search", "BingSearchEnabled", 0),
            "Disable web results in search",
        ));
    }
    if settings.disable_game_bar {
        commands.push(PendingCommand::new(
            reg_dword(r"HKCU\Software\Microsoft\Windows\CurrentVersion\GameDVR", "AppCaptureEnabled", 0),
            "Disable Game Bar capture",
        ));
    }
    if settings.disable_uac {
        commands.push(PendingCommand::new(
            reg_dword(r"HKLM\SOFTWARE\Microsoft\Windows\CurrentVersion\Policies\System", "EnableLUA", 0),
            "Disable User Account Control",
        ));
    }
    if settings.disable_smart_screen {
        commands.push(PendingCommand::new(
            reg_dword(r"HKLM\SOFTWARE\Policies\Microsoft\Windows\System", "EnableSmartScreen", 0),
            "Disable SmartScreen",
        ));
    }
    if settings.disable_fast_startup {
        commands.push(PendingCommand::new(
            reg_dword(r"HKLM\SYSTEM\CurrentControlSet\Control\Session Manager\Power", "HiberbootEnabled", 0),
            "Disable fast startup",
        ));
    }
    if settings.disable_hibernation {
        commands.push(PendingCommand::new("powercfg /hibernate off", "Disable hibernation"));
    }
    if settings.disable_firewall {
        commands.push(PendingCommand::new(
            "netsh advfirewall set allprofiles state off",
            "Disable Windows Firewall",
        ));
    }
    if settings.disable_automatic_updates {
        commands.push(PendingCommand::new(
            reg_dword(r"HKLM\SOFTWARE\Policies\Microsoft\Windows\WindowsUpdate\AU", "NoAutoUpdate", 1),
            "Disable automatic updates",
        ));
    }
    if settings.disable_defender {
        commands.push(PendingCommand::new(
            reg_dword(r"HKLM\SOFTWARE\Policies\Microsoft\Windows Defender", "DisableAntiSpyware", 1),
            "Disable Microsoft Defender",
        ));
    }
    commands
}

impl Contribute for ShellTweaks {
    fn apply(
        &self,
        _document: &mut Document,
        config: &ConfigModel,
        _modules: &ModuleResults,
    ) -> Result<Vec<PendingCommand>> {
        let mut commands = explorer(&config.explorer);
        commands.extend(taskbar(&config.taskbar));
        commands.extend(tweaks(&config.tweaks));
        Ok(commands)
    }
}
