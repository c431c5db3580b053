use super::{Contribute, reg_dword, reg_sz, run_synchronous};
use crate::{
    commands::PendingCommand,
    modules::ModuleResults,
    options::{
        ConfigModel, ExpressSettings, LockKeys, Personalization, StickyKeys, VisualEffects, Wdac,
        appearance::{PerformanceMode, Theme},
        privacy::WdacMode,
    },
};
use anyhow::Result;
use autounattend_xml::{Document, Pass};
use tracing::warn;

const PERSONALIZE: &str = r"HKCU\Software\Microsoft\Windows\CurrentVersion\Themes\Personalize";

/// Rule-based first-logon commands for the remaining categories, followed by
/// user-supplied scripts.
#[derive(Clone, Debug, Default)]
pub struct CommandRules;

fn visual_effects(settings: &VisualEffects) -> Vec<PendingCommand> {
    let mut commands = Vec::new();
    let setting = match settings.performance_mode {
        PerformanceMode::Balanced => None,
        PerformanceMode::BestAppearance => Some(1),
        PerformanceMode::BestPerformance => Some(2),
    };
    if let Some(setting) = setting {
        commands.push(PendingCommand::new(
            reg_dword(
                r"HKCU\Software\Microsoft\Windows\CurrentVersion\Explorer\VisualEffects",
                "VisualFXSetting",
                setting,
            ),
            format!("Adjust visual effects for {}", settings.performance_mode),
        ));
    }
    if !settings.transparency {
        commands.push(PendingCommand::new(
            reg_dword(PERSONALIZE, "EnableTransparency", 0),
            "Disable transparency effects",
        ));
    }
    if !settings.animations {
        commands.push(PendingCommand::new(
            reg_sz(r"HKCU\Control Panel\Desktop\WindowMetrics", "MinAnimate", "0"),
            "Disable window animations",
        ));
    }
    commands
}

fn express(settings: &ExpressSettings) -> Vec<PendingCommand> {
    let toggles = settings.toggles();
    [
        (
            toggles.diagnostics,
            reg_dword(r"HKLM\SOFTWARE\Policies\Microsoft\Windows\DataCollection", "AllowTelemetry", 0),
            "Send only required diagnostic data",
        ),
        (
            toggles.inking,
            reg_dword(r"HKCU\Software\Microsoft\InputPersonalization", "RestrictImplicitInkCollection", 1),
            "Disable inking and typing personalization",
        ),
        (
            toggles.tailored_experiences,
            reg_dword(r"HKCU\Software\Microsoft\Windows\CurrentVersion\Privacy", "TailoredExperiencesWithDiagnosticDataEnabled", 0),
            "Disable tailored experiences",
        ),
        (
            toggles.advertising_id,
            reg_dword(r"HKCU\Software\Microsoft\Windows\CurrentVersion\AdvertisingInfo", "Enabled", 0),
            "Disable the advertising ID",
        ),
        (
            toggles.location,
            reg_dword(r"HKLM\SOFTWARE\Policies\Microsoft\Windows\LocationAndSensors", "DisableLocation", 1),
            "Disable location services",
        ),
        (
            toggles.find_my_device,
            reg_dword(r"HKLM\SOFTWARE\Policies\Microsoft\FindMyDevice", "AllowFindMyDevice", 0),
            "Disable Find My Device",
        ),
    ]
    .into_iter()
    .filter(|(enabled, _, _)| !enabled)
    .map(|(_, command, description)| PendingCommand::new(command, description))
    .collect()
}

fn lock_keys(settings: &LockKeys) -> Option<PendingCommand> {
    let indicators = settings.indicators();
    (indicators > 0).then(|| {
        PendingCommand::new(
            reg_sz(
                r"HKCU\Control Panel\Keyboard",
                "InitialKeyboardIndicators",
                &indicators.to_string(),
            ),
            "Set lock keys at logon",
        )
    })
}

fn sticky_keys(settings: &StickyKeys) -> PendingCommand {
    PendingCommand::new(
        reg_sz(
            r"HKCU\Control Panel\Accessibility\StickyKeys",
            "Flags",
            &settings.flags().to_string(),
        ),
        if settings.enabled {
            "Enable Sticky Keys"
        } else {
            "Disable the Sticky Keys shortcut"
        },
    )
}

fn personalization(settings: &Personalization) -> Vec<PendingCommand> {
    let light = u32::from(settings.theme == Theme::Light);
    let mut commands = vec![
        PendingCommand::new(
            reg_dword(PERSONALIZE, "AppsUseLightTheme", light),
            format!("Use the {} app theme", settings.theme),
        ),
        PendingCommand::new(
            reg_dword(PERSONALIZE, "SystemUsesLightTheme", light),
            format!("Use the {} system theme", settings.theme),
        ),
    ];

    if let Some(accent) = &settings.accent_color {
        match accent.to_dword() {
            Some(color) => commands.push(PendingCommand::new(
                reg_dword(
                    r"HKCU\Software\Microsoft\Windows\CurrentVersion\Explorer\Accent",
                    "AccentColorMenu",
                    color,
                ),
                "Set accent color",
            )),
            None => warn!(color = %accent.0, "Ignoring invalid accent color"),
        }
    }
    if settings.color_start_and_taskbar {
        commands.push(PendingCommand::new(
            reg_dword(PERSONALIZE, "ColorPrevalence", 1),
            "Show accent color on Start and taskbar",
        ));
    }
    if settings.color_title_bars {
        commands.push(PendingCommand::new(
            reg_dword(r"HKCU\Software\Microsoft\Windows\DWM", "ColorPrevalence", 1),
            "Show accent color on title bars",
        ));
    }
    commands
}

fn remove_apps(apps: &[String]) -> Vec<PendingCommand> {
    apps.iter()
        .map(|app| app.trim())
        .filter(|app| !app.is_empty())
        .map(|app| {
            PendingCommand::new(
                format!(
                    "powershell -NoProfile -Command \"Get-AppxPackage -AllUsers *{app}* | Remove-AppxPackage -AllUsers; \
                     Get-AppxProvisionedPackage -Online | Where-Object DisplayName -Like '*{app}*' | Remove-AppxProvisionedPackage -Online\""
                ),
                format!("Remove {app}"),
            )
        })
        .collect()
}

fn wdac(settings: &Wdac) -> Vec<PendingCommand> {
    if !settings.enabled {
        return Vec::new();
    }

    let policy = r"C:\Windows\Temp\WDACPolicy.xml";
    let mut commands = vec![PendingCommand::new(
        format!(
            "powershell -NoProfile -Command \"New-CIPolicy -Level Publisher -Fallback Hash -UserPEs -FilePath {policy} -ScanPath C:\\Windows\""
        ),
        "Create application control policy",
    )];
    for option in [8, 9] {
        commands.push(PendingCommand::new(
            format!("powershell -NoProfile -Command \"Set-RuleOption -FilePath {policy} -Option {option}\""),
            format!("Set application control rule option {option}"),
        ));
    }
    commands.push(match settings.mode {
        WdacMode::Audit => PendingCommand::new(
            format!("powershell -NoProfile -Command \"Set-RuleOption -FilePath {policy} -Option 3\""),
            "Run application control in audit mode",
        ),
        WdacMode::Enforce => PendingCommand::new(
            format!("powershell -NoProfile -Command \"Set-RuleOption -FilePath {policy} -Option 3 -Delete\""),
            "Enforce application control",
        ),
    });
    commands.push(PendingCommand::new(
        format!(
            "powershell -NoProfile -Command \"ConvertFrom-CIPolicy -XmlFilePath {policy} -BinaryFilePath C:\\Windows\\System32\\CodeIntegrity\\SIPolicy.p7b\""
        ),
        "Deploy application control policy",
    ));
    if settings.hvci {
        commands.push(PendingCommand::new(
            reg_dword(
                r"HKLM\SYSTEM\CurrentControlSet\Control\DeviceGuard\Scenarios\HypervisorEnforcedCodeIntegrity",
                "Enabled",
                1,
            ),
            "Enable memory integrity",
        ));
    }
    commands
}

impl Contribute for CommandRules {
    fn apply(
        &self,
        document: &mut Document,
        config: &ConfigModel,
        _modules: &ModuleResults,
    ) -> Result<Vec<PendingCommand>> {
        let mut commands = visual_effects(&config.visual_effects);
        commands.extend(express(&config.express));
        commands.extend(lock_keys(&config.lock_keys));
        commands.push(sticky_keys(&config.sticky_keys));
        commands.extend(personalization(&config.personalization));
        commands.extend(remove_apps(&config.remove_apps));
        commands.extend(wdac(&config.wdac));

        let scripts = &config.custom_scripts;
        if !scripts.specialize.is_empty() {
            let deployment =
                document.get_or_create_component(Pass::Specialize, "Microsoft-Windows-Deployment")?;
            for (index, script) in scripts.specialize.iter().enumerate() {
                let description = script
                    .description
                    .clone()
                    .unwrap_or_else(|| format!("Custom script {}", index + 1));
                run_synchronous(document, deployment, &script.command, &description);
            }
        }
        commands.extend(scripts.first_logon.iter().map(|script| PendingCommand {
            command_line: script.command.clone(),
            description: script.description.clone(),
            requires_user_input: script.requires_user_input,
        }));

        Ok(commands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{AccentColor, CustomScript, privacy::ExpressMode};
    use autounattend_xml::Architecture;

    #[test]
    fn lock_keys_only_when_set() {
        assert!(lock_keys(&LockKeys {
            caps_lock: false,
            num_lock: false,
            scroll_lock: false,
        })
        .is_none());

        let command = lock_keys(&LockKeys::default()).unwrap();
        assert_eq!(
            command.command_line,
            r#"reg add "HKCU\Control Panel\Keyboard" /v InitialKeyboardIndicators /t REG_SZ /d 2 /f"#
        );
    }

    #[test]
    fn express_modes() {
        let commands = |mode| {
            express(&ExpressSettings {
                mode,
                ..Default::default()
            })
        };

        assert!(commands(ExpressMode::AllEnabled).is_empty());
        assert_eq!(commands(ExpressMode::AllDisabled).len(), 6);

        let defaults = commands(ExpressMode::Default);
        assert_eq!(defaults.len(), 2);
        assert!(defaults[0].command_line.contains("DisableLocation"));
        assert!(defaults[1].command_line.contains("AllowFindMyDevice"));
    }

    #[test]
    fn accent_color_command() {
        let commands = personalization(&Personalization {
            accent_color: Some(AccentColor(String::from("#0078D4"))),
            ..Default::default()
        });

        assert_eq!(commands.len(), 3);
        assert!(commands[2].command_line.ends_with("/v AccentColorMenu /t REG_DWORD /d 4292114432 /f"));
    }

    #[test]
    fn invalid_accent_color_is_skipped() {
        let commands = personalization(&Personalization {
            accent_color: Some(AccentColor(String::from("#0078D"))),
            ..Default::default()
        });

        assert_eq!(commands.len(), 2);
    }

    #[test]
    fn wdac_enforce() {
        let commands = wdac(&Wdac {
            enabled: true,
            mode: WdacMode::Enforce,
            hvci: true,
        });

        assert_eq!(commands.len(), 6);
        assert!(commands[3].command_line.contains("-Option 3 -Delete"));
        assert!(commands[4].command_line.contains("SIPolicy.p7b"));
        assert!(wdac(&Wdac::default()).is_empty());
    }

    #[test]
    fn custom_scripts_come_last() {
        let mut config = ConfigModel::default();
        config.remove_apps = vec![String::from("Microsoft.BingNews"), String::from("  ")];
        config.custom_scripts.first_logon = vec![CustomScript {
            command: String::from("echo done"),
            description: None,
            requires_user_input: true,
        }];
        config.custom_scripts.specialize = vec![CustomScript {
            command: String::from("cmd /c echo specialize"),
            description: None,
            requires_user_input: false,
        }];
        let mut document = Document::with_root(Architecture::Amd64).unwrap();

        let commands = CommandRules
            .apply(&mut document, &config, &ModuleResults::new())
            .unwrap();

        let last = commands.last().unwrap();
        assert_eq!(last.command_line, "echo done");
        assert!(last.requires_user_input);
        assert_eq!(
            commands.iter().filter(|c| c.description.as_deref() == Some("Remove Microsoft.BingNews")).count(),
            1
        );

        let run = document.find_all("RunSynchronousCommand");
        assert_eq!(run.len(), 1);
        assert_eq!(document.child_text(run[0], "Description"), Some("Custom script 1"));
    }
}
