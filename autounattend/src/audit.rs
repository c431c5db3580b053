//! Plain-text record of every effective setting, written alongside the answer
//! file. It is rendered from the configuration rather than from the document.

use crate::{
    built_info,
    engine::GeneratedDocument,
    options::{ConfigModel, CustomScript, Secret},
};
use chrono::{DateTime, Local};
use std::fmt::Display;

const RULE: usize = 80;

pub struct AuditLog {
    pub timestamp: DateTime<Local>,
    lines: Vec<String>,
}

impl Default for AuditLog {
    fn default() -> Self {
        Self::new(Local::now())
    }
}

fn flag(value: bool) -> &'static str {
    if value { "enabled" } else { "disabled" }
}

fn or_unset(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or("(not set)")
}

fn secret(value: &Secret) -> &'static str {
    if value.is_set() { "(set)" } else { "(not set)" }
}

impl AuditLog {
    pub fn new(timestamp: DateTime<Local>) -> Self {
        Self {
            timestamp,
            lines: Vec::new(),
        }
    }

    fn section(&mut self, number: usize, title: &str) {
        if number > 1 {
            self.lines.push(String::new());
        }
        self.lines.push(format!("[{number}. {title}]"));
        self.lines.push("-".repeat(40));
    }

    fn field(&mut self, name: &str, value: impl Display) {
        self.lines.push(format!("  {name}: {value}"));
    }

    fn item(&mut self, value: impl Display) {
        self.lines.push(format!("    {value}"));
    }

    fn scripts(&mut self, name: &str, scripts: &[CustomScript]) {
        self.field(name, scripts.len());
        for (index, script) in scripts.iter().enumerate() {
            self.item(format!(
                "{}. {} ({})",
                index + 1,
                script.command,
                or_unset(script.description.as_deref())
            ));
        }
    }

    /// Render the full settings log.
    pub fn render(mut self, config: &ConfigModel) -> String {
        self.lines.push("=".repeat(RULE));
        self.lines.push(format!(
            "autounattend {} settings log",
            built_info::PKG_VERSION
        ));
        self.lines.push("=".repeat(RULE));
        self.lines.push(format!(
            "Generated: {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S %:z")
        ));
        self.lines.push(String::new());

        let region = &config.region_language;
        self.section(1, "Region and language");
        self.field("UI language", &region.ui_language);
        self.field("UI language fallback", or_unset(region.ui_language_fallback.as_deref()));
        self.field("Input locale", &region.input_locale);
        self.field("System locale", &region.system_locale);
        self.field("User locale", &region.user_locale);
        self.field("Time zone", or_unset(region.timezone.as_deref()));
        self.field(
            "Geo location",
            region
                .geo_location
                .map_or_else(|| String::from("(not set)"), |id| id.to_string()),
        );

        self.section(2, "Processor architecture");
        self.field("Architecture", config.architecture);

        let setup = &config.setup;
        self.section(3, "Setup behavior");
        self.field("Hide EULA page", flag(setup.hide_eula_page));
        self.field("Hide OEM registration", flag(setup.hide_oem_registration));
        self.field("Hide online account screens", flag(setup.hide_online_account_screens));
        self.field("Hide wireless setup", flag(setup.hide_wireless_setup));
        self.field("Skip machine OOBE", flag(setup.skip_machine_oobe));
        self.field("Skip user OOBE", flag(setup.skip_user_oobe));
        self.field("Protect your PC", setup.protect_your_pc);
        self.field("Network location", setup.network_location);
        self.field("Bypass network check", flag(setup.bypass_network_check));

        let edition = &config.edition;
        self.section(4, "Edition and product key");
        self.field("Edition", or_unset(edition.edition.as_deref()));
        self.field(
            "Product key",
            if edition.product_key.as_deref().is_some_and(|k| !k.trim().is_empty()) {
                "(set)"
            } else {
                "(not set)"
            },
        );
        self.field("Accept EULA", flag(edition.accept_eula));

        let pe = &config.windows_pe;
        self.section(5, "Windows PE");
        self.field("Bypass hardware requirements", flag(pe.bypass_requirements));
        self.field("Disable firewall", flag(pe.disable_firewall));
        self.field("Enable network", flag(pe.enable_network));

        let disk = &config.disk;
        self.section(6, "Disk configuration");
        self.field("Disk", disk.disk_id);
        self.field("Wipe disk", flag(disk.wipe_disk));
        self.field("Partitions", disk.partitions.len());
        for (index, partition) in disk.partitions.iter().enumerate() {
            let size = match partition.size() {
                crate::options::PartitionSize::Megabytes(mb) => format!("{mb} MB"),
                crate::options::PartitionSize::Remaining => String::from("remaining space"),
            };
            let letter = partition
                .letter
                .map(|letter| format!(" ({letter}:)"))
                .unwrap_or_default();
            self.item(format!("{}. {} {size}{letter}", index + 1, partition.kind));
        }

        let computer = &config.computer;
        self.section(7, "Computer");
        self.field(
            "Computer name",
            if computer.computer_name == "*" {
                String::from("* (generated)")
            } else {
                computer.computer_name.clone()
            },
        );
        self.field("Owner", or_unset(computer.owner.as_deref()));
        self.field("Organization", or_unset(computer.organization.as_deref()));
        match computer.domain.as_deref().filter(|d| !d.trim().is_empty()) {
            Some(domain) => {
                self.field("Domain", domain);
                self.field("Organizational unit", or_unset(computer.machine_object_ou.as_deref()));
            }
            None => self.field("Workgroup", or_unset(computer.workgroup.as_deref())),
        }

        let accounts = &config.accounts;
        self.section(8, "User accounts");
        if accounts.accounts.is_empty() {
            self.field("Local accounts", "(none)");
        }
        for (index, account) in accounts.accounts.iter().enumerate() {
            self.field(&format!("Account {}", index + 1), &account.name);
            self.item(format!("Display name: {}", account.display_name()));
            self.item(format!("Group: {}", account.group));
            self.item(format!("Password: {}", secret(&account.password)));
            self.item(format!(
                "Password never expires: {}",
                flag(account.password_never_expires)
            ));
        }
        self.field("Automatic logon count", accounts.auto_logon_count);
        if accounts.auto_logon_count > 0 {
            self.field(
                "Automatic logon account",
                or_unset(accounts.accounts.first().map(|a| a.name.as_str())),
            );
        }
        self.field("Disable Administrator", flag(accounts.disable_admin_account));
        self.field("Enable Guest", flag(accounts.enable_guest_account));

        let explorer = &config.explorer;
        self.section(9, "Explorer");
        self.field("Show file extensions", flag(explorer.show_file_extensions));
        self.field("Show hidden files", flag(explorer.show_hidden_files));
        self.field("Show protected OS files", flag(explorer.show_protected_os_files));
        self.field("Launch to", explorer.launch_to);
        self.field("Expand navigation pane", flag(explorer.expand_navigation_pane));

        let taskbar = &config.taskbar;
        self.section(10, "Start and taskbar");
        self.field("Alignment", taskbar.alignment);
        self.field("Widgets", flag(taskbar.show_widgets));
        self.field("Chat", flag(taskbar.show_chat));
        self.field("Task view", flag(taskbar.show_task_view));
        self.field("Search", taskbar.search);
        self.field("Start suggestions", flag(taskbar.show_start_suggestions));

        let tweaks = &config.tweaks;
        self.section(11, "System tweaks");
        self.field("Disable telemetry", flag(tweaks.disable_telemetry));
        self.field("Disable Cortana", flag(tweaks.disable_cortana));
        self.field("Disable web search", flag(tweaks.disable_web_search));
        self.field("Disable Game Bar", flag(tweaks.disable_game_bar));
        self.field("Disable UAC", flag(tweaks.disable_uac));
        self.field("Disable SmartScreen", flag(tweaks.disable_smart_screen));
        self.field("Disable fast startup", flag(tweaks.disable_fast_startup));
        self.field("Disable hibernation", flag(tweaks.disable_hibernation));
        self.field("Disable firewall", flag(tweaks.disable_firewall));
        self.field("Disable automatic updates", flag(tweaks.disable_automatic_updates));
        self.field("Disable Defender", flag(tweaks.disable_defender));

        let effects = &config.visual_effects;
        self.section(12, "Visual effects");
        self.field("Performance mode", effects.performance_mode);
        self.field("Transparency", flag(effects.transparency));
        self.field("Animations", flag(effects.animations));

        let desktop = &config.desktop;
        self.section(13, "Desktop");
        self.field("This PC", flag(desktop.show_this_pc));
        self.field("User files", flag(desktop.show_user_files));
        self.field("Network", flag(desktop.show_network));
        self.field("Recycle Bin", flag(desktop.show_recycle_bin));
        self.field("Control Panel", flag(desktop.show_control_panel));
        self.field("Icon size", desktop.icon_size);
        self.field("Auto arrange", flag(desktop.auto_arrange));
        self.field("Wallpaper", or_unset(desktop.wallpaper.as_deref()));

        let vm = &config.vm_support;
        self.section(14, "Virtualization");
        self.field("Hyper-V", flag(vm.hyper_v));
        self.field("WSL", flag(vm.wsl));
        self.field("Virtual Machine Platform", flag(vm.virtual_machine_platform));
        self.field("Windows Sandbox", flag(vm.sandbox));
        self.field("Containers", flag(vm.containers));

        let wifi = &config.wifi;
        self.section(15, "Wi-Fi");
        if wifi.is_configured() {
            self.field("SSID", &wifi.ssid);
            self.field("Authentication", wifi.authentication);
            self.field("Password", secret(&wifi.password));
            self.field("Connect automatically", flag(wifi.connect_automatically));
        } else {
            self.field("SSID", "(not set)");
        }

        let express = config.express.toggles();
        self.section(16, "Express settings");
        self.field("Mode", config.express.mode);
        self.field("Diagnostics", flag(express.diagnostics));
        self.field("Inking and typing", flag(express.inking));
        self.field("Tailored experiences", flag(express.tailored_experiences));
        self.field("Advertising ID", flag(express.advertising_id));
        self.field("Location", flag(express.location));
        self.field("Find my device", flag(express.find_my_device));

        let lock_keys = &config.lock_keys;
        self.section(17, "Lock keys");
        self.field("Caps Lock", flag(lock_keys.caps_lock));
        self.field("Num Lock", flag(lock_keys.num_lock));
        self.field("Scroll Lock", flag(lock_keys.scroll_lock));
        self.field("Indicators", lock_keys.indicators());

        let sticky = &config.sticky_keys;
        self.section(18, "Sticky keys");
        self.field("Sticky keys", flag(sticky.enabled));
        self.field("Flags", sticky.flags());

        let personalization = &config.personalization;
        self.section(19, "Personalization");
        self.field("Theme", personalization.theme);
        self.field(
            "Accent color",
            or_unset(personalization.accent_color.as_ref().map(|c| c.0.as_str())),
        );
        self.field(
            "Color Start and taskbar",
            flag(personalization.color_start_and_taskbar),
        );
        self.field("Color title bars", flag(personalization.color_title_bars));

        self.section(20, "App removal");
        self.field("Packages", config.remove_apps.len());
        for app in &config.remove_apps {
            self.item(app);
        }

        self.section(21, "Custom scripts");
        self.scripts("Specialize", &config.custom_scripts.specialize);
        self.scripts("First logon", &config.custom_scripts.first_logon);

        let wdac = &config.wdac;
        self.section(22, "Application control");
        self.field("WDAC", flag(wdac.enabled));
        if wdac.enabled {
            self.field("Mode", wdac.mode);
            self.field("HVCI", flag(wdac.hvci));
        }

        self.section(23, "Additional components");
        let features: Vec<&str> = config.components.features();
        if features.is_empty() {
            self.field("Features", "(none)");
        }
        for feature in features {
            self.item(feature);
        }

        self.lines.push(String::new());
        self.lines.push("=".repeat(RULE));
        self.lines.push(String::new());
        self.lines.join("\n")
    }

    /// Render the settings log followed by the outcome of a generation.
    pub fn render_generation(self, config: &ConfigModel, generated: &GeneratedDocument) -> String {
        let mut out = self.render(config);

        out.push_str("[Validation]\n");
        if generated.report.issues.is_empty() {
            out.push_str("  No issues\n");
        }
        for issue in &generated.report.issues {
            out.push_str(&format!("  {issue}\n"));
        }

        out.push_str("\n[First logon commands]\n");
        for entry in &generated.commands {
            out.push_str(&format!(
                "  {:>3}. [{}] {}\n",
                entry.order, entry.source, entry.command_line
            ));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        engine::{Engine, EngineOptions},
        modules::ModuleResults,
        options::UserAccount,
    };

    #[test]
    fn every_category_is_listed() {
        let log = AuditLog::default().render(&ConfigModel::default());

        for number in 1..=23 {
            assert!(log.contains(&format!("[{number}. ")), "section {number}");
        }
        assert!(log.contains("  UI language: ja-JP"));
        assert!(log.contains("  Time zone: Tokyo Standard Time"));
        assert!(log.contains("3. Primary remaining space (C:)"));
        assert!(log.contains("  Computer name: * (generated)"));
    }

    #[test]
    fn passwords_are_never_written() {
        let mut config = ConfigModel::default();
        config.accounts.accounts = vec![
            UserAccount::new("admin", "hunter2", "Administrators"),
            UserAccount::new("guest", "", "Users"),
        ];
        config.wifi.ssid = String::from("office");
        config.wifi.password = Secret::from("wifi-secret");

        let log = AuditLog::default().render(&config);

        assert!(!log.contains("hunter2"));
        assert!(!log.contains("wifi-secret"));
        assert!(log.contains("    Password: (set)"));
        assert!(log.contains("    Password: (not set)"));
        assert!(log.contains("  Password: (set)"));
    }

    #[test]
    fn generation_outcome_is_appended() {
        let mut config = ConfigModel::default();
        config.vm_support.wsl = true;
        let generated = Engine::new(EngineOptions::default())
            .generate(&config, &ModuleResults::new())
            .unwrap();

        let log = AuditLog::default().render_generation(&config, &generated);

        assert!(log.contains("[First logon commands]"));
        assert!(log.contains("[features] dism /online /enable-feature"));
    }
}
