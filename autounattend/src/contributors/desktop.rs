use super::{Contribute, reg_dword, reg_sz};
use crate::{
    commands::PendingCommand,
    modules::ModuleResults,
    options::{ConfigModel, DesktopSettings, appearance::IconSize},
};
use anyhow::Result;
use autounattend_xml::Document;

const HIDE_DESKTOP_ICONS: &str =
    r"HKCU\Software\Microsoft\Windows\CurrentVersion\Explorer\HideDesktopIcons\NewStartPanel";

const DESKTOP_BAG: &str = r"HKCU\Software\Microsoft\Windows\Shell\Bags\1\Desktop";

/// Desktop icon visibility, icon layout and wallpaper.
#[derive(Clone, Debug, Default)]
pub struct DesktopIcons;

fn icons(settings: &DesktopSettings) -> [(&'static str, &'static str, bool); 5] {
    [
        ("This PC", "{20D04FE0-3AEA-1069-A2D8-08002B30309D}", settings.show_this_pc),
        ("User Files", "{59031a47-3f72-44a7-89c5-5595fe6b30ee}", settings.show_user_files),
        ("Network", "{F02C1A0D-BE21-4350-88B0-7367FC96EF3C}", settings.show_network),
        ("Recycle Bin", "{645FF040-5081-101B-9F08-00AA002F954E}", settings.show_recycle_bin),
        ("Control Panel", "{5399E694-6CE5-4D6C-8FCE-1D8870FDCBA0}", settings.show_control_panel),
    ]
}

impl Contribute for DesktopIcons {
    fn apply(
        &self,
        _document: &mut Document,
        config: &ConfigModel,
        _modules: &ModuleResults,
    ) -> Result<Vec<PendingCommand>> {
        let desktop = &config.desktop;

        // The value hides the icon, so it is the inverse of the setting
        let mut commands: Vec<PendingCommand> = icons(desktop)
            .into_iter()
            .map(|(name, clsid, show)| {
                PendingCommand::new(
                    reg_dword(HIDE_DESKTOP_ICONS, clsid, u32::from(!show)),
                    format!("{} {name} desktop icon", if show { "Show" } else { "Hide" }),
                )
            })
            .collect();

        if desktop.icon_size != IconSize::default() {
            commands.push(PendingCommand::new(
                reg_dword(DESKTOP_BAG, "IconSize", desktop.icon_size.pixels()),
                format!("Use {} desktop icons", desktop.icon_size),
            ));
        }

        if desktop.auto_arrange {
            // Auto arrange and align to grid
            commands.push(PendingCommand::new(
                reg_dword(DESKTOP_BAG, "FFlags", 0x4020_0225),
                "Auto arrange desktop icons",
            ));
        }

        if let Some(wallpaper) = desktop.wallpaper.as_deref().filter(|w| !w.trim().is_empty()) {
            commands.push(PendingCommand::new(
                reg_sz(r"HKCU\Control Panel\Desktop", "Wallpaper", wallpaper),
                "Set wallpaper",
            ));
        }

        Ok(commands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autounattend_xml::Architecture;

    #[test]
    fn every_icon_is_written() {
        let mut config = ConfigModel::default();
        config.desktop.show_this_pc = true;
        let mut document = Document::with_root(Architecture::Amd64).unwrap();

        let commands = DesktopIcons
            .apply(&mut document, &config, &ModuleResults::new())
            .unwrap();

        assert_eq!(commands.len(), 5);
        assert!(commands[0]
            .command_line
            .contains("/v {20D04FE0-3AEA-1069-A2D8-08002B30309D} /t REG_DWORD /d 0 /f"));
        assert!(commands[1].command_line.ends_with("/d 1 /f"));
        assert!(commands[3].command_line.ends_with("/d 0 /f"));
    }

    #[test]
    fn icon_layout_and_wallpaper() {
        let mut config = ConfigModel::default();
        config.desktop.icon_size = IconSize::Large;
        config.desktop.auto_arrange = true;
        config.desktop.wallpaper = Some(String::from(r"C:\Windows\Web\Wallpaper\img0.jpg"));
        let mut document = Document::with_root(Architecture::Amd64).unwrap();

        let commands = DesktopIcons
            .apply(&mut document, &config, &ModuleResults::new())
            .unwrap();

        assert_eq!(commands.len(), 8);
        assert!(commands[5].command_line.contains("/v IconSize /t REG_DWORD /d 96"));
        assert!(commands[6].command_line.contains("/v FFlags /t REG_DWORD /d 1075839525"));
        assert!(commands[7].command_line.contains("/v Wallpaper /t REG_SZ"));
    }

    #[test]
    fn network_icon_follows_setting() {
        let network = |show: bool| {
            let mut config = ConfigModel::default();
            config.desktop.show_network = show;
            let mut document = Document::with_root(Architecture::Amd64).unwrap();
            DesktopIcons
                .apply(&mut document, &config, &ModuleResults::new())
                .unwrap()
                .into_iter()
                .find(|command| {
                    command
                        .command_line
                        .contains("/v {F02C1A0D-BE21-4350-88B0-7367FC96EF3C} ")
                })
                .unwrap()
                .command_line
        };

        assert!(network(true).ends_with("/d 0 /f"));
        assert!(network(false).ends_with("/d 1 /f"));
    }
}
