use serde::{Deserialize, Serialize};

/// Virtualization features.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct VmSupport {
    pub hyper_v: bool,
    pub wsl: bool,
    pub virtual_machine_platform: bool,
    pub sandbox: bool,
    pub containers: bool,
}

impl VmSupport {
    /// Optional feature names to enable, in a stable order.
    pub fn features(&self) -> Vec<&'static str> {
        [
            (self.hyper_v, "Microsoft-Hyper-V-All"),
            (self.wsl, "Microsoft-Windows-Subsystem-Linux"),
            (self.virtual_machine_platform, "VirtualMachinePlatform"),
            (self.sandbox, "Containers-DisposableClientVM"),
            (self.containers, "Containers"),
        ]
        .into_iter()
        .filter_map(|(enabled, feature)| enabled.then_some(feature))
        .collect()
    }
}

/// Legacy and optional Windows components.
#[derive(Clone, Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AdditionalComponents {
    pub dotnet35: bool,
    pub iis: bool,
    pub telnet_client: bool,
    pub tftp_client: bool,
    pub smb1: bool,
    pub powershell_v2: bool,
    pub direct_play: bool,
    pub print_to_pdf: bool,
    pub xps_viewer: bool,
    pub media_playback: bool,
    pub work_folders: bool,
}

impl AdditionalComponents {
    /// Optional feature names to enable, in a stable order.
    pub fn features(&self) -> Vec<&'static str> {
        [
            (self.dotnet35, &["NetFx3"][..]),
            (self.iis, &["IIS-WebServerRole", "IIS-WebServer"][..]),
            (self.telnet_client, &["TelnetClient"][..]),
            (self.tftp_client, &["TFTP"][..]),
            (self.smb1, &["SMB1Protocol"][..]),
            (self.powershell_v2, &["MicrosoftWindowsPowerShellV2"][..]),
            (self.direct_play, &["DirectPlay"][..]),
            (self.print_to_pdf, &["Printing-PrintToPDFServices-Features"][..]),
            (self.xps_viewer, &["Xps-Foundation-Xps-Viewer"][..]),
            (self.media_playback, &["MediaPlayback"][..]),
            (self.work_folders, &["WorkFolders-Client"][..]),
        ]
        .into_iter()
        .filter(|(enabled, _)| *enabled)
        .flat_map(|(_, features)| features.iter().copied())
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_names() {
        let vm = VmSupport {
            hyper_v: true,
            containers: true,
            ..Default::default()
        };
        assert_eq!(vm.features(), vec!["Microsoft-Hyper-V-All", "Containers"]);

        let components = AdditionalComponents {
            iis: true,
            smb1: true,
            ..Default::default()
        };
        assert_eq!(
            components.features(),
            vec!["IIS-WebServerRole", "IIS-WebServer", "SMB1Protocol"]
        );
    }
}
