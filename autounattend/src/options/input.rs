use serde::{Deserialize, Serialize};

/// Lock key state at the logon screen.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct LockKeys {
    pub caps_lock: bool,
    pub num_lock: bool,
    pub scroll_lock: bool,
}

impl Default for LockKeys {
    fn default() -> Self {
        Self {
            caps_lock: false,
            num_lock: true,
            scroll_lock: false,
        }
    }
}

const NUM_LOCK: u32 = 2;
const CAPS_LOCK: u32 = 64;
const SCROLL_LOCK: u32 = 1;

impl LockKeys {
    /// `InitialKeyboardIndicators` bitmask.
    pub fn indicators(&self) -> u32 {
        let mut indicators = 0;
        if self.num_lock {
            indicators |= NUM_LOCK;
        }
        if self.caps_lock {
            indicators |= CAPS_LOCK;
        }
        if self.scroll_lock {
            indicators |= SCROLL_LOCK;
        }
        indicators
    }
}

/// Sticky Keys accessibility behavior.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct StickyKeys {
    pub enabled: bool,
    pub lock_modifier: bool,
    pub turn_off_on_two_keys: bool,
    pub show_indicator: bool,
    pub beep: bool,
}

impl Default for StickyKeys {
    fn default() -> Self {
        Self {
            enabled: false,
            lock_modifier: true,
            turn_off_on_two_keys: true,
            show_indicator: true,
            beep: true,
        }
    }
}

const SKF_STICKYKEYSON: u32 = 0x001;
const SKF_AVAILABLE: u32 = 0x002;
const SKF_HOTKEYACTIVE: u32 = 0x004;
const SKF_CONFIRMHOTKEY: u32 = 0x008;
const SKF_HOTKEYSOUND: u32 = 0x010;
const SKF_INDICATOR: u32 = 0x020;
const SKF_AUDIBLEFEEDBACK: u32 = 0x040;
const SKF_TRISTATE: u32 = 0x080;
const SKF_TWOKEYSOFF: u32 = 0x100;

impl StickyKeys {
    /// Value of `HKCU\Control Panel\Accessibility\StickyKeys\Flags`. When
    /// disabled this is the Windows default with the shift-five-times
    /// shortcut turned off.
    pub fn flags(&self) -> u32 {
        if !self.enabled {
            return 506;
        }

        let mut flags = SKF_STICKYKEYSON | SKF_AVAILABLE | SKF_HOTKEYACTIVE | SKF_CONFIRMHOTKEY | SKF_HOTKEYSOUND;
        if self.lock_modifier {
            flags |= SKF_TRISTATE;
        }
        if self.turn_off_on_two_keys {
            flags |= SKF_TWOKEYSOFF;
        }
        if self.show_indicator {
            flags |= SKF_INDICATOR;
        }
        if self.beep {
            flags |= SKF_AUDIBLEFEEDBACK;
        }
        flags
    }
}
