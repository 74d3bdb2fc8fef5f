// Licensed under the Apache-2.0 license

//! Settings catalog for the PIC32MX1xx/2xx 28-pin family.
//!
//! Each configurable device behavior is a [`Setting`]: a stable integer
//! index, a set of mutually exclusive option labels, and a default. The
//! index is the only identifier used across the crate; option text is never
//! used as a key between components. The catalog is immutable reference
//! data, defined once here and consumed by the field map and compiler.
//!
//! Three entries (the computed clock displays and the target device) are
//! informational: they have no register field behind them and the compiler
//! skips them silently.

use std::collections::BTreeMap;

/// Setting index for the oscillator source selection (FNOSC).
pub const IDX_OSC_SOURCE: u32 = 0;
/// Setting index for the peripheral bus clock divisor (FPBDIV).
pub const IDX_PB_DIV: u32 = 5;
/// Setting index for the system PLL input divider (FPLLIDIV).
pub const IDX_PLL_IDIV: u32 = 6;
/// Setting index for the system PLL multiplier (FPLLMUL).
pub const IDX_PLL_MUL: u32 = 7;
/// Setting index for the system PLL output divider (FPLLODIV).
pub const IDX_PLL_ODIV: u32 = 8;
/// Setting index for the informational target-device entry.
pub const IDX_DEVICE: u32 = 28;

//=============================================================================
// Setting - one catalog entry
//=============================================================================

/// Display grouping for a setting. Purely cosmetic; no register semantics.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Category {
    Oscillator,
    Clock,
    Watchdog,
    CodeProtect,
    Peripheral,
    Debug,
    Info,
}

impl Category {
    /// All categories in report order.
    pub const ALL: [Category; 7] = [
        Category::Oscillator,
        Category::Clock,
        Category::Watchdog,
        Category::CodeProtect,
        Category::Peripheral,
        Category::Debug,
        Category::Info,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Oscillator => "Oscillator",
            Category::Clock => "Clock",
            Category::Watchdog => "Watchdog",
            Category::CodeProtect => "Code Protect",
            Category::Peripheral => "Peripheral",
            Category::Debug => "Debug",
            Category::Info => "Info",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One entry of the settings catalog.
///
/// `options` is an ordered set of distinct labels; `default` is always one
/// of them. When a setting has a field mapping, the mapping's encode values
/// are parallel to `options` (same length, same order).
#[derive(Clone, Copy, Debug)]
pub struct Setting {
    pub index: u32,
    /// Datasheet field name, e.g. `FNOSC`.
    pub mnemonic: &'static str,
    /// Human-readable description for reports.
    pub name: &'static str,
    pub category: Category,
    pub options: &'static [&'static str],
    pub default: &'static str,
}

impl Setting {
    /// True if `label` is one of this setting's options.
    pub fn has_option(&self, label: &str) -> bool {
        self.options.iter().any(|o| *o == label)
    }

    /// Position of `label` in the option list.
    pub fn option_position(&self, label: &str) -> Option<usize> {
        self.options.iter().position(|o| *o == label)
    }
}

//=============================================================================
// The catalog
//=============================================================================

const DIVIDER_OPTIONS: &[&str] = &[
    "1x Divider",
    "2x Divider",
    "3x Divider",
    "4x Divider",
    "5x Divider",
    "6x Divider",
    "10x Divider",
    "12x Divider",
];

const RECONFIG_OPTIONS: &[&str] = &[
    "Allow Multiple Reconfigurations",
    "Allow Only One Reconfiguration",
];

/// The full settings catalog, ordered by index.
pub static SETTINGS: &[Setting] = &[
    Setting {
        index: 0,
        mnemonic: "FNOSC",
        name: "Oscillator Selection",
        category: Category::Oscillator,
        options: &[
            "Fast RC Oscillator (FRC)",
            "Fast RC Oscillator with PLL",
            "Primary Oscillator (XT, HS, EC)",
            "Primary Oscillator with PLL",
            "Low Power Secondary Oscillator",
            "Low Power RC Oscillator (LPRC)",
            "Fast RC Oscillator / 16",
            "Fast RC Oscillator with Divide-by-N",
        ],
        default: "Fast RC Oscillator with PLL",
    },
    Setting {
        index: 1,
        mnemonic: "FSOSCEN",
        name: "Secondary Oscillator Enable",
        category: Category::Oscillator,
        options: &["Disabled", "Enabled"],
        default: "Disabled",
    },
    Setting {
        index: 2,
        mnemonic: "IESO",
        name: "Internal/External Switch Over",
        category: Category::Oscillator,
        options: &["Disabled", "Enabled"],
        default: "Disabled",
    },
    Setting {
        index: 3,
        mnemonic: "POSCMOD",
        name: "Primary Oscillator Configuration",
        category: Category::Oscillator,
        options: &[
            "External Clock (EC)",
            "XT Oscillator",
            "HS Oscillator",
            "Primary Oscillator Disabled",
        ],
        default: "Primary Oscillator Disabled",
    },
    Setting {
        index: 4,
        mnemonic: "OSCIOFNC",
        name: "CLKO Output Signal on the OSCO Pin",
        category: Category::Oscillator,
        options: &["CLKO Output Enabled", "CLKO Output Disabled"],
        default: "CLKO Output Disabled",
    },
    Setting {
        index: 5,
        mnemonic: "FPBDIV",
        name: "Peripheral Clock Divisor",
        category: Category::Clock,
        options: &[
            "Pb_Clk is Sys_Clk / 1",
            "Pb_Clk is Sys_Clk / 2",
            "Pb_Clk is Sys_Clk / 4",
            "Pb_Clk is Sys_Clk / 8",
        ],
        default: "Pb_Clk is Sys_Clk / 1",
    },
    Setting {
        index: 6,
        mnemonic: "FPLLIDIV",
        name: "System PLL Input Divider",
        category: Category::Clock,
        options: DIVIDER_OPTIONS,
        default: "2x Divider",
    },
    Setting {
        index: 7,
        mnemonic: "FPLLMUL",
        name: "System PLL Multiplier",
        category: Category::Clock,
        options: &[
            "15x Multiplier",
            "16x Multiplier",
            "17x Multiplier",
            "18x Multiplier",
            "19x Multiplier",
            "20x Multiplier",
            "21x Multiplier",
            "24x Multiplier",
        ],
        default: "20x Multiplier",
    },
    Setting {
        index: 8,
        mnemonic: "FPLLODIV",
        name: "System PLL Output Clock Divider",
        category: Category::Clock,
        options: &[
            "PLL Divide by 1",
            "PLL Divide by 2",
            "PLL Divide by 4",
            "PLL Divide by 8",
            "PLL Divide by 16",
            "PLL Divide by 32",
            "PLL Divide by 64",
            "PLL Divide by 256",
        ],
        default: "PLL Divide by 2",
    },
    Setting {
        index: 9,
        mnemonic: "UPLLIDIV",
        name: "USB PLL Input Divider",
        category: Category::Clock,
        options: DIVIDER_OPTIONS,
        default: "2x Divider",
    },
    Setting {
        index: 10,
        mnemonic: "UPLLEN",
        name: "USB PLL Enable",
        category: Category::Clock,
        options: &["Enabled", "Disabled and Bypassed"],
        default: "Disabled and Bypassed",
    },
    Setting {
        index: 11,
        mnemonic: "FCKSM",
        name: "Clock Switching and Monitor Selection",
        category: Category::Clock,
        options: &[
            "Clock Switching Enabled, Fail-Safe Clock Monitoring Enabled",
            "Clock Switching Enabled, Fail-Safe Clock Monitoring Disabled",
            "Clock Switching Disabled, Fail-Safe Clock Monitoring Disabled",
        ],
        default: "Clock Switching Disabled, Fail-Safe Clock Monitoring Disabled",
    },
    Setting {
        index: 12,
        mnemonic: "WDTPS",
        name: "Watchdog Timer Postscaler",
        category: Category::Watchdog,
        options: &[
            "1:1",
            "1:2",
            "1:4",
            "1:8",
            "1:16",
            "1:32",
            "1:64",
            "1:128",
            "1:256",
            "1:512",
            "1:1024",
            "1:2048",
            "1:4096",
            "1:8192",
            "1:16384",
            "1:32768",
            "1:65536",
            "1:131072",
            "1:262144",
            "1:524288",
            "1:1048576",
        ],
        default: "1:1048576",
    },
    Setting {
        index: 13,
        mnemonic: "WINDIS",
        name: "Watchdog Timer Window Enable",
        category: Category::Watchdog,
        options: &[
            "Watchdog Timer is in Window Mode",
            "Watchdog Timer is in Non-Window Mode",
        ],
        default: "Watchdog Timer is in Non-Window Mode",
    },
    Setting {
        index: 14,
        mnemonic: "FWDTEN",
        name: "Watchdog Timer Enable",
        category: Category::Watchdog,
        options: &["WDT Disabled (SWDTEN Bit Controls)", "WDT Enabled"],
        default: "WDT Disabled (SWDTEN Bit Controls)",
    },
    Setting {
        index: 15,
        mnemonic: "FWDTWINSZ",
        name: "Watchdog Timer Window Size",
        category: Category::Watchdog,
        options: &[
            "Window Size is 75%",
            "Window Size is 50%",
            "Window Size is 37.5%",
            "Window Size is 25%",
        ],
        default: "Window Size is 25%",
    },
    Setting {
        index: 16,
        mnemonic: "PMDL1WAY",
        name: "Peripheral Module Disable Configuration",
        category: Category::Peripheral,
        options: RECONFIG_OPTIONS,
        default: "Allow Multiple Reconfigurations",
    },
    Setting {
        index: 17,
        mnemonic: "IOL1WAY",
        name: "Peripheral Pin Select Configuration",
        category: Category::Peripheral,
        options: RECONFIG_OPTIONS,
        default: "Allow Multiple Reconfigurations",
    },
    Setting {
        index: 18,
        mnemonic: "FUSBIDIO",
        name: "USB USID Selection",
        category: Category::Peripheral,
        options: &["Controlled by Port Function", "Controlled by the USB Module"],
        default: "Controlled by Port Function",
    },
    Setting {
        index: 19,
        mnemonic: "FVBUSONIO",
        name: "USB VBUS ON Selection",
        category: Category::Peripheral,
        options: &["Controlled by Port Function", "Controlled by USB Module"],
        default: "Controlled by Port Function",
    },
    Setting {
        index: 20,
        mnemonic: "PWP",
        name: "Program Flash Write Protect",
        category: Category::CodeProtect,
        options: &["Disabled", "First 4K", "First 8K", "First 16K", "First 32K"],
        default: "Disabled",
    },
    Setting {
        index: 21,
        mnemonic: "BWP",
        name: "Boot Flash Write Protect",
        category: Category::CodeProtect,
        options: &["Protection Disabled", "Protection Enabled"],
        default: "Protection Disabled",
    },
    Setting {
        index: 22,
        mnemonic: "CP",
        name: "Code Protect",
        category: Category::CodeProtect,
        options: &["Protection Disabled", "Protection Enabled"],
        default: "Protection Disabled",
    },
    Setting {
        index: 23,
        mnemonic: "ICESEL",
        name: "ICE/ICD Comm Channel Select",
        category: Category::Debug,
        options: &[
            "Communicate on PGEC1/PGED1",
            "Communicate on PGEC2/PGED2",
            "Communicate on PGEC3/PGED3",
        ],
        default: "Communicate on PGEC1/PGED1",
    },
    Setting {
        index: 24,
        mnemonic: "SYSCLK",
        name: "Computed System Clock",
        category: Category::Info,
        options: &["Computed"],
        default: "Computed",
    },
    Setting {
        index: 25,
        mnemonic: "PBCLK",
        name: "Computed Peripheral Bus Clock",
        category: Category::Info,
        options: &["Computed"],
        default: "Computed",
    },
    Setting {
        index: 26,
        mnemonic: "DEBUG",
        name: "Background Debugger Enable",
        category: Category::Debug,
        options: &["Debugger is disabled", "Debugger is enabled"],
        default: "Debugger is disabled",
    },
    Setting {
        index: 27,
        mnemonic: "JTAGEN",
        name: "JTAG Enable",
        category: Category::Debug,
        options: &["JTAG Port Disabled", "JTAG Port Enabled"],
        default: "JTAG Port Disabled",
    },
    Setting {
        index: 28,
        mnemonic: "DEVICE",
        name: "Target Device",
        category: Category::Info,
        options: &[
            "PIC32MX110F016B",
            "PIC32MX210F016B",
            "PIC32MX250F128B",
            "PIC32MX270F256B",
        ],
        default: "PIC32MX250F128B",
    },
];

/// Look up a setting by index.
pub fn setting(index: u32) -> Option<&'static Setting> {
    SETTINGS.iter().find(|s| s.index == index)
}

/// Settings belonging to `category`, in index order.
pub fn settings_in(category: Category) -> impl Iterator<Item = &'static Setting> {
    SETTINGS.iter().filter(move |s| s.category == category)
}

//=============================================================================
// Device - supported parts
//=============================================================================

/// One supported part. Memory sizes are echoed into reports; no register
/// bits depend on the device choice.
#[derive(Clone, Copy, Debug)]
pub struct Device {
    pub name: &'static str,
    pub flash_kb: u32,
    pub ram_kb: u32,
    pub boot_flash_kb: u32,
}

/// The supported 28-pin parts. Names match the options of the target-device
/// setting (index 28).
pub static DEVICES: &[Device] = &[
    Device {
        name: "PIC32MX110F016B",
        flash_kb: 16,
        ram_kb: 4,
        boot_flash_kb: 3,
    },
    Device {
        name: "PIC32MX210F016B",
        flash_kb: 16,
        ram_kb: 4,
        boot_flash_kb: 3,
    },
    Device {
        name: "PIC32MX250F128B",
        flash_kb: 128,
        ram_kb: 32,
        boot_flash_kb: 3,
    },
    Device {
        name: "PIC32MX270F256B",
        flash_kb: 256,
        ram_kb: 64,
        boot_flash_kb: 3,
    },
];

/// Look up a device by full part name.
pub fn device(name: &str) -> Option<&'static Device> {
    DEVICES.iter().find(|d| d.name == name)
}

//=============================================================================
// Snapshot - the caller's chosen options
//=============================================================================

/// A point-in-time `setting index -> chosen label` mapping.
///
/// Snapshots are owned by the caller (an editor, a project manifest) and
/// need not be total: the compiler only processes entries actually present,
/// and higher layers fall back to each setting's default when reading an
/// absent index.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Snapshot {
    chosen: BTreeMap<u32, String>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// A snapshot holding every catalog setting at its default label.
    pub fn with_defaults() -> Self {
        let mut snapshot = Self::new();
        for setting in SETTINGS {
            snapshot.set(setting.index, setting.default);
        }
        snapshot
    }

    pub fn set(&mut self, index: u32, label: impl Into<String>) {
        self.chosen.insert(index, label.into());
    }

    pub fn get(&self, index: u32) -> Option<&str> {
        self.chosen.get(&index).map(String::as_str)
    }

    /// The chosen label for `index`, or the setting's default if the
    /// snapshot has no entry. `None` only for indices outside the catalog.
    pub fn get_or_default(&self, index: u32) -> Option<&str> {
        match self.get(index) {
            Some(label) => Some(label),
            None => setting(index).map(|s| s.default),
        }
    }

    /// Entries in ascending index order.
    pub fn entries(&self) -> impl Iterator<Item = (u32, &str)> {
        self.chosen.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.chosen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chosen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_unique_and_ordered() {
        for pair in SETTINGS.windows(2) {
            assert!(pair[0].index < pair[1].index);
        }
    }

    #[test]
    fn test_defaults_are_options() {
        for setting in SETTINGS {
            assert!(
                setting.has_option(setting.default),
                "{} default not in options",
                setting.mnemonic
            );
        }
    }

    #[test]
    fn test_options_distinct() {
        for setting in SETTINGS {
            for (i, a) in setting.options.iter().enumerate() {
                for b in &setting.options[i + 1..] {
                    assert_ne!(a, b, "{} repeats an option", setting.mnemonic);
                }
            }
        }
    }

    #[test]
    fn test_lookup_by_index() {
        assert_eq!(setting(6).map(|s| s.mnemonic), Some("FPLLIDIV"));
        assert_eq!(setting(27).map(|s| s.mnemonic), Some("JTAGEN"));
        assert!(setting(99).is_none());
    }

    #[test]
    fn test_category_partition() {
        let total: usize = Category::ALL
            .iter()
            .map(|c| settings_in(*c).count())
            .sum();
        assert_eq!(total, SETTINGS.len());
    }

    #[test]
    fn test_device_options_match_catalog() {
        let target = setting(IDX_DEVICE).unwrap();
        assert_eq!(target.options.len(), DEVICES.len());
        for name in target.options {
            assert!(device(name).is_some(), "no device record for {name}");
        }
    }

    #[test]
    fn test_snapshot_defaults_cover_catalog() {
        let snapshot = Snapshot::with_defaults();
        assert_eq!(snapshot.len(), SETTINGS.len());
        for setting in SETTINGS {
            assert_eq!(snapshot.get(setting.index), Some(setting.default));
        }
    }

    #[test]
    fn test_snapshot_get_or_default() {
        let mut snapshot = Snapshot::new();
        assert_eq!(snapshot.get_or_default(6), Some("2x Divider"));
        snapshot.set(6, "3x Divider");
        assert_eq!(snapshot.get_or_default(6), Some("3x Divider"));
        assert!(snapshot.get_or_default(99).is_none());
    }
}
