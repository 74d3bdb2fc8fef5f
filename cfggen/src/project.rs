// Licensed under the Apache-2.0 license

//! The TOML project manifest: chosen options and pin routings.
//!
//! ```toml
//! device = "PIC32MX250F128B"
//!
//! [[setting]]
//! index = 6
//! option = "3x Divider"
//!
//! [[pin]]
//! signal = "U2RX"
//! pin = "RPB11"
//! direction = "input"
//! ```
//!
//! The manifest is the interchange format at this tool's boundary; anything
//! richer (editor state, XML scheme files) is converted to it upstream.

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use pic32_devcfg::schema::{self, Device, Snapshot, IDX_DEVICE};
use pic32_pps::{Direction, PinAssignment};

#[derive(Debug, Default, Deserialize)]
pub struct Manifest {
    /// Target part name. Defaults to the catalog's default device.
    pub device: Option<String>,
    #[serde(default, rename = "setting")]
    pub settings: Vec<SettingEntry>,
    #[serde(default, rename = "pin")]
    pub pins: Vec<PinEntry>,
}

#[derive(Debug, Deserialize)]
pub struct SettingEntry {
    pub index: u32,
    pub option: String,
}

#[derive(Debug, Deserialize)]
pub struct PinEntry {
    pub signal: String,
    pub pin: String,
    pub direction: String,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading manifest {}", path.display()))?;
        let manifest: Manifest = toml::from_str(&text)
            .with_context(|| format!("parsing manifest {}", path.display()))?;
        Ok(manifest)
    }

    /// Resolve the target device against the supported parts.
    pub fn resolve_device(&self) -> Result<&'static Device> {
        let name = match &self.device {
            Some(name) => name.as_str(),
            None => schema::setting(IDX_DEVICE)
                .map(|s| s.default)
                .ok_or_else(|| anyhow!("catalog has no target-device setting"))?,
        };
        schema::device(name).ok_or_else(|| anyhow!("unsupported device {name:?}"))
    }

    /// The chosen options as a snapshot. A repeated index keeps the last
    /// entry, matching how an editor would overwrite a choice.
    pub fn snapshot(&self) -> Snapshot {
        let mut snapshot = Snapshot::new();
        for entry in &self.settings {
            snapshot.set(entry.index, entry.option.clone());
        }
        snapshot
    }

    /// The pin routings, in manifest order.
    pub fn assignments(&self) -> Result<Vec<PinAssignment>> {
        self.pins
            .iter()
            .map(|entry| {
                let direction = match entry.direction.as_str() {
                    "input" => Direction::Input,
                    "output" => Direction::Output,
                    other => bail!(
                        "pin {}: direction must be \"input\" or \"output\", not {other:?}",
                        entry.pin
                    ),
                };
                Ok(PinAssignment::new(
                    entry.signal.clone(),
                    entry.pin.clone(),
                    direction,
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
device = "PIC32MX270F256B"

[[setting]]
index = 6
option = "3x Divider"

[[setting]]
index = 14
option = "WDT Enabled"

[[pin]]
signal = "U2RX"
pin = "RPB11"
direction = "input"

[[pin]]
signal = "U2TX"
pin = "RPB14"
direction = "output"
"#;

    #[test]
    fn test_parse_sample() {
        let manifest: Manifest = toml::from_str(SAMPLE).unwrap();
        assert_eq!(manifest.resolve_device().unwrap().name, "PIC32MX270F256B");

        let snapshot = manifest.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get(6), Some("3x Divider"));

        let assignments = manifest.assignments().unwrap();
        assert_eq!(assignments.len(), 2);
        assert_eq!(assignments[0].direction, Direction::Input);
        assert_eq!(assignments[1].pin, "RPB14");
    }

    #[test]
    fn test_empty_manifest() {
        let manifest: Manifest = toml::from_str("").unwrap();
        assert_eq!(manifest.resolve_device().unwrap().name, "PIC32MX250F128B");
        assert!(manifest.snapshot().is_empty());
        assert!(manifest.assignments().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_device_rejected() {
        let manifest: Manifest = toml::from_str(r#"device = "PIC32MZ2048EFH064""#).unwrap();
        assert!(manifest.resolve_device().is_err());
    }

    #[test]
    fn test_bad_direction_rejected() {
        let text = r#"
[[pin]]
signal = "U2RX"
pin = "RPB11"
direction = "both"
"#;
        let manifest: Manifest = toml::from_str(text).unwrap();
        assert!(manifest.assignments().is_err());
    }

    #[test]
    fn test_repeated_index_keeps_last() {
        let text = r#"
[[setting]]
index = 6
option = "2x Divider"

[[setting]]
index = 6
option = "4x Divider"
"#;
        let manifest: Manifest = toml::from_str(text).unwrap();
        assert_eq!(manifest.snapshot().get(6), Some("4x Divider"));
    }
}
