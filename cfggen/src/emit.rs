// Licensed under the Apache-2.0 license

//! Renderers for the generated artifacts.
//!
//! Everything here is pure: the renderers take the compiled results and
//! return strings, and the caller decides where they land on disk. The C
//! header is meant to be consumed by firmware build scripts; the text
//! report is for humans; the JSON report is for downstream tooling.

use anyhow::{anyhow, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;

use pic32_devcfg::schema::{self, Category, Device, Snapshot};
use pic32_devcfg::{CompileWarning, RegisterImage};
use pic32_pps::{tables, Direction, Encoding, PinAssignment};

/// Everything the renderers need about one compiled project.
pub struct ReportInputs<'a> {
    pub device: &'a Device,
    pub snapshot: &'a Snapshot,
    pub image: &'a RegisterImage,
    pub sysclk_mhz: f64,
    pub pbclk_mhz: f64,
    pub assignments: &'a [PinAssignment],
    pub encoding: &'a Encoding,
    pub warnings: &'a [CompileWarning],
}

//=============================================================================
// C header
//=============================================================================

/// Render the configuration words and pin selectors as a C header
/// fragment. Registers come out in DEVCFG0..DEVCFG3 order, selectors
/// sorted by register name.
pub fn c_header(inputs: &ReportInputs) -> String {
    let mut out = String::new();
    writeln!(
        out,
        "/* Device configuration for {}. Generated file, do not edit. */",
        inputs.device.name
    )
    .unwrap();
    writeln!(out).unwrap();
    for (register, value) in inputs.image.iter() {
        writeln!(
            out,
            "#define {}_VALUE 0x{:08X} /* boot flash 0x{:08X} */",
            register.name(),
            value,
            register.address()
        )
        .unwrap();
    }
    if !inputs.encoding.selectors.is_empty() {
        writeln!(out).unwrap();
        writeln!(out, "/* Peripheral pin select */").unwrap();
        for (register, value) in &inputs.encoding.selectors {
            writeln!(out, "#define {register}_VALUE 0x{value:08X}").unwrap();
        }
    }
    out
}

//=============================================================================
// Text report
//=============================================================================

/// Render the human-readable report: register words, clock estimates, the
/// full settings listing by category, the pin routing table, and any
/// diagnostics.
pub fn text_report(inputs: &ReportInputs) -> String {
    let mut out = String::new();
    writeln!(
        out,
        "{} (flash {}K, RAM {}K, boot {}K)",
        inputs.device.name,
        inputs.device.flash_kb,
        inputs.device.ram_kb,
        inputs.device.boot_flash_kb
    )
    .unwrap();
    writeln!(out).unwrap();

    for (register, _) in inputs.image.iter() {
        writeln!(
            out,
            "{} = {} @ 0x{:08X}",
            register.name(),
            inputs.image.hex_word(register),
            register.address()
        )
        .unwrap();
    }
    writeln!(out).unwrap();
    writeln!(out, "System clock estimate:     {:.3} MHz", inputs.sysclk_mhz).unwrap();
    writeln!(out, "Peripheral clock estimate: {:.3} MHz", inputs.pbclk_mhz).unwrap();

    for category in Category::ALL {
        writeln!(out).unwrap();
        writeln!(out, "{category}").unwrap();
        for setting in schema::settings_in(category) {
            let (label, suffix) = match inputs.snapshot.get(setting.index) {
                Some(label) => (label, ""),
                None => (setting.default, " (default)"),
            };
            writeln!(
                out,
                "  [{:2}] {:<10} {}: {}{}",
                setting.index, setting.mnemonic, setting.name, label, suffix
            )
            .unwrap();
        }
    }

    if !inputs.assignments.is_empty() {
        writeln!(out).unwrap();
        writeln!(out, "Pin select").unwrap();
        for assignment in inputs.assignments {
            let (arrow, register) = match assignment.direction {
                Direction::Input => (
                    "<-",
                    tables::input_signal(&assignment.signal)
                        .map(|s| s.register.to_string()),
                ),
                Direction::Output => ("->", Some(tables::output_register(&assignment.pin))),
            };
            let resolved = register
                .as_deref()
                .and_then(|r| inputs.encoding.selectors.get(r).map(|v| (r, *v)));
            match resolved {
                Some((register, value)) => writeln!(
                    out,
                    "  {:<6} {} {} {} ({register} = 0x{value:08X})",
                    assignment.direction.to_string(),
                    assignment.signal,
                    arrow,
                    assignment.pin
                )
                .unwrap(),
                None => writeln!(
                    out,
                    "  {:<6} {} {} {} (unroutable)",
                    assignment.direction.to_string(),
                    assignment.signal,
                    arrow,
                    assignment.pin
                )
                .unwrap(),
            }
        }
    }

    if !inputs.warnings.is_empty() {
        writeln!(out).unwrap();
        writeln!(out, "Warnings").unwrap();
        for warning in inputs.warnings {
            writeln!(out, "  {warning}").unwrap();
        }
    }
    if !inputs.encoding.conflicts.is_empty() {
        writeln!(out).unwrap();
        writeln!(out, "Conflicts").unwrap();
        for conflict in &inputs.encoding.conflicts {
            writeln!(out, "  {conflict}").unwrap();
        }
    }
    if !inputs.encoding.invalid.is_empty() {
        writeln!(out).unwrap();
        writeln!(out, "Invalid routings").unwrap();
        for invalid in &inputs.encoding.invalid {
            writeln!(out, "  {invalid}").unwrap();
        }
    }

    out
}

//=============================================================================
// JSON report
//=============================================================================

#[derive(Serialize)]
struct JsonReport<'a> {
    device: &'a str,
    registers: BTreeMap<&'static str, String>,
    sysclk_mhz: f64,
    pbclk_mhz: f64,
    settings: Vec<JsonSetting<'a>>,
    pps: &'a BTreeMap<String, u32>,
    warnings: Vec<String>,
    conflicts: Vec<JsonConflict<'a>>,
    invalid: Vec<String>,
}

#[derive(Serialize)]
struct JsonSetting<'a> {
    index: u32,
    mnemonic: &'static str,
    option: &'a str,
    is_default: bool,
}

#[derive(Serialize)]
struct JsonConflict<'a> {
    pin: &'a str,
    signals: &'a [String],
}

/// Render the machine-readable report.
pub fn json_report(inputs: &ReportInputs) -> Result<String> {
    let registers = inputs
        .image
        .iter()
        .map(|(register, _)| (register.name(), inputs.image.hex_word(register)))
        .collect();
    let settings = schema::SETTINGS
        .iter()
        .map(|setting| {
            let chosen = inputs.snapshot.get(setting.index);
            JsonSetting {
                index: setting.index,
                mnemonic: setting.mnemonic,
                option: chosen.unwrap_or(setting.default),
                is_default: chosen.is_none(),
            }
        })
        .collect();
    let report = JsonReport {
        device: inputs.device.name,
        registers,
        sysclk_mhz: inputs.sysclk_mhz,
        pbclk_mhz: inputs.pbclk_mhz,
        settings,
        pps: &inputs.encoding.selectors,
        warnings: inputs.warnings.iter().map(|w| w.to_string()).collect(),
        conflicts: inputs
            .encoding
            .conflicts
            .iter()
            .map(|c| JsonConflict {
                pin: &c.pin,
                signals: &c.signals,
            })
            .collect(),
        invalid: inputs.encoding.invalid.iter().map(|i| i.to_string()).collect(),
    };
    let mut text = serde_json::to_string_pretty(&report)?;
    text.push('\n');
    Ok(text)
}

//=============================================================================
// Catalog listing
//=============================================================================

/// Render the settings catalog and pin select tables, for the `list`
/// subcommand. `device` narrows the banner to one part.
pub fn catalog_listing(device: Option<&str>) -> Result<String> {
    let mut out = String::new();
    match device {
        Some(name) => {
            let device = schema::device(name)
                .ok_or_else(|| anyhow!("unsupported device {name:?}"))?;
            writeln!(
                out,
                "Catalog for {} (flash {}K, RAM {}K)",
                device.name, device.flash_kb, device.ram_kb
            )
            .unwrap();
        }
        None => writeln!(out, "Catalog for the PIC32MX1xx/2xx 28-pin parts").unwrap(),
    }

    for category in Category::ALL {
        writeln!(out).unwrap();
        writeln!(out, "{category}").unwrap();
        for setting in schema::settings_in(category) {
            writeln!(out, "  [{:2}] {} ({})", setting.index, setting.name, setting.mnemonic)
                .unwrap();
            for option in setting.options {
                let marker = if *option == setting.default { "*" } else { " " };
                writeln!(out, "      {marker} {option}").unwrap();
            }
        }
    }

    writeln!(out).unwrap();
    writeln!(out, "Pin select groups").unwrap();
    for group in tables::GROUPS {
        let pins: Vec<&str> = group.pins.iter().map(|(p, _)| *p).collect();
        writeln!(out, "  group {}: {}", group.id, pins.join(", ")).unwrap();
        let ins: Vec<&str> = tables::INPUT_SIGNALS
            .iter()
            .filter(|s| s.group == group.id)
            .map(|s| s.name)
            .collect();
        writeln!(out, "    inputs:  {}", ins.join(", ")).unwrap();
        let outs: Vec<&str> = group.outputs.iter().map(|(s, _)| *s).collect();
        writeln!(out, "    outputs: {}", outs.join(", ")).unwrap();
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pic32_devcfg::{clock, compile};
    use pic32_pps::encode;

    fn sample_inputs() -> (
        &'static Device,
        Snapshot,
        Vec<PinAssignment>,
    ) {
        let mut snapshot = Snapshot::new();
        snapshot.set(6, "3x Divider");
        snapshot.set(26, "Debugger is disabled");
        let assignments = vec![
            PinAssignment::new("U2RX", "RPB11", Direction::Input),
            PinAssignment::new("U2TX", "RPB14", Direction::Output),
        ];
        let device = schema::device("PIC32MX250F128B").unwrap();
        (device, snapshot, assignments)
    }

    #[test]
    fn test_c_header_contents() {
        let (device, snapshot, assignments) = sample_inputs();
        let compiled = compile(&snapshot);
        let encoding = encode(&assignments);
        let inputs = ReportInputs {
            device,
            snapshot: &snapshot,
            image: &compiled.image,
            sysclk_mhz: clock::estimate_sysclk(&snapshot),
            pbclk_mhz: clock::estimate_pbclk(&snapshot),
            assignments: &assignments,
            encoding: &encoding,
            warnings: &compiled.warnings,
        };
        let header = c_header(&inputs);
        assert!(header.contains("Device configuration for PIC32MX250F128B"));
        assert!(header.contains("#define DEVCFG2_VALUE 0xFFFFFFFA /* boot flash 0xBFC00BF4 */"));
        assert!(header.contains("#define DEVCFG0_VALUE 0xFFFFFFFC"));
        assert!(header.contains("#define U2RXR_VALUE 0x00000003"));
        assert!(header.contains("#define RPB14R_VALUE 0x00000001"));
    }

    #[test]
    fn test_text_report_contents() {
        let (device, snapshot, assignments) = sample_inputs();
        let compiled = compile(&snapshot);
        let encoding = encode(&assignments);
        let inputs = ReportInputs {
            device,
            snapshot: &snapshot,
            image: &compiled.image,
            sysclk_mhz: 40.0,
            pbclk_mhz: 40.0,
            assignments: &assignments,
            encoding: &encoding,
            warnings: &compiled.warnings,
        };
        let report = text_report(&inputs);
        assert!(report.contains("DEVCFG2 = 0xFFFFFFFA @ 0xBFC00BF4"));
        assert!(report.contains("System clock estimate:     40.000 MHz"));
        assert!(report.contains("System PLL Input Divider: 3x Divider"));
        assert!(report.contains("Oscillator Selection: Fast RC Oscillator with PLL (default)"));
        assert!(report.contains("U2RX <- RPB11 (U2RXR = 0x00000003)"));
        assert!(!report.contains("Warnings"));
    }

    #[test]
    fn test_json_report_round_trips() {
        let (device, snapshot, assignments) = sample_inputs();
        let compiled = compile(&snapshot);
        let encoding = encode(&assignments);
        let inputs = ReportInputs {
            device,
            snapshot: &snapshot,
            image: &compiled.image,
            sysclk_mhz: 40.0,
            pbclk_mhz: 40.0,
            assignments: &assignments,
            encoding: &encoding,
            warnings: &compiled.warnings,
        };
        let text = json_report(&inputs).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["device"], "PIC32MX250F128B");
        assert_eq!(value["registers"]["DEVCFG2"], "0xFFFFFFFA");
        assert_eq!(value["pps"]["U2RXR"], 3);
        assert_eq!(value["settings"].as_array().unwrap().len(), 29);
        assert_eq!(value["warnings"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_catalog_listing() {
        let listing = catalog_listing(None).unwrap();
        assert!(listing.contains("System PLL Input Divider (FPLLIDIV)"));
        assert!(listing.contains("* 2x Divider"));
        assert!(listing.contains("group 2: RPA1, RPB5, RPB1, RPB11, RPB8"));

        let listing = catalog_listing(Some("PIC32MX270F256B")).unwrap();
        assert!(listing.contains("Catalog for PIC32MX270F256B"));
        assert!(catalog_listing(Some("PIC32MZ1024")).is_err());
    }
}
