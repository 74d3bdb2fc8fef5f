// Licensed under the Apache-2.0 license

//! Static Peripheral Pin Select catalogs for the 28-pin parts.
//!
//! Each multiplexer group owns a disjoint set of remappable pins. The per
//! group pin list doubles as the input selector table: routing a signal to
//! a pin writes that pin's code into the signal's selection register. The
//! per group output list gives the code a pin's own register takes to drive
//! a signal. SDO1/SDO2 legitimately appear in two groups; input signal
//! names are unique across the whole table.
//!
//! Selector fields are 4 bits wide on this family, so every code must fit
//! in `0..16`; [`validate_tables`] checks that along with the uniqueness
//! rules once at startup.

use anyhow::{bail, Result};
use std::collections::BTreeSet;

/// One multiplexer group: its pins with their input selector codes, and
/// the output signals its pins can drive with their output codes.
#[derive(Clone, Copy, Debug)]
pub struct MuxGroup {
    pub id: u8,
    /// `(pin, code)`: the code an input signal's selection register takes
    /// to read from this pin.
    pub pins: &'static [(&'static str, u32)],
    /// `(signal, code)`: the code a pin's own register takes to drive this
    /// signal.
    pub outputs: &'static [(&'static str, u32)],
}

impl MuxGroup {
    pub fn has_pin(&self, pin: &str) -> bool {
        self.pins.iter().any(|(p, _)| *p == pin)
    }

    /// Input selector code for `pin`, if the pin belongs to this group.
    pub fn pin_code(&self, pin: &str) -> Option<u32> {
        self.pins.iter().find(|(p, _)| *p == pin).map(|(_, c)| *c)
    }

    /// Output code for `signal`, if this group's pins can drive it.
    pub fn output_code(&self, signal: &str) -> Option<u32> {
        self.outputs
            .iter()
            .find(|(s, _)| *s == signal)
            .map(|(_, c)| *c)
    }
}

/// A remappable peripheral input and the register that selects its source
/// pin.
#[derive(Clone, Copy, Debug)]
pub struct InputSignal {
    pub name: &'static str,
    pub group: u8,
    pub register: &'static str,
}

/// The four multiplexer groups.
pub static GROUPS: &[MuxGroup] = &[
    MuxGroup {
        id: 1,
        pins: &[("RPA0", 0), ("RPB3", 1), ("RPB4", 2), ("RPB15", 3), ("RPB7", 4)],
        outputs: &[
            ("U1TX", 1),
            ("U2RTS", 2),
            ("SS1", 3),
            ("OC1", 5),
            ("C2OUT", 7),
        ],
    },
    MuxGroup {
        id: 2,
        pins: &[("RPA1", 0), ("RPB5", 1), ("RPB1", 2), ("RPB11", 3), ("RPB8", 4)],
        outputs: &[("SDO1", 3), ("SDO2", 4), ("OC2", 5), ("C3OUT", 7)],
    },
    MuxGroup {
        id: 3,
        pins: &[("RPA2", 0), ("RPB6", 1), ("RPA4", 2), ("RPB13", 3), ("RPB2", 4)],
        outputs: &[
            ("SDO1", 3),
            ("SDO2", 4),
            ("OC4", 5),
            ("OC5", 6),
            ("REFCLKO", 7),
        ],
    },
    MuxGroup {
        id: 4,
        pins: &[("RPA3", 0), ("RPB14", 1), ("RPB0", 2), ("RPB10", 3), ("RPB9", 4)],
        outputs: &[
            ("U2TX", 1),
            ("U1RTS", 2),
            ("SS2", 3),
            ("OC3", 5),
            ("C1OUT", 7),
        ],
    },
];

/// Every remappable input, with its selection register.
pub static INPUT_SIGNALS: &[InputSignal] = &[
    InputSignal { name: "INT4", group: 1, register: "INT4R" },
    InputSignal { name: "T2CK", group: 1, register: "T2CKR" },
    InputSignal { name: "IC4", group: 1, register: "IC4R" },
    InputSignal { name: "SS1", group: 1, register: "SS1R" },
    InputSignal { name: "REFCLKI", group: 1, register: "REFCLKIR" },
    InputSignal { name: "INT3", group: 2, register: "INT3R" },
    InputSignal { name: "T3CK", group: 2, register: "T3CKR" },
    InputSignal { name: "IC3", group: 2, register: "IC3R" },
    InputSignal { name: "U1CTS", group: 2, register: "U1CTSR" },
    InputSignal { name: "U2RX", group: 2, register: "U2RXR" },
    InputSignal { name: "SDI1", group: 2, register: "SDI1R" },
    InputSignal { name: "INT2", group: 3, register: "INT2R" },
    InputSignal { name: "T4CK", group: 3, register: "T4CKR" },
    InputSignal { name: "IC1", group: 3, register: "IC1R" },
    InputSignal { name: "IC5", group: 3, register: "IC5R" },
    InputSignal { name: "U1RX", group: 3, register: "U1RXR" },
    InputSignal { name: "U2CTS", group: 3, register: "U2CTSR" },
    InputSignal { name: "SDI2", group: 3, register: "SDI2R" },
    InputSignal { name: "OCFB", group: 3, register: "OCFBR" },
    InputSignal { name: "INT1", group: 4, register: "INT1R" },
    InputSignal { name: "T5CK", group: 4, register: "T5CKR" },
    InputSignal { name: "IC2", group: 4, register: "IC2R" },
    InputSignal { name: "SS2", group: 4, register: "SS2R" },
    InputSignal { name: "OCFA", group: 4, register: "OCFAR" },
];

/// Look up a group by id.
pub fn group(id: u8) -> Option<&'static MuxGroup> {
    GROUPS.iter().find(|g| g.id == id)
}

/// The group a physical pin belongs to, if it is remappable at all.
pub fn group_of_pin(pin: &str) -> Option<&'static MuxGroup> {
    GROUPS.iter().find(|g| g.has_pin(pin))
}

/// Look up a remappable input by signal name.
pub fn input_signal(name: &str) -> Option<&'static InputSignal> {
    INPUT_SIGNALS.iter().find(|s| s.name == name)
}

/// Name of the output selection register owned by `pin`.
pub fn output_register(pin: &str) -> String {
    format!("{pin}R")
}

// Selector fields are 4 bits wide.
const SELECTOR_LIMIT: u32 = 16;

/// Check a catalog for internal consistency. Split from [`validate_tables`]
/// so synthetic tables can be checked in tests.
pub fn validate_catalog(groups: &[MuxGroup], signals: &[InputSignal]) -> Result<()> {
    let mut group_ids = BTreeSet::new();
    let mut all_pins = BTreeSet::new();
    for g in groups {
        if !group_ids.insert(g.id) {
            bail!("duplicate multiplexer group {}", g.id);
        }
        let mut codes = BTreeSet::new();
        for (pin, code) in g.pins {
            if !all_pins.insert(*pin) {
                bail!("pin {pin} appears in more than one group");
            }
            if !codes.insert(*code) {
                bail!("group {}: duplicate pin code {code}", g.id);
            }
            if *code >= SELECTOR_LIMIT {
                bail!("group {}: pin code {code} does not fit the selector", g.id);
            }
        }
        let mut names = BTreeSet::new();
        let mut codes = BTreeSet::new();
        for (signal, code) in g.outputs {
            if !names.insert(*signal) {
                bail!("group {}: duplicate output signal {signal}", g.id);
            }
            if !codes.insert(*code) {
                bail!("group {}: duplicate output code {code}", g.id);
            }
            if *code >= SELECTOR_LIMIT {
                bail!(
                    "group {}: output code {code} does not fit the selector",
                    g.id
                );
            }
        }
    }
    let mut names = BTreeSet::new();
    let mut registers = BTreeSet::new();
    for s in signals {
        if !names.insert(s.name) {
            bail!("input signal {} declared twice", s.name);
        }
        if s.register.is_empty() || !registers.insert(s.register) {
            bail!("input signal {} has a bad selection register", s.name);
        }
        if !group_ids.contains(&s.group) {
            bail!("input signal {} names unknown group {}", s.name, s.group);
        }
    }
    Ok(())
}

/// Validate the shipped tables. Call once at startup.
pub fn validate_tables() -> Result<()> {
    validate_catalog(GROUPS, INPUT_SIGNALS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shipped_tables_validate() {
        validate_tables().unwrap();
    }

    #[test]
    fn test_pin_lookup() {
        assert_eq!(group_of_pin("RPB11").map(|g| g.id), Some(2));
        assert_eq!(group_of_pin("RPB14").map(|g| g.id), Some(4));
        assert!(group_of_pin("RPC9").is_none());

        let g2 = group(2).unwrap();
        assert_eq!(g2.pin_code("RPB11"), Some(3));
        assert_eq!(g2.pin_code("RPA0"), None);
    }

    #[test]
    fn test_output_codes() {
        assert_eq!(group(1).unwrap().output_code("U1TX"), Some(1));
        assert_eq!(group(4).unwrap().output_code("C1OUT"), Some(7));
        assert_eq!(group(4).unwrap().output_code("U1TX"), None);
        // SDO1 is offered by two groups.
        assert_eq!(group(2).unwrap().output_code("SDO1"), Some(3));
        assert_eq!(group(3).unwrap().output_code("SDO1"), Some(3));
    }

    #[test]
    fn test_input_signal_lookup() {
        let u2rx = input_signal("U2RX").unwrap();
        assert_eq!(u2rx.group, 2);
        assert_eq!(u2rx.register, "U2RXR");
        assert!(input_signal("U9RX").is_none());
    }

    #[test]
    fn test_output_register_naming() {
        assert_eq!(output_register("RPB14"), "RPB14R");
    }

    #[test]
    fn test_duplicate_pin_rejected() {
        let groups = [
            MuxGroup { id: 1, pins: &[("RPA0", 0)], outputs: &[] },
            MuxGroup { id: 2, pins: &[("RPA0", 0)], outputs: &[] },
        ];
        assert!(validate_catalog(&groups, &[]).is_err());
    }

    #[test]
    fn test_duplicate_group_rejected() {
        let groups = [
            MuxGroup { id: 1, pins: &[("RPA0", 0)], outputs: &[] },
            MuxGroup { id: 1, pins: &[("RPA1", 0)], outputs: &[] },
        ];
        assert!(validate_catalog(&groups, &[]).is_err());
    }

    #[test]
    fn test_oversized_code_rejected() {
        let groups = [MuxGroup { id: 1, pins: &[("RPA0", 16)], outputs: &[] }];
        assert!(validate_catalog(&groups, &[]).is_err());
        let groups = [MuxGroup { id: 1, pins: &[], outputs: &[("U1TX", 16)] }];
        assert!(validate_catalog(&groups, &[]).is_err());
    }

    #[test]
    fn test_bad_input_signal_rejected() {
        let groups = [MuxGroup { id: 1, pins: &[("RPA0", 0)], outputs: &[] }];
        let twice = [
            InputSignal { name: "INT4", group: 1, register: "INT4R" },
            InputSignal { name: "INT4", group: 1, register: "INT4R" },
        ];
        assert!(validate_catalog(&groups, &twice).is_err());

        let unknown_group = [InputSignal { name: "INT4", group: 9, register: "INT4R" }];
        assert!(validate_catalog(&groups, &unknown_group).is_err());
    }
}
