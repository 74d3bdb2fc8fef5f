// Licensed under the Apache-2.0 license

//! Field map: which DEVCFG register and bit range each setting encodes to.
//!
//! A [`FieldMapping`] ties a setting index to a contiguous bit field of one
//! of the four configuration words. The encode values are parallel to the
//! setting's option list in [`crate::schema`]: option `k` encodes as
//! `values[k]`. Keeping the labels in one place and the values in the other
//! avoids the two tables drifting apart; [`validate_tables`] checks the
//! pairing (and the bit-range geometry) once at startup.
//!
//! Bit ranges within one register never overlap. That is a property of the
//! tables themselves, enforced here by validation, not rechecked by the
//! compiler on every call.

use anyhow::{bail, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use crate::schema::{self, Category};

//=============================================================================
// RegisterId - the four configuration words
//=============================================================================

/// One of the four configuration words in boot flash.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum RegisterId {
    Devcfg0 = 0,
    Devcfg1 = 1,
    Devcfg2 = 2,
    Devcfg3 = 3,
}

impl RegisterId {
    /// All registers, in DEVCFG0..DEVCFG3 order.
    pub const ALL: [RegisterId; 4] = [
        RegisterId::Devcfg0,
        RegisterId::Devcfg1,
        RegisterId::Devcfg2,
        RegisterId::Devcfg3,
    ];

    pub fn name(self) -> &'static str {
        match self {
            RegisterId::Devcfg0 => "DEVCFG0",
            RegisterId::Devcfg1 => "DEVCFG1",
            RegisterId::Devcfg2 => "DEVCFG2",
            RegisterId::Devcfg3 => "DEVCFG3",
        }
    }

    /// Boot flash address of the word (KSEG1 alias).
    pub fn address(self) -> u32 {
        match self {
            RegisterId::Devcfg0 => 0xBFC0_0BFC,
            RegisterId::Devcfg1 => 0xBFC0_0BF8,
            RegisterId::Devcfg2 => 0xBFC0_0BF4,
            RegisterId::Devcfg3 => 0xBFC0_0BF0,
        }
    }
}

impl std::fmt::Display for RegisterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

//=============================================================================
// FieldMapping
//=============================================================================

/// Bit-field descriptor for one setting.
#[derive(Clone, Copy, Debug)]
pub struct FieldMapping {
    pub setting_index: u32,
    pub register: RegisterId,
    pub bit_start: u32,
    pub bit_width: u32,
    /// Encode values, parallel to the setting's option list.
    pub values: &'static [u32],
}

impl FieldMapping {
    /// Bit mask covering `[bit_start, bit_start + bit_width)`.
    pub fn mask(&self) -> u32 {
        let field = ((1u64 << self.bit_width) - 1) as u32;
        field << self.bit_start
    }

    /// The integer `label` encodes, if `label` is an option of this
    /// setting.
    pub fn value_of(&self, label: &str) -> Option<u32> {
        let setting = schema::setting(self.setting_index)?;
        let position = setting.option_position(label)?;
        self.values.get(position).copied()
    }
}

const BIT_OPTIONS: &[u32] = &[0, 1];
const OCTAL_OPTIONS: &[u32] = &[0, 1, 2, 3, 4, 5, 6, 7];
const QUAD_OPTIONS: &[u32] = &[0, 1, 2, 3];

/// Every mapped setting, ordered by setting index. Indices 24, 25 and 28
/// are informational and deliberately absent.
pub static MAPPINGS: &[FieldMapping] = &[
    FieldMapping {
        setting_index: 0, // FNOSC
        register: RegisterId::Devcfg1,
        bit_start: 0,
        bit_width: 3,
        values: OCTAL_OPTIONS,
    },
    FieldMapping {
        setting_index: 1, // FSOSCEN
        register: RegisterId::Devcfg1,
        bit_start: 5,
        bit_width: 1,
        values: BIT_OPTIONS,
    },
    FieldMapping {
        setting_index: 2, // IESO
        register: RegisterId::Devcfg1,
        bit_start: 7,
        bit_width: 1,
        values: BIT_OPTIONS,
    },
    FieldMapping {
        setting_index: 3, // POSCMOD
        register: RegisterId::Devcfg1,
        bit_start: 8,
        bit_width: 2,
        values: QUAD_OPTIONS,
    },
    FieldMapping {
        setting_index: 4, // OSCIOFNC
        register: RegisterId::Devcfg1,
        bit_start: 10,
        bit_width: 1,
        values: BIT_OPTIONS,
    },
    FieldMapping {
        setting_index: 5, // FPBDIV
        register: RegisterId::Devcfg1,
        bit_start: 12,
        bit_width: 2,
        values: QUAD_OPTIONS,
    },
    FieldMapping {
        setting_index: 6, // FPLLIDIV
        register: RegisterId::Devcfg2,
        bit_start: 0,
        bit_width: 3,
        values: OCTAL_OPTIONS,
    },
    FieldMapping {
        setting_index: 7, // FPLLMUL
        register: RegisterId::Devcfg2,
        bit_start: 4,
        bit_width: 3,
        values: OCTAL_OPTIONS,
    },
    FieldMapping {
        setting_index: 8, // FPLLODIV
        register: RegisterId::Devcfg2,
        bit_start: 16,
        bit_width: 3,
        values: OCTAL_OPTIONS,
    },
    FieldMapping {
        setting_index: 9, // UPLLIDIV
        register: RegisterId::Devcfg2,
        bit_start: 8,
        bit_width: 3,
        values: OCTAL_OPTIONS,
    },
    FieldMapping {
        setting_index: 10, // UPLLEN
        register: RegisterId::Devcfg2,
        bit_start: 15,
        bit_width: 1,
        values: BIT_OPTIONS,
    },
    FieldMapping {
        setting_index: 11, // FCKSM
        register: RegisterId::Devcfg1,
        bit_start: 14,
        bit_width: 2,
        values: &[0, 1, 3],
    },
    FieldMapping {
        setting_index: 12, // WDTPS
        register: RegisterId::Devcfg1,
        bit_start: 16,
        bit_width: 5,
        values: &[
            0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18,
            19, 20,
        ],
    },
    FieldMapping {
        setting_index: 13, // WINDIS
        register: RegisterId::Devcfg1,
        bit_start: 22,
        bit_width: 1,
        values: BIT_OPTIONS,
    },
    FieldMapping {
        setting_index: 14, // FWDTEN
        register: RegisterId::Devcfg1,
        bit_start: 23,
        bit_width: 1,
        values: BIT_OPTIONS,
    },
    FieldMapping {
        setting_index: 15, // FWDTWINSZ
        register: RegisterId::Devcfg1,
        bit_start: 24,
        bit_width: 2,
        values: QUAD_OPTIONS,
    },
    FieldMapping {
        setting_index: 16, // PMDL1WAY
        register: RegisterId::Devcfg3,
        bit_start: 28,
        bit_width: 1,
        values: BIT_OPTIONS,
    },
    FieldMapping {
        setting_index: 17, // IOL1WAY
        register: RegisterId::Devcfg3,
        bit_start: 29,
        bit_width: 1,
        values: BIT_OPTIONS,
    },
    FieldMapping {
        setting_index: 18, // FUSBIDIO
        register: RegisterId::Devcfg3,
        bit_start: 30,
        bit_width: 1,
        values: BIT_OPTIONS,
    },
    FieldMapping {
        setting_index: 19, // FVBUSONIO
        register: RegisterId::Devcfg3,
        bit_start: 31,
        bit_width: 1,
        values: BIT_OPTIONS,
    },
    FieldMapping {
        setting_index: 20, // PWP
        register: RegisterId::Devcfg0,
        bit_start: 10,
        bit_width: 6,
        values: &[63, 59, 55, 47, 31],
    },
    FieldMapping {
        setting_index: 21, // BWP
        register: RegisterId::Devcfg0,
        bit_start: 24,
        bit_width: 1,
        values: &[1, 0],
    },
    FieldMapping {
        setting_index: 22, // CP
        register: RegisterId::Devcfg0,
        bit_start: 28,
        bit_width: 1,
        values: &[1, 0],
    },
    FieldMapping {
        setting_index: 23, // ICESEL
        register: RegisterId::Devcfg0,
        bit_start: 3,
        bit_width: 2,
        values: &[3, 2, 1],
    },
    FieldMapping {
        setting_index: 26, // DEBUG
        register: RegisterId::Devcfg0,
        bit_start: 0,
        bit_width: 2,
        values: &[0, 3],
    },
    FieldMapping {
        setting_index: 27, // JTAGEN
        register: RegisterId::Devcfg0,
        bit_start: 2,
        bit_width: 1,
        values: BIT_OPTIONS,
    },
];

static BY_INDEX: LazyLock<BTreeMap<u32, &'static FieldMapping>> =
    LazyLock::new(|| MAPPINGS.iter().map(|m| (m.setting_index, m)).collect());

/// Look up the field mapping for a setting index.
pub fn mapping(index: u32) -> Option<&'static FieldMapping> {
    BY_INDEX.get(&index).copied()
}

//=============================================================================
// Table self-validation
//=============================================================================

/// Check a mapping table for internal consistency: unique setting indices,
/// known settings, value lists parallel to option lists, values inside the
/// field width, bit ranges inside 32 bits and non-overlapping per register.
pub fn validate_mappings(mappings: &[FieldMapping]) -> Result<()> {
    let mut seen = BTreeSet::new();
    for m in mappings {
        if !seen.insert(m.setting_index) {
            bail!("duplicate field mapping for setting {}", m.setting_index);
        }
        let Some(setting) = schema::setting(m.setting_index) else {
            bail!("field mapping for unknown setting {}", m.setting_index);
        };
        if m.bit_width == 0 || (m.bit_start as u64) + (m.bit_width as u64) > 32 {
            bail!(
                "{}: bit range [{}+{}] does not fit a 32-bit register",
                setting.mnemonic,
                m.bit_start,
                m.bit_width
            );
        }
        if m.values.len() != setting.options.len() {
            bail!(
                "{}: {} encode values for {} options",
                setting.mnemonic,
                m.values.len(),
                setting.options.len()
            );
        }
        for (option, value) in setting.options.iter().zip(m.values) {
            if (*value as u64) >= (1u64 << m.bit_width) {
                bail!(
                    "{}: value {} for {:?} exceeds {} bits",
                    setting.mnemonic,
                    value,
                    option,
                    m.bit_width
                );
            }
        }
    }
    for (i, a) in mappings.iter().enumerate() {
        for b in &mappings[i + 1..] {
            if a.register == b.register
                && a.bit_start < b.bit_start + b.bit_width
                && b.bit_start < a.bit_start + a.bit_width
            {
                bail!(
                    "settings {} and {} overlap in {}",
                    a.setting_index,
                    b.setting_index,
                    a.register
                );
            }
        }
    }
    Ok(())
}

/// Validate the shipped tables: the mapping table itself, plus coverage --
/// every non-informational setting has exactly one mapping and the
/// informational ones have none. Call once at startup.
pub fn validate_tables() -> Result<()> {
    validate_mappings(MAPPINGS)?;
    for setting in schema::SETTINGS {
        let mapped = mapping(setting.index).is_some();
        let informational = setting.category == Category::Info;
        if informational && mapped {
            bail!(
                "informational setting {} has a field mapping",
                setting.mnemonic
            );
        }
        if !informational && !mapped {
            bail!("setting {} has no field mapping", setting.mnemonic);
        }
    }
    Ok(())
}
