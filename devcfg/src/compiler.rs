// Licensed under the Apache-2.0 license

//! The snapshot-to-register-image compiler.
//!
//! Every compile starts from four all-ones words (erased flash reads 1) and
//! substitutes each chosen setting's encode value into its declared bit
//! field, leaving every other bit untouched. The result is independent of
//! the order entries are visited, and the function is pure: no I/O, no
//! retained state, a fresh image per call.
//!
//! Data-quality problems never abort a compile. An index outside the
//! catalog or a label outside a setting's option list is collected as a
//! [`CompileWarning`] and the affected bits keep their erased value; the
//! caller decides whether to block on the warnings.

use log::{debug, warn};

use crate::fieldmap::{self, RegisterId};
use crate::schema::{self, Snapshot};

/// Value of an erased configuration word.
pub const ERASED_WORD: u32 = 0xFFFF_FFFF;

/// The compiled values of the four configuration words.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RegisterImage {
    words: [u32; 4],
}

impl RegisterImage {
    fn erased() -> Self {
        Self {
            words: [ERASED_WORD; 4],
        }
    }

    pub fn word(&self, register: RegisterId) -> u32 {
        self.words[register as usize]
    }

    /// 8-digit uppercase hex rendering, e.g. `0xFFF8FFFA`.
    pub fn hex_word(&self, register: RegisterId) -> String {
        format!("0x{:08X}", self.word(register))
    }

    /// `(register, value)` pairs in DEVCFG0..DEVCFG3 order.
    pub fn iter(&self) -> impl Iterator<Item = (RegisterId, u32)> + '_ {
        RegisterId::ALL.iter().map(|r| (*r, self.word(*r)))
    }
}

/// Non-fatal diagnostic collected during a compile.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CompileWarning {
    /// Snapshot entry whose index is not in the settings catalog.
    UnknownSetting { index: u32, label: String },
    /// Snapshot entry whose label is not an option of its setting.
    UnknownOption { index: u32, label: String },
}

impl std::fmt::Display for CompileWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CompileWarning::UnknownSetting { index, label } => {
                write!(f, "setting {index} is not in the catalog (label {label:?})")
            }
            CompileWarning::UnknownOption { index, label } => {
                write!(f, "setting {index} has no option {label:?}")
            }
        }
    }
}

/// Result of one compile: the image plus any non-fatal diagnostics.
#[derive(Clone, Debug)]
pub struct CompileOutput {
    pub image: RegisterImage,
    pub warnings: Vec<CompileWarning>,
}

/// Compile a snapshot into the four configuration words.
///
/// Unset fields resolve to all ones, not zero. Informational settings
/// (computed clock displays, target device) are legal no-ops; entries the
/// catalog does not know at all are skipped with a warning.
pub fn compile(snapshot: &Snapshot) -> CompileOutput {
    let mut image = RegisterImage::erased();
    let mut warnings = Vec::new();

    for (index, label) in snapshot.entries() {
        if schema::setting(index).is_none() {
            warn!("snapshot names unknown setting {index}");
            warnings.push(CompileWarning::UnknownSetting {
                index,
                label: label.to_string(),
            });
            continue;
        }
        let Some(mapping) = fieldmap::mapping(index) else {
            // Informational setting; nothing to encode.
            debug!("setting {index} is informational, skipping");
            continue;
        };
        let Some(value) = mapping.value_of(label) else {
            warn!("setting {index} has no option {label:?}");
            warnings.push(CompileWarning::UnknownOption {
                index,
                label: label.to_string(),
            });
            continue;
        };

        let mask = mapping.mask();
        let word = &mut image.words[mapping.register as usize];
        *word = (*word & !mask) | (value << mapping.bit_start);
    }

    CompileOutput { image, warnings }
}
