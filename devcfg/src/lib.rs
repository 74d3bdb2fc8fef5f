// Licensed under the Apache-2.0 license

//! Configuration-word compiler for the PIC32MX1xx/2xx family.
//!
//! This crate turns a set of human-readable configuration choices (oscillator
//! mode, PLL ratios, watchdog behavior, debug access) into the exact bit
//! patterns of the four DEVCFG configuration words programmed into boot
//! flash.
//!
//! ## Usage
//!
//! ```
//! use pic32_devcfg::{compile, Snapshot};
//!
//! let mut snapshot = Snapshot::new();
//! snapshot.set(6, "3x Divider");
//!
//! let out = compile(&snapshot);
//! assert_eq!(out.image.word(pic32_devcfg::RegisterId::Devcfg2), 0xFFFF_FFFA);
//! assert!(out.warnings.is_empty());
//! ```
//!
//! ## Module Organization
//!
//! - [`schema`]: the settings catalog and the [`Snapshot`] container
//! - [`fieldmap`]: register/bit-field descriptors and table self-validation
//! - [`compiler`]: the pure snapshot-to-register-image compiler
//! - [`clock`]: best-effort system and peripheral clock estimates

pub mod clock;
pub mod compiler;
pub mod fieldmap;
pub mod schema;

pub use compiler::{compile, CompileOutput, CompileWarning, RegisterImage};
pub use fieldmap::{validate_tables, FieldMapping, RegisterId};
pub use schema::{Category, Device, Setting, Snapshot};
