// Licensed under the Apache-2.0 license

//! Project generator for PIC32MX configuration words and pin select.
//!
//! Glue between the core crates and the filesystem: load a TOML manifest,
//! compile the configuration words, encode the pin routings, estimate the
//! clocks, and write the C header plus the text/JSON reports. The
//! `pic32-cfggen` binary is a thin clap front end over [`build`],
//! [`clock_estimates`] and [`emit::catalog_listing`].

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use pic32_devcfg::clock;
use pic32_devcfg::compile;

pub mod emit;
pub mod project;

pub use project::Manifest;

/// What [`build`] wrote, plus the diagnostic counts for the caller's
/// summary output.
pub struct BuildOutputs {
    pub header_path: PathBuf,
    pub report_path: PathBuf,
    pub json_path: PathBuf,
    pub warning_count: usize,
    pub conflict_count: usize,
}

/// Compile `manifest_path` and write the artifacts into `out_dir`.
///
/// Compile warnings and pin conflicts are embedded in the reports and do
/// not fail the build; an assignment the tables cannot route at all does,
/// and nothing is written in that case.
pub fn build(manifest_path: &Path, out_dir: &Path) -> Result<BuildOutputs> {
    pic32_devcfg::validate_tables().context("configuration tables failed validation")?;
    pic32_pps::validate_tables().context("pin select tables failed validation")?;

    let manifest = Manifest::load(manifest_path)?;
    let device = manifest.resolve_device()?;
    let snapshot = manifest.snapshot();
    let assignments = manifest.assignments()?;

    let compiled = compile(&snapshot);
    let encoding = pic32_pps::encode(&assignments);
    if !encoding.invalid.is_empty() {
        bail!(
            "{} pin assignment(s) cannot be routed; fix the manifest and rerun",
            encoding.invalid.len()
        );
    }

    let inputs = emit::ReportInputs {
        device,
        snapshot: &snapshot,
        image: &compiled.image,
        sysclk_mhz: clock::estimate_sysclk(&snapshot),
        pbclk_mhz: clock::estimate_pbclk(&snapshot),
        assignments: &assignments,
        encoding: &encoding,
        warnings: &compiled.warnings,
    };

    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;
    let header_path = out_dir.join("pic32_config.h");
    let report_path = out_dir.join("pic32_config.txt");
    let json_path = out_dir.join("pic32_config.json");
    fs::write(&header_path, emit::c_header(&inputs))
        .with_context(|| format!("writing {}", header_path.display()))?;
    fs::write(&report_path, emit::text_report(&inputs))
        .with_context(|| format!("writing {}", report_path.display()))?;
    fs::write(&json_path, emit::json_report(&inputs)?)
        .with_context(|| format!("writing {}", json_path.display()))?;

    Ok(BuildOutputs {
        header_path,
        report_path,
        json_path,
        warning_count: compiled.warnings.len(),
        conflict_count: encoding.conflicts.len(),
    })
}

/// Load `manifest_path` and return `(system, peripheral)` clock estimates
/// in MHz.
pub fn clock_estimates(manifest_path: &Path) -> Result<(f64, f64)> {
    let manifest = Manifest::load(manifest_path)?;
    let snapshot = manifest.snapshot();
    Ok((
        clock::estimate_sysclk(&snapshot),
        clock::estimate_pbclk(&snapshot),
    ))
}
