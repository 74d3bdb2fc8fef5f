// Licensed under the Apache-2.0 license

//! Best-effort clock estimates derived from the oscillator and PLL
//! settings.
//!
//! The estimates are display values for reports, never authoritative: the
//! primary-oscillator paths assume a nominal crystal because the real
//! crystal is a board-level fact this tool cannot know, and any label that
//! fails to parse degrades to a fixed fallback instead of an error.

use log::debug;

use crate::schema::{
    Snapshot, IDX_OSC_SOURCE, IDX_PB_DIV, IDX_PLL_IDIV, IDX_PLL_MUL, IDX_PLL_ODIV,
};

/// Internal fast RC oscillator, MHz.
const FRC_MHZ: f64 = 8.0;
/// Assumed primary-oscillator crystal, MHz.
const POSC_ASSUMED_MHZ: f64 = 8.0;
/// Low power secondary oscillator (watch crystal), MHz.
const SOSC_MHZ: f64 = 0.032768;
/// Low power internal RC oscillator, MHz.
const LPRC_MHZ: f64 = 0.03125;

/// Returned when any clock-path label fails to parse. This is the power-on
/// FRC frequency, the clock the part actually runs at until configured.
pub const FALLBACK_MHZ: f64 = 8.0;

/// Nominal input frequency for an oscillator-source label, and whether
/// that source feeds the system PLL. Labels outside this table (such as the
/// divide-by-N postscaler source, whose divisor is a runtime register)
/// yield `None` and the caller falls back.
fn nominal_input(label: &str) -> Option<(f64, bool)> {
    match label {
        "Fast RC Oscillator (FRC)" => Some((FRC_MHZ, false)),
        "Fast RC Oscillator with PLL" => Some((FRC_MHZ, true)),
        "Primary Oscillator (XT, HS, EC)" => Some((POSC_ASSUMED_MHZ, false)),
        "Primary Oscillator with PLL" => Some((POSC_ASSUMED_MHZ, true)),
        "Low Power Secondary Oscillator" => Some((SOSC_MHZ, false)),
        "Low Power RC Oscillator (LPRC)" => Some((LPRC_MHZ, false)),
        "Fast RC Oscillator / 16" => Some((FRC_MHZ / 16.0, false)),
        _ => None,
    }
}

/// Parse the `<N>x ...` convention used by divider and multiplier labels.
fn leading_factor(label: &str) -> Option<f64> {
    let digits: String = label.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() || !label[digits.len()..].starts_with('x') {
        return None;
    }
    digits.parse().ok()
}

/// Parse the `... by <N>` and `... / <N>` conventions: the label's last
/// whitespace-separated token is the number.
fn trailing_factor(label: &str) -> Option<f64> {
    let token = label.trim_end().rsplit(' ').next()?;
    if token.is_empty() || !token.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

/// Estimate the system clock in MHz.
///
/// Reads the oscillator source and the three PLL ratios from the snapshot,
/// falling back to each setting's default when absent. If the source label
/// is outside the nominal table or any ratio label fails to parse, returns
/// [`FALLBACK_MHZ`]. PLL sources apply
/// `(input / input_divider) * multiplier / output_divider`; other sources
/// return their nominal input directly.
pub fn estimate_sysclk(snapshot: &Snapshot) -> f64 {
    let source = snapshot.get_or_default(IDX_OSC_SOURCE);
    let idiv = snapshot.get_or_default(IDX_PLL_IDIV);
    let mult = snapshot.get_or_default(IDX_PLL_MUL);
    let odiv = snapshot.get_or_default(IDX_PLL_ODIV);

    let nominal = source.and_then(nominal_input);
    let idiv = idiv.and_then(leading_factor);
    let mult = mult.and_then(leading_factor);
    let odiv = odiv.and_then(trailing_factor);

    match (nominal, idiv, mult, odiv) {
        (Some((input, true)), Some(idiv), Some(mult), Some(odiv)) => {
            (input / idiv) * mult / odiv
        }
        (Some((input, false)), Some(_), Some(_), Some(_)) => input,
        _ => {
            debug!("clock-path label failed to parse, using fallback");
            FALLBACK_MHZ
        }
    }
}

/// Estimate the peripheral bus clock in MHz: the system clock estimate
/// divided by the FPBDIV divisor. Same fallback policy.
pub fn estimate_pbclk(snapshot: &Snapshot) -> f64 {
    let divisor = snapshot
        .get_or_default(IDX_PB_DIV)
        .and_then(trailing_factor);
    match divisor {
        Some(divisor) => estimate_sysclk(snapshot) / divisor,
        None => {
            debug!("peripheral divisor label failed to parse, using fallback");
            FALLBACK_MHZ
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_parsing() {
        assert_eq!(leading_factor("3x Divider"), Some(3.0));
        assert_eq!(leading_factor("24x Multiplier"), Some(24.0));
        assert_eq!(leading_factor("x Divider"), None);
        assert_eq!(leading_factor("Divider 3x"), None);
        assert_eq!(trailing_factor("PLL Divide by 256"), Some(256.0));
        assert_eq!(trailing_factor("Pb_Clk is Sys_Clk / 8"), Some(8.0));
        assert_eq!(trailing_factor("PLL Divide by two"), None);
    }

    #[test]
    fn test_default_snapshot_is_40_mhz() {
        // FRC with PLL: (8 / 2) * 20 / 2.
        assert_eq!(estimate_sysclk(&Snapshot::new()), 40.0);
        assert_eq!(estimate_sysclk(&Snapshot::with_defaults()), 40.0);
    }

    #[test]
    fn test_posc_pll_combination() {
        let mut snapshot = Snapshot::new();
        snapshot.set(0, "Primary Oscillator with PLL");
        snapshot.set(6, "3x Divider");
        snapshot.set(7, "24x Multiplier");
        snapshot.set(8, "PLL Divide by 4");
        assert_eq!(estimate_sysclk(&snapshot), (8.0 / 3.0) * 24.0 / 4.0);
    }

    #[test]
    fn test_non_pll_sources_return_nominal() {
        let mut snapshot = Snapshot::new();
        snapshot.set(0, "Low Power RC Oscillator (LPRC)");
        assert_eq!(estimate_sysclk(&snapshot), 0.03125);

        snapshot.set(0, "Fast RC Oscillator / 16");
        assert_eq!(estimate_sysclk(&snapshot), 0.5);

        // The PLL ratios are ignored for non-PLL sources.
        snapshot.set(0, "Primary Oscillator (XT, HS, EC)");
        snapshot.set(7, "15x Multiplier");
        assert_eq!(estimate_sysclk(&snapshot), 8.0);
    }

    #[test]
    fn test_unparseable_labels_fall_back() {
        let mut snapshot = Snapshot::new();
        snapshot.set(0, "Fast RC Oscillator with Divide-by-N");
        assert_eq!(estimate_sysclk(&snapshot), FALLBACK_MHZ);

        let mut snapshot = Snapshot::new();
        snapshot.set(7, "garbage");
        assert_eq!(estimate_sysclk(&snapshot), FALLBACK_MHZ);
    }

    #[test]
    fn test_pbclk_divides_sysclk() {
        assert_eq!(estimate_pbclk(&Snapshot::new()), 40.0);

        let mut snapshot = Snapshot::new();
        snapshot.set(5, "Pb_Clk is Sys_Clk / 8");
        assert_eq!(estimate_pbclk(&snapshot), 5.0);

        snapshot.set(5, "broken label");
        assert_eq!(estimate_pbclk(&snapshot), FALLBACK_MHZ);
    }
}
