// Licensed under the Apache-2.0 license

//! Pin assignment validation, selector resolution, and conflict detection.
//!
//! [`encode`] resolves a batch of assignments against the static tables and
//! returns everything the caller needs in one pass: the selector value for
//! each touched register, the assignments that do not exist in the tables
//! at all ([`InvalidRouting`]), and the pins claimed by more than one
//! output signal ([`PinConflict`]). Nothing is thrown; a bad assignment
//! never stops the rest of the batch.

use log::warn;
use std::collections::BTreeMap;

use crate::tables;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Direction {
    Input,
    Output,
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Direction::Input => "input",
            Direction::Output => "output",
        })
    }
}

/// One desired routing, as authored by the caller.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PinAssignment {
    pub signal: String,
    pub pin: String,
    pub direction: Direction,
}

impl PinAssignment {
    pub fn new(signal: impl Into<String>, pin: impl Into<String>, direction: Direction) -> Self {
        Self {
            signal: signal.into(),
            pin: pin.into(),
            direction,
        }
    }
}

/// Why an assignment could not be resolved.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RoutingCause {
    /// No remappable input with this name.
    UnknownSignal,
    /// The pin is not remappable on this family.
    UnknownPin,
    /// The pin exists but belongs to a different group than the signal.
    PinOutsideGroup { group: u8 },
    /// The pin's group does not offer this output signal.
    SignalNotOnPin { group: u8 },
}

impl std::fmt::Display for RoutingCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoutingCause::UnknownSignal => write!(f, "unknown signal"),
            RoutingCause::UnknownPin => write!(f, "unknown pin"),
            RoutingCause::PinOutsideGroup { group } => {
                write!(f, "pin is outside the signal's group {group}")
            }
            RoutingCause::SignalNotOnPin { group } => {
                write!(f, "signal is not available on group {group} pins")
            }
        }
    }
}

/// An assignment the tables cannot express. Fatal to that assignment only.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InvalidRouting {
    pub assignment: PinAssignment,
    pub cause: RoutingCause,
}

impl std::fmt::Display for InvalidRouting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} on {}: {}",
            self.assignment.direction, self.assignment.signal, self.assignment.pin, self.cause
        )
    }
}

/// A physical pin claimed as the output of more than one signal.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PinConflict {
    pub pin: String,
    /// Contending signals, in input order. Always at least two.
    pub signals: Vec<String>,
}

impl std::fmt::Display for PinConflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pin {} driven by {}", self.pin, self.signals.join(", "))
    }
}

/// Result of encoding a batch of assignments.
#[derive(Clone, Debug, Default)]
pub struct Encoding {
    /// Selector value per touched register. When several assignments claim
    /// the same register, the first in input order wins.
    pub selectors: BTreeMap<String, u32>,
    pub conflicts: Vec<PinConflict>,
    pub invalid: Vec<InvalidRouting>,
}

impl Encoding {
    /// True if every assignment resolved and no pin is double-driven.
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty() && self.invalid.is_empty()
    }
}

/// Resolve a batch of assignments into selector register values.
///
/// Inputs never conflict with each other: any number of signals may read
/// one pin. An input and an output sharing a pin is also legal, because
/// the read and drive multiplexers are independent registers. Only two
/// distinct *output* signals on one pin is a conflict, and even then the
/// first claim keeps the selector.
pub fn encode(assignments: &[PinAssignment]) -> Encoding {
    let mut encoding = Encoding::default();
    // (pin, signal) output claims in resolution order, for conflict
    // detection after the batch resolves.
    let mut claims: Vec<(String, String)> = Vec::new();

    for assignment in assignments {
        match assignment.direction {
            Direction::Input => {
                let Some(signal) = tables::input_signal(&assignment.signal) else {
                    push_invalid(&mut encoding, assignment, RoutingCause::UnknownSignal);
                    continue;
                };
                let code = tables::group(signal.group).and_then(|g| g.pin_code(&assignment.pin));
                match code {
                    Some(code) => {
                        encoding
                            .selectors
                            .entry(signal.register.to_string())
                            .or_insert(code);
                    }
                    None if tables::group_of_pin(&assignment.pin).is_none() => {
                        push_invalid(&mut encoding, assignment, RoutingCause::UnknownPin);
                    }
                    None => {
                        push_invalid(
                            &mut encoding,
                            assignment,
                            RoutingCause::PinOutsideGroup { group: signal.group },
                        );
                    }
                }
            }
            Direction::Output => {
                let Some(group) = tables::group_of_pin(&assignment.pin) else {
                    push_invalid(&mut encoding, assignment, RoutingCause::UnknownPin);
                    continue;
                };
                let Some(code) = group.output_code(&assignment.signal) else {
                    push_invalid(
                        &mut encoding,
                        assignment,
                        RoutingCause::SignalNotOnPin { group: group.id },
                    );
                    continue;
                };
                encoding
                    .selectors
                    .entry(tables::output_register(&assignment.pin))
                    .or_insert(code);
                claims.push((assignment.pin.clone(), assignment.signal.clone()));
            }
        }
    }

    // Group the output claims by pin, keeping first-appearance order for
    // both pins and signals. Repeating one (signal, pin) routing is not a
    // conflict.
    let mut by_pin: Vec<(String, Vec<String>)> = Vec::new();
    for (pin, signal) in claims {
        match by_pin.iter_mut().find(|(p, _)| *p == pin) {
            Some((_, signals)) => {
                if !signals.contains(&signal) {
                    signals.push(signal);
                }
            }
            None => by_pin.push((pin, vec![signal])),
        }
    }
    for (pin, signals) in by_pin {
        if signals.len() > 1 {
            let conflict = PinConflict { pin, signals };
            warn!("{conflict}");
            encoding.conflicts.push(conflict);
        }
    }

    encoding
}

fn push_invalid(encoding: &mut Encoding, assignment: &PinAssignment, cause: RoutingCause) {
    warn!(
        "cannot route {} {} on {}: {}",
        assignment.direction, assignment.signal, assignment.pin, cause
    );
    encoding.invalid.push(InvalidRouting {
        assignment: assignment.clone(),
        cause,
    });
}
