// Licensed under the Apache-2.0 license

//! Peripheral Pin Select encoder for the PIC32MX1xx/2xx 28-pin family.
//!
//! Remappable peripherals on these parts are wired to physical pins through
//! four multiplexer groups. Routing a signal means writing a small selector
//! code into a register: for inputs, the signal's own selection register
//! (e.g. `U2RXR`) receives the code of the chosen pin; for outputs, the
//! pin's register (e.g. `RPB14R`) receives the code of the chosen signal.
//! A signal can only reach pins of its own group.
//!
//! ## Usage
//!
//! ```
//! use pic32_pps::{encode, Direction, PinAssignment};
//!
//! let routing = [
//!     PinAssignment::new("U2RX", "RPB11", Direction::Input),
//!     PinAssignment::new("U2TX", "RPB14", Direction::Output),
//! ];
//! let encoding = encode(&routing);
//! assert!(encoding.is_clean());
//! assert_eq!(encoding.selectors["U2RXR"], 3);
//! assert_eq!(encoding.selectors["RPB14R"], 1);
//! ```
//!
//! ## Module Organization
//!
//! - [`tables`]: the static group/signal/pin catalogs and their validation
//! - [`encode`]: assignment validation, selector resolution, conflict
//!   detection

pub mod encode;
pub mod tables;

pub use encode::{
    encode, Direction, Encoding, InvalidRouting, PinAssignment, PinConflict, RoutingCause,
};
pub use tables::{validate_tables, InputSignal, MuxGroup};
