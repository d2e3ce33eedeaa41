//! # capk-machine
//!
//! The machine resource as the actuator sees it.
//!
//! ## Design Principles
//!
//! - A machine is owned by the caller; the actuator only reads it
//! - Only the name (and namespace) is interpreted
//! - `spec` and `status` are opaque provider payloads passed through as JSON
//!
//! [`SpecHash`] gives providers a stable fingerprint of a machine's spec so
//! they can tell a real change apart from a steady-state reconcile pass.

mod hash;
mod types;

pub use hash::SpecHash;
pub use types::*;
