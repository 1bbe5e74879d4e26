//! # Miscrit Common
//!
//! Shared types for the Miscrits damage calculator.
//!
//! This crate provides the foundational pieces used by the engine and the
//! command-line front end:
//! - The six-stat block (PA, EA, PD, ED, SPD, HP)
//! - Error types for the loading and persistence seams
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod stats;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::*;
    pub use crate::stats::*;
}

pub use prelude::*;
