//! # Miscrit Calc
//!
//! Damage calculation engine for Miscrits matchups.
//!
//! This crate provides:
//! - Element normalization and the type-advantage cycle
//! - The per-hit damage model and aggregate results (hits, chained attacks,
//!   true damage, hits-to-knockout)
//! - The average-tier defense remap
//! - Roster building from the raw database payload
//! - Custom profiles and their repository contract
//! - Session state and the evaluation pipeline
//!
//! The engine is synchronous and pure. Every computation is a function of
//! its inputs; state lives in [`Session`] and [`ProfileBook`] only.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod advantage;
pub mod attack;
pub mod avg_def;
pub mod custom;
pub mod damage_calc;
pub mod element;
pub mod ingest;
pub mod roster;
pub mod session;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::advantage::*;
    pub use crate::attack::*;
    pub use crate::avg_def::*;
    pub use crate::custom::*;
    pub use crate::damage_calc::*;
    pub use crate::element::*;
    pub use crate::roster::*;
    pub use crate::session::*;
}

pub use prelude::*;
