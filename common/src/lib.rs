//! fxrates Common Types
//!
//! This crate contains the types shared across the fxrates workspace:
//! currency codes, currency pairs, amounts and calendar helpers.

pub mod monetary;
pub mod time;

pub use monetary::*;
pub use time::*;
