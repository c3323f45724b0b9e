//! # rf-roster — Roster Sources for ReelForge
//!
//! Supplies the weighted rosters the reel spins over.
//!
//! ## Sources
//!
//! - **Api**: ranked player list over HTTP, places 4 to 10, equal weights
//! - **Fixture**: seven built-in test players, equal weights

pub mod error;
pub mod player;
pub mod provider;
pub mod source;

pub use error::*;
pub use player::*;
pub use provider::*;
pub use source::*;
