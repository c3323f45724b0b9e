//! # rf-reel — Spinning Reel Selector for ReelForge
//!
//! Picks one candidate from a weighted roster and drives the reel animation
//! that lands on it: a long linear spin, an overshoot, a short bounce back
//! and a settled result. Rendering is left to whoever listens to the events.
//!
//! ## Features
//!
//! - **Weighted Selection**: Cumulative-probability draw with a seedable RNG
//! - **Strip Geometry**: Start/final offsets over a tiled strip, continuous
//!   across consecutive spins
//! - **Phase Control**: `Idle → Spinning → Bouncing → Settled` on tokio timers,
//!   with every pending timer cancelled when a new spin preempts the old one
//! - **Highlight Lights**: Decorative light cycling while the reel spins
//! - **Timing Profiles**: Normal, Turbo, Studio presets
//!
//! ## Architecture
//!
//! ```text
//! SpinController
//!     │
//!     ├── Roster ──> selector (winner index)
//!     ├── StripGeometry (start/final offsets)
//!     ├── Timers (spin start, bounce, settle, highlight)
//!     └── WinnerHistory
//!           │
//!           v
//!     broadcast<ReelEvent> → renderer
//! ```

pub mod config;
pub mod controller;
pub mod error;
pub mod event;
pub mod geometry;
pub mod highlight;
pub mod history;
pub mod roster;
pub mod selector;
pub mod state;
pub mod timer;

pub use config::*;
pub use controller::*;
pub use error::*;
pub use event::*;
pub use geometry::*;
pub use highlight::*;
pub use history::*;
pub use roster::*;
pub use state::*;
