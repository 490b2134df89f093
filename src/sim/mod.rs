//! Deterministic simulation module
//!
//! Everything that moves lives here. This module stays free of host
//! concerns:
//! - One step per tick, velocities in units per tick
//! - Seeded RNG only
//! - Stable iteration order (collection order, ids never reused)
//! - Drawing goes through [`crate::render::RenderSurface`] only

pub mod bounds;
pub mod collision;
pub mod color;
pub mod disk;
pub mod state;
pub mod tick;
pub mod timer;

pub use bounds::{Reflection, Viewport, bounce_axis, reflect};
pub use collision::{circles_overlap, resolve_pair, sweep};
pub use color::Rgb;
pub use disk::{Disk, DiskId};
pub use state::Simulation;
pub use tick::{TickInput, TickReport, tick};
pub use timer::{DeferredTask, Millis, TimerQueue};
