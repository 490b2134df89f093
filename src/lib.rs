//! Colliding Disks - labeled disks bouncing around a bounded viewport
//!
//! Core modules:
//! - `sim`: Deterministic simulation (disks, edge policy, collisions, tick)
//! - `render`: Render surface abstraction plus draw-list and text rasterizers
//! - `scheduler`: Frame driver that feeds host time and input into the tick
//! - `settings`: Data-driven configuration loaded from JSON
//! - `error`: Construction-time errors

pub mod error;
pub mod render;
pub mod scheduler;
pub mod settings;
pub mod sim;

pub use error::SimError;
pub use render::{DrawCommand, DrawList, RenderSurface, TextSurface};
pub use scheduler::Scheduler;
pub use settings::{EdgePolicy, Settings};
pub use sim::{Disk, DiskId, Rgb, Simulation, TickInput, TickReport, Viewport, tick};

/// Simulation configuration constants
pub mod consts {
    use crate::sim::Rgb;

    /// Number of disks spawned at startup
    pub const DISK_COUNT: usize = 10;

    /// Radius range (min inclusive, max exclusive)
    pub const RADIUS_MIN: f32 = 20.0;
    pub const RADIUS_MAX: f32 = 50.0;

    /// Speed range in units per tick (min inclusive, max exclusive)
    pub const SPEED_MIN: f32 = 1.0;
    pub const SPEED_MAX: f32 = 5.0;

    /// How long a disk stays flashed after a collision
    pub const FLASH_MS: u64 = 100;
    /// Color shown while flashed
    pub const FLASH_COLOR: Rgb = Rgb::new(0x00, 0x00, 0xFF);

    /// Gap kept between a respawned disk and the bottom edge
    pub const RESPAWN_GAP: f32 = 1.0;

    /// Label prefix; disks are labeled C1, C2, ...
    pub const LABEL_PREFIX: &str = "C";

    /// Host-side drawing style
    pub const STROKE_WIDTH: f64 = 2.0;
    pub const LABEL_FONT: &str = "20px Arial";
    pub const BACKGROUND: &str = "#ff8";
}
