//! Viewport extents and edge policies
//!
//! The viewport spans `[0, width] x [0, height]` in surface coordinates with
//! Y growing downward, so "up" is negative Y.

use std::ops::RangeInclusive;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::disk::Disk;
use crate::consts::RESPAWN_GAP;
use crate::settings::EdgePolicy;

/// Fixed drawing area, read once at startup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Center coordinates that keep a disk of `radius` fully inside, per axis
    pub fn placement_range(&self, radius: f32) -> (RangeInclusive<f32>, RangeInclusive<f32>) {
        (radius..=self.width - radius, radius..=self.height - radius)
    }

    /// Whether a disk of `radius` centered at `pos` is fully inside
    pub fn contains(&self, pos: Vec2, radius: f32) -> bool {
        let (xs, ys) = self.placement_range(radius);
        xs.contains(&pos.x) && ys.contains(&pos.y)
    }

    /// Uniform X inside the placement range
    pub fn random_x<R: Rng + ?Sized>(&self, radius: f32, rng: &mut R) -> f32 {
        rng.random_range(radius..=self.width - radius)
    }

    /// Uniform Y inside the placement range
    pub fn random_y<R: Rng + ?Sized>(&self, radius: f32, rng: &mut R) -> f32 {
        rng.random_range(radius..=self.height - radius)
    }

    /// Y of a disk that just respawned above the bottom edge
    #[inline]
    pub fn respawn_y(&self, radius: f32) -> f32 {
        self.height - radius - RESPAWN_GAP
    }
}

/// What the edge policy did to a disk this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reflection {
    pub bounced_x: bool,
    pub bounced_y: bool,
    /// Crossed the top and was moved back to the bottom
    pub respawned: bool,
    /// Found at or through the bottom and sent upward
    pub forced_up: bool,
}

/// Bounce one axis off `[0, extent]`
///
/// Returns the corrected `(pos, vel)` and whether an edge was hit. The
/// velocity is turned toward the interior and the center clamped back into
/// range, so a disk reversed by a collision while overlapping an edge cannot
/// stick to it.
#[inline]
pub fn bounce_axis(pos: f32, vel: f32, radius: f32, extent: f32) -> (f32, f32, bool) {
    if pos - radius < 0.0 {
        (radius, vel.abs(), true)
    } else if pos + radius > extent {
        (extent - radius, -vel.abs(), true)
    } else {
        (pos, vel, false)
    }
}

/// Apply `policy` to a disk that has just advanced
pub fn reflect<R: Rng + ?Sized>(
    disk: &mut Disk,
    viewport: Viewport,
    policy: EdgePolicy,
    rng: &mut R,
) -> Reflection {
    let radius = disk.radius();
    let mut out = Reflection::default();

    let (x, vx, hit) = bounce_axis(disk.pos.x, disk.vel.x, radius, viewport.width);
    disk.pos.x = x;
    disk.vel.x = vx;
    out.bounced_x = hit;

    match policy {
        EdgePolicy::BounceBoth => {
            let (y, vy, hit) = bounce_axis(disk.pos.y, disk.vel.y, radius, viewport.height);
            disk.pos.y = y;
            disk.vel.y = vy;
            out.bounced_y = hit;
        }
        EdgePolicy::UpwardRespawn => {
            if disk.pos.y - radius < 0.0 {
                disk.pos.y = viewport.respawn_y(radius);
                disk.pos.x = viewport.random_x(radius, rng);
                out.respawned = true;
                log::trace!("disk {} respawned at x={:.1}", disk.id, disk.pos.x);
            }

            // Send a disk found at the bottom edge back upward
            if disk.pos.y + radius >= viewport.height {
                disk.vel.y = -disk.base_speed.abs();
                out.forced_up = true;
                log::trace!("disk {} forced upward at bottom edge", disk.id);
            }
        }
    }

    out
}
