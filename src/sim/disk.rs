//! The disk entity

use std::fmt;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::bounds::{self, Reflection, Viewport};
use super::collision::circles_overlap;
use super::color::Rgb;
use super::timer::{DeferredTask, Millis, TimerQueue};
use crate::consts::FLASH_COLOR;
use crate::settings::EdgePolicy;

/// Stable disk identifier, never reused within a simulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DiskId(pub u32);

impl fmt::Display for DiskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A moving, labeled disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disk {
    pub id: DiskId,
    /// Center
    pub pos: Vec2,
    /// Units per tick
    pub vel: Vec2,
    radius: f32,
    /// Magnitude used when velocity is re-derived (forced upward)
    pub base_speed: f32,
    /// Currently displayed color
    pub color: Rgb,
    base_color: Rgb,
    label: String,
    /// Overlapped at least one other disk during the last sweep
    #[serde(default)]
    pub colliding: bool,
}

impl Disk {
    pub fn new(
        id: DiskId,
        pos: Vec2,
        vel: Vec2,
        radius: f32,
        base_speed: f32,
        color: Rgb,
        label: impl Into<String>,
    ) -> Self {
        debug_assert!(radius > 0.0, "disk radius must be positive");
        Self {
            id,
            pos,
            vel,
            radius,
            base_speed,
            color,
            base_color: color,
            label: label.into(),
            colliding: false,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn base_color(&self) -> Rgb {
        self.base_color
    }

    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Move by one tick of velocity
    #[inline]
    pub fn advance(&mut self) {
        self.pos += self.vel;
    }

    /// Apply the edge policy for this viewport
    pub fn reflect<R: Rng + ?Sized>(
        &mut self,
        viewport: Viewport,
        policy: EdgePolicy,
        rng: &mut R,
    ) -> Reflection {
        bounds::reflect(self, viewport, policy, rng)
    }

    /// Strict overlap: tangent disks do not collide
    #[inline]
    pub fn overlaps(&self, other: &Disk) -> bool {
        circles_overlap(self.pos, self.radius, other.pos, other.radius)
    }

    /// Negate both velocity components
    #[inline]
    pub fn reverse(&mut self) {
        self.vel = -self.vel;
    }

    /// Switch to the flash color now and queue the restoration
    ///
    /// Earlier pending restorations are left alone; whichever fires last
    /// leaves the disk at its base color.
    pub fn flash(&mut self, timers: &mut TimerQueue, now: Millis, duration: Millis) {
        self.color = FLASH_COLOR;
        timers.schedule(
            now.saturating_add(duration),
            DeferredTask::RestoreColor { disk: self.id },
        );
    }

    /// Back to the base color (target of a deferred restoration)
    pub fn restore_color(&mut self) {
        self.color = self.base_color;
    }

    /// Whether `point` lies inside the disk, boundary included
    #[inline]
    pub fn hit_test(&self, point: Vec2) -> bool {
        self.pos.distance(point) <= self.radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disk(pos: Vec2, vel: Vec2, radius: f32) -> Disk {
        Disk::new(DiskId(1), pos, vel, radius, 3.0, Rgb::new(10, 20, 30), "C1")
    }

    #[test]
    fn test_advance_applies_velocity() {
        let mut d = disk(Vec2::new(100.0, 100.0), Vec2::new(2.0, -3.0), 20.0);
        d.advance();
        assert_eq!(d.pos, Vec2::new(102.0, 97.0));
    }

    #[test]
    fn test_reverse_twice_is_identity() {
        let mut d = disk(Vec2::ZERO, Vec2::new(1.5, -4.0), 20.0);
        d.reverse();
        assert_eq!(d.vel, Vec2::new(-1.5, 4.0));
        d.reverse();
        assert_eq!(d.vel, Vec2::new(1.5, -4.0));
    }

    #[test]
    fn test_flash_sets_sentinel_and_schedules_restore() {
        let mut d = disk(Vec2::ZERO, Vec2::ZERO, 20.0);
        let mut timers = TimerQueue::new();
        d.flash(&mut timers, 1_000, 100);

        assert_eq!(d.color, FLASH_COLOR);
        assert_eq!(d.base_color(), Rgb::new(10, 20, 30));
        assert!(timers.drain_due(1_099).is_empty());
        assert_eq!(
            timers.drain_due(1_100),
            vec![DeferredTask::RestoreColor { disk: DiskId(1) }]
        );

        d.restore_color();
        assert_eq!(d.color, d.base_color());
    }

    #[test]
    fn test_hit_test_boundary_inclusive() {
        let d = disk(Vec2::new(50.0, 50.0), Vec2::ZERO, 10.0);
        assert!(d.hit_test(Vec2::new(50.0, 50.0)));
        assert!(d.hit_test(Vec2::new(60.0, 50.0)));
        assert!(!d.hit_test(Vec2::new(60.1, 50.0)));
        assert!(!d.hit_test(Vec2::new(-1e9, 1e9)));
    }

    #[test]
    fn test_overlaps_uses_radius_sum() {
        let a = disk(Vec2::new(0.0, 0.0), Vec2::ZERO, 6.0);
        let b = disk(Vec2::new(10.0, 0.0), Vec2::ZERO, 6.0);
        let c = disk(Vec2::new(12.0, 0.0), Vec2::ZERO, 6.0);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }
}
