//! Collision detection and response between disks
//!
//! Detection is a plain all-pairs sweep. The disk count is small and never
//! grows, so there is no broad phase.

use glam::Vec2;

use super::disk::{Disk, DiskId};
use super::timer::{Millis, TimerQueue};

/// Strict circle overlap test
///
/// Centers exactly `ra + rb` apart are tangent, not overlapping.
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

/// React to a colliding pair: mark, flash and reverse both
pub fn resolve_pair(
    a: &mut Disk,
    b: &mut Disk,
    timers: &mut TimerQueue,
    now: Millis,
    flash_ms: Millis,
) {
    a.colliding = true;
    b.colliding = true;
    a.flash(timers, now, flash_ms);
    b.flash(timers, now, flash_ms);
    a.reverse();
    b.reverse();
}

/// Run one collision sweep over the live disks
///
/// Every `colliding` flag is cleared first, then each unordered pair is
/// tested in index order. A disk overlapping several partners is reversed
/// once per partner. Returns the colliding pairs by id.
pub fn sweep(
    disks: &mut [Disk],
    timers: &mut TimerQueue,
    now: Millis,
    flash_ms: Millis,
) -> Vec<(DiskId, DiskId)> {
    for disk in disks.iter_mut() {
        disk.colliding = false;
    }

    let mut pairs = Vec::new();
    for i in 0..disks.len() {
        let (head, tail) = disks.split_at_mut(i + 1);
        let a = &mut head[i];
        for b in tail.iter_mut() {
            if a.overlaps(b) {
                log::debug!("collision {} <-> {}", a.id, b.id);
                resolve_pair(a, b, timers, now, flash_ms);
                pairs.push((a.id, b.id));
            }
        }
    }
    pairs
}
