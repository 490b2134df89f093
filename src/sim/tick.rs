//! One simulation step
//!
//! Order within a tick:
//! 1. Advance the clock and run due deferred tasks (flash restoration)
//! 2. Apply queued removals from clicks
//! 3. Clear the surface; draw, advance and edge-reflect every disk
//! 4. Collision sweep over the moved disks

use glam::Vec2;

use super::collision::sweep;
use super::disk::DiskId;
use super::state::Simulation;
use super::timer::Millis;
use crate::render::RenderSurface;

/// Input gathered between ticks
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pointer clicks in surface coordinates, oldest first
    pub clicks: Vec<Vec2>,
}

impl TickInput {
    pub fn click(&mut self, point: Vec2) {
        self.clicks.push(point);
    }

    pub fn is_empty(&self) -> bool {
        self.clicks.is_empty()
    }

    /// Drop one-shot input once a tick consumed it
    pub fn clear(&mut self) {
        self.clicks.clear();
    }
}

/// What happened during a tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Colliding pairs in sweep order
    pub collisions: Vec<(DiskId, DiskId)>,
    /// Disks removed by clicks before drawing
    pub removed: Vec<DiskId>,
    /// Disks that left through the top and reappeared at the bottom
    pub respawned: Vec<DiskId>,
    /// Flash restorations applied to live disks
    pub restored: usize,
}

/// Advance the simulation by one tick at host time `now`
pub fn tick<S: RenderSurface + ?Sized>(
    sim: &mut Simulation,
    input: &TickInput,
    now: Millis,
    surface: &mut S,
) -> TickReport {
    let mut report = TickReport::default();

    sim.set_now(now);
    sim.time_ticks += 1;
    report.restored = sim.run_due_timers();

    // Removals happen here and only here, never mid-sweep
    if !input.clicks.is_empty() {
        if sim.settings.click_removal {
            for &point in &input.clicks {
                let removed = sim.remove_at(point);
                if !removed.is_empty() {
                    log::debug!("click at ({:.1}, {:.1}) removed {:?}", point.x, point.y, removed);
                }
                report.removed.extend(removed);
            }
        } else {
            log::warn!("ignoring {} click(s): removal disabled", input.clicks.len());
        }
    }

    let viewport = sim.viewport;
    let policy = sim.settings.edge_policy;
    surface.clear();
    {
        let (disks, rng) = sim.edge_parts();
        for disk in disks.iter_mut() {
            surface.draw_disk(disk.pos, disk.radius(), disk.color, disk.label());
            disk.advance();
            if disk.reflect(viewport, policy, rng).respawned {
                report.respawned.push(disk.id);
            }
        }
    }

    let (disks, timers, now, flash_ms) = sim.sweep_parts();
    report.collisions = sweep(disks, timers, now, flash_ms);

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FLASH_COLOR;
    use crate::render::{DrawCommand, DrawList};
    use crate::settings::{EdgePolicy, Settings};
    use crate::sim::{Rgb, Viewport};

    fn view() -> Viewport {
        Viewport::new(800.0, 600.0)
    }

    fn empty(policy: EdgePolicy) -> Simulation {
        Simulation::empty(Settings::with_policy(policy), view(), 1)
    }

    #[test]
    fn test_draw_before_move() {
        let mut sim = empty(EdgePolicy::BounceBoth);
        sim.spawn_disk(Vec2::new(100.0, 100.0), Vec2::new(3.0, 4.0), 20.0, Rgb::new(9, 9, 9)).unwrap();
        let mut surface = DrawList::new();

        tick(&mut sim, &TickInput::default(), 16, &mut surface);

        assert_eq!(surface.commands[0], DrawCommand::Clear);
        match &surface.commands[1] {
            DrawCommand::Disk { pos, label, .. } => {
                assert_eq!(*pos, Vec2::new(100.0, 100.0));
                assert_eq!(label, "C1");
            }
            other => panic!("expected disk draw, got {:?}", other),
        }
        assert_eq!(sim.disks()[0].pos, Vec2::new(103.0, 104.0));
        assert_eq!(sim.time_ticks, 1);
    }

    #[test]
    fn test_scenario_close_pair_collides() {
        let mut sim = empty(EdgePolicy::BounceBoth);
        // Same velocity keeps the 10-unit gap through the move
        let a = sim.spawn_disk(Vec2::new(300.0, 300.0), Vec2::new(1.0, 2.0), 6.0, Rgb::new(1, 2, 3)).unwrap();
        let b = sim.spawn_disk(Vec2::new(310.0, 300.0), Vec2::new(1.0, 2.0), 6.0, Rgb::new(4, 5, 6)).unwrap();
        let mut surface = DrawList::new();

        let report = tick(&mut sim, &TickInput::default(), 0, &mut surface);

        assert_eq!(report.collisions, vec![(a, b)]);
        for id in [a, b] {
            let d = sim.disk(id).unwrap();
            assert!(d.colliding);
            assert_eq!(d.vel, Vec2::new(-1.0, -2.0));
            assert_eq!(d.color, FLASH_COLOR);
        }
        assert_eq!(sim.pending_timers(), 2);
    }

    #[test]
    fn test_scenario_far_apart_no_collisions() {
        let mut sim = empty(EdgePolicy::BounceBoth);
        for i in 0..10 {
            let pos = Vec2::new(60.0 + 75.0 * i as f32, if i % 2 == 0 { 100.0 } else { 400.0 });
            sim.spawn_disk(pos, Vec2::new(0.5, 0.5), 30.0, Rgb::new(0, 128, 0)).unwrap();
        }
        let mut surface = DrawList::new();

        let report = tick(&mut sim, &TickInput::default(), 0, &mut surface);

        assert!(report.collisions.is_empty());
        assert!(sim.disks().iter().all(|d| !d.colliding));
        assert!(sim.disks().iter().all(|d| d.vel == Vec2::new(0.5, 0.5)));
    }

    #[test]
    fn test_scenario_click_removes_and_redraws() {
        let mut sim = empty(EdgePolicy::BounceBoth);
        let mut ids = Vec::new();
        for i in 0..5 {
            let pos = Vec2::new(80.0 + 150.0 * i as f32, 300.0);
            ids.push(sim.spawn_disk(pos, Vec2::new(0.0, 1.0), 25.0, Rgb::new(50, 50, 50)).unwrap());
        }
        let target = ids[2];
        let center = sim.disk(target).unwrap().pos;
        let mut surface = DrawList::new();
        let mut input = TickInput::default();
        input.click(center);

        let report = tick(&mut sim, &input, 0, &mut surface);

        assert_eq!(report.removed, vec![target]);
        assert!(sim.disk(target).is_none());
        for id in ids.iter().filter(|&&id| id != target) {
            assert!(sim.disk(*id).is_some());
        }
        let drawn = surface.drawn_labels();
        assert_eq!(drawn, vec!["C1", "C2", "C4", "C5"]);
    }

    #[test]
    fn test_click_ignored_when_removal_disabled() {
        let mut sim = empty(EdgePolicy::BounceBoth);
        sim.settings.click_removal = false;
        let id = sim.spawn_disk(Vec2::new(100.0, 100.0), Vec2::new(0.0, 0.5), 20.0, Rgb::new(0, 0, 0)).unwrap();
        let input = TickInput {
            clicks: vec![Vec2::new(100.0, 100.0)],
        };

        let report = tick(&mut sim, &input, 0, &mut DrawList::new());
        assert!(report.removed.is_empty());
        assert!(sim.disk(id).is_some());
    }

    #[test]
    fn test_flash_restores_after_delay() {
        let mut sim = empty(EdgePolicy::BounceBoth);
        let id = sim.spawn_disk(Vec2::new(100.0, 100.0), Vec2::new(0.5, 0.0), 20.0, Rgb::new(7, 7, 7)).unwrap();
        let mut surface = DrawList::new();

        tick(&mut sim, &TickInput::default(), 1_000, &mut surface);
        sim.flash(id);
        tick(&mut sim, &TickInput::default(), 1_050, &mut surface);
        sim.flash(id);
        sim.flash(id);
        assert_eq!(sim.disk(id).unwrap().color, FLASH_COLOR);

        // First restoration fires at 1100, the later ones at 1150
        let report = tick(&mut sim, &TickInput::default(), 1_150, &mut surface);
        assert_eq!(report.restored, 3);
        assert_eq!(sim.disk(id).unwrap().color, Rgb::new(7, 7, 7));
        assert_eq!(sim.pending_timers(), 0);
    }

    #[test]
    fn test_flash_visible_for_one_frame_before_restore() {
        let mut sim = empty(EdgePolicy::BounceBoth);
        // Moving together, so they stay overlapping
        sim.spawn_disk(Vec2::new(300.0, 300.0), Vec2::new(0.0, 0.5), 6.0, Rgb::new(1, 1, 1)).unwrap();
        sim.spawn_disk(Vec2::new(305.0, 300.0), Vec2::new(0.0, 0.5), 6.0, Rgb::new(2, 2, 2)).unwrap();
        let mut surface = DrawList::new();

        tick(&mut sim, &TickInput::default(), 0, &mut surface);
        surface.commands.clear();
        tick(&mut sim, &TickInput::default(), 16, &mut surface);

        // Still flashed when drawn on the next frame
        assert!(surface.commands.iter().any(|c| matches!(
            c,
            DrawCommand::Disk { color, .. } if *color == FLASH_COLOR
        )));
    }

    #[test]
    fn test_colliding_not_sticky() {
        let mut sim = empty(EdgePolicy::BounceBoth);
        // Approaching; the reversal sends them apart again
        let a = sim.spawn_disk(Vec2::new(300.0, 300.0), Vec2::new(5.0, 0.0), 10.0, Rgb::new(1, 1, 1)).unwrap();
        let b = sim.spawn_disk(Vec2::new(325.0, 300.0), Vec2::new(-5.0, 0.0), 10.0, Rgb::new(2, 2, 2)).unwrap();
        let mut surface = DrawList::new();

        let report = tick(&mut sim, &TickInput::default(), 0, &mut surface);
        assert_eq!(report.collisions.len(), 1);

        tick(&mut sim, &TickInput::default(), 16, &mut surface);
        tick(&mut sim, &TickInput::default(), 32, &mut surface);
        assert!(!sim.disk(a).unwrap().colliding);
        assert!(!sim.disk(b).unwrap().colliding);
    }

    #[test]
    fn test_radius_constant_over_many_ticks() {
        let mut sim = Simulation::new(Settings::with_policy(EdgePolicy::UpwardRespawn), view(), 4242).unwrap();
        let radii: Vec<f32> = sim.disks().iter().map(|d| d.radius()).collect();
        let mut surface = DrawList::new();

        for t in 0..2_000u64 {
            tick(&mut sim, &TickInput::default(), t * 16, &mut surface);
            surface.commands.clear();
        }
        assert_eq!(sim.disks().iter().map(|d| d.radius()).collect::<Vec<_>>(), radii);
        assert_eq!(sim.disks().len(), 10);
    }

    #[test]
    fn test_upward_respawn_reported() {
        let mut sim = empty(EdgePolicy::UpwardRespawn);
        let id = sim.spawn_disk(Vec2::new(400.0, 22.0), Vec2::new(0.0, -4.0), 20.0, Rgb::new(3, 3, 3)).unwrap();

        let report = tick(&mut sim, &TickInput::default(), 0, &mut DrawList::new());
        assert_eq!(report.respawned, vec![id]);
        assert_eq!(sim.disk(id).unwrap().pos.y, 600.0 - 20.0 - 1.0);
    }

    #[test]
    fn test_determinism() {
        let mut sim1 = Simulation::new(Settings::default(), view(), 99999).unwrap();
        let mut sim2 = Simulation::new(Settings::default(), view(), 99999).unwrap();
        let mut s1 = DrawList::new();
        let mut s2 = DrawList::new();

        for t in 0..500u64 {
            let r1 = tick(&mut sim1, &TickInput::default(), t * 16, &mut s1);
            let r2 = tick(&mut sim2, &TickInput::default(), t * 16, &mut s2);
            assert_eq!(r1, r2);
        }
        assert_eq!(s1.commands, s2.commands);
    }
}
