//! Simulation context
//!
//! Owns everything a tick touches: the live disks, viewport, settings, RNG,
//! deferred-task queue and clock. Nothing lives in globals.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::bounds::Viewport;
use super::color::Rgb;
use super::disk::{Disk, DiskId};
use super::timer::{DeferredTask, Millis, TimerQueue};
use crate::consts::{LABEL_PREFIX, RESPAWN_GAP};
use crate::error::SimError;
use crate::settings::{EdgePolicy, Settings};

/// Complete simulation state
#[derive(Debug)]
pub struct Simulation {
    pub settings: Settings,
    pub viewport: Viewport,
    /// Seed the RNG was created from
    pub seed: u64,
    /// Live disks, in draw and sweep order
    disks: Vec<Disk>,
    rng: Pcg32,
    timers: TimerQueue,
    /// Host time of the latest tick
    now: Millis,
    /// Ticks run so far
    pub time_ticks: u64,
    next_id: u32,
}

impl Simulation {
    /// Validate the setup and spawn `settings.disk_count` disks
    pub fn new(settings: Settings, viewport: Viewport, seed: u64) -> Result<Self, SimError> {
        settings.validate()?;
        if !viewport.width.is_finite() || !viewport.height.is_finite() {
            return Err(SimError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        let needed = 2.0 * settings.radius_max;
        let needed_y = match settings.edge_policy {
            EdgePolicy::BounceBoth => needed,
            EdgePolicy::UpwardRespawn => needed + RESPAWN_GAP,
        };
        if !(viewport.width >= needed && viewport.height >= needed_y) {
            return Err(SimError::ViewportTooSmall {
                width: viewport.width,
                height: viewport.height,
                max_radius: settings.radius_max,
            });
        }

        let mut sim = Self::empty(settings, viewport, seed);
        for _ in 0..sim.settings.disk_count {
            let disk = sim.random_disk();
            sim.disks.push(disk);
        }

        log::info!(
            "Simulation created: {} disks, {:?}, viewport {}x{}, seed {}",
            sim.disks.len(),
            sim.settings.edge_policy,
            viewport.width,
            viewport.height,
            seed
        );
        Ok(sim)
    }

    /// A simulation with no disks; callers place their own
    pub fn empty(settings: Settings, viewport: Viewport, seed: u64) -> Self {
        Self {
            settings,
            viewport,
            seed,
            disks: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            timers: TimerQueue::new(),
            now: 0,
            time_ticks: 0,
            next_id: 1,
        }
    }

    /// Allocate a new disk ID
    fn next_disk_id(&mut self) -> DiskId {
        let id = DiskId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a disk built by the caller
    ///
    /// Setup only: rejected once the first tick has run, since the live
    /// collection never grows. The base speed is the larger velocity
    /// component and must be positive.
    pub fn spawn_disk(
        &mut self,
        pos: Vec2,
        vel: Vec2,
        radius: f32,
        color: Rgb,
    ) -> Result<DiskId, SimError> {
        if self.time_ticks > 0 {
            return Err(SimError::InvalidDisk {
                reason: "simulation already running",
            });
        }
        if !(radius > 0.0) || !radius.is_finite() {
            return Err(SimError::InvalidDisk {
                reason: "radius must be positive and finite",
            });
        }
        let base_speed = vel.x.abs().max(vel.y.abs());
        if !(base_speed > 0.0) || !vel.is_finite() {
            return Err(SimError::InvalidDisk {
                reason: "velocity must be non-zero and finite",
            });
        }

        let id = self.next_disk_id();
        let label = format!("{}{}", LABEL_PREFIX, id.0);
        self.disks
            .push(Disk::new(id, pos, vel, radius, base_speed, color, label));
        Ok(id)
    }

    fn random_disk(&mut self) -> Disk {
        let id = self.next_disk_id();
        let s = &self.settings;
        let radius = self.rng.random_range(s.radius_min..s.radius_max);
        let speed = self.rng.random_range(s.speed_min..s.speed_max);
        let color = Rgb::random(&mut self.rng);
        let x = self.viewport.random_x(radius, &mut self.rng);
        let sign_x = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };

        let (pos, vel) = match s.edge_policy {
            EdgePolicy::BounceBoth => {
                let y = self.viewport.random_y(radius, &mut self.rng);
                let sign_y = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
                (Vec2::new(x, y), Vec2::new(sign_x * speed, sign_y * speed))
            }
            EdgePolicy::UpwardRespawn => (
                Vec2::new(x, self.viewport.respawn_y(radius)),
                Vec2::new(sign_x * speed, -speed),
            ),
        };

        let label = format!("{}{}", LABEL_PREFIX, id.0);
        Disk::new(id, pos, vel, radius, speed, color, label)
    }

    pub fn disks(&self) -> &[Disk] {
        &self.disks
    }

    pub fn disk(&self, id: DiskId) -> Option<&Disk> {
        self.disks.iter().find(|d| d.id == id)
    }

    #[inline]
    pub fn now(&self) -> Millis {
        self.now
    }

    /// Move the clock forward; host clocks that step backward are ignored
    pub(crate) fn set_now(&mut self, now: Millis) {
        self.now = self.now.max(now);
    }

    /// Flash the disk with `id` using the configured duration
    pub fn flash(&mut self, id: DiskId) -> bool {
        let (now, duration) = (self.now, self.settings.flash_ms);
        match self.disks.iter_mut().find(|d| d.id == id) {
            Some(disk) => {
                disk.flash(&mut self.timers, now, duration);
                true
            }
            None => false,
        }
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Run deferred tasks that are due; returns how many touched a live disk
    pub(crate) fn run_due_timers(&mut self) -> usize {
        let mut applied = 0;
        for task in self.timers.drain_due(self.now) {
            match task {
                DeferredTask::RestoreColor { disk } => {
                    // Target may have been removed since the flash
                    if let Some(d) = self.disks.iter_mut().find(|d| d.id == disk) {
                        d.restore_color();
                        applied += 1;
                    }
                }
            }
        }
        applied
    }

    /// Remove every disk containing `point`, returns the removed IDs
    pub fn remove_at(&mut self, point: Vec2) -> Vec<DiskId> {
        let mut removed = Vec::new();
        self.disks.retain(|d| {
            if d.hit_test(point) {
                removed.push(d.id);
                false
            } else {
                true
            }
        });
        removed
    }

    /// Split borrows for the edge pass
    pub(crate) fn edge_parts(&mut self) -> (&mut [Disk], &mut Pcg32) {
        (&mut self.disks, &mut self.rng)
    }

    /// Split borrows for the collision sweep
    pub(crate) fn sweep_parts(&mut self) -> (&mut [Disk], &mut TimerQueue, Millis, Millis) {
        (&mut self.disks, &mut self.timers, self.now, self.settings.flash_ms)
    }
}
