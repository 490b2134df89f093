//! Frame driver
//!
//! Hosts call [`Scheduler::frame`] once per display refresh with their own
//! clock (the web host from `requestAnimationFrame`), or hand control to
//! [`Scheduler::run_paced`] on native. Clicks are queued here and applied
//! by the next tick, never while one is running.

use std::ops::ControlFlow;

use glam::Vec2;

use crate::render::RenderSurface;
use crate::sim::{Millis, Simulation, TickInput, TickReport, tick};

/// Owns the simulation, its surface and pending input
pub struct Scheduler<S: RenderSurface> {
    sim: Simulation,
    surface: S,
    input: TickInput,
    frames: u64,
    collisions: u64,
}

impl<S: RenderSurface> Scheduler<S> {
    pub fn new(sim: Simulation, surface: S) -> Self {
        Self {
            sim,
            surface,
            input: TickInput::default(),
            frames: 0,
            collisions: 0,
        }
    }

    /// Queue a click for the next frame
    pub fn click(&mut self, point: Vec2) {
        self.input.click(point);
    }

    /// Run one tick at host time `now`
    pub fn frame(&mut self, now: Millis) -> TickReport {
        let report = tick(&mut self.sim, &self.input, now, &mut self.surface);

        // Clear one-shot inputs after processing
        self.input.clear();
        self.frames += 1;
        self.collisions += report.collisions.len() as u64;

        if !report.removed.is_empty() {
            log::info!(
                "Removed {} disk(s), {} left",
                report.removed.len(),
                self.sim.disks().len()
            );
        }
        report
    }

    /// Tick at roughly `interval` until `host` breaks
    ///
    /// `host` runs after every frame to present the surface and collect
    /// input. The simulation never stops on its own.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn run_paced<F>(&mut self, interval: std::time::Duration, mut host: F)
    where
        F: FnMut(&mut Self) -> ControlFlow<()>,
    {
        use std::time::Instant;

        let start = Instant::now();
        let mut next = start;
        loop {
            let now = start.elapsed().as_millis() as Millis;
            self.frame(now);
            if host(self).is_break() {
                log::info!(
                    "Host stopped after {} frames, {} collisions",
                    self.frames,
                    self.collisions
                );
                return;
            }

            next += interval;
            let after = Instant::now();
            if next > after {
                std::thread::sleep(next - after);
            } else {
                // Fell behind; don't try to catch up
                next = after;
            }
        }
    }

    pub fn sim(&self) -> &Simulation {
        &self.sim
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
