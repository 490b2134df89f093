//! Render surfaces
//!
//! The simulation only ever calls [`RenderSurface`]. Hosts plug in whatever
//! actually puts pixels (or characters) on screen.

pub mod draw_list;
pub mod text;

pub use draw_list::{DrawCommand, DrawList};
pub use text::{Cell, TextSurface};

use glam::Vec2;

use crate::sim::Rgb;

/// Something a tick can draw onto
pub trait RenderSurface {
    /// Wipe the whole surface
    fn clear(&mut self);

    /// Stroke a circle outline in `color` and center `label` on it
    fn draw_disk(&mut self, center: Vec2, radius: f32, color: Rgb, label: &str);
}
