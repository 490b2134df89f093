//! Retained draw commands

use glam::Vec2;

use super::RenderSurface;
use crate::sim::Rgb;

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Disk {
        pos: Vec2,
        radius: f32,
        color: Rgb,
        label: String,
    },
}

/// Surface that records calls instead of drawing
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Labels of disks drawn since the last clear, in draw order
    pub fn drawn_labels(&self) -> Vec<&str> {
        let start = self
            .commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::Clear))
            .map_or(0, |i| i + 1);
        self.commands[start..]
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Disk { label, .. } => Some(label.as_str()),
                DrawCommand::Clear => None,
            })
            .collect()
    }

    /// Number of clears recorded, i.e. frames drawn
    pub fn frames(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Clear))
            .count()
    }
}

impl RenderSurface for DrawList {
    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn draw_disk(&mut self, center: Vec2, radius: f32, color: Rgb, label: &str) {
        self.commands.push(DrawCommand::Disk {
            pos: center,
            radius,
            color,
            label: label.to_string(),
        });
    }
}
