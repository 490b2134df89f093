//! Errors raised while setting up a simulation
//!
//! Loading settings, constructing the simulation and placing disks by hand
//! can fail; ticking cannot.

use std::fmt;

#[derive(Debug)]
pub enum SimError {
    /// A settings field is outside its usable range
    InvalidSetting {
        field: &'static str,
        reason: &'static str,
    },

    /// The largest disk cannot be placed fully inside the viewport
    ViewportTooSmall {
        width: f32,
        height: f32,
        max_radius: f32,
    },

    /// Viewport extents are not finite
    InvalidViewport { width: f32, height: f32 },

    /// A hand-placed disk was rejected
    InvalidDisk { reason: &'static str },

    /// Settings JSON could not be parsed
    Parse(serde_json::Error),

    /// Settings file could not be read
    Io {
        path: String,
        source: std::io::Error,
    },
}

impl SimError {
    pub(crate) fn invalid(field: &'static str, reason: &'static str) -> Self {
        SimError::InvalidSetting { field, reason }
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidSetting { field, reason } => {
                write!(f, "invalid setting '{}': {}", field, reason)
            }
            SimError::ViewportTooSmall {
                width,
                height,
                max_radius,
            } => write!(
                f,
                "viewport {}x{} cannot fit a disk of radius {}",
                width, height, max_radius
            ),
            SimError::InvalidViewport { width, height } => {
                write!(f, "viewport {}x{} is not finite", width, height)
            }
            SimError::InvalidDisk { reason } => write!(f, "invalid disk: {}", reason),
            SimError::Parse(e) => write!(f, "could not parse settings: {}", e),
            SimError::Io { path, source } => {
                write!(f, "could not read settings from {}: {}", path, source)
            }
        }
    }
}

impl std::error::Error for SimError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimError::Parse(e) => Some(e),
            SimError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SimError {
    fn from(e: serde_json::Error) -> Self {
        SimError::Parse(e)
    }
}
