//! Physics tuning resource.
//!
//! All engine-tunable constants of the collision and physics core live here:
//! broad-phase cell size, epsilon thresholds, penetration slop, positional
//! correction factor, global velocity damping, and the default restitution.
//! Values can be overridden from an INI configuration file; missing keys
//! retain their defaults.
//!
//! # Configuration File Format
//!
//! ```ini
//! [grid]
//! cell_size = 60.0
//! tile_size = 32.0
//!
//! [physics]
//! damping = 0.8
//! velocity_epsilon = 0.01
//! angular_epsilon = 0.01
//! penetration_slop = 0.05
//! penetration_correction = 1.0
//! impulse_epsilon = 0.001
//! default_restitution = 0.5
//! ```

use bevy_ecs::prelude::Resource;
use configparser::ini::Ini;
use log::info;

/// Default safe values.
pub const DEFAULT_CELL_SIZE: f32 = 60.0;
pub const DEFAULT_TILE_SIZE: f32 = 32.0;
pub const DEFAULT_DAMPING: f32 = 0.8;
pub const DEFAULT_VELOCITY_EPSILON: f32 = 0.01;
pub const DEFAULT_ANGULAR_EPSILON: f32 = 0.01;
pub const DEFAULT_PENETRATION_SLOP: f32 = 0.05;
pub const DEFAULT_PENETRATION_CORRECTION: f32 = 1.0;
pub const DEFAULT_IMPULSE_EPSILON: f32 = 0.001;
pub const DEFAULT_RESTITUTION: f32 = 0.5;

/// Physics configuration resource.
///
/// Inserted with defaults by [`init_physics`](crate::step::init_physics);
/// call [`load_from_file`](Self::load_from_file) before the first step to
/// override values from disk.
#[derive(Resource, Debug, Clone)]
pub struct PhysicsConfig {
    /// Broad-phase grid cell size in pixels.
    pub cell_size: f32,
    /// Pixel size of one world tile, for tile-space coordinates.
    pub tile_size: f32,
    /// Global velocity damping coefficient, applied per second.
    pub damping: f32,
    /// Below this speed, velocities snap to zero. Also the threshold under
    /// which decayed forces are dropped from the queue.
    pub velocity_epsilon: f32,
    /// Below this angular speed (radians per second), spin snaps to zero.
    pub angular_epsilon: f32,
    /// Overlaps at most this deep are left unresolved to avoid jitter.
    pub penetration_slop: f32,
    /// Fraction of the penetration corrected positionally each step.
    pub penetration_correction: f32,
    /// Approach speeds slower than this produce no collision impulse.
    pub impulse_epsilon: f32,
    /// Restitution assigned to bodies that do not specify one.
    pub default_restitution: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            tile_size: DEFAULT_TILE_SIZE,
            damping: DEFAULT_DAMPING,
            velocity_epsilon: DEFAULT_VELOCITY_EPSILON,
            angular_epsilon: DEFAULT_ANGULAR_EPSILON,
            penetration_slop: DEFAULT_PENETRATION_SLOP,
            penetration_correction: DEFAULT_PENETRATION_CORRECTION,
            impulse_epsilon: DEFAULT_IMPULSE_EPSILON,
            default_restitution: DEFAULT_RESTITUTION,
        }
    }
}

impl PhysicsConfig {
    /// Load configuration from an INI file.
    ///
    /// Missing values retain their current values. Returns an error if the
    /// file cannot be read or parsed.
    pub fn load_from_file(&mut self, path: &str) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        // [grid] section
        if let Some(value) = config.getfloat("grid", "cell_size").ok().flatten() {
            self.cell_size = value as f32;
        }
        if let Some(value) = config.getfloat("grid", "tile_size").ok().flatten() {
            self.tile_size = value as f32;
        }

        // [physics] section
        if let Some(value) = config.getfloat("physics", "damping").ok().flatten() {
            self.damping = value as f32;
        }
        if let Some(value) = config.getfloat("physics", "velocity_epsilon").ok().flatten() {
            self.velocity_epsilon = value as f32;
        }
        if let Some(value) = config.getfloat("physics", "angular_epsilon").ok().flatten() {
            self.angular_epsilon = value as f32;
        }
        if let Some(value) = config.getfloat("physics", "penetration_slop").ok().flatten() {
            self.penetration_slop = value as f32;
        }
        if let Some(value) = config
            .getfloat("physics", "penetration_correction")
            .ok()
            .flatten()
        {
            self.penetration_correction = value as f32;
        }
        if let Some(value) = config.getfloat("physics", "impulse_epsilon").ok().flatten() {
            self.impulse_epsilon = value as f32;
        }
        if let Some(value) = config
            .getfloat("physics", "default_restitution")
            .ok()
            .flatten()
        {
            self.default_restitution = value as f32;
        }

        info!(
            "Loaded physics config: cell_size={}, damping={}, slop={}, correction={}",
            self.cell_size, self.damping, self.penetration_slop, self.penetration_correction
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let config = PhysicsConfig::default();
        assert_eq!(config.cell_size, DEFAULT_CELL_SIZE);
        assert_eq!(config.damping, DEFAULT_DAMPING);
        assert_eq!(config.penetration_slop, DEFAULT_PENETRATION_SLOP);
        assert_eq!(config.default_restitution, DEFAULT_RESTITUTION);
    }

    #[test]
    fn missing_file_is_an_error() {
        let mut config = PhysicsConfig::default();
        assert!(config.load_from_file("/nonexistent/physics.ini").is_err());
        // Defaults survive the failed load.
        assert_eq!(config.cell_size, DEFAULT_CELL_SIZE);
    }
}
