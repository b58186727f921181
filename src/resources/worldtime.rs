//! Simulation time resource.
//!
//! Updated once per step by the step driver with the delta supplied by the
//! surrounding frame loop; every physics system reads its `delta` for
//! integration and decay.

use bevy_ecs::prelude::Resource;

#[derive(Resource, Clone, Copy)]
pub struct WorldTime {
    /// Seconds of simulation time accumulated so far.
    pub elapsed: f32,
    /// Scaled seconds since the previous step.
    pub delta: f32,
    /// Multiplier applied to incoming deltas (1.0 = real time).
    pub time_scale: f32,
    /// Steps run so far.
    pub frame_count: u64,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
            frame_count: 0,
        }
    }
}

impl WorldTime {
    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale;
        self
    }
}
