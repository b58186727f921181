//! Screen size resource.
//!
//! Stores the current framebuffer dimensions in pixels. Normalized-space
//! coordinates resolve against this during the transform flush, so a resize
//! only needs updated values here plus re-flagged transforms.

use bevy_ecs::prelude::Resource;
use glam::Vec2;

/// Current screen size in pixels.
#[derive(Resource, Clone, Copy)]
pub struct ScreenSize {
    /// Width in pixels.
    pub w: i32,
    /// Height in pixels.
    pub h: i32,
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self { w: 640, h: 360 }
    }
}

impl ScreenSize {
    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.w as f32, self.h as f32)
    }
}
