//! Spatial state component with lazy recomputation.
//!
//! [`Transform`] stores an entity's authored position, size, rotation, scale
//! and anchor, and derives the pixel-space `actual_position`, `actual_size`
//! and axis-aligned [`Bounding`] box from them. Setters never recompute
//! anything; they only mark a [`DirtyFlags`] bit. The
//! [`flush_transforms`](crate::systems::flush_transforms::flush_transforms)
//! system performs one deterministic recompute pass per step, parents before
//! children, so every downstream system reads a consistent bounding box.
//!
//! Positions and sizes are [`Coord`] values: a 2D vector tagged with the
//! coordinate space it is authored in. Resolution to pixels happens only at
//! flush time, so screen resizes or parent changes are picked up by simply
//! re-flagging the transform.

use bevy_ecs::prelude::Component;
use glam::Vec2;
use log::error;

/// Coordinate space a [`Coord`] is authored in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CoordSpace {
    /// Absolute pixels.
    Pixels,
    /// Fraction of the screen size (0.0 to 1.0 covers the full screen).
    Normalized,
    /// World-tile units, multiplied by the configured tile size.
    Tiles,
    /// Fraction of the parent's bounding box. Falls back to pixels when the
    /// entity has no parent with a transform.
    Relative,
}

/// A 2D coordinate tagged with its [`CoordSpace`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Coord {
    pub x: f32,
    pub y: f32,
    pub space: CoordSpace,
}

impl Coord {
    pub fn pixels(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            space: CoordSpace::Pixels,
        }
    }

    pub fn normalized(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            space: CoordSpace::Normalized,
        }
    }

    pub fn tiles(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            space: CoordSpace::Tiles,
        }
    }

    pub fn relative(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            space: CoordSpace::Relative,
        }
    }

    /// Resolve to pixels against the given screen and tile sizes.
    ///
    /// `Relative` coords resolve against the parent bounding box instead,
    /// which only the flush pass knows; here they pass through unchanged.
    pub(crate) fn resolve(&self, screen: Vec2, tile_size: f32) -> Vec2 {
        match self.space {
            CoordSpace::Pixels | CoordSpace::Relative => Vec2::new(self.x, self.y),
            CoordSpace::Normalized => Vec2::new(self.x * screen.x, self.y * screen.y),
            CoordSpace::Tiles => Vec2::new(self.x * tile_size, self.y * tile_size),
        }
    }
}

/// Pending invalidations on a [`Transform`].
///
/// A set bit means the matching derived value is stale and will be
/// recomputed on the next flush pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DirtyFlags(u8);

impl DirtyFlags {
    pub const POSITION: DirtyFlags = DirtyFlags(1);
    pub const SIZE: DirtyFlags = DirtyFlags(1 << 1);
    pub const ROTATION: DirtyFlags = DirtyFlags(1 << 2);

    pub const fn empty() -> Self {
        DirtyFlags(0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: DirtyFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: DirtyFlags) {
        self.0 |= other.0;
    }

    pub fn union(self, other: DirtyFlags) -> DirtyFlags {
        DirtyFlags(self.0 | other.0)
    }

    pub fn intersection(self, other: DirtyFlags) -> DirtyFlags {
        DirtyFlags(self.0 & other.0)
    }
}

/// Axis-aligned bounding box in pixels: top-left corner plus extent.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Bounding {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Bounding {
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.w, self.y + self.h)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.w
            && point.y >= self.y
            && point.y <= self.y + self.h
    }
}

/// Authored spatial state plus lazily derived pixel-space values.
///
/// Mutations go through the setters, which only flag the matching
/// [`DirtyFlags`] bit; derived accessors ([`bounding`](Self::bounding),
/// [`actual_position`](Self::actual_position), ...) reflect the state as of
/// the most recent flush.
#[derive(Component, Clone, Debug)]
pub struct Transform {
    position: Coord,
    size: Coord,
    rotation: f32,
    scale: Vec2,
    anchor: Vec2,
    /// Pixel-space displacement accumulated by [`translate`](Self::translate),
    /// applied on top of the authored position. Reset by `set_position`.
    translation: Vec2,
    flags: DirtyFlags,
    actual_position: Vec2,
    actual_size: Vec2,
    bounding: Bounding,
}

impl Transform {
    /// Create a transform at `position` with `size`.
    ///
    /// Starts SIZE-dirty so the first flush computes everything (a size
    /// recompute always forces a position recompute).
    pub fn new(position: Coord, size: Coord) -> Self {
        Self {
            position,
            size,
            rotation: 0.0,
            scale: Vec2::ONE,
            anchor: Vec2::ZERO,
            translation: Vec2::ZERO,
            flags: DirtyFlags::SIZE,
            actual_position: Vec2::ZERO,
            actual_size: Vec2::ZERO,
            bounding: Bounding::default(),
        }
    }

    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self.flags.insert(DirtyFlags::ROTATION);
        self
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_anchor(mut self, anchor: Vec2) -> Self {
        self.set_anchor(anchor);
        self
    }

    pub fn position(&self) -> Coord {
        self.position
    }

    pub fn set_position(&mut self, position: Coord) {
        self.position = position;
        self.translation = Vec2::ZERO;
        self.flags.insert(DirtyFlags::POSITION);
    }

    /// Shift the entity by `delta` pixels, on top of the authored position.
    pub fn translate(&mut self, delta: Vec2) {
        self.translation += delta;
        self.flags.insert(DirtyFlags::POSITION);
    }

    pub fn size(&self) -> Coord {
        self.size
    }

    pub fn set_size(&mut self, size: Coord) {
        self.size = size;
        self.flags.insert(DirtyFlags::SIZE);
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn set_rotation(&mut self, degrees: f32) {
        self.rotation = degrees;
        self.flags.insert(DirtyFlags::ROTATION);
    }

    /// Add `degrees` to the current rotation.
    pub fn rotate(&mut self, degrees: f32) {
        self.rotation += degrees;
        self.flags.insert(DirtyFlags::ROTATION);
    }

    pub fn scale(&self) -> Vec2 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: Vec2) {
        self.scale = scale;
        self.flags.insert(DirtyFlags::SIZE);
    }

    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    /// Set the anchor pivot. Each axis must lie in `0.0..=1.0`; out-of-range
    /// anchors are rejected and the prior anchor is kept.
    pub fn set_anchor(&mut self, anchor: Vec2) {
        if !(0.0..=1.0).contains(&anchor.x) || !(0.0..=1.0).contains(&anchor.y) {
            error!(
                "Anchor must be between (0, 0) and (1, 1), got ({}, {})",
                anchor.x, anchor.y
            );
            return;
        }

        self.anchor = anchor;
        self.flags.insert(DirtyFlags::POSITION);
    }

    /// Pixel-space top-left position as of the last flush.
    pub fn actual_position(&self) -> Vec2 {
        self.actual_position
    }

    /// Pixel-space size as of the last flush.
    pub fn actual_size(&self) -> Vec2 {
        self.actual_size
    }

    /// Axis-aligned bounding box as of the last flush.
    pub fn bounding(&self) -> Bounding {
        self.bounding
    }

    /// World-space center of the bounding box.
    pub fn center(&self) -> Vec2 {
        self.bounding.center()
    }

    /// Whether `point` (pixels) falls inside the bounding box.
    pub fn is_point_inside(&self, point: Vec2) -> bool {
        self.bounding.contains(point)
    }

    pub fn is_dirty(&self) -> bool {
        !self.flags.is_empty()
    }

    pub(crate) fn flags(&self) -> DirtyFlags {
        self.flags
    }

    /// OR a parent's pending POSITION/SIZE bits into this transform, so a
    /// parent change cascades to children within the same flush pass.
    pub(crate) fn inherit(&mut self, parent_flags: DirtyFlags) {
        self.flags.insert(
            parent_flags.intersection(DirtyFlags::POSITION.union(DirtyFlags::SIZE)),
        );
    }

    /// Recompute derived values from the pending dirty bits and clear them.
    ///
    /// SIZE is handled before POSITION because the anchor offset depends on
    /// the actual size. Returns the bits that were pending, so the caller can
    /// cascade to children and refresh dependent components; an empty result
    /// means this was a no-op.
    pub(crate) fn flush(
        &mut self,
        parent: Option<Bounding>,
        screen: Vec2,
        tile_size: f32,
    ) -> DirtyFlags {
        let pending = self.flags;
        if pending.is_empty() {
            return pending;
        }

        let mut recompute_position = pending.contains(DirtyFlags::POSITION);

        if pending.contains(DirtyFlags::SIZE) {
            let raw = match (self.size.space, parent) {
                (CoordSpace::Relative, Some(p)) => Vec2::new(self.size.x * p.w, self.size.y * p.h),
                _ => self.size.resolve(screen, tile_size),
            };
            self.actual_size = raw * self.scale;
            recompute_position = true;
        }

        if recompute_position {
            let origin = match (self.position.space, parent) {
                (CoordSpace::Relative, Some(p)) => {
                    Vec2::new(p.x + p.w * self.position.x, p.y + p.h * self.position.y)
                }
                _ => self.position.resolve(screen, tile_size),
            } + self.translation;

            self.actual_position = origin - self.actual_size * self.anchor;
            self.bounding = Bounding {
                x: self.actual_position.x,
                y: self.actual_position.y,
                w: self.actual_size.x,
                h: self.actual_size.y,
            };
        }

        self.flags = DirtyFlags::empty();
        pending
    }
}
