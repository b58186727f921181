//! ECS components for entities.
//!
//! Submodules overview:
//! - [`collider`] – oriented rectangular collider with cached vertices/axes
//! - [`physicsbody`] – mass, velocity, and queued forces/impulses
//! - [`transform`] – position/size/rotation/scale/anchor with dirty-flagged
//!   lazy recomputation of the bounding box

pub mod collider;
pub mod physicsbody;
pub mod transform;
