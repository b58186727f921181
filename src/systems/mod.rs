//! Physics systems, in the order they run within a step.
//!
//! Submodules overview:
//! - [`flush_transforms`] – recompute dirty transforms, parents before
//!   children, and refresh collider geometry
//! - [`collision`] – broad-phase grid rebuild, SAT narrow phase, and
//!   begin/end event emission
//! - [`movement`] – integrate queued forces/impulses into velocity and
//!   position
//! - [`resolve`] – positional correction and impulse exchange for this
//!   step's collision set

pub mod collision;
pub mod flush_transforms;
pub mod movement;
pub mod resolve;
