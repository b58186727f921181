//! Events emitted by the physics systems.
//!
//! Submodules overview:
//! - [`collision`] – edge-triggered collision begin/end notifications

pub mod collision;
