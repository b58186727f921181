//! ECS resources shared by the physics systems.
//!
//! Submodules overview:
//! - [`config`] – engine-tunable physics constants, loadable from INI
//! - [`contacts`] – this step's collision pairs plus the previous pair set
//! - [`grid`] – broad-phase spatial hash grid
//! - [`groups`] – named collision groups and their collidability matrix
//! - [`screensize`] – framebuffer size for normalized-coordinate resolution
//! - [`worldtime`] – per-step delta and elapsed simulation time

pub mod config;
pub mod contacts;
pub mod grid;
pub mod groups;
pub mod screensize;
pub mod worldtime;
