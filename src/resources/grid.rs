//! Broad-phase spatial hash grid.
//!
//! The grid buckets collidable entities into fixed-size square cells spanned
//! by their bounding boxes. Only entities sharing at least one cell become
//! candidate pairs for the narrow phase, bounding pair-test cost by local
//! density instead of total entity count. The grid is rebuilt from scratch
//! every step; insertion is O(cells spanned) per entity.

use bevy_ecs::prelude::{Entity, Resource};
use rustc_hash::FxHashMap;

use crate::components::transform::Bounding;
use crate::resources::config::DEFAULT_CELL_SIZE;

/// Cell coordinate, `floor(pixel / cell_size)` per axis.
pub type GridCell = (i32, i32);

/// Spatial hash over fixed-size square cells.
#[derive(Resource, Debug)]
pub struct SpatialGrid {
    cell_size: f32,
    cells: FxHashMap<GridCell, Vec<Entity>>,
}

impl Default for SpatialGrid {
    fn default() -> Self {
        Self::new(DEFAULT_CELL_SIZE)
    }
}

impl SpatialGrid {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(1.0),
            cells: FxHashMap::default(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Change the cell size. Takes effect on the next rebuild; sizes below
    /// one pixel are clamped.
    pub fn set_cell_size(&mut self, cell_size: f32) {
        self.cell_size = cell_size.max(1.0);
    }

    /// Drop all buckets, keeping the map allocation.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Inclusive cell range spanned by a bounding box.
    pub fn cell_span(&self, bounding: Bounding) -> (GridCell, GridCell) {
        let min_x = (bounding.x / self.cell_size).floor() as i32;
        let min_y = (bounding.y / self.cell_size).floor() as i32;
        let max_x = ((bounding.x + bounding.w) / self.cell_size).floor() as i32;
        let max_y = ((bounding.y + bounding.h) / self.cell_size).floor() as i32;
        ((min_x, min_y), (max_x, max_y))
    }

    /// Insert an entity into every cell its bounding box spans.
    pub fn insert(&mut self, entity: Entity, bounding: Bounding) {
        let ((min_x, min_y), (max_x, max_y)) = self.cell_span(bounding);

        for x in min_x..=max_x {
            for y in min_y..=max_y {
                self.cells.entry((x, y)).or_default().push(entity);
            }
        }
    }

    /// Iterate over the occupied cell buckets.
    pub fn buckets(&self) -> impl Iterator<Item = &[Entity]> {
        self.cells.values().map(|bucket| bucket.as_slice())
    }

    /// Number of occupied cells.
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }
}
