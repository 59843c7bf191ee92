//! Uniform spatial hash used for the broad phase and render culling
//!
//! The cell size tracks the largest body diameter seen so far. With that
//! sizing, two overlapping bodies always have center cells at most one cell
//! apart on each axis, so a 3x3 lookup around a body's center cell finds
//! every body it can touch.
//!
//! The grid stores slots into the world's body list. It is cleared and
//! rebuilt by [`SpatialGrid::rehash_all`]; any change to the body list must be
//! followed by a rehash before the next query.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::vector::Vector2;

/// Integer grid cell coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: i64,
    pub y: i64,
}

impl CellCoord {
    /// Cell containing a world-space point
    #[inline]
    pub fn containing(p: Vector2, cell_size: f64) -> Self {
        Self {
            x: (p.x / cell_size).floor() as i64,
            y: (p.y / cell_size).floor() as i64,
        }
    }

    /// World-space position of the cell's top-left corner
    #[inline]
    pub fn origin(&self, cell_size: f64) -> Vector2 {
        Vector2::new(self.x as f64 * cell_size, self.y as f64 * cell_size)
    }
}

/// Axis-aligned world rectangle (min inclusive, max inclusive)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldRect {
    pub min: Vector2,
    pub max: Vector2,
}

impl WorldRect {
    pub fn from_origin_size(origin: Vector2, size: Vector2) -> Self {
        Self {
            min: origin,
            max: origin + size,
        }
    }
}

/// Grid line positions covering a rectangle, for the debug overlay
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridLines {
    /// World x of each vertical line
    pub xs: Vec<f64>,
    /// World y of each horizontal line
    pub ys: Vec<f64>,
}

const NEIGHBOR_OFFSETS: [(i64, i64); 9] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (0, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f64,
    cells: FxHashMap<CellCoord, Vec<usize>>,
}

impl SpatialGrid {
    /// Create an empty grid. Panics if `cell_size` is not positive and finite.
    pub fn new(cell_size: f64) -> Self {
        assert_valid_cell_size(cell_size);
        Self {
            cell_size,
            cells: FxHashMap::default(),
        }
    }

    #[inline]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Grow the cell size to `diameter` if it is larger than the current one.
    ///
    /// Returns true when the size changed; the caller must rehash before the
    /// next query since stored memberships are stale.
    pub fn grow_to(&mut self, diameter: f64) -> bool {
        if diameter > self.cell_size {
            assert_valid_cell_size(diameter);
            log::info!("Grid cell size {} -> {}", self.cell_size, diameter);
            self.cell_size = diameter;
            true
        } else {
            false
        }
    }

    /// Force a cell size (used when the body list is cleared)
    pub(crate) fn reset_cell_size(&mut self, cell_size: f64) {
        assert_valid_cell_size(cell_size);
        self.cell_size = cell_size;
    }

    /// Clear every cell and re-insert all bodies at their current positions
    pub fn rehash_all(&mut self, bodies: &mut [Body]) {
        self.cells.clear();
        for (slot, body) in bodies.iter_mut().enumerate() {
            body.cells = body.occupied_cells(self.cell_size);
            for &cell in &body.cells {
                self.cells.entry(cell).or_default().push(slot);
            }
        }
    }

    /// Slots stored in a cell
    pub fn contents(&self, cell: CellCoord) -> &[usize] {
        self.cells.get(&cell).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Cells holding at least one body
    pub fn occupied(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.cells.keys().copied()
    }

    /// Broad-phase candidates for `bodies[slot]`: every other body stored in
    /// the 3x3 block around its center cell. Sorted, no duplicates.
    pub fn neighbors(&self, slot: usize, bodies: &[Body]) -> Vec<usize> {
        let center = CellCoord::containing(bodies[slot].pos, self.cell_size);

        let mut found = Vec::new();
        for (dx, dy) in NEIGHBOR_OFFSETS {
            // Saturated coordinates collapse onto the edge cell
            let cell = CellCoord {
                x: center.x.saturating_add(dx),
                y: center.y.saturating_add(dy),
            };
            found.extend(self.contents(cell).iter().copied().filter(|&s| s != slot));
        }
        found.sort_unstable();
        found.dedup();
        found
    }

    /// Every body stored in a cell that overlaps `rect`. Sorted, no duplicates.
    pub fn query_rect(&self, rect: WorldRect) -> Vec<usize> {
        let min = CellCoord::containing(rect.min, self.cell_size);
        let max = CellCoord::containing(rect.max, self.cell_size);

        let mut found = Vec::new();
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                found.extend_from_slice(self.contents(CellCoord { x, y }));
            }
        }
        found.sort_unstable();
        found.dedup();
        found
    }

    /// Grid line positions visible inside `rect`
    pub fn grid_lines(&self, rect: WorldRect) -> GridLines {
        let s = self.cell_size;
        let lines = |lo: f64, hi: f64| -> Vec<f64> {
            let start = (lo / s).floor() as i64;
            let end = (hi / s).ceil() as i64;
            (start..end).map(|i| i as f64 * s).collect()
        };
        GridLines {
            xs: lines(rect.min.x, rect.max.x),
            ys: lines(rect.min.y, rect.max.y),
        }
    }
}

#[inline]
fn assert_valid_cell_size(cell_size: f64) {
    assert!(
        cell_size > 0.0 && cell_size.is_finite(),
        "grid cell size must be positive and finite, got {cell_size}"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::{BodyId, Color};
    use crate::sim::collision::overlaps;
    use proptest::prelude::*;

    fn make_bodies(specs: &[(f64, f64, f64)]) -> Vec<Body> {
        specs
            .iter()
            .enumerate()
            .map(|(i, &(x, y, r))| {
                Body::new(BodyId(i as u32 + 1), Vector2::new(x, y), r, Color::WHITE, 1.5).unwrap()
            })
            .collect()
    }

    fn max_diameter(bodies: &[Body]) -> f64 {
        bodies.iter().map(Body::diameter).fold(0.0, f64::max)
    }

    #[test]
    #[should_panic]
    fn test_zero_cell_size_panics() {
        SpatialGrid::new(0.0);
    }

    #[test]
    fn test_neighbors_at_coordinate_limit() {
        // Both centers land in the saturated cell x = i64::MAX
        let mut bodies = make_bodies(&[(1e300, 0.0, 10.0), (1e300, 15.0, 10.0)]);
        let mut grid = SpatialGrid::new(50.0);
        grid.rehash_all(&mut bodies);
        assert_eq!(grid.neighbors(0, &bodies), vec![1]);
        assert_eq!(grid.neighbors(1, &bodies), vec![0]);
    }

    #[test]
    fn test_grow_only_grows() {
        let mut grid = SpatialGrid::new(50.0);
        assert!(!grid.grow_to(20.0));
        assert_eq!(grid.cell_size(), 50.0);
        assert!(grid.grow_to(300.0));
        assert_eq!(grid.cell_size(), 300.0);
    }

    #[test]
    fn test_rehash_drops_stale_entries() {
        let mut bodies = make_bodies(&[(25.0, 25.0, 10.0)]);
        let mut grid = SpatialGrid::new(50.0);
        grid.rehash_all(&mut bodies);
        assert_eq!(grid.contents(CellCoord { x: 0, y: 0 }), &[0]);

        bodies[0].pos = Vector2::new(525.0, 25.0);
        grid.rehash_all(&mut bodies);
        assert!(grid.contents(CellCoord { x: 0, y: 0 }).is_empty());
        assert_eq!(grid.contents(CellCoord { x: 10, y: 0 }), &[0]);
        assert_eq!(grid.occupied().count(), 1);
    }

    #[test]
    fn test_neighbors_excludes_self_and_far_bodies() {
        let mut bodies = make_bodies(&[
            (25.0, 25.0, 10.0),
            (60.0, 25.0, 10.0),
            (25.0, 70.0, 25.0),
            (1000.0, 1000.0, 10.0),
        ]);
        let mut grid = SpatialGrid::new(max_diameter(&bodies));
        grid.rehash_all(&mut bodies);

        let n = grid.neighbors(0, &bodies);
        assert_eq!(n, vec![1, 2]);
    }

    #[test]
    fn test_neighbors_deduplicates_large_bodies() {
        // The large body spans many cells around the small one
        let mut bodies = make_bodies(&[(0.0, 0.0, 5.0), (0.0, 0.0, 100.0)]);
        let mut grid = SpatialGrid::new(10.0);
        grid.rehash_all(&mut bodies);
        assert_eq!(grid.neighbors(0, &bodies), vec![1]);
    }

    #[test]
    fn test_empty_grid_queries() {
        let bodies = make_bodies(&[(0.0, 0.0, 5.0)]);
        let grid = SpatialGrid::new(10.0);
        assert!(grid.neighbors(0, &bodies).is_empty());
        let rect = WorldRect::from_origin_size(Vector2::ZERO, Vector2::new(100.0, 100.0));
        assert!(grid.query_rect(rect).is_empty());
    }

    #[test]
    fn test_query_rect_includes_edge_overlap() {
        // Center is off-screen to the left, edge pokes into the viewport
        let mut bodies = make_bodies(&[(-8.0, 50.0, 10.0), (-500.0, 50.0, 10.0)]);
        let mut grid = SpatialGrid::new(20.0);
        grid.rehash_all(&mut bodies);

        let rect = WorldRect::from_origin_size(Vector2::ZERO, Vector2::new(200.0, 100.0));
        assert_eq!(grid.query_rect(rect), vec![0]);
    }

    #[test]
    fn test_grid_lines() {
        let grid = SpatialGrid::new(50.0);
        let rect = WorldRect::from_origin_size(Vector2::new(-20.0, 0.0), Vector2::new(100.0, 50.0));
        let lines = grid.grid_lines(rect);
        assert_eq!(lines.xs, vec![-50.0, 0.0, 50.0]);
        assert_eq!(lines.ys, vec![0.0]);
    }

    fn arb_bodies() -> impl Strategy<Value = Vec<(f64, f64, f64)>> {
        prop::collection::vec((-400.0..400.0f64, -400.0..400.0f64, 1.0..60.0f64), 1..40)
    }

    proptest! {
        #[test]
        fn prop_rehash_is_complete(specs in arb_bodies()) {
            let mut bodies = make_bodies(&specs);
            let mut grid = SpatialGrid::new(max_diameter(&bodies));
            grid.rehash_all(&mut bodies);

            for (slot, body) in bodies.iter().enumerate() {
                for cell in body.occupied_cells(grid.cell_size()) {
                    prop_assert!(grid.contents(cell).contains(&slot));
                }
            }
        }

        #[test]
        fn prop_neighbors_are_sound(specs in arb_bodies()) {
            let mut bodies = make_bodies(&specs);
            let mut grid = SpatialGrid::new(max_diameter(&bodies));
            grid.rehash_all(&mut bodies);

            for a in 0..bodies.len() {
                let candidates = grid.neighbors(a, &bodies);
                for b in 0..bodies.len() {
                    if a != b && overlaps(&bodies[a], &bodies[b]) {
                        prop_assert!(candidates.contains(&b), "missed pair {} {}", a, b);
                    }
                }
            }
        }
    }
}
