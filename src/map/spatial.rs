use std::collections::HashMap;

use super::geometry::Bounds;

/// Cells per axis across the full extent when picking a cell size
const TARGET_CELLS: f64 = 32.0;

/// Bounding-box grid over region shapes.
/// Each region is inserted into every cell its bbox overlaps, so a lookup
/// never misses a region; false positives are removed by the caller's exact
/// polygon test.
pub struct RegionGrid {
    cells: HashMap<(i32, i32), Vec<usize>>,
    cell_size: f64,
}

impl RegionGrid {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cells: HashMap::new(),
            cell_size: cell_size.max(1e-6),
        }
    }

    /// Cell size that splits `extent` into roughly `TARGET_CELLS` per axis
    pub fn cell_size_for(extent: &Bounds) -> f64 {
        if extent.is_empty() {
            return 1.0;
        }
        let span = (extent.max_lon - extent.min_lon).max(extent.max_lat - extent.min_lat);
        (span / TARGET_CELLS).max(1e-6)
    }

    #[inline(always)]
    fn to_cell(&self, lon: f64, lat: f64) -> (i32, i32) {
        let x = (lon / self.cell_size).floor() as i32;
        let y = (lat / self.cell_size).floor() as i32;
        (x, y)
    }

    /// Index region bboxes; the region's position in the iterator is its key
    pub fn build<'a>(bboxes: impl Iterator<Item = &'a Bounds>, cell_size: f64) -> Self {
        let mut grid = Self::new(cell_size);
        for (idx, bounds) in bboxes.enumerate() {
            grid.insert(idx, bounds);
        }
        grid
    }

    pub fn insert(&mut self, idx: usize, bounds: &Bounds) {
        if bounds.is_empty() {
            return;
        }
        let min_cell = self.to_cell(bounds.min_lon, bounds.min_lat);
        let max_cell = self.to_cell(bounds.max_lon, bounds.max_lat);
        for y in min_cell.1..=max_cell.1 {
            for x in min_cell.0..=max_cell.0 {
                self.cells.entry((x, y)).or_default().push(idx);
            }
        }
    }

    /// Candidate regions whose bbox may contain the point
    #[inline(always)]
    pub fn candidates(&self, lon: f64, lat: f64) -> &[usize] {
        self.cells
            .get(&self.to_cell(lon, lat))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Bounds {
        Bounds {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    #[test]
    fn test_candidates() {
        let boxes = [bbox(0.0, 0.0, 1.0, 1.0), bbox(2.0, 2.0, 3.0, 3.0)];
        let grid = RegionGrid::build(boxes.iter(), 0.5);
        assert_eq!(grid.candidates(0.7, 0.2), &[0]);
        assert_eq!(grid.candidates(2.6, 2.9), &[1]);
        assert!(grid.candidates(1.7, 1.7).is_empty());
    }

    #[test]
    fn test_overlapping_boxes_share_cells() {
        let boxes = [bbox(0.0, 0.0, 2.0, 2.0), bbox(1.0, 1.0, 3.0, 3.0)];
        let grid = RegionGrid::build(boxes.iter(), 0.5);
        assert_eq!(grid.candidates(1.5, 1.5), &[0, 1]);
    }

    #[test]
    fn test_cell_size_for_extent() {
        let size = RegionGrid::cell_size_for(&bbox(-15.0, 7.0, -7.0, 12.0));
        assert!((size - 0.25).abs() < 1e-9);
        assert_eq!(RegionGrid::cell_size_for(&Bounds::EMPTY), 1.0);
    }
}
