use rayon::prelude::*;

use crate::braille::BrailleCanvas;
use crate::choropleth::RegionId;
use crate::map::geometry::{draw_line, point_in_rings, Bounds, Ring};
use crate::map::projection::Viewport;
use crate::map::spatial::RegionGrid;

/// Polygon rings of one region, with cached bounds
#[derive(Clone, Debug)]
pub struct RegionShape {
    pub rings: Vec<Ring>,
    pub bounds: Bounds,
}

impl RegionShape {
    pub fn new(rings: Vec<Ring>) -> Self {
        let bounds = Bounds::of_rings(&rings);
        Self { rings, bounds }
    }

    #[inline(always)]
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        self.bounds.contains(lon, lat) && point_in_rings(&self.rings, lon, lat)
    }
}

/// Display settings for map layers
#[derive(Clone, Debug)]
pub struct DisplaySettings {
    pub show_outlines: bool,
    pub show_labels: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_outlines: true,
            show_labels: true,
        }
    }
}

/// Everything needed to draw one frame of the map
pub struct MapLayers {
    /// Region under each character cell, row-major
    pub fills: Vec<Option<RegionId>>,
    /// Outlines of all regions
    pub outlines: BrailleCanvas,
    /// Outline of the selected region only
    pub highlight: BrailleCanvas,
    pub width: usize,
}

impl MapLayers {
    pub fn fill_at(&self, cx: usize, cy: usize) -> Option<RegionId> {
        if cx >= self.width {
            return None;
        }
        self.fills.get(cy * self.width + cx).copied().flatten()
    }
}

/// Region shapes indexed in the same order as the widget's region handles
pub struct MapRenderer {
    shapes: Vec<RegionShape>,
    grid: RegionGrid,
    extent: Bounds,
    pub settings: DisplaySettings,
}

impl MapRenderer {
    pub fn new(shapes: Vec<RegionShape>) -> Self {
        let extent = shapes
            .iter()
            .fold(Bounds::EMPTY, |acc, s| acc.union(&s.bounds));
        let grid = RegionGrid::build(
            shapes.iter().map(|s| &s.bounds),
            RegionGrid::cell_size_for(&extent),
        );
        Self {
            shapes,
            grid,
            extent,
            settings: DisplaySettings::default(),
        }
    }

    /// Bounds of every shape
    pub fn extent(&self) -> &Bounds {
        &self.extent
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn shape(&self, region: RegionId) -> Option<&RegionShape> {
        self.shapes.get(region.0)
    }

    /// Region containing a geographic point. Later shapes win on overlap.
    pub fn region_at(&self, lon: f64, lat: f64) -> Option<RegionId> {
        self.grid
            .candidates(lon, lat)
            .iter()
            .rev()
            .copied()
            .find(|&idx| self.shapes[idx].contains(lon, lat))
            .map(RegionId)
    }

    /// Rasterize fills and outlines for a `width` x `height` character area
    pub fn render(
        &self,
        width: usize,
        height: usize,
        viewport: &Viewport,
        selected: Option<RegionId>,
    ) -> MapLayers {
        // Sample each cell at its center; a cell is 2x4 braille pixels
        let fills: Vec<Option<RegionId>> = (0..height)
            .into_par_iter()
            .map(|cy| {
                (0..width)
                    .map(|cx| {
                        let px = cx as f64 * 2.0 + 1.0;
                        let py = cy as f64 * 4.0 + 2.0;
                        let (lon, lat) = viewport.unproject_f(px, py);
                        self.region_at(lon, lat)
                    })
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>()
            .concat();

        let mut outlines = BrailleCanvas::new(width, height);
        if self.settings.show_outlines {
            for shape in &self.shapes {
                for ring in &shape.rings {
                    draw_ring(&mut outlines, ring, viewport);
                }
            }
        }

        let mut highlight = BrailleCanvas::new(width, height);
        if let Some(shape) = selected.and_then(|id| self.shape(id)) {
            for ring in &shape.rings {
                draw_ring(&mut highlight, ring, viewport);
            }
        }

        MapLayers {
            fills,
            outlines,
            highlight,
            width,
        }
    }

    /// Collect centered name labels for regions wide enough to hold them
    pub fn labels<'a>(
        &self,
        names: impl Iterator<Item = &'a str>,
        width: usize,
        height: usize,
        viewport: &Viewport,
    ) -> Vec<(u16, u16, String)> {
        if !self.settings.show_labels {
            return Vec::new();
        }

        let mut labels = Vec::new();
        for (shape, name) in self.shapes.iter().zip(names) {
            let (x0, _) = viewport.project(shape.bounds.min_lon, shape.bounds.max_lat);
            let (x1, _) = viewport.project(shape.bounds.max_lon, shape.bounds.min_lat);
            let span_chars = ((x1 - x0) / 2).max(0) as usize;
            let len = name.chars().count();
            if len + 1 > span_chars {
                continue;
            }

            let (lon, lat) = shape.bounds.center();
            let (px, py) = viewport.project(lon, lat);
            let col = px / 2 - len as i32 / 2;
            let row = py / 4;
            if col < 0 || row < 0 {
                continue;
            }
            let (col, row) = (col as usize, row as usize);
            if col + len <= width && row < height {
                labels.push((col as u16, row as u16, name.to_string()));
            }
        }
        labels
    }

    pub fn toggle_outlines(&mut self) {
        self.settings.show_outlines = !self.settings.show_outlines;
    }

    pub fn toggle_labels(&mut self) {
        self.settings.show_labels = !self.settings.show_labels;
    }
}

/// Draw a closed ring with viewport culling
fn draw_ring(canvas: &mut BrailleCanvas, ring: &Ring, viewport: &Viewport) {
    if ring.len() < 2 {
        return;
    }

    let mut prev: Option<(i32, i32)> = None;

    for &(lon, lat) in ring.iter().chain(ring.first()) {
        let (px, py) = viewport.project(lon, lat);

        if let Some((prev_x, prev_y)) = prev {
            if viewport.line_might_be_visible((prev_x, prev_y), (px, py)) {
                draw_line(canvas, prev_x, prev_y, px, py);
            }
        }

        prev = Some((px, py));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(lon: f64, lat: f64) -> RegionShape {
        RegionShape::new(vec![vec![
            (lon, lat),
            (lon + 1.0, lat),
            (lon + 1.0, lat + 1.0),
            (lon, lat + 1.0),
        ]])
    }

    fn two_tiles() -> MapRenderer {
        MapRenderer::new(vec![tile(-12.0, 9.0), tile(-10.0, 9.0)])
    }

    #[test]
    fn test_region_at() {
        let renderer = two_tiles();
        assert_eq!(renderer.region_at(-11.5, 9.5), Some(RegionId(0)));
        assert_eq!(renderer.region_at(-9.5, 9.5), Some(RegionId(1)));
        assert_eq!(renderer.region_at(-10.5, 9.5), None);
        assert_eq!(renderer.region_at(0.0, 0.0), None);
    }

    #[test]
    fn test_extent() {
        let renderer = two_tiles();
        let extent = renderer.extent();
        assert_eq!(extent.min_lon, -12.0);
        assert_eq!(extent.max_lon, -9.0);
        assert_eq!(extent.max_lat, 10.0);
    }

    #[test]
    fn test_render_fills_both_regions() {
        let renderer = two_tiles();
        let viewport = Viewport::fit(renderer.extent(), 80, 40);
        let layers = renderer.render(40, 10, &viewport, None);

        assert_eq!(layers.fills.len(), 400);
        assert!(layers.fills.contains(&Some(RegionId(0))));
        assert!(layers.fills.contains(&Some(RegionId(1))));
        assert!(layers.fills.contains(&None));
        // Left tile is drawn left of the right tile
        let row = 5;
        let first = (0..40).find(|&cx| layers.fill_at(cx, row) == Some(RegionId(0)));
        let second = (0..40).find(|&cx| layers.fill_at(cx, row) == Some(RegionId(1)));
        assert!(first < second);
    }

    #[test]
    fn test_highlight_only_for_selection() {
        let renderer = two_tiles();
        let viewport = Viewport::fit(renderer.extent(), 80, 40);

        let none = renderer.render(40, 10, &viewport, None);
        assert!((0..10).all(|cy| (0..40).all(|cx| none.highlight.glyph(cx, cy).is_none())));

        let some = renderer.render(40, 10, &viewport, Some(RegionId(1)));
        let lit: Vec<usize> = (0..10)
            .flat_map(|cy| (0..40).map(move |cx| (cx, cy)))
            .filter(|&(cx, cy)| some.highlight.glyph(cx, cy).is_some())
            .map(|(cx, _)| cx)
            .collect();
        assert!(!lit.is_empty());
        // Right tile's outline stays in the right half
        assert!(lit.iter().all(|&cx| cx >= 20));
    }

    #[test]
    fn test_outlines_toggle() {
        let mut renderer = two_tiles();
        renderer.toggle_outlines();
        let viewport = Viewport::fit(renderer.extent(), 80, 40);
        let layers = renderer.render(40, 10, &viewport, None);
        assert!((0..10).all(|cy| (0..40).all(|cx| layers.outlines.glyph(cx, cy).is_none())));
    }

    #[test]
    fn test_labels_fit_inside_area() {
        let renderer = MapRenderer::new(vec![tile(-12.0, 9.0)]);
        let viewport = Viewport::fit(renderer.extent(), 80, 40);
        let labels = renderer.labels(["Kindia"].into_iter(), 40, 10, &viewport);
        assert_eq!(labels.len(), 1);
        let (col, row, text) = &labels[0];
        assert_eq!(text, "Kindia");
        assert!((*col as usize) + 6 <= 40);
        assert!(*row < 10);

        let too_long = renderer.labels(["A name far wider than the tile"].into_iter(), 40, 10, &viewport);
        assert!(too_long.is_empty());
    }
}
