use std::f64::consts::PI;

use super::geometry::Bounds;

const MIN_ZOOM: f64 = 0.5;
const MAX_ZOOM: f64 = 5000.0;
/// Fraction of the canvas a fitted map occupies
const FIT_MARGIN: f64 = 0.92;

/// Viewport representing the visible map area and zoom level
#[derive(Clone, Debug)]
pub struct Viewport {
    /// Center longitude (-180 to 180)
    pub center_lon: f64,
    /// Center latitude (-85 to 85)
    pub center_lat: f64,
    /// Zoom level (1.0 = whole world across the canvas width)
    pub zoom: f64,
    /// Canvas pixel width
    pub width: usize,
    /// Canvas pixel height
    pub height: usize,
}

/// Normalized Web Mercator x in [0, 1]
#[inline(always)]
fn mercator_x(lon: f64) -> f64 {
    (lon + 180.0) / 360.0
}

/// Normalized Web Mercator y in [0, 1], north at 0
#[inline(always)]
fn mercator_y(lat: f64) -> f64 {
    let lat_rad = lat.to_radians();
    (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0
}

/// Latitude for a normalized Web Mercator y
#[inline(always)]
fn inverse_mercator_y(y: f64) -> f64 {
    (PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees()
}

impl Viewport {
    pub fn new(center_lon: f64, center_lat: f64, zoom: f64, width: usize, height: usize) -> Self {
        Self {
            center_lon,
            center_lat,
            zoom,
            width,
            height,
        }
    }

    /// Center on `bounds` and zoom so they fill the canvas
    pub fn fit(bounds: &Bounds, width: usize, height: usize) -> Self {
        let mut vp = Self::new(0.0, 0.0, 1.0, width, height);
        vp.fit_bounds(bounds);
        vp
    }

    pub fn fit_bounds(&mut self, bounds: &Bounds) {
        if bounds.is_empty() || self.width == 0 || self.height == 0 {
            return;
        }

        let (lon, lat) = bounds.center();
        self.center_lon = lon;
        self.center_lat = lat.clamp(-85.0, 85.0);

        let span_x = (mercator_x(bounds.max_lon) - mercator_x(bounds.min_lon)).max(1e-9);
        let span_y = (mercator_y(bounds.min_lat) - mercator_y(bounds.max_lat)).max(1e-9);

        // Projected extent is span * zoom * width on both axes
        let zoom_x = 1.0 / span_x;
        let zoom_y = self.height as f64 / (self.width as f64 * span_y);
        self.zoom = (zoom_x.min(zoom_y) * FIT_MARGIN).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Resize the canvas, keeping center and zoom
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    /// Pan the viewport by pixel delta
    pub fn pan(&mut self, dx: i32, dy: i32) {
        if self.width == 0 {
            return;
        }
        let scale = self.zoom * self.width as f64;
        self.center_lon = (mercator_x(self.center_lon) + dx as f64 / scale) * 360.0 - 180.0;
        let y = mercator_y(self.center_lat) + dy as f64 / scale;
        self.center_lat = inverse_mercator_y(y);

        // Wrap longitude
        if self.center_lon > 180.0 {
            self.center_lon -= 360.0;
        } else if self.center_lon < -180.0 {
            self.center_lon += 360.0;
        }

        self.center_lat = self.center_lat.clamp(-85.0, 85.0);
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * 1.5).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / 1.5).max(MIN_ZOOM);
    }

    /// Zoom in towards a specific pixel location
    pub fn zoom_in_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.5);
    }

    /// Zoom out from a specific pixel location
    pub fn zoom_out_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.0 / 1.5);
    }

    /// Zoom by factor, keeping the point under (px, py) fixed
    fn zoom_at(&mut self, px: i32, py: i32, factor: f64) {
        let (lon, lat) = self.unproject(px, py);

        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);

        let (new_px, new_py) = self.project(lon, lat);
        self.pan(new_px - px, new_py - py);
    }

    /// Unproject pixel coordinates back to geographic coordinates (lon, lat)
    pub fn unproject(&self, px: i32, py: i32) -> (f64, f64) {
        self.unproject_f(px as f64, py as f64)
    }

    /// Unproject fractional pixel coordinates; used for cell-center sampling
    pub fn unproject_f(&self, px: f64, py: f64) -> (f64, f64) {
        let scale = self.zoom * self.width as f64;

        let x = (px - self.width as f64 / 2.0) / scale + mercator_x(self.center_lon);
        let y = (py - self.height as f64 / 2.0) / scale + mercator_y(self.center_lat);

        (x * 360.0 - 180.0, inverse_mercator_y(y))
    }

    /// Project a geographic coordinate (lon, lat) to pixel coordinates
    pub fn project(&self, lon: f64, lat: f64) -> (i32, i32) {
        let scale = self.zoom * self.width as f64;

        let px = (mercator_x(lon) - mercator_x(self.center_lon)) * scale + self.width as f64 / 2.0;
        let py = (mercator_y(lat) - mercator_y(self.center_lat)) * scale + self.height as f64 / 2.0;

        (px as i32, py as i32)
    }

    /// Check if a line segment might be visible (rough bounding box check)
    pub fn line_might_be_visible(&self, p1: (i32, i32), p2: (i32, i32)) -> bool {
        let min_x = p1.0.min(p2.0);
        let max_x = p1.0.max(p2.0);
        let min_y = p1.1.min(p2.1);
        let max_y = p1.1.max(p2.1);

        max_x >= 0 && min_x < self.width as i32 && max_y >= 0 && min_y < self.height as i32
    }
}
