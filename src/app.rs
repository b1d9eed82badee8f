use ratatui::layout::Rect;
use tracing::debug;

use crate::choropleth::{ClickOutcome, MapMode, MapWidget, PopulationTable, RegionId};
use crate::data::RegionFeature;
use crate::error::ChoroplethError;
use crate::map::{MapRenderer, Viewport};
use crate::ui;

/// Application state
pub struct App {
    pub viewport: Viewport,
    pub widget: MapWidget,
    pub renderer: MapRenderer,
    pub should_quit: bool,
    /// Last mouse position for drag tracking
    pub last_mouse: Option<(u16, u16)>,
    /// Whether the current press has moved (a drag, not a click)
    dragged: bool,
    /// Current mouse position for hover info
    pub mouse_pos: Option<(u16, u16)>,
    /// Side-table row the keyboard points at
    pub cursor: usize,
    /// Inner map area in terminal cells
    map_area: Rect,
}

impl App {
    /// Split regions into widget state and shapes sharing one index order
    pub fn new(
        regions: Vec<RegionFeature>,
        population: PopulationTable,
        width: u16,
        height: u16,
    ) -> Result<Self, ChoroplethError> {
        let (descriptors, shapes): (Vec<_>, Vec<_>) = regions
            .into_iter()
            .map(|r| (r.descriptor, r.shape))
            .unzip();

        let widget = MapWidget::initialize(descriptors, population)?;
        let renderer = MapRenderer::new(shapes);

        let map_area = ui::map_inner_area(Rect::new(0, 0, width, height));
        let viewport = Viewport::fit(
            renderer.extent(),
            map_area.width as usize * 2,
            map_area.height as usize * 4,
        );

        Ok(Self {
            viewport,
            widget,
            renderer,
            should_quit: false,
            last_mouse: None,
            dragged: false,
            mouse_pos: None,
            cursor: 0,
            map_area,
        })
    }

    pub fn set_mode(&mut self, mode: MapMode) {
        match mode {
            MapMode::Treatment => self.widget.switch_to_treatment_map(),
            MapMode::Population => self.widget.switch_to_population_map(),
        }
    }

    /// Update map area when the terminal resizes
    pub fn resize(&mut self, width: u16, height: u16) {
        self.map_area = ui::map_inner_area(Rect::new(0, 0, width, height));
        self.viewport.resize(
            self.map_area.width as usize * 2,
            self.map_area.height as usize * 4,
        );
    }

    pub fn map_area(&self) -> Rect {
        self.map_area
    }

    /// Fit all regions back into view
    pub fn refit(&mut self) {
        self.viewport.fit_bounds(self.renderer.extent());
    }

    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.viewport.pan(dx, dy);
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    /// Zoom in towards a screen position (terminal column/row)
    pub fn zoom_in_at(&mut self, col: u16, row: u16) {
        if let Some((px, py)) = self.cell_to_pixel(col, row) {
            self.viewport.zoom_in_at(px, py);
        }
    }

    /// Zoom out from a screen position (terminal column/row)
    pub fn zoom_out_at(&mut self, col: u16, row: u16) {
        if let Some((px, py)) = self.cell_to_pixel(col, row) {
            self.viewport.zoom_out_at(px, py);
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Braille pixel at the center of a terminal cell, if it is on the map
    fn cell_to_pixel(&self, col: u16, row: u16) -> Option<(i32, i32)> {
        let area = self.map_area;
        let inside = col >= area.x
            && col < area.x + area.width
            && row >= area.y
            && row < area.y + area.height;
        inside.then(|| {
            (
                (col - area.x) as i32 * 2 + 1,
                (row - area.y) as i32 * 4 + 2,
            )
        })
    }

    /// Region drawn at a terminal cell
    pub fn region_at_cell(&self, col: u16, row: u16) -> Option<RegionId> {
        let (px, py) = self.cell_to_pixel(col, row)?;
        let (lon, lat) = self.viewport.unproject(px, py);
        self.renderer.region_at(lon, lat)
    }

    /// Click whatever region is under a terminal cell
    pub fn click_at(&mut self, col: u16, row: u16) -> ClickOutcome {
        match self.region_at_cell(col, row) {
            Some(region) => self.click(region),
            None => ClickOutcome::Ignored,
        }
    }

    fn click(&mut self, region: RegionId) -> ClickOutcome {
        let outcome = self.widget.on_region_click(region);
        if let ClickOutcome::Updated { .. } = outcome {
            self.cursor = region.0;
        }
        outcome
    }

    /// Mouse button pressed: start of a click or a drag
    pub fn mouse_down(&mut self, col: u16, row: u16) {
        self.last_mouse = Some((col, row));
        self.dragged = false;
    }

    /// Pan with the mouse; the map follows the pointer
    pub fn handle_drag(&mut self, col: u16, row: u16) {
        if let Some((last_x, last_y)) = self.last_mouse {
            if (last_x, last_y) != (col, row) {
                let dx = last_x as i32 - col as i32;
                let dy = last_y as i32 - row as i32;
                self.pan(dx * 2, dy * 4);
                self.dragged = true;
            }
        }
        self.last_mouse = Some((col, row));
    }

    /// Mouse button released: a press that never moved is a click
    pub fn mouse_up(&mut self, col: u16, row: u16) -> ClickOutcome {
        let was_click = self.last_mouse.is_some() && !self.dragged;
        self.last_mouse = None;
        self.dragged = false;
        if was_click {
            let outcome = self.click_at(col, row);
            debug!(col, row, ?outcome, "map click");
            outcome
        } else {
            ClickOutcome::Ignored
        }
    }

    pub fn set_mouse_pos(&mut self, col: u16, row: u16) {
        self.mouse_pos = Some((col, row));
    }

    /// Region under the mouse pointer
    pub fn hovered_region(&self) -> Option<RegionId> {
        let (col, row) = self.mouse_pos?;
        self.region_at_cell(col, row)
    }

    pub fn cursor_next(&mut self) {
        if !self.widget.is_empty() {
            self.cursor = (self.cursor + 1) % self.widget.len();
        }
    }

    pub fn cursor_prev(&mut self) {
        if !self.widget.is_empty() {
            self.cursor = (self.cursor + self.widget.len() - 1) % self.widget.len();
        }
    }

    /// Click the region the table cursor points at
    pub fn click_cursor(&mut self) -> ClickOutcome {
        if self.cursor < self.widget.len() {
            self.click(RegionId(self.cursor))
        } else {
            ClickOutcome::Ignored
        }
    }

    pub fn zoom_level(&self) -> String {
        format!("{:.1}x", self.viewport.zoom)
    }

    pub fn center_coords(&self) -> String {
        format!(
            "{:.2}°{}, {:.2}°{}",
            self.viewport.center_lat.abs(),
            if self.viewport.center_lat >= 0.0 { "N" } else { "S" },
            self.viewport.center_lon.abs(),
            if self.viewport.center_lon >= 0.0 { "E" } else { "W" }
        )
    }
}
