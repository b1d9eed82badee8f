//! Choropleth state: palette, population table, legend and the map widget.

mod legend;
mod palette;
mod population;
mod widget;

pub use legend::{Legend, LegendEntry};
pub use palette::{
    gradient_color, gradient_index, PaletteIndex, COLORS, PALETTE_LEN, POPULATION_LABELS,
    TREATMENT_LABELS,
};
pub use population::{PopulationTable, NUM_REGIONS, POPULATION};
pub use widget::{
    AppState, ClickOutcome, MapMode, MapWidget, RegionDescriptor, RegionId, RegionState, TableRow,
    PLACEHOLDER,
};
