use super::palette::{PaletteIndex, POPULATION_LABELS, TREATMENT_LABELS};
use super::widget::MapMode;

/// One color swatch with its label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegendEntry {
    pub index: PaletteIndex,
    pub label: &'static str,
}

impl LegendEntry {
    pub fn hex(&self) -> &'static str {
        self.index.hex()
    }
}

/// Color-to-label mapping for one map mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Legend {
    pub mode: MapMode,
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    /// Build the six swatches for `mode`
    pub fn for_mode(mode: MapMode) -> Self {
        let labels = match mode {
            MapMode::Treatment => &TREATMENT_LABELS,
            MapMode::Population => &POPULATION_LABELS,
        };
        let entries = PaletteIndex::all()
            .zip(labels.iter())
            .map(|(index, &label)| LegendEntry { index, label })
            .collect();
        Self { mode, entries }
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            MapMode::Treatment => " Treatment Centers ",
            MapMode::Population => " Population ",
        }
    }
}
