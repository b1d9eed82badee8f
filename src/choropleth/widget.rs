use std::collections::HashMap;

use tracing::{debug, info};

use super::legend::Legend;
use super::palette::{gradient_index, PaletteIndex, PALETTE_LEN};
use super::population::PopulationTable;
use crate::error::ChoroplethError;

/// Text shown in the unused middle column of the side table
pub const PLACEHOLDER: &str = "-";

/// Region identity supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionDescriptor {
    pub id: String,
    pub name: String,
}

impl RegionDescriptor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Handle to a registered region; its index in registration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub usize);

/// Which quantity the fills show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapMode {
    #[default]
    Treatment,
    Population,
}

/// Per-region state
#[derive(Debug, Clone)]
pub struct RegionState {
    pub id: String,
    pub name: String,
    pub population: u32,
    /// Always in `[0, PALETTE_LEN)`
    pub treatment_centers: u8,
    /// Palette entry currently painted on the shape
    pub fill: PaletteIndex,
}

/// Mutable widget state. Lives as long as the widget.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub mode: MapMode,
    pub selected: Option<RegionId>,
    pub regions: Vec<RegionState>,
    index: HashMap<String, RegionId>,
}

impl AppState {
    pub fn is_population_map(&self) -> bool {
        self.mode == MapMode::Population
    }
}

/// Result of a click on a region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Population mode, or a handle the widget never issued
    Ignored,
    Updated { count: u8 },
}

/// One line of the side table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow<'a> {
    pub region: RegionId,
    pub id: &'a str,
    pub name: &'a str,
    pub placeholder: &'static str,
    pub count: u8,
    pub selected: bool,
}

/// Region registry, click handling and mode switching for the choropleth
pub struct MapWidget {
    state: AppState,
    population: PopulationTable,
    legend: Legend,
}

impl MapWidget {
    /// Register every region with zero treatment centers.
    ///
    /// Handles are issued in descriptor order. Fails if a name is missing
    /// from `population` or an id repeats.
    pub fn initialize(
        descriptors: impl IntoIterator<Item = RegionDescriptor>,
        population: PopulationTable,
    ) -> Result<Self, ChoroplethError> {
        let mut state = AppState::default();

        for RegionDescriptor { id, name } in descriptors {
            let Some(pop) = population.get(&name) else {
                return Err(ChoroplethError::UnknownRegionName { id, name });
            };
            if state.index.contains_key(&id) {
                return Err(ChoroplethError::DuplicateRegionId(id));
            }

            let handle = RegionId(state.regions.len());
            state.index.insert(id.clone(), handle);
            state.regions.push(RegionState {
                id,
                name,
                population: pop,
                treatment_centers: 0,
                fill: PaletteIndex::FIRST,
            });
        }

        info!(regions = state.regions.len(), "map widget initialized");

        Ok(Self {
            state,
            population,
            legend: Legend::for_mode(MapMode::Treatment),
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn mode(&self) -> MapMode {
        self.state.mode
    }

    pub fn is_population_map(&self) -> bool {
        self.state.is_population_map()
    }

    pub fn selected(&self) -> Option<RegionId> {
        self.state.selected
    }

    pub fn legend(&self) -> &Legend {
        &self.legend
    }

    pub fn len(&self) -> usize {
        self.state.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.regions.is_empty()
    }

    pub fn region(&self, region: RegionId) -> Option<&RegionState> {
        self.state.regions.get(region.0)
    }

    pub fn region_id(&self, id: &str) -> Option<RegionId> {
        self.state.index.get(id).copied()
    }

    /// Palette entry currently painted on `region`
    pub fn fill(&self, region: RegionId) -> Option<PaletteIndex> {
        self.region(region).map(|r| r.fill)
    }

    /// Advance the region's count, repaint it and move the selection to it
    pub fn on_region_click(&mut self, region: RegionId) -> ClickOutcome {
        if self.state.is_population_map() {
            return ClickOutcome::Ignored;
        }
        let Some(entry) = self.state.regions.get_mut(region.0) else {
            return ClickOutcome::Ignored;
        };

        entry.treatment_centers = (entry.treatment_centers + 1) % PALETTE_LEN as u8;
        entry.fill = treatment_fill(entry.treatment_centers);
        let count = entry.treatment_centers;
        debug!(id = %entry.id, name = %entry.name, count, "region clicked");

        // The previous row loses its highlight by being replaced
        self.state.selected = Some(region);

        ClickOutcome::Updated { count }
    }

    /// Repaint every region by population bucket; clicks become no-ops
    pub fn switch_to_population_map(&mut self) {
        self.state.mode = MapMode::Population;
        let total = self.population.len();
        for region in &mut self.state.regions {
            region.fill = gradient_index(i64::from(region.population), total);
        }
        self.legend = Legend::for_mode(MapMode::Population);
        info!("switched to population map");
    }

    /// Repaint every region from its current treatment center count
    pub fn switch_to_treatment_map(&mut self) {
        self.state.mode = MapMode::Treatment;
        for region in &mut self.state.regions {
            region.fill = treatment_fill(region.treatment_centers);
        }
        self.legend = Legend::for_mode(MapMode::Treatment);
        info!("switched to treatment map");
    }

    pub fn toggle_mode(&mut self) {
        match self.state.mode {
            MapMode::Treatment => self.switch_to_population_map(),
            MapMode::Population => self.switch_to_treatment_map(),
        }
    }

    /// Side-table rows in registration order
    pub fn rows(&self) -> impl Iterator<Item = TableRow<'_>> + '_ {
        let selected = self.state.selected;
        self.state
            .regions
            .iter()
            .enumerate()
            .map(move |(i, r)| TableRow {
                region: RegionId(i),
                id: &r.id,
                name: &r.name,
                placeholder: PLACEHOLDER,
                count: r.treatment_centers,
                selected: selected == Some(RegionId(i)),
            })
    }
}

fn treatment_fill(count: u8) -> PaletteIndex {
    PaletteIndex::clamped(i64::from(count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::choropleth::population::POPULATION;

    fn prefectures() -> MapWidget {
        let descriptors = POPULATION
            .iter()
            .map(|&(name, _)| RegionDescriptor::new(format!("gn-{}", name.to_lowercase()), name));
        MapWidget::initialize(descriptors, PopulationTable::prefectures()).unwrap()
    }

    fn id(widget: &MapWidget, key: &str) -> RegionId {
        widget.region_id(key).unwrap()
    }

    fn selected_rows(widget: &MapWidget) -> Vec<String> {
        widget
            .rows()
            .filter(|r| r.selected)
            .map(|r| r.name.to_string())
            .collect()
    }

    #[test]
    fn test_initial_state() {
        let widget = prefectures();
        assert_eq!(widget.len(), 34);
        assert_eq!(widget.mode(), MapMode::Treatment);
        assert!(widget.selected().is_none());
        assert!(widget.rows().all(|r| r.count == 0 && r.placeholder == PLACEHOLDER));
        assert_eq!(widget.legend(), &Legend::for_mode(MapMode::Treatment));
    }

    #[test]
    fn test_empty_widget_is_inert() {
        let mut widget = MapWidget::initialize(Vec::new(), PopulationTable::prefectures()).unwrap();
        assert!(widget.is_empty());
        assert_eq!(widget.on_region_click(RegionId(0)), ClickOutcome::Ignored);
        widget.switch_to_population_map();
        assert_eq!(widget.rows().count(), 0);
    }

    #[test]
    fn test_single_click_then_wrap() {
        let mut widget = prefectures();
        let boke = id(&widget, "gn-boke");

        assert_eq!(widget.on_region_click(boke), ClickOutcome::Updated { count: 1 });
        assert_eq!(widget.fill(boke), PaletteIndex::new(1));
        assert_eq!(widget.fill(boke).map(|f| f.hex()), Some("#ffffe0"));

        for _ in 0..5 {
            widget.on_region_click(boke);
        }
        assert_eq!(widget.region(boke).map(|r| r.treatment_centers), Some(0));
        assert_eq!(widget.fill(boke), Some(PaletteIndex::FIRST));
    }

    #[test]
    fn test_six_clicks_cycle_every_region() {
        let mut widget = prefectures();
        for i in 0..widget.len() {
            let region = RegionId(i);
            let counts: Vec<_> = (0..6).map(|_| widget.on_region_click(region)).collect();
            assert_eq!(counts.last(), Some(&ClickOutcome::Updated { count: 0 }));
            assert_eq!(widget.region(region).map(|r| r.treatment_centers), Some(0));
        }
    }

    #[test]
    fn test_population_mode_ignores_clicks() {
        let mut widget = prefectures();
        let kindia = id(&widget, "gn-kindia");
        widget.on_region_click(kindia);
        widget.switch_to_population_map();

        let before = widget.fill(kindia);
        assert_eq!(widget.on_region_click(kindia), ClickOutcome::Ignored);
        assert_eq!(widget.fill(kindia), before);
        assert_eq!(widget.region(kindia).map(|r| r.treatment_centers), Some(1));
    }

    #[test]
    fn test_selection_moves() {
        let mut widget = prefectures();
        let labe = id(&widget, "gn-labe");
        let pita = id(&widget, "gn-pita");

        widget.on_region_click(labe);
        assert_eq!(selected_rows(&widget), vec!["Labe"]);

        widget.on_region_click(pita);
        assert_eq!(selected_rows(&widget), vec!["Pita"]);
        assert_eq!(widget.selected(), Some(pita));
    }

    #[test]
    fn test_ignored_click_keeps_selection() {
        let mut widget = prefectures();
        let labe = id(&widget, "gn-labe");
        widget.on_region_click(labe);
        widget.switch_to_population_map();
        widget.on_region_click(id(&widget, "gn-mali"));
        assert_eq!(widget.selected(), Some(labe));
    }

    #[test]
    fn test_conakry_is_top_bucket() {
        let mut widget = prefectures();
        let conakry = id(&widget, "gn-conakry");
        widget.switch_to_population_map();
        assert_eq!(widget.fill(conakry), Some(PaletteIndex::LAST));
        assert_eq!(widget.fill(id(&widget, "gn-fria")), Some(PaletteIndex::FIRST));
        assert_eq!(widget.legend().mode, MapMode::Population);
    }

    #[test]
    fn test_mode_round_trip_restores_counts() {
        let mut widget = prefectures();
        let clicks = [("gn-beyla", 2), ("gn-siguiri", 5), ("gn-yomou", 3)];
        for (key, n) in clicks {
            let region = id(&widget, key);
            for _ in 0..n {
                widget.on_region_click(region);
            }
        }

        widget.switch_to_population_map();
        widget.switch_to_treatment_map();

        for (key, n) in clicks {
            let region = id(&widget, key);
            assert_eq!(widget.fill(region), PaletteIndex::new(n));
            assert_eq!(widget.region(region).map(|r| r.treatment_centers), Some(n as u8));
        }
        assert_eq!(widget.legend().mode, MapMode::Treatment);
    }

    #[test]
    fn test_toggle() {
        let mut widget = prefectures();
        widget.toggle_mode();
        assert!(widget.is_population_map());
        widget.toggle_mode();
        assert!(!widget.is_population_map());
    }

    #[test]
    fn test_unknown_name_fails() {
        let err = MapWidget::initialize(
            vec![RegionDescriptor::new("x", "Atlantis")],
            PopulationTable::prefectures(),
        )
        .err();
        assert_eq!(
            err,
            Some(ChoroplethError::UnknownRegionName {
                id: "x".into(),
                name: "Atlantis".into()
            })
        );
    }

    #[test]
    fn test_duplicate_id_fails() {
        let err = MapWidget::initialize(
            vec![
                RegionDescriptor::new("a", "Boke"),
                RegionDescriptor::new("a", "Boffa"),
            ],
            PopulationTable::prefectures(),
        )
        .err();
        assert_eq!(err, Some(ChoroplethError::DuplicateRegionId("a".into())));
    }
}
