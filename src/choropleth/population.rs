/// Number of regions in the fixed population table
pub const NUM_REGIONS: usize = 34;

/// Population figure per prefecture, expressed as a rank from 1 (smallest)
/// to 34 (largest). Only the relative order matters for bucketing.
pub const POPULATION: [(&str, u32); NUM_REGIONS] = [
    ("Beyla", 26),
    ("Boffa", 13),
    ("Boke", 31),
    ("Conakry", 34),
    ("Coyah", 15),
    ("Dabola", 9),
    ("Dalaba", 5),
    ("Dinguiraye", 11),
    ("Dubreka", 27),
    ("Faranah", 18),
    ("Forecariah", 14),
    ("Fria", 1),
    ("Gaoual", 10),
    ("Gueckedou", 22),
    ("Kankan", 32),
    ("Kerouane", 12),
    ("Kindia", 30),
    ("Kissidougou", 19),
    ("Koubia", 2),
    ("Koundara", 4),
    ("Kouroussa", 16),
    ("Labe", 24),
    ("Lelouma", 6),
    ("Lola", 7),
    ("Macenta", 23),
    ("Mali", 21),
    ("Mamou", 25),
    ("Mandiana", 28),
    ("Nzerekore", 29),
    ("Pita", 17),
    ("Siguiri", 33),
    ("Telimele", 20),
    ("Tougue", 3),
    ("Yomou", 8),
];

/// Name to population lookup
#[derive(Debug, Clone, Copy)]
pub struct PopulationTable {
    entries: &'static [(&'static str, u32)],
}

impl PopulationTable {
    pub const fn new(entries: &'static [(&'static str, u32)]) -> Self {
        Self { entries }
    }

    /// The built-in prefecture table
    pub const fn prefectures() -> Self {
        Self::new(&POPULATION)
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, population)| population)
    }

    /// Number of rows; the bucketing domain
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|&(name, _)| name)
    }
}

impl Default for PopulationTable {
    fn default() -> Self {
        Self::prefectures()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ranks_are_a_permutation() {
        let ranks: HashSet<u32> = POPULATION.iter().map(|&(_, p)| p).collect();
        assert_eq!(ranks.len(), NUM_REGIONS);
        assert!(ranks.iter().all(|&p| (1..=NUM_REGIONS as u32).contains(&p)));
    }

    #[test]
    fn test_lookup() {
        let table = PopulationTable::prefectures();
        assert_eq!(table.get("Conakry"), Some(34));
        assert_eq!(table.get("Fria"), Some(1));
        assert_eq!(table.get("conakry"), None);
        assert_eq!(table.len(), NUM_REGIONS);
    }
}
