use ratatui::style::Color;

/// Number of palette entries shared by both map modes
pub const PALETTE_LEN: usize = 6;

/// Fill colors from white (nothing) to red (most)
pub const COLORS: [&str; PALETTE_LEN] = [
    "#ffffff", "#ffffe0", "#ffd4ad", "#ffa77a", "#ff7246", "#ff0000",
];

/// Legend labels in treatment mode, indexed by center count
pub const TREATMENT_LABELS: [&str; PALETTE_LEN] = [
    "0 Centers",
    "1 Center",
    "2 Centers",
    "3 Centers",
    "4 Centers",
    "5 Centers",
];

/// Legend labels in population mode, indexed by bucket
pub const POPULATION_LABELS: [&str; PALETTE_LEN] = [
    "<150000",
    "150000-200000",
    "200000-275000",
    "275000-295000",
    "295000-350000",
    ">350000",
];

/// Position in the fixed 6-entry palette. Always in `[0, PALETTE_LEN)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PaletteIndex(u8);

impl PaletteIndex {
    pub const FIRST: Self = Self(0);
    pub const LAST: Self = Self(PALETTE_LEN as u8 - 1);

    /// Checked constructor
    pub fn new(index: usize) -> Option<Self> {
        (index < PALETTE_LEN).then_some(Self(index as u8))
    }

    /// Clamp any signed bucket into the palette range
    pub fn clamped(index: i64) -> Self {
        Self(index.clamp(0, PALETTE_LEN as i64 - 1) as u8)
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }

    /// Hex string for this entry
    pub fn hex(self) -> &'static str {
        COLORS[self.get()]
    }

    /// Terminal color for this entry
    pub fn color(self) -> Color {
        hex_to_color(self.hex())
    }

    /// All palette entries in order
    pub fn all() -> impl Iterator<Item = Self> {
        (0..PALETTE_LEN as u8).map(Self)
    }
}

/// Bucket `value` into the palette over a domain of `total` ranked values.
///
/// Equivalent to `floor((value - 1) / (total / PALETTE_LEN))`, evaluated as
/// `(value - 1) * PALETTE_LEN / total` so bucket boundaries are exact.
/// Results are clamped: `value <= 1` maps to the first entry, anything past
/// `total` to the last.
pub fn gradient_index(value: i64, total: usize) -> PaletteIndex {
    if total == 0 {
        return PaletteIndex::FIRST;
    }
    let scaled = (value - 1).saturating_mul(PALETTE_LEN as i64);
    PaletteIndex::clamped(scaled.div_euclid(total as i64))
}

/// Palette color for a population rank over the fixed 34-region table
pub fn gradient_color(value: i64) -> &'static str {
    gradient_index(value, super::population::NUM_REGIONS).hex()
}

/// Parse `#rrggbb` into an RGB terminal color. Malformed input is white.
fn hex_to_color(hex: &str) -> Color {
    let digits = hex.trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
            .unwrap_or(0xff)
    };
    Color::Rgb(channel(0..2), channel(2..4), channel(4..6))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_value_is_first_bucket() {
        assert_eq!(gradient_index(1, 34), PaletteIndex::FIRST);
    }

    #[test]
    fn test_top_value_is_last_bucket() {
        // floor(33 / (34 / 6)) = 5
        assert_eq!(gradient_index(34, 34), PaletteIndex::LAST);
        assert_eq!(gradient_color(34), "#ff0000");
    }

    #[test]
    fn test_exact_boundary() {
        // 17 * 6 / 34 is exactly 3; float division would land on 2.999..
        assert_eq!(gradient_index(18, 34).get(), 3);
        assert_eq!(gradient_index(17, 34).get(), 2);
    }

    #[test]
    fn test_out_of_domain_is_clamped() {
        assert_eq!(gradient_index(0, 34), PaletteIndex::FIRST);
        assert_eq!(gradient_index(-40, 34), PaletteIndex::FIRST);
        assert_eq!(gradient_index(35, 34), PaletteIndex::LAST);
        assert_eq!(gradient_index(i64::MAX, 34), PaletteIndex::LAST);
        assert_eq!(gradient_index(5, 0), PaletteIndex::FIRST);
    }

    #[test]
    fn test_monotonic() {
        let mut prev = gradient_index(-2, 34);
        for value in -1..=40 {
            let next = gradient_index(value, 34);
            assert!(next >= prev, "bucket dropped at {value}");
            prev = next;
        }
    }

    #[test]
    fn test_every_bucket_is_used() {
        let mut seen = [false; PALETTE_LEN];
        for value in 1..=34 {
            seen[gradient_index(value, 34).get()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_checked_index() {
        assert_eq!(PaletteIndex::new(5), Some(PaletteIndex::LAST));
        assert_eq!(PaletteIndex::new(6), None);
        assert_eq!(PaletteIndex::all().count(), PALETTE_LEN);
    }

    #[test]
    fn test_hex_colors() {
        assert_eq!(PaletteIndex::FIRST.color(), Color::Rgb(255, 255, 255));
        assert_eq!(PaletteIndex::new(3).map(|i| i.color()), Some(Color::Rgb(0xff, 0xa7, 0x7a)));
        assert_eq!(hex_to_color("#zz"), Color::Rgb(255, 255, 255));
    }
}
