//! Rank table
//!
//! Ranks form the merge ladder: two pieces of rank `r` become one of rank
//! `r + 1`. Each rank carries its display label, fill color and radius.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Index into a [`RankTable`]
///
/// Only the table hands these out, so lookups stay in range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Rank(usize);

impl Rank {
    pub fn index(self) -> usize {
        self.0
    }

    /// Score awarded for merging two pieces of this rank
    pub fn points(self) -> u64 {
        self.0 as u64 + 1
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// RGB fill color, written as `#RRGGBB`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the leading `#` is optional)
    pub fn from_hex(s: &str) -> Result<Self, ConfigError> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ConfigError::InvalidColor(s.to_string()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| ConfigError::InvalidColor(s.to_string()))
        };
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Color {
    type Error = ConfigError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl From<Color> for String {
    fn from(c: Color) -> Self {
        c.to_string()
    }
}

/// One rung of the merge ladder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankSpec {
    pub label: String,
    pub color: Color,
    pub radius: f32,
}

impl RankSpec {
    pub fn new(label: impl Into<String>, color: Color, radius: f32) -> Self {
        Self {
            label: label.into(),
            color,
            radius,
        }
    }
}

/// Validated, immutable list of ranks
#[derive(Debug, Clone, PartialEq)]
pub struct RankTable {
    ranks: Vec<RankSpec>,
}

impl RankTable {
    /// Build a table, checking that radii are positive and strictly increasing
    pub fn new(ranks: Vec<RankSpec>) -> Result<Self, ConfigError> {
        if ranks.is_empty() {
            return Err(ConfigError::EmptyRankTable);
        }
        for (index, spec) in ranks.iter().enumerate() {
            if !spec.radius.is_finite() || spec.radius <= 0.0 {
                return Err(ConfigError::InvalidRadius {
                    index,
                    radius: spec.radius,
                });
            }
            if index > 0 {
                let previous = ranks[index - 1].radius;
                if spec.radius <= previous {
                    return Err(ConfigError::RadiusNotIncreasing {
                        index,
                        radius: spec.radius,
                        previous,
                    });
                }
            }
        }
        Ok(Self { ranks })
    }

    /// The classic eleven-fruit ladder, cherry to watermelon
    pub fn fruits() -> Self {
        Self {
            ranks: fruit_ranks(),
        }
    }

    pub fn rank_count(&self) -> usize {
        self.ranks.len()
    }

    /// Rank at `index`, if the table has one
    pub fn rank(&self, index: usize) -> Option<Rank> {
        (index < self.ranks.len()).then_some(Rank(index))
    }

    /// The terminal rank; nothing merges beyond it
    pub fn max_rank(&self) -> Rank {
        Rank(self.ranks.len() - 1)
    }

    pub fn is_terminal(&self, rank: Rank) -> bool {
        rank == self.max_rank()
    }

    /// Next rank up the ladder, `None` at the terminal rank
    pub fn successor(&self, rank: Rank) -> Option<Rank> {
        self.rank(rank.0 + 1)
    }

    /// Panics if `rank` came from a larger table
    pub fn radius_of(&self, rank: Rank) -> f32 {
        self.ranks[rank.0].radius
    }

    pub fn color_of(&self, rank: Rank) -> Color {
        self.ranks[rank.0].color
    }

    pub fn label_of(&self, rank: Rank) -> &str {
        &self.ranks[rank.0].label
    }

    pub fn specs(&self) -> &[RankSpec] {
        &self.ranks
    }
}

/// Fruit sizes in design units; radius is size / 50
const FRUIT_SIZES: [f32; 11] = [
    600.0, 800.0, 1000.0, 1200.0, 1400.0, 1600.0, 1800.0, 2000.0, 2200.0, 2400.0, 2600.0,
];

pub fn fruit_ranks() -> Vec<RankSpec> {
    let fruits = [
        ("Cherry", Color::rgb(0xFF, 0x69, 0xB4)),
        ("Strawberry", Color::rgb(0xFF, 0x00, 0x00)),
        ("Grape", Color::rgb(0x80, 0x00, 0x80)),
        ("Dekopon", Color::rgb(0xFF, 0xD7, 0x00)),
        ("Mandarin", Color::rgb(0xFF, 0xA5, 0x00)),
        ("Apple", Color::rgb(0xFF, 0x00, 0x00)),
        ("Pear", Color::rgb(0xFF, 0xFF, 0x00)),
        ("Peach", Color::rgb(0xFF, 0xC0, 0xCB)),
        ("Pineapple", Color::rgb(0xFF, 0xD7, 0x00)),
        ("Melon", Color::rgb(0x90, 0xEE, 0x90)),
        ("Watermelon", Color::rgb(0x00, 0x80, 0x00)),
    ];
    fruits
        .iter()
        .zip(FRUIT_SIZES)
        .map(|((label, color), size)| RankSpec::new(*label, *color, size / 50.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fruit_table_is_valid() {
        let table = RankTable::new(fruit_ranks()).unwrap();
        assert_eq!(table, RankTable::fruits());
        assert_eq!(table.rank_count(), 11);
        assert_eq!(table.label_of(table.max_rank()), "Watermelon");
        assert!((table.radius_of(Rank(0)) - 12.0).abs() < 0.001);
        assert!((table.radius_of(table.max_rank()) - 52.0).abs() < 0.001);
    }

    #[test]
    fn test_rejects_empty_table() {
        assert!(matches!(
            RankTable::new(Vec::new()),
            Err(ConfigError::EmptyRankTable)
        ));
    }

    #[test]
    fn test_rejects_non_increasing_radius() {
        let red = Color::rgb(255, 0, 0);
        let ranks = vec![
            RankSpec::new("a", red, 10.0),
            RankSpec::new("b", red, 20.0),
            RankSpec::new("c", red, 20.0),
        ];
        assert!(matches!(
            RankTable::new(ranks),
            Err(ConfigError::RadiusNotIncreasing { index: 2, .. })
        ));
    }

    #[test]
    fn test_rejects_bad_radius() {
        let red = Color::rgb(255, 0, 0);
        for radius in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let ranks = vec![RankSpec::new("a", red, radius)];
            assert!(matches!(
                RankTable::new(ranks),
                Err(ConfigError::InvalidRadius { index: 0, .. })
            ));
        }
    }

    #[test]
    fn test_successor_stops_at_terminal() {
        let table = RankTable::fruits();
        assert_eq!(table.successor(Rank(0)), Some(Rank(1)));
        assert_eq!(table.successor(table.max_rank()), None);
        assert!(table.is_terminal(Rank(10)));
        assert_eq!(table.rank(11), None);
        assert_eq!(Rank(10).points(), 11);
    }

    #[test]
    fn test_ranks_only_come_from_the_table() {
        let table = RankTable::fruits();
        assert!(table.rank(table.rank_count()).is_none());
        assert!(table.rank(usize::MAX).is_none());
        for index in 0..table.rank_count() {
            let rank = table.rank(index).unwrap();
            assert_eq!(rank.index(), index);
            assert!(!table.label_of(rank).is_empty());
        }
    }

    #[test]
    fn test_color_hex() {
        let c = Color::from_hex("#FF69B4").unwrap();
        assert_eq!(c, Color::rgb(0xFF, 0x69, 0xB4));
        assert_eq!(c.to_string(), "#FF69B4");
        assert_eq!(Color::from_hex("90ee90").unwrap(), Color::rgb(0x90, 0xEE, 0x90));
        assert!(Color::from_hex("#FFF").is_err());
        assert!(Color::from_hex("#GG0000").is_err());
    }

    #[test]
    fn test_color_serde_as_string() {
        let json = serde_json::to_string(&Color::rgb(0, 128, 0)).unwrap();
        assert_eq!(json, "\"#008000\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color::rgb(0, 128, 0));
        assert!(serde_json::from_str::<Color>("\"nope\"").is_err());
    }
}
