//! Spawn selector
//!
//! Picks the rank of the next piece to drop. The top `reserved_top_ranks`
//! ranks are merge-only and never come out of the spawner.

use rand::Rng;

use super::error::ConfigError;
use super::rank::{Rank, RankTable};
use crate::collab::Presentation;

#[derive(Debug, Clone)]
pub struct SpawnSelector {
    max_spawnable: Rank,
    current: Rank,
}

impl SpawnSelector {
    /// Fails if the reservation swallows the whole table
    pub fn new(table: &RankTable, reserved_top_ranks: usize) -> Result<Self, ConfigError> {
        let max_index = table
            .rank_count()
            .checked_sub(1)
            .and_then(|max| max.checked_sub(reserved_top_ranks))
            .ok_or(ConfigError::NoSpawnableRanks {
                rank_count: table.rank_count(),
                reserved: reserved_top_ranks,
            })?;
        let max_spawnable = table
            .rank(max_index)
            .ok_or(ConfigError::EmptyRankTable)?;
        let current = table.rank(0).ok_or(ConfigError::EmptyRankTable)?;
        Ok(Self {
            max_spawnable,
            current,
        })
    }

    /// Highest rank the spawner may produce
    pub fn max_spawnable(&self) -> Rank {
        self.max_spawnable
    }

    /// Rank the next drop will use
    pub fn current(&self) -> Rank {
        self.current
    }

    /// Draw the next rank uniformly from `[0, max_spawnable]` and publish it
    /// as the preview
    pub fn select_next<R: Rng, V: Presentation>(
        &mut self,
        rng: &mut R,
        table: &RankTable,
        presentation: &mut V,
    ) -> Rank {
        let index = rng.random_range(0..=self.max_spawnable.index());
        // Always in range: max_spawnable came from this table
        self.current = table.rank(index).unwrap_or(self.max_spawnable);
        presentation.show_next_preview(table.label_of(self.current), table.color_of(self.current));
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::RecordingPresentation;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_too_many_reserved_ranks() {
        let table = RankTable::fruits();
        assert!(SpawnSelector::new(&table, 10).is_ok());
        assert!(matches!(
            SpawnSelector::new(&table, 11),
            Err(ConfigError::NoSpawnableRanks {
                rank_count: 11,
                reserved: 11
            })
        ));
        assert!(matches!(
            SpawnSelector::new(&table, usize::MAX),
            Err(ConfigError::NoSpawnableRanks {
                rank_count: 11,
                reserved: usize::MAX
            })
        ));
    }

    #[test]
    fn test_select_publishes_preview() {
        let table = RankTable::fruits();
        let mut spawn = SpawnSelector::new(&table, 3).unwrap();
        let mut rng = Pcg32::seed_from_u64(7);
        let mut ui = RecordingPresentation::new();

        let rank = spawn.select_next(&mut rng, &table, &mut ui);
        assert_eq!(spawn.current(), rank);
        assert_eq!(ui.last_preview(), Some(table.label_of(rank)));
    }

    #[test]
    fn test_single_spawnable_rank_is_always_chosen() {
        let table = RankTable::fruits();
        let mut spawn = SpawnSelector::new(&table, 10).unwrap();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut ui = RecordingPresentation::new();
        for _ in 0..50 {
            assert_eq!(spawn.select_next(&mut rng, &table, &mut ui).index(), 0);
        }
    }

    #[test]
    fn test_every_spawnable_rank_appears() {
        let table = RankTable::fruits();
        let mut spawn = SpawnSelector::new(&table, 3).unwrap();
        let mut rng = Pcg32::seed_from_u64(42);
        let mut ui = RecordingPresentation::new();
        let mut seen = [false; 8];
        for _ in 0..1000 {
            seen[spawn.select_next(&mut rng, &table, &mut ui).index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    proptest! {
        #[test]
        fn prop_never_exceeds_max_spawnable(seed in any::<u64>(), reserved in 0usize..11) {
            let table = RankTable::fruits();
            let mut spawn = SpawnSelector::new(&table, reserved).unwrap();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut ui = RecordingPresentation::new();
            for _ in 0..64 {
                let rank = spawn.select_next(&mut rng, &table, &mut ui);
                prop_assert!(rank.index() <= 10 - reserved);
                prop_assert!(rank <= spawn.max_spawnable());
            }
        }
    }
}
