#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system that materializes wave reinforcements.

use std::{collections::BTreeSet, ops::RangeInclusive};

use rand::Rng;
use tower_march_core::{
    BaddieVariant, CellContent, CellCoord, EntityKind, EntityState, Heading, SimulationConfig,
    Wave,
};
use tower_march_world::{query, SimRng, World};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Debug)]
pub struct Config {
    num_waves: usize,
    wave_sizes: RangeInclusive<u32>,
}

impl Config {
    /// Creates a configuration keeping `num_waves` waves queued, each sized within `wave_sizes`.
    #[must_use]
    pub fn new(num_waves: usize, wave_sizes: RangeInclusive<u32>) -> Self {
        Self {
            num_waves,
            wave_sizes,
        }
    }

    /// Derives the spawning configuration from the simulation parameters.
    #[must_use]
    pub fn from_simulation(config: &SimulationConfig) -> Self {
        Self::new(
            config.num_waves,
            config.wave_size_min..=config.wave_size_max,
        )
    }
}

/// Pure system that spawns one baddie per queued wave each tick.
#[derive(Debug)]
pub struct Spawning {
    config: Config,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Spawn cells the waves queued on `old` claim on the next board.
    ///
    /// Movement keeps newcomers out of these cells, so a spawn cell is only
    /// still taken after movement when its previous occupant could not leave.
    #[must_use]
    pub fn claims(&self, old: &World) -> BTreeSet<CellCoord> {
        query::waves(old)
            .iter()
            .map(|wave| CellCoord::new(wave.column(), 0))
            .collect()
    }

    /// Spawns from the waves queued on `old` into `next` and queues the following waves.
    ///
    /// Runs once movement has settled `next`. A wave whose spawn cell is
    /// still taken is carried over unchanged. Returns the number of baddies
    /// spawned.
    pub fn handle(&self, old: &World, next: &mut World) -> usize {
        let mut queued = Vec::with_capacity(self.config.num_waves.max(query::waves(old).len()));
        let mut spawned = 0;

        for wave in query::waves(old).iter().copied() {
            let cell = CellCoord::new(wave.column(), 0);
            if query::get_object(next, cell) != CellContent::Empty {
                tracing::trace!(column = wave.column(), "spawn deferred");
                queued.push(wave);
                continue;
            }

            let entity = next.allocate_entity_id();
            next.board_mut().place(
                cell,
                entity,
                EntityKind::Baddie(wave.variant()),
                Some(EntityState::Baddie {
                    heading: wave.heading(),
                }),
            );
            spawned += 1;
            queued.extend(wave.after_spawn());
        }

        let (columns, _) = query::board(old).dimensions();
        while queued.len() < self.config.num_waves {
            let wave = self.synthesize(next.rng_mut(), columns);
            tracing::info!(
                remaining = wave.remaining(),
                column = wave.column(),
                heading = ?wave.heading(),
                "wave queued"
            );
            queued.push(wave);
        }

        next.set_waves(queued);
        spawned
    }

    /// Rolls a fresh marching wave; draws size, then column, then heading.
    #[must_use]
    pub fn synthesize(&self, rng: &mut SimRng, columns: u32) -> Wave {
        let remaining = rng.gen_range(self.config.wave_sizes.clone());
        let column = rng.gen_range(0..columns.max(1));
        let heading = if rng.gen_bool(0.5) {
            Heading::Right
        } else {
            Heading::Left
        };
        Wave::new(
            remaining,
            BaddieVariant::Marching,
            heading,
            i32::try_from(column).unwrap_or(0),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn synthesized_waves_stay_within_configured_bounds() {
        let spawning = Spawning::new(Config::new(1, 3..=12));
        let mut rng = SimRng::seed_from_u64(0x5eed);

        for _ in 0..200 {
            let wave = spawning.synthesize(&mut rng, 6);
            assert!((3..=12).contains(&wave.remaining()));
            assert!((0..6).contains(&wave.column()));
            assert_eq!(wave.variant(), BaddieVariant::Marching);
        }
    }

    #[test]
    fn synthesis_is_deterministic_for_a_seed() {
        let spawning = Spawning::new(Config::new(1, 3..=12));
        let mut first = SimRng::seed_from_u64(42);
        let mut second = SimRng::seed_from_u64(42);

        for _ in 0..16 {
            assert_eq!(
                spawning.synthesize(&mut first, 8),
                spawning.synthesize(&mut second, 8)
            );
        }
    }
}
