use log::{debug, warn};
use rand::Rng;

use super::{Spot, SpotId, SpotStatus};

/// Tunable knobs for mock spot generation.
#[derive(Debug, Clone)]
pub struct SpotGeneration {
    pub count: u32,
    /// Probability that a freshly generated spot starts out free.
    pub free_ratio: f64,
    pub min_distance_m: u32,
    pub max_distance_m: u32,
}

impl Default for SpotGeneration {
    fn default() -> Self {
        Self {
            count: 18,
            free_ratio: 0.65,
            min_distance_m: 20,
            max_distance_m: 219,
        }
    }
}

/// Fixed-size set of parking spots. Ids never change after generation,
/// only statuses do.
#[derive(Debug, Clone, Default)]
pub struct SpotRegistry {
    spots: Vec<Spot>,
}

impl SpotRegistry {
    pub fn generate<R: Rng + ?Sized>(config: &SpotGeneration, rng: &mut R) -> Self {
        let mut registry = Self::default();
        registry.regenerate(config, rng);
        registry
    }

    /// Throws away every spot and builds `config.count` new ones with ids `1..=count`.
    pub fn regenerate<R: Rng + ?Sized>(&mut self, config: &SpotGeneration, rng: &mut R) {
        let free_ratio = config.free_ratio.clamp(0.0, 1.0);
        let (low, high) = if config.min_distance_m <= config.max_distance_m {
            (config.min_distance_m, config.max_distance_m)
        } else {
            (config.max_distance_m, config.min_distance_m)
        };

        self.spots = (1..=config.count)
            .map(|id| {
                let distance = rng.gen_range(low..=high);
                let status = if rng.gen_bool(free_ratio) {
                    SpotStatus::Free
                } else {
                    SpotStatus::Busy
                };
                Spot::new(SpotId(id), distance, status)
            })
            .collect();

        debug!(
            "generated {} spots ({} free)",
            self.spots.len(),
            self.free_count()
        );
    }

    pub fn spots(&self) -> &[Spot] {
        &self.spots
    }

    pub fn len(&self) -> usize {
        self.spots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }

    pub fn get(&self, id: SpotId) -> Option<&Spot> {
        self.spots.iter().find(|spot| spot.id == id)
    }

    /// Free spots in ascending id order. Empty means nothing is available.
    pub fn list_free(&self) -> impl Iterator<Item = &Spot> + '_ {
        self.spots.iter().filter(|spot| spot.is_free())
    }

    pub fn free_count(&self) -> usize {
        self.list_free().count()
    }

    /// Unknown ids are ignored; the snapshot is returned either way.
    pub fn set_status(&mut self, id: SpotId, status: SpotStatus) -> &[Spot] {
        match self.spots.iter_mut().find(|spot| spot.id == id) {
            Some(spot) => spot.status = status,
            None => warn!("ignoring status change for unknown spot {id}"),
        }
        &self.spots
    }
}
