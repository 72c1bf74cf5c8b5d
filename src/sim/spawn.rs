//! Cadence-driven spawning
//!
//! Each ephemeral kind has a `Spawner` (interval + timer) feeding a capped
//! `SpawnPool`. Where things appear is kind-specific and lives here too.

use glam::Vec2;
use rand::Rng;

use super::EntityId;
use super::animation::Fadeable;
use super::assets::AssetId;
use super::movement::Bounds;
use super::pool::SpawnPool;
use super::timer::{Clock, Timer};
use crate::consts::*;

/// Result of a spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnReport {
    pub id: EntityId,
    pub evicted: Option<EntityId>,
}

/// Interval timer for one entity kind
#[derive(Debug, Clone)]
pub struct Spawner {
    pub interval_ms: u64,
    timer: Timer,
}

impl Spawner {
    pub fn new(interval_ms: u64, clock: &impl Clock) -> Self {
        Self {
            interval_ms,
            timer: Timer::started(clock),
        }
    }

    /// Spawn via `factory` into `pool` if the interval has elapsed
    pub fn maybe_spawn<T: Fadeable>(
        &mut self,
        clock: &impl Clock,
        pool: &mut SpawnPool<T>,
        factory: impl FnOnce() -> (EntityId, T),
    ) -> Option<SpawnReport> {
        if self.timer.elapsed_ms(clock) < self.interval_ms {
            return None;
        }
        let (id, item) = factory();
        let evicted = pool.insert(id, item, clock);
        self.timer.mark(clock);
        Some(SpawnReport { id, evicted })
    }
}

/// Uniformly random, inset from the edges
pub fn coin_position(rng: &mut impl Rng, bounds: &Bounds) -> Vec2 {
    Vec2::new(
        rng.random_range(bounds.min.x + COIN_MARGIN..bounds.max.x - COIN_MARGIN),
        rng.random_range(bounds.min.y + COIN_MARGIN..bounds.max.y - COIN_MARGIN),
    )
}

/// Parking spot for a spray: near the side edges anywhere vertically,
/// otherwise hugging the top or bottom edge
pub fn spray_target(rng: &mut impl Rng, bounds: &Bounds) -> Vec2 {
    let (w, h) = (bounds.max.x - bounds.min.x, bounds.max.y - bounds.min.y);
    let x = rng.random_range(0.0..w);
    let y = if x < SPRAY_EDGE_BAND || x > w - SPRAY_EDGE_BAND {
        rng.random_range(0.0..h)
    } else {
        let y = rng.random_range(0.0..SPRAY_EDGE_BAND);
        if rng.random_bool(0.5) { h - y } else { y }
    };
    bounds.min + Vec2::new(x, y)
}

/// Gas leaves within half the spread of the spray's heading
pub fn gas_heading(rng: &mut impl Rng, spray_heading: f32) -> f32 {
    let half = GAS_ANGLE_RANGE_DEG / 2.0;
    spray_heading + rng.random_range(-half..half)
}

pub fn gas_variant(rng: &mut impl Rng) -> AssetId {
    if rng.random_bool(0.5) {
        AssetId::Gas0
    } else {
        AssetId::Gas1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::animation::Fade;
    use crate::sim::timer::SimClock;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[derive(Debug, Default)]
    struct Dummy {
        fade: Fade,
    }

    impl Fadeable for Dummy {
        fn fade(&self) -> &Fade {
            &self.fade
        }
        fn fade_mut(&mut self) -> &mut Fade {
            &mut self.fade
        }
    }

    #[test]
    fn test_spawns_on_interval_and_marks() {
        let mut clock = SimClock::new();
        let mut spawner = Spawner::new(100, &clock);
        let mut pool = SpawnPool::new(3);
        let mut next = 0;

        clock.advance(99);
        assert!(spawner.maybe_spawn(&clock, &mut pool, || (0, Dummy::default())).is_none());

        clock.advance(1);
        let mut factory = || {
            next += 1;
            (next, Dummy::default())
        };
        let report = spawner.maybe_spawn(&clock, &mut pool, &mut factory);
        assert_eq!(report, Some(SpawnReport { id: 1, evicted: None }));
        // Timer re-marked
        assert!(spawner.maybe_spawn(&clock, &mut pool, &mut factory).is_none());
    }

    #[test]
    fn test_spawn_past_cap_evicts_oldest() {
        let mut clock = SimClock::new();
        let mut spawner = Spawner::new(10, &clock);
        let mut pool = SpawnPool::new(3);
        let mut reports = Vec::new();
        for id in 1..=4 {
            clock.advance(10);
            reports.push(spawner.maybe_spawn(&clock, &mut pool, || (id, Dummy::default())));
        }
        assert_eq!(reports[3], Some(SpawnReport { id: 4, evicted: Some(1) }));
        assert_eq!(pool.live_ids().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert!(pool.get(1).unwrap().fade().is_started());
    }

    #[test]
    fn test_spray_targets_hug_edges() {
        let mut rng = Pcg32::seed_from_u64(42);
        let bounds = Bounds::new(WORLD_WIDTH, WORLD_HEIGHT);
        for _ in 0..500 {
            let p = spray_target(&mut rng, &bounds);
            assert!(bounds.contains(p));
            let near_side = p.x < SPRAY_EDGE_BAND || p.x > WORLD_WIDTH - SPRAY_EDGE_BAND;
            let near_top_bottom =
                p.y < SPRAY_EDGE_BAND || p.y > WORLD_HEIGHT - SPRAY_EDGE_BAND;
            assert!(near_side || near_top_bottom, "{:?} is mid-field", p);
        }
    }

    #[test]
    fn test_coin_positions_inset() {
        let mut rng = Pcg32::seed_from_u64(7);
        let bounds = Bounds::new(WORLD_WIDTH, WORLD_HEIGHT);
        for _ in 0..500 {
            let p = coin_position(&mut rng, &bounds);
            assert!(p.x >= COIN_MARGIN && p.x < WORLD_WIDTH - COIN_MARGIN);
            assert!(p.y >= COIN_MARGIN && p.y < WORLD_HEIGHT - COIN_MARGIN);
        }
    }

    #[test]
    fn test_gas_heading_spread() {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..200 {
            let h = gas_heading(&mut rng, 90.0);
            assert!((60.0..120.0).contains(&h));
        }
    }
}
