//! Capped entity pools with oldest-first eviction
//!
//! Entities live in an arena keyed by id; a separate FIFO holds the ids that
//! still count toward the cap. Evicted entities leave the FIFO but stay in the
//! arena while they fade, so nothing else ever holds a dangling reference.

use std::collections::{BTreeMap, VecDeque};

use super::EntityId;
use super::animation::{FadeOutcome, Fadeable};
use super::timer::Clock;
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct SpawnPool<T> {
    max_count: usize,
    entries: BTreeMap<EntityId, T>,
    live: VecDeque<EntityId>,
}

impl<T: Fadeable> SpawnPool<T> {
    pub fn new(max_count: usize) -> Self {
        Self {
            max_count: max_count.max(1),
            entries: BTreeMap::new(),
            live: VecDeque::with_capacity(max_count),
        }
    }

    /// Admit a new entity, evicting the oldest live one first if at capacity.
    /// Returns the evicted id.
    pub fn insert(&mut self, id: EntityId, item: T, clock: &impl Clock) -> Option<EntityId> {
        let evicted = if self.live.len() >= self.max_count {
            self.evict_oldest(clock)
        } else {
            None
        };
        self.entries.insert(id, item);
        self.live.push_back(id);
        evicted
    }

    /// Force the oldest live entity into its fade right now
    pub fn evict_oldest(&mut self, clock: &impl Clock) -> Option<EntityId> {
        let id = self.live.pop_front()?;
        if let Some(item) = self.entries.get_mut(&id) {
            item.fade_mut().start_now(clock);
        }
        Some(id)
    }

    /// Drop an entity immediately, bypassing its fade
    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        self.live.retain(|&live| live != id);
        self.entries.remove(&id)
    }

    /// Tick every fade; retired entities are removed.
    ///
    /// Returns the visible changes (`Fading` and `Retire`) in id order.
    pub fn tick_fades(&mut self, clock: &impl Clock) -> Result<Vec<(EntityId, FadeOutcome)>> {
        let mut changes = Vec::new();
        for (&id, item) in self.entries.iter_mut() {
            match item.fade_mut().tick(clock, id)? {
                FadeOutcome::NotStarted | FadeOutcome::Waiting => {}
                outcome => changes.push((id, outcome)),
            }
        }
        for &(id, outcome) in &changes {
            if outcome == FadeOutcome::Retire {
                self.remove(id);
            }
        }
        Ok(changes)
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.entries.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.entries.get_mut(&id)
    }

    /// All entities, live and evicted, in id order
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.entries.iter().map(|(&id, item)| (id, item))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.entries.iter_mut().map(|(&id, item)| (id, item))
    }

    /// Ids counting toward the cap, oldest first
    pub fn live_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.live.iter().copied()
    }

    pub fn is_live(&self, id: EntityId) -> bool {
        self.live.contains(&id)
    }

    pub fn live_len(&self) -> usize {
        self.live.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_count(&self) -> usize {
        self.max_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::animation::Fade;
    use crate::sim::timer::SimClock;

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
    fn test_fourth_insert_evicts_first() {
        let clock = SimClock::new();
        let mut pool = SpawnPool::new(3);
        for id in 1..=3 {
            assert_eq!(pool.insert(id, Dummy::default(), &clock), None);
        }
        assert_eq!(pool.insert(4, Dummy::default(), &clock), Some(1));

        assert_eq!(pool.live_ids().collect::<Vec<_>>(), vec![2, 3, 4]);
        assert!(!pool.is_live(1));
        // Evicted entity stays in the arena while it fades
        let evicted = pool.get(1).expect("evicted entity still fading");
        assert!(evicted.fade().is_started());
        assert!(!pool.get(2).unwrap().fade().is_started());
        assert_eq!(pool.len(), 4);
    }

    #[test]
    fn test_evicted_entity_retires_through_fade() {
        let clock = SimClock::new();
        let mut pool = SpawnPool::new(1);
        pool.insert(1, Dummy::default(), &clock);
        pool.insert(2, Dummy::default(), &clock);

        let mut retired = Vec::new();
        for _ in 0..100 {
            for (id, outcome) in pool.tick_fades(&clock).unwrap() {
                if outcome == FadeOutcome::Retire {
                    retired.push(id);
                }
            }
        }
        assert_eq!(retired, vec![1]);
        assert!(pool.get(1).is_none());
        assert_eq!(pool.live_ids().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_remove_drops_from_fifo() {
        let clock = SimClock::new();
        let mut pool = SpawnPool::new(2);
        pool.insert(1, Dummy::default(), &clock);
        pool.insert(2, Dummy::default(), &clock);
        assert!(pool.remove(1).is_some());
        // Room again, no eviction
        assert_eq!(pool.insert(3, Dummy::default(), &clock), None);
        assert_eq!(pool.live_ids().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn test_empty_pool_evicts_nothing() {
        let clock = SimClock::new();
        let mut pool: SpawnPool<Dummy> = SpawnPool::new(2);
        assert_eq!(pool.evict_oldest(&clock), None);
        assert!(pool.is_empty());
    }
}
