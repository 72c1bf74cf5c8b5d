//! Values the UI collaborator renders: score, clock and the row of hearts

use std::collections::VecDeque;

use super::EntityId;
use super::animation::{Animated, Animation};
use super::assets::{AssetId, AssetTable};
use super::timer::Clock;
use crate::consts::FRAME_DELAY_MS;
use crate::format_elapsed;

/// One life icon
#[derive(Debug, Clone)]
pub struct Heart {
    pub id: EntityId,
    pub animation: Animation,
}

impl Animated for Heart {
    fn animation(&self) -> &Animation {
        &self.animation
    }
    fn animation_mut(&mut self) -> &mut Animation {
        &mut self.animation
    }
}

#[derive(Debug, Clone)]
pub struct Hud {
    pub score: u64,
    /// `mm:ss`
    pub elapsed: String,
    /// Oldest first; a lost life removes the front heart
    pub hearts: VecDeque<Heart>,
}

impl Hud {
    pub fn new(
        heart_ids: impl IntoIterator<Item = EntityId>,
        assets: &AssetTable,
        clock: &impl Clock,
    ) -> Self {
        let hearts = heart_ids
            .into_iter()
            .map(|id| Heart {
                id,
                animation: Animation::new(assets.frames(AssetId::Heart), FRAME_DELAY_MS, clock),
            })
            .collect();
        Self {
            score: 0,
            elapsed: format_elapsed(0),
            hearts,
        }
    }

    /// Refresh presentation values. Returns the hearts removed.
    pub fn update(&mut self, score: u64, elapsed_ms: u64, lives: u32) -> Vec<EntityId> {
        self.score = score;
        self.elapsed = format_elapsed(elapsed_ms);
        let mut removed = Vec::new();
        while self.hearts.len() > lives as usize {
            if let Some(heart) = self.hearts.pop_front() {
                removed.push(heart.id);
            }
        }
        removed
    }

    pub fn lives_shown(&self) -> usize {
        self.hearts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::timer::SimClock;

    #[test]
    fn test_hearts_drop_oldest_first() {
        let clock = SimClock::new();
        let mut hud = Hud::new([10, 11, 12], &AssetTable::standard(), &clock);
        assert_eq!(hud.lives_shown(), 3);

        assert_eq!(hud.update(0, 0, 3), Vec::<EntityId>::new());
        assert_eq!(hud.update(30, 65_000, 2), vec![10]);
        assert_eq!(hud.score, 30);
        assert_eq!(hud.elapsed, "01:05");
        assert_eq!(hud.update(30, 66_000, 0), vec![11, 12]);
        assert_eq!(hud.lives_shown(), 0);
    }
}
