//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (`SimClock`)
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod animation;
pub mod assets;
pub mod entities;
pub mod events;
pub mod hud;
pub mod movement;
pub mod pool;
pub mod pursuit;
pub mod region;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod timer;

pub use animation::{Animated, Animation, Fade, FadeOutcome, Fadeable};
pub use assets::{AssetId, AssetTable, FrameId};
pub use entities::{Coin, GasCloud, Intruder, IntruderPhase, Player};
pub use events::{DRAW_ORDER, DrawLayer, GameEvent, SceneId, SoundId};
pub use hud::Hud;
pub use movement::{Bounds, Facing, MoveResult, resolve_move};
pub use pool::SpawnPool;
pub use pursuit::{Pursuer, PursuitParams, PursuitPhase};
pub use region::{LifespanRule, RegionRegistry, SupportRegion};
pub use spawn::Spawner;
pub use state::{GameState, SessionState, SpriteView};
pub use tick::{TickInput, tick};
pub use timer::{Clock, MonotonicClock, SimClock, Timer};

/// Stable identity of anything the renderer draws
pub type EntityId = u32;

/// Hands out entity ids in creation order
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: EntityId,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn next_id(&mut self) -> EntityId {
        let id = self.next;
        self.next += 1;
        id
    }
}
