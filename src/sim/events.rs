//! Effects the simulation publishes to its collaborators
//!
//! The core never draws, plays sounds or switches screens itself. Each tick
//! appends `GameEvent`s; the platform layer drains and dispatches them.

use serde::{Deserialize, Serialize};

use super::EntityId;
use super::assets::FrameId;
use crate::settings::Difficulty;

/// Fixed z-order, topmost first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DrawLayer {
    Ui,
    Overlay,
    Pursuer,
    Shadow,
    Projectile,
    Player,
    Collectible,
    Web,
}

/// Topmost first
pub const DRAW_ORDER: [DrawLayer; 8] = [
    DrawLayer::Ui,
    DrawLayer::Overlay,
    DrawLayer::Pursuer,
    DrawLayer::Shadow,
    DrawLayer::Projectile,
    DrawLayer::Player,
    DrawLayer::Collectible,
    DrawLayer::Web,
];

/// Sound effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundId {
    WebLock,
    CoinPickup,
    GlassSlam,
    /// Looped while a spray is spraying
    Spray,
    LifeLost,
    GameOver,
}

/// Screens owned by the scene collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneId {
    Game(Difficulty),
    GameOver,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A new sprite exists
    Spawned { entity: EntityId, layer: DrawLayer },
    /// Show this frame (mirrored horizontally when facing right)
    FrameChanged {
        entity: EntityId,
        frame: FrameId,
        mirrored: bool,
    },
    OpacityChanged { entity: EntityId, opacity: u8 },
    /// Sprite is gone for good
    Retired { entity: EntityId },
    PlaySound(SoundId),
    LoopSound(SoundId),
    StopSound(SoundId),
    LifeLost { lives_left: u32 },
    CoinCollected { score: u64 },
    /// Emitted exactly once per session
    GameOver { score: u64, elapsed: String },
}
