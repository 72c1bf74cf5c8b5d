//! Game state and core simulation types
//!
//! The world owns everything: session bookkeeping, the web registry, every
//! entity pool and their spawners. Entities refer to each other only by id or
//! by value snapshots taken inside a tick.

use std::sync::Arc;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::animation::Fadeable;
use super::assets::{AssetId, AssetTable, FrameId};
use super::entities::{Coin, GasCloud, Intruder, Player};
use super::events::{DRAW_ORDER, DrawLayer, GameEvent};
use super::hud::Hud;
use super::movement::Bounds;
use super::pool::SpawnPool;
use super::pursuit::{Pursuer, PursuitParams};
use super::region::{LifespanRule, RegionRegistry, SupportRegion};
use super::spawn::Spawner;
use super::timer::{SimClock, Timer};
use super::{EntityId, IdAllocator};
use crate::consts::*;
use crate::error::Result;
use crate::settings::Settings;

/// Score, session clock and the terminal flag
#[derive(Debug, Clone)]
pub struct SessionState {
    pub score: u64,
    pub elapsed: Timer,
    /// Set exactly once; the world is frozen afterwards
    pub is_over: bool,
}

/// Everything the renderer needs to draw one sprite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteView {
    pub entity: EntityId,
    pub layer: DrawLayer,
    pub pos: Vec2,
    pub frame: FrameId,
    pub mirrored: bool,
    pub opacity: u8,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub settings: Settings,
    pub assets: Arc<AssetTable>,
    pub clock: SimClock,
    pub rng: Pcg32,
    pub ids: IdAllocator,
    pub bounds: Bounds,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub session: SessionState,
    pub player: Player,
    pub glass: Pursuer,
    pub webs: RegionRegistry,
    pub coins: SpawnPool<Coin>,
    pub sprays: SpawnPool<Intruder>,
    pub gas: SpawnPool<GasCloud>,
    pub coin_spawner: Spawner,
    pub spray_spawner: Spawner,
    /// Whether the spray loop is currently playing
    pub spray_sound_on: bool,
    pub hud: Hud,
    /// Dimmer laid over the world once the session is over
    pub overlay: Option<EntityId>,
    /// Effects published since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new session with the given seed
    pub fn new(seed: u64, settings: Settings, assets: Arc<AssetTable>) -> Result<Self> {
        settings.validate()?;
        let clock = SimClock::new();
        let mut ids = IdAllocator::default();
        let bounds = Bounds::new(WORLD_WIDTH, WORLD_HEIGHT);
        let home = bounds.center();

        let player = Player::new(ids.next_id(), home, settings.starting_lives, &assets, &clock);
        let glass_params = PursuitParams {
            follow_speed: settings.glass_follow_speed,
            ..PursuitParams::default()
        };
        let glass = Pursuer::new(
            ids.next_id(),
            ids.next_id(),
            Vec2::new(home.x, GLASS_STANDOFF),
            glass_params,
            &assets,
            &clock,
        );

        let mut webs = RegionRegistry::new(settings.max_webs, LifespanRule::from_settings(&settings));
        let home_web = SupportRegion::with_extent(
            ids.next_id(),
            home,
            HOME_WEB_A,
            HOME_WEB_B,
            &assets,
            &clock,
        );
        let home_web = webs.admit(home_web, &assets, &clock)?.id;

        let heart_ids: Vec<EntityId> = (0..settings.starting_lives).map(|_| ids.next_id()).collect();
        let hud = Hud::new(heart_ids, &assets, &clock);

        let mut events = vec![
            GameEvent::Spawned {
                entity: home_web,
                layer: DrawLayer::Web,
            },
            GameEvent::Spawned {
                entity: player.id,
                layer: DrawLayer::Player,
            },
            GameEvent::Spawned {
                entity: glass.shadow.id,
                layer: DrawLayer::Shadow,
            },
            GameEvent::Spawned {
                entity: glass.id,
                layer: DrawLayer::Pursuer,
            },
        ];
        events.extend(hud.hearts.iter().map(|h| GameEvent::Spawned {
            entity: h.id,
            layer: DrawLayer::Ui,
        }));

        log::info!(
            "New {} session: seed={}, lives={}",
            settings.difficulty.as_str(),
            seed,
            settings.starting_lives
        );

        Ok(Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            bounds,
            time_ticks: 0,
            session: SessionState {
                score: 0,
                elapsed: Timer::started(&clock),
                is_over: false,
            },
            player,
            glass,
            webs,
            coins: SpawnPool::new(settings.max_coins),
            sprays: SpawnPool::new(settings.max_sprays),
            gas: SpawnPool::new(settings.max_gas),
            coin_spawner: Spawner::new(settings.coin_interval_ms, &clock),
            spray_spawner: Spawner::new(settings.spray_interval_ms, &clock),
            spray_sound_on: false,
            hud,
            overlay: None,
            events,
            ids,
            clock,
            assets,
            settings,
        })
    }

    /// Take every event published since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_over(&self) -> bool {
        self.session.is_over
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.session.elapsed.elapsed_ms(&self.clock)
    }

    /// Every visible sprite, bottom layer first
    pub fn sprites(&self) -> Vec<SpriteView> {
        let mut out = Vec::new();
        let plain = |entity, layer, pos, frame| SpriteView {
            entity,
            layer,
            pos,
            frame,
            mirrored: false,
            opacity: OPAQUE,
        };

        for (id, web) in self.webs.locked().iter() {
            out.push(SpriteView {
                opacity: web.fade().opacity(),
                ..plain(id, DrawLayer::Web, web.center, web.animation.current_frame())
            });
        }
        if let Some(web) = self.webs.pending() {
            out.push(plain(web.id, DrawLayer::Web, web.center, web.animation.current_frame()));
        }
        for (id, coin) in self.coins.iter() {
            out.push(SpriteView {
                opacity: coin.fade().opacity(),
                ..plain(id, DrawLayer::Collectible, coin.pos, coin.animation.current_frame())
            });
        }
        out.push(SpriteView {
            mirrored: self.player.mirrored(),
            ..plain(
                self.player.id,
                DrawLayer::Player,
                self.player.pos,
                self.player.animation.current_frame(),
            )
        });
        for (id, spray) in self.sprays.iter() {
            out.push(SpriteView {
                opacity: spray.fade().opacity(),
                ..plain(id, DrawLayer::Projectile, spray.pos, spray.animation.current_frame())
            });
        }
        for (id, gas) in self.gas.iter() {
            out.push(SpriteView {
                opacity: gas.fade().opacity(),
                ..plain(id, DrawLayer::Projectile, gas.pos, gas.animation.current_frame())
            });
        }
        let shadow = &self.glass.shadow;
        out.push(plain(shadow.id, DrawLayer::Shadow, shadow.pos, shadow.animation.current_frame()));
        out.push(plain(
            self.glass.id,
            DrawLayer::Pursuer,
            self.glass.pos,
            self.glass.animation.current_frame(),
        ));
        if let Some(id) = self.overlay {
            out.push(SpriteView {
                opacity: DARKEN_OPACITY,
                ..plain(
                    id,
                    DrawLayer::Overlay,
                    self.bounds.center(),
                    FrameId {
                        asset: AssetId::Darken,
                        index: 0,
                    },
                )
            });
        }
        for (i, heart) in self.hud.hearts.iter().enumerate() {
            let pos = Vec2::new(20.0 + i as f32 * 30.0, 20.0);
            out.push(plain(heart.id, DrawLayer::Ui, pos, heart.animation.current_frame()));
        }

        // Stable sort keeps id order within a layer
        out.sort_by_key(|s| std::cmp::Reverse(layer_rank(s.layer)));
        out
    }
}

/// 0 is topmost
fn layer_rank(layer: DrawLayer) -> usize {
    DRAW_ORDER.iter().position(|&l| l == layer).unwrap_or(DRAW_ORDER.len())
}
