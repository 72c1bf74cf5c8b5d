//! The spider, coins, sprays and gas
//!
//! Each entity is plain data that embeds the capabilities it needs
//! (`Animation`, `Fade`, `Timer`); behavior shared across kinds goes through
//! the `Animated` and `Fadeable` traits.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::EntityId;
use super::animation::{Animated, Animation, Fade, Fadeable};
use super::assets::{AssetId, AssetTable};
use super::movement::Facing;
use super::timer::{Clock, Timer};
use crate::consts::*;
use crate::{heading_toward, heading_vector};

/// The player-controlled spider
#[derive(Debug, Clone)]
pub struct Player {
    pub id: EntityId,
    pub pos: Vec2,
    pub facing: Facing,
    pub lives: u32,
    pub animation: Animation,
    /// Falling after losing a life
    pub dying: bool,
    pub fall_velocity: i32,
    walking: bool,
}

impl Player {
    pub fn new(id: EntityId, pos: Vec2, lives: u32, assets: &AssetTable, clock: &impl Clock) -> Self {
        Self {
            id,
            pos,
            facing: Facing::Left,
            lives,
            animation: Animation::new(assets.frames(AssetId::SpiderIdle), FRAME_DELAY_MS, clock),
            dying: false,
            fall_velocity: 0,
            walking: false,
        }
    }

    /// The only way `lives` goes down. Returns lives remaining.
    ///
    /// With lives to spare the spider starts falling; the last life ends the
    /// session instead.
    pub fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        if self.lives > 0 {
            self.dying = true;
            self.fall_velocity = 0;
        }
        self.lives
    }

    /// One tick of the death fall
    pub fn fall_step(&mut self) {
        self.fall_velocity += FALL_GRAVITY;
        self.pos.y += self.fall_velocity as f32;
    }

    pub fn respawn(&mut self, pos: Vec2) {
        self.pos = pos;
        self.dying = false;
        self.fall_velocity = 0;
    }

    /// Switch between idle and walk frames. Returns true if the frames changed.
    pub fn set_walking(&mut self, walking: bool, assets: &AssetTable, clock: &impl Clock) -> bool {
        if walking == self.walking {
            return false;
        }
        self.walking = walking;
        let asset = if walking {
            AssetId::SpiderWalk
        } else {
            AssetId::SpiderIdle
        };
        self.animation.set_frames(assets.frames(asset), clock)
    }

    pub fn is_walking(&self) -> bool {
        self.walking
    }

    /// Sprites face left; facing right draws them mirrored
    pub fn mirrored(&self) -> bool {
        self.facing == Facing::Right
    }
}

impl Animated for Player {
    fn animation(&self) -> &Animation {
        &self.animation
    }
    fn animation_mut(&mut self) -> &mut Animation {
        &mut self.animation
    }
}

/// A collectable coin
#[derive(Debug, Clone)]
pub struct Coin {
    pub id: EntityId,
    pub pos: Vec2,
    pub animation: Animation,
    pub fade: Fade,
}

impl Coin {
    pub fn new(id: EntityId, pos: Vec2, assets: &AssetTable, clock: &impl Clock) -> Self {
        let mut fade = Fade::new();
        fade.start(COIN_LIFESPAN_MS, clock);
        Self {
            id,
            pos,
            animation: Animation::new(assets.frames(AssetId::Coin), FRAME_DELAY_MS, clock),
            fade,
        }
    }
}

/// Motion profile of a spray
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntruderPhase {
    /// Moving in from outside the world
    Approach,
    /// Parked at its target, spraying gas
    Hold,
    /// Backing out of the world
    Withdraw,
}

/// What one spray tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntruderStep {
    pub entered: Option<IntruderPhase>,
    pub emit_gas: bool,
    /// Left the world; remove it
    pub done: bool,
}

/// A bug spray can that drives in from an edge and sprays gas
#[derive(Debug, Clone)]
pub struct Intruder {
    pub id: EntityId,
    pub pos: Vec2,
    pub target: Vec2,
    /// Degrees, screen space (y down)
    pub heading: f32,
    pub phase: IntruderPhase,
    timer: Timer,
    gas_timer: Timer,
    pub animation: Animation,
    pub fade: Fade,
}

impl Intruder {
    /// A spray aimed at `aim` that will park at `target`, starting behind it
    pub fn new(
        id: EntityId,
        target: Vec2,
        aim: Vec2,
        assets: &AssetTable,
        clock: &impl Clock,
    ) -> Self {
        let heading = heading_toward(target, aim);
        Self {
            id,
            pos: target - heading_vector(heading) * SPRAY_APPROACH_DISTANCE,
            target,
            heading,
            phase: IntruderPhase::Approach,
            timer: Timer::started(clock),
            gas_timer: Timer::started(clock),
            animation: Animation::new(assets.frames(AssetId::Spray), FRAME_DELAY_MS, clock),
            fade: Fade::new(),
        }
    }

    pub fn tick(&mut self, clock: &impl Clock) -> IntruderStep {
        let mut step = IntruderStep::default();
        let forward = heading_vector(self.heading) * SPRAY_SPEED;

        match self.phase {
            IntruderPhase::Approach => {
                let gap = (self.pos - self.target).abs();
                if gap.x < SPRAY_ARRIVE_TOLERANCE && gap.y < SPRAY_ARRIVE_TOLERANCE {
                    self.phase = IntruderPhase::Hold;
                    self.timer.mark(clock);
                    self.gas_timer.mark(clock);
                    step.entered = Some(IntruderPhase::Hold);
                } else {
                    self.pos += forward;
                }
            }
            IntruderPhase::Hold => {
                if self.timer.elapsed_ms(clock) >= SPRAY_HOLD_MS {
                    self.phase = IntruderPhase::Withdraw;
                    step.entered = Some(IntruderPhase::Withdraw);
                    self.pos -= forward;
                } else if !self.fade.is_started()
                    && self.gas_timer.elapsed_ms(clock) >= SPRAY_GAS_INTERVAL_MS
                {
                    step.emit_gas = true;
                    self.gas_timer.mark(clock);
                }
            }
            IntruderPhase::Withdraw => {
                if self.timer.elapsed_ms(clock) >= SPRAY_HOLD_MS + SPRAY_WITHDRAW_MS {
                    step.done = true;
                } else {
                    self.pos -= forward;
                }
            }
        }
        step
    }

    /// Parked and spraying (an evicted spray stops spraying while it fades)
    pub fn is_spraying(&self) -> bool {
        self.phase == IntruderPhase::Hold && !self.fade.is_started()
    }

    /// Where gas leaves the can
    pub fn nozzle(&self) -> Vec2 {
        self.pos + heading_vector(self.heading - SPRAY_NOZZLE_ANGLE_DEG) * SPRAY_NOZZLE_DISTANCE
    }
}

/// A drifting cloud of bug spray; touching it costs a life
#[derive(Debug, Clone)]
pub struct GasCloud {
    pub id: EntityId,
    pub pos: Vec2,
    pub heading: f32,
    pub animation: Animation,
    pub fade: Fade,
}

impl GasCloud {
    pub fn new(
        id: EntityId,
        pos: Vec2,
        heading: f32,
        variant: AssetId,
        assets: &AssetTable,
        clock: &impl Clock,
    ) -> Self {
        let mut fade = Fade::new();
        fade.start(GAS_LIFESPAN_MS, clock);
        Self {
            id,
            pos,
            heading,
            animation: Animation::new(assets.frames(variant), FRAME_DELAY_MS, clock),
            fade,
        }
    }

    pub fn drift(&mut self) {
        self.pos += heading_vector(self.heading) * GAS_SPEED;
    }

    pub fn touches(&self, p: Vec2) -> bool {
        self.pos.distance_squared(p) < GAS_HIT_RADIUS * GAS_HIT_RADIUS
    }
}

macro_rules! impl_capabilities {
    ($($ty:ty),*) => {
        $(
            impl Animated for $ty {
                fn animation(&self) -> &Animation {
                    &self.animation
                }
                fn animation_mut(&mut self) -> &mut Animation {
                    &mut self.animation
                }
            }

            impl Fadeable for $ty {
                fn fade(&self) -> &Fade {
                    &self.fade
                }
                fn fade_mut(&mut self) -> &mut Fade {
                    &mut self.fade
                }
            }
        )*
    };
}

impl_capabilities!(Coin, Intruder, GasCloud);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::timer::SimClock;

    #[test]
    fn test_lose_life_starts_fall_until_last() {
        let clock = SimClock::new();
        let mut spider = Player::new(1, Vec2::new(300.0, 200.0), 2, &AssetTable::standard(), &clock);

        assert_eq!(spider.lose_life(), 1);
        assert!(spider.dying);
        spider.fall_step();
        spider.fall_step();
        assert_eq!(spider.fall_velocity, 2);
        assert_eq!(spider.pos.y, 203.0);

        spider.respawn(Vec2::new(10.0, 10.0));
        assert!(!spider.dying);

        assert_eq!(spider.lose_life(), 0);
        assert!(!spider.dying);
        assert_eq!(spider.lose_life(), 0);
    }

    #[test]
    fn test_walk_idle_switch() {
        let assets = AssetTable::standard();
        let clock = SimClock::new();
        let mut spider = Player::new(1, Vec2::ZERO, 3, &assets, &clock);
        assert!(!spider.set_walking(false, &assets, &clock));
        assert!(spider.set_walking(true, &assets, &clock));
        assert_eq!(spider.animation.current_frame().asset, AssetId::SpiderWalk);
        assert!(!spider.set_walking(true, &assets, &clock));
    }

    #[test]
    fn test_spray_profile() {
        let assets = AssetTable::standard();
        let mut clock = SimClock::new();
        let target = Vec2::new(300.0, 20.0);
        let mut spray = Intruder::new(1, target, Vec2::new(300.0, 200.0), &assets, &clock);
        // Starts outside the world, straight above its target
        assert!(spray.pos.y < 0.0);
        assert!((spray.pos.x - 300.0).abs() < 0.001);

        let mut ticks = 0;
        while spray.phase == IntruderPhase::Approach {
            clock.advance(FRAME_MS);
            spray.tick(&clock);
            ticks += 1;
            assert!(ticks < 400, "spray never arrived");
        }
        assert!((spray.pos - target).length() < SPRAY_ARRIVE_TOLERANCE * 2.0);

        let mut gas = 0;
        while spray.phase == IntruderPhase::Hold {
            clock.advance(FRAME_MS);
            if spray.tick(&clock).emit_gas {
                gas += 1;
            }
        }
        // 5000ms hold at a 750ms cadence
        assert_eq!(gas, 6);

        let mut done = false;
        for _ in 0..1000 {
            clock.advance(FRAME_MS);
            if spray.tick(&clock).done {
                done = true;
                break;
            }
        }
        assert!(done);
        assert!(spray.pos.y < target.y);
    }

    #[test]
    fn test_fading_spray_stops_spraying() {
        let assets = AssetTable::standard();
        let mut clock = SimClock::new();
        let target = Vec2::new(300.0, 20.0);
        let mut spray = Intruder::new(1, target, Vec2::new(300.0, 200.0), &assets, &clock);
        spray.pos = target;
        spray.tick(&clock);
        assert_eq!(spray.phase, IntruderPhase::Hold);

        spray.fade.start_now(&clock);
        for _ in 0..100 {
            clock.advance(FRAME_MS);
            assert!(!spray.tick(&clock).emit_gas);
        }
    }

    #[test]
    fn test_gas_drifts_and_touches() {
        let clock = SimClock::new();
        let mut gas = GasCloud::new(1, Vec2::ZERO, 0.0, AssetId::Gas0, &AssetTable::standard(), &clock);
        assert!(gas.fade.is_started());
        gas.drift();
        assert!((gas.pos - Vec2::new(GAS_SPEED, 0.0)).length() < 0.001);
        assert!(gas.touches(Vec2::new(10.0, 0.0)));
        assert!(!gas.touches(Vec2::new(40.0, 0.0)));
    }
}
