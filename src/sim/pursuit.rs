//! The glass: a pursuer that follows the spider and slams down on it
//!
//! Phases form a strict cycle: Following -> Ascending -> Descending ->
//! Returning -> Following. Once the glass leaves Following the maneuver runs
//! to completion; nothing interrupts it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::EntityId;
use super::animation::{Animated, Animation};
use super::assets::{AssetId, AssetTable};
use super::timer::Clock;
use crate::consts::*;

/// Current phase of the capture maneuver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PursuitPhase {
    /// Chasing a point just above the spider
    #[default]
    Following,
    /// Lifting off before the slam
    Ascending,
    /// Slamming down; capture is tested on arrival
    Descending,
    /// Lifting back to the height the maneuver started from
    Returning,
}

/// Distances and speeds of the maneuver (pixels, pixels per tick)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PursuitParams {
    pub standoff: f32,
    pub follow_speed: f32,
    pub ascend_distance: f32,
    pub up_speed: f32,
    pub down_speed: f32,
    pub capture_offset: f32,
    pub capture_window: f32,
}

impl Default for PursuitParams {
    fn default() -> Self {
        Self {
            standoff: GLASS_STANDOFF,
            follow_speed: GLASS_FOLLOW_SPEED,
            ascend_distance: GLASS_ASCEND_DISTANCE,
            up_speed: GLASS_UP_SPEED,
            down_speed: GLASS_DOWN_SPEED,
            capture_offset: GLASS_CAPTURE_OFFSET,
            capture_window: GLASS_CAPTURE_WINDOW,
        }
    }
}

/// The glass's shadow on the ground
#[derive(Debug, Clone)]
pub struct Shadow {
    pub id: EntityId,
    pub pos: Vec2,
    pub animation: Animation,
}

impl Animated for Shadow {
    fn animation(&self) -> &Animation {
        &self.animation
    }
    fn animation_mut(&mut self) -> &mut Animation {
        &mut self.animation
    }
}

/// What one pursuit tick did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PursuitStep {
    pub phase_changed: bool,
    /// The slam landed on the spider
    pub captured: bool,
}

#[derive(Debug, Clone)]
pub struct Pursuer {
    pub id: EntityId,
    pub pos: Vec2,
    pub phase: PursuitPhase,
    pub peak_y: f32,
    pub target_y: f32,
    pub return_y: f32,
    pub animation: Animation,
    pub shadow: Shadow,
    pub params: PursuitParams,
}

impl Pursuer {
    pub fn new(
        id: EntityId,
        shadow_id: EntityId,
        pos: Vec2,
        params: PursuitParams,
        assets: &AssetTable,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id,
            pos,
            phase: PursuitPhase::Following,
            peak_y: pos.y,
            target_y: pos.y,
            return_y: pos.y,
            animation: Animation::new(assets.frames(AssetId::Glass), FRAME_DELAY_MS, clock),
            shadow: Shadow {
                id: shadow_id,
                pos: pos + Vec2::new(0.0, params.standoff),
                animation: Animation::new(
                    assets.frames(AssetId::GlassShadow),
                    FRAME_DELAY_MS,
                    clock,
                ),
            },
            params,
        }
    }

    /// Advance the maneuver by one tick.
    ///
    /// `spider` is the spider's position, or `None` while it can't be
    /// captured (falling). Only Following chases it and only the end of
    /// Descending tests it.
    pub fn tick(&mut self, spider: Option<Vec2>) -> PursuitStep {
        let p = self.params;
        let mut step = PursuitStep::default();

        match self.phase {
            PursuitPhase::Following => {
                let Some(spider) = spider else {
                    return step;
                };
                let target = spider - Vec2::new(0.0, p.standoff);
                if self.pos == target {
                    let y = self.pos.y;
                    self.peak_y = y - p.ascend_distance;
                    self.target_y = y + p.capture_offset;
                    self.return_y = y;
                    self.phase = PursuitPhase::Ascending;
                    step.phase_changed = true;
                    log::debug!("Glass {} starting capture at ({}, {})", self.id, self.pos.x, y);
                } else {
                    // Heading is recomputed every tick; never overshoot the target
                    let to_target = target - self.pos;
                    let dist = to_target.length();
                    if dist <= p.follow_speed {
                        self.pos = target;
                    } else {
                        self.pos += to_target / dist * p.follow_speed;
                    }
                    self.shadow.pos = self.pos + Vec2::new(0.0, p.standoff);
                }
            }
            PursuitPhase::Ascending => {
                self.pos.y = (self.pos.y - p.up_speed).max(self.peak_y);
                if self.pos.y <= self.peak_y {
                    self.phase = PursuitPhase::Descending;
                    step.phase_changed = true;
                }
            }
            PursuitPhase::Descending => {
                self.pos.y = (self.pos.y + p.down_speed).min(self.target_y);
                if self.pos.y >= self.target_y {
                    step.captured = spider.is_some_and(|s| self.is_over(s));
                    self.phase = PursuitPhase::Returning;
                    step.phase_changed = true;
                    log::debug!(
                        "Glass {} slammed down: {}",
                        self.id,
                        if step.captured { "captured" } else { "missed" }
                    );
                }
            }
            PursuitPhase::Returning => {
                self.pos.y = (self.pos.y - p.up_speed).max(self.return_y);
                if self.pos.y <= self.return_y {
                    self.phase = PursuitPhase::Following;
                    step.phase_changed = true;
                }
            }
        }

        if self.phase != PursuitPhase::Following {
            // The ground under a rising/falling glass doesn't move
            self.shadow.pos = Vec2::new(self.pos.x, self.return_y + p.standoff);
        }
        step
    }

    /// Is the spider inside the capture window under the glass?
    fn is_over(&self, spider: Vec2) -> bool {
        let w = self.params.capture_window;
        (spider.x - self.pos.x).abs() <= w && (spider.y - self.pos.y).abs() <= w
    }
}

impl Animated for Pursuer {
    fn animation(&self) -> &Animation {
        &self.animation
    }
    fn animation_mut(&mut self) -> &mut Animation {
        &mut self.animation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::timer::SimClock;

    fn glass_at(pos: Vec2) -> Pursuer {
        let clock = SimClock::new();
        Pursuer::new(1, 2, pos, PursuitParams::default(), &AssetTable::standard(), &clock)
    }

    #[test]
    fn test_follow_moves_toward_standoff_point() {
        let mut glass = glass_at(Vec2::new(100.0, 100.0));
        let spider = Vec2::new(200.0, 150.0);
        let step = glass.tick(Some(spider));
        assert!(!step.phase_changed);
        assert_eq!(glass.phase, PursuitPhase::Following);
        // One pixel along the x axis toward (200, 100)
        assert!((glass.pos - Vec2::new(101.0, 100.0)).length() < 0.001);
        assert_eq!(glass.shadow.pos, glass.pos + Vec2::new(0.0, GLASS_STANDOFF));
    }

    #[test]
    fn test_follow_snaps_onto_target() {
        let mut glass = glass_at(Vec2::new(100.0, 99.5));
        glass.tick(Some(Vec2::new(100.0, 150.0)));
        assert_eq!(glass.pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_full_cycle_tick_counts() {
        let spider = Vec2::new(300.0, 250.0);
        let start = spider - Vec2::new(0.0, GLASS_STANDOFF);
        let mut glass = glass_at(start);

        let step = glass.tick(Some(spider));
        assert!(step.phase_changed);
        assert_eq!(glass.phase, PursuitPhase::Ascending);
        assert_eq!(glass.peak_y, start.y - GLASS_ASCEND_DISTANCE);
        assert_eq!(glass.target_y, start.y + GLASS_CAPTURE_OFFSET);
        assert_eq!(glass.return_y, start.y);

        let ascend_ticks = (GLASS_ASCEND_DISTANCE / GLASS_UP_SPEED) as usize;
        for _ in 0..ascend_ticks - 1 {
            glass.tick(Some(spider));
            assert_eq!(glass.phase, PursuitPhase::Ascending);
        }
        glass.tick(Some(spider));
        assert_eq!(glass.phase, PursuitPhase::Descending);

        // Spider moves away mid-maneuver; the slam doesn't chase it
        let fled = spider + Vec2::new(100.0, 0.0);
        let mut captured = false;
        while glass.phase == PursuitPhase::Descending {
            let step = glass.tick(Some(fled));
            captured |= step.captured;
            assert_eq!(glass.pos.x, start.x);
        }
        assert!(!captured);
        assert_eq!(glass.phase, PursuitPhase::Returning);
        assert_eq!(glass.pos.y, glass.target_y);

        while glass.phase == PursuitPhase::Returning {
            glass.tick(Some(fled));
        }
        assert_eq!(glass.phase, PursuitPhase::Following);
        assert_eq!(glass.pos, start);
    }

    #[test]
    fn test_slam_captures_spider_underneath() {
        let spider = Vec2::new(300.0, 250.0);
        let mut glass = glass_at(spider - Vec2::new(0.0, GLASS_STANDOFF));
        let mut captures = 0;
        for _ in 0..200 {
            if glass.tick(Some(spider)).captured {
                captures += 1;
            }
            if glass.phase == PursuitPhase::Returning {
                break;
            }
        }
        assert_eq!(captures, 1);
    }

    #[test]
    fn test_falling_spider_is_not_captured() {
        let spider = Vec2::new(300.0, 250.0);
        let mut glass = glass_at(spider - Vec2::new(0.0, GLASS_STANDOFF));
        glass.tick(Some(spider));
        while glass.phase != PursuitPhase::Returning {
            assert!(!glass.tick(None).captured);
        }
    }

    #[test]
    fn test_shadow_stays_on_ground_during_maneuver() {
        let spider = Vec2::new(300.0, 250.0);
        let start = spider - Vec2::new(0.0, GLASS_STANDOFF);
        let mut glass = glass_at(start);
        glass.tick(Some(spider));
        for _ in 0..10 {
            glass.tick(Some(spider));
            assert_eq!(glass.shadow.pos, Vec2::new(start.x, spider.y));
        }
    }
}
