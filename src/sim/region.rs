//! Webs: elliptical support regions the spider may stand on
//!
//! A web is drawn by dragging out its bounding box, then locked in. Locking
//! starts its lifespan countdown; larger webs live shorter. The registry owns
//! the web being drawn plus the pool of locked webs and answers the single
//! walkability question the movement resolver asks.

use glam::Vec2;

use super::EntityId;
use super::animation::{Animated, Animation, Fade, FadeOutcome, Fadeable};
use super::assets::{AssetId, AssetTable};
use super::pool::SpawnPool;
use super::timer::Clock;
use crate::consts::*;
use crate::error::{Result, SimError};
use crate::settings::Settings;

/// Area-to-lifespan mapping for locked webs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LifespanRule {
    pub min_ms: u64,
    pub max_ms: u64,
    /// Area at which the unclamped lifespan would reach zero
    pub large_area: f32,
}

impl LifespanRule {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            min_ms: settings.min_web_lifespan_ms,
            max_ms: settings.max_web_lifespan_ms,
            large_area: settings.large_area,
        }
    }

    /// `max - area * max / large`, clamped to `[min, max]`
    pub fn lifespan_for_area(&self, area: f32) -> u64 {
        let max = self.max_ms as f32;
        let raw = max - area.max(0.0) * max / self.large_area;
        (raw.max(0.0) as u64).clamp(self.min_ms, self.max_ms)
    }
}

impl Default for LifespanRule {
    fn default() -> Self {
        Self {
            min_ms: MIN_WEB_LIFESPAN_MS,
            max_ms: MAX_WEB_LIFESPAN_MS,
            large_area: LARGE_AREA,
        }
    }
}

/// An elliptical web
#[derive(Debug, Clone)]
pub struct SupportRegion {
    pub id: EntityId,
    /// Corner the drag started from
    pub anchor: Vec2,
    pub center: Vec2,
    pub semi_axis_a: f32,
    pub semi_axis_b: f32,
    locked: bool,
    pub fade: Fade,
    pub animation: Animation,
}

impl SupportRegion {
    /// A fresh, unlocked web with no size yet
    pub fn new(id: EntityId, anchor: Vec2, assets: &AssetTable, clock: &impl Clock) -> Self {
        Self {
            id,
            anchor,
            center: anchor,
            semi_axis_a: WEB_MIN_SEMI_AXIS,
            semi_axis_b: WEB_MIN_SEMI_AXIS,
            locked: false,
            fade: Fade::new(),
            animation: Animation::new(assets.frames(AssetId::WebUnlocked), FRAME_DELAY_MS, clock),
        }
    }

    /// An unlocked web with a given extent (starting and rescue webs)
    pub fn with_extent(
        id: EntityId,
        center: Vec2,
        semi_axis_a: f32,
        semi_axis_b: f32,
        assets: &AssetTable,
        clock: &impl Clock,
    ) -> Self {
        let mut region = Self::new(id, center, assets, clock);
        region.semi_axis_a = semi_axis_a.max(WEB_MIN_SEMI_AXIS);
        region.semi_axis_b = semi_axis_b.max(WEB_MIN_SEMI_AXIS);
        region
    }

    /// Resize from the anchor to the drag point
    pub fn drag(&mut self, to: Vec2) -> Result<()> {
        if self.locked {
            return Err(SimError::invalid_state(self.id, "dragged a locked web"));
        }
        let size = to - self.anchor;
        self.semi_axis_a = web_semi_axis(size.x, WEB_SCALE_X);
        self.semi_axis_b = web_semi_axis(size.y, WEB_SCALE_Y);
        self.center = self.anchor + size / 2.0;
        Ok(())
    }

    /// Strict ellipse interior test; the boundary is outside
    pub fn contains_point(&self, p: Vec2) -> bool {
        let dx = (p.x - self.center.x) / self.semi_axis_a;
        let dy = (p.y - self.center.y) / self.semi_axis_b;
        dx * dx + dy * dy < 1.0
    }

    /// Bounding box area, `(2a)·(2b)`
    pub fn area(&self) -> f32 {
        (2.0 * self.semi_axis_a) * (2.0 * self.semi_axis_b)
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Lock this web in and start its lifespan. Returns the lifespan.
    pub fn lock(
        &mut self,
        rule: &LifespanRule,
        assets: &AssetTable,
        clock: &impl Clock,
    ) -> Result<u64> {
        if self.locked {
            return Err(SimError::invalid_state(self.id, "web locked twice"));
        }
        self.locked = true;
        let lifespan = rule.lifespan_for_area(self.area());
        self.fade.start(lifespan, clock);
        self.animation
            .set_frames(assets.frames(AssetId::WebLocked), clock);
        Ok(lifespan)
    }
}

fn web_semi_axis(extent: f32, scale: f32) -> f32 {
    if extent == 0.0 {
        WEB_MIN_SEMI_AXIS
    } else {
        (extent * scale).abs() / 2.0
    }
}

impl Fadeable for SupportRegion {
    fn fade(&self) -> &Fade {
        &self.fade
    }
    fn fade_mut(&mut self) -> &mut Fade {
        &mut self.fade
    }
}

impl Animated for SupportRegion {
    fn animation(&self) -> &Animation {
        &self.animation
    }
    fn animation_mut(&mut self) -> &mut Animation {
        &mut self.animation
    }
}

/// Result of locking the web being drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LockReport {
    pub id: EntityId,
    pub lifespan_ms: u64,
    /// Oldest web pushed out to make room
    pub evicted: Option<EntityId>,
}

/// The web being drawn plus every locked web
#[derive(Debug, Clone)]
pub struct RegionRegistry {
    pending: Option<SupportRegion>,
    locked: SpawnPool<SupportRegion>,
    rule: LifespanRule,
}

impl RegionRegistry {
    pub fn new(max_webs: usize, rule: LifespanRule) -> Self {
        Self {
            pending: None,
            locked: SpawnPool::new(max_webs),
            rule,
        }
    }

    /// Start drawing a web. Returns the id of an abandoned unfinished web.
    pub fn begin(
        &mut self,
        id: EntityId,
        anchor: Vec2,
        assets: &AssetTable,
        clock: &impl Clock,
    ) -> Option<EntityId> {
        let abandoned = self.pending.take().map(|r| r.id);
        self.pending = Some(SupportRegion::new(id, anchor, assets, clock));
        abandoned
    }

    /// Resize the web being drawn; no-op when nothing is being drawn
    pub fn drag(&mut self, to: Vec2) -> Result<()> {
        match self.pending.as_mut() {
            Some(region) => region.drag(to),
            None => Ok(()),
        }
    }

    /// Lock the web being drawn and admit it to the pool
    pub fn lock_pending(
        &mut self,
        assets: &AssetTable,
        clock: &impl Clock,
    ) -> Result<Option<LockReport>> {
        let Some(region) = self.pending.take() else {
            return Ok(None);
        };
        self.admit(region, assets, clock).map(Some)
    }

    /// Lock an already-sized web and admit it to the pool
    pub fn admit(
        &mut self,
        mut region: SupportRegion,
        assets: &AssetTable,
        clock: &impl Clock,
    ) -> Result<LockReport> {
        let lifespan_ms = region.lock(&self.rule, assets, clock)?;
        let id = region.id;
        log::debug!(
            "Web {} locked: area={:.0}, lifespan={}ms",
            id,
            region.area(),
            lifespan_ms
        );
        let evicted = if self.locked.live_len() >= self.locked.max_count() {
            self.evict_oldest_and_fade(clock)
        } else {
            None
        };
        self.locked.insert(id, region, clock);
        if let Some(old) = evicted {
            log::debug!("Web {} evicted to make room for web {}", old, id);
        }
        Ok(LockReport {
            id,
            lifespan_ms,
            evicted,
        })
    }

    /// True iff some locked, not yet retired web contains the point
    pub fn any_locked_contains(&self, p: Vec2) -> bool {
        self.locked
            .iter()
            .any(|(_, r)| r.is_locked() && !r.fade.is_retired() && r.contains_point(p))
    }

    /// Push the oldest locked web straight into its fade
    pub fn evict_oldest_and_fade(&mut self, clock: &impl Clock) -> Option<EntityId> {
        self.locked.evict_oldest(clock)
    }

    /// Tick every locked web's fade, removing retired webs
    pub fn tick_fades(&mut self, clock: &impl Clock) -> Result<Vec<(EntityId, FadeOutcome)>> {
        self.locked.tick_fades(clock)
    }

    pub fn pending(&self) -> Option<&SupportRegion> {
        self.pending.as_ref()
    }

    pub fn pending_mut(&mut self) -> Option<&mut SupportRegion> {
        self.pending.as_mut()
    }

    pub fn locked(&self) -> &SpawnPool<SupportRegion> {
        &self.locked
    }

    pub fn locked_mut(&mut self) -> &mut SpawnPool<SupportRegion> {
        &mut self.locked
    }

    pub fn rule(&self) -> &LifespanRule {
        &self.rule
    }
}
