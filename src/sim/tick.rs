//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. The step order
//! is fixed; later steps read what earlier steps wrote in the same tick.

use glam::Vec2;

use super::animation::{Animated, FadeOutcome, Fadeable};
use super::assets::{AssetId, FrameId};
use super::entities::{Coin, GasCloud, Intruder, IntruderPhase};
use super::events::{DrawLayer, GameEvent, SoundId};
use super::movement::resolve_move;
use super::pursuit::PursuitPhase;
use super::region::SupportRegion;
use super::spawn::{coin_position, gas_heading, gas_variant, spray_target};
use super::state::GameState;
use super::timer::SimClock;
use super::EntityId;
use crate::consts::*;
use crate::error::Result;
use crate::format_elapsed;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Movement intent per axis, each -1, 0 or 1 (y down)
    pub move_dir: Vec2,
    /// Mouse pressed: start drawing a web here
    pub press: Option<Vec2>,
    /// Mouse dragged: resize the web being drawn
    pub drag: Option<Vec2>,
    /// Mouse released: lock the web being drawn
    pub release: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) -> Result<()> {
    // Frozen world once the session is over
    if state.session.is_over {
        return Ok(());
    }

    state.clock.advance(state.settings.frame_ms);
    state.time_ticks += 1;

    apply_web_input(state, input)?;
    move_player(state, input);
    update_glass(state);
    run_spawners(state);
    advance_animations(state)?;
    update_spray_sound(state);
    check_terminal(state);
    update_hud(state);
    Ok(())
}

/// Draw, resize and lock the web under the mouse
fn apply_web_input(state: &mut GameState, input: &TickInput) -> Result<()> {
    if let Some(at) = input.press {
        let id = state.ids.next_id();
        if let Some(abandoned) = state.webs.begin(id, at, &state.assets, &state.clock) {
            state.events.push(GameEvent::Retired { entity: abandoned });
        }
        state.events.push(GameEvent::Spawned {
            entity: id,
            layer: DrawLayer::Web,
        });
    }
    if let Some(to) = input.drag {
        state.webs.drag(to)?;
    }
    if input.release {
        if let Some(report) = state.webs.lock_pending(&state.assets, &state.clock)? {
            log::info!(
                "Web {} locked in, lasts {}ms",
                report.id,
                report.lifespan_ms
            );
            state.events.push(GameEvent::PlaySound(SoundId::WebLock));
            if let Some(web) = state.webs.locked().get(report.id) {
                state.events.push(GameEvent::FrameChanged {
                    entity: report.id,
                    frame: web.animation.current_frame(),
                    mirrored: false,
                });
            }
        }
    }
    Ok(())
}

/// Walk on the webs, or keep falling while dying
fn move_player(state: &mut GameState, input: &TickInput) {
    if state.player.dying {
        state.player.fall_step();
        if state.player.pos.y > state.bounds.max.y + GLASS_STANDOFF {
            respawn_player(state);
        }
        return;
    }

    let delta = input.move_dir * state.settings.player_speed;
    let webs = &state.webs;
    let result = resolve_move(
        state.player.pos,
        delta,
        state.player.facing,
        |p| webs.any_locked_contains(p),
        &state.bounds,
    );

    let turned = result.facing != state.player.facing;
    state.player.pos = result.pos;
    state.player.facing = result.facing;
    let swapped = state
        .player
        .set_walking(result.moved, &state.assets, &state.clock);
    if turned || swapped {
        // Show the flip (or the new animation) without waiting for the frame delay
        state.events.push(GameEvent::FrameChanged {
            entity: state.player.id,
            frame: state.player.animation.current_frame(),
            mirrored: state.player.mirrored(),
        });
    }

    collect_coins(state);
}

/// Back at the center on a fresh rescue web
fn respawn_player(state: &mut GameState) {
    let home = state.bounds.center();
    let web = SupportRegion::with_extent(
        state.ids.next_id(),
        home,
        HOME_WEB_A,
        HOME_WEB_B,
        &state.assets,
        &state.clock,
    );
    let web_id = web.id;
    // A fresh web is never locked, so admitting it can't fail
    match state.webs.admit(web, &state.assets, &state.clock) {
        Ok(_) => state.events.push(GameEvent::Spawned {
            entity: web_id,
            layer: DrawLayer::Web,
        }),
        Err(e) => log::error!("Rescue web rejected: {}", e),
    }
    state.player.respawn(home);
    log::info!("Spider respawned, {} lives left", state.player.lives);
}

fn collect_coins(state: &mut GameState) {
    let spider = state.player.pos;
    let collected: Vec<EntityId> = state
        .coins
        .iter()
        .filter(|(_, coin)| coin.pos.distance_squared(spider) < COIN_PICKUP_RADIUS * COIN_PICKUP_RADIUS)
        .map(|(id, _)| id)
        .collect();
    for id in collected {
        state.coins.remove(id);
        state.session.score += COIN_VALUE;
        state.events.push(GameEvent::Retired { entity: id });
        state.events.push(GameEvent::PlaySound(SoundId::CoinPickup));
        state.events.push(GameEvent::CoinCollected {
            score: state.session.score,
        });
    }
}

fn update_glass(state: &mut GameState) {
    let spider = (!state.player.dying).then_some(state.player.pos);
    let step = state.glass.tick(spider);
    if step.phase_changed && state.glass.phase == PursuitPhase::Returning {
        state.events.push(GameEvent::PlaySound(SoundId::GlassSlam));
    }
    if step.captured {
        lose_life(state, "captured by the glass");
    }
}

/// Coins and sprays on their cadence; sprays move and emit gas; gas drifts
fn run_spawners(state: &mut GameState) {
    let assets = &state.assets;
    let clock = &state.clock;
    let bounds = state.bounds;

    let coin = state.coin_spawner.maybe_spawn(clock, &mut state.coins, || {
        let id = state.ids.next_id();
        let pos = coin_position(&mut state.rng, &bounds);
        (id, Coin::new(id, pos, assets, clock))
    });
    if let Some(report) = coin {
        push_spawn(&mut state.events, report.id, report.evicted, DrawLayer::Collectible, "coin");
    }

    let spray = state.spray_spawner.maybe_spawn(clock, &mut state.sprays, || {
        let id = state.ids.next_id();
        let target = spray_target(&mut state.rng, &bounds);
        (id, Intruder::new(id, target, bounds.center(), assets, clock))
    });
    if let Some(report) = spray {
        log::info!("Spray {} incoming", report.id);
        push_spawn(&mut state.events, report.id, report.evicted, DrawLayer::Projectile, "spray");
    }

    let mut nozzles = Vec::new();
    let mut withdrawn = Vec::new();
    for (id, spray) in state.sprays.iter_mut() {
        let step = spray.tick(clock);
        match step.entered {
            Some(IntruderPhase::Hold) => log::debug!("Spray {} spraying", id),
            Some(IntruderPhase::Withdraw) => log::debug!("Spray {} withdrawing", id),
            _ => {}
        }
        if step.emit_gas {
            nozzles.push((spray.nozzle(), spray.heading));
        }
        if step.done {
            withdrawn.push(id);
        }
    }
    for id in withdrawn {
        state.sprays.remove(id);
        state.events.push(GameEvent::Retired { entity: id });
    }

    for (_, gas) in state.gas.iter_mut() {
        gas.drift();
    }
    for (nozzle, heading) in nozzles {
        let id = state.ids.next_id();
        let heading = gas_heading(&mut state.rng, heading);
        let variant = gas_variant(&mut state.rng);
        let cloud = GasCloud::new(id, nozzle, heading, variant, assets, clock);
        let evicted = state.gas.insert(id, cloud, clock);
        push_spawn(&mut state.events, id, evicted, DrawLayer::Projectile, "gas");
    }
}

fn push_spawn(
    events: &mut Vec<GameEvent>,
    id: EntityId,
    evicted: Option<EntityId>,
    layer: DrawLayer,
    kind: &str,
) {
    events.push(GameEvent::Spawned { entity: id, layer });
    if let Some(old) = evicted {
        log::debug!("Evicted {} {} to make room for {}", kind, old, id);
    }
}

/// Advance every animation and fade; retire whatever finished fading
fn advance_animations(state: &mut GameState) -> Result<()> {
    let clock = &state.clock;
    let events = &mut state.events;

    if state.player.animation.advance(clock) {
        events.push(GameEvent::FrameChanged {
            entity: state.player.id,
            frame: state.player.animation.current_frame(),
            mirrored: state.player.mirrored(),
        });
    }
    advance_one(events, state.glass.id, &mut state.glass, clock);
    let shadow_id = state.glass.shadow.id;
    advance_one(events, shadow_id, &mut state.glass.shadow, clock);
    for heart in state.hud.hearts.iter_mut() {
        advance_one(events, heart.id, heart, clock);
    }
    if let Some(web) = state.webs.pending_mut() {
        advance_one(events, web.id, web, clock);
    }
    for (id, web) in state.webs.locked_mut().iter_mut() {
        advance_one(events, id, web, clock);
    }
    for (id, coin) in state.coins.iter_mut() {
        advance_one(events, id, coin, clock);
    }
    for (id, spray) in state.sprays.iter_mut() {
        advance_one(events, id, spray, clock);
    }
    for (id, gas) in state.gas.iter_mut() {
        advance_one(events, id, gas, clock);
    }

    let mut fades = state.webs.tick_fades(clock)?;
    fades.extend(state.coins.tick_fades(clock)?);
    fades.extend(state.gas.tick_fades(clock)?);
    fades.extend(state.sprays.tick_fades(clock)?);

    for (id, outcome) in fades {
        match outcome {
            FadeOutcome::Fading(opacity) => {
                events.push(GameEvent::OpacityChanged { entity: id, opacity })
            }
            FadeOutcome::Retire => events.push(GameEvent::Retired { entity: id }),
            FadeOutcome::NotStarted | FadeOutcome::Waiting => {}
        }
    }
    Ok(())
}

fn advance_one(
    events: &mut Vec<GameEvent>,
    id: EntityId,
    entity: &mut impl Animated,
    clock: &SimClock,
) {
    if entity.animation_mut().advance(clock) {
        events.push(GameEvent::FrameChanged {
            entity: id,
            frame: entity.animation().current_frame(),
            mirrored: false,
        });
    }
}

/// One shared loop: on when the first spray starts spraying, off when the last stops
fn update_spray_sound(state: &mut GameState) {
    let spraying = state.sprays.iter().any(|(_, s)| s.is_spraying());
    if spraying != state.spray_sound_on {
        state.spray_sound_on = spraying;
        state.events.push(if spraying {
            GameEvent::LoopSound(SoundId::Spray)
        } else {
            GameEvent::StopSound(SoundId::Spray)
        });
    }
}

/// Off every web or touching gas costs a life; no lives left ends the session
fn check_terminal(state: &mut GameState) {
    if !state.player.dying && state.player.lives > 0 {
        let spider = state.player.pos;
        let gassed = state
            .gas
            .iter()
            .any(|(_, g)| !g.fade().is_retired() && g.touches(spider));
        if gassed {
            lose_life(state, "gassed");
        } else if !state.webs.any_locked_contains(spider) {
            lose_life(state, "fell off the webs");
        }
    }

    if state.player.lives == 0 && !state.session.is_over {
        state.session.is_over = true;
        let elapsed = format_elapsed(state.elapsed_ms());
        log::info!("Game over: score={}, time={}", state.session.score, elapsed);
        state.events.push(GameEvent::PlaySound(SoundId::GameOver));
        darken_world(state);
        state.events.push(GameEvent::GameOver {
            score: state.session.score,
            elapsed,
        });
    }
}

fn darken_world(state: &mut GameState) {
    let id = state.ids.next_id();
    state.overlay = Some(id);
    state.events.push(GameEvent::Spawned {
        entity: id,
        layer: DrawLayer::Overlay,
    });
    state.events.push(GameEvent::FrameChanged {
        entity: id,
        frame: FrameId {
            asset: AssetId::Darken,
            index: 0,
        },
        mirrored: false,
    });
    state.events.push(GameEvent::OpacityChanged {
        entity: id,
        opacity: DARKEN_OPACITY,
    });
}

fn lose_life(state: &mut GameState, cause: &str) {
    let lives_left = state.player.lose_life();
    log::info!("Life lost ({}), {} left", cause, lives_left);
    state.events.push(GameEvent::PlaySound(SoundId::LifeLost));
    state.events.push(GameEvent::LifeLost { lives_left });
}

fn update_hud(state: &mut GameState) {
    let elapsed = state.elapsed_ms();
    let removed = state
        .hud
        .update(state.session.score, elapsed, state.player.lives);
    for id in removed {
        state.events.push(GameEvent::Retired { entity: id });
    }
}
