//! Super Spider headless runner
//!
//! Plays a scripted session against logging collaborators. Useful for
//! checking balance changes in a settings file without a window.
//!
//! Usage: super-spider [settings.json] [seed]

use std::process::ExitCode;
use std::sync::Arc;

use glam::Vec2;

use super_spider::Settings;
use super_spider::consts::*;
use super_spider::format_elapsed;
use super_spider::platform::{
    AudioSink, InputSource, Renderer, SceneSwitcher, dispatch, install_draw_order,
};
use super_spider::sim::{
    AssetTable, DrawLayer, EntityId, FrameId, GameState, SceneId, SoundId, TickInput, tick,
};

/// Give up on sessions that never end (5 minutes of game time)
const MAX_TICKS: u64 = 5 * 60 * 1000 / FRAME_MS;

/// Counts sprite traffic; the per-event detail goes to trace
#[derive(Default)]
struct LogRenderer {
    live: usize,
}

impl Renderer for LogRenderer {
    fn set_draw_order(&mut self, order: &[DrawLayer]) {
        log::debug!("Draw order (top first): {:?}", order);
    }

    fn spawn(&mut self, entity: EntityId, layer: DrawLayer) {
        self.live += 1;
        log::trace!("spawn {} on {:?}", entity, layer);
    }

    fn set_current_frame(&mut self, entity: EntityId, frame: FrameId, mirrored: bool) {
        log::trace!("frame {} -> {:?} mirrored={}", entity, frame, mirrored);
    }

    fn set_opacity(&mut self, entity: EntityId, opacity: u8) {
        log::trace!("opacity {} -> {}", entity, opacity);
    }

    fn remove(&mut self, entity: EntityId) {
        self.live = self.live.saturating_sub(1);
        log::trace!("remove {}", entity);
    }
}

struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, sound: SoundId) {
        log::debug!("play {:?}", sound);
    }

    fn play_loop(&mut self, sound: SoundId) {
        log::debug!("loop {:?}", sound);
    }

    fn stop(&mut self, sound: SoundId) {
        log::debug!("stop {:?}", sound);
    }
}

#[derive(Default)]
struct LogScenes {
    current: Option<SceneId>,
}

impl SceneSwitcher for LogScenes {
    fn switch_scene(&mut self, scene: SceneId) {
        log::info!("Switching scene to {:?}", scene);
        self.current = Some(scene);
    }
}

/// Walks in a slow square and draws a web ahead of the spider every few seconds
struct ScriptedInput {
    tick: u64,
    spider: Vec2,
}

impl ScriptedInput {
    const LEG_TICKS: u64 = 90;
    const WEB_EVERY_TICKS: u64 = 150;
    const DRAG_TICKS: u64 = 10;

    fn leg(&self) -> u64 {
        (self.tick / Self::LEG_TICKS) % 4
    }

    fn heading(&self) -> Vec2 {
        match self.leg() {
            0 => Vec2::X,
            1 => Vec2::Y,
            2 => Vec2::NEG_X,
            _ => Vec2::NEG_Y,
        }
    }

    fn web_phase(&self) -> u64 {
        self.tick % Self::WEB_EVERY_TICKS
    }
}

impl InputSource for ScriptedInput {
    fn is_key_down(&self, name: &str) -> bool {
        match self.leg() {
            0 => name == "d",
            1 => name == "s",
            2 => name == "a",
            _ => name == "w",
        }
    }

    fn mouse_pressed(&self) -> Option<Vec2> {
        (self.web_phase() == 0).then_some(self.spider)
    }

    fn mouse_dragged(&self) -> Option<Vec2> {
        let phase = self.web_phase();
        (phase > 0 && phase < Self::DRAG_TICKS)
            .then(|| self.spider + self.heading() * 12.0 * phase as f32)
    }

    fn drag_ended(&self) -> Option<Vec2> {
        (self.web_phase() == Self::DRAG_TICKS)
            .then(|| self.spider + self.heading() * 12.0 * Self::DRAG_TICKS as f32)
    }
}

fn run(settings: Settings, seed: u64) -> super_spider::Result<GameState> {
    let mut renderer = LogRenderer::default();
    let mut audio = LogAudio;
    let mut scenes = LogScenes::default();
    install_draw_order(&mut renderer);
    scenes.switch_scene(SceneId::Game(settings.difficulty));

    let mut state = GameState::new(seed, settings, Arc::new(AssetTable::standard()))?;

    let mut script = ScriptedInput {
        tick: 0,
        spider: state.player.pos,
    };
    while !state.is_over() && script.tick < MAX_TICKS {
        script.spider = state.player.pos;
        let input = TickInput::poll(&script);
        tick(&mut state, &input)?;
        dispatch(state.drain_events(), &mut renderer, &mut audio, &mut scenes);
        script.tick += 1;

        if script.tick % 600 == 0 {
            log::info!(
                "t={} score={} lives={} sprites={}",
                format_elapsed(state.elapsed_ms()),
                state.session.score,
                state.player.lives,
                renderer.live
            );
        }
    }

    if scenes.current != Some(SceneId::GameOver) {
        log::warn!("Session still running after {} ticks", MAX_TICKS);
    }
    Ok(state)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => match Settings::load(&path) {
            Ok(s) => s,
            Err(e) => {
                log::error!("Failed to load settings from {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => Settings::default(),
    };
    let seed = match args.next().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            log::error!("Invalid seed: {}", e);
            return ExitCode::FAILURE;
        }
        None => 0x5EED,
    };

    log::info!("Super Spider (headless) starting...");
    match run(settings, seed) {
        Ok(state) => {
            log::info!(
                "Final score {} after {}",
                state.session.score,
                format_elapsed(state.elapsed_ms())
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Simulation failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
