//! Platform abstraction layer
//!
//! The simulation core talks to the outside world only through these traits:
//! - Rendering: current frame, opacity, removal and the fixed draw order
//! - Input: key and mouse polling, folded into a `TickInput`
//! - Audio: one-shot and looped sounds
//! - Scenes: switching screens (game over)

use glam::Vec2;

use crate::sim::{DRAW_ORDER, DrawLayer, EntityId, FrameId, GameEvent, SceneId, SoundId, TickInput};

pub trait Renderer {
    fn set_draw_order(&mut self, order: &[DrawLayer]);
    fn spawn(&mut self, entity: EntityId, layer: DrawLayer);
    fn set_current_frame(&mut self, entity: EntityId, frame: FrameId, mirrored: bool);
    fn set_opacity(&mut self, entity: EntityId, opacity: u8);
    fn remove(&mut self, entity: EntityId);
}

pub trait AudioSink {
    fn play(&mut self, sound: SoundId);
    fn play_loop(&mut self, sound: SoundId);
    fn stop(&mut self, sound: SoundId);
}

pub trait SceneSwitcher {
    fn switch_scene(&mut self, scene: SceneId);
}

pub trait InputSource {
    fn is_key_down(&self, name: &str) -> bool;
    fn mouse_pressed(&self) -> Option<Vec2>;
    fn mouse_dragged(&self) -> Option<Vec2>;
    fn drag_ended(&self) -> Option<Vec2>;
}

/// Hand the renderer the fixed z-order (call once at startup)
pub fn install_draw_order(renderer: &mut impl Renderer) {
    renderer.set_draw_order(&DRAW_ORDER);
}

impl TickInput {
    /// Build one tick's input from WASD/arrow keys and the mouse
    pub fn poll(source: &impl InputSource) -> Self {
        let held = |keys: [&str; 2]| keys.iter().any(|k| source.is_key_down(k));
        let mut dir = Vec2::ZERO;
        if held(["a", "left"]) {
            dir.x -= 1.0;
        }
        if held(["d", "right"]) {
            dir.x += 1.0;
        }
        if held(["w", "up"]) {
            dir.y -= 1.0;
        }
        if held(["s", "down"]) {
            dir.y += 1.0;
        }

        let released = source.drag_ended();
        Self {
            move_dir: dir,
            press: source.mouse_pressed(),
            // The release point is the web's final corner
            drag: released.or_else(|| source.mouse_dragged()),
            release: released.is_some(),
        }
    }
}

/// Route drained events to their collaborators
pub fn dispatch(
    events: impl IntoIterator<Item = GameEvent>,
    renderer: &mut impl Renderer,
    audio: &mut impl AudioSink,
    scenes: &mut impl SceneSwitcher,
) {
    for event in events {
        match event {
            GameEvent::Spawned { entity, layer } => renderer.spawn(entity, layer),
            GameEvent::FrameChanged {
                entity,
                frame,
                mirrored,
            } => renderer.set_current_frame(entity, frame, mirrored),
            GameEvent::OpacityChanged { entity, opacity } => renderer.set_opacity(entity, opacity),
            GameEvent::Retired { entity } => renderer.remove(entity),
            GameEvent::PlaySound(sound) => audio.play(sound),
            GameEvent::LoopSound(sound) => audio.play_loop(sound),
            GameEvent::StopSound(sound) => audio.stop(sound),
            GameEvent::GameOver { .. } => scenes.switch_scene(SceneId::GameOver),
            GameEvent::LifeLost { .. } | GameEvent::CoinCollected { .. } => {}
        }
    }
}
