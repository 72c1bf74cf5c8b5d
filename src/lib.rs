//! Super Spider - a web-walking arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (timers, animation, webs, movement, pursuit, spawning)
//! - `platform`: Interfaces to the rendering, input, audio and scene collaborators
//! - `settings`: Difficulty presets and data-driven game balance
//! - `error`: Error types shared by the whole crate

pub mod error;
pub mod platform;
pub mod settings;
pub mod sim;

pub use error::{Result, SimError};
pub use settings::{Difficulty, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// World dimensions (pixels)
    pub const WORLD_WIDTH: f32 = 600.0;
    pub const WORLD_HEIGHT: f32 = 400.0;

    /// Fixed frame duration (~60 Hz)
    pub const FRAME_MS: u64 = 16;

    /// Milliseconds between animation frames
    pub const FRAME_DELAY_MS: u64 = 250;

    /// Opacity removed per tick while fading
    pub const FADE_STEP: i32 = 4;
    /// Fully opaque
    pub const OPAQUE: u8 = 255;
    /// Opacity of the game-over dimmer
    pub const DARKEN_OPACITY: u8 = 128;

    /// Spider movement speed (pixels per tick)
    pub const PLAYER_SPEED: f32 = 2.0;
    pub const STARTING_LIVES: u32 = 3;
    /// Fall acceleration while dying (pixels per tick²)
    pub const FALL_GRAVITY: i32 = 1;

    /// Web lifespan bounds (ms), larger webs live shorter
    pub const MIN_WEB_LIFESPAN_MS: u64 = 1500;
    pub const MAX_WEB_LIFESPAN_MS: u64 = 8000;
    /// Area at which a web would reach zero natural lifespan (the whole world)
    pub const LARGE_AREA: f32 = WORLD_WIDTH * WORLD_HEIGHT;
    pub const MAX_WEBS: usize = 5;
    /// The web image does not reach its bounding box corners
    pub const WEB_SCALE_X: f32 = 381.0 / 296.0;
    pub const WEB_SCALE_Y: f32 = 347.0 / 230.0;
    /// Semi-axis of a web that has no drawn extent yet
    pub const WEB_MIN_SEMI_AXIS: f32 = 0.5;
    /// Starting/rescue web semi-axes
    pub const HOME_WEB_A: f32 = 80.0;
    pub const HOME_WEB_B: f32 = 50.0;

    /// Glass hovers this far above the spider while following
    pub const GLASS_STANDOFF: f32 = 50.0;
    pub const GLASS_FOLLOW_SPEED: f32 = 1.0;
    pub const GLASS_ASCEND_DISTANCE: f32 = 60.0;
    pub const GLASS_UP_SPEED: f32 = 2.0;
    pub const GLASS_DOWN_SPEED: f32 = 5.0;
    pub const GLASS_CAPTURE_OFFSET: f32 = 50.0;
    /// Half-size of the box under the glass that counts as captured
    pub const GLASS_CAPTURE_WINDOW: f32 = 20.0;

    /// Spray cadence and lifetime (ms)
    pub const SPRAY_INTERVAL_MS: u64 = 12_000;
    pub const SPRAY_HOLD_MS: u64 = 5000;
    pub const SPRAY_WITHDRAW_MS: u64 = 5000;
    pub const SPRAY_GAS_INTERVAL_MS: u64 = 750;
    pub const MAX_SPRAYS: usize = 2;
    /// Sprays within this many pixels of the side edges may appear anywhere vertically
    pub const SPRAY_EDGE_BAND: f32 = 50.0;
    /// Sprays start this far behind their target, outside the world
    pub const SPRAY_APPROACH_DISTANCE: f32 = 200.0;
    pub const SPRAY_SPEED: f32 = 1.0;
    pub const SPRAY_ARRIVE_TOLERANCE: f32 = 3.0;
    /// Nozzle position relative to the spray center
    pub const SPRAY_NOZZLE_DISTANCE: f32 = 118.1;
    pub const SPRAY_NOZZLE_ANGLE_DEG: f32 = 45.34;

    pub const GAS_LIFESPAN_MS: u64 = 2000;
    pub const GAS_SPEED: f32 = 1.0;
    /// Total angular spread of gas around the spray heading (degrees)
    pub const GAS_ANGLE_RANGE_DEG: f32 = 60.0;
    pub const GAS_HIT_RADIUS: f32 = 16.0;
    pub const MAX_GAS: usize = 24;

    pub const COIN_INTERVAL_MS: u64 = 3000;
    pub const COIN_LIFESPAN_MS: u64 = 8000;
    pub const COIN_MARGIN: f32 = 20.0;
    pub const COIN_PICKUP_RADIUS: f32 = 20.0;
    pub const COIN_VALUE: u64 = 10;
    pub const MAX_COINS: usize = 5;
}

/// Format a millisecond duration as `mm:ss`
pub fn format_elapsed(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Unit vector for a heading in degrees (screen space, y down)
#[inline]
pub fn heading_vector(degrees: f32) -> Vec2 {
    let rad = degrees.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}

/// Heading in degrees from `from` toward `to`
#[inline]
pub fn heading_toward(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x).to_degrees()
}
