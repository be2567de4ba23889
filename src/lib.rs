//! Flappy Shark - An endless climber arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, buffs, session)
//! - `game`: Frame driver wiring the simulation to its gateways
//! - `scene`: Rendering gateway interface and entity-to-node mirroring
//! - `renderer`: WebGPU implementation of the scene gateway
//! - `persistence`: Integer key/value storage for gold and high score
//! - `assets`: Model library with primitive fallbacks
//! - `ui`: HUD snapshot handed to the page once per frame

pub mod assets;
pub mod game;
pub mod persistence;
pub mod records;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod sim;
pub mod ui;

pub use game::Game;
pub use records::Records;
pub use settings::{GraphicsPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta accepted from the clock (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Play field
    pub const PLAY_WIDTH: f32 = 10.0;
    pub const PLAY_HEIGHT: f32 = 6.0;
    /// Player at or below this height hits the water
    pub const GROUND_Y: f32 = 0.5;

    /// Player physics
    pub const GRAVITY: f32 = -9.8;
    pub const FLAP_VELOCITY: f32 = 4.5;
    /// Shark hitbox margin against barriers
    pub const COLLISION_RADIUS: f32 = 0.25;

    /// Upward scroll of the whole level (units/s)
    pub const LEVEL_RISE_SPEED: f32 = 1.0;
    /// Leftward scroll of the world (0.06 units per 60 Hz frame)
    pub const SCROLL_SPEED: f32 = 3.6;
    /// Score points per unit of climbed height
    pub const SCORE_PER_UNIT: f32 = 10.0;

    /// Obstacles
    pub const OBSTACLE_SPAWN_X: f32 = PLAY_WIDTH + 2.0;
    pub const OBSTACLE_CUTOFF_X: f32 = -PLAY_WIDTH - 2.0;
    pub const OBSTACLE_INTERVAL: f32 = 1.8;
    pub const OBSTACLE_SPACING: f32 = 4.5;
    pub const OBSTACLE_WIDTH: f32 = 1.5;
    pub const OBSTACLE_DEPTH: f32 = 1.2;
    pub const OBSTACLE_HEIGHT: f32 = 30.0;
    pub const GAP_HEIGHT: f32 = 2.0;
    pub const GAP_EDGE_MARGIN: f32 = 0.3;
    /// Only obstacles this close (in x) are tested against the player
    pub const COLLISION_BAND: f32 = 2.0;
    pub const MOVING_CHANCE: f64 = 0.2;

    /// Bonus holes
    pub const BONUS_HOLE_CHANCE: f64 = 0.3;
    pub const BONUS_HOLE_RADIUS: f32 = 0.35;
    pub const BONUS_HOLE_CLEARANCE: f32 = 0.6;
    pub const BONUS_HOLE_SCORE: u64 = 100;

    /// Coins
    pub const COIN_RADIUS: f32 = 0.35;
    pub const COIN_PICKUP_RADIUS: f32 = 0.3;
    pub const COIN_GOLD: u64 = 5;
    pub const COIN_Z: f32 = 0.0;
    pub const MAX_COINS: usize = 30;

    /// Items
    pub const ITEM_CHANCE: f64 = 0.05;
    pub const ITEM_PICKUP_RADIUS: f32 = 0.6;
    pub const ITEM_COLLECT_ANIM: f32 = 0.3;

    /// Buff durations (seconds)
    pub const SHIELD_DURATION: f32 = 6.0;
    pub const FEVER_DURATION: f32 = 8.0;
    pub const IMMUNITY_DURATION: f32 = 3.0;
    pub const FEVER_COIN_INTERVAL: f32 = 0.3;

    /// Session
    pub const RESPAWN_COST: u64 = 100;
    pub const RESUME_COUNTDOWN: f32 = 3.0;
    /// Minimum height above the water after a respawn countdown
    pub const RESPAWN_LIFT: f32 = 1.0;

    /// Decorations (continuous band fill)
    pub const DECOR_AHEAD_X: f32 = 40.0;
    pub const DECOR_CUTOFF_X: f32 = -25.0;
    pub const DECOR_SEED_X: f32 = -20.0;
}
