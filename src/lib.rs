//! Crowd Rush - a lane-based crowd survival shooter.
//!
//! Core modules:
//! - `entities`: plain entity records and their per-kind movement rules
//! - `spawner`: procedural wall sets and power-up placement
//! - `collision`: ordered collision passes and squad-size transforms
//! - `compute`: the per-frame simulation step
//! - `display`: crossterm rendering (no game logic)
//! - `audio`: sound clip registry and playback triggers

pub mod audio;
pub mod collision;
pub mod compute;
pub mod display;
pub mod entities;
pub mod error;
pub mod spawner;

pub use error::GameError;

/// Game configuration constants (world units, y grows downward).
pub mod consts {
    /// World dimensions
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 600.0;

    /// Lane edges
    pub const LANE_LEFT: f32 = 100.0;
    pub const LANE_RIGHT: f32 = 700.0;

    /// Soldiers
    pub const SOLDIER_SIZE: f32 = 30.0;
    pub const SOLDIER_GAP: f32 = 1.0;
    pub const SOLDIER_ROW_Y: f32 = WORLD_HEIGHT - 2.0 * SOLDIER_SIZE;
    /// Lateral step per frame at speed multiplier 1.0
    pub const MOVE_STEP: f32 = 5.0;

    /// Enemies
    pub const ENEMY_RADIUS: f32 = 20.0;
    pub const ENEMY_SPEED: f32 = 1.0;

    /// Bullets
    pub const BULLET_RADIUS: f32 = 5.0;
    pub const BULLET_SPEED: f32 = 10.0;

    /// Downward scroll of walls, enemies, obstacles and field power-ups per frame
    pub const SCROLL_SPEED: f32 = 2.0;

    /// Wall sets
    pub const WALL_LEFT_SPAN: (f32, f32) = (LANE_LEFT, 390.0);
    pub const WALL_RIGHT_SPAN: (f32, f32) = (410.0, LANE_RIGHT);
    pub const SET_SPAWN_Y: f32 = 0.0;
    /// Vertical distance between consecutive wall sets
    pub const SET_SPACING: f32 = 300.0;
    pub const INITIAL_ENEMY_CAP: u32 = 2;
    pub const MAX_ENEMY_CAP: u32 = 12;

    /// Obstacles
    pub const OBSTACLE_HALF_SIDE: f32 = 20.0;
    pub const OBSTACLE_EDGE_OFFSET: f32 = 75.0;
    /// Inclusive life ranges; debuff obstacles are always weaker
    pub const OBSTACLE_LIFE: (i32, i32) = (3, 5);
    pub const DEBUFF_LIFE: (i32, i32) = (1, 2);
    /// Life value marking a destroyed obstacle
    pub const DESTROYED_LIFE: i32 = -1;

    /// Shoot cadence (milliseconds)
    pub const INITIAL_SHOOT_INTERVAL_MS: u64 = 1000;
    pub const SHOOT_INTERVAL_STEP_MS: u64 = 200;
    pub const MIN_SHOOT_INTERVAL_MS: u64 = 200;
    pub const MAX_SHOOT_INTERVAL_MS: u64 = 2000;

    /// Power-ups
    pub const POWER_UP_RADIUS: f32 = 12.0;
    pub const POWER_UP_SPAWN_INTERVAL_MS: u64 = 8000;
    pub const POWER_UP_DURATION_MS: u64 = 6000;
    pub const SPEED_BOOST: f32 = 2.0;
    pub const BULLET_SPEED_BOOST: f32 = 2.0;
}
