/// Procedural generation of wall sets and power-ups.
///
/// All randomness comes through the injected RNG so a seeded generator
/// reproduces the same waves.

use rand::Rng;

use crate::consts::*;
use crate::entities::{Enemy, GameState, Obstacle, ObstacleKind, PowerUp, PowerUpKind, Wall, WallOp};

/// Two gated walls, the enemy wave behind them and an obstacle pair.
#[derive(Clone, Debug)]
pub struct WallSet {
    pub walls: [Wall; 2],
    pub enemies: Vec<Enemy>,
    pub obstacle: Obstacle,
    pub debuff: Obstacle,
}

fn random_op(rng: &mut impl Rng) -> WallOp {
    WallOp::ALL[rng.gen_range(0..WallOp::ALL.len())]
}

/// Build one wall set at `y`.
///
/// Enemies fill the band between this set and the next one up
/// (`y - SET_SPACING .. y`) and are tagged with `set_id`, so they only start
/// chasing once that wall is crossed.  `enemy_cap` bounds the wave size;
/// zero enemies is a legal outcome.
pub fn generate_set(y: f32, set_id: u32, enemy_cap: u32, rng: &mut impl Rng) -> WallSet {
    let walls = [
        Wall::new(WALL_LEFT_SPAN.0, WALL_LEFT_SPAN.1, y, random_op(rng), set_id),
        Wall::new(WALL_RIGHT_SPAN.0, WALL_RIGHT_SPAN.1, y, random_op(rng), set_id),
    ];

    let count = rng.gen_range(0..=enemy_cap);
    let enemies = (0..count)
        .map(|_| {
            let x = rng.gen_range(LANE_LEFT + ENEMY_RADIUS..LANE_RIGHT - ENEMY_RADIUS);
            let ey = rng.gen_range(y - SET_SPACING + ENEMY_RADIUS..y - ENEMY_RADIUS);
            Enemy::new(x, ey, set_id)
        })
        .collect();

    let left_x = LANE_LEFT + OBSTACLE_EDGE_OFFSET;
    let right_x = LANE_RIGHT - OBSTACLE_EDGE_OFFSET;
    let (obstacle_x, debuff_x) = if rng.gen_bool(0.5) {
        (left_x, right_x)
    } else {
        (right_x, left_x)
    };
    let oy = y - SET_SPACING / 2.0;

    let obstacle = Obstacle::new(
        obstacle_x,
        oy,
        rng.gen_range(OBSTACLE_LIFE.0..=OBSTACLE_LIFE.1),
        ObstacleKind::Normal,
    );
    let debuff = Obstacle::new(
        debuff_x,
        oy,
        rng.gen_range(DEBUFF_LIFE.0..=DEBUFF_LIFE.1),
        ObstacleKind::Debuff,
    );

    WallSet {
        walls,
        enemies,
        obstacle,
        debuff,
    }
}

/// Enemy cap for the set after one with cap `current`.
pub fn next_enemy_cap(current: u32) -> u32 {
    (current + 1).min(MAX_ENEMY_CAP)
}

/// True when the top-most wall has scrolled far enough for a new set.
pub fn set_due(walls: &[Wall]) -> bool {
    walls
        .iter()
        .map(|w| w.y1)
        .reduce(f32::min)
        .map_or(true, |top| top >= SET_SPAWN_Y + SET_SPACING)
}

/// Drop a power-up of a kind not already live, at the top of the lane.
pub fn spawn_power_up(state: &GameState, rng: &mut impl Rng) -> Option<PowerUp> {
    let free: Vec<PowerUpKind> = PowerUpKind::ALL
        .iter()
        .copied()
        .filter(|k| !state.has_power_up(*k))
        .collect();
    if free.is_empty() {
        return None;
    }
    let kind = free[rng.gen_range(0..free.len())];
    let x = rng.gen_range(LANE_LEFT + POWER_UP_RADIUS..LANE_RIGHT - POWER_UP_RADIUS);
    Some(PowerUp::new(kind, x, SET_SPAWN_Y))
}
