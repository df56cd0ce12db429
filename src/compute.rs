/// Frame-step game logic.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (and, where needed, an RNG handle) and returns a brand-new
/// `GameState`.  Side effects are limited to the injected RNG; sounds and
/// log-worthy moments leave the step as `GameEvent`s.

use std::f32::consts::PI;

use log::{debug, info};
use rand::Rng;

use crate::collision;
use crate::consts::*;
use crate::entities::{
    Bullet, GameEvent, GameState, GameStatus, PowerUp, PowerUpKind, Soldier, Step, StepContext,
    step_squad,
};
use crate::spawner;

/// Input sampled once per frame.
#[derive(Clone, Debug, Default)]
pub struct FrameInput {
    /// -1 left, 0 none, +1 right.
    pub lateral: i32,
    /// Milliseconds since the session started.
    pub now_ms: u64,
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial game state: one soldier centred in the lane, nothing
/// else on the field.  The first wall set spawns on the first tick.
pub fn init_state(now_ms: u64) -> GameState {
    let x = (LANE_LEFT + LANE_RIGHT - SOLDIER_SIZE) / 2.0;
    GameState {
        squad: vec![Soldier::new(x, SOLDIER_ROW_Y)],
        bullets: Vec::new(),
        enemies: Vec::new(),
        walls: Vec::new(),
        obstacles: Vec::new(),
        power_ups: Vec::new(),
        kills: 0,
        enemy_cap: INITIAL_ENEMY_CAP,
        next_set_id: 1,
        last_crossed_wall: None,
        speed_multiplier: 1.0,
        bullet_speed_multiplier: 1.0,
        shoot_interval_ms: INITIAL_SHOOT_INTERVAL_MS,
        last_shot_ms: now_ms,
        last_power_up_ms: now_ms,
        status: GameStatus::Playing,
        frame: 0,
        events: Vec::new(),
    }
}

// ── Shooting ─────────────────────────────────────────────────────────────────

/// One bullet per soldier, fanned across (0, π) so the volley size always
/// equals the squad size.
pub fn volley(squad: &[Soldier]) -> Vec<Bullet> {
    let n = squad.len();
    squad
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let angle = PI * (i + 1) as f32 / (n + 1) as f32;
            Bullet::new(s.x + s.size / 2.0, s.y, angle)
        })
        .collect()
}

/// Fire a volley if the shoot interval has elapsed.
pub fn fire_volley(state: &GameState, now_ms: u64) -> GameState {
    if now_ms.saturating_sub(state.last_shot_ms) < state.shoot_interval_ms {
        return state.clone();
    }
    let mut bullets = state.bullets.clone();
    bullets.extend(volley(&state.squad));
    GameState {
        bullets,
        last_shot_ms: now_ms,
        ..state.clone()
    }
}

// ── Power-up timers ──────────────────────────────────────────────────────────

/// Drop active power-ups whose duration has run out and restore their
/// multipliers.
pub fn expire_power_ups(state: &GameState, now_ms: u64) -> GameState {
    let mut events = state.events.clone();
    let mut speed_multiplier = state.speed_multiplier;
    let mut bullet_speed_multiplier = state.bullet_speed_multiplier;

    let power_ups: Vec<PowerUp> = state
        .power_ups
        .iter()
        .filter(|p| {
            let expired =
                p.active && now_ms.saturating_sub(p.activated_at_ms) >= POWER_UP_DURATION_MS;
            if expired {
                match p.kind {
                    PowerUpKind::Speed => speed_multiplier = 1.0,
                    PowerUpKind::BulletSpeed => bullet_speed_multiplier = 1.0,
                }
                info!("{:?} power-up expired", p.kind);
                events.push(GameEvent::PowerUpExpired(p.kind));
            }
            !expired
        })
        .cloned()
        .collect();

    let squad = state
        .squad
        .iter()
        .map(|s| Soldier {
            speed_multiplier,
            ..s.clone()
        })
        .collect();

    GameState {
        squad,
        power_ups,
        speed_multiplier,
        bullet_speed_multiplier,
        events,
        ..state.clone()
    }
}

/// Drop a new power-up once the spawn interval has elapsed.
pub fn spawn_power_up(state: &GameState, now_ms: u64, rng: &mut impl Rng) -> GameState {
    if now_ms.saturating_sub(state.last_power_up_ms) < POWER_UP_SPAWN_INTERVAL_MS {
        return state.clone();
    }
    let mut power_ups = state.power_ups.clone();
    if let Some(p) = spawner::spawn_power_up(state, rng) {
        debug!("{:?} power-up dropped at x={:.0}", p.kind, p.x);
        power_ups.push(p);
    }
    GameState {
        power_ups,
        last_power_up_ms: now_ms,
        ..state.clone()
    }
}

// ── Wall sets ────────────────────────────────────────────────────────────────

/// Add the next wall set once the top-most wall has scrolled far enough,
/// then raise the enemy cap.
pub fn spawn_wall_set(state: &GameState, rng: &mut impl Rng) -> GameState {
    if !spawner::set_due(&state.walls) {
        return state.clone();
    }
    let set_id = state.next_set_id;
    let set = spawner::generate_set(SET_SPAWN_Y, set_id, state.enemy_cap, rng);
    info!(
        "wall set {} spawned: {} / {}, {} enemies",
        set_id,
        set.walls[0].op.glyph(),
        set.walls[1].op.glyph(),
        set.enemies.len()
    );

    let mut events = state.events.clone();
    events.push(GameEvent::WaveSpawned {
        set_id,
        enemies: set.enemies.len(),
    });

    let mut walls = state.walls.clone();
    walls.extend(set.walls);
    let mut enemies = state.enemies.clone();
    enemies.extend(set.enemies);
    let mut obstacles = state.obstacles.clone();
    obstacles.push(set.obstacle);
    obstacles.push(set.debuff);

    GameState {
        walls,
        enemies,
        obstacles,
        enemy_cap: spawner::next_enemy_cap(state.enemy_cap),
        next_set_id: set_id + 1,
        events,
        ..state.clone()
    }
}

// ── Movement ─────────────────────────────────────────────────────────────────

/// Step every entity once.  Bullets leaving the lane are dropped here.
pub fn move_entities(state: &GameState, lateral: i32) -> GameState {
    let ctx = StepContext {
        lateral,
        scroll: SCROLL_SPEED,
        bullet_speed: state.bullet_speed_multiplier,
        lead: state.lead().map(|s| (s.x, s.y)),
        last_crossed_wall: state.last_crossed_wall,
    };

    GameState {
        squad: step_squad(&state.squad, &ctx),
        bullets: state
            .bullets
            .iter()
            .map(|b| b.step(&ctx))
            .filter(|b| !b.is_off_lane())
            .collect(),
        enemies: state.enemies.iter().map(|e| e.step(&ctx)).collect(),
        walls: state.walls.iter().map(|w| w.step(&ctx)).collect(),
        obstacles: state.obstacles.iter().map(|o| o.step(&ctx)).collect(),
        power_ups: state.power_ups.iter().map(|p| p.step(&ctx)).collect(),
        ..state.clone()
    }
}

// ── Per-frame tick (nearly pure — RNG is injected) ──────────────────────────

/// Advance the simulation by one frame.  All randomness comes through `rng`
/// so callers control determinism (useful for tests with a seeded RNG).
///
/// Once the squad is gone the state is terminal: the step returns it
/// unchanged apart from clearing last frame's events.
pub fn tick(state: &GameState, input: &FrameInput, rng: &mut impl Rng) -> GameState {
    if state.status == GameStatus::GameOver {
        return GameState {
            events: Vec::new(),
            ..state.clone()
        };
    }

    let state = GameState {
        frame: state.frame + 1,
        events: Vec::new(),
        ..state.clone()
    };

    // ── 1. Timers ────────────────────────────────────────────────────────────
    let state = expire_power_ups(&state, input.now_ms);
    let state = fire_volley(&state, input.now_ms);

    // ── 2. Movement ──────────────────────────────────────────────────────────
    let state = move_entities(&state, input.lateral);

    // ── 3. Collisions, crossings, culling ────────────────────────────────────
    let state = collision::resolve(&state, SCROLL_SPEED, input.now_ms);

    // ── 4. Spawning ──────────────────────────────────────────────────────────
    let state = spawn_wall_set(&state, rng);
    let state = spawn_power_up(&state, input.now_ms, rng);

    // ── 5. Termination ───────────────────────────────────────────────────────
    if state.squad.is_empty() {
        info!("squad wiped out after {} kills", state.kills);
        let mut events = state.events.clone();
        events.push(GameEvent::GameOver);
        return GameState {
            status: GameStatus::GameOver,
            events,
            ..state
        };
    }
    state
}
