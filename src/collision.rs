/// Collision passes and squad-size transforms.
///
/// Each pass reads the survivors of the previous one and builds fresh
/// collections, marking hits by index first and filtering afterwards, so no
/// pass ever observes a removal half-way through.  `resolve` runs them in
/// their fixed order.

use log::{debug, info};

use crate::consts::*;
use crate::entities::{
    Bullet, Enemy, GameEvent, GameState, Obstacle, ObstacleKind, PowerUp, PowerUpKind, Soldier,
    Wall, WallOp,
};

fn keep_unmarked<T: Clone>(items: &[T], marked: &[usize]) -> Vec<T> {
    items
        .iter()
        .enumerate()
        .filter(|(i, _)| !marked.contains(i))
        .map(|(_, item)| item.clone())
        .collect()
}

fn soldier_center(s: &Soldier) -> (f32, f32) {
    (s.x + s.size / 2.0, s.y + s.size / 2.0)
}

// ── 1. Soldier ↔ enemy ───────────────────────────────────────────────────────

pub fn soldier_hits_enemy(soldier: &Soldier, enemy: &Enemy) -> bool {
    (soldier.x - enemy.x).abs() < soldier.size && (soldier.y - enemy.y).abs() < enemy.radius
}

/// Each contact removes one soldier together with the enemy it touched.
pub fn soldier_enemy_pass(squad: &[Soldier], enemies: &[Enemy]) -> (Vec<Soldier>, Vec<Enemy>) {
    let mut lost_soldiers: Vec<usize> = Vec::new();
    let mut spent_enemies: Vec<usize> = Vec::new();

    for (si, soldier) in squad.iter().enumerate() {
        let hit = enemies
            .iter()
            .enumerate()
            .find(|(ei, e)| !spent_enemies.contains(ei) && soldier_hits_enemy(soldier, e));
        if let Some((ei, _)) = hit {
            lost_soldiers.push(si);
            spent_enemies.push(ei);
        }
    }

    (
        keep_unmarked(squad, &lost_soldiers),
        keep_unmarked(enemies, &spent_enemies),
    )
}

// ── 2. Bullet ↔ enemy ────────────────────────────────────────────────────────

pub fn bullet_hits_enemy(bullet: &Bullet, enemy: &Enemy) -> bool {
    let reach = bullet.radius + enemy.radius;
    (bullet.x - enemy.x).abs() < reach && (bullet.y - enemy.y).abs() < reach
}

/// A bullet destroys at most one enemy (the first it overlaps) and is spent.
/// Returns surviving bullets, surviving enemies and the kill count.
pub fn bullet_enemy_pass(bullets: &[Bullet], enemies: &[Enemy]) -> (Vec<Bullet>, Vec<Enemy>, u32) {
    let mut killed_enemies: Vec<usize> = Vec::new();
    let mut used_bullets: Vec<usize> = Vec::new();

    for (bi, bullet) in bullets.iter().enumerate() {
        for (ei, enemy) in enemies.iter().enumerate() {
            if !killed_enemies.contains(&ei) && bullet_hits_enemy(bullet, enemy) {
                killed_enemies.push(ei);
                used_bullets.push(bi);
                break;
            }
        }
    }

    (
        keep_unmarked(bullets, &used_bullets),
        keep_unmarked(enemies, &killed_enemies),
        killed_enemies.len() as u32,
    )
}

// ── 3. Bullet ↔ obstacle ─────────────────────────────────────────────────────

pub fn bullet_hits_obstacle(bullet: &Bullet, obstacle: &Obstacle) -> bool {
    let reach = obstacle.half_side + bullet.radius;
    obstacle.is_live()
        && (bullet.x - obstacle.x).abs() < reach
        && (bullet.y - obstacle.y).abs() < reach
}

/// Shoot interval after an obstacle of `kind` is destroyed.
pub fn adjusted_shoot_interval(interval_ms: u64, kind: ObstacleKind) -> u64 {
    match kind {
        ObstacleKind::Normal => interval_ms
            .saturating_sub(SHOOT_INTERVAL_STEP_MS)
            .max(MIN_SHOOT_INTERVAL_MS),
        ObstacleKind::Debuff => (interval_ms + SHOOT_INTERVAL_STEP_MS).min(MAX_SHOOT_INTERVAL_MS),
    }
}

/// Each hit costs a live obstacle one life; reaching zero flips it to the
/// destroyed sentinel.  Returns surviving bullets, updated obstacles and the
/// kinds destroyed this frame, in order.
pub fn bullet_obstacle_pass(
    bullets: &[Bullet],
    obstacles: &[Obstacle],
) -> (Vec<Bullet>, Vec<Obstacle>, Vec<ObstacleKind>) {
    let mut obstacles = obstacles.to_vec();
    let mut used_bullets: Vec<usize> = Vec::new();
    let mut destroyed: Vec<ObstacleKind> = Vec::new();

    for (bi, bullet) in bullets.iter().enumerate() {
        if let Some(obstacle) = obstacles.iter_mut().find(|o| bullet_hits_obstacle(bullet, o)) {
            obstacle.life -= 1;
            if obstacle.life == 0 {
                obstacle.life = DESTROYED_LIFE;
                destroyed.push(obstacle.kind);
            }
            used_bullets.push(bi);
        }
    }

    (keep_unmarked(bullets, &used_bullets), obstacles, destroyed)
}

// ── 4. Soldier ↔ obstacle ────────────────────────────────────────────────────

pub fn soldier_hits_obstacle(soldier: &Soldier, obstacle: &Obstacle) -> bool {
    let (cx, cy) = soldier_center(soldier);
    let reach = obstacle.half_side + soldier.size / 2.0;
    obstacle.is_live() && (cx - obstacle.x).abs() < reach && (cy - obstacle.y).abs() < reach
}

/// Obstacles are not damaged by contact; the soldier is lost.
pub fn soldier_obstacle_pass(squad: &[Soldier], obstacles: &[Obstacle]) -> Vec<Soldier> {
    squad
        .iter()
        .filter(|s| !obstacles.iter().any(|o| soldier_hits_obstacle(s, o)))
        .cloned()
        .collect()
}

// ── 5. Bullet ↔ wall ─────────────────────────────────────────────────────────

/// True if the bullet went through the wall line this frame.  The wall
/// itself moved down by `scroll`, so the bullet's previous y is compared
/// against the wall's previous y.
pub fn bullet_crosses_wall(bullet: &Bullet, wall: &Wall, scroll: f32) -> bool {
    wall.spans(bullet.x) && bullet.y <= wall.y1 && bullet.prev_y >= wall.y1 - scroll
}

/// Walls block bullets whether or not they have been passed.
pub fn bullet_wall_pass(bullets: &[Bullet], walls: &[Wall], scroll: f32) -> Vec<Bullet> {
    bullets
        .iter()
        .filter(|b| !walls.iter().any(|w| bullet_crosses_wall(b, w, scroll)))
        .cloned()
        .collect()
}

// ── 6. Wall crossing ─────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Crossing {
    pub walls: Vec<Wall>,
    pub last_crossed_wall: Option<u32>,
    /// Transforms triggered this frame, in wall order.
    pub applied: Vec<WallOp>,
}

/// Mark walls the lead soldier has reached and collect the transforms to run.
///
/// The transform fires at most once while the wall line sits inside the lead
/// soldier's row, and re-arms only after the line has cleared the row.
pub fn wall_crossing_pass(lead: &Soldier, walls: &[Wall], last_crossed: Option<u32>) -> Crossing {
    let mut last_crossed_wall = last_crossed;
    let mut applied = Vec::new();
    let row_bottom = lead.y + lead.size;

    let walls = walls
        .iter()
        .map(|wall| {
            let mut wall = wall.clone();
            if wall.y1 >= lead.y {
                wall.passed = true;
                last_crossed_wall = Some(last_crossed_wall.map_or(wall.wall_id, |id| id.max(wall.wall_id)));
            }

            let in_row = wall.y1 >= lead.y && wall.y1 <= row_bottom;
            if in_row && !wall.op_applied && wall.spans(lead.x) {
                wall.op_applied = true;
                applied.push(wall.op);
            } else if wall.y1 > row_bottom {
                wall.op_applied = false;
            }
            wall
        })
        .collect();

    Crossing {
        walls,
        last_crossed_wall,
        applied,
    }
}

// ── 7. Squad resize ──────────────────────────────────────────────────────────

/// Left edge for the next soldier: right of the row if it fits, else left.
fn next_slot(squad: &[Soldier]) -> Option<f32> {
    let size = squad.first()?.size;
    let rightmost = squad.iter().map(|s| s.x).fold(f32::MIN, f32::max);
    let leftmost = squad.iter().map(|s| s.x).fold(f32::MAX, f32::min);

    let right = rightmost + size + SOLDIER_GAP;
    if right + size <= LANE_RIGHT {
        return Some(right);
    }
    let left = leftmost - size - SOLDIER_GAP;
    (left >= LANE_LEFT).then_some(left)
}

/// Grow or shrink the squad toward `target` (never below one soldier).
/// Growth stops quietly once the lane is full.
pub fn resize_squad(squad: &[Soldier], target: usize) -> Vec<Soldier> {
    let mut squad = squad.to_vec();
    let Some(lead) = squad.first().cloned() else {
        return squad;
    };
    let target = target.max(1);

    squad.truncate(target);
    while squad.len() < target {
        match next_slot(&squad) {
            Some(x) => squad.push(Soldier { x, ..lead.clone() }),
            None => {
                debug!("lane full at {} soldiers, {} requested", squad.len(), target);
                break;
            }
        }
    }
    squad
}

// ── 8. Culling ───────────────────────────────────────────────────────────────

fn below_screen(y: f32) -> bool {
    y > WORLD_HEIGHT
}

// ── Power-up pickup ──────────────────────────────────────────────────────────

pub fn soldier_touches_power_up(soldier: &Soldier, power_up: &PowerUp) -> bool {
    let (cx, cy) = soldier_center(soldier);
    !power_up.active
        && (cx - power_up.x).abs() < soldier.size
        && (cy - power_up.y).abs() < soldier.size
}

// ── Full resolution ──────────────────────────────────────────────────────────

/// Run every pass in order over already-moved entities.
///
/// `scroll` is this frame's world scroll; `now_ms` stamps power-up pickups.
/// Kill, soldier-loss, crossing, obstacle and pickup events are appended to
/// the returned state's `events`.
pub fn resolve(state: &GameState, scroll: f32, now_ms: u64) -> GameState {
    let mut events = state.events.clone();
    let squad_before = state.squad.len();

    // 1
    let (squad, enemies) = soldier_enemy_pass(&state.squad, &state.enemies);

    // 2
    let (bullets, enemies, kills) = bullet_enemy_pass(&state.bullets, &enemies);
    events.extend((0..kills).map(|_| GameEvent::EnemyKilled));

    // 3
    let (bullets, obstacles, destroyed) = bullet_obstacle_pass(&bullets, &state.obstacles);
    let mut shoot_interval_ms = state.shoot_interval_ms;
    for kind in destroyed {
        shoot_interval_ms = adjusted_shoot_interval(shoot_interval_ms, kind);
        info!("{:?} obstacle destroyed, shoot interval now {} ms", kind, shoot_interval_ms);
        events.push(GameEvent::ObstacleDestroyed(kind));
    }

    // 4
    let squad = soldier_obstacle_pass(&squad, &obstacles);
    events.extend((squad.len()..squad_before).map(|_| GameEvent::SoldierLost));

    // 5
    let bullets = bullet_wall_pass(&bullets, &state.walls, scroll);

    // 6 + 7
    let lead = squad.first().cloned();
    let (walls, squad, last_crossed_wall) = if let Some(lead) = lead {
        let crossing = wall_crossing_pass(&lead, &state.walls, state.last_crossed_wall);
        let mut squad = squad;
        for op in crossing.applied {
            let target = op.apply(squad.len());
            squad = resize_squad(&squad, target);
            info!("crossed {} wall: squad {} (wanted {})", op.glyph(), squad.len(), target);
            events.push(GameEvent::WallCrossed {
                op,
                squad_size: squad.len(),
            });
        }
        (crossing.walls, squad, crossing.last_crossed_wall)
    } else {
        (state.walls.clone(), squad, state.last_crossed_wall)
    };

    // Power-up pickup
    let mut speed_multiplier = state.speed_multiplier;
    let mut bullet_speed_multiplier = state.bullet_speed_multiplier;
    let power_ups: Vec<PowerUp> = state
        .power_ups
        .iter()
        .map(|p| {
            if squad.iter().any(|s| soldier_touches_power_up(s, p)) {
                match p.kind {
                    PowerUpKind::Speed => speed_multiplier = SPEED_BOOST,
                    PowerUpKind::BulletSpeed => bullet_speed_multiplier = BULLET_SPEED_BOOST,
                }
                info!("{:?} power-up collected", p.kind);
                events.push(GameEvent::PowerUpCollected(p.kind));
                PowerUp {
                    active: true,
                    activated_at_ms: now_ms,
                    ..p.clone()
                }
            } else {
                p.clone()
            }
        })
        .collect();
    let squad: Vec<Soldier> = squad
        .into_iter()
        .map(|s| Soldier {
            speed_multiplier,
            ..s
        })
        .collect();

    // 8
    let enemies: Vec<Enemy> = enemies.into_iter().filter(|e| !below_screen(e.y)).collect();
    let walls: Vec<Wall> = walls.into_iter().filter(|w| !below_screen(w.y1)).collect();
    let obstacles: Vec<Obstacle> = obstacles.into_iter().filter(|o| !below_screen(o.y)).collect();
    let power_ups: Vec<PowerUp> = power_ups
        .into_iter()
        .filter(|p| p.active || !below_screen(p.y))
        .collect();

    GameState {
        squad,
        bullets,
        enemies,
        walls,
        obstacles,
        power_ups,
        kills: state.kills + kills,
        last_crossed_wall,
        speed_multiplier,
        bullet_speed_multiplier,
        shoot_interval_ms,
        events,
        ..state.clone()
    }
}
