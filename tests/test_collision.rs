use std::f32::consts::PI;

use crowd_rush::collision::*;
use crowd_rush::compute::init_state;
use crowd_rush::consts::*;
use crowd_rush::entities::*;

fn soldier(x: f32) -> Soldier {
    Soldier::new(x, SOLDIER_ROW_Y)
}

fn up_bullet(x: f32, y: f32) -> Bullet {
    Bullet::new(x, y, PI / 2.0)
}

// ── Soldier ↔ enemy ───────────────────────────────────────────────────────────

#[test]
fn soldier_enemy_removes_one_pair() {
    // Both soldiers touch the single enemy; only one of them is lost.
    let squad = vec![soldier(300.0), soldier(310.0)];
    let enemies = vec![Enemy::new(305.0, SOLDIER_ROW_Y + 5.0, 1)];
    let (squad, enemies) = soldier_enemy_pass(&squad, &enemies);
    assert_eq!(squad.len(), 1);
    assert_eq!(squad[0].x, 310.0);
    assert!(enemies.is_empty());
}

#[test]
fn soldier_enemy_two_contacts_two_pairs() {
    let squad = vec![soldier(200.0), soldier(500.0)];
    let enemies = vec![
        Enemy::new(500.0, SOLDIER_ROW_Y, 1),
        Enemy::new(200.0, SOLDIER_ROW_Y, 1),
        Enemy::new(400.0, 100.0, 1),
    ];
    let (squad, enemies) = soldier_enemy_pass(&squad, &enemies);
    assert!(squad.is_empty());
    assert_eq!(enemies.len(), 1);
    assert_eq!(enemies[0].x, 400.0);
}

#[test]
fn soldier_enemy_exact_touch_is_a_miss() {
    let s = soldier(300.0);
    assert!(!soldier_hits_enemy(&s, &Enemy::new(300.0 + SOLDIER_SIZE, SOLDIER_ROW_Y, 1)));
    assert!(!soldier_hits_enemy(&s, &Enemy::new(300.0, SOLDIER_ROW_Y + ENEMY_RADIUS, 1)));
    assert!(soldier_hits_enemy(&s, &Enemy::new(329.0, SOLDIER_ROW_Y + 19.0, 1)));
}

// ── Bullet ↔ enemy ────────────────────────────────────────────────────────────

#[test]
fn bullet_kills_at_most_one_enemy() {
    let bullets = vec![up_bullet(300.0, 200.0)];
    let enemies = vec![Enemy::new(300.0, 200.0, 1), Enemy::new(305.0, 205.0, 1)];
    let (bullets, enemies, kills) = bullet_enemy_pass(&bullets, &enemies);
    assert!(bullets.is_empty());
    assert_eq!(enemies.len(), 1);
    assert_eq!(enemies[0].x, 305.0);
    assert_eq!(kills, 1);
}

#[test]
fn two_bullets_one_enemy_spends_one_bullet() {
    let bullets = vec![up_bullet(300.0, 200.0), up_bullet(302.0, 200.0)];
    let enemies = vec![Enemy::new(300.0, 200.0, 1)];
    let (bullets, enemies, kills) = bullet_enemy_pass(&bullets, &enemies);
    assert_eq!(bullets.len(), 1);
    assert_eq!(bullets[0].x, 302.0);
    assert!(enemies.is_empty());
    assert_eq!(kills, 1);
}

#[test]
fn bullet_enemy_exact_reach_is_a_miss() {
    let reach = BULLET_RADIUS + ENEMY_RADIUS;
    let b = up_bullet(300.0, 200.0);
    assert!(!bullet_hits_enemy(&b, &Enemy::new(300.0 + reach, 200.0, 1)));
    assert!(bullet_hits_enemy(&b, &Enemy::new(300.0 + reach - 1.0, 200.0, 1)));
}

// ── Bullet ↔ obstacle ─────────────────────────────────────────────────────────

#[test]
fn obstacle_loses_one_life_per_hit_until_destroyed() {
    let mut obstacles = vec![Obstacle::new(400.0, 300.0, 3, ObstacleKind::Normal)];
    let mut lives = Vec::new();
    let mut destroyed_total = Vec::new();

    for _ in 0..3 {
        let (bullets, next, destroyed) =
            bullet_obstacle_pass(&[up_bullet(400.0, 300.0)], &obstacles);
        assert!(bullets.is_empty());
        obstacles = next;
        lives.push(obstacles[0].life);
        destroyed_total.extend(destroyed);
    }

    assert_eq!(lives, vec![2, 1, DESTROYED_LIFE]);
    assert_eq!(destroyed_total, vec![ObstacleKind::Normal]);
}

#[test]
fn destroyed_obstacle_is_inert_to_bullets() {
    let obstacles = vec![Obstacle::new(400.0, 300.0, DESTROYED_LIFE, ObstacleKind::Debuff)];
    let (bullets, obstacles, destroyed) =
        bullet_obstacle_pass(&[up_bullet(400.0, 300.0)], &obstacles);
    assert_eq!(bullets.len(), 1);
    assert_eq!(obstacles[0].life, DESTROYED_LIFE);
    assert!(destroyed.is_empty());
}

#[test]
fn same_frame_bullets_stop_once_obstacle_dies() {
    let obstacles = vec![Obstacle::new(400.0, 300.0, 1, ObstacleKind::Debuff)];
    let bullets = vec![up_bullet(400.0, 300.0), up_bullet(401.0, 300.0)];
    let (bullets, obstacles, destroyed) = bullet_obstacle_pass(&bullets, &obstacles);
    assert_eq!(bullets.len(), 1);
    assert_eq!(obstacles[0].life, DESTROYED_LIFE);
    assert_eq!(destroyed, vec![ObstacleKind::Debuff]);
}

#[test]
fn shoot_interval_adjustment_is_clamped() {
    assert_eq!(adjusted_shoot_interval(1000, ObstacleKind::Normal), 800);
    assert_eq!(adjusted_shoot_interval(300, ObstacleKind::Normal), MIN_SHOOT_INTERVAL_MS);
    assert_eq!(adjusted_shoot_interval(MIN_SHOOT_INTERVAL_MS, ObstacleKind::Normal), MIN_SHOOT_INTERVAL_MS);
    assert_eq!(adjusted_shoot_interval(1000, ObstacleKind::Debuff), 1200);
    assert_eq!(adjusted_shoot_interval(1900, ObstacleKind::Debuff), MAX_SHOOT_INTERVAL_MS);
}

// ── Soldier ↔ obstacle ────────────────────────────────────────────────────────

#[test]
fn soldier_lost_on_live_obstacle_only() {
    let squad = vec![soldier(160.0), soldier(400.0)];
    let live = vec![Obstacle::new(175.0, SOLDIER_ROW_Y + 15.0, 2, ObstacleKind::Normal)];
    let survivors = soldier_obstacle_pass(&squad, &live);
    assert_eq!(survivors.len(), 1);
    assert_eq!(survivors[0].x, 400.0);
    assert_eq!(live[0].life, 2);

    let dead = vec![Obstacle::new(175.0, SOLDIER_ROW_Y + 15.0, DESTROYED_LIFE, ObstacleKind::Normal)];
    assert_eq!(soldier_obstacle_pass(&squad, &dead).len(), 2);
}

// ── Bullet ↔ wall ─────────────────────────────────────────────────────────────

#[test]
fn bullet_on_wall_line_is_removed_passed_or_not() {
    let fresh = Wall::new(100.0, 390.0, 250.0, WallOp::Add2, 1);
    let passed = Wall {
        passed: true,
        op_applied: true,
        ..fresh.clone()
    };
    let bullet = up_bullet(200.0, 250.0);

    assert!(bullet_wall_pass(&[bullet.clone()], &[fresh], SCROLL_SPEED).is_empty());
    assert!(bullet_wall_pass(&[bullet], &[passed], SCROLL_SPEED).is_empty());
}

#[test]
fn bullet_moving_through_wall_is_removed() {
    let wall = Wall::new(100.0, 390.0, 250.0, WallOp::Sub2, 1);
    let moved = up_bullet(200.0, 256.0).step(&StepContext::default());
    assert!(bullet_crosses_wall(&moved, &wall, SCROLL_SPEED));
}

#[test]
fn bullet_outside_span_or_already_past_survives() {
    let wall = Wall::new(100.0, 390.0, 250.0, WallOp::Sub2, 1);
    let outside = up_bullet(400.0, 250.0);
    let above = up_bullet(200.0, 100.0).step(&StepContext::default());
    let below = up_bullet(200.0, 400.0).step(&StepContext::default());
    let kept = bullet_wall_pass(&[outside, above, below], &[wall], SCROLL_SPEED);
    assert_eq!(kept.len(), 3);
}

// ── Wall crossing ─────────────────────────────────────────────────────────────

#[test]
fn crossing_applies_once_and_releases_enemies() {
    let lead = soldier(200.0);
    let walls = vec![
        Wall::new(100.0, 390.0, SOLDIER_ROW_Y + 1.0, WallOp::Add2, 4),
        Wall::new(410.0, 700.0, SOLDIER_ROW_Y + 1.0, WallOp::Div2, 4),
    ];
    let crossing = wall_crossing_pass(&lead, &walls, Some(3));
    assert_eq!(crossing.applied, vec![WallOp::Add2]);
    assert_eq!(crossing.last_crossed_wall, Some(4));
    assert!(crossing.walls.iter().all(|w| w.passed));
    assert!(crossing.walls[0].op_applied);
    assert!(!crossing.walls[1].op_applied);
}

#[test]
fn crossing_does_not_repeat_while_inside_row() {
    let lead = soldier(200.0);
    let mut walls = vec![Wall::new(100.0, 390.0, SOLDIER_ROW_Y, WallOp::Mul2, 1)];
    let mut applied = Vec::new();

    for _ in 0..10 {
        let crossing = wall_crossing_pass(&lead, &walls, None);
        applied.extend(crossing.applied);
        walls = crossing.walls.iter().map(|w| w.step(&StepContext::default())).collect();
    }
    assert_eq!(applied, vec![WallOp::Mul2]);
}

#[test]
fn crossing_rearms_only_after_row_clears() {
    let lead = soldier(200.0);
    let inside = Wall {
        passed: true,
        op_applied: true,
        ..Wall::new(100.0, 390.0, SOLDIER_ROW_Y + SOLDIER_SIZE, WallOp::Add2, 1)
    };
    let still = wall_crossing_pass(&lead, &[inside.clone()], Some(1));
    assert!(still.walls[0].op_applied);
    assert!(still.applied.is_empty());

    let cleared = Wall {
        y1: SOLDIER_ROW_Y + SOLDIER_SIZE + 1.0,
        y2: SOLDIER_ROW_Y + SOLDIER_SIZE + 1.0,
        ..inside
    };
    let after = wall_crossing_pass(&lead, &[cleared], Some(1));
    assert!(!after.walls[0].op_applied);
    assert!(after.applied.is_empty());
}

#[test]
fn wall_above_row_is_not_passed() {
    let lead = soldier(200.0);
    let walls = vec![Wall::new(100.0, 390.0, SOLDIER_ROW_Y - 1.0, WallOp::Add2, 2)];
    let crossing = wall_crossing_pass(&lead, &walls, Some(1));
    assert!(!crossing.walls[0].passed);
    assert_eq!(crossing.last_crossed_wall, Some(1));
    assert!(crossing.applied.is_empty());
}

#[test]
fn lead_outside_span_marks_passed_without_transform() {
    let lead = soldier(395.0); // in the gap between the walls
    let walls = vec![
        Wall::new(100.0, 390.0, SOLDIER_ROW_Y, WallOp::Add2, 2),
        Wall::new(410.0, 700.0, SOLDIER_ROW_Y, WallOp::Add2, 2),
    ];
    let crossing = wall_crossing_pass(&lead, &walls, None);
    assert!(crossing.applied.is_empty());
    assert_eq!(crossing.last_crossed_wall, Some(2));
}

// ── Squad resize ──────────────────────────────────────────────────────────────

#[test]
fn growth_prefers_right_side() {
    let squad = resize_squad(&[soldier(200.0)], 3);
    let xs: Vec<f32> = squad.iter().map(|s| s.x).collect();
    let step = SOLDIER_SIZE + SOLDIER_GAP;
    assert_eq!(xs, vec![200.0, 200.0 + step, 200.0 + 2.0 * step]);
    assert!(squad.iter().all(|s| s.y == SOLDIER_ROW_Y));
}

#[test]
fn growth_falls_back_to_left_at_right_edge() {
    let edge = LANE_RIGHT - SOLDIER_SIZE;
    let squad = resize_squad(&[soldier(edge)], 3);
    let step = SOLDIER_SIZE + SOLDIER_GAP;
    let xs: Vec<f32> = squad.iter().map(|s| s.x).collect();
    assert_eq!(xs, vec![edge, edge - step, edge - 2.0 * step]);
}

#[test]
fn growth_stops_when_lane_is_full() {
    let squad = resize_squad(&[soldier(385.0)], 100);
    assert!(squad.len() > 1 && squad.len() < 100);
    assert!(squad
        .iter()
        .all(|s| s.x >= LANE_LEFT && s.x + s.size <= LANE_RIGHT));
}

#[test]
fn shrink_drops_tail_to_floor_of_one() {
    let squad = resize_squad(&[soldier(200.0)], 5);
    let shrunk = resize_squad(&squad, 2);
    assert_eq!(shrunk, squad[..2].to_vec());
    assert_eq!(resize_squad(&squad, 0).len(), 1);
    assert!(resize_squad(&[], 3).is_empty());
}

// ── resolve ───────────────────────────────────────────────────────────────────

#[test]
fn resolve_counts_kills_and_emits_events() {
    let mut s = init_state(0);
    s.enemies.push(Enemy::new(300.0, 200.0, 1));
    s.bullets.push(up_bullet(300.0, 200.0));
    let s2 = resolve(&s, SCROLL_SPEED, 0);
    assert_eq!(s2.kills, 1);
    assert!(s2.enemies.is_empty());
    assert!(s2.bullets.is_empty());
    assert_eq!(s2.events, vec![GameEvent::EnemyKilled]);
}

#[test]
fn resolve_culls_below_screen() {
    let mut s = init_state(0);
    s.enemies.push(Enemy::new(300.0, WORLD_HEIGHT + 1.0, 1));
    s.walls.push(Wall::new(100.0, 390.0, WORLD_HEIGHT + 1.0, WallOp::Add2, 1));
    s.obstacles.push(Obstacle::new(175.0, WORLD_HEIGHT + 1.0, 3, ObstacleKind::Normal));
    s.power_ups.push(PowerUp::new(PowerUpKind::Speed, 150.0, WORLD_HEIGHT + 1.0));
    let s2 = resolve(&s, SCROLL_SPEED, 0);
    assert!(s2.enemies.is_empty());
    assert!(s2.walls.is_empty());
    assert!(s2.obstacles.is_empty());
    assert!(s2.power_ups.is_empty());
}

#[test]
fn resolve_destroying_debuff_slows_fire() {
    let mut s = init_state(0);
    s.obstacles.push(Obstacle::new(625.0, 300.0, 1, ObstacleKind::Debuff));
    s.bullets.push(up_bullet(625.0, 300.0));
    let s2 = resolve(&s, SCROLL_SPEED, 0);
    assert_eq!(s2.shoot_interval_ms, INITIAL_SHOOT_INTERVAL_MS + SHOOT_INTERVAL_STEP_MS);
    assert_eq!(s2.events, vec![GameEvent::ObstacleDestroyed(ObstacleKind::Debuff)]);
}

#[test]
fn resolve_picks_up_power_up() {
    let mut s = init_state(0);
    let lead = s.squad[0].clone();
    s.power_ups.push(PowerUp::new(
        PowerUpKind::Speed,
        lead.x + lead.size / 2.0,
        lead.y,
    ));
    let s2 = resolve(&s, SCROLL_SPEED, 1234);
    assert!(s2.power_ups[0].active);
    assert_eq!(s2.power_ups[0].activated_at_ms, 1234);
    assert_eq!(s2.speed_multiplier, SPEED_BOOST);
    assert_eq!(s2.squad[0].speed_multiplier, SPEED_BOOST);
    assert_eq!(s2.events, vec![GameEvent::PowerUpCollected(PowerUpKind::Speed)]);
}
