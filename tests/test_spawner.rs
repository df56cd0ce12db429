use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crowd_rush::compute::init_state;
use crowd_rush::consts::*;
use crowd_rush::entities::*;
use crowd_rush::spawner::*;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

// ── generate_set ──────────────────────────────────────────────────────────────

#[test]
fn set_has_two_walls_at_fixed_spans() {
    let set = generate_set(0.0, 7, 4, &mut seeded_rng());
    let [left, right] = &set.walls;
    assert_eq!((left.x1, left.x2), WALL_LEFT_SPAN);
    assert_eq!((right.x1, right.x2), WALL_RIGHT_SPAN);
    for wall in &set.walls {
        assert_eq!(wall.y1, 0.0);
        assert_eq!(wall.y2, 0.0);
        assert_eq!(wall.wall_id, 7);
        assert!(!wall.passed);
        assert!(!wall.op_applied);
    }
}

#[test]
fn enemies_sit_in_band_behind_their_wall() {
    let mut rng = seeded_rng();
    for set_id in 1..200 {
        let y = 0.0;
        let set = generate_set(y, set_id, 8, &mut rng);
        assert!(set.enemies.len() <= 8);
        for e in &set.enemies {
            assert_eq!(e.wall_id, set_id);
            assert!(!e.moving);
            assert!(e.x >= LANE_LEFT && e.x <= LANE_RIGHT);
            assert!(e.y > y - SET_SPACING && e.y < y, "enemy y {} outside band", e.y);
        }
    }
}

#[test]
fn zero_cap_means_no_enemies() {
    let mut rng = seeded_rng();
    for id in 0..20 {
        assert!(generate_set(0.0, id, 0, &mut rng).enemies.is_empty());
    }
}

#[test]
fn obstacle_pair_on_opposite_sides_debuff_weaker() {
    let mut rng = seeded_rng();
    let mut sides = HashSet::new();
    for id in 0..200 {
        let set = generate_set(0.0, id, 2, &mut rng);
        assert_eq!(set.obstacle.kind, ObstacleKind::Normal);
        assert_eq!(set.debuff.kind, ObstacleKind::Debuff);
        assert_ne!(set.obstacle.x, set.debuff.x);
        assert_eq!(set.obstacle.y, set.debuff.y);
        assert!((OBSTACLE_LIFE.0..=OBSTACLE_LIFE.1).contains(&set.obstacle.life));
        assert!((DEBUFF_LIFE.0..=DEBUFF_LIFE.1).contains(&set.debuff.life));
        assert!(set.debuff.life < set.obstacle.life);
        sides.insert(set.obstacle.x < set.debuff.x);
    }
    // Both layouts show up.
    assert_eq!(sides.len(), 2);
}

#[test]
fn every_operation_is_drawn() {
    let mut rng = seeded_rng();
    let mut seen = HashSet::new();
    for id in 0..200 {
        for wall in generate_set(0.0, id, 1, &mut rng).walls {
            seen.insert(wall.op.glyph());
        }
    }
    assert_eq!(seen.len(), WallOp::ALL.len());
}

#[test]
fn same_seed_same_set() {
    let a = generate_set(0.0, 3, 6, &mut seeded_rng());
    let b = generate_set(0.0, 3, 6, &mut seeded_rng());
    assert_eq!(a.walls, b.walls);
    assert_eq!(a.enemies, b.enemies);
    assert_eq!(a.obstacle, b.obstacle);
}

// ── Difficulty ramp ───────────────────────────────────────────────────────────

#[test]
fn enemy_cap_grows_then_caps() {
    assert_eq!(next_enemy_cap(INITIAL_ENEMY_CAP), INITIAL_ENEMY_CAP + 1);
    assert_eq!(next_enemy_cap(MAX_ENEMY_CAP - 1), MAX_ENEMY_CAP);
    assert_eq!(next_enemy_cap(MAX_ENEMY_CAP), MAX_ENEMY_CAP);
}

// ── Spawn trigger ─────────────────────────────────────────────────────────────

#[test]
fn set_due_when_empty_or_top_wall_far_enough() {
    assert!(set_due(&[]));

    let near = Wall::new(100.0, 390.0, SET_SPACING - 1.0, WallOp::Add2, 1);
    let far = Wall::new(100.0, 390.0, SET_SPACING, WallOp::Add2, 1);
    let older = Wall::new(100.0, 390.0, SET_SPACING + 200.0, WallOp::Add2, 0);

    assert!(!set_due(&[older.clone(), near]));
    assert!(set_due(&[older, far]));
}

// ── Power-ups ─────────────────────────────────────────────────────────────────

#[test]
fn power_up_spawns_only_missing_kinds() {
    let mut rng = seeded_rng();
    let mut state = init_state(0);
    state.power_ups.push(PowerUp::new(PowerUpKind::Speed, 300.0, 10.0));
    for _ in 0..20 {
        let p = spawn_power_up(&state, &mut rng).expect("bullet-speed slot is free");
        assert_eq!(p.kind, PowerUpKind::BulletSpeed);
        assert!(!p.active);
        assert!(p.x > LANE_LEFT && p.x < LANE_RIGHT);
    }
}

#[test]
fn no_power_up_when_both_live() {
    let mut state = init_state(0);
    state.power_ups = vec![
        PowerUp::new(PowerUpKind::Speed, 300.0, 10.0),
        PowerUp {
            active: true,
            ..PowerUp::new(PowerUpKind::BulletSpeed, 300.0, 10.0)
        },
    ];
    assert!(state.has_power_up(PowerUpKind::Speed));
    assert!(state.has_power_up(PowerUpKind::BulletSpeed));
    assert!(spawn_power_up(&state, &mut seeded_rng()).is_none());
}
