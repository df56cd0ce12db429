/// All game entity types plus their per-kind movement rules.
///
/// Entities are plain values.  Movement goes through the `Step` trait, which
/// returns an updated copy and never touches anything but position.

use std::f32::consts::PI;

use crate::consts::*;

#[derive(Clone, Debug, PartialEq)]
pub enum GameStatus {
    Playing,
    GameOver,
}

// ── Movement context ──────────────────────────────────────────────────────────

/// Everything an entity may look at while moving one frame.
#[derive(Clone, Debug)]
pub struct StepContext {
    /// Lateral input: -1 left, 0 none, +1 right.
    pub lateral: i32,
    /// Downward world scroll this frame.
    pub scroll: f32,
    /// Multiplier on bullet travel (BulletSpeed power-up).
    pub bullet_speed: f32,
    /// Position of the lead soldier, if any soldier is alive.
    pub lead: Option<(f32, f32)>,
    /// Highest wall-set id whose wall has been passed.
    pub last_crossed_wall: Option<u32>,
}

impl Default for StepContext {
    fn default() -> Self {
        Self {
            lateral: 0,
            scroll: SCROLL_SPEED,
            bullet_speed: 1.0,
            lead: None,
            last_crossed_wall: None,
        }
    }
}

/// Per-kind movement rule.
pub trait Step {
    fn step(&self, ctx: &StepContext) -> Self;
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    /// y before the most recent move; used for wall crossing.
    pub prev_y: f32,
    pub radius: f32,
    /// Travel angle in (0, π); π/2 is straight up.
    pub angle: f32,
}

impl Bullet {
    pub fn new(x: f32, y: f32, angle: f32) -> Self {
        Self {
            x,
            y,
            prev_y: y,
            radius: BULLET_RADIUS,
            angle: angle.clamp(f32::EPSILON, PI - f32::EPSILON),
        }
    }

    /// True once the bullet has left the lane or the top of the screen.
    pub fn is_off_lane(&self) -> bool {
        self.x < LANE_LEFT || self.x > LANE_RIGHT || self.y + self.radius < 0.0
    }
}

impl Step for Bullet {
    fn step(&self, ctx: &StepContext) -> Self {
        let speed = BULLET_SPEED * ctx.bullet_speed;
        Bullet {
            x: self.x + speed * self.angle.cos(),
            y: self.y - speed * self.angle.sin(),
            prev_y: self.y,
            ..self.clone()
        }
    }
}

// ── Squad ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Soldier {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    pub size: f32,
    pub speed_multiplier: f32,
}

impl Soldier {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            size: SOLDIER_SIZE,
            speed_multiplier: 1.0,
        }
    }

    /// Rightmost legal left edge.
    pub fn max_x(&self) -> f32 {
        LANE_RIGHT - self.size
    }
}

impl Step for Soldier {
    /// Clamping (rather than refusing the move) keeps a soldier sitting
    /// exactly on a lane edge free to move back inward.
    fn step(&self, ctx: &StepContext) -> Self {
        let dx = ctx.lateral.signum() as f32 * MOVE_STEP * self.speed_multiplier;
        Soldier {
            x: (self.x + dx).clamp(LANE_LEFT, self.max_x()),
            ..self.clone()
        }
    }
}

/// Move the whole row by one shared offset, shortened so the outermost
/// soldier stops at the lane edge.  Spacing inside the row never changes.
pub fn step_squad(squad: &[Soldier], ctx: &StepContext) -> Vec<Soldier> {
    let Some(lead) = squad.first() else {
        return Vec::new();
    };
    let wanted = ctx.lateral.signum() as f32 * MOVE_STEP * lead.speed_multiplier;

    let left = squad.iter().map(|s| s.x).fold(f32::INFINITY, f32::min);
    let right = squad.iter().map(|s| s.x - s.max_x()).fold(f32::NEG_INFINITY, f32::max);
    // room to each edge; a row already past an edge may still move inward
    let lo = (LANE_LEFT - left).min(0.0);
    let hi = (-right).max(0.0);
    let dx = wanted.clamp(lo, hi);

    squad
        .iter()
        .map(|s| Soldier {
            x: (s.x + dx).clamp(LANE_LEFT, s.max_x()),
            ..s.clone()
        })
        .collect()
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub speed: f32,
    /// Id of the wall set this enemy belongs to.
    pub wall_id: u32,
    /// Set once its wall has been crossed; from then on it seeks the squad.
    pub moving: bool,
}

impl Enemy {
    pub fn new(x: f32, y: f32, wall_id: u32) -> Self {
        Self {
            x,
            y,
            radius: ENEMY_RADIUS,
            speed: ENEMY_SPEED,
            wall_id,
            moving: false,
        }
    }
}

impl Step for Enemy {
    fn step(&self, ctx: &StepContext) -> Self {
        let moving = self.moving
            || ctx
                .last_crossed_wall
                .is_some_and(|crossed| self.wall_id <= crossed);

        let x = match ctx.lead {
            Some((lead_x, _)) if moving => {
                self.x + (lead_x - self.x).clamp(-self.speed, self.speed)
            }
            _ => self.x,
        };

        Enemy {
            x,
            y: self.y + ctx.scroll,
            moving,
            ..self.clone()
        }
    }
}

// ── Obstacles ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObstacleKind {
    /// Destroying it shortens the shoot interval.
    Normal,
    /// Destroying it lengthens the shoot interval.
    Debuff,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub half_side: f32,
    /// Remaining hits; `DESTROYED_LIFE` once destroyed.
    pub life: i32,
    pub kind: ObstacleKind,
}

impl Obstacle {
    pub fn new(x: f32, y: f32, life: i32, kind: ObstacleKind) -> Self {
        Self {
            x,
            y,
            half_side: OBSTACLE_HALF_SIDE,
            life,
            kind,
        }
    }

    /// Destroyed obstacles neither collide nor draw.
    pub fn is_live(&self) -> bool {
        self.life > 0
    }
}

impl Step for Obstacle {
    fn step(&self, ctx: &StepContext) -> Self {
        Obstacle {
            y: self.y + ctx.scroll,
            ..self.clone()
        }
    }
}

// ── Walls ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WallOp {
    Add2,
    Sub2,
    Mul2,
    Div2,
}

impl WallOp {
    pub const ALL: [WallOp; 4] = [WallOp::Add2, WallOp::Sub2, WallOp::Mul2, WallOp::Div2];

    /// New squad size after crossing; never below 1.
    pub fn apply(&self, squad_size: usize) -> usize {
        let next = match self {
            WallOp::Add2 => squad_size + 2,
            WallOp::Sub2 => squad_size.saturating_sub(2),
            WallOp::Mul2 => squad_size * 2,
            WallOp::Div2 => squad_size / 2,
        };
        next.max(1)
    }

    /// Text drawn on the wall.
    pub fn glyph(&self) -> &'static str {
        match self {
            WallOp::Add2 => "+2",
            WallOp::Sub2 => "-2",
            WallOp::Mul2 => "x2",
            WallOp::Div2 => "/2",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Wall {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub op: WallOp,
    pub wall_id: u32,
    /// The wall line has reached the lead soldier's row.
    pub passed: bool,
    /// The transform has fired for the current crossing.
    pub op_applied: bool,
}

impl Wall {
    pub fn new(x1: f32, x2: f32, y: f32, op: WallOp, wall_id: u32) -> Self {
        Self {
            x1,
            y1: y,
            x2,
            y2: y,
            op,
            wall_id,
            passed: false,
            op_applied: false,
        }
    }

    pub fn spans(&self, x: f32) -> bool {
        x >= self.x1 && x <= self.x2
    }
}

impl Step for Wall {
    fn step(&self, ctx: &StepContext) -> Self {
        Wall {
            y1: self.y1 + ctx.scroll,
            y2: self.y2 + ctx.scroll,
            ..self.clone()
        }
    }
}

// ── Power-ups ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerUpKind {
    /// Multiplies the squad's lateral step.
    Speed,
    /// Multiplies bullet travel speed.
    BulletSpeed,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 2] = [PowerUpKind::Speed, PowerUpKind::BulletSpeed];
}

#[derive(Clone, Debug, PartialEq)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// Picked up and in effect; an active power-up is no longer on the field.
    pub active: bool,
    /// Time of pickup, meaningful only while `active`.
    pub activated_at_ms: u64,
}

impl PowerUp {
    pub fn new(kind: PowerUpKind, x: f32, y: f32) -> Self {
        Self {
            kind,
            x,
            y,
            radius: POWER_UP_RADIUS,
            active: false,
            activated_at_ms: 0,
        }
    }
}

impl Step for PowerUp {
    fn step(&self, ctx: &StepContext) -> Self {
        if self.active {
            return self.clone();
        }
        PowerUp {
            y: self.y + ctx.scroll,
            ..self.clone()
        }
    }
}

// ── Frame events ──────────────────────────────────────────────────────────────

/// Side effects produced by one frame step, consumed by the frontend.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    EnemyKilled,
    SoldierLost,
    WallCrossed { op: WallOp, squad_size: usize },
    ObstacleDestroyed(ObstacleKind),
    PowerUpCollected(PowerUpKind),
    PowerUpExpired(PowerUpKind),
    WaveSpawned { set_id: u32, enemies: usize },
    GameOver,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire game state.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    /// Squad row; index 0 is the lead soldier.
    pub squad: Vec<Soldier>,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub walls: Vec<Wall>,
    /// Normal and debuff obstacles.
    pub obstacles: Vec<Obstacle>,
    /// Field and active power-ups; at most one per kind.
    pub power_ups: Vec<PowerUp>,
    pub kills: u32,
    /// Current upper bound on enemies per wall set.
    pub enemy_cap: u32,
    pub next_set_id: u32,
    pub last_crossed_wall: Option<u32>,
    /// Lateral speed multiplier applied to every soldier.
    pub speed_multiplier: f32,
    pub bullet_speed_multiplier: f32,
    pub shoot_interval_ms: u64,
    pub last_shot_ms: u64,
    pub last_power_up_ms: u64,
    pub status: GameStatus,
    pub frame: u64,
    /// Events produced by the most recent frame step.
    pub events: Vec<GameEvent>,
}

impl GameState {
    pub fn squad_size(&self) -> usize {
        self.squad.len()
    }

    pub fn lead(&self) -> Option<&Soldier> {
        self.squad.first()
    }

    pub fn has_power_up(&self, kind: PowerUpKind) -> bool {
        self.power_ups.iter().any(|p| p.kind == kind)
    }
}
