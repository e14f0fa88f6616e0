/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (and, where needed, an RNG handle) and returns a brand-new
/// `GameState`.  Side effects are limited to the injected RNG and logging.

use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info};

use crate::config::Config;
use crate::entities::{EnemyColor, GameState, GameStatus, Laser, Ship, ShipKind};
use crate::input::Controls;
use crate::sprite::{Mask, SpriteSheet};

/// Enemies are destroyed by a single laser, so this only matters for display.
const ENEMY_HEALTH: i32 = 100;

// ── Collision ────────────────────────────────────────────────────────────────

/// Anything that occupies cells on the field: a position plus a mask.
pub trait Collider {
    fn position(&self) -> (i32, i32);
    fn mask<'a>(&self, sprites: &'a SpriteSheet) -> &'a Mask;
}

impl Collider for Ship {
    fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    fn mask<'a>(&self, sprites: &'a SpriteSheet) -> &'a Mask {
        sprites.ship(self.kind).mask()
    }
}

impl Collider for Laser {
    fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    fn mask<'a>(&self, sprites: &'a SpriteSheet) -> &'a Mask {
        sprites.laser(self.owner).mask()
    }
}

/// Pixel-perfect collision: true when any solid cell of `a` lies on a
/// solid cell of `b`.
pub fn collide(a: &impl Collider, b: &impl Collider, sprites: &SpriteSheet) -> bool {
    let (ax, ay) = a.position();
    let (bx, by) = b.position();
    a.mask(sprites)
        .overlap(b.mask(sprites), (bx - ax, by - ay))
        .is_some()
}

// ── Shooting ─────────────────────────────────────────────────────────────────

/// Advance a cooldown counter by one frame.  Zero means "ready to fire";
/// a counter that has reached `limit` wraps back to zero.
pub fn cooldown(counter: u32, limit: u32) -> u32 {
    if counter >= limit {
        0
    } else if counter > 0 {
        counter + 1
    } else {
        0
    }
}

fn fire(ship: &mut Ship, sprites: &SpriteSheet) {
    if ship.cool_down_counter != 0 {
        return;
    }
    let body = sprites.ship(ship.kind);
    let laser = sprites.laser(ship.kind);
    let x = ship.x + (body.width() - laser.width()) / 2;
    // Player lasers leave from the nose, enemy lasers from under the hull.
    let y = match ship.kind {
        ShipKind::Player => ship.y,
        ShipKind::Enemy(_) => ship.y + body.height(),
    };
    ship.lasers.push(Laser {
        x,
        y,
        owner: ship.kind,
    });
    ship.cool_down_counter = 1;
}

/// Fire one laser from `ship` if its cooldown allows it.
pub fn shoot(ship: &Ship, sprites: &SpriteSheet) -> Ship {
    let mut ship = ship.clone();
    fire(&mut ship, sprites);
    ship
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the state of a fresh session on a `width` x `height` field.
/// The field starts empty; the first `tick` spawns wave one.
pub fn init_state(
    config: Arc<Config>,
    sprites: Arc<SpriteSheet>,
    width: u16,
    height: u16,
) -> GameState {
    let body = sprites.ship(ShipKind::Player);
    let x = (width as i32 * 2 / 5)
        .min(width as i32 - body.width() - 1)
        .max(1);
    let y = (height as i32 - body.height() - config.health_bar_gap - 1).max(1);

    GameState {
        player: Ship::new(ShipKind::Player, x, y, config.player_health),
        enemies: Vec::new(),
        level: 0,
        lives: config.starting_lives,
        wave_length: config.starting_wave_length,
        status: GameStatus::Playing,
        frame: 0,
        width,
        height,
        sprites,
        config,
    }
}

/// Clear the field for the next level: bump the level, grow the wave and
/// scatter it above the top edge so it trickles in.
pub fn spawn_wave(state: &GameState, rng: &mut impl Rng) -> GameState {
    let config = &state.config;
    let mut next = state.clone();
    next.level += 1;
    next.wave_length += config.wave_increment;

    let width = state.width as i32;
    let depth = (state.height as i32).saturating_mul(config.spawn_depth_screens);

    for _ in 0..next.wave_length {
        let color = EnemyColor::ALL[rng.gen_range(0..EnemyColor::ALL.len())];
        let kind = ShipKind::Enemy(color);
        let body = state.sprites.ship(kind);

        let x_lo = config.spawn_margin;
        let x_hi = width - body.width() - config.spawn_margin;
        let x = if x_hi > x_lo { rng.gen_range(x_lo..x_hi) } else { x_lo };

        let y_hi = -body.height();
        let y = if y_hi > -depth { rng.gen_range(-depth..y_hi) } else { y_hi };

        next.enemies.push(Ship::new(kind, x, y, ENEMY_HEALTH));
    }

    info!(level = next.level, wave_length = next.wave_length, "wave spawned");
    next
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

fn with_player(state: &GameState, f: impl FnOnce(&mut Ship)) -> GameState {
    let mut next = state.clone();
    f(&mut next.player);
    next
}

pub fn move_player_left(state: &GameState) -> GameState {
    let vel = state.config.player_step_x;
    if state.player.x - vel > 0 {
        with_player(state, |p| p.x -= vel)
    } else {
        state.clone()
    }
}

pub fn move_player_right(state: &GameState) -> GameState {
    let vel = state.config.player_step_x;
    let width = state.sprites.ship(ShipKind::Player).width();
    if state.player.x + vel + width < state.width as i32 {
        with_player(state, |p| p.x += vel)
    } else {
        state.clone()
    }
}

pub fn move_player_up(state: &GameState) -> GameState {
    let vel = state.config.player_step_y;
    if state.player.y - vel > 0 {
        with_player(state, |p| p.y -= vel)
    } else {
        state.clone()
    }
}

/// Moving down stops early enough to keep the health bar on screen.
pub fn move_player_down(state: &GameState) -> GameState {
    let vel = state.config.player_step_y;
    let height = state.sprites.ship(ShipKind::Player).height();
    if state.player.y + vel + height + state.config.health_bar_gap < state.height as i32 {
        with_player(state, |p| p.y += vel)
    } else {
        state.clone()
    }
}

pub fn player_shoot(state: &GameState) -> GameState {
    let sprites = Arc::clone(&state.sprites);
    with_player(state, |p| fire(p, &sprites))
}

/// Apply every requested action; opposite directions are both applied
/// and cancel out.
pub fn apply_controls(state: &GameState, controls: &Controls) -> GameState {
    let mut next = state.clone();
    if controls.left {
        next = move_player_left(&next);
    }
    if controls.right {
        next = move_player_right(&next);
    }
    if controls.up {
        next = move_player_up(&next);
    }
    if controls.down {
        next = move_player_down(&next);
    }
    if controls.shoot {
        next = player_shoot(&next);
    }
    next
}

// ── Laser movement ───────────────────────────────────────────────────────────

/// Move an enemy's lasers down; a laser that reaches the player damages it.
fn move_enemy_lasers(
    enemy: &mut Ship,
    player: &mut Ship,
    config: &Config,
    height: i32,
    sprites: &SpriteSheet,
) {
    enemy.cool_down_counter = cooldown(enemy.cool_down_counter, config.cooldown_frames);
    enemy.lasers.retain_mut(|laser| {
        laser.move_by(config.laser_speed);
        if laser.off_screen(height) {
            false
        } else if collide(&*laser, &*player, sprites) {
            player.health -= config.laser_damage;
            debug!(health = player.health, "player hit by laser");
            false
        } else {
            true
        }
    });
}

/// Move the player's lasers up; every enemy a laser touches is destroyed
/// along with the laser.
fn move_player_lasers(
    player: &mut Ship,
    enemies: &mut Vec<Ship>,
    config: &Config,
    height: i32,
    sprites: &SpriteSheet,
) {
    player.cool_down_counter = cooldown(player.cool_down_counter, config.cooldown_frames);
    player.lasers.retain_mut(|laser| {
        laser.move_by(-config.laser_speed);
        if laser.off_screen(height) {
            return false;
        }
        let before = enemies.len();
        enemies.retain(|enemy| !collide(&*laser, enemy, sprites));
        let destroyed = before - enemies.len();
        if destroyed > 0 {
            debug!(destroyed, remaining = enemies.len(), "enemy destroyed");
        }
        destroyed == 0
    });
}

// ── Per-frame tick (nearly pure — RNG is injected) ──────────────────────────

/// Advance the simulation by one frame.  All randomness comes through `rng`
/// so callers control determinism (useful for tests with a seeded RNG).
pub fn tick(state: &GameState, controls: &Controls, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    next.frame = state.frame + 1;
    let config = Arc::clone(&state.config);
    let sprites = Arc::clone(&state.sprites);

    if next.status == GameStatus::Finished {
        return next;
    }

    // ── 1. Lost screen: the world freezes until it has been shown long enough
    if next.lives <= 0 || next.player.health <= 0 {
        let frames = match state.status {
            GameStatus::Lost { frames } => frames + 1,
            _ => {
                info!(
                    level = next.level,
                    lives = next.lives,
                    health = next.player.health,
                    "game lost"
                );
                1
            }
        };
        next.status = if frames > config.lost_screen_frames() {
            GameStatus::Finished
        } else {
            GameStatus::Lost { frames }
        };
        return next;
    }

    // ── 2. Next wave once the field is clear ─────────────────────────────────
    if next.enemies.is_empty() {
        next = spawn_wave(&next, rng);
    }

    // ── 3. Player input ──────────────────────────────────────────────────────
    next = apply_controls(&next, controls);

    // ── 4. Enemies: descend, fire, ram the player or slip past ──────────────
    let height = next.height as i32;
    let descend = next.frame % config.enemy_move_interval == 0;
    let fire_odds = config.enemy_fire_odds();

    let enemies = std::mem::take(&mut next.enemies);
    let mut survivors = Vec::with_capacity(enemies.len());
    for mut enemy in enemies {
        if descend {
            enemy.y += config.enemy_speed;
        }
        move_enemy_lasers(&mut enemy, &mut next.player, &config, height, &sprites);

        if rng.gen_range(0..fire_odds) == 1 {
            fire(&mut enemy, &sprites);
        }

        if collide(&enemy, &next.player, &sprites) {
            next.player.health -= config.collision_damage;
            debug!(health = next.player.health, "player rammed");
        } else if enemy.y + sprites.ship(enemy.kind).height() > height {
            next.lives -= 1;
            debug!(lives = next.lives, "enemy slipped past");
        } else {
            survivors.push(enemy);
        }
    }
    next.enemies = survivors;

    // ── 5. Player lasers ─────────────────────────────────────────────────────
    move_player_lasers(&mut next.player, &mut next.enemies, &config, height, &sprites);

    next
}
