/// All game entity types — plain data plus a few trivial accessors.

use std::sync::Arc;

use crate::config::Config;
use crate::sprite::SpriteSheet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyColor {
    Red,
    Green,
    Blue,
}

impl EnemyColor {
    pub const ALL: [EnemyColor; 3] = [EnemyColor::Red, EnemyColor::Blue, EnemyColor::Green];
}

/// Which ship a sprite, a ship or a laser belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShipKind {
    Player,
    Enemy(EnemyColor),
}

#[derive(Clone, Debug, PartialEq)]
pub enum GameStatus {
    Playing,
    /// The "You Lost!!" screen; `frames` counts how long it has been shown.
    Lost { frames: u32 },
    /// The lost screen has run its course; the session is over.
    Finished,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Laser {
    pub x: i32,
    pub y: i32,
    /// The kind of ship that fired it (selects image and mask).
    pub owner: ShipKind,
}

impl Laser {
    pub fn move_by(&mut self, vel: i32) {
        self.y += vel;
    }

    /// A laser is on screen while `0 <= y <= height`.
    pub fn off_screen(&self, height: i32) -> bool {
        !(self.y >= 0 && self.y <= height)
    }
}

// ── Ships ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Ship {
    pub x: i32,
    pub y: i32,
    /// May go negative; anything `<= 0` means the ship is done for.
    pub health: i32,
    pub max_health: i32,
    pub kind: ShipKind,
    pub cool_down_counter: u32,
    pub lasers: Vec<Laser>,
}

impl Ship {
    pub fn new(kind: ShipKind, x: i32, y: i32, health: i32) -> Self {
        Ship {
            x,
            y,
            health,
            max_health: health,
            kind,
            cool_down_counter: 0,
            lasers: Vec::new(),
        }
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire state of one game session.  Cloneable so pure update
/// functions can return a new copy without mutating the original; the
/// sprite sheet and config are shared, not copied.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Ship,
    pub enemies: Vec<Ship>,
    pub level: u32,
    pub lives: i32,
    /// Enemies in the current wave; grows every time a wave is cleared.
    pub wave_length: u32,
    pub status: GameStatus,
    pub frame: u64,
    pub width: u16,
    pub height: u16,
    pub sprites: Arc<SpriteSheet>,
    pub config: Arc<Config>,
}
