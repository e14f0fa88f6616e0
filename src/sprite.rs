/// Character-art sprites and the pixel masks used for collision.
///
/// One terminal cell is one pixel.  A blank (space) cell is transparent;
/// every other cell is solid and takes part in mask overlap tests.

use std::path::Path;

use crate::entities::{EnemyColor, ShipKind};
use crate::error::{Result, ShooterError};

// ── Built-in art ──────────────────────────────────────────────────────────────

const PLAYER_SHIP_ART: &str = "  ▲  \n /█\\ \n◢███◣";
const RED_SHIP_ART: &str = "«▼»\n╚═╝";
const GREEN_SHIP_ART: &str = "(◎)\n╰─╯";
const BLUE_SHIP_ART: &str = "/▽\\\n└┬┘";

const PLAYER_LASER_ART: &str = "║";
const RED_LASER_ART: &str = "↓";
const GREEN_LASER_ART: &str = "¦";
const BLUE_LASER_ART: &str = "┇";

// ── Mask ──────────────────────────────────────────────────────────────────────

/// Per-cell solidity map of a sprite.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl Mask {
    pub fn from_rows(rows: &[Vec<char>]) -> Self {
        let height = rows.len();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut bits = vec![false; width * height];
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.iter().enumerate() {
                bits[y * width + x] = *ch != ' ';
            }
        }
        Mask { width, height, bits }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Solidity of the cell at (x, y).  Anything outside the mask is empty.
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return false;
        }
        self.bits[y as usize * self.width + x as usize]
    }

    /// Number of solid cells.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    /// First cell (in `self` coordinates, row-major) where both masks are
    /// solid, with `other` placed at `offset` relative to `self`.
    pub fn overlap(&self, other: &Mask, offset: (i32, i32)) -> Option<(i32, i32)> {
        let (dx, dy) = offset;
        let x0 = dx.max(0);
        let y0 = dy.max(0);
        let x1 = (self.width as i32).min(dx + other.width as i32);
        let y1 = (self.height as i32).min(dy + other.height as i32);

        for y in y0..y1 {
            for x in x0..x1 {
                if self.get(x, y) && other.get(x - dx, y - dy) {
                    return Some((x, y));
                }
            }
        }
        None
    }
}

// ── Sprite ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Sprite {
    rows: Vec<Vec<char>>,
    mask: Mask,
}

impl Sprite {
    /// Build a sprite from a block of character art.  Rows shorter than the
    /// widest one are padded with transparent cells.
    pub fn from_art(name: &str, art: &str) -> Result<Self> {
        let mut rows: Vec<Vec<char>> = art
            .lines()
            .map(|l| l.trim_end_matches('\r').chars().collect())
            .collect();

        while rows.last().is_some_and(|r| r.iter().all(|c| *c == ' ')) {
            rows.pop();
        }

        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(width, ' ');
        }

        let mask = Mask::from_rows(&rows);
        if mask.count() == 0 {
            return Err(ShooterError::EmptySprite {
                name: name.to_string(),
            });
        }
        Ok(Sprite { rows, mask })
    }

    pub fn width(&self) -> i32 {
        self.mask.width() as i32
    }

    pub fn height(&self) -> i32 {
        self.mask.height() as i32
    }

    pub fn rows(&self) -> &[Vec<char>] {
        &self.rows
    }

    pub fn mask(&self) -> &Mask {
        &self.mask
    }
}

// ── Sprite sheet ──────────────────────────────────────────────────────────────

/// Ship and laser image for one kind of ship.
#[derive(Clone, Debug)]
pub struct ShipImages {
    pub ship: Sprite,
    pub laser: Sprite,
}

/// Every image the game draws, loaded once at startup and shared.
#[derive(Clone, Debug)]
pub struct SpriteSheet {
    player: ShipImages,
    red: ShipImages,
    green: ShipImages,
    blue: ShipImages,
}

/// Asset file names, one per image, as `(ship, laser)` pairs.
fn asset_names(kind: ShipKind) -> (&'static str, &'static str) {
    match kind {
        ShipKind::Player => ("pixel_ship_yellow.txt", "pixel_laser_yellow.txt"),
        ShipKind::Enemy(EnemyColor::Red) => ("pixel_ship_red_small.txt", "pixel_laser_red.txt"),
        ShipKind::Enemy(EnemyColor::Green) => {
            ("pixel_ship_green_small.txt", "pixel_laser_green.txt")
        }
        ShipKind::Enemy(EnemyColor::Blue) => ("pixel_ship_blue_small.txt", "pixel_laser_blue.txt"),
    }
}

fn builtin_art(kind: ShipKind) -> (&'static str, &'static str) {
    match kind {
        ShipKind::Player => (PLAYER_SHIP_ART, PLAYER_LASER_ART),
        ShipKind::Enemy(EnemyColor::Red) => (RED_SHIP_ART, RED_LASER_ART),
        ShipKind::Enemy(EnemyColor::Green) => (GREEN_SHIP_ART, GREEN_LASER_ART),
        ShipKind::Enemy(EnemyColor::Blue) => (BLUE_SHIP_ART, BLUE_LASER_ART),
    }
}

const ALL_KINDS: [ShipKind; 4] = [
    ShipKind::Player,
    ShipKind::Enemy(EnemyColor::Red),
    ShipKind::Enemy(EnemyColor::Green),
    ShipKind::Enemy(EnemyColor::Blue),
];

impl SpriteSheet {
    /// The art compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::build(|kind| {
            let (ship_name, laser_name) = asset_names(kind);
            let (ship_art, laser_art) = builtin_art(kind);
            Ok(ShipImages {
                ship: Sprite::from_art(ship_name, ship_art)?,
                laser: Sprite::from_art(laser_name, laser_art)?,
            })
        })
    }

    /// Load every image from `dir`.  A missing or empty file is an error.
    pub fn load(dir: &Path) -> Result<Self> {
        let read = |name: &str| -> Result<Sprite> {
            let path = dir.join(name);
            let art = std::fs::read_to_string(&path).map_err(|source| ShooterError::Io {
                path: path.clone(),
                source,
            })?;
            tracing::debug!(path = %path.display(), "loaded sprite");
            Sprite::from_art(name, &art)
        };

        Self::build(|kind| {
            let (ship_name, laser_name) = asset_names(kind);
            Ok(ShipImages {
                ship: read(ship_name)?,
                laser: read(laser_name)?,
            })
        })
    }

    fn build(mut make: impl FnMut(ShipKind) -> Result<ShipImages>) -> Result<Self> {
        let [player, red, green, blue] = ALL_KINDS;
        Ok(SpriteSheet {
            player: make(player)?,
            red: make(red)?,
            green: make(green)?,
            blue: make(blue)?,
        })
    }

    pub fn images(&self, kind: ShipKind) -> &ShipImages {
        match kind {
            ShipKind::Player => &self.player,
            ShipKind::Enemy(EnemyColor::Red) => &self.red,
            ShipKind::Enemy(EnemyColor::Green) => &self.green,
            ShipKind::Enemy(EnemyColor::Blue) => &self.blue,
        }
    }

    pub fn ship(&self, kind: ShipKind) -> &Sprite {
        &self.images(kind).ship
    }

    pub fn laser(&self, kind: ShipKind) -> &Sprite {
        &self.images(kind).laser
    }
}
