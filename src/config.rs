/// Game tunables, loaded from a RON file.
///
/// Every field has a default, so a config file only needs to name the
/// values it changes:
///
/// ```ron
/// (fps: 60, starting_lives: 3)
/// ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ShooterError};

/// Upper bounds keeping the frame arithmetic well inside `u32` / `i32`.
pub const MAX_FPS: u32 = 1000;
pub const MAX_LOST_SCREEN_SECONDS: u32 = 600;
pub const MAX_SPAWN_DEPTH_SCREENS: i32 = 100;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "space_shooter.ron";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Frame-rate cap.  Enemy fire chance and the lost screen scale with it.
    pub fps: u32,

    // === Session ===
    pub starting_lives: i32,
    /// Wave size before the first wave is spawned (the first wave adds
    /// `wave_increment` on top of this).
    pub starting_wave_length: u32,
    pub wave_increment: u32,
    /// Seconds the "You Lost!!" screen stays up.
    pub lost_screen_seconds: u32,

    // === Ships ===
    pub player_health: i32,
    /// Damage an enemy laser does to the player.
    pub laser_damage: i32,
    /// Damage an enemy ramming the player does.
    pub collision_damage: i32,
    /// Frames between two shots of the same ship.
    pub cooldown_frames: u32,

    // === Movement (cells) ===
    pub player_step_x: i32,
    pub player_step_y: i32,
    /// Frames between two player moves while a direction key is held.
    pub move_cooldown_frames: u32,
    /// Rows a laser travels per frame.
    pub laser_speed: i32,
    /// Rows an enemy descends per move.
    pub enemy_speed: i32,
    /// Enemies move once every this many frames.
    pub enemy_move_interval: u64,

    // === Layout (cells) ===
    /// Horizontal gap kept free on both sides when spawning enemies.
    pub spawn_margin: i32,
    /// How many screen heights above the field a wave is spread over.
    pub spawn_depth_screens: i32,
    /// Rows reserved under the player ship for the health bar.
    pub health_bar_gap: i32,

    // === Files ===
    /// Directory holding sprite art; the built-in art is used when unset.
    pub assets_dir: Option<PathBuf>,
    pub log_file: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fps: 30,

            starting_lives: 5,
            starting_wave_length: 5,
            wave_increment: 5,
            lost_screen_seconds: 3,

            player_health: 100,
            laser_damage: 10,
            collision_damage: 10,
            cooldown_frames: 5,

            player_step_x: 2,
            player_step_y: 1,
            move_cooldown_frames: 2,
            laser_speed: 1,
            enemy_speed: 1,
            enemy_move_interval: 4,

            spawn_margin: 2,
            spawn_depth_screens: 2,
            health_bar_gap: 1,

            assets_dir: None,
            log_file: PathBuf::from("space_shooter.log"),
        }
    }
}

impl Config {
    /// Parse a config from RON text.
    pub fn from_ron(text: &str, origin: &Path) -> Result<Self> {
        let config: Config = ron::from_str(text).map_err(|source| ShooterError::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, else from [`DEFAULT_CONFIG_FILE`] when it
    /// exists, else fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let p = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !p.exists() {
                    return Ok(Config::default());
                }
                p
            }
        };

        let text = std::fs::read_to_string(&path).map_err(|source| ShooterError::Io {
            path: path.clone(),
            source,
        })?;
        Self::from_ron(&text, &path)
    }

    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(ShooterError::ConfigSerialize)
    }

    pub fn validate(&self) -> Result<()> {
        if self.fps == 0 || self.fps > MAX_FPS {
            return Err(ShooterError::InvalidConfig(format!(
                "fps must be between 1 and {MAX_FPS}"
            )));
        }
        if self.lost_screen_seconds > MAX_LOST_SCREEN_SECONDS {
            return Err(ShooterError::InvalidConfig(format!(
                "lost_screen_seconds must be at most {MAX_LOST_SCREEN_SECONDS}"
            )));
        }
        if self.enemy_move_interval == 0 {
            return Err(ShooterError::InvalidConfig(
                "enemy_move_interval must be positive".into(),
            ));
        }
        if self.laser_speed <= 0 {
            return Err(ShooterError::InvalidConfig(
                "laser_speed must be positive".into(),
            ));
        }
        if self.spawn_depth_screens <= 0 || self.spawn_depth_screens > MAX_SPAWN_DEPTH_SCREENS {
            return Err(ShooterError::InvalidConfig(format!(
                "spawn_depth_screens must be between 1 and {MAX_SPAWN_DEPTH_SCREENS}"
            )));
        }
        Ok(())
    }

    /// Frames the lost screen is shown before the session ends.
    pub fn lost_screen_frames(&self) -> u32 {
        self.fps.saturating_mul(self.lost_screen_seconds)
    }

    /// An enemy fires when a roll in `0..enemy_fire_odds()` comes up 1.
    pub fn enemy_fire_odds(&self) -> u32 {
        self.fps.saturating_mul(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let c = Config::from_ron("(fps: 60, starting_lives: 3)", Path::new("t.ron")).unwrap();
        assert_eq!(c.fps, 60);
        assert_eq!(c.starting_lives, 3);
        assert_eq!(c.player_health, 100);
        assert_eq!(c.wave_increment, 5);
    }

    #[test]
    fn rejects_zero_fps() {
        let err = Config::from_ron("(fps: 0)", Path::new("t.ron")).unwrap_err();
        assert!(matches!(err, ShooterError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_frame_rates_that_overflow_the_tick() {
        for text in ["(fps: 3000000000)", "(fps: 1001)"] {
            let err = Config::from_ron(text, Path::new("t.ron")).unwrap_err();
            assert!(matches!(err, ShooterError::InvalidConfig(_)), "{text}");
        }
        assert!(Config::from_ron("(fps: 1000)", Path::new("t.ron")).is_ok());
    }

    #[test]
    fn rejects_oversized_lost_screen_and_spawn_depth() {
        for text in ["(lost_screen_seconds: 4000000000)", "(spawn_depth_screens: 2000000000)"] {
            let err = Config::from_ron(text, Path::new("t.ron")).unwrap_err();
            assert!(matches!(err, ShooterError::InvalidConfig(_)), "{text}");
        }
    }

    #[test]
    fn frame_products_saturate_instead_of_overflowing() {
        let c = Config {
            fps: u32::MAX,
            lost_screen_seconds: u32::MAX,
            ..Config::default()
        };
        assert_eq!(c.lost_screen_frames(), u32::MAX);
        assert_eq!(c.enemy_fire_odds(), u32::MAX);
    }

    #[test]
    fn reports_parse_errors_with_path() {
        let err = Config::from_ron("(fps: \"fast\")", Path::new("bad.ron")).unwrap_err();
        match err {
            ShooterError::ConfigParse { path, .. } => assert_eq!(path, Path::new("bad.ron")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn pretty_output_parses_back() {
        let c = Config::default();
        let back = Config::from_ron(&c.to_ron().unwrap(), Path::new("t.ron")).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn lost_screen_is_three_seconds_of_frames() {
        assert_eq!(Config::default().lost_screen_frames(), 90);
    }
}
