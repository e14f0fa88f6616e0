use std::sync::Arc;

use space_shooter::compute::*;
use space_shooter::config::Config;
use space_shooter::entities::*;
use space_shooter::input::Controls;
use space_shooter::sprite::SpriteSheet;

use rand::rngs::mock::StepRng;
use rand::rngs::StdRng;
use rand::SeedableRng;

// Field is 40 x 30.  The built-in player ship is 5 x 3:
//
//     "  ▲  "     only column 2 is solid on the top row
//     " /█\ "
//     "◢███◣"
//
// and starts at (16, 25).  Red enemies are a solid 3 x 2 block; every laser
// is a single cell.

fn make_state() -> GameState {
    init_state(
        Arc::new(Config::default()),
        Arc::new(SpriteSheet::builtin().unwrap()),
        40,
        30,
    )
}

/// An RNG that always yields the low end of a range: enemies never fire.
fn quiet_rng() -> StepRng {
    StepRng::new(0, 0)
}

/// An RNG whose every `gen_range(0..60)` roll comes up 1: enemies fire on
/// each frame their cooldown allows (60 = default fire odds at 30 FPS).
fn trigger_happy_rng() -> StepRng {
    StepRng::new(u32::MAX as u64 / 60 + 1000, 0)
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn red_enemy(x: i32, y: i32) -> Ship {
    Ship::new(ShipKind::Enemy(EnemyColor::Red), x, y, 100)
}

/// An enemy far above the field, so the wave never counts as cleared.
fn parked() -> Ship {
    red_enemy(2, -20)
}

fn idle() -> Controls {
    Controls::default()
}

// ── init_state ────────────────────────────────────────────────────────────────

#[test]
fn init_state_session_counters() {
    let s = make_state();
    assert_eq!(s.level, 0);
    assert_eq!(s.lives, 5);
    assert_eq!(s.wave_length, 5);
    assert_eq!(s.player.health, 100);
    assert_eq!(s.status, GameStatus::Playing);
    assert!(s.enemies.is_empty());
}

#[test]
fn init_state_player_at_bottom() {
    let s = make_state();
    assert_eq!((s.player.x, s.player.y), (16, 25));
}

// ── movement bounds ───────────────────────────────────────────────────────────

#[test]
fn move_left_stops_before_edge() {
    let mut s = make_state();
    s.player.x = 3;
    assert_eq!(move_player_left(&s).player.x, 1);
    s.player.x = 2;
    assert_eq!(move_player_left(&s).player.x, 2);
}

#[test]
fn move_right_keeps_ship_inside() {
    let mut s = make_state();
    s.player.x = 32; // 32 + 2 + 5 = 39 < 40
    assert_eq!(move_player_right(&s).player.x, 34);
    s.player.x = 33;
    assert_eq!(move_player_right(&s).player.x, 33);
}

#[test]
fn move_up_stops_below_hud() {
    let mut s = make_state();
    s.player.y = 2;
    assert_eq!(move_player_up(&s).player.y, 1);
    s.player.y = 1;
    assert_eq!(move_player_up(&s).player.y, 1);
}

#[test]
fn move_down_leaves_room_for_health_bar() {
    let s = make_state(); // already as low as it goes
    assert_eq!(move_player_down(&s).player.y, 25);
    let up = move_player_up(&s);
    assert_eq!(move_player_down(&up).player.y, 25);
}

#[test]
fn opposite_directions_cancel() {
    let s = make_state();
    let controls = Controls {
        left: true,
        right: true,
        ..Controls::default()
    };
    assert_eq!(apply_controls(&s, &controls).player.x, s.player.x);
}

#[test]
fn move_does_not_mutate_original() {
    let s = make_state();
    let _ = move_player_left(&s);
    let _ = move_player_up(&s);
    assert_eq!((s.player.x, s.player.y), (16, 25));
}

// ── shooting & cooldown ───────────────────────────────────────────────────────

#[test]
fn cooldown_counts_up_then_wraps() {
    assert_eq!(cooldown(0, 5), 0);
    assert_eq!(cooldown(1, 5), 2);
    assert_eq!(cooldown(4, 5), 5);
    assert_eq!(cooldown(5, 5), 0);
}

#[test]
fn player_laser_leaves_from_the_nose() {
    let s = player_shoot(&make_state());
    assert_eq!(s.player.lasers.len(), 1);
    let l = &s.player.lasers[0];
    assert_eq!((l.x, l.y), (18, 25));
    assert_eq!(l.owner, ShipKind::Player);
    assert_eq!(s.player.cool_down_counter, 1);
}

#[test]
fn second_shot_blocked_until_cooldown_clears() {
    let s = player_shoot(&make_state());
    let s = player_shoot(&s);
    assert_eq!(s.player.lasers.len(), 1);
}

#[test]
fn enemy_laser_leaves_from_under_the_hull() {
    let sheet = SpriteSheet::builtin().unwrap();
    let e = shoot(&red_enemy(10, 4), &sheet);
    assert_eq!(e.lasers.len(), 1);
    assert_eq!((e.lasers[0].x, e.lasers[0].y), (11, 6));
    assert_eq!(shoot(&e, &sheet).lasers.len(), 1);
}

#[test]
fn holding_fire_shoots_once_per_cooldown() {
    // Default cooldown is 5 frames: shots land on frames 1 and 6.
    let mut s = make_state();
    s.enemies.push(parked());
    let fire = Controls {
        shoot: true,
        ..Controls::default()
    };
    let mut rng = quiet_rng();
    for _ in 0..5 {
        s = tick(&s, &fire, &mut rng);
    }
    assert_eq!(s.player.lasers.len(), 1);
    s = tick(&s, &fire, &mut rng);
    assert_eq!(s.player.lasers.len(), 2);
}

// ── collision ─────────────────────────────────────────────────────────────────

#[test]
fn collide_uses_pixel_mask_not_bounding_box() {
    let s = make_state();
    let corner = Laser { x: 16, y: 25, owner: ShipKind::Enemy(EnemyColor::Red) };
    let nose = Laser { x: 18, y: 25, owner: ShipKind::Enemy(EnemyColor::Red) };
    assert!(!collide(&s.player, &corner, &s.sprites));
    assert!(collide(&s.player, &nose, &s.sprites));
    assert!(collide(&nose, &s.player, &s.sprites));
}

// ── tick — enemy lasers ───────────────────────────────────────────────────────

#[test]
fn enemy_laser_hit_damages_player_and_disappears() {
    let mut s = make_state();
    let mut shooter = red_enemy(30, 5);
    shooter.lasers.push(Laser { x: 18, y: 24, owner: shooter.kind });
    s.enemies.push(shooter);

    let s2 = tick(&s, &idle(), &mut quiet_rng());
    assert_eq!(s2.player.health, 90);
    assert!(s2.enemies[0].lasers.is_empty());
}

#[test]
fn enemy_laser_passes_through_transparent_cells() {
    // Column 16 is empty on the two top rows of the ship and solid on the last.
    let mut s = make_state();
    let mut shooter = red_enemy(30, 5);
    shooter.lasers.push(Laser { x: 16, y: 24, owner: shooter.kind });
    s.enemies.push(shooter);

    let mut rng = quiet_rng();
    let s = tick(&s, &idle(), &mut rng);
    let s = tick(&s, &idle(), &mut rng);
    assert_eq!(s.player.health, 100);
    assert_eq!(s.enemies[0].lasers.len(), 1);

    let s = tick(&s, &idle(), &mut rng);
    assert_eq!(s.player.health, 90);
    assert!(s.enemies[0].lasers.is_empty());
}

#[test]
fn enemy_laser_removed_below_screen() {
    let mut s = make_state();
    let mut shooter = red_enemy(30, 5);
    shooter.lasers.push(Laser { x: 5, y: 30, owner: shooter.kind });
    s.enemies.push(shooter);

    let s2 = tick(&s, &idle(), &mut quiet_rng());
    assert!(s2.enemies[0].lasers.is_empty());
    assert_eq!(s2.player.health, 100);
}

// ── tick — player lasers ──────────────────────────────────────────────────────

#[test]
fn player_laser_destroys_enemy() {
    let mut s = make_state();
    s.enemies.push(parked());
    s.enemies.push(red_enemy(17, 20));
    s.player.lasers.push(Laser { x: 18, y: 22, owner: ShipKind::Player });

    let s2 = tick(&s, &idle(), &mut quiet_rng());
    assert_eq!(s2.enemies.len(), 1);
    assert_eq!(s2.enemies[0].y, -20);
    assert!(s2.player.lasers.is_empty());
}

#[test]
fn one_laser_destroys_every_enemy_it_overlaps() {
    let mut s = make_state();
    s.enemies.push(parked());
    s.enemies.push(red_enemy(17, 20)); // covers column 18
    s.enemies.push(red_enemy(18, 20)); // also covers column 18
    s.player.lasers.push(Laser { x: 18, y: 22, owner: ShipKind::Player });

    let s2 = tick(&s, &idle(), &mut quiet_rng());
    assert_eq!(s2.enemies.len(), 1);
    assert_eq!(s2.enemies[0].y, -20);
    assert!(s2.player.lasers.is_empty());
}

#[test]
fn player_laser_misses_and_keeps_flying() {
    let mut s = make_state();
    s.enemies.push(red_enemy(17, 20));
    s.player.lasers.push(Laser { x: 21, y: 22, owner: ShipKind::Player });

    let s2 = tick(&s, &idle(), &mut quiet_rng());
    assert_eq!(s2.enemies.len(), 1);
    assert_eq!(s2.player.lasers[0].y, 21);
}

#[test]
fn player_laser_removed_above_screen() {
    let mut s = make_state();
    s.enemies.push(parked());
    s.player.lasers.push(Laser { x: 5, y: 0, owner: ShipKind::Player });

    let s2 = tick(&s, &idle(), &mut quiet_rng());
    assert!(s2.player.lasers.is_empty());
}

// ── tick — enemies ────────────────────────────────────────────────────────────

#[test]
fn enemies_descend_on_interval() {
    let mut s = make_state();
    s.enemies.push(red_enemy(5, 5));

    let s1 = tick(&s, &idle(), &mut quiet_rng()); // frame 1
    assert_eq!(s1.enemies[0].y, 5);

    s.frame = 3; // frame 4 is a move frame
    let s2 = tick(&s, &idle(), &mut quiet_rng());
    assert_eq!(s2.enemies[0].y, 6);
}

#[test]
fn enemy_fires_when_the_roll_comes_up() {
    let mut s = make_state();
    s.enemies.push(red_enemy(10, 4));

    let s2 = tick(&s, &idle(), &mut trigger_happy_rng());
    let e = &s2.enemies[0];
    assert_eq!(
        e.lasers,
        vec![Laser { x: 11, y: 6, owner: ShipKind::Enemy(EnemyColor::Red) }]
    );
    assert_eq!(e.cool_down_counter, 1);
}

#[test]
fn enemy_holds_fire_on_other_rolls() {
    let mut s = make_state();
    s.enemies.push(red_enemy(10, 4));

    let s2 = tick(&s, &idle(), &mut quiet_rng());
    assert!(s2.enemies[0].lasers.is_empty());
    assert_eq!(s2.enemies[0].cool_down_counter, 0);
}

#[test]
fn ramming_enemy_damages_player_and_disappears() {
    let mut s = make_state();
    s.enemies.push(parked());
    s.enemies.push(red_enemy(16, 24));

    let s2 = tick(&s, &idle(), &mut quiet_rng());
    assert_eq!(s2.player.health, 90);
    assert_eq!(s2.enemies.len(), 1);
    assert_eq!(s2.lives, 5);
}

#[test]
fn enemy_slipping_past_costs_a_life() {
    let mut s = make_state();
    s.enemies.push(parked());
    s.enemies.push(red_enemy(2, 28));
    s.frame = 3; // descends to 28 + 1; bottom edge 31 > 30

    let s2 = tick(&s, &idle(), &mut quiet_rng());
    assert_eq!(s2.lives, 4);
    assert_eq!(s2.enemies.len(), 1);
    assert_eq!(s2.player.health, 100);
}

#[test]
fn enemy_touching_bottom_edge_stays() {
    let mut s = make_state();
    s.enemies.push(red_enemy(2, 28)); // bottom edge exactly 30

    let s2 = tick(&s, &idle(), &mut quiet_rng());
    assert_eq!(s2.lives, 5);
    assert_eq!(s2.enemies.len(), 1);
}

// ── tick — waves ──────────────────────────────────────────────────────────────

#[test]
fn first_tick_spawns_wave_one_above_the_field() {
    let s = tick(&make_state(), &idle(), &mut seeded_rng());
    assert_eq!(s.level, 1);
    assert_eq!(s.wave_length, 10);
    assert_eq!(s.enemies.len(), 10);
    for e in &s.enemies {
        assert!(matches!(e.kind, ShipKind::Enemy(_)));
        assert!(e.y < 0 && e.y >= -60, "y = {}", e.y);
        assert!(e.x >= 2 && e.x < 35, "x = {}", e.x);
    }
}

#[test]
fn cleared_field_grows_the_next_wave() {
    let mut s = make_state();
    s.level = 3;
    s.wave_length = 20;
    let s2 = tick(&s, &idle(), &mut seeded_rng());
    assert_eq!(s2.level, 4);
    assert_eq!(s2.wave_length, 25);
    assert_eq!(s2.enemies.len(), 25);
}

#[test]
fn no_wave_while_enemies_remain() {
    let mut s = make_state();
    s.enemies.push(parked());
    let s2 = tick(&s, &idle(), &mut seeded_rng());
    assert_eq!(s2.level, 0);
    assert_eq!(s2.enemies.len(), 1);
}

// ── tick — losing ─────────────────────────────────────────────────────────────

#[test]
fn no_lives_left_freezes_the_world() {
    let mut s = make_state();
    s.lives = 0;
    s.enemies.push(red_enemy(5, 5));
    s.frame = 3;

    let s2 = tick(&s, &Controls { left: true, ..Controls::default() }, &mut quiet_rng());
    assert_eq!(s2.status, GameStatus::Lost { frames: 1 });
    assert_eq!(s2.enemies[0].y, 5);
    assert_eq!(s2.player.x, s.player.x);
}

#[test]
fn negative_health_counts_as_lost() {
    let mut s = make_state();
    s.player.health = -10;
    let s2 = tick(&s, &idle(), &mut quiet_rng());
    assert_eq!(s2.status, GameStatus::Lost { frames: 1 });
}

#[test]
fn lost_screen_lasts_three_seconds() {
    let mut s = make_state();
    s.player.health = 0;
    let mut rng = quiet_rng();
    for _ in 0..90 {
        s = tick(&s, &idle(), &mut rng);
    }
    assert_eq!(s.status, GameStatus::Lost { frames: 90 });
    s = tick(&s, &idle(), &mut rng);
    assert_eq!(s.status, GameStatus::Finished);
}

#[test]
fn tick_increments_frame_and_leaves_original_alone() {
    let mut s = make_state();
    s.frame = 7;
    let s2 = tick(&s, &idle(), &mut seeded_rng());
    assert_eq!(s2.frame, 8);
    assert!(s.enemies.is_empty());
    assert_eq!(s.level, 0);
}
