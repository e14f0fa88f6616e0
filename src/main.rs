mod display;

use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::process;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::thread_rng;
use tracing_subscriber::EnvFilter;

use space_shooter::compute::{init_state, tick};
use space_shooter::config::Config;
use space_shooter::entities::{GameState, GameStatus};
use space_shooter::input::KeyTracker;
use space_shooter::sprite::SpriteSheet;

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    assets: Option<PathBuf>,
    print_config: bool,
}

fn print_usage() {
    eprintln!(
        "space_shooter: terminal space shooter\n\
         \n\
         Usage: space_shooter [--config <file.ron>] [--assets <dir>] [--print-config]\n\
         \n\
           --config <path>   RON config file (default: ./space_shooter.ron if present)\n\
           --assets <dir>    Directory of sprite art files (default: built-in art)\n\
           --print-config    Print the effective config as RON and exit\n\
         \n\
         Logging goes to the configured log file; set RUST_LOG to change the level.\n"
    );
}

fn parse_args() -> Args {
    let raw: Vec<String> = std::env::args().skip(1).collect();
    let mut args = Args::default();
    let mut iter = raw.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => args.config = iter.next().map(PathBuf::from),
            "--assets" => args.assets = iter.next().map(PathBuf::from),
            "--print-config" => args.print_config = true,
            "help" | "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                process::exit(1);
            }
        }
    }
    args
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// Log to a file: stdout belongs to the game screen.
fn init_tracing(config: &Config) -> Result<()> {
    let file = std::fs::File::create(&config.log_file)
        .with_context(|| format!("creating log file {}", config.log_file.display()))?;

    // RUST_LOG=space_shooter=debug
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .compact()
        .try_init();
    Ok(())
}

fn restore_terminal() {
    let mut out = stdout();
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

/// Put the terminal back before the default hook prints the panic message.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let location = info
            .location()
            .map(|l| format!("{}:{}", l.file(), l.line()))
            .unwrap_or_else(|| "<unknown>".to_string());
        tracing::error!(%location, "panic: {info}");

        restore_terminal();
        default_hook(info);
    }));
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start,
    Quit,
}

fn is_quit_key(code: &KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

fn show_menu<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> Result<MenuResult> {
    let (width, height) = terminal::size()?;
    display::render_menu(out, width, height)?;

    // Block until the user makes a choice
    loop {
        let Ok(ev) = rx.recv() else {
            return Ok(MenuResult::Quit);
        };
        match ev {
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(_),
                ..
            }) => return Ok(MenuResult::Start),
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) => {
                if is_quit_key(&code, modifiers) {
                    return Ok(MenuResult::Quit);
                }
                if code == KeyCode::Enter {
                    return Ok(MenuResult::Start);
                }
            }
            Event::Resize(w, h) => display::render_menu(out, w, h)?,
            _ => {}
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program,  `false` → back to menu.
///
/// Key events only update the held-key tracker; the resulting controls are
/// applied once per frame inside `tick`.  Movement is throttled here so
/// holding a direction key does not send the ship across the screen in a
/// blink; firing is throttled by the ship's own cooldown.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
) -> Result<bool> {
    let mut rng = thread_rng();
    let frame_time = Duration::from_secs(1) / state.config.fps;
    let move_every = state.config.move_cooldown_frames;

    let mut keys = KeyTracker::new();
    let mut move_cooldown: u32 = 0;

    loop {
        let frame_start = Instant::now();
        let frame = state.frame + 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            if let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = ev
            {
                if kind == KeyEventKind::Press && is_quit_key(&code, modifiers) {
                    return Ok(true);
                }
                keys.record(code, kind, frame);
            }
        }

        let mut controls = keys.controls(frame);
        if move_cooldown > 0 {
            controls = controls.without_movement();
        } else if controls.moving() {
            move_cooldown = move_every;
        }
        move_cooldown = move_cooldown.saturating_sub(1);

        *state = tick(state, &controls, &mut rng);
        if state.status == GameStatus::Finished {
            tracing::info!(level = state.level, "session over");
            return Ok(false);
        }

        display::render(out, state)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            std::thread::sleep(frame_time - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = parse_args();

    let mut config = Config::load(args.config.as_deref()).context("loading config")?;
    if args.assets.is_some() {
        config.assets_dir = args.assets;
    }
    config.validate()?;

    if args.print_config {
        println!("{}", config.to_ron()?);
        return Ok(());
    }

    init_tracing(&config)?;
    install_panic_hook();

    // A missing asset aborts before the terminal is touched.
    let sprites = match &config.assets_dir {
        Some(dir) => SpriteSheet::load(dir)
            .with_context(|| format!("loading sprites from {}", dir.display()))?,
        None => SpriteSheet::builtin().context("building built-in sprites")?,
    };
    tracing::info!(fps = config.fps, assets = ?config.assets_dir, "starting");

    let config = Arc::new(config);
    let sprites = Arc::new(sprites);

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "event reader stopped");
                break;
            }
        }
    });

    let result = run(&mut out, &rx, &config, &sprites);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    restore_terminal();

    if let Err(e) = &result {
        tracing::error!(error = %e, "exiting with error");
    }
    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &Arc<Config>,
    sprites: &Arc<SpriteSheet>,
) -> Result<()> {
    loop {
        match show_menu(out, rx)? {
            MenuResult::Quit => break,
            MenuResult::Start => {
                let (width, height) = terminal::size()?;
                tracing::info!(width, height, "new game");
                let mut state =
                    init_state(Arc::clone(config), Arc::clone(sprites), width, height);
                if game_loop(out, &mut state, rx)? {
                    break;
                }
                // Otherwise loop back to the menu
            }
        }
    }
    Ok(())
}
