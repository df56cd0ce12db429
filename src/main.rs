use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{info, warn};
use rand::thread_rng;

use crowd_rush::audio::{AudioManager, Clip};
use crowd_rush::compute::{init_state, tick, FrameInput};
use crowd_rush::display::{self, Viewport};
use crowd_rush::entities::{GameEvent, GameState, GameStatus};
use crowd_rush::GameError;

const FRAME: Duration = Duration::from_millis(25); // ≈40 FPS

const LOG_FILE: &str = "crowd_rush.log";

// ── Held-key input ────────────────────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events.
const HOLD_WINDOW: u64 = 4;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

/// Lateral direction from the currently held keys; left wins a tie.
fn lateral(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> i32 {
    let held = |keys: &[KeyCode]| keys.iter().any(|k| is_held(key_frame, k, frame));
    if held(&[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')]) {
        -1
    } else if held(&[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')]) {
        1
    } else {
        0
    }
}

fn is_exit(code: &KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

fn is_mute_toggle(code: &KeyCode) -> bool {
    matches!(code, KeyCode::Char('m') | KeyCode::Char('M'))
}

/// One-shot commands collected while draining the input channel.
#[derive(Debug, Default, PartialEq)]
struct Commands {
    exit: bool,
    toggle_mute: bool,
}

/// Drain pending key events (non-blocking).
fn poll_input(rx: &mpsc::Receiver<Event>, key_frame: &mut HashMap<KeyCode, u64>, frame: u64) -> Commands {
    let mut commands = Commands::default();
    while let Ok(ev) = rx.try_recv() {
        let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
            continue;
        };
        match kind {
            KeyEventKind::Press => {
                if is_exit(&code, modifiers) {
                    commands.exit = true;
                    return commands;
                }
                if is_mute_toggle(&code) {
                    commands.toggle_mute = !commands.toggle_mute;
                    continue;
                }
                key_frame.insert(code, frame);
            }
            KeyEventKind::Repeat => {
                key_frame.insert(code, frame);
            }
            KeyEventKind::Release => {
                key_frame.remove(&code);
            }
        }
    }
    commands
}

// ── Game loop ─────────────────────────────────────────────────────────────────

fn log_events(state: &GameState) {
    for event in &state.events {
        match event {
            GameEvent::SoldierLost => info!("soldier lost, {} left", state.squad_size()),
            GameEvent::GameOver => info!(
                "game over at frame {}: {} kills, {} wall sets",
                state.frame,
                state.kills,
                state.next_set_id.saturating_sub(1)
            ),
            _ => {}
        }
    }
}

/// Runs frames until the exit key.  After game over only the game-over
/// screen is drawn.
fn game_loop<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    audio: &mut AudioManager,
) -> Result<(), GameError> {
    let mut rng = thread_rng();
    let clock = Instant::now();
    let mut state = init_state(0);

    // Maps each held key → the frame it was last seen (press or repeat).
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    audio.play_loop(Clip::Background);

    loop {
        let frame_start = Instant::now();
        frame += 1;

        let commands = poll_input(rx, &mut key_frame, frame);
        if commands.exit {
            info!("exit requested at frame {}", frame);
            return Ok(());
        }
        if commands.toggle_mute {
            let muted = audio.toggle_muted();
            info!("audio {}", if muted { "muted" } else { "unmuted" });
        }

        if state.status == GameStatus::Playing {
            let input = FrameInput {
                lateral: lateral(&key_frame, frame),
                now_ms: clock.elapsed().as_millis() as u64,
            };
            state = tick(&state, &input, &mut rng);
            audio.handle_events(out, &state.events)?;
            log_events(&state);
        }

        let (cols, rows) = terminal::size()?;
        display::render(out, &state, Viewport::new(cols, rows))?;

        // Keys pressed during the frame are checked again before sleeping.
        let late = poll_input(rx, &mut key_frame, frame);
        if late.exit {
            info!("exit requested at frame {}", frame);
            return Ok(());
        }
        if late.toggle_mute {
            audio.toggle_muted();
        }

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Log to a file: the terminal is busy with the alternate screen.
fn init_logging() {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    match File::create(LOG_FILE) {
        Ok(file) => {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        Err(err) => {
            eprintln!("cannot open {}: {}; logging disabled", LOG_FILE, err);
            builder.filter_level(log::LevelFilter::Off);
        }
    }
    builder.init();
}

fn main() -> Result<(), GameError> {
    init_logging();

    // Asset failures abort before the terminal is touched.
    let mut audio = AudioManager::from_env()?;

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();
    if !keyboard_enhanced {
        warn!("terminal lacks key-release events; falling back to hold window");
    }

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = game_loop(&mut out, &rx, &mut audio);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
