mod audio;
mod display;

use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal,
    ExecutableCommand,
};
use rand::thread_rng;

use gravity_bird::config::GameConfig;
use gravity_bird::resources::ResourceBundle;
use gravity_bird::sim::GameSimulation;

use audio::CueSink;

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the user quits.  One iteration per frame: drain input, advance
/// the simulation by the elapsed wall time, route cues, render, pace.
fn game_loop<W: Write>(
    out: &mut W,
    sim: &mut GameSimulation,
    bundle: &ResourceBundle,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let mut rng = thread_rng();
    let mut sink = CueSink::new(true);
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = ev
            else {
                continue;
            };
            if kind != KeyEventKind::Press {
                continue;
            }
            match code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(());
                }
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(());
                }
                KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Up => {
                    sim.activate();
                }
                _ => {}
            }
        }

        let now = Instant::now();
        sim.frame(now - last, &mut rng);
        last = now;

        for cue in sim.drain_cues() {
            sink.play(out, bundle, cue)?;
        }

        display::render(out, sim, bundle)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    env_logger::init();

    let bundle = match ResourceBundle::load() {
        Ok(bundle) => bundle,
        Err(err) => {
            eprintln!("failed to load assets: {err}");
            std::process::exit(1);
        }
    };
    let mut sim = GameSimulation::new(GameConfig::default(), &bundle);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break; // receiver dropped → program exiting
                    }
                }
                Err(_) => break,
            }
        }
    });

    let result = game_loop(&mut out, &mut sim, &bundle, &rx);

    // Always restore the terminal
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}
