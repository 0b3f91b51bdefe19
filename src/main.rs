//! Merge Drop console driver
//!
//! Runs the engine over the headless physics world and reads commands from
//! stdin, one per line:
//!
//! ```text
//! drop X [Y]      queue a drop at X (and Y, default the top line)
//! random          queue a drop at a random position
//! contact A B     report bodies A and B as touching on the next step
//! move H Y        move body H to height Y (keeps x)
//! step [N]        run N fixed steps (default 1)
//! state           print pieces and score
//! restart [SEED]  start a new game
//! quit
//! ```
//!
//! Usage: `merge-drop [settings.json] [seed]`

use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use glam::Vec2;
use thiserror::Error;

use merge_drop::Settings;
use merge_drop::collab::{BodyHandle, HeadlessWorld, LogPresentation, PhysicsWorld};
use merge_drop::consts::SIM_DT;
use merge_drop::sim::{ConfigError, Game, GameEvent};

type ConsoleGame = Game<HeadlessWorld, LogPresentation>;

/// Why a console command could not run
#[derive(Debug, Error)]
enum CommandError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("bad argument {0:?}: {1}")]
    BadArgument(String, String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let seed = match args.next() {
        Some(s) => s.parse()?,
        None => clock_seed(),
    };

    let mut game = Game::new(settings, seed, HeadlessWorld::new(), LogPresentation)?;
    game.start();

    session(&mut game, io::stdin().lock(), &mut io::stdout())?;
    Ok(())
}

/// Run commands until `quit` or end of input
///
/// Bad commands are reported and skipped; only I/O failures end the session.
fn session(game: &mut ConsoleGame, input: impl BufRead, out: &mut impl Write) -> io::Result<()> {
    for line in input.lines() {
        let line = line?;
        match execute(game, &line, out) {
            Ok(true) => {}
            Ok(false) => break,
            Err(CommandError::Io(e)) => return Err(e),
            Err(e) => writeln!(out, "{}: {}", line.trim(), e)?,
        }
    }

    let state = game.state();
    writeln!(
        out,
        "final score {} after {} merges ({:?})",
        state.score.total(),
        state.score.merges(),
        state.phase
    )
}

/// Apply one command line. Returns false when the session should end.
fn execute(game: &mut ConsoleGame, line: &str, out: &mut impl Write) -> Result<bool, CommandError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        [] => {}
        ["quit"] | ["exit"] => return Ok(false),
        ["drop", x] => game.request_drop(arg(x)?, None),
        ["drop", x, y] => game.request_drop(arg(x)?, Some(arg(y)?)),
        ["random"] => game.request_random_drop(),
        ["contact", a, b] => {
            let (a, b) = (BodyHandle(arg(a)?), BodyHandle(arg(b)?));
            game.physics_mut().queue_contact(a, b);
        }
        ["move", h, y] => {
            let handle = BodyHandle(arg(h)?);
            let y: f32 = arg(y)?;
            let moved = match game.physics().position(handle) {
                Some(pos) => game.physics_mut().set_position(handle, Vec2::new(pos.x, y)),
                None => false,
            };
            if !moved {
                writeln!(out, "no body {}", handle)?;
            }
        }
        ["step"] => step(game, 1, out)?,
        ["step", n] => step(game, arg(n)?, out)?,
        ["state"] => print_state(game, out)?,
        ["restart"] => game.restart(clock_seed())?,
        ["restart", s] => game.restart(arg(s)?)?,
        _ => writeln!(out, "unknown command: {}", line.trim())?,
    }
    Ok(true)
}

fn arg<T>(word: &str) -> Result<T, CommandError>
where
    T: FromStr,
    T::Err: Display,
{
    word.parse()
        .map_err(|e: T::Err| CommandError::BadArgument(word.to_string(), e.to_string()))
}

fn step(game: &mut ConsoleGame, n: u32, out: &mut impl Write) -> io::Result<()> {
    for _ in 0..n {
        game.tick(SIM_DT);
        for event in game.drain_events() {
            print_event(game, &event, out)?;
        }
        if game.state().is_over() {
            break;
        }
    }
    Ok(())
}

fn print_event(game: &ConsoleGame, event: &GameEvent, out: &mut impl Write) -> io::Result<()> {
    let ranks = &game.state().ranks;
    match event {
        GameEvent::Dropped { piece, rank, pos } => {
            let body = game.state().pieces.find(*piece).map(|p| p.body);
            match body {
                Some(body) => writeln!(
                    out,
                    "dropped {} {} body {} at ({:.1}, {:.1})",
                    ranks.label_of(*rank),
                    piece,
                    body,
                    pos.x,
                    pos.y
                ),
                None => writeln!(out, "dropped {} {}", ranks.label_of(*rank), piece),
            }
        }
        GameEvent::Merged {
            consumed,
            rank,
            successor,
            points,
        } => writeln!(
            out,
            "merged {} + {} ({}) -> {} (+{})",
            consumed[0],
            consumed[1],
            ranks.label_of(*rank),
            successor,
            points
        ),
        GameEvent::Vanished {
            consumed,
            rank,
            points,
        } => writeln!(
            out,
            "cleared {} + {} ({}) (+{})",
            consumed[0],
            consumed[1],
            ranks.label_of(*rank),
            points
        ),
        GameEvent::GameOver { score } => writeln!(out, "game over, score {}", score),
    }
}

fn print_state(game: &ConsoleGame, out: &mut impl Write) -> io::Result<()> {
    let state = game.state();
    writeln!(
        out,
        "{:?} step {} score {} next {}",
        state.phase,
        state.steps,
        state.score.total(),
        state.ranks.label_of(state.next_rank())
    )?;
    for piece in state.pieces.iter() {
        let pos = game.physics().position(piece.body).unwrap_or(Vec2::NAN);
        writeln!(
            out,
            "  {} body {} {} at ({:.1}, {:.1})",
            piece.id,
            piece.body,
            state.ranks.label_of(piece.rank),
            pos.x,
            pos.y
        )?;
    }
    Ok(())
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5EED)
}
